use super::*;

fn tri(x: f32) -> Triangle {
  Triangle {
    positions: [[x, 0.0, 0.0], [x + 1.0, 0.0, 0.0], [x, 1.0, 0.0]],
    normals: [[0.0, 0.0, 1.0]; 3],
  }
}

#[test]
fn test_frame_streams() {
  let buffer = AppendBuffer::with_capacity(4);
  buffer.append(tri(0.0));
  buffer.append(tri(5.0));

  let frame = LayerFrame::new(
    0,
    1,
    0..4,
    DrawCommand::Direct { vertex_count: 6 },
    &buffer,
  );

  assert_eq!(frame.triangle_count(), 2);
  assert_eq!(frame.positions().count(), 6);
  assert_eq!(frame.normals().count(), 6);
  assert_eq!(frame.indices(), 0..6);
  assert_eq!(frame.positions().nth(3), Some([5.0, 0.0, 0.0]));
  assert_eq!(frame.z_range, (0, 4));
}

#[test]
fn test_frame_reads_unwritten_slots_as_degenerate() {
  let buffer = AppendBuffer::with_capacity(5);
  buffer.write_at(2, tri(1.0));

  let frame = LayerFrame::new(
    0,
    1,
    0..1,
    DrawCommand::Direct { vertex_count: 15 },
    &buffer,
  );

  let tris: Vec<Triangle> = frame.triangles().collect();
  assert_eq!(tris.len(), 5);
  assert_eq!(tris[0], Triangle::DEGENERATE);
  assert_eq!(tris[2], tri(1.0));
}

#[test]
fn test_mesh_collector_accumulates_layers() {
  let buffer = AppendBuffer::with_capacity(5);
  buffer.write_at(0, tri(0.0));
  buffer.write_at(3, tri(2.0));
  let args = IndirectArgsBuffer {
    vertex_count: 15,
    ..IndirectArgsBuffer::RESET
  };

  let mut collector = MeshCollector::new();
  collector.consume(LayerFrame::new(0, 2, 0..1, DrawCommand::Indirect(&args), &buffer));
  collector.consume(LayerFrame::new(1, 2, 1..2, DrawCommand::Indirect(&args), &buffer));

  assert_eq!(collector.layers(), 2);
  assert_eq!(collector.mesh().triangle_count(), 4, "degenerate slots skipped");

  let mut keeping = MeshCollector::new().keep_degenerate();
  keeping.consume(LayerFrame::new(0, 1, 0..1, DrawCommand::Indirect(&args), &buffer));
  assert_eq!(keeping.into_mesh().triangle_count(), 5);
}

#[test]
fn test_empty_frame() {
  let buffer: AppendBuffer<Triangle> = AppendBuffer::with_capacity(0);
  let frame = LayerFrame::new(0, 1, 0..1, DrawCommand::Direct { vertex_count: 0 }, &buffer);
  assert!(frame.is_empty());
  assert_eq!(frame.triangles().count(), 0);

  let mut collector = MeshCollector::new();
  collector.consume(frame);
  NullSink.consume(frame);
  assert!(collector.mesh().is_empty());
  assert_eq!(collector.layers(), 1);
}
