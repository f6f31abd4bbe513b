use glam::{Mat4, Vec3};

use super::test_utils::*;
use super::*;
use crate::config::{GridParams, NormalMode};
use crate::density::{ConstantField, SphereField};
use crate::error::ConfigError;
use crate::sink::NullSink;

fn sphere_pipeline(
  field: SphereField,
  config: ExtractionConfig,
) -> ExtractionPipeline<SphereField> {
  ExtractionPipeline::new(field, config).expect("valid config")
}

// =============================================================================
// Construction
// =============================================================================

#[test]
fn test_builder_requires_field() {
  let result = ExtractionPipeline::<SphereField>::builder()
    .config(ExtractionConfig::new().with_factor(4))
    .build();
  assert_eq!(result.err(), Some(PipelineError::MissingDensityField));
}

#[test]
fn test_builder_with_field() {
  let (field, config) = small_sphere();
  let pipeline = ExtractionPipeline::builder()
    .field(field)
    .config(config)
    .build()
    .expect("valid");
  assert_eq!(pipeline.state(), PipelineState::Idle);
  assert_eq!(pipeline.epoch(), 0);
  assert_eq!(pipeline.case_table(), CaseTable::canonical());
}

#[test]
fn test_config_errors_surface() {
  let config = ExtractionConfig::new()
    .with_grid(GridParams::default().with_resolution(glam::UVec3::new(4, 0, 4)));
  let err = ExtractionPipeline::new(ConstantField(1.0), config).err();
  assert_eq!(
    err,
    Some(PipelineError::Config(ConfigError::ZeroResolution { x: 4, y: 0, z: 4 }))
  );

  let err = ExtractionPipeline::new(
    ConstantField(1.0),
    ExtractionConfig::new().with_threshold(f32::NAN),
  )
  .err();
  assert!(matches!(
    err,
    Some(PipelineError::Config(ConfigError::NonFiniteThreshold(_)))
  ));
}

#[test]
fn test_capacity_below_one_slice_rejected() {
  let config = ExtractionConfig::new()
    .with_factor(8)
    .with_capacity_triangles(5 * 64 - 1);
  let err = ExtractionPipeline::new(ConstantField(1.0), config).err();
  assert!(matches!(
    err,
    Some(PipelineError::Config(ConfigError::CapacityBelowSlice { .. }))
  ));
}

#[test]
fn test_invalid_case_table_rejected() {
  let mut table = CaseTable::default();
  table.triangle_count[0] = 1;

  let err = ExtractionPipeline::builder()
    .field(ConstantField(0.0))
    .config(ExtractionConfig::new().with_factor(4))
    .case_table(table)
    .build()
    .err();
  assert!(matches!(
    err,
    Some(PipelineError::Config(ConfigError::InvalidCaseTable { case: 0, .. }))
  ));
}

#[test]
fn test_buffers_sized_for_deepest_layer() {
  let (field, config) = large_sphere();
  let pipeline = sphere_pipeline(field, config.with_steps(4));
  assert_eq!(pipeline.capacity_triangles(), 5 * 16 * 16 * 4);
}

// =============================================================================
// Geometry
// =============================================================================

#[test]
fn test_sphere_mesh_is_closed() {
  let (field, config) = small_sphere();
  let mut pipeline = sphere_pipeline(field, config);
  let mesh = pipeline.extract_mesh(0.0, Mat4::IDENTITY);

  assert_eq!(mesh.triangle_count(), 248);
  assert!(is_closed(&mesh), "sphere mesh must be watertight");
  assert!(mesh.signed_volume() > 0.0, "triangles must wind outward");

  let expected = 4.0 / 3.0 * std::f32::consts::PI * 2.5f32.powi(3);
  let volume = mesh.signed_volume();
  assert!(
    (volume - expected).abs() / expected < 0.15,
    "volume {volume} too far from {expected}"
  );
}

#[test]
fn test_sphere_vertices_near_surface() {
  let (field, config) = small_sphere();
  let mut pipeline = sphere_pipeline(field, config);
  let mesh = pipeline.extract_mesh(0.0, Mat4::IDENTITY);

  let lo = 4.0 - 2.5 - 1.0;
  let hi = 4.0 + 2.5 + 1.0;
  for axis in 0..3 {
    assert!(mesh.bounds.min[axis] >= lo && mesh.bounds.max[axis] <= hi);
  }

  for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
    let offset = Vec3::from_array(*p) - field.center;
    let normal = Vec3::from_array(*n);
    assert!((offset.length() - 2.5).abs() < 0.3);
    assert!((normal.length() - 1.0).abs() < 1e-4);
    assert!(normal.dot(offset) > 0.0, "normal must point away from the solid");
  }
}

#[test]
fn test_uniform_fields_produce_nothing() {
  for value in [1.0, -1.0, 0.0] {
    let mut pipeline =
      ExtractionPipeline::new(ConstantField(value), ExtractionConfig::new().with_factor(8))
        .expect("valid");
    let mut sink = RecordingSink::default();
    let report = pipeline.run_epoch(0.0, Mat4::IDENTITY, &mut sink);

    assert_eq!(report.triangle_count, 0, "constant {value}");
    assert!(sink.layers.iter().all(|l| l.vertex_count == 0));
  }
}

#[test]
fn test_translation_moves_every_vertex() {
  let (field, config) = small_sphere();
  let mut pipeline = sphere_pipeline(field, config);
  let base = pipeline.extract_mesh(0.0, Mat4::IDENTITY);

  let offset = Vec3::new(10.0, -3.0, 0.5);
  let moved = pipeline.extract_mesh(0.0, Mat4::from_translation(offset));

  assert_eq!(base.positions.len(), moved.positions.len());
  for (a, b) in base.positions.iter().zip(&moved.positions) {
    let delta = Vec3::from_array(*b) - Vec3::from_array(*a);
    assert!((delta - offset).length() < 1e-4);
  }
  for (a, b) in base.normals.iter().zip(&moved.normals) {
    assert!((Vec3::from_array(*a) - Vec3::from_array(*b)).length() < 1e-5);
  }
}

#[test]
fn test_scale_preserves_orientation() {
  let (field, config) = small_sphere();
  let mut pipeline = sphere_pipeline(field, config);
  let base = pipeline.extract_mesh(0.0, Mat4::IDENTITY).signed_volume();
  let scaled = pipeline
    .extract_mesh(0.0, Mat4::from_scale(Vec3::splat(2.0)))
    .signed_volume();
  assert!((scaled - 8.0 * base).abs() / (8.0 * base) < 1e-3);
}

#[test]
fn test_mirror_keeps_faces_outward() {
  let (field, config) = small_sphere();
  let mut pipeline = sphere_pipeline(field, config);
  let base = pipeline.extract_mesh(0.0, Mat4::IDENTITY);
  let mirrored = pipeline.extract_mesh(0.0, Mat4::from_scale(Vec3::new(-1.0, 1.0, 1.0)));

  assert_eq!(base.triangle_count(), mirrored.triangle_count());
  let (base_vol, mirrored_vol) = (base.signed_volume(), mirrored.signed_volume());
  assert!(mirrored_vol > 0.0, "mirrored volume {mirrored_vol}");
  assert!((mirrored_vol - base_vol).abs() / base_vol < 1e-3);

  // Face winding agrees with the inverse-transpose vertex normals
  for tri in mirrored.triangles() {
    let face = tri.face_normal();
    let vertex: Vec3 = tri.normals.iter().map(|n| Vec3::from_array(*n)).sum();
    assert!(face.dot(vertex) > 0.0);
  }
}

#[test]
fn test_cell_size_and_origin() {
  let field = SphereField::new(Vec3::new(-2.0, 1.0, 1.0), 1.25);
  let config = ExtractionConfig::new().with_grid(
    GridParams::cubic(8)
      .with_cell_size(0.5)
      .with_origin(Vec3::new(-4.0, -1.0, -1.0)),
  );
  let mut pipeline = sphere_pipeline(field, config);
  let mesh = pipeline.extract_mesh(0.0, Mat4::IDENTITY);

  assert!(!mesh.is_empty());
  assert!(is_closed(&mesh));
  assert!(mesh.bounds.min[0] > -3.5 && mesh.bounds.max[0] < -0.5);
}

// =============================================================================
// Epoch lifecycle
// =============================================================================

#[test]
fn test_epoch_visits_every_layer_in_order() {
  let (field, config) = large_sphere();
  let mut pipeline = sphere_pipeline(field, config.with_steps(4));
  let mut sink = RecordingSink::default();
  let report = pipeline.run_epoch(0.0, Mat4::IDENTITY, &mut sink);

  assert_eq!(report.layers, 4);
  let ranges: Vec<_> = sink.layers.iter().map(|l| (l.layer, l.z_range)).collect();
  assert_eq!(
    ranges,
    vec![(0, (0, 4)), (1, (4, 8)), (2, (8, 12)), (3, (12, 16))]
  );
  assert!(sink.layers.iter().all(|l| l.layer_count == 4));
  assert_eq!(pipeline.state(), PipelineState::Idle);
  assert_eq!(pipeline.epoch(), 1);
}

#[test]
fn test_repeated_epochs_are_identical() {
  let (field, config) = large_sphere();
  let mut pipeline = sphere_pipeline(field, config.with_steps(3));

  let first = mesh_keys(&pipeline.extract_mesh(0.0, Mat4::IDENTITY));
  let second = mesh_keys(&pipeline.extract_mesh(0.0, Mat4::IDENTITY));
  assert_eq!(first.len(), 1160);
  assert_eq!(first, second);
  assert_eq!(pipeline.epoch(), 2);
}

#[test]
fn test_reset_clears_counters() {
  let (field, config) = small_sphere();
  let mut pipeline = sphere_pipeline(field, config.with_classify_mode(ClassifyMode::Compacted));
  pipeline.run_epoch(0.0, Mat4::IDENTITY, &mut NullSink);
  assert!(pipeline.triangle_counter() > 0);
  assert!(!pipeline.compacted_cells().is_empty());

  pipeline.reset();
  assert_eq!(pipeline.triangle_counter(), 0);
  assert!(pipeline.compacted_cells().is_empty());
  assert_eq!(pipeline.indirect_args(), &IndirectArgsBuffer::RESET);
}

#[test]
fn test_destroy_returns_field() {
  let (field, config) = small_sphere();
  let pipeline = sphere_pipeline(field, config);
  assert_eq!(pipeline.destroy(), field);
}

// =============================================================================
// Draw strategies
// =============================================================================

#[test]
fn test_readback_issues_direct_draws() {
  let (field, config) = small_sphere();
  let mut pipeline = sphere_pipeline(field, config.with_draw_strategy(DrawStrategy::ReadBack));
  let mut sink = RecordingSink::default();
  let report = pipeline.run_epoch(0.0, Mat4::IDENTITY, &mut sink);

  assert_eq!(report.strategy, DrawStrategy::ReadBack);
  assert!(sink.layers.iter().all(|l| !l.indirect));
  let vertices: u32 = sink.layers.iter().map(|l| l.vertex_count).sum();
  assert_eq!(vertices, 3 * report.triangle_count);
}

#[test]
fn test_indirect_args_match_counter() {
  let (field, config) = large_sphere();
  let config = config
    .with_steps(2)
    .with_draw_strategy(DrawStrategy::Indirect);
  let mut pipeline = sphere_pipeline(field, config);
  let mut sink = RecordingSink::default();
  let report = pipeline.run_epoch(0.0, Mat4::IDENTITY, &mut sink);

  assert_eq!(pipeline.strategy(), DrawStrategy::Indirect);
  assert!(sink.layers.iter().all(|l| l.indirect));
  for layer in &sink.layers {
    assert_eq!(layer.vertex_count, 3 * layer.real_triangles().count() as u32);
  }

  let last = sink.layers.last().expect("two layers");
  let args = pipeline.indirect_args();
  assert_eq!(args.vertex_count, last.vertex_count);
  assert_eq!(args.instance_count, 1);
  assert_eq!(args.start_vertex, 0);
  assert_eq!(args.start_instance, 0);
  assert_eq!(report.triangle_count, 1160);
}

#[test]
fn test_readback_leaves_args_untouched() {
  let (field, config) = small_sphere();
  let mut pipeline = sphere_pipeline(field, config.with_draw_strategy(DrawStrategy::ReadBack));
  pipeline.run_epoch(0.0, Mat4::IDENTITY, &mut NullSink);
  assert_eq!(pipeline.indirect_args(), &IndirectArgsBuffer::RESET);
}

#[test]
fn test_indirect_fixed_slots_cover_layer() {
  let (field, config) = large_sphere();
  let config = config
    .with_steps(4)
    .with_draw_strategy(DrawStrategy::Indirect)
    .with_classify_mode(ClassifyMode::DenseFixed);
  let mut pipeline = sphere_pipeline(field, config);
  let mut sink = RecordingSink::default();
  let report = pipeline.run_epoch(0.0, Mat4::IDENTITY, &mut sink);

  for layer in &sink.layers {
    assert!(layer.indirect);
    let cells = 16 * 16 * (layer.z_range.1 - layer.z_range.0);
    assert_eq!(layer.vertex_count, 3 * 5 * cells);
  }
  assert_eq!(pipeline.indirect_args().vertex_count, 3 * 5 * 16 * 16 * 4);
  assert_eq!(report.triangle_count, 1160);
}

#[test]
fn test_indirect_falls_back_when_unsupported() {
  let (field, config) = small_sphere();
  let config = config
    .with_draw_strategy(DrawStrategy::Indirect)
    .with_supports_indirect(false);
  let mut pipeline = sphere_pipeline(field, config);
  assert_eq!(pipeline.strategy(), DrawStrategy::ReadBack);

  let mut sink = RecordingSink::default();
  let report = pipeline.run_epoch(0.0, Mat4::IDENTITY, &mut sink);
  assert_eq!(report.strategy, DrawStrategy::ReadBack);
  assert_eq!(report.triangle_count, 248);
  assert!(sink.layers.iter().all(|l| !l.indirect));
}

#[test]
fn test_strategies_draw_same_geometry() {
  let (field, config) = large_sphere();
  let mut direct = sphere_pipeline(field, config.clone().with_steps(2));
  let mut indirect = sphere_pipeline(
    field,
    config.with_steps(2).with_draw_strategy(DrawStrategy::Indirect),
  );

  let a = mesh_keys(&direct.extract_mesh(0.0, Mat4::IDENTITY));
  let b = mesh_keys(&indirect.extract_mesh(0.0, Mat4::IDENTITY));
  assert_eq!(a, b);
}

// =============================================================================
// Capacity
// =============================================================================

#[test]
fn test_steps_raised_to_fit_capacity() {
  let (field, config) = large_sphere();
  let reference =
    mesh_keys(&sphere_pipeline(field, config.clone()).extract_mesh(0.0, Mat4::IDENTITY));

  // Two Z slices of worst-case output
  let limited = config.with_capacity_triangles(2 * 5 * 16 * 16);
  let mut pipeline = sphere_pipeline(field, limited);
  assert_eq!(pipeline.layer_plan().len(), 8);

  let report = pipeline.run_epoch(0.0, Mat4::IDENTITY, &mut NullSink);
  assert_eq!(report.layers, 8);
  assert_eq!(report.dropped, 0);
  assert_eq!(
    mesh_keys(&pipeline.extract_mesh(0.0, Mat4::IDENTITY)),
    reference
  );
}

#[test]
fn test_corner_lerp_normals_are_unit() {
  let (field, config) = small_sphere();
  let mut pipeline = sphere_pipeline(field, config.with_normal_mode(NormalMode::CornerLerp));
  let mesh = pipeline.extract_mesh(0.0, Mat4::IDENTITY);

  assert_eq!(mesh.triangle_count(), 248);
  for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
    let normal = Vec3::from_array(*n);
    assert!((normal.length() - 1.0).abs() < 1e-4);
    assert!(normal.dot(Vec3::from_array(*p) - field.center) > 0.0);
  }
}

#[cfg(feature = "metrics")]
#[test]
fn test_metrics_record_epochs() {
  let (field, config) = small_sphere();
  let mut pipeline = sphere_pipeline(field, config);
  pipeline.run_epoch(0.0, Mat4::IDENTITY, &mut NullSink);
  pipeline.run_epoch(0.5, Mat4::IDENTITY, &mut NullSink);

  let metrics = pipeline.metrics();
  assert_eq!(metrics.total_epochs, 2);
  assert_eq!(metrics.total_triangles, 2 * 248);
  assert_eq!(metrics.avg_triangles(), 248.0);
}
