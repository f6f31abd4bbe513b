use super::*;

fn unit_triangle() -> Triangle {
  Triangle {
    positions: [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
    normals: [[0.0, 0.0, 1.0]; 3],
  }
}

#[test]
fn test_aabb_encapsulate() {
  let mut aabb = MinMaxAABB::empty();
  aabb.encapsulate([1.0, 2.0, 3.0]);
  aabb.encapsulate([-1.0, -2.0, -3.0]);

  assert_eq!(aabb.min, [-1.0, -2.0, -3.0]);
  assert_eq!(aabb.max, [1.0, 2.0, 3.0]);
  assert!(aabb.is_valid());
  assert!(aabb.contains([0.0, 0.0, 0.0]));
  assert!(!aabb.contains([0.0, 2.5, 0.0]));
}

#[test]
fn test_aabb_merge_ignores_empty() {
  let mut aabb = MinMaxAABB::new([0.0; 3], [1.0; 3]);
  aabb.merge(&MinMaxAABB::empty());
  assert_eq!(aabb, MinMaxAABB::new([0.0; 3], [1.0; 3]));

  aabb.merge(&MinMaxAABB::new([-1.0; 3], [0.5; 3]));
  assert_eq!(aabb.min, [-1.0; 3]);
  assert_eq!(aabb.max, [1.0; 3]);
}

#[test]
fn test_degenerate_triangle() {
  assert!(Triangle::DEGENERATE.is_degenerate());
  assert_eq!(Triangle::default(), Triangle::DEGENERATE);
  assert!(!unit_triangle().is_degenerate());
}

#[test]
fn test_face_normal_follows_winding() {
  let n = unit_triangle().face_normal();
  assert!(n.z > 0.0, "CCW in XY plane should face +Z, got {:?}", n);
}

#[test]
fn test_mesh_output_push_and_clear() {
  let mut output = MeshOutput::new();
  output.push_triangle(&unit_triangle());
  output.push_triangle(&unit_triangle());

  assert_eq!(output.triangle_count(), 2);
  assert_eq!(output.indices, vec![0, 1, 2, 3, 4, 5]);
  assert_eq!(output.bounds.max, [1.0, 1.0, 0.0]);
  assert_eq!(output.triangles().next(), Some(unit_triangle()));

  output.clear();
  assert!(output.is_empty());
  assert_eq!(output.triangle_count(), 0);
  assert!(!output.bounds.is_valid());
}

#[test]
fn test_signed_volume_of_tetrahedron() {
  // Unit right tetrahedron, faces wound outward
  let o = [0.0, 0.0, 0.0];
  let x = [1.0, 0.0, 0.0];
  let y = [0.0, 1.0, 0.0];
  let z = [0.0, 0.0, 1.0];
  let faces = [[o, y, x], [o, x, z], [o, z, y], [x, y, z]];

  let mut output = MeshOutput::new();
  for positions in faces {
    output.push_triangle(&Triangle {
      positions,
      normals: [[0.0; 3]; 3],
    });
  }

  assert!((output.signed_volume() - 1.0 / 6.0).abs() < 1e-6);
}

#[test]
fn test_normal_mode_default() {
  assert_eq!(NormalMode::default(), NormalMode::Gradient);
}
