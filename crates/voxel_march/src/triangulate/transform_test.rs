use glam::{Quat, Vec3};

use super::*;

#[test]
fn test_identity() {
  let t = WorldTransform::default();
  assert!(t.is_identity());
  assert_eq!(t.point(Vec3A::new(1.0, 2.0, 3.0)), Vec3A::new(1.0, 2.0, 3.0));
  assert_eq!(t.normal(Vec3A::Z), Vec3A::Z);
}

#[test]
fn test_translation_moves_points_not_normals() {
  let t = WorldTransform::new(Mat4::from_translation(Vec3::new(10.0, 0.0, -5.0)));
  assert_eq!(t.point(Vec3A::ONE), Vec3A::new(11.0, 1.0, -4.0));
  assert_eq!(t.normal(Vec3A::X), Vec3A::X);
}

#[test]
fn test_non_uniform_scale_uses_inverse_transpose() {
  // Plane x + y = 0 with normal (1,1,0)/√2. Scaling x by 2 gives the plane
  // x/2 + y = 0 whose normal is (1,2,0)/√5.
  let t = WorldTransform::new(Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0)));
  let n = t.normal(Vec3A::new(1.0, 1.0, 0.0).normalize());
  let expected = Vec3A::new(1.0, 2.0, 0.0).normalize();
  assert!((n - expected).length() < 1e-5, "got {:?}", n);
}

#[test]
fn test_rotation_rotates_normals() {
  let rot = Quat::from_rotation_z(std::f32::consts::FRAC_PI_2);
  let t = WorldTransform::from(Mat4::from_quat(rot));
  let n = t.normal(Vec3A::X);
  assert!((n - Vec3A::Y).length() < 1e-5, "got {:?}", n);
}

#[test]
fn test_singular_transform_keeps_normals() {
  let t = WorldTransform::new(Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0)));
  assert_eq!(t.normal_matrix, Mat3A::IDENTITY);
  assert_eq!(t.point(Vec3A::new(1.0, 5.0, 1.0)).y, 0.0);
}

#[test]
fn test_mirror_flips_winding() {
  assert!(!WorldTransform::IDENTITY.flips_winding);
  assert!(!WorldTransform::new(Mat4::from_scale(Vec3::splat(3.0))).flips_winding);
  assert!(WorldTransform::new(Mat4::from_scale(Vec3::new(1.0, -1.0, 1.0))).flips_winding);
  // Two mirrors make a rotation
  assert!(!WorldTransform::new(Mat4::from_scale(Vec3::new(-1.0, -1.0, 1.0))).flips_winding);
}
