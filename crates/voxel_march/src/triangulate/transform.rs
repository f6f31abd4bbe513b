//! Field space to world space.

use glam::{Mat3A, Mat4, Vec3A};

/// Host-supplied world transform with its precomputed normal matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldTransform {
  pub matrix: Mat4,
  /// Inverse-transpose of the linear part.
  pub normal_matrix: Mat3A,
  /// Negative determinant: a mirror, so triangle winding must be swapped.
  pub flips_winding: bool,
}

impl WorldTransform {
  pub const IDENTITY: WorldTransform = WorldTransform {
    matrix: Mat4::IDENTITY,
    normal_matrix: Mat3A::IDENTITY,
    flips_winding: false,
  };

  pub fn new(matrix: Mat4) -> Self {
    let linear = Mat3A::from_mat4(matrix);
    let det = linear.determinant();
    // A singular transform flattens the mesh; keep normals untouched
    let normal_matrix = if det.abs() > f32::EPSILON && det.is_finite() {
      linear.inverse().transpose()
    } else {
      Mat3A::IDENTITY
    };
    Self {
      matrix,
      normal_matrix,
      flips_winding: det < 0.0,
    }
  }

  #[inline(always)]
  pub fn is_identity(&self) -> bool {
    self.matrix == Mat4::IDENTITY
  }

  #[inline]
  pub fn point(&self, p: Vec3A) -> Vec3A {
    self.matrix.transform_point3a(p)
  }

  /// Transform a unit normal, renormalizing. Falls back to +Y.
  #[inline]
  pub fn normal(&self, n: Vec3A) -> Vec3A {
    (self.normal_matrix * n).try_normalize().unwrap_or(Vec3A::Y)
  }
}

impl Default for WorldTransform {
  fn default() -> Self {
    Self::IDENTITY
  }
}

impl From<Mat4> for WorldTransform {
  fn from(matrix: Mat4) -> Self {
    Self::new(matrix)
  }
}

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;
