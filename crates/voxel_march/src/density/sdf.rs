//! Analytic fields for tests, debugging and simple scenes.
//!
//! These are deterministic and easy to verify visually. Sign convention:
//! positive inside the solid, negative outside.

use glam::Vec3;

use super::{DensityField, FieldContext};

/// Solid ball: `radius - |p - center|`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereField {
  pub center: Vec3,
  pub radius: f32,
}

impl SphereField {
  pub fn new(center: Vec3, radius: f32) -> Self {
    Self { center, radius }
  }

  /// Sphere at origin with given radius.
  pub fn at_origin(radius: f32) -> Self {
    Self::new(Vec3::ZERO, radius)
  }
}

impl Default for SphereField {
  fn default() -> Self {
    Self::at_origin(1.0)
  }
}

impl DensityField for SphereField {
  #[inline]
  fn density(&self, p: Vec3, _ctx: &FieldContext) -> f32 {
    self.radius - (p - self.center).length()
  }

  #[inline]
  fn gradient(&self, p: Vec3, _ctx: &FieldContext) -> Vec3 {
    // Undefined at the center; zero lets the normal fall back to +Y
    -(p - self.center).normalize_or_zero()
  }
}

/// Half-space, solid on the side opposite `normal`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneField {
  /// Any point on the plane.
  pub point: Vec3,
  /// Unit normal pointing out of the solid.
  pub normal: Vec3,
}

impl PlaneField {
  /// Plane through `point`. `normal` is normalized; a zero vector means +Y.
  pub fn new(point: Vec3, normal: Vec3) -> Self {
    Self {
      point,
      normal: normal.try_normalize().unwrap_or(Vec3::Y),
    }
  }

  /// Ground plane: solid below `y = height`.
  pub fn horizontal(height: f32) -> Self {
    Self::new(Vec3::new(0.0, height, 0.0), Vec3::Y)
  }
}

impl DensityField for PlaneField {
  #[inline]
  fn density(&self, p: Vec3, _ctx: &FieldContext) -> f32 {
    -(p - self.point).dot(self.normal)
  }

  #[inline]
  fn gradient(&self, _p: Vec3, _ctx: &FieldContext) -> Vec3 {
    -self.normal
  }
}

/// Same value everywhere. Produces no surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConstantField(pub f32);

impl DensityField for ConstantField {
  #[inline]
  fn density(&self, _p: Vec3, _ctx: &FieldContext) -> f32 {
    self.0
  }

  #[inline]
  fn gradient(&self, _p: Vec3, _ctx: &FieldContext) -> Vec3 {
    Vec3::ZERO
  }
}

/// Adapter for closures `Fn(point, time) -> density`.
///
/// ```ignore
/// let field = FnField::new(|p: Vec3, t: f32| 3.0 - p.length() + (t * 2.0).sin());
/// ```
#[derive(Clone, Copy)]
pub struct FnField<F>(pub F);

impl<F> FnField<F>
where
  F: Fn(Vec3, f32) -> f32 + Send + Sync,
{
  pub fn new(f: F) -> Self {
    Self(f)
  }
}

impl<F> DensityField for FnField<F>
where
  F: Fn(Vec3, f32) -> f32 + Send + Sync,
{
  #[inline]
  fn density(&self, p: Vec3, ctx: &FieldContext) -> f32 {
    (self.0)(p, ctx.time)
  }
}

impl<F> std::fmt::Debug for FnField<F> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str("FnField")
  }
}

#[cfg(test)]
#[path = "sdf_test.rs"]
mod sdf_test;
