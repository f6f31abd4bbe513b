//! Density field evaluation.
//!
//! A density field maps a field-space point to a scalar. Corners whose
//! density is strictly above the threshold count as solid; the isosurface is
//! where the field crosses the threshold.
//!
//! ```text
//!   density(p, ctx) ──► f32          classify + interpolate
//!   gradient(p, ctx) ─► Vec3         normals (points into the solid)
//! ```
//!
//! Fields are evaluated millions of times per epoch from many threads, and
//! classification and triangulation must agree on every corner value without
//! sharing storage. Implementations must therefore be pure functions of
//! `(p, ctx)`.

mod noise;
mod sdf;

use std::sync::Arc;

use glam::Vec3;
pub use noise::{fbm_noise_3d, perlin_noise_3d, NoiseField};
pub use sdf::{ConstantField, FnField, PlaneField, SphereField};

use crate::constants::GRADIENT_EPSILON;

/// Per-epoch inputs shared by every evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FieldContext {
  /// Animation time supplied by the host.
  pub time: f32,

  /// Upper bound on summed noise octaves.
  pub octave_count: u32,
}

impl FieldContext {
  pub fn new(time: f32, octave_count: u32) -> Self {
    Self { time, octave_count }
  }
}

/// Scalar field sampled by the extraction pipeline.
pub trait DensityField: Send + Sync {
  /// Density at field-space point `p`.
  fn density(&self, p: Vec3, ctx: &FieldContext) -> f32;

  /// Gradient at `p`. Defaults to central differences.
  fn gradient(&self, p: Vec3, ctx: &FieldContext) -> Vec3 {
    central_difference(|q| self.density(q, ctx), p)
  }
}

/// Central-difference gradient with [`GRADIENT_EPSILON`] step.
#[inline]
pub fn central_difference(f: impl Fn(Vec3) -> f32, p: Vec3) -> Vec3 {
  let e = GRADIENT_EPSILON;
  let inv = 0.5 / e;
  Vec3::new(
    f(p + Vec3::X * e) - f(p - Vec3::X * e),
    f(p + Vec3::Y * e) - f(p - Vec3::Y * e),
    f(p + Vec3::Z * e) - f(p - Vec3::Z * e),
  ) * inv
}

impl<T: DensityField + ?Sized> DensityField for &T {
  #[inline]
  fn density(&self, p: Vec3, ctx: &FieldContext) -> f32 {
    (**self).density(p, ctx)
  }

  #[inline]
  fn gradient(&self, p: Vec3, ctx: &FieldContext) -> Vec3 {
    (**self).gradient(p, ctx)
  }
}

impl<T: DensityField + ?Sized> DensityField for Box<T> {
  #[inline]
  fn density(&self, p: Vec3, ctx: &FieldContext) -> f32 {
    (**self).density(p, ctx)
  }

  #[inline]
  fn gradient(&self, p: Vec3, ctx: &FieldContext) -> Vec3 {
    (**self).gradient(p, ctx)
  }
}

impl<T: DensityField + ?Sized> DensityField for Arc<T> {
  #[inline]
  fn density(&self, p: Vec3, ctx: &FieldContext) -> f32 {
    (**self).density(p, ctx)
  }

  #[inline]
  fn gradient(&self, p: Vec3, ctx: &FieldContext) -> Vec3 {
    (**self).gradient(p, ctx)
  }
}
