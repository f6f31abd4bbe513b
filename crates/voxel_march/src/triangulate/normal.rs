//! Surface normal from the field gradient.
//!
//! The gradient points towards increasing density, i.e. into the solid. The
//! outward normal is its negation.

use glam::Vec3A;

/// Outward unit normal for a field gradient. Falls back to +Y when the
/// gradient vanishes.
#[inline]
pub fn from_gradient(gradient: Vec3A) -> Vec3A {
  let len_sq = gradient.length_squared();

  if len_sq < 1e-12 || !len_sq.is_finite() {
    return Vec3A::Y;
  }

  -gradient * len_sq.sqrt().recip()
}

/// Gradient interpolated between two corners with the edge factor.
#[inline]
pub fn lerp_gradient(ga: Vec3A, gb: Vec3A, s: f32) -> Vec3A {
  ga + (gb - ga) * s
}

#[cfg(test)]
#[path = "normal_test.rs"]
mod normal_test;
