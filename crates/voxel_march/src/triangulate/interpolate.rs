//! Edge crossing interpolation.

use glam::Vec3A;

use crate::constants::DEGENERATE_EPSILON;

/// Interpolation factor of the threshold crossing between densities `da`
/// and `db`.
///
/// A flat edge (`|db - da|` below [`DEGENERATE_EPSILON`]) places the vertex
/// at the midpoint. The result is always clamped to `[0, 1]` so the vertex
/// stays on its edge.
#[inline(always)]
pub fn edge_factor(da: f32, db: f32, threshold: f32) -> f32 {
  let den = db - da;
  if den.abs() < DEGENERATE_EPSILON {
    return 0.5;
  }
  ((threshold - da) / den).clamp(0.0, 1.0)
}

/// Position of the crossing on segment `pa → pb`.
#[inline(always)]
pub fn lerp_position(pa: Vec3A, pb: Vec3A, s: f32) -> Vec3A {
  pa + (pb - pa) * s
}

#[cfg(test)]
#[path = "interpolate_test.rs"]
mod interpolate_test;
