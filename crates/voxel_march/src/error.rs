//! Error types for voxel_march.
//!
//! Everything here is raised before any dispatch. Runtime conditions inside a
//! dispatch (degenerate edges, dropped appends) are recovered locally and
//! reported through `tracing` instead.

use thiserror::Error;

/// Invalid extraction configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
  /// A grid axis has no cells.
  #[error("grid resolution must be non-zero on every axis, got {x}x{y}x{z}")]
  ZeroResolution { x: u32, y: u32, z: u32 },

  /// Grid has more cells than 32-bit indices and draw counts can address.
  #[error("grid of {cells} cells exceeds the limit of {max}")]
  GridTooLarge { cells: u64, max: u64 },

  /// Layer count of zero.
  #[error("steps must be at least 1")]
  ZeroSteps,

  /// Threshold is NaN or infinite.
  #[error("threshold must be finite, got {0}")]
  NonFiniteThreshold(f32),

  /// Cell size is zero, negative, NaN or infinite.
  #[error("cell size must be finite and positive, got {0}")]
  InvalidCellSize(f32),

  /// A work group dimension is zero.
  #[error("work group size must be non-zero, got cells {cells:?} linear {linear}")]
  ZeroWorkGroup { cells: [u32; 3], linear: u32 },

  /// Output buffer cannot hold a single Z slice worth of worst-case output.
  #[error(
    "capacity of {capacity} triangles cannot hold one layer of {slice_cells} cells \
     (needs {required})"
  )]
  CapacityBelowSlice {
    capacity: u32,
    slice_cells: u32,
    required: u32,
  },

  /// Custom case table violates a structural invariant.
  #[error("invalid case table entry {case}: {reason}")]
  InvalidCaseTable { case: u8, reason: &'static str },
}

/// Errors raised while assembling a pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
  /// Builder finished without a density field.
  #[error("no density field was provided")]
  MissingDensityField,

  #[error(transparent)]
  Config(#[from] ConfigError),
}
