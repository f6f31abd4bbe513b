//! Layer decomposition along Z.
//!
//! ```text
//! FACTOR_z = 16, steps = 4
//!
//!   z: 0   4   8   12  16
//!      ├───┼───┼───┼───┤
//!      │ 0 │ 1 │ 2 │ 3 │   each layer: contiguous cell slices,
//!      └───┴───┴───┴───┘   worst case 5 × FACTOR_x × FACTOR_y × depth
//! ```
//!
//! The requested step count is raised to the minimum that keeps the deepest
//! layer within capacity, and capped at one slice per layer.

use std::ops::Range;

use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::config::ExtractionConfig;
use crate::constants::MAX_TRIANGLES_PER_CELL;

/// Z ranges of every layer, in dispatch order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerPlan {
  layers: SmallVec<[Range<u32>; 8]>,
  slice_cells: u32,
}

impl LayerPlan {
  /// Plan layers for `config`. Assumes the config already validated.
  pub fn new(config: &ExtractionConfig) -> Self {
    let depth = config.grid.resolution.z;
    let required = config.min_steps();

    let mut steps = config.steps.max(1);
    if steps < required {
      warn!(
        requested = steps,
        required,
        capacity = config.effective_capacity(),
        "raising layer count to fit output capacity"
      );
      steps = required;
    }
    if steps > depth {
      debug!(steps, depth, "capping layer count at one slice per layer");
      steps = depth.max(1);
    }

    let layers = (0..steps as u64)
      .map(|l| {
        let start = (l * depth as u64 / steps as u64) as u32;
        let end = ((l + 1) * depth as u64 / steps as u64) as u32;
        start..end
      })
      .collect();

    Self {
      layers,
      slice_cells: config.grid.slice_cells(),
    }
  }

  pub fn len(&self) -> usize {
    self.layers.len()
  }

  pub fn is_empty(&self) -> bool {
    self.layers.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = Range<u32>> + '_ {
    self.layers.iter().cloned()
  }

  pub fn layer(&self, index: usize) -> Option<Range<u32>> {
    self.layers.get(index).cloned()
  }

  /// Slices in the deepest layer.
  pub fn max_depth(&self) -> u32 {
    self.layers.iter().map(|r| r.end - r.start).max().unwrap_or(0)
  }

  /// Cells in the largest layer.
  pub fn max_layer_cells(&self) -> u32 {
    self.max_depth() * self.slice_cells
  }

  /// Triangle slots needed so no layer can overflow.
  pub fn buffer_capacity(&self) -> u32 {
    self.max_layer_cells() * MAX_TRIANGLES_PER_CELL as u32
  }
}

#[cfg(test)]
#[path = "layers_test.rs"]
mod layers_test;
