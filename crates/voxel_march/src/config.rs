//! Extraction configuration.
//!
//! ```text
//! ExtractionConfig
//! ├── grid: GridParams          resolution, cell size, origin
//! ├── threshold / octave_count  isosurface level, noise detail
//! ├── steps / capacity          layer streaming
//! ├── draw_strategy             ReadBack | Indirect (+ capability flag)
//! ├── classify_mode             Dense | DenseFixed | Compacted
//! ├── normal_mode               Gradient | CornerLerp
//! └── work_group                3-D cell groups, 1-D compacted groups
//! ```
//!
//! Everything is validated once, before any buffer is allocated.

use glam::{UVec3, Vec3};

use crate::constants::{MAX_GRID_CELLS, MAX_TRIANGLES_PER_CELL};
use crate::error::ConfigError;
pub use crate::types::NormalMode;

/// Default isotropic grid resolution.
pub const DEFAULT_FACTOR: u32 = 16;

/// Regular grid the field is sampled on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridParams {
  /// Cells per axis.
  pub resolution: UVec3,

  /// Edge length of one cell in field space.
  pub cell_size: f32,

  /// Field-space position of grid corner `(0, 0, 0)`.
  pub origin: Vec3,
}

impl GridParams {
  /// Isotropic grid of `factor³` unit cells at the origin.
  pub fn cubic(factor: u32) -> Self {
    Self {
      resolution: UVec3::splat(factor),
      ..Self::default()
    }
  }

  pub fn with_resolution(mut self, resolution: UVec3) -> Self {
    self.resolution = resolution;
    self
  }

  pub fn with_cell_size(mut self, cell_size: f32) -> Self {
    self.cell_size = cell_size;
    self
  }

  pub fn with_origin(mut self, origin: Vec3) -> Self {
    self.origin = origin;
    self
  }

  /// Total number of cells, without overflow for any resolution.
  #[inline]
  pub fn total_cells(&self) -> u64 {
    self.resolution.x as u64 * self.resolution.y as u64 * self.resolution.z as u64
  }

  /// Total number of cells. Fits in `u32` once the config is validated.
  #[inline]
  pub fn cell_count(&self) -> u32 {
    self.resolution.x * self.resolution.y * self.resolution.z
  }

  /// Cells in one Z slice.
  #[inline]
  pub fn slice_cells(&self) -> u32 {
    self.resolution.x * self.resolution.y
  }

  /// Field-space position of grid vertex `corner`.
  #[inline(always)]
  pub fn corner_position(&self, corner: UVec3) -> Vec3 {
    self.origin + corner.as_vec3() * self.cell_size
  }

  /// Field-space extent covered by the grid.
  pub fn extent(&self) -> (Vec3, Vec3) {
    (self.origin, self.corner_position(self.resolution))
  }
}

impl Default for GridParams {
  fn default() -> Self {
    Self {
      resolution: UVec3::splat(DEFAULT_FACTOR),
      cell_size: 1.0,
      origin: Vec3::ZERO,
    }
  }
}

/// How each layer's output is handed to the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DrawStrategy {
  /// Read the triangle counter on the host and issue a sized draw.
  #[default]
  ReadBack,

  /// Copy the counter into an indirect-args buffer; the host never reads it.
  Indirect,
}

/// Cell classification scheme.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClassifyMode {
  /// Classify and triangulate every cell in one pass, appending through the
  /// triangle counter.
  #[default]
  Dense,

  /// Every cell owns five fixed output slots; unused slots stay degenerate.
  DenseFixed,

  /// Classify all cells into a compacted list, then triangulate only the
  /// listed cells.
  Compacted,
}

/// Work group extents used to size dispatches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkGroupSize {
  /// Group extent for passes over the 3-D cell grid.
  pub cells: [u32; 3],

  /// Group extent for passes over the compacted list.
  pub linear: u32,
}

impl Default for WorkGroupSize {
  fn default() -> Self {
    Self {
      cells: [8, 8, 8],
      linear: 64,
    }
  }
}

/// Complete extraction configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractionConfig {
  pub grid: GridParams,

  /// Isosurface level. Corners strictly above it are solid.
  pub threshold: f32,

  /// Upper bound on summed noise octaves.
  pub octave_count: u32,

  /// Requested number of Z layers. Raised if capacity demands more.
  pub steps: u32,

  /// Output buffer capacity in triangles. `None` sizes for the whole grid.
  pub capacity_triangles: Option<u32>,

  /// Host capability flag for indirect draws.
  pub supports_indirect: bool,

  pub draw_strategy: DrawStrategy,
  pub classify_mode: ClassifyMode,
  pub normal_mode: NormalMode,
  pub work_group: WorkGroupSize,
}

impl Default for ExtractionConfig {
  fn default() -> Self {
    Self {
      grid: GridParams::default(),
      threshold: 0.0,
      octave_count: 4,
      steps: 1,
      capacity_triangles: None,
      supports_indirect: true,
      draw_strategy: DrawStrategy::default(),
      classify_mode: ClassifyMode::default(),
      normal_mode: NormalMode::default(),
      work_group: WorkGroupSize::default(),
    }
  }
}

impl ExtractionConfig {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_grid(mut self, grid: GridParams) -> Self {
    self.grid = grid;
    self
  }

  /// Shorthand for an isotropic grid resolution.
  pub fn with_factor(mut self, factor: u32) -> Self {
    self.grid.resolution = UVec3::splat(factor);
    self
  }

  pub fn with_threshold(mut self, threshold: f32) -> Self {
    self.threshold = threshold;
    self
  }

  pub fn with_octave_count(mut self, octave_count: u32) -> Self {
    self.octave_count = octave_count;
    self
  }

  pub fn with_steps(mut self, steps: u32) -> Self {
    self.steps = steps;
    self
  }

  pub fn with_capacity_triangles(mut self, capacity: u32) -> Self {
    self.capacity_triangles = Some(capacity);
    self
  }

  pub fn with_supports_indirect(mut self, supported: bool) -> Self {
    self.supports_indirect = supported;
    self
  }

  pub fn with_draw_strategy(mut self, strategy: DrawStrategy) -> Self {
    self.draw_strategy = strategy;
    self
  }

  pub fn with_classify_mode(mut self, mode: ClassifyMode) -> Self {
    self.classify_mode = mode;
    self
  }

  pub fn with_normal_mode(mut self, mode: NormalMode) -> Self {
    self.normal_mode = mode;
    self
  }

  pub fn with_work_group(mut self, work_group: WorkGroupSize) -> Self {
    self.work_group = work_group;
    self
  }

  /// Worst-case triangle output of the whole grid.
  pub fn worst_case_triangles(&self) -> u64 {
    self.grid.total_cells() * MAX_TRIANGLES_PER_CELL as u64
  }

  /// Capacity after applying the whole-grid default.
  pub fn effective_capacity(&self) -> u32 {
    self
      .capacity_triangles
      .unwrap_or_else(|| self.worst_case_triangles().min(u32::MAX as u64) as u32)
  }

  /// Minimum layer count whose largest layer fits the capacity.
  pub fn min_steps(&self) -> u32 {
    let r = self.grid.resolution;
    let per_slice = r.x as u64 * r.y as u64 * MAX_TRIANGLES_PER_CELL as u64;
    if per_slice == 0 {
      return 1;
    }
    let slices_per_layer = (self.effective_capacity() as u64 / per_slice).max(1);
    let z = self.grid.resolution.z as u64;
    z.div_ceil(slices_per_layer).max(1) as u32
  }

  /// Fail fast on anything a dispatch could not recover from.
  pub fn validate(&self) -> Result<(), ConfigError> {
    let r = self.grid.resolution;
    if r.x == 0 || r.y == 0 || r.z == 0 {
      return Err(ConfigError::ZeroResolution {
        x: r.x,
        y: r.y,
        z: r.z,
      });
    }
    let total = self.grid.total_cells();
    if total > MAX_GRID_CELLS {
      return Err(ConfigError::GridTooLarge {
        cells: total,
        max: MAX_GRID_CELLS,
      });
    }
    if self.steps == 0 {
      return Err(ConfigError::ZeroSteps);
    }
    if !self.threshold.is_finite() {
      return Err(ConfigError::NonFiniteThreshold(self.threshold));
    }
    if !self.grid.cell_size.is_finite() || self.grid.cell_size <= 0.0 {
      return Err(ConfigError::InvalidCellSize(self.grid.cell_size));
    }
    let cells = self.work_group.cells;
    if cells.contains(&0) || self.work_group.linear == 0 {
      return Err(ConfigError::ZeroWorkGroup {
        cells,
        linear: self.work_group.linear,
      });
    }

    let slice_cells = self.grid.slice_cells();
    let required = slice_cells as u64 * MAX_TRIANGLES_PER_CELL as u64;
    let capacity = self.effective_capacity();
    if (capacity as u64) < required {
      return Err(ConfigError::CapacityBelowSlice {
        capacity,
        slice_cells,
        required: required.min(u32::MAX as u64) as u32,
      });
    }

    Ok(())
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
