//! Cube topology and pipeline-wide constants.
//!
//! Corner and edge numbering follow the canonical Marching Cubes enumeration
//! so that the case table in [`crate::case_table`] can be used verbatim.
//!
//! # Cube Topology
//!
//! ```text
//!         7──────6          Corners:
//!        /│     /│            0=(0,0,0)  1=(1,0,0)  2=(1,1,0)  3=(0,1,0)
//!       4─┼────5 │            4=(0,0,1)  5=(1,0,1)  6=(1,1,1)  7=(0,1,1)
//!       │ 3────┼─2
//!       │/     │/           +Y
//!       0──────1             │  +Z
//!                            │ /
//!                            └───+X
//! ```
//!
//! # Edge Layout
//!
//! ```text
//! Edge  Corners  Axis   Edge  Corners  Axis   Edge  Corners  Axis
//! ────  ───────  ────   ────  ───────  ────   ────  ───────  ────
//!   0    0 → 1    X       4    4 → 5    X       8    0 → 4    Z
//!   1    1 → 2    Y       5    5 → 6    Y       9    1 → 5    Z
//!   2    3 → 2    X       6    7 → 6    X      10    2 → 6    Z
//!   3    0 → 3    Y       7    4 → 7    Y      11    3 → 7    Z
//! ```
//!
//! Every edge is directed from its lower-coordinate corner to its
//! higher-coordinate corner. Adjacent cells therefore interpolate a shared
//! edge from the same corner sample, producing bit-identical vertices without
//! any welding step.
//!
//! # Grid Indexing
//!
//! ```text
//! cell index = i + j * FACTOR_x + k * FACTOR_x * FACTOR_y
//! ```
//!
//! X is the minor axis. Layers are contiguous slabs along Z, so a layer is a
//! contiguous range of cell indices.

use glam::UVec3;

/// Number of corners of a cube cell.
pub const CORNER_COUNT: usize = 8;

/// Number of edges of a cube cell.
pub const EDGE_COUNT: usize = 12;

/// Maximum triangles any Marching Cubes case emits.
pub const MAX_TRIANGLES_PER_CELL: usize = 5;

/// Largest grid whose worst-case vertex count still fits a `u32` draw.
pub const MAX_GRID_CELLS: u64 = u32::MAX as u64 / (MAX_TRIANGLES_PER_CELL as u64 * 3);

/// Floats stored per emitted triangle (3 positions + 3 normals).
pub const FLOATS_PER_TRIANGLE: usize = 18;

/// Step used for central-difference gradients.
pub const GRADIENT_EPSILON: f32 = 1e-3;

/// Density deltas below this are treated as a flat edge during interpolation.
pub const DEGENERATE_EPSILON: f32 = 1e-6;

/// Integer offsets of the 8 corners relative to the cell origin.
pub const CORNER_OFFSETS: [[u32; 3]; CORNER_COUNT] = [
  [0, 0, 0], // 0
  [1, 0, 0], // 1
  [1, 1, 0], // 2
  [0, 1, 0], // 3
  [0, 0, 1], // 4
  [1, 0, 1], // 5
  [1, 1, 1], // 6
  [0, 1, 1], // 7
];

/// Edge endpoint corner indices, directed from lower to higher coordinate.
pub const EDGE_CORNERS: [[u8; 2]; EDGE_COUNT] = [
  [0, 1], // Edge 0:  X axis at Y=0, Z=0
  [1, 2], // Edge 1:  Y axis at X=1, Z=0
  [3, 2], // Edge 2:  X axis at Y=1, Z=0
  [0, 3], // Edge 3:  Y axis at X=0, Z=0
  [4, 5], // Edge 4:  X axis at Y=0, Z=1
  [5, 6], // Edge 5:  Y axis at X=1, Z=1
  [7, 6], // Edge 6:  X axis at Y=1, Z=1
  [4, 7], // Edge 7:  Y axis at X=0, Z=1
  [0, 4], // Edge 8:  Z axis at X=0, Y=0
  [1, 5], // Edge 9:  Z axis at X=1, Y=0
  [2, 6], // Edge 10: Z axis at X=1, Y=1
  [3, 7], // Edge 11: Z axis at X=0, Y=1
];

/// Linear index of cell `(i, j, k)` in a grid of `resolution` cells.
#[inline(always)]
pub const fn cell_to_index(cell: UVec3, resolution: UVec3) -> u32 {
  cell.x + cell.y * resolution.x + cell.z * resolution.x * resolution.y
}

/// Inverse of [`cell_to_index`].
#[inline(always)]
pub const fn index_to_cell(index: u32, resolution: UVec3) -> UVec3 {
  let slice = resolution.x * resolution.y;
  let k = index / slice;
  let rem = index % slice;
  UVec3::new(rem % resolution.x, rem / resolution.x, k)
}

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
