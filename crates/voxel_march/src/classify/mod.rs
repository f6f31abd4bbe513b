//! Cell classification.
//!
//! The case id is an 8-bit value where each bit says whether a corner of the
//! cell is solid (density strictly above the threshold):
//! - Bit 0: corner (0,0,0)
//! - Bit 1: corner (1,0,0)
//! - Bit 2: corner (1,1,0)
//! - Bit 3: corner (0,1,0)
//! - Bit 4: corner (0,0,1)
//! - Bit 5: corner (1,0,1)
//! - Bit 6: corner (1,1,1)
//! - Bit 7: corner (0,1,1)
//!
//! Corner densities are recomputed per cell from the field rather than
//! stored, so classification and triangulation read identical values for a
//! shared corner without any shared buffer.

use glam::UVec3;

use crate::config::GridParams;
use crate::constants::{cell_to_index, CORNER_COUNT, CORNER_OFFSETS};
use crate::density::{DensityField, FieldContext};
use crate::dispatch::dispatch_3d;
use crate::sink::AppendBuffer;

/// Entry of the compacted list: a surface cell and its case id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CompactedCell {
  /// Global linear cell index.
  pub cell: u32,
  pub case: u8,
}

/// True for cases with no surface crossing.
#[inline(always)]
pub const fn is_uniform(case: u8) -> bool {
  case == 0 || case == 255
}

/// Sample the 8 corners of `cell`.
#[inline]
pub fn corner_densities<F: DensityField + ?Sized>(
  field: &F,
  grid: &GridParams,
  cell: UVec3,
  ctx: &FieldContext,
) -> [f32; CORNER_COUNT] {
  CORNER_OFFSETS.map(|offset| {
    let corner = cell + UVec3::from_array(offset);
    field.density(grid.corner_position(corner), ctx)
  })
}

/// Build the case id from corner densities.
#[inline]
pub fn case_from_densities(densities: &[f32; CORNER_COUNT], threshold: f32) -> u8 {
  densities
    .iter()
    .enumerate()
    .fold(0u8, |case, (corner, &d)| {
      case | (((d > threshold) as u8) << corner)
    })
}

/// Case id of `cell`.
#[inline]
pub fn cell_case<F: DensityField + ?Sized>(
  field: &F,
  grid: &GridParams,
  cell: UVec3,
  threshold: f32,
  ctx: &FieldContext,
) -> u8 {
  case_from_densities(&corner_densities(field, grid, cell, ctx), threshold)
}

/// Classification pass of compacted mode over Z slices `z_range`.
///
/// Appends every non-uniform cell to `compacted`. Entry order is
/// unspecified.
#[cfg_attr(
  feature = "instrument",
  tracing::instrument(skip_all, name = "classify::compact")
)]
pub fn classify_compacted<F: DensityField + ?Sized>(
  field: &F,
  grid: &GridParams,
  z_range: std::ops::Range<u32>,
  threshold: f32,
  ctx: &FieldContext,
  group: [u32; 3],
  compacted: &AppendBuffer<CompactedCell>,
) {
  let extent = UVec3::new(grid.resolution.x, grid.resolution.y, z_range.len() as u32);
  let z0 = z_range.start;

  dispatch_3d(extent, group, |local| {
    let cell = UVec3::new(local.x, local.y, local.z + z0);
    let case = cell_case(field, grid, cell, threshold, ctx);
    if !is_uniform(case) {
      compacted.append(CompactedCell {
        cell: cell_to_index(cell, grid.resolution),
        case,
      });
    }
  });
}
