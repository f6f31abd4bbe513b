//! Per-layer dispatch kernels, one per classify mode.
//!
//! ```text
//! Dense        dispatch_3d(layer) ─► classify ─► triangulate ─► append(counter)
//!
//! DenseFixed   dispatch_3d(layer) ─► classify ─► triangulate ─► slot = local * 5 + t
//!
//! Compacted    dispatch_3d(layer) ─► classify ─► append (cell, case)
//!                                                   │
//!              dispatch_1d(ceil(count / group)) ◄───┘
//!                    └─► triangulate ─► append(counter)
//! ```

use std::ops::Range;
use std::sync::atomic::{AtomicU32, Ordering};

use glam::UVec3;

use crate::classify::{
  case_from_densities, classify_compacted, corner_densities, is_uniform, CompactedCell,
};
use crate::config::WorkGroupSize;
use crate::constants::{cell_to_index, index_to_cell, MAX_TRIANGLES_PER_CELL};
use crate::density::DensityField;
use crate::dispatch::{dispatch_1d, dispatch_3d, IndirectDispatchArgs};
use crate::sink::AppendBuffer;
use crate::triangulate::CellTriangulator;
use crate::types::Triangle;

/// Counts produced by one layer's dispatch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayerOutput {
  /// Real triangles produced (degenerate fixed slots excluded).
  pub emitted: u32,
  /// Entries in the compacted list (compacted mode only).
  pub compacted: u32,
  /// Slot count of a fixed-slot layer. `None` when the triangle counter
  /// sizes the draw.
  pub fixed_slots: Option<u32>,
}

fn layer_extent(resolution: UVec3, z_range: &Range<u32>) -> UVec3 {
  UVec3::new(resolution.x, resolution.y, z_range.end - z_range.start)
}

#[cfg_attr(feature = "instrument", tracing::instrument(skip_all, name = "kernels::dense"))]
pub fn dense<F: DensityField + ?Sized>(
  tri: &CellTriangulator<'_, F>,
  z_range: Range<u32>,
  group: WorkGroupSize,
  out: &AppendBuffer<Triangle>,
) -> LayerOutput {
  let z0 = z_range.start;

  dispatch_3d(layer_extent(tri.grid.resolution, &z_range), group.cells, |local| {
    let cell = UVec3::new(local.x, local.y, local.z + z0);
    let densities = corner_densities(tri.field, tri.grid, cell, &tri.ctx);
    let case = case_from_densities(&densities, tri.threshold);
    if is_uniform(case) {
      return;
    }
    tri.triangulate(cell, case, &densities, |_, triangle| {
      out.append(triangle);
    });
  });

  LayerOutput {
    emitted: out.len(),
    compacted: 0,
    fixed_slots: None,
  }
}

#[cfg_attr(feature = "instrument", tracing::instrument(skip_all, name = "kernels::dense_fixed"))]
pub fn dense_fixed<F: DensityField + ?Sized>(
  tri: &CellTriangulator<'_, F>,
  z_range: Range<u32>,
  group: WorkGroupSize,
  out: &AppendBuffer<Triangle>,
) -> LayerOutput {
  let z0 = z_range.start;
  let extent = layer_extent(tri.grid.resolution, &z_range);
  let emitted = AtomicU32::new(0);

  dispatch_3d(extent, group.cells, |local| {
    let cell = UVec3::new(local.x, local.y, local.z + z0);
    let densities = corner_densities(tri.field, tri.grid, cell, &tri.ctx);
    let case = case_from_densities(&densities, tri.threshold);
    if is_uniform(case) {
      return;
    }
    let base = cell_to_index(local, extent) as usize * MAX_TRIANGLES_PER_CELL;
    tri.triangulate(cell, case, &densities, |t, triangle| {
      if out.write_at(base + t, triangle) {
        emitted.fetch_add(1, Ordering::Relaxed);
      }
    });
  });

  let cells = extent.x * extent.y * extent.z;
  LayerOutput {
    emitted: emitted.into_inner(),
    compacted: 0,
    fixed_slots: Some(cells * MAX_TRIANGLES_PER_CELL as u32),
  }
}

#[cfg_attr(feature = "instrument", tracing::instrument(skip_all, name = "kernels::compacted"))]
pub fn compacted<F: DensityField + ?Sized>(
  tri: &CellTriangulator<'_, F>,
  z_range: Range<u32>,
  group: WorkGroupSize,
  list: &AppendBuffer<CompactedCell>,
  out: &AppendBuffer<Triangle>,
) -> (LayerOutput, IndirectDispatchArgs) {
  classify_compacted(
    tri.field,
    tri.grid,
    z_range,
    tri.threshold,
    &tri.ctx,
    group.cells,
    list,
  );

  let count = list.len();
  let args = IndirectDispatchArgs::linear(count, group.linear);
  let resolution = tri.grid.resolution;

  dispatch_1d(args, group.linear, count, |i| {
    let Some(entry) = list.get(i as usize) else {
      return;
    };
    let cell = index_to_cell(entry.cell, resolution);
    let densities = corner_densities(tri.field, tri.grid, cell, &tri.ctx);
    tri.triangulate(cell, entry.case, &densities, |_, triangle| {
      out.append(triangle);
    });
  });

  (
    LayerOutput {
      emitted: out.len(),
      compacted: count,
      fixed_slots: None,
    },
    args,
  )
}
