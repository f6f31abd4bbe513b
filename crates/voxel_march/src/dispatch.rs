//! Work-group dispatch on the rayon pool.
//!
//! Kernels are closures invoked once per logical thread id. Threads are
//! grouped like a compute dispatch: the grid of groups is the ceiling
//! division of the extent by the group size, and threads of a trailing
//! partial group whose id falls outside the extent do nothing.
//!
//! ```text
//! extent = 10, group = 4
//!
//!   group 0      group 1      group 2
//! ┌──┬──┬──┬──┐┌──┬──┬──┬──┐┌──┬──┬──┬──┐
//! │ 0│ 1│ 2│ 3││ 4│ 5│ 6│ 7││ 8│ 9│ ×│ ×│   × = out of range, skipped
//! └──┴──┴──┴──┘└──┴──┴──┴──┘└──┴──┴──┴──┘
//! ```
//!
//! Groups run in parallel with no ordering guarantee. Threads within a group
//! run sequentially on one worker.

use glam::UVec3;
use rayon::prelude::*;

use crate::constants::index_to_cell;

/// `ceil(n / d)`. `d` must be non-zero.
#[inline(always)]
pub const fn ceil_div(n: u32, d: u32) -> u32 {
  n.div_ceil(d)
}

/// Number of groups per axis needed to cover `extent`.
#[inline]
pub fn dispatch_groups(extent: UVec3, group: [u32; 3]) -> UVec3 {
  UVec3::new(
    ceil_div(extent.x, group[0]),
    ceil_div(extent.y, group[1]),
    ceil_div(extent.z, group[2]),
  )
}

/// Group counts for an indirect dispatch, as written into an args buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IndirectDispatchArgs {
  pub groups_x: u32,
  pub groups_y: u32,
  pub groups_z: u32,
}

impl IndirectDispatchArgs {
  /// One-dimensional dispatch sized to `count` items.
  pub fn linear(count: u32, group: u32) -> Self {
    Self {
      groups_x: ceil_div(count, group),
      groups_y: 1,
      groups_z: 1,
    }
  }

  pub fn total_groups(&self) -> u64 {
    self.groups_x as u64 * self.groups_y as u64 * self.groups_z as u64
  }
}

/// Run `kernel` once for every id in `[0, extent)` on a 3-D grid.
pub fn dispatch_3d<K>(extent: UVec3, group: [u32; 3], kernel: K)
where
  K: Fn(UVec3) + Sync + Send,
{
  let groups = dispatch_groups(extent, group);
  let total = groups.x * groups.y * groups.z;
  let group_size = UVec3::from_array(group);

  (0..total).into_par_iter().for_each(|g| {
    let base = index_to_cell(g, groups) * group_size;
    for lz in 0..group[2] {
      for ly in 0..group[1] {
        for lx in 0..group[0] {
          let id = base + UVec3::new(lx, ly, lz);
          if id.cmplt(extent).all() {
            kernel(id);
          }
        }
      }
    }
  });
}

/// Run `kernel` once for every id in `[0, args.groups_x * group)` that is
/// below `count`.
pub fn dispatch_1d<K>(args: IndirectDispatchArgs, group: u32, count: u32, kernel: K)
where
  K: Fn(u32) + Sync + Send,
{
  (0..args.groups_x).into_par_iter().for_each(|g| {
    let base = g * group;
    for local in 0..group {
      let id = base + local;
      if id < count {
        kernel(id);
      }
    }
  });
}

#[cfg(test)]
#[path = "dispatch_test.rs"]
mod dispatch_test;
