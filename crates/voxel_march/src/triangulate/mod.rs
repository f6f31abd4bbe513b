//! Table-driven triangulation of one cell.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ INPUT: cell (i,j,k), case id, 8 corner densities             │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │ for t in 0..triangle_count[case]:                            │
//! │   for v in 0..3:                                             │
//! │     edge   = edge_list[case][t][v]                           │
//! │     (a, b) = EDGE_CORNERS[edge]        low → high coordinate │
//! │     s      = (threshold − d[a]) / (d[b] − d[a])  (guarded)   │
//! │     p      = lerp(corner a, corner b, s)                     │
//! │     n      = −∇f(p)  or  −lerp(∇f(a), ∇f(b), s)              │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │ OUTPUT: up to 5 triangles, world transform applied           │
//! │         (vertices 1 and 2 swapped under a mirror)            │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every edge is interpolated from its lower-coordinate corner, so two cells
//! sharing an edge compute bit-identical vertices.

pub mod interpolate;
pub mod normal;
pub mod transform;

use glam::{UVec3, Vec3A};
pub use transform::WorldTransform;

use crate::case_table::CaseTable;
use crate::config::{GridParams, NormalMode};
use crate::constants::{CORNER_COUNT, CORNER_OFFSETS, EDGE_CORNERS};
use crate::density::{DensityField, FieldContext};
use crate::types::Triangle;

/// Everything a triangulation kernel reads. Shared immutably by all threads.
pub struct CellTriangulator<'a, F: ?Sized> {
  pub field: &'a F,
  pub grid: &'a GridParams,
  pub table: &'a CaseTable,
  pub threshold: f32,
  pub ctx: FieldContext,
  pub normal_mode: NormalMode,
  pub transform: &'a WorldTransform,
}

impl<F: DensityField + ?Sized> CellTriangulator<'_, F> {
  /// Emit the triangles of `cell` for `case`.
  ///
  /// `emit` receives the triangle's index within the cell (`0..5`) and the
  /// finished triangle.
  #[inline]
  pub fn triangulate(
    &self,
    cell: UVec3,
    case: u8,
    densities: &[f32; CORNER_COUNT],
    mut emit: impl FnMut(usize, Triangle),
  ) {
    for (t, edges) in self.table.triangles(case).iter().enumerate() {
      let mut triangle = Triangle::DEGENERATE;
      for (v, &edge) in edges.iter().enumerate() {
        let (p, n) = self.edge_vertex(cell, edge, densities);
        triangle.positions[v] = p.to_array();
        triangle.normals[v] = n.to_array();
      }
      if self.transform.flips_winding {
        triangle.positions.swap(1, 2);
        triangle.normals.swap(1, 2);
      }
      emit(t, triangle);
    }
  }

  /// World-space position and normal of the crossing on `edge`.
  #[inline]
  fn edge_vertex(&self, cell: UVec3, edge: u8, densities: &[f32; CORNER_COUNT]) -> (Vec3A, Vec3A) {
    let [a, b] = EDGE_CORNERS[edge as usize];
    let (a, b) = (a as usize, b as usize);

    let pa = Vec3A::from(self.grid.corner_position(cell + UVec3::from_array(CORNER_OFFSETS[a])));
    let pb = Vec3A::from(self.grid.corner_position(cell + UVec3::from_array(CORNER_OFFSETS[b])));

    let s = interpolate::edge_factor(densities[a], densities[b], self.threshold);
    let p = interpolate::lerp_position(pa, pb, s);

    let gradient = match self.normal_mode {
      NormalMode::Gradient => Vec3A::from(self.field.gradient(p.into(), &self.ctx)),
      NormalMode::CornerLerp => {
        let ga = Vec3A::from(self.field.gradient(pa.into(), &self.ctx));
        let gb = Vec3A::from(self.field.gradient(pb.into(), &self.ctx));
        normal::lerp_gradient(ga, gb, s)
      }
    };
    let n = normal::from_gradient(gradient);

    if self.transform.is_identity() {
      (p, n)
    } else {
      (self.transform.point(p), self.transform.normal(n))
    }
  }
}
