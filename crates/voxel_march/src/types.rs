//! Core data types for Marching Cubes output.

use glam::Vec3;

/// How emitted vertex normals are derived from the density field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NormalMode {
  /// Field gradient evaluated at the interpolated vertex position.
  #[default]
  Gradient,

  /// Gradients at the edge's two corners, interpolated with the same factor
  /// as the position. Cheaper for analytic fields, identical across cells.
  CornerLerp,
}

/// One emitted triangle: three positions and three normals.
///
/// Layout is 18 consecutive floats, matching the output buffer stride.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
  pub positions: [[f32; 3]; 3],
  pub normals: [[f32; 3]; 3],
}

impl Triangle {
  /// All-zero triangle. Unused fixed slots hold this and rasterize to nothing.
  pub const DEGENERATE: Triangle = Triangle {
    positions: [[0.0; 3]; 3],
    normals: [[0.0; 3]; 3],
  };

  /// True if the triangle has zero area.
  pub fn is_degenerate(&self) -> bool {
    let [a, b, c] = self.positions.map(Vec3::from_array);
    (b - a).cross(c - a).length_squared() == 0.0
  }

  /// Unnormalized face normal from the winding order.
  pub fn face_normal(&self) -> Vec3 {
    let [a, b, c] = self.positions.map(Vec3::from_array);
    (b - a).cross(c - a)
  }
}

impl Default for Triangle {
  fn default() -> Self {
    Self::DEGENERATE
  }
}

/// Axis-aligned bounding box.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinMaxAABB {
  pub min: [f32; 3],
  pub max: [f32; 3],
}

impl MinMaxAABB {
  /// Create AABB with inverted extents (ready for encapsulation).
  pub fn empty() -> Self {
    Self {
      min: [f32::INFINITY; 3],
      max: [f32::NEG_INFINITY; 3],
    }
  }

  pub fn new(min: [f32; 3], max: [f32; 3]) -> Self {
    Self { min, max }
  }

  /// Expand AABB to include a point.
  #[inline]
  pub fn encapsulate(&mut self, point: [f32; 3]) {
    for i in 0..3 {
      self.min[i] = self.min[i].min(point[i]);
      self.max[i] = self.max[i].max(point[i]);
    }
  }

  /// Grow to cover another box.
  pub fn merge(&mut self, other: &MinMaxAABB) {
    if other.is_valid() {
      self.encapsulate(other.min);
      self.encapsulate(other.max);
    }
  }

  /// Check if AABB is valid (min <= max on all axes).
  pub fn is_valid(&self) -> bool {
    self.min[0] <= self.max[0] && self.min[1] <= self.max[1] && self.min[2] <= self.max[2]
  }

  /// Check if a point lies inside (inclusive).
  pub fn contains(&self, point: [f32; 3]) -> bool {
    (0..3).all(|i| point[i] >= self.min[i] && point[i] <= self.max[i])
  }
}

impl Default for MinMaxAABB {
  fn default() -> Self {
    Self::empty()
  }
}

/// Indexed triangle mesh collected from one or more layers.
///
/// Vertices are not welded: every triangle owns three consecutive vertices
/// and `indices` is the implicit sequence `0, 1, 2, ...`.
#[derive(Clone, Debug, Default)]
pub struct MeshOutput {
  pub positions: Vec<[f32; 3]>,
  pub normals: Vec<[f32; 3]>,
  pub indices: Vec<u32>,
  pub bounds: MinMaxAABB,
}

impl MeshOutput {
  pub fn new() -> Self {
    Self::default()
  }

  /// Pre-size all streams for `triangles` triangles.
  pub fn with_capacity(triangles: usize) -> Self {
    Self {
      positions: Vec::with_capacity(triangles * 3),
      normals: Vec::with_capacity(triangles * 3),
      indices: Vec::with_capacity(triangles * 3),
      bounds: MinMaxAABB::empty(),
    }
  }

  /// Clear all buffers, preserving capacity.
  pub fn clear(&mut self) {
    self.positions.clear();
    self.normals.clear();
    self.indices.clear();
    self.bounds = MinMaxAABB::empty();
  }

  /// Append one triangle with sequential indices.
  pub fn push_triangle(&mut self, triangle: &Triangle) {
    for v in 0..3 {
      let index = self.positions.len() as u32;
      self.positions.push(triangle.positions[v]);
      self.normals.push(triangle.normals[v]);
      self.indices.push(index);
      self.bounds.encapsulate(triangle.positions[v]);
    }
  }

  /// Returns true if no geometry was generated.
  pub fn is_empty(&self) -> bool {
    self.positions.is_empty()
  }

  /// Number of triangles in the mesh.
  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }

  /// Iterate triangles in emission order.
  pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
    self.indices.chunks_exact(3).map(|tri| {
      let corners = [tri[0], tri[1], tri[2]];
      Triangle {
        positions: corners.map(|i| self.positions[i as usize]),
        normals: corners.map(|i| self.normals[i as usize]),
      }
    })
  }

  /// Signed volume enclosed by the mesh (divergence theorem).
  ///
  /// Positive when triangles wind counter-clockwise seen from outside.
  pub fn signed_volume(&self) -> f32 {
    self
      .indices
      .chunks_exact(3)
      .map(|tri| {
        let [a, b, c] =
          [tri[0], tri[1], tri[2]].map(|i| Vec3::from_array(self.positions[i as usize]));
        a.dot(b.cross(c)) / 6.0
      })
      .sum()
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
