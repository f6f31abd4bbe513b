//! Test utilities for pipeline tests.
//!
//! Fixture configs, a recording sink and mesh topology checks shared by the
//! pipeline test modules.

use std::collections::HashMap;

use glam::Vec3;

use crate::config::{ClassifyMode, ExtractionConfig};
use crate::density::SphereField;
use crate::sink::{LayerFrame, RenderSink};
use crate::types::{MeshOutput, Triangle};

// =============================================================================
// Fixtures
// =============================================================================

/// Sphere of radius 2.5 centered in an 8³ grid. Closed, 248 triangles.
pub fn small_sphere() -> (SphereField, ExtractionConfig) {
  (
    SphereField::new(Vec3::splat(4.0), 2.5),
    ExtractionConfig::new().with_factor(8),
  )
}

/// Sphere of radius 5.5 centered in a 16³ grid. 1160 triangles.
pub fn large_sphere() -> (SphereField, ExtractionConfig) {
  (
    SphereField::new(Vec3::splat(8.0), 5.5),
    ExtractionConfig::new().with_factor(16),
  )
}

pub const ALL_MODES: [ClassifyMode; 3] = [
  ClassifyMode::Dense,
  ClassifyMode::DenseFixed,
  ClassifyMode::Compacted,
];

// =============================================================================
// Recording sink
// =============================================================================

/// What a sink saw for one layer.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedLayer {
  pub layer: u32,
  pub layer_count: u32,
  pub z_range: (u32, u32),
  pub vertex_count: u32,
  pub indirect: bool,
  pub triangles: Vec<Triangle>,
}

impl RecordedLayer {
  /// Triangles excluding unused fixed slots.
  pub fn real_triangles(&self) -> impl Iterator<Item = &Triangle> {
    self.triangles.iter().filter(|t| **t != Triangle::DEGENERATE)
  }
}

/// Copies every frame it is handed.
#[derive(Default)]
pub struct RecordingSink {
  pub layers: Vec<RecordedLayer>,
}

impl RenderSink for RecordingSink {
  fn consume(&mut self, frame: LayerFrame<'_>) {
    self.layers.push(RecordedLayer {
      layer: frame.layer,
      layer_count: frame.layer_count,
      z_range: frame.z_range,
      vertex_count: frame.draw.vertex_count(),
      indirect: frame.draw.is_indirect(),
      triangles: frame.triangles().collect(),
    });
  }
}

// =============================================================================
// Topology
// =============================================================================

type VertexKey = [u32; 3];

fn vertex_key(p: [f32; 3]) -> VertexKey {
  p.map(f32::to_bits)
}

/// Triangle as bit-exact vertex keys, rotated so the smallest key leads.
/// Rotation keeps winding, so two meshes compare equal only if every
/// triangle has the same orientation.
pub fn triangle_key(tri: &Triangle) -> [VertexKey; 3] {
  let [a, b, c] = tri.positions.map(vertex_key);
  if a <= b && a <= c {
    [a, b, c]
  } else if b <= a && b <= c {
    [b, c, a]
  } else {
    [c, a, b]
  }
}

/// Order-independent, winding-preserving fingerprint of a mesh.
pub fn sorted_triangle_keys<'a>(
  triangles: impl IntoIterator<Item = &'a Triangle>,
) -> Vec<[VertexKey; 3]> {
  let mut keys: Vec<_> = triangles.into_iter().map(triangle_key).collect();
  keys.sort_unstable();
  keys
}

pub fn mesh_keys(mesh: &MeshOutput) -> Vec<[VertexKey; 3]> {
  let triangles: Vec<Triangle> = mesh.triangles().collect();
  sorted_triangle_keys(&triangles)
}

/// Watertight and consistently oriented: every directed edge is matched by
/// the same number of edges running the other way.
pub fn is_closed(mesh: &MeshOutput) -> bool {
  let mut directed: HashMap<(VertexKey, VertexKey), i32> = HashMap::new();
  for tri in mesh.triangles() {
    let [a, b, c] = tri.positions.map(vertex_key);
    for (from, to) in [(a, b), (b, c), (c, a)] {
      *directed.entry((from, to)).or_default() += 1;
    }
  }
  directed
    .iter()
    .all(|(&(from, to), &count)| directed.get(&(to, from)).copied().unwrap_or(0) == count)
}
