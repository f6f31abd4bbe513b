//! Output storage and the rendering boundary.
//!
//! The pipeline owns the triangle buffer; after each layer's dispatch joins
//! it lends the buffer to a [`RenderSink`] as a read-only [`LayerFrame`].
//! The sink must copy whatever it needs before returning, because the next
//! layer resets the buffer.
//!
//! ```text
//!  Dispatching ──► Draining ──────────────► next layer
//!                     │
//!                     ▼
//!          sink.consume(LayerFrame {
//!            layer, z_range,
//!            draw: Direct { vertex_count } | Indirect(&args),
//!            triangles (read-only view)
//!          })
//! ```

mod buffer;
mod draw;

use std::ops::Range;

pub use buffer::AppendBuffer;
pub use draw::{DrawCommand, IndirectArgsBuffer};

use crate::types::{MeshOutput, Triangle};

/// Consumer of finished layers, implemented by the host renderer.
pub trait RenderSink {
  fn consume(&mut self, frame: LayerFrame<'_>);
}

impl<S: RenderSink + ?Sized> RenderSink for &mut S {
  fn consume(&mut self, frame: LayerFrame<'_>) {
    (**self).consume(frame)
  }
}

/// Read-only view of one drained layer.
#[derive(Clone, Copy, Debug)]
pub struct LayerFrame<'a> {
  /// Layer index within the epoch.
  pub layer: u32,
  /// Total layers in the epoch.
  pub layer_count: u32,
  /// Cell Z slices covered by this layer.
  pub z_range: (u32, u32),
  /// Draw to issue for this layer.
  pub draw: DrawCommand<'a>,
  triangles: &'a AppendBuffer<Triangle>,
}

impl<'a> LayerFrame<'a> {
  pub(crate) fn new(
    layer: u32,
    layer_count: u32,
    z_range: Range<u32>,
    draw: DrawCommand<'a>,
    triangles: &'a AppendBuffer<Triangle>,
  ) -> Self {
    Self {
      layer,
      layer_count,
      z_range: (z_range.start, z_range.end),
      draw,
      triangles,
    }
  }

  /// Triangles covered by the draw, including degenerate fixed slots.
  #[inline]
  pub fn triangle_count(&self) -> u32 {
    self.draw.vertex_count() / 3
  }

  pub fn is_empty(&self) -> bool {
    self.draw.is_empty()
  }

  /// Triangle in `slot`. Unwritten slots read as [`Triangle::DEGENERATE`].
  #[inline]
  pub fn triangle(&self, slot: u32) -> Triangle {
    self
      .triangles
      .get(slot as usize)
      .copied()
      .unwrap_or(Triangle::DEGENERATE)
  }

  /// Triangles in slot order.
  pub fn triangles(&self) -> impl Iterator<Item = Triangle> + 'a {
    let view = *self;
    (0..self.triangle_count()).map(move |slot| view.triangle(slot))
  }

  /// Position stream, three entries per triangle.
  pub fn positions(&self) -> impl Iterator<Item = [f32; 3]> + 'a {
    self.triangles().flat_map(|tri| tri.positions)
  }

  /// Normal stream, parallel to [`positions`](Self::positions).
  pub fn normals(&self) -> impl Iterator<Item = [f32; 3]> + 'a {
    self.triangles().flat_map(|tri| tri.normals)
  }

  /// Implicit sequential index stream.
  pub fn indices(&self) -> Range<u32> {
    0..self.draw.vertex_count()
  }
}

/// Accumulates every layer of an epoch into one [`MeshOutput`].
#[derive(Debug)]
pub struct MeshCollector {
  mesh: MeshOutput,
  skip_degenerate: bool,
  layers: u32,
}

impl Default for MeshCollector {
  fn default() -> Self {
    Self::new()
  }
}

impl MeshCollector {
  /// Collector that drops unused fixed slots.
  pub fn new() -> Self {
    Self {
      mesh: MeshOutput::new(),
      skip_degenerate: true,
      layers: 0,
    }
  }

  /// Keep unused fixed slots as all-zero triangles.
  pub fn keep_degenerate(mut self) -> Self {
    self.skip_degenerate = false;
    self
  }

  pub fn mesh(&self) -> &MeshOutput {
    &self.mesh
  }

  pub fn into_mesh(self) -> MeshOutput {
    self.mesh
  }

  /// Layers consumed since creation or the last clear.
  pub fn layers(&self) -> u32 {
    self.layers
  }

  pub fn clear(&mut self) {
    self.mesh.clear();
    self.layers = 0;
  }
}

impl RenderSink for MeshCollector {
  fn consume(&mut self, frame: LayerFrame<'_>) {
    self.layers += 1;
    for tri in frame.triangles() {
      if self.skip_degenerate && tri == Triangle::DEGENERATE {
        continue;
      }
      self.mesh.push_triangle(&tri);
    }
  }
}

/// Discards every frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl RenderSink for NullSink {
  fn consume(&mut self, _frame: LayerFrame<'_>) {}
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
