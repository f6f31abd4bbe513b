//! Draw sizing: direct counts and indirect argument buffers.

use super::AppendBuffer;

/// Arguments of a non-indexed indirect draw, laid out as the GPU reads them.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndirectArgsBuffer {
  pub vertex_count: u32,
  pub instance_count: u32,
  pub start_vertex: u32,
  pub start_instance: u32,
}

impl IndirectArgsBuffer {
  /// Args of an empty draw: `(0, 1, 0, 0)`.
  pub const RESET: IndirectArgsBuffer = IndirectArgsBuffer {
    vertex_count: 0,
    instance_count: 1,
    start_vertex: 0,
    start_instance: 0,
  };

  pub fn reset(&mut self) {
    *self = Self::RESET;
  }

  /// Device-side copy of a triangle counter into the vertex count.
  #[inline]
  pub fn copy_triangle_count(&mut self, triangles: u32) {
    self.vertex_count = triangles.saturating_mul(3);
  }

  /// Device-side copy of `buffer`'s stored count. The host never sees it.
  #[inline]
  pub fn copy_counter<T>(&mut self, buffer: &AppendBuffer<T>) {
    self.copy_triangle_count(buffer.len());
  }

  pub fn as_array(&self) -> [u32; 4] {
    [
      self.vertex_count,
      self.instance_count,
      self.start_vertex,
      self.start_instance,
    ]
  }
}

impl Default for IndirectArgsBuffer {
  fn default() -> Self {
    Self::RESET
  }
}

/// Draw issued for one layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawCommand<'a> {
  /// Host read the counter and sized the draw itself.
  Direct { vertex_count: u32 },

  /// Draw sized by an argument buffer the host never read.
  Indirect(&'a IndirectArgsBuffer),
}

impl DrawCommand<'_> {
  /// Vertices the draw will rasterize.
  pub fn vertex_count(&self) -> u32 {
    match self {
      DrawCommand::Direct { vertex_count } => *vertex_count,
      DrawCommand::Indirect(args) => args.vertex_count * args.instance_count,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.vertex_count() == 0
  }

  pub fn is_indirect(&self) -> bool {
    matches!(self, DrawCommand::Indirect(_))
  }
}

#[cfg(test)]
#[path = "draw_test.rs"]
mod draw_test;
