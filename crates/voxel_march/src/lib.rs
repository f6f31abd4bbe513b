//! voxel_march - Table-driven, data-parallel Marching Cubes
//!
//! This crate extracts triangle meshes from implicit density fields sampled
//! on a regular grid. Every stage runs as a rayon dispatch over work groups,
//! with atomic append buffers standing in for GPU counters, so the same code
//! path can feed a renderer directly or stream layer by layer into bounded
//! output storage.
//!
//! # Features
//!
//! - **Canonical case tables**: 256-entry triangle counts and edge lists,
//!   built at compile time with consistent outward winding
//! - **Three classify modes**: dense, dense with fixed slots, and compacted
//!   (stream compaction of surface cells before triangulation)
//! - **Layered streaming**: Z layers sized to the output capacity, each handed
//!   to a [`RenderSink`] before the next one starts
//! - **Direct or indirect draws**: host read-back of the triangle counter or
//!   an indirect-args buffer, with capability fallback
//! - **Async epochs**: whole extractions on the rayon pool, polled from the
//!   host thread
//!
//! # Example
//!
//! ```ignore
//! use glam::{Mat4, Vec3};
//! use voxel_march::{ExtractionConfig, ExtractionPipeline, SphereField};
//!
//! let field = SphereField::new(Vec3::splat(8.0), 5.5);
//! let config = ExtractionConfig::new().with_factor(16).with_steps(4);
//!
//! let mut pipeline = ExtractionPipeline::new(field, config)?;
//! let mesh = pipeline.extract_mesh(0.0, Mat4::IDENTITY);
//!
//! println!("Generated {} triangles", mesh.triangle_count());
//! ```

pub mod case_table;
pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items
pub use case_table::{CaseTable, EDGE_LIST, EDGE_MASK, TRIANGLE_COUNT};
pub use constants::{cell_to_index, index_to_cell, CORNER_OFFSETS, EDGE_CORNERS};
pub use error::{ConfigError, PipelineError};
pub use types::{MeshOutput, MinMaxAABB, NormalMode, Triangle};

// Grid and pipeline configuration
pub mod config;
pub use config::{ClassifyMode, DrawStrategy, ExtractionConfig, GridParams, WorkGroupSize};

// Density fields
pub mod density;
pub use density::{
  ConstantField, DensityField, FieldContext, FnField, NoiseField, PlaneField, SphereField,
};

// Work-group dispatch over the rayon pool
pub mod dispatch;

// Per-cell stages
pub mod classify;
pub mod triangulate;

// Output buffers and the rendering boundary
pub mod sink;
pub use sink::{DrawCommand, IndirectArgsBuffer, LayerFrame, MeshCollector, NullSink, RenderSink};

// Layered extraction
pub mod pipeline;
pub use pipeline::{
  AsyncExtractor, EpochOutput, EpochReport, ExtractionPipeline, PipelineBuilder, PipelineState,
};

// Engine-agnostic metrics
pub mod metrics;
pub use metrics::ExtractionMetrics;
