//! Streaming extraction pipeline.
//!
//! ```text
//!                    run_epoch(time, transform, sink)
//!                                  │
//!                                  ▼
//!        ┌──────────────────────────────────────────────────┐
//!        │ Idle                                             │
//!        └────────────────────────┬─────────────────────────┘
//!                                 │ for each layer in plan
//!                                 ▼
//!        ┌──────────────────────────────────────────────────┐
//!        │ Dispatching { layer }                            │
//!        │   reset counter, compacted list, indirect args   │
//!        │   Dense | DenseFixed | Compacted kernel          │
//!        │   Indirect: counter → args buffer                │
//!        └────────────────────────┬─────────────────────────┘
//!                                 ▼
//!        ┌──────────────────────────────────────────────────┐
//!        │ Draining { layer }                               │
//!        │   ReadBack: host reads counter → Direct draw     │
//!        │   Indirect: args buffer → Indirect draw          │
//!        │   sink.consume(LayerFrame)                       │
//!        └────────────────────────┬─────────────────────────┘
//!                                 │ next layer, or
//!                                 ▼
//!                               Idle
//! ```
//!
//! Layers run strictly in sequence: `run_epoch` takes `&mut self`, and the
//! sink only sees shared borrows of the buffers while a layer drains.

mod async_extract;
mod kernels;
mod layers;

#[cfg(test)]
pub mod test_utils;


pub use async_extract::{AsyncExtractor, EpochOutput};
use glam::Mat4;
pub use kernels::LayerOutput;
pub use layers::LayerPlan;
use tracing::{debug, error, warn};
use web_time::Instant;

use crate::case_table::CaseTable;
use crate::classify::CompactedCell;
use crate::config::{ClassifyMode, DrawStrategy, ExtractionConfig};
use crate::density::{DensityField, FieldContext};
use crate::dispatch::IndirectDispatchArgs;
use crate::error::PipelineError;
use crate::metrics::ExtractionMetrics;
use crate::sink::{AppendBuffer, DrawCommand, IndirectArgsBuffer, LayerFrame, MeshCollector, RenderSink};
use crate::triangulate::{CellTriangulator, WorldTransform};
use crate::types::{MeshOutput, Triangle};

/// Where the pipeline is within an epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PipelineState {
  #[default]
  Idle,
  Dispatching {
    layer: u32,
  },
  Draining {
    layer: u32,
  },
}

/// Summary of one epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EpochReport {
  /// Layers dispatched.
  pub layers: u32,
  /// Real triangles produced across all layers.
  pub triangle_count: u32,
  /// Compacted cells across all layers (compacted mode only).
  pub compacted_cells: u32,
  /// Appends rejected because the buffer was full.
  pub dropped: u32,
  /// Strategy the draws were issued with.
  pub strategy: DrawStrategy,
  pub elapsed_us: u64,
}

/// Marching Cubes pipeline state: field, configuration, buffers and the
/// resolved draw strategy.
pub struct ExtractionPipeline<F> {
  field: F,
  config: ExtractionConfig,
  table: CaseTable,
  layers: LayerPlan,
  triangles: AppendBuffer<Triangle>,
  compacted: AppendBuffer<CompactedCell>,
  indirect_args: IndirectArgsBuffer,
  dispatch_args: IndirectDispatchArgs,
  strategy: DrawStrategy,
  state: PipelineState,
  epoch: u64,
  metrics: ExtractionMetrics,
}

impl<F: DensityField> ExtractionPipeline<F> {
  /// Validate `config`, plan layers and allocate buffers.
  pub fn new(field: F, config: ExtractionConfig) -> Result<Self, PipelineError> {
    Self::with_case_table(field, config, CaseTable::default())
  }

  /// Start a builder.
  pub fn builder() -> PipelineBuilder<F> {
    PipelineBuilder::default()
  }

  fn with_case_table(
    field: F,
    config: ExtractionConfig,
    table: CaseTable,
  ) -> Result<Self, PipelineError> {
    config.validate()?;
    table.validate()?;

    let strategy = resolve_strategy(&config);
    let layers = LayerPlan::new(&config);
    let capacity = layers.buffer_capacity() as usize;
    let compacted_capacity = match config.classify_mode {
      ClassifyMode::Compacted => layers.max_layer_cells() as usize,
      _ => 0,
    };

    debug!(
      resolution = ?config.grid.resolution,
      layers = layers.len(),
      capacity,
      mode = ?config.classify_mode,
      ?strategy,
      "created extraction pipeline"
    );

    Ok(Self {
      field,
      table,
      triangles: AppendBuffer::with_capacity(capacity),
      compacted: AppendBuffer::with_capacity(compacted_capacity),
      indirect_args: IndirectArgsBuffer::RESET,
      dispatch_args: IndirectDispatchArgs::default(),
      strategy,
      state: PipelineState::Idle,
      epoch: 0,
      metrics: ExtractionMetrics::new(),
      layers,
      config,
    })
  }

  /// Zero every counter and clear the output buffers.
  pub fn reset(&mut self) {
    self.triangles.reset();
    self.compacted.reset();
    self.indirect_args.reset();
    self.dispatch_args = IndirectDispatchArgs::default();
    self.state = PipelineState::Idle;
  }

  /// Extract the whole grid once, handing every layer to `sink`.
  #[cfg_attr(feature = "instrument", tracing::instrument(skip_all, name = "pipeline::run_epoch"))]
  pub fn run_epoch<S: RenderSink + ?Sized>(
    &mut self,
    time: f32,
    transform: Mat4,
    sink: &mut S,
  ) -> EpochReport {
    let start = Instant::now();
    let ctx = FieldContext::new(time, self.config.octave_count);
    let world = WorldTransform::new(transform);
    let layer_count = self.layers.len() as u32;

    let mut report = EpochReport {
      layers: layer_count,
      triangle_count: 0,
      compacted_cells: 0,
      dropped: 0,
      strategy: self.strategy,
      elapsed_us: 0,
    };

    self.reset();

    let plan = self.layers.clone();
    for (index, z_range) in plan.iter().enumerate() {
      let layer = index as u32;

      self.state = PipelineState::Dispatching { layer };
      self.triangles.reset();
      self.compacted.reset();
      self.indirect_args.reset();

      let output = self.dispatch_layer(z_range.clone(), &ctx, &world);
      if self.strategy == DrawStrategy::Indirect {
        match output.fixed_slots {
          Some(slots) => self.indirect_args.copy_triangle_count(slots),
          None => self.indirect_args.copy_counter(&self.triangles),
        }
      }

      let dropped = self.triangles.dropped();
      if dropped > 0 {
        error!(
          layer,
          dropped,
          capacity = self.triangles.capacity(),
          "output buffer overflow, triangles dropped"
        );
      }

      self.state = PipelineState::Draining { layer };
      let draw = match self.strategy {
        DrawStrategy::ReadBack => {
          let triangles = output.fixed_slots.unwrap_or_else(|| self.triangles.len());
          DrawCommand::Direct {
            vertex_count: triangles * 3,
          }
        }
        DrawStrategy::Indirect => DrawCommand::Indirect(&self.indirect_args),
      };

      debug!(
        epoch = self.epoch,
        layer,
        z = ?z_range,
        triangles = output.emitted,
        compacted = output.compacted,
        "layer drained"
      );

      sink.consume(LayerFrame::new(
        layer,
        layer_count,
        z_range,
        draw,
        &self.triangles,
      ));

      report.triangle_count += output.emitted;
      report.compacted_cells += output.compacted;
      report.dropped += dropped;
    }

    self.state = PipelineState::Idle;
    self.epoch += 1;
    report.elapsed_us = start.elapsed().as_micros() as u64;
    self.metrics.record_epoch(&report);
    report
  }

  /// Run one epoch and collect it into an indexed mesh.
  pub fn extract_mesh(&mut self, time: f32, transform: Mat4) -> MeshOutput {
    let mut collector = MeshCollector::new();
    self.run_epoch(time, transform, &mut collector);
    collector.into_mesh()
  }

  fn dispatch_layer(
    &mut self,
    z_range: std::ops::Range<u32>,
    ctx: &FieldContext,
    world: &WorldTransform,
  ) -> LayerOutput {
    let tri = CellTriangulator {
      field: &self.field,
      grid: &self.config.grid,
      table: &self.table,
      threshold: self.config.threshold,
      ctx: *ctx,
      normal_mode: self.config.normal_mode,
      transform: world,
    };
    let group = self.config.work_group;

    match self.config.classify_mode {
      ClassifyMode::Dense => kernels::dense(&tri, z_range, group, &self.triangles),
      ClassifyMode::DenseFixed => kernels::dense_fixed(&tri, z_range, group, &self.triangles),
      ClassifyMode::Compacted => {
        let (output, args) =
          kernels::compacted(&tri, z_range, group, &self.compacted, &self.triangles);
        self.dispatch_args = args;
        output
      }
    }
  }

  /// Release all buffers and hand back the field.
  pub fn destroy(self) -> F {
    debug!(epochs = self.epoch, "destroying extraction pipeline");
    self.field
  }
}

impl<F> ExtractionPipeline<F> {
  pub fn config(&self) -> &ExtractionConfig {
    &self.config
  }

  pub fn field(&self) -> &F {
    &self.field
  }

  pub fn case_table(&self) -> &CaseTable {
    &self.table
  }

  /// Draw strategy after capability fallback.
  pub fn strategy(&self) -> DrawStrategy {
    self.strategy
  }

  pub fn state(&self) -> PipelineState {
    self.state
  }

  pub fn layer_plan(&self) -> &LayerPlan {
    &self.layers
  }

  /// Epochs completed since creation.
  pub fn epoch(&self) -> u64 {
    self.epoch
  }

  /// Triangle slots in the output buffer.
  pub fn capacity_triangles(&self) -> usize {
    self.triangles.capacity()
  }

  /// Raw triangle counter of the most recent layer.
  pub fn triangle_counter(&self) -> u32 {
    self.triangles.counter()
  }

  /// Compacted list of the most recent layer.
  pub fn compacted_cells(&self) -> Vec<CompactedCell> {
    self.compacted.to_vec()
  }

  /// Indirect args of the most recent layer.
  pub fn indirect_args(&self) -> &IndirectArgsBuffer {
    &self.indirect_args
  }

  /// Pass-2 dispatch size of the most recent compacted layer.
  pub fn dispatch_args(&self) -> IndirectDispatchArgs {
    self.dispatch_args
  }

  pub fn metrics(&self) -> &ExtractionMetrics {
    &self.metrics
  }

  pub fn metrics_mut(&mut self) -> &mut ExtractionMetrics {
    &mut self.metrics
  }
}

/// Pick the draw strategy once for the pipeline lifetime.
fn resolve_strategy(config: &ExtractionConfig) -> DrawStrategy {
  match config.draw_strategy {
    DrawStrategy::Indirect if !config.supports_indirect => {
      warn!("indirect draws requested but unsupported, falling back to read-back");
      DrawStrategy::ReadBack
    }
    requested => requested,
  }
}

/// Builder for [`ExtractionPipeline`].
pub struct PipelineBuilder<F> {
  field: Option<F>,
  config: ExtractionConfig,
  table: Option<CaseTable>,
}

impl<F> Default for PipelineBuilder<F> {
  fn default() -> Self {
    Self {
      field: None,
      config: ExtractionConfig::default(),
      table: None,
    }
  }
}

impl<F: DensityField> PipelineBuilder<F> {
  pub fn field(mut self, field: F) -> Self {
    self.field = Some(field);
    self
  }

  pub fn config(mut self, config: ExtractionConfig) -> Self {
    self.config = config;
    self
  }

  /// Replace the canonical case table. Validated in [`build`](Self::build).
  pub fn case_table(mut self, table: CaseTable) -> Self {
    self.table = Some(table);
    self
  }

  pub fn build(self) -> Result<ExtractionPipeline<F>, PipelineError> {
    let field = self.field.ok_or(PipelineError::MissingDensityField)?;
    let table = self.table.unwrap_or_default();
    ExtractionPipeline::with_case_table(field, self.config, table)
  }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
