//! Async Extraction
//!
//! Runs whole epochs on rayon's thread pool so the host thread only polls.
//!
//! # Flow
//!
//! ```text
//! Host Thread                       Async (rayon)
//! ┌────────────────┐
//! │ start(time, m) │
//! │ take pipeline  │
//! └───────┬────────┘
//!         │
//!         ▼
//!                                  ┌───────────────┐
//!                                  │ run_epoch()   │
//!                                  │ (all layers,  │
//!                                  │  collected)   │
//!                                  └───────┬───────┘
//!                                          │
//! ┌────────────────┐                       │
//! │ poll()         │◄──────────────────────┘
//! │ - mesh, report │
//! │ - pipeline back│
//! └────────────────┘
//! ```
//!
//! The pipeline travels with the task and comes back with the result, so
//! buffers are reused across epochs. Cancelling drops the receiver; the
//! next `start` rebuilds the pipeline from the stored configuration.
//!
//! # Usage
//!
//! ```ignore
//! let mut extractor = AsyncExtractor::new(field, config)?;
//!
//! extractor.start(time, Mat4::IDENTITY);
//!
//! // Poll each frame
//! if let Some(output) = extractor.poll() {
//!     upload(&output.mesh);
//! }
//! ```

use std::sync::Arc;

use crossbeam_channel::{self as channel, Receiver, TryRecvError};
use glam::Mat4;
use tracing::{debug, error};

use super::{EpochReport, ExtractionPipeline};
use crate::config::ExtractionConfig;
use crate::density::DensityField;
use crate::error::PipelineError;
use crate::types::MeshOutput;

/// A finished epoch.
#[derive(Debug)]
pub struct EpochOutput {
	/// Every layer of the epoch, collected.
	pub mesh: MeshOutput,
	pub report: EpochReport,
	/// Time the epoch was extracted at.
	pub time: f32,
}

type TaskResult<F> = (EpochOutput, ExtractionPipeline<Arc<F>>);

/// Non-blocking epoch runner.
pub struct AsyncExtractor<F: DensityField + 'static> {
	field: Arc<F>,
	config: ExtractionConfig,
	/// Idle pipeline, `None` while a task owns it or after a cancel.
	pipeline: Option<ExtractionPipeline<Arc<F>>>,
	/// Receiver for pending result.
	receiver: Option<Receiver<TaskResult<F>>>,
}

impl<F: DensityField + 'static> AsyncExtractor<F> {
	/// Validate `config` and build the first pipeline.
	pub fn new(field: F, config: ExtractionConfig) -> Result<Self, PipelineError> {
		Self::from_shared(Arc::new(field), config)
	}

	/// Same as [`new`](Self::new) for a field the host keeps a handle to.
	pub fn from_shared(field: Arc<F>, config: ExtractionConfig) -> Result<Self, PipelineError> {
		let pipeline = ExtractionPipeline::new(Arc::clone(&field), config.clone())?;
		Ok(Self {
			field,
			config,
			pipeline: Some(pipeline),
			receiver: None,
		})
	}

	pub fn config(&self) -> &ExtractionConfig {
		&self.config
	}

	/// Check if a task is running.
	pub fn is_busy(&self) -> bool {
		self.receiver.is_some()
	}

	/// Start one epoch at `time`.
	///
	/// Returns `true` if started, `false` if already busy.
	pub fn start(&mut self, time: f32, transform: Mat4) -> bool {
		if self.is_busy() {
			return false;
		}

		let mut pipeline = match self.pipeline.take() {
			Some(pipeline) => pipeline,
			None => match ExtractionPipeline::new(Arc::clone(&self.field), self.config.clone()) {
				Ok(pipeline) => pipeline,
				Err(err) => {
					error!(%err, "failed to rebuild extraction pipeline");
					return false;
				}
			},
		};

		let (sender, receiver) = channel::bounded(1);
		self.receiver = Some(receiver);

		rayon::spawn(move || {
			let output = run_extraction(&mut pipeline, time, transform);
			// Ignore send error (receiver dropped = cancelled)
			let _ = sender.send((output, pipeline));
		});

		true
	}

	/// Poll for the result (non-blocking).
	///
	/// Returns `Some(output)` when complete, `None` if still running or idle.
	pub fn poll(&mut self) -> Option<EpochOutput> {
		let receiver = self.receiver.as_ref()?;

		match receiver.try_recv() {
			Ok(result) => Some(self.finish(result)),
			Err(TryRecvError::Empty) => None,
			Err(TryRecvError::Disconnected) => {
				self.receiver = None;
				None
			}
		}
	}

	/// Block until the pending task finishes.
	///
	/// Returns `None` if nothing was running.
	pub fn wait(&mut self) -> Option<EpochOutput> {
		let receiver = self.receiver.as_ref()?;

		match receiver.recv() {
			Ok(result) => Some(self.finish(result)),
			Err(_) => {
				self.receiver = None;
				None
			}
		}
	}

	/// Cancel pending task. Its result is discarded.
	pub fn cancel(&mut self) {
		if self.receiver.take().is_some() {
			debug!("cancelled pending extraction");
		}
	}

	fn finish(&mut self, (output, pipeline): TaskResult<F>) -> EpochOutput {
		self.receiver = None;
		self.pipeline = Some(pipeline);
		output
	}
}

/// Run one epoch into a fresh mesh (called on worker thread).
#[cfg_attr(feature = "instrument", tracing::instrument(skip_all, name = "pipeline::run_extraction"))]
fn run_extraction<F: DensityField>(
	pipeline: &mut ExtractionPipeline<F>,
	time: f32,
	transform: Mat4,
) -> EpochOutput {
	let mut collector = crate::sink::MeshCollector::new();
	let report = pipeline.run_epoch(time, transform, &mut collector);
	EpochOutput {
		mesh: collector.into_mesh(),
		report,
		time,
	}
}

#[cfg(test)]
#[path = "async_extract_test.rs"]
mod async_extract_test;
