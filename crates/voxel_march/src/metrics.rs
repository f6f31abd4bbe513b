//! Engine-agnostic extraction statistics.
//!
//! Feature-gated and runtime-toggled to ensure zero overhead when disabled.
//!
//! # Usage
//!
//! ```ignore
//! use voxel_march::metrics::COLLECT_METRICS;
//!
//! // Compile with --features metrics
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! let report = pipeline.run_epoch(time, transform, &mut sink);
//! println!("{:.1} us avg", pipeline.metrics().avg_epoch_us());
//! ```

use std::collections::VecDeque;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;
use std::sync::atomic::AtomicBool;

use crate::pipeline::EpochReport;

/// Runtime toggle for metrics collection.
/// Set to false to disable metrics gathering at runtime.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
    #[cfg(feature = "metrics")]
    {
        COLLECT_METRICS.load(Ordering::Relaxed)
    }
    #[cfg(not(feature = "metrics"))]
    {
        false
    }
}

/// Fixed-size history, oldest values evicted first.
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    buffer: VecDeque<T>,
    capacity: usize,
}

impl<T> RollingWindow<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new value, evicting the oldest if at capacity.
    pub fn push(&mut self, value: T) {
        if self.capacity == 0 {
            return;
        }
        if self.buffer.len() >= self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(value);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Iterate over values (oldest to newest).
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buffer.iter()
    }

    pub fn last(&self) -> Option<&T> {
        self.buffer.back()
    }
}

impl RollingWindow<u64> {
    pub fn sum(&self) -> u64 {
        self.buffer.iter().sum()
    }

    pub fn average(&self) -> f64 {
        if self.buffer.is_empty() {
            0.0
        } else {
            self.sum() as f64 / self.buffer.len() as f64
        }
    }

    pub fn min_max(&self) -> Option<(u64, u64)> {
        let min = self.buffer.iter().min()?;
        let max = self.buffer.iter().max()?;
        Some((*min, *max))
    }
}

impl Default for RollingWindow<u64> {
    fn default() -> Self {
        Self::new(128) // ~2 seconds of epochs at 60fps
    }
}

/// Per-pipeline epoch statistics.
#[derive(Debug, Clone, Default)]
pub struct ExtractionMetrics {
    /// Epoch wall time in microseconds.
    pub epoch_timings: RollingWindow<u64>,
    /// Triangles produced per epoch.
    pub triangles: RollingWindow<u64>,
    /// Compacted cells per epoch (compacted mode only).
    pub compacted_cells: RollingWindow<u64>,

    pub last_epoch_us: u64,
    pub last_layers: u32,

    // Cumulative, survive reset()
    pub total_epochs: u64,
    pub total_triangles: u64,
    /// Appends rejected because the output buffer was full.
    pub total_dropped: u64,
}

impl ExtractionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear rolling windows. Cumulative totals are kept.
    pub fn reset(&mut self) {
        self.epoch_timings.clear();
        self.triangles.clear();
        self.compacted_cells.clear();
        self.last_epoch_us = 0;
        self.last_layers = 0;
    }

    /// Record one finished epoch.
    pub fn record_epoch(&mut self, report: &EpochReport) {
        if !is_enabled() {
            return;
        }

        self.epoch_timings.push(report.elapsed_us);
        self.triangles.push(report.triangle_count as u64);
        self.compacted_cells.push(report.compacted_cells as u64);
        self.last_epoch_us = report.elapsed_us;
        self.last_layers = report.layers;

        self.total_epochs += 1;
        self.total_triangles += report.triangle_count as u64;
        self.total_dropped += report.dropped as u64;
    }

    pub fn avg_epoch_us(&self) -> f64 {
        self.epoch_timings.average()
    }

    pub fn avg_triangles(&self) -> f64 {
        self.triangles.average()
    }
}

#[cfg(test)]
#[path = "metrics_test.rs"]
mod metrics_test;
