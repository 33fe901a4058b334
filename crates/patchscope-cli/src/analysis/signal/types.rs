//! Type definitions for signal analysis.

use std::ops::Range;

use serde::Serialize;

/// Aggregate metrics over one measurement window.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct WindowMetrics {
    /// Maximum absolute sample value.
    pub peak: f64,
    /// Mean absolute sample value.
    pub absmean: f64,
    /// Fraction of adjacent sample pairs that change sign.
    pub zc_rate: f64,
    /// Best normalized autocorrelation, 0 when no lag correlated positively.
    pub autocorr: f64,
    /// Lag of `autocorr` in frames, 0 when none.
    pub lag: usize,
}

/// Result of analyzing one rendered preset.
///
/// Built once per run from the capture and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticReport {
    /// Display name of the preset.
    pub name: String,
    /// Window aggregates.
    #[serde(flatten)]
    pub metrics: WindowMetrics,
    /// `sample_rate / lag`, 0 when there is no lag.
    pub estimated_frequency_hz: f64,
    /// Blocks the window covered.
    pub measured_blocks: Range<usize>,
    /// RMS of every captured block, in render order.
    pub block_rms: Vec<f32>,
}

impl DiagnosticReport {
    /// Whether block `index` was part of the measurement window.
    pub fn is_measured(&self, index: usize) -> bool {
        self.measured_blocks.contains(&index)
    }
}
