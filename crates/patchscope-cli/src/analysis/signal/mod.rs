//! Signal analysis for rendered captures.
//!
//! Everything here is a pure function of the sample buffer: analyzing the same
//! capture twice gives bit-identical results. Accumulation happens in `f64`.
//! Aggregates cover a [`MeasurementWindow`]; the per-block RMS sequence comes
//! from the capture itself.

mod periodicity;
mod quality;
mod temporal;
mod types;
mod window;


pub use periodicity::{Periodicity, MAX_LAG, MIN_LAG};
pub use types::{DiagnosticReport, WindowMetrics};
pub use window::MeasurementWindow;

pub(crate) use periodicity::search_lags;
pub(crate) use quality::{calculate_absmean, calculate_peak};
pub(crate) use temporal::calculate_zero_crossing_rate;

use patchscope_engine::RenderCapture;
use tracing::debug;

use periodicity::dominant_lag;

/// Computes the window aggregates of `samples`.
///
/// All metrics are zero for an empty window.
pub fn analyze_window(samples: &[f32]) -> WindowMetrics {
    let periodicity = dominant_lag(samples);
    WindowMetrics {
        peak: calculate_peak(samples) as f64,
        absmean: calculate_absmean(samples),
        zc_rate: calculate_zero_crossing_rate(samples),
        autocorr: periodicity.autocorr,
        lag: periodicity.lag,
    }
}

/// Dominant periodicity of `samples` over the window lag range.
pub fn analyze_periodicity(samples: &[f32]) -> Periodicity {
    dominant_lag(samples)
}

/// Analyzes a capture over `window`.
pub fn analyze_capture(
    name: impl Into<String>,
    capture: &RenderCapture,
    window: &MeasurementWindow,
) -> DiagnosticReport {
    let samples = capture.samples();
    let range = window.sample_range(capture.frame_size, samples.len());
    let measured_blocks = window.block_span(capture.blocks_rendered());
    let metrics = analyze_window(&samples[range.clone()]);

    let estimated_frequency_hz = Periodicity {
        lag: metrics.lag,
        autocorr: metrics.autocorr,
    }
    .frequency_hz(capture.sample_rate);

    debug!(
        window_start = range.start,
        window_len = range.len(),
        lag = metrics.lag,
        "analyzed measurement window"
    );

    DiagnosticReport {
        name: name.into(),
        metrics,
        estimated_frequency_hz,
        measured_blocks,
        block_rms: capture.block_rms.clone(),
    }
}
