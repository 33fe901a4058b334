//! Type definitions for render comparison.

use serde::{Deserialize, Serialize};

/// Pass/fail thresholds for a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompareThresholds {
    /// Envelope correlation must exceed this.
    pub min_env_correlation: f64,
    /// Percentage of voiced blocks whose pitch must agree.
    pub min_pitch_match_pct: f64,
    /// Lowest acceptable candidate/reference energy ratio.
    pub min_energy_ratio: f64,
    /// Highest acceptable candidate/reference energy ratio.
    pub max_energy_ratio: f64,
    /// Average cross-correlation must exceed this (reported, not gating).
    pub min_avg_xcorr: f64,
    /// Blocks with a mean absolute level above this count as active.
    pub active_absmean: f64,
    /// Largest frequency ratio still counted as the same pitch.
    pub pitch_tolerance: f64,
}

impl Default for CompareThresholds {
    fn default() -> Self {
        Self {
            min_env_correlation: 0.85,
            min_pitch_match_pct: 70.0,
            min_energy_ratio: 0.2,
            max_energy_ratio: 5.0,
            min_avg_xcorr: 0.5,
            active_absmean: 0.005,
            pitch_tolerance: 1.10,
        }
    }
}

/// Metrics of a single block.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BlockMetrics {
    pub peak: f64,
    pub absmean: f64,
    pub zc_rate: f64,
    pub autocorr: f64,
    pub lag: usize,
    /// Estimated pitch, rounded to 0.1 Hz.
    pub freq_hz: f64,
}

/// Side-by-side metrics for one block index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockComparison {
    pub block: usize,
    pub reference_absmean: f64,
    pub candidate_absmean: f64,
    pub reference_peak: f64,
    pub candidate_peak: f64,
    pub reference_freq: f64,
    pub candidate_freq: f64,
    pub reference_autocorr: f64,
    pub candidate_autocorr: f64,
    /// Normalized cross-correlation of the two blocks.
    pub xcorr: f64,
}

/// Which thresholds were met.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Criteria {
    pub env_ok: bool,
    pub pitch_ok: bool,
    pub level_ok: bool,
    pub xcorr_ok: bool,
}

/// Outcome of comparing a candidate render against a reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSummary {
    /// Envelope, pitch and level criteria all held.
    pub passed: bool,
    /// Candidate energy over reference energy; `None` when the reference is
    /// silent.
    pub energy_ratio: Option<f64>,
    /// Correlation of the two per-block envelopes.
    pub env_correlation: f64,
    /// Percentage of blocks active in both renders whose pitch agrees.
    pub pitch_match_pct: f64,
    /// Mean cross-correlation over blocks active in either render.
    pub avg_xcorr: f64,
    pub criteria: Criteria,
    /// Blocks compared.
    pub block_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocks: Option<Vec<BlockComparison>>,
}
