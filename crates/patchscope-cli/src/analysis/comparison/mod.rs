//! Block-by-block comparison of two renders.
//!
//! Both signals are cut into [`COMPARE_BLOCK`] frame blocks (the shorter
//! signal decides the count). Per block we measure level, pitch by
//! autocorrelation and the cross-correlation of the two blocks, then derive:
//!
//! - `energy_ratio`: summed candidate envelope over summed reference envelope
//! - `env_correlation`: Pearson correlation of the two envelopes
//! - `pitch_match_pct`: share of blocks active in both renders whose pitch
//!   estimates agree within [`CompareThresholds::pitch_tolerance`]
//! - `avg_xcorr`: mean block cross-correlation where either render is active

mod types;

#[cfg(test)]
mod tests;

pub use types::{BlockComparison, BlockMetrics, CompareThresholds, ComparisonSummary, Criteria};

use super::round_f64;
use super::signal::{calculate_absmean, calculate_peak, calculate_zero_crossing_rate, search_lags};

/// Frames per compared block.
pub const COMPARE_BLOCK: usize = 128;

/// Shortest lag of the per-block pitch search.
const BLOCK_MIN_LAG: usize = 20;

/// Longest lag of the per-block pitch search.
const BLOCK_MAX_LAG: usize = 500;

const BLOCK_ENERGY_FLOOR: f64 = 1e-12;

/// Standard deviations below this make a correlation undefined (reported as 0).
const DEVIATION_FLOOR: f64 = 1e-10;

/// Total envelope energy below which the reference counts as silent.
const SILENT_ENERGY: f64 = 1e-6;

/// Measures one block.
pub fn block_metrics(block: &[f32], sample_rate: u32) -> BlockMetrics {
    let max_lag = BLOCK_MAX_LAG.min(block.len().saturating_sub(1));
    let periodicity = search_lags(block, BLOCK_MIN_LAG..=max_lag, BLOCK_ENERGY_FLOOR);
    BlockMetrics {
        peak: calculate_peak(block) as f64,
        absmean: calculate_absmean(block),
        zc_rate: calculate_zero_crossing_rate(block),
        autocorr: periodicity.autocorr,
        lag: periodicity.lag,
        freq_hz: round_f64(periodicity.frequency_hz(sample_rate), 1),
    }
}

/// Pearson correlation of two sequences over their common length.
///
/// Returns 0 when either sequence is (nearly) constant.
pub fn pearson<T: Copy + Into<f64>>(a: &[T], b: &[T]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }
    let a: Vec<f64> = a[..n].iter().map(|&v| v.into()).collect();
    let b: Vec<f64> = b[..n].iter().map(|&v| v.into()).collect();

    let mean_a = a.iter().sum::<f64>() / n as f64;
    let mean_b = b.iter().sum::<f64>() / n as f64;

    let mut num = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (&x, &y) in a.iter().zip(&b) {
        num += (x - mean_a) * (y - mean_b);
        var_a += (x - mean_a) * (x - mean_a);
        var_b += (y - mean_b) * (y - mean_b);
    }

    if var_a.sqrt() < DEVIATION_FLOOR || var_b.sqrt() < DEVIATION_FLOOR {
        return 0.0;
    }
    num / (var_a * var_b).sqrt()
}

/// Compares `candidate` against `reference`, both at `sample_rate`.
///
/// With `keep_blocks` the per-block table is included in the summary.
pub fn compare_signals(
    reference: &[f32],
    candidate: &[f32],
    sample_rate: u32,
    thresholds: &CompareThresholds,
    keep_blocks: bool,
) -> ComparisonSummary {
    let block_count = reference.len().min(candidate.len()) / COMPARE_BLOCK;

    let blocks: Vec<BlockComparison> = (0..block_count)
        .map(|b| {
            let span = b * COMPARE_BLOCK..(b + 1) * COMPARE_BLOCK;
            let r = block_metrics(&reference[span.clone()], sample_rate);
            let c = block_metrics(&candidate[span.clone()], sample_rate);
            BlockComparison {
                block: b,
                reference_absmean: round_f64(r.absmean, 6),
                candidate_absmean: round_f64(c.absmean, 6),
                reference_peak: round_f64(r.peak, 6),
                candidate_peak: round_f64(c.peak, 6),
                reference_freq: r.freq_hz,
                candidate_freq: c.freq_hz,
                reference_autocorr: round_f64(r.autocorr, 4),
                candidate_autocorr: round_f64(c.autocorr, 4),
                xcorr: round_f64(pearson(&reference[span.clone()], &candidate[span]), 4),
            }
        })
        .collect();

    let reference_env: Vec<f64> = blocks.iter().map(|b| b.reference_absmean).collect();
    let candidate_env: Vec<f64> = blocks.iter().map(|b| b.candidate_absmean).collect();

    let reference_energy: f64 = reference_env.iter().sum();
    let candidate_energy: f64 = candidate_env.iter().sum();
    let energy_ratio = (reference_energy > SILENT_ENERGY).then(|| candidate_energy / reference_energy);

    let env_correlation = pearson(&reference_env, &candidate_env);
    let pitch_match_pct = pitch_match_pct(&blocks, thresholds);

    let active = thresholds.active_absmean;
    let active_xcorrs: Vec<f64> = blocks
        .iter()
        .filter(|b| b.reference_absmean > active || b.candidate_absmean > active)
        .map(|b| b.xcorr)
        .collect();
    let avg_xcorr = if active_xcorrs.is_empty() {
        0.0
    } else {
        active_xcorrs.iter().sum::<f64>() / active_xcorrs.len() as f64
    };

    let criteria = Criteria {
        env_ok: env_correlation > thresholds.min_env_correlation,
        pitch_ok: pitch_match_pct >= thresholds.min_pitch_match_pct,
        level_ok: energy_ratio.is_some_and(|ratio| {
            (thresholds.min_energy_ratio..=thresholds.max_energy_ratio).contains(&ratio)
        }),
        xcorr_ok: avg_xcorr > thresholds.min_avg_xcorr,
    };

    ComparisonSummary {
        passed: criteria.env_ok && criteria.pitch_ok && criteria.level_ok,
        energy_ratio: energy_ratio.map(|ratio| round_f64(ratio, 4)),
        env_correlation: round_f64(env_correlation, 4),
        pitch_match_pct,
        avg_xcorr: round_f64(avg_xcorr, 4),
        criteria,
        block_count,
        blocks: keep_blocks.then_some(blocks),
    }
}

/// Percentage (0.1 resolution) of blocks active in both renders whose pitch
/// estimates agree.
fn pitch_match_pct(blocks: &[BlockComparison], thresholds: &CompareThresholds) -> f64 {
    let active = thresholds.active_absmean;
    let voiced: Vec<&BlockComparison> = blocks
        .iter()
        .filter(|b| b.reference_absmean > active && b.candidate_absmean > active)
        .collect();
    if voiced.is_empty() {
        return 0.0;
    }

    let agreeing = voiced
        .iter()
        .filter(|b| {
            let (r, c) = (b.reference_freq, b.candidate_freq);
            r > 0.0 && c > 0.0 && r.max(c) / r.min(c) < thresholds.pitch_tolerance
        })
        .count();
    round_f64(100.0 * agreeing as f64 / voiced.len() as f64, 1)
}
