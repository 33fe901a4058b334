//! Unit tests for render comparison.

use std::f32::consts::PI;

use pretty_assertions::assert_eq;

use super::*;

const SR: u32 = 44100;

/// A decaying tone, so the block envelope has some shape.
fn tone(frequency: f32, blocks: usize, gain: f32) -> Vec<f32> {
    (0..blocks * COMPARE_BLOCK)
        .map(|i| {
            let envelope = (-(i as f32) / (30.0 * COMPARE_BLOCK as f32)).exp();
            (2.0 * PI * frequency * i as f32 / SR as f32).sin() * 0.8 * envelope * gain
        })
        .collect()
}

#[test]
fn test_identical_renders_pass() {
    let signal = tone(440.0, 32, 1.0);
    let summary = compare_signals(&signal, &signal, SR, &CompareThresholds::default(), true);

    assert!(summary.passed);
    assert_eq!(summary.energy_ratio, Some(1.0));
    assert_eq!(summary.env_correlation, 1.0);
    assert_eq!(summary.pitch_match_pct, 100.0);
    assert_eq!(summary.avg_xcorr, 1.0);
    assert_eq!(
        summary.criteria,
        Criteria {
            env_ok: true,
            pitch_ok: true,
            level_ok: true,
            xcorr_ok: true,
        }
    );
    assert_eq!(summary.block_count, 32);
    let blocks = summary.blocks.unwrap();
    assert_eq!(blocks.len(), 32);
    assert_eq!(blocks[0].reference_freq, 441.0);
}

#[test]
fn test_quieter_candidate_keeps_shape_but_fails_level() {
    let reference = tone(440.0, 32, 1.0);
    let candidate = tone(440.0, 32, 0.1);
    let summary = compare_signals(&reference, &candidate, SR, &CompareThresholds::default(), false);

    assert!(summary.criteria.env_ok);
    assert!(summary.criteria.pitch_ok);
    assert!(!summary.criteria.level_ok);
    assert!(!summary.passed);
    let ratio = summary.energy_ratio.unwrap();
    assert!((ratio - 0.1).abs() < 0.001, "ratio = {}", ratio);
    assert!(summary.blocks.is_none());
}

#[test]
fn test_octave_error_fails_pitch() {
    let reference = tone(440.0, 32, 1.0);
    let candidate = tone(880.0, 32, 1.0);
    let summary = compare_signals(&reference, &candidate, SR, &CompareThresholds::default(), true);

    assert_eq!(summary.pitch_match_pct, 0.0);
    assert!(!summary.criteria.pitch_ok);
    assert!(!summary.passed);
    let blocks = summary.blocks.unwrap();
    assert_eq!(blocks[3].candidate_freq, 882.0);
}

#[test]
fn test_silent_reference_has_no_energy_ratio() {
    let reference = vec![0.0f32; 16 * COMPARE_BLOCK];
    let candidate = tone(440.0, 16, 1.0);
    let summary = compare_signals(&reference, &candidate, SR, &CompareThresholds::default(), false);

    assert_eq!(summary.energy_ratio, None);
    assert!(!summary.criteria.level_ok);
    assert_eq!(summary.env_correlation, 0.0);
    assert_eq!(summary.pitch_match_pct, 0.0);
    assert!(!summary.passed);
}

#[test]
fn test_block_count_follows_shorter_signal() {
    let reference = tone(440.0, 10, 1.0);
    let mut candidate = tone(440.0, 6, 1.0);
    candidate.extend_from_slice(&[0.1; 50]);
    let summary = compare_signals(&reference, &candidate, SR, &CompareThresholds::default(), false);
    assert_eq!(summary.block_count, 6);

    let summary = compare_signals(&[], &[], SR, &CompareThresholds::default(), true);
    assert_eq!(summary.block_count, 0);
    assert_eq!(summary.blocks, Some(Vec::new()));
    assert!(!summary.passed);
}

#[test]
fn test_thresholds_are_configurable() {
    let reference = tone(440.0, 32, 1.0);
    let candidate = tone(440.0, 32, 0.1);
    let lenient = CompareThresholds {
        min_energy_ratio: 0.05,
        ..CompareThresholds::default()
    };
    assert!(compare_signals(&reference, &candidate, SR, &lenient, false).passed);
}

#[test]
fn test_pearson() {
    assert_eq!(pearson(&[1.0f64, 2.0, 3.0], &[2.0, 4.0, 6.0]), 1.0);
    assert_eq!(pearson(&[1.0f64, 2.0, 3.0], &[3.0, 2.0, 1.0]), -1.0);
    assert_eq!(pearson(&[1.0f64, 1.0, 1.0], &[1.0, 2.0, 3.0]), 0.0);
    assert_eq!(pearson::<f64>(&[], &[]), 0.0);
    // Extra trailing values are ignored.
    assert_eq!(pearson(&[1.0f32, 2.0], &[1.0, 2.0, 100.0]), 1.0);
}

#[test]
fn test_block_metrics_short_block() {
    let metrics = block_metrics(&[0.5, -0.5, 0.5, -0.5], SR);
    assert_eq!(metrics.lag, 0);
    assert_eq!(metrics.freq_hz, 0.0);
    assert_eq!(metrics.peak, 0.5);
    assert_eq!(metrics.absmean, 0.5);
    assert_eq!(metrics.zc_rate, 1.0);
}

#[test]
fn test_thresholds_deserialize_with_defaults() {
    let thresholds: CompareThresholds =
        serde_json::from_str(r#"{"min_pitch_match_pct": 50.0}"#).unwrap();
    assert_eq!(thresholds.min_pitch_match_pct, 50.0);
    assert_eq!(thresholds.min_env_correlation, 0.85);
    assert!(serde_json::from_str::<CompareThresholds>(r#"{"bogus": 1}"#).is_err());
}
