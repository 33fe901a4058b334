//! Signal analysis properties, checked through the public pipeline.

use patchscope_cli::analysis::signal::{analyze_capture, analyze_window, MeasurementWindow, WindowMetrics};
use patchscope_cli::config::{ProbeConfig, Variant};
use patchscope_cli::probe::render_preset;
use patchscope_tests::fixtures::{sine, write_preset, NO_SECTION, SQUARE_BASS};
use patchscope_tests::TestHarness;
use pretty_assertions::assert_eq;

#[test]
fn test_sine_440_over_minimum_window() {
    let metrics = analyze_window(&sine(440.0, 44100, 600, 0.8));
    assert!((99..=101).contains(&metrics.lag), "lag = {}", metrics.lag);
    assert!((metrics.autocorr - 1.0).abs() <= 0.01, "autocorr = {}", metrics.autocorr);
}

#[test]
fn test_silence_reports_zeros() {
    assert_eq!(analyze_window(&vec![0.0; 4096]), WindowMetrics::default());
}

#[test]
fn test_window_of_42_skips_search() {
    let metrics = analyze_window(&sine(1102.5, 44100, 42, 0.8));
    assert_eq!((metrics.lag, metrics.autocorr), (0, 0.0));
    assert!(metrics.peak > 0.0);
}

#[test]
fn test_rendered_preset_is_pitched() {
    let harness = TestHarness::new();
    let preset = write_preset(harness.path(), "square_bass", SQUARE_BASS);
    let config = ProbeConfig::default();

    let run = render_preset(&preset, &config.plan(Variant::Measure), 10).unwrap();
    let report = analyze_capture(
        run.preset.name.as_str(),
        &run.outcome.capture,
        &config.measure_window(),
    );

    assert_eq!(report.name, "square_bass");
    assert_eq!(report.block_rms.len(), 64);
    assert_eq!(report.measured_blocks, 48..64);
    // Middle C is 168.56 samples per cycle at 44.1 kHz. A hard-edged pulse
    // may line up better after two cycles than after one.
    let cycles = report.metrics.lag as f64 / 168.56;
    assert!(cycles >= 0.99, "lag = {}", report.metrics.lag);
    assert!((cycles - cycles.round()).abs() < 0.01, "lag = {}", report.metrics.lag);
    assert!(report.metrics.autocorr > 0.9);
    let fundamental = report.estimated_frequency_hz * cycles.round();
    assert!((fundamental - 261.63).abs() < 2.0, "f = {}", fundamental);
    assert!(report.metrics.peak >= report.metrics.absmean);
    assert!((0.0..=1.0).contains(&report.metrics.zc_rate));
}

#[test]
fn test_preset_without_section_renders_defaults() {
    let harness = TestHarness::new();
    let preset = write_preset(harness.path(), "foreign", NO_SECTION);
    let config = ProbeConfig::default();

    let run = render_preset(&preset, &config.plan(Variant::Diagnose), 10).unwrap();
    assert!(run.preset.attributes.is_empty());
    assert!(run.outcome.parameters.applied.is_empty());
    assert!(run.outcome.capture.is_complete());

    let window = MeasurementWindow::blocks(48, 64);
    let report = analyze_capture("foreign", &run.outcome.capture, &window);
    assert!(report.metrics.peak > 0.0);
}

#[test]
fn test_capture_analysis_is_idempotent() {
    let harness = TestHarness::new();
    let preset = write_preset(harness.path(), "square_bass", SQUARE_BASS);
    let config = ProbeConfig::default();
    let run = render_preset(&preset, &config.plan(Variant::Measure), 10).unwrap();
    let window = config.measure_window();

    let a = analyze_capture("a", &run.outcome.capture, &window);
    let b = analyze_capture("a", &run.outcome.capture, &window);
    assert_eq!(a, b);
    assert_eq!(a.metrics.autocorr.to_bits(), b.metrics.autocorr.to_bits());
}
