//! Tests for the reference engine.

use pretty_assertions::assert_eq;

use super::*;
use crate::instantiate::instantiate_with_timeout;
use crate::render::block_rms;

fn configured(seed: u32) -> MonoSynth {
    let mut synth = MonoSynth::new(seed);
    synth.configure_offline(RenderFormat::default(), 512).unwrap();
    synth
}

fn render(synth: &mut MonoSynth, blocks: usize) -> Vec<f32> {
    (0..blocks)
        .flat_map(|_| synth.render_block(128).unwrap().samples)
        .collect()
}

fn address(name: &str) -> ParameterAddress {
    ParameterAddressTable::builtin().address_of(name).unwrap()
}

/// Lag in `[min_lag, max_lag]` with the highest normalized autocorrelation.
fn best_lag(x: &[f32], min_lag: usize, max_lag: usize) -> usize {
    let mut best = (0, f64::MIN);
    for lag in min_lag..=max_lag {
        let (mut xy, mut xx, mut yy) = (0.0f64, 0.0f64, 0.0f64);
        for i in lag..x.len() {
            let a = x[i] as f64;
            let b = x[i - lag] as f64;
            xy += a * b;
            xx += a * a;
            yy += b * b;
        }
        let r = xy / (xx * yy).sqrt().max(1e-12);
        if r > best.1 {
            best = (lag, r);
        }
    }
    best.0
}

#[test]
fn test_identity() {
    let synth = MonoSynth::default();
    assert_eq!(synth.name(), ENGINE_NAME);
    assert_eq!(synth.kind(), EngineKind::Instrument);
}

#[test]
fn test_render_requires_configuration() {
    let mut synth = MonoSynth::default();
    assert!(matches!(
        synth.render_block(128),
        Err(EngineError::Render { .. })
    ));
}

#[test]
fn test_configuration_rejects_bad_formats() {
    let mut synth = MonoSynth::default();
    let stereo = RenderFormat {
        sample_rate: 44_100,
        channels: 2,
    };
    assert!(matches!(
        synth.configure_offline(stereo, 512),
        Err(EngineError::Configuration { .. })
    ));
    assert!(synth.configure_offline(RenderFormat::mono(0), 512).is_err());
    assert!(synth.configure_offline(RenderFormat::default(), 0).is_err());
}

#[test]
fn test_block_larger_than_maximum_fails() {
    let mut synth = MonoSynth::new(1);
    synth.configure_offline(RenderFormat::default(), 128).unwrap();
    assert!(synth.render_block(129).is_err());
    assert_eq!(synth.render_block(128).unwrap().samples.len(), 128);
}

#[test]
fn test_silent_before_note() {
    let mut synth = configured(7);
    synth.set_parameter(address("noisefloor"), 0.0);
    let samples = render(&mut synth, 4);
    assert!(samples.iter().all(|&s| s == 0.0));
}

#[test]
fn test_held_note_is_pitched_at_middle_c() {
    let mut synth = configured(7);
    synth.note_on(NoteEvent::default());
    let samples = render(&mut synth, 64);

    let tail = &samples[48 * 128..];
    assert!(block_rms(tail) > 0.01);
    assert!(tail.iter().all(|s| s.abs() <= 1.0));

    // 44100 / 261.63 Hz = 168.6 samples per cycle.
    let lag = best_lag(tail, 40, 250);
    assert!((167..=170).contains(&lag), "lag = {}", lag);
}

#[test]
fn test_release_decays_to_silence() {
    let mut synth = configured(7);
    synth.set_parameter(address("noisefloor"), 0.0);
    synth.set_parameter(address("adsrrelease"), 0.1);
    synth.note_on(NoteEvent::default());
    let held = render(&mut synth, 64);
    synth.note_off(60, 0);
    let tail = render(&mut synth, 400);

    let held_level = block_rms(&held[32 * 128..]);
    let end_level = block_rms(&tail[tail.len() - 128..]);
    assert!(end_level < held_level * 0.001, "held={} end={}", held_level, end_level);
}

#[test]
fn test_note_off_for_other_pitch_is_ignored() {
    let mut synth = configured(7);
    synth.note_on(NoteEvent::default());
    render(&mut synth, 16);
    synth.note_off(61, 0);
    synth.note_off(60, 3);
    assert!(synth.gate);
}

#[test]
fn test_rendering_is_deterministic() {
    let run = |seed| {
        let mut synth = configured(seed);
        synth.set_parameter(address("noisevolume"), 0.6);
        synth.note_on(NoteEvent::default());
        render(&mut synth, 16)
    };
    assert_eq!(run(3), run(3));
    assert_ne!(run(3), run(4));
}

#[test]
fn test_parameter_read_back() {
    let mut synth = configured(7);
    let cutoff = address("filtercutoff");

    assert_eq!(synth.parameter(cutoff), Some(0.5));
    synth.set_parameter(cutoff, 0.2);
    assert_eq!(synth.parameter(cutoff), Some(0.2));
    synth.set_parameter(cutoff, f32::INFINITY);
    assert_eq!(synth.parameter(cutoff), Some(0.2));

    let arp = address("arpenabled");
    synth.set_parameter(arp, 1.0);
    assert_eq!(synth.parameter(arp), None);
}

#[test]
fn test_volume_scales_output() {
    let level = |volume: f32| {
        let mut synth = configured(7);
        synth.set_parameter(address("noisefloor"), 0.0);
        synth.set_parameter(address("volume"), volume);
        synth.note_on(NoteEvent::default());
        let samples = render(&mut synth, 32);
        block_rms(&samples[16 * 128..])
    };
    let loud = level(1.0);
    let quiet = level(0.25);
    assert!((quiet / loud - 0.25).abs() < 0.01, "ratio = {}", quiet / loud);
    assert_eq!(level(0.0), 0.0);
}

#[test]
fn test_gate_vca_ignores_envelope() {
    let mut synth = configured(7);
    synth.set_parameter(address("vcamode"), 0.0);
    synth.set_parameter(address("adsrsustain"), 0.0);
    synth.note_on(NoteEvent::default());
    let samples = render(&mut synth, 64);
    // The amplitude envelope has decayed to zero sustain but the gate holds the VCA open.
    assert!(block_rms(&samples[60 * 128..]) > 0.01);
}

#[test]
fn test_provider_delivers_instrument() {
    let provider = MonoSynthProvider::with_seed(9);
    assert!(provider.describe().contains(ENGINE_NAME));

    let engine = instantiate_with_timeout(&provider, 5).unwrap();
    assert_eq!(engine.name(), ENGINE_NAME);
    assert_eq!(engine.kind(), EngineKind::Instrument);
}
