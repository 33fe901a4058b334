//! Offline render integration tests against the reference engine.

use std::io::Cursor;

use patchscope_engine::{
    block_rms, instantiate_with_timeout, MonoSynthProvider, OfflineRenderController, RenderPlan,
    RenderState, WavResult,
};
use patchscope_preset::{ParameterAddressTable, PresetAttributes};

const PRESET: &str = r#"<?xml version="1.0"?>
<tal curprogram="0" version="1.7">
  <programs>
    <program programname="Square Bass" volume="0.5" sawvolume="0.0" pulsevolume="1.0"
             dcopwmvalue="0.5" filtercutoff="0.6" filterresonance="0.1"
             adsrattack="0.0" adsrdecay="0.2" adsrsustain="0.8" adsrrelease="0.1"
             lfowaveform="0.0" curprogram="0"/>
  </programs>
</tal>"#;

fn render(plan: &RenderPlan, attributes: &PresetAttributes) -> patchscope_engine::RenderOutcome {
    let engine = instantiate_with_timeout(&MonoSynthProvider::default(), 10).unwrap();
    OfflineRenderController::new(engine)
        .run(plan, attributes, &ParameterAddressTable::builtin())
        .unwrap()
}

#[test]
fn test_preset_render_reports_parameters() {
    let attributes = PresetAttributes::from_text(PRESET);
    let outcome = render(&RenderPlan::held(64), &attributes);

    let report = &outcome.parameters;
    let volume = report.find("volume").unwrap();
    assert_eq!((volume.before, volume.after), (0.8, 0.5));
    let saw = report.find("sawvolume").unwrap();
    assert_eq!((saw.before, saw.after), (1.0, 0.0));

    // Known to the table, not exposed by the engine.
    assert!(report.unsupported.iter().any(|p| p.name == "lfowaveform"));
    // Not in the table at all.
    assert_eq!(report.unmapped, vec!["curprogram".to_string()]);

    let capture = &outcome.capture;
    assert_eq!(capture.state, RenderState::Complete);
    assert_eq!(capture.samples().len(), 64 * 128);
    assert!(capture.block_rms[63] > 0.01);
}

#[test]
fn test_empty_preset_still_renders() {
    let outcome = render(&RenderPlan::held(16), &PresetAttributes::from_text("garbage"));
    assert!(outcome.parameters.applied.is_empty());
    assert!(outcome.capture.is_complete());
    assert!(block_rms(outcome.capture.samples()) > 0.0);
}

#[test]
fn test_release_tail_is_quieter_than_sustain() {
    let attributes = PresetAttributes::from_text(PRESET);
    let outcome = render(&RenderPlan::with_release(96, 64), &attributes);

    let capture = outcome.capture;
    assert_eq!(capture.released_at_block, Some(64));
    assert_eq!(capture.blocks_rendered(), 96);
    assert!(capture.block_rms[95] < capture.block_rms[63] * 0.5);
    assert!((capture.duration_seconds() - 96.0 * 128.0 / 44100.0).abs() < 1e-9);
}

#[test]
fn test_renders_are_reproducible() {
    let attributes = PresetAttributes::from_text(PRESET);
    let plan = RenderPlan::with_release(32, 16);

    let a = WavResult::from_mono(render(&plan, &attributes).capture.samples(), 44100);
    let b = WavResult::from_mono(render(&plan, &attributes).capture.samples(), 44100);
    assert_eq!(a.pcm_hash, b.pcm_hash);
}

#[test]
fn test_capture_survives_wav_round_trip() {
    let outcome = render(&RenderPlan::held(8), &PresetAttributes::from_text(PRESET));
    let wav = WavResult::from_mono(outcome.capture.samples(), outcome.capture.sample_rate);

    let mut reader = hound::WavReader::new(Cursor::new(wav.wav_data)).unwrap();
    let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(decoded.len(), 8 * 128);
    for (&s, &pcm) in outcome.capture.samples().iter().zip(&decoded) {
        assert!((s - pcm as f32 / 32767.0).abs() <= 1.0 / 32767.0 + 1e-6);
    }
}
