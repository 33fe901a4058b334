//! Reference monophonic engine.
//!
//! One voice: DCO (saw, pulse, sub, noise) into a 4-pole ladder lowpass into
//! a VCA, with a shared ADSR for amplitude and filter and a triangle LFO for
//! pitch, pulse width and cutoff modulation. It implements [`SoundEngine`] so
//! presets can be rendered without an external host, and it is addressed
//! through the same [`ParameterAddressTable`] a host plugin would be.
//!
//! Output is deterministic: all noise comes from seeded PCG32 streams.

mod envelope;
mod filter;
mod lfo;
mod oscillator;
mod params;

#[cfg(test)]
mod tests;

use std::thread;

use patchscope_preset::{ParameterAddress, ParameterAddressTable};
use tracing::debug;

use crate::engine::{EngineKind, NoteEvent, RenderFormat, RenderedBlock, SoundEngine, SAMPLE_RATE};
use crate::error::{EngineError, EngineResult};
use crate::instantiate::{Completion, EngineProvider};
use crate::rng::{WhiteNoise, DEFAULT_SEED};

use envelope::Envelope;
use filter::LadderFilter;
use lfo::Lfo;
use oscillator::Oscillator;
use params::{note_to_cutoff_hz, note_to_hz, PwmMode, Voicing};

pub use params::ParameterStore;

/// Engine name reported to the host.
pub const ENGINE_NAME: &str = "patchscope monosynth";

/// Filter input drive.
const FILTER_DRIVE: f64 = 1.3;

/// Coefficient of the output DC blocker.
const DC_BLOCK_COEFF: f64 = 0.000_05;

/// DSP state that depends on the sample rate.
#[derive(Debug, Clone)]
struct Voice {
    oscillator: Oscillator,
    filter: LadderFilter,
    amp_env: Envelope,
    filter_env: Envelope,
    lfo: Lfo,
    hiss: WhiteNoise,
    dc: f64,
}

impl Voice {
    fn new(sample_rate: f64, seed: u32) -> Self {
        Self {
            oscillator: Oscillator::new(sample_rate, seed),
            filter: LadderFilter::new(sample_rate),
            amp_env: Envelope::new(sample_rate),
            filter_env: Envelope::new(sample_rate),
            lfo: Lfo::new(sample_rate),
            hiss: WhiteNoise::new(seed, "noise-floor"),
            dc: 0.0,
        }
    }

    fn apply(&mut self, voicing: &Voicing) {
        for env in [&mut self.amp_env, &mut self.filter_env] {
            env.set_adsr(
                voicing.attack_s,
                voicing.decay_s,
                voicing.sustain,
                voicing.release_s,
            );
        }
        self.lfo.set_rate(voicing.lfo_rate_hz);
    }
}

/// Built-in reference engine.
#[derive(Debug, Clone)]
pub struct MonoSynth {
    seed: u32,
    params: ParameterStore,
    voicing: Voicing,
    voice: Voice,
    sample_rate: u32,
    max_frames: usize,
    configured: bool,
    note: Option<NoteEvent>,
    gate: bool,
}

impl Default for MonoSynth {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl MonoSynth {
    /// Creates an engine at power-on settings.
    pub fn new(seed: u32) -> Self {
        let params = ParameterStore::new(&ParameterAddressTable::builtin());
        let voicing = Voicing::from_store(&params);
        let mut voice = Voice::new(SAMPLE_RATE as f64, seed);
        voice.apply(&voicing);
        Self {
            seed,
            params,
            voicing,
            voice,
            sample_rate: SAMPLE_RATE,
            max_frames: 0,
            configured: false,
            note: None,
            gate: false,
        }
    }

    /// Current parameter values.
    pub fn parameters(&self) -> &ParameterStore {
        &self.params
    }

    fn next_sample(&mut self, note: NoteEvent) -> f64 {
        let v = &self.voicing;
        let voice = &mut self.voice;

        let mut lfo = voice.lfo.next_value();
        if v.lfo_inverted {
            lfo = -lfo;
        }

        let env_amp = voice.amp_env.next_value();
        let env_filter = voice.filter_env.next_value();
        let vca = if v.vca_follows_envelope {
            env_amp
        } else if self.gate {
            1.0
        } else {
            0.0
        };

        let pitch_mod_st = lfo * v.pitch_lfo_depth * 0.85;
        let frequency = note_to_hz(note.pitch as i32 + v.transpose_semitones)
            * 2f64.powf((pitch_mod_st + v.fine_tune_cents / 100.0) / 12.0);

        let pwm_offset = match v.pwm_mode {
            PwmMode::Lfo => lfo * v.pwm_lfo_depth * 0.42,
            PwmMode::Envelope => (env_amp * 2.0 - 1.0) * v.pwm_env_depth * 0.45,
            PwmMode::Manual => 0.0,
        };
        let pwm = (v.pulse_width + pwm_offset).clamp(0.05, 0.95);
        let osc = voice.oscillator.next_sample(frequency, pwm, &v.mix);

        let cutoff = (v.cutoff + v.env_amount * env_filter + lfo * v.filter_lfo_depth * 0.5)
            .clamp(0.0, 1.0);
        voice.filter.set_params(
            note_to_cutoff_hz(note.pitch, cutoff, v.key_follow),
            v.resonance,
            FILTER_DRIVE,
        );
        let mut y = voice.filter.process(osc);

        voice.dc += (y - voice.dc) * DC_BLOCK_COEFF;
        y -= voice.dc;

        let hiss = voice.hiss.next_sample() as f64 * v.hiss_level;
        (y * vca * v.velocity_gain(note.velocity) * v.output_level + hiss).clamp(-1.0, 1.0)
    }
}

impl SoundEngine for MonoSynth {
    fn name(&self) -> &str {
        ENGINE_NAME
    }

    fn kind(&self) -> EngineKind {
        EngineKind::Instrument
    }

    fn configure_offline(&mut self, format: RenderFormat, max_frames: usize) -> EngineResult<()> {
        if format.channels != 1 {
            return Err(EngineError::configuration(format!(
                "{} channels requested, only mono is supported",
                format.channels
            )));
        }
        if format.sample_rate == 0 || max_frames == 0 {
            return Err(EngineError::configuration(format!(
                "invalid offline format: {} Hz, {} frames",
                format.sample_rate, max_frames
            )));
        }

        self.sample_rate = format.sample_rate;
        self.max_frames = max_frames;
        self.voice = Voice::new(format.sample_rate as f64, self.seed);
        self.voice.apply(&self.voicing);
        self.configured = true;
        debug!(sample_rate = format.sample_rate, max_frames, "monosynth configured");
        Ok(())
    }

    fn parameter(&self, address: ParameterAddress) -> Option<f32> {
        self.params.get(address)
    }

    fn set_parameter(&mut self, address: ParameterAddress, value: f32) {
        if self.params.set(address, value) {
            self.voicing = Voicing::from_store(&self.params);
            self.voice.apply(&self.voicing);
        }
    }

    fn note_on(&mut self, note: NoteEvent) {
        self.note = Some(note);
        self.gate = true;
        self.voice.amp_env.gate_on(1.0);
        self.voice.filter_env.gate_on(1.0);
    }

    fn note_off(&mut self, pitch: u8, channel: u8) {
        let held = matches!(self.note, Some(n) if n.pitch == pitch && n.channel == channel);
        if held && self.gate {
            self.gate = false;
            self.voice.amp_env.gate_off();
            self.voice.filter_env.gate_off();
        }
    }

    fn render_block(&mut self, frames: usize) -> EngineResult<RenderedBlock> {
        if !self.configured {
            return Err(EngineError::render("engine is not configured for offline rendering"));
        }
        if frames > self.max_frames {
            return Err(EngineError::render(format!(
                "{} frames requested, maximum is {}",
                frames, self.max_frames
            )));
        }

        // Before any note the voice is silent but the noise floor still runs.
        let note = self.note.unwrap_or_default();
        let samples = (0..frames)
            .map(|_| self.next_sample(note) as f32)
            .collect();
        Ok(RenderedBlock::success(samples))
    }
}

/// Delivers a [`MonoSynth`] from a worker thread, the way a host delivers a
/// plugin instance.
#[derive(Debug, Clone, Copy)]
pub struct MonoSynthProvider {
    seed: u32,
}

impl Default for MonoSynthProvider {
    fn default() -> Self {
        Self { seed: DEFAULT_SEED }
    }
}

impl MonoSynthProvider {
    /// Creates a provider whose engines use `seed` for their noise sources.
    pub fn with_seed(seed: u32) -> Self {
        Self { seed }
    }
}

impl EngineProvider for MonoSynthProvider {
    fn describe(&self) -> String {
        format!("{} (seed {:#010x})", ENGINE_NAME, self.seed)
    }

    fn instantiate(&self, completion: Completion) {
        let seed = self.seed;
        thread::spawn(move || completion.ready(Box::new(MonoSynth::new(seed))));
    }
}
