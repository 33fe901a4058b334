//! Single DCO with saw, pulse, sub-octave and colored noise sources.

use crate::rng::WhiteNoise;

/// Sub-oscillator waveform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubMode {
    /// Square one octave down.
    OctaveSquare,
    /// Square two octaves down.
    TwoOctaveSquare,
    /// 25% pulse two octaves down.
    TwoOctavePulse,
}

/// Per-sample mixer levels and shape controls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorMix {
    /// Saw level (0-1).
    pub saw: f64,
    /// Pulse level (0-1).
    pub pulse: f64,
    /// Sub level (0-1).
    pub sub: f64,
    /// Noise level (0-1).
    pub noise: f64,
    /// Sub waveform.
    pub sub_mode: SubMode,
    /// 0 = low-passed noise, 1 = pure white.
    pub noise_color: f64,
}

/// Phase-accumulating oscillator.
#[derive(Debug, Clone)]
pub struct Oscillator {
    sample_rate: f64,
    phase: f64,
    sub_phase: f64,
    sub2_phase: f64,
    noise_lp: f64,
    noise: WhiteNoise,
}

/// Highest phase increment per sample.
const MAX_INCREMENT: f64 = 0.45;

impl Oscillator {
    /// Creates an oscillator with its own noise stream.
    pub fn new(sample_rate: f64, seed: u32) -> Self {
        Self {
            sample_rate,
            phase: 0.0,
            sub_phase: 0.0,
            sub2_phase: 0.0,
            noise_lp: 0.0,
            noise: WhiteNoise::new(seed, "oscillator-noise"),
        }
    }

    /// Renders one sample at `frequency` Hz with pulse width `pwm`.
    pub fn next_sample(&mut self, frequency: f64, pwm: f64, mix: &OscillatorMix) -> f64 {
        let inc = (frequency / self.sample_rate).clamp(0.0, MAX_INCREMENT);
        self.phase = wrap(self.phase + inc);
        self.sub_phase = wrap(self.sub_phase + inc * 0.5);
        self.sub2_phase = wrap(self.sub2_phase + inc * 0.25);

        let pwm = pwm.clamp(0.05, 0.95);
        let saw = 2.0 * self.phase - 1.0;
        // Slightly asymmetric pulse and sub levels.
        let pulse = if self.phase < pwm { 1.0 } else { -0.95 };
        let sub = match mix.sub_mode {
            SubMode::OctaveSquare => square(self.sub_phase),
            SubMode::TwoOctaveSquare => square(self.sub2_phase),
            SubMode::TwoOctavePulse => {
                if self.sub2_phase < 0.25 {
                    1.0
                } else {
                    -1.0
                }
            }
        };

        let white = self.noise.next_sample() as f64;
        self.noise_lp += 0.085 * (white - self.noise_lp);
        let colored = 0.72 * self.noise_lp + 0.28 * white;
        let noise = colored + (white - colored) * mix.noise_color.clamp(0.0, 1.0);

        let sum = mix.saw * saw + mix.pulse * pulse + mix.sub * sub + mix.noise * noise;
        (1.4 * sum * 0.42).tanh()
    }
}

#[inline]
fn wrap(phase: f64) -> f64 {
    if phase >= 1.0 {
        phase - 1.0
    } else {
        phase
    }
}

#[inline]
fn square(phase: f64) -> f64 {
    if phase < 0.5 {
        0.94
    } else {
        -1.0
    }
}
