//! 4-pole ladder lowpass with OTA-style stage saturation.
//!
//! Cascaded one-pole stages with resonance feedback taken from the last two
//! stages. tanh saturation at the input keeps high resonance stable.

use std::f64::consts::PI;

/// Cutoff range in Hz.
pub const CUTOFF_RANGE: (f64, f64) = (20.0, 18_000.0);

/// Maximum internal resonance. Above 1.0 the feedback steepens toward
/// self-oscillation.
pub const MAX_RESONANCE: f64 = 1.2;

/// Ladder lowpass filter.
#[derive(Debug, Clone)]
pub struct LadderFilter {
    sample_rate: f64,
    g: f64,
    resonance: f64,
    drive: f64,
    stage1: f64,
    stage2: f64,
    stage3: f64,
    stage4: f64,
}

impl LadderFilter {
    /// Creates a filter at 1.2 kHz with light resonance.
    pub fn new(sample_rate: f64) -> Self {
        let mut filter = Self {
            sample_rate,
            g: 0.05,
            resonance: 0.2,
            drive: 1.0,
            stage1: 0.0,
            stage2: 0.0,
            stage3: 0.0,
            stage4: 0.0,
        };
        filter.set_params(1200.0, 0.2, 1.0);
        filter
    }

    /// Updates cutoff (Hz), resonance (0-1.2) and input drive (0.3-4).
    pub fn set_params(&mut self, cutoff: f64, resonance: f64, drive: f64) {
        let cutoff = cutoff.clamp(CUTOFF_RANGE.0, CUTOFF_RANGE.1);
        self.resonance = resonance.clamp(0.0, MAX_RESONANCE);
        self.drive = drive.clamp(0.3, 4.0);
        self.g = (2.0 * PI * cutoff / self.sample_rate).clamp(0.0005, 0.35);
    }

    /// Processes one sample.
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let res = self.resonance;
        // Resonance eats into the passband level.
        let input_gain = 1.0 - 0.22 * res;
        let mut fb_coeff = 1.2;
        if res > 1.0 {
            fb_coeff += (res - 1.0) * 12.0;
        }
        let feedback = fb_coeff * res * (self.stage4 - 0.15 * self.stage3);
        let x = (1.5 * (input * input_gain - feedback) * self.drive).tanh();

        self.stage1 = stage_sat(self.stage1 + self.g * (x - self.stage1));
        self.stage2 = stage_sat(self.stage2 + self.g * (self.stage1 - self.stage2));
        self.stage3 = stage_sat(self.stage3 + self.g * (self.stage2 - self.stage3));
        self.stage4 += self.g * (self.stage3 - self.stage4);

        self.stage4
    }
}

#[inline]
fn stage_sat(x: f64) -> f64 {
    x - 0.06 * x * x * x
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, n: usize) -> impl Iterator<Item = f64> {
        (0..n).map(move |i| (2.0 * PI * freq * i as f64 / 44100.0).sin() * 0.5)
    }

    fn late_energy(filter: &mut LadderFilter, freq: f64) -> f64 {
        let out: Vec<f64> = sine(freq, 8820).map(|s| filter.process(s)).collect();
        out[4410..].iter().map(|x| x * x).sum()
    }

    #[test]
    fn test_lowpass_attenuates_highs() {
        let mut low = LadderFilter::new(44100.0);
        low.set_params(500.0, 0.0, 1.0);
        let mut high = low.clone();

        let pass = late_energy(&mut low, 100.0);
        let stop = late_energy(&mut high, 8000.0);
        assert!(pass > stop * 20.0, "pass={} stop={}", pass, stop);
    }

    #[test]
    fn test_stable_at_max_resonance() {
        let mut filter = LadderFilter::new(44100.0);
        filter.set_params(2000.0, MAX_RESONANCE, 4.0);
        filter.process(1.0);
        for _ in 0..20_000 {
            let s = filter.process(0.0);
            assert!(s.is_finite());
            assert!(s.abs() < 4.0);
        }
    }

    #[test]
    fn test_parameters_are_clamped() {
        let mut filter = LadderFilter::new(44100.0);
        filter.set_params(1.0e6, 9.0, 100.0);
        assert_eq!(filter.g, 0.35);
        assert_eq!(filter.resonance, MAX_RESONANCE);
        assert_eq!(filter.drive, 4.0);

        filter.set_params(0.0, -1.0, 0.0);
        assert!(filter.g > 0.0005 - 1e-12);
        assert_eq!(filter.resonance, 0.0);
        assert_eq!(filter.drive, 0.3);
    }
}
