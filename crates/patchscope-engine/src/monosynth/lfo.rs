//! Free-running triangle LFO.

/// Rate range in Hz.
pub const RATE_RANGE: (f64, f64) = (0.02, 40.0);

/// Triangle LFO with output in `[-1, 1]`.
#[derive(Debug, Clone)]
pub struct Lfo {
    sample_rate: f64,
    rate: f64,
    phase: f64,
}

impl Lfo {
    /// Creates a 5 Hz LFO at phase zero.
    pub fn new(sample_rate: f64) -> Self {
        Self {
            sample_rate,
            rate: 5.0,
            phase: 0.0,
        }
    }

    /// Sets the rate in Hz.
    pub fn set_rate(&mut self, rate: f64) {
        self.rate = rate.clamp(RATE_RANGE.0, RATE_RANGE.1);
    }

    /// Advances one sample.
    #[inline]
    pub fn next_value(&mut self) -> f64 {
        self.phase += self.rate / self.sample_rate;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        let x = self.phase;
        if x < 0.5 {
            4.0 * x - 1.0
        } else {
            3.0 - 4.0 * x
        }
    }
}
