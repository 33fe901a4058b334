//! Exponential ADSR envelope.

/// Shortest and longest stage time in seconds.
const TIME_RANGE: (f64, f64) = (0.0005, 10.0);

/// Envelope stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Not sounding.
    Idle,
    /// Rising toward the velocity level.
    Attack,
    /// Falling toward the sustain level.
    Decay,
    /// Holding the sustain level.
    Sustain,
    /// Falling toward zero after gate-off.
    Release,
}

/// One-pole ADSR with overshoot-free stage transitions.
#[derive(Debug, Clone)]
pub struct Envelope {
    sample_rate: f64,
    attack: f64,
    decay: f64,
    sustain: f64,
    release: f64,
    velocity: f64,
    value: f64,
    stage: Stage,
}

impl Envelope {
    /// Creates an idle envelope with 10 ms / 120 ms / 0.7 / 200 ms.
    pub fn new(sample_rate: f64) -> Self {
        Self {
            sample_rate,
            attack: 0.01,
            decay: 0.12,
            sustain: 0.7,
            release: 0.2,
            velocity: 1.0,
            value: 0.0,
            stage: Stage::Idle,
        }
    }

    /// Sets stage times (seconds) and sustain level.
    pub fn set_adsr(&mut self, attack: f64, decay: f64, sustain: f64, release: f64) {
        self.attack = attack.clamp(TIME_RANGE.0, TIME_RANGE.1);
        self.decay = decay.clamp(TIME_RANGE.0, TIME_RANGE.1);
        self.sustain = sustain.clamp(0.0, 1.0);
        self.release = release.clamp(TIME_RANGE.0, TIME_RANGE.1);
    }

    /// Starts the attack from the current level.
    pub fn gate_on(&mut self, velocity: f64) {
        self.velocity = velocity.clamp(0.0, 1.0);
        self.stage = Stage::Attack;
    }

    /// Starts the release from the current level.
    pub fn gate_off(&mut self) {
        if self.stage != Stage::Idle {
            self.stage = Stage::Release;
        }
    }

    #[cfg(test)]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Advances one sample and returns the level.
    pub fn next_value(&mut self) -> f64 {
        match self.stage {
            Stage::Attack => {
                let target = self.velocity;
                self.value += (target - self.value) * self.rate(self.attack) * 1.8;
                if self.value >= target - 0.001 {
                    self.value = target;
                    self.stage = Stage::Decay;
                }
            }
            Stage::Decay => {
                let target = self.sustain * self.velocity;
                self.value += (target - self.value) * self.rate(self.decay) * 2.0;
                if self.value <= target + 0.001 {
                    self.value = target;
                    self.stage = Stage::Sustain;
                }
            }
            Stage::Sustain => self.value = self.sustain * self.velocity,
            Stage::Release => {
                self.value -= self.value * self.rate(self.release) * 2.0;
                if self.value <= 0.0001 {
                    self.value = 0.0;
                    self.stage = Stage::Idle;
                }
            }
            Stage::Idle => self.value = 0.0,
        }
        self.value = self.value.clamp(0.0, 1.0);
        self.value
    }

    fn rate(&self, seconds: f64) -> f64 {
        1.0 / (seconds * self.sample_rate)
    }
}
