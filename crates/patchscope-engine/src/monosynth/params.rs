//! Normalized parameter store and the voicing derived from it.
//!
//! The engine exposes a subset of the parameter address table. Every exposed
//! parameter takes a normalized value in `0..=1`; [`Voicing`] maps those to
//! the physical units the DSP blocks use.

use patchscope_preset::{ParameterAddress, ParameterAddressTable};

use super::oscillator::{OscillatorMix, SubMode};

/// Parameters the reference engine exposes, with their power-on values.
const EXPOSED: &[(&str, f32)] = &[
    ("modulation", 0.0),
    ("volume", 0.8),
    ("masterfinetune", 0.5),
    ("octavetranspose", 0.5),
    ("lforate", 0.12),
    ("lfoinverted", 0.0),
    ("dcolfovalue", 0.0),
    ("dcopwmvalue", 0.5),
    ("dcopwmmode", 0.5),
    ("dcorange", 0.4),
    ("pulsevolume", 0.0),
    ("sawvolume", 1.0),
    ("suboscvolume", 0.0),
    ("suboscmode", 0.0),
    ("noisevolume", 0.0),
    ("whitenoiseenabled", 0.0),
    ("filtercutoff", 0.5),
    ("filterresonance", 0.2),
    ("filterenvelopevalue", 0.3),
    ("filtermodulationvalue", 0.0),
    ("filterkeyboardvalue", 0.5),
    ("vcamode", 1.0),
    ("adsrattack", 0.0),
    ("adsrdecay", 0.3),
    ("adsrsustain", 0.7),
    ("adsrrelease", 0.3),
    ("controlvelocityvolume", 0.0),
    ("noisefloor", 0.5),
];

#[derive(Debug, Clone)]
struct Slot {
    name: &'static str,
    address: ParameterAddress,
    value: f32,
}

/// Current normalized value of every exposed parameter.
#[derive(Debug, Clone)]
pub struct ParameterStore {
    slots: Vec<Slot>,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new(&ParameterAddressTable::builtin())
    }
}

impl ParameterStore {
    /// Creates a store at power-on values, addressed through `table`.
    pub fn new(table: &ParameterAddressTable) -> Self {
        let slots = EXPOSED
            .iter()
            .filter_map(|&(name, value)| {
                table
                    .address_of(name)
                    .map(|address| Slot {
                        name,
                        address,
                        value,
                    })
            })
            .collect();
        Self { slots }
    }

    /// Value at `address`, or `None` if the engine does not expose it.
    pub fn get(&self, address: ParameterAddress) -> Option<f32> {
        self.slots
            .iter()
            .find(|slot| slot.address == address)
            .map(|slot| slot.value)
    }

    /// Writes a value, clamped to `0..=1`.
    ///
    /// Returns false if the address is not exposed or the value is not
    /// finite; the store is unchanged in that case.
    pub fn set(&mut self, address: ParameterAddress, value: f32) -> bool {
        if !value.is_finite() {
            return false;
        }
        match self.slots.iter_mut().find(|slot| slot.address == address) {
            Some(slot) => {
                slot.value = value.clamp(0.0, 1.0);
                true
            }
            None => false,
        }
    }

    /// Value of the parameter called `name`.
    fn named(&self, name: &str) -> f64 {
        self.slots
            .iter()
            .find(|slot| slot.name == name)
            .map_or(0.0, |slot| slot.value as f64)
    }

    /// Number of exposed parameters.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if nothing is exposed.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// How the pulse width is modulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PwmMode {
    /// Follows the amplitude envelope.
    Envelope,
    /// Fixed at the panel value.
    Manual,
    /// Follows the LFO.
    Lfo,
}

/// Physical voice settings derived from a [`ParameterStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct Voicing {
    pub mix: OscillatorMix,
    pub pulse_width: f64,
    pub pwm_mode: PwmMode,
    pub pwm_lfo_depth: f64,
    pub pwm_env_depth: f64,
    pub transpose_semitones: i32,
    pub fine_tune_cents: f64,
    pub lfo_rate_hz: f64,
    pub lfo_inverted: bool,
    pub pitch_lfo_depth: f64,
    /// Cutoff on the panel's perceptual scale (0-1).
    pub cutoff: f64,
    pub resonance: f64,
    pub env_amount: f64,
    pub filter_lfo_depth: f64,
    pub key_follow: f64,
    pub vca_follows_envelope: bool,
    pub attack_s: f64,
    pub decay_s: f64,
    pub sustain: f64,
    pub release_s: f64,
    pub velocity_sensitivity: f64,
    pub output_level: f64,
    /// Amplitude of the constant hiss floor.
    pub hiss_level: f64,
}

impl Voicing {
    /// Derives the voicing from normalized values.
    pub fn from_store(store: &ParameterStore) -> Self {
        let v = |name: &str| store.named(name).clamp(0.0, 1.0);

        let mod_wheel = depth_curve(v("modulation"));
        let pwm_mode = match three_state(v("dcopwmmode")) {
            0 => PwmMode::Envelope,
            1 => PwmMode::Manual,
            _ => PwmMode::Lfo,
        };
        let pwm_value = v("dcopwmvalue");
        let pwm_lfo_depth = match pwm_mode {
            PwmMode::Lfo => depth_curve((pwm_value * 2.0).min(1.0)) * (1.0 + 0.6 * mod_wheel),
            _ => 0.0,
        };
        let pwm_env_depth = match pwm_mode {
            PwmMode::Envelope => pwm_value,
            _ => 0.0,
        };

        let octaves = ((v("octavetranspose") - 0.5) * 4.0).round() as i32 + dco_range_octaves(v("dcorange"));
        let cutoff = v("filtercutoff").sqrt();
        let white_noise = v("whitenoiseenabled") >= 0.5;

        let sub_mode = match three_state(v("suboscmode")) {
            0 => SubMode::OctaveSquare,
            1 => SubMode::TwoOctaveSquare,
            _ => SubMode::TwoOctavePulse,
        };

        Self {
            mix: OscillatorMix {
                saw: v("sawvolume"),
                pulse: v("pulsevolume"),
                sub: v("suboscvolume"),
                noise: v("noisevolume"),
                sub_mode,
                noise_color: match (white_noise, cutoff < 0.85) {
                    (false, _) => 0.0,
                    (true, true) => 0.85,
                    (true, false) => 1.0,
                },
            },
            pulse_width: pwm_value.clamp(0.05, 0.95),
            pwm_mode,
            pwm_lfo_depth,
            pwm_env_depth,
            transpose_semitones: (octaves * 12).clamp(-24, 24),
            fine_tune_cents: (v("masterfinetune") - 0.5) * 200.0,
            lfo_rate_hz: 0.02 + v("lforate") * (40.0 - 0.02),
            lfo_inverted: v("lfoinverted") >= 0.5,
            pitch_lfo_depth: depth_curve(v("dcolfovalue")) * (1.0 + 1.4 * mod_wheel),
            cutoff,
            resonance: v("filterresonance") * 1.2,
            env_amount: v("filterenvelopevalue"),
            filter_lfo_depth: depth_curve(v("filtermodulationvalue")) * (1.0 + 1.2 * mod_wheel),
            key_follow: v("filterkeyboardvalue"),
            vca_follows_envelope: v("vcamode") >= 0.5,
            attack_s: exp_time(v("adsrattack"), 0.001, 4.0),
            decay_s: power_time(v("adsrdecay"), 0.001, 6.0),
            sustain: v("adsrsustain"),
            release_s: power_time(v("adsrrelease"), 0.001, 8.0),
            velocity_sensitivity: v("controlvelocityvolume"),
            output_level: v("volume") * 0.8,
            hiss_level: v("noisefloor").powi(2) * 0.002,
        }
    }

    /// Amplitude scaling for a MIDI velocity.
    pub fn velocity_gain(&self, velocity: u8) -> f64 {
        if self.velocity_sensitivity <= 0.01 {
            return 1.0;
        }
        let shaped = (velocity.min(127) as f64 / 127.0).powf(0.6);
        let floor = 1.0 - 0.75 * self.velocity_sensitivity;
        (floor + (1.0 - floor) * shaped).clamp(0.05, 1.0)
    }
}

/// Filter cutoff in Hz for a note, perceptual cutoff and key tracking amount.
pub fn note_to_cutoff_hz(note: u8, cutoff: f64, key_follow: f64) -> f64 {
    let base = 30.0 + cutoff * cutoff * 15_000.0;
    let octaves = (note as f64 - 60.0) / 12.0;
    (base * 2f64.powf(octaves * key_follow)).clamp(20.0, 18_000.0)
}

/// Equal-tempered frequency of a MIDI note.
pub fn note_to_hz(note: i32) -> f64 {
    440.0 * 2f64.powf((note as f64 - 69.0) / 12.0)
}

/// Modulation depth taper: gentle near zero, steep near one.
pub fn depth_curve(x: f64) -> f64 {
    let x = x.clamp(0.0, 1.0);
    x * x * (2.0 - x)
}

fn three_state(n: f64) -> u8 {
    if n < 0.25 {
        0
    } else if n < 0.75 {
        1
    } else {
        2
    }
}

/// Footage switch: 16' / 8' / 4' / 2'.
fn dco_range_octaves(n: f64) -> i32 {
    if n < 1.0 / 6.0 {
        -1
    } else if n < 0.5 {
        0
    } else if n < 5.0 / 6.0 {
        1
    } else {
        2
    }
}

fn exp_time(n: f64, lo: f64, hi: f64) -> f64 {
    lo * (hi / lo).powf(n)
}

fn power_time(n: f64, lo: f64, hi: f64) -> f64 {
    lo + n.powf(2.2) * (hi - lo)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(name: &str) -> ParameterAddress {
        ParameterAddressTable::builtin().address_of(name).unwrap()
    }

    #[test]
    fn test_store_exposes_known_parameters() {
        let store = ParameterStore::default();
        assert_eq!(store.len(), EXPOSED.len());
        assert_eq!(store.get(address("volume")), Some(0.8));
        assert_eq!(store.get(address("noisefloor")), Some(0.5));
        assert_eq!(store.get(address("arpenabled")), None);
    }

    #[test]
    fn test_store_clamps_and_rejects() {
        let mut store = ParameterStore::default();
        assert!(store.set(address("filtercutoff"), 1.7));
        assert_eq!(store.get(address("filtercutoff")), Some(1.0));
        assert!(!store.set(address("filtercutoff"), f32::NAN));
        assert_eq!(store.get(address("filtercutoff")), Some(1.0));
        assert!(!store.set(address("arpenabled"), 1.0));
    }

    #[test]
    fn test_default_voicing() {
        let voicing = Voicing::from_store(&ParameterStore::default());
        assert_eq!(voicing.mix.saw, 1.0);
        assert_eq!(voicing.transpose_semitones, 0);
        assert_eq!(voicing.fine_tune_cents, 0.0);
        assert_eq!(voicing.pwm_mode, PwmMode::Manual);
        assert!(voicing.vca_follows_envelope);
        assert!((voicing.output_level - 0.64).abs() < 1e-6);
        assert!((voicing.cutoff - 0.5f64.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_time_curves_hit_endpoints() {
        assert!((exp_time(0.0, 0.001, 4.0) - 0.001).abs() < 1e-12);
        assert!((exp_time(1.0, 0.001, 4.0) - 4.0).abs() < 1e-9);
        assert!((power_time(1.0, 0.001, 8.0) - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_octave_switches_transpose() {
        let mut store = ParameterStore::default();
        store.set(address("dcorange"), 1.0);
        store.set(address("octavetranspose"), 1.0);
        // 2' footage plus two octaves up saturates at +24.
        assert_eq!(Voicing::from_store(&store).transpose_semitones, 24);

        store.set(address("dcorange"), 0.0);
        store.set(address("octavetranspose"), 0.5);
        assert_eq!(Voicing::from_store(&store).transpose_semitones, -12);
    }

    #[test]
    fn test_cutoff_mapping() {
        assert!((note_to_cutoff_hz(60, 0.0, 1.0) - 30.0).abs() < 1e-9);
        assert_eq!(note_to_cutoff_hz(60, 1.0, 1.0), 15_030.0);
        assert_eq!(note_to_cutoff_hz(127, 1.0, 1.0), 18_000.0);
        let tracked = note_to_cutoff_hz(72, 0.5, 1.0);
        let untracked = note_to_cutoff_hz(72, 0.5, 0.0);
        assert!((tracked / untracked - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_velocity_gain() {
        let mut store = ParameterStore::default();
        let flat = Voicing::from_store(&store);
        assert_eq!(flat.velocity_gain(1), 1.0);

        store.set(address("controlvelocityvolume"), 1.0);
        let sensitive = Voicing::from_store(&store);
        assert!(sensitive.velocity_gain(20) < sensitive.velocity_gain(120));
        assert_eq!(sensitive.velocity_gain(127), 1.0);
    }

    #[test]
    fn test_note_to_hz() {
        assert!((note_to_hz(69) - 440.0).abs() < 1e-9);
        assert!((note_to_hz(57) - 220.0).abs() < 1e-9);
    }
}
