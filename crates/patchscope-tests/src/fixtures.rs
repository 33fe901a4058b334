//! Preset fixtures.
//!
//! Builds preset containers in the shape the extractor understands: a `<tal>`
//! section whose first `<program>` element carries the parameters.

use std::fs;
use std::path::{Path, PathBuf};

/// A square bass: pulse only, moderately open filter, short release.
pub const SQUARE_BASS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<tal curprogram="0" version="1.7">
  <programs>
    <program programname="Square Bass" volume="0.5" sawvolume="0.0" pulsevolume="1.0"
             dcopwmvalue="0.5" filtercutoff="0.6" filterresonance="0.1"
             adsrattack="0.0" adsrdecay="0.2" adsrsustain="0.8" adsrrelease="0.1"
             noisefloor="0.0" lfowaveform="0.0" curprogram="0"/>
  </programs>
</tal>"#;

/// A container with no `<tal>` section at all.
pub const NO_SECTION: &str = "<?xml version=\"1.0\"?>\n<preset format=\"other\"/>\n";

/// Builder for a single-program preset.
#[derive(Debug, Clone, Default)]
pub struct PresetFixture {
    program_name: Option<String>,
    attributes: Vec<(String, String)>,
    self_closing: bool,
}

impl PresetFixture {
    /// Creates an empty program.
    pub fn new() -> Self {
        Self {
            self_closing: true,
            ..Self::default()
        }
    }

    /// Sets the `programname` attribute.
    pub fn program_name(mut self, name: &str) -> Self {
        self.program_name = Some(name.to_string());
        self
    }

    /// Adds a numeric attribute.
    pub fn param(mut self, name: &str, value: f32) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    /// Adds an attribute with a verbatim value (for malformed numbers).
    pub fn raw(mut self, name: &str, value: &str) -> Self {
        self.attributes.push((name.to_string(), value.to_string()));
        self
    }

    /// Writes the program as `<program ...></program>` instead of
    /// `<program .../>`.
    pub fn open_element(mut self) -> Self {
        self.self_closing = false;
        self
    }

    /// Container text.
    pub fn build(&self) -> String {
        let mut program = String::from("<program");
        if let Some(name) = &self.program_name {
            program.push_str(&format!(" programname=\"{}\"", name));
        }
        for (name, value) in &self.attributes {
            program.push_str(&format!(" {}=\"{}\"", name, value));
        }
        program.push_str(if self.self_closing { "/>" } else { "></program>" });

        format!(
            "<?xml version=\"1.0\"?>\n<tal curprogram=\"0\" version=\"1.7\">\n  <programs>\n    {}\n  </programs>\n</tal>\n",
            program
        )
    }

    /// Writes the container to `dir/<name>.vstpreset`.
    pub fn write(&self, dir: &Path, name: &str) -> PathBuf {
        write_preset(dir, name, &self.build())
    }
}

/// Writes `text` to `dir/<name>.vstpreset`.
pub fn write_preset(dir: &Path, name: &str, text: &str) -> PathBuf {
    let path = dir.join(format!("{}.vstpreset", name));
    fs::write(&path, text).expect("Failed to write preset fixture");
    path
}

/// A sine wave.
pub fn sine(frequency: f64, sample_rate: u32, len: usize, amplitude: f64) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            ((2.0 * std::f64::consts::PI * frequency * t).sin() * amplitude) as f32
        })
        .collect()
}
