//! Encoded render.

use std::fs;
use std::io;
use std::path::Path;

use tracing::info;

use super::format::WavFormat;
use super::writer::{samples_to_pcm16, write_wav_to_vec};

/// A mono capture encoded as WAV.
#[derive(Debug, Clone, PartialEq)]
pub struct WavResult {
    /// Complete WAV file bytes.
    pub wav_data: Vec<u8>,
    /// BLAKE3 hash of the PCM payload.
    pub pcm_hash: String,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of samples.
    pub num_samples: usize,
}

impl WavResult {
    /// Encodes mono samples.
    pub fn from_mono(samples: &[f32], sample_rate: u32) -> Self {
        let pcm = samples_to_pcm16(samples);
        let pcm_hash = blake3::hash(&pcm).to_hex().to_string();
        let wav_data = write_wav_to_vec(&WavFormat::mono(sample_rate), &pcm);

        Self {
            wav_data,
            pcm_hash,
            sample_rate,
            num_samples: samples.len(),
        }
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.num_samples as f64 / self.sample_rate as f64
    }

    /// Writes the file to `path`, replacing any existing file.
    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        fs::write(path, &self.wav_data)?;
        info!(
            path = %path.display(),
            samples = self.num_samples,
            pcm_hash = %self.pcm_hash,
            "wrote wav"
        );
        Ok(())
    }
}
