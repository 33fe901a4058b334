//! Deterministic mono WAV encoder.
//!
//! Writes canonical 44-byte-header RIFF/WAVE files: PCM, 16-bit, no extra
//! chunks, no timestamps. Identical samples always produce identical bytes,
//! so the BLAKE3 hash of the PCM payload identifies a render.

mod format;
mod pcm;
mod result;
mod writer;

#[cfg(test)]
mod tests;

pub use format::WavFormat;
pub use pcm::{compute_pcm_hash, extract_pcm_data};
pub use result::WavResult;
pub use writer::{sample_to_pcm16, samples_to_pcm16, write_wav, write_wav_to_vec, HEADER_LEN};
