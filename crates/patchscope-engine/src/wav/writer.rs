//! RIFF/WAVE serialization and sample conversion.

use std::io::{self, Write};

use super::format::WavFormat;

/// Size of the canonical header in bytes.
pub const HEADER_LEN: usize = 44;

/// Builds the canonical header for `data_size` bytes of PCM.
fn header(format: &WavFormat, data_size: u32) -> [u8; HEADER_LEN] {
    let mut h = [0u8; HEADER_LEN];
    // RIFF size excludes the 8-byte RIFF preamble.
    let riff_size = 36u32.saturating_add(data_size);

    h[0..4].copy_from_slice(b"RIFF");
    h[4..8].copy_from_slice(&riff_size.to_le_bytes());
    h[8..12].copy_from_slice(b"WAVE");

    h[12..16].copy_from_slice(b"fmt ");
    h[16..20].copy_from_slice(&16u32.to_le_bytes());
    h[20..22].copy_from_slice(&1u16.to_le_bytes()); // PCM
    h[22..24].copy_from_slice(&format.channels.to_le_bytes());
    h[24..28].copy_from_slice(&format.sample_rate.to_le_bytes());
    h[28..32].copy_from_slice(&format.byte_rate().to_le_bytes());
    h[32..34].copy_from_slice(&format.block_align().to_le_bytes());
    h[34..36].copy_from_slice(&format.bits_per_sample.to_le_bytes());

    h[36..40].copy_from_slice(b"data");
    h[40..44].copy_from_slice(&data_size.to_le_bytes());
    h
}

/// Writes a complete WAV file.
///
/// Fails with [`io::ErrorKind::InvalidInput`] if the payload does not fit a
/// 32-bit RIFF size.
pub fn write_wav<W: Write>(writer: &mut W, format: &WavFormat, pcm_data: &[u8]) -> io::Result<()> {
    let data_size = u32::try_from(pcm_data.len())
        .ok()
        .filter(|size| size.checked_add(36).is_some())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} bytes of PCM exceed the RIFF size limit", pcm_data.len()),
            )
        })?;

    writer.write_all(&header(format, data_size))?;
    writer.write_all(pcm_data)?;
    Ok(())
}

/// Encodes a complete WAV file into memory.
///
/// Payloads beyond the 32-bit RIFF limit get a saturated size field.
pub fn write_wav_to_vec(format: &WavFormat, pcm_data: &[u8]) -> Vec<u8> {
    let data_size = u32::try_from(pcm_data.len()).unwrap_or(u32::MAX - 36);
    let mut buffer = Vec::with_capacity(HEADER_LEN + pcm_data.len());
    buffer.extend_from_slice(&header(format, data_size));
    buffer.extend_from_slice(pcm_data);
    buffer
}

/// Converts one sample to 16-bit PCM.
///
/// Scales by 32767 and truncates toward zero, then clamps to the `i16`
/// range. Non-finite samples encode as 0.
#[inline]
pub fn sample_to_pcm16(sample: f32) -> i16 {
    if !sample.is_finite() {
        return 0;
    }
    let scaled = (sample * 32767.0) as i32;
    scaled.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

/// Converts samples to little-endian 16-bit PCM bytes.
pub fn samples_to_pcm16(samples: &[f32]) -> Vec<u8> {
    let mut pcm = Vec::with_capacity(samples.len() * 2);
    for &sample in samples {
        pcm.extend_from_slice(&sample_to_pcm16(sample).to_le_bytes());
    }
    pcm
}
