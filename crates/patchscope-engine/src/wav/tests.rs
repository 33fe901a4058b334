//! Tests for the WAV encoder.

use std::io::Cursor;

use pretty_assertions::assert_eq;

use super::format::WavFormat;
use super::pcm::{compute_pcm_hash, extract_pcm_data};
use super::result::WavResult;
use super::writer::{sample_to_pcm16, samples_to_pcm16, write_wav, write_wav_to_vec, HEADER_LEN};

fn u16_at(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn u32_at(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

#[test]
fn test_format_derived_sizes() {
    let format = WavFormat::mono(44100);
    assert_eq!(format.bytes_per_sample(), 2);
    assert_eq!(format.block_align(), 2);
    assert_eq!(format.byte_rate(), 88200);
}

#[test]
fn test_header_layout() {
    let wav = WavResult::from_mono(&[0.0; 100], 44100).wav_data;

    assert_eq!(wav.len(), HEADER_LEN + 200);
    assert_eq!(&wav[0..4], b"RIFF");
    assert_eq!(u32_at(&wav, 4), 36 + 200);
    assert_eq!(&wav[8..12], b"WAVE");
    assert_eq!(&wav[12..16], b"fmt ");
    assert_eq!(u32_at(&wav, 16), 16);
    assert_eq!(u16_at(&wav, 20), 1);
    assert_eq!(u16_at(&wav, 22), 1);
    assert_eq!(u32_at(&wav, 24), 44100);
    assert_eq!(u32_at(&wav, 28), 88200);
    assert_eq!(u16_at(&wav, 32), 2);
    assert_eq!(u16_at(&wav, 34), 16);
    assert_eq!(&wav[36..40], b"data");
    assert_eq!(u32_at(&wav, 40), 200);
}

#[test]
fn test_empty_capture_is_header_only() {
    let result = WavResult::from_mono(&[], 44100);
    assert_eq!(result.wav_data.len(), HEADER_LEN);
    assert_eq!(u32_at(&result.wav_data, 4), 36);
    assert_eq!(u32_at(&result.wav_data, 40), 0);
    assert_eq!(result.duration_seconds(), 0.0);
}

#[test]
fn test_sample_conversion_truncates_and_clamps() {
    assert_eq!(sample_to_pcm16(0.0), 0);
    assert_eq!(sample_to_pcm16(1.0), 32767);
    assert_eq!(sample_to_pcm16(-1.0), -32767);
    assert_eq!(sample_to_pcm16(2.0), 32767);
    assert_eq!(sample_to_pcm16(-2.0), -32768);
    // 0.5 * 32767 = 16383.5, truncated toward zero.
    assert_eq!(sample_to_pcm16(0.5), 16383);
    assert_eq!(sample_to_pcm16(-0.5), -16383);
    assert_eq!(sample_to_pcm16(f32::NAN), 0);
    assert_eq!(sample_to_pcm16(f32::INFINITY), 0);
    assert_eq!(sample_to_pcm16(f32::NEG_INFINITY), 0);
}

#[test]
fn test_samples_to_pcm16_is_little_endian() {
    assert_eq!(samples_to_pcm16(&[1.0, -1.0]), vec![0xff, 0x7f, 0x01, 0x80]);
}

#[test]
fn test_streaming_and_in_memory_writers_agree() {
    let pcm = samples_to_pcm16(&[0.1, -0.2, 0.3]);
    let format = WavFormat::mono(22050);

    let mut streamed = Vec::new();
    write_wav(&mut streamed, &format, &pcm).unwrap();
    assert_eq!(streamed, write_wav_to_vec(&format, &pcm));
}

#[test]
fn test_round_trip_through_hound() {
    let samples: Vec<f32> = (0..1000)
        .map(|i| (i as f32 * 0.05).sin() * 0.9)
        .collect();
    let result = WavResult::from_mono(&samples, 44100);

    let mut reader = hound::WavReader::new(Cursor::new(result.wav_data)).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_rate, 44100);
    assert_eq!(spec.bits_per_sample, 16);
    assert_eq!(spec.sample_format, hound::SampleFormat::Int);

    let decoded: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(decoded.len(), samples.len());
    for (&original, &pcm) in samples.iter().zip(&decoded) {
        assert!((original - pcm as f32 / 32767.0).abs() <= 1.0 / 32767.0 + 1e-6);
    }
}

#[test]
fn test_pcm_hash_identifies_payload() {
    let a = WavResult::from_mono(&[0.25; 64], 44100);
    let b = WavResult::from_mono(&[0.25; 64], 44100);
    let c = WavResult::from_mono(&[0.26; 64], 44100);

    assert_eq!(a, b);
    assert_ne!(a.pcm_hash, c.pcm_hash);
    assert_eq!(a.pcm_hash.len(), 64);
    assert_eq!(compute_pcm_hash(&a.wav_data), Some(a.pcm_hash.clone()));
}

#[test]
fn test_extract_skips_foreign_chunks() {
    let pcm = samples_to_pcm16(&[0.5, -0.5]);
    let mut wav = Vec::new();
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&0u32.to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"LIST");
    wav.extend_from_slice(&3u32.to_le_bytes());
    wav.extend_from_slice(&[1, 2, 3, 0]); // odd size plus pad byte
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&(pcm.len() as u32).to_le_bytes());
    wav.extend_from_slice(&pcm);

    assert_eq!(extract_pcm_data(&wav), Some(pcm.as_slice()));
}

#[test]
fn test_extract_rejects_invalid_input() {
    assert_eq!(extract_pcm_data(b"not a wav file at all"), None);

    let mut truncated = WavResult::from_mono(&[0.1; 10], 44100).wav_data;
    truncated.truncate(HEADER_LEN + 5);
    assert_eq!(extract_pcm_data(&truncated), None);
}

#[test]
fn test_write_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("render.wav");
    let result = WavResult::from_mono(&[0.0, 0.5, -0.5], 44100);

    result.write_to(&path).unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), result.wav_data);

    let missing = dir.path().join("no-such-dir").join("render.wav");
    assert!(result.write_to(&missing).is_err());
}
