//! Compare command implementation
//!
//! Compares a candidate render against a reference render block by block and
//! prints the verdict as pretty JSON.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::process::ExitCode;
use tracing::info;

use patchscope_engine::wav::compute_pcm_hash;
use patchscope_preset::preset_name;

use crate::analysis::comparison::{compare_signals, CompareThresholds, ComparisonSummary};

/// One side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompareInput {
    pub path: String,
    /// BLAKE3 hash of the PCM payload.
    pub pcm_hash: Option<String>,
    pub sample_rate: u32,
    pub num_samples: usize,
}

/// Complete compare output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompareOutput {
    pub name: String,
    pub reference: CompareInput,
    pub candidate: CompareInput,
    #[serde(flatten)]
    pub summary: ComparisonSummary,
}

/// Run the compare command
///
/// # Arguments
/// * `reference` - Reference WAV
/// * `candidate` - WAV under test
/// * `name` - Name reported in the output (default: candidate file stem)
/// * `thresholds` - Pass/fail thresholds
/// * `blocks` - Include the per-block table
///
/// # Returns
/// Exit code: 0 if the comparison passed, 1 otherwise
pub fn run(
    reference: &Path,
    candidate: &Path,
    name: Option<&str>,
    thresholds: &CompareThresholds,
    blocks: bool,
) -> Result<ExitCode> {
    let output = compare_files(reference, candidate, name, thresholds, blocks)?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    if output.summary.passed {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

/// Reads and compares two WAV files.
pub fn compare_files(
    reference: &Path,
    candidate: &Path,
    name: Option<&str>,
    thresholds: &CompareThresholds,
    blocks: bool,
) -> Result<CompareOutput> {
    let (reference_input, reference_samples) = read_mono_wav(reference)?;
    let (candidate_input, candidate_samples) = read_mono_wav(candidate)?;

    if reference_input.sample_rate != candidate_input.sample_rate {
        anyhow::bail!(
            "Sample rates differ: {} Hz vs {} Hz",
            reference_input.sample_rate,
            candidate_input.sample_rate
        );
    }

    let summary = compare_signals(
        &reference_samples,
        &candidate_samples,
        reference_input.sample_rate,
        thresholds,
        blocks,
    );
    info!(
        blocks = summary.block_count,
        passed = summary.passed,
        "compared renders"
    );

    Ok(CompareOutput {
        name: name
            .map(str::to_string)
            .unwrap_or_else(|| preset_name(candidate)),
        reference: reference_input,
        candidate: candidate_input,
        summary,
    })
}

/// Reads a 16-bit mono WAV file as samples in `[-1, 1)`.
fn read_mono_wav(path: &Path) -> Result<(CompareInput, Vec<f32>)> {
    let data = fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;

    let mut reader = hound::WavReader::new(Cursor::new(data.as_slice()))
        .with_context(|| format!("Failed to parse WAV file: {}", path.display()))?;
    let spec = reader.spec();
    if spec.channels != 1 || spec.bits_per_sample != 16 || spec.sample_format != hound::SampleFormat::Int {
        anyhow::bail!(
            "Unsupported WAV format in {}: {} channels, {}-bit {:?} (expected 16-bit mono PCM)",
            path.display(),
            spec.channels,
            spec.bits_per_sample,
            spec.sample_format
        );
    }

    let samples = reader
        .samples::<i16>()
        .map(|s| s.map(|v| v as f32 / 32768.0))
        .collect::<Result<Vec<f32>, _>>()
        .with_context(|| format!("Failed to decode samples: {}", path.display()))?;

    let input = CompareInput {
        path: path.display().to_string(),
        pcm_hash: compute_pcm_hash(&data),
        sample_rate: spec.sample_rate,
        num_samples: samples.len(),
    };
    Ok((input, samples))
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchscope_engine::WavResult;

    fn write(dir: &Path, name: &str, samples: &[f32], sample_rate: u32) -> std::path::PathBuf {
        let path = dir.join(name);
        WavResult::from_mono(samples, sample_rate).write_to(&path).unwrap();
        path
    }

    fn tone(len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| {
                let decay = (-(i as f32) / 4000.0).exp();
                (i as f32 * 2.0 * std::f32::consts::PI * 440.0 / 44100.0).sin() * 0.7 * decay
            })
            .collect()
    }

    #[test]
    fn test_identical_files_pass() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "ref.wav", &tone(8192), 44100);
        let b = write(dir.path(), "lead.wav", &tone(8192), 44100);

        let output = compare_files(&a, &b, None, &CompareThresholds::default(), false).unwrap();
        assert_eq!(output.name, "lead");
        assert!(output.summary.passed);
        assert_eq!(output.reference.pcm_hash, output.candidate.pcm_hash);
        assert_eq!(output.candidate.num_samples, 8192);

        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["passed"], true);
        assert!(json.get("blocks").is_none());
        assert!(json["criteria"]["env_ok"].as_bool().unwrap());
    }

    #[test]
    fn test_sample_rate_mismatch_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.wav", &tone(1024), 44100);
        let b = write(dir.path(), "b.wav", &tone(1024), 48000);
        let err = compare_files(&a, &b, None, &CompareThresholds::default(), false).unwrap_err();
        assert!(err.to_string().contains("Sample rates differ"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.wav", &tone(1024), 44100);
        let missing = dir.path().join("missing.wav");
        assert!(compare_files(&a, &missing, Some("x"), &CompareThresholds::default(), true).is_err());
    }
}
