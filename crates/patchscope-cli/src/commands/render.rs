//! Render command implementation
//!
//! Renders a preset (note held, then released) and writes the capture as a
//! 16-bit mono WAV file.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use patchscope_engine::WavResult;

use crate::config::{ProbeConfig, Variant};
use crate::probe::render_preset;

/// Run the render command
///
/// # Arguments
/// * `path` - Preset file
/// * `output` - WAV file to write
/// * `config` - Probe configuration
/// * `timeout_secs` - Instantiation timeout override
///
/// # Returns
/// Exit code: 0 once the render completed. A failed WAV write is reported
/// on stderr but leaves the exit code unchanged.
pub fn run(
    path: &Path,
    output: &Path,
    config: &ProbeConfig,
    timeout_secs: Option<u64>,
) -> Result<ExitCode> {
    let plan = config.plan(Variant::Render);
    let run = render_preset(path, &plan, config.timeout(timeout_secs))?;

    let capture = &run.outcome.capture;
    if let Some(failure) = &capture.failure {
        anyhow::bail!(
            "render of {} stopped after {} of {} blocks: {}",
            run.preset.name,
            capture.blocks_rendered(),
            plan.blocks,
            failure
        );
    }

    let wav = WavResult::from_mono(capture.samples(), capture.sample_rate);
    if let Err(e) = wav.write_to(output) {
        eprintln!("{} {}", "error writing wav:".red(), e);
        return Ok(ExitCode::SUCCESS);
    }

    eprintln!(
        "wrote {} ({} samples, {:.2}s)",
        output.display(),
        wav.num_samples,
        wav.duration_seconds()
    );
    Ok(ExitCode::SUCCESS)
}
