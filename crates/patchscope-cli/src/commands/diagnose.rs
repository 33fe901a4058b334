//! Diagnose command implementation
//!
//! Renders a preset with the note held and prints a per-block RMS listing with
//! parameter read-back and the measurement-window aggregates.

use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

use crate::analysis::signal::analyze_capture;
use crate::config::{ProbeConfig, Variant};
use crate::probe::render_preset;
use crate::report::write_listing;

/// Run the diagnose command
///
/// # Arguments
/// * `path` - Preset file
/// * `config` - Probe configuration
/// * `timeout_secs` - Instantiation timeout override
///
/// # Returns
/// Exit code: 0 on success
pub fn run(path: &Path, config: &ProbeConfig, timeout_secs: Option<u64>) -> Result<ExitCode> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    diagnose(&mut out, path, config, timeout_secs)?;
    out.flush()?;
    Ok(ExitCode::SUCCESS)
}

/// Writes the listing for `path` to `out`.
pub fn diagnose(
    out: &mut impl Write,
    path: &Path,
    config: &ProbeConfig,
    timeout_secs: Option<u64>,
) -> Result<()> {
    let plan = config.plan(Variant::Diagnose);
    let run = render_preset(path, &plan, config.timeout(timeout_secs))?;
    run.warn_if_truncated();

    let report = analyze_capture(
        run.preset.name.as_str(),
        &run.outcome.capture,
        &config.diagnose_window(),
    );
    write_listing(out, &run, &plan, &report).context("Failed to write listing")?;
    Ok(())
}
