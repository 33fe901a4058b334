//! Measure command implementation
//!
//! Renders a preset with the note held and prints one diagnostic record. In
//! batch mode every `.vstpreset` below a directory is measured and one record
//! per preset is printed as JSON Lines.

use anyhow::Result;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::warn;
use walkdir::WalkDir;

use patchscope_preset::preset_name;

use crate::analysis::signal::{analyze_capture, DiagnosticReport};
use crate::config::{ProbeConfig, Variant};
use crate::probe::render_preset;
use crate::report::{format_failure, format_record};

/// Preset container extension picked up in batch mode.
pub const PRESET_EXTENSION: &str = "vstpreset";

/// Run the measure command
///
/// # Arguments
/// * `path` - Preset file, or directory when `batch` is set
/// * `config` - Probe configuration
/// * `timeout_secs` - Instantiation timeout override
/// * `batch` - Measure every preset below `path`
///
/// # Returns
/// Exit code: 0 on success, 1 if any preset failed in batch mode
pub fn run(path: &Path, config: &ProbeConfig, timeout_secs: Option<u64>, batch: bool) -> Result<ExitCode> {
    if batch {
        return run_batch(path, config, timeout_secs);
    }

    let report = measure_preset(path, config, timeout_secs)?;
    println!("{}", format_record(&report));
    Ok(ExitCode::SUCCESS)
}

/// Renders and analyzes one preset.
pub fn measure_preset(
    path: &Path,
    config: &ProbeConfig,
    timeout_secs: Option<u64>,
) -> Result<DiagnosticReport> {
    let plan = config.plan(Variant::Measure);
    let run = render_preset(path, &plan, config.timeout(timeout_secs))?;
    run.warn_if_truncated();
    Ok(analyze_capture(
        run.preset.name.as_str(),
        &run.outcome.capture,
        &config.measure_window(),
    ))
}

fn run_batch(dir: &Path, config: &ProbeConfig, timeout_secs: Option<u64>) -> Result<ExitCode> {
    if !dir.is_dir() {
        anyhow::bail!("Input path is not a directory: {}", dir.display());
    }

    let presets = find_presets(dir);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut failed = 0usize;

    for path in &presets {
        let line = match measure_preset(path, config, timeout_secs) {
            Ok(report) => format_record(&report),
            Err(e) => {
                failed += 1;
                warn!(preset = %path.display(), "measurement failed: {:#}", e);
                format_failure(&preset_name(path), &e)
            }
        };
        writeln!(out, "{}", line)?;
    }

    if failed == 0 {
        Ok(ExitCode::SUCCESS)
    } else {
        warn!(failed, total = presets.len(), "some presets failed");
        Ok(ExitCode::from(1))
    }
}

/// All preset files below `dir`, sorted for deterministic output.
pub fn find_presets(dir: &Path) -> Vec<PathBuf> {
    let mut presets: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case(PRESET_EXTENSION))
                .unwrap_or(false)
        })
        .map(|e| e.path().to_path_buf())
        .collect();
    presets.sort();
    presets
}
