//! Text encodings of a [`DiagnosticReport`].
//!
//! The record is a single-line JSON object whose float fields always carry six
//! decimal digits, so it is written by hand rather than through serde.

use std::io::{self, Write};

use patchscope_engine::RenderPlan;

use crate::analysis::signal::DiagnosticReport;
use crate::probe::ProbeRun;

/// Read-back values per `params:` line.
const PARAMS_PER_LINE: usize = 6;

/// Formats the one-line diagnostic record.
pub fn format_record(report: &DiagnosticReport) -> String {
    let m = &report.metrics;
    format!(
        "{{\"name\":{},\"peak\":{:.6},\"absmean\":{:.6},\"zc_rate\":{:.6},\"autocorr\":{:.6},\"lag\":{}}}",
        json_string(&report.name),
        m.peak,
        m.absmean,
        m.zc_rate,
        m.autocorr,
        m.lag
    )
}

/// Formats the record emitted in place of a diagnostic record when a preset
/// could not be probed.
pub fn format_failure(name: &str, error: &anyhow::Error) -> String {
    serde_json::json!({
        "name": name,
        "error": format!("{:#}", error),
    })
    .to_string()
}

fn json_string(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

/// Writes the per-block listing: header, measurement line, then one RMS line
/// per captured block with measured blocks marked `*MEAS*`.
pub fn write_listing(
    out: &mut impl Write,
    run: &ProbeRun,
    plan: &RenderPlan,
    report: &DiagnosticReport,
) -> io::Result<()> {
    let parameters = &run.outcome.parameters;
    let capture = &run.outcome.capture;

    writeln!(out, "preset: {}", run.preset.name)?;
    if let Some(program) = &run.preset.program_name {
        writeln!(out, "program: {}", program)?;
    }
    writeln!(out, "engine: {}", run.engine_name)?;

    for chunk in parameters.applied.chunks(PARAMS_PER_LINE) {
        let line: Vec<String> = chunk
            .iter()
            .map(|p| format!("{}={:.3}", p.name, p.after))
            .collect();
        writeln!(out, "params: {}", line.join(" "))?;
    }
    if !parameters.unsupported.is_empty() {
        let names: Vec<&str> = parameters.unsupported.iter().map(|p| p.name).collect();
        writeln!(out, "unsupported: {}", names.join(" "))?;
    }
    if !parameters.unmapped.is_empty() {
        writeln!(out, "unmapped: {}", parameters.unmapped.join(" "))?;
    }

    write!(
        out,
        "render: {}/{} blocks of {} frames",
        capture.blocks_rendered(),
        plan.blocks,
        plan.frame_size
    )?;
    match &capture.failure {
        Some(failure) => writeln!(out, " (stopped: {})", failure)?,
        None => writeln!(out)?,
    }

    let m = &report.metrics;
    writeln!(
        out,
        "measurement: peak={:.6} absmean={:.6} zc_rate={:.6} autocorr={:.6} lag={}",
        m.peak, m.absmean, m.zc_rate, m.autocorr, m.lag
    )?;

    writeln!(out, "per_block_rms:")?;
    for (index, rms) in report.block_rms.iter().enumerate() {
        let marker = if report.is_measured(index) { " *MEAS*" } else { "" };
        writeln!(out, "  block {:2}: rms={:.6}{}", index, rms, marker)?;
    }
    Ok(())
}
