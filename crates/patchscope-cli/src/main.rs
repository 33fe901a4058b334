//! Patchscope CLI - Offline preset rendering and diagnostics
//!
//! This binary renders synthesizer presets through the reference engine and
//! reports what came out: diagnostic records, per-block listings, WAV files
//! and render comparisons.

mod cli_args;

use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;
use tracing::Level;

use cli_args::{Cli, Commands};
use patchscope_cli::commands;
use patchscope_cli::config::ProbeConfig;
use patchscope_engine::{EngineError, RenderError};
use patchscope_preset::{CodedError, PresetError};

/// Exit code when the engine never became ready.
const EXIT_TIMEOUT: u8 = 3;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match ProbeConfig::load(cli.config.as_deref()) {
        Ok(config) => dispatch(cli.command, &config),
        Err(e) => Err(e),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            let label = match error_code(&e) {
                Some(code) => format!("error[{}]", code),
                None => "error".to_string(),
            };
            eprintln!("{}: {:#}", label.red(), e);
            exit_code_for(&e)
        }
    }
}

fn dispatch(command: Commands, config: &ProbeConfig) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Measure {
            preset,
            timeout_secs,
            batch,
        } => commands::measure::run(&preset, config, timeout_secs, batch),
        Commands::Diagnose {
            preset,
            timeout_secs,
        } => commands::diagnose::run(&preset, config, timeout_secs),
        Commands::Render {
            preset,
            output,
            timeout_secs,
        } => commands::render::run(&preset, &output, config, timeout_secs),
        Commands::Compare {
            reference,
            candidate,
            blocks,
            name,
        } => commands::compare::run(
            &reference,
            &candidate,
            name.as_deref(),
            &config.compare,
            blocks,
        ),
    }
}

/// Logs go to stderr; stdout carries records only.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Stable code of the outermost library error in the chain, if any.
fn error_code(error: &anyhow::Error) -> Option<&'static str> {
    error.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<PresetError>() {
            Some(e.code())
        } else if let Some(e) = cause.downcast_ref::<RenderError>() {
            Some(e.code())
        } else {
            cause.downcast_ref::<EngineError>().map(CodedError::code)
        }
    })
}

fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    let engine_error = error
        .chain()
        .find_map(|cause| cause.downcast_ref::<EngineError>());
    match engine_error {
        Some(EngineError::InstantiationTimeout { .. }) => ExitCode::from(EXIT_TIMEOUT),
        _ => ExitCode::from(1),
    }
}
