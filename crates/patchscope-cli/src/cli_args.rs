//! CLI argument definitions for the Patchscope command-line interface.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types are defined here,
//! keeping `main.rs` focused on dispatch logic.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Patchscope - Offline preset rendering and diagnostics
#[derive(Parser)]
#[command(name = "patchscope")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    /// Increase log verbosity (-v info, -vv debug); logs go to stderr
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// JSON file overriding render plans, note, timeout and compare thresholds
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Render a preset and print a one-line diagnostic record
    Measure {
        /// Preset file (or directory with --batch)
        preset: PathBuf,

        /// Seconds to wait for the engine to become ready
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Measure every .vstpreset below the directory (JSON Lines output)
        #[arg(long)]
        batch: bool,
    },

    /// Render a preset and print per-block RMS with parameter read-back
    Diagnose {
        /// Preset file
        preset: PathBuf,

        /// Seconds to wait for the engine to become ready
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Render a preset (note held, then released) to a 16-bit mono WAV file
    Render {
        /// Preset file
        preset: PathBuf,

        /// Output WAV path
        output: PathBuf,

        /// Seconds to wait for the engine to become ready
        #[arg(long)]
        timeout_secs: Option<u64>,
    },

    /// Compare a candidate render against a reference render
    Compare {
        /// Reference WAV file
        reference: PathBuf,

        /// Candidate WAV file
        candidate: PathBuf,

        /// Include the per-block table in the output
        #[arg(long)]
        blocks: bool,

        /// Name reported in the output (default: candidate file stem)
        #[arg(long)]
        name: Option<String>,
    },
}
