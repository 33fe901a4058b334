//! Patchscope End-to-End Test Infrastructure
//!
//! This crate provides integration tests for the full probe flow:
//!
//! - Preset -> engine -> capture -> record / listing / WAV
//! - CLI exit codes and stream separation (records on stdout, logs on stderr)
//! - **Determinism**: byte-identical renders across runs
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p patchscope-tests
//! ```

pub mod determinism;
pub mod fixtures;
pub mod harness;

// Re-export commonly used items
pub use determinism::{verify_determinism, DeterminismResult, DiffInfo};
pub use fixtures::PresetFixture;
pub use harness::{CliResult, TestHarness};
