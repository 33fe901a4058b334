//! Patchscope CLI library.
//!
//! This crate provides the core functionality for the Patchscope CLI:
//! the preset-to-capture pipeline, signal analysis, record encoding and the
//! command implementations.

pub mod analysis;
pub mod commands;
pub mod config;
pub mod probe;
pub mod report;
