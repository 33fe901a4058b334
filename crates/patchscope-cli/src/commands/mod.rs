//! CLI command implementations

pub mod compare;
pub mod diagnose;
pub mod measure;
pub mod render;
