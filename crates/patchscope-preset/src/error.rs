//! Error types shared across the patchscope crates.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a preset container.
///
/// Structural problems inside the container (missing sections, malformed
/// attributes) are never errors: they yield an empty attribute set.
#[derive(Debug, Error)]
pub enum PresetError {
    /// The preset file could not be read.
    #[error("cannot read preset '{}': {source}", path.display())]
    Read {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// A batch path was expected to be a directory.
    #[error("not a directory: {}", path.display())]
    NotADirectory {
        /// Path that was requested.
        path: PathBuf,
    },
}

impl PresetError {
    /// Creates a read error for `path`.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}

/// Trait for errors that carry a stable code and category.
///
/// Every library error type in the workspace implements this so the CLI can
/// report failures uniformly without knowing the concrete error type.
///
/// # Example
///
/// ```
/// use patchscope_preset::error::{CodedError, PresetError};
///
/// fn describe<E: CodedError>(err: &E) -> String {
///     format!("[{}] {}", err.code(), err.message())
/// }
///
/// let err = PresetError::NotADirectory { path: "x".into() };
/// assert!(describe(&err).starts_with("[PRESET_002]"));
/// ```
pub trait CodedError: std::error::Error {
    /// Returns a stable code like "PRESET_001" or "ENGINE_003".
    fn code(&self) -> &'static str;

    /// Returns a human-readable message describing the error.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Returns the error category ("preset", "engine", "render").
    fn category(&self) -> &'static str;
}

impl CodedError for PresetError {
    fn code(&self) -> &'static str {
        match self {
            PresetError::Read { .. } => "PRESET_001",
            PresetError::NotADirectory { .. } => "PRESET_002",
        }
    }

    fn category(&self) -> &'static str {
        "preset"
    }
}
