//! Error types for engine hosting and offline rendering.

use patchscope_preset::CodedError;
use thiserror::Error;

use crate::engine::BlockStatus;
use crate::render::RenderState;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised by an engine or while bringing one up.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The provider reported that no engine could be created.
    #[error("engine instantiation failed: {message}")]
    Instantiation {
        /// Error message.
        message: String,
    },

    /// The provider delivered an engine of the wrong kind.
    #[error("unexpected engine kind: expected {expected}, found {found}")]
    UnexpectedKind {
        /// Expected engine kind.
        expected: String,
        /// Delivered engine kind.
        found: String,
    },

    /// The provider never completed instantiation.
    #[error("engine did not become ready within {seconds}s")]
    InstantiationTimeout {
        /// Timeout that elapsed.
        seconds: u64,
    },

    /// The async runtime used to await instantiation could not be built.
    #[error("runtime error: {message}")]
    Runtime {
        /// Error message.
        message: String,
    },

    /// The engine refused the offline configuration.
    #[error("offline configuration rejected: {message}")]
    Configuration {
        /// Error message.
        message: String,
    },

    /// A render call failed inside the engine.
    #[error("render call failed: {message}")]
    Render {
        /// Error message.
        message: String,
    },
}

impl EngineError {
    /// Creates an instantiation error.
    pub fn instantiation(message: impl Into<String>) -> Self {
        Self::Instantiation {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a render error.
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }
}

impl CodedError for EngineError {
    fn code(&self) -> &'static str {
        match self {
            EngineError::Instantiation { .. } => "ENGINE_001",
            EngineError::UnexpectedKind { .. } => "ENGINE_002",
            EngineError::InstantiationTimeout { .. } => "ENGINE_003",
            EngineError::Runtime { .. } => "ENGINE_004",
            EngineError::Configuration { .. } => "ENGINE_005",
            EngineError::Render { .. } => "ENGINE_006",
        }
    }

    fn category(&self) -> &'static str {
        "engine"
    }
}

/// Errors raised by the offline render controller.
#[derive(Debug, Error)]
pub enum RenderError {
    /// An operation was called out of order.
    #[error("cannot {operation} while {state}")]
    InvalidState {
        /// Operation that was attempted.
        operation: &'static str,
        /// Controller state at the time.
        state: RenderState,
    },

    /// The block size does not fit the configured maximum.
    #[error("block of {frame_size} frames exceeds the configured maximum of {max_frames}")]
    InvalidFrameSize {
        /// Requested block size.
        frame_size: usize,
        /// Maximum frames per render call.
        max_frames: usize,
    },

    /// A render call asked for a different block size than earlier calls.
    #[error("block size changed from {expected} to {requested} frames")]
    FrameSizeChanged {
        /// Block size fixed by the first render call.
        expected: usize,
        /// Block size requested now.
        requested: usize,
    },

    /// Switching the engine into offline mode failed.
    #[error("configuration failed: {source}")]
    Configuration {
        /// Engine failure.
        #[source]
        source: EngineError,
    },

    /// A render call failed.
    #[error("block {block} failed: {source}")]
    Block {
        /// Zero-based block index.
        block: usize,
        /// Engine failure.
        #[source]
        source: EngineError,
    },

    /// A render call returned a status other than success or insufficient data.
    #[error("block {block} returned status {status}")]
    Status {
        /// Zero-based block index.
        block: usize,
        /// Status reported by the engine.
        status: BlockStatus,
    },
}

impl CodedError for RenderError {
    fn code(&self) -> &'static str {
        match self {
            RenderError::InvalidState { .. } => "RENDER_001",
            RenderError::InvalidFrameSize { .. } => "RENDER_002",
            RenderError::FrameSizeChanged { .. } => "RENDER_003",
            RenderError::Configuration { .. } => "RENDER_004",
            RenderError::Block { .. } => "RENDER_005",
            RenderError::Status { .. } => "RENDER_006",
        }
    }

    fn category(&self) -> &'static str {
        "render"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message() {
        let err = EngineError::InstantiationTimeout { seconds: 20 };
        assert_eq!(err.to_string(), "engine did not become ready within 20s");
        assert_eq!(err.code(), "ENGINE_003");
    }

    #[test]
    fn test_helpers() {
        assert!(EngineError::instantiation("no host")
            .to_string()
            .contains("no host"));
        assert!(EngineError::configuration("rate")
            .to_string()
            .contains("rate"));
        assert_eq!(EngineError::render("x").category(), "engine");
    }

    #[test]
    fn test_render_error_codes() {
        let err = RenderError::Status {
            block: 3,
            status: BlockStatus::Error(-10867),
        };
        assert_eq!(err.code(), "RENDER_006");
        assert_eq!(err.category(), "render");
        assert!(err.to_string().contains("block 3"));

        let err = RenderError::InvalidState {
            operation: "render blocks",
            state: RenderState::Idle,
        };
        assert_eq!(err.to_string(), "cannot render blocks while idle");
    }
}
