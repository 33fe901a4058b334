//! Capability API for a block-rendering sound engine.
//!
//! The render controller only talks to engines through [`SoundEngine`]. A host
//! plugin adapter and the built-in [`MonoSynth`](crate::monosynth::MonoSynth)
//! both implement it.

use std::fmt;

use patchscope_preset::ParameterAddress;

use crate::error::EngineResult;

/// Fixed offline sample rate.
pub const SAMPLE_RATE: u32 = 44_100;

/// Frames requested per render call.
pub const DEFAULT_FRAME_SIZE: usize = 128;

/// Maximum frames a single render call may request.
pub const DEFAULT_MAX_FRAMES: usize = 512;

/// Output format requested from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderFormat {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Number of channels (always 1 for analysis).
    pub channels: u16,
}

impl RenderFormat {
    /// Creates a mono format.
    pub fn mono(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            channels: 1,
        }
    }
}

impl Default for RenderFormat {
    fn default() -> Self {
        Self::mono(SAMPLE_RATE)
    }
}

/// Broad engine category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    /// Responds to note events and generates audio.
    Instrument,
    /// Processes input audio; cannot be played with notes.
    Effect,
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::Instrument => write!(f, "instrument"),
            EngineKind::Effect => write!(f, "effect"),
        }
    }
}

/// Status reported by one render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStatus {
    /// The block was rendered.
    Success,
    /// The engine had no upstream input for this block. Benign for instruments.
    InsufficientUpstreamData,
    /// The engine cannot render in its current state.
    CannotRenderInCurrentContext,
    /// Engine-specific failure code.
    Error(i32),
}

impl BlockStatus {
    /// Returns true for statuses the render loop continues after.
    pub fn is_continuable(&self) -> bool {
        matches!(
            self,
            BlockStatus::Success | BlockStatus::InsufficientUpstreamData
        )
    }
}

impl fmt::Display for BlockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockStatus::Success => write!(f, "success"),
            BlockStatus::InsufficientUpstreamData => write!(f, "insufficient upstream data"),
            BlockStatus::CannotRenderInCurrentContext => {
                write!(f, "cannot render in current context")
            }
            BlockStatus::Error(code) => write!(f, "error {}", code),
        }
    }
}

/// Note-on event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteEvent {
    /// MIDI note number.
    pub pitch: u8,
    /// MIDI velocity (1-127).
    pub velocity: u8,
    /// MIDI channel (0-15).
    pub channel: u8,
}

impl Default for NoteEvent {
    /// Middle C at velocity 110 on channel 0.
    fn default() -> Self {
        Self {
            pitch: 60,
            velocity: 110,
            channel: 0,
        }
    }
}

/// Samples delivered by one render call.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBlock {
    /// Render status.
    pub status: BlockStatus,
    /// Mono samples in `[-1, 1]`.
    pub samples: Vec<f32>,
}

impl RenderedBlock {
    /// Creates a successful block.
    pub fn success(samples: Vec<f32>) -> Self {
        Self {
            status: BlockStatus::Success,
            samples,
        }
    }

    /// Creates a block with an explicit status.
    pub fn with_status(status: BlockStatus, samples: Vec<f32>) -> Self {
        Self { status, samples }
    }
}

/// A sound engine that can be driven offline, one block at a time.
pub trait SoundEngine: Send {
    /// Human-readable engine name.
    fn name(&self) -> &str;

    /// Engine category.
    fn kind(&self) -> EngineKind;

    /// Switches the engine into offline mode and starts it.
    fn configure_offline(&mut self, format: RenderFormat, max_frames: usize) -> EngineResult<()>;

    /// Current value of a parameter, or `None` if the engine does not expose
    /// `address`.
    fn parameter(&self, address: ParameterAddress) -> Option<f32>;

    /// Sets a parameter. Writes to unexposed addresses are ignored.
    fn set_parameter(&mut self, address: ParameterAddress, value: f32);

    /// Starts a note.
    fn note_on(&mut self, note: NoteEvent);

    /// Releases a note.
    fn note_off(&mut self, pitch: u8, channel: u8);

    /// Renders `frames` mono frames.
    fn render_block(&mut self, frames: usize) -> EngineResult<RenderedBlock>;
}
