//! Patchscope engine hosting and offline rendering
//!
//! This crate drives a block-rendering sound engine offline and encodes what
//! it produced:
//!
//! - [`engine`] - capability trait every engine implements ([`SoundEngine`])
//! - [`instantiate`] - one-shot asynchronous instantiation with a timeout
//! - [`render`] - the [`OfflineRenderController`] state machine and its capture
//! - [`monosynth`] - built-in reference engine, addressed like a host plugin
//! - [`wav`] - deterministic 16-bit mono WAV encoder
//!
//! # Determinism
//!
//! The reference engine draws all noise from seeded PCG32 streams, so the same
//! preset, plan and seed give bit-identical captures and identical PCM hashes.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use patchscope_engine::{
//!     instantiate_with_timeout, MonoSynthProvider, OfflineRenderController, RenderPlan,
//!     WavResult,
//! };
//! use patchscope_preset::{ParameterAddressTable, Preset};
//!
//! let preset = Preset::load("lead.vstpreset")?;
//! let engine = instantiate_with_timeout(&MonoSynthProvider::default(), 20)?;
//! let outcome = OfflineRenderController::new(engine).run(
//!     &RenderPlan::with_release(96, 64),
//!     &preset.attributes,
//!     &ParameterAddressTable::builtin(),
//! )?;
//!
//! let wav = WavResult::from_mono(outcome.capture.samples(), outcome.capture.sample_rate);
//! wav.write_to(Path::new("lead.wav"))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod engine;
pub mod error;
pub mod instantiate;
pub mod monosynth;
pub mod render;
pub mod rng;
pub mod wav;

pub use engine::{
    BlockStatus, EngineKind, NoteEvent, RenderFormat, RenderedBlock, SoundEngine,
    DEFAULT_FRAME_SIZE, DEFAULT_MAX_FRAMES, SAMPLE_RATE,
};
pub use error::{EngineError, EngineResult, RenderError};
pub use instantiate::{
    instantiate_with_timeout, Completion, EngineProvider, DEFAULT_INSTANTIATION_TIMEOUT_SECONDS,
};
pub use monosynth::{MonoSynth, MonoSynthProvider};
pub use render::{
    block_rms, AppliedParameter, BlockRun, OfflineRenderController, ParameterReport,
    RenderCapture, RenderOutcome, RenderPlan, RenderState, SampleStream,
};
pub use wav::WavResult;
