//! Offline render controller.
//!
//! Drives a [`SoundEngine`] through
//! `Idle -> Configured -> Rendering -> (NoteReleased) -> Drained -> {Complete | Failed}`
//! and captures every rendered block into an append-only [`SampleStream`].
//!
//! Configuration failures are fatal and returned as errors. A failing render
//! call is not: the remaining blocks are aborted, everything captured so far
//! is kept, and the failure travels with the [`RenderCapture`] so callers can
//! decide whether partial output is acceptable.

mod stream;


use std::fmt;

use patchscope_preset::{MappedParameter, ParameterAddress, ParameterAddressTable, PresetAttributes};
use tracing::{debug, info, warn};

use crate::engine::{
    NoteEvent, RenderFormat, SoundEngine, DEFAULT_FRAME_SIZE, DEFAULT_MAX_FRAMES, SAMPLE_RATE,
};
use crate::error::RenderError;

pub use stream::{block_rms, SampleStream};

/// Controller lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    /// Engine delivered, nothing configured yet.
    Idle,
    /// Offline mode active; parameters and note may be applied.
    Configured,
    /// At least one block rendered with the note held.
    Rendering,
    /// Note-off issued; rendering the tail.
    NoteReleased,
    /// Rendering stopped; capture being handed off.
    Drained,
    /// All requested blocks rendered.
    Complete,
    /// Rendering aborted by an engine failure.
    Failed,
}

impl fmt::Display for RenderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RenderState::Idle => "idle",
            RenderState::Configured => "configured",
            RenderState::Rendering => "rendering",
            RenderState::NoteReleased => "note released",
            RenderState::Drained => "drained",
            RenderState::Complete => "complete",
            RenderState::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// Everything one render run needs besides the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderPlan {
    /// Blocks to render.
    pub blocks: usize,
    /// Frames per block.
    pub frame_size: usize,
    /// Maximum frames per render call announced to the engine.
    pub max_frames: usize,
    /// Note triggered before the first block.
    pub note: NoteEvent,
    /// Block boundary at which the note is released, if any.
    pub release_at_block: Option<usize>,
}

impl Default for RenderPlan {
    fn default() -> Self {
        Self {
            blocks: 64,
            frame_size: DEFAULT_FRAME_SIZE,
            max_frames: DEFAULT_MAX_FRAMES,
            note: NoteEvent::default(),
            release_at_block: None,
        }
    }
}

impl RenderPlan {
    /// Holds the note for `blocks` blocks.
    pub fn held(blocks: usize) -> Self {
        Self {
            blocks,
            ..Self::default()
        }
    }

    /// Renders `blocks` blocks, releasing the note at `release_at_block`.
    pub fn with_release(blocks: usize, release_at_block: usize) -> Self {
        Self {
            blocks,
            release_at_block: Some(release_at_block),
            ..Self::default()
        }
    }

    /// Total frames the plan asks for.
    pub fn total_frames(&self) -> usize {
        self.blocks * self.frame_size
    }
}

/// One attribute written to the engine, with read-back.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedParameter {
    /// Attribute name.
    pub name: &'static str,
    /// Engine address.
    pub address: ParameterAddress,
    /// Value written.
    pub value: f32,
    /// Engine value before the write.
    pub before: f32,
    /// Engine value after the write.
    pub after: f32,
}

/// Summary of parameter application.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterReport {
    /// Attributes written to the engine, in attribute order.
    pub applied: Vec<AppliedParameter>,
    /// Attributes with a table entry the engine does not expose.
    pub unsupported: Vec<MappedParameter>,
    /// Attribute names without a table entry.
    pub unmapped: Vec<String>,
}

impl ParameterReport {
    /// Finds an applied parameter by name.
    pub fn find(&self, name: &str) -> Option<&AppliedParameter> {
        self.applied.iter().find(|p| p.name == name)
    }
}

/// How a call to [`OfflineRenderController::render_blocks`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRun {
    /// All requested blocks were rendered.
    Completed(usize),
    /// An engine failure stopped rendering at this zero-based block index.
    Aborted {
        /// Block that failed.
        at_block: usize,
    },
}

/// Samples and per-block levels handed off after rendering.
#[derive(Debug)]
pub struct RenderCapture {
    /// Every captured sample in render order.
    pub stream: SampleStream,
    /// RMS of each captured block.
    pub block_rms: Vec<f32>,
    /// Frames per block.
    pub frame_size: usize,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Block at which the note was released, if it was.
    pub released_at_block: Option<usize>,
    /// Final controller state ([`RenderState::Complete`] or [`RenderState::Failed`]).
    pub state: RenderState,
    /// Failure that truncated the stream.
    pub failure: Option<RenderError>,
}

impl RenderCapture {
    /// Returns true if every requested block was rendered.
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }

    /// Captured samples.
    pub fn samples(&self) -> &[f32] {
        self.stream.as_slice()
    }

    /// Number of captured blocks.
    pub fn blocks_rendered(&self) -> usize {
        self.block_rms.len()
    }

    /// Captured duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.stream.len() as f64 / self.sample_rate as f64
    }
}

/// Result of [`OfflineRenderController::run`].
#[derive(Debug)]
pub struct RenderOutcome {
    /// Parameter application summary.
    pub parameters: ParameterReport,
    /// Captured audio.
    pub capture: RenderCapture,
}

/// Drives one engine through one offline render.
pub struct OfflineRenderController {
    engine: Box<dyn SoundEngine>,
    state: RenderState,
    format: RenderFormat,
    max_frames: usize,
    frame_size: Option<usize>,
    note: Option<NoteEvent>,
    released_at_block: Option<usize>,
    stream: SampleStream,
    block_rms: Vec<f32>,
    failure: Option<RenderError>,
}

impl OfflineRenderController {
    /// Wraps an instantiated engine.
    pub fn new(engine: Box<dyn SoundEngine>) -> Self {
        Self {
            engine,
            state: RenderState::Idle,
            format: RenderFormat::mono(SAMPLE_RATE),
            max_frames: DEFAULT_MAX_FRAMES,
            frame_size: None,
            note: None,
            released_at_block: None,
            stream: SampleStream::new(),
            block_rms: Vec::new(),
            failure: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RenderState {
        self.state
    }

    /// The engine being driven.
    pub fn engine(&self) -> &dyn SoundEngine {
        self.engine.as_ref()
    }

    fn expect_state(&self, operation: &'static str, allowed: &[RenderState]) -> Result<(), RenderError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(RenderError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }

    /// Switches the engine into offline mode and starts it.
    ///
    /// A failure moves the controller to [`RenderState::Failed`].
    pub fn configure(&mut self, format: RenderFormat, max_frames: usize) -> Result<(), RenderError> {
        self.expect_state("configure", &[RenderState::Idle])?;

        if let Err(source) = self.engine.configure_offline(format, max_frames) {
            self.state = RenderState::Failed;
            return Err(RenderError::Configuration { source });
        }

        self.format = format;
        self.max_frames = max_frames;
        self.state = RenderState::Configured;
        debug!(
            sample_rate = format.sample_rate,
            max_frames, "engine configured for offline rendering"
        );
        Ok(())
    }

    /// Writes every attribute that has both a table entry and an engine
    /// parameter. Everything else is skipped and listed in the report.
    pub fn apply_parameters(
        &mut self,
        attributes: &PresetAttributes,
        table: &ParameterAddressTable,
    ) -> Result<ParameterReport, RenderError> {
        self.expect_state("apply parameters", &[RenderState::Configured])?;

        let mut report = ParameterReport {
            unmapped: table
                .unmapped(attributes)
                .into_iter()
                .map(str::to_string)
                .collect(),
            ..ParameterReport::default()
        };

        for mapped in table.resolve(attributes) {
            let Some(before) = self.engine.parameter(mapped.address) else {
                report.unsupported.push(mapped);
                continue;
            };
            self.engine.set_parameter(mapped.address, mapped.value);
            let after = self.engine.parameter(mapped.address).unwrap_or(before);
            report.applied.push(AppliedParameter {
                name: mapped.name,
                address: mapped.address,
                value: mapped.value,
                before,
                after,
            });
        }

        info!(
            applied = report.applied.len(),
            unsupported = report.unsupported.len(),
            unmapped = report.unmapped.len(),
            "applied preset parameters"
        );
        Ok(report)
    }

    /// Issues the note-on that precedes the first block.
    pub fn trigger_note(&mut self, note: NoteEvent) -> Result<(), RenderError> {
        self.expect_state("trigger a note", &[RenderState::Configured])?;
        self.engine.note_on(note);
        self.note = Some(note);
        Ok(())
    }

    /// Renders `count` blocks of `frame_size` frames.
    ///
    /// Blocks reporting success or insufficient upstream data are captured.
    /// Any other status, or an engine error, aborts the remaining blocks and
    /// moves the controller to [`RenderState::Failed`]; that is reported as
    /// [`BlockRun::Aborted`], not as an error.
    ///
    /// Every captured block is exactly `frame_size` frames. A block delivered
    /// short is zero-padded and a long one is cut, so padded zeros count
    /// toward window aggregates such as `absmean` and the zero-crossing rate.
    pub fn render_blocks(&mut self, count: usize, frame_size: usize) -> Result<BlockRun, RenderError> {
        self.expect_state(
            "render blocks",
            &[
                RenderState::Configured,
                RenderState::Rendering,
                RenderState::NoteReleased,
            ],
        )?;

        if frame_size == 0 || frame_size > self.max_frames {
            return Err(RenderError::InvalidFrameSize {
                frame_size,
                max_frames: self.max_frames,
            });
        }
        match self.frame_size {
            Some(expected) if expected != frame_size => {
                return Err(RenderError::FrameSizeChanged {
                    expected,
                    requested: frame_size,
                });
            }
            _ => self.frame_size = Some(frame_size),
        }
        if self.state == RenderState::Configured {
            self.state = RenderState::Rendering;
        }

        for _ in 0..count {
            let block = self.block_rms.len();
            let failure = match self.engine.render_block(frame_size) {
                Ok(rendered) if rendered.status.is_continuable() => {
                    let mut samples = rendered.samples;
                    if samples.len() != frame_size {
                        warn!(
                            block,
                            delivered = samples.len(),
                            frame_size,
                            "resizing block to the fixed frame size"
                        );
                        samples.resize(frame_size, 0.0);
                    }
                    self.block_rms.push(block_rms(&samples));
                    self.stream.append(&samples);
                    continue;
                }
                Ok(rendered) => RenderError::Status {
                    block,
                    status: rendered.status,
                },
                Err(source) => RenderError::Block { block, source },
            };

            warn!(block, error = %failure, "render aborted, keeping captured blocks");
            self.failure = Some(failure);
            self.state = RenderState::Failed;
            return Ok(BlockRun::Aborted { at_block: block });
        }

        Ok(BlockRun::Completed(count))
    }

    /// Issues note-off at the current block boundary.
    ///
    /// Returns the index of the first block rendered after the release.
    pub fn release_note(&mut self) -> Result<usize, RenderError> {
        self.expect_state(
            "release the note",
            &[RenderState::Configured, RenderState::Rendering],
        )?;

        let at_block = self.block_rms.len();
        if let Some(note) = self.note.take() {
            self.engine.note_off(note.pitch, note.channel);
        }
        self.released_at_block = Some(at_block);
        self.state = RenderState::NoteReleased;
        debug!(at_block, "note released");
        Ok(at_block)
    }

    /// Stops rendering and hands off the capture.
    pub fn finish(mut self) -> RenderCapture {
        let failed = self.state == RenderState::Failed;
        self.state = RenderState::Drained;
        let final_state = if failed {
            RenderState::Failed
        } else {
            RenderState::Complete
        };

        RenderCapture {
            stream: self.stream,
            block_rms: self.block_rms,
            frame_size: self.frame_size.unwrap_or(DEFAULT_FRAME_SIZE),
            sample_rate: self.format.sample_rate,
            released_at_block: self.released_at_block,
            state: final_state,
            failure: self.failure,
        }
    }

    /// Runs a whole plan: configure, apply parameters, note-on, render,
    /// optional release, drain.
    ///
    /// Only configuration failures and misuse are errors. A render failure
    /// ends the run early and is carried in [`RenderCapture::failure`].
    pub fn run(
        mut self,
        plan: &RenderPlan,
        attributes: &PresetAttributes,
        table: &ParameterAddressTable,
    ) -> Result<RenderOutcome, RenderError> {
        self.configure(RenderFormat::mono(SAMPLE_RATE), plan.max_frames)?;
        let parameters = self.apply_parameters(attributes, table)?;
        self.trigger_note(plan.note)?;

        let held = plan
            .release_at_block
            .map_or(plan.blocks, |at| at.min(plan.blocks));
        let mut run = self.render_blocks(held, plan.frame_size)?;

        if matches!(run, BlockRun::Completed(_)) && plan.release_at_block.is_some() && held < plan.blocks {
            self.release_note()?;
            run = self.render_blocks(plan.blocks - held, plan.frame_size)?;
        }

        if let BlockRun::Aborted { at_block } = run {
            debug!(at_block, requested = plan.blocks, "render truncated");
        }

        Ok(RenderOutcome {
            parameters,
            capture: self.finish(),
        })
    }
}
