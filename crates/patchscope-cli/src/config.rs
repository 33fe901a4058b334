//! Probe configuration.
//!
//! Every field has a default, so an absent `--config` file, an empty JSON
//! object and a partial one all work. Unknown keys are rejected.

use std::path::Path;

use anyhow::{Context, Result};
use patchscope_engine::{NoteEvent, RenderPlan, DEFAULT_FRAME_SIZE, DEFAULT_MAX_FRAMES};
use serde::{Deserialize, Serialize};

use crate::analysis::comparison::CompareThresholds;
use crate::analysis::signal::MeasurementWindow;

/// Default engine instantiation timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = patchscope_engine::DEFAULT_INSTANTIATION_TIMEOUT_SECONDS;

/// The three ways a preset gets rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Single diagnostic record.
    Measure,
    /// Per-block listing.
    Diagnose,
    /// WAV export.
    Render,
}

impl Variant {
    fn default_blocks(self) -> usize {
        match self {
            Variant::Measure | Variant::Diagnose => 64,
            Variant::Render => 96,
        }
    }

    fn default_release(self) -> Option<usize> {
        match self {
            Variant::Measure | Variant::Diagnose => None,
            Variant::Render => Some(64),
        }
    }
}

/// Blocks averaged by `measure` when no window is configured.
const MEASURE_TAIL_BLOCKS: usize = 16;

/// Blocks marked by `diagnose` when no window is configured.
const DIAGNOSE_WINDOW: (usize, usize) = (48, 64);

/// Overrides for one variant's render plan. Unset fields keep the variant's
/// defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlanConfig {
    pub blocks: Option<usize>,
    pub frame_size: Option<usize>,
    /// Block at which the note is released.
    pub release_at_block: Option<usize>,
    /// Measurement window; rejected for `render`, which analyzes nothing.
    pub window: Option<MeasurementWindow>,
}

/// The single note every render triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NoteConfig {
    pub pitch: u8,
    pub velocity: u8,
    pub channel: u8,
}

impl Default for NoteConfig {
    fn default() -> Self {
        let note = NoteEvent::default();
        Self {
            pitch: note.pitch,
            velocity: note.velocity,
            channel: note.channel,
        }
    }
}

impl From<NoteConfig> for NoteEvent {
    fn from(note: NoteConfig) -> Self {
        NoteEvent {
            pitch: note.pitch,
            velocity: note.velocity,
            channel: note.channel,
        }
    }
}

/// Everything configurable about a probe run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeConfig {
    pub measure: PlanConfig,
    pub diagnose: PlanConfig,
    pub render: PlanConfig,
    pub note: NoteConfig,
    /// Engine instantiation timeout in seconds.
    pub timeout_secs: u64,
    pub compare: CompareThresholds,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            measure: PlanConfig::default(),
            diagnose: PlanConfig::default(),
            render: PlanConfig::default(),
            note: NoteConfig::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            compare: CompareThresholds::default(),
        }
    }
}

impl ProbeConfig {
    /// Parse configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Checks settings that parse but cannot apply.
    pub fn validate(&self) -> Result<()> {
        if self.render.window.is_some() {
            anyhow::bail!("render.window is not supported: render writes a WAV and measures nothing");
        }
        Ok(())
    }

    /// Loads `path` if given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    fn plan_config(&self, variant: Variant) -> &PlanConfig {
        match variant {
            Variant::Measure => &self.measure,
            Variant::Diagnose => &self.diagnose,
            Variant::Render => &self.render,
        }
    }

    /// Render plan for `variant`.
    pub fn plan(&self, variant: Variant) -> RenderPlan {
        let overrides = self.plan_config(variant);
        let frame_size = overrides.frame_size.unwrap_or(DEFAULT_FRAME_SIZE);
        RenderPlan {
            blocks: overrides.blocks.unwrap_or_else(|| variant.default_blocks()),
            frame_size,
            max_frames: DEFAULT_MAX_FRAMES.max(frame_size),
            note: self.note.into(),
            release_at_block: overrides
                .release_at_block
                .or_else(|| variant.default_release()),
        }
    }

    /// Window the `measure` record is computed over.
    pub fn measure_window(&self) -> MeasurementWindow {
        self.measure
            .window
            .unwrap_or_else(|| MeasurementWindow::tail(MEASURE_TAIL_BLOCKS))
    }

    /// Window the `diagnose` measurement line covers.
    pub fn diagnose_window(&self) -> MeasurementWindow {
        let (start, end) = DIAGNOSE_WINDOW;
        self.diagnose
            .window
            .unwrap_or_else(|| MeasurementWindow::blocks(start, end))
    }

    /// Timeout to use, preferring a command-line value.
    pub fn timeout(&self, flag: Option<u64>) -> u64 {
        flag.unwrap_or(self.timeout_secs)
    }
}
