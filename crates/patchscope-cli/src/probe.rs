//! Preset-to-capture pipeline shared by the rendering commands.

use std::path::Path;

use anyhow::{Context, Result};
use patchscope_engine::{
    instantiate_with_timeout, MonoSynthProvider, OfflineRenderController, RenderOutcome,
    RenderPlan,
};
use patchscope_preset::{ParameterAddressTable, Preset};
use tracing::{info, warn};

/// A preset rendered through the reference engine.
#[derive(Debug)]
pub struct ProbeRun {
    pub preset: Preset,
    pub engine_name: String,
    pub outcome: RenderOutcome,
}

impl ProbeRun {
    /// Logs a truncated render. Diagnostic commands carry on with what was
    /// captured.
    pub fn warn_if_truncated(&self) {
        let capture = &self.outcome.capture;
        if let Some(failure) = &capture.failure {
            warn!(
                preset = %self.preset.name,
                blocks = capture.blocks_rendered(),
                "render stopped early: {}",
                failure
            );
        }
    }
}

/// Loads `path`, brings up an engine within `timeout_secs` and runs `plan`.
///
/// Engine errors are passed through unchanged so callers can map them to exit
/// codes. A render failure is not an error here; it is recorded on the capture.
pub fn render_preset(path: &Path, plan: &RenderPlan, timeout_secs: u64) -> Result<ProbeRun> {
    let preset = Preset::load(path)
        .with_context(|| format!("Failed to load preset: {}", path.display()))?;
    if preset.attributes.is_empty() {
        info!(preset = %preset.name, "no program attributes found, rendering engine defaults");
    }

    let provider = MonoSynthProvider::default();
    let engine = instantiate_with_timeout(&provider, timeout_secs)?;
    let engine_name = engine.name().to_string();
    info!(engine = %engine_name, "engine ready");

    let table = ParameterAddressTable::builtin();
    let outcome = OfflineRenderController::new(engine)
        .run(plan, &preset.attributes, &table)
        .with_context(|| format!("Failed to render preset: {}", preset.name))?;
    info!(
        applied = outcome.parameters.applied.len(),
        unsupported = outcome.parameters.unsupported.len(),
        unmapped = outcome.parameters.unmapped.len(),
        blocks = outcome.capture.blocks_rendered(),
        "render finished"
    );

    Ok(ProbeRun {
        preset,
        engine_name,
        outcome,
    })
}
