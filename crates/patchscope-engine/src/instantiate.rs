//! One-shot engine instantiation with a bounded wait.
//!
//! Hosts create engines asynchronously and report back through a callback.
//! Here the callback is a [`Completion`]: a one-shot sender the provider
//! consumes when it resolves, so it can fire at most once. The caller awaits
//! the paired receiver with a timeout on a current-thread runtime. The result
//! travels through the channel; nothing is captured across the callback.

use std::time::Duration;

use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::engine::{EngineKind, SoundEngine};
use crate::error::{EngineError, EngineResult};

/// Default bound on instantiation, in seconds.
pub const DEFAULT_INSTANTIATION_TIMEOUT_SECONDS: u64 = 20;

/// Outcome delivered by a provider.
pub type Instantiation = EngineResult<Box<dyn SoundEngine>>;

/// Single-use completion handle passed to an [`EngineProvider`].
pub struct Completion {
    sender: oneshot::Sender<Instantiation>,
}

impl Completion {
    /// Resolves the instantiation. Consumes the handle.
    ///
    /// If the caller already gave up waiting the result is discarded.
    pub fn complete(self, result: Instantiation) {
        if self.sender.send(result).is_err() {
            debug!("instantiation completed after the caller stopped waiting");
        }
    }

    /// Resolves with an engine.
    pub fn ready(self, engine: Box<dyn SoundEngine>) {
        self.complete(Ok(engine));
    }

    /// Resolves with a failure.
    pub fn fail(self, error: EngineError) {
        self.complete(Err(error));
    }
}

/// Something that can create a sound engine asynchronously.
pub trait EngineProvider {
    /// Describes the engine this provider creates (for logs).
    fn describe(&self) -> String;

    /// Starts instantiation. The provider must eventually call exactly one of
    /// the [`Completion`] methods, from any thread, or drop it.
    fn instantiate(&self, completion: Completion);
}

/// Instantiates an engine, waiting at most `timeout_seconds`.
///
/// Errors:
/// - [`EngineError::InstantiationTimeout`] when the provider does not resolve in time
/// - [`EngineError::Instantiation`] when it fails or drops the completion
/// - [`EngineError::UnexpectedKind`] when the engine is not an instrument
pub fn instantiate_with_timeout(
    provider: &dyn EngineProvider,
    timeout_seconds: u64,
) -> EngineResult<Box<dyn SoundEngine>> {
    use tokio::runtime::Builder;
    use tokio::time::timeout;

    // Only the timer driver is needed; the provider brings its own threads.
    let rt = Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(|e| EngineError::Runtime {
            message: format!("failed to create runtime: {}", e),
        })?;

    let (sender, receiver) = oneshot::channel();
    info!(engine = %provider.describe(), "instantiating engine");
    provider.instantiate(Completion { sender });

    let timeout_duration = Duration::from_secs(timeout_seconds);
    let engine = rt.block_on(async {
        match timeout(timeout_duration, receiver).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(EngineError::instantiation(
                "provider dropped its completion without resolving it",
            )),
            Err(_) => Err(EngineError::InstantiationTimeout {
                seconds: timeout_seconds,
            }),
        }
    })?;

    if engine.kind() != EngineKind::Instrument {
        return Err(EngineError::UnexpectedKind {
            expected: EngineKind::Instrument.to_string(),
            found: engine.kind().to_string(),
        });
    }

    debug!(engine = engine.name(), "engine ready");
    Ok(engine)
}
