//! Lifecycle of the single shared browsing engine.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use log::{info, warn};
use tokio::sync::Mutex;

use super::{BrowserEngine, EngineLauncher};
use crate::error_handling::ScrapeError;

/// Shared reference to the running engine.
///
/// `generation` increases with every launch, so a handle obtained after a
/// release can be told apart from the one before it.
#[derive(Clone)]
pub struct EngineHandle {
    engine: Arc<dyn BrowserEngine>,
    generation: u64,
}

impl EngineHandle {
    /// The engine this handle points at.
    pub fn engine(&self) -> &dyn BrowserEngine {
        self.engine.as_ref()
    }

    /// Launch number of this engine, starting at 1.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl std::fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHandle")
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

/// Owns the engine slot: absent at start, filled lazily, cleared on release.
///
/// The slot lock is held across the launch, so concurrent callers of
/// [`acquire`](Self::acquire) observe at most one construction.
pub struct EngineLifecycle {
    launcher: Box<dyn EngineLauncher>,
    slot: Mutex<Option<EngineHandle>>,
    launches: AtomicU64,
}

impl EngineLifecycle {
    /// Creates an empty slot. Nothing is launched until the first `acquire`.
    pub fn new(launcher: Box<dyn EngineLauncher>) -> Self {
        Self {
            launcher,
            slot: Mutex::new(None),
            launches: AtomicU64::new(0),
        }
    }

    /// Returns the running engine, launching it first if there is none.
    ///
    /// # Errors
    ///
    /// Returns `ScrapeError::EngineLaunch` when the launch fails. The slot
    /// stays empty, so the next call tries again.
    pub async fn acquire(&self) -> Result<EngineHandle, ScrapeError> {
        let mut slot = self.slot.lock().await;
        if let Some(handle) = slot.as_ref() {
            return Ok(handle.clone());
        }

        info!("Launching browsing engine");
        let engine = self.launcher.launch().await.map_err(|e| {
            warn!("Browsing engine launch failed: {e}");
            match e {
                ScrapeError::EngineLaunch(_) => e,
                other => ScrapeError::EngineLaunch(other.to_string()),
            }
        })?;
        let generation = self.launches.fetch_add(1, Ordering::SeqCst) + 1;
        let handle = EngineHandle { engine, generation };
        *slot = Some(handle.clone());
        info!("Browsing engine ready (generation {generation})");
        Ok(handle)
    }

    /// Terminates the engine if one is running and clears the slot.
    ///
    /// Returns `Ok(false)` when there was nothing to release. The slot is
    /// cleared even when the shutdown itself reports an error.
    pub async fn release(&self) -> Result<bool, ScrapeError> {
        let Some(handle) = self.slot.lock().await.take() else {
            log::debug!("No browsing engine to release");
            return Ok(false);
        };
        info!("Shutting down browsing engine (generation {})", handle.generation);
        handle.engine.shutdown().await?;
        Ok(true)
    }

    /// Whether an engine is currently held.
    pub async fn is_active(&self) -> bool {
        self.slot.lock().await.is_some()
    }

    /// Number of successful launches so far.
    pub fn launch_count(&self) -> u64 {
        self.launches.load(Ordering::SeqCst)
    }
}
