//! Browsing engine abstraction.
//!
//! This module provides:
//! - The [`BrowserEngine`], [`EngineLauncher`] and [`PageSession`] seams
//! - Engine lifecycle management (lazy launch, reuse, explicit release)
//! - Page session operations (navigate, readiness wait, extract, close)
//! - The production Chromium implementation built on `chromiumoxide`

mod chrome;
mod lifecycle;
pub mod session;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error_handling::ScrapeError;
use crate::extract::PageSnapshot;

pub use chrome::{ChromeEngine, ChromeLauncher};
pub use lifecycle::{EngineHandle, EngineLifecycle};

/// A running browsing engine process that can open tabs.
#[async_trait]
pub trait BrowserEngine: Send + Sync {
    /// Opens a new tab with the fixed session profile applied.
    async fn new_session(&self) -> Result<Box<dyn PageSession>, ScrapeError>;

    /// Terminates the engine process.
    async fn shutdown(&self) -> Result<(), ScrapeError>;
}

/// Starts a browsing engine with the fixed launch profile.
#[async_trait]
pub trait EngineLauncher: Send + Sync {
    /// Launches a new engine. Called at most once per acquire of an empty slot.
    async fn launch(&self) -> Result<Arc<dyn BrowserEngine>, ScrapeError>;
}

/// One tab of the browsing engine.
///
/// `close` must be called exactly once; implementations may schedule a close
/// from `Drop` when a session is abandoned on a panic path.
#[async_trait]
pub trait PageSession: Send {
    /// Loads the URL and waits for load, DOMContentLoaded and network idle.
    /// Callers bound this with their own timeout.
    async fn goto(&mut self, url: &str) -> Result<(), ScrapeError>;

    /// Returns the selectors that do not match anything in the live document.
    async fn missing_anchors(&mut self, selectors: &[&str]) -> Result<Vec<String>, ScrapeError>;

    /// Captures the live document for extraction.
    async fn snapshot(&mut self) -> Result<PageSnapshot, ScrapeError>;

    /// Disposes of the tab. The engine keeps running.
    async fn close(self: Box<Self>) -> Result<(), ScrapeError>;
}
