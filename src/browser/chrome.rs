//! Chromium implementation of the browsing engine, driven over CDP.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::emulation::SetUserAgentOverrideParams;
use chromiumoxide::cdp::browser_protocol::network::{Headers, SetExtraHttpHeadersParams};
use chromiumoxide::cdp::browser_protocol::page::{
    AddScriptToEvaluateOnNewDocumentParams, EventLifecycleEvent, FrameId,
    SetLifecycleEventsEnabledParams,
};
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::listeners::EventStream;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use log::{debug, trace, warn};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use super::{BrowserEngine, EngineLauncher, PageSession};
use crate::config::{
    BROWSER_LAUNCH_ARGS, DEFAULT_USER_AGENT, SESSION_HEADERS, SESSION_OVERRIDES_SCRIPT,
    VIEWPORT_HEIGHT, VIEWPORT_WIDTH,
};
use crate::error_handling::ScrapeError;
use crate::extract::{missing_anchors, PageSnapshot};

const VISIBLE_TEXT_SCRIPT: &str = "document.body ? document.body.innerText : null";

fn session_error(context: &str, e: impl std::fmt::Display) -> ScrapeError {
    ScrapeError::Session(format!("{context}: {e}"))
}

/// Launches headless Chromium with the fixed launch profile.
#[derive(Debug, Clone, Default)]
pub struct ChromeLauncher {
    executable: Option<PathBuf>,
}

impl ChromeLauncher {
    /// `executable` overrides Chromium auto-detection.
    pub fn new(executable: Option<PathBuf>) -> Self {
        Self { executable }
    }

    fn browser_config(&self) -> Result<BrowserConfig, ScrapeError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(VIEWPORT_WIDTH, VIEWPORT_HEIGHT)
            .viewport(Viewport {
                width: VIEWPORT_WIDTH,
                height: VIEWPORT_HEIGHT,
                ..Viewport::default()
            })
            .args(BROWSER_LAUNCH_ARGS.iter().copied());
        if let Some(path) = &self.executable {
            builder = builder.chrome_executable(path);
        }
        builder.build().map_err(ScrapeError::EngineLaunch)
    }
}

#[async_trait]
impl EngineLauncher for ChromeLauncher {
    async fn launch(&self) -> Result<Arc<dyn BrowserEngine>, ScrapeError> {
        let config = self.browser_config()?;
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ScrapeError::EngineLaunch(e.to_string()))?;

        // The handler must be polled for the connection to make progress
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("CDP handler error: {e}");
                }
            }
            debug!("CDP handler stopped");
        });

        Ok(Arc::new(ChromeEngine {
            browser: Mutex::new(browser),
            handler_task: Mutex::new(Some(handler_task)),
        }))
    }
}

/// A running Chromium process.
pub struct ChromeEngine {
    browser: Mutex<Browser>,
    handler_task: Mutex<Option<JoinHandle<()>>>,
}

#[async_trait]
impl BrowserEngine for ChromeEngine {
    async fn new_session(&self) -> Result<Box<dyn PageSession>, ScrapeError> {
        let page = {
            let browser = self.browser.lock().await;
            browser
                .new_page("about:blank")
                .await
                .map_err(|e| session_error("failed to open tab", e))?
        };
        let session = ChromeSession::new(page);
        // On failure the session is dropped here and its guard closes the tab
        session.apply_profile().await?;
        Ok(Box::new(session))
    }

    async fn shutdown(&self) -> Result<(), ScrapeError> {
        let mut browser = self.browser.lock().await;
        let result = match browser.close().await {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!("Graceful browser close failed, killing the process: {e}");
                match browser.kill().await {
                    Some(Err(kill_err)) => {
                        Err(session_error("failed to kill browser process", kill_err))
                    }
                    _ => Ok(()),
                }
            }
        };
        if let Err(e) = browser.wait().await {
            debug!("Waiting for the browser process failed: {e}");
        }
        if let Some(task) = self.handler_task.lock().await.take() {
            task.abort();
        }
        result
    }
}

/// One Chromium tab.
///
/// Closed explicitly through [`PageSession::close`]. If the session is dropped
/// without that (a panic path), `Drop` schedules the close on the runtime
/// captured at construction.
struct ChromeSession {
    page: Option<Page>,
    url: String,
    runtime_handle: tokio::runtime::Handle,
}

impl ChromeSession {
    fn new(page: Page) -> Self {
        Self {
            page: Some(page),
            url: "about:blank".to_string(),
            runtime_handle: tokio::runtime::Handle::current(),
        }
    }

    fn page(&self) -> Result<&Page, ScrapeError> {
        self.page
            .as_ref()
            .ok_or_else(|| ScrapeError::Session("page already closed".to_string()))
    }

    /// Request headers, user agent and navigator overrides. Applied before
    /// the first navigation so they precede any document script.
    async fn apply_profile(&self) -> Result<(), ScrapeError> {
        let page = self.page()?;

        let headers: serde_json::Map<String, serde_json::Value> = SESSION_HEADERS
            .iter()
            .map(|(name, value)| (name.to_string(), serde_json::Value::from(*value)))
            .collect();
        page.execute(SetExtraHttpHeadersParams::new(Headers::new(
            serde_json::Value::Object(headers),
        )))
        .await
        .map_err(|e| session_error("failed to set request headers", e))?;

        page.execute(SetUserAgentOverrideParams::new(DEFAULT_USER_AGENT))
            .await
            .map_err(|e| session_error("failed to set user agent", e))?;

        page.execute(AddScriptToEvaluateOnNewDocumentParams::new(
            SESSION_OVERRIDES_SCRIPT,
        ))
        .await
        .map_err(|e| session_error("failed to install navigator overrides", e))?;

        Ok(())
    }
}

/// Follows main-frame lifecycle events through one navigation.
///
/// Each `init` starts a new document (the first load or a redirect); only a
/// `networkIdle` from the latest document ends the wait.
#[derive(Debug, Default)]
struct NetworkIdleTracker {
    loader_id: Option<String>,
}

impl NetworkIdleTracker {
    fn observe(&mut self, name: &str, loader_id: &str) -> bool {
        match name {
            "init" => {
                self.loader_id = Some(loader_id.to_string());
                false
            }
            "networkIdle" => self.loader_id.as_deref() == Some(loader_id),
            _ => false,
        }
    }
}

/// Waits for Chromium's `networkIdle` lifecycle event on the main frame.
///
/// The stream must be subscribed before navigation starts so no event is
/// missed. Returns early if the stream ends; the caller's timeout bounds the
/// wait otherwise.
async fn wait_for_network_idle(
    events: &mut EventStream<EventLifecycleEvent>,
    main_frame: Option<&FrameId>,
    url: &str,
) {
    let mut tracker = NetworkIdleTracker::default();
    while let Some(event) = events.next().await {
        if main_frame.is_some_and(|frame| *frame != event.frame_id) {
            continue;
        }
        trace!("Lifecycle event {} for {url}", event.name);
        if tracker.observe(&event.name, event.loader_id.inner()) {
            return;
        }
    }
    debug!("Lifecycle events ended before network idle for {url}");
}

#[async_trait]
impl PageSession for ChromeSession {
    async fn goto(&mut self, url: &str) -> Result<(), ScrapeError> {
        self.url = url.to_string();
        let page = self.page()?;

        let mut lifecycle = page
            .event_listener::<EventLifecycleEvent>()
            .await
            .map_err(|e| session_error("failed to subscribe to lifecycle events", e))?;
        page.execute(SetLifecycleEventsEnabledParams::new(true))
            .await
            .map_err(|e| session_error("failed to enable lifecycle events", e))?;

        page.goto(url).await.map_err(|e| ScrapeError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let main_frame = match page.mainframe().await {
            Ok(frame) => frame,
            Err(e) => {
                debug!("Main frame unknown for {url}: {e}");
                None
            }
        };
        wait_for_network_idle(&mut lifecycle, main_frame.as_ref(), url).await;
        Ok(())
    }

    async fn missing_anchors(&mut self, selectors: &[&str]) -> Result<Vec<String>, ScrapeError> {
        let html = self
            .page()?
            .content()
            .await
            .map_err(|e| session_error("failed to read document", e))?;
        Ok(missing_anchors(&html, selectors))
    }

    async fn snapshot(&mut self) -> Result<PageSnapshot, ScrapeError> {
        let page = self.page()?;
        let html = page
            .content()
            .await
            .map_err(|e| session_error("failed to read document", e))?;
        let visible_text = match page.evaluate(VISIBLE_TEXT_SCRIPT).await {
            Ok(result) => result.into_value::<Option<String>>().unwrap_or(None),
            Err(e) => {
                debug!("Rendered text unavailable for {}: {e}", self.url);
                None
            }
        };
        Ok(PageSnapshot { html, visible_text })
    }

    async fn close(mut self: Box<Self>) -> Result<(), ScrapeError> {
        let Some(page) = self.page.take() else {
            return Ok(());
        };
        page.close()
            .await
            .map_err(|e| session_error(&format!("failed to close tab for {}", self.url), e))?;
        trace!("Closed tab for {}", self.url);
        Ok(())
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        if let Some(page) = self.page.take() {
            let url = std::mem::take(&mut self.url);
            self.runtime_handle.spawn(async move {
                if let Err(e) = page.close().await {
                    warn!("Deferred tab close failed for {url}: {e}");
                } else {
                    trace!("Deferred tab close succeeded for {url}");
                }
            });
        }
    }
}
