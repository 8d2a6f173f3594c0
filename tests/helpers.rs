// Shared test helpers: a scripted in-process browsing engine and test configuration.
//
// The fake engine serves canned HTML per URL and counts every launch, tab and
// shutdown so tests can check lifecycle and cleanup behavior without Chromium.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use listing_harvest::browser::{BrowserEngine, EngineLauncher, PageSession};
use listing_harvest::config::SettleDelay;
use listing_harvest::extract::{missing_anchors, PageSnapshot};
use listing_harvest::{Config, ScrapeError};

pub const BASE_URL: &str = "https://example.com/dp/";

/// How the fake engine answers a navigation to one URL.
#[allow(dead_code)] // Not every test file uses every script
#[derive(Clone, Debug)]
pub enum PageScript {
    /// Serve this HTML
    Html(String),
    /// Serve a page that never renders the readiness anchors
    NoAnchors,
    /// Never finish loading
    Hang,
    /// Report a navigation failure with this message
    NavigationError(String),
}

/// Counters shared between a [`FakeLauncher`] and the engines it starts.
#[derive(Default)]
pub struct EngineCounters {
    pub launches: AtomicUsize,
    pub opened: AtomicUsize,
    pub closed: AtomicUsize,
    pub active: AtomicUsize,
    pub max_active: AtomicUsize,
    pub shutdowns: AtomicUsize,
    pub fail_launch: AtomicBool,
    pub fail_shutdown: AtomicBool,
    pub visited: Mutex<Vec<String>>,
}

#[allow(dead_code)] // Used by other test files
impl EngineCounters {
    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    pub fn shutdowns(&self) -> usize {
        self.shutdowns.load(Ordering::SeqCst)
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }
}

/// Launcher for the scripted engine.
pub struct FakeLauncher {
    counters: Arc<EngineCounters>,
    scripts: Arc<HashMap<String, PageScript>>,
    launch_delay: Duration,
}

#[allow(dead_code)] // Used by other test files
impl FakeLauncher {
    pub fn new(counters: Arc<EngineCounters>) -> Self {
        Self {
            counters,
            scripts: Arc::new(HashMap::new()),
            launch_delay: Duration::ZERO,
        }
    }

    /// Overrides the default product page served for `url`.
    pub fn with_script(mut self, url: &str, script: PageScript) -> Self {
        Arc::make_mut(&mut self.scripts).insert(url.to_string(), script);
        self
    }

    pub fn with_launch_delay(mut self, delay: Duration) -> Self {
        self.launch_delay = delay;
        self
    }

    pub fn boxed(self) -> Box<dyn EngineLauncher> {
        Box::new(self)
    }
}

#[async_trait]
impl EngineLauncher for FakeLauncher {
    async fn launch(&self) -> Result<Arc<dyn BrowserEngine>, ScrapeError> {
        if !self.launch_delay.is_zero() {
            tokio::time::sleep(self.launch_delay).await;
        }
        if self.counters.fail_launch.load(Ordering::SeqCst) {
            return Err(ScrapeError::EngineLaunch(
                "no Chromium executable found".to_string(),
            ));
        }
        self.counters.launches.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(FakeEngine {
            counters: Arc::clone(&self.counters),
            scripts: Arc::clone(&self.scripts),
        }))
    }
}

struct FakeEngine {
    counters: Arc<EngineCounters>,
    scripts: Arc<HashMap<String, PageScript>>,
}

#[async_trait]
impl BrowserEngine for FakeEngine {
    async fn new_session(&self) -> Result<Box<dyn PageSession>, ScrapeError> {
        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        let active = self.counters.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.max_active.fetch_max(active, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            counters: Arc::clone(&self.counters),
            scripts: Arc::clone(&self.scripts),
            html: None,
        }))
    }

    async fn shutdown(&self) -> Result<(), ScrapeError> {
        self.counters.shutdowns.fetch_add(1, Ordering::SeqCst);
        if self.counters.fail_shutdown.load(Ordering::SeqCst) {
            return Err(ScrapeError::Session("browser process did not exit".to_string()));
        }
        Ok(())
    }
}

struct FakeSession {
    counters: Arc<EngineCounters>,
    scripts: Arc<HashMap<String, PageScript>>,
    html: Option<String>,
}

#[async_trait]
impl PageSession for FakeSession {
    async fn goto(&mut self, url: &str) -> Result<(), ScrapeError> {
        self.counters.visited.lock().unwrap().push(url.to_string());
        match self.scripts.get(url) {
            Some(PageScript::Html(html)) => self.html = Some(html.clone()),
            Some(PageScript::NoAnchors) => {
                self.html = Some("<html><body><p>Loading...</p></body></html>".to_string())
            }
            Some(PageScript::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
            Some(PageScript::NavigationError(message)) => {
                return Err(ScrapeError::Navigation {
                    url: url.to_string(),
                    message: message.clone(),
                });
            }
            None => {
                let id = url.rsplit('/').next().unwrap_or(url);
                self.html = Some(product_page(&format!("Product {id}"), ""));
            }
        }
        Ok(())
    }

    async fn missing_anchors(&mut self, selectors: &[&str]) -> Result<Vec<String>, ScrapeError> {
        let html = self.html.as_deref().unwrap_or("");
        Ok(missing_anchors(html, selectors))
    }

    async fn snapshot(&mut self) -> Result<PageSnapshot, ScrapeError> {
        Ok(PageSnapshot::from_html(self.html.clone().unwrap_or_default()))
    }

    async fn close(self: Box<Self>) -> Result<(), ScrapeError> {
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
        self.counters.active.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A minimal product page carrying both readiness anchors.
pub fn product_page(title: &str, body_text: &str) -> String {
    format!(
        r#"<html><body>
  <span id="productTitle">{title}</span>
  <div id="altImages">
    <li class="imageThumbnail"><img src="https://m.media.example/I/a._US40_.jpg"></li>
  </div>
  <div id="corePriceDisplay_desktop_feature_div">
    <span class="priceToPay"><span class="a-price-whole">19.</span><span class="a-price-fraction">99</span></span>
  </div>
  <p>{body_text}</p>
</body></html>"#
    )
}

/// Short timeouts and no settle delay.
pub fn test_config() -> Config {
    Config {
        base_url: BASE_URL.to_string(),
        navigation_timeout_ms: 500,
        readiness_timeout_ms: 300,
        settle_delay: SettleDelay::none(),
        ..Default::default()
    }
}

/// Wraps a list of literals as owned targets.
pub fn targets(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}
