//! Page session operations used by the batch pipeline.
//!
//! These wrap a [`PageSession`] with the timeouts and polling the pipeline
//! relies on. Each target gets its own session, opened and closed here.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use chrono::Utc;
use log::{debug, warn};

use super::{EngineHandle, PageSession};
use crate::config::READINESS_POLL_INTERVAL;
use crate::error_handling::ScrapeError;
use crate::extract::{extract_record, BannedWords};
use crate::models::ProductRecord;

/// Opens a new tab on the shared engine.
pub async fn open(handle: &EngineHandle) -> Result<Box<dyn PageSession>, ScrapeError> {
    handle.engine().new_session().await
}

/// Navigates, failing with `NavigationTimeout` once `timeout` elapses.
pub async fn navigate(
    session: &mut dyn PageSession,
    url: &str,
    timeout: Duration,
) -> Result<(), ScrapeError> {
    debug!("Navigating to {url}");
    match tokio::time::timeout(timeout, session.goto(url)).await {
        Ok(result) => result,
        Err(_) => Err(ScrapeError::NavigationTimeout {
            url: url.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        }),
    }
}

/// Polls until every readiness anchor is present.
///
/// A failed check counts as every anchor still missing; the document is
/// often swapped out while redirects settle. Fails with `ReadinessTimeout`
/// naming the anchors still missing when `timeout` elapses. Not retried.
pub async fn wait_for_signals(
    session: &mut dyn PageSession,
    selectors: &[&str],
    timeout: Duration,
) -> Result<(), ScrapeError> {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        let check = tokio::time::timeout_at(deadline, session.missing_anchors(selectors)).await;
        let missing = match check {
            Ok(Ok(missing)) => missing,
            Ok(Err(e)) => {
                debug!("Readiness check failed, retrying: {e}");
                selectors.iter().map(|s| s.to_string()).collect()
            }
            Err(_) => selectors.iter().map(|s| s.to_string()).collect(),
        };
        if missing.is_empty() {
            return Ok(());
        }
        if tokio::time::Instant::now() + READINESS_POLL_INTERVAL > deadline {
            return Err(ScrapeError::ReadinessTimeout {
                timeout_ms: timeout.as_millis() as u64,
                missing,
            });
        }
        tokio::time::sleep(READINESS_POLL_INTERVAL).await;
    }
}

/// Snapshots the page and runs the extraction rules over it.
///
/// The rules themselves never fail; a panic inside them is turned into
/// `ScrapeError::Extraction` so it stays local to this target.
pub async fn extract(
    session: &mut dyn PageSession,
    banned_words: &BannedWords,
    source_url: &str,
) -> Result<ProductRecord, ScrapeError> {
    let snapshot = session.snapshot().await?;
    let captured_at = Utc::now();
    catch_unwind(AssertUnwindSafe(|| {
        extract_record(&snapshot, banned_words, source_url, captured_at)
    }))
    .map_err(|panic| {
        let message = panic
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "extraction panicked".to_string());
        ScrapeError::Extraction(message)
    })
}

/// Disposes of the tab. A failed close is logged and otherwise ignored.
pub async fn close(session: Box<dyn PageSession>) {
    if let Err(e) = session.close().await {
        warn!("Failed to close page session: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::extract::{missing_anchors, PageSnapshot};

    const READY_PAGE: &str =
        r#"<html><body><span id="productTitle">A</span><div id="altImages"></div></body></html>"#;

    /// Fails the first `failures` anchor checks, then serves `READY_PAGE`.
    struct FlakySession {
        failures: usize,
        checks: usize,
    }

    #[async_trait]
    impl PageSession for FlakySession {
        async fn goto(&mut self, _url: &str) -> Result<(), ScrapeError> {
            Ok(())
        }

        async fn missing_anchors(
            &mut self,
            selectors: &[&str],
        ) -> Result<Vec<String>, ScrapeError> {
            self.checks += 1;
            if self.checks <= self.failures {
                return Err(ScrapeError::Session(
                    "Execution context was destroyed".to_string(),
                ));
            }
            Ok(missing_anchors(READY_PAGE, selectors))
        }

        async fn snapshot(&mut self) -> Result<PageSnapshot, ScrapeError> {
            Ok(PageSnapshot::from_html(READY_PAGE))
        }

        async fn close(self: Box<Self>) -> Result<(), ScrapeError> {
            Ok(())
        }
    }

    const ANCHORS: &[&str] = &["#productTitle", "#altImages"];

    #[tokio::test]
    async fn test_wait_for_signals_survives_failed_check() {
        let mut session = FlakySession {
            failures: 1,
            checks: 0,
        };
        wait_for_signals(&mut session, ANCHORS, Duration::from_secs(2))
            .await
            .unwrap();
        assert_eq!(session.checks, 2);
    }

    #[tokio::test]
    async fn test_wait_for_signals_times_out_when_checks_keep_failing() {
        let mut session = FlakySession {
            failures: usize::MAX,
            checks: 0,
        };
        let err = wait_for_signals(&mut session, ANCHORS, Duration::from_millis(600))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            ScrapeError::ReadinessTimeout {
                timeout_ms: 600,
                missing: vec!["#productTitle".to_string(), "#altImages".to_string()],
            }
        );
        assert!(session.checks > 1);
    }
}
