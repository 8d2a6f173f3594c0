//! Sequential batch pipeline.
//!
//! Drives each target through open, navigate, readiness wait, settle delay
//! and extraction, closing the session on every path. A failing target is
//! recorded and the batch moves on; only the caller decides when the engine
//! is released.

use std::future::Future;
use std::time::{Duration, Instant};

use log::{debug, warn};
use tokio_util::sync::CancellationToken;

use super::outcome::{BatchResult, JobOutcome};
use super::progress::ProgressObserver;
use crate::app::validate_target_url;
use crate::browser::{session, EngineHandle, PageSession};
use crate::config::{Config, SettleDelay};
use crate::error_handling::{ProcessingStats, ScrapeError};
use crate::extract::BannedWords;
use crate::models::{ProductRecord, Target};

/// Per-target timing and readiness settings.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Ceiling for one page load
    pub navigation_timeout: Duration,
    /// Ceiling for the readiness anchors to appear
    pub readiness_timeout: Duration,
    /// Anchors that must all match before extraction; empty skips the wait
    pub readiness_selectors: Vec<String>,
    /// Random pause between readiness and extraction
    pub settle_delay: SettleDelay,
}

impl BatchOptions {
    /// Takes the timings from `config`, dropping blank selectors.
    pub fn from_config(config: &Config) -> Self {
        Self {
            navigation_timeout: config.navigation_timeout(),
            readiness_timeout: config.readiness_timeout(),
            readiness_selectors: config
                .readiness_selectors
                .iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            settle_delay: config.settle_delay,
        }
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Shared, read-only inputs of one batch.
pub struct BatchContext<'a> {
    /// Engine every session is opened on
    pub handle: &'a EngineHandle,
    /// Words flagged in each page's visible text
    pub banned_words: &'a BannedWords,
    /// Per-target timings
    pub options: &'a BatchOptions,
    /// Notified before and after each target
    pub progress: &'a dyn ProgressObserver,
    /// Checked between targets
    pub cancel: &'a CancellationToken,
    /// Failure and warning counters for the run
    pub stats: &'a ProcessingStats,
}

/// Runs every target in order and returns one outcome per target.
///
/// After cancellation, the target in flight and every target not yet started
/// are recorded as `Batch cancelled` failures.
pub async fn run_pipeline(ctx: &BatchContext<'_>, targets: &[Target]) -> BatchResult {
    let started = Instant::now();
    let total = targets.len();
    let mut result = BatchResult::with_capacity(total);
    ctx.progress.begin(total);

    for (index, target) in targets.iter().enumerate() {
        let url = target.as_str();
        let outcome = if ctx.cancel.is_cancelled() {
            debug!("Skipping {url}: batch cancelled");
            Err(ScrapeError::Cancelled)
        } else {
            ctx.progress.target_started(index, total, url);
            process_target(ctx, url).await
        };

        let outcome = match outcome {
            Ok(record) => {
                ctx.stats.record_product(&record);
                JobOutcome::Success(record)
            }
            Err(e) => {
                ctx.stats.increment_error(e.error_type());
                if e != ScrapeError::Cancelled {
                    warn!("Failed to process {url}: {e}");
                }
                JobOutcome::failure(url, &e)
            }
        };
        ctx.progress.target_finished(index, total, &outcome);
        result.push(outcome);
    }

    result.set_elapsed(started.elapsed().as_secs_f64());
    ctx.progress.finish(&result);
    result
}

async fn process_target(ctx: &BatchContext<'_>, url: &str) -> Result<ProductRecord, ScrapeError> {
    validate_target_url(url)?;

    let mut page = session::open(ctx.handle).await?;
    let result = drive_session(ctx, page.as_mut(), url).await;
    session::close(page).await;
    result
}

async fn drive_session(
    ctx: &BatchContext<'_>,
    page: &mut dyn PageSession,
    url: &str,
) -> Result<ProductRecord, ScrapeError> {
    let options = ctx.options;

    until_cancelled(
        ctx.cancel,
        session::navigate(page, url, options.navigation_timeout),
    )
    .await?;

    let anchors: Vec<&str> = options
        .readiness_selectors
        .iter()
        .map(String::as_str)
        .collect();
    until_cancelled(
        ctx.cancel,
        session::wait_for_signals(page, &anchors, options.readiness_timeout),
    )
    .await?;

    let pause = options.settle_delay.pick();
    debug!("Settling {} ms before extracting {url}", pause.as_millis());
    until_cancelled(ctx.cancel, async {
        tokio::time::sleep(pause).await;
        Ok(())
    })
    .await?;

    session::extract(page, ctx.banned_words, url).await
}

/// Races a step against cancellation.
async fn until_cancelled<T>(
    cancel: &CancellationToken,
    step: impl Future<Output = Result<T, ScrapeError>>,
) -> Result<T, ScrapeError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ScrapeError::Cancelled),
        result = step => result,
    }
}
