//! listing_harvest library: product listing extraction through a headless browser
//!
//! This library drives a single headless Chromium through a list of product
//! pages, extracts a fixed set of listing fields from each one and exports the
//! results as a flat table.
//!
//! # Example
//!
//! ```no_run
//! use listing_harvest::{Config, Harvester};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let harvester = Harvester::new(Config::default());
//!
//! let result = harvester
//!     .run_batch(&["B000123456".to_string()], "widget, broken")
//!     .await?;
//! println!(
//!     "Processed {} targets: {} succeeded",
//!     result.len(),
//!     result.successful().count()
//! );
//!
//! harvester.shutdown_engine().await;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime and a Chromium or Chrome executable.

#![warn(missing_docs)]

mod app;
pub mod batch;
pub mod browser;
pub mod config;
mod error_handling;
pub mod export;
pub mod extract;
pub mod initialization;
mod models;
mod utils;

// Re-export public API
pub use app::{
    cancel_on_interrupt, collect_targets, print_batch_summary, read_targets_file, LogProgress,
};
pub use batch::{BatchResult, BatchSummary, JobOutcome, NullProgress, ProgressObserver};
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{
    ConfigValidationError, ErrorType, ExportError, InfoType, InitializationError,
    ProcessingStats, ScrapeError, WarningType,
};
pub use export::{outcomes_to_rows, ExportFormat, ExportOptions, ExportResult, TableRow};
pub use models::{ProductRecord, Target};
pub use run::{Harvester, ShutdownResult};

// Internal run module (owns the engine and serializes batches)
mod run {
    use log::{debug, info, warn};
    use tokio::sync::Mutex;
    use tokio_util::sync::CancellationToken;

    use crate::app::{normalize_targets, print_error_statistics};
    use crate::batch::{
        run_pipeline, BatchContext, BatchOptions, BatchResult, NullProgress, ProgressObserver,
    };
    use crate::browser::{EngineLauncher, EngineLifecycle};
    use crate::config::Config;
    use crate::error_handling::{ProcessingStats, ScrapeError};
    use crate::export::{export_table, ExportOptions, ExportResult, TableRow};
    use crate::extract::BannedWords;
    use crate::initialization::init_launcher;
    use crate::utils::sanitize_and_truncate_error_message;

    /// Outcome of [`Harvester::shutdown_engine`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ShutdownResult {
        /// `true` when the engine is gone (or was never running)
        pub success: bool,
        /// Why the shutdown reported a failure
        pub error: Option<String>,
    }

    /// Entry point of the library.
    ///
    /// Owns the configuration and the engine lifecycle. The engine is
    /// launched by the first batch and reused by later ones until
    /// [`shutdown_engine`](Self::shutdown_engine) is called. Batches never
    /// overlap: a second call waits until the first one has finished.
    pub struct Harvester {
        config: Config,
        lifecycle: EngineLifecycle,
        batch_gate: Mutex<()>,
    }

    impl Harvester {
        /// Creates a harvester backed by a local Chromium.
        pub fn new(config: Config) -> Self {
            let launcher = init_launcher(&config);
            Self::with_launcher(config, launcher)
        }

        /// Creates a harvester with a custom engine launcher.
        pub fn with_launcher(config: Config, launcher: Box<dyn EngineLauncher>) -> Self {
            Self {
                config,
                lifecycle: EngineLifecycle::new(launcher),
                batch_gate: Mutex::new(()),
            }
        }

        /// Configuration the harvester was built with.
        pub fn config(&self) -> &Config {
            &self.config
        }

        /// Runs one batch with no progress reporting and no cancellation.
        ///
        /// See [`run_batch_with`](Self::run_batch_with).
        pub async fn run_batch(
            &self,
            targets: &[String],
            banned_words: &str,
        ) -> Result<BatchResult, ScrapeError> {
            let cancel = CancellationToken::new();
            self.run_batch_with(targets, banned_words, &NullProgress, &cancel)
                .await
        }

        /// Runs one batch: one outcome per target, in input order.
        ///
        /// Each raw target is split on whitespace and completed against the
        /// configured base URL. `banned_words` is a comma-separated list.
        ///
        /// # Errors
        ///
        /// Returns `ScrapeError::EngineLaunch` when the engine cannot be
        /// started. Per-target failures never abort the batch; they are
        /// recorded as `JobOutcome::Failure`.
        pub async fn run_batch_with(
            &self,
            targets: &[String],
            banned_words: &str,
            progress: &dyn ProgressObserver,
            cancel: &CancellationToken,
        ) -> Result<BatchResult, ScrapeError> {
            let _gate = self.batch_gate.lock().await;

            let targets = normalize_targets(targets, &self.config.base_url);
            if targets.is_empty() {
                debug!("Empty target list; engine left untouched");
                return Ok(BatchResult::with_capacity(0));
            }

            let handle = self.lifecycle.acquire().await?;
            let banned = BannedWords::parse(banned_words);
            if !banned.is_empty() {
                debug!("Checking {} banned words", banned.words().len());
            }
            let options = BatchOptions::from_config(&self.config);
            let stats = ProcessingStats::new();

            let ctx = BatchContext {
                handle: &handle,
                banned_words: &banned,
                options: &options,
                progress,
                cancel,
                stats: &stats,
            };
            let result = run_pipeline(&ctx, &targets).await;

            print_error_statistics(&stats);
            Ok(result)
        }

        /// Terminates the engine if one is running.
        ///
        /// Waits for any running batch to finish first. Calling it with no
        /// engine running succeeds, so it is safe to call more than once.
        pub async fn shutdown_engine(&self) -> ShutdownResult {
            let _gate = self.batch_gate.lock().await;
            match self.lifecycle.release().await {
                Ok(released) => {
                    if released {
                        info!("Browsing engine shut down");
                    }
                    ShutdownResult {
                        success: true,
                        error: None,
                    }
                }
                Err(e) => {
                    warn!("Browsing engine shutdown failed: {e}");
                    ShutdownResult {
                        success: false,
                        error: Some(sanitize_and_truncate_error_message(&e.to_string())),
                    }
                }
            }
        }

        /// Writes rows to the configured destination. Never fails; see
        /// [`ExportResult`].
        pub fn export_table(&self, rows: &[TableRow], options: &ExportOptions) -> ExportResult {
            export_table(rows, options)
        }

        /// Whether an engine is currently running.
        pub async fn is_engine_active(&self) -> bool {
            self.lifecycle.is_active().await
        }

        /// Number of engine launches so far.
        pub fn launch_count(&self) -> u64 {
            self.lifecycle.launch_count()
        }
    }
}
