//! Error handling and processing statistics.
//!
//! This module provides:
//! - Error type definitions for initialization, configuration, scraping and export
//! - Processing statistics tracking (errors, warnings, info metrics)
//!
//! Statistics are categorized into:
//! - **Errors**: Per-target failures recorded as `JobOutcome::Failure`
//! - **Warnings**: Key fields absent from a successful record
//! - **Info**: Informational metrics (coupon, featured badge, banned words)

mod stats;
mod types;

// Re-export public API
pub use stats::ProcessingStats;
pub use types::{
    ConfigValidationError, ErrorType, ExportError, InfoType, InitializationError, ScrapeError,
    WarningType,
};
