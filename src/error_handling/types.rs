//! Error type definitions.
//!
//! This module defines all error, warning, and info types used throughout the application.

use std::path::PathBuf;

use chrono::NaiveDate;
use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// The JSON config file could not be read or parsed.
    #[error("Config file error: {0}")]
    ConfigFileError(String),

    /// The trial window configured in the config file has ended.
    #[error("Trial expired on {0}")]
    TrialExpired(NaiveDate),
}

/// A configuration value the pipeline cannot run with.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid configuration for {field}: {message}")]
pub struct ConfigValidationError {
    /// Name of the offending `Config` field
    pub field: &'static str,
    /// What is wrong with its value
    pub message: String,
}

impl ConfigValidationError {
    /// Creates an error for `field`.
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Errors raised while driving the browsing engine through a target.
///
/// Everything except `EngineLaunch` is local to one target and ends up as a
/// `JobOutcome::Failure`; `EngineLaunch` aborts the whole batch.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScrapeError {
    /// The browsing engine process could not be started.
    #[error("Failed to launch browsing engine: {0}")]
    EngineLaunch(String),

    /// The target is not a usable http(s) URL.
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    /// The page did not finish loading in time.
    #[error("Navigation timeout after {timeout_ms} ms: {url}")]
    NavigationTimeout {
        /// Target being loaded
        url: String,
        /// Ceiling that was exceeded
        timeout_ms: u64,
    },

    /// The engine reported a navigation failure.
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// Target being loaded
        url: String,
        /// Engine's description of the failure
        message: String,
    },

    /// The readiness anchors never appeared.
    #[error("Readiness timeout: anchors {missing:?} not present after {timeout_ms} ms")]
    ReadinessTimeout {
        /// Ceiling that was exceeded
        timeout_ms: u64,
        /// Anchors still absent at the deadline
        missing: Vec<String>,
    },

    /// Opening, probing or closing a tab failed.
    #[error("Page session error: {0}")]
    Session(String),

    /// Field extraction aborted unexpectedly.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// The batch was cancelled before this target completed.
    #[error("Batch cancelled")]
    Cancelled,
}

impl ScrapeError {
    /// Statistics bucket for this error.
    pub fn error_type(&self) -> ErrorType {
        match self {
            ScrapeError::EngineLaunch(_) => ErrorType::EngineLaunchError,
            ScrapeError::InvalidTarget(_) => ErrorType::InvalidTarget,
            ScrapeError::NavigationTimeout { .. } => ErrorType::NavigationTimeout,
            ScrapeError::Navigation { .. } => ErrorType::NavigationError,
            ScrapeError::ReadinessTimeout { .. } => ErrorType::ReadinessTimeout,
            ScrapeError::Session(_) => ErrorType::SessionError,
            ScrapeError::Extraction(_) => ErrorType::ExtractionError,
            ScrapeError::Cancelled => ErrorType::Cancelled,
        }
    }
}

/// Error types for table export.
#[derive(Error, Debug)]
pub enum ExportError {
    /// There were no rows to write.
    #[error("No rows to export")]
    Empty,

    /// The output file could not be created.
    #[error("Failed to create {}: {source}", path.display())]
    Create {
        /// Requested output path
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Writing to the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV writer failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A row could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Types of errors that can occur while processing a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    /// See [`ScrapeError::EngineLaunch`]
    EngineLaunchError,
    /// See [`ScrapeError::InvalidTarget`]
    InvalidTarget,
    /// See [`ScrapeError::NavigationTimeout`]
    NavigationTimeout,
    /// See [`ScrapeError::Navigation`]
    NavigationError,
    /// See [`ScrapeError::ReadinessTimeout`]
    ReadinessTimeout,
    /// See [`ScrapeError::Session`]
    SessionError,
    /// See [`ScrapeError::Extraction`]
    ExtractionError,
    /// See [`ScrapeError::Cancelled`]
    Cancelled,
}

/// Types of warnings: key fields missing from an otherwise successful record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
#[allow(clippy::enum_variant_names)] // All variants start with "Missing" by design
pub enum WarningType {
    /// No product title
    MissingTitle,
    /// No gallery images
    MissingImages,
    /// No final price
    MissingFinalPrice,
    /// No star rating
    MissingRating,
}

/// Types of informational metrics about successful records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    /// At least one banned word appeared in the page text
    BannedWordsFound,
    /// A coupon is offered
    CouponPresent,
    /// The featured-choice badge is shown
    FeaturedChoice,
    /// No discount shown, so the list price was set to the final price
    NoDiscountFallback,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    /// Label used in the statistics summary.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::EngineLaunchError => "Engine launch error",
            ErrorType::InvalidTarget => "Invalid target",
            ErrorType::NavigationTimeout => "Navigation timeout",
            ErrorType::NavigationError => "Navigation error",
            ErrorType::ReadinessTimeout => "Readiness timeout",
            ErrorType::SessionError => "Page session error",
            ErrorType::ExtractionError => "Extraction error",
            ErrorType::Cancelled => "Cancelled",
        }
    }
}

impl WarningType {
    /// Label used in the statistics summary.
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningType::MissingTitle => "Missing title",
            WarningType::MissingImages => "Missing images",
            WarningType::MissingFinalPrice => "Missing final price",
            WarningType::MissingRating => "Missing rating",
        }
    }
}

impl InfoType {
    /// Label used in the statistics summary.
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::BannedWordsFound => "Banned words found",
            InfoType::CouponPresent => "Coupon present",
            InfoType::FeaturedChoice => "Featured choice badge",
            InfoType::NoDiscountFallback => "No discount (list price = final price)",
        }
    }
}
