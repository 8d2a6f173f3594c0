//! Per-target outcomes and the batch result.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error_handling::ScrapeError;
use crate::models::ProductRecord;
use crate::utils::sanitize_and_truncate_error_message;

/// Result of one target. Every target produces exactly one outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobOutcome {
    /// The page was extracted.
    Success(ProductRecord),
    /// The target failed at some stage; the batch carried on.
    Failure {
        /// Completed URL of the target
        source_url: String,
        /// Sanitized, truncated error message
        error: String,
        /// When the failure was recorded
        timestamp: DateTime<Utc>,
    },
}

impl JobOutcome {
    /// Builds a failure outcome stamped with the current time.
    pub fn failure(source_url: impl Into<String>, error: &ScrapeError) -> Self {
        JobOutcome::Failure {
            source_url: source_url.into(),
            error: sanitize_and_truncate_error_message(&error.to_string()),
            timestamp: Utc::now(),
        }
    }

    /// Completed URL this outcome belongs to.
    pub fn source_url(&self) -> &str {
        match self {
            JobOutcome::Success(record) => &record.source_url,
            JobOutcome::Failure { source_url, .. } => source_url,
        }
    }

    /// Whether a record was produced.
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Success(_))
    }

    /// The extracted record, if any.
    pub fn record(&self) -> Option<&ProductRecord> {
        match self {
            JobOutcome::Success(record) => Some(record),
            JobOutcome::Failure { .. } => None,
        }
    }

    /// The failure message, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            JobOutcome::Success(_) => None,
            JobOutcome::Failure { error, .. } => Some(error),
        }
    }
}

/// Summary counts of a completed batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BatchSummary {
    /// Number of targets (and outcomes)
    pub total: usize,
    /// Targets that produced a record
    pub successful: usize,
    /// Targets recorded as failures
    pub failed: usize,
    /// Wall-clock duration of the batch in seconds
    pub elapsed_seconds: f64,
}

/// Ordered outcomes of one batch, one per target in input order.
///
/// Only the pipeline appends to it; callers receive it complete.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchResult {
    outcomes: Vec<JobOutcome>,
    elapsed_seconds: f64,
}

impl BatchResult {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            outcomes: Vec::with_capacity(capacity),
            elapsed_seconds: 0.0,
        }
    }

    pub(crate) fn push(&mut self, outcome: JobOutcome) {
        self.outcomes.push(outcome);
    }

    pub(crate) fn set_elapsed(&mut self, elapsed_seconds: f64) {
        self.elapsed_seconds = elapsed_seconds;
    }

    /// Outcomes in input order.
    pub fn outcomes(&self) -> &[JobOutcome] {
        &self.outcomes
    }

    /// Consumes the result, yielding its outcomes.
    pub fn into_outcomes(self) -> Vec<JobOutcome> {
        self.outcomes
    }

    /// Number of outcomes.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether the batch had no targets.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Records of the successful targets, in input order.
    pub fn successful(&self) -> impl Iterator<Item = &ProductRecord> {
        self.outcomes.iter().filter_map(JobOutcome::record)
    }

    /// Failed outcomes, in input order.
    pub fn failed(&self) -> impl Iterator<Item = &JobOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// Wall-clock duration of the batch.
    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    /// Counts for the end-of-run summary.
    pub fn summary(&self) -> BatchSummary {
        let successful = self.successful().count();
        BatchSummary {
            total: self.outcomes.len(),
            successful,
            failed: self.outcomes.len() - successful,
            elapsed_seconds: self.elapsed_seconds,
        }
    }
}
