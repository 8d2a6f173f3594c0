//! Progress reporting hooks for the batch pipeline.

use super::outcome::{BatchResult, JobOutcome};

/// Receives progress events while a batch runs.
///
/// Every method has a no-op default, so observers implement only what they
/// need.
pub trait ProgressObserver: Send + Sync {
    /// Called once before the first target.
    fn begin(&self, _total: usize) {}

    /// Called before work on a target starts. `index` is zero-based.
    fn target_started(&self, _index: usize, _total: usize, _url: &str) {}

    /// Called after the target's outcome has been recorded.
    fn target_finished(&self, _index: usize, _total: usize, _outcome: &JobOutcome) {}

    /// Called once after the last outcome, cancelled or not.
    fn finish(&self, _result: &BatchResult) {}
}

/// A no-op progress sink.
pub struct NullProgress;

impl ProgressObserver for NullProgress {}
