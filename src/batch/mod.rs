//! Batch extraction pipeline.
//!
//! This module provides:
//! - Per-target outcomes and the ordered batch result
//! - Progress reporting hooks
//! - The sequential pipeline driving targets through page sessions

mod outcome;
mod pipeline;
mod progress;

pub use outcome::{BatchResult, BatchSummary, JobOutcome};
pub use pipeline::{run_pipeline, BatchContext, BatchOptions};
pub use progress::{NullProgress, ProgressObserver};
