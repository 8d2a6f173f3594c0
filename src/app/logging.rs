//! Progress logging for batches.

use log::{debug, info};

use crate::batch::{BatchResult, JobOutcome, ProgressObserver};

/// Logs batch progress through the `log` facade.
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn begin(&self, total: usize) {
        info!(
            "Starting batch of {total} target{}",
            if total == 1 { "" } else { "s" }
        );
    }

    fn target_started(&self, index: usize, total: usize, url: &str) {
        info!("[{}/{}] Processing {}", index + 1, total, url);
    }

    fn target_finished(&self, index: usize, total: usize, outcome: &JobOutcome) {
        match outcome {
            JobOutcome::Success(record) => debug!(
                "[{}/{}] Done: {}",
                index + 1,
                total,
                record.title.as_deref().unwrap_or("(no title)")
            ),
            JobOutcome::Failure { error, .. } => {
                debug!("[{}/{}] Failed: {}", index + 1, total, error)
            }
        }
    }

    fn finish(&self, result: &BatchResult) {
        let elapsed_secs = result.elapsed_seconds();
        let rate = if elapsed_secs > 0.0 {
            result.len() as f64 / elapsed_secs
        } else {
            0.0
        };
        info!(
            "Processed {} targets in {:.2} seconds (~{:.2} targets/sec)",
            result.len(),
            elapsed_secs,
            rate
        );
    }
}
