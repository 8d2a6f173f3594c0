//! Main application modules.
//!
//! This module provides target handling, progress logging, interrupt handling
//! and statistics printing used by the harvester and the binary.

pub mod logging;
pub mod shutdown;
pub mod statistics;
pub mod targets;

// Re-export public API
pub use logging::LogProgress;
pub use shutdown::cancel_on_interrupt;
pub use statistics::{print_batch_summary, print_error_statistics};
pub use targets::{collect_targets, normalize_targets, read_targets_file, validate_target_url};
