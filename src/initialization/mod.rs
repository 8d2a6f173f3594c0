//! Application initialization and resource setup.
//!
//! This module provides functions to initialize shared resources:
//! - The logger (plain or JSON format)
//! - The production browsing-engine launcher
//!
//! All initialization functions return proper error types for error handling.

mod logger;

use crate::browser::{ChromeLauncher, EngineLauncher};
use crate::config::Config;

// Re-export public API
pub use logger::{init_logger, init_logger_with};

/// Builds the Chromium launcher described by the configuration.
///
/// Nothing is started here; the process is launched lazily on the first
/// batch that needs it.
pub fn init_launcher(config: &Config) -> Box<dyn EngineLauncher> {
    match &config.chrome_executable {
        Some(path) => log::debug!("Using Chromium executable {}", path.display()),
        None => log::debug!("Chromium executable will be auto-detected"),
    }
    Box::new(ChromeLauncher::new(config.chrome_executable.clone()))
}
