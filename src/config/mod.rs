//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, launch profile, selectors, delimiters)
//! - The library `Config` and CLI option types
//! - The optional JSON config file with the trial window

mod constants;
mod file;
mod types;

// Re-export all constants
pub use constants::*;
pub use file::{check_trial, load_app_config, AppFileConfig, TrialConfig};
pub use types::{Config, LogFormat, LogLevel, Opt, SettleDelay};
