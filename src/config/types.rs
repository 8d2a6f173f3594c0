//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use rand::Rng;

use crate::config::constants::{
    DEFAULT_BASE_URL, NAVIGATION_TIMEOUT_MS, READINESS_SELECTORS, READINESS_TIMEOUT_MS,
    SETTLE_DELAY_MAX_MS, SETTLE_DELAY_MIN_MS,
};
use crate::config::file::AppFileConfig;
use crate::error_handling::ConfigValidationError;
use crate::export::ExportFormat;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Bounds of the randomized pause between readiness and extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleDelay {
    /// Lower bound in milliseconds (inclusive)
    pub min_ms: u64,
    /// Upper bound in milliseconds (inclusive)
    pub max_ms: u64,
}

impl SettleDelay {
    /// A settle delay that does not pause at all.
    pub const fn none() -> Self {
        Self {
            min_ms: 0,
            max_ms: 0,
        }
    }

    /// Picks a pause length inside the bounds.
    pub fn pick(&self) -> Duration {
        if self.max_ms <= self.min_ms {
            return Duration::from_millis(self.min_ms);
        }
        let ms = rand::rng().random_range(self.min_ms..=self.max_ms);
        Duration::from_millis(ms)
    }
}

impl Default for SettleDelay {
    fn default() -> Self {
        Self {
            min_ms: SETTLE_DELAY_MIN_MS,
            max_ms: SETTLE_DELAY_MAX_MS,
        }
    }
}

/// Library configuration (no CLI dependencies).
///
/// # Examples
///
/// ```no_run
/// use listing_harvest::Config;
///
/// let config = Config {
///     base_url: "https://www.amazon.com/dp/".to_string(),
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Prefix completed onto bare product identifiers
    pub base_url: String,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Chromium executable; auto-detected when `None`
    pub chrome_executable: Option<PathBuf>,

    /// Page load ceiling in milliseconds
    pub navigation_timeout_ms: u64,

    /// Readiness anchor ceiling in milliseconds
    pub readiness_timeout_ms: u64,

    /// Anchors that must exist before extraction
    pub readiness_selectors: Vec<String>,

    /// Pause between readiness and extraction
    pub settle_delay: SettleDelay,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            chrome_executable: None,
            navigation_timeout_ms: NAVIGATION_TIMEOUT_MS,
            readiness_timeout_ms: READINESS_TIMEOUT_MS,
            readiness_selectors: READINESS_SELECTORS.iter().map(|s| s.to_string()).collect(),
            settle_delay: SettleDelay::default(),
        }
    }
}

impl Config {
    /// Checks the configuration for values the pipeline cannot run with.
    ///
    /// # Errors
    ///
    /// Returns the first offending field with a message describing the
    /// accepted range.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.navigation_timeout_ms == 0 {
            return Err(ConfigValidationError::new(
                "navigation_timeout_ms",
                "must be greater than 0",
            ));
        }
        if self.readiness_timeout_ms == 0 {
            return Err(ConfigValidationError::new(
                "readiness_timeout_ms",
                "must be greater than 0",
            ));
        }
        if self.readiness_selectors.iter().all(|s| s.trim().is_empty()) {
            return Err(ConfigValidationError::new(
                "readiness_selectors",
                "at least one readiness anchor is required",
            ));
        }
        if let Some(bad) = self
            .readiness_selectors
            .iter()
            .map(|s| s.trim())
            .find(|s| !s.is_empty() && scraper::Selector::parse(s).is_err())
        {
            return Err(ConfigValidationError::new(
                "readiness_selectors",
                format!("'{bad}' is not a valid CSS selector"),
            ));
        }
        if self.settle_delay.min_ms > self.settle_delay.max_ms {
            return Err(ConfigValidationError::new(
                "settle_delay",
                format!(
                    "minimum ({} ms) must not exceed maximum ({} ms)",
                    self.settle_delay.min_ms, self.settle_delay.max_ms
                ),
            ));
        }
        if !self.base_url.is_empty() {
            match url::Url::parse(&self.base_url) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
                _ => {
                    return Err(ConfigValidationError::new(
                        "base_url",
                        format!(
                            "'{}' is not an http(s) URL (expected e.g. {DEFAULT_BASE_URL})",
                            self.base_url
                        ),
                    ))
                }
            }
        }
        Ok(())
    }

    /// `navigation_timeout_ms` as a `Duration`.
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    /// `readiness_timeout_ms` as a `Duration`.
    pub fn readiness_timeout(&self) -> Duration {
        Duration::from_millis(self.readiness_timeout_ms)
    }
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Bare product IDs are completed with the base URL
/// listing_harvest B000123456 B000999999 --banned-words "widget, broken"
///
/// # Targets from a file, exported to CSV
/// listing_harvest --file targets.txt --output products.csv
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "listing_harvest",
    about = "Extracts product listing data from product pages using a headless browser."
)]
pub struct Opt {
    /// Product URLs or bare product identifiers
    #[arg(value_parser)]
    pub targets: Vec<String>,

    /// File with one target per line (`#` starts a comment)
    #[arg(long, value_parser)]
    pub file: Option<PathBuf>,

    /// Comma-separated banned words to look for in the page text
    #[arg(long, default_value = "")]
    pub banned_words: String,

    /// Prefix completed onto bare identifiers (overrides the config file)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Export file; results are only printed when omitted
    #[arg(long, value_parser)]
    pub output: Option<PathBuf>,

    /// Export format: csv|jsonl
    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    pub format: ExportFormat,

    /// Chromium executable (auto-detected when omitted)
    #[arg(long, value_parser)]
    pub chrome_path: Option<PathBuf>,

    /// Page load timeout in milliseconds
    #[arg(long, default_value_t = NAVIGATION_TIMEOUT_MS)]
    pub navigation_timeout_ms: u64,

    /// Readiness anchor timeout in milliseconds
    #[arg(long, default_value_t = READINESS_TIMEOUT_MS)]
    pub readiness_timeout_ms: u64,

    /// JSON config file (base URL, trial expiry)
    #[arg(long, value_parser)]
    pub config: Option<PathBuf>,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Opt {
    /// Builds the library configuration. CLI flags win over the config file,
    /// which wins over the built-in defaults.
    pub fn to_config(&self, file: Option<&AppFileConfig>) -> Config {
        let base_url = self
            .base_url
            .clone()
            .or_else(|| file.and_then(|f| f.base_url.clone()))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Config {
            base_url,
            log_level: self.log_level.clone(),
            log_format: self.log_format.clone(),
            chrome_executable: self.chrome_path.clone(),
            navigation_timeout_ms: self.navigation_timeout_ms,
            readiness_timeout_ms: self.readiness_timeout_ms,
            ..Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.base_url, "https://www.amazon.com/dp/");
        assert_eq!(config.navigation_timeout_ms, 60_000);
        assert_eq!(config.readiness_timeout_ms, 20_000);
        assert_eq!(config.readiness_selectors, vec!["#productTitle", "#altImages"]);
        assert_eq!(config.settle_delay, SettleDelay { min_ms: 500, max_ms: 1500 });
        assert!(config.chrome_executable.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_timeouts() {
        let config = Config {
            navigation_timeout_ms: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.field, "navigation_timeout_ms");
        assert!(err.message.contains("greater than 0"));

        let config = Config {
            readiness_timeout_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap_err().field, "readiness_timeout_ms");
    }

    #[test]
    fn test_validate_rejects_inverted_settle_delay() {
        let config = Config {
            settle_delay: SettleDelay {
                min_ms: 900,
                max_ms: 100,
            },
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.field, "settle_delay");
        assert!(err.message.contains("900"));
    }

    #[test]
    fn test_validate_base_url() {
        let config = Config {
            base_url: "ftp://example.com/dp/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap_err().field, "base_url");

        // An empty prefix disables completion altogether
        let config = Config {
            base_url: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_requires_an_anchor() {
        let config = Config {
            readiness_selectors: vec!["  ".to_string()],
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap_err().field, "readiness_selectors");
    }

    #[test]
    fn test_validate_rejects_malformed_anchor() {
        let config = Config {
            readiness_selectors: vec!["#productTitle".to_string(), "div[".to_string()],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.field, "readiness_selectors");
        assert!(err.message.contains("div["));
    }

    #[test]
    fn test_settle_delay_pick_stays_in_bounds() {
        let delay = SettleDelay::default();
        for _ in 0..50 {
            let picked = delay.pick();
            assert!(picked >= Duration::from_millis(500));
            assert!(picked <= Duration::from_millis(1500));
        }
        assert_eq!(SettleDelay::none().pick(), Duration::ZERO);
    }

    #[test]
    fn test_opt_to_config_precedence() {
        let opt = Opt::parse_from(["listing_harvest", "B000123456"]);
        let file = AppFileConfig {
            base_url: Some("https://example.com/dp/".to_string()),
            trial: None,
        };
        assert_eq!(opt.to_config(Some(&file)).base_url, "https://example.com/dp/");
        assert_eq!(opt.to_config(None).base_url, DEFAULT_BASE_URL);

        let opt = Opt::parse_from([
            "listing_harvest",
            "B000123456",
            "--base-url",
            "https://shop.test/item/",
        ]);
        assert_eq!(opt.to_config(Some(&file)).base_url, "https://shop.test/item/");
    }
}
