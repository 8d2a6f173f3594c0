//! Logger setup for the harvester binary.

use std::io::Write;

use chrono::{DateTime, Local, SecondsFormat};
use colored::*;
use log::{Level, LevelFilter};

use crate::config::{Config, LogFormat};
use crate::error_handling::InitializationError;

/// Installs the global logger using the level and format carried by `config`.
pub fn init_logger(config: &Config) -> Result<(), InitializationError> {
    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
}

/// Installs the global logger.
///
/// `RUST_LOG` is read first so per-module directives still apply, then
/// `level` replaces the global default and the crate's own filter.
/// Chromium's CDP handler is silenced: it logs every event it cannot
/// decode, which is routine with current browser builds.
///
/// ```bash
/// RUST_LOG=listing_harvest::browser=trace listing_harvest --file targets.txt
/// ```
///
/// Fails with `InitializationError::LoggerError` if a logger is already
/// installed.
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    colored::control::set_override(true);

    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level);
    builder.filter_module("html5ever", LevelFilter::Error);
    builder.filter_module("selectors", LevelFilter::Warn);
    builder.filter_module("chromiumoxide", LevelFilter::Off);
    builder.filter_module("tungstenite", LevelFilter::Warn);
    builder.filter_module("listing_harvest", level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                let line = json_line(
                    Local::now(),
                    record.level(),
                    record.module_path().unwrap_or(record.target()),
                    &record.args().to_string(),
                );
                writeln!(buf, "{line}")
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{} {} {} {}",
                    Local::now().format("%H:%M:%S").to_string().dimmed(),
                    colored_level(record.level()),
                    record.module_path().unwrap_or(record.target()).cyan(),
                    record.args()
                )
            });
        }
    }

    builder.try_init().map_err(InitializationError::from)?;
    Ok(())
}

/// One structured log record: `time`, `level`, `module`, `msg`.
fn json_line(time: DateTime<Local>, level: Level, module: &str, msg: &str) -> String {
    serde_json::json!({
        "time": time.to_rfc3339_opts(SecondsFormat::Millis, false),
        "level": level.as_str(),
        "module": module,
        "msg": msg,
    })
    .to_string()
}

fn colored_level(level: Level) -> ColoredString {
    let label = format!("{:<5}", level.as_str());
    match level {
        Level::Error => label.red().bold(),
        Level::Warn => label.yellow(),
        Level::Info => label.green(),
        Level::Debug => label.blue(),
        Level::Trace => label.purple(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_json_line_fields() {
        let time = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        let line = json_line(
            time,
            Level::Warn,
            "listing_harvest::browser::session",
            "Readiness wait for \"https://example.com/dp/B01\" timed out",
        );
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();

        assert_eq!(value["level"], "WARN");
        assert_eq!(value["module"], "listing_harvest::browser::session");
        assert_eq!(
            value["msg"],
            "Readiness wait for \"https://example.com/dp/B01\" timed out"
        );
        let parsed = DateTime::parse_from_rfc3339(value["time"].as_str().unwrap()).unwrap();
        assert_eq!(parsed, time);
        assert!(!line.contains('\n'));
    }

    #[test]
    fn test_json_line_escapes_multiline_messages() {
        let line = json_line(Local::now(), Level::Error, "listing_harvest", "first\nsecond");
        assert!(!line.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["msg"], "first\nsecond");
    }

    #[test]
    fn test_second_install_reports_logger_error() {
        let _ = env_logger::try_init();
        let result = init_logger_with(LevelFilter::Debug, LogFormat::Json);
        assert!(matches!(result, Err(InitializationError::LoggerError(_))));
    }
}
