//! JSON application config file.
//!
//! The file is optional. It can carry the base URL and a trial expiry date:
//!
//! ```json
//! { "baseUrl": "https://www.amazon.com/dp/", "trial": { "expireDate": "2026-12-31" } }
//! ```

use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error_handling::InitializationError;

/// Contents of the JSON config file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppFileConfig {
    /// Prefix completed onto bare product identifiers
    #[serde(default, alias = "base_url")]
    pub base_url: Option<String>,
    /// Trial/licence window
    #[serde(default)]
    pub trial: Option<TrialConfig>,
}

/// Trial window read from the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialConfig {
    /// Last day the tool may run
    #[serde(alias = "expire_date")]
    pub expire_date: NaiveDate,
}

/// Reads and parses the config file.
///
/// # Errors
///
/// Returns `InitializationError::ConfigFileError` when the file cannot be read
/// or is not valid JSON for this schema.
pub fn load_app_config(path: &Path) -> Result<AppFileConfig, InitializationError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        InitializationError::ConfigFileError(format!("cannot read {}: {e}", path.display()))
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        InitializationError::ConfigFileError(format!("cannot parse {}: {e}", path.display()))
    })
}

/// Fails once `today` is past the trial's expiry date.
///
/// The expiry day itself is still allowed.
pub fn check_trial(trial: &TrialConfig, today: NaiveDate) -> Result<(), InitializationError> {
    if today > trial.expire_date {
        log::error!("Trial expired on {}", trial.expire_date);
        return Err(InitializationError::TrialExpired(trial.expire_date));
    }
    log::debug!("Trial valid until {}", trial.expire_date);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_load_app_config_camel_case() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"baseUrl": "https://example.com/dp/", "trial": {{"expireDate": "2030-01-31"}}}}"#
        )
        .unwrap();

        let config = load_app_config(file.path()).unwrap();
        assert_eq!(config.base_url.as_deref(), Some("https://example.com/dp/"));
        assert_eq!(config.trial.unwrap().expire_date, date(2030, 1, 31));
    }

    #[test]
    fn test_load_app_config_all_optional() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();

        let config = load_app_config(file.path()).unwrap();
        assert!(config.base_url.is_none());
        assert!(config.trial.is_none());
    }

    #[test]
    fn test_load_app_config_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = load_app_config(file.path()).unwrap_err();
        assert!(matches!(err, InitializationError::ConfigFileError(_)));
    }

    #[test]
    fn test_load_app_config_missing_file() {
        let err = load_app_config(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }

    #[test]
    fn test_check_trial_boundaries() {
        let trial = TrialConfig {
            expire_date: date(2026, 10, 19),
        };
        assert!(check_trial(&trial, date(2026, 10, 18)).is_ok());
        assert!(check_trial(&trial, date(2026, 10, 19)).is_ok());
        assert!(matches!(
            check_trial(&trial, date(2026, 10, 20)),
            Err(InitializationError::TrialExpired(d)) if d == date(2026, 10, 19)
        ));
    }
}
