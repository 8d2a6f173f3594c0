//! Target input handling: gathering, completion and validation.

use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::MAX_URL_LENGTH;
use crate::error_handling::ScrapeError;
use crate::models::Target;

/// Checks that a completed target is a usable http(s) URL.
///
/// Rejects URLs longer than `MAX_URL_LENGTH`, URLs that do not parse and
/// schemes other than http/https.
pub fn validate_target_url(url: &str) -> Result<(), ScrapeError> {
    if url.len() > MAX_URL_LENGTH {
        return Err(ScrapeError::InvalidTarget(format!(
            "URL exceeds maximum length ({} > {}): {}...",
            url.len(),
            MAX_URL_LENGTH,
            url.chars().take(50).collect::<String>()
        )));
    }

    match url::Url::parse(url) {
        Ok(parsed) => match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(ScrapeError::InvalidTarget(format!(
                "unsupported scheme '{other}': {url}"
            ))),
        },
        Err(e) => Err(ScrapeError::InvalidTarget(format!("{e}: {url}"))),
    }
}

/// Splits raw input on whitespace and completes each piece against `base`.
pub fn normalize_targets(raw: &[String], base: &str) -> Vec<Target> {
    raw.iter()
        .flat_map(|entry| entry.split_whitespace())
        .map(|piece| Target::new(piece, base))
        .collect()
}

/// Reads targets from a file: one or more per line, blank lines and `#`
/// comments skipped.
pub async fn read_targets_file(path: &Path) -> Result<Vec<String>> {
    let file = tokio::fs::File::open(path)
        .await
        .with_context(|| format!("Failed to open targets file {}", path.display()))?;
    let mut lines = BufReader::new(file).lines();

    let mut targets = Vec::new();
    while let Some(line) = lines
        .next_line()
        .await
        .with_context(|| format!("Failed to read targets file {}", path.display()))?
    {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        targets.extend(trimmed.split_whitespace().map(str::to_string));
    }
    debug!("Read {} targets from {}", targets.len(), path.display());
    Ok(targets)
}

/// Positional targets followed by the targets file, if any.
pub async fn collect_targets(positional: &[String], file: Option<&Path>) -> Result<Vec<String>> {
    let mut targets: Vec<String> = positional
        .iter()
        .flat_map(|entry| entry.split_whitespace())
        .map(str::to_string)
        .collect();
    if let Some(path) = file {
        targets.extend(read_targets_file(path).await?);
    }
    info!("Total targets: {}", targets.len());
    Ok(targets)
}
