//! Export types and options.

use std::path::PathBuf;

use clap::ValueEnum;
use serde::Serialize;

/// Export format options.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// CSV format (one column per field, for Excel/Sheets)
    #[default]
    Csv,
    /// JSONL format (one JSON object per row, for programmatic access)
    Jsonl,
}

/// Options for exporting a table.
#[derive(Clone, Debug, Default)]
pub struct ExportOptions {
    /// Output file path (or stdout if None)
    pub output: Option<PathBuf>,
    /// Export format
    pub format: ExportFormat,
}

/// Structured result of an export. Failures are reported here rather than
/// as an `Err`, so callers can show the message as is.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExportResult {
    /// Whether every row was written
    pub success: bool,
    /// Failure message when `success` is false
    pub error: Option<String>,
    /// Rows written; 0 on failure
    pub rows_written: usize,
    /// Where the table was written; `None` for stdout
    pub path: Option<PathBuf>,
}

impl ExportResult {
    pub(crate) fn written(rows_written: usize, path: Option<PathBuf>) -> Self {
        Self {
            success: true,
            error: None,
            rows_written,
            path,
        }
    }

    pub(crate) fn failed(error: impl ToString, path: Option<PathBuf>) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            rows_written: 0,
            path,
        }
    }
}
