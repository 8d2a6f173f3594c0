//! Table export for batch results.
//!
//! This module converts outcomes into rows (column name to value) and writes
//! them as CSV or JSONL to a file or stdout.

mod csv;
mod jsonl;
mod row;
mod types;

use std::fs::File;
use std::io::{self, BufWriter, ErrorKind, Write};

use log::{info, warn};

pub use self::csv::write_csv;
pub use jsonl::write_jsonl;
pub use row::{column_union, outcome_to_row, outcomes_to_rows, CellValue, TableRow, ABSENT};
pub use types::{ExportFormat, ExportOptions, ExportResult};

use crate::error_handling::ExportError;

/// Stdout writer that treats a closed pipe as success, so piping the export
/// into `head` does not fail.
pub(crate) struct IgnoreBrokenPipe<W: Write> {
    inner: W,
}

impl<W: Write> IgnoreBrokenPipe<W> {
    pub(crate) fn new(inner: W) -> Self {
        Self { inner }
    }
}

impl<W: Write> Write for IgnoreBrokenPipe<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf).or_else(|e| {
            if e.kind() == ErrorKind::BrokenPipe {
                Ok(buf.len())
            } else {
                Err(e)
            }
        })
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush().or_else(|e| {
            if e.kind() == ErrorKind::BrokenPipe {
                Ok(())
            } else {
                Err(e)
            }
        })
    }
}

fn write_rows(rows: &[TableRow], options: &ExportOptions) -> Result<usize, ExportError> {
    if rows.is_empty() {
        return Err(ExportError::Empty);
    }

    let out: Box<dyn Write> = match &options.output {
        Some(path) => {
            let file = File::create(path).map_err(|source| ExportError::Create {
                path: path.clone(),
                source,
            })?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(IgnoreBrokenPipe::new(io::stdout())),
    };

    match options.format {
        ExportFormat::Csv => write_csv(rows, out),
        ExportFormat::Jsonl => write_jsonl(rows, out),
    }
}

/// Writes the rows as a table and reports the outcome.
///
/// Never returns an error: failures (no rows, unwritable path, I/O) come back
/// as an `ExportResult` with `success == false`.
pub fn export_table(rows: &[TableRow], options: &ExportOptions) -> ExportResult {
    match write_rows(rows, options) {
        Ok(rows_written) => {
            match &options.output {
                Some(path) => info!("Exported {rows_written} rows to {}", path.display()),
                None => info!("Exported {rows_written} rows to stdout"),
            }
            ExportResult::written(rows_written, options.output.clone())
        }
        Err(e) => {
            warn!("Export failed: {e}");
            ExportResult::failed(e, options.output.clone())
        }
    }
}
