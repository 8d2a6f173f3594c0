//! CSV export.
//!
//! The header is the union of all row columns in first-seen order; cells a
//! row does not have are left empty.

use std::io::Write;

use csv::Writer;

use super::row::{column_union, TableRow};
use crate::error_handling::ExportError;

/// Writes the rows as CSV and returns the number of data rows written.
pub fn write_csv<W: Write>(rows: &[TableRow], out: W) -> Result<usize, ExportError> {
    let columns = column_union(rows);
    let mut writer = Writer::from_writer(out);
    writer.write_record(&columns)?;

    for row in rows {
        let record: Vec<String> = columns
            .iter()
            .map(|column| row.get(column).map(|v| v.flattened()).unwrap_or_default())
            .collect();
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(rows.len())
}
