//! JSONL export (one JSON object per row).
//!
//! List cells are flattened the same way as in CSV; numbers stay JSON
//! numbers. Column order is preserved.

use std::io::Write;

use serde_json::{Map, Value};

use super::row::{CellValue, TableRow};
use crate::error_handling::ExportError;

fn cell_to_json(value: &CellValue) -> Value {
    match value {
        CellValue::Number(n) => serde_json::Number::from_f64(*n)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(n.to_string())),
        other => Value::String(other.flattened()),
    }
}

/// Writes one JSON object per row and returns the number of rows written.
pub fn write_jsonl<W: Write>(rows: &[TableRow], mut out: W) -> Result<usize, ExportError> {
    for row in rows {
        let object: Map<String, Value> = row
            .cells()
            .iter()
            .map(|(column, value)| (column.clone(), cell_to_json(value)))
            .collect();
        serde_json::to_writer(&mut out, &Value::Object(object))?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_jsonl_preserves_order_and_numbers() {
        let rows = vec![TableRow::new()
            .with("link", CellValue::text("https://example.com/dp/A"))
            .with("final_price", CellValue::Number(19.99))
            .with(
                "banned_words",
                CellValue::List {
                    items: vec!["broken".to_string(), "widget".to_string()],
                    delimiter: " · ",
                },
            )];

        let mut out = Vec::new();
        assert_eq!(write_jsonl(&rows, &mut out).unwrap(), 1);

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "{\"link\":\"https://example.com/dp/A\",\"final_price\":19.99,\"banned_words\":\"broken · widget\"}\n"
        );
    }
}
