//! Table rows built from batch outcomes.
//!
//! A row is an ordered mapping from column name to cell value. Success rows
//! carry the product columns; failure rows carry `error`, `source_url` and
//! `timestamp`.

use chrono::{DateTime, Local, Utc};

use crate::batch::{BatchResult, JobOutcome};
use crate::config::{BANNED_WORD_DELIMITER, IMAGE_LINK_DELIMITER};
use crate::models::ProductRecord;

/// Rendering of an absent value.
pub const ABSENT: &str = "none";
const YES: &str = "yes";
const NO: &str = "no";

/// One table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Rendered as is
    Text(String),
    /// Rendered with `f64`'s shortest form
    Number(f64),
    /// Joined with `delimiter` when flattened
    List {
        /// Items in display order
        items: Vec<String>,
        /// Separator placed between items
        delimiter: &'static str,
    },
}

impl CellValue {
    /// Text cell.
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    fn flag(value: bool) -> Self {
        CellValue::text(if value { YES } else { NO })
    }

    fn number<T: Into<f64>>(value: Option<T>) -> Self {
        match value {
            Some(v) => CellValue::Number(v.into()),
            None => CellValue::text(ABSENT),
        }
    }

    fn optional_text(value: Option<&str>) -> Self {
        CellValue::text(value.unwrap_or(ABSENT))
    }

    fn list<I: IntoIterator<Item = String>>(items: I, delimiter: &'static str) -> Self {
        let items: Vec<String> = items.into_iter().collect();
        if items.is_empty() {
            CellValue::text(ABSENT)
        } else {
            CellValue::List { items, delimiter }
        }
    }

    /// Single-string rendering used by every table format.
    pub fn flattened(&self) -> String {
        match self {
            CellValue::Text(text) => text.clone(),
            CellValue::Number(n) => n.to_string(),
            CellValue::List { items, delimiter } => items.join(delimiter),
        }
    }
}

/// Ordered column name to value mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRow {
    cells: Vec<(String, CellValue)>,
}

impl TableRow {
    /// An empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a cell, replacing an existing cell with the same column name.
    pub fn with(mut self, column: impl Into<String>, value: CellValue) -> Self {
        self.insert(column, value);
        self
    }

    /// Sets a cell in place; same replacement rule as [`with`](Self::with).
    pub fn insert(&mut self, column: impl Into<String>, value: CellValue) {
        let column = column.into();
        match self.cells.iter_mut().find(|(name, _)| *name == column) {
            Some((_, existing)) => *existing = value,
            None => self.cells.push((column, value)),
        }
    }

    /// Value of `column`, if the row has it.
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Column names in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    /// All cells in insertion order.
    pub fn cells(&self) -> &[(String, CellValue)] {
        &self.cells
    }

    /// Whether the row has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Builds one row per outcome, in batch order.
pub fn outcomes_to_rows(result: &BatchResult) -> Vec<TableRow> {
    result.outcomes().iter().map(outcome_to_row).collect()
}

/// Flattens one outcome. Failures get only `error`, `source_url` and `timestamp`.
pub fn outcome_to_row(outcome: &JobOutcome) -> TableRow {
    match outcome {
        JobOutcome::Success(record) => record_to_row(record),
        JobOutcome::Failure {
            source_url,
            error,
            timestamp,
        } => TableRow::new()
            .with("error", CellValue::text(error.as_str()))
            .with("source_url", CellValue::text(source_url.as_str()))
            .with("timestamp", CellValue::text(timestamp.to_rfc3339())),
    }
}

fn record_to_row(record: &ProductRecord) -> TableRow {
    TableRow::new()
        .with("link", CellValue::text(record.source_url.as_str()))
        .with("title", CellValue::optional_text(record.title.as_deref()))
        .with(
            "images",
            CellValue::list(record.image_links.iter().cloned(), IMAGE_LINK_DELIMITER),
        )
        .with("video", CellValue::flag(record.video_url.is_some()))
        .with("rating", CellValue::number(record.rating))
        .with(
            "review_count",
            // Review counts stay far below 2^53, so the f64 cell is exact
            CellValue::number(record.review_count.map(|n| n as f64)),
        )
        .with("featured_choice", CellValue::flag(record.is_featured_choice))
        .with("original_price", CellValue::number(record.original_price))
        .with("discount_percent", CellValue::number(record.discount_percent))
        .with("final_price", CellValue::number(record.final_price))
        .with("coupon", CellValue::flag(record.has_coupon))
        .with("coupon_percent", CellValue::number(record.coupon_percent))
        .with("confirmed_fit", CellValue::flag(record.has_confirmed_fit))
        .with("brand_section", CellValue::flag(record.has_brand_section))
        .with("rich_media_video", CellValue::flag(record.has_rich_media_video))
        .with(
            "banned_words",
            CellValue::list(
                record.banned_words_found.iter().cloned(),
                BANNED_WORD_DELIMITER,
            ),
        )
        .with(
            "more_options",
            CellValue::flag(record.has_more_options_section),
        )
        .with("captured_at", CellValue::text(local_time(record.captured_at)))
}

fn local_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Union of the rows' columns, in first-seen order.
pub fn column_union(rows: &[TableRow]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for column in row.columns() {
            if !columns.iter().any(|c| c == column) {
                columns.push(column.to_string());
            }
        }
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::ScrapeError;

    fn sample_record() -> ProductRecord {
        let mut record = ProductRecord::empty("https://example.com/dp/A", Utc::now());
        record.title = Some("Widget".to_string());
        record.image_links = vec!["https://img/1.jpg".to_string(), "https://img/2.jpg".to_string()];
        record.final_price = Some(19.99);
        record.original_price = Some(19.99);
        record.discount_percent = Some(0.0);
        record.review_count = Some(1234);
        record.coupon_percent = Some(15);
        record.has_coupon = true;
        record.banned_words_found = ["broken", "widget"].iter().map(|s| s.to_string()).collect();
        record
    }

    fn cell(row: &TableRow, column: &str) -> String {
        row.get(column).map(CellValue::flattened).unwrap_or_default()
    }

    #[test]
    fn test_success_row_columns_in_order() {
        let row = record_to_row(&sample_record());
        let columns: Vec<_> = row.columns().collect();
        assert_eq!(
            columns,
            vec![
                "link",
                "title",
                "images",
                "video",
                "rating",
                "review_count",
                "featured_choice",
                "original_price",
                "discount_percent",
                "final_price",
                "coupon",
                "coupon_percent",
                "confirmed_fit",
                "brand_section",
                "rich_media_video",
                "banned_words",
                "more_options",
                "captured_at",
            ]
        );
    }

    #[test]
    fn test_success_row_rendering() {
        let row = record_to_row(&sample_record());
        assert_eq!(cell(&row, "images"), "https://img/1.jpg,https://img/2.jpg");
        assert_eq!(cell(&row, "banned_words"), "broken · widget");
        assert_eq!(cell(&row, "video"), "no");
        assert_eq!(cell(&row, "coupon"), "yes");
        assert_eq!(cell(&row, "rating"), "none");
        assert_eq!(cell(&row, "discount_percent"), "0");
        assert_eq!(cell(&row, "final_price"), "19.99");
        assert_eq!(cell(&row, "review_count"), "1234");
        assert_eq!(cell(&row, "coupon_percent"), "15");
        assert_eq!(cell(&row, "captured_at").len(), "2024-01-01 00:00:00".len());
    }

    #[test]
    fn test_empty_lists_render_absent() {
        let record = ProductRecord::empty("https://example.com/dp/B", Utc::now());
        let row = record_to_row(&record);
        assert_eq!(cell(&row, "images"), ABSENT);
        assert_eq!(cell(&row, "banned_words"), ABSENT);
        assert_eq!(cell(&row, "title"), ABSENT);
    }

    #[test]
    fn test_failure_row() {
        let outcome = JobOutcome::failure("https://example.com/dp/C", &ScrapeError::Cancelled);
        let row = outcome_to_row(&outcome);
        let columns: Vec<_> = row.columns().collect();
        assert_eq!(columns, vec!["error", "source_url", "timestamp"]);
        assert_eq!(cell(&row, "error"), "Batch cancelled");
    }

    #[test]
    fn test_insert_replaces_existing_column() {
        let row = TableRow::new()
            .with("a", CellValue::text("1"))
            .with("b", CellValue::text("2"))
            .with("a", CellValue::text("3"));
        assert_eq!(row.cells().len(), 2);
        assert_eq!(cell(&row, "a"), "3");
    }

    #[test]
    fn test_column_union_first_seen_order() {
        let rows = vec![
            TableRow::new()
                .with("link", CellValue::text("x"))
                .with("title", CellValue::text("y")),
            TableRow::new()
                .with("error", CellValue::text("e"))
                .with("link", CellValue::text("z")),
        ];
        assert_eq!(column_union(&rows), vec!["link", "title", "error"]);
    }
}
