//! Table export tests: CSV and JSONL files, flattening, and failure reporting.

use std::collections::BTreeSet;

use chrono::Utc;
use tempfile::TempDir;

use listing_harvest::export::{export_table, outcome_to_row, ABSENT};
use listing_harvest::{ExportFormat, ExportOptions, JobOutcome, ProductRecord, ScrapeError, TableRow};

fn sample_rows() -> Vec<TableRow> {
    let mut record = ProductRecord::empty("https://example.com/dp/B01", Utc::now());
    record.title = Some("Widget Holder".to_string());
    record.image_links = vec![
        "https://m.media.example/I/a._US1500_.jpg".to_string(),
        "https://m.media.example/I/b._US1500_.jpg".to_string(),
    ];
    record.final_price = Some(29.99);
    record.original_price = Some(39.99);
    record.discount_percent = Some(25.0);
    record.banned_words_found = ["broken", "widget"]
        .iter()
        .map(|s| s.to_string())
        .collect::<BTreeSet<_>>();

    let failure = JobOutcome::failure(
        "https://example.com/dp/B02",
        &ScrapeError::ReadinessTimeout {
            timeout_ms: 20_000,
            missing: vec!["#altImages".to_string()],
        },
    );

    vec![
        outcome_to_row(&JobOutcome::Success(record)),
        outcome_to_row(&failure),
    ]
}

#[test]
fn test_export_csv_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("products.csv");
    let options = ExportOptions {
        output: Some(path.clone()),
        format: ExportFormat::Csv,
    };

    let result = export_table(&sample_rows(), &options);
    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.rows_written, 2);
    assert_eq!(result.path.as_deref(), Some(path.as_path()));

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers.first().map(String::as_str), Some("link"));
    assert!(headers.iter().any(|h| h == "error"));
    assert!(headers.iter().any(|h| h == "source_url"));

    let column = |name: &str| headers.iter().position(|h| h == name).unwrap();
    let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(records.len(), 2);

    let success = &records[0];
    assert_eq!(&success[column("title")], "Widget Holder");
    assert_eq!(
        &success[column("images")],
        "https://m.media.example/I/a._US1500_.jpg,https://m.media.example/I/b._US1500_.jpg"
    );
    assert_eq!(&success[column("banned_words")], "broken · widget");
    assert_eq!(&success[column("discount_percent")], "25");
    assert_eq!(&success[column("rating")], ABSENT);
    assert_eq!(&success[column("error")], "");

    let failure = &records[1];
    assert_eq!(&failure[column("link")], "");
    assert!(failure[column("error")].starts_with("Readiness timeout"));
    assert_eq!(&failure[column("source_url")], "https://example.com/dp/B02");
}

#[test]
fn test_export_jsonl_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("products.jsonl");
    let options = ExportOptions {
        output: Some(path.clone()),
        format: ExportFormat::Jsonl,
    };

    let result = export_table(&sample_rows(), &options);
    assert!(result.success);

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<serde_json::Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["final_price"], serde_json::json!(29.99));
    assert_eq!(lines[0]["video"], "no");
    assert!(lines[1].get("link").is_none());
    assert_eq!(lines[1]["source_url"], "https://example.com/dp/B02");
}

#[test]
fn test_export_empty_rows_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.csv");
    let options = ExportOptions {
        output: Some(path.clone()),
        format: ExportFormat::Csv,
    };

    let result = export_table(&[], &options);
    assert!(!result.success);
    assert_eq!(result.rows_written, 0);
    assert_eq!(result.error.as_deref(), Some("No rows to export"));
    assert!(!path.exists());
}

#[test]
fn test_export_unwritable_path_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("products.csv");
    let options = ExportOptions {
        output: Some(path),
        format: ExportFormat::Csv,
    };

    let result = export_table(&sample_rows(), &options);
    assert!(!result.success);
    assert!(result.error.unwrap().starts_with("Failed to create"));
}
