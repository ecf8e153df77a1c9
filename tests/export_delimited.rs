//! Tests for delimited (CSV) export.

use proptest::prelude::*;
use report_export::export::{
    formatters, render_delimited, ColumnDefinition, DirectorySink, Exporter, MemorySink,
};
use report_export::{ExportErrorKind, ExportFormat, ExportOptions, FormatError};
use serde_json::json;
use tempfile::TempDir;

#[path = "helpers.rs"]
mod helpers;

use helpers::{payout_columns, payout_rows, rows_from};

#[test]
fn test_payout_example_output() {
    let text = render_delimited(&payout_rows(), &payout_columns()).expect("render");
    assert_eq!(
        text,
        "\"Name\",\"Amount\"\n\"Ahmed\",\"$100\"\n\"Sara, Q.\",\"$200\"\n\"Omar \"\"O\"\"\",\"$300\""
    );
}

#[test]
fn test_missing_fields_render_placeholder() {
    let rows = rows_from(json!([{"name": "Ahmed"}, {"name": null, "amount": 5}]));
    let columns = vec![
        ColumnDefinition::new("Name", "name"),
        ColumnDefinition::new("Amount", "amount"),
    ];
    let text = render_delimited(&rows, &columns).expect("render");
    assert_eq!(text, "\"Name\",\"Amount\"\n\"Ahmed\",\"N/A\"\n\"N/A\",\"5\"");
}

#[test]
fn test_formatter_failure_is_isolated_to_one_row() {
    let rows = rows_from(json!([
        {"name": "Ahmed", "paid": true},
        {"name": "Sara", "paid": "maybe"},
        {"name": "Omar", "paid": false}
    ]));
    let columns = vec![
        ColumnDefinition::new("Name", "name"),
        ColumnDefinition::new("Paid", "paid").with_formatter(formatters::boolean("Yes", "No")),
    ];
    let text = render_delimited(&rows, &columns).expect("render");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[1], "\"Ahmed\",\"Yes\"");
    assert_eq!(lines[2], "\"Sara\",\"Error\"");
    assert_eq!(lines[3], "\"Omar\",\"No\"");
}

#[test]
fn test_custom_formatter_error_does_not_fail_export() {
    let rows = rows_from(json!([{"amount": 1}]));
    let columns = vec![ColumnDefinition::new("Amount", "amount").with_formatter(
        formatters::custom(|_| Err(FormatError::InvalidValue("boom".to_string()))),
    )];
    assert_eq!(
        render_delimited(&rows, &columns).expect("render"),
        "\"Amount\"\n\"Error\""
    );
}

#[test]
fn test_empty_inputs_are_invalid() {
    let err = render_delimited(&[], &payout_columns()).unwrap_err();
    assert_eq!(err.kind(), ExportErrorKind::InvalidInput);
    let err = render_delimited(&payout_rows(), &[]).unwrap_err();
    assert_eq!(err.kind(), ExportErrorKind::InvalidInput);
}

#[tokio::test]
async fn test_exporter_writes_csv_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let exporter = Exporter::new(DirectorySink::new(temp_dir.path()));
    let report = exporter
        .export(
            &payout_rows(),
            &payout_columns(),
            &ExportOptions::new("payouts", "Payouts"),
            ExportFormat::Delimited,
        )
        .await
        .expect("export");

    let path = report.location.expect("directory sink returns a path");
    assert!(report.file_name.starts_with("payouts-"));
    assert!(report.file_name.ends_with(".csv"));
    let content = std::fs::read_to_string(&path).expect("read csv");
    // No byte-order mark and no trailing newline
    assert!(content.starts_with("\"Name\""));
    assert!(!content.ends_with('\n'));
    assert_eq!(report.bytes, content.len());
}

#[tokio::test]
async fn test_memory_sink_receives_csv_mime_type() {
    let exporter = Exporter::new(MemorySink::new());
    exporter
        .export(
            &payout_rows(),
            &payout_columns(),
            &ExportOptions::new("payouts", "Payouts"),
            ExportFormat::Delimited,
        )
        .await
        .expect("export");
    let saved = exporter.sink().artifacts();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].mime_type(), "text/csv;charset=utf-8");
}

proptest! {
    #[test]
    fn test_csv_round_trips_arbitrary_text(
        cells in prop::collection::vec(("[ -~\n]{0,20}", "[ -~\n]{0,20}"), 1..30)
    ) {
        let values: Vec<serde_json::Value> = cells
            .iter()
            .map(|(a, b)| json!({"a": a, "b": b}))
            .collect();
        let rows = rows_from(serde_json::Value::Array(values));
        let columns = vec![ColumnDefinition::new("A", "a"), ColumnDefinition::new("B", "b")];

        let text = render_delimited(&rows, &columns).expect("render");
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());
        let parsed: Vec<(String, String)> = reader
            .deserialize()
            .collect::<Result<_, _>>()
            .expect("valid csv");

        prop_assert_eq!(parsed.len(), cells.len());
        for ((a, b), (pa, pb)) in cells.iter().zip(&parsed) {
            prop_assert_eq!(a, pa);
            prop_assert_eq!(b, pb);
        }
    }
}
