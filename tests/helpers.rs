// Shared test helpers for building datasets and column schemas.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::time::Duration;

use report_export::export::{formatters, ColumnDefinition};
use report_export::{ExportSettings, Row};
use serde_json::{json, Value};

/// Converts a JSON array of objects into rows.
#[allow(dead_code)] // Used by other test files
pub fn rows_from(values: Value) -> Vec<Row> {
    values
        .as_array()
        .expect("rows must be a JSON array")
        .iter()
        .map(|v| v.as_object().cloned().expect("each row must be an object"))
        .collect()
}

/// The three-row payout dataset used across the delimited and document tests.
#[allow(dead_code)] // Used by other test files
pub fn payout_rows() -> Vec<Row> {
    rows_from(json!([
        {"name": "Ahmed", "amount": 100},
        {"name": "Sara, Q.", "amount": 200},
        {"name": "Omar \"O\"", "amount": 300}
    ]))
}

/// `Name` (plain) and `Amount` (`$` prefix formatter).
#[allow(dead_code)] // Used by other test files
pub fn payout_columns() -> Vec<ColumnDefinition> {
    vec![
        ColumnDefinition::new("Name", "name"),
        ColumnDefinition::new("Amount", "amount")
            .with_formatter(formatters::custom(|v| Ok(format!("${}", v)))),
    ]
}

/// Generates `count` rows with an `id` and a `name` field.
#[allow(dead_code)] // Used by other test files
pub fn numbered_rows(count: usize) -> Vec<Row> {
    (0..count)
        .map(|i| {
            json!({"id": i, "name": format!("user-{}", i)})
                .as_object()
                .cloned()
                .expect("object literal")
        })
        .collect()
}

/// `ID` and `Name` columns matching [`numbered_rows`].
#[allow(dead_code)] // Used by other test files
pub fn numbered_columns() -> Vec<ColumnDefinition> {
    vec![
        ColumnDefinition::new("ID", "id"),
        ColumnDefinition::new("Name", "name"),
    ]
}

/// Default chunking without the pause between chunks, to keep tests fast.
#[allow(dead_code)] // Used by other test files
pub fn fast_settings() -> ExportSettings {
    ExportSettings {
        chunk_delay: Duration::ZERO,
        ..Default::default()
    }
}

/// Whether `needle` occurs anywhere in `haystack`.
#[allow(dead_code)] // Used by other test files
pub fn contains_bytes(haystack: &[u8], needle: &str) -> bool {
    haystack
        .windows(needle.len())
        .any(|w| w == needle.as_bytes())
}
