//! Formatting pipeline.
//!
//! Turns raw rows into display strings, one column at a time. This is the only
//! place where a failure is absorbed instead of propagated: a formatter that
//! returns an error or panics produces the `"Error"` placeholder for that cell
//! and the rest of the row is formatted normally.

use std::panic::{catch_unwind, AssertUnwindSafe};

use log::warn;
use serde_json::Value;

use crate::config::{EMPTY_PLACEHOLDER, ERROR_PLACEHOLDER};
use crate::error_handling::FormatError;

use super::columns::ColumnDefinition;
use super::types::Row;

/// Formats one row into an ordered list of cell strings, one per column.
pub fn apply(columns: &[ColumnDefinition], row: &Row) -> Vec<String> {
    columns
        .iter()
        .map(|column| absorb(column, format_cell(column, row)))
        .collect()
}

/// Default stringification used when a column has no formatter.
///
/// Strings are used verbatim, arrays are joined with `", "`, null becomes `"N/A"`
/// and objects are written as compact JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => EMPTY_PLACEHOLDER.to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(", "),
        Value::Object(_) => value.to_string(),
    }
}

/// Display name of a JSON value's type, for formatter error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn format_cell(column: &ColumnDefinition, row: &Row) -> Result<String, FormatError> {
    let value = row.get(&column.key).unwrap_or(&Value::Null);
    let Some(formatter) = column.formatter.as_ref() else {
        return Ok(stringify(value));
    };

    match catch_unwind(AssertUnwindSafe(|| formatter(value))) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(FormatError::Panicked(message))
        }
    }
}

fn absorb(column: &ColumnDefinition, result: Result<String, FormatError>) -> String {
    result.unwrap_or_else(|e| {
        warn!("Formatter for column '{}' failed: {}", column.key, e);
        ERROR_PLACEHOLDER.to_string()
    })
}

/// The formatted table built up by the pipeline and consumed by every renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedTable {
    /// Header labels, in column order
    pub headers: Vec<String>,
    /// Width hints, in column order
    pub widths: Vec<Option<u32>>,
    /// Formatted rows
    pub rows: Vec<Vec<String>>,
}

impl FormattedTable {
    /// Creates an empty table for the given columns.
    pub fn new(columns: &[ColumnDefinition]) -> Self {
        Self {
            headers: columns.iter().map(|c| c.header.clone()).collect(),
            widths: columns.iter().map(|c| c.width).collect(),
            rows: Vec::new(),
        }
    }

    /// Formats all rows at once.
    pub fn from_rows(columns: &[ColumnDefinition], rows: &[Row]) -> Self {
        let mut table = Self::new(columns);
        table.append_rows(columns, rows);
        table
    }

    /// Formats `rows` and appends them after the rows already in the table.
    pub fn append_rows(&mut self, columns: &[ColumnDefinition], rows: &[Row]) {
        self.rows.reserve(rows.len());
        self.rows.extend(rows.iter().map(|row| apply(columns, row)));
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }
}
