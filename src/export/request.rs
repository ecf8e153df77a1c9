//! Declarative export requests.
//!
//! A request file bundles everything one export needs as JSON:
//!
//! ```json
//! {
//!   "columns": [
//!     {"header": "Name", "key": "name"},
//!     {"header": "Amount", "key": "amount", "width": 12,
//!      "format": {"type": "currency", "symbol": "$", "decimals": 2}}
//!   ],
//!   "rows": [{"name": "Ahmed", "amount": 100}],
//!   "options": {"filename": "payouts", "title": "Payouts"}
//! }
//! ```
//!
//! Column formats name one of the built-in formatters in [`super::formatters`].

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error_handling::ExportError;

use super::columns::ColumnDefinition;
use super::formatters;
use super::types::{ExportOptions, Row};

/// Built-in formatter selection for a request column.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FormatterSpec {
    /// See [`formatters::currency`]
    Currency {
        #[serde(default = "default_currency_symbol")]
        symbol: String,
        #[serde(default = "default_decimals")]
        decimals: usize,
    },
    /// See [`formatters::percentage`]
    Percentage {
        #[serde(default = "default_decimals")]
        decimals: usize,
    },
    /// See [`formatters::date`]
    Date {
        #[serde(default = "default_date_pattern")]
        pattern: String,
    },
    /// See [`formatters::boolean`]
    Boolean {
        #[serde(default = "default_true_label")]
        true_label: String,
        #[serde(default = "default_false_label")]
        false_label: String,
    },
    /// See [`formatters::list`]
    List {
        #[serde(default = "default_list_separator")]
        separator: String,
    },
    /// See [`formatters::status`]
    Status,
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_decimals() -> usize {
    2
}

fn default_date_pattern() -> String {
    "%Y-%m-%d".to_string()
}

fn default_true_label() -> String {
    "Yes".to_string()
}

fn default_false_label() -> String {
    "No".to_string()
}

fn default_list_separator() -> String {
    ", ".to_string()
}

/// One column of a request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ColumnSpec {
    /// Header text
    pub header: String,
    /// Row field to read
    pub key: String,
    /// Optional width hint
    #[serde(default)]
    pub width: Option<u32>,
    /// Optional built-in formatter
    #[serde(default)]
    pub format: Option<FormatterSpec>,
}

impl ColumnSpec {
    /// Builds the column definition, attaching the selected formatter.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::InvalidInput` when a date column has an unusable
    /// pattern.
    pub fn to_definition(&self) -> Result<ColumnDefinition, ExportError> {
        if let Some(FormatterSpec::Date { pattern }) = &self.format {
            formatters::check_date_pattern(pattern).map_err(|e| {
                ExportError::InvalidInput(format!("column '{}': {}", self.header, e))
            })?;
        }
        let mut column = ColumnDefinition::new(self.header.clone(), self.key.clone());
        column.width = self.width;
        column.formatter = self.format.as_ref().map(|spec| match spec {
            FormatterSpec::Currency { symbol, decimals } => {
                formatters::currency(symbol.clone(), *decimals)
            }
            FormatterSpec::Percentage { decimals } => formatters::percentage(*decimals),
            FormatterSpec::Date { pattern } => formatters::date(pattern.clone()),
            FormatterSpec::Boolean {
                true_label,
                false_label,
            } => formatters::boolean(true_label.clone(), false_label.clone()),
            FormatterSpec::List { separator } => formatters::list(separator.clone()),
            FormatterSpec::Status => formatters::status(),
        });
        Ok(column)
    }
}

/// A complete export request.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportRequest {
    /// Column schema
    pub columns: Vec<ColumnSpec>,
    /// Dataset
    pub rows: Vec<Row>,
    /// Heading and file name options
    #[serde(default)]
    pub options: ExportOptions,
}

impl ReportRequest {
    /// Parses a request from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid request.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Failed to parse export request")
    }

    /// Column definitions for the request's schema.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::InvalidInput` for the first column whose format
    /// cannot be built.
    pub fn column_definitions(&self) -> Result<Vec<ColumnDefinition>, ExportError> {
        self.columns.iter().map(ColumnSpec::to_definition).collect()
    }
}

/// Reads and parses a request file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid request.
pub async fn load_request(path: &Path) -> Result<ReportRequest> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read request file {}", path.display()))?;
    ReportRequest::from_json(&text)
        .with_context(|| format!("Invalid request file {}", path.display()))
}
