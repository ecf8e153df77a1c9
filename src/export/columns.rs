//! Column schema definitions and validation.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error_handling::{ExportError, FormatError};

/// A cell formatter: turns one raw value into display text.
///
/// Returning `Err` (or panicking) marks only that cell as failed.
pub type CellFormatter = Arc<dyn Fn(&Value) -> Result<String, FormatError> + Send + Sync>;

/// One column of the exported table.
#[derive(Clone)]
pub struct ColumnDefinition {
    /// Display label for the header row
    pub header: String,
    /// Row key the column reads its value from
    pub key: String,
    /// Optional width hint (characters for spreadsheets, relative weight for documents)
    pub width: Option<u32>,
    /// Optional formatter; without one the value is stringified
    pub formatter: Option<CellFormatter>,
}

impl fmt::Debug for ColumnDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDefinition")
            .field("header", &self.header)
            .field("key", &self.key)
            .field("width", &self.width)
            .field("formatter", &self.formatter.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl ColumnDefinition {
    /// Creates a column without width hint or formatter.
    pub fn new(header: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            key: key.into(),
            width: None,
            formatter: None,
        }
    }

    /// Sets the width hint.
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Sets the formatter.
    pub fn with_formatter(mut self, formatter: CellFormatter) -> Self {
        self.formatter = Some(formatter);
        self
    }
}

/// Validates and normalizes a column schema.
///
/// Headers and keys are trimmed. The schema is rejected when it is empty, when a
/// header or key is blank, or when a width hint is zero.
///
/// # Errors
///
/// Returns `ExportError::InvalidInput` describing the first offending column.
pub fn resolve_columns(columns: &[ColumnDefinition]) -> Result<Vec<ColumnDefinition>, ExportError> {
    if columns.is_empty() {
        return Err(ExportError::InvalidInput(
            "at least one column is required".to_string(),
        ));
    }

    columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            let header = column.header.trim();
            let key = column.key.trim();
            if header.is_empty() {
                return Err(ExportError::InvalidInput(format!(
                    "column {} has an empty header",
                    index + 1
                )));
            }
            if key.is_empty() {
                return Err(ExportError::InvalidInput(format!(
                    "column '{}' has an empty key",
                    header
                )));
            }
            if column.width == Some(0) {
                return Err(ExportError::InvalidInput(format!(
                    "column '{}' has a zero width hint",
                    header
                )));
            }
            Ok(ColumnDefinition {
                header: header.to_string(),
                key: key.to_string(),
                width: column.width,
                formatter: column.formatter.clone(),
            })
        })
        .collect()
}

/// Rejects an export with no rows, then resolves its columns.
///
/// # Errors
///
/// Returns `ExportError::InvalidInput` for an empty dataset or an invalid schema.
pub(crate) fn validate_input<T>(
    rows: &[T],
    columns: &[ColumnDefinition],
) -> Result<Vec<ColumnDefinition>, ExportError> {
    if rows.is_empty() {
        return Err(ExportError::InvalidInput(
            "the dataset has no rows".to_string(),
        ));
    }
    resolve_columns(columns)
}
