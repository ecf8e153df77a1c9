//! Error type definitions.
//!
//! This module defines the two error channels of the export engine:
//! - [`ExportError`] fails a whole export call and is returned to the caller.
//! - [`FormatError`] belongs to a single cell and never leaves the formatting
//!   pipeline; the pipeline turns it into the `"Error"` placeholder.
//!
//! [`LayoutError`] describes document layout failures and is only surfaced
//! wrapped inside [`ExportError::RenderFailed`].

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::export::ExportFormat;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Errors that fail an export call.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The dataset or column schema was rejected before rendering started.
    #[error("Invalid export input: {0}")]
    InvalidInput(String),

    /// The host cannot produce this format at all.
    #[error("{format} export is not supported in this environment: {reason}")]
    EnvironmentUnsupported {
        /// Format that was requested
        format: ExportFormat,
        /// What the capability probe found missing
        reason: String,
    },

    /// Every rendering strategy for the format failed.
    #[error("Failed to render {format} export: {reason}")]
    RenderFailed {
        /// Format that was requested
        format: ExportFormat,
        /// Description of the failed attempts
        reason: String,
    },

    /// The artifact was built but could not be committed by the sink.
    #[error("Failed to save {file_name}: {source}")]
    SaveFailed {
        /// File name of the artifact that was being saved
        file_name: String,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },
}

/// Surfaced error categories, one per [`ExportError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ExportErrorKind {
    /// See [`ExportError::InvalidInput`]
    InvalidInput,
    /// See [`ExportError::EnvironmentUnsupported`]
    EnvironmentUnsupported,
    /// See [`ExportError::RenderFailed`]
    RenderFailed,
    /// See [`ExportError::SaveFailed`]
    SaveFailed,
}

impl ExportError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ExportErrorKind {
        match self {
            ExportError::InvalidInput(_) => ExportErrorKind::InvalidInput,
            ExportError::EnvironmentUnsupported { .. } => ExportErrorKind::EnvironmentUnsupported,
            ExportError::RenderFailed { .. } => ExportErrorKind::RenderFailed,
            ExportError::SaveFailed { .. } => ExportErrorKind::SaveFailed,
        }
    }

    /// Returns a message telling the user what to do about this error.
    pub fn hint(&self) -> &'static str {
        self.kind().hint()
    }
}

impl std::fmt::Display for ExportErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ExportErrorKind {
    /// Short label for the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportErrorKind::InvalidInput => "Invalid input",
            ExportErrorKind::EnvironmentUnsupported => "Environment unsupported",
            ExportErrorKind::RenderFailed => "Render failed",
            ExportErrorKind::SaveFailed => "Save failed",
        }
    }

    /// User-facing advice for this category.
    pub fn hint(&self) -> &'static str {
        match self {
            ExportErrorKind::InvalidInput => {
                "There is no data to export. Add rows and at least one column, then try again."
            }
            ExportErrorKind::EnvironmentUnsupported => {
                "This format is not available here. Try exporting as a spreadsheet or CSV instead."
            }
            ExportErrorKind::RenderFailed => {
                "The report could not be laid out. Try a different format or fewer columns."
            }
            ExportErrorKind::SaveFailed => {
                "The file could not be saved. Check that the destination is writable and retry."
            }
        }
    }
}

/// A single cell's formatter failed.
///
/// Only the formatting pipeline ever sees this type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormatError {
    /// The value had a type the formatter does not handle.
    #[error("expected {expected}, found {found}")]
    UnexpectedType {
        /// Kind of value the formatter accepts
        expected: &'static str,
        /// Kind of value it was given
        found: &'static str,
    },

    /// The value had the right type but could not be interpreted.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// The formatter was configured with a pattern it cannot use.
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    /// The formatter panicked.
    #[error("formatter panicked: {0}")]
    Panicked(String),
}

/// Document layout failures.
#[derive(Error, Debug)]
pub enum LayoutError {
    /// The table layout capability is not available in this environment.
    #[error("table layout is not available")]
    TableLayoutUnavailable,

    /// The columns cannot all fit across the page.
    #[error("{columns} columns need at least {required:.0}pt but the page only has {available:.0}pt")]
    ColumnsDoNotFit {
        /// Number of columns requested
        columns: usize,
        /// Minimum width needed for all columns
        required: f32,
        /// Usable page width
        available: f32,
    },

    /// The page geometry leaves no room for a single line of text.
    #[error("usable page height {usable:.1}pt cannot hold a {line:.1}pt line")]
    NoUsableArea {
        /// Height between the top and bottom margins
        usable: f32,
        /// Height of the line that did not fit
        line: f32,
    },

    /// Writing the PDF bytes failed.
    #[error("document encoding failed: {0}")]
    Encoding(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_all_error_kinds_have_string_representation() {
        for kind in ExportErrorKind::iter() {
            assert!(!kind.as_str().is_empty(), "{:?} should have a name", kind);
            assert!(!kind.hint().is_empty(), "{:?} should have a hint", kind);
        }
    }

    #[test]
    fn test_error_kind_hints_are_distinct() {
        let hints: Vec<&str> = ExportErrorKind::iter().map(|k| k.hint()).collect();
        for (i, a) in hints.iter().enumerate() {
            for b in hints.iter().skip(i + 1) {
                assert_ne!(a, b, "Each error kind should have its own hint");
            }
        }
    }

    #[test]
    fn test_export_error_kind_mapping() {
        let err = ExportError::InvalidInput("no rows".to_string());
        assert_eq!(err.kind(), ExportErrorKind::InvalidInput);

        let err = ExportError::RenderFailed {
            format: ExportFormat::Document,
            reason: "boom".to_string(),
        };
        assert_eq!(err.kind(), ExportErrorKind::RenderFailed);
        assert!(err.to_string().contains("boom"));

        let err = ExportError::SaveFailed {
            file_name: "report.csv".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.kind(), ExportErrorKind::SaveFailed);
        assert!(err.to_string().contains("report.csv"));
        assert!(err.hint().contains("retry"));
    }

    #[test]
    fn test_environment_unsupported_message_names_format() {
        let err = ExportError::EnvironmentUnsupported {
            format: ExportFormat::Document,
            reason: "no document backend".to_string(),
        };
        assert!(err.to_string().starts_with("document export"));
        assert!(err.hint().contains("spreadsheet"));
    }

    #[test]
    fn test_layout_error_messages() {
        let err = LayoutError::ColumnsDoNotFit {
            columns: 40,
            required: 1120.0,
            available: 515.0,
        };
        assert_eq!(
            err.to_string(),
            "40 columns need at least 1120pt but the page only has 515pt"
        );
    }
}
