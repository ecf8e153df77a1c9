//! report_export library: tabular report export engine
//!
//! This library turns a list of rows plus a column schema into a downloadable
//! artifact: a paginated document (PDF), a spreadsheet (XLSX) or delimited text
//! (CSV). Large datasets are processed in chunks with progress reporting, cell
//! formatter failures are absorbed into an `"Error"` placeholder, and documents
//! fall back from a structured table to plain text lines when the table layout
//! cannot be used.
//!
//! # Example
//!
//! ```no_run
//! use report_export::export::{formatters, ColumnDefinition, DirectorySink, ExportOptions, Exporter};
//! use report_export::ExportFormat;
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let rows: Vec<_> = [json!({"name": "Ahmed", "amount": 100, "status": "paid"})]
//!     .iter()
//!     .filter_map(|v| v.as_object().cloned())
//!     .collect();
//! let columns = vec![
//!     ColumnDefinition::new("Name", "name"),
//!     ColumnDefinition::new("Amount", "amount").with_formatter(formatters::currency("$", 2)),
//!     ColumnDefinition::new("Status", "status").with_formatter(formatters::status()),
//! ];
//!
//! let exporter = Exporter::new(DirectorySink::new("./reports"));
//! let report = exporter
//!     .export_with_progress(
//!         &rows,
//!         &columns,
//!         &ExportOptions::new("payouts", "Payouts"),
//!         ExportFormat::Document,
//!         |fraction| println!("{:.0}%", fraction * 100.0),
//!     )
//!     .await?;
//! println!("Saved {} ({} rows)", report.file_name, report.rows_exported);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! Export calls are async and pause between chunks, so they need a Tokio
//! runtime. Use `#[tokio::main]` in your application or call them from within
//! an async context.

#![warn(missing_docs)]

pub mod config;
mod error_handling;
pub mod export;
pub mod initialization;

// Re-export public API
pub use config::{Config, ExportSettings, LogFormat, LogLevel};
pub use error_handling::{ExportError, ExportErrorKind, FormatError, InitializationError, LayoutError};
pub use export::{
    ColumnDefinition, ExportFormat, ExportOptions, ExportReport, Exporter, Orientation, Row,
};
