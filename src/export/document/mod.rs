//! Paginated document (PDF) renderer.
//!
//! The renderer has two layout strategies. The capability probe picks
//! [`LayoutStrategy::Structured`] when the environment supports table layout and
//! [`LayoutStrategy::PlainText`] otherwise. A structured layout that fails is
//! retried once with the plain-text strategy; only when that also fails does the
//! call return `RenderFailed`. Nothing is handed to a sink until the bytes of a
//! complete document exist.

mod layout;
mod pdf;

use chrono::{DateTime, Local};
use log::{debug, warn};

use crate::error_handling::{ExportError, LayoutError};

use super::columns::{validate_input, ColumnDefinition};
use super::heading::ReportHeading;
use super::pipeline::FormattedTable;
use super::types::{ExportFormat, ExportOptions, Orientation, Row};

pub use layout::{
    layout_plain, layout_structured, DocumentLayout, DrawOp, Page, PageCursor, PageGeometry,
};
pub use pdf::text_width;

/// How the table body is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutStrategy {
    /// Grid table with aligned columns
    Structured,
    /// Cells joined with `" | "`, one text line per row
    PlainText,
}

impl LayoutStrategy {
    /// Human-readable name used in logs and summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutStrategy::Structured => "structured table",
            LayoutStrategy::PlainText => "plain text",
        }
    }
}

impl std::fmt::Display for LayoutStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the host can do for document rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentEnvironment {
    /// The host can produce paginated documents at all
    pub documents: bool,
    /// The host supports the structured table layout
    pub table_layout: bool,
    /// Page size and fonts, in portrait orientation
    pub page: PageGeometry,
}

impl Default for DocumentEnvironment {
    fn default() -> Self {
        Self {
            documents: true,
            table_layout: true,
            page: PageGeometry::default(),
        }
    }
}

impl DocumentEnvironment {
    /// Capability probe, evaluated once per export call.
    ///
    /// # Errors
    ///
    /// Returns `EnvironmentUnsupported` when documents cannot be produced at all.
    pub fn probe(&self) -> Result<LayoutStrategy, ExportError> {
        if !self.documents {
            return Err(ExportError::EnvironmentUnsupported {
                format: ExportFormat::Document,
                reason: "no document backend is available".to_string(),
            });
        }
        Ok(if self.table_layout {
            LayoutStrategy::Structured
        } else {
            LayoutStrategy::PlainText
        })
    }
}

/// A finished document and the strategy that produced it.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    /// PDF bytes
    pub bytes: Vec<u8>,
    /// Strategy that produced the bytes
    pub strategy: LayoutStrategy,
}

/// Renders rows into a PDF using the default environment.
///
/// # Errors
///
/// Returns `InvalidInput` for an empty dataset or schema and `RenderFailed` when
/// both layout strategies fail.
pub fn render_document(
    rows: &[Row],
    columns: &[ColumnDefinition],
    options: &ExportOptions,
) -> Result<RenderedDocument, ExportError> {
    render_document_in(&DocumentEnvironment::default(), rows, columns, options)
}

/// Renders rows into a PDF in the given environment.
///
/// # Errors
///
/// As [`render_document`], plus `EnvironmentUnsupported` when the environment
/// cannot produce documents.
pub fn render_document_in(
    environment: &DocumentEnvironment,
    rows: &[Row],
    columns: &[ColumnDefinition],
    options: &ExportOptions,
) -> Result<RenderedDocument, ExportError> {
    let columns = validate_input(rows, columns)?;
    let strategy = environment.probe()?;
    let table = FormattedTable::from_rows(&columns, rows);
    render_for(environment, strategy, options, Local::now(), &table)
}

/// Generates the artifact for an export started at `started_at`, using the
/// strategy the caller already probed.
pub(crate) fn render_for(
    environment: &DocumentEnvironment,
    strategy: LayoutStrategy,
    options: &ExportOptions,
    started_at: DateTime<Local>,
    table: &FormattedTable,
) -> Result<RenderedDocument, ExportError> {
    let heading = ReportHeading::new(options, started_at);
    render_table(environment, strategy, &heading, table, options.orientation())
}

/// Runs the probed strategy, falling back to plain text if the structured
/// layout fails.
fn render_table(
    environment: &DocumentEnvironment,
    strategy: LayoutStrategy,
    heading: &ReportHeading,
    table: &FormattedTable,
    orientation: Orientation,
) -> Result<RenderedDocument, ExportError> {
    let geometry = environment.page.oriented(orientation);
    debug!(
        "Rendering document with {} layout ({} rows, {} columns)",
        strategy,
        table.rows.len(),
        table.column_count()
    );

    let primary = match strategy {
        LayoutStrategy::Structured => {
            match layout_structured(geometry, heading, table)
                .and_then(|layout| pdf::encode(&layout, &heading.title))
            {
                Ok(bytes) => return Ok(RenderedDocument { bytes, strategy }),
                Err(e) => {
                    warn!(
                        "Structured table layout failed ({}), falling back to plain text",
                        e
                    );
                    e
                }
            }
        }
        LayoutStrategy::PlainText => LayoutError::TableLayoutUnavailable,
    };

    render_plain(geometry, heading, table).map_err(|fallback| {
        render_failed(format!(
            "{}; plain-text fallback failed ({})",
            primary, fallback
        ))
    })
}

fn render_plain(
    geometry: PageGeometry,
    heading: &ReportHeading,
    table: &FormattedTable,
) -> Result<RenderedDocument, LayoutError> {
    let layout = layout_plain(geometry, heading, table)?;
    Ok(RenderedDocument {
        bytes: pdf::encode(&layout, &heading.title)?,
        strategy: LayoutStrategy::PlainText,
    })
}

fn render_failed(reason: String) -> ExportError {
    ExportError::RenderFailed {
        format: ExportFormat::Document,
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::ExportErrorKind;
    use serde_json::json;

    fn contains(haystack: &[u8], needle: &str) -> bool {
        haystack
            .windows(needle.len())
            .any(|w| w == needle.as_bytes())
    }

    fn sample_rows() -> Vec<Row> {
        vec![
            json!({"name": "Ahmed", "amount": 100}),
            json!({"name": "Sara", "amount": 200}),
        ]
        .into_iter()
        .map(|v| v.as_object().cloned().unwrap())
        .collect()
    }

    fn sample_columns() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("Name", "name"),
            ColumnDefinition::new("Amount", "amount"),
        ]
    }

    #[test]
    fn test_probe_prefers_structured() {
        let env = DocumentEnvironment::default();
        assert_eq!(env.probe().unwrap(), LayoutStrategy::Structured);
    }

    #[test]
    fn test_probe_without_table_layout_selects_plain_text() {
        let env = DocumentEnvironment {
            table_layout: false,
            ..Default::default()
        };
        assert_eq!(env.probe().unwrap(), LayoutStrategy::PlainText);
    }

    #[test]
    fn test_probe_without_documents_is_unsupported() {
        let env = DocumentEnvironment {
            documents: false,
            ..Default::default()
        };
        let err = env.probe().unwrap_err();
        assert_eq!(err.kind(), ExportErrorKind::EnvironmentUnsupported);
    }

    #[test]
    fn test_render_document_structured() {
        let options = ExportOptions::new("r", "Sales");
        let doc = render_document(&sample_rows(), &sample_columns(), &options).unwrap();
        assert_eq!(doc.strategy, LayoutStrategy::Structured);
        assert!(doc.bytes.starts_with(b"%PDF"));
        assert!(contains(&doc.bytes, "(Ahmed) Tj"));
        assert!(contains(&doc.bytes, "(Sales) Tj"));
    }

    #[test]
    fn test_render_document_plain_text_when_table_layout_missing() {
        let env = DocumentEnvironment {
            table_layout: false,
            ..Default::default()
        };
        let options = ExportOptions::new("r", "Sales");
        let doc = render_document_in(&env, &sample_rows(), &sample_columns(), &options).unwrap();
        assert_eq!(doc.strategy, LayoutStrategy::PlainText);
        assert!(contains(&doc.bytes, "(Name | Amount) Tj"));
        assert!(contains(&doc.bytes, "(Ahmed | 100) Tj"));
        assert!(contains(&doc.bytes, "(Sara | 200) Tj"));
    }

    #[test]
    fn test_render_document_falls_back_when_structured_layout_fails() {
        // 40 columns cannot fit across a portrait page
        let columns: Vec<ColumnDefinition> = (0..40)
            .map(|i| ColumnDefinition::new(format!("C{}", i), "name"))
            .collect();
        let options = ExportOptions::new("r", "Wide");
        let doc = render_document(&sample_rows(), &columns, &options).unwrap();
        assert_eq!(doc.strategy, LayoutStrategy::PlainText);
        assert!(!doc.bytes.is_empty());
        assert!(contains(&doc.bytes, "C0 | C1 | C2"));
        assert!(contains(&doc.bytes, "Ahmed | Ahmed | Ahmed"));
    }

    #[test]
    fn test_render_document_fails_when_both_strategies_fail() {
        let env = DocumentEnvironment {
            page: PageGeometry {
                width: 100.0,
                height: 100.0,
                margin: 45.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let options = ExportOptions::new("r", "Tiny");
        let err = render_document_in(&env, &sample_rows(), &sample_columns(), &options).unwrap_err();
        assert_eq!(err.kind(), ExportErrorKind::RenderFailed);
        assert!(err.to_string().contains("plain-text fallback failed"));
    }

    #[test]
    fn test_render_document_landscape_media_box() {
        let mut options = ExportOptions::new("r", "Sales");
        options.orientation = Some(Orientation::Landscape);
        let doc = render_document(&sample_rows(), &sample_columns(), &options).unwrap();
        assert!(contains(&doc.bytes, "/MediaBox [0 0 841.89 595.28]"));
    }

    #[test]
    fn test_render_document_rejects_empty_rows() {
        let options = ExportOptions::new("r", "Sales");
        let err = render_document(&[], &sample_columns(), &options).unwrap_err();
        assert_eq!(err.kind(), ExportErrorKind::InvalidInput);
    }
}
