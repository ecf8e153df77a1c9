//! Tabular report export.
//!
//! This module turns rows and a column schema into a downloadable artifact:
//! a paginated document (PDF), a spreadsheet (XLSX) or delimited text (CSV).
//!
//! - [`columns`](ColumnDefinition) and [`formatters`] describe how each cell is produced
//! - the formatting pipeline absorbs per-cell formatter failures
//! - one renderer per format builds the artifact bytes
//! - [`Exporter`] orchestrates chunking, progress, rendering and saving

mod artifact;
mod columns;
mod delimited;
mod document;
pub mod formatters;
mod heading;
mod orchestrator;
mod pipeline;
pub mod request;
mod spreadsheet;
mod types;

pub use artifact::{artifact_file_name, Artifact, ArtifactSink, DirectorySink, MemorySink};
pub use columns::{resolve_columns, CellFormatter, ColumnDefinition};
pub use delimited::render_delimited;
pub use document::{
    layout_plain, layout_structured, render_document, render_document_in, text_width,
    DocumentEnvironment, DocumentLayout, DrawOp, LayoutStrategy, Page, PageCursor, PageGeometry,
    RenderedDocument,
};
pub use heading::{ReportHeading, FILTERS_LABEL};
pub use orchestrator::{ChunkPlan, ExportReport, Exporter, JobStatus};
pub use pipeline::{apply, FormattedTable};
pub use request::{load_request, ReportRequest};
pub use spreadsheet::{render_spreadsheet, sheet_rows, SheetRow, SheetRowKind};
pub use types::{ExportFormat, ExportOptions, Orientation, Row};
