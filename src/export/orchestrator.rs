//! Export orchestration.
//!
//! The [`Exporter`] validates input, formats rows (directly for small datasets,
//! chunk by chunk with progress reporting for large ones), renders the artifact
//! once, and hands it to its sink. A failed call never reaches the sink.

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local};
use log::{debug, info, warn};

use crate::config::ExportSettings;
use crate::error_handling::ExportError;

use super::artifact::{artifact_file_name, Artifact, ArtifactSink};
use super::columns::{validate_input, ColumnDefinition};
use super::delimited;
use super::document::{self, DocumentEnvironment, LayoutStrategy};
use super::pipeline::FormattedTable;
use super::spreadsheet;
use super::types::{ExportFormat, ExportOptions, Row};

/// Lifecycle of an export call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    /// Accepted, input not yet validated
    Pending,
    /// Formatting or rendering
    Running,
    /// Artifact saved
    Completed,
    /// Ended with an error; nothing was saved
    Failed,
}

/// How a dataset is split into chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    /// Rows per chunk (the last chunk may be shorter)
    pub chunk_size: usize,
    /// Number of chunks, `ceil(rows / chunk_size)`
    pub total_chunks: usize,
}

impl ChunkPlan {
    /// Plans chunked processing for `row_count` rows.
    ///
    /// Returns `None` when the dataset is small enough to be formatted directly,
    /// that is when `row_count <= settings.chunk_threshold`.
    pub fn for_rows(row_count: usize, settings: &ExportSettings) -> Option<Self> {
        if row_count <= settings.chunk_threshold || settings.chunk_size == 0 {
            return None;
        }
        Some(Self {
            chunk_size: settings.chunk_size,
            total_chunks: row_count.div_ceil(settings.chunk_size),
        })
    }

    /// Progress fraction reported after chunk `index` (zero-based) completes.
    pub fn progress_after(&self, index: usize) -> f64 {
        (index + 1) as f64 / self.total_chunks as f64
    }
}

/// Summary of a successful export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    /// Name of the saved artifact
    pub file_name: String,
    /// Where the sink put it, if it has a location
    pub location: Option<PathBuf>,
    /// Format of the artifact
    pub format: ExportFormat,
    /// Number of data rows in the artifact
    pub rows_exported: usize,
    /// Chunks processed (1 for direct mode)
    pub chunks: usize,
    /// Document layout that produced the artifact (documents only)
    pub strategy: Option<LayoutStrategy>,
    /// Artifact size
    pub bytes: usize,
    /// Time from the start of the call until the artifact was saved
    pub elapsed: Duration,
}

/// Runs exports and saves artifacts through a sink.
///
/// An `Exporter` holds no per-call state. It is safe to share by reference
/// between concurrent calls; each call owns its own rows, formatted table and
/// progress callback.
///
/// # Examples
///
/// ```
/// use report_export::export::{ColumnDefinition, ExportOptions, Exporter, MemorySink};
/// use report_export::ExportFormat;
/// use serde_json::json;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let rows = vec![json!({"name": "Ahmed", "amount": 100})
///     .as_object()
///     .cloned()
///     .unwrap()];
/// let columns = vec![
///     ColumnDefinition::new("Name", "name"),
///     ColumnDefinition::new("Amount", "amount"),
/// ];
///
/// let exporter = Exporter::new(MemorySink::new());
/// let report = exporter
///     .export(&rows, &columns, &ExportOptions::new("payouts", "Payouts"), ExportFormat::Delimited)
///     .await?;
/// assert_eq!(report.rows_exported, 1);
/// assert_eq!(exporter.sink().len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Exporter<S> {
    sink: S,
    environment: DocumentEnvironment,
    settings: ExportSettings,
}

impl<S: ArtifactSink> Exporter<S> {
    /// Creates an exporter with the default environment and settings.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            environment: DocumentEnvironment::default(),
            settings: ExportSettings::default(),
        }
    }

    /// Replaces the document environment used by the capability probe.
    pub fn with_environment(mut self, environment: DocumentEnvironment) -> Self {
        self.environment = environment;
        self
    }

    /// Replaces the chunking settings.
    pub fn with_settings(mut self, settings: ExportSettings) -> Self {
        self.settings = settings;
        self
    }

    /// The sink artifacts are saved through.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The document environment.
    pub fn environment(&self) -> &DocumentEnvironment {
        &self.environment
    }

    /// The chunking settings.
    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Exports rows without progress reporting.
    ///
    /// # Errors
    ///
    /// See [`Exporter::export_with_progress`].
    pub async fn export(
        &self,
        rows: &[Row],
        columns: &[ColumnDefinition],
        options: &ExportOptions,
        format: ExportFormat,
    ) -> Result<ExportReport, ExportError> {
        self.export_with_progress(rows, columns, options, format, |_| {})
            .await
    }

    /// Exports rows, reporting progress after each chunk in chunked mode.
    ///
    /// Datasets of at most `chunk_threshold` rows are formatted in one pass and
    /// `on_progress` is never called. Larger datasets are formatted in chunks of
    /// `chunk_size` rows, `on_progress` receives `(i + 1) / total_chunks` after
    /// chunk `i`, and the call pauses for `chunk_delay` between chunks. In both
    /// modes the artifact is rendered and saved exactly once, containing every
    /// row.
    ///
    /// # Arguments
    ///
    /// * `rows` - Dataset, in output order
    /// * `columns` - Column schema, in output order
    /// * `options` - Heading and file name options
    /// * `format` - Target format
    /// * `on_progress` - Called with a fraction in `(0, 1]`, strictly increasing
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for an empty dataset, empty schema or invalid settings
    /// - `EnvironmentUnsupported` when documents are requested but unavailable
    /// - `RenderFailed` when every strategy for the format fails
    /// - `SaveFailed` when the sink rejects the artifact
    pub async fn export_with_progress<F>(
        &self,
        rows: &[Row],
        columns: &[ColumnDefinition],
        options: &ExportOptions,
        format: ExportFormat,
        on_progress: F,
    ) -> Result<ExportReport, ExportError>
    where
        F: FnMut(f64),
    {
        let mut status = JobStatus::Pending;
        debug!("Export {} of {} rows is {:?}", format, rows.len(), status);

        let result = self
            .run(rows, columns, options, format, on_progress, &mut status)
            .await;

        status = match result {
            Ok(_) => JobStatus::Completed,
            Err(_) => JobStatus::Failed,
        };
        match &result {
            Ok(report) => info!(
                "Exported {} rows to {} ({} bytes) in {:.2}s",
                report.rows_exported,
                report.file_name,
                report.bytes,
                report.elapsed.as_secs_f64()
            ),
            Err(e) => warn!("Export failed ({:?}): {}", status, e),
        }
        result
    }

    async fn run<F>(
        &self,
        rows: &[Row],
        columns: &[ColumnDefinition],
        options: &ExportOptions,
        format: ExportFormat,
        mut on_progress: F,
        status: &mut JobStatus,
    ) -> Result<ExportReport, ExportError>
    where
        F: FnMut(f64),
    {
        self.settings.validate().map_err(ExportError::InvalidInput)?;
        let columns = validate_input(rows, columns)?;
        let started_at = Local::now();
        let clock = std::time::Instant::now();

        // Probe before formatting so an unsupported host fails fast
        let strategy = match format {
            ExportFormat::Document => Some(self.environment.probe()?),
            ExportFormat::Spreadsheet | ExportFormat::Delimited => None,
        };

        *status = JobStatus::Running;
        debug!("Export {} is {:?}", format, status);
        info!(
            "Exporting {} rows x {} columns as {}",
            rows.len(),
            columns.len(),
            format
        );

        let mut table = FormattedTable::new(&columns);
        let chunks = match ChunkPlan::for_rows(rows.len(), &self.settings) {
            None => {
                debug!("Formatting {} rows in a single pass", rows.len());
                table.append_rows(&columns, rows);
                1
            }
            Some(plan) => {
                debug!(
                    "Formatting {} rows in {} chunks of {}",
                    rows.len(),
                    plan.total_chunks,
                    plan.chunk_size
                );
                for (index, chunk) in rows.chunks(plan.chunk_size).enumerate() {
                    table.append_rows(&columns, chunk);
                    debug!(
                        "Formatted chunk {}/{} ({} rows)",
                        index + 1,
                        plan.total_chunks,
                        chunk.len()
                    );
                    on_progress(plan.progress_after(index));
                    if index + 1 < plan.total_chunks {
                        self.pause().await;
                    }
                }
                plan.total_chunks
            }
        };

        let (bytes, strategy) = self.render(format, strategy, options, started_at, &table)?;
        let artifact = Artifact {
            file_name: artifact_file_name(&options.filename, format, started_at),
            format,
            bytes,
        };

        let location = self
            .sink
            .save(&artifact)
            .map_err(|source| ExportError::SaveFailed {
                file_name: artifact.file_name.clone(),
                source,
            })?;

        Ok(ExportReport {
            rows_exported: table.rows.len(),
            bytes: artifact.bytes.len(),
            file_name: artifact.file_name,
            location,
            format,
            chunks,
            strategy,
            elapsed: clock.elapsed(),
        })
    }

    fn render(
        &self,
        format: ExportFormat,
        strategy: Option<LayoutStrategy>,
        options: &ExportOptions,
        started_at: DateTime<Local>,
        table: &FormattedTable,
    ) -> Result<(Vec<u8>, Option<LayoutStrategy>), ExportError> {
        match (format, strategy) {
            (ExportFormat::Delimited, _) => {
                Ok((delimited::encode_table(table)?.into_bytes(), None))
            }
            (ExportFormat::Spreadsheet, _) => {
                Ok((spreadsheet::encode_for(options, started_at, table)?, None))
            }
            (ExportFormat::Document, probed) => {
                let probed = match probed {
                    Some(s) => s,
                    None => self.environment.probe()?,
                };
                let rendered =
                    document::render_for(&self.environment, probed, options, started_at, table)?;
                Ok((rendered.bytes, Some(rendered.strategy)))
            }
        }
    }

    async fn pause(&self) {
        if self.settings.chunk_delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.settings.chunk_delay).await;
        }
    }
}
