//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and for tuning the export orchestrator.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};

use crate::config::constants::{CHUNK_SIZE, CHUNK_THRESHOLD, CHUNK_YIELD_DELAY};
use crate::export::{ExportFormat, Orientation};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Orchestrator tuning (no CLI dependencies).
///
/// Controls when the orchestrator switches to chunked mode, how large each chunk
/// is, and how long it pauses between chunks. The defaults match the documented
/// behaviour: chunks of 1000 rows above a 1000-row threshold.
///
/// # Examples
///
/// ```
/// use report_export::ExportSettings;
/// use std::time::Duration;
///
/// let settings = ExportSettings {
///     chunk_delay: Duration::ZERO,
///     ..Default::default()
/// };
/// assert!(settings.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSettings {
    /// Rows per chunk in chunked mode
    pub chunk_size: usize,

    /// Row count above which chunked mode is used
    pub chunk_threshold: usize,

    /// Pause between chunks
    pub chunk_delay: Duration,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            chunk_threshold: CHUNK_THRESHOLD,
            chunk_delay: CHUNK_YIELD_DELAY,
        }
    }
}

impl ExportSettings {
    /// Checks that the settings can drive an export.
    ///
    /// # Errors
    ///
    /// Returns an error message when the chunk size is zero.
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Command-line configuration for the `report_export` binary.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "report_export",
    about = "Export a tabular report request to PDF, XLSX or CSV"
)]
pub struct Config {
    /// JSON request file containing columns, rows and options
    pub input: PathBuf,

    /// Target format
    #[arg(long, value_enum, default_value_t = ExportFormat::Document)]
    pub format: ExportFormat,

    /// Directory the artifact is written to
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Base file name (overrides the request's `filename`)
    #[arg(long)]
    pub filename: Option<String>,

    /// Page orientation (overrides the request's `orientation`)
    #[arg(long, value_enum)]
    pub orientation: Option<Orientation>,

    /// Rows per chunk for large datasets
    #[arg(long, default_value_t = CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Disable the structured table layout and write documents as plain text lines
    #[arg(long)]
    pub no_table_layout: bool,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from("report.json"),
            format: ExportFormat::Document,
            output_dir: PathBuf::from("."),
            filename: None,
            orientation: None,
            chunk_size: CHUNK_SIZE,
            no_table_layout: false,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

impl Config {
    /// Validates the configuration before any work starts.
    ///
    /// # Errors
    ///
    /// Returns an error if the chunk size is zero or the file name override is
    /// empty or contains a path separator.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            bail!("--chunk-size must be greater than 0");
        }
        if let Some(name) = &self.filename {
            if name.trim().is_empty() {
                bail!("--filename must not be empty");
            }
            if name.contains('/') || name.contains('\\') {
                bail!("--filename must not contain path separators: {}", name);
            }
        }
        Ok(())
    }

    /// Builds orchestrator settings from the CLI values.
    pub fn export_settings(&self) -> ExportSettings {
        ExportSettings {
            chunk_size: self.chunk_size,
            ..Default::default()
        }
    }
}
