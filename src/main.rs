//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `report_export` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Loading the request file
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::process;

use report_export::export::{load_request, DirectorySink, DocumentEnvironment, Exporter};
use report_export::initialization::init_logger_with;
use report_export::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments into Config
    let config = Config::parse();
    config.validate()?;

    // Initialize logger based on config
    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    let request = load_request(&config.input).await?;
    let columns = request.column_definitions()?;
    let mut options = request.options.clone();
    if let Some(filename) = &config.filename {
        options.filename = filename.clone();
    }
    if let Some(orientation) = config.orientation {
        options.orientation = Some(orientation);
    }

    let exporter = Exporter::new(DirectorySink::new(&config.output_dir))
        .with_environment(DocumentEnvironment {
            table_layout: !config.no_table_layout,
            ..Default::default()
        })
        .with_settings(config.export_settings());

    let result = exporter
        .export_with_progress(&request.rows, &columns, &options, config.format, |fraction| {
            info!("Progress: {:.0}%", fraction * 100.0)
        })
        .await;

    match result {
        Ok(report) => {
            // Print user-friendly summary
            println!(
                "✅ Exported {} row{} to {} ({} bytes{}) in {:.1}s",
                report.rows_exported,
                if report.rows_exported == 1 { "" } else { "s" },
                report.file_name,
                report.bytes,
                report
                    .strategy
                    .map(|s| format!(", {} layout", s))
                    .unwrap_or_default(),
                report.elapsed.as_secs_f64()
            );
            if let Some(location) = &report.location {
                println!("Saved to {}", location.display());
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("report_export error: {:#}", e);
            eprintln!("hint: {}", e.hint());
            process::exit(1);
        }
    }
}
