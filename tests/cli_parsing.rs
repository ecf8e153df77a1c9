//! Tests for CLI argument parsing.

use clap::Parser;
use report_export::config::{Config, LogFormat, LogLevel};
use report_export::{ExportFormat, Orientation};
use std::path::PathBuf;

#[test]
fn test_cli_defaults() {
    let config = Config::try_parse_from(["report_export", "request.json"]).expect("Should parse");
    assert_eq!(config.input, PathBuf::from("request.json"));
    assert_eq!(config.format, ExportFormat::Document);
    assert_eq!(config.output_dir, PathBuf::from("."));
    assert_eq!(config.chunk_size, 1000);
    assert!(config.filename.is_none());
    assert!(config.orientation.is_none());
    assert!(!config.no_table_layout);
    // LogLevel doesn't implement PartialEq, so we compare via conversion
    assert_eq!(
        log::LevelFilter::from(config.log_level.clone()),
        log::LevelFilter::from(LogLevel::Info)
    );
    assert!(matches!(config.log_format, LogFormat::Plain));
    assert!(config.validate().is_ok());
}

#[test]
fn test_cli_format_names_and_aliases() {
    for (arg, expected) in [
        ("document", ExportFormat::Document),
        ("pdf", ExportFormat::Document),
        ("spreadsheet", ExportFormat::Spreadsheet),
        ("xlsx", ExportFormat::Spreadsheet),
        ("delimited", ExportFormat::Delimited),
        ("csv", ExportFormat::Delimited),
    ] {
        let config = Config::try_parse_from(["report_export", "r.json", "--format", arg])
            .unwrap_or_else(|e| panic!("--format {} should parse: {}", arg, e));
        assert_eq!(config.format, expected, "--format {}", arg);
    }
}

#[test]
fn test_cli_rejects_unknown_format() {
    let result = Config::try_parse_from(["report_export", "r.json", "--format", "parquet"]);
    assert!(result.is_err(), "Should reject unsupported format");
}

#[test]
fn test_cli_requires_input() {
    assert!(Config::try_parse_from(["report_export"]).is_err());
}

#[test]
fn test_cli_overrides() {
    let config = Config::try_parse_from([
        "report_export",
        "r.json",
        "--output-dir",
        "/tmp/reports",
        "--filename",
        "payouts",
        "--orientation",
        "landscape",
        "--chunk-size",
        "250",
        "--no-table-layout",
        "--log-level",
        "debug",
        "--log-format",
        "json",
    ])
    .expect("Should parse all overrides");

    assert_eq!(config.output_dir, PathBuf::from("/tmp/reports"));
    assert_eq!(config.filename.as_deref(), Some("payouts"));
    assert_eq!(config.orientation, Some(Orientation::Landscape));
    assert_eq!(config.chunk_size, 250);
    assert!(config.no_table_layout);
    assert!(matches!(config.log_format, LogFormat::Json));
    assert_eq!(config.export_settings().chunk_size, 250);
}

#[test]
fn test_cli_validation_rejects_bad_values() {
    let config = Config::try_parse_from(["report_export", "r.json", "--chunk-size", "0"])
        .expect("Should parse");
    assert!(config.validate().is_err());

    let config = Config::try_parse_from(["report_export", "r.json", "--filename", "a/b"])
        .expect("Should parse");
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("path separators"));
}
