//! Tests for document (PDF) export, layout fallback and heading content.

use report_export::export::{
    render_document, render_document_in, ColumnDefinition, DocumentEnvironment, Exporter,
    LayoutStrategy, MemorySink, PageGeometry,
};
use report_export::{ExportErrorKind, ExportFormat, ExportOptions, Orientation};

#[path = "helpers.rs"]
mod helpers;

use helpers::{
    contains_bytes, numbered_columns, numbered_rows, payout_columns, payout_rows, rows_from,
};
use serde_json::json;

fn count(haystack: &[u8], needle: &str) -> usize {
    haystack
        .windows(needle.len())
        .filter(|w| *w == needle.as_bytes())
        .count()
}

fn plain_environment() -> DocumentEnvironment {
    DocumentEnvironment {
        table_layout: false,
        ..Default::default()
    }
}

#[test]
fn test_structured_document_contains_formatted_cells() {
    let doc = render_document(
        &payout_rows(),
        &payout_columns(),
        &ExportOptions::new("payouts", "Payouts"),
    )
    .expect("render");
    assert_eq!(doc.strategy, LayoutStrategy::Structured);
    assert!(contains_bytes(&doc.bytes, "($100) Tj"));
    assert!(contains_bytes(&doc.bytes, "($300) Tj"));
}

#[test]
fn test_plain_text_lines_match_payout_example() {
    let doc = render_document_in(
        &plain_environment(),
        &payout_rows(),
        &payout_columns(),
        &ExportOptions::new("payouts", "Payouts"),
    )
    .expect("render");
    assert_eq!(doc.strategy, LayoutStrategy::PlainText);
    for line in [
        "(Name | Amount) Tj",
        "(Ahmed | $100) Tj",
        "(Sara, Q. | $200) Tj",
        "(Omar \"O\" | $300) Tj",
    ] {
        assert!(contains_bytes(&doc.bytes, line), "missing {}", line);
    }
}

#[test]
fn test_typographic_punctuation_survives_in_both_strategies() {
    let name = "O\u{2019}Brien \u{2013} \u{201C}VIP\u{201D}";
    let rows = rows_from(json!([{"name": name, "amount": 1}]));
    let columns = vec![
        ColumnDefinition::new("Name", "name"),
        ColumnDefinition::new("Amount", "amount"),
    ];
    let options = ExportOptions::new("vip", "VIP list \u{2026}");

    let structured = render_document(&rows, &columns, &options).expect("render");
    assert_eq!(structured.strategy, LayoutStrategy::Structured);
    assert!(contains_bytes(&structured.bytes, "(O\\222Brien \\226 \\223VIP\\224) Tj"));
    assert!(contains_bytes(&structured.bytes, "(VIP list \\205) Tj"));

    let plain = render_document_in(&plain_environment(), &rows, &columns, &options)
        .expect("render");
    assert!(contains_bytes(&plain.bytes, "(O\\222Brien \\226 \\223VIP\\224 | 1) Tj"));
    assert!(!contains_bytes(&plain.bytes, "O?Brien"));
}

#[test]
fn test_too_many_columns_fall_back_to_plain_text() {
    let columns: Vec<ColumnDefinition> = (0..30)
        .map(|i| ColumnDefinition::new(format!("Column {}", i), "name"))
        .collect();
    let doc = render_document(
        &payout_rows(),
        &columns,
        &ExportOptions::new("wide", "Wide report"),
    )
    .expect("fallback should succeed");
    assert_eq!(doc.strategy, LayoutStrategy::PlainText);
    assert!(contains_bytes(&doc.bytes, "Column 0 | Column 1"));
}

#[test]
fn test_landscape_fits_more_columns_than_portrait() {
    // 20 minimum-width columns overflow portrait A4 but fit landscape
    let columns: Vec<ColumnDefinition> = (0..20)
        .map(|i| ColumnDefinition::new(format!("C{}", i), "name"))
        .collect();

    let portrait = render_document(&payout_rows(), &columns, &ExportOptions::new("r", "R"))
        .expect("render");
    assert_eq!(portrait.strategy, LayoutStrategy::PlainText);

    let mut options = ExportOptions::new("r", "R");
    options.orientation = Some(Orientation::Landscape);
    let landscape = render_document(&payout_rows(), &columns, &options).expect("render");
    assert_eq!(landscape.strategy, LayoutStrategy::Structured);
}

#[test]
fn test_both_strategies_failing_is_render_failed() {
    let environment = DocumentEnvironment {
        page: PageGeometry {
            width: 120.0,
            height: 120.0,
            margin: 55.0,
            ..Default::default()
        },
        ..Default::default()
    };
    let err = render_document_in(
        &environment,
        &payout_rows(),
        &payout_columns(),
        &ExportOptions::new("r", "R"),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ExportErrorKind::RenderFailed);
}

#[test]
fn test_heading_shows_timestamp_and_visible_filters_only() {
    let mut options = ExportOptions::new("payouts", "Payouts");
    options.subtitle = Some("First quarter".to_string());
    options.include_timestamp = true;
    options.include_filters = true;
    options
        .filters
        .insert("status".to_string(), Some("paid".to_string()));
    options
        .filters
        .insert("region".to_string(), Some("all".to_string()));
    options.filters.insert("branch".to_string(), None);

    let doc = render_document(&payout_rows(), &payout_columns(), &options).expect("render");
    assert!(contains_bytes(&doc.bytes, "(First quarter) Tj"));
    assert!(contains_bytes(&doc.bytes, "(Generated: "));
    assert!(contains_bytes(&doc.bytes, "(Applied filters:) Tj"));
    assert!(contains_bytes(&doc.bytes, "(status: paid) Tj"));
    assert!(!contains_bytes(&doc.bytes, "region"));
    assert!(!contains_bytes(&doc.bytes, "branch"));
}

#[test]
fn test_filters_hidden_when_disabled() {
    let mut options = ExportOptions::new("payouts", "Payouts");
    options
        .filters
        .insert("status".to_string(), Some("paid".to_string()));
    let doc = render_document(&payout_rows(), &payout_columns(), &options).expect("render");
    assert!(!contains_bytes(&doc.bytes, "Applied filters:"));
    assert!(!contains_bytes(&doc.bytes, "Generated:"));
}

#[test]
fn test_header_row_repeats_on_every_page() {
    let doc = render_document(
        &numbered_rows(400),
        &numbered_columns(),
        &ExportOptions::new("users", "Users"),
    )
    .expect("render");
    let pages = count(&doc.bytes, "/Type /Page /");
    assert!(pages > 1, "400 rows should span several pages");
    assert_eq!(count(&doc.bytes, "(Name) Tj"), pages);
    assert!(contains_bytes(&doc.bytes, "(user-399) Tj"));
}

#[tokio::test]
async fn test_exporter_without_document_backend_is_unsupported() {
    let exporter = Exporter::new(MemorySink::new()).with_environment(DocumentEnvironment {
        documents: false,
        ..Default::default()
    });
    let err = exporter
        .export(
            &payout_rows(),
            &payout_columns(),
            &ExportOptions::new("payouts", "Payouts"),
            ExportFormat::Document,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ExportErrorKind::EnvironmentUnsupported);
    assert!(exporter.sink().is_empty());

    // the other formats are unaffected
    let report = exporter
        .export(
            &payout_rows(),
            &payout_columns(),
            &ExportOptions::new("payouts", "Payouts"),
            ExportFormat::Spreadsheet,
        )
        .await
        .expect("spreadsheet export");
    assert!(report.file_name.ends_with(".xlsx"));
}

#[tokio::test]
async fn test_exporter_reports_fallback_strategy() {
    let exporter = Exporter::new(MemorySink::new()).with_environment(plain_environment());
    let report = exporter
        .export(
            &payout_rows(),
            &payout_columns(),
            &ExportOptions::new("payouts", "Payouts"),
            ExportFormat::Document,
        )
        .await
        .expect("export");
    assert_eq!(report.strategy, Some(LayoutStrategy::PlainText));
    let saved = exporter.sink().artifacts();
    let artifact = &saved[0];
    assert_eq!(artifact.mime_type(), "application/pdf");
    assert!(artifact.bytes.starts_with(b"%PDF"));
}
