//! Spreadsheet (XLSX) renderer.
//!
//! Builds a single flat sheet: the heading region (title, subtitle, generation
//! time, filters, each followed by a blank separator row), then the header row
//! and one row per data item. There is no pagination and no fallback path.

use chrono::{DateTime, Local};
use log::warn;
use rust_xlsxwriter::{Format, FormatBorder, Workbook, XlsxError};

use crate::config::{
    DEFAULT_SPREADSHEET_COLUMN_WIDTH, SPREADSHEET_MAX_CELL_CHARS, SPREADSHEET_SHEET_NAME,
};
use crate::error_handling::ExportError;

use super::columns::{validate_input, ColumnDefinition};
use super::heading::{ReportHeading, FILTERS_LABEL};
use super::pipeline::FormattedTable;
use super::types::{ExportFormat, ExportOptions, Row};

/// Role of a sheet row, used to pick its cell format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetRowKind {
    /// Report title
    Title,
    /// Subtitle, timestamp or filter line
    Meta,
    /// Separator
    Blank,
    /// Column headers
    Header,
    /// One formatted data item
    Data,
}

/// One row of the sheet before it is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow {
    /// Role of the row
    pub kind: SheetRowKind,
    /// Cell text, starting at column A
    pub cells: Vec<String>,
}

impl SheetRow {
    fn new(kind: SheetRowKind, cells: Vec<String>) -> Self {
        Self { kind, cells }
    }

    fn single(kind: SheetRowKind, text: &str) -> Self {
        Self::new(kind, vec![text.to_string()])
    }

    fn blank() -> Self {
        Self::new(SheetRowKind::Blank, Vec::new())
    }
}

/// Renders rows into XLSX bytes.
///
/// # Errors
///
/// Returns `InvalidInput` for an empty dataset or schema, and `RenderFailed` if
/// the workbook cannot be serialized.
pub fn render_spreadsheet(
    rows: &[Row],
    columns: &[ColumnDefinition],
    options: &ExportOptions,
) -> Result<Vec<u8>, ExportError> {
    let columns = validate_input(rows, columns)?;
    let table = FormattedTable::from_rows(&columns, rows);
    let heading = ReportHeading::new(options, Local::now());
    encode_table(&heading, &table)
}

/// Lays out the heading and table as an ordered list of sheet rows.
pub fn sheet_rows(heading: &ReportHeading, table: &FormattedTable) -> Vec<SheetRow> {
    let mut rows = Vec::with_capacity(table.rows.len() + 10);

    rows.push(SheetRow::single(SheetRowKind::Title, &heading.title));
    rows.push(SheetRow::blank());

    if let Some(subtitle) = &heading.subtitle {
        rows.push(SheetRow::single(SheetRowKind::Meta, subtitle));
        rows.push(SheetRow::blank());
    }
    if let Some(generated) = &heading.generated {
        rows.push(SheetRow::single(SheetRowKind::Meta, generated));
        rows.push(SheetRow::blank());
    }
    if !heading.filters.is_empty() {
        rows.push(SheetRow::single(SheetRowKind::Meta, FILTERS_LABEL));
        for line in &heading.filters {
            rows.push(SheetRow::single(SheetRowKind::Meta, line));
        }
        rows.push(SheetRow::blank());
    }

    rows.push(SheetRow::new(SheetRowKind::Header, table.headers.clone()));
    rows.extend(
        table
            .rows
            .iter()
            .map(|cells| SheetRow::new(SheetRowKind::Data, cells.clone())),
    );
    rows
}

/// Column widths in characters: the hint when present, otherwise
/// `max(header length, 15)`.
pub fn column_widths(table: &FormattedTable) -> Vec<f64> {
    table
        .headers
        .iter()
        .zip(&table.widths)
        .map(|(header, hint)| match hint {
            Some(w) => f64::from(*w),
            None => header.chars().count().max(DEFAULT_SPREADSHEET_COLUMN_WIDTH) as f64,
        })
        .collect()
}

/// Serializes a heading and formatted table into XLSX bytes.
pub(crate) fn encode_table(
    heading: &ReportHeading,
    table: &FormattedTable,
) -> Result<Vec<u8>, ExportError> {
    build_workbook(heading, table).map_err(|e| ExportError::RenderFailed {
        format: ExportFormat::Spreadsheet,
        reason: e.to_string(),
    })
}

/// Generates the artifact for an export started at `started_at`.
pub(crate) fn encode_for(
    options: &ExportOptions,
    started_at: DateTime<Local>,
    table: &FormattedTable,
) -> Result<Vec<u8>, ExportError> {
    encode_table(&ReportHeading::new(options, started_at), table)
}

fn build_workbook(heading: &ReportHeading, table: &FormattedTable) -> Result<Vec<u8>, XlsxError> {
    let title_format = Format::new().set_bold().set_font_size(14);
    let meta_format = Format::new().set_italic();
    let header_format = Format::new()
        .set_bold()
        .set_background_color("#D9D9D9")
        .set_border_bottom(FormatBorder::Thin);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SPREADSHEET_SHEET_NAME)?;

    for (col, width) in column_widths(table).into_iter().enumerate() {
        worksheet.set_column_width(column_index(col)?, width)?;
    }

    for (row_idx, row) in sheet_rows(heading, table).iter().enumerate() {
        let row_num = u32::try_from(row_idx).map_err(|_| XlsxError::RowColumnLimitError)?;
        let format = match row.kind {
            SheetRowKind::Title => Some(&title_format),
            SheetRowKind::Meta => Some(&meta_format),
            SheetRowKind::Header => Some(&header_format),
            SheetRowKind::Blank | SheetRowKind::Data => None,
        };
        for (col, text) in row.cells.iter().enumerate() {
            let col_num = column_index(col)?;
            let text = fit_cell(text, row_num, col_num);
            match format {
                Some(f) => worksheet.write_string_with_format(row_num, col_num, text, f)?,
                None => worksheet.write_string(row_num, col_num, text)?,
            };
        }
    }

    workbook.save_to_buffer()
}

/// Cuts cell text to the longest string Excel accepts.
fn fit_cell(text: &str, row: u32, col: u16) -> &str {
    match text.char_indices().nth(SPREADSHEET_MAX_CELL_CHARS) {
        Some((end, _)) => {
            warn!(
                "Cell at row {} column {} has {} characters, cut to {}",
                row + 1,
                col + 1,
                text.chars().count(),
                SPREADSHEET_MAX_CELL_CHARS
            );
            &text[..end]
        }
        None => text,
    }
}

fn column_index(col: usize) -> Result<u16, XlsxError> {
    u16::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)
}
