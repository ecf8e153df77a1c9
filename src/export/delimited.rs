//! Delimited-text (CSV) renderer.
//!
//! Output is data only: a header row followed by one line per row. Every field
//! is quoted and embedded quotes are doubled. Lines are joined with `\n` and the
//! text has no trailing newline.

use csv::{QuoteStyle, WriterBuilder};

use crate::error_handling::ExportError;

use super::columns::{validate_input, ColumnDefinition};
use super::pipeline::FormattedTable;
use super::types::{ExportFormat, Row};

/// Renders rows as quoted CSV text.
///
/// # Errors
///
/// Returns `InvalidInput` for an empty dataset or schema, and `RenderFailed` if
/// the CSV encoder fails.
pub fn render_delimited(rows: &[Row], columns: &[ColumnDefinition]) -> Result<String, ExportError> {
    let columns = validate_input(rows, columns)?;
    encode_table(&FormattedTable::from_rows(&columns, rows))
}

/// Encodes an already formatted table.
pub(crate) fn encode_table(table: &FormattedTable) -> Result<String, ExportError> {
    encode(table).map_err(|e| ExportError::RenderFailed {
        format: ExportFormat::Delimited,
        reason: e.to_string(),
    })
}

fn encode(table: &FormattedTable) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    let mut text = String::from_utf8(bytes)?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}
