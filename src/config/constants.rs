//! Configuration constants.
//!
//! This module defines all configuration constants used throughout the export engine,
//! including chunking parameters, placeholder strings, and page metrics.

use std::time::Duration;

// Chunked export
/// Number of rows processed per chunk in chunked mode
pub const CHUNK_SIZE: usize = 1000;
/// Row count above which the orchestrator switches to chunked mode
/// Datasets with exactly this many rows still take the direct path
pub const CHUNK_THRESHOLD: usize = 1000;
/// Pause inserted between chunks so other tasks on the runtime get a turn
pub const CHUNK_YIELD_DELAY: Duration = Duration::from_millis(10);

// Cell placeholders
/// Cell text used when a column formatter fails
pub const ERROR_PLACEHOLDER: &str = "Error";
/// Cell text used when a row has no value (missing key or null) and no formatter
pub const EMPTY_PLACEHOLDER: &str = "N/A";

// Filters
/// Filter value meaning "no filter applied"; such filters are never rendered
pub const FILTER_SENTINEL_ALL: &str = "all";

// Delimited text
/// Separator used by the plain-text document strategy to join cells
pub const PLAIN_TEXT_SEPARATOR: &str = " | ";

// Spreadsheet
/// Minimum column width in characters when a column carries no width hint
pub const DEFAULT_SPREADSHEET_COLUMN_WIDTH: usize = 15;
/// Worksheet name used for the single exported sheet
pub const SPREADSHEET_SHEET_NAME: &str = "Report";
/// Longest text Excel accepts in one cell, in characters
/// Longer cell text is cut to this length
pub const SPREADSHEET_MAX_CELL_CHARS: usize = 32_767;

// Artifact naming
/// chrono pattern for the timestamp suffix appended to artifact file names
pub const FILENAME_TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M";
/// chrono pattern for the "Generated" line in the report heading
pub const HEADING_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// Page metrics (PDF points, 72 per inch)
/// A4 page width in points
pub const A4_WIDTH_PT: f32 = 595.28;
/// A4 page height in points
pub const A4_HEIGHT_PT: f32 = 841.89;
/// Page margin on every side in points (~14mm)
pub const PAGE_MARGIN_PT: f32 = 40.0;
/// Title font size in points
pub const TITLE_FONT_SIZE: f32 = 16.0;
/// Subtitle and metadata font size in points
pub const META_FONT_SIZE: f32 = 10.0;
/// Table body font size in points
pub const BODY_FONT_SIZE: f32 = 8.0;
/// Vertical advance per body line, as a multiple of the font size
pub const LINE_HEIGHT_FACTOR: f32 = 1.6;
/// Horizontal padding inside a structured table cell in points
pub const CELL_PADDING_PT: f32 = 3.0;
/// Narrowest column the structured table layout will produce in points
/// Tables that cannot give every column at least this much fall back to plain text
pub const MIN_COLUMN_WIDTH_PT: f32 = 28.0;
