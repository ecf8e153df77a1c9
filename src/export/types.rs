//! Export types and options.

use std::collections::BTreeMap;

use clap::ValueEnum;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use strum_macros::EnumIter as EnumIterMacro;

use super::pipeline::stringify;

/// One row of the dataset: column key to raw value.
///
/// Rows are read-only to the engine.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Export format options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Deserialize, EnumIterMacro)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Paginated PDF document
    #[value(alias = "pdf")]
    #[serde(alias = "pdf")]
    Document,
    /// XLSX workbook with a single sheet
    #[value(alias = "xlsx")]
    #[serde(alias = "xlsx")]
    Spreadsheet,
    /// Comma-separated values (data only, no heading)
    #[value(alias = "csv")]
    #[serde(alias = "csv")]
    Delimited,
}

impl ExportFormat {
    /// File extension used for artifacts of this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Document => "pdf",
            ExportFormat::Spreadsheet => "xlsx",
            ExportFormat::Delimited => "csv",
        }
    }

    /// MIME type handed to the sink along with the bytes.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Document => "application/pdf",
            ExportFormat::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Delimited => "text/csv;charset=utf-8",
        }
    }

    /// Lowercase format name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Document => "document",
            ExportFormat::Spreadsheet => "spreadsheet",
            ExportFormat::Delimited => "delimited",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Page orientation for the document renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Tall pages (default)
    #[default]
    Portrait,
    /// Wide pages, useful for many columns
    Landscape,
}

/// Options for exporting data.
///
/// Immutable for the duration of one export call.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    /// Base file name; a timestamp suffix and extension are appended at save time
    pub filename: String,
    /// Report title
    pub title: String,
    /// Optional subtitle shown under the title
    pub subtitle: Option<String>,
    /// Page orientation (document only)
    pub orientation: Option<Orientation>,
    /// Add a "Generated" line with the export time
    pub include_timestamp: bool,
    /// Add the applied filters to the heading
    pub include_filters: bool,
    /// Filter name to applied value; `None` and `"all"` are suppressed
    ///
    /// Request files may give numbers, booleans or lists; they are stored as text.
    #[serde(deserialize_with = "deserialize_filters")]
    pub filters: BTreeMap<String, Option<String>>,
}

fn deserialize_filters<'de, D>(deserializer: D) -> Result<BTreeMap<String, Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(name, value)| (name, filter_text(&value)))
        .collect())
}

/// Text of an applied filter value. Null and empty lists mean no filter.
fn filter_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Array(items) if items.is_empty() => None,
        other => Some(stringify(other)),
    }
}

impl ExportOptions {
    /// Creates options with a file name and title and everything else off.
    pub fn new(filename: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    /// Orientation to use, defaulting to portrait.
    pub fn orientation(&self) -> Orientation {
        self.orientation.unwrap_or_default()
    }
}
