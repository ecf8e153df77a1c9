//! Report heading shared by the document and spreadsheet renderers.
//!
//! The heading is the title block above the table: title, subtitle, generation
//! time and the applied filters. Filters whose value is absent or equals the
//! `"all"` sentinel are suppressed.

use std::collections::BTreeMap;

use chrono::{DateTime, Local};

use crate::config::{FILTER_SENTINEL_ALL, HEADING_TIMESTAMP_FORMAT};

use super::types::ExportOptions;

/// Label printed above the filter lines.
pub const FILTERS_LABEL: &str = "Applied filters:";

/// Title block content, resolved from the export options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportHeading {
    /// Report title
    pub title: String,
    /// Subtitle, if any
    pub subtitle: Option<String>,
    /// "Generated: ..." line, when timestamps are enabled
    pub generated: Option<String>,
    /// `"name: value"` lines for the visible filters, when filters are enabled
    pub filters: Vec<String>,
}

impl ReportHeading {
    /// Builds the heading for an export started at `started_at`.
    pub fn new(options: &ExportOptions, started_at: DateTime<Local>) -> Self {
        let generated = options.include_timestamp.then(|| {
            format!(
                "Generated: {}",
                started_at.format(HEADING_TIMESTAMP_FORMAT)
            )
        });
        let filters = if options.include_filters {
            visible_filters(&options.filters)
                .map(|(name, value)| format!("{}: {}", name, value))
                .collect()
        } else {
            Vec::new()
        };
        Self {
            title: options.title.clone(),
            subtitle: options
                .subtitle
                .as_ref()
                .filter(|s| !s.trim().is_empty())
                .cloned(),
            generated,
            filters,
        }
    }
}

/// Iterates over the filters that should be shown, in name order.
pub fn visible_filters(
    filters: &BTreeMap<String, Option<String>>,
) -> impl Iterator<Item = (&str, &str)> {
    filters.iter().filter_map(|(name, value)| match value.as_deref() {
        Some(v) if !is_suppressed(v) => Some((name.as_str(), v)),
        _ => None,
    })
}

fn is_suppressed(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value == FILTER_SENTINEL_ALL
}
