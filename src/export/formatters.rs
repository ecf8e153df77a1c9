//! Built-in cell formatters.
//!
//! Each constructor returns a [`CellFormatter`] that can be attached to a
//! [`ColumnDefinition`](super::ColumnDefinition). Null values are rendered as
//! `"N/A"` by every built-in; values of an unsupported type produce a
//! [`FormatError`], which the pipeline turns into the `"Error"` placeholder.

use std::fmt::Write;
use std::sync::{Arc, OnceLock};

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::warn;
use regex::Regex;
use serde_json::Value;

use crate::config::EMPTY_PLACEHOLDER;
use crate::error_handling::FormatError;

use super::columns::CellFormatter;
use super::pipeline::{stringify, value_kind};

/// Wraps a closure as a formatter.
pub fn custom<F>(f: F) -> CellFormatter
where
    F: Fn(&Value) -> Result<String, FormatError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Money amounts: `1234.5` with `("$", 2)` becomes `$1,234.50`.
///
/// Accepts numbers and numeric strings.
pub fn currency(symbol: impl Into<String>, decimals: usize) -> CellFormatter {
    let symbol = symbol.into();
    Arc::new(move |value| {
        if value.is_null() {
            return Ok(EMPTY_PLACEHOLDER.to_string());
        }
        let amount = numeric(value)?;
        let sign = if amount < 0.0 { "-" } else { "" };
        let fixed = format!("{:.*}", decimals, amount.abs());
        let (whole, fraction) = match fixed.split_once('.') {
            Some((w, f)) => (w, Some(f)),
            None => (fixed.as_str(), None),
        };
        let mut out = format!("{}{}{}", sign, symbol, group_thousands(whole));
        if let Some(fraction) = fraction {
            out.push('.');
            out.push_str(fraction);
        }
        Ok(out)
    })
}

/// Percentages: `12.345` with `1` decimal becomes `12.3%`.
///
/// The value is taken to already be a percentage, not a ratio.
pub fn percentage(decimals: usize) -> CellFormatter {
    Arc::new(move |value| {
        if value.is_null() {
            return Ok(EMPTY_PLACEHOLDER.to_string());
        }
        Ok(format!("{:.*}%", decimals, numeric(value)?))
    })
}

/// Checks that `pattern` is a chrono format string.
///
/// # Errors
///
/// Returns `FormatError::InvalidPattern` naming the pattern.
pub fn check_date_pattern(pattern: &str) -> Result<(), FormatError> {
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(invalid_pattern(pattern));
    }
    Ok(())
}

fn invalid_pattern(pattern: &str) -> FormatError {
    FormatError::InvalidPattern(format!("'{}' is not a usable date pattern", pattern))
}

/// Dates: RFC 3339 strings, `YYYY-MM-DD` strings, `YYYY-MM-DDTHH:MM:SS` strings
/// or epoch milliseconds, rendered with a chrono `pattern`.
///
/// The pattern is checked once here. With a bad pattern every non-null cell
/// fails with `FormatError::InvalidPattern`.
pub fn date(pattern: impl Into<String>) -> CellFormatter {
    let pattern = pattern.into();
    let pattern_error = check_date_pattern(&pattern).err();
    if let Some(err) = &pattern_error {
        warn!("Date formatter built with {}", err);
    }
    Arc::new(move |value| {
        if value.is_null() {
            return Ok(EMPTY_PLACEHOLDER.to_string());
        }
        if let Some(err) = &pattern_error {
            return Err(err.clone());
        }
        let instant = match value {
            Value::Number(n) => {
                let millis = n.as_i64().ok_or_else(|| {
                    FormatError::InvalidValue(format!("{} is not whole milliseconds", n))
                })?;
                DateTime::<Utc>::from_timestamp_millis(millis)
                    .ok_or_else(|| FormatError::InvalidValue(format!("{} is out of range", n)))?
                    .naive_utc()
            }
            Value::String(s) => parse_date_string(s)?,
            other => {
                return Err(FormatError::UnexpectedType {
                    expected: "date string or epoch milliseconds",
                    found: value_kind(other),
                })
            }
        };
        // specifiers such as %z need an offset a naive time does not have
        let mut out = String::new();
        write!(out, "{}", instant.format(&pattern)).map_err(|_| invalid_pattern(&pattern))?;
        Ok(out)
    })
}

/// Booleans rendered with custom labels, e.g. `Yes`/`No`.
pub fn boolean(true_label: impl Into<String>, false_label: impl Into<String>) -> CellFormatter {
    let true_label = true_label.into();
    let false_label = false_label.into();
    Arc::new(move |value| match value {
        Value::Null => Ok(EMPTY_PLACEHOLDER.to_string()),
        Value::Bool(true) => Ok(true_label.clone()),
        Value::Bool(false) => Ok(false_label.clone()),
        other => Err(FormatError::UnexpectedType {
            expected: "boolean",
            found: value_kind(other),
        }),
    })
}

/// Arrays joined with `separator`. Scalars are stringified as-is.
pub fn list(separator: impl Into<String>) -> CellFormatter {
    let separator = separator.into();
    Arc::new(move |value| match value {
        Value::Array(items) if items.is_empty() => Ok(EMPTY_PLACEHOLDER.to_string()),
        Value::Array(items) => Ok(items
            .iter()
            .map(stringify)
            .collect::<Vec<_>>()
            .join(&separator)),
        other => Ok(stringify(other)),
    })
}

/// Status codes in snake, kebab or upper case rendered in Title Case:
/// `in_progress` becomes `In Progress`.
pub fn status() -> CellFormatter {
    Arc::new(|value| match value {
        Value::Null => Ok(EMPTY_PLACEHOLDER.to_string()),
        Value::String(s) => Ok(title_case(s)),
        other => Err(FormatError::UnexpectedType {
            expected: "string",
            found: value_kind(other),
        }),
    })
}

fn word_separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"[_\-\s]+").expect("separator pattern is valid"))
}

fn title_case(s: &str) -> String {
    word_separator()
        .split(s.trim())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn numeric(value: &Value) -> Result<f64, FormatError> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| FormatError::InvalidValue(n.to_string())),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| FormatError::InvalidValue(format!("'{}' is not a number", s))),
        other => Err(FormatError::UnexpectedType {
            expected: "number",
            found: value_kind(other),
        }),
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn parse_date_string(s: &str) -> Result<NaiveDateTime, FormatError> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d.and_hms_opt(0, 0, 0).unwrap_or_default());
    }
    Err(FormatError::InvalidValue(format!("'{}' is not a date", s)))
}
