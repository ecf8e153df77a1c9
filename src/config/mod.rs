//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (chunk sizes, placeholders, page metrics)
//! - Library settings for the export orchestrator
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, ExportSettings, LogFormat, LogLevel};
