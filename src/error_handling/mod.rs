//! Error handling.
//!
//! This module provides:
//! - The call-level error type returned by every export operation
//! - The cell-level error type absorbed by the formatting pipeline
//! - Document layout errors used by the document renderer's fallback logic
//! - Initialization errors for logger setup

mod types;

// Re-export public API
pub use types::{ExportError, ExportErrorKind, FormatError, InitializationError, LayoutError};
