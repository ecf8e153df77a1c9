//! Process initialization.
//!
//! The export engine itself holds no global state. The only process-wide
//! resource is the logger, which the CLI binary (or an embedding host) sets up
//! once before running exports.

mod logger;

// Re-export public API
pub use logger::init_logger_with;
