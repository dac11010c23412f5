//! Utility modules.

/// Log sanitization utilities to keep HTML pages and secrets out of logs.
pub mod log_sanitizer;
