//! Structured logging for textlens.
//!
//! Console output, optional rolling NDJSON file output, and scrubbing of
//! credentials before they reach a log line.

pub mod logger;
pub mod redact;

pub use logger::init_logger;
pub use redact::redact_sensitive_data;
