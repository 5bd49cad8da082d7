//! Data models
//!
//! Payloads are produced by the web layer and queued as print jobs;
//! profiles are persisted configuration. The compiler consumes both
//! read-only and never mutates them.

pub mod document;
pub mod printer_profile;

// Re-exports
pub use document::*;
pub use printer_profile::*;
