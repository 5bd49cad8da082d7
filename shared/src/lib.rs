//! Shared types for the Talao printing tools
//!
//! Data shapes exchanged between the POS web layer, the print job queue
//! and the ESC/POS document compiler.

pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};
