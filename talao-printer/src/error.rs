//! Error types for document compilation

use thiserror::Error;

/// Compile error types
///
/// Only the fiscal-pages path can fail; every other operation clamps bad
/// values or drops broken decorations instead of erroring.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Fiscal document build was invoked without any pages
    #[error("no fiscal pages were provided")]
    MissingPages,

    /// None of the supplied pages produced raster data
    #[error("unable to convert fiscal pages to printable raster")]
    UnprintablePages,
}

/// Result type for compile operations
pub type CompileResult<T> = Result<T, CompileError>;
