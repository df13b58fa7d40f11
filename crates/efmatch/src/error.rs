//! Error types for batch-fatal failures.
//!
//! Failures scoped to a single row are [`CatalogError`](crate::CatalogError)s
//! and end up in that row's `error` column instead.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for efmatch operations.
///
/// Every variant aborts the run before any output row is produced.
#[derive(Debug, Error)]
pub enum EfmatchError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The input has no header row.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// A data row failed structural validation during load.
    #[error("Invalid input at row {row}: {reason}")]
    Validation { row: usize, reason: String },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The catalog credential was not supplied.
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for efmatch operations.
pub type Result<T> = std::result::Result<T, EfmatchError>;
