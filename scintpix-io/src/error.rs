//! I/O error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for I/O operations.
pub type Result<T> = std::result::Result<T, Error>;

/// I/O error types.
#[derive(Error, Debug)]
pub enum Error {
    /// The input file could not be opened.
    #[error("cannot access {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading from an open file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line could not be decoded into a record (1-based line number).
    #[error("line {line}: {source}")]
    Record {
        line: usize,
        #[source]
        source: scintpix_core::Error,
    },

    /// JSON decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Training history does not satisfy the shape contract.
    #[error("invalid training history: {0}")]
    InvalidHistory(String),

    /// Core library error.
    #[error("core error: {0}")]
    Core(#[from] scintpix_core::Error),
}
