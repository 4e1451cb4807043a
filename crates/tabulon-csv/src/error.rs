//! CSV error types

use thiserror::Error;

/// Result type for CSV operations
pub type CsvResult<T> = std::result::Result<T, CsvError>;

/// Errors that can occur during CSV operations
#[derive(Debug, Error)]
pub enum CsvError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid control characters
    #[error("Invalid control set: {0}")]
    InvalidControls(String),

    /// Rewind requested on a non-seekable source
    #[error("Source does not support rewinding")]
    UnsupportedRewind,
}
