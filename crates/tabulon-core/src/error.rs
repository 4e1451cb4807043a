//! Error types for tabulon-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tabulon-core
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    /// Column could not be resolved against a record
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Integer keys are rejected for record-like values without a
    /// positional view
    #[error("Integer key {0} is not supported: value has no positional fields")]
    IntegerKeyUnsupported(isize),
}
