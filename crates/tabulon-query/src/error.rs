//! Error types for tabulon-query

use thiserror::Error;

/// Result type for query operations
pub type QueryResult<T> = std::result::Result<T, QueryError>;

/// Errors that can occur while building or evaluating queries
#[derive(Debug, Error)]
pub enum QueryError {
    /// Operator name does not belong to the comparison set
    #[error("Unknown comparison operator: {0}")]
    UnknownOperator(String),

    /// Reference value has the wrong shape for the operator
    #[error("Operator {operator} does not accept a {shape} reference value")]
    InvalidReference {
        /// Canonical operator token
        operator: &'static str,
        /// Shape of the rejected reference
        shape: &'static str,
    },

    /// Needle value has the wrong shape for the operator
    #[error("Operator {operator} requires a {expected} needle, got {actual}")]
    InvalidNeedle {
        /// Canonical operator token
        operator: &'static str,
        /// Shape the operator requires
        expected: &'static str,
        /// Shape that was evaluated
        actual: &'static str,
    },

    /// Regular expression pattern failed to compile
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Column resolution failure, surfaced from the core layer
    #[error(transparent)]
    Column(#[from] tabulon_core::Error),

    /// Operands cannot be ordered against each other
    #[error("Cannot order {left} against {right}")]
    Incomparable {
        /// Kind of the left operand
        left: &'static str,
        /// Kind of the right operand
        right: &'static str,
    },

    /// Statement length outside the `>= -1` contract
    #[error("Length must be >= -1, got {0}")]
    InvalidLength(i64),

    /// Fragment expression rejected, quoting the offending selection
    #[error("Fragment not found: {0}")]
    FragmentNotFound(String),
}
