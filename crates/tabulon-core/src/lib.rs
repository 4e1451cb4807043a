//! # tabulon-core
//!
//! Core data model for the tabulon tabular-data engine.
//!
//! This crate provides the fundamental types shared by the tokenizer and the
//! query layer:
//! - [`Field`] and [`Record`] - the unit of tabular data (nullable string
//!   fields in source order)
//! - [`ColumnKey`] and [`FieldAccess`] - column resolution by name or
//!   position over record-like values
//!
//! ## Example
//!
//! ```rust
//! use tabulon_core::{ColumnKey, Record, resolve_column};
//!
//! let record = Record::from_iter(["alice", "DE", "42"]);
//!
//! // Positional lookup, negative indices count from the end
//! let last = resolve_column(&record, &ColumnKey::Index(-1)).unwrap();
//! assert_eq!(last.as_deref(), Some("42"));
//! ```

pub mod access;
pub mod error;
pub mod record;

// Re-exports for convenience
pub use access::{resolve_column, ColumnKey, FieldAccess};
pub use error::{Error, Result};
pub use record::{Field, Record};
