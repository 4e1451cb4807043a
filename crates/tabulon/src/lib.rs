//! # tabulon
//!
//! A delimited-text tabular-data engine.
//!
//! Tabulon turns a raw delimited-text byte stream into structured records
//! and lets callers filter, order and slice those records before
//! materializing them:
//!
//! - a record tokenizer with exact historical CSV semantics (quoting,
//!   multi-line fields, permissive malformed input), no host CSV primitive
//! - a declarative query layer: comparison operators, predicates and
//!   combinators, multi-key ordering, and a filter/sort/slice pipeline
//! - a fragment mini-language (`row=`, `col=`, `cell=`) carving sub-tables
//!   out of tabular data
//!
//! ## Example
//!
//! ```rust
//! use tabulon::prelude::*;
//!
//! let document = "name,country\nalice,DE\nbob,AT\ncarol,DE\n";
//! let options = ReadOptions {
//!     has_header: true,
//!     ..ReadOptions::default()
//! };
//! let records = Reader::from_string(document, options)
//!     .collect::<CsvResult<Vec<_>>>()
//!     .unwrap();
//!
//! let statement = Statement::new()
//!     .where_by(ColumnPredicate::new("country", Comparison::Equals, Operand::value("DE")).unwrap())
//!     .order_by(SortBy::ascending("name"));
//! let result = statement.process(records).unwrap();
//! assert_eq!(result.len(), 2);
//! ```

pub mod prelude;

// Re-export core types
pub use tabulon_core::{resolve_column, ColumnKey, Field, FieldAccess, Record};

// Re-export the tokenizer layer
pub use tabulon_csv::{
    BlankLinePolicy, ControlSet, CsvError, CsvResult, LineSource, LineTerminator, Lines,
    ReadOptions, Reader, SeekableLines, Tokenizer, WriteOptions, Writer,
};

// Re-export the query layer
pub use tabulon_query::{
    natural_field_order, Axis, ColumnPairPredicate, ColumnPredicate, Comparison, Criteria, Datum,
    Direction, Fragment, MultiSort, OffsetPredicate, Operand, QueryError, QueryResult,
    RecordPredicate, RecordSorter, ResultSet, Selection, SortBy, Span, SpanEnd, Statement,
};
