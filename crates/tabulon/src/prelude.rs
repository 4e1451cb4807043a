//! Prelude module - common imports for tabulon users
//!
//! ```rust
//! use tabulon::prelude::*;
//! ```

pub use crate::{
    // Data model
    ColumnKey,
    Field,
    FieldAccess,
    Record,

    // Tokenizer layer
    BlankLinePolicy,
    ControlSet,
    CsvError,
    CsvResult,
    LineSource,
    ReadOptions,
    Reader,
    Tokenizer,
    WriteOptions,
    Writer,

    // Query layer
    ColumnPairPredicate,
    ColumnPredicate,
    Comparison,
    Criteria,
    Datum,
    Direction,
    Fragment,
    MultiSort,
    OffsetPredicate,
    Operand,
    QueryError,
    QueryResult,
    RecordPredicate,
    RecordSorter,
    ResultSet,
    SortBy,
    Statement,
};
