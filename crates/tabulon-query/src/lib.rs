//! # tabulon-query
//!
//! The declarative query layer of tabulon: comparison operators, record
//! predicates and their combinators, multi-key ordering, the
//! filter/sort/slice statement pipeline, and the fragment range-selection
//! mini-language.
//!
//! ## Example
//!
//! ```rust
//! use tabulon_core::Record;
//! use tabulon_query::{ColumnPredicate, Comparison, Operand, SortBy, Statement};
//!
//! let records = vec![
//!     Record::from_iter(["b", "2"]),
//!     Record::from_iter(["a", "1"]),
//!     Record::from_iter(["a", "3"]),
//! ];
//!
//! let statement = Statement::new()
//!     .where_by(ColumnPredicate::new(0, Comparison::Equals, Operand::value("a")).unwrap())
//!     .order_by(SortBy::descending(1))
//!     .limit(1)
//!     .unwrap();
//!
//! let result = statement.process(records).unwrap();
//! assert_eq!(result.len(), 1);
//! ```

pub mod comparison;
pub mod criteria;
pub mod error;
pub mod fragment;
pub mod predicate;
pub mod sort;
pub mod statement;
pub mod value;

// Re-exports for convenience
pub use comparison::Comparison;
pub use criteria::Criteria;
pub use error::{QueryError, QueryResult};
pub use fragment::{Axis, Fragment, Selection, Span, SpanEnd};
pub use predicate::{ColumnPairPredicate, ColumnPredicate, OffsetPredicate, RecordPredicate};
pub use sort::{sort_rows, Direction, MultiSort, RecordSorter, SortBy};
pub use statement::{ResultSet, Statement};
pub use value::{natural_field_order, Datum, Operand};
