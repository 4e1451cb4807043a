//! Record predicates
//!
//! Three predicate kinds, all pure `(record, offset) -> bool` tests:
//! column predicates resolve one column and compare it to a fixed reference,
//! offset predicates look only at the record's position in the source
//! sequence, and column-pair predicates compare columns of the same record
//! against each other. Comparison-backed predicates validate the reference
//! shape (and compile REGEXP patterns) at construction, so malformed queries
//! fail before evaluation.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use tabulon_core::{resolve_column, ColumnKey, Record};

use crate::comparison::Comparison;
use crate::error::{QueryError, QueryResult};
use crate::value::{Datum, Operand};

/// A pure boolean test over a record and its source offset
///
/// Implementations must be safely re-invocable with no side effects.
pub trait RecordPredicate: Send + Sync {
    /// Test one record at its zero-based source offset
    fn test(&self, record: &Record, offset: usize) -> QueryResult<bool>;
}

/// How a predicate evaluates its resolved needle
enum Test {
    Comparison {
        comparison: Comparison,
        reference: Operand,
        /// Pre-compiled pattern for the REGEXP family
        pattern: Option<Regex>,
    },
    Callback(Arc<dyn Fn(&Datum) -> bool + Send + Sync>),
}

impl Test {
    fn comparison(comparison: Comparison, reference: Operand) -> QueryResult<Self> {
        if !comparison.accept(&reference) {
            return Err(QueryError::InvalidReference {
                operator: comparison.operator(),
                shape: reference.shape(),
            });
        }
        let pattern = match &reference {
            Operand::Pattern(pattern) => Some(Regex::new(pattern)?),
            _ => None,
        };
        Ok(Test::Comparison {
            comparison,
            reference,
            pattern,
        })
    }

    fn run(&self, needle: &Datum) -> QueryResult<bool> {
        match self {
            Test::Comparison {
                comparison,
                reference,
                pattern,
            } => match (comparison, pattern) {
                (Comparison::Regexp, Some(regex)) => Ok(regex.is_match(text(comparison, needle)?)),
                (Comparison::NotRegexp, Some(regex)) => {
                    Ok(!regex.is_match(text(comparison, needle)?))
                }
                _ => comparison.compare(needle, reference),
            },
            Test::Callback(callback) => Ok(callback(needle)),
        }
    }
}

fn text<'a>(comparison: &Comparison, needle: &'a Datum) -> QueryResult<&'a str> {
    needle.as_text().ok_or(QueryError::InvalidNeedle {
        operator: comparison.operator(),
        expected: "string",
        actual: needle.kind(),
    })
}

/// Compares one resolved column against a fixed reference value
pub struct ColumnPredicate {
    column: ColumnKey,
    test: Test,
}

impl ColumnPredicate {
    /// Build a comparison-backed column predicate (fails fast on an illegal
    /// reference shape or pattern)
    pub fn new<K: Into<ColumnKey>>(
        column: K,
        comparison: Comparison,
        reference: Operand,
    ) -> QueryResult<Self> {
        Ok(Self {
            column: column.into(),
            test: Test::comparison(comparison, reference)?,
        })
    }

    /// Build a callback-backed column predicate
    pub fn with_callback<K, F>(column: K, callback: F) -> Self
    where
        K: Into<ColumnKey>,
        F: Fn(&Datum) -> bool + Send + Sync + 'static,
    {
        Self {
            column: column.into(),
            test: Test::Callback(Arc::new(callback)),
        }
    }
}

impl fmt::Debug for ColumnPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnPredicate")
            .field("column", &self.column)
            .finish_non_exhaustive()
    }
}

impl RecordPredicate for ColumnPredicate {
    fn test(&self, record: &Record, _offset: usize) -> QueryResult<bool> {
        let field = resolve_column(record, &self.column)?;
        self.test.run(&Datum::from(&field))
    }
}

/// Compares the record's source offset against a fixed reference value
pub struct OffsetPredicate {
    test: Test,
}

impl OffsetPredicate {
    /// Build a comparison-backed offset predicate
    pub fn new(comparison: Comparison, reference: Operand) -> QueryResult<Self> {
        Ok(Self {
            test: Test::comparison(comparison, reference)?,
        })
    }

    /// Build a callback-backed offset predicate
    pub fn with_callback<F>(callback: F) -> Self
    where
        F: Fn(&Datum) -> bool + Send + Sync + 'static,
    {
        Self {
            test: Test::Callback(Arc::new(callback)),
        }
    }
}

impl RecordPredicate for OffsetPredicate {
    fn test(&self, _record: &Record, offset: usize) -> QueryResult<bool> {
        self.test.run(&Datum::Int(offset as i64))
    }
}

/// Compares one column against another column, or against the values of a
/// list of other columns, on the same record
pub struct ColumnPairPredicate {
    left: ColumnKey,
    comparison: Comparison,
    right: PairRight,
}

enum PairRight {
    Column(ColumnKey),
    Columns(Vec<ColumnKey>),
}

impl ColumnPairPredicate {
    /// Compare `left` against `right` with the given operator
    pub fn new<L: Into<ColumnKey>, R: Into<ColumnKey>>(
        left: L,
        comparison: Comparison,
        right: R,
    ) -> Self {
        Self {
            left: left.into(),
            comparison,
            right: PairRight::Column(right.into()),
        }
    }

    /// Compare `left` against the resolved values of several columns
    /// (the reference becomes a membership list)
    pub fn against_columns<L, R, I>(left: L, comparison: Comparison, columns: I) -> Self
    where
        L: Into<ColumnKey>,
        R: Into<ColumnKey>,
        I: IntoIterator<Item = R>,
    {
        Self {
            left: left.into(),
            comparison,
            right: PairRight::Columns(columns.into_iter().map(Into::into).collect()),
        }
    }
}

impl RecordPredicate for ColumnPairPredicate {
    fn test(&self, record: &Record, _offset: usize) -> QueryResult<bool> {
        let needle = Datum::from(&resolve_column(record, &self.left)?);
        let reference = match &self.right {
            PairRight::Column(column) => {
                let value = Datum::from(&resolve_column(record, column)?);
                match (self.comparison, value) {
                    // the right column supplies the pattern for REGEXP
                    (Comparison::Regexp | Comparison::NotRegexp, Datum::Text(pattern)) => {
                        Operand::Pattern(pattern)
                    }
                    (_, value) => Operand::Value(value),
                }
            }
            PairRight::Columns(columns) => {
                let mut values = Vec::with_capacity(columns.len());
                for column in columns {
                    values.push(Datum::from(&resolve_column(record, column)?));
                }
                Operand::List(values)
            }
        };
        self.comparison.compare(&needle, &reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tabulon_core::Error as CoreError;

    fn record() -> Record {
        let header: Arc<[String]> =
            vec!["id".to_string(), "name".to_string(), "alias".to_string()].into();
        Record::from_iter(["7", "alice", "alice"]).with_header(header)
    }

    #[test]
    fn test_column_predicate_by_name() {
        let predicate =
            ColumnPredicate::new("name", Comparison::Equals, Operand::value("alice")).unwrap();
        assert!(predicate.test(&record(), 0).unwrap());
    }

    #[test]
    fn test_column_predicate_negative_index() {
        let predicate =
            ColumnPredicate::new(-1, Comparison::StartsWith, Operand::value("ali")).unwrap();
        assert!(predicate.test(&record(), 0).unwrap());
    }

    #[test]
    fn test_column_not_found_names_the_column() {
        let predicate =
            ColumnPredicate::new("missing", Comparison::Equals, Operand::value("x")).unwrap();
        let err = predicate.test(&record(), 0).unwrap_err();
        match err {
            QueryError::Column(CoreError::ColumnNotFound(name)) => assert_eq!(name, "missing"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_construction_rejects_bad_reference_eagerly() {
        let err =
            ColumnPredicate::new("id", Comparison::Between, Operand::value(3)).unwrap_err();
        assert!(matches!(
            err,
            QueryError::InvalidReference { operator: "between", shape: "integer" }
        ));
    }

    #[test]
    fn test_construction_rejects_bad_pattern_eagerly() {
        let err =
            ColumnPredicate::new("id", Comparison::Regexp, Operand::pattern("(")).unwrap_err();
        assert!(matches!(err, QueryError::InvalidPattern(_)));
    }

    #[test]
    fn test_offset_predicate() {
        let predicate = OffsetPredicate::new(Comparison::LesserThan, Operand::value(3)).unwrap();
        assert!(predicate.test(&record(), 2).unwrap());
        assert!(!predicate.test(&record(), 3).unwrap());
    }

    #[test]
    fn test_callback_predicates() {
        let predicate = ColumnPredicate::with_callback("id", |value| {
            value.as_text().is_some_and(|text| text.len() == 1)
        });
        assert!(predicate.test(&record(), 0).unwrap());

        let offsets = OffsetPredicate::with_callback(|value| matches!(value, Datum::Int(0)));
        assert!(offsets.test(&record(), 0).unwrap());
        assert!(!offsets.test(&record(), 1).unwrap());
    }

    #[test]
    fn test_column_pair() {
        let same = ColumnPairPredicate::new("name", Comparison::Equals, "alias");
        assert!(same.test(&record(), 0).unwrap());

        let differs = ColumnPairPredicate::new("id", Comparison::Equals, "name");
        assert!(!differs.test(&record(), 0).unwrap());
    }

    #[test]
    fn test_column_against_list_of_columns() {
        let member =
            ColumnPairPredicate::against_columns("name", Comparison::In, ["id", "alias"]);
        assert!(member.test(&record(), 0).unwrap());

        let absent = ColumnPairPredicate::against_columns("id", Comparison::In, ["name", "alias"]);
        assert!(!absent.test(&record(), 0).unwrap());
    }
}
