//! The statement pipeline
//!
//! [`Statement`] orchestrates predicate filtering, ordering, and
//! offset/limit slicing over a record sequence, in that fixed order. The
//! output is a [`ResultSet`]: a materialized, countable, re-iterable view
//! of `(offset, record)` rows. Without an ordering the pipeline stays lazy
//! up to the slice and stops pulling from the input once `offset + length`
//! matching rows have been seen.

use std::sync::Arc;

use tabulon_core::Record;

use crate::error::{QueryError, QueryResult};
use crate::predicate::RecordPredicate;
use crate::sort::{sort_rows, MultiSort, RecordSorter};

/// An immutable filter/sort/slice query
///
/// Every builder method returns a new statement, so partial queries can be
/// shared and extended independently.
#[derive(Clone, Default)]
pub struct Statement {
    predicates: Vec<Arc<dyn RecordPredicate>>,
    order: MultiSort,
    offset: usize,
    limit: Option<usize>,
}

impl Statement {
    /// A statement that returns its input unchanged
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filtering predicate (multiple predicates are ANDed)
    pub fn where_by<P: RecordPredicate + 'static>(mut self, predicate: P) -> Self {
        self.predicates.push(Arc::new(predicate));
        self
    }

    /// Add an ordering, applied after any previously added ones
    pub fn order_by<S: RecordSorter + 'static>(mut self, sorter: S) -> Self {
        self.order = self.order.append(sorter);
        self
    }

    /// Skip the first `offset` rows of the filtered, ordered sequence
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Bound the number of returned rows; `-1` means unbounded
    ///
    /// # Errors
    ///
    /// [`QueryError::InvalidLength`] for any value below `-1`.
    pub fn limit(mut self, limit: i64) -> QueryResult<Self> {
        if limit < -1 {
            return Err(QueryError::InvalidLength(limit));
        }
        self.limit = (limit >= 0).then_some(limit as usize);
        Ok(self)
    }

    /// Run the pipeline: filter, then sort, then slice
    ///
    /// Offsets are assigned by enumeration order of the input sequence and
    /// survive filtering and sorting, so callers can trace every result row
    /// back to its source position.
    pub fn process<I>(&self, records: I) -> QueryResult<ResultSet>
    where
        I: IntoIterator<Item = Record>,
    {
        if self.limit == Some(0) {
            return Ok(ResultSet::default());
        }

        if self.order.is_empty() {
            return self.process_unsorted(records);
        }

        let mut rows = Vec::new();
        for (offset, record) in records.into_iter().enumerate() {
            if self.passes(&record, offset)? {
                rows.push((offset, record));
            }
        }
        sort_rows(&mut rows, &self.order)?;
        self.slice(&mut rows);
        Ok(ResultSet { rows })
    }

    /// The lazy path: no sort, so the input is only consumed up to
    /// `offset + limit` matching rows
    fn process_unsorted<I>(&self, records: I) -> QueryResult<ResultSet>
    where
        I: IntoIterator<Item = Record>,
    {
        let wanted = self.limit.map(|limit| self.offset + limit);
        let mut rows = Vec::new();
        for (offset, record) in records.into_iter().enumerate() {
            if self.passes(&record, offset)? {
                rows.push((offset, record));
                if Some(rows.len()) == wanted {
                    break;
                }
            }
        }
        self.slice(&mut rows);
        Ok(ResultSet { rows })
    }

    fn passes(&self, record: &Record, offset: usize) -> QueryResult<bool> {
        for predicate in &self.predicates {
            if !predicate.test(record, offset)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn slice(&self, rows: &mut Vec<(usize, Record)>) {
        if self.offset > 0 {
            rows.drain(..self.offset.min(rows.len()));
        }
        if let Some(limit) = self.limit {
            rows.truncate(limit);
        }
    }
}

/// The materialized output of a statement: countable and re-iterable
/// without re-running the filter or sort
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    rows: Vec<(usize, Record)>,
}

impl ResultSet {
    /// Number of result rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the result holds no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over the records
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.rows.iter().map(|(_, record)| record)
    }

    /// Iterate over `(source offset, record)` pairs
    pub fn entries(&self) -> impl Iterator<Item = (usize, &Record)> {
        self.rows.iter().map(|(offset, record)| (*offset, record))
    }

    /// The first record, if any
    pub fn first(&self) -> Option<&Record> {
        self.rows.first().map(|(_, record)| record)
    }

    /// Consume the result, returning the records in result order
    pub fn into_records(self) -> Vec<Record> {
        self.rows.into_iter().map(|(_, record)| record).collect()
    }
}

impl IntoIterator for ResultSet {
    type Item = (usize, Record);
    type IntoIter = std::vec::IntoIter<(usize, Record)>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = (usize, &'a Record);
    type IntoIter = Box<dyn Iterator<Item = (usize, &'a Record)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.entries())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::Comparison;
    use crate::predicate::ColumnPredicate;
    use crate::sort::SortBy;
    use crate::value::Operand;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn records() -> Vec<Record> {
        [
            ("DE", "3"),
            ("AT", "2"),
            ("DE", "1"),
            ("AT", "9"),
            ("CH", "5"),
        ]
        .into_iter()
        .map(|(country, id)| Record::from_iter([country, id]))
        .collect()
    }

    #[test]
    fn test_identity_pipeline() {
        let result = Statement::new().process(records()).unwrap();
        assert_eq!(result.len(), 5);
        assert_eq!(result.into_records(), records());
    }

    #[test]
    fn test_zero_length_is_always_empty() {
        let statement = Statement::new()
            .where_by(
                ColumnPredicate::new(0, Comparison::Equals, Operand::value("DE")).unwrap(),
            )
            .order_by(SortBy::ascending(1))
            .limit(0)
            .unwrap();
        assert!(statement.process(records()).unwrap().is_empty());
    }

    #[test]
    fn test_negative_length_below_minus_one_rejected() {
        assert!(matches!(
            Statement::new().limit(-2),
            Err(QueryError::InvalidLength(-2))
        ));
        assert!(Statement::new().limit(-1).is_ok());
    }

    #[test]
    fn test_filter_then_sort_then_slice() {
        let statement = Statement::new()
            .where_by(
                ColumnPredicate::new(0, Comparison::NotEquals, Operand::value("CH")).unwrap(),
            )
            .order_by(SortBy::ascending(1))
            .offset(1)
            .limit(2)
            .unwrap();
        let result = statement.process(records()).unwrap();
        // filtered ids 3,2,1,9 -> sorted 1,2,3,9 -> sliced 2,3
        let ids: Vec<_> = result
            .iter()
            .map(|r| r.get(1).unwrap().clone().unwrap())
            .collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn test_offsets_survive_filter_and_sort() {
        let statement = Statement::new()
            .where_by(
                ColumnPredicate::new(0, Comparison::Equals, Operand::value("AT")).unwrap(),
            )
            .order_by(SortBy::descending(1));
        let result = statement.process(records()).unwrap();
        let offsets: Vec<_> = result.entries().map(|(offset, _)| offset).collect();
        assert_eq!(offsets, vec![3, 1]);
    }

    #[test]
    fn test_result_set_is_re_iterable() {
        let result = Statement::new().process(records()).unwrap();
        let first_pass = result.iter().count();
        let second_pass = result.iter().count();
        assert_eq!(first_pass, second_pass);
    }

    #[test]
    fn test_unsorted_slice_stops_pulling_early() {
        let pulled = AtomicUsize::new(0);
        let input = records().into_iter().inspect(|_| {
            pulled.fetch_add(1, Ordering::SeqCst);
        });
        let statement = Statement::new().offset(1).limit(2).unwrap();
        let result = statement.process(input).unwrap();
        assert_eq!(result.len(), 2);
        // offset + length = 3 records read, the other two never pulled
        assert_eq!(pulled.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_offset_past_end_is_empty() {
        let statement = Statement::new().offset(99);
        assert!(statement.process(records()).unwrap().is_empty());
    }
}
