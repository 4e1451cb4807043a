//! Record ordering
//!
//! [`SortBy`] orders records by one resolved column; [`MultiSort`] chains
//! sorters with first-non-zero-wins tie-breaking. Sorting a sequence is the
//! one operation of the engine that materializes it; the statement pipeline
//! applies sorters through [`sort_rows`], a stable sort that keeps original
//! offsets alongside the records.

use std::cmp::Ordering;
use std::sync::Arc;

use tabulon_core::{resolve_column, ColumnKey, Field, Record};

use crate::error::{QueryError, QueryResult};
use crate::value::natural_field_order;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Smallest first
    Ascending,
    /// Largest first
    Descending,
}

/// A three-way comparator over two records
///
/// Consistent (same inputs, same output) but not required to be a strict
/// total order across unrelated keys; chain sorters to break ties.
pub trait RecordSorter: Send + Sync {
    /// Compare two records
    fn compare(&self, a: &Record, b: &Record) -> QueryResult<Ordering>;
}

type FieldComparator = Arc<dyn Fn(&Field, &Field) -> Ordering + Send + Sync>;

/// Orders records by one column
pub struct SortBy {
    column: ColumnKey,
    direction: Direction,
    comparator: Option<FieldComparator>,
}

impl SortBy {
    /// Sort by a column in the given direction with the natural field order
    pub fn new<K: Into<ColumnKey>>(column: K, direction: Direction) -> Self {
        Self {
            column: column.into(),
            direction,
            comparator: None,
        }
    }

    /// Ascending natural order on a column
    pub fn ascending<K: Into<ColumnKey>>(column: K) -> Self {
        Self::new(column, Direction::Ascending)
    }

    /// Descending natural order on a column
    pub fn descending<K: Into<ColumnKey>>(column: K) -> Self {
        Self::new(column, Direction::Descending)
    }

    /// Replace the natural order with a custom field comparator
    pub fn with_comparator<F>(mut self, comparator: F) -> Self
    where
        F: Fn(&Field, &Field) -> Ordering + Send + Sync + 'static,
    {
        self.comparator = Some(Arc::new(comparator));
        self
    }
}

impl RecordSorter for SortBy {
    fn compare(&self, a: &Record, b: &Record) -> QueryResult<Ordering> {
        let left = resolve_column(a, &self.column)?;
        let right = resolve_column(b, &self.column)?;
        let ordering = match &self.comparator {
            Some(comparator) => comparator(&left, &right),
            None => natural_field_order(&left, &right),
        };
        Ok(match self.direction {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        })
    }
}

/// An ordered chain of sorters with first-non-zero-wins semantics
///
/// `append`/`prepend` return new values; an empty chain compares everything
/// equal, so applying it preserves the original order.
#[derive(Clone, Default)]
pub struct MultiSort {
    sorts: Vec<Arc<dyn RecordSorter>>,
}

impl MultiSort {
    /// An empty chain
    pub fn new() -> Self {
        Self::default()
    }

    /// A chain holding a single sorter
    pub fn single<S: RecordSorter + 'static>(sorter: S) -> Self {
        Self {
            sorts: vec![Arc::new(sorter)],
        }
    }

    /// A new chain with the sorter added after the existing ones
    pub fn append<S: RecordSorter + 'static>(&self, sorter: S) -> Self {
        let mut sorts = self.sorts.clone();
        sorts.push(Arc::new(sorter));
        Self { sorts }
    }

    /// A new chain with the sorter taking precedence over the existing ones
    pub fn prepend<S: RecordSorter + 'static>(&self, sorter: S) -> Self {
        let mut sorts = Vec::with_capacity(self.sorts.len() + 1);
        sorts.push(Arc::new(sorter) as Arc<dyn RecordSorter>);
        sorts.extend(self.sorts.iter().cloned());
        Self { sorts }
    }

    /// Whether the chain holds no sorters
    pub fn is_empty(&self) -> bool {
        self.sorts.is_empty()
    }

    /// Number of chained sorters
    pub fn len(&self) -> usize {
        self.sorts.len()
    }
}

impl RecordSorter for MultiSort {
    fn compare(&self, a: &Record, b: &Record) -> QueryResult<Ordering> {
        for sorter in &self.sorts {
            let ordering = sorter.compare(a, b)?;
            if ordering != Ordering::Equal {
                return Ok(ordering);
            }
        }
        Ok(Ordering::Equal)
    }
}

/// Stable in-place sort of `(offset, record)` rows by a sorter
///
/// Comparator errors (an unresolvable column, say) cannot surface from
/// inside `sort_by`, so the first one is captured and returned after the
/// pass; the row order is unspecified in that case.
pub fn sort_rows(rows: &mut [(usize, Record)], sorter: &dyn RecordSorter) -> QueryResult<()> {
    let mut failure: Option<QueryError> = None;
    rows.sort_by(|(_, a), (_, b)| match sorter.compare(a, b) {
        Ok(ordering) => ordering,
        Err(err) => {
            failure.get_or_insert(err);
            Ordering::Equal
        }
    });
    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<(usize, Record)> {
        // country, id
        [("DE", "3"), ("AT", "2"), ("DE", "1"), ("AT", "9")]
            .into_iter()
            .enumerate()
            .map(|(i, (country, id))| (i, Record::from_iter([country, id])))
            .collect()
    }

    fn first_fields(rows: &[(usize, Record)]) -> Vec<(String, String)> {
        rows.iter()
            .map(|(_, r)| {
                (
                    r.get(0).unwrap().clone().unwrap(),
                    r.get(1).unwrap().clone().unwrap(),
                )
            })
            .collect()
    }

    #[test]
    fn test_single_key_sort() {
        let mut data = rows();
        sort_rows(&mut data, &SortBy::ascending(1)).unwrap();
        assert_eq!(
            first_fields(&data),
            vec![
                ("DE".into(), "1".into()),
                ("AT".into(), "2".into()),
                ("DE".into(), "3".into()),
                ("AT".into(), "9".into()),
            ]
        );
    }

    #[test]
    fn test_tie_break_order_matters() {
        let by_country_asc_then_id_desc = MultiSort::single(SortBy::ascending(0))
            .append(SortBy::descending(1));
        let by_id_desc_then_country_asc = MultiSort::single(SortBy::descending(1))
            .append(SortBy::ascending(0));

        let mut first = rows();
        sort_rows(&mut first, &by_country_asc_then_id_desc).unwrap();
        let mut second = rows();
        sort_rows(&mut second, &by_id_desc_then_country_asc).unwrap();

        assert_eq!(first_fields(&first)[0], ("AT".into(), "9".into()));
        assert_eq!(first_fields(&second)[0], ("AT".into(), "9".into()));
        // ties on country exist but not on id, so the chains diverge below
        assert_ne!(first_fields(&first), first_fields(&second));
        assert_eq!(first_fields(&second)[1], ("DE".into(), "3".into()));
    }

    #[test]
    fn test_empty_chain_preserves_order() {
        let mut data = rows();
        sort_rows(&mut data, &MultiSort::new()).unwrap();
        assert_eq!(
            data.iter().map(|(i, _)| *i).collect::<Vec<_>>(),
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn test_stability_preserves_source_order_on_ties() {
        let mut data = rows();
        sort_rows(&mut data, &SortBy::ascending(0)).unwrap();
        // AT rows keep their source order 1 then 3; DE rows keep 0 then 2
        assert_eq!(
            data.iter().map(|(i, _)| *i).collect::<Vec<_>>(),
            vec![1, 3, 0, 2]
        );
    }

    #[test]
    fn test_append_and_prepend_return_new_chains() {
        let base = MultiSort::single(SortBy::ascending(0));
        let extended = base.append(SortBy::descending(1));
        let fronted = base.prepend(SortBy::descending(1));
        assert_eq!(base.len(), 1);
        assert_eq!(extended.len(), 2);
        assert_eq!(fronted.len(), 2);
    }

    #[test]
    fn test_custom_comparator() {
        // order by string length
        let by_length = SortBy::new(0, Direction::Ascending).with_comparator(|a, b| {
            let len = |f: &Field| f.as_ref().map(|s| s.len()).unwrap_or(0);
            len(a).cmp(&len(b))
        });
        let mut data = vec![
            (0, Record::from_iter(["ccc"])),
            (1, Record::from_iter(["a"])),
            (2, Record::from_iter(["bb"])),
        ];
        sort_rows(&mut data, &by_length).unwrap();
        assert_eq!(
            data.iter().map(|(i, _)| *i).collect::<Vec<_>>(),
            vec![1, 2, 0]
        );
    }

    #[test]
    fn test_unresolvable_column_surfaces() {
        let mut data = rows();
        let err = sort_rows(&mut data, &SortBy::ascending(9)).unwrap_err();
        assert!(matches!(err, QueryError::Column(_)));
    }
}
