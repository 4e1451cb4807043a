//! Fragment expressions
//!
//! A small textual language selecting rows, columns, or cell rectangles
//! from tabular data: `row=1-5;8`, `col=2-*`, `cell=1,4-5,9`. Points are
//! 1-based in the expression and 0-based internally; `-*` opens a range to
//! the end of the data. Invalid syntax, non-positive indices, inverted
//! ranges and malformed cell rectangles raise
//! [`QueryError::FragmentNotFound`] quoting the offending selection.

use std::fmt;
use std::str::FromStr;

use tabulon_core::Record;

use crate::error::{QueryError, QueryResult};

/// The axis a fragment expression selects along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Whole rows (`row=`)
    Row,
    /// Whole columns (`col=`)
    Column,
    /// Cell rectangles (`cell=`)
    Cell,
}

impl Axis {
    fn keyword(&self) -> &'static str {
        match self {
            Axis::Row => "row",
            Axis::Column => "col",
            Axis::Cell => "cell",
        }
    }
}

/// How a span ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanEnd {
    /// A single point: the span covers only its start
    Point,
    /// Inclusive end index (0-based)
    At(usize),
    /// Open: to the end of the data
    Open,
}

/// An inclusive 0-based span along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// First index covered
    pub start: usize,
    /// How the span ends
    pub end: SpanEnd,
}

impl Span {
    /// The covered 0-based positions, clamped to a dimension of `len`
    fn positions(&self, len: usize) -> std::ops::Range<usize> {
        let start = self.start.min(len);
        let end = match self.end {
            SpanEnd::Point => self.start + 1,
            SpanEnd::At(end) => end + 1,
            SpanEnd::Open => len,
        };
        start..end.min(len)
    }

    fn display(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            SpanEnd::Point => write!(f, "{}", self.start + 1),
            SpanEnd::At(end) => write!(f, "{}-{}", self.start + 1, end + 1),
            SpanEnd::Open => write!(f, "{}-*", self.start + 1),
        }
    }
}

/// One parsed selection: row bounds, column bounds, or both
///
/// An axis the selection does not constrain is `None` (a pure row selection
/// has no column span, and vice versa).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Row span, when the selection constrains rows
    pub rows: Option<Span>,
    /// Column span, when the selection constrains columns
    pub cols: Option<Span>,
}

/// A parsed fragment expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    axis: Axis,
    selections: Vec<Selection>,
}

impl Fragment {
    /// Parse a fragment expression
    ///
    /// The type keyword is case-insensitive; selections are separated by
    /// `;`. An empty selection list (`row=`) selects nothing and
    /// round-trips through [`Display`](fmt::Display) unchanged.
    pub fn from_expression(expression: &str) -> QueryResult<Self> {
        let (keyword, rest) = expression
            .split_once('=')
            .ok_or_else(|| QueryError::FragmentNotFound(expression.to_string()))?;
        let axis = match keyword.to_ascii_lowercase().as_str() {
            "row" => Axis::Row,
            "col" => Axis::Column,
            "cell" => Axis::Cell,
            _ => return Err(QueryError::FragmentNotFound(expression.to_string())),
        };

        let mut selections = Vec::new();
        if !rest.is_empty() {
            for raw in rest.split(';') {
                selections.push(parse_selection(axis, raw)?);
            }
        }
        Ok(Self { axis, selections })
    }

    /// The axis this expression selects along
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// The parsed selections in expression order
    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    /// Apply the expression to a materialized table, producing one
    /// sub-table per selection
    ///
    /// Row selections slice the record list; column and cell selections
    /// project each record (and its header, when bound) onto the selected
    /// columns. Out-of-range selections produce empty sub-tables rather
    /// than errors.
    pub fn find_all(&self, records: &[Record]) -> Vec<Vec<Record>> {
        self.selections
            .iter()
            .map(|selection| apply_selection(selection, records))
            .collect()
    }

    /// The first selection's sub-table, if the expression has selections
    pub fn find_first(&self, records: &[Record]) -> Option<Vec<Record>> {
        self.selections
            .first()
            .map(|selection| apply_selection(selection, records))
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=", self.axis.keyword())?;
        let mut first = true;
        for selection in &self.selections {
            if !first {
                write!(f, ";")?;
            }
            first = false;
            match self.axis {
                Axis::Row => selection.rows.expect("row selection has rows").display(f)?,
                Axis::Column => selection
                    .cols
                    .expect("col selection has cols")
                    .display(f)?,
                Axis::Cell => display_cell(selection, f)?,
            }
        }
        Ok(())
    }
}

impl FromStr for Fragment {
    type Err = QueryError;

    fn from_str(s: &str) -> QueryResult<Self> {
        Self::from_expression(s)
    }
}

fn display_cell(selection: &Selection, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let rows = selection.rows.expect("cell selection has rows");
    let cols = selection.cols.expect("cell selection has cols");
    write!(f, "{},{}", rows.start + 1, cols.start + 1)?;
    match (rows.end, cols.end) {
        (SpanEnd::Point, SpanEnd::Point) => Ok(()),
        (SpanEnd::Open, SpanEnd::Open) => write!(f, "-*"),
        (SpanEnd::At(row_end), SpanEnd::At(col_end)) => {
            write!(f, "-{},{}", row_end + 1, col_end + 1)
        }
        // construction never mixes end kinds across axes
        _ => unreachable!("cell selection with mismatched span ends"),
    }
}

/// Parse a 1-based index into its 0-based value
fn parse_index(raw: &str, whole: &str) -> QueryResult<usize> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(QueryError::FragmentNotFound(whole.to_string()));
    }
    let value: usize = raw
        .parse()
        .map_err(|_| QueryError::FragmentNotFound(whole.to_string()))?;
    if value == 0 {
        return Err(QueryError::FragmentNotFound(whole.to_string()));
    }
    Ok(value - 1)
}

/// Parse a `row,col` cell point into 0-based coordinates
fn parse_cell_point(raw: &str, whole: &str) -> QueryResult<(usize, usize)> {
    let (row, col) = raw
        .split_once(',')
        .ok_or_else(|| QueryError::FragmentNotFound(whole.to_string()))?;
    Ok((parse_index(row, whole)?, parse_index(col, whole)?))
}

fn parse_selection(axis: Axis, raw: &str) -> QueryResult<Selection> {
    match axis {
        Axis::Row => Ok(Selection {
            rows: Some(parse_span(raw)?),
            cols: None,
        }),
        Axis::Column => Ok(Selection {
            rows: None,
            cols: Some(parse_span(raw)?),
        }),
        Axis::Cell => parse_cell_selection(raw),
    }
}

/// Parse a row/col selection: `point`, `point-point` or `point-*`
fn parse_span(raw: &str) -> QueryResult<Span> {
    match raw.split_once('-') {
        None => Ok(Span {
            start: parse_index(raw, raw)?,
            end: SpanEnd::Point,
        }),
        Some((start, "*")) => Ok(Span {
            start: parse_index(start, raw)?,
            end: SpanEnd::Open,
        }),
        Some((start, end)) => {
            let start = parse_index(start, raw)?;
            let end = parse_index(end, raw)?;
            if end < start {
                return Err(QueryError::FragmentNotFound(raw.to_string()));
            }
            Ok(Span {
                start,
                end: SpanEnd::At(end),
            })
        }
    }
}

/// Parse a cell selection: `r,c`, `r,c-r,c` or `r,c-*`
///
/// Every cell range must specify a full end point or the `*` shortcut; a
/// bare `*` coordinate (`1,*`) is invalid, as is a rectangle whose end
/// point lies above or left of its start.
fn parse_cell_selection(raw: &str) -> QueryResult<Selection> {
    match raw.split_once('-') {
        None => {
            let (row, col) = parse_cell_point(raw, raw)?;
            Ok(Selection {
                rows: Some(Span {
                    start: row,
                    end: SpanEnd::Point,
                }),
                cols: Some(Span {
                    start: col,
                    end: SpanEnd::Point,
                }),
            })
        }
        Some((start, "*")) => {
            let (row, col) = parse_cell_point(start, raw)?;
            Ok(Selection {
                rows: Some(Span {
                    start: row,
                    end: SpanEnd::Open,
                }),
                cols: Some(Span {
                    start: col,
                    end: SpanEnd::Open,
                }),
            })
        }
        Some((start, end)) => {
            let (row_start, col_start) = parse_cell_point(start, raw)?;
            let (row_end, col_end) = parse_cell_point(end, raw)?;
            if row_end < row_start || col_end < col_start {
                return Err(QueryError::FragmentNotFound(raw.to_string()));
            }
            Ok(Selection {
                rows: Some(Span {
                    start: row_start,
                    end: SpanEnd::At(row_end),
                }),
                cols: Some(Span {
                    start: col_start,
                    end: SpanEnd::At(col_end),
                }),
            })
        }
    }
}

fn apply_selection(selection: &Selection, records: &[Record]) -> Vec<Record> {
    let rows = match selection.rows {
        Some(span) => &records[span.positions(records.len())],
        None => records,
    };
    match selection.cols {
        Some(span) => rows
            .iter()
            .map(|record| {
                let positions: Vec<usize> = span.positions(record.len()).collect();
                record.project(&positions)
            })
            .collect(),
        None => rows.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn table() -> Vec<Record> {
        (1..=6)
            .map(|row| {
                Record::from_iter((1..=10).map(|col| format!("r{row}c{col}")))
            })
            .collect()
    }

    #[test]
    fn test_row_open_range() {
        let fragment = Fragment::from_expression("row=12-*").unwrap();
        assert_eq!(fragment.axis(), Axis::Row);
        assert_eq!(
            fragment.selections(),
            &[Selection {
                rows: Some(Span {
                    start: 11,
                    end: SpanEnd::Open
                }),
                cols: None,
            }]
        );
    }

    #[test]
    fn test_row_errors() {
        // comma is not a selection separator
        assert!(matches!(
            Fragment::from_expression("row=1-4,2-5"),
            Err(QueryError::FragmentNotFound(raw)) if raw == "1-4,2-5"
        ));
        assert!(matches!(
            Fragment::from_expression("row=-1"),
            Err(QueryError::FragmentNotFound(_))
        ));
        assert!(Fragment::from_expression("row=0").is_err());
        assert!(Fragment::from_expression("row=4-2").is_err());
        assert!(Fragment::from_expression("row=1;;2").is_err());
        assert!(Fragment::from_expression("line=1").is_err());
    }

    #[test]
    fn test_cell_rectangle() {
        let fragment = Fragment::from_expression("cell=1,4-5,9").unwrap();
        assert_eq!(
            fragment.selections(),
            &[Selection {
                rows: Some(Span {
                    start: 0,
                    end: SpanEnd::At(4)
                }),
                cols: Some(Span {
                    start: 3,
                    end: SpanEnd::At(8)
                }),
            }]
        );
    }

    #[test]
    fn test_cell_errors() {
        // `*` replaces a whole end point, never a single coordinate
        assert!(matches!(
            Fragment::from_expression("cell=1,*"),
            Err(QueryError::FragmentNotFound(raw)) if raw == "1,*"
        ));
        assert!(Fragment::from_expression("cell=5,5-1,9").is_err());
        assert!(Fragment::from_expression("cell=1,5-2,4").is_err());
        assert!(Fragment::from_expression("cell=1").is_err());
    }

    #[test]
    fn test_keyword_case_insensitive() {
        assert_eq!(
            Fragment::from_expression("ROW=1").unwrap(),
            Fragment::from_expression("row=1").unwrap()
        );
        assert_eq!(
            Fragment::from_expression("Cell=1,2-*").unwrap().axis(),
            Axis::Cell
        );
    }

    #[test]
    fn test_display_round_trip() {
        for expression in [
            "row=",
            "row=5",
            "row=1-4;6;8-*",
            "col=2-3",
            "cell=1,4-5,9",
            "cell=2,2",
            "cell=3,1-*",
        ] {
            let fragment = Fragment::from_expression(expression).unwrap();
            assert_eq!(fragment.to_string(), expression);
        }
    }

    #[test]
    fn test_empty_selection_selects_nothing() {
        let fragment = Fragment::from_expression("row=").unwrap();
        assert!(fragment.find_all(&table()).is_empty());
        assert!(fragment.find_first(&table()).is_none());
    }

    #[test]
    fn test_row_application() {
        let fragment = Fragment::from_expression("row=2-3;5-*").unwrap();
        let tables = fragment.find_all(&table());
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].len(), 2);
        assert_eq!(
            tables[0][0].get(0).unwrap().as_deref(),
            Some("r2c1")
        );
        assert_eq!(tables[1].len(), 2); // rows 5 and 6
    }

    #[test]
    fn test_row_out_of_range_is_empty() {
        let fragment = Fragment::from_expression("row=12-*").unwrap();
        assert_eq!(fragment.find_first(&table()), Some(vec![]));
    }

    #[test]
    fn test_column_application() {
        let fragment = Fragment::from_expression("col=9-*").unwrap();
        let sub = fragment.find_first(&table()).unwrap();
        assert_eq!(sub.len(), 6);
        assert_eq!(sub[0], Record::from_iter(["r1c9", "r1c10"]));
    }

    #[test]
    fn test_cell_application() {
        let fragment = Fragment::from_expression("cell=1,4-5,9").unwrap();
        let sub = fragment.find_first(&table()).unwrap();
        assert_eq!(sub.len(), 5);
        assert_eq!(sub[0].len(), 6); // columns 4..=9
        assert_eq!(sub[0].get(0).unwrap().as_deref(), Some("r1c4"));
        assert_eq!(sub[4].get(5).unwrap().as_deref(), Some("r5c9"));
    }
}
