//! Record and field types

use std::fmt;
use std::sync::Arc;

/// A single field value: a string, or null
///
/// The tokenizer never coerces field content; everything it produces is a
/// string. `None` marks the null field, which in practice only appears in
/// the blank-line sentinel record.
pub type Field = Option<String>;

/// An ordered sequence of nullable string fields, one per logical CSV row
///
/// Records are produced by the tokenizer and consumed (never mutated) by the
/// query layer. A record may carry a shared header so that columns can be
/// resolved by name; header binding is a reader-level convenience built on
/// the first record of a source, not a tokenizer concern.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Record {
    fields: Vec<Field>,
    #[cfg_attr(feature = "serde", serde(skip))]
    header: Option<Arc<[String]>>,
}

impl Record {
    /// Create a record from its fields
    pub fn new(fields: Vec<Field>) -> Self {
        Self {
            fields,
            header: None,
        }
    }

    /// The blank-line sentinel: a record holding a single null field
    pub fn blank() -> Self {
        Self::new(vec![None])
    }

    /// Whether this record is the blank-line sentinel
    pub fn is_blank(&self) -> bool {
        self.fields.len() == 1 && self.fields[0].is_none()
    }

    /// Number of fields (the record's arity)
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields at all
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Get a field by zero-based position
    pub fn get(&self, index: usize) -> Option<&Field> {
        self.fields.get(index)
    }

    /// All fields in source order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Iterate over the fields
    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    /// Consume the record, returning its fields
    pub fn into_fields(self) -> Vec<Field> {
        self.fields
    }

    /// The header bound to this record, if any
    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    /// Return the same record with a header bound for by-name resolution
    ///
    /// The header is shared, so binding the same header to every record of a
    /// document costs one reference count bump per record.
    pub fn with_header(mut self, header: Arc<[String]>) -> Self {
        self.header = Some(header);
        self
    }

    /// Project the record onto a subset of its columns, in the given order
    ///
    /// Positions past the record's arity are skipped rather than padded, so
    /// a projected record keeps its own arity. The header, when bound, is
    /// projected the same way.
    pub fn project(&self, positions: &[usize]) -> Record {
        let fields = positions
            .iter()
            .filter_map(|&p| self.fields.get(p).cloned())
            .collect();
        let header = self.header.as_ref().map(|h| {
            positions
                .iter()
                .filter_map(|&p| h.get(p).cloned())
                .collect::<Arc<[String]>>()
        });
        Record { fields, header }
    }
}

impl From<Vec<Field>> for Record {
    fn from(fields: Vec<Field>) -> Self {
        Self::new(fields)
    }
}

impl<S: Into<String>> FromIterator<S> for Record {
    fn from_iter<I: IntoIterator<Item = S>>(values: I) -> Self {
        Self::new(values.into_iter().map(|v| Some(v.into())).collect())
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for field in &self.fields {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            match field {
                Some(value) => write!(f, "{value:?}")?,
                None => write!(f, "null")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_blank_sentinel() {
        assert!(Record::blank().is_blank());
        assert!(!Record::from_iter([""]).is_blank());
        assert!(!Record::new(vec![None, None]).is_blank());
    }

    #[test]
    fn test_from_iter_builds_non_null_fields() {
        let record = Record::from_iter(["a", "b"]);
        assert_eq!(record.len(), 2);
        assert_eq!(record.get(0), Some(&Some("a".to_string())));
        assert_eq!(record.get(2), None);
    }

    #[test]
    fn test_project_skips_out_of_range() {
        let record = Record::from_iter(["a", "b", "c"]);
        let projected = record.project(&[2, 0, 9]);
        assert_eq!(projected, Record::from_iter(["c", "a"]));
    }

    #[test]
    fn test_project_carries_header() {
        let header: Arc<[String]> = vec!["id".to_string(), "name".to_string()].into();
        let record = Record::from_iter(["1", "alice"]).with_header(header);
        let projected = record.project(&[1]);
        assert_eq!(projected.header(), Some(&["name".to_string()][..]));
        assert_eq!(projected.fields(), &[Some("alice".to_string())]);
    }
}
