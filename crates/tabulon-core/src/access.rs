//! Column resolution over record-like values
//!
//! Columns are addressed by a [`ColumnKey`]: a name or a signed position.
//! Rather than probing values reflectively, record-like types implement
//! [`FieldAccess`], a small capability interface whose strategies are tried
//! in a fixed order: exact-name lookup, then a computed accessor, then a
//! positional view for integer keys.

use std::fmt;

use crate::error::{Error, Result};
use crate::record::{Field, Record};

/// A column identifier: by name, or by signed zero-based position
///
/// Negative positions count from the end of the record, so `-1` is the last
/// field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnKey {
    /// Resolve by exact name
    Name(String),
    /// Resolve by position on a dense zero-based view
    Index(isize),
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKey::Name(name) => write!(f, "{name}"),
            ColumnKey::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for ColumnKey {
    fn from(name: &str) -> Self {
        ColumnKey::Name(name.to_string())
    }
}

impl From<String> for ColumnKey {
    fn from(name: String) -> Self {
        ColumnKey::Name(name)
    }
}

impl From<isize> for ColumnKey {
    fn from(index: isize) -> Self {
        ColumnKey::Index(index)
    }
}

impl From<i32> for ColumnKey {
    fn from(index: i32) -> Self {
        ColumnKey::Index(index as isize)
    }
}

impl From<usize> for ColumnKey {
    fn from(index: usize) -> Self {
        ColumnKey::Index(index as isize)
    }
}

/// Capability interface for resolving columns against a record-like value
///
/// String keys try [`named`](Self::named) then [`accessor`](Self::accessor);
/// integer keys require a positional view ([`width`](Self::width) returning
/// `Some`) and are rejected otherwise. Implementors only provide the
/// capabilities their shape supports.
pub trait FieldAccess {
    /// Exact-name lookup (header entry, struct field)
    fn named(&self, name: &str) -> Option<Field>;

    /// Computed fallback for string keys tried after [`named`](Self::named),
    /// for values that derive fields on demand
    fn accessor(&self, name: &str) -> Option<Field> {
        let _ = name;
        None
    }

    /// Positional lookup on the dense zero-based view
    fn indexed(&self, position: usize) -> Option<Field>;

    /// Number of positional fields, or `None` for object-like values that
    /// have no positional view
    fn width(&self) -> Option<usize>;
}

impl FieldAccess for Record {
    fn named(&self, name: &str) -> Option<Field> {
        let position = self.header()?.iter().position(|h| h == name)?;
        self.get(position).cloned()
    }

    fn indexed(&self, position: usize) -> Option<Field> {
        self.get(position).cloned()
    }

    fn width(&self) -> Option<usize> {
        Some(self.len())
    }
}

/// Resolve a column key against a record-like value
///
/// # Errors
///
/// [`Error::ColumnNotFound`] naming the key when no strategy resolves it;
/// [`Error::IntegerKeyUnsupported`] when an integer key is used against a
/// value without a positional view.
pub fn resolve_column<R: FieldAccess + ?Sized>(record: &R, key: &ColumnKey) -> Result<Field> {
    match key {
        ColumnKey::Name(name) => record
            .named(name)
            .or_else(|| record.accessor(name))
            .ok_or_else(|| Error::ColumnNotFound(name.clone())),
        ColumnKey::Index(index) => {
            let width = record
                .width()
                .ok_or(Error::IntegerKeyUnsupported(*index))?;
            let position = if *index < 0 {
                width.checked_sub(index.unsigned_abs())
            } else {
                Some(*index as usize)
            }
            .filter(|p| *p < width)
            .ok_or_else(|| Error::ColumnNotFound(index.to_string()))?;
            record
                .indexed(position)
                .ok_or_else(|| Error::ColumnNotFound(index.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn named_record() -> Record {
        let header: Arc<[String]> = vec!["id".to_string(), "country".to_string()].into();
        Record::from_iter(["7", "DE"]).with_header(header)
    }

    #[test]
    fn test_resolve_by_name() {
        let record = named_record();
        let value = resolve_column(&record, &"country".into()).unwrap();
        assert_eq!(value.as_deref(), Some("DE"));
    }

    #[test]
    fn test_resolve_by_name_missing_names_column() {
        let record = named_record();
        let err = resolve_column(&record, &"region".into()).unwrap_err();
        assert_eq!(err, Error::ColumnNotFound("region".to_string()));
    }

    #[test]
    fn test_resolve_without_header_rejects_names() {
        let record = Record::from_iter(["7", "DE"]);
        assert!(resolve_column(&record, &"id".into()).is_err());
    }

    #[test]
    fn test_resolve_by_index() {
        let record = named_record();
        assert_eq!(
            resolve_column(&record, &ColumnKey::Index(0)).unwrap().as_deref(),
            Some("7")
        );
        assert_eq!(
            resolve_column(&record, &ColumnKey::Index(-1)).unwrap().as_deref(),
            Some("DE")
        );
    }

    #[test]
    fn test_resolve_index_out_of_range() {
        let record = named_record();
        assert_eq!(
            resolve_column(&record, &ColumnKey::Index(2)).unwrap_err(),
            Error::ColumnNotFound("2".to_string())
        );
        assert_eq!(
            resolve_column(&record, &ColumnKey::Index(-3)).unwrap_err(),
            Error::ColumnNotFound("-3".to_string())
        );
    }

    #[test]
    fn test_integer_key_rejected_without_positional_view() {
        struct Opaque;

        impl FieldAccess for Opaque {
            fn named(&self, name: &str) -> Option<Field> {
                (name == "tag").then(|| Some("x".to_string()))
            }

            fn indexed(&self, _position: usize) -> Option<Field> {
                None
            }

            fn width(&self) -> Option<usize> {
                None
            }
        }

        assert_eq!(
            resolve_column(&Opaque, &"tag".into()).unwrap().as_deref(),
            Some("x")
        );
        assert_eq!(
            resolve_column(&Opaque, &ColumnKey::Index(0)).unwrap_err(),
            Error::IntegerKeyUnsupported(0)
        );
    }
}
