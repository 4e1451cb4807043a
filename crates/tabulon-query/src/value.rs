//! Needle and reference values for comparisons
//!
//! Record fields are strings or null, but callers supply reference values
//! in whatever scalar type reads naturally, so comparisons run over a small
//! tagged union. Equality against a scalar reference is identity-preserving
//! (same variant, same value); ordering takes the loose path where numeric
//! variants and numeric strings compare as numbers.

use std::cmp::Ordering;

use tabulon_core::Field;

/// A scalar operand value
#[derive(Debug, Clone, PartialEq)]
pub enum Datum {
    /// The null value
    Null,
    /// A boolean
    Bool(bool),
    /// A signed integer
    Int(i64),
    /// A float
    Float(f64),
    /// A string
    Text(String),
}

impl Datum {
    /// The operand kind, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Datum::Null => "null",
            Datum::Bool(_) => "boolean",
            Datum::Int(_) => "integer",
            Datum::Float(_) => "float",
            Datum::Text(_) => "string",
        }
    }

    /// The string content, when this is a string
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Datum::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Numeric view: integers and floats directly, strings via parsing
    fn as_number(&self) -> Option<f64> {
        match self {
            Datum::Int(n) => Some(*n as f64),
            Datum::Float(n) => Some(*n),
            Datum::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    /// Identity-preserving equality: same variant, same value
    pub fn identical(&self, other: &Datum) -> bool {
        match (self, other) {
            (Datum::Null, Datum::Null) => true,
            (Datum::Bool(a), Datum::Bool(b)) => a == b,
            (Datum::Int(a), Datum::Int(b)) => a == b,
            (Datum::Float(a), Datum::Float(b)) => a == b,
            (Datum::Text(a), Datum::Text(b)) => a == b,
            _ => false,
        }
    }

    /// Ordering for the ordering/range operators
    ///
    /// Numeric operands (including numeric strings) compare as numbers,
    /// strings compare byte-wise, booleans as false < true. `None` marks an
    /// incomparable pair; null is never ordered.
    pub fn try_cmp(&self, other: &Datum) -> Option<Ordering> {
        if let (Some(a), Some(b)) = (self.as_number(), other.as_number()) {
            return a.partial_cmp(&b);
        }
        match (self, other) {
            (Datum::Text(a), Datum::Text(b)) => Some(a.cmp(b)),
            (Datum::Bool(a), Datum::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<&Field> for Datum {
    fn from(field: &Field) -> Self {
        match field {
            Some(value) => Datum::Text(value.clone()),
            None => Datum::Null,
        }
    }
}

impl From<&str> for Datum {
    fn from(value: &str) -> Self {
        Datum::Text(value.to_string())
    }
}

impl From<String> for Datum {
    fn from(value: String) -> Self {
        Datum::Text(value)
    }
}

impl From<i64> for Datum {
    fn from(value: i64) -> Self {
        Datum::Int(value)
    }
}

impl From<i32> for Datum {
    fn from(value: i32) -> Self {
        Datum::Int(value as i64)
    }
}

impl From<f64> for Datum {
    fn from(value: f64) -> Self {
        Datum::Float(value)
    }
}

impl From<bool> for Datum {
    fn from(value: bool) -> Self {
        Datum::Bool(value)
    }
}

/// A reference value, shaped per operator family
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A single scalar (equality, ordering, substring operators)
    Value(Datum),
    /// An inclusive (min, max) pair (BETWEEN family)
    Range(Datum, Datum),
    /// A membership list (IN family)
    List(Vec<Datum>),
    /// A regular-expression pattern (REGEXP family)
    Pattern(String),
}

impl Operand {
    /// A scalar reference
    pub fn value<D: Into<Datum>>(value: D) -> Self {
        Operand::Value(value.into())
    }

    /// An inclusive (min, max) reference
    pub fn range<A: Into<Datum>, B: Into<Datum>>(min: A, max: B) -> Self {
        Operand::Range(min.into(), max.into())
    }

    /// A membership-list reference
    pub fn list<D: Into<Datum>, I: IntoIterator<Item = D>>(values: I) -> Self {
        Operand::List(values.into_iter().map(Into::into).collect())
    }

    /// A pattern reference
    pub fn pattern<S: Into<String>>(pattern: S) -> Self {
        Operand::Pattern(pattern.into())
    }

    /// The reference shape, for diagnostics
    pub fn shape(&self) -> &'static str {
        match self {
            Operand::Value(datum) => datum.kind(),
            Operand::Range(..) => "pair",
            Operand::List(_) => "list",
            Operand::Pattern(_) => "pattern",
        }
    }
}

/// Total natural order over fields, used as the default sort comparator
///
/// Null sorts first; two numeric strings compare as numbers; everything
/// else compares byte-wise. Total, so sorting never fails on odd data.
pub fn natural_field_order(a: &Field, b: &Field) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => {
            if let (Ok(x), Ok(y)) = (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
                if let Some(ordering) = x.partial_cmp(&y) {
                    return ordering;
                }
            }
            a.cmp(b)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_variant_strict() {
        assert!(Datum::Int(1).identical(&Datum::Int(1)));
        assert!(!Datum::Int(1).identical(&Datum::Float(1.0)));
        assert!(!Datum::Text("1".into()).identical(&Datum::Int(1)));
        assert!(Datum::Null.identical(&Datum::Null));
    }

    #[test]
    fn test_numeric_strings_order_numerically() {
        assert_eq!(
            Datum::Text("9".into()).try_cmp(&Datum::Text("10".into())),
            Some(Ordering::Less)
        );
        assert_eq!(
            Datum::Text("9".into()).try_cmp(&Datum::Int(10)),
            Some(Ordering::Less)
        );
    }

    #[test]
    fn test_null_is_unordered() {
        assert_eq!(Datum::Null.try_cmp(&Datum::Int(1)), None);
        assert_eq!(Datum::Text("a".into()).try_cmp(&Datum::Null), None);
    }

    #[test]
    fn test_natural_field_order() {
        let a = Some("10".to_string());
        let b = Some("9".to_string());
        assert_eq!(natural_field_order(&a, &b), Ordering::Greater);
        assert_eq!(natural_field_order(&None, &a), Ordering::Less);
        assert_eq!(
            natural_field_order(&Some("apple".into()), &Some("banana".into())),
            Ordering::Less
        );
    }
}
