//! Comparison operators
//!
//! A closed set of named binary operators. Each operator declares which
//! reference shapes it accepts via [`Comparison::accept`]; predicates and
//! sorts that embed a comparison check acceptance at construction so that a
//! malformed query fails before any record is read.

use std::fmt;
use std::str::FromStr;

use regex::Regex;

use crate::error::{QueryError, QueryResult};
use crate::value::{Datum, Operand};

/// The comparison operator set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    /// `=` identity-preserving equality
    Equals,
    /// `!=`
    NotEquals,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
    /// `<`
    LesserThan,
    /// `<=`
    LesserThanOrEqual,
    /// `between`, inclusive bounds
    Between,
    /// `not between`
    NotBetween,
    /// `regexp`
    Regexp,
    /// `not regexp`
    NotRegexp,
    /// `in`, identity-preserving membership
    In,
    /// `not in`
    NotIn,
    /// `contains`
    Contains,
    /// `not contain`
    NotContain,
    /// `starts with`
    StartsWith,
    /// `ends with`
    EndsWith,
}

impl Comparison {
    /// Resolve an operator from its textual name (case-insensitive)
    ///
    /// # Errors
    ///
    /// [`QueryError::UnknownOperator`] naming the rejected token.
    pub fn from_operator(token: &str) -> QueryResult<Self> {
        let normalized = token.trim().to_ascii_lowercase();
        let normalized = normalized.split_whitespace().collect::<Vec<_>>().join(" ");
        Ok(match normalized.as_str() {
            "=" => Comparison::Equals,
            "!=" | "<>" => Comparison::NotEquals,
            ">" => Comparison::GreaterThan,
            ">=" => Comparison::GreaterThanOrEqual,
            "<" => Comparison::LesserThan,
            "<=" => Comparison::LesserThanOrEqual,
            "between" => Comparison::Between,
            "not between" => Comparison::NotBetween,
            "regexp" => Comparison::Regexp,
            "not regexp" => Comparison::NotRegexp,
            "in" => Comparison::In,
            "not in" => Comparison::NotIn,
            "contains" => Comparison::Contains,
            "not contain" => Comparison::NotContain,
            "starts with" => Comparison::StartsWith,
            "ends with" => Comparison::EndsWith,
            _ => return Err(QueryError::UnknownOperator(token.to_string())),
        })
    }

    /// The canonical operator token
    pub fn operator(&self) -> &'static str {
        match self {
            Comparison::Equals => "=",
            Comparison::NotEquals => "!=",
            Comparison::GreaterThan => ">",
            Comparison::GreaterThanOrEqual => ">=",
            Comparison::LesserThan => "<",
            Comparison::LesserThanOrEqual => "<=",
            Comparison::Between => "between",
            Comparison::NotBetween => "not between",
            Comparison::Regexp => "regexp",
            Comparison::NotRegexp => "not regexp",
            Comparison::In => "in",
            Comparison::NotIn => "not in",
            Comparison::Contains => "contains",
            Comparison::NotContain => "not contain",
            Comparison::StartsWith => "starts with",
            Comparison::EndsWith => "ends with",
        }
    }

    /// Whether a reference value has a legal shape for this operator
    pub fn accept(&self, reference: &Operand) -> bool {
        match self {
            Comparison::Equals | Comparison::NotEquals => {
                matches!(reference, Operand::Value(_))
            }
            Comparison::GreaterThan
            | Comparison::GreaterThanOrEqual
            | Comparison::LesserThan
            | Comparison::LesserThanOrEqual => {
                matches!(reference, Operand::Value(datum) if !matches!(datum, Datum::Null))
            }
            Comparison::Between | Comparison::NotBetween => matches!(
                reference,
                Operand::Range(min, max)
                    if !matches!(min, Datum::Null) && !matches!(max, Datum::Null)
            ),
            Comparison::Regexp | Comparison::NotRegexp => {
                matches!(reference, Operand::Pattern(_))
            }
            Comparison::In | Comparison::NotIn => matches!(reference, Operand::List(_)),
            Comparison::Contains
            | Comparison::NotContain
            | Comparison::StartsWith
            | Comparison::EndsWith => {
                matches!(reference, Operand::Value(Datum::Text(_)))
            }
        }
    }

    /// Evaluate the operator over a needle and a reference value
    ///
    /// # Errors
    ///
    /// [`QueryError::InvalidReference`] when the reference shape is illegal
    /// for this operator, [`QueryError::InvalidNeedle`] when the needle
    /// shape is, [`QueryError::Incomparable`] for unordered operand pairs,
    /// and [`QueryError::InvalidPattern`] for an uncompilable pattern.
    pub fn compare(&self, needle: &Datum, reference: &Operand) -> QueryResult<bool> {
        if !self.accept(reference) {
            return Err(QueryError::InvalidReference {
                operator: self.operator(),
                shape: reference.shape(),
            });
        }
        match (self, reference) {
            (Comparison::Equals, Operand::Value(value)) => Ok(needle.identical(value)),
            (Comparison::NotEquals, Operand::Value(value)) => Ok(!needle.identical(value)),

            (Comparison::GreaterThan, Operand::Value(value)) => {
                Ok(self.ordered(needle, value)?.is_gt())
            }
            (Comparison::GreaterThanOrEqual, Operand::Value(value)) => {
                Ok(self.ordered(needle, value)?.is_ge())
            }
            (Comparison::LesserThan, Operand::Value(value)) => {
                Ok(self.ordered(needle, value)?.is_lt())
            }
            (Comparison::LesserThanOrEqual, Operand::Value(value)) => {
                Ok(self.ordered(needle, value)?.is_le())
            }

            (Comparison::Between, Operand::Range(min, max)) => Ok(self
                .ordered(needle, min)?
                .is_ge()
                && self.ordered(needle, max)?.is_le()),
            (Comparison::NotBetween, Operand::Range(min, max)) => Ok(self
                .ordered(needle, min)?
                .is_lt()
                || self.ordered(needle, max)?.is_gt()),

            (Comparison::Regexp, Operand::Pattern(pattern)) => {
                let regex = Regex::new(pattern)?;
                Ok(regex.is_match(self.text(needle)?))
            }
            (Comparison::NotRegexp, Operand::Pattern(pattern)) => {
                let regex = Regex::new(pattern)?;
                Ok(!regex.is_match(self.text(needle)?))
            }

            (Comparison::In, Operand::List(values)) => {
                Ok(values.iter().any(|value| needle.identical(value)))
            }
            (Comparison::NotIn, Operand::List(values)) => {
                Ok(!values.iter().any(|value| needle.identical(value)))
            }

            (Comparison::Contains, Operand::Value(value)) => {
                Ok(self.text(needle)?.contains(self.reference_text(value)?))
            }
            (Comparison::NotContain, Operand::Value(value)) => {
                Ok(!self.text(needle)?.contains(self.reference_text(value)?))
            }
            (Comparison::StartsWith, Operand::Value(value)) => {
                Ok(self.text(needle)?.starts_with(self.reference_text(value)?))
            }
            (Comparison::EndsWith, Operand::Value(value)) => {
                Ok(self.text(needle)?.ends_with(self.reference_text(value)?))
            }

            // accept() already excluded every other combination
            _ => unreachable!("accept() admitted an illegal reference shape"),
        }
    }

    fn ordered(&self, needle: &Datum, value: &Datum) -> QueryResult<std::cmp::Ordering> {
        needle.try_cmp(value).ok_or(QueryError::Incomparable {
            left: needle.kind(),
            right: value.kind(),
        })
    }

    fn text<'a>(&self, needle: &'a Datum) -> QueryResult<&'a str> {
        needle.as_text().ok_or(QueryError::InvalidNeedle {
            operator: self.operator(),
            expected: "string",
            actual: needle.kind(),
        })
    }

    fn reference_text<'a>(&self, value: &'a Datum) -> QueryResult<&'a str> {
        // accept() guarantees a string reference for the substring family
        value.as_text().ok_or(QueryError::InvalidReference {
            operator: self.operator(),
            shape: value.kind(),
        })
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.operator())
    }
}

impl FromStr for Comparison {
    type Err = QueryError;

    fn from_str(s: &str) -> QueryResult<Self> {
        Self::from_operator(s)
    }
}
