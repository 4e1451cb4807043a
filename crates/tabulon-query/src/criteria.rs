//! Predicate combinators
//!
//! [`Criteria`] combines predicates with AND/OR/NOT/XOR semantics while
//! preserving source order. A criteria value is itself a predicate, so
//! combinators nest; the fluent methods fold the current combinator in as
//! the first operand and return a new value, leaving the original intact.

use std::sync::Arc;

use tabulon_core::Record;

use crate::error::QueryResult;
use crate::predicate::RecordPredicate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Logic {
    /// AND: short-circuits on the first false
    All,
    /// OR: short-circuits on the first true
    Any,
    /// NOT-OR: short-circuits on the first true
    None,
    /// XOR across all predicates: every predicate evaluated exactly once
    XAny,
}

/// A composed predicate over an ordered list of predicates
#[derive(Clone)]
pub struct Criteria {
    logic: Logic,
    predicates: Vec<Arc<dyn RecordPredicate>>,
}

impl Criteria {
    /// True when every predicate is true (true for an empty list)
    pub fn all(predicates: Vec<Arc<dyn RecordPredicate>>) -> Self {
        Self {
            logic: Logic::All,
            predicates,
        }
    }

    /// True when at least one predicate is true (false for an empty list)
    pub fn any(predicates: Vec<Arc<dyn RecordPredicate>>) -> Self {
        Self {
            logic: Logic::Any,
            predicates,
        }
    }

    /// True when no predicate is true (true for an empty list)
    pub fn none(predicates: Vec<Arc<dyn RecordPredicate>>) -> Self {
        Self {
            logic: Logic::None,
            predicates,
        }
    }

    /// True when an odd number of predicates is true (false for an empty
    /// list); never short-circuits
    pub fn xany(predicates: Vec<Arc<dyn RecordPredicate>>) -> Self {
        Self {
            logic: Logic::XAny,
            predicates,
        }
    }

    /// AND this combinator with another predicate
    pub fn and<P: RecordPredicate + 'static>(self, predicate: P) -> Criteria {
        Criteria::all(vec![Arc::new(self), Arc::new(predicate)])
    }

    /// OR this combinator with another predicate
    pub fn or<P: RecordPredicate + 'static>(self, predicate: P) -> Criteria {
        Criteria::any(vec![Arc::new(self), Arc::new(predicate)])
    }

    /// NOT-OR this combinator with another predicate
    pub fn not<P: RecordPredicate + 'static>(self, predicate: P) -> Criteria {
        Criteria::none(vec![Arc::new(self), Arc::new(predicate)])
    }

    /// XOR this combinator with another predicate
    pub fn xor<P: RecordPredicate + 'static>(self, predicate: P) -> Criteria {
        Criteria::xany(vec![Arc::new(self), Arc::new(predicate)])
    }

    /// Number of direct operands
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Whether the combinator has no operands
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl RecordPredicate for Criteria {
    fn test(&self, record: &Record, offset: usize) -> QueryResult<bool> {
        match self.logic {
            Logic::All => {
                for predicate in &self.predicates {
                    if !predicate.test(record, offset)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Logic::Any => {
                for predicate in &self.predicates {
                    if predicate.test(record, offset)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Logic::None => {
                for predicate in &self.predicates {
                    if predicate.test(record, offset)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Logic::XAny => {
                let mut odd = false;
                for predicate in &self.predicates {
                    odd ^= predicate.test(record, offset)?;
                }
                Ok(odd)
            }
        }
    }
}
