//! Predicate evaluation
//!
//! Integer comparisons only, no coercion. Evaluation is a recursive walk, so
//! trees deeper than one combination level evaluate correctly.

use crate::table::Row;

use super::ast::{Combinator, Filter};

/// Evaluates filter trees against rows
pub struct FilterEvaluator;

impl FilterEvaluator {
    /// Checks if a row passes an optional filter.
    ///
    /// An absent filter matches every row.
    pub fn matches(row: &Row, filter: Option<&Filter>) -> bool {
        match filter {
            Some(filter) => Self::evaluate(filter, row),
            None => true,
        }
    }

    /// Evaluates a filter tree against a row
    pub fn evaluate(filter: &Filter, row: &Row) -> bool {
        match filter {
            Filter::Comparison { column, op, value } => match row.get(*column) {
                Some(actual) => op.compare(actual, *value),
                None => false, // Missing column = no match
            },
            Filter::Combination { left, op, right } => {
                let left = Self::evaluate(left, row);
                // Inactive or absent right branch is never evaluated
                match (op, right) {
                    (Combinator::And, Some(right)) => left && Self::evaluate(right, row),
                    (Combinator::Or, Some(right)) => left || Self::evaluate(right, row),
                    _ => left,
                }
            }
        }
    }
}
