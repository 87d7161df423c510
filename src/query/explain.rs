//! Explain output
//!
//! Produces deterministic, human-readable descriptions of a query, whether it
//! would be accepted or rejected.

use std::fmt;

use serde::Serialize;

use super::ast::Query;
use super::errors::QueryError;
use super::validator::QueryValidator;

/// Explain output for one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplainQuery {
    /// Whether the query passes shape validation
    pub accepted: bool,
    /// Canonical query text
    pub statement: String,
    /// Rendered output selections, in output order
    pub selections: Vec<String>,
    /// Rendered filter
    pub filter: Option<String>,
    /// Grouping column
    pub group_by: Option<String>,
    pub skip: usize,
    /// Take after substituting the cap for zero
    pub take: usize,
    /// Rejection reason (if rejected)
    pub rejection_reason: Option<String>,
    /// Rejection error code (if rejected)
    pub rejection_code: Option<String>,
}

impl ExplainQuery {
    /// Explains a query, validating it first
    pub fn from_query(query: &Query) -> Self {
        let mut explain = Self {
            accepted: true,
            statement: query.canonical(),
            selections: query.output_selections().map(|s| s.to_string()).collect(),
            filter: query.filter.as_ref().map(|f| f.to_string()),
            group_by: query
                .group_by
                .is_grouping()
                .then(|| query.group_by.column.to_string()),
            skip: query.limit.skip,
            take: query.limit.effective_take(),
            rejection_reason: None,
            rejection_code: None,
        };

        if let Err(err) = QueryValidator::validate(query) {
            explain.reject(&err);
        }

        explain
    }

    fn reject(&mut self, err: &QueryError) {
        self.accepted = false;
        self.rejection_reason = Some(err.message().to_string());
        self.rejection_code = Some(err.code().code().to_string());
    }
}

impl fmt::Display for ExplainQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.accepted {
            return write!(
                f,
                "REJECTED {}: {}",
                self.rejection_code.as_deref().unwrap_or("-"),
                self.rejection_reason.as_deref().unwrap_or("-")
            );
        }

        writeln!(f, "ACCEPTED {}", self.statement)?;
        writeln!(f, "  select: {}", self.selections.join(", "))?;
        if let Some(filter) = &self.filter {
            writeln!(f, "  filter: {}", filter)?;
        }
        if let Some(group) = &self.group_by {
            writeln!(f, "  group by: {}", group)?;
        }
        write!(f, "  skip {} take {}", self.skip, self.take)
    }
}
