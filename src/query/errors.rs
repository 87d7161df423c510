//! Query error types
//!
//! Error codes:
//! - QUERY_AGGREGATE_OR_GROUP_REQUIRED (REJECT)
//! - QUERY_AGGREGATE_WITHOUT_GROUPING (REJECT)
//!
//! Both are configuration errors: they depend only on the query's shape,
//! never on table contents, and are raised before any output is produced.

use std::fmt;

/// Severity levels for query errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Query rejected; the engine is unaffected
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

/// Query-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorCode {
    /// Grouping is active and a selection neither aggregates nor names the group column
    AggregateOrGroupRequired,
    /// Grouping is inactive and a selection aggregates
    AggregateWithoutGrouping,
}

impl QueryErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            QueryErrorCode::AggregateOrGroupRequired => "QUERY_AGGREGATE_OR_GROUP_REQUIRED",
            QueryErrorCode::AggregateWithoutGrouping => "QUERY_AGGREGATE_WITHOUT_GROUPING",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }

    /// Returns true for errors caused by the query's configuration
    pub fn is_configuration_error(&self) -> bool {
        match self {
            QueryErrorCode::AggregateOrGroupRequired => true,
            QueryErrorCode::AggregateWithoutGrouping => true,
        }
    }
}

impl fmt::Display for QueryErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Query error type with full context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    /// Error code
    code: QueryErrorCode,
    /// Human-readable message
    message: String,
    /// Position of the offending selection
    selection: Option<usize>,
}

impl QueryError {
    /// Create an aggregate-or-group-column required error
    pub fn aggregate_or_group_required(selection: usize) -> Self {
        Self {
            code: QueryErrorCode::AggregateOrGroupRequired,
            message: "must aggregate or group on each selection when grouping".into(),
            selection: Some(selection),
        }
    }

    /// Create an aggregation-without-grouping error
    pub fn aggregate_without_grouping(selection: usize) -> Self {
        Self {
            code: QueryErrorCode::AggregateWithoutGrouping,
            message: "must not aggregate when not grouping".into(),
            selection: Some(selection),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> QueryErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the offending selection position, if applicable
    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    /// Returns whether this is a configuration error
    pub fn is_configuration_error(&self) -> bool {
        self.code.is_configuration_error()
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(selection) = self.selection {
            write!(f, " (selection {})", selection)?;
        }
        Ok(())
    }
}

impl std::error::Error for QueryError {}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;
