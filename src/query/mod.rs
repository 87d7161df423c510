//! Query engine for tabquery
//!
//! Evaluates a programmatically built query against an in-memory table.
//!
//! # Pipeline
//!
//! 1. Validate selections against the grouping column
//! 2. Filter rows with the predicate tree (absent filter matches all)
//! 3. Group and aggregate, or project
//! 4. Skip, then take (take 0 means up to 999)
//!
//! # Invariants
//!
//! - Pure: the source table is never modified, output rows are fresh
//! - Deterministic: group order is first-occurrence order of keys
//! - Rejection is all-or-nothing: an invalid query produces no table
//! - A selection on the `None` column produces no output column

mod aggregate;
mod ast;
mod errors;
mod executor;
mod explain;
mod filters;
mod validator;

pub use aggregate::{create_accumulator, div_round_half_even, Accumulator};
pub use ast::{
    Aggregator, Combinator, ComparisonOp, Filter, GroupSpec, Limit, Query, Selection, TAKE_CAP,
};
pub use errors::{QueryError, QueryErrorCode, QueryResult, Severity};
pub use executor::QueryExecutor;
pub use explain::ExplainQuery;
pub use filters::FilterEvaluator;
pub use validator::QueryValidator;
