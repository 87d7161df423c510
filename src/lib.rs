//! tabquery - A miniature, deterministic relational query engine
//!
//! Evaluates programmatically built queries (projection, filter tree,
//! grouping with aggregation, skip/take) over fixed-schema integer tables.

pub mod cli;
pub mod observability;
pub mod puzzle;
pub mod query;
pub mod table;
