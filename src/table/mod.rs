//! Table subsystem for tabquery
//!
//! Fixed-schema, in-memory integer tables.
//!
//! # Invariants
//!
//! - Row order is significant and part of equality
//! - Column lookups never panic; absent columns yield `None`
//! - Two tables are equal iff their canonical forms are equal

mod column;
mod row;
mod table;

pub use column::{Column, DATA_COLUMNS};
pub use row::Row;
pub use table::Table;
