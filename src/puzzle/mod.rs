//! Puzzle subsystem for tabquery
//!
//! Builds on the query engine: generates a seeded table and goal query per
//! difficulty, and judges candidate queries by comparing canonical results.
//!
//! # Invariants
//!
//! - Generated goals always pass shape validation
//! - Generated goals always produce at least one row
//! - A candidate is judged only by its result, never by its query text

mod errors;
mod generator;
mod puzzle;

pub use errors::{PuzzleError, PuzzleResult};
pub use generator::{Difficulty, GeneratorSettings, PuzzleGenerator, VALUE_LIMIT};
pub use puzzle::{Puzzle, PuzzleFile, Verdict};
