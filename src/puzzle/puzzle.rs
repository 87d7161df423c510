//! Puzzles: a source table, a goal query and its expected result
//!
//! A candidate query solves a puzzle when its result has the same canonical
//! form as the goal's result. The queries themselves are never compared.

use serde::{Deserialize, Serialize};

use crate::observability::{log_event, log_event_with_fields, Event, MetricsRegistry};
use crate::query::{Query, QueryError, QueryExecutor, QueryResult};
use crate::table::Table;

use super::generator::Difficulty;

/// Outcome of checking a candidate query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Candidate result equals the expected result
    Solved,
    /// Candidate ran but produced a different table
    Mismatch {
        /// Expected row count, when the expected table is known
        expected_rows: Option<usize>,
        actual_rows: usize,
    },
    /// Candidate failed shape validation
    Rejected(QueryError),
}

impl Verdict {
    pub fn is_solved(&self) -> bool {
        matches!(self, Verdict::Solved)
    }

    /// Short label for responses and logs
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Solved => "solved",
            Verdict::Mismatch { .. } => "mismatch",
            Verdict::Rejected(_) => "rejected",
        }
    }
}

/// A table with a goal query whose result the player must reproduce
#[derive(Debug, Clone)]
pub struct Puzzle {
    table: Table,
    goal: Query,
    expected: Table,
}

impl Puzzle {
    /// Creates a puzzle, computing the goal result.
    ///
    /// Fails if the goal itself is rejected.
    pub fn new(table: Table, goal: Query) -> QueryResult<Self> {
        let expected = goal.apply(&table)?;
        Ok(Self {
            table,
            goal,
            expected,
        })
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn goal(&self) -> &Query {
        &self.goal
    }

    /// Result of the goal query
    pub fn expected(&self) -> &Table {
        &self.expected
    }

    /// Checks a candidate query against the goal result
    pub fn check(&self, candidate: &Query) -> Verdict {
        self.check_with(candidate, &QueryExecutor::new(), None)
    }

    /// Checks a candidate query, recording counters into `metrics`
    pub fn check_with_metrics(&self, candidate: &Query, metrics: &MetricsRegistry) -> Verdict {
        self.check_with(candidate, &QueryExecutor::with_metrics(metrics), Some(metrics))
    }

    fn check_with(
        &self,
        candidate: &Query,
        executor: &QueryExecutor<'_>,
        metrics: Option<&MetricsRegistry>,
    ) -> Verdict {
        let verdict = match executor.execute(candidate, &self.table) {
            Err(err) => Verdict::Rejected(err),
            Ok(actual) if actual.same_result(&self.expected) => Verdict::Solved,
            Ok(actual) => Verdict::Mismatch {
                expected_rows: Some(self.expected.len()),
                actual_rows: actual.len(),
            },
        };

        record_verdict(&verdict, metrics);
        verdict
    }

    /// Portable description of this puzzle that hides the goal's result
    pub fn to_file(&self, difficulty: Difficulty, seed: u64) -> PuzzleFile {
        PuzzleFile {
            difficulty,
            seed,
            table: self.table.clone(),
            goal: self.goal.canonical(),
            expected_rows: self.expected.len(),
            expected_checksum: self.expected.checksum(),
        }
    }
}

/// Serialized puzzle handed to a player.
///
/// Carries the goal as text and the expected result only as a row count and
/// checksum, so a candidate can be verified without revealing the answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleFile {
    pub difficulty: Difficulty,
    pub seed: u64,
    pub table: Table,
    pub goal: String,
    pub expected_rows: usize,
    pub expected_checksum: u32,
}

impl PuzzleFile {
    /// Verifies a candidate against the stored row count and checksum.
    ///
    /// CRC32 is not collision resistant: a wrong result with the expected row
    /// count and a colliding checksum verifies as solved. Use `Puzzle::check`
    /// when the expected table is at hand.
    pub fn verify(&self, candidate: &Query) -> Verdict {
        self.verify_with(candidate, &QueryExecutor::new(), None)
    }

    /// Verifies a candidate, recording counters into `metrics`
    pub fn verify_with_metrics(&self, candidate: &Query, metrics: &MetricsRegistry) -> Verdict {
        self.verify_with(candidate, &QueryExecutor::with_metrics(metrics), Some(metrics))
    }

    fn verify_with(
        &self,
        candidate: &Query,
        executor: &QueryExecutor<'_>,
        metrics: Option<&MetricsRegistry>,
    ) -> Verdict {
        let verdict = match executor.execute(candidate, &self.table) {
            Err(err) => Verdict::Rejected(err),
            Ok(actual)
                if actual.len() == self.expected_rows
                    && actual.checksum() == self.expected_checksum =>
            {
                Verdict::Solved
            }
            Ok(actual) => Verdict::Mismatch {
                expected_rows: Some(self.expected_rows),
                actual_rows: actual.len(),
            },
        };

        record_verdict(&verdict, metrics);
        verdict
    }
}

fn record_verdict(verdict: &Verdict, metrics: Option<&MetricsRegistry>) {
    if let Some(metrics) = metrics {
        metrics.increment_puzzles_checked();
        if verdict.is_solved() {
            metrics.increment_puzzles_solved();
        }
    }

    log_event_with_fields(Event::PuzzleChecked, &[("verdict", verdict.label())]);
    if verdict.is_solved() {
        log_event(Event::PuzzleSolved);
    }
}
