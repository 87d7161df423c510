//! Metrics registry for tabquery
//!
//! - Counters only
//! - Monotonic increase
//! - Thread-safe, relaxed ordering

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters
///
/// All counters use relaxed atomics; the registry can be shared across
/// threads running independent queries.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Queries that produced a table
    queries_applied: AtomicU64,
    /// Queries rejected by shape validation
    queries_rejected: AtomicU64,
    /// Source rows read
    rows_scanned: AtomicU64,
    /// Rows in returned tables
    rows_returned: AtomicU64,
    /// Groups formed by grouped queries
    groups_formed: AtomicU64,
    /// Candidate queries checked against a goal
    puzzles_checked: AtomicU64,
    /// Candidate queries whose result matched
    puzzles_solved: AtomicU64,
}

impl MetricsRegistry {
    /// Create a new metrics registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    // Query metrics

    pub fn increment_queries_applied(&self) {
        self.queries_applied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries_rejected(&self) {
        self.queries_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_rows_scanned(&self, rows: u64) {
        self.rows_scanned.fetch_add(rows, Ordering::Relaxed);
    }

    pub fn add_rows_returned(&self, rows: u64) {
        self.rows_returned.fetch_add(rows, Ordering::Relaxed);
    }

    pub fn add_groups_formed(&self, groups: u64) {
        self.groups_formed.fetch_add(groups, Ordering::Relaxed);
    }

    // Puzzle metrics

    pub fn increment_puzzles_checked(&self) {
        self.puzzles_checked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_puzzles_solved(&self) {
        self.puzzles_solved.fetch_add(1, Ordering::Relaxed);
    }

    /// Get all metrics as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queries_applied: self.queries_applied.load(Ordering::Relaxed),
            queries_rejected: self.queries_rejected.load(Ordering::Relaxed),
            rows_scanned: self.rows_scanned.load(Ordering::Relaxed),
            rows_returned: self.rows_returned.load(Ordering::Relaxed),
            groups_formed: self.groups_formed.load(Ordering::Relaxed),
            puzzles_checked: self.puzzles_checked.load(Ordering::Relaxed),
            puzzles_solved: self.puzzles_solved.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub queries_applied: u64,
    pub queries_rejected: u64,
    pub rows_scanned: u64,
    pub rows_returned: u64,
    pub groups_formed: u64,
    pub puzzles_checked: u64,
    pub puzzles_solved: u64,
}
