//! Observable events for tabquery
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,

    // Query operations
    /// Query applied to a table
    QueryApplied,
    /// Query failed shape validation
    QueryRejected,
    /// Query explained
    QueryExplained,

    // Puzzle operations
    /// Puzzle table and goal generated
    PuzzleGenerated,
    /// Candidate query checked against a goal
    PuzzleChecked,
    /// Candidate result matched the goal result
    PuzzleSolved,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::QueryApplied => "QUERY_APPLIED",
            Event::QueryRejected => "QUERY_REJECTED",
            Event::QueryExplained => "QUERY_EXPLAINED",
            Event::PuzzleGenerated => "PUZZLE_GENERATED",
            Event::PuzzleChecked => "PUZZLE_CHECKED",
            Event::PuzzleSolved => "PUZZLE_SOLVED",
        }
    }

    /// Returns true for events reporting a rejected input
    pub fn is_rejection(&self) -> bool {
        matches!(self, Event::QueryRejected)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
