//! # Puzzle Errors

use thiserror::Error;

use crate::query::QueryError;

/// Result type for puzzle operations
pub type PuzzleResult<T> = Result<T, PuzzleError>;

/// Puzzle errors
#[derive(Debug, Clone, Error)]
pub enum PuzzleError {
    #[error("Invalid generator settings: {0}")]
    InvalidSettings(String),

    #[error("Unknown difficulty: {0}")]
    UnknownDifficulty(String),

    #[error("Goal query rejected: {0}")]
    InvalidGoal(#[from] QueryError),

    #[error("No non-empty puzzle after {0} attempts")]
    Exhausted(u32),
}

impl PuzzleError {
    /// Stable code for responses
    pub fn code(&self) -> &'static str {
        match self {
            PuzzleError::InvalidSettings(_) => "PUZZLE_INVALID_SETTINGS",
            PuzzleError::UnknownDifficulty(_) => "PUZZLE_UNKNOWN_DIFFICULTY",
            PuzzleError::InvalidGoal(_) => "PUZZLE_INVALID_GOAL",
            PuzzleError::Exhausted(_) => "PUZZLE_EXHAUSTED",
        }
    }
}
