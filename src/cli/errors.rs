//! CLI-specific error types
//!
//! A rejected query is a response, not a CLI error. CLI errors mean the
//! command could not run at all.

use std::fmt;
use std::io;

use crate::puzzle::PuzzleError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout)
    IoError,
    /// Request JSON does not describe the expected input
    RequestInvalid,
    /// Puzzle generation failed
    GenerateFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "TABQUERY_CLI_CONFIG_ERROR",
            Self::IoError => "TABQUERY_CLI_IO_ERROR",
            Self::RequestInvalid => "TABQUERY_CLI_REQUEST_INVALID",
            Self::GenerateFailed => "TABQUERY_CLI_GENERATE_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Malformed request
    pub fn request_invalid(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::RequestInvalid, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Self::io_error(format!("JSON I/O error: {}", e))
        } else {
            Self::request_invalid(format!("Invalid request JSON: {}", e))
        }
    }
}

impl From<PuzzleError> for CliError {
    fn from(e: PuzzleError) -> Self {
        match e {
            PuzzleError::InvalidSettings(_) => Self::config_error(e.to_string()),
            _ => Self::new(CliErrorCode::GenerateFailed, e.to_string()),
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
