//! CLI module for tabquery
//!
//! Provides command-line interface for:
//! - run: apply a query to a table
//! - explain: describe a query
//! - check: judge a candidate query against a goal
//! - generate: produce a seeded puzzle

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    check, explain, generate, run, run_command, run_query, CheckRequest, ExplainRequest,
    Response, RunRequest,
};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{parse_request, read_request, write_error, write_response};
