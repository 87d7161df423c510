//! CLI command implementations
//!
//! Every command loads configuration, reads at most one JSON request from
//! stdin and writes exactly one JSON response to stdout.

use std::path::Path;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::observability::{log_event_with_fields, Event, Logger, MetricsRegistry};
use crate::puzzle::{Difficulty, Puzzle, PuzzleGenerator, Verdict};
use crate::query::{ExplainQuery, Query, QueryExecutor};
use crate::table::Table;

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_error, write_response};

/// `run` input
#[derive(Debug, Deserialize)]
pub struct RunRequest {
    pub table: Table,
    pub query: Query,
}

/// `explain` input
#[derive(Debug, Deserialize)]
pub struct ExplainRequest {
    pub query: Query,
}

/// `check` input
#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub table: Table,
    pub goal: Query,
    pub candidate: Query,
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Run { config } => {
            setup(config.as_deref())?;
            let response = run_query(read_request()?)?;
            emit(response)
        }
        Command::Explain { config } => {
            setup(config.as_deref())?;
            let response = explain(read_request()?);
            emit(response)
        }
        Command::Check { config } => {
            setup(config.as_deref())?;
            let response = check(read_request()?)?;
            emit(response)
        }
        Command::Generate {
            config,
            difficulty,
            seed,
        } => {
            let config = setup(config.as_deref())?;
            let seed = seed.unwrap_or_else(rand::random);
            let response = generate(&config, difficulty, seed)?;
            emit(response)
        }
    }
}

/// Loads configuration and applies the log level
fn setup(path: Option<&Path>) -> CliResult<Config> {
    let config = Config::load_or_default(path)?;
    Logger::set_min_severity(config.severity()?);

    let source = path.map_or_else(|| "defaults".to_string(), |p| p.display().to_string());
    log_event_with_fields(Event::ConfigLoaded, &[("source", source.as_str())]);

    Ok(config)
}

/// Command outcome: either `data` for an ok response or a rejection
pub enum Response {
    Ok(Value),
    Rejected { code: String, message: String },
}

fn emit(response: Response) -> CliResult<()> {
    match response {
        Response::Ok(data) => write_response(data),
        Response::Rejected { code, message } => write_error(&code, &message),
    }
}

/// Rejects ragged tables and tables lacking a column a query reads
fn check_table(table: &Table, queries: &[&Query]) -> CliResult<()> {
    let width = table
        .uniform_width()
        .ok_or_else(|| CliError::request_invalid("table rows differ in width"))?;
    if table.is_empty() {
        return Ok(());
    }

    for query in queries {
        for column in query.referenced_columns() {
            if column.slot().map_or(true, |slot| slot >= width) {
                return Err(CliError::request_invalid(format!(
                    "query reads column {} but table rows have {} columns",
                    column, width
                )));
            }
        }
    }
    Ok(())
}

/// Apply a query to a table
pub fn run_query(request: RunRequest) -> CliResult<Response> {
    check_table(&request.table, &[&request.query])?;

    let metrics = MetricsRegistry::new();
    let executor = QueryExecutor::with_metrics(&metrics);

    Ok(match executor.execute(&request.query, &request.table) {
        Ok(result) => Response::Ok(json!({
            "query": request.query.canonical(),
            "rows": result,
            "canonical": result.canonical(),
            "checksum": result.checksum(),
            "metrics": metrics.snapshot(),
        })),
        Err(err) => Response::Rejected {
            code: err.code().code().to_string(),
            message: err.message().to_string(),
        },
    })
}

/// Describe a query without running it
pub fn explain(request: ExplainRequest) -> Response {
    let explain = ExplainQuery::from_query(&request.query);
    log_event_with_fields(
        Event::QueryExplained,
        &[("accepted", if explain.accepted { "true" } else { "false" })],
    );
    Response::Ok(json!(explain))
}

/// Judge a candidate against a goal over the same table
pub fn check(request: CheckRequest) -> CliResult<Response> {
    check_table(&request.table, &[&request.goal, &request.candidate])?;

    let puzzle = match Puzzle::new(request.table, request.goal) {
        Ok(puzzle) => puzzle,
        Err(err) => {
            return Err(CliError::request_invalid(format!("goal query rejected: {}", err)))
        }
    };

    let metrics = MetricsRegistry::new();
    let verdict = puzzle.check_with_metrics(&request.candidate, &metrics);

    Ok(match verdict {
        Verdict::Rejected(err) => Response::Rejected {
            code: err.code().code().to_string(),
            message: err.message().to_string(),
        },
        Verdict::Solved => Response::Ok(json!({
            "verdict": verdict.label(),
            "expected_rows": puzzle.expected().len(),
        })),
        Verdict::Mismatch {
            expected_rows,
            actual_rows,
        } => Response::Ok(json!({
            "verdict": verdict.label(),
            "expected_rows": expected_rows,
            "actual_rows": actual_rows,
        })),
    })
}

/// Generate a puzzle
pub fn generate(config: &Config, difficulty: Difficulty, seed: u64) -> CliResult<Response> {
    let mut generator = PuzzleGenerator::new(config.generator_settings(), seed)?;
    let puzzle = generator.generate(difficulty)?;
    Ok(Response::Ok(json!(puzzle.to_file(difficulty, seed))))
}
