//! CLI argument definitions using clap
//!
//! Commands:
//! - tabquery run [--config <path>]
//! - tabquery explain [--config <path>]
//! - tabquery check [--config <path>]
//! - tabquery generate --difficulty <level> [--seed <n>] [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::puzzle::Difficulty;

/// tabquery - A miniature, deterministic relational query engine
#[derive(Parser, Debug)]
#[command(name = "tabquery")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Apply a query to a table read from stdin
    Run {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Describe a query read from stdin without running it
    Explain {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Judge a candidate query against a goal query over the same table
    Check {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Generate a puzzle
    Generate {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Puzzle difficulty: easy, medium or hard
        #[arg(long, default_value = "easy")]
        difficulty: Difficulty,

        /// Random seed; drawn at random when omitted
        #[arg(long)]
        seed: Option<u64>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
