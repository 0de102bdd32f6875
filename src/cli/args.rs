//! Defines the command-line arguments and subcommands for the ruleweave demo driver.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "ruleweave",
    version,
    about = "Runs a sample arithmetic grammar on the ruleweave engine."
)]
pub struct RuleweaveArgs {
    /// Log verbosity: -v for debug, -vv for trace. Overrides RUST_LOG.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate an arithmetic expression.
    Calc {
        /// The expression, e.g. "2 * (3 + 4)".
        #[arg(required = true, allow_hyphen_values = true)]
        expr: String,
        /// A JSON or YAML file with parse options.
        #[arg(long)]
        config: Option<PathBuf>,
        /// Abort once rules nest deeper than this.
        #[arg(long)]
        max_depth: Option<usize>,
    },
    /// Print the token stream of an expression as JSON.
    Tokens {
        #[arg(required = true, allow_hyphen_values = true)]
        expr: String,
    },
    /// Print the calculator grammar.
    Grammar,
}
