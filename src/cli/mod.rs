//! The ruleweave Command-Line Interface.
//!
//! A small demo driver: it exercises the engine with the calculator grammar in [`calc`] and is
//! not needed to embed the library.

use std::{path::Path, process, str::FromStr};

use clap::Parser as _;
use log::LevelFilter;

use crate::cli::args::{Command, RuleweaveArgs};
use crate::engine::ParseOptions;
use crate::errors::{self, GrammarError};

pub mod args;
pub mod calc;
pub mod output;

/// Why a subcommand gave up. Each variant knows how to report itself.
enum Failure {
    Lex { input: String, error: calc::LexError },
    Engine(GrammarError),
    NoParse(String),
    Output(String),
}

impl From<GrammarError> for Failure {
    fn from(error: GrammarError) -> Self {
        Failure::Engine(error)
    }
}

impl Failure {
    fn report(self) {
        match self {
            Failure::Lex { input, error } => {
                errors::print_source_error(&error.to_string(), "<expr>", &input, error.offset)
            }
            Failure::Engine(error) => errors::print_error(error),
            Failure::NoParse(input) => output::print_no_parse(&input),
            Failure::Output(message) => eprintln!("Error: {message}"),
        }
    }
}

/// The main entry point for the CLI.
pub fn run() {
    let args = RuleweaveArgs::parse();
    init_logging(args.verbose);

    // Dispatch to the appropriate subcommand handler.
    let result = match args.command {
        Command::Calc {
            expr,
            config,
            max_depth,
        } => handle_calc(&expr, config.as_deref(), max_depth),
        Command::Tokens { expr } => handle_tokens(&expr),
        Command::Grammar => handle_grammar(),
    };

    if let Err(failure) = result {
        failure.report();
        process::exit(1);
    }
}

/// `-v` selects debug, `-vv` trace; without flags `RUST_LOG` decides, defaulting to warnings.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| LevelFilter::from_str(&level).ok())
            .unwrap_or(LevelFilter::Warn),
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    // A logger may already be installed when the CLI is driven from a test harness.
    let _ = simplelog::TermLogger::init(
        level,
        simplelog::ConfigBuilder::new()
            .set_time_format_custom(&[])
            .build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Never,
    );
}

/// Handles the `calc` subcommand.
fn handle_calc(
    expr: &str,
    config: Option<&Path>,
    max_depth: Option<usize>,
) -> Result<(), Failure> {
    let mut options = match config {
        Some(path) => ParseOptions::from_path(path)?,
        None => ParseOptions::default(),
    };
    if let Some(limit) = max_depth {
        options.max_depth = Some(limit);
    }

    let tokens = lex(expr)?;
    let mut parser = calc::calculator(options);
    match calc::evaluate(&mut parser, tokens)? {
        Some(value) => {
            output::print_value(value);
            Ok(())
        }
        None => Err(Failure::NoParse(expr.to_string())),
    }
}

/// Handles the `tokens` subcommand.
fn handle_tokens(expr: &str) -> Result<(), Failure> {
    let tokens = lex(expr)?;
    let json = serde_json::to_string(&tokens).map_err(|e| Failure::Output(e.to_string()))?;
    println!("{json}");
    Ok(())
}

/// Handles the `grammar` subcommand.
fn handle_grammar() -> Result<(), Failure> {
    let parser = calc::calculator(ParseOptions::default());
    let grammar = parser.grammar();
    let rules: Vec<(String, String)> = calc::RULES
        .iter()
        .filter_map(|name| {
            grammar
                .source_rule(name)
                .map(|body| (name.to_string(), body.to_string()))
        })
        .collect();
    output::print_rules(&rules);
    Ok(())
}

fn lex(expr: &str) -> Result<Vec<crate::runtime::source::Token<f64>>, Failure> {
    calc::tokenize(expr).map_err(|error| Failure::Lex {
        input: expr.to_string(),
        error,
    })
}
