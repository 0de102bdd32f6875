//! Ruleweave Error Handling
//!
//! One error type, [`GrammarError`], carries an [`ErrorKind`] plus the phase that produced it.
//! Ordinary parse failure is *not* an error: it is the `Ok(None)` outcome of a parse and never
//! passes through this module.
//!
//! ## Taxonomy
//!
//! - `UndefinedSymbol`: a rule reference names neither a terminal nor a nonterminal. Reported
//!   during compilation, recorded on the grammar, never aborts a parse.
//! - `RecursionLimit`: the opt-in depth guard of [`crate::engine::ParseOptions`] was exceeded.
//! - `ActionContract`: an action read a getter index outside its frame.
//! - `InvalidOptions`: parse options could not be loaded.

use miette::{Diagnostic, NamedSource, Report};
use std::fmt;
use thiserror::Error;

// ============================================================================
// ERROR KINDS
// ============================================================================

/// All error kinds as a clean enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("undefined symbol '{symbol}'{}", from_clause(.referenced_from))]
    UndefinedSymbol {
        symbol: String,
        referenced_from: Option<String>,
    },

    #[error("recursion limit of {limit} exceeded")]
    RecursionLimit { limit: usize },

    #[error("getter index {index} is outside the current frame of {frame_len} value(s)")]
    ActionContract { index: usize, frame_len: usize },

    #[error("invalid parse options: {message}")]
    InvalidOptions { message: String },
}

fn from_clause(referenced_from: &Option<String>) -> String {
    match referenced_from {
        Some(rule) => format!(" referenced from rule '{rule}'"),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Grammar,
    Runtime,
    Contract,
    Config,
}

impl ErrorKind {
    /// Get the error category for test assertions
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UndefinedSymbol { .. } => ErrorCategory::Grammar,
            Self::RecursionLimit { .. } => ErrorCategory::Runtime,
            Self::ActionContract { .. } => ErrorCategory::Contract,
            Self::InvalidOptions { .. } => ErrorCategory::Config,
        }
    }

    /// Get error code suffix for diagnostic codes
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::UndefinedSymbol { .. } => "undefined_symbol",
            Self::RecursionLimit { .. } => "recursion_limit",
            Self::ActionContract { .. } => "action_contract",
            Self::InvalidOptions { .. } => "invalid_options",
        }
    }
}

// ============================================================================
// THE ERROR TYPE
// ============================================================================

/// The engine's error type: what went wrong, in which phase, and how to fix it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct GrammarError {
    pub kind: ErrorKind,
    /// `compile`, `execute` or `config`.
    pub phase: &'static str,
    pub help: Option<String>,
}

impl GrammarError {
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    pub fn error_code(&self) -> String {
        format!("ruleweave::{}::{}", self.phase, self.kind.code_suffix())
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl Diagnostic for GrammarError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.error_code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }
}

// ============================================================================
// CONTEXT-AWARE CONSTRUCTION
// ============================================================================

/// Each phase knows how to create its errors; nothing else builds a `GrammarError` by hand.
pub trait ErrorReporting {
    fn phase(&self) -> &'static str;

    fn report(&self, kind: ErrorKind) -> GrammarError {
        GrammarError {
            kind,
            phase: self.phase(),
            help: None,
        }
    }

    fn undefined_symbol(&self, symbol: &str, referenced_from: Option<&str>) -> GrammarError {
        self.report(ErrorKind::UndefinedSymbol {
            symbol: symbol.into(),
            referenced_from: referenced_from.map(Into::into),
        })
        .with_help("declare it as a terminal or define a rule with this name")
    }

    fn recursion_limit(&self, limit: usize) -> GrammarError {
        self.report(ErrorKind::RecursionLimit { limit }).with_help(
            "left-recursive rules never consume input before recursing; rewrite them right-recursively",
        )
    }

    fn action_contract(&self, index: usize, frame_len: usize) -> GrammarError {
        self.report(ErrorKind::ActionContract { index, frame_len })
    }

    fn invalid_options(&self, message: impl Into<String>) -> GrammarError {
        self.report(ErrorKind::InvalidOptions {
            message: message.into(),
        })
    }
}

/// Reporter for option loading, which has no grammar or parse state to hang off.
pub struct ConfigPhase;

impl ErrorReporting for ConfigPhase {
    fn phase(&self) -> &'static str {
        "config"
    }
}

// ============================================================================
// ERROR FORMATTING UTILITIES
// ============================================================================

/// Prints a `GrammarError` with full miette diagnostics.
pub fn print_error(error: GrammarError) {
    let report = Report::new(error);
    eprintln!("{report:?}");
}

/// Prints a diagnostic pointing into a piece of source text, e.g. a lexing failure in the CLI.
pub fn print_source_error(message: &str, source_name: &str, source: &str, offset: usize) {
    let report = miette::miette!(
        labels = vec![miette::LabeledSpan::at_offset(offset, "here")],
        "{}",
        message
    )
    .with_source_code(NamedSource::new(source_name, source.to_string()));
    eprintln!("{report:?}");
}
