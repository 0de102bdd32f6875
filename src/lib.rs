pub use crate::ast::{Action, Rule};
pub use crate::engine::{ParseOptions, Parser};
pub use crate::errors::{ErrorCategory, ErrorKind, GrammarError};
pub use crate::runtime::{Getter, Grammar, Position, Token, TokenSource, VecSource};

pub mod ast;
pub mod cli;
pub mod engine;
pub mod errors;
pub mod runtime;
