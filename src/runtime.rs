//! Runtime module for the grammar engine
//!
//! - `source`: the token source contract and an in-memory implementation.
//! - `context`: per-parse value stack, frames and the getter handed to actions.
//! - `registry`: the rule table and the grammar that owns it.
//! - `compile`: lazy, cycle-safe resolution of rule references.
//! - `eval`: the backtracking interpreter.

pub mod compile;
pub mod context;
pub mod eval;
pub mod registry;
pub mod source;

pub use context::{Frame, Getter, ParseContext};
pub use eval::{Interpreter, Outcome};
pub use registry::{Grammar, RuleEntry, RuleTable};
pub use source::{Position, Token, TokenSource, VecSource};
