//! # Rule Builder
//!
//! Structural combinators for composing [`Rule`]s. Nothing here parses; it only rewrites trees.
//!
//! - `a + b` (or [`seq`]) sequences, `a | b` (or [`alt`]) alternates. Both splice instead of
//!   nesting when an operand already has the same kind, so `a | b | c` is one three-way
//!   `Alternative`, never `Alternative([Alternative([a, b]), c])`.
//! - [`terminate`] requires end of input after its body, [`succeed`] always matches.
//! - [`action`] / [`named_action`] wrap host callbacks.
//!
//! ```rust
//! use ruleweave::ast::builder::{action, sym, terminate};
//! use ruleweave::ast::Rule;
//! use ruleweave::Getter;
//!
//! let add = action(|g: &Getter<i64>| Some(*g.get(1) + *g.get(3)));
//! let sum: Rule<i64> = sym("num") + sym("+") + sym("num") + add;
//! let entry = terminate(sum | sym("num"));
//! assert_eq!(entry.to_string(), "( num + num {action} | num ) $");
//! ```

use std::ops::{Add, BitOr};

use super::{Action, Rule};
use crate::runtime::context::Getter;

/// A reference to a terminal or nonterminal by name.
pub fn sym<V>(name: &str) -> Rule<V> {
    Rule::Ref(name.to_string())
}

/// Matches nothing and always succeeds with `V::default()`.
pub fn succeed<V>() -> Rule<V> {
    Rule::Sequence(Vec::new())
}

pub fn terminate<V>(body: impl Into<Rule<V>>) -> Rule<V> {
    Rule::Terminated(Box::new(body.into()))
}

pub fn action<V, F>(func: F) -> Rule<V>
where
    F: Fn(&Getter<'_, V>) -> Option<V> + 'static,
{
    Rule::Action(Action::new(func))
}

pub fn named_action<V, F>(label: &str, func: F) -> Rule<V>
where
    F: Fn(&Getter<'_, V>) -> Option<V> + 'static,
{
    Rule::Action(Action::labelled(label, func))
}

/// Sequences every operand in order, flattening nested sequences.
pub fn seq<V, I, R>(parts: I) -> Rule<V>
where
    I: IntoIterator<Item = R>,
    R: Into<Rule<V>>,
{
    parts
        .into_iter()
        .map(Into::into)
        .fold(Rule::Sequence(Vec::new()), Rule::then)
}

/// Alternates every operand in order, flattening nested alternatives.
pub fn alt<V, I, R>(parts: I) -> Rule<V>
where
    I: IntoIterator<Item = R>,
    R: Into<Rule<V>>,
{
    parts
        .into_iter()
        .map(Into::into)
        .fold(Rule::Alternative(Vec::new()), Rule::or)
}

impl<V> Rule<V> {
    /// `self` followed by `next`.
    pub fn then(self, next: impl Into<Rule<V>>) -> Rule<V> {
        let mut parts = match self {
            Rule::Sequence(parts) => parts,
            other => vec![other],
        };
        match next.into() {
            Rule::Sequence(tail) => parts.extend(tail),
            other => parts.push(other),
        }
        Rule::Sequence(parts)
    }

    /// `self`, or `other` if `self` fails.
    pub fn or(self, other: impl Into<Rule<V>>) -> Rule<V> {
        let mut parts = match self {
            Rule::Alternative(parts) => parts,
            first => vec![first],
        };
        match other.into() {
            Rule::Alternative(tail) => parts.extend(tail),
            other => parts.push(other),
        }
        Rule::Alternative(parts)
    }
}

impl<V, R: Into<Rule<V>>> Add<R> for Rule<V> {
    type Output = Rule<V>;

    fn add(self, rhs: R) -> Rule<V> {
        self.then(rhs)
    }
}

impl<V, R: Into<Rule<V>>> BitOr<R> for Rule<V> {
    type Output = Rule<V>;

    fn bitor(self, rhs: R) -> Rule<V> {
        self.or(rhs)
    }
}
