//! # Rule Compilation
//!
//! Rewrites a rule tree so that it can be executed without looking names up on every visit.
//!
//! - A reference to a declared terminal becomes a `Terminal`.
//! - A reference to a nonterminal becomes that nonterminal's compiled body, wrapped in a `Scope`
//!   unless it is already self-scoping. The result is written back into the table and every later
//!   reference reuses it.
//! - A reference to a nonterminal that is still being compiled further up the call chain stays a
//!   `Ref`. The interpreter resolves it through the table when it is reached, by which point the
//!   entry is compiled. This is what keeps recursive grammars finite.
//! - A reference to an unknown name is reported and replaced by a rule that always fails.
//!
//! Each top-level call starts with an empty visited set. Names are never removed from the set
//! during one call, so a name is compiled at most once per call and at most once per table
//! generation overall.

use std::collections::HashSet;
use std::rc::Rc;

use crate::ast::Rule;
use crate::errors::ErrorReporting;
use crate::runtime::registry::{Grammar, RuleEntry};

impl<V> Grammar<V> {
    /// Compiles a standalone rule, such as a parse entry, against the table.
    pub fn compile(&mut self, rule: &Rule<V>) -> Rule<V> {
        let mut compiled = rule.clone();
        let mut visited = HashSet::new();
        self.compile_in_place(&mut compiled, &mut visited);
        compiled
    }

    /// Compiles `rule` in place, threading `visited` through every nested reference.
    pub fn compile_in_place(&mut self, rule: &mut Rule<V>, visited: &mut HashSet<String>) {
        self.compile_node(rule, visited, None);
    }

    /// The executable form of `name`: a terminal, the memoized compilation of a nonterminal, or
    /// the failing rule if `name` is unknown.
    pub fn resolve(&mut self, name: &str) -> Rule<V> {
        let mut visited = HashSet::new();
        self.resolve_ref(name, &mut visited, None)
            .unwrap_or_else(|| Rule::Ref(name.to_string()))
    }

    fn compile_node(
        &mut self,
        rule: &mut Rule<V>,
        visited: &mut HashSet<String>,
        owner: Option<&str>,
    ) {
        match rule {
            Rule::Ref(name) => {
                let name = name.clone();
                if let Some(resolved) = self.resolve_ref(&name, visited, owner) {
                    *rule = resolved;
                }
            }
            Rule::Sequence(parts) | Rule::Alternative(parts) => {
                for part in parts.iter_mut() {
                    self.compile_node(part, visited, owner);
                }
            }
            Rule::Terminated(body) => self.compile_node(body, visited, owner),
            Rule::Terminal(_) | Rule::Action(_) | Rule::Scope(_) => {}
        }
    }

    /// `None` means `name` is mid-compilation and the reference must stay symbolic.
    fn resolve_ref(
        &mut self,
        name: &str,
        visited: &mut HashSet<String>,
        owner: Option<&str>,
    ) -> Option<Rule<V>> {
        if self.is_terminal(name) {
            return Some(Rule::Terminal(name.to_string()));
        }

        let source = match self.rules.get(name) {
            Some(RuleEntry {
                compiled: Some(compiled),
                ..
            }) => return Some(compiled.clone()),
            Some(entry) => entry.source.clone(),
            None => {
                let error = self.undefined_symbol(name, owner);
                self.record(error);
                return Some(Rule::fail());
            }
        };

        if !visited.insert(name.to_string()) {
            return None;
        }

        let mut body = source;
        self.compile_node(&mut body, visited, Some(name));
        let compiled = if body.is_self_scoping() {
            body
        } else {
            Rule::Scope(Rc::new(body))
        };

        log::debug!("compiled rule '{name}' as {compiled}");
        self.rules.memoize(name, compiled.clone());
        Some(compiled)
    }
}
