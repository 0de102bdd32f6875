//! # Rule Table
//!
//! Maps nonterminal names to their rules. Each entry keeps the body it was defined with and,
//! once compiled, the resolved form; the compiled form is the memoization target of
//! `runtime::compile`. The table never shrinks.
//!
//! [`Grammar`] bundles the table with the declared terminal vocabulary and the diagnostics the
//! compiler has reported so far. It is the single source of truth for a parser and is passed by
//! mutable reference through compilation and execution.

use im::{HashMap, HashSet};

use crate::ast::Rule;
use crate::errors::{ErrorReporting, GrammarError};

pub struct RuleEntry<V> {
    pub source: Rule<V>,
    pub compiled: Option<Rule<V>>,
}

impl<V> Clone for RuleEntry<V> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            compiled: self.compiled.clone(),
        }
    }
}

pub struct RuleTable<V> {
    entries: HashMap<String, RuleEntry<V>>,
}

impl<V> Default for RuleTable<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<V> RuleTable<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&RuleEntry<V>> {
        self.entries.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.keys().cloned().collect();
        names.sort();
        names
    }

    /// Defines or redefines `name`. Returns true if the name already existed.
    pub fn define(&mut self, name: &str, body: Rule<V>) -> bool {
        self.entries
            .insert(
                name.to_string(),
                RuleEntry {
                    source: body,
                    compiled: None,
                },
            )
            .is_some()
    }

    /// Records the compiled form of an existing entry.
    pub fn memoize(&mut self, name: &str, compiled: Rule<V>) {
        if let Some(entry) = self.entries.get_mut(name) {
            entry.compiled = Some(compiled);
        }
    }

    pub fn any_compiled(&self) -> bool {
        self.entries.values().any(|entry| entry.compiled.is_some())
    }

    /// Drops every compiled form so the next lookup recompiles from source.
    pub fn invalidate(&mut self) {
        for (_, entry) in self.entries.iter_mut() {
            entry.compiled = None;
        }
    }
}

/// Terminal vocabulary, rule table and compile diagnostics.
pub struct Grammar<V> {
    terminals: HashSet<String>,
    pub(crate) rules: RuleTable<V>,
    diagnostics: Vec<GrammarError>,
}

impl<V> Grammar<V> {
    pub fn new<I, S>(terminals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terminals: terminals.into_iter().map(Into::<String>::into).collect(),
            rules: RuleTable::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn is_terminal(&self, name: &str) -> bool {
        self.terminals.contains(name)
    }

    pub fn terminals(&self) -> Vec<String> {
        let mut names: Vec<String> = self.terminals.iter().cloned().collect();
        names.sort();
        names
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.rules.has(name)
    }

    pub fn is_compiled(&self, name: &str) -> bool {
        self.rules
            .get(name)
            .is_some_and(|entry| entry.compiled.is_some())
    }

    pub fn rule_names(&self) -> Vec<String> {
        self.rules.names()
    }

    pub fn source_rule(&self, name: &str) -> Option<&Rule<V>> {
        self.rules.get(name).map(|entry| &entry.source)
    }

    pub fn compiled_rule(&self, name: &str) -> Option<&Rule<V>> {
        self.rules.get(name).and_then(|entry| entry.compiled.as_ref())
    }

    /// Associates `name` with `body`. Any change to the table discards every memoized
    /// compilation: compiled rules may have inlined the old body, or a failing stand-in for a
    /// name that was undefined when they were compiled.
    pub fn define(&mut self, name: &str, body: Rule<V>) {
        let redefined = self.rules.define(name, body);
        if redefined || self.rules.any_compiled() {
            log::debug!("rule '{name}' defined after compilation; invalidating compiled rules");
            self.rules.invalidate();
        } else {
            log::debug!("rule '{name}' defined");
        }
        if self.terminals.contains(name) {
            log::warn!("rule '{name}' is shadowed by the terminal of the same name");
        }
    }

    pub fn diagnostics(&self) -> &[GrammarError] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<GrammarError> {
        std::mem::take(&mut self.diagnostics)
    }

    pub(crate) fn record(&mut self, error: GrammarError) {
        log::warn!("{error}");
        self.diagnostics.push(error);
    }
}

impl<V> ErrorReporting for Grammar<V> {
    fn phase(&self) -> &'static str {
        "compile"
    }
}
