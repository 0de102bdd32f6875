use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    ast::Rule,
    errors::{ConfigPhase, ErrorReporting, GrammarError},
    runtime::{
        context::ParseContext, eval::Interpreter, registry::Grammar, source::TokenSource,
    },
};

// ============================================================================
// PARSE OPTIONS - Per-parser settings, loadable from JSON or YAML
// ============================================================================

/// Knobs applied to every parse run by a [`Parser`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParseOptions {
    /// Abort with a recursion-limit error past this many nested rule executions. Unset by
    /// default, in which case a left-recursive grammar overflows the native stack.
    pub max_depth: Option<usize>,
    /// Initial capacity of the value stack.
    pub stack_capacity: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: None,
            stack_capacity: 64,
        }
    }
}

impl ParseOptions {
    pub fn from_json_str(text: &str) -> Result<Self, GrammarError> {
        serde_json::from_str(text).map_err(|e| ConfigPhase.invalid_options(e.to_string()))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, GrammarError> {
        serde_yaml::from_str(text).map_err(|e| ConfigPhase.invalid_options(e.to_string()))
    }

    /// Loads options from a `.json`, `.yaml` or `.yml` file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, GrammarError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ConfigPhase.invalid_options(format!("cannot read {}: {e}", path.display()))
        })?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&text),
            Some("yaml" | "yml") => Self::from_yaml_str(&text),
            _ => Err(ConfigPhase
                .invalid_options(format!("unsupported options file {}", path.display()))
                .with_help("use a .json, .yaml or .yml file")),
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

// ============================================================================
// PARSER - Grammar construction and top-level parse runs
// ============================================================================

/// A grammar plus the options its parses run with.
///
/// ```rust
/// use ruleweave::ast::builder::{action, alt, sym, terminate};
/// use ruleweave::{Getter, Parser, Rule, Token, VecSource};
///
/// let mut parser: Parser<i64> = Parser::new(["num", "+"]);
/// parser.rule(
///     "sum",
///     alt([
///         sym("num") + "+" + "sum" + action(|g: &Getter<i64>| Some(g.get(1) + g.get(3))),
///         sym("num"),
///     ]),
/// );
///
/// let mut tokens = VecSource::new(vec![
///     Token::new("num", 1),
///     Token::new("+", 0),
///     Token::new("num", 2),
/// ]);
/// let entry: Rule<i64> = terminate(sym("sum"));
/// assert_eq!(parser.parse(entry, &mut tokens).unwrap(), Some(3));
/// ```
pub struct Parser<V> {
    grammar: Grammar<V>,
    options: ParseOptions,
}

impl<V: Clone + Default> Parser<V> {
    /// Declares the terminal vocabulary. Every other name must be defined with [`Parser::rule`].
    pub fn new<I, S>(terminals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            grammar: Grammar::new(terminals),
            options: ParseOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn set_options(&mut self, options: ParseOptions) {
        self.options = options;
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Defines the nonterminal `name`. A string body is a reference to another symbol.
    pub fn rule(&mut self, name: &str, body: impl Into<Rule<V>>) -> &mut Self {
        self.grammar.define(name, body.into());
        self
    }

    /// Runs `entry` against `source` with a fresh value stack.
    ///
    /// `Ok(None)` is an ordinary failed parse. An `Err` is only returned when the configured
    /// recursion limit is exceeded. Undefined symbols do not abort; see [`Parser::diagnostics`].
    pub fn parse(
        &mut self,
        entry: impl Into<Rule<V>>,
        source: &mut dyn TokenSource<V>,
    ) -> Result<Option<V>, GrammarError> {
        let entry = self.grammar.compile(&entry.into());
        let mut context = ParseContext::new(self.options.stack_capacity, self.options.max_depth);
        log::debug!("parse started at {entry}");

        let outcome = Interpreter::new(&mut self.grammar, source, &mut context).execute(&entry);

        match &outcome {
            Ok(Some(_)) => log::debug!("parse succeeded"),
            Ok(None) => log::debug!("parse failed"),
            Err(err) => log::debug!("parse aborted: {err}"),
        }
        outcome
    }

    /// Compiles `name` eagerly and returns its compiled form.
    pub fn compile_rule(&mut self, name: &str) -> Rule<V> {
        self.grammar.resolve(name)
    }

    /// Undefined-symbol reports accumulated since the parser was built.
    pub fn diagnostics(&self) -> &[GrammarError] {
        self.grammar.diagnostics()
    }

    pub fn take_diagnostics(&mut self) -> Vec<GrammarError> {
        self.grammar.take_diagnostics()
    }

    pub fn grammar(&self) -> &Grammar<V> {
        &self.grammar
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options_leave_recursion_unbounded() {
        let options = ParseOptions::default();
        assert_eq!(options.max_depth, None);
        assert_eq!(options.stack_capacity, 64);
    }

    #[test]
    fn partial_option_files_keep_defaults() {
        let options = ParseOptions::from_json_str(r#"{"max_depth": 10}"#).unwrap();
        assert_eq!(options, ParseOptions::default().with_max_depth(10));
    }

    #[test]
    fn unknown_option_fields_are_rejected() {
        let err = ParseOptions::from_yaml_str("max_dept: 3\n").unwrap_err();
        assert_eq!(err.error_code(), "ruleweave::config::invalid_options");
    }
}
