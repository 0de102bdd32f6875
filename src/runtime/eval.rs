//! # Rule Execution
//!
//! A backtracking recursive-descent interpreter over compiled (or partially compiled) rules.
//!
//! Every rule returns an [`Outcome`]: `Ok(Some(value))` on success, `Ok(None)` on ordinary parse
//! failure, `Err(_)` only for engine faults (the opt-in recursion limit). Side effects are
//! confined to the value stack in [`ParseContext`] and the position of the token source.
//!
//! ## Rollback
//!
//! Only `Alternative` restores state. A failing `Sequence` leaves whatever it consumed and pushed
//! in place; the nearest enclosing alternative (or the caller of the parse) rewinds both the token
//! position and the stack pointer to the mark taken before the failed attempt.

use crate::ast::Rule;
use crate::errors::GrammarError;
use crate::runtime::context::ParseContext;
use crate::runtime::registry::Grammar;
use crate::runtime::source::TokenSource;

pub type Outcome<V> = Result<Option<V>, GrammarError>;

// ============================================================================
// CORE DATA STRUCTURES: Interpreter
// ============================================================================

/// Everything one execution needs, borrowed for the duration of a single parse.
pub struct Interpreter<'a, V> {
    pub grammar: &'a mut Grammar<V>,
    pub source: &'a mut dyn TokenSource<V>,
    pub context: &'a mut ParseContext<V>,
}

impl<'a, V: Clone + Default> Interpreter<'a, V> {
    pub fn new(
        grammar: &'a mut Grammar<V>,
        source: &'a mut dyn TokenSource<V>,
        context: &'a mut ParseContext<V>,
    ) -> Self {
        Self {
            grammar,
            source,
            context,
        }
    }

    /// Executes `rule` against the current token position and value stack.
    pub fn execute(&mut self, rule: &Rule<V>) -> Outcome<V> {
        self.context.descend()?;
        let outcome = self.dispatch(rule);
        self.context.ascend();
        outcome
    }

    fn dispatch(&mut self, rule: &Rule<V>) -> Outcome<V> {
        match rule {
            Rule::Ref(name) => {
                let resolved = self.grammar.resolve(name);
                self.execute(&resolved)
            }
            Rule::Terminal(name) => Ok(self.match_terminal(name)),
            Rule::Scope(body) => self.execute_scope(body),
            Rule::Sequence(parts) => self.execute_sequence(parts),
            Rule::Alternative(parts) => self.execute_alternative(parts),
            Rule::Action(action) => {
                let value = action.invoke(&self.context.getter());
                if let Some(value) = &value {
                    self.context.push(value.clone());
                }
                Ok(value)
            }
            Rule::Terminated(body) => {
                let value = self.execute(body)?;
                if value.is_some() && !self.source.done() {
                    log::trace!("input remains after a terminated rule");
                    return Ok(None);
                }
                Ok(value)
            }
        }
    }

    // ========================================================================
    // PER-KIND EXECUTION
    // ========================================================================

    /// A mismatch leaves the token unconsumed.
    fn match_terminal(&mut self, name: &str) -> Option<V> {
        let mark = self.source.tell();
        match self.source.next_token() {
            Some(token) if token.name == name => {
                self.context.push(token.value.clone());
                Some(token.value)
            }
            Some(token) => {
                log::trace!("expected '{name}', found '{}'", token.name);
                self.source.seek(mark);
                None
            }
            None => {
                log::trace!("expected '{name}', found end of input");
                None
            }
        }
    }

    fn execute_scope(&mut self, body: &Rule<V>) -> Outcome<V> {
        let saved = self.context.open_frame();
        let outcome = self.execute(body);
        self.context.close_frame(saved);
        let value = outcome?;
        if let Some(value) = &value {
            self.context.push(value.clone());
        }
        Ok(value)
    }

    fn execute_sequence(&mut self, parts: &[Rule<V>]) -> Outcome<V> {
        let mut last = Some(V::default());
        for part in parts {
            last = self.execute(part)?;
            if last.is_none() {
                break;
            }
        }
        Ok(last)
    }

    fn execute_alternative(&mut self, parts: &[Rule<V>]) -> Outcome<V> {
        let stack_mark = self.context.stack_pointer();
        let position = self.source.tell();
        for (index, part) in parts.iter().enumerate() {
            if let Some(value) = self.execute(part)? {
                return Ok(Some(value));
            }
            log::trace!(
                "alternative {} of {} failed; rolling back to token {}",
                index + 1,
                parts.len(),
                position.index()
            );
            self.context.rollback(stack_mark);
            self.source.seek(position);
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder::{action, alt, sym, terminate};
    use crate::runtime::context::Getter;
    use crate::runtime::source::{Token, VecSource};

    fn tokens(names: &[&str]) -> VecSource<i64> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| Token::new(*name, i as i64 + 1))
            .collect()
    }

    fn run(
        grammar: &mut Grammar<i64>,
        rule: &Rule<i64>,
        source: &mut VecSource<i64>,
    ) -> Option<i64> {
        let mut ctx = ParseContext::new(8, None);
        let compiled = grammar.compile(rule);
        Interpreter::new(grammar, source, &mut ctx)
            .execute(&compiled)
            .unwrap()
    }

    #[test]
    fn terminal_consumes_exactly_one_token() {
        let mut g: Grammar<i64> = Grammar::new(["a", "b"]);
        let mut src = tokens(&["a", "b"]);
        assert_eq!(run(&mut g, &sym("a"), &mut src), Some(1));
        assert_eq!(src.tell().index(), 1);
    }

    #[test]
    fn terminal_mismatch_keeps_position() {
        let mut g: Grammar<i64> = Grammar::new(["a", "b"]);
        let mut src = tokens(&["b"]);
        assert_eq!(run(&mut g, &sym("a"), &mut src), None);
        assert_eq!(src.tell().index(), 0);
    }

    #[test]
    fn empty_sequence_succeeds_with_default() {
        let mut g: Grammar<i64> = Grammar::new(["a"]);
        let mut src = tokens(&["a"]);
        assert_eq!(run(&mut g, &Rule::Sequence(Vec::new()), &mut src), Some(0));
        assert_eq!(run(&mut g, &Rule::fail(), &mut src), None);
    }

    #[test]
    fn alternative_restores_stack_pointer() {
        let mut g: Grammar<i64> = Grammar::new(["a", "b", "c"]);
        let mut src = tokens(&["a", "c"]);
        let rule = alt([sym("a") + "b", sym("a") + "c"]);
        let compiled = g.compile(&rule);
        let mut ctx = ParseContext::new(8, None);
        let value = Interpreter::new(&mut g, &mut src, &mut ctx)
            .execute(&compiled)
            .unwrap();
        assert_eq!(value, Some(2));
        // the failed branch's 'a' was rolled back before the second branch pushed its own
        assert_eq!(ctx.live(), &[1, 2]);
    }

    #[test]
    fn scope_contributes_one_value() {
        let mut g: Grammar<i64> = Grammar::new(["a", "b"]);
        let combine = action(|g: &Getter<i64>| Some(g.get(1) * 10 + g.get(2)));
        g.define("pair", sym("a") + "b" + combine);
        let mut src = tokens(&["a", "b", "a", "b"]);
        let sum = action(|g: &Getter<i64>| Some(g.get(1) + g.get(2)));
        let rule = terminate(sym("pair") + "pair" + sum);
        // first pair is 1*10+2, second 3*10+4
        assert_eq!(run(&mut g, &rule, &mut src), Some(12 + 34));
    }

    #[test]
    fn depth_limit_aborts_left_recursion() {
        let mut g: Grammar<i64> = Grammar::new(["a"]);
        g.define("loop", alt([sym("loop") + "a", sym("a")]));
        let mut src = tokens(&["a", "a"]);
        let compiled = g.compile(&sym("loop"));
        let mut ctx = ParseContext::new(8, Some(32));
        let result = Interpreter::new(&mut g, &mut src, &mut ctx).execute(&compiled);
        assert!(result.is_err());
    }
}
