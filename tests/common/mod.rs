//! # Shared Test Fixtures
//!
//! Token builders, instrumented actions and the small arithmetic grammar used across the
//! integration tests.
#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use ruleweave::ast::builder::{action, alt, sym, terminate};
use ruleweave::{Getter, Parser, Rule, Token, VecSource};

pub const TERMINALS: [&str; 5] = ["num", "+", "-", "(", ")"];

pub fn num(value: i64) -> Token<i64> {
    Token::new("num", value)
}

/// A punctuation token. Its payload is never read by the grammars here.
pub fn op(name: &str) -> Token<i64> {
    Token::new(name, 0)
}

pub fn source(tokens: Vec<Token<i64>>) -> VecSource<i64> {
    VecSource::new(tokens)
}

/// An action that counts its invocations and then yields `result`.
pub fn counting(result: Option<i64>) -> (Rc<Cell<usize>>, Rule<i64>) {
    let calls = Rc::new(Cell::new(0));
    let seen = Rc::clone(&calls);
    let rule = action(move |_: &Getter<i64>| {
        seen.set(seen.get() + 1);
        result
    });
    (calls, rule)
}

/// ```text
/// expr := term tail
/// tail := '+' term {g0 + g2} tail | '-' term {g0 - g2} tail | {g0}
/// term := '(' expr ')' {g2} | num
/// ```
pub fn arithmetic() -> Parser<i64> {
    let mut parser = Parser::new(TERMINALS);
    parser
        .rule("expr", sym("term") + "tail")
        .rule(
            "tail",
            alt([
                sym("+") + "term" + action(|g: &Getter<i64>| Some(g.get(0) + g.get(2))) + "tail",
                sym("-") + "term" + action(|g: &Getter<i64>| Some(g.get(0) - g.get(2))) + "tail",
                action(|g: &Getter<i64>| Some(*g.get(0))),
            ]),
        )
        .rule(
            "term",
            alt([
                sym("(") + "expr" + ")" + action(|g: &Getter<i64>| Some(*g.get(2))),
                sym("num"),
            ]),
        );
    parser
}

/// `name` followed by end of input.
pub fn whole(name: &str) -> Rule<i64> {
    terminate(sym(name))
}
