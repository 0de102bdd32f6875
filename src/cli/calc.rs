//! The calculator behind `ruleweave calc`: a regex lexer and an arithmetic grammar.
//!
//! ```text
//! expr      := term expr_tail
//! expr_tail := '+' term {add} expr_tail | '-' term {sub} expr_tail | {done}
//! term      := factor term_tail
//! term_tail := '*' factor {mul} term_tail | '/' factor {div} term_tail | {done}
//! factor    := '(' expr ')' {group} | num | '-' factor {neg}
//! ```
//!
//! The `_tail` rules fold left-associatively through `get(0)`, the value produced just before the
//! tail was entered. Division by zero makes `{div}` fail, which leaves the `/` unconsumed and the
//! whole input unparsed.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::ast::builder::{alt, named_action, sym, terminate};
use crate::ast::Rule;
use crate::engine::{ParseOptions, Parser};
use crate::errors::GrammarError;
use crate::runtime::context::Getter;
use crate::runtime::source::{Token, VecSource};

pub const NUM: &str = "num";
pub const TERMINALS: [&str; 7] = [NUM, "+", "-", "*", "/", "(", ")"];

static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:[0-9]+(?:\.[0-9]+)?|[-+*/()])").unwrap());

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unexpected character '{found}'")]
pub struct LexError {
    /// Byte offset into the input.
    pub offset: usize,
    pub found: char,
}

/// Splits `input` into calculator tokens. Operators carry a `0.0` payload.
pub fn tokenize(input: &str) -> Result<Vec<Token<f64>>, LexError> {
    let mut tokens = Vec::new();
    let mut offset = 0;
    loop {
        let rest = &input[offset..];
        let trimmed = rest.trim_start();
        offset += rest.len() - trimmed.len();
        let Some(found) = trimmed.chars().next() else {
            return Ok(tokens);
        };
        let Some(matched) = TOKEN.find(trimmed) else {
            return Err(LexError { offset, found });
        };
        let text = matched.as_str();
        tokens.push(match text.parse::<f64>() {
            Ok(value) => Token::new(NUM, value),
            Err(_) => Token::new(text, 0.0),
        });
        offset += matched.end();
    }
}

fn fold(label: &str, op: BinaryOp) -> Rule<f64> {
    named_action(label, move |g: &Getter<f64>| op(*g.get(0), *g.get(2)))
}

type BinaryOp = fn(f64, f64) -> Option<f64>;

fn tail(operators: [(&str, &str, BinaryOp); 2], operand: &str, name: &str) -> Rule<f64> {
    let done = named_action("done", |g: &Getter<f64>| Some(*g.get(0)));
    let branches = operators
        .into_iter()
        .map(|(op, label, apply)| sym(op) + operand + fold(label, apply) + name);
    alt(branches.chain(std::iter::once(done)))
}

/// Builds a parser for the calculator grammar.
pub fn calculator(options: ParseOptions) -> Parser<f64> {
    let mut parser = Parser::new(TERMINALS).with_options(options);
    parser
        .rule("expr", sym("term") + "expr_tail")
        .rule(
            "expr_tail",
            tail(
                [("+", "add", |a, b| Some(a + b)), ("-", "sub", |a, b| Some(a - b))],
                "term",
                "expr_tail",
            ),
        )
        .rule("term", sym("factor") + "term_tail")
        .rule(
            "term_tail",
            tail(
                [
                    ("*", "mul", |a, b| Some(a * b)),
                    ("/", "div", |a, b| (b != 0.0).then(|| a / b)),
                ],
                "factor",
                "term_tail",
            ),
        )
        .rule(
            "factor",
            alt([
                sym("(") + "expr" + ")" + named_action("group", |g: &Getter<f64>| Some(*g.get(2))),
                sym(NUM),
                sym("-") + "factor" + named_action("neg", |g: &Getter<f64>| Some(-*g.get(2))),
            ]),
        );
    parser
}

/// Rule names in definition order, for display.
pub const RULES: [&str; 5] = ["expr", "expr_tail", "term", "term_tail", "factor"];

/// Runs the token stream through `parser`. `Ok(None)` means it is not a complete expression.
pub fn evaluate(
    parser: &mut Parser<f64>,
    tokens: Vec<Token<f64>>,
) -> Result<Option<f64>, GrammarError> {
    let entry: Rule<f64> = terminate(sym("expr"));
    let mut source = VecSource::new(tokens);
    parser.parse(entry, &mut source)
}
