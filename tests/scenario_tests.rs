//! End-to-end runs of the arithmetic grammar in `common`.

mod common;

use common::{arithmetic, num, op, source};
use ruleweave::ast::builder::{sym, terminate};
use ruleweave::{Rule, Token};

fn eval(tokens: Vec<Token<i64>>) -> Option<i64> {
    let mut parser = arithmetic();
    let entry: Rule<i64> = terminate(sym("expr"));
    parser.parse(entry, &mut source(tokens)).unwrap()
}

#[test]
fn sums_two_numbers() {
    assert_eq!(eval(vec![num(3), op("+"), num(4)]), Some(7));
}

#[test]
fn trailing_operator_does_not_parse() {
    assert_eq!(eval(vec![num(3), op("+")]), None);
}

#[test]
fn parenthesized_number_yields_its_value() {
    assert_eq!(eval(vec![op("("), num(5), op(")")]), Some(5));
}

#[test]
fn subtraction_is_left_associative() {
    let tokens = vec![num(10), op("-"), num(4), op("-"), num(3)];
    assert_eq!(eval(tokens), Some(3));
}

#[test]
fn nested_groups() {
    // 1 - (2 - (3 + 4)) = 6
    let tokens = vec![
        num(1),
        op("-"),
        op("("),
        num(2),
        op("-"),
        op("("),
        num(3),
        op("+"),
        num(4),
        op(")"),
        op(")"),
    ];
    assert_eq!(eval(tokens), Some(6));
}

#[test]
fn unbalanced_groups_do_not_parse() {
    assert_eq!(eval(vec![op("("), num(5)]), None);
    assert_eq!(eval(vec![num(5), op(")")]), None);
    assert_eq!(eval(Vec::new()), None);
}

#[test]
fn one_parser_serves_many_parses() {
    let mut parser = arithmetic();
    let entry: Rule<i64> = terminate(sym("expr"));
    let inputs = [
        (vec![num(1), op("+"), num(1)], Some(2)),
        (vec![num(1), op("+")], None),
        (vec![op("("), num(8), op(")"), op("-"), num(1)], Some(7)),
    ];
    for (tokens, expected) in inputs {
        let mut src = source(tokens);
        assert_eq!(parser.parse(entry.clone(), &mut src).unwrap(), expected);
    }
    assert!(parser.diagnostics().is_empty());
}
