mod common;

use common::{num, op, source};
use ruleweave::ast::builder::{action, alt, sym};
use ruleweave::{Action, ErrorCategory, Getter, Parser, Rule};

fn parser() -> Parser<i64> {
    Parser::new(common::TERMINALS)
}

#[test]
fn undefined_symbols_are_reported_once_and_fail() {
    let mut p = parser();
    p.rule("a", "missing");

    let entry: Rule<i64> = sym("a") + "a";
    let mut src = source(vec![num(1)]);
    assert_eq!(p.parse(entry.clone(), &mut src).unwrap(), None);
    assert_eq!(p.parse(entry, &mut src).unwrap(), None);

    let diagnostics = p.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].category(), ErrorCategory::Grammar);
    assert_eq!(
        diagnostics[0].error_code(),
        "ruleweave::compile::undefined_symbol"
    );
    assert!(diagnostics[0].to_string().contains("'missing'"));
}

#[test]
fn undefined_symbol_inside_an_alternative_only_fails_that_branch() {
    let mut p = parser();
    p.rule("value", alt(["ghost", "num"]));
    let mut src = source(vec![num(9)]);
    assert_eq!(p.parse("value", &mut src).unwrap(), Some(9));
    assert_eq!(p.take_diagnostics().len(), 1);
    assert!(p.diagnostics().is_empty());
}

#[test]
fn compiled_entries_are_stable() {
    let mut p = common::arithmetic();
    assert!(!p.grammar().is_compiled("expr"));

    let first = p.compile_rule("expr").to_string();
    assert!(p.grammar().is_compiled("expr"));
    assert!(p.grammar().is_compiled("term"));

    let mut src = source(vec![num(1), op("+"), num(2)]);
    assert_eq!(p.parse(common::whole("expr"), &mut src).unwrap(), Some(3));
    assert_eq!(p.compile_rule("expr").to_string(), first);
    assert!(p.diagnostics().is_empty());
}

#[test]
fn recursion_is_left_symbolic_in_compiled_form() {
    let mut p = parser();
    p.rule(
        "count",
        alt([
            sym("num") + "count" + action(|g: &Getter<i64>| Some(g.get(2) + 1)),
            sym("num") + action(|_: &Getter<i64>| Some(1)),
        ]),
    );
    let compiled = p.compile_rule("count");
    assert_eq!(
        compiled.to_string(),
        "[( 'num' count {action} | 'num' {action} )]"
    );
    assert!(!compiled.is_resolved());

    let mut src = source(vec![num(0), num(0), num(0), num(0)]);
    assert_eq!(p.parse(common::whole("count"), &mut src).unwrap(), Some(4));
}

#[test]
fn mutually_recursive_rules_compile_and_run() {
    let mut p = parser();
    p.rule(
        "outer",
        alt([
            sym("(") + "inner" + ")" + action(|g: &Getter<i64>| Some(*g.get(2))),
            sym("num"),
        ]),
    )
    .rule("inner", "outer");

    let mut src = source(vec![op("("), op("("), num(5), op(")"), op(")")]);
    assert_eq!(p.parse(common::whole("outer"), &mut src).unwrap(), Some(5));
}

#[test]
fn redefinition_invalidates_dependent_rules() {
    let mut p = parser();
    p.rule("leaf", "num").rule("wrapper", sym("leaf") + "leaf");

    let mut src = source(vec![num(2), num(3)]);
    assert_eq!(p.parse("wrapper", &mut src).unwrap(), Some(3));
    assert!(p.grammar().is_compiled("wrapper"));

    p.rule(
        "leaf",
        sym("num") + action(|g: &Getter<i64>| Some(g.get(1) * 10)),
    );
    assert!(!p.grammar().is_compiled("wrapper"));

    let mut src = source(vec![num(2), num(3)]);
    assert_eq!(p.parse("wrapper", &mut src).unwrap(), Some(30));
}

#[test]
fn defining_a_missing_rule_recompiles_its_users() {
    let mut p = parser();
    p.rule("a", sym("b") + "num");

    let mut src = source(vec![num(1), num(2)]);
    assert_eq!(p.parse("a", &mut src).unwrap(), None);
    assert_eq!(p.take_diagnostics().len(), 1);

    p.rule("b", "num");
    assert!(!p.grammar().is_compiled("a"));

    let mut src = source(vec![num(1), num(2)]);
    assert_eq!(p.parse("a", &mut src).unwrap(), Some(2));
    assert!(p.diagnostics().is_empty());
}

#[test]
fn body_shorthands() {
    let mut p = parser();
    p.rule("alias", "num")
        .rule("answer", Action::labelled("answer", |_: &Getter<i64>| Some(42)));

    assert!(matches!(p.grammar().source_rule("alias"), Some(Rule::Ref(name)) if name == "num"));
    assert_eq!(p.compile_rule("alias").to_string(), "'num'");
    assert_eq!(p.compile_rule("answer").to_string(), "{answer}");

    let mut src = source(Vec::new());
    assert_eq!(p.parse("answer", &mut src).unwrap(), Some(42));
}

#[test]
fn grammar_introspection() {
    let p = common::arithmetic();
    let grammar = p.grammar();
    assert_eq!(grammar.rule_names(), ["expr", "tail", "term"]);
    assert!(grammar.is_terminal("num"));
    assert!(!grammar.is_terminal("expr"));
    assert!(grammar.is_defined("tail"));
    assert!(!grammar.is_defined("num"));
    assert!(grammar.compiled_rule("expr").is_none());
    assert_eq!(
        grammar.source_rule("term").map(ToString::to_string).as_deref(),
        Some("( ( expr ) {action} | num )")
    );
}
