use std::rc::Rc;

use super::*;
use crate::functions::FunctionRegistry;
use crate::options::EvalOptions;
use less_ir::{Comment, Declaration, Dimension, FrameChain, Keyword, Operation, Ruleset, Variable};
use pretty_assertions::assert_eq;

fn keyword(value: &str) -> Node {
    Keyword::new(value).into()
}

fn texts(nodes: &[Node]) -> Vec<String> {
    nodes.iter().map(Node::plain_text).collect()
}

#[test]
fn comments_are_dropped() {
    let args = prepare_args(vec![
        Comment::new("/* a */", false).into(),
        keyword("b"),
        Expression::new(vec![keyword("c"), Comment::new("// d", true).into(), keyword("e")]).into(),
    ]);
    assert_eq!(texts(&args), vec!["b", "c e"]);
}

#[test]
fn single_item_expressions_are_unwrapped() {
    let args = prepare_args(vec![Expression::new(vec![keyword("a")]).into()]);
    assert!(matches!(args.as_slice(), [Node::Keyword(_)]));
}

#[test]
fn parenthesized_division_keeps_its_group() {
    let division = Operation::new("/", Dimension::new(1.0, "").into(), Dimension::new(2.0, "").into(), false);
    let args = prepare_args(vec![Expression::new(vec![division.clone().into()])
        .parenthesized(false)
        .into()]);
    assert!(matches!(args.as_slice(), [Node::Expression(expression)] if expression.parens));

    let args = prepare_args(vec![Expression::new(vec![division.into()]).into()]);
    assert!(matches!(args.as_slice(), [Node::Operation(_)]));
}

fn context() -> EvalContext {
    let mut registry = FunctionRegistry::new();
    registry.add(
        "raw-first",
        FunctionDef::raw(|_, _, args| Ok(FunctionValue::Bool(matches!(args.first(), Some(Node::Variable(_)))))),
    );
    registry.add(
        "first",
        FunctionDef::evaluated(|_, _, args| Ok(args.into_iter().next().map_or(FunctionValue::Nothing, FunctionValue::Node))),
    );
    let frame = Ruleset::bindings(vec![Declaration::new("@x", Dimension::new(5.0, "px").into()).into()]);
    EvalContext::new(EvalOptions::default())
        .with_functions(Rc::new(registry))
        .with_initial_frames(FrameChain::from_innermost_first([Rc::new(frame)]))
}

#[test]
fn unknown_names_are_invalid() {
    let mut ctx = context();
    let caller = FunctionCaller::new("missing", &ctx, CallSite::default());
    assert!(!caller.is_valid());
    assert!(matches!(caller.call(&mut ctx, &[]), Ok(FunctionValue::Nothing)));
}

#[test]
fn raw_functions_see_unevaluated_arguments() {
    let mut ctx = context();
    let caller = FunctionCaller::new("RAW-FIRST", &ctx, CallSite::default());
    assert!(caller.is_valid());
    let value = caller.call(&mut ctx, &[Variable::new("@x").into()]);
    assert!(matches!(value, Ok(FunctionValue::Bool(true))));
}

#[test]
fn evaluated_functions_see_values() {
    let mut ctx = context();
    let caller = FunctionCaller::new("first", &ctx, CallSite::default());
    let value = caller.call(&mut ctx, &[Variable::new("@x").into()]);
    let Ok(FunctionValue::Node(Node::Dimension(dimension))) = value else {
        panic!("expected a dimension, got {value:?}");
    };
    assert_eq!(Node::Dimension(dimension).plain_text(), "5px");
}

#[test]
fn argument_errors_propagate() {
    let mut ctx = context();
    let caller = FunctionCaller::new("first", &ctx, CallSite::default());
    let err = caller.call(&mut ctx, &[Variable::new("@missing").into()]);
    assert!(matches!(err, Err(err) if err.message == "variable @missing is undefined"));
}
