#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::rc::Rc;

use less_ir::{
    Array, CssContext, Declaration, DetachedRuleset, Dimension, Extend, ExtendOption, FrameChain,
    Keyword, MixinCall, MixinDefinition, NamespaceValue, Node, Quoted, Ruleset, Selector, Value,
    Variable, VariableCall,
};
use pretty_assertions::assert_eq;

use super::*;
use crate::context::EvalContext;
use crate::eval::Eval;
use crate::options::EvalOptions;

fn keyword(value: &str) -> Node {
    Keyword::new(value).into()
}

fn px(value: f64) -> Node {
    Dimension::new(value, "px").into()
}

fn declaration(name: &str, value: Node) -> Node {
    Declaration::new(name, value).into()
}

fn detached(rules: Vec<Node>) -> Node {
    DetachedRuleset::new(Rc::new(Ruleset::bindings(rules))).into()
}

fn context(rules: Vec<Node>) -> EvalContext {
    let root = Rc::new(Ruleset::root(rules));
    EvalContext::new(EvalOptions::default()).with_initial_frames(FrameChain::from_innermost_first([root]))
}

fn css(node: &Node) -> String {
    node.to_css(&CssContext::default()).unwrap()
}

fn items(node: Node) -> Vec<String> {
    match node {
        Node::Array(array) => array.items.iter().map(css).collect(),
        other => panic!("expected an array, got {other:?}"),
    }
}

// Variable calls

#[test]
fn detached_rulesets_expand_in_place() {
    let mut ctx = context(vec![declaration(
        "@rules",
        detached(vec![declaration("color", keyword("red"))]),
    )]);
    let expanded = Node::from(VariableCall::new("@rules")).eval(&mut ctx).unwrap();
    assert_eq!(items(expanded), vec!["color: red;"]);
}

#[test]
fn captured_scope_is_used() {
    let mut ctx = context(vec![
        declaration("@c", keyword("blue")),
        declaration("@rules", detached(vec![declaration("color", Variable::new("@c").into())])),
    ]);
    let expanded = Node::from(VariableCall::new("@rules")).eval(&mut ctx).unwrap();
    assert_eq!(items(expanded), vec!["color: blue;"]);
}

#[test]
fn rule_lists_can_be_called() {
    let mut ctx = context(vec![declaration(
        "@rules",
        Array::new(vec![declaration("a", px(1.0)), declaration("b", px(2.0))]).into(),
    )]);
    let expanded = Node::from(VariableCall::new("@rules")).eval(&mut ctx).unwrap();
    assert_eq!(items(expanded), vec!["a: 1px;", "b: 2px;"]);
}

#[test]
fn important_variable_calls() {
    let mut ctx = context(vec![declaration(
        "@rules",
        detached(vec![declaration("color", keyword("red"))]),
    )]);
    let mut call = VariableCall::new("@rules");
    call.important = true;
    let expanded = Node::from(call).eval(&mut ctx).unwrap();
    assert_eq!(items(expanded), vec!["color: red !important;"]);
}

#[test]
fn plain_values_cannot_be_called() {
    let mut ctx = context(vec![declaration("@n", px(1.0))]);
    let err = Node::from(VariableCall::new("@n")).eval(&mut ctx).unwrap_err();
    assert_eq!(err.message, "Could not evaluate variable call @n");
}

// Namespace values

fn config() -> Vec<Node> {
    vec![
        declaration("@name", Quoted::double("a").into()),
        declaration("@prop", Quoted::double("color").into()),
        declaration(
            "@config",
            detached(vec![
                declaration("@a", px(1.0)),
                declaration("color", keyword("red")),
                declaration("color", keyword("blue")),
            ]),
        ),
    ]
}

fn lookup(ctx: &mut EvalContext, value: Node, lookups: &[&str]) -> Result<String, String> {
    let lookups = lookups.iter().map(ToString::to_string).collect();
    Node::from(NamespaceValue::new(value, lookups))
        .eval(ctx)
        .map(|node| css(&node))
        .map_err(|err| err.message)
}

fn config_lookup(lookups: &[&str]) -> Result<String, String> {
    let mut ctx = context(config());
    lookup(&mut ctx, Variable::new("@config").into(), lookups)
}

#[test]
fn variables_are_looked_up() {
    assert_eq!(config_lookup(&["@a"]), Ok("1px".to_string()));
}

#[test]
fn properties_take_the_last_declaration() {
    assert_eq!(config_lookup(&["color"]), Ok("blue".to_string()));
    assert_eq!(config_lookup(&["$color"]), Ok("blue".to_string()));
}

#[test]
fn empty_lookups_take_the_last_declaration() {
    assert_eq!(config_lookup(&[""]), Ok("blue".to_string()));
}

#[test]
fn lookups_can_be_indirect() {
    assert_eq!(config_lookup(&["@@name"]), Ok("1px".to_string()));
    assert_eq!(config_lookup(&["$@prop"]), Ok("blue".to_string()));
}

#[test]
fn missing_names_are_reported() {
    assert_eq!(config_lookup(&["@missing"]), Err("variable @missing not found".to_string()));
    assert_eq!(config_lookup(&["width"]), Err("property \"width\" not found".to_string()));
}

#[test]
fn lookups_chain_through_nested_rules() {
    let mut ctx = context(vec![declaration(
        "@outer",
        detached(vec![declaration("@inner", detached(vec![declaration("@x", px(3.0))]))]),
    )]);
    assert_eq!(
        lookup(&mut ctx, Variable::new("@outer").into(), &["@inner", "@x"]),
        Ok("3px".to_string())
    );
}

#[test]
fn mixin_output_is_a_namespace() {
    let mixin = MixinDefinition::new(".m", Vec::new(), vec![declaration("@r", px(5.0))], None);
    let mut ctx = context(vec![mixin.into()]);
    let call = MixinCall::new(Selector::of_names(&[".m"]), Vec::new());
    assert_eq!(lookup(&mut ctx, call.into(), &["@r"]), Ok("5px".to_string()));
}

#[test]
fn list_results_are_evaluated() {
    let mut ctx = context(vec![declaration(
        "@config",
        detached(vec![declaration("@list", Value::new(vec![px(1.0), px(2.0)]).into())]),
    )]);
    assert_eq!(
        lookup(&mut ctx, Variable::new("@config").into(), &["@list"]),
        Ok("1px, 2px".to_string())
    );
}

#[test]
fn values_without_rules_are_not_namespaces() {
    let mut ctx = context(Vec::new());
    assert_eq!(
        lookup(&mut ctx, px(1.0), &["@a"]),
        Err("no declarations found in namespace".to_string())
    );
}

// Extends

#[test]
fn evaluated_extends_are_new_objects() {
    let mut ctx = context(Vec::new());
    let mut source = Extend::new(Selector::of_names(&[".a"]), ExtendOption::All);
    source.meta.index = Some(4);
    let evaluated = eval_extend(&source, &mut ctx).unwrap();
    assert!(evaluated.object_id > source.object_id);
    assert_eq!(evaluated.option, ExtendOption::All);
    assert_eq!(evaluated.meta.index, Some(4));
    assert_eq!(css(&Node::Selector(evaluated.selector)), ".a");
}

#[test]
fn self_selectors_join_as_descendants() {
    let mut extend = Extend::new(Selector::of_names(&[".target"]), ExtendOption::Exact);
    let owners = [Selector::of_names(&[".a", ".b"]), Selector::of_names(&[".c"])];
    find_self_selectors(&mut extend, &owners);
    assert_eq!(extend.self_selectors.len(), 1);
    let joined = &extend.self_selectors[0];
    assert_eq!(joined.meta.parent, Some(extend.meta.id));
    assert_eq!(css(&Node::Selector(joined.clone())), ".a.b .c");
}
