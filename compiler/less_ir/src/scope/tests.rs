use super::*;
use crate::{Declaration, Keyword, Node};
use pretty_assertions::assert_eq;

fn frame(bindings: &[(&str, &str)]) -> Rc<Ruleset> {
    let rules = bindings
        .iter()
        .map(|(name, value)| Node::from(Declaration::new(*name, Keyword::new(*value).into())))
        .collect();
    Rc::new(Ruleset::bindings(rules))
}

fn value_of(frame: &Ruleset, name: &str) -> String {
    frame
        .variable(name)
        .map(|declaration| declaration.value.plain_text())
        .unwrap_or_default()
}

#[test]
fn innermost_frame_wins() {
    let outer = frame(&[("@a", "outer"), ("@b", "outer-b")]);
    let inner = frame(&[("@a", "inner")]);
    let mut chain = FrameChain::new();
    chain.push_innermost(outer);
    chain.push_innermost(inner);

    let found = chain.frame_with_variable("@a");
    assert_eq!(found.as_deref().map(|f| value_of(f, "@a")), Some("inner".into()));
    let found = chain.frame_with_variable("@b");
    assert_eq!(found.as_deref().map(|f| value_of(f, "@b")), Some("outer-b".into()));
    assert!(chain.frame_with_variable("@missing").is_none());
}

#[test]
fn later_declaration_in_one_frame_wins() {
    let frame = frame(&[("@a", "first"), ("@a", "second")]);
    assert_eq!(value_of(&frame, "@a"), "second");
}

#[test]
fn prepended_frames_take_priority() {
    let caller = FrameChain::from_innermost_first([frame(&[("@a", "caller")])]);
    let closure = FrameChain::from_innermost_first([frame(&[("@a", "closure")])]);
    let chain = caller.prepended(&closure);
    assert_eq!(chain.len(), 2);
    let found = chain.frame_with_variable("@a");
    assert_eq!(found.as_deref().map(|f| value_of(f, "@a")), Some("closure".into()));
}

#[test]
fn iteration_is_innermost_first() {
    let a = frame(&[("@x", "a")]);
    let b = frame(&[("@x", "b")]);
    let chain = FrameChain::from_innermost_first([a.clone(), b.clone()]);
    let ids: Vec<_> = chain.iter().map(|f| f.meta.id).collect();
    assert_eq!(ids, vec![a.meta.id, b.meta.id]);
    assert_eq!(chain.innermost().map(|f| f.meta.id), Some(a.meta.id));
}

#[test]
fn properties_are_separate_from_variables() {
    let rules = vec![
        Node::from(Declaration::new("color", Keyword::new("red").into())),
        Node::from(Declaration::new("@color", Keyword::new("blue").into())),
        Node::from(Declaration::new("color", Keyword::new("green").into())),
    ];
    let frame = Ruleset::bindings(rules);
    let colors: Vec<_> = frame
        .property("$color")
        .iter()
        .map(|declaration| declaration.value.plain_text())
        .collect();
    assert_eq!(colors, vec!["red", "green"]);
    assert_eq!(value_of(&frame, "@color"), "blue");
}
