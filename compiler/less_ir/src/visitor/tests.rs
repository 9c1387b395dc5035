#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use crate::{Declaration, Dimension, Expression, Keyword, Negative, Ruleset, Selector};
use pretty_assertions::assert_eq;

fn keyword(value: &str) -> Node {
    Keyword::new(value).into()
}

fn texts(nodes: &[Node]) -> Vec<String> {
    nodes.iter().map(Node::plain_text).collect()
}

/// Removes `n2` and expands `n3` into two nodes.
struct Splice;

impl Visit for Splice {
    const REPLACING: bool = true;

    fn handler(kind: NodeKind) -> Handler<Self> {
        match kind {
            NodeKind::Keyword => Handler::on_in(|_, node, _| match node.plain_text().as_str() {
                "n2" => Replacement::Remove,
                "n3" => Replacement::With(Array::new(vec![keyword("n3a"), keyword("n3b")]).into()),
                _ => Replacement::Keep,
            }),
            _ => Handler::NONE,
        }
    }
}

#[test]
fn replacing_visit_array_removes_and_splices() {
    let mut visitor = Visitor::new(Splice);
    let out = visitor.visit_array(vec![keyword("n1"), keyword("n2"), keyword("n3")]);
    assert_eq!(texts(&out), vec!["n1", "n3a", "n3b"]);
}

#[test]
fn replacing_visit_reaches_nested_lists() {
    let mut visitor = Visitor::new(Splice);
    let expression: Node = Expression::new(vec![keyword("n2"), keyword("x"), keyword("n3")]).into();
    let out = visitor.visit(expression).unwrap();
    assert_eq!(out.to_css(&crate::CssContext::default()).unwrap(), "x n3a n3b");
}

#[test]
fn removed_required_child_becomes_empty() {
    let mut visitor = Visitor::new(Splice);
    let out = visitor.visit(Negative::new(keyword("n2")).into()).unwrap();
    let Node::Negative(negative) = out else {
        panic!("expected a negative node");
    };
    assert!(matches!(*negative.value, Node::Anonymous(ref anonymous) if anonymous.is_empty()));
}

/// Records the order of in and out calls.
#[derive(Default)]
struct Trace {
    events: Vec<String>,
}

impl Visit for Trace {
    fn handler(kind: NodeKind) -> Handler<Self> {
        Handler::on_in(|trace: &mut Trace, node, _| {
            trace.events.push(format!("in {}", node.kind().name()));
            Replacement::Remove
        })
        .and_out(|trace: &mut Trace, node| {
            trace.events.push(format!("out {}", node.kind().name()));
        })
        .only_for(kind, &[NodeKind::Declaration, NodeKind::Dimension])
    }
}

impl Handler<Trace> {
    fn only_for(self, kind: NodeKind, kinds: &[NodeKind]) -> Self {
        if kinds.contains(&kind) {
            self
        } else {
            Handler::NONE
        }
    }
}

#[test]
fn non_replacing_visit_keeps_nodes_and_orders_events() {
    let mut visitor = Visitor::new(Trace::default());
    let nodes = vec![
        Declaration::new("width", Dimension::new(1.0, "px").into()).into(),
        keyword("plain"),
    ];
    let out = visitor.visit_array(nodes);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].kind(), NodeKind::Declaration);
    assert_eq!(
        visitor.into_inner().events,
        vec!["in Declaration", "in Dimension", "out Dimension", "out Declaration"]
    );
}

/// Counts dimensions but never looks inside rulesets.
#[derive(Default)]
struct Shallow {
    dimensions: usize,
}

impl Visit for Shallow {
    fn handler(kind: NodeKind) -> Handler<Self> {
        match kind {
            NodeKind::Ruleset => Handler::on_in(|_, _, args| {
                args.visit_deeper = false;
                Replacement::Keep
            }),
            NodeKind::Dimension => Handler::on_in(|shallow: &mut Shallow, _, _| {
                shallow.dimensions += 1;
                Replacement::Keep
            }),
            _ => Handler::NONE,
        }
    }
}

#[test]
fn clearing_visit_deeper_skips_children() {
    let inner = Ruleset::new(
        vec![Selector::of_names(&[".a"])],
        vec![Declaration::new("width", Dimension::new(1.0, "px").into()).into()],
    );
    let mut visitor = Visitor::new(Shallow::default());
    visitor.visit_array(vec![inner.into(), Dimension::new(2.0, "em").into()]);
    assert_eq!(visitor.implementation().dimensions, 1);
}

#[test]
fn flatten_expands_nested_arrays_in_order() {
    let nested = Array::new(vec![
        keyword("a"),
        Array::new(vec![keyword("b"), keyword("c")]).into(),
    ]);
    let mut out = vec![keyword("start")];
    flatten(vec![nested.into(), keyword("d")], &mut out);
    assert_eq!(texts(&out), vec!["start", "a", "b", "c", "d"]);
}
