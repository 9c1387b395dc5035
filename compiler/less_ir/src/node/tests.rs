#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use crate::Dimension;
use pretty_assertions::assert_eq;

#[test]
fn kind_indices_are_dense_and_stable() {
    assert_eq!(NodeKind::COUNT, NodeKind::ALL.len());
    for (position, kind) in NodeKind::ALL.iter().enumerate() {
        assert_eq!(kind.index(), position, "{}", kind.name());
    }
}

#[test]
fn node_kind_matches_variant() {
    let node: Node = Keyword::new("red").into();
    assert_eq!(node.kind(), NodeKind::Keyword);
    let node: Node = Ruleset::bindings(Vec::new()).into();
    assert_eq!(node.kind(), NodeKind::Ruleset);
}

#[test]
fn try_from_recovers_payload_or_returns_node() {
    let node: Node = Keyword::new("red").into();
    let keyword = Keyword::try_from(node).unwrap();
    assert_eq!(keyword.value, "red");

    let node: Node = Dimension::new(1.0, "px").into();
    let back = Keyword::try_from(node).unwrap_err();
    assert_eq!(back.kind(), NodeKind::Dimension);
}

#[test]
fn constructors_link_children_to_parent() {
    let negative = Negative::new(Dimension::new(2.0, "px").into());
    assert_eq!(negative.value.meta().parent, Some(negative.meta.id));

    let call = Call::new("percentage", vec![Dimension::new(0.5, "").into()]);
    assert_eq!(call.args[0].meta().parent, Some(call.meta.id));
}

#[test]
fn clones_share_identity() {
    let node: Node = Variable::new("@a").into();
    assert_eq!(node.clone().id(), node.id());
    let other: Node = Variable::new("@a").into();
    assert_ne!(other.id(), node.id());
}

#[test]
fn meta_mut_on_shared_ruleset_copies_on_write() {
    let mut node: Node = Ruleset::bindings(Vec::new()).into();
    let shared = node.clone();
    node.meta_mut().index = Some(9);
    assert_eq!(node.index(), Some(9));
    assert_eq!(shared.index(), None);
}

#[test]
fn truthiness() {
    assert!(!Node::from(Boolean::new(false)).is_truthy());
    assert!(Node::from(Boolean::new(true)).is_truthy());
    assert!(Node::from(Keyword::new("false")).is_truthy());
    assert!(Node::from(Dimension::new(0.0, "")).is_truthy());
}

#[test]
fn mixin_definition_counts_parameters() {
    let definition = MixinDefinition::new(
        ".m",
        vec![
            MixinParam::named("@a"),
            MixinParam::with_default("@b", Dimension::new(10.0, "px").into()),
            MixinParam::variadic(Some("@rest")),
        ],
        Vec::new(),
        None,
    );
    assert_eq!(definition.arity, 3);
    assert_eq!(definition.required, 2);
    assert_eq!(definition.optional_parameters, vec!["@b".to_string()]);
    assert!(definition.variadic);
}

#[test]
fn pattern_parameters_are_required() {
    let definition = MixinDefinition::new(
        ".m",
        vec![MixinParam::pattern(Keyword::new("dark").into()), MixinParam::named("@c")],
        Vec::new(),
        None,
    );
    assert_eq!(definition.required, 2);
    assert!(definition.optional_parameters.is_empty());
    assert!(!definition.variadic);
}

#[test]
fn unnamed_definition_gets_default_name() {
    let definition = MixinDefinition::new("", Vec::new(), Vec::new(), None);
    assert_eq!(definition.name, "anonymous mixin");
}

#[test]
fn extend_ids_increase() {
    let first = Extend::new(Selector::of_names(&[".a"]), ExtendOption::Exact);
    let second = Extend::new(Selector::of_names(&[".b"]), ExtendOption::parse("all"));
    assert!(second.object_id > first.object_id);
    assert_eq!(first.parent_ids, vec![first.object_id]);
    assert!(!first.allow_before && !first.allow_after);
    assert!(second.allow_before && second.allow_after);
    assert_eq!(second.selector.meta.parent, Some(second.meta.id));
}

#[test]
fn mixin_elements_split_compound_selectors() {
    let selector = Selector::new(vec![Element::named("", "#ns"), Element::named(">", ".m")]);
    assert_eq!(selector.mixin_elements(), vec!["#ns".to_string(), ".m".to_string()]);

    let parent = Selector::new(vec![Element::named("", "&"), Element::named("", ".x")]);
    assert_eq!(parent.mixin_elements(), vec![".x".to_string()]);
}

#[test]
fn call_selector_matches_candidate_prefix() {
    let call = Selector::new(vec![Element::named("", "#ns"), Element::named(">", ".m")]);
    assert_eq!(call.match_prefix(&Selector::of_names(&["#ns"])), 1);
    assert_eq!(call.match_prefix(&Selector::of_names(&["#ns", ".m"])), 2);
    assert_eq!(call.match_prefix(&Selector::of_names(&[".m"])), 0);
    assert_eq!(call.match_prefix(&Selector::of_names(&["#ns", ".m", ".n"])), 0);
}

#[test]
fn ruleset_lookups() {
    let ruleset = Ruleset::bindings(vec![
        Declaration::new("@a", Keyword::new("1").into()).into(),
        Declaration::new("width", Keyword::new("a").into()).into(),
        Declaration::new("width", Keyword::new("b").into()).into(),
        Ruleset::new(vec![Selector::of_names(&[".inner"])], Vec::new()).into(),
    ]);
    assert!(ruleset.variable("@a").is_some());
    assert!(ruleset.variable("@b").is_none());
    assert_eq!(ruleset.property("width").len(), 2);
    assert_eq!(
        ruleset.last_declaration().map(|d| d.value.plain_text()),
        Some("b".to_string())
    );
    assert_eq!(ruleset.rulesets().count(), 1);
}
