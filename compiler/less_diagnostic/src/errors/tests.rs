use super::*;
use crate::ErrorKind;
use pretty_assertions::assert_eq;

#[test]
fn name_errors() {
    for err in [
        undefined_variable("@a"),
        recursive_variable("@a"),
        undefined_property("$color"),
        recursive_property("$color"),
        namespace_variable_not_found("@b"),
        namespace_property_not_found("width"),
        undefined_mixin(".m"),
        mixin_depth_exceeded(256),
    ] {
        assert_eq!(err.kind, ErrorKind::Name, "{err}");
    }
}

#[test]
fn runtime_errors() {
    for err in [
        no_matching_definition(".m(1)"),
        ambiguous_default(".m()"),
        named_argument_not_found(".m", "@x"),
        wrong_argument_count(".m", 1, 2),
        variable_call_failed("@dr"),
        function_failed("percentage", "bad"),
        invalid_operation(),
        incompatible_units("px", "s"),
    ] {
        assert_eq!(err.kind, ErrorKind::Runtime, "{err}");
    }
}

#[test]
fn syntax_errors() {
    assert_eq!(multiple_units("px*px").kind, ErrorKind::Syntax);
    assert_eq!(ruleset_on_property().kind, ErrorKind::Syntax);
}

#[test]
fn message_wording() {
    assert_eq!(
        wrong_argument_count(".mixin", 3, 2).message,
        "wrong number of arguments for .mixin (3 for 2)"
    );
    assert_eq!(
        function_failed("unit", "oops").message,
        "Error evaluating function `unit`: oops"
    );
    assert_eq!(
        ambiguous_default(".m()").message,
        "Ambiguous use of `default()` found when matching for `.m()`"
    );
}
