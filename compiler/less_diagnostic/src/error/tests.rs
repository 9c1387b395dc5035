use super::*;
use pretty_assertions::assert_eq;

#[test]
fn display_without_location() {
    let err = LessError::name("variable @a is undefined");
    assert_eq!(err.to_string(), "NameError: variable @a is undefined");
}

#[test]
fn display_with_file_and_position() {
    let err = LessError::runtime("boom")
        .at(Some("main.less"), Some(12))
        .with_line_column(2, 5);
    assert_eq!(err.to_string(), "RuntimeError: boom in main.less on line 2, column 5");
}

#[test]
fn first_location_wins() {
    let err = LessError::syntax("bad")
        .at(Some("inner.less"), Some(3))
        .at(Some("outer.less"), Some(40));
    assert_eq!(err.filename.as_deref(), Some("inner.less"));
    assert_eq!(err.index, Some(3));
}

#[test]
fn missing_index_is_filled_later() {
    let err = LessError::name("x").at(None, None).at(Some("a.less"), Some(7));
    assert_eq!(err.filename.as_deref(), Some("a.less"));
    assert_eq!(err.index, Some(7));
    assert!(!err.has_line_column());
}
