use super::*;

#[test]
fn single_line() {
    let source = ".a { color: red; }";
    assert_eq!(offset_to_line_col(source, 0), (1, 1));
    assert_eq!(offset_to_line_col(source, 5), (1, 6));
}

#[test]
fn multiple_lines() {
    let source = "@a: 1;\n.b {\n  width: @a;\n}";
    assert_eq!(offset_to_line_col(source, 7), (2, 1));
    assert_eq!(offset_to_line_col(source, 14), (3, 3));
}

#[test]
fn table_agrees_with_linear_scan() {
    let source = "abc\ndefgh\nij\n\nklm";
    let table = LineOffsetTable::build(source);
    assert_eq!(table.line_count(), 5);
    for offset in 0..source.len() {
        assert_eq!(
            table.offset_to_line_col(source, offset),
            offset_to_line_col(source, offset),
            "offset {offset}"
        );
    }
}

#[test]
fn columns_count_characters() {
    let source = "ä: ü;";
    // 'ä' and 'ü' are two bytes each
    assert_eq!(offset_to_line_col(source, 2), (1, 2));
    assert_eq!(offset_to_line_col(source, 4), (1, 4));
}

#[test]
fn offset_past_end_is_clamped() {
    let source = "ab";
    assert_eq!(offset_to_line_col(source, 10), (1, 3));
}
