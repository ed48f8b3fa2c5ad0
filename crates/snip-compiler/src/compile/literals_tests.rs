use super::literals::{
    LiteralError, parse_int, parse_real, unescape_char, unescape_string, unescape_verbatim,
};

#[test]
fn integers_accept_separators_suffixes_and_hex() {
    assert_eq!(parse_int("42"), Some(42));
    assert_eq!(parse_int("1_000_000"), Some(1_000_000));
    assert_eq!(parse_int("10L"), Some(10));
    assert_eq!(parse_int("0xFF"), Some(255));
    assert_eq!(parse_int("99999999999999999999"), None);
}

#[test]
fn reals_drop_suffix() {
    assert_eq!(parse_real("1.5"), Some(1.5));
    assert_eq!(parse_real("2f"), Some(2.0));
    assert_eq!(parse_real("1e3"), Some(1000.0));
    assert_eq!(parse_real("0.25m"), Some(0.25));
}

#[test]
fn string_escapes() {
    assert_eq!(unescape_string(r#""a\tb\n""#).unwrap(), "a\tb\n");
    assert_eq!(unescape_string(r#""\"q\"""#).unwrap(), "\"q\"");
    assert_eq!(unescape_string(r#""\u0041\x42""#).unwrap(), "AB");
    assert_eq!(
        unescape_string(r#""\q""#),
        Err(LiteralError::InvalidEscape("\\q".to_string()))
    );
}

#[test]
fn verbatim_strings_only_unescape_quotes() {
    assert_eq!(unescape_verbatim(r#"@"C:\dir ""x""""#), r#"C:\dir "x""#);
}

#[test]
fn char_literals() {
    assert_eq!(unescape_char("'a'"), Ok('a'));
    assert_eq!(unescape_char(r"'\n'"), Ok('\n'));
    assert_eq!(unescape_char("''"), Err(LiteralError::EmptyChar));
    assert_eq!(unescape_char("'ab'"), Err(LiteralError::TooManyChars));
}
