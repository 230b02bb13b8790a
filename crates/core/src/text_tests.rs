// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::{escape, tokenize, tokenize_quote, trim_right, unescape};
use crate::error::Error;

#[test]
fn escape_marks_members() {
    let (out, escaped) = escape(r#"say "hi""#, "\"");
    assert_eq!(out, r#"say \"hi\""#);
    assert!(escaped);
}

#[test]
fn escape_untouched_input() {
    let (out, escaped) = escape("plain", "\"'");
    assert_eq!(out, "plain");
    assert!(!escaped);
}

#[test]
fn unescape_inverts_escape() {
    let original = r#"path "a/b" 'c'"#;
    let (escaped, _) = escape(original, "\"'/");
    assert_eq!(unescape(&escaped, "\"'/").unwrap(), original);
}

#[test]
fn unescape_rejects_bare_trailing_member() {
    assert_eq!(unescape(r#"abc""#, "\""), Err(Error::InvalidArgs));
    // Escaped trailing member is fine.
    assert_eq!(unescape(r#"abc\""#, "\"").unwrap(), r#"abc""#);
}

#[test]
fn unescape_keeps_unrelated_backslashes() {
    assert_eq!(unescape(r"a\nb", "\"").unwrap(), r"a\nb");
}

#[yare::parameterized(
    spaces      = { "a b  c", vec!["a", "b", "c"] },
    tabs        = { "\ta\tb\t", vec!["a", "b"] },
    empty       = { "", vec![] },
    only_delims = { " \t ", vec![] },
)]
fn tokenize_basics(input: &str, expected: Vec<&str>) {
    assert_eq!(tokenize(input, 16, " \t").unwrap(), expected);
}

#[test]
fn tokenize_caps_token_count() {
    assert_eq!(tokenize("a b c", 2, " "), Err(Error::TooManyObjects));
}

#[test]
fn tokenize_quote_groups_quoted_span() {
    let toks = tokenize_quote("\"a b\" c", 16, " \t\r\n", "\"'").unwrap();
    assert_eq!(toks, vec!["a b".to_string(), "c".to_string()]);
}

#[test]
fn tokenize_quote_unclosed() {
    assert_eq!(
        tokenize_quote("\"unclosed", 16, " \t\r\n", "\"'"),
        Err(Error::QuoteNotClosed)
    );
}

#[test]
fn tokenize_quote_escaped_quote_inside() {
    let toks = tokenize_quote(r#""a \"b\" c" d"#, 16, " ", "\"'").unwrap();
    assert_eq!(toks, vec![r#"a "b" c"#.to_string(), "d".to_string()]);
}

#[test]
fn tokenize_quote_single_quotes_hold_double() {
    let toks = tokenize_quote(r#"'a "b"' c"#, 16, " ", "\"'").unwrap();
    assert_eq!(toks, vec![r#"a "b""#.to_string(), "c".to_string()]);
}

#[test]
fn tokenize_quote_adjacent_spans_join() {
    let toks = tokenize_quote(r#"pre"mid dle"post"#, 16, " ", "\"'").unwrap();
    assert_eq!(toks, vec!["premid dlepost".to_string()]);
}

#[test]
fn tokenize_quote_empty_quotes_yield_empty_token() {
    let toks = tokenize_quote(r#"a "" b"#, 16, " ", "\"'").unwrap();
    assert_eq!(toks, vec!["a".to_string(), String::new(), "b".to_string()]);
}

#[test]
fn tokenize_quote_caps_token_count() {
    assert_eq!(
        tokenize_quote("a b c", 2, " ", "\"'"),
        Err(Error::TooManyObjects)
    );
}

#[yare::parameterized(
    ws      = { "a b \t\r\n", " \t\r\n", "a b" },
    nothing = { "a b", "xyz", "a b" },
    all     = { "   ", " ", "" },
)]
fn trim_right_cases(input: &str, chars: &str, expected: &str) {
    assert_eq!(trim_right(input, chars), expected);
}

mod props {
    use proptest::prelude::*;

    use super::super::{escape, unescape};

    proptest! {
        // escape then unescape is the identity for any input and any
        // quote-ish character set.
        #[test]
        fn escape_roundtrip(s in ".*") {
            let (escaped, _) = escape(&s, "\"'/");
            prop_assert_eq!(unescape(&escaped, "\"'/").unwrap(), s);
        }
    }
}
