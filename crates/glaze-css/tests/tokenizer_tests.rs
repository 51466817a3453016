//! Integration tests for the theme tokenizer.

use glaze_css::tokenizer::HashType;
use glaze_css::{CSSToken, CSSTokenizer};

/// Tokenize and drop the trailing EOF.
fn tokens(input: &str) -> Vec<CSSToken> {
    let mut tokens = CSSTokenizer::tokenize(input);
    assert_eq!(tokens.pop(), Some(CSSToken::EOF));
    tokens
}

#[test]
fn test_empty_input_is_just_eof() {
    assert_eq!(CSSTokenizer::tokenize(""), [CSSToken::EOF]);
}

#[test]
fn test_whitespace_collapses() {
    assert_eq!(tokens(" \t\n  "), [CSSToken::Whitespace]);
}

#[test]
fn test_comments_are_skipped() {
    assert_eq!(
        tokens("/* theme */color/**/:red"),
        [
            CSSToken::ident("color"),
            CSSToken::Colon,
            CSSToken::ident("red"),
        ]
    );
}

#[test]
fn test_vendor_prefixed_ident() {
    assert_eq!(tokens("-glaze-icon-source"), [CSSToken::ident("-glaze-icon-source")]);
}

#[test]
fn test_at_keyword() {
    assert_eq!(
        tokens("@define-color"),
        [CSSToken::AtKeyword("define-color".to_owned())]
    );
}

#[test]
fn test_named_color_reference() {
    assert_eq!(
        tokens("@theme_fg_color"),
        [CSSToken::AtKeyword("theme_fg_color".to_owned())]
    );
}

#[test]
fn test_hash_types() {
    assert_eq!(
        tokens("#main"),
        [CSSToken::Hash {
            value: "main".to_owned(),
            hash_type: HashType::Id,
        }]
    );
    assert_eq!(
        tokens("#0a0b0c"),
        [CSSToken::Hash {
            value: "0a0b0c".to_owned(),
            hash_type: HashType::Unrestricted,
        }]
    );
}

#[test]
fn test_numbers_remember_integer_syntax() {
    assert_eq!(
        tokens("12 1.5 -3"),
        [
            CSSToken::integer(12.0),
            CSSToken::Whitespace,
            CSSToken::Number {
                value: 1.5,
                integer: false,
            },
            CSSToken::Whitespace,
            CSSToken::integer(-3.0),
        ]
    );
}

#[test]
fn test_exponent_is_not_integer() {
    assert_eq!(
        tokens("1e2"),
        [CSSToken::Number {
            value: 100.0,
            integer: false,
        }]
    );
}

#[test]
fn test_percentage_and_dimensions() {
    assert_eq!(
        tokens("50% 2px .5em"),
        [
            CSSToken::Percentage(50.0),
            CSSToken::Whitespace,
            CSSToken::Dimension {
                value: 2.0,
                unit: "px".to_owned(),
            },
            CSSToken::Whitespace,
            CSSToken::Dimension {
                value: 0.5,
                unit: "em".to_owned(),
            },
        ]
    );
}

#[test]
fn test_function_tokens() {
    assert_eq!(
        tokens("shade(@bg, 1.1)"),
        [
            CSSToken::Function("shade".to_owned()),
            CSSToken::AtKeyword("bg".to_owned()),
            CSSToken::Comma,
            CSSToken::Whitespace,
            CSSToken::Number {
                value: 1.1,
                integer: false,
            },
            CSSToken::RightParen,
        ]
    );
}

#[test]
fn test_unquoted_url() {
    assert_eq!(
        tokens("url( assets/check.png )"),
        [CSSToken::Url("assets/check.png".to_owned())]
    );
}

#[test]
fn test_quoted_url_is_a_function() {
    assert_eq!(
        tokens("url(\"a.png\")"),
        [
            CSSToken::Function("url".to_owned()),
            CSSToken::String("a.png".to_owned()),
            CSSToken::RightParen,
        ]
    );
}

#[test]
fn test_strings_and_bad_strings() {
    assert_eq!(tokens("'Cantarell'"), [CSSToken::String("Cantarell".to_owned())]);
    assert_eq!(tokens("\"a\nb")[0], CSSToken::BadString);
}

#[test]
fn test_selector_punctuation() {
    assert_eq!(
        tokens("box > button.flat:hover"),
        [
            CSSToken::ident("box"),
            CSSToken::Whitespace,
            CSSToken::Delim('>'),
            CSSToken::Whitespace,
            CSSToken::ident("button"),
            CSSToken::Delim('.'),
            CSSToken::ident("flat"),
            CSSToken::Colon,
            CSSToken::ident("hover"),
        ]
    );
}

#[test]
fn test_rule_braces() {
    assert_eq!(
        tokens("a{b:c;}"),
        [
            CSSToken::ident("a"),
            CSSToken::LeftBrace,
            CSSToken::ident("b"),
            CSSToken::Colon,
            CSSToken::ident("c"),
            CSSToken::Semicolon,
            CSSToken::RightBrace,
        ]
    );
}

#[test]
fn test_display_round_trips_simple_tokens() {
    let text = tokens("button:hover")
        .iter()
        .map(ToString::to_string)
        .collect::<String>();
    assert_eq!(text, "button:hover");
}
