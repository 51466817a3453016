//! Stylesheet parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
//!
//! "The input to the parsing stage is a stream of tokens from the tokenization stage."
//! Theme files contain style rules and `@define-color` at-rules. Declaration
//! values are kept as flat token lists; property parsers read them through a
//! [`ValueParser`](super::ValueParser).

use crate::tokenizer::{CSSToken, CSSTokenizer};

/// [§ 5.4.4 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-a-declaration)
///
/// A declaration such as `color: red`.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// The property name, lowercased.
    pub name: String,
    /// The value tokens with surrounding whitespace and `!important` removed.
    pub value: Vec<CSSToken>,
    /// Whether the declaration has `!important`.
    pub important: bool,
}

/// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
///
/// A style rule: a selector list plus declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    /// One token list per comma-separated selector.
    pub selectors: Vec<Vec<CSSToken>>,
    /// The declarations in this rule block.
    pub declarations: Vec<Declaration>,
}

/// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
#[derive(Debug, Clone, PartialEq)]
pub struct AtRule {
    /// The at-keyword name (without the `@`).
    pub name: String,
    /// The prelude tokens.
    pub prelude: Vec<CSSToken>,
    /// The block contents, if the rule had a `{}` block.
    pub block: Option<Vec<CSSToken>>,
}

/// A top-level rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// A style rule (qualified rule).
    Style(StyleRule),
    /// An at-rule.
    At(AtRule),
}

/// [§ 5.3.2 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stylesheet {
    /// The rules in source order.
    pub rules: Vec<Rule>,
}

/// Stylesheet parser.
pub struct CSSParser {
    tokens: Vec<CSSToken>,
    position: usize,
}

impl CSSParser {
    /// Create a new parser from a list of tokens.
    #[must_use]
    pub const fn new(tokens: Vec<CSSToken>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Tokenize and parse `source` in one step.
    #[must_use]
    pub fn parse_source(source: &str) -> Stylesheet {
        Self::new(CSSTokenizer::tokenize(source)).parse_stylesheet()
    }

    /// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
    pub fn parse_stylesheet(&mut self) -> Stylesheet {
        let mut rules = Vec::new();

        loop {
            match self.peek() {
                // "<whitespace-token>": "Do nothing."
                Some(CSSToken::Whitespace) => {
                    let _ = self.consume();
                }

                // "<EOF-token>": "Return the list of rules."
                None | Some(CSSToken::EOF) => return Stylesheet { rules },

                // "<at-keyword-token>": "Consume an at-rule."
                Some(CSSToken::AtKeyword(_)) => {
                    if let Some(rule) = self.consume_at_rule() {
                        rules.push(Rule::At(rule));
                    }
                }

                // "anything else": "Consume a qualified rule."
                Some(_) => {
                    if let Some(rule) = self.consume_qualified_rule() {
                        rules.push(Rule::Style(rule));
                    }
                }
            }
        }
    }

    /// [§ 5.3.6 Parse a list of declarations](https://www.w3.org/TR/css-syntax-3/#parse-list-of-declarations)
    pub fn parse_declaration_list(&mut self) -> Vec<Declaration> {
        self.consume_list_of_declarations()
    }

    fn consume_at_rule(&mut self) -> Option<AtRule> {
        let name = match self.consume() {
            Some(CSSToken::AtKeyword(name)) => name.clone(),
            _ => return None,
        };

        let mut prelude = Vec::new();
        loop {
            match self.peek() {
                // "<semicolon-token>": "Return the at-rule."
                Some(CSSToken::Semicolon) => {
                    let _ = self.consume();
                    break;
                }
                // "This is a parse error. Return the at-rule."
                None | Some(CSSToken::EOF) => break,
                Some(CSSToken::LeftBrace) => {
                    let _ = self.consume();
                    let block = self.consume_until_block_end();
                    return Some(AtRule {
                        name,
                        prelude: trim_whitespace(prelude),
                        block: Some(block),
                    });
                }
                Some(_) => {
                    if let Some(token) = self.consume() {
                        prelude.push(token.clone());
                    }
                }
            }
        }

        Some(AtRule {
            name,
            prelude: trim_whitespace(prelude),
            block: None,
        })
    }

    fn consume_qualified_rule(&mut self) -> Option<StyleRule> {
        let mut prelude = Vec::new();

        loop {
            match self.peek() {
                // "This is a parse error. Return nothing."
                None | Some(CSSToken::EOF) => return None,

                Some(CSSToken::LeftBrace) => {
                    let _ = self.consume();
                    let declarations = self.consume_list_of_declarations();
                    if matches!(self.peek(), Some(CSSToken::RightBrace)) {
                        let _ = self.consume();
                    }
                    return Some(StyleRule {
                        selectors: split_selector_list(&prelude),
                        declarations,
                    });
                }

                Some(_) => {
                    if let Some(token) = self.consume() {
                        prelude.push(token.clone());
                    }
                }
            }
        }
    }

    /// Consume tokens up to the `}` matching an already consumed `{`.
    fn consume_until_block_end(&mut self) -> Vec<CSSToken> {
        let mut depth = 0usize;
        let mut block = Vec::new();
        while let Some(token) = self.consume() {
            match token {
                CSSToken::EOF => break,
                CSSToken::LeftBrace => depth += 1,
                CSSToken::RightBrace if depth == 0 => break,
                CSSToken::RightBrace => depth -= 1,
                _ => {}
            }
            block.push(token.clone());
        }
        block
    }

    /// [§ 5.4.5 Consume a list of declarations](https://www.w3.org/TR/css-syntax-3/#consume-list-of-declarations)
    fn consume_list_of_declarations(&mut self) -> Vec<Declaration> {
        let mut declarations = Vec::new();

        loop {
            match self.peek() {
                Some(CSSToken::Whitespace | CSSToken::Semicolon) => {
                    let _ = self.consume();
                }

                None | Some(CSSToken::EOF | CSSToken::RightBrace) => return declarations,

                Some(CSSToken::AtKeyword(_)) => {
                    let _ = self.consume_at_rule();
                }

                Some(CSSToken::Ident(_)) => {
                    if let Some(declaration) = self.consume_declaration() {
                        declarations.push(declaration);
                    }
                }

                // "This is a parse error." Skip to the next semicolon.
                Some(_) => {
                    let _ = self.consume();
                    let _ = self.consume_declaration_value();
                }
            }
        }
    }

    /// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
    fn consume_declaration(&mut self) -> Option<Declaration> {
        let name = match self.consume() {
            Some(CSSToken::Ident(name)) => name.to_ascii_lowercase(),
            _ => return None,
        };

        while matches!(self.peek(), Some(CSSToken::Whitespace)) {
            let _ = self.consume();
        }

        // "If the next input token is anything other than a <colon-token>,
        // this is a parse error. Return nothing."
        if !matches!(self.peek(), Some(CSSToken::Colon)) {
            let _ = self.consume_declaration_value();
            return None;
        }
        let _ = self.consume();

        let value = self.consume_declaration_value();
        let important = check_important(&value);
        let value = trim_whitespace(trim_important(value));

        Some(Declaration {
            name,
            value,
            important,
        })
    }

    /// Consume tokens up to a `;` or `}` that is not nested inside a
    /// function or block.
    fn consume_declaration_value(&mut self) -> Vec<CSSToken> {
        let mut depth = 0usize;
        let mut value = Vec::new();
        loop {
            match self.peek() {
                None | Some(CSSToken::EOF) => break,
                Some(CSSToken::Semicolon | CSSToken::RightBrace) if depth == 0 => break,
                Some(
                    CSSToken::Function(_)
                    | CSSToken::LeftParen
                    | CSSToken::LeftBracket
                    | CSSToken::LeftBrace,
                ) => depth += 1,
                Some(CSSToken::RightParen | CSSToken::RightBracket | CSSToken::RightBrace) => {
                    depth = depth.saturating_sub(1);
                }
                Some(_) => {}
            }
            if let Some(token) = self.consume() {
                value.push(token.clone());
            }
        }
        value
    }

    fn consume(&mut self) -> Option<&CSSToken> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    fn peek(&self) -> Option<&CSSToken> {
        self.tokens.get(self.position)
    }
}

/// [§ 5.1 Selector Lists](https://www.w3.org/TR/selectors-4/#selector-list)
///
/// "A selector list is a comma-separated list of selectors."
fn split_selector_list(tokens: &[CSSToken]) -> Vec<Vec<CSSToken>> {
    tokens
        .split(|t| matches!(t, CSSToken::Comma))
        .map(|part| trim_whitespace(part.to_vec()))
        .filter(|part| !part.is_empty())
        .collect()
}

fn trim_whitespace(mut tokens: Vec<CSSToken>) -> Vec<CSSToken> {
    while tokens.last().is_some_and(CSSToken::is_whitespace) {
        let _ = tokens.pop();
    }
    let leading = tokens.iter().take_while(|t| t.is_whitespace()).count();
    let _ = tokens.drain(..leading);
    tokens
}

/// [§ 6.4.2 Important declarations](https://www.w3.org/TR/css-cascade-4/#importance)
///
/// "A declaration is important if it has a !important annotation, i.e.
/// if the last two (non-whitespace, non-comment) tokens in its value are
/// a <delim-token> with the value "!" followed by an <ident-token> with
/// a value that is an ASCII case-insensitive match for "important"."
fn check_important(value: &[CSSToken]) -> bool {
    let mut significant = value.iter().rev().filter(|t| !t.is_whitespace());
    significant.next().is_some_and(|t| t.is_ident("important"))
        && matches!(significant.next(), Some(CSSToken::Delim('!')))
}

fn trim_important(value: Vec<CSSToken>) -> Vec<CSSToken> {
    if !check_important(&value) {
        return value;
    }
    let mut value = trim_whitespace(value);
    let _ = value.pop();
    let mut value = trim_whitespace(value);
    let _ = value.pop();
    value
}
