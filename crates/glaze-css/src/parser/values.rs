//! Cursor over the tokens of one declaration value.
//!
//! Value parsers are recursive-descent functions that take a
//! [`ValueParser`] and either consume a complete value or return a
//! [`ParseError`]. Whitespace is insignificant between components, so every
//! lookahead skips it first.

use super::ParseError;
use crate::tokenizer::{CSSToken, CSSTokenizer};

/// A cursor over declaration tokens.
pub struct ValueParser<'a> {
    tokens: &'a [CSSToken],
    position: usize,
}

static EOF: CSSToken = CSSToken::EOF;

impl<'a> ValueParser<'a> {
    /// Create a cursor over `tokens`. A missing trailing EOF token is fine.
    #[must_use]
    pub const fn new(tokens: &'a [CSSToken]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    /// Skip whitespace tokens.
    pub fn skip_whitespace(&mut self) {
        while self.tokens.get(self.position).is_some_and(CSSToken::is_whitespace) {
            self.position += 1;
        }
    }

    /// Look at the next significant token without consuming it.
    pub fn peek(&mut self) -> &'a CSSToken {
        self.skip_whitespace();
        self.tokens.get(self.position).unwrap_or(&EOF)
    }

    /// Look `n` significant tokens ahead.
    pub fn peek_nth(&mut self, n: usize) -> &'a CSSToken {
        self.skip_whitespace();
        self.tokens[self.position..]
            .iter()
            .filter(|t| !t.is_whitespace())
            .nth(n)
            .unwrap_or(&EOF)
    }

    /// Consume and return the next significant token.
    pub fn next_token(&mut self) -> &'a CSSToken {
        let token = self.peek();
        if !token.is_eof() {
            self.position += 1;
        }
        token
    }

    /// Whether the next token directly follows the previous one with no
    /// whitespace in between.
    #[must_use]
    pub fn next_is_adjacent(&self) -> bool {
        self.tokens
            .get(self.position)
            .is_some_and(|t| !t.is_whitespace() && !t.is_eof())
    }

    /// True when no tokens are left.
    pub fn at_end(&mut self) -> bool {
        self.peek().is_eof()
    }

    /// True at the end of a single value inside a list: end of input, a
    /// comma or a closing parenthesis.
    pub fn is_done(&mut self) -> bool {
        matches!(
            self.peek(),
            CSSToken::EOF | CSSToken::Comma | CSSToken::RightParen | CSSToken::Semicolon
        )
    }

    /// Consume the identifier `name` if it is next.
    pub fn try_ident(&mut self, name: &str) -> bool {
        if self.peek().is_ident(name) {
            let _ = self.next_token();
            true
        } else {
            false
        }
    }

    /// Consume any identifier and return it.
    pub fn try_any_ident(&mut self) -> Option<&'a str> {
        if let CSSToken::Ident(name) = self.peek() {
            let _ = self.next_token();
            Some(name)
        } else {
            None
        }
    }

    /// Consume an identifier or fail.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Expected`] when the next token is not an identifier.
    pub fn expect_ident(&mut self) -> Result<&'a str, ParseError> {
        self.try_any_ident().ok_or_else(|| self.expected("an identifier"))
    }

    /// Consume a comma if it is next.
    pub fn try_comma(&mut self) -> bool {
        if matches!(self.peek(), CSSToken::Comma) {
            let _ = self.next_token();
            true
        } else {
            false
        }
    }

    /// Consume a comma or fail.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Expected`] when the next token is not a comma.
    pub fn expect_comma(&mut self) -> Result<(), ParseError> {
        if self.try_comma() {
            Ok(())
        } else {
            Err(self.expected("','"))
        }
    }

    /// Consume the delimiter `c` if it is next.
    pub fn try_delim(&mut self, c: char) -> bool {
        if matches!(self.peek(), CSSToken::Delim(d) if *d == c) {
            let _ = self.next_token();
            true
        } else {
            false
        }
    }

    /// Consume the function token `name(` if it is next.
    pub fn try_function(&mut self, name: &str) -> bool {
        if matches!(self.peek(), CSSToken::Function(f) if f.eq_ignore_ascii_case(name)) {
            let _ = self.next_token();
            true
        } else {
            false
        }
    }

    /// Whether the next token is the function `name(`.
    pub fn begins_with_function(&mut self, name: &str) -> bool {
        matches!(self.peek(), CSSToken::Function(f) if f.eq_ignore_ascii_case(name))
    }

    /// Consume a `)` or fail.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Expected`] when the function is not closed.
    pub fn expect_close_paren(&mut self) -> Result<(), ParseError> {
        if matches!(self.peek(), CSSToken::RightParen) {
            let _ = self.next_token();
            Ok(())
        } else {
            Err(self.expected("')'"))
        }
    }

    /// Consume a plain number token (no unit).
    pub fn try_number(&mut self) -> Option<f64> {
        if let CSSToken::Number { value, .. } = self.peek() {
            let _ = self.next_token();
            Some(*value)
        } else {
            None
        }
    }

    /// Consume a plain number token or fail.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Expected`] when the next token is not a number.
    pub fn expect_number(&mut self) -> Result<f64, ParseError> {
        self.try_number().ok_or_else(|| self.expected("a number"))
    }

    /// Consume a string token or fail.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Expected`] when the next token is not a string.
    pub fn expect_string(&mut self) -> Result<&'a str, ParseError> {
        if let CSSToken::String(s) = self.peek() {
            let _ = self.next_token();
            Ok(s)
        } else {
            Err(self.expected("a string"))
        }
    }

    /// Consume a `url(...)` in either the quoted or unquoted form.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Expected`] when the next token is not a url.
    pub fn expect_url(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            CSSToken::Url(url) => {
                let _ = self.next_token();
                Ok(url.clone())
            }
            CSSToken::Function(name) if name.eq_ignore_ascii_case("url") => {
                let _ = self.next_token();
                let url = self.expect_string()?.to_string();
                self.expect_close_paren()?;
                Ok(url)
            }
            _ => Err(self.expected("a url")),
        }
    }

    /// Fail unless every token was consumed.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Junk`] naming the first unconsumed token.
    pub fn expect_end(&mut self) -> Result<(), ParseError> {
        if self.at_end() {
            Ok(())
        } else {
            Err(ParseError::Junk(self.remaining_text()))
        }
    }

    /// The unconsumed tokens as source text.
    #[must_use]
    pub fn remaining_text(&self) -> String {
        self.tokens[self.position.min(self.tokens.len())..]
            .iter()
            .filter(|t| !t.is_eof())
            .map(ToString::to_string)
            .collect::<String>()
            .trim()
            .to_string()
    }

    /// Build an "expected X" error quoting the next token.
    pub fn expected(&mut self, what: &str) -> ParseError {
        ParseError::Expected {
            expected: what.to_string(),
            found: self.peek().to_string(),
        }
    }

    /// Save the cursor so a speculative parse can be undone.
    #[must_use]
    pub const fn checkpoint(&self) -> usize {
        self.position
    }

    /// Rewind to a saved cursor.
    pub const fn rewind(&mut self, checkpoint: usize) {
        self.position = checkpoint;
    }
}

/// Tokenize `text` and run `parse` over it, requiring every token to be
/// consumed.
///
/// # Errors
///
/// Propagates the error of `parse`, or [`ParseError::Junk`] for leftovers.
pub fn parse_text<T>(
    text: &str,
    parse: impl FnOnce(&mut ValueParser<'_>) -> Result<T, ParseError>,
) -> Result<T, ParseError> {
    let tokens = CSSTokenizer::tokenize(text);
    let mut parser = ValueParser::new(&tokens);
    let value = parse(&mut parser)?;
    parser.expect_end()?;
    Ok(value)
}
