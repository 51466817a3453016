//! CSS Token types per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
//!
//! Theme files only need a subset of the token zoo: there is no `<!--`
//! handling and no unicode ranges. Numeric tokens keep whether the source
//! text was an integer because `rgb()` channels and `steps()` counts care.

use core::fmt;

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
///
/// "A `<hash-token>` with the type flag set to 'id'... or 'unrestricted'."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashType {
    /// The hash token's value is a valid identifier (`#main`).
    Id,
    /// The hash token's value is not a valid identifier (`#0a0b0c`).
    Unrestricted,
}

/// A single token of theme source text.
#[derive(Debug, Clone, PartialEq)]
pub enum CSSToken {
    /// "`<ident-token>`"
    Ident(String),
    /// "`<function-token>`": a name directly followed by `(`.
    Function(String),
    /// "`<at-keyword-token>`": `@define-color`, `@name`.
    AtKeyword(String),
    /// "`<hash-token>`"
    Hash {
        /// Text after the `#`.
        value: String,
        /// Whether the value would be a valid identifier.
        hash_type: HashType,
    },
    /// "`<string-token>`"
    String(String),
    /// "`<bad-string-token>`": a string interrupted by a newline.
    BadString,
    /// "`<url-token>`": the unquoted `url(...)` form.
    Url(String),
    /// "`<bad-url-token>`"
    BadUrl,
    /// "`<delim-token>`"
    Delim(char),
    /// "`<number-token>`"
    Number {
        /// Numeric value.
        value: f64,
        /// True when the source had neither a decimal point nor an exponent.
        integer: bool,
    },
    /// "`<percentage-token>`"
    Percentage(f64),
    /// "`<dimension-token>`"
    Dimension {
        /// Numeric value.
        value: f64,
        /// Unit text, as written.
        unit: String,
    },
    /// "`<whitespace-token>`"
    Whitespace,
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// End of input.
    EOF,
}

impl CSSToken {
    /// Create a new ident token.
    #[must_use]
    pub fn ident(value: impl Into<String>) -> Self {
        Self::Ident(value.into())
    }

    /// Create a new integer number token.
    #[must_use]
    pub const fn integer(value: f64) -> Self {
        Self::Number {
            value,
            integer: true,
        }
    }

    /// Check if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::EOF)
    }

    /// Check if this is a whitespace token.
    #[must_use]
    pub const fn is_whitespace(&self) -> bool {
        matches!(self, Self::Whitespace)
    }

    /// Whether this token is the identifier `name`, compared ASCII
    /// case-insensitively.
    #[must_use]
    pub fn is_ident(&self, name: &str) -> bool {
        matches!(self, Self::Ident(value) if value.eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for CSSToken {
    /// Serialize the token back to source text. Used for selector text and
    /// for quoting the offending token in parse errors.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(v) => write!(f, "{v}"),
            Self::Function(v) => write!(f, "{v}("),
            Self::AtKeyword(v) => write!(f, "@{v}"),
            Self::Hash { value, .. } => write!(f, "#{value}"),
            Self::String(v) => write!(f, "\"{v}\""),
            Self::BadString => write!(f, "\"<bad string>"),
            Self::Url(v) => write!(f, "url({v})"),
            Self::BadUrl => write!(f, "url(<bad url>)"),
            Self::Delim(c) => write!(f, "{c}"),
            Self::Number { value, .. } => write!(f, "{value}"),
            Self::Percentage(v) => write!(f, "{v}%"),
            Self::Dimension { value, unit } => write!(f, "{value}{unit}"),
            Self::Whitespace => write!(f, " "),
            Self::Colon => write!(f, ":"),
            Self::Semicolon => write!(f, ";"),
            Self::Comma => write!(f, ","),
            Self::LeftBracket => write!(f, "["),
            Self::RightBracket => write!(f, "]"),
            Self::LeftParen => write!(f, "("),
            Self::RightParen => write!(f, ")"),
            Self::LeftBrace => write!(f, "{{"),
            Self::RightBrace => write!(f, "}}"),
            Self::EOF => write!(f, "<EOF>"),
        }
    }
}
