//! CSS parsing: stylesheets, declarations and property values.

#[allow(clippy::module_inception)]
mod parser;
mod values;

use thiserror::Error;

pub use parser::{AtRule, CSSParser, Declaration, Rule, StyleRule, Stylesheet};
pub use values::{ValueParser, parse_text};

/// Errors produced while parsing theme source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A specific token was required.
    #[error("expected {expected}, found '{found}'")]
    Expected {
        /// What the grammar wanted.
        expected: String,
        /// Source text of the token actually present.
        found: String,
    },

    /// A complete value was parsed but tokens were left over.
    #[error("junk at end of value: '{0}'")]
    Junk(String),

    /// The declaration names a property that does not exist.
    #[error("unknown property '{0}'")]
    UnknownProperty(String),

    /// The value is well-formed but not allowed here.
    #[error("{0}")]
    Invalid(String),
}

impl ParseError {
    /// Shorthand for [`ParseError::Invalid`].
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}
