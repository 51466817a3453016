//! Symbolic colors.
//!
//! A [`Color`] is an expression over literal colors, named colors defined
//! with `@define-color`, platform colors and `currentColor`. Computing it
//! resolves the expression to an [`Rgba`]. Named colors may refer to each
//! other, so resolution tracks the chain of names being expanded and fails
//! when a name repeats.

use core::fmt;

use glaze_common::warning::warn_once;

use super::{ComputeContext, Rgba, StyleValue, ValueKind};
use crate::parser::{ParseError, ValueParser};
use crate::style::{PropertyId, StyleProvider};
use crate::tokenizer::CSSToken;

/// Factor used by `lighter()`.
pub const LIGHTER: f64 = 1.3;
/// Factor used by `darker()`.
pub const DARKER: f64 = 0.7;

/// A color expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Color {
    /// A literal color.
    Literal(Rgba),
    /// `@name`, looked up in the provider's named colors.
    Named(String),
    /// `shade(color, factor)`: scale lightness and saturation.
    Shade(Box<Color>, f64),
    /// `alpha(color, factor)`: scale opacity.
    Alpha(Box<Color>, f64),
    /// `mix(a, b, factor)`.
    Mix(Box<Color>, Box<Color>, f64),
    /// `currentColor`.
    Current,
    /// `-glaze-platform-color(class, id)`.
    Platform {
        /// Theme class the color belongs to.
        class: String,
        /// Color id within the class.
        id: String,
    },
}

/// One link in the chain of named colors currently being resolved.
///
/// The chain lives on the stack of the recursive resolver, so checking for
/// a cycle never allocates.
#[derive(Debug, Clone, Copy)]
pub struct CycleNode<'a> {
    /// The name being expanded.
    pub name: &'a str,
    /// The name whose expansion led here.
    pub parent: Option<&'a CycleNode<'a>>,
}

impl CycleNode<'_> {
    /// Whether `name` appears anywhere along the chain.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        let mut node = Some(self);
        while let Some(current) = node {
            if current.name == name {
                return true;
            }
            node = current.parent;
        }
        false
    }
}

impl Color {
    /// Resolve to a literal color.
    ///
    /// `current` is what `currentColor` means here. Returns `None` for
    /// unknown names, unknown platform colors and reference cycles.
    #[must_use]
    pub fn resolve(
        &self,
        provider: &dyn StyleProvider,
        current: Option<Rgba>,
        cycle: Option<&CycleNode<'_>>,
    ) -> Option<Rgba> {
        match self {
            Self::Literal(rgba) => Some(*rgba),
            Self::Named(name) => {
                if cycle.is_some_and(|c| c.contains(name)) {
                    warn_once("CSS", &format!("reference cycle while resolving color '@{name}'"));
                    return None;
                }
                let Some(named) = provider.lookup_named_color(name) else {
                    warn_once("CSS", &format!("'@{name}' is not a defined color"));
                    return None;
                };
                let link = CycleNode {
                    name,
                    parent: cycle,
                };
                resolve_value(&named, provider, current, Some(&link))
            }
            Self::Shade(color, factor) => color
                .resolve(provider, current, cycle)
                .map(|rgba| rgba.shade(*factor)),
            Self::Alpha(color, factor) => color
                .resolve(provider, current, cycle)
                .map(|rgba| rgba.with_alpha_factor(*factor)),
            Self::Mix(a, b, factor) => {
                let a = a.resolve(provider, current, cycle)?;
                let b = b.resolve(provider, current, cycle)?;
                Some(a.mix(&b, *factor))
            }
            Self::Current => current,
            Self::Platform { class, id } => {
                let Some(color) = provider.lookup_platform_color(class, id) else {
                    warn_once("CSS", &format!("no platform color '{id}' in class '{class}'"));
                    return None;
                };
                resolve_value(&color, provider, current, cycle)
            }
        }
    }

    pub(crate) fn compute(&self, property: PropertyId, ctx: &ComputeContext<'_>) -> StyleValue {
        let current = if property == PropertyId::Color {
            Some(ctx.parent.map_or(Rgba::WHITE, |p| p.color()))
        } else {
            ctx.current_color()
        };
        match self.resolve(ctx.provider, current, None) {
            Some(rgba) => StyleValue::rgba(rgba),
            None => fallback(property, ctx),
        }
    }

    /// Parse a color expression.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the tokens do not form a color.
    pub fn parse(parser: &mut ValueParser<'_>) -> Result<Self, ParseError> {
        if parser.try_ident("currentColor") {
            return Ok(Self::Current);
        }
        if parser.try_ident("transparent") {
            return Ok(Self::Literal(Rgba::TRANSPARENT));
        }
        if let CSSToken::AtKeyword(name) = parser.peek() {
            let _ = parser.next_token();
            return Ok(Self::Named(name.clone()));
        }
        if parser.try_function("lighter") {
            let color = Self::parse(parser)?;
            parser.expect_close_paren()?;
            return Ok(Self::Shade(Box::new(color), LIGHTER));
        }
        if parser.try_function("darker") {
            let color = Self::parse(parser)?;
            parser.expect_close_paren()?;
            return Ok(Self::Shade(Box::new(color), DARKER));
        }
        if parser.try_function("shade") {
            let (color, factor) = parse_color_and_factor(parser)?;
            return Ok(Self::Shade(Box::new(color), factor));
        }
        if parser.try_function("alpha") {
            let (color, factor) = parse_color_and_factor(parser)?;
            return Ok(Self::Alpha(Box::new(color), factor));
        }
        if parser.try_function("mix") {
            let first = Self::parse(parser)?;
            parser.expect_comma()?;
            let (second, factor) = parse_color_and_factor(parser)?;
            return Ok(Self::Mix(Box::new(first), Box::new(second), factor));
        }
        if parser.try_function("-glaze-platform-color") {
            let class = parser.expect_ident()?.to_string();
            parser.expect_comma()?;
            let id = match parser.next_token() {
                CSSToken::Ident(name) => name.clone(),
                CSSToken::Number {
                    value,
                    integer: true,
                } => value.to_string(),
                other => {
                    return Err(ParseError::Expected {
                        expected: "a color id".to_string(),
                        found: other.to_string(),
                    });
                }
            };
            parser.expect_close_paren()?;
            return Ok(Self::Platform { class, id });
        }
        Rgba::parse(parser).map(Self::Literal)
    }

    /// Parse a color into a value. Literal colors become
    /// [`ValueKind::Rgba`] directly since they need no computation.
    ///
    /// # Errors
    ///
    /// See [`Color::parse`].
    pub fn parse_value(parser: &mut ValueParser<'_>) -> Result<StyleValue, ParseError> {
        Ok(Self::into_value(Self::parse(parser)?))
    }

    /// Wrap a color into a value.
    #[must_use]
    pub fn into_value(color: Self) -> StyleValue {
        match color {
            Self::Literal(rgba) => StyleValue::rgba(rgba),
            other => StyleValue::new(ValueKind::Color(other)),
        }
    }
}

fn parse_color_and_factor(parser: &mut ValueParser<'_>) -> Result<(Color, f64), ParseError> {
    let color = Color::parse(parser)?;
    parser.expect_comma()?;
    let factor = parser.expect_number()?;
    parser.expect_close_paren()?;
    Ok((color, factor))
}

/// Resolve a specified color value: a literal or a color expression.
fn resolve_value(
    value: &StyleValue,
    provider: &dyn StyleProvider,
    current: Option<Rgba>,
    cycle: Option<&CycleNode<'_>>,
) -> Option<Rgba> {
    match value.kind() {
        ValueKind::Rgba(rgba) => Some(*rgba),
        ValueKind::Color(color) => color.resolve(provider, current, cycle),
        _ => None,
    }
}

/// What a property gets when its color cannot be resolved.
fn fallback(property: PropertyId, ctx: &ComputeContext<'_>) -> StyleValue {
    match property {
        PropertyId::Color
        | PropertyId::BackgroundColor
        | PropertyId::BorderTopColor
        | PropertyId::BorderRightColor
        | PropertyId::BorderBottomColor
        | PropertyId::BorderLeftColor
        | PropertyId::OutlineColor
        | PropertyId::TextDecorationColor => property.initial_value().compute(property, ctx),
        PropertyId::IconPalette => StyleValue::rgba(ctx.current_color().unwrap_or(Rgba::WHITE)),
        _ => StyleValue::rgba(Rgba::TRANSPARENT),
    }
}

/// Compute a value that is either a literal color or a color expression.
#[must_use]
pub fn compute_color(value: &StyleValue, property: PropertyId, ctx: &ComputeContext<'_>) -> StyleValue {
    match value.kind() {
        ValueKind::Color(color) => color.compute(property, ctx),
        _ => value.clone(),
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(rgba) => rgba.fmt(f),
            Self::Named(name) => write!(f, "@{name}"),
            Self::Shade(color, factor) => write!(f, "shade({color}, {factor})"),
            Self::Alpha(color, factor) => write!(f, "alpha({color}, {factor})"),
            Self::Mix(a, b, factor) => write!(f, "mix({a}, {b}, {factor})"),
            Self::Current => f.write_str("currentColor"),
            Self::Platform { class, id } => write!(f, "-glaze-platform-color({class}, {id})"),
        }
    }
}
