//! Corner radii: one `border-*-radius` value.

use core::fmt;

use super::dimension::{can_parse_number, parse_number};
use super::{ComputeContext, NumberFlags, StyleValue, ValueKind};
use crate::parser::{ParseError, ValueParser};
use crate::style::PropertyId;

/// Horizontal and vertical radius of one corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Corner {
    /// Horizontal radius; percentages refer to the box width.
    pub x: StyleValue,
    /// Vertical radius; percentages refer to the box height.
    pub y: StyleValue,
}

impl Corner {
    /// Wrap two radii into a value.
    #[must_use]
    pub fn new_value(x: StyleValue, y: StyleValue) -> StyleValue {
        StyleValue::new(ValueKind::Corner(Self { x, y }))
    }

    /// Horizontal radius in px for a box of `width`.
    #[must_use]
    pub fn x(&self, width: f64) -> f64 {
        self.x.number_value(width)
    }

    /// Vertical radius in px for a box of `height`.
    #[must_use]
    pub fn y(&self, height: f64) -> f64 {
        self.y.number_value(height)
    }

    pub(crate) fn compute(
        &self,
        this: &StyleValue,
        property: PropertyId,
        ctx: &ComputeContext<'_>,
    ) -> StyleValue {
        let x = self.x.compute(property, ctx);
        let y = self.y.compute(property, ctx);
        if StyleValue::ptr_eq(&x, &self.x) && StyleValue::ptr_eq(&y, &self.y) {
            this.clone()
        } else {
            Self::new_value(x, y)
        }
    }

    /// Interpolate both radii.
    #[must_use]
    pub fn transition(&self, end: &Self, property: PropertyId, progress: f64) -> Option<Self> {
        Some(Self {
            x: self.x.transition(&end.x, property, progress)?,
            y: self.y.transition(&end.y, property, progress)?,
        })
    }

    /// Parse one or two non-negative lengths or percentages.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when no radius is present.
    pub fn parse(parser: &mut ValueParser<'_>) -> Result<StyleValue, ParseError> {
        let x = parse_number(parser, radius_flags())?;
        let y = if can_parse_number(parser) {
            parse_number(parser, radius_flags())?
        } else {
            x.clone()
        };
        Ok(Self::new_value(x, y))
    }
}

/// What a corner radius accepts.
#[must_use]
pub fn radius_flags() -> NumberFlags {
    NumberFlags::PARSE_LENGTH
        | NumberFlags::PARSE_PERCENT
        | NumberFlags::POSITIVE_ONLY
        | NumberFlags::NUMBER_AS_PIXELS
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.x.fmt(f)?;
        if !self.x.equal(&self.y) {
            write!(f, " {}", self.y)?;
        }
        Ok(())
    }
}

impl StyleValue {
    /// The corner radii held by this value.
    #[must_use]
    pub fn as_corner(&self) -> Option<&Corner> {
        match self.kind() {
            ValueKind::Corner(c) => Some(c),
            _ => None,
        }
    }
}
