//! Four-sided values for border images.
//!
//! [CSS Backgrounds § 6.2](https://www.w3.org/TR/css-backgrounds-3/#border-image-slice)
//!
//! "The four values set the top, right, bottom and left offsets
//! respectively. If the left is missing, it is the same as the right; if
//! the bottom is missing, it is the same as the top; if the right is
//! missing, it is the same as the top."

use core::fmt;

use super::dimension::{can_parse_number, parse_number};
use super::{ComputeContext, NumberFlags, StyleValue, ValueKind};
use crate::geometry::Side;
use crate::parser::{ParseError, ValueParser};
use crate::style::PropertyId;

/// Top, right, bottom and left values plus the `fill` keyword.
#[derive(Debug, Clone, PartialEq)]
pub struct BorderQuad {
    /// One value per side, in [`Side`] order.
    pub values: [StyleValue; 4],
    /// Whether `fill` was given (slices only).
    pub fill: bool,
}

impl BorderQuad {
    /// Wrap four values into a style value.
    #[must_use]
    pub fn new_value(values: [StyleValue; 4], fill: bool) -> StyleValue {
        StyleValue::new(ValueKind::BorderQuad(Self { values, fill }))
    }

    /// The value for one side.
    #[must_use]
    pub fn side(&self, side: Side) -> &StyleValue {
        &self.values[side as usize]
    }

    pub(crate) fn compute(
        &self,
        this: &StyleValue,
        property: PropertyId,
        ctx: &ComputeContext<'_>,
    ) -> StyleValue {
        let computed = self.values.clone().map(|v| v.compute(property, ctx));
        if computed
            .iter()
            .zip(&self.values)
            .all(|(a, b)| StyleValue::ptr_eq(a, b))
        {
            this.clone()
        } else {
            Self::new_value(computed, self.fill)
        }
    }

    /// Interpolate side by side; fails when the `fill` flags differ.
    #[must_use]
    pub fn transition(&self, end: &Self, property: PropertyId, progress: f64) -> Option<Self> {
        if self.fill != end.fill {
            return None;
        }
        let [a, b, c, d] = &self.values;
        let [e, f, g, h] = &end.values;
        Some(Self {
            values: [
                a.transition(e, property, progress)?,
                b.transition(f, property, progress)?,
                c.transition(g, property, progress)?,
                d.transition(h, property, progress)?,
            ],
            fill: self.fill,
        })
    }

    /// Parse one to four numbers under `flags`, plus `fill` before or
    /// after them when `allow_fill` is set.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when no number is present.
    pub fn parse(
        parser: &mut ValueParser<'_>,
        flags: NumberFlags,
        allow_fill: bool,
    ) -> Result<StyleValue, ParseError> {
        let mut fill = allow_fill && parser.try_ident("fill");

        let mut parsed = Vec::with_capacity(4);
        parsed.push(parse_number(parser, flags)?);
        while parsed.len() < 4 && can_parse_number(parser) {
            parsed.push(parse_number(parser, flags)?);
        }
        if allow_fill && !fill {
            fill = parser.try_ident("fill");
        }

        let top = parsed[0].clone();
        let right = parsed.get(1).cloned().unwrap_or_else(|| top.clone());
        let bottom = parsed.get(2).cloned().unwrap_or_else(|| top.clone());
        let left = parsed.get(3).cloned().unwrap_or_else(|| right.clone());
        Ok(Self::new_value([top, right, bottom, left], fill))
    }
}

impl fmt::Display for BorderQuad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [top, right, bottom, left] = &self.values;
        let count = if left.equal(right) {
            if bottom.equal(top) {
                if right.equal(top) { 1 } else { 2 }
            } else {
                3
            }
        } else {
            4
        };
        for (i, value) in self.values.iter().take(count).enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            value.fmt(f)?;
        }
        if self.fill {
            f.write_str(" fill")?;
        }
        Ok(())
    }
}

impl StyleValue {
    /// The four-sided value held by this value.
    #[must_use]
    pub fn as_border_quad(&self) -> Option<&BorderQuad> {
        match self.kind() {
            ValueKind::BorderQuad(q) => Some(q),
            _ => None,
        }
    }
}
