//! The legacy `-glaze-gradient()` image.
//!
//! ```css
//! -glaze-gradient(linear, left top, right bottom, from(@bg), to(black))
//! -glaze-gradient(radial, center center, 0, center center, 0.5,
//!                 color-stop(0.5, white), to(alpha(white, 0)))
//! ```
//!
//! Points are fractions of the painted area, so the gradient scales with
//! the image size.

use core::f64::consts::PI;
use core::fmt;

use super::color::compute_color;
use super::dimension::lerp;
use super::{Color, ComputeContext, StyleValue};
use crate::paint::{Canvas2D, Extend, Pattern};
use crate::parser::{ParseError, ValueParser};
use crate::style::PropertyId;
use crate::tokenizer::CSSToken;

/// Gradient geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientKind {
    /// Along the line from the start point to the end point.
    Linear,
    /// Between the start circle and the end circle.
    Radial,
}

/// One color stop.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorStop {
    /// Position along the gradient, in `[0, 1]`.
    pub offset: f64,
    /// A color or color expression.
    pub color: StyleValue,
}

/// A linear or radial gradient.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    /// Linear or radial.
    pub kind: GradientKind,
    /// Start point x.
    pub x0: f64,
    /// Start point y.
    pub y0: f64,
    /// Start radius; zero for linear gradients.
    pub r0: f64,
    /// End point x.
    pub x1: f64,
    /// End point y.
    pub y1: f64,
    /// End radius; zero for linear gradients.
    pub r1: f64,
    /// Stops in source order.
    pub stops: Vec<ColorStop>,
}

impl Gradient {
    /// Whether every stop color is a literal.
    #[must_use]
    pub fn is_computed(&self) -> bool {
        self.stops
            .iter()
            .all(|s| matches!(s.color.kind(), super::ValueKind::Rgba(_)))
    }

    pub(crate) fn compute(&self, property: PropertyId, ctx: &ComputeContext<'_>) -> Self {
        Self {
            stops: self
                .stops
                .iter()
                .map(|s| ColorStop {
                    offset: s.offset,
                    color: compute_color(&s.color, property, ctx),
                })
                .collect(),
            ..self.clone()
        }
    }

    /// Interpolate geometry and stop colors. With no end gradient, fade
    /// out. Fails when the kinds or stop counts differ.
    #[must_use]
    pub fn transition(&self, end: Option<&Self>, property: PropertyId, progress: f64) -> Option<Self> {
        let progress = progress.clamp(0.0, 1.0);
        let Some(end) = end else {
            return Some(self.faded(1.0 - progress));
        };
        if self.kind != end.kind || self.stops.len() != end.stops.len() {
            return None;
        }
        let stops = self
            .stops
            .iter()
            .zip(&end.stops)
            .map(|(a, b)| {
                Some(ColorStop {
                    offset: lerp(a.offset, b.offset, progress),
                    color: a.color.transition(&b.color, property, progress)?,
                })
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Self {
            kind: self.kind,
            x0: lerp(self.x0, end.x0, progress),
            y0: lerp(self.y0, end.y0, progress),
            r0: lerp(self.r0, end.r0, progress),
            x1: lerp(self.x1, end.x1, progress),
            y1: lerp(self.y1, end.y1, progress),
            r1: lerp(self.r1, end.r1, progress),
            stops,
        })
    }

    /// The same gradient with every stop's alpha scaled by `opacity`.
    #[must_use]
    pub fn faded(&self, opacity: f64) -> Self {
        Self {
            stops: self
                .stops
                .iter()
                .map(|s| ColorStop {
                    offset: s.offset,
                    color: StyleValue::rgba(s.color.as_rgba().with_alpha_factor(opacity)),
                })
                .collect(),
            ..self.clone()
        }
    }

    /// The canvas pattern, in unit coordinates.
    #[must_use]
    pub fn pattern(&self) -> Pattern {
        let mut pattern = match self.kind {
            GradientKind::Linear => Pattern::linear(self.x0, self.y0, self.x1, self.y1),
            GradientKind::Radial => {
                Pattern::radial(self.x0, self.y0, self.r0, self.x1, self.y1, self.r1)
            }
        };
        for stop in &self.stops {
            pattern.add_color_stop(stop.offset, stop.color.as_rgba());
        }
        pattern
    }

    /// Fill a `width` × `height` area at the origin.
    pub fn draw(&self, canvas: &mut dyn Canvas2D, width: f64, height: f64) {
        canvas.save();
        canvas.scale(width, height);
        canvas.new_path();
        canvas.rectangle(0.0, 0.0, 1.0, 1.0);
        if !self.draw_circle(canvas) {
            canvas.set_source(self.pattern().with_extend(Extend::Pad));
            canvas.fill();
        }
        canvas.new_path();
        canvas.restore();
    }

    /// A radial gradient with a hard edge is a filled circle on a filled
    /// background; draw it that way. Expects the unit rectangle as the
    /// current path.
    fn draw_circle(&self, canvas: &mut dyn Canvas2D) -> bool {
        let [first, second] = self.stops.as_slice() else {
            return false;
        };
        if self.kind != GradientKind::Radial
            || self.x0 != self.x1
            || self.y0 != self.y1
            || self.r0 != 0.0
            || first.offset != second.offset
        {
            return false;
        }
        canvas.clip();
        canvas.set_source_rgba(second.color.as_rgba());
        canvas.paint();
        canvas.set_source_rgba(first.color.as_rgba());
        canvas.new_sub_path();
        canvas.arc(self.x1, self.y1, self.r1 * second.offset, 0.0, 2.0 * PI);
        canvas.fill();
        true
    }

    /// Parse the arguments after `-glaze-gradient(` up to and including
    /// the closing parenthesis.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] naming the first malformed part.
    pub fn parse_arguments(parser: &mut ValueParser<'_>) -> Result<Self, ParseError> {
        let kind = if parser.try_ident("linear") {
            GradientKind::Linear
        } else if parser.try_ident("radial") {
            GradientKind::Radial
        } else {
            return Err(parser.expected("'linear' or 'radial'"));
        };

        let mut coords = [0.0; 6];
        for point in coords.chunks_exact_mut(3) {
            parser.expect_comma()?;
            point[0] = parse_coordinate(parser, "left", "right")?;
            point[1] = parse_coordinate(parser, "top", "bottom")?;
            if kind == GradientKind::Radial {
                parser.expect_comma()?;
                point[2] = parser.expect_number()?;
            }
        }

        let mut stops = Vec::new();
        while parser.try_comma() {
            let offset = if parser.try_function("from") {
                0.0
            } else if parser.try_function("to") {
                1.0
            } else if parser.try_function("color-stop") {
                let offset = match parser.next_token() {
                    CSSToken::Number { value, .. } => *value,
                    CSSToken::Percentage(value) => value / 100.0,
                    other => {
                        return Err(ParseError::Expected {
                            expected: "a stop offset".to_string(),
                            found: other.to_string(),
                        });
                    }
                };
                parser.expect_comma()?;
                offset
            } else {
                return Err(parser.expected("a color stop"));
            };
            let color = Color::parse_value(parser)?;
            parser.expect_close_paren()?;
            stops.push(ColorStop { offset, color });
        }
        parser.expect_close_paren()?;

        let [x0, y0, r0, x1, y1, r1] = coords;
        Ok(Self {
            kind,
            x0,
            y0,
            r0,
            x1,
            y1,
            r1,
            stops,
        })
    }
}

fn parse_coordinate(parser: &mut ValueParser<'_>, low: &str, high: &str) -> Result<f64, ParseError> {
    if parser.try_ident(low) {
        Ok(0.0)
    } else if parser.try_ident(high) {
        Ok(1.0)
    } else if parser.try_ident("center") {
        Ok(0.5)
    } else {
        parser.expect_number()
    }
}

fn write_coordinate(f: &mut fmt::Formatter<'_>, value: f64, low: &str, high: &str) -> fmt::Result {
    if value == 0.0 {
        f.write_str(low)
    } else if value == 0.5 {
        f.write_str("center")
    } else if value == 1.0 {
        f.write_str(high)
    } else {
        write!(f, "{value}")
    }
}

impl fmt::Display for Gradient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let radial = self.kind == GradientKind::Radial;
        f.write_str(if radial {
            "-glaze-gradient(radial, "
        } else {
            "-glaze-gradient(linear, "
        })?;
        for (i, (x, y, r)) in [(self.x0, self.y0, self.r0), (self.x1, self.y1, self.r1)]
            .into_iter()
            .enumerate()
        {
            if i > 0 {
                f.write_str(", ")?;
            }
            write_coordinate(f, x, "left", "right")?;
            f.write_str(" ")?;
            write_coordinate(f, y, "top", "bottom")?;
            if radial {
                write!(f, ", {r}")?;
            }
        }
        for stop in &self.stops {
            if stop.offset == 0.0 {
                write!(f, ", from({})", stop.color)?;
            } else if stop.offset == 1.0 {
                write!(f, ", to({})", stop.color)?;
            } else {
                write!(f, ", color-stop({}, {})", stop.offset, stop.color)?;
            }
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_text;
    use crate::values::Rgba;

    fn parse(text: &str) -> Gradient {
        parse_text(text, |p| {
            if !p.try_function("-glaze-gradient") {
                return Err(p.expected("-glaze-gradient("));
            }
            Gradient::parse_arguments(p)
        })
        .unwrap()
    }

    #[test]
    fn test_parse_linear_keywords() {
        let g = parse("-glaze-gradient(linear, left top, right bottom, from(#fff), to(#000))");
        assert_eq!(g.kind, GradientKind::Linear);
        assert_eq!((g.x0, g.y0, g.x1, g.y1), (0.0, 0.0, 1.0, 1.0));
        assert_eq!(g.stops.len(), 2);
        assert_eq!(g.stops[1].color.as_rgba(), Rgba::BLACK);
    }

    #[test]
    fn test_print_round_trips() {
        let text = "-glaze-gradient(radial, center center, 0, center 0.25, 0.5, color-stop(0.3, rgb(255,0,0)), to(rgb(0,0,255)))";
        let g = parse(text);
        assert_eq!(parse(&g.to_string()), g);
    }

    #[test]
    fn test_transition_requires_matching_stops() {
        let a = parse("-glaze-gradient(linear, left top, left bottom, from(#fff), to(#000))");
        let b = parse("-glaze-gradient(linear, left top, right top, from(#000))");
        assert!(a.transition(Some(&b), PropertyId::BackgroundImage, 0.5).is_none());
        let faded = a.transition(None, PropertyId::BackgroundImage, 0.75).unwrap();
        assert_eq!(faded.stops[0].color.as_rgba().alpha, 0.25);
    }
}
