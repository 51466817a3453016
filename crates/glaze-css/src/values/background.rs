//! Background layer geometry: size, position and repeat.
//!
//! [CSS Backgrounds § 3](https://www.w3.org/TR/css-backgrounds-3/#backgrounds)

use core::fmt;

use strum_macros::{Display, EnumString};

use super::dimension::{can_parse_number, parse_number};
use super::{Calc, ComputeContext, Dimension, Image, NumberFlags, StyleValue, Unit, ValueKind};
use crate::parser::{ParseError, ValueParser};
use crate::style::PropertyId;

fn length_percent() -> NumberFlags {
    NumberFlags::PARSE_LENGTH | NumberFlags::PARSE_PERCENT
}

/// One `background-size` entry.
#[derive(Debug, Clone, PartialEq)]
pub enum BgSize {
    /// Scale to cover the whole area.
    Cover,
    /// Scale to fit inside the area.
    Contain,
    /// Explicit width and height; `None` is `auto`.
    Explicit {
        /// Width, or `auto`.
        x: Option<StyleValue>,
        /// Height, or `auto`.
        y: Option<StyleValue>,
    },
}

impl BgSize {
    /// `auto`, the initial value.
    #[must_use]
    pub fn auto_value() -> StyleValue {
        StyleValue::new(ValueKind::BgSize(Self::Explicit { x: None, y: None }))
    }

    pub(crate) fn compute(
        &self,
        this: &StyleValue,
        property: PropertyId,
        ctx: &ComputeContext<'_>,
    ) -> StyleValue {
        let Self::Explicit { x, y } = self else {
            return this.clone();
        };
        let cx = x.as_ref().map(|v| v.compute(property, ctx));
        let cy = y.as_ref().map(|v| v.compute(property, ctx));
        let same = |a: &Option<StyleValue>, b: &Option<StyleValue>| match (a, b) {
            (Some(a), Some(b)) => StyleValue::ptr_eq(a, b),
            _ => true,
        };
        if same(&cx, x) && same(&cy, y) {
            this.clone()
        } else {
            StyleValue::new(ValueKind::BgSize(Self::Explicit { x: cx, y: cy }))
        }
    }

    /// Interpolate explicit sizes whose `auto` sides match.
    #[must_use]
    pub fn transition(&self, end: &Self, property: PropertyId, progress: f64) -> Option<Self> {
        let step = |a: &Option<StyleValue>, b: &Option<StyleValue>| match (a, b) {
            (Some(a), Some(b)) => a.transition(b, property, progress).map(Some),
            (None, None) => Some(None),
            _ => None,
        };
        match (self, end) {
            (Self::Explicit { x: x1, y: y1 }, Self::Explicit { x: x2, y: y2 }) => Some(Self::Explicit {
                x: step(x1, x2)?,
                y: step(y1, y2)?,
            }),
            _ => None,
        }
    }

    /// Parse `cover`, `contain`, or one or two of length, percentage or
    /// `auto`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when no size is present.
    pub fn parse(parser: &mut ValueParser<'_>) -> Result<StyleValue, ParseError> {
        if parser.try_ident("cover") {
            return Ok(StyleValue::new(ValueKind::BgSize(Self::Cover)));
        }
        if parser.try_ident("contain") {
            return Ok(StyleValue::new(ValueKind::BgSize(Self::Contain)));
        }
        let flags = length_percent() | NumberFlags::POSITIVE_ONLY;
        let x = if parser.try_ident("auto") {
            None
        } else {
            Some(parse_number(parser, flags)?)
        };
        let y = if parser.try_ident("auto") {
            None
        } else if can_parse_number(parser) {
            Some(parse_number(parser, flags)?)
        } else {
            None
        };
        Ok(StyleValue::new(ValueKind::BgSize(Self::Explicit { x, y })))
    }

    /// The layer size for `image` painted in an `area`.
    #[must_use]
    pub fn resolve(&self, image: &Image, area: (f64, f64)) -> (f64, f64) {
        let (area_w, area_h) = area;
        match self {
            Self::Cover | Self::Contain => {
                let ratio = image.aspect_ratio();
                if ratio <= 0.0 {
                    return area;
                }
                let fit_width = (area_w, area_w / ratio);
                let fit_height = (area_h * ratio, area_h);
                let width_covers = fit_width.1 >= area_h;
                if width_covers == matches!(self, Self::Cover) {
                    fit_width
                } else {
                    fit_height
                }
            }
            Self::Explicit { x, y } => image.concrete_size(
                x.as_ref().map_or(0.0, |v| v.number_value(area_w)),
                y.as_ref().map_or(0.0, |v| v.number_value(area_h)),
                area_w,
                area_h,
            ),
        }
    }
}

impl fmt::Display for BgSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cover => f.write_str("cover"),
            Self::Contain => f.write_str("contain"),
            Self::Explicit { x, y } => {
                match x {
                    Some(x) => x.fmt(f)?,
                    None => f.write_str("auto")?,
                }
                if let Some(y) = y {
                    write!(f, " {y}")?;
                }
                Ok(())
            }
        }
    }
}

/// A `background-position` entry. Both coordinates are lengths,
/// percentages or `calc()` sums of the two.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    /// Horizontal offset.
    pub x: StyleValue,
    /// Vertical offset.
    pub y: StyleValue,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
    Either,
}

const POSITION_KEYWORDS: [(&str, f64, Axis); 5] = [
    ("left", 0.0, Axis::Horizontal),
    ("right", 100.0, Axis::Horizontal),
    ("top", 0.0, Axis::Vertical),
    ("bottom", 100.0, Axis::Vertical),
    ("center", 50.0, Axis::Either),
];

impl Position {
    /// `0% 0%`, the initial value.
    #[must_use]
    pub fn initial_value() -> StyleValue {
        Self::new_value(
            StyleValue::dimension(0.0, Unit::Percent),
            StyleValue::dimension(0.0, Unit::Percent),
        )
    }

    /// Wrap two offsets into a value.
    #[must_use]
    pub fn new_value(x: StyleValue, y: StyleValue) -> StyleValue {
        StyleValue::new(ValueKind::Position(Self { x, y }))
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

    /// Interpolate both offsets.
    #[must_use]
    pub fn transition(&self, end: &Self, property: PropertyId, progress: f64) -> Option<Self> {
        Some(Self {
            x: self.x.transition(&end.x, property, progress)?,
            y: self.y.transition(&end.y, property, progress)?,
        })
    }

    /// Offsets in px for a layer of `layer` size in an `area`.
    /// Percentages align the same point of the layer and the area.
    #[must_use]
    pub fn resolve(&self, area: (f64, f64), layer: (f64, f64)) -> (f64, f64) {
        (
            self.x.number_value(area.0 - layer.0),
            self.y.number_value(area.1 - layer.1),
        )
    }

    /// Parse one or two components, each a keyword, a length or
    /// percentage, or an edge keyword followed by an offset.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for missing or conflicting components.
    pub fn parse(parser: &mut ValueParser<'_>) -> Result<StyleValue, ParseError> {
        let first = parse_component(parser)?.ok_or_else(|| parser.expected("a position"))?;
        let second = parse_component(parser)?;

        let center = || StyleValue::dimension(50.0, Unit::Percent);
        let (x, y) = match (first, second) {
            ((value, Axis::Vertical), None) => (center(), value),
            ((value, _), None) => (value, center()),
            ((a, Axis::Vertical), Some((b, Axis::Horizontal | Axis::Either)))
            | ((b, Axis::Horizontal | Axis::Either), Some((a, Axis::Vertical | Axis::Either)))
            | ((a, Axis::Either), Some((b, Axis::Horizontal))) => (b, a),
            _ => return Err(ParseError::invalid("both position values are on the same axis")),
        };
        Ok(Self::new_value(x, y))
    }
}

fn parse_component(parser: &mut ValueParser<'_>) -> Result<Option<(StyleValue, Axis)>, ParseError> {
    for (name, percent, axis) in POSITION_KEYWORDS {
        if !parser.try_ident(name) {
            continue;
        }
        if axis == Axis::Either || !can_parse_number(parser) {
            return Ok(Some((StyleValue::dimension(percent, Unit::Percent), axis)));
        }
        let offset = parse_number(parser, length_percent())?;
        let value = if percent == 0.0 {
            offset
        } else {
            // `right 10px` is 10px from the far edge.
            let terms = match offset.kind() {
                ValueKind::Dimension(d) => vec![*d],
                ValueKind::Calc(c) => c.terms().to_vec(),
                _ => Vec::new(),
            };
            Calc::from_terms(
                core::iter::once(Dimension::new(100.0, Unit::Percent))
                    .chain(terms.into_iter().map(|d| d.multiply(-1.0)))
                    .collect(),
            )
        };
        return Ok(Some((value, axis)));
    }
    if can_parse_number(parser) {
        return Ok(Some((parse_number(parser, length_percent())?, Axis::Either)));
    }
    Ok(None)
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.x, self.y)
    }
}

/// How an image tiles along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum RepeatStyle {
    /// Draw once.
    NoRepeat,
    /// Tile at natural size.
    Repeat,
    /// Tile, scaling so a whole number of tiles fits.
    Round,
    /// Tile at natural size, spacing whole tiles evenly.
    Space,
    /// Scale one copy to fill (border images only).
    Stretch,
}

/// Repeat styles for both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repeat {
    /// Horizontal repeat.
    pub x: RepeatStyle,
    /// Vertical repeat.
    pub y: RepeatStyle,
}

impl Repeat {
    /// Wrap a pair into a value.
    #[must_use]
    pub fn new_value(x: RepeatStyle, y: RepeatStyle) -> StyleValue {
        StyleValue::new(ValueKind::Repeat(Self { x, y }))
    }

    /// Parse a `background-repeat` entry: `repeat-x`, `repeat-y`, or one
    /// or two of `repeat`, `space`, `round`, `no-repeat`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for unknown keywords.
    pub fn parse_background(parser: &mut ValueParser<'_>) -> Result<StyleValue, ParseError> {
        if parser.try_ident("repeat-x") {
            return Ok(Self::new_value(RepeatStyle::Repeat, RepeatStyle::NoRepeat));
        }
        if parser.try_ident("repeat-y") {
            return Ok(Self::new_value(RepeatStyle::NoRepeat, RepeatStyle::Repeat));
        }
        Self::parse_pair(parser, &[
            RepeatStyle::Repeat,
            RepeatStyle::Space,
            RepeatStyle::Round,
            RepeatStyle::NoRepeat,
        ])
    }

    /// Parse a `border-image-repeat` value: one or two of `stretch`,
    /// `repeat`, `round`, `space`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for unknown keywords.
    pub fn parse_border_image(parser: &mut ValueParser<'_>) -> Result<StyleValue, ParseError> {
        Self::parse_pair(parser, &[
            RepeatStyle::Stretch,
            RepeatStyle::Repeat,
            RepeatStyle::Round,
            RepeatStyle::Space,
        ])
    }

    fn parse_pair(parser: &mut ValueParser<'_>, allowed: &[RepeatStyle]) -> Result<StyleValue, ParseError> {
        let parse_one = |parser: &mut ValueParser<'_>| {
            let checkpoint = parser.checkpoint();
            let style = parser
                .try_any_ident()
                .and_then(|ident| ident.parse::<RepeatStyle>().ok())
                .filter(|style| allowed.contains(style));
            if style.is_none() {
                parser.rewind(checkpoint);
            }
            style
        };
        let Some(x) = parse_one(parser) else {
            let names: Vec<String> = allowed.iter().map(ToString::to_string).collect();
            return Err(parser.expected(&names.join(" | ")));
        };
        let y = parse_one(parser).unwrap_or(x);
        Ok(Self::new_value(x, y))
    }
}

impl fmt::Display for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.x, self.y) {
            (RepeatStyle::Repeat, RepeatStyle::NoRepeat) => f.write_str("repeat-x"),
            (RepeatStyle::NoRepeat, RepeatStyle::Repeat) => f.write_str("repeat-y"),
            (x, y) if x == y => x.fmt(f),
            (x, y) => write!(f, "{x} {y}"),
        }
    }
}

impl StyleValue {
    /// The background size held by this value.
    #[must_use]
    pub fn as_bg_size(&self) -> Option<&BgSize> {
        match self.kind() {
            ValueKind::BgSize(s) => Some(s),
            _ => None,
        }
    }

    /// The position held by this value.
    #[must_use]
    pub fn as_position(&self) -> Option<&Position> {
        match self.kind() {
            ValueKind::Position(p) => Some(p),
            _ => None,
        }
    }

    /// The repeat pair held by this value.
    #[must_use]
    pub fn as_repeat(&self) -> Option<Repeat> {
        match self.kind() {
            ValueKind::Repeat(r) => Some(*r),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_text;

    #[test]
    fn test_position_keywords() {
        let value = parse_text("bottom", Position::parse).unwrap();
        assert_eq!(value.to_string(), "50% 100%");
        let value = parse_text("top right", Position::parse).unwrap();
        assert_eq!(value.to_string(), "100% 0%");
    }

    #[test]
    fn test_position_edge_offset() {
        let value = parse_text("right 10px top", Position::parse).unwrap();
        let position = value.as_position().unwrap();
        assert_eq!(position.resolve((100.0, 50.0), (20.0, 20.0)).0, 70.0);
    }

    #[test]
    fn test_position_rejects_same_axis() {
        assert!(parse_text("left right", Position::parse).is_err());
    }

    #[test]
    fn test_repeat_shorthands_print() {
        let value = parse_text("repeat no-repeat", Repeat::parse_background).unwrap();
        assert_eq!(value.to_string(), "repeat-x");
        let value = parse_text("round", Repeat::parse_background).unwrap();
        assert_eq!(value.as_repeat(), Some(Repeat { x: RepeatStyle::Round, y: RepeatStyle::Round }));
        assert!(parse_text("stretch", Repeat::parse_background).is_err());
    }

    #[test]
    fn test_bg_size_parse() {
        assert_eq!(parse_text("auto", BgSize::parse).unwrap().to_string(), "auto");
        assert_eq!(parse_text("auto 10px", BgSize::parse).unwrap().to_string(), "auto 10px");
        assert_eq!(parse_text("cover", BgSize::parse).unwrap().to_string(), "cover");
    }
}
