//! Numbers with units.
//!
//! [CSS Values § 5 Numeric Data Types](https://www.w3.org/TR/css-values-4/#numeric-types)
//!
//! Computing a dimension converts every length to `px`, every angle to `deg`
//! and every time to `s`. Percentages stay percentages except in
//! `font-size`, where they resolve against the parent font size.

use core::f64::consts::PI;
use core::fmt;

use bitflags::bitflags;
use strum_macros::{Display, EnumIter, EnumString};

use super::{Calc, ComputeContext, StyleValue, ValueKind};
use crate::parser::{ParseError, ValueParser};
use crate::style::PropertyId;
use crate::tokenizer::CSSToken;

/// Physical length of one centimetre in inches.
const INCHES_PER_CM: f64 = 0.393_700_787_401_574_77;
/// Physical length of one millimetre in inches.
const INCHES_PER_MM: f64 = 0.039_370_078_740_157_477;

/// Units a [`Dimension`] may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Unit {
    /// No unit.
    #[strum(serialize = "")]
    Number,
    /// `%`
    #[strum(serialize = "%")]
    Percent,
    /// Pixels.
    Px,
    /// Points, 1/72 inch.
    Pt,
    /// Relative to the font size.
    Em,
    /// Half an `em`.
    Ex,
    /// Relative to the global default font size.
    Rem,
    /// Picas, 12 points.
    Pc,
    /// Inches.
    In,
    /// Centimetres.
    Cm,
    /// Millimetres.
    Mm,
    /// Radians.
    Rad,
    /// Degrees.
    Deg,
    /// Gradians.
    Grad,
    /// Turns.
    Turn,
    /// Seconds.
    S,
    /// Milliseconds.
    Ms,
}

/// What a unit measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    /// A plain number.
    Number,
    /// A percentage.
    Percent,
    /// A length.
    Length,
    /// An angle.
    Angle,
    /// A duration.
    Time,
}

impl Unit {
    /// The category of this unit.
    #[must_use]
    pub const fn kind(self) -> UnitKind {
        match self {
            Self::Number => UnitKind::Number,
            Self::Percent => UnitKind::Percent,
            Self::Px
            | Self::Pt
            | Self::Em
            | Self::Ex
            | Self::Rem
            | Self::Pc
            | Self::In
            | Self::Cm
            | Self::Mm => UnitKind::Length,
            Self::Rad | Self::Deg | Self::Grad | Self::Turn => UnitKind::Angle,
            Self::S | Self::Ms => UnitKind::Time,
        }
    }

    /// Sort key for the terms of a `calc()` sum. Terms print in this order
    /// so that equal sums print identically.
    #[must_use]
    pub const fn calc_term_order(self) -> u32 {
        1000 + match self {
            Self::Number => 0,
            Self::Cm => 1,
            Self::Deg => 2,
            Self::Em => 3,
            Self::Ex => 4,
            Self::Grad => 5,
            Self::In => 6,
            Self::Mm => 7,
            Self::Ms => 8,
            Self::Pc => 9,
            Self::Pt => 10,
            Self::Px => 11,
            Self::Rad => 12,
            Self::Rem => 13,
            Self::S => 14,
            Self::Turn => 15,
            Self::Percent => 16,
        }
    }
}

bitflags! {
    /// What a numeric property accepts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct NumberFlags: u32 {
        /// Percentages.
        const PARSE_PERCENT = 1 << 0;
        /// Unitless numbers.
        const PARSE_NUMBER = 1 << 1;
        /// Lengths.
        const PARSE_LENGTH = 1 << 2;
        /// Angles.
        const PARSE_ANGLE = 1 << 3;
        /// Durations.
        const PARSE_TIME = 1 << 4;
        /// Reject negative values.
        const POSITIVE_ONLY = 1 << 5;
        /// Treat a unitless number as pixels (legacy theme syntax).
        const NUMBER_AS_PIXELS = 1 << 6;
    }
}

/// A number with a unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimension {
    /// The magnitude.
    pub value: f64,
    /// The unit.
    pub unit: Unit,
}

impl Dimension {
    /// Create a dimension.
    #[must_use]
    pub const fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// The value, with a percentage taken relative to `one_hundred_percent`.
    #[must_use]
    pub fn get(self, one_hundred_percent: f64) -> f64 {
        if self.unit == Unit::Percent {
            self.value * one_hundred_percent / 100.0
        } else {
            self.value
        }
    }

    /// Sum two dimensions if they share a unit.
    #[must_use]
    pub fn try_add(self, other: Self) -> Option<Self> {
        (self.unit == other.unit).then(|| Self::new(self.value + other.value, self.unit))
    }

    /// Scale by a factor.
    #[must_use]
    pub fn multiply(self, factor: f64) -> Self {
        Self::new(self.value * factor, self.unit)
    }

    /// Convert an absolute length to `target` at the given resolution.
    /// Returns `None` for font-relative or non-length units.
    #[must_use]
    pub fn convert(self, target: Unit, dpi: f64) -> Option<Self> {
        let px = absolute_length_factor(self.unit, dpi)?;
        let factor = absolute_length_factor(target, dpi)?;
        Some(Self::new(self.value * px / factor, target))
    }

    pub(crate) fn compute(
        self,
        this: &StyleValue,
        property: PropertyId,
        ctx: &ComputeContext<'_>,
    ) -> StyleValue {
        let v = self.value;
        match self.unit {
            Unit::Percent if property == PropertyId::FontSize => {
                StyleValue::px(v / 100.0 * ctx.parent_font_size())
            }
            Unit::Number | Unit::Percent | Unit::Px | Unit::Deg | Unit::S => this.clone(),
            Unit::Pt | Unit::Pc | Unit::In | Unit::Cm | Unit::Mm => StyleValue::px(
                v * absolute_length_factor(self.unit, ctx.dpi()).unwrap_or(1.0),
            ),
            Unit::Em => StyleValue::px(v * base_font_size(property, ctx)),
            Unit::Ex => StyleValue::px(v * base_font_size(property, ctx) * 0.5),
            Unit::Rem => StyleValue::px(v * ctx.settings.font_size),
            Unit::Rad => StyleValue::dimension(v * 180.0 / PI, Unit::Deg),
            Unit::Grad => StyleValue::dimension(v * 360.0 / 400.0, Unit::Deg),
            Unit::Turn => StyleValue::dimension(v * 360.0, Unit::Deg),
            Unit::Ms => StyleValue::dimension(v / 1000.0, Unit::S),
        }
    }

    /// Interpolate. Mismatched units interpolate as a `calc()` sum.
    #[must_use]
    pub fn transition(self, end: &Self, progress: f64) -> StyleValue {
        if self.unit == end.unit {
            StyleValue::dimension(lerp(self.value, end.value, progress), self.unit)
        } else {
            Calc::from_terms(vec![
                self.multiply(1.0 - progress),
                end.multiply(progress),
            ])
        }
    }
}

/// Linear interpolation that reproduces both endpoints exactly.
#[must_use]
pub fn lerp(start: f64, end: f64, progress: f64) -> f64 {
    start * (1.0 - progress) + end * progress
}

/// Pixels per unit for absolute lengths.
fn absolute_length_factor(unit: Unit, dpi: f64) -> Option<f64> {
    Some(match unit {
        Unit::Px => 1.0,
        Unit::Pt => dpi / 72.0,
        Unit::Pc => dpi / 72.0 * 12.0,
        Unit::In => dpi,
        Unit::Cm => dpi * INCHES_PER_CM,
        Unit::Mm => dpi * INCHES_PER_MM,
        _ => return None,
    })
}

/// `em` in `font-size` refers to the parent's font size; everywhere else it
/// refers to the element's own.
fn base_font_size(property: PropertyId, ctx: &ComputeContext<'_>) -> f64 {
    if property == PropertyId::FontSize {
        ctx.parent_font_size()
    } else {
        ctx.font_size()
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.is_infinite() {
            let sign = if self.value < 0.0 { "-" } else { "" };
            return write!(f, "{sign}infinite");
        }
        if self.value == 0.0 && self.unit != Unit::Percent {
            return f.write_str("0");
        }
        write!(f, "{}{}", self.value, self.unit)
    }
}

/// Whether the next token can start a number: a numeric token or `calc(`.
pub fn can_parse_number(parser: &mut ValueParser<'_>) -> bool {
    matches!(
        parser.peek(),
        CSSToken::Number { .. } | CSSToken::Percentage(_) | CSSToken::Dimension { .. }
    ) || parser.begins_with_function("calc")
}

/// Parse a dimension or `calc()` accepted by `flags`.
///
/// # Errors
///
/// Returns a [`ParseError`] for a missing number, a unit the flags do not
/// allow, or a negative value under [`NumberFlags::POSITIVE_ONLY`].
pub fn parse_number(
    parser: &mut ValueParser<'_>,
    flags: NumberFlags,
) -> Result<StyleValue, ParseError> {
    if parser.begins_with_function("calc") {
        return Calc::parse(parser, flags);
    }
    let dimension = parse_dimension(parser, flags)?;
    Ok(StyleValue::dimension(dimension.value, dimension.unit))
}

/// Parse a single dimension without `calc()`.
///
/// # Errors
///
/// See [`parse_number`].
pub fn parse_dimension(
    parser: &mut ValueParser<'_>,
    flags: NumberFlags,
) -> Result<Dimension, ParseError> {
    let dimension = match parser.peek() {
        CSSToken::Percentage(value) => {
            if !flags.contains(NumberFlags::PARSE_PERCENT) {
                return Err(ParseError::invalid("percentages are not allowed here"));
            }
            Dimension::new(*value, Unit::Percent)
        }
        CSSToken::Dimension { value, unit } => {
            let unit: Unit = unit
                .parse()
                .map_err(|_| ParseError::invalid(format!("'{unit}' is not a valid unit")))?;
            let allowed = match unit.kind() {
                UnitKind::Length => NumberFlags::PARSE_LENGTH,
                UnitKind::Angle => NumberFlags::PARSE_ANGLE,
                UnitKind::Time => NumberFlags::PARSE_TIME,
                UnitKind::Number | UnitKind::Percent => NumberFlags::empty(),
            };
            if !flags.intersects(allowed) {
                return Err(ParseError::invalid(format!("'{unit}' is not allowed here")));
            }
            Dimension::new(*value, unit)
        }
        CSSToken::Number { value, .. } => {
            let unit = if flags.contains(NumberFlags::PARSE_NUMBER) {
                Unit::Number
            } else if *value == 0.0 {
                zero_unit(flags)
            } else if flags.contains(NumberFlags::NUMBER_AS_PIXELS) {
                Unit::Px
            } else {
                return Err(ParseError::invalid("unit is missing"));
            };
            Dimension::new(*value, unit)
        }
        CSSToken::Ident(name) if flags.contains(NumberFlags::PARSE_NUMBER) && is_infinite_keyword(name) => {
            let value = if name.starts_with('-') { f64::NEG_INFINITY } else { f64::INFINITY };
            Dimension::new(value, Unit::Number)
        }
        _ => return Err(parser.expected("a number")),
    };
    let _ = parser.next_token();

    if flags.contains(NumberFlags::POSITIVE_ONLY) && dimension.value < 0.0 {
        return Err(ParseError::invalid("negative values are not allowed"));
    }
    Ok(dimension)
}

/// `infinite` or `-infinite`, as [`Dimension`] prints them.
fn is_infinite_keyword(name: &str) -> bool {
    name.strip_prefix('-').unwrap_or(name).eq_ignore_ascii_case("infinite")
}

/// The unit a bare `0` takes under `flags`.
const fn zero_unit(flags: NumberFlags) -> Unit {
    if flags.contains(NumberFlags::PARSE_LENGTH) {
        Unit::Px
    } else if flags.contains(NumberFlags::PARSE_ANGLE) {
        Unit::Deg
    } else if flags.contains(NumberFlags::PARSE_TIME) {
        Unit::S
    } else {
        Unit::Percent
    }
}

impl StyleValue {
    /// The dimension held by this value, if it is one.
    #[must_use]
    pub fn as_dimension(&self) -> Option<Dimension> {
        match self.kind() {
            ValueKind::Dimension(d) => Some(*d),
            _ => None,
        }
    }
}
