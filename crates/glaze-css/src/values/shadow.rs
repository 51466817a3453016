//! Box, text and icon shadows.
//!
//! [CSS Backgrounds § 7.1](https://www.w3.org/TR/css-backgrounds-3/#box-shadow)
//!
//! "Each shadow is given as a `<shadow>`, represented by 2-4 length values,
//! an optional color, and an optional inset keyword."

use core::fmt;

use super::color::compute_color;
use super::dimension::{can_parse_number, parse_number};
use super::{Color, ComputeContext, NumberFlags, Rgba, StyleValue, ValueKind};
use crate::paint::blur;
use crate::parser::{ParseError, ValueParser};
use crate::style::PropertyId;

/// One shadow.
#[derive(Debug, Clone, PartialEq)]
pub struct Shadow {
    /// Horizontal offset.
    pub hoffset: StyleValue,
    /// Vertical offset.
    pub voffset: StyleValue,
    /// Blur radius, never negative.
    pub radius: StyleValue,
    /// Spread distance. Always zero for text and icon shadows.
    pub spread: StyleValue,
    /// Whether the shadow is drawn inside the padding box.
    pub inset: bool,
    /// Shadow color.
    pub color: StyleValue,
}

/// The pixel parameters of a computed shadow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowParams {
    /// Horizontal offset in px.
    pub hoffset: f64,
    /// Vertical offset in px.
    pub voffset: f64,
    /// Blur radius in px.
    pub radius: f64,
    /// Spread in px.
    pub spread: f64,
    /// Inset flag.
    pub inset: bool,
    /// Resolved color.
    pub color: Rgba,
}

/// Per-side distances a shadow paints outside its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShadowExtents {
    /// Above the box.
    pub top: i32,
    /// Right of the box.
    pub right: i32,
    /// Below the box.
    pub bottom: i32,
    /// Left of the box.
    pub left: i32,
}

impl Shadow {
    /// A transparent shadow with zero offsets, blur and spread, used as the
    /// counterpart of `target` when two lists differ in length.
    #[must_use]
    pub fn new_for_transition(target: &Self) -> Self {
        Self {
            hoffset: StyleValue::px(0.0),
            voffset: StyleValue::px(0.0),
            radius: StyleValue::px(0.0),
            spread: StyleValue::px(0.0),
            inset: target.inset,
            color: StyleValue::rgba(Rgba::TRANSPARENT),
        }
    }

    /// The pixel parameters. Only meaningful on computed shadows.
    #[must_use]
    pub fn params(&self) -> ShadowParams {
        ShadowParams {
            hoffset: self.hoffset.number_value(0.0),
            voffset: self.voffset.number_value(0.0),
            radius: self.radius.number_value(0.0),
            spread: self.spread.number_value(0.0),
            inset: self.inset,
            color: self.color.as_rgba(),
        }
    }

    /// How far an outset shadow reaches past its box on each side.
    #[must_use]
    pub fn extents(&self) -> ShadowExtents {
        if self.inset {
            return ShadowExtents::default();
        }
        let p = self.params();
        let clip_radius = f64::from(blur::compute_pixels(p.radius));
        let reach = |offset: f64| (clip_radius + p.spread + offset).ceil().max(0.0) as i32;
        ShadowExtents {
            top: reach(-p.voffset),
            right: reach(p.hoffset),
            bottom: reach(p.voffset),
            left: reach(-p.hoffset),
        }
    }

    pub(crate) fn compute(
        &self,
        this: &StyleValue,
        property: PropertyId,
        ctx: &ComputeContext<'_>,
    ) -> StyleValue {
        let hoffset = self.hoffset.compute(property, ctx);
        let voffset = self.voffset.compute(property, ctx);
        let radius = self.radius.compute(property, ctx);
        let spread = self.spread.compute(property, ctx);
        let color = compute_color(&self.color, property, ctx);

        let unchanged = StyleValue::ptr_eq(&hoffset, &self.hoffset)
            && StyleValue::ptr_eq(&voffset, &self.voffset)
            && StyleValue::ptr_eq(&radius, &self.radius)
            && StyleValue::ptr_eq(&spread, &self.spread)
            && StyleValue::ptr_eq(&color, &self.color);
        if unchanged {
            return this.clone();
        }
        StyleValue::new(ValueKind::Shadow(Self {
            hoffset,
            voffset,
            radius,
            spread,
            inset: self.inset,
            color,
        }))
    }

    /// Interpolate. Fails when one shadow is inset and the other is not.
    #[must_use]
    pub fn transition(&self, end: &Self, property: PropertyId, progress: f64) -> Option<Self> {
        if self.inset != end.inset {
            return None;
        }
        Some(Self {
            hoffset: self.hoffset.transition(&end.hoffset, property, progress)?,
            voffset: self.voffset.transition(&end.voffset, property, progress)?,
            radius: self.radius.transition(&end.radius, property, progress)?,
            spread: self.spread.transition(&end.spread, property, progress)?,
            inset: self.inset,
            color: self.color.transition(&end.color, property, progress)?,
        })
    }

    /// Parse one shadow. `box_shadow` enables the spread length and the
    /// `inset` keyword. Lengths and color may come in either order; a
    /// missing color means `currentColor`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for missing offsets or stray tokens.
    pub fn parse(parser: &mut ValueParser<'_>, box_shadow: bool) -> Result<Self, ParseError> {
        let length = NumberFlags::PARSE_LENGTH | NumberFlags::NUMBER_AS_PIXELS;
        let mut inset = box_shadow && parser.try_ident("inset");
        let mut lengths: Option<[StyleValue; 4]> = None;
        let mut color = None;

        loop {
            if lengths.is_none() && can_parse_number(parser) {
                let hoffset = parse_number(parser, length)?;
                let voffset = parse_number(parser, length)?;
                let radius = if can_parse_number(parser) {
                    parse_number(parser, length | NumberFlags::POSITIVE_ONLY)?
                } else {
                    StyleValue::px(0.0)
                };
                let spread = if box_shadow && can_parse_number(parser) {
                    parse_number(parser, length)?
                } else {
                    StyleValue::px(0.0)
                };
                lengths = Some([hoffset, voffset, radius, spread]);
            } else if !inset && box_shadow && parser.try_ident("inset") {
                inset = true;
            } else if color.is_none() {
                color = Some(Color::parse_value(parser)?);
            } else {
                return Err(parser.expected("a shadow length"));
            }

            if lengths.is_some() && parser.is_done() {
                break;
            }
        }

        let [hoffset, voffset, radius, spread] =
            lengths.ok_or_else(|| ParseError::invalid("shadow offsets are missing"))?;
        Ok(Self {
            hoffset,
            voffset,
            radius,
            spread,
            inset,
            color: color.unwrap_or_else(|| Color::into_value(Color::Current)),
        })
    }
}

impl fmt::Display for Shadow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.hoffset, self.voffset)?;
        let has_spread = self.spread.number_value(100.0) != 0.0;
        if has_spread || self.radius.number_value(100.0) != 0.0 {
            write!(f, " {}", self.radius)?;
        }
        if has_spread {
            write!(f, " {}", self.spread)?;
        }
        write!(f, " {}", self.color)?;
        if self.inset {
            f.write_str(" inset")?;
        }
        Ok(())
    }
}

/// An ordered list of shadows; the first one paints on top.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShadowList {
    shadows: Vec<StyleValue>,
}

impl ShadowList {
    /// Wrap shadows into a list value; an empty list is the shared `none`.
    #[must_use]
    pub fn new_value(shadows: Vec<Shadow>) -> StyleValue {
        if shadows.is_empty() {
            return StyleValue::no_shadows();
        }
        StyleValue::new(ValueKind::ShadowList(Self {
            shadows: shadows
                .into_iter()
                .map(|s| StyleValue::new(ValueKind::Shadow(s)))
                .collect(),
        }))
    }

    /// Whether the list is `none`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shadows.is_empty()
    }

    /// Number of shadows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shadows.len()
    }

    /// The shadows, topmost first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Shadow> {
        self.shadows.iter().filter_map(|value| match value.kind() {
            ValueKind::Shadow(shadow) => Some(shadow),
            _ => None,
        })
    }

    /// Maximum extents over all outset shadows.
    #[must_use]
    pub fn extents(&self) -> ShadowExtents {
        self.iter().fold(ShadowExtents::default(), |acc, shadow| {
            let e = shadow.extents();
            ShadowExtents {
                top: acc.top.max(e.top),
                right: acc.right.max(e.right),
                bottom: acc.bottom.max(e.bottom),
                left: acc.left.max(e.left),
            }
        })
    }

    pub(crate) fn compute(
        &self,
        this: &StyleValue,
        property: PropertyId,
        ctx: &ComputeContext<'_>,
    ) -> StyleValue {
        let shadows: Vec<StyleValue> = self
            .shadows
            .iter()
            .map(|s| s.compute(property, ctx))
            .collect();
        if shadows
            .iter()
            .zip(&self.shadows)
            .all(|(a, b)| StyleValue::ptr_eq(a, b))
        {
            this.clone()
        } else {
            StyleValue::new(ValueKind::ShadowList(Self { shadows }))
        }
    }

    /// Interpolate pairwise. A missing shadow on one side becomes a
    /// transparent, zero sized shadow; a pair that cannot be interpolated
    /// switches from start to end halfway through.
    #[must_use]
    pub fn transition(&self, end: &Self, property: PropertyId, progress: f64) -> Option<Self> {
        let start: Vec<&Shadow> = self.iter().collect();
        let stop: Vec<&Shadow> = end.iter().collect();
        let len = start.len().max(stop.len());
        let mut shadows = Vec::with_capacity(len);
        for i in 0..len {
            let (a, b) = match (start.get(i), stop.get(i)) {
                (Some(a), Some(b)) => ((*a).clone(), (*b).clone()),
                (Some(a), None) => ((*a).clone(), Shadow::new_for_transition(a)),
                (None, Some(b)) => (Shadow::new_for_transition(b), (*b).clone()),
                (None, None) => break,
            };
            let shadow = a
                .transition(&b, property, progress)
                .unwrap_or(if progress < 0.5 { a } else { b });
            shadows.push(StyleValue::new(ValueKind::Shadow(shadow)));
        }
        Some(Self { shadows })
    }

    /// Parse `none` or a comma separated list of shadows.
    ///
    /// # Errors
    ///
    /// Returns the first shadow's [`ParseError`].
    pub fn parse(parser: &mut ValueParser<'_>, box_shadow: bool) -> Result<StyleValue, ParseError> {
        if parser.try_ident("none") {
            return Ok(StyleValue::no_shadows());
        }
        let mut shadows = vec![Shadow::parse(parser, box_shadow)?];
        while parser.try_comma() {
            shadows.push(Shadow::parse(parser, box_shadow)?);
        }
        Ok(Self::new_value(shadows))
    }
}

impl fmt::Display for ShadowList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.shadows.is_empty() {
            return f.write_str("none");
        }
        for (i, shadow) in self.shadows.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            shadow.fmt(f)?;
        }
        Ok(())
    }
}

impl StyleValue {
    /// The shadow list held by this value; anything else reads as `none`.
    #[must_use]
    pub fn as_shadows(&self) -> Option<&ShadowList> {
        match self.kind() {
            ValueKind::ShadowList(list) => Some(list),
            _ => None,
        }
    }
}
