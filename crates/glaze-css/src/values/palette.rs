//! Icon palettes: named colors used to recolor symbolic icons.

use core::fmt;
use std::collections::BTreeMap;

use super::color::compute_color;
use super::{Color, ComputeContext, Rgba, StyleValue, ValueKind};
use crate::parser::{ParseError, ValueParser};
use crate::style::PropertyId;

/// Mapping from color name to color.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Palette {
    colors: BTreeMap<String, StyleValue>,
}

thread_local! {
    static DEFAULT_PALETTE: StyleValue = StyleValue::constant(ValueKind::Palette(Palette {
        colors: [
            ("error", Rgba::from_hex(0x00cc_0000)),
            ("warning", Rgba::from_hex(0x00f5_7900)),
            ("success", Rgba::from_hex(0x004e_9a06)),
        ]
        .into_iter()
        .map(|(name, rgba)| (name.to_string(), StyleValue::constant(ValueKind::Rgba(rgba))))
        .collect(),
    }));
}

impl Palette {
    /// The shared default palette: `error`, `warning` and `success`.
    #[must_use]
    pub fn default_value() -> StyleValue {
        DEFAULT_PALETTE.with(Clone::clone)
    }

    /// Build a palette from entries. Later duplicates replace earlier ones.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = (String, StyleValue)>) -> Self {
        Self {
            colors: entries.into_iter().collect(),
        }
    }

    /// The color registered under `name`, if computed.
    #[must_use]
    pub fn get_color(&self, name: &str) -> Option<Rgba> {
        self.colors.get(name).map(StyleValue::as_rgba)
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleValue)> {
        self.colors.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn compute(
        &self,
        this: &StyleValue,
        property: PropertyId,
        ctx: &ComputeContext<'_>,
    ) -> StyleValue {
        let mut changed = false;
        let colors = self
            .colors
            .iter()
            .map(|(name, value)| {
                let computed = compute_color(value, property, ctx);
                changed |= !StyleValue::ptr_eq(&computed, value);
                (name.clone(), computed)
            })
            .collect();
        if changed {
            StyleValue::new(ValueKind::Palette(Self { colors }))
        } else {
            this.clone()
        }
    }

    /// Interpolate entry by entry. Names present on only one side keep
    /// their value for the whole transition.
    #[must_use]
    pub fn transition(&self, end: &Self, property: PropertyId, progress: f64) -> Option<Self> {
        let mut colors = BTreeMap::new();
        for (name, start) in &self.colors {
            let value = match end.colors.get(name) {
                Some(stop) => start.transition(stop, property, progress)?,
                None => start.clone(),
            };
            let _ = colors.insert(name.clone(), value);
        }
        for (name, stop) in &end.colors {
            if !self.colors.contains_key(name) {
                let _ = colors.insert(name.clone(), stop.clone());
            }
        }
        Some(Self { colors })
    }

    /// Parse `default` or a comma separated list of `name color` pairs.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for malformed entries.
    pub fn parse(parser: &mut ValueParser<'_>) -> Result<StyleValue, ParseError> {
        if parser.try_ident("default") {
            return Ok(Self::default_value());
        }
        let mut colors = BTreeMap::new();
        loop {
            let name = parser.expect_ident()?.to_string();
            let color = Color::parse_value(parser)?;
            let _ = colors.insert(name, color);
            if !parser.try_comma() {
                break;
            }
        }
        Ok(StyleValue::new(ValueKind::Palette(Self { colors })))
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let is_default = DEFAULT_PALETTE.with(|default| match default.kind() {
            ValueKind::Palette(palette) => palette == self,
            _ => false,
        });
        if is_default {
            return f.write_str("default");
        }
        for (i, (name, color)) in self.colors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name} {color}")?;
        }
        Ok(())
    }
}
