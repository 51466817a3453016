//! Computed styles.
//!
//! [§ 4.4 Computed Values](https://www.w3.org/TR/css-cascade-4/#computed)
//! "The computed value is the result of resolving the specified value...
//! as defined in the 'Computed Value' line of the property definition
//! table, generally absolutizing it in preparation for inheritance."

use core::fmt;

use glaze_common::Settings;
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::provider::{SpecifiedStyle, StyleProvider};
use super::PropertyId;
use crate::values::enums::{BorderStyle, Keyword};
use crate::values::{ComputeContext, Image, Rgba, ShadowList, StyleValue, ValueKind};

/// One computed value per property, indexed by [`PropertyId`].
///
/// Every slot is filled: properties nobody specified hold their inherited
/// or initial value.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStyle {
    values: Box<[StyleValue]>,
}

impl ComputedStyle {
    /// Run the cascade's last step for one node: pick each property's
    /// specified, inherited or initial value and compute it.
    ///
    /// [§ 7.3 Explicit Defaulting](https://www.w3.org/TR/css-cascade-4/#defaulting-keywords)
    ///
    /// "`inherit`: the cascaded value of the property on the element is the
    /// computed value of the property on the element's parent... `unset`:
    /// if the property is an inherited property, this is treated as
    /// inherit, and if it is not, this is treated as initial."
    #[must_use]
    pub fn compute(
        specified: &SpecifiedStyle,
        provider: &dyn StyleProvider,
        settings: &Settings,
        parent: Option<&Self>,
    ) -> Self {
        let mut values: Vec<StyleValue> = Vec::with_capacity(PropertyId::COUNT);
        for property in PropertyId::all() {
            let value = {
                let ctx = ComputeContext {
                    provider,
                    settings,
                    style: &values,
                    parent,
                };
                // The resolution defaults to the global setting.
                let initial = || match property {
                    PropertyId::Dpi => StyleValue::number(settings.dpi),
                    _ => property.compute(&property.initial_value(), &ctx),
                };
                let inherit = || parent.map_or_else(initial, |p| p.get(property).clone());
                match specified.get(property).map(StyleValue::kind) {
                    Some(ValueKind::Inherit) => inherit(),
                    Some(ValueKind::Initial) => initial(),
                    Some(ValueKind::Unset) | None if property.is_inherited() => inherit(),
                    Some(ValueKind::Unset) | None => initial(),
                    Some(_) => specified
                        .get(property)
                        .map_or_else(initial, |v| property.compute(v, &ctx)),
                }
            };
            values.push(value);
        }
        Self {
            values: values.into_boxed_slice(),
        }
    }

    /// The style of a root node nobody wrote rules for.
    #[must_use]
    pub fn initial(provider: &dyn StyleProvider, settings: &Settings) -> Self {
        Self::compute(&SpecifiedStyle::default(), provider, settings, None)
    }

    /// The computed style of a lone node under `* { declarations }`.
    #[cfg(test)]
    pub(crate) fn from_declarations(declarations: &str) -> Self {
        let provider = super::CssProvider::from_data(&format!("* {{ {declarations} }}"));
        let node = super::StyleNode::new("box");
        Self::compute(&provider.lookup(&node), &provider, &Settings::default(), None)
    }

    /// A copy with one slot replaced.
    #[must_use]
    pub fn with_value(&self, property: PropertyId, value: StyleValue) -> Self {
        let mut values = self.values.clone();
        values[property as usize] = value;
        Self { values }
    }

    /// A copy with several slots replaced.
    #[must_use]
    pub fn with_values(&self, replacements: impl IntoIterator<Item = (PropertyId, StyleValue)>) -> Self {
        let mut values = self.values.clone();
        for (property, value) in replacements {
            values[property as usize] = value;
        }
        Self { values }
    }

    /// The computed value of `property`.
    #[must_use]
    pub fn get(&self, property: PropertyId) -> &StyleValue {
        &self.values[property as usize]
    }

    /// All slots, in id order.
    #[must_use]
    pub fn values(&self) -> &[StyleValue] {
        &self.values
    }

    /// Pairs of property and value, in id order.
    pub fn iter(&self) -> impl Iterator<Item = (PropertyId, &StyleValue)> {
        PropertyId::all().zip(self.values.iter())
    }

    /// A length or number in px; percentages resolve against
    /// `one_hundred_percent`.
    #[must_use]
    pub fn number(&self, property: PropertyId, one_hundred_percent: f64) -> f64 {
        self.get(property).number_value(one_hundred_percent)
    }

    /// A color property.
    #[must_use]
    pub fn rgba(&self, property: PropertyId) -> Rgba {
        self.get(property).as_rgba()
    }

    /// A keyword property. Lists yield their first entry.
    #[must_use]
    pub fn keyword<T: Keyword>(&self, property: PropertyId) -> Option<T> {
        self.get(property).as_slice().first().and_then(StyleValue::as_keyword)
    }

    /// An image property, `None` for list properties.
    #[must_use]
    pub fn image(&self, property: PropertyId) -> Option<&Image> {
        self.get(property).as_image()
    }

    /// A shadow list property.
    #[must_use]
    pub fn shadows(&self, property: PropertyId) -> Option<&ShadowList> {
        self.get(property).as_shadows()
    }

    /// `color`.
    #[must_use]
    pub fn color(&self) -> Rgba {
        self.rgba(PropertyId::Color)
    }

    /// `background-color`.
    #[must_use]
    pub fn background_color(&self) -> Rgba {
        self.rgba(PropertyId::BackgroundColor)
    }

    /// `font-size` in px.
    #[must_use]
    pub fn font_size(&self) -> f64 {
        self.number(PropertyId::FontSize, 100.0)
    }

    /// `opacity`, clamped to `[0, 1]`.
    #[must_use]
    pub fn opacity(&self) -> f64 {
        self.number(PropertyId::Opacity, 1.0).clamp(0.0, 1.0)
    }

    /// Border widths in px: top, right, bottom, left.
    #[must_use]
    pub fn border_widths(&self) -> [f64; 4] {
        [
            PropertyId::BorderTopWidth,
            PropertyId::BorderRightWidth,
            PropertyId::BorderBottomWidth,
            PropertyId::BorderLeftWidth,
        ]
        .map(|p| self.number(p, 100.0))
    }

    /// Border styles: top, right, bottom, left.
    #[must_use]
    pub fn border_styles(&self) -> [BorderStyle; 4] {
        [
            PropertyId::BorderTopStyle,
            PropertyId::BorderRightStyle,
            PropertyId::BorderBottomStyle,
            PropertyId::BorderLeftStyle,
        ]
        .map(|p| self.keyword(p).unwrap_or(BorderStyle::None))
    }

    /// Border colors: top, right, bottom, left.
    #[must_use]
    pub fn border_colors(&self) -> [Rgba; 4] {
        [
            PropertyId::BorderTopColor,
            PropertyId::BorderRightColor,
            PropertyId::BorderBottomColor,
            PropertyId::BorderLeftColor,
        ]
        .map(|p| self.rgba(p))
    }

    /// Padding in px: top, right, bottom, left.
    #[must_use]
    pub fn padding(&self) -> [f64; 4] {
        [
            PropertyId::PaddingTop,
            PropertyId::PaddingRight,
            PropertyId::PaddingBottom,
            PropertyId::PaddingLeft,
        ]
        .map(|p| self.number(p, 100.0))
    }

    /// Margins in px: top, right, bottom, left.
    #[must_use]
    pub fn margin(&self) -> [f64; 4] {
        [
            PropertyId::MarginTop,
            PropertyId::MarginRight,
            PropertyId::MarginBottom,
            PropertyId::MarginLeft,
        ]
        .map(|p| self.number(p, 100.0))
    }

    /// The `border-*-radius` values clockwise from the top left.
    #[must_use]
    pub fn border_radii(&self) -> [&StyleValue; 4] {
        [
            self.get(PropertyId::BorderTopLeftRadius),
            self.get(PropertyId::BorderTopRightRadius),
            self.get(PropertyId::BorderBottomRightRadius),
            self.get(PropertyId::BorderBottomLeftRadius),
        ]
    }

    /// The `-glaze-outline-*-radius` values clockwise from the top left.
    #[must_use]
    pub fn outline_radii(&self) -> [&StyleValue; 4] {
        [
            self.get(PropertyId::OutlineTopLeftRadius),
            self.get(PropertyId::OutlineTopRightRadius),
            self.get(PropertyId::OutlineBottomRightRadius),
            self.get(PropertyId::OutlineBottomLeftRadius),
        ]
    }
}

/// Serializes as a map from property name to printed value.
impl Serialize for ComputedStyle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (property, value) in self.iter() {
            map.serialize_entry(property.name(), &value.to_string())?;
        }
        map.end()
    }
}

/// One `name: value;` line per property.
impl fmt::Display for ComputedStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (property, value) in self.iter() {
            writeln!(f, "{}: {value};", property.name())?;
        }
        Ok(())
    }
}
