//! Style values.
//!
//! A [`StyleValue`] is an immutable, reference-counted value of one of the
//! kinds in [`ValueKind`]. Values are shared freely between specified styles,
//! computed styles and transition snapshots; cloning is a reference count
//! bump. Every kind supports four operations:
//!
//! - **compute**: resolve relative units, named colors and image urls into a
//!   value that no longer depends on context. Computing an already computed
//!   value returns the same allocation.
//! - **equal**: structural equality.
//! - **transition**: interpolate towards another value of the same property,
//!   or report that the pair cannot be interpolated.
//! - **print**: the [`Display`](fmt::Display) impl, which produces text that
//!   parses back to an equal value.

pub mod background;
pub mod border;
pub mod calc;
pub mod color;
pub mod corner;
pub mod dimension;
pub mod ease;
pub mod enums;
pub mod gradient;
pub mod image;
pub mod palette;
pub mod rgba;
pub mod shadow;

use core::fmt;
use std::cell::Cell;
use std::rc::Rc;

use glaze_common::Settings;

use crate::style::{ComputedStyle, PropertyId, StyleProvider};

pub use background::{BgSize, Position, Repeat, RepeatStyle};
pub use border::BorderQuad;
pub use calc::Calc;
pub use color::{Color, CycleNode};
pub use corner::Corner;
pub use dimension::{Dimension, NumberFlags, Unit};
pub use ease::Ease;
pub use enums::EnumValue;
pub use gradient::{ColorStop, Gradient, GradientKind};
pub use image::Image;
pub use palette::Palette;
pub use rgba::Rgba;
pub use shadow::{Shadow, ShadowList};

thread_local! {
    static LIVE: Cell<usize> = const { Cell::new(0) };
    static INTERNED: Interned = Interned::new();
}

/// Number of value allocations alive on this thread, excluding interned
/// constants.
#[must_use]
pub fn live_values() -> usize {
    LIVE.with(Cell::get)
}

/// The variants a [`StyleValue`] can hold.
#[derive(Debug)]
pub enum ValueKind {
    /// A number with a unit.
    Dimension(Dimension),
    /// A `calc()` sum of dimensions with different units.
    Calc(Calc),
    /// A color expression, before computation.
    Color(Color),
    /// A literal RGBA color. Every computed color is one of these.
    Rgba(Rgba),
    /// Named icon palette colors.
    Palette(Palette),
    /// One shadow.
    Shadow(Shadow),
    /// A comma separated list of shadows.
    ShadowList(ShadowList),
    /// An image.
    Image(Image),
    /// A corner radius pair.
    Corner(Corner),
    /// A one to four value box shorthand, as used by `border-image-slice`.
    BorderQuad(BorderQuad),
    /// A keyword from a fixed set.
    Enum(EnumValue),
    /// A free-form identifier.
    Ident(String),
    /// A string.
    String(String),
    /// A comma separated list.
    Array(Vec<StyleValue>),
    /// A timing function.
    Ease(Ease),
    /// A `background-size` entry.
    BgSize(BgSize),
    /// A `background-position` entry.
    Position(Position),
    /// A repeat pair for backgrounds and border images.
    Repeat(Repeat),
    /// `inherit`.
    Inherit,
    /// `initial`.
    Initial,
    /// `unset`.
    Unset,
}

struct ValueCell {
    kind: ValueKind,
    counted: bool,
}

impl Drop for ValueCell {
    fn drop(&mut self) {
        if self.counted {
            LIVE.with(|live| live.set(live.get().saturating_sub(1)));
        }
    }
}

/// An immutable, shared style value.
#[derive(Clone)]
pub struct StyleValue(Rc<ValueCell>);

impl fmt::Debug for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StyleValue({self})")
    }
}

/// Shared constants handed out instead of fresh allocations.
struct Interned {
    zero: StyleValue,
    one: StyleValue,
    px: [StyleValue; 5],
    inherit: StyleValue,
    initial: StyleValue,
    unset: StyleValue,
    transparent: StyleValue,
    none_image: StyleValue,
    no_shadows: StyleValue,
}

impl Interned {
    fn new() -> Self {
        let dim = |value, unit| StyleValue::constant(ValueKind::Dimension(Dimension::new(value, unit)));
        Self {
            zero: dim(0.0, Unit::Number),
            one: dim(1.0, Unit::Number),
            px: [
                dim(0.0, Unit::Px),
                dim(1.0, Unit::Px),
                dim(2.0, Unit::Px),
                dim(3.0, Unit::Px),
                dim(4.0, Unit::Px),
            ],
            inherit: StyleValue::constant(ValueKind::Inherit),
            initial: StyleValue::constant(ValueKind::Initial),
            unset: StyleValue::constant(ValueKind::Unset),
            transparent: StyleValue::constant(ValueKind::Rgba(Rgba::TRANSPARENT)),
            none_image: StyleValue::constant(ValueKind::Image(Image::None)),
            no_shadows: StyleValue::constant(ValueKind::ShadowList(ShadowList::default())),
        }
    }
}

impl StyleValue {
    /// Allocate a new value.
    #[must_use]
    pub fn new(kind: ValueKind) -> Self {
        LIVE.with(|live| live.set(live.get() + 1));
        Self(Rc::new(ValueCell {
            kind,
            counted: true,
        }))
    }

    fn constant(kind: ValueKind) -> Self {
        Self(Rc::new(ValueCell {
            kind,
            counted: false,
        }))
    }

    fn interned(pick: impl FnOnce(&Interned) -> &Self) -> Self {
        INTERNED.with(|interned| pick(interned).clone())
    }

    /// A dimension, shared when it is one of the common constants
    /// `0`, `1` or `0px` through `4px`.
    #[must_use]
    pub fn dimension(value: f64, unit: Unit) -> Self {
        let index = value as usize;
        match unit {
            Unit::Number if value == 0.0 => Self::interned(|i| &i.zero),
            Unit::Number if value == 1.0 => Self::interned(|i| &i.one),
            Unit::Px
                if value.fract() == 0.0
                    && (0.0..=4.0).contains(&value)
                    && value.is_sign_positive() =>
            {
                Self::interned(|i| &i.px[index])
            }
            _ => Self::new(ValueKind::Dimension(Dimension::new(value, unit))),
        }
    }

    /// A unitless number.
    #[must_use]
    pub fn number(value: f64) -> Self {
        Self::dimension(value, Unit::Number)
    }

    /// A pixel length.
    #[must_use]
    pub fn px(value: f64) -> Self {
        Self::dimension(value, Unit::Px)
    }

    /// A literal color.
    #[must_use]
    pub fn rgba(rgba: Rgba) -> Self {
        if rgba.is_zero() {
            Self::interned(|i| &i.transparent)
        } else {
            Self::new(ValueKind::Rgba(rgba))
        }
    }

    /// A keyword.
    #[must_use]
    pub fn keyword(value: impl Into<EnumValue>) -> Self {
        Self::new(ValueKind::Enum(value.into()))
    }

    /// An identifier.
    #[must_use]
    pub fn ident(name: impl Into<String>) -> Self {
        Self::new(ValueKind::Ident(name.into()))
    }

    /// A list of values.
    #[must_use]
    pub fn array(items: Vec<Self>) -> Self {
        Self::new(ValueKind::Array(items))
    }

    /// The `none` image.
    #[must_use]
    pub fn none_image() -> Self {
        Self::interned(|i| &i.none_image)
    }

    /// The empty shadow list.
    #[must_use]
    pub fn no_shadows() -> Self {
        Self::interned(|i| &i.no_shadows)
    }

    /// `inherit`.
    #[must_use]
    pub fn inherit() -> Self {
        Self::interned(|i| &i.inherit)
    }

    /// `initial`.
    #[must_use]
    pub fn initial() -> Self {
        Self::interned(|i| &i.initial)
    }

    /// `unset`.
    #[must_use]
    pub fn unset() -> Self {
        Self::interned(|i| &i.unset)
    }

    /// The variant held by this value.
    #[must_use]
    pub fn kind(&self) -> &ValueKind {
        &self.0.kind
    }

    /// Whether both handles point at the same allocation.
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    /// Number of handles sharing this allocation.
    #[must_use]
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    /// Whether this is one of the `inherit`, `initial` or `unset` keywords.
    #[must_use]
    pub fn is_css_wide_keyword(&self) -> bool {
        matches!(
            self.kind(),
            ValueKind::Inherit | ValueKind::Initial | ValueKind::Unset
        )
    }

    /// Resolve this value in the context of one style.
    ///
    /// Values that are already context free return themselves, so computing
    /// twice yields the same allocation as computing once.
    #[must_use]
    pub fn compute(&self, property: PropertyId, ctx: &ComputeContext<'_>) -> Self {
        match self.kind() {
            ValueKind::Dimension(d) => d.compute(self, property, ctx),
            ValueKind::Calc(c) => c.compute(property, ctx),
            ValueKind::Color(c) => c.compute(property, ctx),
            ValueKind::Palette(p) => p.compute(self, property, ctx),
            ValueKind::Shadow(s) => s.compute(self, property, ctx),
            ValueKind::ShadowList(l) => l.compute(self, property, ctx),
            ValueKind::Image(i) => i.compute(self, property, ctx),
            ValueKind::Corner(c) => c.compute(self, property, ctx),
            ValueKind::BorderQuad(b) => b.compute(self, property, ctx),
            ValueKind::BgSize(s) => s.compute(self, property, ctx),
            ValueKind::Position(p) => p.compute(self, property, ctx),
            ValueKind::Array(items) => {
                let computed: Vec<Self> = items.iter().map(|v| v.compute(property, ctx)).collect();
                if computed.iter().zip(items).all(|(a, b)| Self::ptr_eq(a, b)) {
                    self.clone()
                } else {
                    Self::array(computed)
                }
            }
            ValueKind::Rgba(_)
            | ValueKind::Enum(_)
            | ValueKind::Ident(_)
            | ValueKind::String(_)
            | ValueKind::Ease(_)
            | ValueKind::Repeat(_)
            | ValueKind::Inherit
            | ValueKind::Initial
            | ValueKind::Unset => self.clone(),
        }
    }

    /// Structural equality.
    #[must_use]
    pub fn equal(&self, other: &Self) -> bool {
        if Self::ptr_eq(self, other) {
            return true;
        }
        match (self.kind(), other.kind()) {
            (ValueKind::Dimension(a), ValueKind::Dimension(b)) => a == b,
            (ValueKind::Calc(a), ValueKind::Calc(b)) => a == b,
            (ValueKind::Color(a), ValueKind::Color(b)) => a == b,
            (ValueKind::Rgba(a), ValueKind::Rgba(b)) => a == b,
            (ValueKind::Palette(a), ValueKind::Palette(b)) => a == b,
            (ValueKind::Shadow(a), ValueKind::Shadow(b)) => a == b,
            (ValueKind::ShadowList(a), ValueKind::ShadowList(b)) => a == b,
            (ValueKind::Image(a), ValueKind::Image(b)) => a == b,
            (ValueKind::Corner(a), ValueKind::Corner(b)) => a == b,
            (ValueKind::BorderQuad(a), ValueKind::BorderQuad(b)) => a == b,
            (ValueKind::Enum(a), ValueKind::Enum(b)) => a == b,
            (ValueKind::Ident(a), ValueKind::Ident(b))
            | (ValueKind::String(a), ValueKind::String(b)) => a == b,
            (ValueKind::Array(a), ValueKind::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equal(y))
            }
            (ValueKind::Ease(a), ValueKind::Ease(b)) => a == b,
            (ValueKind::BgSize(a), ValueKind::BgSize(b)) => a == b,
            (ValueKind::Position(a), ValueKind::Position(b)) => a == b,
            (ValueKind::Repeat(a), ValueKind::Repeat(b)) => a == b,
            (ValueKind::Inherit, ValueKind::Inherit)
            | (ValueKind::Initial, ValueKind::Initial)
            | (ValueKind::Unset, ValueKind::Unset) => true,
            _ => false,
        }
    }

    /// Interpolate from `self` towards `end` at `progress` in `[0, 1]`.
    ///
    /// Returns `None` when the two values cannot be interpolated; callers
    /// then snap to one end. `transition(a, a, p)` is always `a`.
    #[must_use]
    pub fn transition(&self, end: &Self, property: PropertyId, progress: f64) -> Option<Self> {
        if self.equal(end) {
            return Some(self.clone());
        }
        match (self.kind(), end.kind()) {
            (ValueKind::Dimension(a), ValueKind::Dimension(b)) => Some(a.transition(b, progress)),
            (ValueKind::Calc(_) | ValueKind::Dimension(_), ValueKind::Calc(_) | ValueKind::Dimension(_)) => {
                Calc::transition_values(self, end, progress)
            }
            (ValueKind::Rgba(a), ValueKind::Rgba(b)) => Some(Self::rgba(a.transition(b, progress))),
            (ValueKind::Palette(a), ValueKind::Palette(b)) => a
                .transition(b, property, progress)
                .map(|p| Self::new(ValueKind::Palette(p))),
            (ValueKind::Shadow(a), ValueKind::Shadow(b)) => a
                .transition(b, property, progress)
                .map(|s| Self::new(ValueKind::Shadow(s))),
            (ValueKind::ShadowList(a), ValueKind::ShadowList(b)) => a
                .transition(b, property, progress)
                .map(|l| Self::new(ValueKind::ShadowList(l))),
            (ValueKind::Image(a), ValueKind::Image(b)) => Some(a.transition(self, b, end, property, progress)),
            (ValueKind::Corner(a), ValueKind::Corner(b)) => a
                .transition(b, property, progress)
                .map(|c| Self::new(ValueKind::Corner(c))),
            (ValueKind::BorderQuad(a), ValueKind::BorderQuad(b)) => a
                .transition(b, property, progress)
                .map(|q| Self::new(ValueKind::BorderQuad(q))),
            (ValueKind::BgSize(a), ValueKind::BgSize(b)) => a
                .transition(b, property, progress)
                .map(|s| Self::new(ValueKind::BgSize(s))),
            (ValueKind::Position(a), ValueKind::Position(b)) => a
                .transition(b, property, progress)
                .map(|p| Self::new(ValueKind::Position(p))),
            (ValueKind::Array(a), ValueKind::Array(b)) if a.len() == b.len() => a
                .iter()
                .zip(b)
                .map(|(x, y)| x.transition(y, property, progress))
                .collect::<Option<Vec<_>>>()
                .map(Self::array),
            _ => None,
        }
    }

    /// The numeric value of a dimension or `calc()`, with percentages taken
    /// relative to `one_hundred_percent`.
    #[must_use]
    pub fn number_value(&self, one_hundred_percent: f64) -> f64 {
        match self.kind() {
            ValueKind::Dimension(d) => d.get(one_hundred_percent),
            ValueKind::Calc(c) => c.get(one_hundred_percent),
            _ => 0.0,
        }
    }

    /// The color of a computed color value, or transparent.
    #[must_use]
    pub fn as_rgba(&self) -> Rgba {
        match self.kind() {
            ValueKind::Rgba(rgba) => *rgba,
            _ => Rgba::TRANSPARENT,
        }
    }

    /// The keyword of an enum value.
    #[must_use]
    pub fn as_enum(&self) -> Option<EnumValue> {
        match self.kind() {
            ValueKind::Enum(e) => Some(*e),
            _ => None,
        }
    }

    /// The items of a list value; any other value is a one element list.
    #[must_use]
    pub fn as_slice(&self) -> &[Self] {
        match self.kind() {
            ValueKind::Array(items) => items,
            _ => core::slice::from_ref(self),
        }
    }

    /// The text of an identifier or string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self.kind() {
            ValueKind::Ident(s) | ValueKind::String(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for StyleValue {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            ValueKind::Dimension(d) => d.fmt(f),
            ValueKind::Calc(c) => c.fmt(f),
            ValueKind::Color(c) => c.fmt(f),
            ValueKind::Rgba(c) => c.fmt(f),
            ValueKind::Palette(p) => p.fmt(f),
            ValueKind::Shadow(s) => s.fmt(f),
            ValueKind::ShadowList(l) => l.fmt(f),
            ValueKind::Image(i) => i.fmt(f),
            ValueKind::Corner(c) => c.fmt(f),
            ValueKind::BorderQuad(b) => b.fmt(f),
            ValueKind::Enum(e) => e.fmt(f),
            ValueKind::Ident(s) => f.write_str(s),
            ValueKind::String(s) => write!(f, "\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
            ValueKind::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    item.fmt(f)?;
                }
                Ok(())
            }
            ValueKind::Ease(e) => e.fmt(f),
            ValueKind::BgSize(s) => s.fmt(f),
            ValueKind::Position(p) => p.fmt(f),
            ValueKind::Repeat(r) => r.fmt(f),
            ValueKind::Inherit => f.write_str("inherit"),
            ValueKind::Initial => f.write_str("initial"),
            ValueKind::Unset => f.write_str("unset"),
        }
    }
}

/// Everything a value needs to compute itself.
pub struct ComputeContext<'a> {
    /// Where named colors, platform colors and images come from.
    pub provider: &'a dyn StyleProvider,
    /// Global DPI and font size.
    pub settings: &'a Settings,
    /// The values computed so far for the style being built, in property
    /// order. Properties computed later may read earlier ones.
    pub style: &'a [StyleValue],
    /// The parent's computed style, if any.
    pub parent: Option<&'a ComputedStyle>,
}

impl ComputeContext<'_> {
    /// An already computed value of the style being built.
    #[must_use]
    pub fn computed(&self, property: PropertyId) -> Option<&StyleValue> {
        self.style.get(property as usize)
    }

    /// The resolution used for physical units.
    #[must_use]
    pub fn dpi(&self) -> f64 {
        self.computed(PropertyId::Dpi)
            .map_or(self.settings.dpi, |v| v.number_value(100.0))
    }

    /// The element's own font size in pixels.
    #[must_use]
    pub fn font_size(&self) -> f64 {
        self.computed(PropertyId::FontSize)
            .map_or_else(|| self.parent_font_size(), |v| v.number_value(100.0))
    }

    /// The parent's font size, or the global default at the root.
    #[must_use]
    pub fn parent_font_size(&self) -> f64 {
        self.parent
            .map_or(self.settings.font_size, ComputedStyle::font_size)
    }

    /// The computed `color` of this style, if it was computed already.
    #[must_use]
    pub fn current_color(&self) -> Option<Rgba> {
        self.computed(PropertyId::Color).map(StyleValue::as_rgba)
    }
}
