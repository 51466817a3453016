//! The property table.
//!
//! Every longhand property has a dense id, a name, flags, an initial value
//! and a value parser. Ids are ordered so that a property only ever reads
//! properties with smaller ids while computing: `color`, `-glaze-dpi` and
//! `font-size` come first, and each border style precedes its width.

use bitflags::bitflags;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::parser::{ParseError, ValueParser};
use crate::values::dimension::{can_parse_number, parse_number};
use crate::values::enums::{
    AnimationDirection, Area, BlendMode, BorderStyle, FillMode, FontSizeKeyword, FontStretch,
    FontStyle, FontVariant, IconEffect, IconStyle, Keyword, PlayState, TextDecorationLine,
    TextDecorationStyle,
};
use crate::values::{
    BgSize, BorderQuad, Color, ComputeContext, Corner, Ease, Image, NumberFlags, Palette, Position,
    Repeat, RepeatStyle, Rgba, ShadowList, StyleValue, Unit, ValueKind,
};

bitflags! {
    /// How a property takes part in the cascade.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PropertyFlags: u8 {
        /// Unspecified values come from the parent.
        const INHERIT = 1 << 0;
        /// Changes can be animated by `transition-*`.
        const ANIMATED = 1 << 1;
    }
}

macro_rules! properties {
    ($($(#[$doc:meta])* $variant:ident = $name:literal, $flags:expr;)+) => {
        /// A longhand property. The discriminant is the slot in a
        /// [`ComputedStyle`](super::ComputedStyle).
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
        pub enum PropertyId {
            $($(#[$doc])* $variant),+
        }

        impl PropertyId {
            /// Number of longhand properties.
            pub const COUNT: usize = [$(stringify!($variant)),+].len();

            /// The CSS name.
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }

            /// Cascade flags.
            #[must_use]
            pub fn flags(self) -> PropertyFlags {
                match self {
                    $(Self::$variant => $flags),+
                }
            }
        }
    };
}

const NONE: PropertyFlags = PropertyFlags::empty();
const INHERIT: PropertyFlags = PropertyFlags::INHERIT;
const ANIMATED: PropertyFlags = PropertyFlags::ANIMATED;
const INHERIT_ANIMATED: PropertyFlags = PropertyFlags::INHERIT.union(PropertyFlags::ANIMATED);

properties! {
    /// Foreground color.
    Color = "color", INHERIT_ANIMATED;
    /// Resolution used for physical length units.
    Dpi = "-glaze-dpi", INHERIT_ANIMATED;
    /// Font size in px once computed.
    FontSize = "font-size", INHERIT_ANIMATED;
    /// Named colors for symbolic icons.
    IconPalette = "-glaze-icon-palette", INHERIT_ANIMATED;
    /// Background color.
    BackgroundColor = "background-color", ANIMATED;
    /// Font family list.
    FontFamily = "font-family", INHERIT;
    /// Font style.
    FontStyle = "font-style", INHERIT;
    /// Font variant.
    FontVariant = "font-variant", INHERIT;
    /// Font weight, 1 to 1000.
    FontWeight = "font-weight", INHERIT;
    /// Font stretch.
    FontStretch = "font-stretch", INHERIT;
    /// Extra space between letters.
    LetterSpacing = "letter-spacing", INHERIT_ANIMATED;
    /// Decoration line.
    TextDecorationLine = "text-decoration-line", NONE;
    /// Decoration color.
    TextDecorationColor = "text-decoration-color", ANIMATED;
    /// Decoration style.
    TextDecorationStyle = "text-decoration-style", NONE;
    /// Text shadows.
    TextShadow = "text-shadow", INHERIT_ANIMATED;
    /// Box shadows.
    BoxShadow = "box-shadow", ANIMATED;
    /// Top margin.
    MarginTop = "margin-top", ANIMATED;
    /// Left margin.
    MarginLeft = "margin-left", ANIMATED;
    /// Bottom margin.
    MarginBottom = "margin-bottom", ANIMATED;
    /// Right margin.
    MarginRight = "margin-right", ANIMATED;
    /// Top padding.
    PaddingTop = "padding-top", ANIMATED;
    /// Left padding.
    PaddingLeft = "padding-left", ANIMATED;
    /// Bottom padding.
    PaddingBottom = "padding-bottom", ANIMATED;
    /// Right padding.
    PaddingRight = "padding-right", ANIMATED;
    /// Top border style.
    BorderTopStyle = "border-top-style", NONE;
    /// Top border width; zero while the style is `none` or `hidden`.
    BorderTopWidth = "border-top-width", ANIMATED;
    /// Left border style.
    BorderLeftStyle = "border-left-style", NONE;
    /// Left border width.
    BorderLeftWidth = "border-left-width", ANIMATED;
    /// Bottom border style.
    BorderBottomStyle = "border-bottom-style", NONE;
    /// Bottom border width.
    BorderBottomWidth = "border-bottom-width", ANIMATED;
    /// Right border style.
    BorderRightStyle = "border-right-style", NONE;
    /// Right border width.
    BorderRightWidth = "border-right-width", ANIMATED;
    /// Top left corner radius.
    BorderTopLeftRadius = "border-top-left-radius", ANIMATED;
    /// Top right corner radius.
    BorderTopRightRadius = "border-top-right-radius", ANIMATED;
    /// Bottom right corner radius.
    BorderBottomRightRadius = "border-bottom-right-radius", ANIMATED;
    /// Bottom left corner radius.
    BorderBottomLeftRadius = "border-bottom-left-radius", ANIMATED;
    /// Outline style.
    OutlineStyle = "outline-style", NONE;
    /// Outline width; zero while the style is `none` or `hidden`.
    OutlineWidth = "outline-width", ANIMATED;
    /// Distance between the border box and the outline.
    OutlineOffset = "outline-offset", NONE;
    /// Outline top left radius.
    OutlineTopLeftRadius = "-glaze-outline-top-left-radius", ANIMATED;
    /// Outline top right radius.
    OutlineTopRightRadius = "-glaze-outline-top-right-radius", ANIMATED;
    /// Outline bottom right radius.
    OutlineBottomRightRadius = "-glaze-outline-bottom-right-radius", ANIMATED;
    /// Outline bottom left radius.
    OutlineBottomLeftRadius = "-glaze-outline-bottom-left-radius", ANIMATED;
    /// Background painting area, per layer.
    BackgroundClip = "background-clip", NONE;
    /// Background positioning area, per layer.
    BackgroundOrigin = "background-origin", NONE;
    /// Background image size, per layer.
    BackgroundSize = "background-size", ANIMATED;
    /// Background image position, per layer.
    BackgroundPosition = "background-position", ANIMATED;
    /// Top border color.
    BorderTopColor = "border-top-color", ANIMATED;
    /// Right border color.
    BorderRightColor = "border-right-color", ANIMATED;
    /// Bottom border color.
    BorderBottomColor = "border-bottom-color", ANIMATED;
    /// Left border color.
    BorderLeftColor = "border-left-color", ANIMATED;
    /// Outline color.
    OutlineColor = "outline-color", ANIMATED;
    /// Background tiling, per layer.
    BackgroundRepeat = "background-repeat", NONE;
    /// Background images, topmost first.
    BackgroundImage = "background-image", ANIMATED;
    /// Background blend modes, per layer.
    BackgroundBlendMode = "background-blend-mode", NONE;
    /// Border image.
    BorderImageSource = "border-image-source", ANIMATED;
    /// Border image tiling.
    BorderImageRepeat = "border-image-repeat", NONE;
    /// Border image slice offsets.
    BorderImageSlice = "border-image-slice", ANIMATED;
    /// Border image widths.
    BorderImageWidth = "border-image-width", ANIMATED;
    /// Icon image.
    IconSource = "-glaze-icon-source", ANIMATED;
    /// Icon shadows.
    IconShadow = "-glaze-icon-shadow", INHERIT_ANIMATED;
    /// Whether icons are drawn symbolic.
    IconStyle = "-glaze-icon-style", INHERIT;
    /// Minimum width.
    MinWidth = "min-width", ANIMATED;
    /// Minimum height.
    MinHeight = "min-height", ANIMATED;
    /// Properties that transition.
    TransitionProperty = "transition-property", NONE;
    /// Transition durations.
    TransitionDuration = "transition-duration", NONE;
    /// Transition timing functions.
    TransitionTimingFunction = "transition-timing-function", NONE;
    /// Transition delays.
    TransitionDelay = "transition-delay", NONE;
    /// Keyframe animation names.
    AnimationName = "animation-name", NONE;
    /// Animation durations.
    AnimationDuration = "animation-duration", NONE;
    /// Animation timing functions.
    AnimationTimingFunction = "animation-timing-function", NONE;
    /// Animation iteration counts.
    AnimationIterationCount = "animation-iteration-count", NONE;
    /// Animation directions.
    AnimationDirection = "animation-direction", NONE;
    /// Animation play states.
    AnimationPlayState = "animation-play-state", NONE;
    /// Animation delays.
    AnimationDelay = "animation-delay", NONE;
    /// Animation fill modes.
    AnimationFillMode = "animation-fill-mode", NONE;
    /// Opacity.
    Opacity = "opacity", ANIMATED;
    /// Effect applied to icons.
    IconEffect = "-glaze-icon-effect", INHERIT;
    /// Icon theme name.
    IconTheme = "-glaze-icon-theme", INHERIT;
}

impl PropertyId {
    /// Every property, in id order.
    pub fn all() -> impl Iterator<Item = Self> {
        Self::iter()
    }

    /// Look up a property by its CSS name, ignoring ASCII case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::iter().find(|p| p.name().eq_ignore_ascii_case(name))
    }

    /// Whether unspecified values come from the parent.
    #[must_use]
    pub fn is_inherited(self) -> bool {
        self.flags().contains(PropertyFlags::INHERIT)
    }

    /// Whether the property can transition.
    #[must_use]
    pub fn is_animated(self) -> bool {
        self.flags().contains(PropertyFlags::ANIMATED)
    }

    /// The value used when nothing is specified and nothing is inherited.
    #[must_use]
    pub fn initial_value(self) -> StyleValue {
        match self {
            Self::Color => StyleValue::rgba(Rgba::WHITE),
            Self::Dpi => StyleValue::number(96.0),
            Self::FontSize => StyleValue::keyword(FontSizeKeyword::Medium),
            Self::IconPalette => Palette::default_value(),
            Self::BackgroundColor => StyleValue::rgba(Rgba::TRANSPARENT),
            Self::FontFamily => StyleValue::array(vec![string("Sans")]),
            Self::FontStyle => StyleValue::keyword(FontStyle::Normal),
            Self::FontVariant => StyleValue::keyword(FontVariant::Normal),
            Self::FontWeight => StyleValue::number(400.0),
            Self::FontStretch => StyleValue::keyword(FontStretch::Normal),
            Self::TextDecorationLine => StyleValue::keyword(TextDecorationLine::None),
            Self::TextDecorationStyle => StyleValue::keyword(TextDecorationStyle::Solid),
            Self::TextDecorationColor
            | Self::BorderTopColor
            | Self::BorderRightColor
            | Self::BorderBottomColor
            | Self::BorderLeftColor
            | Self::OutlineColor => Color::into_value(Color::Current),
            Self::TextShadow | Self::BoxShadow | Self::IconShadow => StyleValue::no_shadows(),
            Self::LetterSpacing
            | Self::MarginTop
            | Self::MarginLeft
            | Self::MarginBottom
            | Self::MarginRight
            | Self::PaddingTop
            | Self::PaddingLeft
            | Self::PaddingBottom
            | Self::PaddingRight
            | Self::BorderTopWidth
            | Self::BorderLeftWidth
            | Self::BorderBottomWidth
            | Self::BorderRightWidth
            | Self::OutlineWidth
            | Self::OutlineOffset
            | Self::MinWidth
            | Self::MinHeight => StyleValue::px(0.0),
            Self::BorderTopStyle
            | Self::BorderLeftStyle
            | Self::BorderBottomStyle
            | Self::BorderRightStyle
            | Self::OutlineStyle => StyleValue::keyword(BorderStyle::None),
            Self::BorderTopLeftRadius
            | Self::BorderTopRightRadius
            | Self::BorderBottomRightRadius
            | Self::BorderBottomLeftRadius
            | Self::OutlineTopLeftRadius
            | Self::OutlineTopRightRadius
            | Self::OutlineBottomRightRadius
            | Self::OutlineBottomLeftRadius => Corner::new_value(StyleValue::px(0.0), StyleValue::px(0.0)),
            Self::BackgroundClip => StyleValue::keyword(Area::BorderBox),
            Self::BackgroundOrigin => StyleValue::keyword(Area::PaddingBox),
            Self::BackgroundSize => BgSize::auto_value(),
            Self::BackgroundPosition => Position::initial_value(),
            Self::BackgroundRepeat => Repeat::new_value(RepeatStyle::Repeat, RepeatStyle::Repeat),
            Self::BackgroundImage | Self::BorderImageSource => StyleValue::none_image(),
            Self::BackgroundBlendMode => StyleValue::keyword(BlendMode::Normal),
            Self::BorderImageRepeat => Repeat::new_value(RepeatStyle::Stretch, RepeatStyle::Stretch),
            Self::BorderImageSlice => {
                let hundred = StyleValue::dimension(100.0, Unit::Percent);
                BorderQuad::new_value(
                    [hundred.clone(), hundred.clone(), hundred.clone(), hundred],
                    false,
                )
            }
            Self::BorderImageWidth => {
                let one = StyleValue::number(1.0);
                BorderQuad::new_value([one.clone(), one.clone(), one.clone(), one], false)
            }
            Self::IconSource => Image::new_value(Image::Builtin(None)),
            Self::IconStyle => StyleValue::keyword(IconStyle::Requested),
            Self::TransitionProperty => StyleValue::ident("all"),
            Self::TransitionDuration
            | Self::TransitionDelay
            | Self::AnimationDuration
            | Self::AnimationDelay => StyleValue::dimension(0.0, Unit::S),
            Self::TransitionTimingFunction | Self::AnimationTimingFunction => {
                StyleValue::new(ValueKind::Ease(Ease::EASE))
            }
            Self::AnimationName => StyleValue::ident("none"),
            Self::AnimationIterationCount | Self::Opacity => StyleValue::number(1.0),
            Self::AnimationDirection => StyleValue::keyword(AnimationDirection::Normal),
            Self::AnimationPlayState => StyleValue::keyword(PlayState::Running),
            Self::AnimationFillMode => StyleValue::keyword(FillMode::None),
            Self::IconEffect => StyleValue::keyword(IconEffect::None),
            Self::IconTheme => string(""),
        }
    }

    /// Parse a value for this property. The caller handles `inherit`,
    /// `initial` and `unset` and checks that all input was consumed.
    ///
    /// # Errors
    ///
    /// Returns the [`ParseError`] of the property's value grammar.
    pub fn parse_value(self, parser: &mut ValueParser<'_>) -> Result<StyleValue, ParseError> {
        match self {
            Self::Color
            | Self::BackgroundColor
            | Self::TextDecorationColor
            | Self::BorderTopColor
            | Self::BorderRightColor
            | Self::BorderBottomColor
            | Self::BorderLeftColor
            | Self::OutlineColor => Color::parse_value(parser),
            Self::Dpi => parse_number(parser, NumberFlags::PARSE_NUMBER | NumberFlags::POSITIVE_ONLY),
            Self::FontSize => parse_font_size(parser),
            Self::IconPalette => Palette::parse(parser),
            Self::FontFamily => parse_font_family(parser),
            Self::FontStyle => FontStyle::parse_value(parser),
            Self::FontVariant => FontVariant::parse_value(parser),
            Self::FontWeight => parse_font_weight(parser),
            Self::FontStretch => FontStretch::parse_value(parser),
            Self::LetterSpacing | Self::MarginTop | Self::MarginLeft | Self::MarginBottom | Self::MarginRight
            | Self::OutlineOffset => parse_number(parser, NumberFlags::PARSE_LENGTH | NumberFlags::NUMBER_AS_PIXELS),
            Self::TextDecorationLine => TextDecorationLine::parse_value(parser),
            Self::TextDecorationStyle => TextDecorationStyle::parse_value(parser),
            Self::TextShadow | Self::IconShadow => ShadowList::parse(parser, false),
            Self::BoxShadow => ShadowList::parse(parser, true),
            Self::PaddingTop
            | Self::PaddingLeft
            | Self::PaddingBottom
            | Self::PaddingRight
            | Self::MinWidth
            | Self::MinHeight => parse_number(parser, positive_length()),
            Self::BorderTopStyle
            | Self::BorderLeftStyle
            | Self::BorderBottomStyle
            | Self::BorderRightStyle
            | Self::OutlineStyle => BorderStyle::parse_value(parser),
            Self::BorderTopWidth
            | Self::BorderLeftWidth
            | Self::BorderBottomWidth
            | Self::BorderRightWidth
            | Self::OutlineWidth => parse_border_width(parser),
            Self::BorderTopLeftRadius
            | Self::BorderTopRightRadius
            | Self::BorderBottomRightRadius
            | Self::BorderBottomLeftRadius
            | Self::OutlineTopLeftRadius
            | Self::OutlineTopRightRadius
            | Self::OutlineBottomRightRadius
            | Self::OutlineBottomLeftRadius => Corner::parse(parser),
            Self::BackgroundClip | Self::BackgroundOrigin => parse_list(parser, Area::parse_value),
            Self::BackgroundSize => parse_list(parser, BgSize::parse),
            Self::BackgroundPosition => parse_list(parser, Position::parse),
            Self::BackgroundRepeat => parse_list(parser, Repeat::parse_background),
            Self::BackgroundImage => parse_list(parser, Image::parse),
            Self::BackgroundBlendMode => parse_list(parser, BlendMode::parse_value),
            Self::BorderImageSource | Self::IconSource => Image::parse(parser),
            Self::BorderImageRepeat => Repeat::parse_border_image(parser),
            Self::BorderImageSlice => BorderQuad::parse(
                parser,
                NumberFlags::PARSE_NUMBER | NumberFlags::PARSE_PERCENT | NumberFlags::POSITIVE_ONLY,
                true,
            ),
            Self::BorderImageWidth => BorderQuad::parse(
                parser,
                NumberFlags::PARSE_NUMBER
                    | NumberFlags::PARSE_LENGTH
                    | NumberFlags::PARSE_PERCENT
                    | NumberFlags::POSITIVE_ONLY,
                false,
            ),
            Self::IconStyle => IconStyle::parse_value(parser),
            Self::TransitionProperty => parse_list(parser, parse_transition_property),
            Self::TransitionDuration | Self::AnimationDuration => parse_list(parser, |p| {
                parse_number(p, NumberFlags::PARSE_TIME | NumberFlags::POSITIVE_ONLY)
            }),
            Self::TransitionDelay | Self::AnimationDelay => {
                parse_list(parser, |p| parse_number(p, NumberFlags::PARSE_TIME))
            }
            Self::TransitionTimingFunction | Self::AnimationTimingFunction => {
                parse_list(parser, Ease::parse_value)
            }
            Self::AnimationName => parse_list(parser, |p| p.expect_ident().map(StyleValue::ident)),
            Self::AnimationIterationCount => parse_list(parser, parse_iteration_count),
            Self::AnimationDirection => parse_list(parser, AnimationDirection::parse_value),
            Self::AnimationPlayState => parse_list(parser, PlayState::parse_value),
            Self::AnimationFillMode => parse_list(parser, FillMode::parse_value),
            Self::Opacity => parse_number(parser, NumberFlags::PARSE_NUMBER),
            Self::IconEffect => IconEffect::parse_value(parser),
            Self::IconTheme => match parser.try_any_ident() {
                Some(name) => Ok(string(name)),
                None => parser.expect_string().map(string),
            },
        }
    }

    /// Compute a specified value for this property.
    ///
    /// Most properties defer to [`StyleValue::compute`]. Border and outline
    /// widths collapse to `0` under a `none` or `hidden` style, font size
    /// keywords become pixels, and relative font weights resolve against
    /// the parent.
    #[must_use]
    pub fn compute(self, specified: &StyleValue, ctx: &ComputeContext<'_>) -> StyleValue {
        match self {
            Self::BorderTopWidth
            | Self::BorderLeftWidth
            | Self::BorderBottomWidth
            | Self::BorderRightWidth
            | Self::OutlineWidth => {
                let style = ctx
                    .computed(self.border_style_property())
                    .and_then(StyleValue::as_keyword::<BorderStyle>);
                if matches!(style, Some(BorderStyle::None | BorderStyle::Hidden)) {
                    StyleValue::number(0.0)
                } else {
                    specified.compute(self, ctx)
                }
            }
            Self::FontSize => match specified.as_keyword::<FontSizeKeyword>() {
                Some(keyword) => {
                    StyleValue::px(keyword.to_px(ctx.settings.font_size, ctx.parent_font_size()))
                }
                None => specified.compute(self, ctx),
            },
            Self::FontWeight => {
                let parent = ctx
                    .parent
                    .map_or(400.0, |p| p.get(Self::FontWeight).number_value(100.0));
                match specified.as_str() {
                    Some("bolder") => StyleValue::number(bolder(parent)),
                    Some("lighter") => StyleValue::number(lighter(parent)),
                    _ => specified.compute(self, ctx),
                }
            }
            _ => specified.compute(self, ctx),
        }
    }

    /// The style property that controls this width property.
    const fn border_style_property(self) -> Self {
        match self {
            Self::BorderTopWidth => Self::BorderTopStyle,
            Self::BorderLeftWidth => Self::BorderLeftStyle,
            Self::BorderBottomWidth => Self::BorderBottomStyle,
            Self::BorderRightWidth => Self::BorderRightStyle,
            _ => Self::OutlineStyle,
        }
    }
}

fn string(text: &str) -> StyleValue {
    StyleValue::new(ValueKind::String(text.to_string()))
}

fn positive_length() -> NumberFlags {
    NumberFlags::PARSE_LENGTH | NumberFlags::POSITIVE_ONLY | NumberFlags::NUMBER_AS_PIXELS
}

/// Parse a comma separated list. A single item is returned as itself.
pub(crate) fn parse_list(
    parser: &mut ValueParser<'_>,
    mut parse_one: impl FnMut(&mut ValueParser<'_>) -> Result<StyleValue, ParseError>,
) -> Result<StyleValue, ParseError> {
    let mut items = vec![parse_one(parser)?];
    while parser.try_comma() {
        items.push(parse_one(parser)?);
    }
    if items.len() == 1 {
        Ok(items.swap_remove(0))
    } else {
        Ok(StyleValue::array(items))
    }
}

/// `infinite` or a non-negative number.
pub(crate) fn parse_iteration_count(parser: &mut ValueParser<'_>) -> Result<StyleValue, ParseError> {
    if parser.try_ident("infinite") {
        return Ok(StyleValue::ident("infinite"));
    }
    parse_number(parser, NumberFlags::PARSE_NUMBER | NumberFlags::POSITIVE_ONLY)
}

fn parse_font_size(parser: &mut ValueParser<'_>) -> Result<StyleValue, ParseError> {
    if can_parse_number(parser) {
        return parse_number(
            parser,
            NumberFlags::PARSE_LENGTH
                | NumberFlags::PARSE_PERCENT
                | NumberFlags::POSITIVE_ONLY
                | NumberFlags::NUMBER_AS_PIXELS,
        );
    }
    FontSizeKeyword::parse_value(parser)
}

/// `font-family`: strings or runs of identifiers, comma separated.
fn parse_font_family(parser: &mut ValueParser<'_>) -> Result<StyleValue, ParseError> {
    let mut families = Vec::new();
    loop {
        let family = if let Ok(name) = parser.expect_string() {
            name.to_string()
        } else {
            let mut words = vec![parser.expect_ident()?];
            while let Some(word) = parser.try_any_ident() {
                words.push(word);
            }
            words.join(" ")
        };
        families.push(string(&family));
        if !parser.try_comma() {
            break;
        }
    }
    Ok(StyleValue::array(families))
}

/// `font-weight`: a number from 1 to 1000, `normal`, `bold`, or the
/// relative `bolder` and `lighter`, which stay identifiers until computed.
fn parse_font_weight(parser: &mut ValueParser<'_>) -> Result<StyleValue, ParseError> {
    if parser.try_ident("normal") {
        return Ok(StyleValue::number(400.0));
    }
    if parser.try_ident("bold") {
        return Ok(StyleValue::number(700.0));
    }
    for relative in ["bolder", "lighter"] {
        if parser.try_ident(relative) {
            return Ok(StyleValue::ident(relative));
        }
    }
    let weight = parser.expect_number()?;
    if !(1.0..=1000.0).contains(&weight) {
        return Err(ParseError::invalid("font weight must be between 1 and 1000"));
    }
    Ok(StyleValue::number(weight))
}

/// [CSS Fonts § 2.2 Relative weights](https://www.w3.org/TR/css-fonts-4/#relative-weights)
fn bolder(parent: f64) -> f64 {
    if parent < 350.0 {
        400.0
    } else if parent < 550.0 {
        700.0
    } else {
        parent.max(900.0)
    }
}

fn lighter(parent: f64) -> f64 {
    if parent < 100.0 {
        parent
    } else if parent < 550.0 {
        100.0
    } else if parent < 750.0 {
        400.0
    } else {
        700.0
    }
}

fn parse_border_width(parser: &mut ValueParser<'_>) -> Result<StyleValue, ParseError> {
    for (keyword, px) in [("thin", 1.0), ("medium", 3.0), ("thick", 5.0)] {
        if parser.try_ident(keyword) {
            return Ok(StyleValue::px(px));
        }
    }
    parse_number(parser, positive_length())
}

fn parse_transition_property(parser: &mut ValueParser<'_>) -> Result<StyleValue, ParseError> {
    let name = parser.expect_ident()?;
    if name.eq_ignore_ascii_case("all") || name.eq_ignore_ascii_case("none") {
        return Ok(StyleValue::ident(name.to_ascii_lowercase()));
    }
    Ok(StyleValue::ident(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_text;

    #[test]
    fn test_names_round_trip() {
        for property in PropertyId::all() {
            assert_eq!(PropertyId::from_name(property.name()), Some(property));
        }
        assert_eq!(PropertyId::COUNT, PropertyId::all().count());
    }

    #[test]
    fn test_styles_precede_widths() {
        assert!(PropertyId::BorderTopStyle < PropertyId::BorderTopWidth);
        assert!(PropertyId::OutlineStyle < PropertyId::OutlineWidth);
        assert!(PropertyId::Color < PropertyId::BorderTopColor);
        assert!(PropertyId::BackgroundColor < PropertyId::IconSource);
    }

    #[test]
    fn test_parse_lists() {
        let value = parse_text("0.2s, 100ms", |p| PropertyId::TransitionDuration.parse_value(p)).unwrap();
        assert_eq!(value.as_slice().len(), 2);
        assert_eq!(value.to_string(), "0.2s, 100ms");
    }

    #[test]
    fn test_font_weight() {
        let bold = parse_text("bold", |p| PropertyId::FontWeight.parse_value(p)).unwrap();
        assert_eq!(bold.number_value(100.0), 700.0);
        assert!(parse_text("1200", |p| PropertyId::FontWeight.parse_value(p)).is_err());
        assert_eq!(bolder(400.0), 700.0);
        assert_eq!(lighter(700.0), 400.0);
    }

    #[test]
    fn test_border_width_keywords() {
        let thick = parse_text("thick", |p| PropertyId::BorderTopWidth.parse_value(p)).unwrap();
        assert_eq!(thick.number_value(100.0), 5.0);
        assert!(parse_text("-1px", |p| PropertyId::BorderTopWidth.parse_value(p)).is_err());
    }
}
