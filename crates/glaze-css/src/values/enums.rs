//! Keyword properties.
//!
//! Each keyword set is a plain enum deriving its CSS names through `strum`.
//! [`EnumValue`] wraps all of them so a [`StyleValue`] can hold any keyword,
//! and the [`Keyword`] trait gets a typed keyword back out.

use core::fmt;
use core::str::FromStr;

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use super::{StyleValue, ValueKind};
use crate::parser::{ParseError, ValueParser};

/// A keyword enum that can live inside a [`StyleValue`].
pub trait Keyword: Copy + FromStr + fmt::Display + IntoEnumIterator + Into<EnumValue> {
    /// Extract this keyword type from a wrapped value.
    fn from_enum(value: EnumValue) -> Option<Self>;

    /// Parse one keyword of this type.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Expected`] listing the valid keywords.
    fn parse(parser: &mut ValueParser<'_>) -> Result<Self, ParseError> {
        let checkpoint = parser.checkpoint();
        if let Some(ident) = parser.try_any_ident() {
            if let Ok(keyword) = ident.parse() {
                return Ok(keyword);
            }
        }
        parser.rewind(checkpoint);
        let names: Vec<String> = Self::iter().map(|k| k.to_string()).collect();
        Err(parser.expected(&names.join(" | ")))
    }

    /// Parse one keyword into a value.
    ///
    /// # Errors
    ///
    /// See [`Keyword::parse`].
    fn parse_value(parser: &mut ValueParser<'_>) -> Result<StyleValue, ParseError> {
        Self::parse(parser).map(StyleValue::keyword)
    }
}

macro_rules! keyword_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
        #[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl From<$name> for EnumValue {
            fn from(value: $name) -> Self {
                Self::$name(value)
            }
        }

        impl Keyword for $name {
            fn from_enum(value: EnumValue) -> Option<Self> {
                match value {
                    EnumValue::$name(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

keyword_enum! {
    /// `border-style` and `outline-style`.
    BorderStyle {
        /// No border.
        None,
        /// A single line.
        Solid,
        /// Looks embedded: top and left darker.
        Inset,
        /// Looks raised: bottom and right darker.
        Outset,
        /// Like `none`, winning border conflicts.
        Hidden,
        /// Round dots.
        Dotted,
        /// Square dashes.
        Dashed,
        /// Two lines.
        Double,
        /// Carved in.
        Groove,
        /// Coming out.
        Ridge,
    }
}

keyword_enum! {
    /// `background-clip` and `background-origin`.
    Area {
        /// Outside edge of the border.
        BorderBox,
        /// Outside edge of the padding.
        PaddingBox,
        /// Outside edge of the content.
        ContentBox,
    }
}

keyword_enum! {
    /// `background-blend-mode`.
    BlendMode {
        /// Source over.
        Normal,
        /// Multiply.
        Multiply,
        /// Screen.
        Screen,
        /// Overlay.
        Overlay,
        /// Darken.
        Darken,
        /// Lighten.
        Lighten,
        /// Color dodge.
        ColorDodge,
        /// Color burn.
        ColorBurn,
        /// Hard light.
        HardLight,
        /// Soft light.
        SoftLight,
        /// Difference.
        Difference,
        /// Exclusion.
        Exclusion,
        /// Hue.
        Hue,
        /// Saturation.
        Saturate,
        /// Color.
        Color,
        /// Luminosity.
        Luminosity,
    }
}

keyword_enum! {
    /// Absolute and relative `font-size` keywords.
    FontSizeKeyword {
        /// One step smaller than the parent.
        Smaller,
        /// One step larger than the parent.
        Larger,
        /// 3/5 of medium.
        XxSmall,
        /// 3/4 of medium.
        XSmall,
        /// 8/9 of medium.
        Small,
        /// The default size.
        Medium,
        /// 6/5 of medium.
        Large,
        /// 3/2 of medium.
        XLarge,
        /// 2 times medium.
        XxLarge,
    }
}

impl FontSizeKeyword {
    /// The size in pixels, given the default size and the parent's size.
    #[must_use]
    pub fn to_px(self, medium: f64, parent: f64) -> f64 {
        match self {
            Self::Smaller => parent / 1.2,
            Self::Larger => parent * 1.2,
            Self::XxSmall => medium * 3.0 / 5.0,
            Self::XSmall => medium * 3.0 / 4.0,
            Self::Small => medium * 8.0 / 9.0,
            Self::Medium => medium,
            Self::Large => medium * 6.0 / 5.0,
            Self::XLarge => medium * 3.0 / 2.0,
            Self::XxLarge => medium * 2.0,
        }
    }
}

keyword_enum! {
    /// `font-style`.
    FontStyle {
        /// Upright.
        Normal,
        /// Slanted.
        Oblique,
        /// Cursive.
        Italic,
    }
}

keyword_enum! {
    /// `font-variant`.
    FontVariant {
        /// Regular glyphs.
        Normal,
        /// Small capitals.
        SmallCaps,
    }
}

keyword_enum! {
    /// `font-stretch`.
    FontStretch {
        /// 50%.
        UltraCondensed,
        /// 62.5%.
        ExtraCondensed,
        /// 75%.
        Condensed,
        /// 87.5%.
        SemiCondensed,
        /// 100%.
        Normal,
        /// 112.5%.
        SemiExpanded,
        /// 125%.
        Expanded,
        /// 150%.
        ExtraExpanded,
        /// 200%.
        UltraExpanded,
    }
}

keyword_enum! {
    /// `text-decoration-line`.
    TextDecorationLine {
        /// No line.
        None,
        /// Below the text.
        Underline,
        /// Through the middle of the text.
        LineThrough,
    }
}

keyword_enum! {
    /// `text-decoration-style`.
    TextDecorationStyle {
        /// One line.
        Solid,
        /// Two lines.
        Double,
        /// A wave.
        Wavy,
    }
}

keyword_enum! {
    /// `animation-direction`.
    AnimationDirection {
        /// Forwards every iteration.
        Normal,
        /// Backwards every iteration.
        Reverse,
        /// Forwards, then backwards.
        Alternate,
        /// Backwards, then forwards.
        AlternateReverse,
    }
}

keyword_enum! {
    /// `animation-play-state`.
    PlayState {
        /// Advancing.
        Running,
        /// Frozen.
        Paused,
    }
}

keyword_enum! {
    /// `animation-fill-mode`.
    FillMode {
        /// No effect outside the active period.
        None,
        /// Keep the final keyframe afterwards.
        Forwards,
        /// Apply the first keyframe during the delay.
        Backwards,
        /// Both.
        Both,
    }
}

keyword_enum! {
    /// `-glaze-icon-effect`.
    IconEffect {
        /// Unchanged.
        None,
        /// Brightened.
        Highlight,
        /// Half transparent.
        Dim,
    }
}

keyword_enum! {
    /// `-glaze-icon-style`.
    IconStyle {
        /// Whatever the icon asks for.
        Requested,
        /// Full color.
        Regular,
        /// Recolored monochrome.
        Symbolic,
    }
}

/// Any keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumValue {
    /// A border style.
    BorderStyle(BorderStyle),
    /// A box area.
    Area(Area),
    /// A blend mode.
    BlendMode(BlendMode),
    /// A font size keyword.
    FontSizeKeyword(FontSizeKeyword),
    /// A font style.
    FontStyle(FontStyle),
    /// A font variant.
    FontVariant(FontVariant),
    /// A font stretch.
    FontStretch(FontStretch),
    /// A text decoration line.
    TextDecorationLine(TextDecorationLine),
    /// A text decoration style.
    TextDecorationStyle(TextDecorationStyle),
    /// An animation direction.
    AnimationDirection(AnimationDirection),
    /// An animation play state.
    PlayState(PlayState),
    /// An animation fill mode.
    FillMode(FillMode),
    /// An icon effect.
    IconEffect(IconEffect),
    /// An icon style.
    IconStyle(IconStyle),
}

impl fmt::Display for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BorderStyle(v) => v.fmt(f),
            Self::Area(v) => v.fmt(f),
            Self::BlendMode(v) => v.fmt(f),
            Self::FontSizeKeyword(v) => v.fmt(f),
            Self::FontStyle(v) => v.fmt(f),
            Self::FontVariant(v) => v.fmt(f),
            Self::FontStretch(v) => v.fmt(f),
            Self::TextDecorationLine(v) => v.fmt(f),
            Self::TextDecorationStyle(v) => v.fmt(f),
            Self::AnimationDirection(v) => v.fmt(f),
            Self::PlayState(v) => v.fmt(f),
            Self::FillMode(v) => v.fmt(f),
            Self::IconEffect(v) => v.fmt(f),
            Self::IconStyle(v) => v.fmt(f),
        }
    }
}

impl StyleValue {
    /// The keyword of type `T` held by this value.
    #[must_use]
    pub fn as_keyword<T: Keyword>(&self) -> Option<T> {
        match self.kind() {
            ValueKind::Enum(e) => T::from_enum(*e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_text;

    #[test]
    fn test_keywords_print_kebab_case() {
        assert_eq!(BorderStyle::Dotted.to_string(), "dotted");
        assert_eq!(AnimationDirection::AlternateReverse.to_string(), "alternate-reverse");
        assert_eq!(FontSizeKeyword::XxSmall.to_string(), "xx-small");
    }

    #[test]
    fn test_alternate_reverse_is_not_cut_short() {
        let value = parse_text("alternate-reverse", AnimationDirection::parse_value).unwrap();
        assert_eq!(
            value.as_keyword::<AnimationDirection>(),
            Some(AnimationDirection::AlternateReverse)
        );
    }

    #[test]
    fn test_unknown_keyword_lists_choices() {
        let err = parse_text("wobbly", IconEffect::parse_value).unwrap_err();
        assert_eq!(
            err,
            ParseError::Expected {
                expected: "none | highlight | dim".to_string(),
                found: "wobbly".to_string()
            }
        );
    }
}
