//! Literal colors and the HSLA color space.
//!
//! [CSS Color § 4](https://www.w3.org/TR/css-color-4/#color-syntax)
//!
//! Channels are stored as `f64` in `[0, 1]`. Two colors compare equal when
//! their 8-bit channel values and their alpha agree, which is also what
//! printing preserves, so `rgba(…)` text round-trips exactly.

use core::fmt;

use super::dimension::lerp;
use crate::parser::{ParseError, ValueParser};
use crate::tokenizer::CSSToken;

/// A color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy)]
pub struct Rgba {
    /// Red in `[0, 1]`.
    pub red: f64,
    /// Green in `[0, 1]`.
    pub green: f64,
    /// Blue in `[0, 1]`.
    pub blue: f64,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque black.
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Create a color from channels in `[0, 1]`.
    #[must_use]
    pub const fn new(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Create an opaque color from 8-bit channels.
    #[must_use]
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
            1.0,
        )
    }

    /// Create a color from a packed `0xRRGGBB` value.
    #[must_use]
    pub fn from_hex(rgb: u32) -> Self {
        let [_, r, g, b] = rgb.to_be_bytes();
        Self::from_rgb8(r, g, b)
    }

    /// Whether every channel is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.red == 0.0 && self.green == 0.0 && self.blue == 0.0 && self.alpha == 0.0
    }

    /// Whether the color paints nothing.
    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.alpha < f64::from(0x00ff_u16) / f64::from(0xffff_u16)
    }

    /// The 8-bit channels, truncating. Alpha is rounded.
    #[must_use]
    pub fn to_rgba8(&self) -> [u8; 4] {
        [
            channel8(self.red),
            channel8(self.green),
            channel8(self.blue),
            (self.alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
        ]
    }

    /// Scale lightness and saturation by `factor`.
    #[must_use]
    pub fn shade(&self, factor: f64) -> Self {
        let mut hsla = Hsla::from(*self);
        hsla.lightness = (hsla.lightness * factor).clamp(0.0, 1.0);
        hsla.saturation = (hsla.saturation * factor).clamp(0.0, 1.0);
        hsla.into()
    }

    /// Scale alpha by `factor`.
    #[must_use]
    pub fn with_alpha_factor(&self, factor: f64) -> Self {
        Self {
            alpha: (self.alpha * factor).clamp(0.0, 1.0),
            ..*self
        }
    }

    /// Channel-wise mix: `self · (1 − factor) + other · factor`.
    #[must_use]
    pub fn mix(&self, other: &Self, factor: f64) -> Self {
        let channel = |a: f64, b: f64| lerp(a, b, factor).clamp(0.0, 1.0);
        Self::new(
            channel(self.red, other.red),
            channel(self.green, other.green),
            channel(self.blue, other.blue),
            channel(self.alpha, other.alpha),
        )
    }

    /// Interpolate in premultiplied space so fading to transparent does not
    /// darken the color.
    #[must_use]
    pub fn transition(&self, end: &Self, progress: f64) -> Self {
        let progress = progress.clamp(0.0, 1.0);
        let alpha = lerp(self.alpha, end.alpha, progress);
        if alpha <= 0.0 {
            return Self::TRANSPARENT;
        }
        let channel = |a: f64, b: f64| {
            (lerp(a * self.alpha, b * end.alpha, progress) / alpha).clamp(0.0, 1.0)
        };
        Self::new(
            channel(self.red, end.red),
            channel(self.green, end.green),
            channel(self.blue, end.blue),
            alpha,
        )
    }

    /// Parse `rgb()`, `rgba()`, `hsl()`, `hsla()`, a hex color or a color
    /// keyword.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if the next tokens are not a literal color.
    pub fn parse(parser: &mut ValueParser<'_>) -> Result<Self, ParseError> {
        match parser.peek() {
            CSSToken::Hash { value, .. } => {
                let rgba = Self::from_hex_str(value)
                    .ok_or_else(|| ParseError::invalid(format!("'#{value}' is not a valid color")))?;
                let _ = parser.next_token();
                Ok(rgba)
            }
            CSSToken::Ident(name) => {
                let rgba = named_color(name)
                    .ok_or_else(|| ParseError::invalid(format!("'{name}' is not a valid color name")))?;
                let _ = parser.next_token();
                Ok(rgba)
            }
            CSSToken::Function(name) if name.eq_ignore_ascii_case("rgb") || name.eq_ignore_ascii_case("rgba") => {
                let _ = parser.next_token();
                parse_rgb_arguments(parser)
            }
            CSSToken::Function(name) if name.eq_ignore_ascii_case("hsl") || name.eq_ignore_ascii_case("hsla") => {
                let _ = parser.next_token();
                parse_hsl_arguments(parser)
            }
            _ => Err(parser.expected("a color")),
        }
    }

    /// Parse the text after `#`: 3, 4, 6 or 8 hex digits.
    #[must_use]
    pub fn from_hex_str(hex: &str) -> Option<Self> {
        let digits: Vec<u8> = hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<_>>()?;
        let (r, g, b, a) = match digits.len() {
            3 | 4 => (
                digits[0] * 17,
                digits[1] * 17,
                digits[2] * 17,
                digits.get(3).map_or(255, |d| d * 17),
            ),
            6 | 8 => (
                digits[0] * 16 + digits[1],
                digits[2] * 16 + digits[3],
                digits[4] * 16 + digits[5],
                if digits.len() == 8 {
                    digits[6] * 16 + digits[7]
                } else {
                    255
                },
            ),
            _ => return None,
        };
        let mut rgba = Self::from_rgb8(r, g, b);
        rgba.alpha = f64::from(a) / 255.0;
        Some(rgba)
    }
}

/// Truncate a channel to 8 bits. The epsilon keeps `n / 255` stable.
fn channel8(c: f64) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0 + 1e-9).floor() as u8
}

impl PartialEq for Rgba {
    fn eq(&self, other: &Self) -> bool {
        channel8(self.red) == channel8(other.red)
            && channel8(self.green) == channel8(other.green)
            && channel8(self.blue) == channel8(other.blue)
            && self.alpha == other.alpha
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({},{},{},{})",
            channel8(self.red),
            channel8(self.green),
            channel8(self.blue),
            self.alpha.clamp(0.0, 1.0)
        )
    }
}

/// `rgb(r, g, b)` and `rgba(r, g, b, a)`. Channels are numbers out of 255
/// or percentages; the alpha argument is optional for both spellings.
fn parse_rgb_arguments(parser: &mut ValueParser<'_>) -> Result<Rgba, ParseError> {
    let mut channels = [0.0; 3];
    for (i, channel) in channels.iter_mut().enumerate() {
        if i > 0 {
            parser.expect_comma()?;
        }
        *channel = match parser.next_token() {
            CSSToken::Number { value, .. } => value / 255.0,
            CSSToken::Percentage(value) => value / 100.0,
            other => {
                return Err(ParseError::Expected {
                    expected: "a color channel".to_string(),
                    found: other.to_string(),
                });
            }
        };
    }
    let alpha = parse_optional_alpha(parser)?;
    parser.expect_close_paren()?;
    Ok(Rgba::new(channels[0], channels[1], channels[2], alpha))
}

/// `hsl(h, s%, l%)` and `hsla(h, s%, l%, a)`. The hue is in degrees.
fn parse_hsl_arguments(parser: &mut ValueParser<'_>) -> Result<Rgba, ParseError> {
    let hue = match parser.next_token() {
        CSSToken::Number { value, .. } => *value,
        CSSToken::Dimension { value, unit } if unit.eq_ignore_ascii_case("deg") => *value,
        other => {
            return Err(ParseError::Expected {
                expected: "a hue".to_string(),
                found: other.to_string(),
            });
        }
    };
    let mut percents = [0.0; 2];
    for percent in &mut percents {
        parser.expect_comma()?;
        *percent = match parser.next_token() {
            CSSToken::Percentage(value) => (value / 100.0).clamp(0.0, 1.0),
            other => {
                return Err(ParseError::Expected {
                    expected: "a percentage".to_string(),
                    found: other.to_string(),
                });
            }
        };
    }
    let alpha = parse_optional_alpha(parser)?;
    parser.expect_close_paren()?;
    Ok(Hsla {
        hue: hue.rem_euclid(360.0),
        saturation: percents[0],
        lightness: percents[1],
        alpha,
    }
    .into())
}

fn parse_optional_alpha(parser: &mut ValueParser<'_>) -> Result<f64, ParseError> {
    if !parser.try_comma() {
        return Ok(1.0);
    }
    match parser.next_token() {
        CSSToken::Number { value, .. } => Ok(value.clamp(0.0, 1.0)),
        CSSToken::Percentage(value) => Ok((value / 100.0).clamp(0.0, 1.0)),
        other => Err(ParseError::Expected {
            expected: "an alpha value".to_string(),
            found: other.to_string(),
        }),
    }
}

/// A color in hue, saturation, lightness form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsla {
    /// Hue in degrees, `[0, 360)`.
    pub hue: f64,
    /// Saturation in `[0, 1]`.
    pub saturation: f64,
    /// Lightness in `[0, 1]`.
    pub lightness: f64,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
}

impl From<Rgba> for Hsla {
    fn from(rgba: Rgba) -> Self {
        let Rgba {
            red,
            green,
            blue,
            alpha,
        } = rgba;
        let max = red.max(green).max(blue);
        let min = red.min(green).min(blue);
        let lightness = (max + min) / 2.0;
        let mut saturation = 0.0;
        let mut hue = 0.0;

        if max != min {
            saturation = if lightness <= 0.5 {
                (max - min) / (max + min)
            } else {
                (max - min) / (2.0 - max - min)
            };
            let delta = max - min;
            hue = if red == max {
                (green - blue) / delta
            } else if green == max {
                2.0 + (blue - red) / delta
            } else {
                4.0 + (red - green) / delta
            };
            hue *= 60.0;
            if hue < 0.0 {
                hue += 360.0;
            }
        }

        Self {
            hue,
            saturation,
            lightness,
            alpha,
        }
    }
}

impl From<Hsla> for Rgba {
    fn from(hsla: Hsla) -> Self {
        let Hsla {
            hue,
            saturation,
            lightness,
            alpha,
        } = hsla;
        if saturation == 0.0 {
            return Self::new(lightness, lightness, lightness, alpha);
        }

        let m2 = if lightness <= 0.5 {
            lightness * (1.0 + saturation)
        } else {
            lightness + saturation - lightness * saturation
        };
        let m1 = 2.0 * lightness - m2;

        let channel = |hue: f64| {
            let hue = hue.rem_euclid(360.0);
            if hue < 60.0 {
                m1 + (m2 - m1) * hue / 60.0
            } else if hue < 180.0 {
                m2
            } else if hue < 240.0 {
                m1 + (m2 - m1) * (240.0 - hue) / 60.0
            } else {
                m1
            }
        };

        Self::new(
            channel(hue + 120.0),
            channel(hue),
            channel(hue - 120.0),
            alpha,
        )
    }
}

/// Look up a CSS color keyword.
#[must_use]
pub fn named_color(name: &str) -> Option<Rgba> {
    let name = name.to_ascii_lowercase();
    NAMED_COLORS
        .binary_search_by(|(candidate, _)| (*candidate).cmp(name.as_str()))
        .ok()
        .map(|i| Rgba::from_hex(NAMED_COLORS[i].1))
}

/// [CSS Color § 6.1 Named Colors](https://www.w3.org/TR/css-color-4/#named-colors), sorted.
static NAMED_COLORS: &[(&str, u32)] = &[
    ("aliceblue", 0xf0f8ff),
    ("antiquewhite", 0xfaebd7),
    ("aqua", 0x00ffff),
    ("aquamarine", 0x7fffd4),
    ("azure", 0xf0ffff),
    ("beige", 0xf5f5dc),
    ("bisque", 0xffe4c4),
    ("black", 0x000000),
    ("blanchedalmond", 0xffebcd),
    ("blue", 0x0000ff),
    ("blueviolet", 0x8a2be2),
    ("brown", 0xa52a2a),
    ("burlywood", 0xdeb887),
    ("cadetblue", 0x5f9ea0),
    ("chartreuse", 0x7fff00),
    ("chocolate", 0xd2691e),
    ("coral", 0xff7f50),
    ("cornflowerblue", 0x6495ed),
    ("cornsilk", 0xfff8dc),
    ("crimson", 0xdc143c),
    ("cyan", 0x00ffff),
    ("darkblue", 0x00008b),
    ("darkcyan", 0x008b8b),
    ("darkgoldenrod", 0xb8860b),
    ("darkgray", 0xa9a9a9),
    ("darkgreen", 0x006400),
    ("darkgrey", 0xa9a9a9),
    ("darkkhaki", 0xbdb76b),
    ("darkmagenta", 0x8b008b),
    ("darkolivegreen", 0x556b2f),
    ("darkorange", 0xff8c00),
    ("darkorchid", 0x9932cc),
    ("darkred", 0x8b0000),
    ("darksalmon", 0xe9967a),
    ("darkseagreen", 0x8fbc8f),
    ("darkslateblue", 0x483d8b),
    ("darkslategray", 0x2f4f4f),
    ("darkslategrey", 0x2f4f4f),
    ("darkturquoise", 0x00ced1),
    ("darkviolet", 0x9400d3),
    ("deeppink", 0xff1493),
    ("deepskyblue", 0x00bfff),
    ("dimgray", 0x696969),
    ("dimgrey", 0x696969),
    ("dodgerblue", 0x1e90ff),
    ("firebrick", 0xb22222),
    ("floralwhite", 0xfffaf0),
    ("forestgreen", 0x228b22),
    ("fuchsia", 0xff00ff),
    ("gainsboro", 0xdcdcdc),
    ("ghostwhite", 0xf8f8ff),
    ("gold", 0xffd700),
    ("goldenrod", 0xdaa520),
    ("gray", 0x808080),
    ("green", 0x008000),
    ("greenyellow", 0xadff2f),
    ("grey", 0x808080),
    ("honeydew", 0xf0fff0),
    ("hotpink", 0xff69b4),
    ("indianred", 0xcd5c5c),
    ("indigo", 0x4b0082),
    ("ivory", 0xfffff0),
    ("khaki", 0xf0e68c),
    ("lavender", 0xe6e6fa),
    ("lavenderblush", 0xfff0f5),
    ("lawngreen", 0x7cfc00),
    ("lemonchiffon", 0xfffacd),
    ("lightblue", 0xadd8e6),
    ("lightcoral", 0xf08080),
    ("lightcyan", 0xe0ffff),
    ("lightgoldenrodyellow", 0xfafad2),
    ("lightgray", 0xd3d3d3),
    ("lightgreen", 0x90ee90),
    ("lightgrey", 0xd3d3d3),
    ("lightpink", 0xffb6c1),
    ("lightsalmon", 0xffa07a),
    ("lightseagreen", 0x20b2aa),
    ("lightskyblue", 0x87cefa),
    ("lightslategray", 0x778899),
    ("lightslategrey", 0x778899),
    ("lightsteelblue", 0xb0c4de),
    ("lightyellow", 0xffffe0),
    ("lime", 0x00ff00),
    ("limegreen", 0x32cd32),
    ("linen", 0xfaf0e6),
    ("magenta", 0xff00ff),
    ("maroon", 0x800000),
    ("mediumaquamarine", 0x66cdaa),
    ("mediumblue", 0x0000cd),
    ("mediumorchid", 0xba55d3),
    ("mediumpurple", 0x9370db),
    ("mediumseagreen", 0x3cb371),
    ("mediumslateblue", 0x7b68ee),
    ("mediumspringgreen", 0x00fa9a),
    ("mediumturquoise", 0x48d1cc),
    ("mediumvioletred", 0xc71585),
    ("midnightblue", 0x191970),
    ("mintcream", 0xf5fffa),
    ("mistyrose", 0xffe4e1),
    ("moccasin", 0xffe4b5),
    ("navajowhite", 0xffdead),
    ("navy", 0x000080),
    ("oldlace", 0xfdf5e6),
    ("olive", 0x808000),
    ("olivedrab", 0x6b8e23),
    ("orange", 0xffa500),
    ("orangered", 0xff4500),
    ("orchid", 0xda70d6),
    ("palegoldenrod", 0xeee8aa),
    ("palegreen", 0x98fb98),
    ("paleturquoise", 0xafeeee),
    ("palevioletred", 0xdb7093),
    ("papayawhip", 0xffefd5),
    ("peachpuff", 0xffdab9),
    ("peru", 0xcd853f),
    ("pink", 0xffc0cb),
    ("plum", 0xdda0dd),
    ("powderblue", 0xb0e0e6),
    ("purple", 0x800080),
    ("rebeccapurple", 0x663399),
    ("red", 0xff0000),
    ("rosybrown", 0xbc8f8f),
    ("royalblue", 0x4169e1),
    ("saddlebrown", 0x8b4513),
    ("salmon", 0xfa8072),
    ("sandybrown", 0xf4a460),
    ("seagreen", 0x2e8b57),
    ("seashell", 0xfff5ee),
    ("sienna", 0xa0522d),
    ("silver", 0xc0c0c0),
    ("skyblue", 0x87ceeb),
    ("slateblue", 0x6a5acd),
    ("slategray", 0x708090),
    ("slategrey", 0x708090),
    ("snow", 0xfffafa),
    ("springgreen", 0x00ff7f),
    ("steelblue", 0x4682b4),
    ("tan", 0xd2b48c),
    ("teal", 0x008080),
    ("thistle", 0xd8bfd8),
    ("tomato", 0xff6347),
    ("turquoise", 0x40e0d0),
    ("violet", 0xee82ee),
    ("wheat", 0xf5deb3),
    ("white", 0xffffff),
    ("whitesmoke", 0xf5f5f5),
    ("yellow", 0xffff00),
    ("yellowgreen", 0x9acd32),
];
