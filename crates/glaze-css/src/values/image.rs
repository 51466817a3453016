//! Images: backgrounds, border image sources and icon sources.

use core::fmt;
use std::rc::Rc;

use glaze_common::warning::warn_once;

use super::dimension::lerp;
use super::gradient::Gradient;
use super::palette::Palette;
use super::{ComputeContext, Rgba, StyleValue, ValueKind};
use crate::paint::{Canvas2D, Format, Surface};
use crate::parser::{ParseError, ValueParser};
use crate::style::PropertyId;
use crate::tokenizer::CSSToken;

/// An image value.
#[derive(Debug, Clone)]
pub enum Image {
    /// No image.
    None,
    /// The built-in icon set. Holds the foreground and background colors
    /// once computed.
    Builtin(Option<BuiltinColors>),
    /// A raster or vector file.
    Url {
        /// Location as written.
        url: String,
        /// Loaded pixels once computed.
        surface: Option<Rc<Surface>>,
    },
    /// A `-glaze-gradient()`.
    Gradient(Gradient),
    /// `cross-fade(p, start, end)`.
    CrossFade {
        /// Weight of `end`, in `[0, 1]`.
        progress: f64,
        /// Image shown at progress 0.
        start: StyleValue,
        /// Image shown at progress 1.
        end: StyleValue,
    },
    /// A symbolic icon recolored with the foreground color and a palette.
    Recolor {
        /// Location as written.
        url: String,
        /// Explicit palette; the `-glaze-icon-palette` applies without one.
        palette: Option<StyleValue>,
        /// Recolored pixels once computed.
        surface: Option<Rc<Surface>>,
    },
}

/// Colors a built-in icon is drawn with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuiltinColors {
    /// Computed `color`.
    pub foreground: Rgba,
    /// Computed `background-color`.
    pub background: Rgba,
}

impl Default for BuiltinColors {
    fn default() -> Self {
        Self {
            foreground: Rgba::BLACK,
            background: Rgba::WHITE,
        }
    }
}

impl PartialEq for Image {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Builtin(a), Self::Builtin(b)) => a == b,
            (Self::Url { url: a, .. }, Self::Url { url: b, .. }) => a == b,
            (Self::Gradient(a), Self::Gradient(b)) => a == b,
            (
                Self::CrossFade {
                    progress: p1,
                    start: s1,
                    end: e1,
                },
                Self::CrossFade {
                    progress: p2,
                    start: s2,
                    end: e2,
                },
            ) => p1 == p2 && s1.equal(s2) && e1.equal(e2),
            (
                Self::Recolor {
                    url: u1,
                    palette: p1,
                    surface: s1,
                },
                Self::Recolor {
                    url: u2,
                    palette: p2,
                    surface: s2,
                },
            ) => u1 == u2 && p1 == p2 && s1.is_some() == s2.is_some(),
            _ => false,
        }
    }
}

impl Image {
    /// Wrap an image into a value.
    #[must_use]
    pub fn new_value(image: Self) -> StyleValue {
        match image {
            Self::None => StyleValue::none_image(),
            image => StyleValue::new(ValueKind::Image(image)),
        }
    }

    /// Whether this is `none`.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Natural width in px, or 0 when the image has none.
    #[must_use]
    pub fn width(&self) -> f64 {
        match self {
            Self::Url {
                surface: Some(s), ..
            }
            | Self::Recolor {
                surface: Some(s), ..
            } => s.logical_size().0,
            Self::CrossFade {
                progress,
                start,
                end,
            } => cross_fade_size(*progress, image_width(start), image_width(end)),
            _ => 0.0,
        }
    }

    /// Natural height in px, or 0 when the image has none.
    #[must_use]
    pub fn height(&self) -> f64 {
        match self {
            Self::Url {
                surface: Some(s), ..
            }
            | Self::Recolor {
                surface: Some(s), ..
            } => s.logical_size().1,
            Self::CrossFade {
                progress,
                start,
                end,
            } => cross_fade_size(*progress, image_height(start), image_height(end)),
            _ => 0.0,
        }
    }

    /// Natural width to height ratio, or 0 when the image has none.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        let (width, height) = (self.width(), self.height());
        if width > 0.0 && height > 0.0 {
            width / height
        } else {
            0.0
        }
    }

    /// The size to draw at when asked for `specified_width` ×
    /// `specified_height` (0 meaning unspecified) in an area of
    /// `default_width` × `default_height`.
    ///
    /// [CSS Images § 5.2](https://www.w3.org/TR/css-images-3/#default-sizing)
    #[must_use]
    pub fn concrete_size(
        &self,
        specified_width: f64,
        specified_height: f64,
        default_width: f64,
        default_height: f64,
    ) -> (f64, f64) {
        if specified_width > 0.0 && specified_height > 0.0 {
            return (specified_width, specified_height);
        }
        let (width, height, ratio) = (self.width(), self.height(), self.aspect_ratio());

        if specified_width <= 0.0 && specified_height <= 0.0 {
            if width > 0.0 && height > 0.0 {
                return (width, height);
            }
            if ratio > 0.0 {
                return if default_width <= default_height * ratio {
                    (default_width, default_width / ratio)
                } else {
                    (default_height * ratio, default_height)
                };
            }
            return (
                if width > 0.0 { width } else { default_width },
                if height > 0.0 { height } else { default_height },
            );
        }

        if specified_width > 0.0 {
            let height = if ratio > 0.0 {
                specified_width / ratio
            } else if height > 0.0 {
                height
            } else {
                default_height
            };
            return (specified_width, height);
        }

        let width = if ratio > 0.0 {
            specified_height * ratio
        } else if width > 0.0 {
            width
        } else {
            default_width
        };
        (width, specified_height)
    }

    pub(crate) fn compute(
        &self,
        this: &StyleValue,
        property: PropertyId,
        ctx: &ComputeContext<'_>,
    ) -> StyleValue {
        match self {
            Self::None | Self::Url { surface: Some(_), .. } | Self::Recolor { surface: Some(_), .. } => {
                this.clone()
            }
            Self::Builtin(colors) => {
                let computed = BuiltinColors {
                    foreground: ctx.current_color().unwrap_or(Rgba::BLACK),
                    background: ctx
                        .computed(PropertyId::BackgroundColor)
                        .map_or(Rgba::WHITE, StyleValue::as_rgba),
                };
                if colors.as_ref() == Some(&computed) {
                    this.clone()
                } else {
                    Self::new_value(Self::Builtin(Some(computed)))
                }
            }
            Self::Url { url, surface: None } => match load(url, ctx) {
                Some(surface) => Self::new_value(Self::Url {
                    url: url.clone(),
                    surface: Some(surface),
                }),
                None => StyleValue::none_image(),
            },
            Self::Recolor {
                url,
                palette,
                surface: None,
            } => {
                let Some(source) = load(url, ctx) else {
                    return StyleValue::none_image();
                };
                let palette = palette
                    .as_ref()
                    .map(|p| p.compute(property, ctx))
                    .or_else(|| ctx.computed(PropertyId::IconPalette).cloned())
                    .unwrap_or_else(Palette::default_value);
                let surface = recolor(&source, &palette, ctx.current_color().unwrap_or(Rgba::BLACK));
                Self::new_value(Self::Recolor {
                    url: url.clone(),
                    palette: Some(palette),
                    surface: Some(Rc::new(surface)),
                })
            }
            Self::Gradient(gradient) => {
                if gradient.is_computed() {
                    this.clone()
                } else {
                    Self::new_value(Self::Gradient(gradient.compute(property, ctx)))
                }
            }
            Self::CrossFade {
                progress,
                start,
                end,
            } => {
                let start_c = start.compute(property, ctx);
                let end_c = end.compute(property, ctx);
                if StyleValue::ptr_eq(&start_c, start) && StyleValue::ptr_eq(&end_c, end) {
                    this.clone()
                } else {
                    Self::new_value(Self::CrossFade {
                        progress: *progress,
                        start: start_c,
                        end: end_c,
                    })
                }
            }
        }
    }

    /// Interpolate from `start` (holding `self`) to `end_value` (holding
    /// `end`). Gradients of the same shape morph; anything else cross-fades.
    #[must_use]
    pub fn transition(
        &self,
        start: &StyleValue,
        end: &Self,
        end_value: &StyleValue,
        property: PropertyId,
        progress: f64,
    ) -> StyleValue {
        if progress <= 0.0 {
            return start.clone();
        }
        if progress >= 1.0 {
            return end_value.clone();
        }
        match (self, end) {
            (Self::Gradient(a), Self::Gradient(b)) => {
                if let Some(g) = a.transition(Some(b), property, progress) {
                    return Self::new_value(Self::Gradient(g));
                }
            }
            (Self::Gradient(a), Self::None) => {
                if let Some(g) = a.transition(None, property, progress) {
                    return Self::new_value(Self::Gradient(g));
                }
            }
            _ => {}
        }
        Self::new_value(Self::CrossFade {
            progress,
            start: start.clone(),
            end: end_value.clone(),
        })
    }

    /// Draw the image scaled to `width` × `height` at the origin. Built-in
    /// images draw nothing here; they need an icon type.
    pub fn draw(&self, canvas: &mut dyn Canvas2D, width: f64, height: f64) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        match self {
            Self::None | Self::Builtin(_) => {}
            Self::Url { surface, .. } | Self::Recolor { surface, .. } => {
                if let Some(surface) = surface {
                    draw_surface(canvas, surface, width, height);
                }
            }
            Self::Gradient(gradient) => gradient.draw(canvas, width, height),
            Self::CrossFade {
                progress,
                start,
                end,
            } => draw_cross_fade(canvas, *progress, start, end, width, height),
        }
    }

    /// Parse one image.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the input is not an image.
    pub fn parse(parser: &mut ValueParser<'_>) -> Result<StyleValue, ParseError> {
        if parser.try_ident("none") {
            return Ok(StyleValue::none_image());
        }
        if parser.try_ident("builtin") {
            return Ok(Self::new_value(Self::Builtin(None)));
        }
        if parser.try_function("-glaze-gradient") {
            return Ok(Self::new_value(Self::Gradient(Gradient::parse_arguments(parser)?)));
        }
        if parser.try_function("cross-fade") {
            let progress = match parser.next_token() {
                CSSToken::Percentage(value) if (0.0..=100.0).contains(value) => value / 100.0,
                other => {
                    return Err(ParseError::Expected {
                        expected: "a percentage between 0% and 100%".to_string(),
                        found: other.to_string(),
                    });
                }
            };
            parser.expect_comma()?;
            let start = Self::parse(parser)?;
            parser.expect_comma()?;
            let end = Self::parse(parser)?;
            parser.expect_close_paren()?;
            return Ok(Self::new_value(Self::CrossFade {
                progress,
                start,
                end,
            }));
        }
        if parser.try_function("-glaze-recolor") {
            let url = parser.expect_url()?;
            let palette = if parser.try_comma() {
                Some(Palette::parse(parser)?)
            } else {
                None
            };
            parser.expect_close_paren()?;
            return Ok(Self::new_value(Self::Recolor {
                url,
                palette,
                surface: None,
            }));
        }
        if matches!(parser.peek(), CSSToken::Url(_)) || parser.begins_with_function("url") {
            let url = parser.expect_url()?;
            return Ok(Self::new_value(Self::Url { url, surface: None }));
        }
        Err(parser.expected("an image"))
    }
}

fn image_width(value: &StyleValue) -> f64 {
    value.as_image().map_or(0.0, Image::width)
}

fn image_height(value: &StyleValue) -> f64 {
    value.as_image().map_or(0.0, Image::height)
}

/// A side of a cross-fade without a natural size takes the other's.
fn cross_fade_size(progress: f64, start: f64, end: f64) -> f64 {
    match (start > 0.0, end > 0.0) {
        (true, true) => lerp(start, end, progress),
        (true, false) => start,
        (false, true) => end,
        (false, false) => 0.0,
    }
}

fn load(url: &str, ctx: &ComputeContext<'_>) -> Option<Rc<Surface>> {
    let surface = ctx.provider.load_image(url);
    if surface.is_none() {
        warn_once("CSS", &format!("could not load image '{url}'"));
    }
    surface
}

fn recolor(source: &Surface, palette: &StyleValue, foreground: Rgba) -> Surface {
    let color = |name: &str, fallback: u32| {
        palette
            .as_palette()
            .and_then(|p| p.get_color(name))
            .unwrap_or_else(|| Rgba::from_hex(fallback))
    };
    source.recolor(
        foreground,
        color("success", 0x004e_9a06),
        color("warning", 0x00f5_7900),
        color("error", 0x00cc_0000),
    )
}

fn draw_surface(canvas: &mut dyn Canvas2D, surface: &Rc<Surface>, width: f64, height: f64) {
    let (natural_width, natural_height) = surface.logical_size();
    if natural_width <= 0.0 || natural_height <= 0.0 {
        return;
    }
    canvas.save();
    canvas.new_path();
    canvas.rectangle(0.0, 0.0, width, height);
    canvas.clip();
    canvas.scale(width / natural_width, height / natural_height);
    canvas.set_source_surface(surface, 0.0, 0.0);
    canvas.paint();
    canvas.restore();
}

fn draw_cross_fade(
    canvas: &mut dyn Canvas2D,
    progress: f64,
    start: &StyleValue,
    end: &StyleValue,
    width: f64,
    height: f64,
) {
    let (sx, sy) = canvas.device_scale();
    canvas.save();
    canvas.new_path();
    canvas.rectangle(0.0, 0.0, width, height);
    canvas.clip();
    for (value, alpha) in [(start, 1.0 - progress), (end, progress)] {
        let Some(image) = value.as_image() else {
            continue;
        };
        if image.is_none() || alpha <= 0.0 {
            continue;
        }
        let mut layer = Surface::new(
            Format::Argb32,
            (width * sx).ceil() as usize,
            (height * sy).ceil() as usize,
        );
        layer.device_scale = (sx, sy);
        let layer = canvas.render_layer(layer, &mut |c| image.draw(c, width, height));
        canvas.set_source_surface(&Rc::new(layer), 0.0, 0.0);
        canvas.paint_with_alpha(alpha);
    }
    canvas.restore();
}

impl fmt::Display for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Builtin(_) => f.write_str("builtin"),
            Self::Url { url, .. } => write!(f, "url(\"{}\")", escape(url)),
            Self::Gradient(gradient) => gradient.fmt(f),
            Self::CrossFade {
                progress,
                start,
                end,
            } => write!(f, "cross-fade({}%, {start}, {end})", progress * 100.0),
            Self::Recolor { url, palette, .. } => {
                write!(f, "-glaze-recolor(url(\"{}\")", escape(url))?;
                if let Some(palette) = palette {
                    write!(f, ", {palette}")?;
                }
                f.write_str(")")
            }
        }
    }
}

fn escape(url: &str) -> String {
    url.replace('\\', "\\\\").replace('"', "\\\"")
}

impl StyleValue {
    /// The image held by this value.
    #[must_use]
    pub fn as_image(&self) -> Option<&Image> {
        match self.kind() {
            ValueKind::Image(image) => Some(image),
            _ => None,
        }
    }

    /// The palette held by this value.
    #[must_use]
    pub fn as_palette(&self) -> Option<&Palette> {
        match self.kind() {
            ValueKind::Palette(palette) => Some(palette),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_text;

    fn url_image(width: usize, height: usize) -> Image {
        Image::Url {
            url: "test.png".to_string(),
            surface: Some(Rc::new(Surface::new(Format::Argb32, width, height))),
        }
    }

    #[test]
    fn test_parse_and_print() {
        for text in [
            "none",
            "builtin",
            "url(\"icons/check.png\")",
            "cross-fade(25%, url(\"a.png\"), none)",
            "-glaze-recolor(url(\"a.svg\"))",
        ] {
            let value = parse_text(text, Image::parse).unwrap();
            assert_eq!(value.to_string(), text);
        }
    }

    #[test]
    fn test_concrete_size_uses_ratio() {
        let image = url_image(20, 10);
        assert_eq!(image.concrete_size(0.0, 0.0, 100.0, 100.0), (20.0, 10.0));
        assert_eq!(image.concrete_size(40.0, 0.0, 100.0, 100.0), (40.0, 20.0));
        assert_eq!(image.concrete_size(0.0, 5.0, 100.0, 100.0), (10.0, 5.0));
    }

    #[test]
    fn test_concrete_size_without_natural_size() {
        assert_eq!(Image::None.concrete_size(0.0, 0.0, 30.0, 40.0), (30.0, 40.0));
        assert_eq!(Image::None.concrete_size(10.0, 0.0, 30.0, 40.0), (10.0, 40.0));
    }

    #[test]
    fn test_cross_fade_size_falls_back_to_sized_side() {
        let image = Image::CrossFade {
            progress: 0.5,
            start: Image::new_value(url_image(10, 10)),
            end: StyleValue::none_image(),
        };
        assert_eq!(image.width(), 10.0);
    }
}
