//! Single-line text layout backed by fontdue.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."
//!
//! A [`FontLayout`] rasterizes its glyphs once into an alpha mask. The
//! layout origin is the top left of the line box; glyphs sit on a baseline
//! one ascent below it.

use std::path::Path;
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

use fontdue::{Font, FontSettings};
use glaze_css::geometry::IntRect;
use glaze_css::paint::{Canvas2D, Format, Surface, TextLayout, TextShadowCache};

use crate::loader::LoadError;

/// Common system font paths to search for a default font.
const FONT_SEARCH_PATHS: &[&str] = &[
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/usr/share/fonts/cantarell/Cantarell-Regular.otf",
    // macOS
    "/System/Library/Fonts/Helvetica.ttc",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
];

/// Source of layout serials; every re-layout takes a fresh one.
static NEXT_SERIAL: AtomicU32 = AtomicU32::new(1);

/// Parse a font file.
///
/// # Errors
///
/// Returns [`LoadError::Io`] if the file cannot be read and
/// [`LoadError::Font`] if it is not a font.
pub fn load_font(path: &Path) -> Result<Font, LoadError> {
    let data = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Font::from_bytes(data, FontSettings::default()).map_err(LoadError::Font)
}

/// The first usable font among the usual system locations.
#[must_use]
pub fn system_font() -> Option<Font> {
    FONT_SEARCH_PATHS
        .iter()
        .find_map(|path| load_font(Path::new(path)).ok())
}

/// One line of text at one size.
pub struct FontLayout {
    font: Rc<Font>,
    text: String,
    size: f32,
    serial: u32,
    ascent: f32,
    descent: f32,
    advance: f32,
    ink: IntRect,
    coverage: Rc<Surface>,
    shadows: TextShadowCache,
}

impl FontLayout {
    /// Lay out `text` at `size` pixels.
    #[must_use]
    pub fn new(font: Rc<Font>, text: &str, size: f64) -> Self {
        let mut layout = Self {
            font,
            text: text.to_owned(),
            size: size as f32,
            serial: 0,
            ascent: 0.0,
            descent: 0.0,
            advance: 0.0,
            ink: IntRect::default(),
            coverage: Rc::new(Surface::new(Format::A8, 0, 0)),
            shadows: TextShadowCache::new(),
        };
        layout.relayout();
        layout
    }

    /// The laid out text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text.
    pub fn set_text(&mut self, text: &str) {
        if self.text != text {
            text.clone_into(&mut self.text);
            self.relayout();
        }
    }

    /// Change the pixel size.
    pub fn set_size(&mut self, size: f64) {
        let size = size as f32;
        if self.size != size {
            self.size = size;
            self.relayout();
        }
    }

    /// Width and height of the line box.
    #[must_use]
    pub fn logical_size(&self) -> (f64, f64) {
        (f64::from(self.advance), f64::from(self.ascent - self.descent))
    }

    /// Distance from the layout origin down to the baseline.
    #[must_use]
    pub fn baseline(&self) -> f64 {
        f64::from(self.ascent)
    }

    fn relayout(&mut self) {
        self.serial = NEXT_SERIAL.fetch_add(1, Ordering::Relaxed);
        let (ascent, descent) = self
            .font
            .horizontal_line_metrics(self.size)
            .map_or((self.size * 0.8, -self.size * 0.2), |m| (m.ascent, m.descent));
        self.ascent = ascent;
        self.descent = descent;

        let mut pen = 0.0_f32;
        let mut glyphs = Vec::new();
        let mut ink = IntRect::default();
        for ch in self.text.chars().filter(|ch| !ch.is_control()) {
            let (metrics, bitmap) = self.font.rasterize(ch, self.size);
            let left = pen.round() as i32 + metrics.xmin;
            let top = ascent.round() as i32 - metrics.ymin - metrics.height as i32;
            let rect = IntRect::new(left, top, metrics.width as i32, metrics.height as i32);
            ink = ink.union(&rect);
            glyphs.push((rect, bitmap));
            pen += metrics.advance_width;
        }
        self.advance = pen;
        self.ink = ink;

        let mut coverage = Surface::new(Format::A8, ink.width.max(0) as usize, ink.height.max(0) as usize);
        let stride = coverage.stride();
        let data = coverage.data_mut();
        for (rect, bitmap) in glyphs.iter().filter(|(rect, _)| !rect.is_empty()) {
            let width = rect.width as usize;
            for (row, line) in bitmap.chunks_exact(width).enumerate() {
                let y = (rect.y - ink.y) as usize + row;
                let x = (rect.x - ink.x) as usize;
                for (dst, &src) in data[y * stride + x..].iter_mut().zip(line) {
                    *dst = dst.saturating_add(src);
                }
            }
        }
        self.coverage = Rc::new(coverage);
    }
}

impl TextLayout for FontLayout {
    fn pixel_extents(&self) -> IntRect {
        self.ink
    }

    fn serial(&self) -> u32 {
        self.serial
    }

    fn stamp_into(&self, canvas: &mut dyn Canvas2D) {
        if self.ink.is_empty() {
            return;
        }
        let (x, y) = canvas.current_point().unwrap_or_default();
        canvas.mask_surface(
            &self.coverage,
            x + f64::from(self.ink.x),
            y + f64::from(self.ink.y),
        );
    }

    fn shadow_cache(&self) -> &TextShadowCache {
        &self.shadows
    }
}
