//! In-memory raster surfaces.
//!
//! Surfaces hold either an alpha-only mask (`A8`) or premultiplied color
//! (`Argb32`, stored as R, G, B, A bytes per pixel). Like the canvas model,
//! a surface carries a device offset and scale: surface user point `p`
//! lies on pixel `p * scale + offset`.

use crate::values::Rgba;

/// Pixel layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// One alpha byte per pixel.
    A8,
    /// Four premultiplied bytes per pixel: red, green, blue, alpha.
    Argb32,
}

impl Format {
    /// Bytes per pixel.
    #[must_use]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::A8 => 1,
            Self::Argb32 => 4,
        }
    }
}

/// A raster image.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    format: Format,
    width: usize,
    height: usize,
    data: Vec<u8>,
    /// Pixel position of the surface user origin.
    pub device_offset: (f64, f64),
    /// Pixels per surface user unit.
    pub device_scale: (f64, f64),
}

impl Surface {
    /// A fully transparent surface.
    #[must_use]
    pub fn new(format: Format, width: usize, height: usize) -> Self {
        Self {
            format,
            width,
            height,
            data: vec![0; width * height * format.bytes_per_pixel()],
            device_offset: (0.0, 0.0),
            device_scale: (1.0, 1.0),
        }
    }

    /// Wrap premultiplied RGBA bytes. Returns `None` if the buffer length
    /// does not match.
    #[must_use]
    pub fn from_premultiplied(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        (data.len() == width * height * 4).then_some(Self {
            format: Format::Argb32,
            width,
            height,
            data,
            device_offset: (0.0, 0.0),
            device_scale: (1.0, 1.0),
        })
    }

    /// Convert straight (non-premultiplied) RGBA bytes.
    #[must_use]
    pub fn from_straight_rgba(width: usize, height: usize, rgba: &[u8]) -> Option<Self> {
        if rgba.len() != width * height * 4 {
            return None;
        }
        let data = rgba
            .chunks_exact(4)
            .flat_map(|p| {
                let a = u32::from(p[3]);
                let mul = |c: u8| ((u32::from(c) * a + 127) / 255) as u8;
                [mul(p[0]), mul(p[1]), mul(p[2]), p[3]]
            })
            .collect();
        Self::from_premultiplied(width, height, data)
    }

    /// Pixel layout.
    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Bytes per row.
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.width * self.format.bytes_per_pixel()
    }

    /// Raw pixel bytes, row major.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw pixel bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Size in surface user units.
    #[must_use]
    pub fn logical_size(&self) -> (f64, f64) {
        (
            self.width as f64 / self.device_scale.0,
            self.height as f64 / self.device_scale.1,
        )
    }

    /// Alpha of one pixel; 0 outside the surface.
    #[must_use]
    pub fn alpha_at(&self, x: usize, y: usize) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        match self.format {
            Format::A8 => self.data[y * self.width + x],
            Format::Argb32 => self.data[(y * self.width + x) * 4 + 3],
        }
    }

    /// Premultiplied RGBA of one pixel. A8 surfaces read as black.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0; 4];
        }
        match self.format {
            Format::A8 => [0, 0, 0, self.data[y * self.width + x]],
            Format::Argb32 => {
                let i = (y * self.width + x) * 4;
                [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
            }
        }
    }

    /// An empty A8 surface with this surface's device scale. `width` and
    /// `height` are in pixels.
    #[must_use]
    pub fn create_similar_a8(&self, width: usize, height: usize) -> Self {
        let mut surface = Self::new(Format::A8, width, height);
        surface.device_scale = self.device_scale;
        surface
    }

    /// A copy of the region `x, y, width, height` given in surface user
    /// units. The copy's user origin is the region's top left corner.
    #[must_use]
    pub fn create_for_rectangle(&self, x: f64, y: f64, width: f64, height: f64) -> Self {
        let (sx, sy) = self.device_scale;
        let px = ((x * sx + self.device_offset.0).round().max(0.0) as usize).min(self.width);
        let py = ((y * sy + self.device_offset.1).round().max(0.0) as usize).min(self.height);
        let pw = ((width * sx).round().max(0.0) as usize).min(self.width - px);
        let ph = ((height * sy).round().max(0.0) as usize).min(self.height - py);

        let bpp = self.format.bytes_per_pixel();
        let mut data = Vec::with_capacity(pw * ph * bpp);
        for row in py..py + ph {
            let start = (row * self.width + px) * bpp;
            data.extend_from_slice(&self.data[start..start + pw * bpp]);
        }
        Self {
            format: self.format,
            width: pw,
            height: ph,
            data,
            device_offset: (0.0, 0.0),
            device_scale: self.device_scale,
        }
    }

    /// Half the opacity of every pixel.
    #[must_use]
    pub fn dim(&self) -> Self {
        let mut out = self.clone();
        for byte in &mut out.data {
            *byte = ((u32::from(*byte) + 1) / 2) as u8;
        }
        out
    }

    /// Brighten with a 10% gray color dodge, masked by the surface's own
    /// alpha so transparent areas stay transparent.
    #[must_use]
    pub fn highlight(&self) -> Self {
        const GRAY: f64 = 0.1;
        let mut out = self.clone();
        if self.format == Format::A8 {
            return out;
        }
        for px in out.data.chunks_exact_mut(4) {
            let alpha = f64::from(px[3]) / 255.0;
            if alpha == 0.0 {
                continue;
            }
            for c in &mut px[..3] {
                let premul = f64::from(*c) / 255.0;
                let straight = premul / alpha;
                let dodged = (straight / (1.0 - GRAY)).min(1.0);
                // Source is the gray masked by alpha; blend per the
                // separable compositing formula.
                let blended = alpha * ((1.0 - alpha) * GRAY + alpha * dodged);
                let result = (1.0 - alpha) * premul + blended;
                *c = (result.min(alpha) * 255.0).round() as u8;
            }
        }
        out
    }

    /// Recolor a symbolic image. Each pixel's red, green and blue channels
    /// weigh how far it moves from `fg` towards `success`, `warning` and
    /// `error` respectively; alpha is scaled by `fg`'s alpha.
    #[must_use]
    pub fn recolor(&self, fg: Rgba, success: Rgba, warning: Rgba, error: Rgba) -> Self {
        let mut out = self.clone();
        if self.format == Format::A8 {
            return out;
        }
        for px in out.data.chunks_exact_mut(4) {
            let a = f64::from(px[3]) / 255.0;
            if a == 0.0 {
                continue;
            }
            let [r, g, b] = [px[0], px[1], px[2]].map(|c| f64::from(c) / 255.0 / a);
            let mix = |f: f64, s: f64, w: f64, e: f64| {
                (f + r * (s - f) + g * (w - f) + b * (e - f)).clamp(0.0, 1.0)
            };
            let alpha = a * fg.alpha;
            let channels = [
                mix(fg.red, success.red, warning.red, error.red),
                mix(fg.green, success.green, warning.green, error.green),
                mix(fg.blue, success.blue, warning.blue, error.blue),
            ];
            for (dst, c) in px.iter_mut().zip(channels) {
                *dst = (c * alpha * 255.0).round() as u8;
            }
            px[3] = (alpha * 255.0).round() as u8;
        }
        out
    }
}
