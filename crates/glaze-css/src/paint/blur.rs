//! Gaussian blur approximated by three box blurs.
//!
//! [Filter Effects § feGaussianBlur](https://www.w3.org/TR/filter-effects-1/#feGaussianBlurElement)
//!
//! "If d is odd, use three box-blurs of size 'd', centered on the output
//! pixel. If d is even, two box-blurs of size 'd' (the first one centered on
//! the pixel boundary between the output pixel and the one to the left, the
//! second one centered on the pixel boundary between the output pixel and
//! the one to the right) and one box blur of size 'd+1' centered on the
//! output pixel."

use bitflags::bitflags;

use super::surface::{Format, Surface};

/// `3 * sqrt(2π) / 4`, the ratio between a Gaussian's standard deviation
/// and the equivalent box filter size.
pub const GAUSSIAN_SCALE_FACTOR: f64 = 1.879_856_248_221_980_3;

bitflags! {
    /// Which directions to blur.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BlurFlags: u8 {
        /// Blur horizontally.
        const X = 1 << 0;
        /// Blur vertically.
        const Y = 1 << 1;
        /// The blurred surface is a one pixel strip meant to be tiled.
        const REPEAT = 1 << 2;
    }
}

/// How far, in pixels, a blur of `radius` spreads past the edge of a shape.
#[must_use]
pub fn compute_pixels(radius: f64) -> i32 {
    (radius * GAUSSIAN_SCALE_FACTOR * 1.5 + 0.5).floor() as i32
}

fn box_filter_size(radius: i32) -> usize {
    (GAUSSIAN_SCALE_FACTOR * f64::from(radius)) as usize
}

/// Blur the alpha mask `surface` in place. `radius` is in device pixels;
/// radii of one pixel or less leave the surface unchanged, and so do
/// surfaces that are not [`Format::A8`].
pub fn blur_surface(surface: &mut Surface, radius: f64, flags: BlurFlags) {
    let radius = radius as i32;
    if surface.format() != Format::A8 || radius <= 1 || !flags.intersects(BlurFlags::X | BlurFlags::Y) {
        return;
    }
    let d = box_filter_size(radius);
    if d < 2 {
        return;
    }

    let (width, height) = (surface.width(), surface.height());
    let plane = surface.data_mut();
    let mut scratch = vec![0u8; width.max(height)];
    let mut line = vec![0u8; width.max(height)];

    if flags.contains(BlurFlags::Y) {
        for x in 0..width {
            for (y, slot) in line[..height].iter_mut().enumerate() {
                *slot = plane[y * width + x];
            }
            blur_line(&mut line[..height], &mut scratch[..height], d);
            for (y, value) in line[..height].iter().enumerate() {
                plane[y * width + x] = *value;
            }
        }
    }
    if flags.contains(BlurFlags::X) && width > 0 {
        for row in plane.chunks_exact_mut(width) {
            blur_line(row, &mut scratch[..width], d);
        }
    }
}

/// Three box passes over one line, leaving the result in `line`.
fn blur_line(line: &mut [u8], scratch: &mut [u8], d: usize) {
    let offset = d / 2;
    if d % 2 == 1 {
        box_pass(line, scratch, d, offset);
        box_pass(scratch, line, d, offset);
        box_pass(line, scratch, d, offset);
    } else {
        box_pass(line, scratch, d, offset);
        box_pass(scratch, line, d, offset - 1);
        box_pass(line, scratch, d + 1, offset);
    }
    line.copy_from_slice(scratch);
}

/// `dst[j]` becomes the mean of the `d` source pixels ending at
/// `j + offset`. Pixels outside the line count as zero.
fn box_pass(src: &[u8], dst: &mut [u8], d: usize, offset: usize) {
    let len = src.len() as isize;
    let (d, offset) = (d as isize, offset as isize);
    let mut sum: isize = 0;
    for i in (offset - d)..(len + offset) {
        if (0..len).contains(&i) {
            sum += isize::from(src[i as usize]);
        }
        if i >= offset {
            let leaving = i - d;
            if (0..len).contains(&leaving) {
                sum -= isize::from(src[leaving as usize]);
            }
            dst[(i - offset) as usize] = ((sum + d / 2) / d) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(format: Format) -> Surface {
        let mut surface = Surface::new(format, 21, 21);
        let stride = surface.width() * format.bytes_per_pixel();
        let center = 10 * stride + 10 * format.bytes_per_pixel();
        for b in &mut surface.data_mut()[center..center + format.bytes_per_pixel()] {
            *b = 255;
        }
        surface
    }

    #[test]
    fn test_blur_spreads_alpha() {
        let mut mask = dot(Format::A8);
        blur_surface(&mut mask, 3.0, BlurFlags::X | BlurFlags::Y);
        let center = mask.alpha_at(10, 10);
        assert!(center > 0 && center < 255);
        assert!(mask.alpha_at(12, 10) > 0);
        assert!(mask.alpha_at(10, 12) > 0);
        assert_eq!(mask.alpha_at(0, 0), 0);
    }

    #[test]
    fn test_single_direction_stays_on_its_axis() {
        let mut mask = dot(Format::A8);
        blur_surface(&mut mask, 3.0, BlurFlags::X);
        assert!(mask.alpha_at(12, 10) > 0);
        assert_eq!(mask.alpha_at(10, 12), 0);
    }

    #[test]
    fn test_small_radius_and_color_surfaces_are_untouched() {
        let mut mask = dot(Format::A8);
        blur_surface(&mut mask, 1.0, BlurFlags::X | BlurFlags::Y);
        assert_eq!(mask.data(), dot(Format::A8).data());

        let mut color = dot(Format::Argb32);
        blur_surface(&mut color, 3.0, BlurFlags::X | BlurFlags::Y);
        assert_eq!(color.data(), dot(Format::Argb32).data());
    }
}
