//! Painting box, text and icon shadows.
//!
//! Unblurred shadows are a single even-odd fill. Blurred shadows render the
//! shape into an A8 layer, blur it and use it as a mask for the shadow
//! color. Box shadows are split into nine pieces so that only the edges go
//! through the blur: corners come from a cache of pre-blurred masks, sides
//! blur a one pixel strip that is then tiled, and the interior is a plain
//! fill.

use std::collections::HashMap;
use std::rc::Rc;

use crate::geometry::{CornerPos, IntRect, Matrix, RoundedBox, Side};
use crate::values::shadow::ShadowParams;
use crate::values::{Shadow, ShadowList};

use super::blur::{BlurFlags, blur_surface, compute_pixels};
use super::region::Region;
use super::text::TextLayout;
use super::{Canvas2D, Extend, FillRule, Format, Pattern, Surface};

/// Upper bound on cached corner masks.
pub const CORNER_MASK_CACHE_MAX_SIZE: usize = 2000;

/// Identifies a blurred corner mask. Every field is the source value times
/// ten, rounded, so nearly equal corners share a mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CornerMaskKey {
    /// Blur radius.
    pub radius: i32,
    /// Horizontal corner radius.
    pub horizontal: i32,
    /// Vertical corner radius.
    pub vertical: i32,
}

impl CornerMaskKey {
    fn new(radius: f64, horizontal: f64, vertical: f64) -> Self {
        Self {
            radius: quantize(radius),
            horizontal: quantize(horizontal),
            vertical: quantize(vertical),
        }
    }
}

fn quantize(value: f64) -> i32 {
    (value * 10.0).round() as i32
}

/// Blurred masks for the top left corner of outset shadows, reflected into
/// place for the other corners.
#[derive(Debug, Default)]
pub struct CornerMaskCache {
    masks: HashMap<CornerMaskKey, Rc<Surface>>,
}

impl CornerMaskCache {
    /// An empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached masks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.masks.len()
    }

    /// Whether no masks are cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    /// The cached mask for `key`.
    #[must_use]
    pub fn get(&self, key: &CornerMaskKey) -> Option<Rc<Surface>> {
        self.masks.get(key).cloned()
    }

    /// Store a mask. A full cache first drops every fourth entry in
    /// iteration order; masks are cheap to rebuild.
    pub fn insert(&mut self, key: CornerMaskKey, mask: Rc<Surface>) {
        if self.masks.len() >= CORNER_MASK_CACHE_MAX_SIZE {
            let mut index = 0usize;
            self.masks.retain(|_, _| {
                let keep = index % 4 != 0;
                index += 1;
                keep
            });
        }
        let _ = self.masks.insert(key, mask);
    }

    /// Drop every mask.
    pub fn clear(&mut self) {
        self.masks.clear();
    }
}

/// Radii of one pixel or less would use a box filter of size one.
fn needs_blur(p: &ShadowParams) -> bool {
    p.radius > 1.0
}

fn has_empty_clip(canvas: &dyn Canvas2D) -> bool {
    let (x1, y1, x2, y2) = canvas.clip_extents();
    x2 <= x1 || y2 <= y1
}

/// Run `draw` and paint its coverage with the shadow color, blurred along
/// the axes in `flags`. With no blur axis, `draw` targets `canvas`
/// directly and is expected to fill with the current source.
fn draw_blurred(
    canvas: &mut dyn Canvas2D,
    p: &ShadowParams,
    flags: BlurFlags,
    draw: &mut dyn FnMut(&mut dyn Canvas2D),
) {
    if !flags.intersects(BlurFlags::X | BlurFlags::Y) || !needs_blur(p) {
        draw(canvas);
        return;
    }

    let blur_x = flags.contains(BlurFlags::X);
    let blur_y = flags.contains(BlurFlags::Y);
    let (x1, y1, x2, y2) = canvas.clip_extents();
    let mut clip = IntRect::covering(x1, y1, x2, y2);
    if flags.contains(BlurFlags::REPEAT) {
        if !blur_x {
            clip.width = 1;
        }
        if !blur_y {
            clip.height = 1;
        }
    }

    let clip_radius = f64::from(compute_pixels(p.radius));
    let pad_x = if blur_x { clip_radius } else { 0.0 };
    let pad_y = if blur_y { clip_radius } else { 0.0 };
    let (scale_x, scale_y) = canvas.device_scale();

    let width = (scale_x * (f64::from(clip.width) + 2.0 * pad_x)).max(0.0) as usize;
    let height = (scale_y * (f64::from(clip.height) + 2.0 * pad_y)).max(0.0) as usize;
    let mut layer = Surface::new(Format::A8, width, height);
    layer.device_scale = (scale_x, scale_y);
    layer.device_offset = (
        scale_x * (pad_x - f64::from(clip.x)),
        scale_y * (pad_y - f64::from(clip.y)),
    );

    let mut layer = canvas.render_layer(layer, draw);
    blur_surface(&mut layer, scale_x * p.radius, flags);

    canvas.set_source_rgba(p.color);
    let mut mask = Pattern::surface(Rc::new(layer), 0.0, 0.0);
    if flags.contains(BlurFlags::REPEAT) {
        mask = mask.with_extend(Extend::Repeat);
    }
    canvas.mask(&mask);
}

/// Fill `shape`, minus `clip_box` for inset shadows, with the shadow.
fn draw_shadow(
    canvas: &mut dyn Canvas2D,
    p: &ShadowParams,
    shape: &RoundedBox,
    clip_box: &RoundedBox,
    flags: BlurFlags,
) {
    if has_empty_clip(canvas) {
        return;
    }
    canvas.set_source_rgba(p.color);
    draw_blurred(canvas, p, flags, &mut |c: &mut dyn Canvas2D| {
        c.set_fill_rule(FillRule::EvenOdd);
        shape.path(c);
        if p.inset {
            clip_box.clip_path(c);
        }
        c.fill();
    });
}

/// Paint one blurred corner and return the rectangle it covers.
fn draw_shadow_corner(
    canvas: &mut dyn Canvas2D,
    p: &ShadowParams,
    shape: &RoundedBox,
    clip_box: &RoundedBox,
    pos: CornerPos,
    cache: &mut CornerMaskCache,
) -> IntRect {
    let clip_radius = f64::from(compute_pixels(p.radius));
    let r = &shape.rect;
    let corner = shape.corner(pos);
    let radius_of = |c: CornerPos| shape.corner(c);

    let (x1, x2, x, sx, overlapped_x) = match pos {
        CornerPos::TopLeft | CornerPos::BottomLeft => {
            let x1 = (r.x - clip_radius).floor();
            let x2 = (r.x + corner.horizontal + clip_radius).ceil();
            let max_other = radius_of(CornerPos::TopRight)
                .horizontal
                .max(radius_of(CornerPos::BottomRight).horizontal);
            let x3 = (r.right() - max_other - clip_radius).floor();
            (x1, x2, x1, 1.0, x2 > x3)
        }
        CornerPos::TopRight | CornerPos::BottomRight => {
            let x1 = (r.right() - corner.horizontal - clip_radius).floor();
            let x2 = (r.right() + clip_radius).ceil();
            let max_other = radius_of(CornerPos::TopLeft)
                .horizontal
                .max(radius_of(CornerPos::BottomLeft).horizontal);
            let x3 = (r.x + max_other + clip_radius).ceil();
            (x1, x2, x2, -1.0, x3 > x1)
        }
    };
    let (y1, y2, y, sy, overlapped_y) = match pos {
        CornerPos::TopLeft | CornerPos::TopRight => {
            let y1 = (r.y - clip_radius).floor();
            let y2 = (r.y + corner.vertical + clip_radius).ceil();
            let max_other = radius_of(CornerPos::BottomLeft)
                .vertical
                .max(radius_of(CornerPos::BottomRight).vertical);
            let y3 = (r.bottom() - max_other - clip_radius).floor();
            (y1, y2, y1, 1.0, y2 > y3)
        }
        CornerPos::BottomRight | CornerPos::BottomLeft => {
            let y1 = (r.bottom() - corner.vertical - clip_radius).floor();
            let y2 = (r.bottom() + clip_radius).ceil();
            let max_other = radius_of(CornerPos::TopLeft)
                .vertical
                .max(radius_of(CornerPos::TopRight).vertical);
            let y3 = (r.y + max_other + clip_radius).ceil();
            (y1, y2, y2, -1.0, y3 > y1)
        }
    };

    let drawn = IntRect::new(x1 as i32, y1 as i32, (x2 - x1) as i32, (y2 - y1) as i32);
    canvas.rectangle(x1, y1, x2 - x1, y2 - y1);
    canvas.clip();

    if p.inset || overlapped_x || overlapped_y {
        // The corner arcs run into each other; blur the whole shape.
        draw_shadow(canvas, p, shape, clip_box, BlurFlags::X | BlurFlags::Y);
        return drawn;
    }
    if has_empty_clip(canvas) {
        return drawn;
    }

    let key = CornerMaskKey::new(p.radius, corner.horizontal, corner.vertical);
    let mask = if let Some(mask) = cache.get(&key) {
        mask
    } else {
        let width = (f64::from(drawn.width) + clip_radius) as usize;
        let height = (f64::from(drawn.height) + clip_radius) as usize;
        let mut corner_box = RoundedBox::init_rect(
            clip_radius,
            clip_radius,
            2.0 * f64::from(drawn.width),
            2.0 * f64::from(drawn.height),
        );
        corner_box.corner[CornerPos::TopLeft as usize] = corner;
        let mut mask = canvas.render_layer(
            Surface::new(Format::A8, width, height),
            &mut |c: &mut dyn Canvas2D| {
                corner_box.path(c);
                c.fill();
            },
        );
        blur_surface(&mut mask, p.radius, BlurFlags::X | BlurFlags::Y);
        let mask = Rc::new(mask);
        cache.insert(key, Rc::clone(&mask));
        mask
    };

    canvas.set_source_rgba(p.color);
    let pattern = Pattern::surface(mask, 0.0, 0.0)
        .with_matrix(Matrix::scaling(sx, sy).pre_translate(-x, -y));
    canvas.mask(&pattern);
    drawn
}

/// Paint the strip along one side by blurring a single row or column and
/// tiling it.
fn draw_shadow_side(
    canvas: &mut dyn Canvas2D,
    p: &ShadowParams,
    shape: &RoundedBox,
    clip_box: &RoundedBox,
    side: Side,
) -> IntRect {
    let clip_radius = f64::from(compute_pixels(p.radius));
    let r = &shape.rect;
    let mut flags = BlurFlags::REPEAT;

    let (x1, x2) = match side {
        Side::Top | Side::Bottom => {
            flags |= BlurFlags::Y;
            (r.x - clip_radius, r.right() + clip_radius)
        }
        Side::Left => (r.x - clip_radius, r.x + clip_radius),
        Side::Right => (r.right() - clip_radius, r.right() + clip_radius),
    };
    let (y1, y2) = match side {
        Side::Left | Side::Right => {
            flags |= BlurFlags::X;
            (r.y - clip_radius, r.bottom() + clip_radius)
        }
        Side::Top => (r.y - clip_radius, r.y + clip_radius),
        Side::Bottom => (r.bottom() - clip_radius, r.bottom() + clip_radius),
    };
    let drawn = IntRect::covering(x1, y1, x2, y2);

    canvas.rectangle(
        f64::from(drawn.x),
        f64::from(drawn.y),
        f64::from(drawn.width),
        f64::from(drawn.height),
    );
    canvas.clip();
    draw_shadow(canvas, p, shape, clip_box, flags);
    drawn
}

/// Paint a box shadow around (or, for inset shadows, inside)
/// `padding_box`.
pub fn paint_shadow_box(
    shadow: &Shadow,
    canvas: &mut dyn Canvas2D,
    padding_box: &RoundedBox,
    cache: &mut CornerMaskCache,
) {
    let p = shadow.params();
    if p.color.is_clear() {
        return;
    }

    let (cx1, cy1, cx2, cy2) = canvas.clip_extents();
    if (p.inset && !padding_box.intersects_rectangle(cx1, cy1, cx2, cy2))
        || (!p.inset && padding_box.contains_rectangle(cx1, cy1, cx2, cy2))
    {
        return;
    }

    canvas.save();
    let clip_radius = f64::from(compute_pixels(p.radius));

    canvas.new_path();
    if p.inset {
        padding_box.path(canvas);
        canvas.clip();
    } else {
        canvas.set_fill_rule(FillRule::EvenOdd);
        padding_box.path(canvas);
        let outside = p.spread + clip_radius + p.hoffset.abs().max(p.voffset.abs());
        let mut outer = *padding_box;
        outer.grow(outside, outside, outside, outside);
        outer.clip_path(canvas);
        canvas.clip();
    }

    let mut shape = *padding_box;
    shape.move_by(p.hoffset, p.voffset);
    if p.inset {
        shape.shrink(p.spread, p.spread, p.spread, p.spread);
    } else {
        shape.grow(p.spread, p.spread, p.spread, p.spread);
    }

    let mut clip_box = *padding_box;
    clip_box.grow(clip_radius, clip_radius, clip_radius, clip_radius);

    if needs_blur(&p) {
        let start = if p.inset {
            let r = &clip_box.rect;
            IntRect::covering(r.x, r.y, r.right(), r.bottom())
        } else {
            let r = &shape.rect;
            IntRect::covering(
                r.x - clip_radius,
                r.y - clip_radius,
                r.right() + clip_radius,
                r.bottom() + clip_radius,
            )
        };
        let mut remaining = Region::from_rect(start);

        for pos in CornerPos::ALL {
            canvas.save();
            remaining.clip(canvas);
            let drawn = draw_shadow_corner(canvas, &p, &shape, &clip_box, pos, cache);
            canvas.restore();
            remaining.subtract_rect(drawn);
        }
        for side in Side::ALL {
            canvas.save();
            remaining.clip(canvas);
            let drawn = draw_shadow_side(canvas, &p, &shape, &clip_box, side);
            canvas.restore();
            remaining.subtract_rect(drawn);
        }

        canvas.save();
        remaining.clip(canvas);
        draw_shadow(canvas, &p, &shape, &clip_box, BlurFlags::empty());
        canvas.restore();
    } else {
        draw_shadow(canvas, &p, &shape, &clip_box, BlurFlags::empty());
    }

    canvas.restore();
}

/// Paint every shadow of `shadows` with the given inset flag, bottom one
/// first.
pub fn paint_box_shadows(
    shadows: &ShadowList,
    canvas: &mut dyn Canvas2D,
    padding_box: &RoundedBox,
    inset: bool,
    cache: &mut CornerMaskCache,
) {
    for shadow in shadows.iter().rev().filter(|s| s.inset == inset) {
        paint_shadow_box(shadow, canvas, padding_box, cache);
    }
}

/// Blurred coverage of `layout`, cached on the layout.
fn blurred_layout_mask(
    canvas: &mut dyn Canvas2D,
    layout: &dyn TextLayout,
    p: &ShadowParams,
) -> Rc<Surface> {
    let radius = p.radius as u32;
    let serial = layout.serial();
    if let Some(mask) = layout.shadow_cache().get(radius, serial) {
        return mask;
    }

    let ink = layout.pixel_extents();
    let clip_radius = f64::from(compute_pixels(p.radius));
    let (scale_x, scale_y) = canvas.device_scale();
    let width = (scale_x * (f64::from(ink.width) + 2.0 * clip_radius)).max(0.0) as usize;
    let height = (scale_y * (f64::from(ink.height) + 2.0 * clip_radius)).max(0.0) as usize;
    let mut surface = Surface::new(Format::A8, width, height);
    surface.device_scale = (scale_x, scale_y);
    surface.device_offset = (
        scale_x * (clip_radius - f64::from(ink.x)),
        scale_y * (clip_radius - f64::from(ink.y)),
    );

    let mut surface = canvas.render_layer(surface, &mut |c: &mut dyn Canvas2D| {
        c.move_to(0.0, 0.0);
        layout.stamp_into(c);
    });
    blur_surface(&mut surface, p.radius * scale_x, BlurFlags::X | BlurFlags::Y);

    let mask = Rc::new(surface);
    layout.shadow_cache().insert(radius, serial, Rc::clone(&mask));
    mask
}

/// Paint a text shadow for `layout` positioned at the current point.
pub fn paint_shadow_layout(shadow: &Shadow, canvas: &mut dyn Canvas2D, layout: &dyn TextLayout) {
    let p = shadow.params();
    if p.color.is_clear() {
        return;
    }
    if canvas.current_point().is_none() {
        canvas.move_to(0.0, 0.0);
    }

    canvas.save();
    if needs_blur(&p) {
        let mask = blurred_layout_mask(canvas, layout, &p);
        let (x, y) = canvas.current_point().unwrap_or_default();
        canvas.translate(x, y);
        canvas.translate(p.hoffset, p.voffset);
        canvas.set_source_rgba(p.color);
        canvas.mask_surface(&mask, 0.0, 0.0);
    } else {
        canvas.rel_move_to(p.hoffset, p.voffset);
        canvas.set_source_rgba(p.color);
        layout.stamp_into(canvas);
        canvas.rel_move_to(-p.hoffset, -p.voffset);
    }
    canvas.restore();
}

/// Paint a shadow of whatever the current source is, as used for raster
/// icons: the source's alpha becomes the shadow's shape.
pub fn paint_shadow_icon(shadow: &Shadow, canvas: &mut dyn Canvas2D) {
    let p = shadow.params();
    if p.color.is_clear() {
        return;
    }

    canvas.save();
    let pattern = canvas.source();
    canvas.set_source_rgba(p.color);
    draw_blurred(
        canvas,
        &p,
        BlurFlags::X | BlurFlags::Y,
        &mut |c: &mut dyn Canvas2D| {
            c.translate(p.hoffset, p.voffset);
            c.mask(&pattern);
        },
    );
    canvas.restore();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_rounds_half_away_from_zero() {
        assert_eq!(quantize(0.25), 3);
        assert_eq!(quantize(-0.25), -3);
        assert_eq!(quantize(4.0), 40);
    }

    #[test]
    fn test_cache_evicts_a_quarter_when_full() {
        let mut cache = CornerMaskCache::new();
        let mask = Rc::new(Surface::new(Format::A8, 1, 1));
        for i in 0..CORNER_MASK_CACHE_MAX_SIZE as i32 {
            cache.insert(
                CornerMaskKey {
                    radius: i,
                    horizontal: 0,
                    vertical: 0,
                },
                Rc::clone(&mask),
            );
        }
        assert_eq!(cache.len(), CORNER_MASK_CACHE_MAX_SIZE);
        cache.insert(
            CornerMaskKey {
                radius: -1,
                horizontal: 0,
                vertical: 0,
            },
            mask,
        );
        assert_eq!(cache.len(), CORNER_MASK_CACHE_MAX_SIZE - 500 + 1);
    }
}
