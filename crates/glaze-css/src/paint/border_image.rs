//! Border images.
//!
//! [CSS Backgrounds § 6](https://www.w3.org/TR/css-backgrounds-3/#border-images)
//!
//! "The image is sliced into nine regions: four corners, four edges and a
//! middle." Corners are scaled into the border corners; edges are
//! stretched, repeated, rounded or spaced along their side.

use std::rc::Rc;

use crate::geometry::{Matrix, Side};
use crate::style::{ComputedStyle, PropertyId};
use crate::values::{BorderQuad, Image, Repeat, RepeatStyle, StyleValue, Unit};

use super::{Canvas2D, Extend, Format, Pattern, Surface};

/// Offset and length of one row or column of the nine-slice grid.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct SliceSize {
    offset: f64,
    size: f64,
}

/// The border image of a style, if one is set.
#[must_use]
pub fn border_image_source(style: &ComputedStyle) -> Option<&Image> {
    style
        .image(PropertyId::BorderImageSource)
        .filter(|image| !image.is_none())
}

/// Split `surface_size` into start, middle and end slices.
///
/// [§ 6.2](https://www.w3.org/TR/css-backgrounds-3/#border-image-slice)
/// "If the sum of the right and left widths is equal to or greater than
/// the width of the image, the images for the top and bottom edge and the
/// middle part are empty."
fn compute_slice_size(surface_size: f64, start: f64, end: f64) -> [SliceSize; 3] {
    let first = start.min(surface_size).max(0.0);
    let last = end.min(surface_size).max(0.0);
    [
        SliceSize {
            offset: 0.0,
            size: first,
        },
        SliceSize {
            offset: first,
            size: (surface_size - first - last).max(0.0),
        },
        SliceSize {
            offset: surface_size - last,
            size: last,
        },
    ]
}

/// Resolve one `border-image-width` entry. Plain numbers multiply the
/// border width; anything else is a length or a percentage of the area.
fn border_image_width(value: &StyleValue, border_width: f64, area_size: f64) -> f64 {
    if value.as_dimension().is_some_and(|d| d.unit == Unit::Number) {
        border_width * value.number_value(100.0)
    } else {
        value.number_value(area_size)
    }
}

/// Split the destination area into start border, middle and end border.
///
/// [§ 6.3](https://www.w3.org/TR/css-backgrounds-3/#border-image-width)
/// "If two opposite border-image-width offsets are large enough that they
/// overlap, the used values of all border-image-width offsets are
/// proportionally reduced until they no longer overlap."
fn compute_border_size(offset: f64, area_size: f64, start: f64, end: f64) -> [SliceSize; 3] {
    let (mut start, mut end) = (start.max(0.0), end.max(0.0));
    let total = start + end;
    if total > area_size && total > 0.0 {
        start = start * area_size / total;
        end = end * area_size / total;
    }
    [
        SliceSize { offset, size: start },
        SliceSize {
            offset: offset + start,
            size: area_size - start - end,
        },
        SliceSize {
            offset: offset + area_size - end,
            size: end,
        },
    ]
}

/// Paint one slice of `slice_width` × `slice_height` into the cell at
/// `x, y` of `width` × `height`.
#[allow(clippy::too_many_arguments)]
fn render_slice(
    canvas: &mut dyn Canvas2D,
    slice: &Rc<Surface>,
    slice_width: f64,
    slice_height: f64,
    mut x: f64,
    mut y: f64,
    mut width: f64,
    mut height: f64,
    hrepeat: RepeatStyle,
    vrepeat: RepeatStyle,
) {
    let mut hscale = width / slice_width;
    let mut vscale = height / slice_height;
    let mut xstep = width;
    let mut ystep = height;
    let mut extend = Extend::Pad;

    match hrepeat {
        RepeatStyle::Repeat => {
            extend = Extend::Repeat;
            hscale = vscale;
        }
        RepeatStyle::Space => {
            extend = Extend::None;
            hscale = vscale;
            xstep = hscale * slice_width;
            let n = (width / xstep).floor();
            let space = (width - n * xstep) / (n + 1.0);
            xstep += space;
            x += space;
            width -= 2.0 * space;
        }
        RepeatStyle::Round => {
            extend = Extend::Repeat;
            hscale = width / (slice_width * (width / (slice_width * vscale)).round().max(1.0));
        }
        RepeatStyle::Stretch | RepeatStyle::NoRepeat => {}
    }

    match vrepeat {
        RepeatStyle::Repeat => {
            extend = Extend::Repeat;
            vscale = hscale;
        }
        RepeatStyle::Space => {
            extend = Extend::None;
            vscale = hscale;
            ystep = vscale * slice_height;
            let n = (height / ystep).floor();
            let space = (height - n * ystep) / (n + 1.0);
            ystep += space;
            y += space;
            height -= 2.0 * space;
        }
        RepeatStyle::Round => {
            extend = Extend::Repeat;
            vscale = height / (slice_height * (height / (slice_height * hscale)).round().max(1.0));
        }
        RepeatStyle::Stretch | RepeatStyle::NoRepeat => {}
    }

    if !(xstep > 0.0 && ystep > 0.0 && hscale > 0.0 && vscale > 0.0) {
        return;
    }

    // Repeated tiles are centered on the middle of the cell.
    let centered = |repeat: RepeatStyle, half: f64| if repeat == RepeatStyle::Repeat { half } else { 0.0 };
    let matrix = Matrix::translation(
        centered(hrepeat, slice_width / 2.0),
        centered(vrepeat, slice_height / 2.0),
    )
    .pre_scale(1.0 / hscale, 1.0 / vscale)
    .pre_translate(-centered(hrepeat, width / 2.0), -centered(vrepeat, height / 2.0));
    let pattern = Pattern::surface(Rc::clone(slice), 0.0, 0.0)
        .with_matrix(matrix)
        .with_extend(extend);

    canvas.save();
    canvas.translate(x, y);
    let mut ty = 0.0;
    while ty < height {
        let mut tx = 0.0;
        while tx < width {
            canvas.save();
            canvas.translate(tx, ty);
            canvas.set_source(pattern.clone());
            canvas.rectangle(0.0, 0.0, xstep, ystep);
            canvas.fill();
            canvas.restore();
            tx += xstep;
        }
        ty += ystep;
    }
    canvas.restore();
}

/// Draw `image` scaled to `width` × `height` into a new surface matching
/// the canvas's device scale.
fn rasterize(canvas: &mut dyn Canvas2D, image: &Image, width: f64, height: f64) -> Surface {
    let (scale_x, scale_y) = canvas.device_scale();
    let mut surface = Surface::new(
        Format::Argb32,
        (width * scale_x).ceil().max(0.0) as usize,
        (height * scale_y).ceil().max(0.0) as usize,
    );
    surface.device_scale = (scale_x, scale_y);
    canvas.render_layer(surface, &mut |c: &mut dyn Canvas2D| image.draw(c, width, height))
}

/// Paint the border image of `style` over the border box `x, y, width,
/// height`. Returns `false`, painting nothing, when no border image is
/// set.
pub fn paint_border_image(
    style: &ComputedStyle,
    border_width: [f64; 4],
    canvas: &mut dyn Canvas2D,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> bool {
    let Some(source) = border_image_source(style) else {
        return false;
    };
    let (Some(slice), Some(widths)) = (
        style.get(PropertyId::BorderImageSlice).as_border_quad(),
        style.get(PropertyId::BorderImageWidth).as_border_quad(),
    ) else {
        return false;
    };
    let repeat = style
        .get(PropertyId::BorderImageRepeat)
        .as_repeat()
        .unwrap_or(Repeat {
            x: RepeatStyle::Stretch,
            y: RepeatStyle::Stretch,
        });

    let (source_width, source_height) = source.concrete_size(0.0, 0.0, width, height);
    if source_width <= 0.0 || source_height <= 0.0 {
        return true;
    }
    let surface = rasterize(canvas, source, source_width, source_height);

    let horizontal_slice = compute_slice_size(
        source_width,
        slice.side(Side::Left).number_value(source_width),
        slice.side(Side::Right).number_value(source_width),
    );
    let vertical_slice = compute_slice_size(
        source_height,
        slice.side(Side::Top).number_value(source_height),
        slice.side(Side::Bottom).number_value(source_height),
    );
    let quad_width = |quad: &BorderQuad, side: Side, area: f64| {
        border_image_width(quad.side(side), border_width[side as usize], area)
    };
    let horizontal_border = compute_border_size(
        x,
        width,
        quad_width(widths, Side::Left, width),
        quad_width(widths, Side::Right, width),
    );
    let vertical_border = compute_border_size(
        y,
        height,
        quad_width(widths, Side::Top, height),
        quad_width(widths, Side::Bottom, height),
    );

    for v in 0..3 {
        if vertical_slice[v].size <= 0.0 || vertical_border[v].size <= 0.0 {
            continue;
        }
        for h in 0..3 {
            if horizontal_slice[h].size <= 0.0 || horizontal_border[h].size <= 0.0 {
                continue;
            }
            if h == 1 && v == 1 {
                continue;
            }
            let piece = Rc::new(surface.create_for_rectangle(
                horizontal_slice[h].offset,
                vertical_slice[v].offset,
                horizontal_slice[h].size,
                vertical_slice[v].size,
            ));
            render_slice(
                canvas,
                &piece,
                horizontal_slice[h].size,
                vertical_slice[v].size,
                horizontal_border[h].offset,
                vertical_border[v].offset,
                horizontal_border[h].size,
                vertical_border[v].size,
                if h == 1 { repeat.x } else { RepeatStyle::Stretch },
                if v == 1 { repeat.y } else { RepeatStyle::Stretch },
            );
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::{CanvasCommand, RecordingCanvas};

    #[test]
    fn test_slice_sizes_clamp_to_source() {
        let sizes = compute_slice_size(30.0, 10.0, 25.0);
        assert_eq!(sizes[0], SliceSize { offset: 0.0, size: 10.0 });
        assert_eq!(sizes[1], SliceSize { offset: 10.0, size: 0.0 });
        assert_eq!(sizes[2], SliceSize { offset: 5.0, size: 25.0 });
    }

    #[test]
    fn test_overlapping_border_widths_scale_down() {
        let sizes = compute_border_size(0.0, 10.0, 10.0, 10.0);
        assert_eq!(sizes[0].size, 5.0);
        assert_eq!(sizes[2].offset, 5.0);
        assert_eq!(sizes[2].size, 5.0);
        assert_eq!(sizes[1].size, 0.0);
    }

    #[test]
    fn test_number_widths_multiply_border_width() {
        assert_eq!(border_image_width(&StyleValue::number(2.0), 3.0, 100.0), 6.0);
        assert_eq!(
            border_image_width(&StyleValue::dimension(10.0, Unit::Percent), 3.0, 50.0),
            5.0
        );
        assert_eq!(border_image_width(&StyleValue::px(4.0), 3.0, 50.0), 4.0);
    }

    #[test]
    fn test_round_fits_whole_tiles() {
        let slice = Rc::new(Surface::new(Format::Argb32, 10, 10));
        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        render_slice(
            &mut canvas,
            &slice,
            10.0,
            10.0,
            0.0,
            0.0,
            24.0,
            10.0,
            RepeatStyle::Round,
            RepeatStyle::Stretch,
        );
        let sources: Vec<_> = canvas
            .commands()
            .iter()
            .filter_map(|c| match c {
                CanvasCommand::SetSource(p) => Some(p),
                _ => None,
            })
            .collect();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].extend, Extend::Repeat);
        // 24px holds 2.4 tiles, rounded to two of 12px.
        assert!((sources[0].matrix.xx - 10.0 / 12.0).abs() < 1e-9);
    }

    #[test]
    fn test_space_spreads_leftover() {
        let slice = Rc::new(Surface::new(Format::Argb32, 10, 10));
        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        render_slice(
            &mut canvas,
            &slice,
            10.0,
            10.0,
            0.0,
            0.0,
            35.0,
            10.0,
            RepeatStyle::Space,
            RepeatStyle::Stretch,
        );
        assert_eq!(canvas.draw_count(), 3);
    }
}
