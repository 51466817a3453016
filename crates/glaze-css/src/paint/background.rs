//! Backgrounds.
//!
//! [CSS Backgrounds § 3](https://www.w3.org/TR/css-backgrounds-3/#backgrounds)
//!
//! "The background of an element is the total size of the element,
//! including padding and border (but not margin)."
//!
//! Painting goes back to front: outset box shadows, the background color,
//! the image layers from the last listed to the first, then inset box
//! shadows. Each per-layer property list is cycled to the number of image
//! layers.

use std::rc::Rc;

use crate::geometry::{JunctionSides, RoundedBox};
use crate::style::{ComputedStyle, PropertyId};
use crate::values::enums::{Area, BlendMode};
use crate::values::{BgSize, Image, Position, Repeat, RepeatStyle, StyleValue};

use super::shadow::paint_box_shadows;
use super::{Canvas2D, CornerMaskCache, Extend, Format, Pattern, Surface};

/// The three boxes a layer can be clipped to or positioned in.
struct Boxes {
    border: RoundedBox,
    padding: RoundedBox,
    content: RoundedBox,
}

impl Boxes {
    fn new(style: &ComputedStyle, x: f64, y: f64, width: f64, height: f64, junction: JunctionSides) -> Self {
        let mut border = RoundedBox::init_rect(x, y, width, height);
        border.apply_border_radius_for_style(style, junction);

        let [bt, br, bb, bl] = style.border_widths();
        let mut padding = border;
        padding.shrink(bt, br, bb, bl);

        let [pt, pr, pb, pl] = style.padding();
        let mut content = padding;
        content.shrink(pt, pr, pb, pl);

        Self {
            border,
            padding,
            content,
        }
    }

    const fn get(&self, area: Area) -> &RoundedBox {
        match area {
            Area::BorderBox => &self.border,
            Area::PaddingBox => &self.padding,
            Area::ContentBox => &self.content,
        }
    }
}

/// Entry `index` of a per-layer list, repeating the list as needed.
fn layer_value(style: &ComputedStyle, property: PropertyId, index: usize) -> &StyleValue {
    let items = style.get(property).as_slice();
    &items[index % items.len().max(1)]
}

fn layer_area(style: &ComputedStyle, property: PropertyId, index: usize, default: Area) -> Area {
    layer_value(style, property, index)
        .as_keyword::<Area>()
        .unwrap_or(default)
}

/// Size of one tile along an axis, and the spacing cell it sits in.
///
/// Returns `(tile, cell)`. For `space` the cell is wider than the tile so
/// that the first tile touches the start of `area` and the last one its
/// end.
fn tile_and_cell(repeat: RepeatStyle, image: f64, area: f64) -> (f64, f64) {
    match repeat {
        RepeatStyle::Space => {
            let n = (area / image).floor();
            if n >= 2.0 {
                (image, (area - image) / (n - 1.0))
            } else {
                (image, image)
            }
        }
        _ => (image, image),
    }
}

/// Apply `background-repeat: round` to a layer size.
///
/// [CSS Backgrounds § 3.9](https://www.w3.org/TR/css-backgrounds-3/#background-size)
///
/// "If background-repeat is round for one dimension only and if
/// background-size is auto for the other dimension, then there is a second
/// step. The other dimension is scaled so that the original aspect ratio is
/// restored."
fn round_size(repeat: Repeat, size: &StyleValue, area: (f64, f64), layer: (f64, f64)) -> (f64, f64) {
    let (mut width, mut height) = layer;
    let (auto_x, auto_y) = match size.as_bg_size() {
        Some(BgSize::Explicit { x, y }) => (x.is_none(), y.is_none()),
        _ => (false, false),
    };

    if repeat.x == RepeatStyle::Round {
        let n = (area.0 / width).round().max(1.0);
        let rounded = area.0 / n;
        if repeat.y != RepeatStyle::Round && auto_y {
            height *= rounded / width;
        }
        width = rounded;
    }
    if repeat.y == RepeatStyle::Round {
        let n = (area.1 / height).round().max(1.0);
        let rounded = area.1 / n;
        if repeat.x != RepeatStyle::Round && auto_x {
            width *= rounded / height;
        }
        height = rounded;
    }
    (width, height)
}

/// Paint background layer `index`.
fn paint_layer(style: &ComputedStyle, canvas: &mut dyn Canvas2D, boxes: &Boxes, index: usize) {
    let Some(image) = layer_value(style, PropertyId::BackgroundImage, index).as_image() else {
        return;
    };
    if image.is_none() {
        return;
    }

    let clip = boxes.get(layer_area(style, PropertyId::BackgroundClip, index, Area::BorderBox));
    let origin = boxes.get(layer_area(style, PropertyId::BackgroundOrigin, index, Area::PaddingBox));
    let area = (origin.rect.width, origin.rect.height);
    if area.0 <= 0.0 || area.1 <= 0.0 {
        return;
    }

    let size_value = layer_value(style, PropertyId::BackgroundSize, index);
    let repeat = layer_value(style, PropertyId::BackgroundRepeat, index)
        .as_repeat()
        .unwrap_or(Repeat {
            x: RepeatStyle::Repeat,
            y: RepeatStyle::Repeat,
        });
    let blend = layer_value(style, PropertyId::BackgroundBlendMode, index)
        .as_keyword::<BlendMode>()
        .unwrap_or(BlendMode::Normal);

    let natural = size_value
        .as_bg_size()
        .map_or(area, |size| size.resolve(image, area));
    let (image_width, image_height) = round_size(repeat, size_value, area, natural);
    if image_width <= 0.0 || image_height <= 0.0 {
        return;
    }

    canvas.save();
    clip.clip_path(canvas);
    canvas.clip();
    if blend != BlendMode::Normal {
        canvas.set_blend_mode(blend);
    }
    canvas.translate(origin.rect.x, origin.rect.y);

    let (position_x, position_y) = layer_value(style, PropertyId::BackgroundPosition, index)
        .as_position()
        .map_or((0.0, 0.0), |p: &Position| p.resolve(area, (image_width, image_height)));

    if repeat.x == RepeatStyle::NoRepeat && repeat.y == RepeatStyle::NoRepeat {
        canvas.translate(position_x, position_y);
        image.draw(canvas, image_width, image_height);
    } else {
        paint_tiled(
            canvas,
            image,
            repeat,
            area,
            (image_width, image_height),
            (position_x, position_y),
        );
    }
    canvas.restore();
}

/// Tile `image` over the clip. The tile is drawn once into a surface that
/// becomes a repeating source.
fn paint_tiled(
    canvas: &mut dyn Canvas2D,
    image: &Image,
    repeat: Repeat,
    area: (f64, f64),
    tile: (f64, f64),
    position: (f64, f64),
) {
    let (tile_w, cell_w) = tile_and_cell(repeat.x, tile.0, area.0);
    let (tile_h, cell_h) = tile_and_cell(repeat.y, tile.1, area.1);

    // Spaced tiles start flush with the area's edge.
    let start_x = if repeat.x == RepeatStyle::Space && cell_w > tile_w {
        0.0
    } else {
        position.0
    };
    let start_y = if repeat.y == RepeatStyle::Space && cell_h > tile_h {
        0.0
    } else {
        position.1
    };

    let (scale_x, scale_y) = canvas.device_scale();
    let mut surface = Surface::new(
        Format::Argb32,
        (cell_w * scale_x).ceil().max(1.0) as usize,
        (cell_h * scale_y).ceil().max(1.0) as usize,
    );
    surface.device_scale = (scale_x, scale_y);
    let surface = canvas.render_layer(surface, &mut |c: &mut dyn Canvas2D| {
        image.draw(c, tile_w, tile_h);
    });

    let (x1, y1, x2, y2) = canvas.clip_extents();
    let (fill_x, fill_w) = if repeat.x == RepeatStyle::NoRepeat {
        (start_x, tile_w)
    } else {
        (x1, x2 - x1)
    };
    let (fill_y, fill_h) = if repeat.y == RepeatStyle::NoRepeat {
        (start_y, tile_h)
    } else {
        (y1, y2 - y1)
    };

    canvas.set_source(Pattern::surface(Rc::new(surface), start_x, start_y).with_extend(Extend::Repeat));
    canvas.rectangle(fill_x, fill_y, fill_w, fill_h);
    canvas.fill();
}

/// Paint the background of the border box at `(x, y)`.
#[allow(clippy::too_many_arguments)]
pub fn paint_background(
    style: &ComputedStyle,
    canvas: &mut dyn Canvas2D,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    junction: JunctionSides,
    cache: &mut CornerMaskCache,
) {
    if width <= 0.0 || height <= 0.0 {
        return;
    }

    let color = style.background_color();
    let images = style.get(PropertyId::BackgroundImage).as_slice();
    let has_image = images
        .iter()
        .any(|v| v.as_image().is_some_and(|image| !image.is_none()));
    let shadows = style.shadows(PropertyId::BoxShadow).filter(|s| !s.is_empty());
    if color.is_clear() && !has_image && shadows.is_none() {
        return;
    }

    let boxes = Boxes::new(style, x, y, width, height, junction);

    canvas.save();

    if let Some(shadows) = shadows {
        paint_box_shadows(shadows, canvas, &boxes.border, false, cache);
    }

    let bottom = images.len().max(1) - 1;
    if !color.is_clear() {
        canvas.save();
        boxes
            .get(layer_area(style, PropertyId::BackgroundClip, bottom, Area::BorderBox))
            .path(canvas);
        canvas.set_source_rgba(color);
        canvas.fill();
        canvas.restore();
    }

    if has_image {
        for index in (0..images.len()).rev() {
            paint_layer(style, canvas, &boxes, index);
        }
    }

    if let Some(shadows) = shadows {
        paint_box_shadows(shadows, canvas, &boxes.padding, true, cache);
    }

    canvas.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::{CanvasCommand, RecordingCanvas};
    use crate::paint::PatternKind;
    use crate::values::Rgba;

    fn paint(css: &str, width: f64, height: f64) -> RecordingCanvas {
        let style = ComputedStyle::from_declarations(css);
        let mut canvas = RecordingCanvas::new(200.0, 200.0);
        let mut cache = CornerMaskCache::new();
        paint_background(
            &style,
            &mut canvas,
            0.0,
            0.0,
            width,
            height,
            JunctionSides::empty(),
            &mut cache,
        );
        canvas
    }

    #[test]
    fn test_transparent_background_draws_nothing() {
        let canvas = paint("", 100.0, 40.0);
        assert!(canvas.commands().is_empty());
    }

    #[test]
    fn test_color_fills_border_box() {
        let canvas = paint("background-color: rgba(255, 255, 255, 1)", 100.0, 40.0);
        assert_eq!(canvas.draw_count(), 1);
        assert!(canvas
            .commands()
            .contains(&CanvasCommand::SetSource(Pattern::solid(Rgba::WHITE))));
        assert!(canvas.commands().contains(&CanvasCommand::LineTo(100.0, 40.0)));
    }

    #[test]
    fn test_color_respects_bottom_layer_clip() {
        let canvas = paint(
            "background-color: white; border: 5px solid black; background-clip: padding-box",
            100.0,
            40.0,
        );
        assert!(canvas.commands().contains(&CanvasCommand::MoveTo(5.0, 5.0)));
        assert!(canvas.commands().contains(&CanvasCommand::LineTo(95.0, 35.0)));
    }

    #[test]
    fn test_empty_box_is_skipped() {
        let canvas = paint("background-color: white", 0.0, 40.0);
        assert!(canvas.commands().is_empty());
    }

    #[test]
    fn test_round_fits_whole_tiles() {
        let repeat = Repeat {
            x: RepeatStyle::Round,
            y: RepeatStyle::Repeat,
        };
        let size = BgSize::auto_value();
        let (w, h) = round_size(repeat, &size, (100.0, 50.0), (30.0, 10.0));
        // 100 / 30 rounds to 3 tiles; auto height keeps the ratio.
        assert!((w - 100.0 / 3.0).abs() < 1e-9);
        assert!((h - 10.0 * (100.0 / 3.0) / 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_space_spreads_cells() {
        assert_eq!(tile_and_cell(RepeatStyle::Space, 30.0, 100.0), (30.0, 35.0));
        // Fewer than two tiles fit: no spacing.
        assert_eq!(tile_and_cell(RepeatStyle::Space, 60.0, 100.0), (60.0, 60.0));
        assert_eq!(tile_and_cell(RepeatStyle::Repeat, 30.0, 100.0), (30.0, 30.0));
    }

    #[test]
    fn test_gradient_layer_is_painted_over_color() {
        let canvas = paint(
            "background-color: white; background-image: -glaze-gradient(linear, left top, right top, from(red), to(blue)); background-repeat: no-repeat",
            100.0,
            40.0,
        );
        assert!(canvas.draw_count() >= 2);
        let first_gradient = canvas.commands().iter().position(|c| {
            matches!(c, CanvasCommand::SetSource(p) if !matches!(p.kind, PatternKind::Solid(_)))
        });
        let white = canvas
            .commands()
            .iter()
            .position(|c| *c == CanvasCommand::SetSource(Pattern::solid(Rgba::WHITE)));
        assert!(white < first_gradient);
    }

    #[test]
    fn test_outset_shadow_before_color_and_inset_after() {
        let canvas = paint(
            "background-color: white; box-shadow: 0 2px 0 black, inset 0 0 0 1px red",
            100.0,
            40.0,
        );
        let sources: Vec<&Pattern> = canvas
            .commands()
            .iter()
            .filter_map(|c| match c {
                CanvasCommand::SetSource(p) => Some(p),
                _ => None,
            })
            .collect();
        let black = sources.iter().position(|p| **p == Pattern::solid(Rgba::BLACK));
        let white = sources.iter().position(|p| **p == Pattern::solid(Rgba::WHITE));
        let red = sources.iter().position(|p| **p == Pattern::solid(Rgba::new(1.0, 0.0, 0.0, 1.0)));
        assert!(black.is_some() && white.is_some() && red.is_some());
        assert!(black < white);
        assert!(white < red);
    }
}
