//! Borders and outlines.
//!
//! [CSS Backgrounds § 4](https://www.w3.org/TR/css-backgrounds-3/#borders)
//!
//! Solid-looking styles (`solid`, `inset`, `outset`, `double`, `groove`,
//! `ridge`) are filled as rings between the border box and an inner box.
//! `dotted` and `dashed` are stroked along the middle of the border, each
//! side clipped to its own quadrant.

use crate::geometry::{IntRect, JunctionSides, Rect, RoundedBox, Side, SideFlags};
use crate::style::{ComputedStyle, PropertyId};
use crate::values::enums::BorderStyle;
use crate::values::Rgba;

use super::border_image::{border_image_source, paint_border_image};
use super::{Canvas2D, FillRule, LineCap, LineJoin};

/// Borders thinner than this do not visibly change any pixel.
const MIN_BORDER_WIDTH: f64 = 1.0 / 1024.0;

/// How much `inset`, `outset`, `groove` and `ridge` shade the dark sides.
const SHADE_FACTOR: f64 = 1.8;

/// Zero the widths of the sides in `hidden`.
fn hide_border_sides(widths: &mut [f64; 4], hidden: SideFlags) {
    for side in Side::ALL {
        if hidden.contains(side.flag()) {
            widths[side as usize] = 0.0;
        }
    }
}

/// Fill the ring between `border_box` and the box shrunk by `widths`.
///
/// Sides sharing a color are filled together so that their corner joins
/// do not show seams.
fn render_frame_fill(
    canvas: &mut dyn Canvas2D,
    border_box: &RoundedBox,
    widths: [f64; 4],
    colors: [Rgba; 4],
    hidden: SideFlags,
) {
    let mut padding_box = *border_box;
    padding_box.shrink(widths[0], widths[1], widths[2], widths[3]);

    if hidden.is_empty() && colors.iter().all(|c| *c == colors[0]) {
        canvas.set_source_rgba(colors[0]);
        border_box.path(canvas);
        padding_box.path(canvas);
        canvas.fill();
        return;
    }

    let mut painted = hidden;
    for side in Side::ALL {
        if painted.contains(side.flag()) {
            continue;
        }
        let color = colors[side as usize];
        for other in Side::ALL.into_iter().skip(side as usize) {
            if painted.contains(other.flag()) || colors[other as usize] != color {
                continue;
            }
            RoundedBox::path_quadrant(border_box, &padding_box, canvas, other);
            painted |= other.flag();
        }
        canvas.set_source_rgba(color);
        canvas.fill();
    }
}

/// Set up line width, dashes, caps and joins for a dotted or dashed
/// border whose path is `length` long.
fn set_stroke_style(canvas: &mut dyn Canvas2D, line_width: f64, style: BorderStyle, length: f64) {
    canvas.set_line_width(line_width);

    if style == BorderStyle::Dotted {
        let n = (0.5 * length / line_width).round();
        let gap = if n == 0.0 { 2.0 } else { length / n };
        canvas.set_dash(&[0.0, gap], 0.0);
        canvas.set_line_cap(LineCap::Round);
        canvas.set_line_join(LineJoin::Round);
    } else {
        let n = length / line_width;
        // Integer-sized boxes, like most focus rectangles, get exact dashes.
        let dash = if n == n.round_ties_even() {
            line_width
        } else {
            let n = (n / 3.0).round();
            if n == 0.0 { 1.0 } else { length / 3.0 / n }
        };
        canvas.set_dash(&[dash, 2.0 * dash], 0.0);
        canvas.set_line_cap(LineCap::Square);
        canvas.set_line_join(LineJoin::Miter);
    }
}

/// Stroke a dotted or dashed border along the middle of each side.
fn render_frame_stroke(
    canvas: &mut dyn Canvas2D,
    border_box: &RoundedBox,
    widths: [f64; 4],
    colors: [Rgba; 4],
    hidden: SideFlags,
    style: BorderStyle,
) {
    let different_colors = colors.iter().any(|c| *c != colors[0]);
    let different_widths = widths.iter().any(|w| *w != widths[0]);

    let mut stroke_box = *border_box;
    stroke_box.shrink(widths[0] / 2.0, widths[1] / 2.0, widths[2] / 2.0, widths[3] / 2.0);

    if !different_colors && !different_widths && hidden.is_empty() {
        let length: f64 = Side::ALL.iter().map(|&side| stroke_box.guess_length(side)).sum();
        stroke_box.path(canvas);
        canvas.set_source_rgba(colors[0]);
        set_stroke_style(canvas, widths[0], style, length);
        canvas.stroke();
        return;
    }

    let mut padding_box = *border_box;
    padding_box.shrink(widths[0], widths[1], widths[2], widths[3]);

    for side in Side::ALL {
        let i = side as usize;
        if hidden.contains(side.flag()) || widths[i] == 0.0 {
            continue;
        }
        canvas.save();
        RoundedBox::path_quadrant(border_box, &padding_box, canvas, side);
        canvas.clip();

        stroke_box.path_side(canvas, side);
        canvas.set_source_rgba(colors[i]);
        set_stroke_style(canvas, widths[i], style, stroke_box.guess_length(side));
        canvas.stroke();
        canvas.restore();
    }
}

/// Width of each of the two lines of a `double` border.
///
/// Whole pixels are kept when the border is at least three pixels wide,
/// giving the gap any leftover.
fn double_stripe(width: f64) -> f64 {
    if width >= 3.0 {
        (width / 3.0).floor()
    } else {
        width / 3.0
    }
}

/// Paint the four sides of a border around `border_box`.
fn render_border(
    canvas: &mut dyn Canvas2D,
    border_box: &RoundedBox,
    widths: [f64; 4],
    mut hidden: SideFlags,
    mut colors: [Rgba; 4],
    styles: [BorderStyle; 4],
) {
    canvas.save();
    canvas.set_fill_rule(FillRule::EvenOdd);

    for side in Side::ALL {
        let i = side as usize;
        if hidden.contains(side.flag()) || widths[i] < MIN_BORDER_WIDTH {
            continue;
        }

        match styles[i] {
            BorderStyle::None | BorderStyle::Hidden | BorderStyle::Solid => {}
            BorderStyle::Inset => {
                if matches!(side, Side::Right | Side::Bottom) {
                    colors[i] = colors[i].shade(SHADE_FACTOR);
                }
            }
            BorderStyle::Outset => {
                if matches!(side, Side::Top | Side::Left) {
                    colors[i] = colors[i].shade(SHADE_FACTOR);
                }
            }
            BorderStyle::Dotted | BorderStyle::Dashed => {
                let mut dont_draw = hidden;
                for other in Side::ALL {
                    if styles[other as usize] == styles[i] {
                        hidden |= other.flag();
                    } else {
                        dont_draw |= other.flag();
                    }
                }
                render_frame_stroke(canvas, border_box, widths, colors, dont_draw, styles[i]);
            }
            BorderStyle::Double => {
                let mut dont_draw = hidden;
                let mut stripes = [0.0; 4];
                let mut inset = [0.0; 4];
                for other in Side::ALL {
                    let j = other as usize;
                    if styles[j] == BorderStyle::Double {
                        hidden |= other.flag();
                    } else {
                        dont_draw |= other.flag();
                    }
                    stripes[j] = double_stripe(widths[j]);
                    inset[j] = widths[j] - stripes[j];
                }

                render_frame_fill(canvas, border_box, stripes, colors, dont_draw);

                let mut inner_box = *border_box;
                inner_box.shrink(inset[0], inset[1], inset[2], inset[3]);
                render_frame_fill(canvas, &inner_box, stripes, colors, dont_draw);
            }
            BorderStyle::Groove | BorderStyle::Ridge => {
                let mut dont_draw = hidden;
                let mut other_colors = colors;
                let mut halves = [0.0; 4];
                for other in Side::ALL {
                    let j = other as usize;
                    let light_first = matches!(other, Side::Top | Side::Left);
                    if light_first ^ (styles[j] == BorderStyle::Ridge) {
                        other_colors[j] = other_colors[j].shade(SHADE_FACTOR);
                    } else {
                        colors[j] = colors[j].shade(SHADE_FACTOR);
                    }
                    if matches!(styles[j], BorderStyle::Groove | BorderStyle::Ridge) {
                        hidden |= other.flag();
                    } else {
                        dont_draw |= other.flag();
                    }
                    halves[j] = widths[j] / 2.0;
                }

                render_frame_fill(canvas, border_box, halves, colors, dont_draw);

                let mut inner_box = *border_box;
                inner_box.shrink(halves[0], halves[1], halves[2], halves[3]);
                render_frame_fill(canvas, &inner_box, halves, other_colors, dont_draw);
            }
        }
    }

    render_frame_fill(canvas, border_box, widths, colors, hidden);
    canvas.restore();
}

/// Whether `style` draws a border: a border image, or any side wider than
/// zero.
#[must_use]
pub fn has_border(style: &ComputedStyle) -> bool {
    border_image_source(style).is_some() || style.border_widths().iter().any(|w| *w > 0.0)
}

/// Integer pixels covering `x, y, width, height`.
fn covering(x: f64, y: f64, width: f64, height: f64) -> IntRect {
    IntRect::covering(x, y, x + width, y + height)
}

/// The pixels a border around `x, y, width, height` may touch, or `None`
/// when `style` has no border.
#[must_use]
pub fn border_clip(style: &ComputedStyle, x: f64, y: f64, width: f64, height: f64) -> Option<IntRect> {
    has_border(style).then(|| covering(x, y, width, height))
}

/// Paint the border of `style` around the border box `x, y, width,
/// height`.
///
/// Sides in `hidden` are left out. Corners in `junction` stay square.
#[allow(clippy::too_many_arguments)]
pub fn paint_border(
    style: &ComputedStyle,
    canvas: &mut dyn Canvas2D,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    hidden: SideFlags,
    junction: JunctionSides,
) {
    let mut widths = style.border_widths();

    if paint_border_image(style, widths, canvas, x, y, width, height) {
        return;
    }

    if widths.iter().all(|w| *w < MIN_BORDER_WIDTH) {
        return;
    }

    hide_border_sides(&mut widths, hidden);

    let mut border_box = RoundedBox::init_rect(x, y, width, height);
    border_box.apply_border_radius_for_style(style, junction);

    render_border(
        canvas,
        &border_box,
        widths,
        hidden,
        style.border_colors(),
        style.border_styles(),
    );
}

/// Whether `style` draws an outline.
#[must_use]
pub fn has_outline(style: &ComputedStyle) -> bool {
    style.number(PropertyId::OutlineWidth, 100.0) > 0.0
}

/// The rectangle the outline's outer edge follows.
///
/// [CSS UI § 5.5](https://www.w3.org/TR/css-ui-3/#outline-offset)
///
/// "outline-offset ... specifies the space between an outline and the
/// edge or border of an element." A negative offset larger than half the
/// box collapses that axis onto the box's center line.
fn compute_outline_rect(style: &ComputedStyle, x: f64, y: f64, width: f64, height: f64) -> Rect {
    let outline_width = style.number(PropertyId::OutlineWidth, 100.0);
    let offset = style.number(PropertyId::OutlineOffset, 100.0);

    let axis = |start: f64, length: f64| {
        if length <= -2.0 * offset {
            (start + length / 2.0 - outline_width, 2.0 * outline_width)
        } else {
            (start - offset - outline_width, length + 2.0 * (offset + outline_width))
        }
    };
    let (ox, ow) = axis(x, width);
    let (oy, oh) = axis(y, height);
    Rect::new(ox, oy, ow, oh)
}

/// The pixels an outline around `x, y, width, height` may touch, or
/// `None` when `style` has no outline.
#[must_use]
pub fn outline_clip(style: &ComputedStyle, x: f64, y: f64, width: f64, height: f64) -> Option<IntRect> {
    if !has_outline(style) {
        return None;
    }
    let rect = compute_outline_rect(style, x, y, width, height);
    Some(covering(rect.x, rect.y, rect.width, rect.height))
}

/// Paint the outline of `style` around the border box `x, y, width,
/// height`.
pub fn paint_outline(style: &ComputedStyle, canvas: &mut dyn Canvas2D, x: f64, y: f64, width: f64, height: f64) {
    let outline_style = style
        .keyword::<BorderStyle>(PropertyId::OutlineStyle)
        .unwrap_or(BorderStyle::None);
    if outline_style == BorderStyle::None {
        return;
    }

    let rect = compute_outline_rect(style, x, y, width, height);
    let outline_width = style.number(PropertyId::OutlineWidth, 100.0);
    let color = style.rgba(PropertyId::OutlineColor);

    let mut border_box = RoundedBox::init_rect(rect.x, rect.y, rect.width, rect.height);
    border_box.apply_outline_radius_for_style(style, JunctionSides::empty());

    render_border(
        canvas,
        &border_box,
        [outline_width; 4],
        SideFlags::empty(),
        [color; 4],
        [outline_style; 4],
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::{CanvasCommand, RecordingCanvas};

    fn fills(canvas: &RecordingCanvas) -> usize {
        canvas
            .commands()
            .iter()
            .filter(|c| matches!(c, CanvasCommand::Fill))
            .count()
    }

    #[test]
    fn test_uniform_frame_fills_once() {
        let mut canvas = RecordingCanvas::new(50.0, 50.0);
        let border_box = RoundedBox::init_rect(0.0, 0.0, 20.0, 20.0);
        render_border(
            &mut canvas,
            &border_box,
            [2.0; 4],
            SideFlags::empty(),
            [Rgba::BLACK; 4],
            [BorderStyle::Solid; 4],
        );
        assert_eq!(fills(&canvas), 1);
        assert!(canvas
            .commands()
            .contains(&CanvasCommand::SetFillRule(FillRule::EvenOdd)));
    }

    #[test]
    fn test_sides_sharing_a_color_fill_together() {
        let red = Rgba::new(1.0, 0.0, 0.0, 1.0);
        let mut canvas = RecordingCanvas::new(50.0, 50.0);
        let border_box = RoundedBox::init_rect(0.0, 0.0, 20.0, 20.0);
        render_border(
            &mut canvas,
            &border_box,
            [2.0; 4],
            SideFlags::empty(),
            [red, Rgba::BLACK, red, Rgba::BLACK],
            [BorderStyle::Solid; 4],
        );
        assert_eq!(fills(&canvas), 2);
    }

    #[test]
    fn test_hidden_sides_are_skipped() {
        let mut canvas = RecordingCanvas::new(50.0, 50.0);
        let border_box = RoundedBox::init_rect(0.0, 0.0, 20.0, 20.0);
        let mut widths = [2.0; 4];
        hide_border_sides(&mut widths, SideFlags::TOP | SideFlags::BOTTOM);
        assert_eq!(widths, [0.0, 2.0, 0.0, 2.0]);
        render_border(
            &mut canvas,
            &border_box,
            widths,
            SideFlags::TOP | SideFlags::BOTTOM,
            [Rgba::BLACK; 4],
            [BorderStyle::Solid; 4],
        );
        assert_eq!(fills(&canvas), 1);
    }

    #[test]
    fn test_double_stripes_keep_whole_pixels() {
        assert_eq!(double_stripe(4.0), 1.0);
        assert_eq!(double_stripe(9.0), 3.0);
        assert!((double_stripe(1.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_dotted_border_strokes_with_round_caps() {
        let mut canvas = RecordingCanvas::new(50.0, 50.0);
        let border_box = RoundedBox::init_rect(0.0, 0.0, 20.0, 20.0);
        render_border(
            &mut canvas,
            &border_box,
            [2.0; 4],
            SideFlags::empty(),
            [Rgba::BLACK; 4],
            [BorderStyle::Dotted; 4],
        );
        let commands = canvas.commands();
        assert!(commands.contains(&CanvasCommand::SetLineCap(LineCap::Round)));
        assert_eq!(
            commands.iter().filter(|c| matches!(c, CanvasCommand::Stroke)).count(),
            1
        );
        // 72px of path at width 2 gives 18 dots, 4px apart.
        assert!(commands.contains(&CanvasCommand::SetDash(vec![0.0, 4.0], 0.0)));
    }

    #[test]
    fn test_dashes_match_integer_lengths() {
        let mut canvas = RecordingCanvas::new(10.0, 10.0);
        set_stroke_style(&mut canvas, 2.0, BorderStyle::Dashed, 40.0);
        assert!(canvas
            .commands()
            .contains(&CanvasCommand::SetDash(vec![2.0, 4.0], 0.0)));
    }
}
