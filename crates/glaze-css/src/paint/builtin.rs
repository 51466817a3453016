//! Built-in icons.
//!
//! Deterministic vector drawings used when a widget's icon source is
//! `builtin`. They only look at the computed `color` and
//! `background-color`, so the same size and colors always produce the same
//! command stream.

use core::f64::consts::{FRAC_PI_2, FRAC_PI_8, PI};

use crate::values::color::{DARKER, LIGHTER};
use crate::values::image::BuiltinColors;
use crate::values::{Image, Rgba};

use super::{Canvas2D, LineCap, LineJoin};

/// Which built-in drawing to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BuiltinIcon {
    /// Draw nothing.
    #[default]
    None,
    /// A check mark.
    Check,
    /// The horizontal bar of a check box in mixed state.
    CheckInconsistent,
    /// A filled radio dot.
    Radio,
    /// The horizontal bar of a radio button in mixed state.
    RadioInconsistent,
    /// Chevron pointing up.
    ArrowUp,
    /// Chevron pointing down.
    ArrowDown,
    /// Chevron pointing left.
    ArrowLeft,
    /// Chevron pointing right.
    ArrowRight,
    /// Disclosure triangle.
    Expander {
        /// Rows stacked left to right instead of top to bottom.
        horizontal: bool,
        /// Right-to-left text direction.
        rtl: bool,
        /// Open state.
        expanded: bool,
    },
    /// Resize grip meeting the top-left window corner.
    GripTopLeft,
    /// Resize grip along the top edge.
    GripTop,
    /// Resize grip meeting the top-right window corner.
    GripTopRight,
    /// Resize grip along the right edge.
    GripRight,
    /// Resize grip meeting the bottom-right window corner.
    GripBottomRight,
    /// Resize grip along the bottom edge.
    GripBottom,
    /// Resize grip meeting the bottom-left window corner.
    GripBottomLeft,
    /// Resize grip along the left edge.
    GripLeft,
    /// A row of dots across a pane divider.
    PaneSeparator,
    /// A stippled drag handle.
    Handle,
    /// Twelve spokes fading around a circle.
    Spinner,
}

impl BuiltinIcon {
    /// The arrow pointing at `angle` radians, clockwise from up.
    #[must_use]
    pub fn arrow_for_angle(angle: f64) -> Self {
        match (2.0 * angle / PI).round() as i64 & 3 {
            0 => Self::ArrowUp,
            1 => Self::ArrowRight,
            2 => Self::ArrowDown,
            _ => Self::ArrowLeft,
        }
    }

    /// Whether this is one of the eight grips.
    #[must_use]
    pub const fn is_grip(self) -> bool {
        matches!(
            self,
            Self::GripTopLeft
                | Self::GripTop
                | Self::GripTopRight
                | Self::GripRight
                | Self::GripBottomRight
                | Self::GripBottom
                | Self::GripBottomLeft
                | Self::GripLeft
        )
    }

    /// Draw the icon into a `width` × `height` area at the canvas origin.
    pub fn draw(self, canvas: &mut dyn Canvas2D, width: f64, height: f64, colors: BuiltinColors) {
        match self {
            Self::None => {}
            Self::Check => draw_check(canvas, width, height, colors.foreground, true, false),
            Self::CheckInconsistent => draw_check(canvas, width, height, colors.foreground, false, true),
            Self::Radio => draw_radio(canvas, width, height, colors.foreground, true, false),
            Self::RadioInconsistent => draw_radio(canvas, width, height, colors.foreground, false, true),
            Self::ArrowUp => draw_arrow(canvas, width, height, colors.foreground, 0.0),
            Self::ArrowDown => draw_arrow(canvas, width, height, colors.foreground, PI),
            Self::ArrowLeft => draw_arrow(canvas, width, height, colors.foreground, 3.0 * FRAC_PI_2),
            Self::ArrowRight => draw_arrow(canvas, width, height, colors.foreground, FRAC_PI_2),
            Self::Expander {
                horizontal,
                rtl,
                expanded,
            } => draw_expander(canvas, width, height, colors.foreground, horizontal, rtl, expanded),
            Self::GripTopLeft
            | Self::GripTop
            | Self::GripTopRight
            | Self::GripRight
            | Self::GripBottomRight
            | Self::GripBottom
            | Self::GripBottomLeft
            | Self::GripLeft => draw_grip(canvas, width, height, colors.background, self),
            Self::PaneSeparator => draw_pane_separator(canvas, width, height, colors.background),
            Self::Handle => draw_handle(canvas, width, height, colors.background),
            Self::Spinner => draw_spinner(canvas, width, height, colors.foreground),
        }
    }
}

/// Draw `image` into a `width` × `height` area; built-in images draw `icon`.
///
/// An uncomputed built-in image uses black on white.
pub fn paint_icon_builtin(image: &Image, canvas: &mut dyn Canvas2D, width: f64, height: f64, icon: BuiltinIcon) {
    match image {
        Image::Builtin(colors) => icon.draw(canvas, width, height, colors.unwrap_or_default()),
        image => image.draw(canvas, width, height),
    }
}

/// Odd exterior size, pad and interior size shared by checks and radios.
fn toggle_metrics(width: f64, height: f64, pad_factor: i32) -> (i32, i32, i32) {
    let mut exterior = width.min(height) as i32;
    if exterior % 2 == 0 {
        exterior -= 1;
    }

    let mut pad = 1 + (pad_factor * (exterior - 2) / 9).max(1);
    let interior = (exterior - 2 * pad).max(1);
    if interior < 7 {
        pad = ((exterior - interior) / 2).max(0);
    }
    (exterior, pad, interior)
}

/// Horizontal bar used for the mixed state.
fn bar_thickness(interior: i32) -> i32 {
    ((3 + interior * 2) / 7).max(1)
}

fn draw_check(canvas: &mut dyn Canvas2D, width: f64, height: f64, fg: Rgba, checked: bool, inconsistent: bool) {
    let (exterior, pad, interior) = toggle_metrics(width, height, 1);
    let x = -(1 + exterior - width as i32) / 2;
    let y = -(1 + exterior - height as i32) / 2;

    canvas.set_source_rgba(fg);

    if inconsistent {
        let thickness = bar_thickness(interior);
        canvas.rectangle(
            f64::from(x + pad),
            f64::from(y + pad + (1 + interior - thickness) / 2),
            f64::from(interior),
            f64::from(thickness),
        );
        canvas.fill();
    } else if checked {
        canvas.save();
        canvas.translate(f64::from(x + pad), f64::from(y + pad));
        let scale = f64::from(interior) / 7.0;
        canvas.scale(scale, scale);

        canvas.rectangle(0.0, 0.0, 7.0, 7.0);
        canvas.clip();

        // The mark is defined on a 7x7 grid.
        canvas.move_to(7.0, 0.0);
        canvas.line_to(7.5, 1.0);
        canvas.curve_to(5.3, 2.0, 4.3, 4.0, 3.5, 7.0);
        canvas.curve_to(3.0, 5.7, 1.3, 4.7, 0.0, 4.7);
        canvas.line_to(0.2, 3.5);
        canvas.curve_to(1.1, 3.5, 2.3, 4.3, 3.0, 5.0);
        canvas.curve_to(1.0, 3.9, 2.4, 4.1, 3.2, 4.9);
        canvas.curve_to(3.5, 3.1, 5.2, 2.0, 7.0, 0.0);

        canvas.fill();
        canvas.restore();
    }
}

fn draw_radio(canvas: &mut dyn Canvas2D, width: f64, height: f64, fg: Rgba, checked: bool, inconsistent: bool) {
    let (exterior, pad, interior) = toggle_metrics(width, height, 2);
    let x = -(1.0 + f64::from(exterior) - width) / 2.0;
    let y = -(1.0 + f64::from(exterior) - height) / 2.0;
    let pad = f64::from(pad);

    canvas.set_source_rgba(fg);

    if inconsistent {
        let thickness = bar_thickness(interior);
        canvas.rectangle(
            x + pad,
            y + pad + f64::from(interior - thickness) / 2.0,
            f64::from(interior),
            f64::from(thickness),
        );
        canvas.fill();
    } else if checked {
        let radius = f64::from(interior) / 2.0;
        canvas.new_sub_path();
        canvas.arc(x + pad + radius, y + pad + radius, radius, 0.0, 2.0 * PI);
        canvas.fill();
    }
}

fn draw_arrow(canvas: &mut dyn Canvas2D, width: f64, height: f64, fg: Rgba, angle: f64) {
    let size = width.min(height);

    canvas.translate(width / 2.0, height / 2.0);
    if angle != 0.0 {
        canvas.rotate(angle);
    }

    let line_width = size / 3.0 / 2.0_f64.sqrt();
    canvas.set_line_width(line_width);
    canvas.set_line_join(LineJoin::Round);
    canvas.set_line_cap(LineCap::Round);

    let shrink = size / (size + line_width);
    canvas.scale(shrink, shrink);

    canvas.move_to(-size / 2.0, size / 4.0);
    canvas.rel_line_to(size / 2.0, -size / 2.0);
    canvas.rel_line_to(size / 2.0, size / 2.0);

    canvas.set_source_rgba(fg);
    canvas.stroke();
}

fn draw_expander(
    canvas: &mut dyn Canvas2D,
    width: f64,
    height: f64,
    fg: Rgba,
    horizontal: bool,
    rtl: bool,
    expanded: bool,
) {
    const LINE_WIDTH: i32 = 1;

    let progress = if expanded { 1.0 } else { 0.0 };
    let angle = match (horizontal, rtl) {
        (false, false) => FRAC_PI_2 * progress,
        (false, true) => PI - FRAC_PI_2 * progress,
        (true, false) => FRAC_PI_2 - FRAC_PI_2 * progress,
        (true, true) => FRAC_PI_2 + FRAC_PI_2 * progress,
    };

    // How far the stroke reaches past the triangle's tip.
    let overshoot = f64::from(LINE_WIDTH) / 2.0 / FRAC_PI_8.tan();
    let overshoot = if LINE_WIDTH % 2 == 1 {
        (0.5 + overshoot).ceil() - 0.5
    } else {
        overshoot.ceil()
    };

    // Diameter plus line width must be odd for the tip to land on a pixel.
    let mut diameter = (width - 2.0 * overshoot).max(3.0) as i32;
    diameter -= 1 - (diameter + LINE_WIDTH) % 2;
    let radius = f64::from(diameter) / 2.0;

    let half = (radius + f64::from(LINE_WIDTH)) / 2.0;
    let x_vert = (width / 2.0 - half).floor() + half;
    let y_vert = height / 2.0 - 0.5;
    let x_horz = width / 2.0 - 0.5;
    let y_horz = (height / 2.0 - half).floor() + half;

    let x = x_vert * (1.0 - progress) + x_horz * progress;
    let y = y_vert * (1.0 - progress) + y_horz * progress;

    canvas.translate(x, y);
    canvas.rotate(angle);

    canvas.move_to(-radius / 2.0, -radius);
    canvas.line_to(radius / 2.0, 0.0);
    canvas.line_to(-radius / 2.0, radius);
    canvas.close_path();

    canvas.set_line_width(f64::from(LINE_WIDTH));
    canvas.set_source_rgba(fg);
    canvas.fill();
}

/// A 2×2 or 3×3 stipple dot with its top-left pixel at `(x, y)`.
fn render_dot(canvas: &mut dyn Canvas2D, lighter: Rgba, darker: Rgba, x: f64, y: f64, size: i32) {
    match size.clamp(2, 3) {
        2 => {
            canvas.set_source_rgba(lighter);
            canvas.rectangle(x, y, 1.0, 1.0);
            canvas.rectangle(x + 1.0, y + 1.0, 1.0, 1.0);
            canvas.fill();
        }
        _ => {
            canvas.set_source_rgba(lighter);
            canvas.rectangle(x, y, 2.0, 1.0);
            canvas.rectangle(x, y, 1.0, 2.0);
            canvas.fill();

            canvas.set_source_rgba(darker);
            canvas.rectangle(x + 1.0, y + 1.0, 2.0, 1.0);
            canvas.rectangle(x + 2.0, y, 1.0, 2.0);
            canvas.fill();
        }
    }
}

/// A one pixel wide line from pixel to pixel, inclusive.
///
/// Axis-aligned lines move to pixel centers so they cover whole pixels.
fn add_path_line(canvas: &mut dyn Canvas2D, x1: i32, y1: i32, x2: i32, y2: i32) {
    let (mut x1, mut y1, mut x2, mut y2) = (f64::from(x1), f64::from(y1), f64::from(x2), f64::from(y2));
    if y1 == y2 {
        y1 += 0.5;
        y2 += 0.5;
        x2 += 1.0;
    } else if x1 == x2 {
        x1 += 0.5;
        x2 += 0.5;
        y2 += 1.0;
    }
    canvas.move_to(x1, y1);
    canvas.line_to(x2, y2);
}

fn stroke_line(canvas: &mut dyn Canvas2D, color: Option<Rgba>, x1: i32, y1: i32, x2: i32, y2: i32) {
    if let Some(color) = color {
        canvas.set_source_rgba(color);
    }
    add_path_line(canvas, x1, y1, x2, y2);
    canvas.stroke();
}

fn draw_grip(canvas: &mut dyn Canvas2D, width: f64, height: f64, bg: Rgba, icon: BuiltinIcon) {
    let darker = bg.shade(DARKER);
    let lighter = bg.shade(LIGHTER);
    let (mut width, mut height) = (width, height);

    canvas.set_line_width(1.0);

    // Square up the area, keeping it against the window edge it meets.
    let aligns_bottom = matches!(icon, BuiltinIcon::GripBottomLeft | BuiltinIcon::GripBottomRight | BuiltinIcon::GripBottom);
    let aligns_right = matches!(icon, BuiltinIcon::GripTopRight | BuiltinIcon::GripBottomRight | BuiltinIcon::GripRight);
    let squares_width = !matches!(icon, BuiltinIcon::GripTop | BuiltinIcon::GripBottom);
    let squares_height = !matches!(icon, BuiltinIcon::GripLeft | BuiltinIcon::GripRight);

    if squares_height && width < height {
        if aligns_bottom {
            canvas.translate(0.0, height - width);
        }
        height = width;
    }
    if squares_width && height < width {
        if aligns_right {
            canvas.translate(width - height, 0.0);
        }
        width = height;
    }

    let w = width as i32;
    let h = height as i32;

    match icon {
        BuiltinIcon::GripLeft | BuiltinIcon::GripRight => {
            let mut xi = 0;
            while xi < w {
                stroke_line(canvas, Some(lighter), xi, 0, xi, h);
                xi += 1;
                stroke_line(canvas, Some(darker), xi, 0, xi, h);
                xi += 2;
            }
        }
        BuiltinIcon::GripTop | BuiltinIcon::GripBottom => {
            let mut yi = 0;
            while yi < h {
                stroke_line(canvas, Some(lighter), 0, yi, w, yi);
                yi += 1;
                stroke_line(canvas, Some(darker), 0, yi, w, yi);
                yi += 2;
            }
        }
        BuiltinIcon::GripTopLeft => {
            let (mut xi, mut yi) = (w, h);
            while xi > 3 {
                stroke_line(canvas, Some(darker), xi, 0, 0, yi);
                xi -= 1;
                yi -= 1;
                stroke_line(canvas, None, xi, 0, 0, yi);
                xi -= 1;
                yi -= 1;
                stroke_line(canvas, Some(lighter), xi, 0, 0, yi);
                xi -= 3;
                yi -= 3;
            }
        }
        BuiltinIcon::GripTopRight => {
            let (mut xi, mut yi) = (0, h);
            while xi < w - 3 {
                stroke_line(canvas, Some(lighter), xi, 0, w, yi);
                xi += 1;
                yi -= 1;
                stroke_line(canvas, Some(darker), xi, 0, w, yi);
                xi += 1;
                yi -= 1;
                stroke_line(canvas, None, xi, 0, w, yi);
                xi += 3;
                yi -= 3;
            }
        }
        BuiltinIcon::GripBottomLeft => {
            let (mut xi, mut yi) = (w, 0);
            while xi > 3 {
                stroke_line(canvas, Some(darker), 0, yi, xi, h);
                xi -= 1;
                yi += 1;
                stroke_line(canvas, None, 0, yi, xi, h);
                xi -= 1;
                yi += 1;
                stroke_line(canvas, Some(lighter), 0, yi, xi, h);
                xi -= 3;
                yi += 3;
            }
        }
        BuiltinIcon::GripBottomRight => {
            let (mut xi, mut yi) = (0, 0);
            while xi < w - 3 {
                stroke_line(canvas, Some(lighter), xi, h, w, yi);
                xi += 1;
                yi += 1;
                stroke_line(canvas, Some(darker), xi, h, w, yi);
                xi += 1;
                yi += 1;
                stroke_line(canvas, None, xi, h, w, yi);
                xi += 3;
                yi += 3;
            }
        }
        _ => {}
    }
}

fn draw_pane_separator(canvas: &mut dyn Canvas2D, width: f64, height: f64, bg: Rgba) {
    let darker = bg.shade(DARKER);
    let lighter = bg.shade(LIGHTER);

    canvas.set_line_width(1.0);

    if width > height {
        let center = (width / 2.0) as i32;
        let y = f64::from((height / 2.0) as i32 - 1);
        for x in (center - 15..=center + 15).step_by(5) {
            render_dot(canvas, lighter, darker, f64::from(x), y, 3);
        }
    } else {
        let center = (height / 2.0) as i32;
        let x = f64::from((width / 2.0) as i32 - 1);
        for y in (center - 15..=center + 15).step_by(5) {
            render_dot(canvas, lighter, darker, x, f64::from(y), 3);
        }
    }
}

fn draw_handle(canvas: &mut dyn Canvas2D, width: f64, height: f64, bg: Rgba) {
    let darker = bg.shade(DARKER);
    let lighter = bg.shade(LIGHTER);

    canvas.set_line_width(1.0);

    let mut y = 0.0;
    while y < height {
        let mut x = 0.0;
        while x < width {
            render_dot(canvas, lighter, darker, x, y, 2);
            render_dot(canvas, lighter, darker, x + 3.0, y + 1.0, 2);
            x += 6.0;
        }
        y += 3.0;
    }
}

fn draw_spinner(canvas: &mut dyn Canvas2D, width: f64, height: f64, fg: Rgba) {
    const STEPS: u32 = 12;

    let radius = (width / 2.0).min(height / 2.0);
    let inset = f64::from((0.7 * radius) as i32);
    let half = f64::from(STEPS / 2);

    canvas.translate(width / 2.0, height / 2.0);
    canvas.set_line_width(2.0);

    for i in 0..STEPS {
        let t = 1.0 - f64::from(i) / f64::from(STEPS);
        let xscale = -(f64::from(i) * PI / half).sin();
        let yscale = -(f64::from(i) * PI / half).cos();

        canvas.move_to((radius - inset) * xscale, (radius - inset) * yscale);
        canvas.line_to(radius * xscale, radius * yscale);
        canvas.set_source_rgba(fg.with_alpha_factor(t));
        canvas.stroke();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::{CanvasCommand, Pattern, PatternKind, RecordingCanvas};

    fn record(icon: BuiltinIcon, width: f64, height: f64) -> RecordingCanvas {
        let mut canvas = RecordingCanvas::new(width, height);
        icon.draw(&mut canvas, width, height, BuiltinColors::default());
        canvas
    }

    fn sources(canvas: &RecordingCanvas) -> Vec<Pattern> {
        canvas
            .commands()
            .iter()
            .filter_map(|c| match c {
                CanvasCommand::SetSource(p) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_toggle_metrics() {
        assert_eq!(toggle_metrics(16.0, 16.0, 1), (15, 2, 11));
        assert_eq!(toggle_metrics(16.0, 16.0, 2), (15, 3, 9));
        // Tiny toggles center a one pixel interior.
        assert_eq!(toggle_metrics(4.0, 4.0, 1), (3, 1, 1));
    }

    #[test]
    fn test_check_glyph_is_clipped_and_filled_once() {
        let canvas = record(BuiltinIcon::Check, 16.0, 16.0);
        let commands = canvas.commands();
        assert_eq!(canvas.draw_count(), 1);
        assert!(commands.contains(&CanvasCommand::Clip));

        let curves = commands.iter().filter(|c| matches!(c, CanvasCommand::CurveTo(..))).count();
        assert_eq!(curves, 5);

        // The mark starts at the top-right corner of the 11px interior.
        let glyph_start = commands.iter().rev().find_map(|c| match c {
            CanvasCommand::MoveTo(x, y) => Some((*x, *y)),
            _ => None,
        });
        let (x, y) = glyph_start.unwrap();
        assert!((x - 13.0).abs() < 1e-9);
        assert!((y - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_check_is_deterministic() {
        let a = record(BuiltinIcon::Check, 16.0, 16.0);
        let b = record(BuiltinIcon::Check, 16.0, 16.0);
        assert_eq!(a.commands(), b.commands());
    }

    #[test]
    fn test_unchecked_toggles_draw_nothing() {
        let canvas = record(BuiltinIcon::None, 16.0, 16.0);
        assert!(canvas.commands().is_empty());
    }

    #[test]
    fn test_inconsistent_check_is_a_bar() {
        let canvas = record(BuiltinIcon::CheckInconsistent, 16.0, 16.0);
        assert_eq!(canvas.draw_count(), 1);
        // Thickness (3 + 22) / 7 = 3, offset (1 + 11 - 3) / 2 = 4.
        assert_eq!(canvas.commands()[1], CanvasCommand::MoveTo(2.0, 6.0));
        assert_eq!(canvas.commands()[3], CanvasCommand::LineTo(13.0, 9.0));
    }

    #[test]
    fn test_radio_is_a_centered_disc() {
        let canvas = record(BuiltinIcon::Radio, 16.0, 16.0);
        assert_eq!(canvas.draw_count(), 1);
        // Circle of radius 4.5 around (7.5, 7.5): starts at angle 0.
        let first = canvas.commands().iter().find_map(|c| match c {
            CanvasCommand::MoveTo(x, y) | CanvasCommand::LineTo(x, y) => Some((*x, *y)),
            _ => None,
        });
        let (x, y) = first.unwrap();
        assert!((x - 12.0).abs() < 1e-9);
        assert!((y - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_arrow_is_one_round_stroke() {
        let canvas = record(BuiltinIcon::ArrowDown, 12.0, 12.0);
        assert_eq!(canvas.draw_count(), 1);
        assert!(canvas.commands().contains(&CanvasCommand::SetLineCap(LineCap::Round)));
        assert!(canvas.commands().contains(&CanvasCommand::SetLineJoin(LineJoin::Round)));
    }

    #[test]
    fn test_arrow_for_angle() {
        assert_eq!(BuiltinIcon::arrow_for_angle(0.0), BuiltinIcon::ArrowUp);
        assert_eq!(BuiltinIcon::arrow_for_angle(FRAC_PI_2), BuiltinIcon::ArrowRight);
        assert_eq!(BuiltinIcon::arrow_for_angle(PI), BuiltinIcon::ArrowDown);
        assert_eq!(BuiltinIcon::arrow_for_angle(3.0 * FRAC_PI_2), BuiltinIcon::ArrowLeft);
        assert_eq!(BuiltinIcon::arrow_for_angle(-FRAC_PI_2), BuiltinIcon::ArrowLeft);
    }

    #[test]
    fn test_collapsed_expander_points_right() {
        let canvas = record(
            BuiltinIcon::Expander {
                horizontal: false,
                rtl: false,
                expanded: false,
            },
            16.0,
            16.0,
        );
        assert_eq!(canvas.draw_count(), 1);
        // Diameter 12, radius 6, centered at (floor(8 - 3.5) + 3.5, 7.5).
        let points: Vec<(f64, f64)> = canvas
            .commands()
            .iter()
            .filter_map(|c| match c {
                CanvasCommand::MoveTo(x, y) | CanvasCommand::LineTo(x, y) => Some((*x, *y)),
                _ => None,
            })
            .collect();
        assert_eq!(points, vec![(4.5, 1.5), (10.5, 7.5), (4.5, 13.5)]);
    }

    #[test]
    fn test_spinner_spokes_fade() {
        let canvas = record(BuiltinIcon::Spinner, 24.0, 24.0);
        assert_eq!(canvas.draw_count(), 12);
        let alphas: Vec<f64> = sources(&canvas)
            .iter()
            .map(|p| match p.kind {
                PatternKind::Solid(c) => c.alpha,
                _ => -1.0,
            })
            .collect();
        assert_eq!(alphas.len(), 12);
        assert!((alphas[0] - 1.0).abs() < 1e-9);
        assert!(alphas.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_grips_use_shaded_background() {
        let colors = BuiltinColors {
            foreground: Rgba::BLACK,
            background: Rgba::new(0.5, 0.5, 0.5, 1.0),
        };
        let mut canvas = RecordingCanvas::new(12.0, 12.0);
        BuiltinIcon::GripBottomRight.draw(&mut canvas, 12.0, 12.0, colors);
        let used = sources(&canvas);
        assert!(used.contains(&Pattern::solid(colors.background.shade(LIGHTER))));
        assert!(used.contains(&Pattern::solid(colors.background.shade(DARKER))));
        // Three lines per step, steps at xi = 0 and 5.
        assert_eq!(canvas.draw_count(), 6);
    }

    #[test]
    fn test_handle_stipple_count() {
        let canvas = record(BuiltinIcon::Handle, 12.0, 6.0);
        // Two rows of two pairs of dots.
        assert_eq!(canvas.draw_count(), 8);
    }

    #[test]
    fn test_pane_separator_has_seven_dots() {
        let canvas = record(BuiltinIcon::PaneSeparator, 100.0, 6.0);
        // Each 3x3 dot fills a light and a dark half.
        assert_eq!(canvas.draw_count(), 14);
    }
}
