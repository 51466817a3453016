//! The 2D drawing interface every render primitive targets.
//!
//! The model is a stateful vector canvas with a current path, a current
//! transformation matrix (CTM), a source pattern and a clip, in the style of
//! PostScript-like imaging models:
//!
//! - Path coordinates are given in user space and transformed by the CTM at
//!   the moment they are added. The path is not part of the saved state, so
//!   `save`/`restore` around a transform change leaves the path intact.
//! - `line_to` without a current point behaves like `move_to`.
//! - `fill`, `stroke` and `clip` consume the current path.
//! - A pattern's matrix maps user space (at the time the pattern is set) to
//!   pattern space.
//!
//! Backends only implement the required methods; arcs, rectangles and the
//! relative path operations are derived from them.

use core::f64::consts::{FRAC_PI_2, PI};
use std::rc::Rc;

use super::Surface;
use crate::geometry::Matrix;
use crate::values::enums::BlendMode;
use crate::values::Rgba;

/// How the interior of a self-intersecting path is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillRule {
    /// Non-zero winding number.
    #[default]
    Winding,
    /// Odd crossing count.
    EvenOdd,
}

/// Line end shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    /// Stop at the end point.
    #[default]
    Butt,
    /// Half circle around the end point.
    Round,
    /// Half square around the end point.
    Square,
}

/// Shape where two segments meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    /// Sharp corner.
    #[default]
    Miter,
    /// Rounded corner.
    Round,
    /// Cut-off corner.
    Bevel,
}

/// What a pattern shows outside its natural area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extend {
    /// Transparent outside.
    #[default]
    None,
    /// Tile.
    Repeat,
    /// Tile, mirroring every other copy.
    Reflect,
    /// Repeat the edge pixels or colors.
    Pad,
}

/// One gradient color stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient in `[0, 1]`.
    pub offset: f64,
    /// Color at that position.
    pub color: Rgba,
}

/// What a pattern paints.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternKind {
    /// A single color.
    Solid(Rgba),
    /// Pixels of a surface. Pattern space maps onto the surface through its
    /// device offset and scale.
    Surface(Rc<Surface>),
    /// Linear gradient from `(x0, y0)` to `(x1, y1)`.
    Linear {
        /// Start point.
        x0: f64,
        /// Start point.
        y0: f64,
        /// End point.
        x1: f64,
        /// End point.
        y1: f64,
        /// Color stops in offset order.
        stops: Vec<GradientStop>,
    },
    /// Radial gradient between two circles.
    Radial {
        /// Center of the start circle.
        x0: f64,
        /// Center of the start circle.
        y0: f64,
        /// Radius of the start circle.
        r0: f64,
        /// Center of the end circle.
        x1: f64,
        /// Center of the end circle.
        y1: f64,
        /// Radius of the end circle.
        r1: f64,
        /// Color stops in offset order.
        stops: Vec<GradientStop>,
    },
}

/// A source or mask: what to paint and how it is positioned.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    /// The content.
    pub kind: PatternKind,
    /// User space to pattern space.
    pub matrix: Matrix,
    /// Behavior outside the content.
    pub extend: Extend,
}

impl Pattern {
    /// A solid color.
    #[must_use]
    pub fn solid(color: Rgba) -> Self {
        Self {
            kind: PatternKind::Solid(color),
            matrix: Matrix::IDENTITY,
            extend: Extend::Pad,
        }
    }

    /// A surface whose device origin sits at user position `(x, y)`.
    #[must_use]
    pub fn surface(surface: Rc<Surface>, x: f64, y: f64) -> Self {
        Self {
            kind: PatternKind::Surface(surface),
            matrix: Matrix::translation(-x, -y),
            extend: Extend::None,
        }
    }

    /// A linear gradient with no stops yet.
    #[must_use]
    pub fn linear(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            kind: PatternKind::Linear {
                x0,
                y0,
                x1,
                y1,
                stops: Vec::new(),
            },
            matrix: Matrix::IDENTITY,
            extend: Extend::Pad,
        }
    }

    /// A radial gradient with no stops yet.
    #[must_use]
    pub fn radial(x0: f64, y0: f64, r0: f64, x1: f64, y1: f64, r1: f64) -> Self {
        Self {
            kind: PatternKind::Radial {
                x0,
                y0,
                r0,
                x1,
                y1,
                r1,
                stops: Vec::new(),
            },
            matrix: Matrix::IDENTITY,
            extend: Extend::Pad,
        }
    }

    /// Append a stop to a gradient. Stops with equal offsets keep their
    /// insertion order. Does nothing for other patterns.
    pub fn add_color_stop(&mut self, offset: f64, color: Rgba) {
        if let PatternKind::Linear { stops, .. } | PatternKind::Radial { stops, .. } = &mut self.kind {
            let offset = offset.clamp(0.0, 1.0);
            let index = stops.partition_point(|s| s.offset <= offset);
            stops.insert(index, GradientStop { offset, color });
        }
    }

    /// The same pattern with a different extend mode.
    #[must_use]
    pub fn with_extend(mut self, extend: Extend) -> Self {
        self.extend = extend;
        self
    }

    /// The same pattern with a different matrix.
    #[must_use]
    pub fn with_matrix(mut self, matrix: Matrix) -> Self {
        self.matrix = matrix;
        self
    }
}

/// A 2D drawing target.
pub trait Canvas2D {
    /// Push the graphics state: matrix, source, line settings, fill rule and
    /// clip.
    fn save(&mut self);

    /// Pop the graphics state. Unbalanced calls are ignored.
    fn restore(&mut self);

    /// The current transformation matrix, user to device.
    fn matrix(&self) -> Matrix;

    /// Replace the current transformation matrix.
    fn set_matrix(&mut self, matrix: Matrix);

    /// Discard the current path and current point.
    fn new_path(&mut self);

    /// Start a new subpath without a current point, so the next segment
    /// does not connect to the previous one.
    fn new_sub_path(&mut self);

    /// Begin a new subpath at `(x, y)`.
    fn move_to(&mut self, x: f64, y: f64);

    /// Straight segment to `(x, y)`.
    fn line_to(&mut self, x: f64, y: f64);

    /// Cubic Bézier segment.
    fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64);

    /// Close the current subpath.
    fn close_path(&mut self);

    /// The current point in user space.
    fn current_point(&self) -> Option<(f64, f64)>;

    /// Set a solid source color.
    fn set_source_rgba(&mut self, color: Rgba);

    /// Set the source pattern.
    fn set_source(&mut self, pattern: Pattern);

    /// The current source.
    fn source(&self) -> Pattern;

    /// Stroke width in user units.
    fn set_line_width(&mut self, width: f64);

    /// The stroke width.
    fn line_width(&self) -> f64;

    /// End cap for strokes.
    fn set_line_cap(&mut self, cap: LineCap);

    /// Join for strokes.
    fn set_line_join(&mut self, join: LineJoin);

    /// Dash pattern for strokes; an empty slice turns dashing off.
    fn set_dash(&mut self, dashes: &[f64], offset: f64);

    /// Fill rule for `fill` and `clip`.
    fn set_fill_rule(&mut self, rule: FillRule);

    /// How drawing composites onto what is already there.
    fn set_blend_mode(&mut self, mode: BlendMode);

    /// Fill the current path with the source, then clear the path.
    fn fill(&mut self);

    /// Stroke the current path with the source, then clear the path.
    fn stroke(&mut self);

    /// Intersect the clip with the current path, then clear the path.
    fn clip(&mut self);

    /// User-space bounding box `(x1, y1, x2, y2)` of the clip. Without a
    /// clip this is the whole target.
    fn clip_extents(&self) -> (f64, f64, f64, f64);

    /// Paint the source everywhere inside the clip.
    fn paint(&mut self);

    /// Paint the source with extra opacity.
    fn paint_with_alpha(&mut self, alpha: f64);

    /// Paint the source through the alpha of `mask`.
    fn mask(&mut self, mask: &Pattern);

    /// Device pixels per user unit of the target, before any transform.
    fn device_scale(&self) -> (f64, f64);

    /// Draw into `surface` instead of this canvas and return it.
    ///
    /// Inside `draw`, user space coincides with this canvas's user space
    /// numbers: user point `p` lands on surface pixel
    /// `p * device_scale + device_offset`. The nested canvas starts with a
    /// black source, no clip beyond the surface and no current path, except
    /// that this canvas's current point carries over.
    fn render_layer(&mut self, surface: Surface, draw: &mut dyn FnMut(&mut dyn Canvas2D)) -> Surface;

    /// Paint the source through the alpha of `surface`, whose device origin
    /// sits at user position `(x, y)`.
    fn mask_surface(&mut self, surface: &Rc<Surface>, x: f64, y: f64) {
        self.mask(&Pattern::surface(Rc::clone(surface), x, y));
    }

    /// Use a surface as the source, its device origin at `(x, y)`.
    fn set_source_surface(&mut self, surface: &Rc<Surface>, x: f64, y: f64) {
        self.set_source(Pattern::surface(Rc::clone(surface), x, y));
    }

    /// Prepend a translation to the CTM.
    fn translate(&mut self, tx: f64, ty: f64) {
        let m = self.matrix().pre_translate(tx, ty);
        self.set_matrix(m);
    }

    /// Prepend a scale to the CTM.
    fn scale(&mut self, sx: f64, sy: f64) {
        let m = self.matrix().pre_scale(sx, sy);
        self.set_matrix(m);
    }

    /// Prepend a rotation to the CTM.
    fn rotate(&mut self, angle: f64) {
        let m = self.matrix().pre_rotate(angle);
        self.set_matrix(m);
    }

    /// Prepend an arbitrary transform to the CTM.
    fn transform(&mut self, op: &Matrix) {
        let m = self.matrix().pre(op);
        self.set_matrix(m);
    }

    /// Move relative to the current point.
    fn rel_move_to(&mut self, dx: f64, dy: f64) {
        let (x, y) = self.current_point().unwrap_or_default();
        self.move_to(x + dx, y + dy);
    }

    /// Line relative to the current point.
    fn rel_line_to(&mut self, dx: f64, dy: f64) {
        let (x, y) = self.current_point().unwrap_or_default();
        self.line_to(x + dx, y + dy);
    }

    /// Closed axis-aligned rectangle subpath.
    fn rectangle(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.move_to(x, y);
        self.rel_line_to(width, 0.0);
        self.rel_line_to(0.0, height);
        self.rel_line_to(-width, 0.0);
        self.close_path();
    }

    /// Circular arc around `(xc, yc)` in increasing angle direction. A line
    /// connects the current point to the arc's start.
    fn arc(&mut self, xc: f64, yc: f64, radius: f64, angle1: f64, mut angle2: f64) {
        if angle2 < angle1 {
            angle2 = (angle2 - angle1).rem_euclid(2.0 * PI) + angle1;
        }
        arc_path(self, xc, yc, radius, angle1, angle2);
    }

    /// Circular arc in decreasing angle direction.
    fn arc_negative(&mut self, xc: f64, yc: f64, radius: f64, angle1: f64, mut angle2: f64) {
        if angle2 > angle1 {
            angle2 = angle1 - (angle1 - angle2).rem_euclid(2.0 * PI);
        }
        arc_path(self, xc, yc, radius, angle1, angle2);
    }
}

/// Approximate an arc with cubic Béziers of at most a quarter turn each.
fn arc_path<C: Canvas2D + ?Sized>(canvas: &mut C, xc: f64, yc: f64, radius: f64, angle1: f64, angle2: f64) {
    if radius <= 0.0 {
        canvas.line_to(xc, yc);
        return;
    }
    canvas.line_to(xc + radius * angle1.cos(), yc + radius * angle1.sin());

    let sweep = angle2 - angle1;
    if sweep == 0.0 {
        return;
    }
    let segments = (sweep.abs() / FRAC_PI_2).ceil().max(1.0) as usize;
    let step = sweep / segments as f64;
    let handle = 4.0 / 3.0 * (step / 4.0).tan();

    let mut a = angle1;
    for _ in 0..segments {
        let b = a + step;
        let (sin_a, cos_a) = a.sin_cos();
        let (sin_b, cos_b) = b.sin_cos();
        canvas.curve_to(
            xc + radius * (cos_a - handle * sin_a),
            yc + radius * (sin_a + handle * cos_a),
            xc + radius * (cos_b + handle * sin_b),
            yc + radius * (sin_b - handle * cos_b),
            xc + radius * cos_b,
            yc + radius * sin_b,
        );
        a = b;
    }
}
