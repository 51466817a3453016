//! Rectangles with elliptical corners: radius clamping, growing and
//! shrinking, and the paths borders and backgrounds are drawn along.

use core::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use super::{CornerPos, JunctionSides, Rect, Side};
use crate::paint::Canvas2D;
use crate::style::ComputedStyle;
use crate::values::StyleValue;

/// Horizontal and vertical radius of one corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CornerRadius {
    /// Radius along the x axis.
    pub horizontal: f64,
    /// Radius along the y axis.
    pub vertical: f64,
}

impl CornerRadius {
    /// Create a corner radius.
    #[must_use]
    pub const fn new(horizontal: f64, vertical: f64) -> Self {
        Self {
            horizontal,
            vertical,
        }
    }
}

/// A rectangle with elliptical corners.
///
/// [CSS Backgrounds § 5.1](https://www.w3.org/TR/css-backgrounds-3/#border-radius)
///
/// Corners are indexed by [`CornerPos`]. A corner with a zero radius on
/// either axis is drawn square.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RoundedBox {
    /// The rectangle.
    pub rect: Rect,
    /// Corner radii, clockwise from the top left.
    pub corner: [CornerRadius; 4],
}

impl RoundedBox {
    /// A box with square corners.
    #[must_use]
    pub fn init_rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            rect: Rect::new(x, y, width, height),
            corner: [CornerRadius::default(); 4],
        }
    }

    /// The radius of one corner.
    #[must_use]
    pub const fn corner(&self, pos: CornerPos) -> CornerRadius {
        self.corner[pos as usize]
    }

    /// "Let f = min(Li/Si), where i ∈ {top, right, bottom, left}, Si is the
    /// sum of the two corresponding radii of the corners on side i, and
    /// Ltop = Lbottom = the width of the box, and Lleft = Lright = the
    /// height of the box. If f < 1, then all corner radii are reduced by
    /// multiplying them by f."
    fn clamp_border_radius(&mut self) {
        let [tl, tr, br, bl] = self.corner;
        let mut factor: f64 = 1.0;
        for (sum, length) in [
            (tl.horizontal + tr.horizontal, self.rect.width),
            (tr.vertical + br.vertical, self.rect.height),
            (br.horizontal + bl.horizontal, self.rect.width),
            (tl.vertical + bl.vertical, self.rect.height),
        ] {
            if sum != 0.0 {
                factor = factor.min(length / sum);
            }
        }
        for corner in &mut self.corner {
            corner.horizontal *= factor;
            corner.vertical *= factor;
        }
    }

    /// Set radii from four corner values, leaving the corners named in
    /// `junction` square.
    pub fn apply_border_radius(&mut self, corners: [&StyleValue; 4], junction: JunctionSides) {
        let junction_bits = [
            JunctionSides::CORNER_TOPLEFT,
            JunctionSides::CORNER_TOPRIGHT,
            JunctionSides::CORNER_BOTTOMRIGHT,
            JunctionSides::CORNER_BOTTOMLEFT,
        ];
        for ((radius, value), bit) in self.corner.iter_mut().zip(corners).zip(junction_bits) {
            if junction.contains(bit) {
                continue;
            }
            if let Some(c) = value.as_corner() {
                *radius = CornerRadius::new(c.x(self.rect.width), c.y(self.rect.height));
            }
        }
        self.clamp_border_radius();
    }

    /// Apply the four `border-*-radius` properties.
    pub fn apply_border_radius_for_style(&mut self, style: &ComputedStyle, junction: JunctionSides) {
        self.apply_border_radius(style.border_radii(), junction);
    }

    /// Apply the four `-glaze-outline-*-radius` properties.
    pub fn apply_outline_radius_for_style(&mut self, style: &ComputedStyle, junction: JunctionSides) {
        self.apply_border_radius(style.outline_radii(), junction);
    }

    /// Move each side outwards by the given amount, adjusting the radii of
    /// rounded corners with it. A negative total that would invert the box
    /// collapses it to zero size, split proportionally between the sides.
    pub fn grow(&mut self, top: f64, right: f64, bottom: f64, left: f64) {
        if self.rect.width + left + right < 0.0 {
            self.rect.x -= left * self.rect.width / (left + right);
            self.rect.width = 0.0;
        } else {
            self.rect.x -= left;
            self.rect.width += left + right;
        }

        if self.rect.height + top + bottom < 0.0 {
            self.rect.y -= top * self.rect.height / (top + bottom);
            self.rect.height = 0.0;
        } else {
            self.rect.y -= top;
            self.rect.height += top + bottom;
        }

        let adjust = |radius: &mut f64, amount: f64| {
            if *radius != 0.0 {
                *radius = (*radius + amount).max(0.0);
            }
        };
        let [tl, tr, br, bl] = &mut self.corner;
        adjust(&mut tl.horizontal, left);
        adjust(&mut tl.vertical, top);
        adjust(&mut tr.horizontal, right);
        adjust(&mut tr.vertical, top);
        adjust(&mut br.horizontal, right);
        adjust(&mut br.vertical, bottom);
        adjust(&mut bl.horizontal, left);
        adjust(&mut bl.vertical, bottom);
    }

    /// Move each side inwards. Radii shrink with the sides but never go
    /// below zero, and never exceed half of the shrunk side they run along.
    pub fn shrink(&mut self, top: f64, right: f64, bottom: f64, left: f64) {
        self.grow(-top, -right, -bottom, -left);
        let (half_width, half_height) = (self.rect.width / 2.0, self.rect.height / 2.0);
        for corner in &mut self.corner {
            corner.horizontal = corner.horizontal.min(half_width);
            corner.vertical = corner.vertical.min(half_height);
        }
    }

    /// Translate the box.
    pub fn move_by(&mut self, dx: f64, dy: f64) {
        self.rect.x += dx;
        self.rect.y += dy;
    }

    /// Approximate length of one side including half of each adjacent
    /// corner arc. Used to fit dash patterns.
    #[must_use]
    pub fn guess_length(&self, side: Side) -> f64 {
        let before = self.corner[side as usize];
        let after = self.corner[(side as usize + 1) % 4];

        let straight = match side {
            Side::Right | Side::Left => self.rect.height - before.vertical - after.vertical,
            Side::Top | Side::Bottom => self.rect.width - before.horizontal - after.horizontal,
        };
        straight
            + PI * 0.125
                * (before.horizontal + before.vertical + after.horizontal + after.vertical)
    }

    fn center(&self, pos: CornerPos) -> (f64, f64) {
        let c = self.corner(pos);
        let r = &self.rect;
        match pos {
            CornerPos::TopLeft => (r.x + c.horizontal, r.y + c.vertical),
            CornerPos::TopRight => (r.right() - c.horizontal, r.y + c.vertical),
            CornerPos::BottomRight => (r.right() - c.horizontal, r.bottom() - c.vertical),
            CornerPos::BottomLeft => (r.x + c.horizontal, r.bottom() - c.vertical),
        }
    }

    fn corner_arc(&self, canvas: &mut dyn Canvas2D, pos: CornerPos, angle1: f64, angle2: f64) {
        let (x, y) = self.center(pos);
        let c = self.corner(pos);
        ellipsis(canvas, x, y, c.horizontal, c.vertical, angle1, angle2, false);
    }

    fn corner_arc_negative(&self, canvas: &mut dyn Canvas2D, pos: CornerPos, angle1: f64, angle2: f64) {
        let (x, y) = self.center(pos);
        let c = self.corner(pos);
        ellipsis(canvas, x, y, c.horizontal, c.vertical, angle1, angle2, true);
    }

    /// Add the closed outline of the box to the current path.
    pub fn path(&self, canvas: &mut dyn Canvas2D) {
        canvas.new_sub_path();
        self.corner_arc(canvas, CornerPos::TopLeft, PI, 3.0 * FRAC_PI_2);
        self.corner_arc(canvas, CornerPos::TopRight, -FRAC_PI_2, 0.0);
        self.corner_arc(canvas, CornerPos::BottomRight, 0.0, FRAC_PI_2);
        self.corner_arc(canvas, CornerPos::BottomLeft, FRAC_PI_2, PI);
        canvas.close_path();
    }

    /// Add the open path along one side, from the middle of its first
    /// corner arc to the middle of its last.
    pub fn path_side(&self, canvas: &mut dyn Canvas2D, side: Side) {
        match side {
            Side::Top => {
                self.corner_arc(canvas, CornerPos::TopLeft, 5.0 * FRAC_PI_4, 3.0 * FRAC_PI_2);
                self.corner_arc(canvas, CornerPos::TopRight, -FRAC_PI_2, -FRAC_PI_4);
            }
            Side::Right => {
                self.corner_arc(canvas, CornerPos::TopRight, -FRAC_PI_4, 0.0);
                self.corner_arc(canvas, CornerPos::BottomRight, 0.0, FRAC_PI_4);
            }
            Side::Bottom => {
                self.corner_arc(canvas, CornerPos::BottomRight, FRAC_PI_4, FRAC_PI_2);
                self.corner_arc(canvas, CornerPos::BottomLeft, FRAC_PI_2, 3.0 * FRAC_PI_4);
            }
            Side::Left => {
                self.corner_arc(canvas, CornerPos::BottomLeft, 3.0 * FRAC_PI_4, PI);
                self.corner_arc(canvas, CornerPos::TopLeft, PI, 5.0 * FRAC_PI_4);
            }
        }
    }

    /// Add the closed region between `outer` and `inner` that belongs to
    /// one side. Corners are split along their diagonal unless the
    /// neighboring side has no width, in which case this side takes the
    /// whole corner. Adds nothing when this side has no width.
    pub fn path_quadrant(outer: &Self, inner: &Self, canvas: &mut dyn Canvas2D, side: Side) {
        let (o, i) = (&outer.rect, &inner.rect);
        let top_flush = o.y == i.y;
        let right_flush = o.right() == i.right();
        let bottom_flush = o.bottom() == i.bottom();
        let left_flush = o.x == i.x;

        let (first, second, start, middle, end) = match side {
            Side::Top => {
                if top_flush {
                    return;
                }
                (
                    CornerPos::TopLeft,
                    CornerPos::TopRight,
                    if left_flush { PI } else { 5.0 * FRAC_PI_4 },
                    3.0 * FRAC_PI_2,
                    if right_flush { 0.0 } else { 7.0 * FRAC_PI_4 },
                )
            }
            Side::Right => {
                if right_flush {
                    return;
                }
                (
                    CornerPos::TopRight,
                    CornerPos::BottomRight,
                    if top_flush { 3.0 * FRAC_PI_2 } else { 7.0 * FRAC_PI_4 },
                    0.0,
                    if bottom_flush { FRAC_PI_2 } else { FRAC_PI_4 },
                )
            }
            Side::Bottom => {
                if bottom_flush {
                    return;
                }
                (
                    CornerPos::BottomRight,
                    CornerPos::BottomLeft,
                    if right_flush { 0.0 } else { FRAC_PI_4 },
                    FRAC_PI_2,
                    if left_flush { PI } else { 3.0 * FRAC_PI_4 },
                )
            }
            Side::Left => {
                if left_flush {
                    return;
                }
                (
                    CornerPos::BottomLeft,
                    CornerPos::TopLeft,
                    if bottom_flush { FRAC_PI_2 } else { 3.0 * FRAC_PI_4 },
                    PI,
                    if top_flush { 3.0 * FRAC_PI_2 } else { 5.0 * FRAC_PI_4 },
                )
            }
        };

        canvas.new_sub_path();
        outer.corner_arc(canvas, first, start, middle);
        outer.corner_arc(canvas, second, middle, end);
        inner.corner_arc_negative(canvas, second, end, middle);
        inner.corner_arc_negative(canvas, first, middle, start);
        canvas.close_path();
    }

    /// Add the bounding rectangle of the box to the current path.
    pub fn clip_path(&self, canvas: &mut dyn Canvas2D) {
        canvas.rectangle(self.rect.x, self.rect.y, self.rect.width, self.rect.height);
    }

    /// Whether the rectangle `x1,y1 – x2,y2` touches the box's bounds.
    #[must_use]
    pub fn intersects_rectangle(&self, x1: f64, y1: f64, x2: f64, y2: f64) -> bool {
        !(x2 < self.rect.x || y2 < self.rect.y || x1 >= self.rect.right() || y1 >= self.rect.bottom())
    }

    /// Whether the rectangle `x1,y1 – x2,y2` lies inside the box, corners
    /// included.
    #[must_use]
    pub fn contains_rectangle(&self, x1: f64, y1: f64, x2: f64, y2: f64) -> bool {
        if x1 < self.rect.x || y1 < self.rect.y || x2 > self.rect.right() || y2 > self.rect.bottom() {
            return false;
        }
        [
            (CornerPos::TopLeft, x1, y1),
            (CornerPos::TopRight, x2, y1),
            (CornerPos::BottomRight, x2, y2),
            (CornerPos::BottomLeft, x1, y2),
        ]
        .into_iter()
        .all(|(pos, x, y)| self.corner_contains(pos, x, y))
    }

    /// Whether a point near `pos` is inside that corner's ellipse. Points
    /// outside the corner's bounding square always pass.
    fn corner_contains(&self, pos: CornerPos, x: f64, y: f64) -> bool {
        let c = self.corner(pos);
        if c.horizontal <= 0.0 || c.vertical <= 0.0 {
            return true;
        }
        let (cx, cy) = self.center(pos);
        let outside_x = match pos {
            CornerPos::TopLeft | CornerPos::BottomLeft => x < cx,
            CornerPos::TopRight | CornerPos::BottomRight => x > cx,
        };
        let outside_y = match pos {
            CornerPos::TopLeft | CornerPos::TopRight => y < cy,
            CornerPos::BottomRight | CornerPos::BottomLeft => y > cy,
        };
        if !(outside_x && outside_y) {
            return true;
        }
        let dx = (x - cx) / c.horizontal;
        let dy = (y - cy) / c.vertical;
        dx * dx + dy * dy <= 1.0
    }
}

/// An elliptical arc around `(xc, yc)`. Degenerate radii become a single
/// line to the center.
#[allow(clippy::too_many_arguments)]
fn ellipsis(
    canvas: &mut dyn Canvas2D,
    xc: f64,
    yc: f64,
    xradius: f64,
    yradius: f64,
    angle1: f64,
    angle2: f64,
    negative: bool,
) {
    if xradius <= 0.0 || yradius <= 0.0 {
        canvas.line_to(xc, yc);
        return;
    }
    let saved = canvas.matrix();
    canvas.translate(xc, yc);
    canvas.scale(xradius, yradius);
    if negative {
        canvas.arc_negative(0.0, 0.0, 1.0, angle1, angle2);
    } else {
        canvas.arc(0.0, 0.0, 1.0, angle1, angle2);
    }
    canvas.set_matrix(saved);
}
