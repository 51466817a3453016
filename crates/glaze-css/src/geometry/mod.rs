//! Rectangles, affine matrices, box sides and rounded boxes.

mod rounded_box;

use bitflags::bitflags;
use strum_macros::{Display, EnumIter};

pub use rounded_box::{CornerRadius, RoundedBox};

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Create a rectangle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Whether the rectangle covers no area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// An integer pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct IntRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub width: i32,
    /// Height.
    pub height: i32,
}

impl IntRect {
    /// Create a rectangle.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The smallest integer rectangle covering the extents `x1,y1 – x2,y2`.
    #[must_use]
    pub fn covering(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let left = x1.floor() as i32;
        let top = y1.floor() as i32;
        let right = x2.ceil() as i32;
        let bottom = y2.ceil() as i32;
        Self::new(left, top, (right - left).max(0), (bottom - top).max(0))
    }

    /// Whether the rectangle covers no pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Right edge.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// The overlap of two rectangles, or an empty rectangle.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            Self::default()
        } else {
            Self::new(x, y, right - x, bottom - y)
        }
    }

    /// The smallest rectangle containing both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Self::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }
}

/// A 2D affine transform in the `xx, yx, xy, yy, x0, y0` layout:
/// `x' = xx·x + xy·y + x0`, `y' = yx·x + yy·y + y0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    /// X scale component.
    pub xx: f64,
    /// Y shear component.
    pub yx: f64,
    /// X shear component.
    pub xy: f64,
    /// Y scale component.
    pub yy: f64,
    /// X translation.
    pub x0: f64,
    /// Y translation.
    pub y0: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    /// The identity transform.
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    /// Create a matrix from its components.
    #[must_use]
    pub const fn new(xx: f64, yx: f64, xy: f64, yy: f64, x0: f64, y0: f64) -> Self {
        Self {
            xx,
            yx,
            xy,
            yy,
            x0,
            y0,
        }
    }

    /// A pure translation.
    #[must_use]
    pub const fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// A pure scale.
    #[must_use]
    pub const fn scaling(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// A rotation by `angle` radians.
    #[must_use]
    pub fn rotation(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::new(c, s, -s, c, 0.0, 0.0)
    }

    /// `self` applied after `first`: the result maps a point through `first`
    /// and then through `self`.
    #[must_use]
    pub fn after(&self, first: &Self) -> Self {
        Self::new(
            first.xx * self.xx + first.yx * self.xy,
            first.xx * self.yx + first.yx * self.yy,
            first.xy * self.xx + first.yy * self.xy,
            first.xy * self.yx + first.yy * self.yy,
            first.x0 * self.xx + first.y0 * self.xy + self.x0,
            first.x0 * self.yx + first.y0 * self.yy + self.y0,
        )
    }

    /// Prepend a translation, as `cairo_matrix_translate` does.
    #[must_use]
    pub fn pre_translate(&self, tx: f64, ty: f64) -> Self {
        self.pre(&Self::translation(tx, ty))
    }

    /// Prepend a scale.
    #[must_use]
    pub fn pre_scale(&self, sx: f64, sy: f64) -> Self {
        self.pre(&Self::scaling(sx, sy))
    }

    /// Prepend a rotation.
    #[must_use]
    pub fn pre_rotate(&self, angle: f64) -> Self {
        self.pre(&Self::rotation(angle))
    }

    /// Prepend `op`: the result applies `op` first, then `self`.
    #[must_use]
    pub fn pre(&self, op: &Self) -> Self {
        self.after(op)
    }

    /// Transform a point.
    #[must_use]
    pub fn transform_point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.xx * x + self.xy * y + self.x0,
            self.yx * x + self.yy * y + self.y0,
        )
    }

    /// Transform a distance vector (no translation).
    #[must_use]
    pub fn transform_distance(&self, dx: f64, dy: f64) -> (f64, f64) {
        (self.xx * dx + self.xy * dy, self.yx * dx + self.yy * dy)
    }

    /// The inverse transform, if the matrix is invertible.
    #[must_use]
    pub fn invert(&self) -> Option<Self> {
        let det = self.xx * self.yy - self.yx * self.xy;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let xx = self.yy / det;
        let yx = -self.yx / det;
        let xy = -self.xy / det;
        let yy = self.xx / det;
        Some(Self::new(
            xx,
            yx,
            xy,
            yy,
            -(xx * self.x0 + xy * self.y0),
            -(yx * self.x0 + yy * self.y0),
        ))
    }
}

/// A side of a box, in CSS order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum Side {
    /// Top side.
    Top = 0,
    /// Right side.
    Right = 1,
    /// Bottom side.
    Bottom = 2,
    /// Left side.
    Left = 3,
}

impl Side {
    /// All sides in CSS order.
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    /// The matching [`SideFlags`] bit.
    #[must_use]
    pub const fn flag(self) -> SideFlags {
        match self {
            Self::Top => SideFlags::TOP,
            Self::Right => SideFlags::RIGHT,
            Self::Bottom => SideFlags::BOTTOM,
            Self::Left => SideFlags::LEFT,
        }
    }
}

/// A corner of a box, clockwise from the top left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum CornerPos {
    /// Top left.
    TopLeft = 0,
    /// Top right.
    TopRight = 1,
    /// Bottom right.
    BottomRight = 2,
    /// Bottom left.
    BottomLeft = 3,
}

impl CornerPos {
    /// All corners, clockwise from the top left.
    pub const ALL: [Self; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomRight,
        Self::BottomLeft,
    ];
}

bitflags! {
    /// A set of box sides.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SideFlags: u8 {
        /// Top side.
        const TOP = 1 << 0;
        /// Right side.
        const RIGHT = 1 << 1;
        /// Bottom side.
        const BOTTOM = 1 << 2;
        /// Left side.
        const LEFT = 1 << 3;
    }
}

bitflags! {
    /// Corners where a widget is flush with a neighbor. Those corners are
    /// drawn square so that adjacent widgets meet without a gap.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct JunctionSides: u8 {
        /// Top left corner.
        const CORNER_TOPLEFT = 1 << 0;
        /// Top right corner.
        const CORNER_TOPRIGHT = 1 << 1;
        /// Bottom left corner.
        const CORNER_BOTTOMLEFT = 1 << 2;
        /// Bottom right corner.
        const CORNER_BOTTOMRIGHT = 1 << 3;
        /// Both top corners.
        const TOP = Self::CORNER_TOPLEFT.bits() | Self::CORNER_TOPRIGHT.bits();
        /// Both bottom corners.
        const BOTTOM = Self::CORNER_BOTTOMLEFT.bits() | Self::CORNER_BOTTOMRIGHT.bits();
        /// Both left corners.
        const LEFT = Self::CORNER_TOPLEFT.bits() | Self::CORNER_BOTTOMLEFT.bits();
        /// Both right corners.
        const RIGHT = Self::CORNER_TOPRIGHT.bits() | Self::CORNER_BOTTOMRIGHT.bits();
    }
}
