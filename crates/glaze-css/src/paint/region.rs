//! Sets of pixels as lists of disjoint integer rectangles.
//!
//! Blurred shadows are painted in pieces (corners, sides, interior) and each
//! piece must only touch pixels no earlier piece touched. The region tracks
//! what is still unpainted.

use crate::geometry::IntRect;

use super::Canvas2D;

/// A union of non-overlapping rectangles.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Region {
    rects: Vec<IntRect>,
}

impl Region {
    /// A region covering exactly `rect`.
    #[must_use]
    pub fn from_rect(rect: IntRect) -> Self {
        let rects = if rect.is_empty() { Vec::new() } else { vec![rect] };
        Self { rects }
    }

    /// Whether the region covers no pixels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// The rectangles making up the region.
    #[must_use]
    pub fn rects(&self) -> &[IntRect] {
        &self.rects
    }

    /// Number of pixels covered.
    #[must_use]
    pub fn area(&self) -> i64 {
        self.rects
            .iter()
            .map(|r| i64::from(r.width) * i64::from(r.height))
            .sum()
    }

    /// Remove `cut` from the region. Each rectangle overlapping `cut` is
    /// split into up to four bands around the overlap.
    pub fn subtract_rect(&mut self, cut: IntRect) {
        if cut.is_empty() {
            return;
        }
        let mut rects = Vec::with_capacity(self.rects.len() + 3);
        for r in self.rects.drain(..) {
            let overlap = r.intersect(&cut);
            if overlap.is_empty() {
                rects.push(r);
                continue;
            }
            let bands = [
                IntRect::new(r.x, r.y, r.width, overlap.y - r.y),
                IntRect::new(r.x, overlap.bottom(), r.width, r.bottom() - overlap.bottom()),
                IntRect::new(r.x, overlap.y, overlap.x - r.x, overlap.height),
                IntRect::new(
                    overlap.right(),
                    overlap.y,
                    r.right() - overlap.right(),
                    overlap.height,
                ),
            ];
            rects.extend(bands.into_iter().filter(|b| !b.is_empty()));
        }
        self.rects = rects;
    }

    /// Add every rectangle of the region to the canvas path.
    pub fn path(&self, canvas: &mut dyn Canvas2D) {
        for r in &self.rects {
            canvas.rectangle(
                f64::from(r.x),
                f64::from(r.y),
                f64::from(r.width),
                f64::from(r.height),
            );
        }
    }

    /// Intersect the canvas clip with the region.
    pub fn clip(&self, canvas: &mut dyn Canvas2D) {
        canvas.new_path();
        self.path(canvas);
        canvas.clip();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subtract_center_leaves_frame() {
        let mut region = Region::from_rect(IntRect::new(0, 0, 10, 10));
        region.subtract_rect(IntRect::new(2, 2, 6, 6));
        assert_eq!(region.rects().len(), 4);
        assert_eq!(region.area(), 100 - 36);
    }

    #[test]
    fn test_subtract_everything() {
        let mut region = Region::from_rect(IntRect::new(0, 0, 4, 4));
        region.subtract_rect(IntRect::new(-1, -1, 10, 10));
        assert!(region.is_empty());
    }

    #[test]
    fn test_subtract_disjoint_is_noop() {
        let mut region = Region::from_rect(IntRect::new(0, 0, 4, 4));
        region.subtract_rect(IntRect::new(10, 10, 2, 2));
        assert_eq!(region.rects(), &[IntRect::new(0, 0, 4, 4)]);
    }
}
