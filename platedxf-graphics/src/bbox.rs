//! Axis-aligned bounds of contours and path groups.
//!
//! Provides [`BoundingBox`] plus helpers for contours and path groups.

use crate::types::{Contour, PathGroup, Point, Scalar};

// ---------------------------------------------------------------------------
// BoundingBox
// ---------------------------------------------------------------------------

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: Scalar,
    pub min_y: Scalar,
    pub max_x: Scalar,
    pub max_y: Scalar,
}

impl BoundingBox {
    /// An empty (inverted) bounding box, the identity for [`Self::union`].
    pub const EMPTY: Self = Self {
        min_x: Scalar::INFINITY,
        min_y: Scalar::INFINITY,
        max_x: Scalar::NEG_INFINITY,
        max_y: Scalar::NEG_INFINITY,
    };

    /// The degenerate box at the origin, used for inputs with no points.
    pub const ZERO: Self = Self {
        min_x: 0.0,
        min_y: 0.0,
        max_x: 0.0,
        max_y: 0.0,
    };

    /// Bounds of a point set. Empty input yields [`Self::ZERO`].
    #[must_use]
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Self {
        points
            .into_iter()
            .fold(Self::EMPTY, |mut bb, p| {
                bb.include_point(*p);
                bb
            })
            .or_zero()
    }

    /// False for [`Self::EMPTY`] and anything else inverted.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min_x <= self.max_x && self.min_y <= self.max_y
    }

    /// This box, or [`Self::ZERO`] if it is empty.
    #[must_use]
    pub fn or_zero(self) -> Self {
        if self.is_valid() { self } else { Self::ZERO }
    }

    /// Horizontal extent; 0 when empty.
    #[must_use]
    pub fn width(&self) -> Scalar {
        let bb = self.or_zero();
        bb.max_x - bb.min_x
    }

    /// Vertical extent; 0 when empty.
    #[must_use]
    pub fn height(&self) -> Scalar {
        let bb = self.or_zero();
        bb.max_y - bb.min_y
    }

    /// Minimum corner.
    #[must_use]
    pub const fn min_point(&self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }

    pub const fn include_point(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    /// Grow to cover `other`. Empty boxes leave `self` unchanged.
    pub fn union(&mut self, other: &Self) {
        if other.is_valid() {
            self.min_x = self.min_x.min(other.min_x);
            self.min_y = self.min_y.min(other.min_y);
            self.max_x = self.max_x.max(other.max_x);
            self.max_y = self.max_y.max(other.max_y);
        }
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Bounding box of a single contour.
#[must_use]
pub fn contour_bbox(contour: &Contour) -> BoundingBox {
    BoundingBox::from_points(&contour.points)
}

/// Combined bounding box of the outer contours of `groups`.
///
/// Holes are ignored: they lie inside their outer shape by construction.
#[must_use]
pub fn outer_bbox(groups: &[PathGroup]) -> BoundingBox {
    BoundingBox::from_points(groups.iter().flat_map(|g| g.outer.points.iter()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[expect(
    clippy::float_cmp,
    reason = "exact float comparisons are intentional in tests"
)]
mod tests {
    use super::*;

    fn square(x0: Scalar, y0: Scalar, side: Scalar) -> Contour {
        Contour::new(vec![
            Point::new(x0, y0),
            Point::new(x0 + side, y0),
            Point::new(x0 + side, y0 + side),
            Point::new(x0, y0 + side),
            Point::new(x0, y0),
        ])
    }

    #[test]
    fn empty_box_has_zero_extent() {
        let bb = BoundingBox::EMPTY;
        assert!(!bb.is_valid());
        assert_eq!(bb.width(), 0.0);
        assert_eq!(bb.height(), 0.0);
    }

    #[test]
    fn empty_point_set_is_zero_box() {
        let none: [Point; 0] = [];
        assert_eq!(BoundingBox::from_points(&none), BoundingBox::ZERO);
        assert_eq!(outer_bbox(&[]), BoundingBox::ZERO);
    }

    #[test]
    fn include_point_grows_box() {
        let mut bb = BoundingBox::EMPTY;
        bb.include_point(Point::new(1.0, 2.0));
        bb.include_point(Point::new(5.0, 8.0));
        assert!(bb.is_valid());
        assert_eq!(bb.min_point(), Point::new(1.0, 2.0));
        assert_eq!(bb.width(), 4.0);
        assert_eq!(bb.height(), 6.0);
    }

    #[test]
    fn contains_is_inclusive() {
        let bb = contour_bbox(&square(0.0, 0.0, 10.0));
        assert!(bb.contains(Point::new(0.0, 0.0)));
        assert!(bb.contains(Point::new(10.0, 5.0)));
        assert!(!bb.contains(Point::new(10.5, 5.0)));
    }

    #[test]
    fn outer_bbox_ignores_holes() {
        let mut group = PathGroup::new(square(0.0, 0.0, 10.0));
        let mut stray = square(50.0, 50.0, 1.0);
        stray.is_hole = true;
        group.holes.push(stray);
        let bb = outer_bbox(&[group, PathGroup::new(square(20.0, -5.0, 5.0))]);
        assert_eq!(bb.min_x, 0.0);
        assert_eq!(bb.min_y, -5.0);
        assert_eq!(bb.max_x, 25.0);
        assert_eq!(bb.max_y, 10.0);
    }

    #[test]
    fn union_skips_empty_boxes() {
        let mut bb1 = contour_bbox(&square(0.0, 0.0, 5.0));
        bb1.union(&contour_bbox(&square(3.0, 3.0, 7.0)));
        bb1.union(&BoundingBox::EMPTY);
        assert_eq!(bb1.min_x, 0.0);
        assert_eq!(bb1.max_x, 10.0);
    }
}
