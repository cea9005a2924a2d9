//! Core types shared across the `PlateDXF` pipeline.
//!
//! Glyph outlines enter the pipeline in the layout frame, where Y points
//! **down** (the text-layout convention). The DXF writer is the only place
//! that flips Y back.

pub use kurbo::{Point, Vec2};

// ---------------------------------------------------------------------------
// Scalar
// ---------------------------------------------------------------------------

/// All geometry is carried in `f64` to match `kurbo`.
pub type Scalar = f64;

/// Tolerance for floating-point comparisons.
pub const EPSILON: Scalar = 1.0 / 65536.0;

// ---------------------------------------------------------------------------
// DrawCommand
// ---------------------------------------------------------------------------

/// One path-drawing command of a glyph outline stream.
///
/// Curve variants carry their control points first and the end point last;
/// the start point is implicit (the last point of the open contour).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    MoveTo(Point),
    LineTo(Point),
    /// Quadratic Bezier: control, end.
    QuadTo(Point, Point),
    /// Cubic Bezier: first control, second control, end.
    CubicTo(Point, Point, Point),
    Close,
}

impl DrawCommand {
    /// Short name used in diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::MoveTo(_) => "MoveTo",
            Self::LineTo(_) => "LineTo",
            Self::QuadTo(..) => "QuadTo",
            Self::CubicTo(..) => "CubicTo",
            Self::Close => "Close",
        }
    }
}

// ---------------------------------------------------------------------------
// Contour
// ---------------------------------------------------------------------------

/// A polygonal approximation of one glyph sub-path.
///
/// Closed contours repeat their first point at the end. `is_hole` is
/// `false` until the classifier has run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contour {
    pub points: Vec<Point>,
    pub is_hole: bool,
}

impl Contour {
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self {
            points,
            is_hole: false,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether the contour ends where it starts.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => self.points.len() > 1 && first == last,
            _ => false,
        }
    }

    /// Copy of this contour moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            points: self.points.iter().map(|&p| p + offset).collect(),
            is_hole: self.is_hole,
        }
    }
}

// ---------------------------------------------------------------------------
// PathGroup
// ---------------------------------------------------------------------------

/// An outer shape together with the holes assigned to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathGroup {
    pub outer: Contour,
    pub holes: Vec<Contour>,
}

impl PathGroup {
    #[must_use]
    pub const fn new(outer: Contour) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    /// The outer contour followed by its holes, in assignment order.
    pub fn contours(&self) -> impl Iterator<Item = &Contour> {
        std::iter::once(&self.outer).chain(self.holes.iter())
    }

    /// Apply `f` to every point of the outer contour and all holes.
    #[must_use]
    pub fn map_points(self, f: impl Fn(Point) -> Point) -> Self {
        let map = |c: Contour| Contour {
            points: c.points.into_iter().map(&f).collect(),
            is_hole: c.is_hole,
        };
        Self {
            outer: map(self.outer),
            holes: self.holes.into_iter().map(map).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contour_closed_detection() {
        let open = Contour::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)]);
        assert!(!open.is_closed());
        let closed = Contour::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 0.0),
        ]);
        assert!(closed.is_closed());
        assert!(!Contour::new(vec![Point::new(0.0, 0.0)]).is_closed());
        assert!(!Contour::default().is_closed());
    }

    #[test]
    fn group_contours_lists_outer_first() {
        let mut group = PathGroup::new(Contour::new(vec![Point::new(0.0, 0.0)]));
        let mut hole = Contour::new(vec![Point::new(1.0, 1.0)]);
        hole.is_hole = true;
        group.holes.push(hole);
        let flags: Vec<bool> = group.contours().map(|c| c.is_hole).collect();
        assert_eq!(flags, vec![false, true]);
    }

    #[test]
    fn map_points_keeps_hole_flags() {
        let mut hole = Contour::new(vec![Point::new(1.0, 1.0)]);
        hole.is_hole = true;
        let group = PathGroup {
            outer: Contour::new(vec![Point::new(2.0, 3.0)]),
            holes: vec![hole],
        };
        let moved = group.map_points(|p| Point::new(p.x * 2.0, p.y * 2.0));
        assert_eq!(moved.outer.points[0], Point::new(4.0, 6.0));
        assert_eq!(moved.holes[0].points[0], Point::new(2.0, 2.0));
        assert!(moved.holes[0].is_hole);
    }

    #[test]
    fn translated_contour() {
        let c = Contour::new(vec![Point::new(1.0, 2.0)]);
        let t = c.translated(Vec2::new(0.5, -1.0));
        assert_eq!(t.points[0], Point::new(1.5, 1.0));
    }
}
