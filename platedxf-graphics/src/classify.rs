//! Outer-shape / hole classification and hole-to-outer grouping.
//!
//! Winding is measured with the shoelace-style sum
//! `Σ (x[i+1] - x[i]) · (y[i+1] + y[i])` taken around the closed vertex
//! ring. A positive sum marks a hole. With Y pointing down (the layout
//! frame), this matches TrueType's outer-clockwise convention.
//!
//! Holes are attached to the first outer shape whose bounding box contains
//! the hole's first vertex. This is a box test, not point-in-polygon: a hole
//! whose first vertex falls inside several boxes goes to the earliest one,
//! and a hole inside none is left unassigned.

use log::{debug, warn};

use crate::bbox::{BoundingBox, contour_bbox};
use crate::types::{Contour, PathGroup, Point, Scalar};

/// Signed winding sum over the vertex ring, including the closing edge.
///
/// For a closed contour (first point repeated at the end) the closing edge
/// is zero-length and contributes nothing.
#[must_use]
pub fn winding_sum(points: &[Point]) -> Scalar {
    let n = points.len();
    (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            (b.x - a.x) * (b.y + a.y)
        })
        .sum()
}

/// Whether a vertex ring winds as a hole.
#[must_use]
pub fn is_hole(points: &[Point]) -> bool {
    winding_sum(points) > 0.0
}

/// Tag every contour with its winding classification.
#[must_use]
pub fn classify(contours: Vec<Contour>) -> Vec<Contour> {
    contours
        .into_iter()
        .map(|mut c| {
            c.is_hole = is_hole(&c.points);
            c
        })
        .collect()
}

/// Result of grouping classified contours.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grouping {
    /// One group per outer contour, in input order.
    pub groups: Vec<PathGroup>,
    /// Holes whose first vertex lies in no outer bounding box.
    pub orphans: Vec<Contour>,
    /// Number of holes whose first vertex matched more than one outer box.
    pub ambiguous: usize,
}

/// Associate holes with outer shapes by first-match bounding-box test.
///
/// Never fails: zero matches leaves the hole in [`Grouping::orphans`],
/// multiple matches take the first and are counted in
/// [`Grouping::ambiguous`].
#[must_use]
pub fn group(contours: Vec<Contour>) -> Grouping {
    let (holes, outers): (Vec<Contour>, Vec<Contour>) =
        contours.into_iter().partition(|c| c.is_hole);

    let boxes: Vec<BoundingBox> = outers.iter().map(contour_bbox).collect();
    let mut grouping = Grouping {
        groups: outers.into_iter().map(PathGroup::new).collect(),
        ..Grouping::default()
    };

    for hole in holes {
        let Some(&probe) = hole.points.first() else {
            grouping.orphans.push(hole);
            continue;
        };
        let mut matches = boxes
            .iter()
            .enumerate()
            .filter(|(_, bb)| bb.contains(probe))
            .map(|(i, _)| i);
        match (matches.next(), matches.next()) {
            (Some(first), second) => {
                if second.is_some() {
                    grouping.ambiguous += 1;
                    debug!("hole at {probe:?} matches several outer boxes; keeping outer {first}");
                }
                grouping.groups[first].holes.push(hole);
            }
            (None, _) => {
                warn!("hole at {probe:?} lies in no outer bounding box; left unassigned");
                grouping.orphans.push(hole);
            }
        }
    }

    grouping
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Square ring in layout (Y-down) coordinates, closed.
    fn ring(x0: Scalar, y0: Scalar, side: Scalar, clockwise_on_screen: bool) -> Vec<Point> {
        let mut pts = vec![
            Point::new(x0, y0),
            Point::new(x0 + side, y0),
            Point::new(x0 + side, y0 + side),
            Point::new(x0, y0 + side),
        ];
        if !clockwise_on_screen {
            pts.reverse();
        }
        pts.push(pts[0]);
        pts
    }

    fn contour(points: Vec<Point>) -> Contour {
        Contour::new(points)
    }

    #[test]
    fn sign_convention_is_pinned() {
        // Screen-clockwise with Y down: right along the top, down the right
        // side. The sum is negative, so this is an outer shape.
        let outer = ring(0.0, 0.0, 10.0, true);
        assert!((winding_sum(&outer) + 200.0).abs() < 1e-9);
        assert!(!is_hole(&outer));
        let hole = ring(0.0, 0.0, 10.0, false);
        assert!((winding_sum(&hole) - 200.0).abs() < 1e-9);
        assert!(is_hole(&hole));
    }

    #[test]
    fn sign_is_stable_under_rotation() {
        let base = [
            Point::new(0.0, 0.0),
            Point::new(7.0, 1.0),
            Point::new(9.0, 6.0),
            Point::new(3.0, 8.0),
            Point::new(-2.0, 4.0),
        ];
        let expected = is_hole(&base);
        for shift in 0..base.len() {
            let mut rotated = base.to_vec();
            rotated.rotate_left(shift);
            assert_eq!(is_hole(&rotated), expected, "rotation {shift}");
            // Closing the rotated ring does not change the answer either.
            rotated.push(rotated[0]);
            assert_eq!(is_hole(&rotated), expected, "closed rotation {shift}");
        }
    }

    #[test]
    fn degenerate_rings_are_not_holes() {
        assert!(!is_hole(&[]));
        assert!(!is_hole(&[Point::new(1.0, 1.0)]));
    }

    #[test]
    fn classify_tags_each_contour() {
        let classified = classify(vec![
            contour(ring(0.0, 0.0, 10.0, true)),
            contour(ring(2.0, 2.0, 3.0, false)),
        ]);
        assert!(!classified[0].is_hole);
        assert!(classified[1].is_hole);
    }

    #[test]
    fn hole_goes_to_enclosing_outer() {
        let grouping = group(classify(vec![
            contour(ring(0.0, 0.0, 10.0, true)),
            contour(ring(20.0, 0.0, 10.0, true)),
            contour(ring(22.0, 2.0, 3.0, false)),
        ]));
        assert_eq!(grouping.groups.len(), 2);
        assert!(grouping.groups[0].holes.is_empty());
        assert_eq!(grouping.groups[1].holes.len(), 1);
        assert!(grouping.orphans.is_empty());
        assert_eq!(grouping.ambiguous, 0);
    }

    #[test]
    fn overlapping_boxes_take_first_match() {
        let grouping = group(classify(vec![
            contour(ring(0.0, 0.0, 10.0, true)),
            contour(ring(5.0, 0.0, 10.0, true)),
            contour(ring(6.0, 2.0, 2.0, false)),
        ]));
        assert_eq!(grouping.groups[0].holes.len(), 1);
        assert!(grouping.groups[1].holes.is_empty());
        assert_eq!(grouping.ambiguous, 1);
    }

    #[test]
    fn hole_outside_every_box_is_orphaned() {
        let grouping = group(classify(vec![
            contour(ring(0.0, 0.0, 10.0, true)),
            contour(ring(50.0, 50.0, 2.0, false)),
        ]));
        assert!(grouping.groups[0].holes.is_empty());
        assert_eq!(grouping.orphans.len(), 1);
    }

    #[test]
    fn empty_input_groups_to_nothing() {
        assert_eq!(group(Vec::new()), Grouping::default());
    }
}
