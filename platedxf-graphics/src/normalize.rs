//! Metric normalization from glyph units to physical drawing units.
//!
//! A shape is translated so the minimum corner of its outer contours'
//! bounding box sits at the origin, then scaled uniformly by
//! `desired_size / cap_height`.

use crate::bbox::outer_bbox;
use crate::types::{PathGroup, Point, Scalar};

/// Fraction of units-per-em assumed when a font reports no cap height.
pub const CAP_HEIGHT_FALLBACK_RATIO: Scalar = 0.7;

/// The two font metrics normalization needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontScale {
    /// Font design units per em. Positive.
    pub units_per_em: Scalar,
    /// Capital letter height in design units, if the font reports one.
    pub cap_height: Option<Scalar>,
}

impl FontScale {
    #[must_use]
    pub const fn new(units_per_em: Scalar, cap_height: Option<Scalar>) -> Self {
        Self {
            units_per_em,
            cap_height,
        }
    }

    /// Cap height in design units; a missing or zero value falls back to
    /// `0.7 × units_per_em`.
    #[must_use]
    pub fn effective_cap_height(&self) -> Scalar {
        match self.cap_height {
            Some(h) if h > 0.0 => h,
            _ => CAP_HEIGHT_FALLBACK_RATIO * self.units_per_em,
        }
    }

    /// Factor mapping design units to physical units so that capitals are
    /// `size` tall.
    #[must_use]
    pub fn scale_for(&self, size: Scalar) -> Scalar {
        size / self.effective_cap_height()
    }
}

/// A shape moved to the origin and scaled, with its measured extent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedShape {
    pub groups: Vec<PathGroup>,
    pub width: Scalar,
    pub height: Scalar,
}

impl NormalizedShape {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Translate `groups` so their outer bounding box starts at the origin and
/// scale by `scale` in both axes.
///
/// Holes move with the same offset as the outers. Empty input yields a
/// zero-size shape.
#[must_use]
pub fn normalize(groups: Vec<PathGroup>, scale: Scalar) -> NormalizedShape {
    let bb = outer_bbox(&groups);
    let origin = bb.min_point();
    let groups = groups
        .into_iter()
        .map(|g| {
            g.map_points(|p| Point::new((p.x - origin.x) * scale, (p.y - origin.y) * scale))
        })
        .collect();
    NormalizedShape {
        groups,
        width: bb.width() * scale,
        height: bb.height() * scale,
    }
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
    use crate::types::Contour;

    fn rect(x0: Scalar, y0: Scalar, w: Scalar, h: Scalar) -> Contour {
        Contour::new(vec![
            Point::new(x0, y0),
            Point::new(x0 + w, y0),
            Point::new(x0 + w, y0 + h),
            Point::new(x0, y0 + h),
            Point::new(x0, y0),
        ])
    }

    #[test]
    fn cap_height_fallback() {
        assert_eq!(FontScale::new(1000.0, None).effective_cap_height(), 700.0);
        assert_eq!(
            FontScale::new(1000.0, Some(0.0)).effective_cap_height(),
            700.0
        );
        assert_eq!(
            FontScale::new(2048.0, Some(1490.0)).effective_cap_height(),
            1490.0
        );
    }

    #[test]
    fn scale_maps_cap_height_to_size() {
        let fs = FontScale::new(1000.0, Some(700.0));
        assert!((fs.scale_for(80.0) * 700.0 - 80.0).abs() < 1e-12);
    }

    #[test]
    fn translates_to_origin_and_scales_uniformly() {
        let mut outer = PathGroup::new(rect(100.0, -50.0, 20.0, 10.0));
        let mut hole = rect(105.0, -48.0, 2.0, 2.0);
        hole.is_hole = true;
        outer.holes.push(hole);

        let shape = normalize(vec![outer], 2.0);
        assert_eq!(shape.width, 40.0);
        assert_eq!(shape.height, 20.0);
        assert_eq!(shape.groups[0].outer.points[0], Point::new(0.0, 0.0));
        assert_eq!(shape.groups[0].outer.points[2], Point::new(40.0, 20.0));
        assert_eq!(shape.groups[0].holes[0].points[0], Point::new(10.0, 4.0));
    }

    #[test]
    fn empty_input_is_zero_size() {
        let shape = normalize(Vec::new(), FontScale::new(1000.0, None).scale_for(80.0));
        assert!(shape.is_empty());
        assert_eq!(shape.width, 0.0);
        assert_eq!(shape.height, 0.0);
    }

    #[test]
    fn renormalizing_at_unit_scale_is_a_no_op() {
        let first = normalize(
            vec![
                PathGroup::new(rect(3.0, 4.0, 5.0, 6.0)),
                PathGroup::new(rect(9.0, 4.5, 1.0, 1.0)),
            ],
            1.5,
        );
        let second = normalize(first.groups.clone(), 1.0);
        assert_eq!(first, second);
    }
}
