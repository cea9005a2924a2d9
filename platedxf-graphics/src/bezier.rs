//! Bezier segments and curve flattening.
//!
//! Two flattening policies sit behind the [`Flattener`] trait:
//!
//! - [`FixedSegments`] samples a curve at `N` equal parameter steps.
//!   Deterministic and cheap, but blind to the curve's size.
//! - [`AdaptiveFlattener`] bisects with de Casteljau's algorithm until the
//!   control polygon lies within a tolerance of the chord, capped at a
//!   recursion depth.
//!
//! [`FlatteningPolicy`] is the configuration-facing enum that dispatches to
//! one of them. Every flattener emits the points *after* the start point,
//! ending with the curve's end point.

use serde::Deserialize;

use crate::types::{EPSILON, Point, Scalar};

// ---------------------------------------------------------------------------
// Segments
// ---------------------------------------------------------------------------

/// Three control points of a quadratic Bezier segment.
#[derive(Debug, Clone, Copy)]
pub struct QuadSegment {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
}

impl QuadSegment {
    #[must_use]
    pub const fn new(p0: Point, p1: Point, p2: Point) -> Self {
        Self { p0, p1, p2 }
    }

    /// Evaluate the point at parameter `t` in [0, 1].
    #[must_use]
    pub fn eval(&self, t: Scalar) -> Point {
        let s = 1.0 - t;
        let a = s * s;
        let b = 2.0 * s * t;
        let c = t * t;
        Point::new(
            c.mul_add(self.p2.x, a.mul_add(self.p0.x, b * self.p1.x)),
            c.mul_add(self.p2.y, a.mul_add(self.p0.y, b * self.p1.y)),
        )
    }

    /// Split at parameter `t` using de Casteljau's algorithm.
    #[must_use]
    pub fn split(&self, t: Scalar) -> (Self, Self) {
        let ab = self.p0.lerp(self.p1, t);
        let bc = self.p1.lerp(self.p2, t);
        let abc = ab.lerp(bc, t);
        (
            Self {
                p0: self.p0,
                p1: ab,
                p2: abc,
            },
            Self {
                p0: abc,
                p1: bc,
                p2: self.p2,
            },
        )
    }
}

/// Four control points of a cubic Bezier segment.
#[derive(Debug, Clone, Copy)]
pub struct CubicSegment {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

impl CubicSegment {
    #[must_use]
    pub const fn new(p0: Point, p1: Point, p2: Point, p3: Point) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Evaluate the point at parameter `t` in [0, 1].
    #[expect(
        clippy::many_single_char_names,
        reason = "standard Bezier math variable names (a, b, c, d, s, t)"
    )]
    #[must_use]
    pub fn eval(&self, t: Scalar) -> Point {
        let s = 1.0 - t;
        let a = s * s * s;
        let b = 3.0 * s * s * t;
        let c = 3.0 * s * t * t;
        let d = t * t * t;
        Point::new(
            d.mul_add(
                self.p3.x,
                a.mul_add(self.p0.x, b.mul_add(self.p1.x, c * self.p2.x)),
            ),
            d.mul_add(
                self.p3.y,
                a.mul_add(self.p0.y, b.mul_add(self.p1.y, c * self.p2.y)),
            ),
        )
    }

    /// Split at parameter `t` using de Casteljau's algorithm.
    ///
    /// Returns `(left_half, right_half)`.
    #[must_use]
    pub fn split(&self, t: Scalar) -> (Self, Self) {
        let ab = self.p0.lerp(self.p1, t);
        let bc = self.p1.lerp(self.p2, t);
        let cd = self.p2.lerp(self.p3, t);
        let abc = ab.lerp(bc, t);
        let bcd = bc.lerp(cd, t);
        let abcd = abc.lerp(bcd, t);

        (
            Self {
                p0: self.p0,
                p1: ab,
                p2: abc,
                p3: abcd,
            },
            Self {
                p0: abcd,
                p1: bcd,
                p2: cd,
                p3: self.p3,
            },
        )
    }
}

/// Largest distance of `controls` from the chord `start`→`end`.
///
/// A degenerate chord measures the plain distance from `start`.
fn chord_deviation(start: Point, end: Point, controls: &[Point]) -> Scalar {
    let chord = end - start;
    let len = chord.length();
    controls
        .iter()
        .map(|&c| {
            if len < EPSILON {
                (c - start).length()
            } else {
                chord.cross(c - start).abs() / len
            }
        })
        .fold(0.0, Scalar::max)
}

// ---------------------------------------------------------------------------
// Flattener trait
// ---------------------------------------------------------------------------

/// Reduces Bezier segments to line segments.
///
/// Implementations append to `out` every point after the segment's start,
/// ending with its end point.
pub trait Flattener {
    fn flatten_quad(&self, seg: &QuadSegment, out: &mut Vec<Point>);
    fn flatten_cubic(&self, seg: &CubicSegment, out: &mut Vec<Point>);
}

/// Uniform parametric sampling into a fixed number of steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSegments {
    pub segments: u32,
}

impl FixedSegments {
    pub const DEFAULT_SEGMENTS: u32 = 4;
    /// Upper bound on steps per curve; larger requests are clamped.
    pub const MAX_SEGMENTS: u32 = 1024;

    #[must_use]
    pub const fn new(segments: u32) -> Self {
        Self { segments }
    }

    /// Parameter values `1/n, 2/n, ..., 1`. Zero segments behaves as one.
    fn steps(self) -> impl Iterator<Item = Scalar> {
        let n = self.segments.clamp(1, Self::MAX_SEGMENTS);
        (1..=n).map(move |i| Scalar::from(i) / Scalar::from(n))
    }
}

impl Default for FixedSegments {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEGMENTS)
    }
}

impl Flattener for FixedSegments {
    fn flatten_quad(&self, seg: &QuadSegment, out: &mut Vec<Point>) {
        out.extend(self.steps().map(|t| seg.eval(t)));
    }

    fn flatten_cubic(&self, seg: &CubicSegment, out: &mut Vec<Point>) {
        out.extend(self.steps().map(|t| seg.eval(t)));
    }
}

/// Recursive midpoint subdivision bounded by a flatness tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveFlattener {
    /// Maximum allowed distance of the control polygon from the chord.
    pub tolerance: Scalar,
    /// Recursion cap; a segment at this depth is emitted as-is. Values
    /// above [`Self::MAX_DEPTH`] are clamped.
    pub max_depth: u32,
}

impl AdaptiveFlattener {
    pub const DEFAULT_TOLERANCE: Scalar = 0.5;
    pub const DEFAULT_MAX_DEPTH: u32 = 10;
    pub const MAX_DEPTH: u32 = 16;

    #[must_use]
    pub const fn new(tolerance: Scalar, max_depth: u32) -> Self {
        Self {
            tolerance,
            max_depth,
        }
    }

    fn depth_cap(&self) -> u32 {
        self.max_depth.min(Self::MAX_DEPTH)
    }

    fn quad(&self, seg: &QuadSegment, depth: u32, out: &mut Vec<Point>) {
        if depth >= self.depth_cap()
            || chord_deviation(seg.p0, seg.p2, &[seg.p1]) <= self.tolerance
        {
            out.push(seg.p2);
            return;
        }
        let (left, right) = seg.split(0.5);
        self.quad(&left, depth + 1, out);
        self.quad(&right, depth + 1, out);
    }

    fn cubic(&self, seg: &CubicSegment, depth: u32, out: &mut Vec<Point>) {
        if depth >= self.depth_cap()
            || chord_deviation(seg.p0, seg.p3, &[seg.p1, seg.p2]) <= self.tolerance
        {
            out.push(seg.p3);
            return;
        }
        let (left, right) = seg.split(0.5);
        self.cubic(&left, depth + 1, out);
        self.cubic(&right, depth + 1, out);
    }
}

impl Default for AdaptiveFlattener {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TOLERANCE, Self::DEFAULT_MAX_DEPTH)
    }
}

impl Flattener for AdaptiveFlattener {
    fn flatten_quad(&self, seg: &QuadSegment, out: &mut Vec<Point>) {
        self.quad(seg, 0, out);
    }

    fn flatten_cubic(&self, seg: &CubicSegment, out: &mut Vec<Point>) {
        self.cubic(seg, 0, out);
    }
}

// ---------------------------------------------------------------------------
// FlatteningPolicy
// ---------------------------------------------------------------------------

/// Configurable choice of flattener.
///
/// Outputs of the two policies are not comparable point for point; pick
/// one per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum FlatteningPolicy {
    Fixed {
        #[serde(default = "default_segments")]
        segments: u32,
    },
    Adaptive {
        #[serde(default = "default_tolerance")]
        tolerance: Scalar,
        #[serde(default = "default_max_depth")]
        max_depth: u32,
    },
}

const fn default_segments() -> u32 {
    FixedSegments::DEFAULT_SEGMENTS
}

const fn default_tolerance() -> Scalar {
    AdaptiveFlattener::DEFAULT_TOLERANCE
}

const fn default_max_depth() -> u32 {
    AdaptiveFlattener::DEFAULT_MAX_DEPTH
}

impl Default for FlatteningPolicy {
    fn default() -> Self {
        Self::Fixed {
            segments: FixedSegments::DEFAULT_SEGMENTS,
        }
    }
}

impl Flattener for FlatteningPolicy {
    fn flatten_quad(&self, seg: &QuadSegment, out: &mut Vec<Point>) {
        match *self {
            Self::Fixed { segments } => FixedSegments::new(segments).flatten_quad(seg, out),
            Self::Adaptive {
                tolerance,
                max_depth,
            } => AdaptiveFlattener::new(tolerance, max_depth).flatten_quad(seg, out),
        }
    }

    fn flatten_cubic(&self, seg: &CubicSegment, out: &mut Vec<Point>) {
        match *self {
            Self::Fixed { segments } => FixedSegments::new(segments).flatten_cubic(seg, out),
            Self::Adaptive {
                tolerance,
                max_depth,
            } => AdaptiveFlattener::new(tolerance, max_depth).flatten_cubic(seg, out),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn arch() -> CubicSegment {
        CubicSegment::new(
            Point::new(0.0, 0.0),
            Point::new(0.0, 100.0),
            Point::new(100.0, 100.0),
            Point::new(100.0, 0.0),
        )
    }

    /// Distance of `p` from the infinite line through `a` and `b`.
    fn off_line(p: Point, a: Point, b: Point) -> Scalar {
        let d = b - a;
        d.cross(p - a).abs() / d.length()
    }

    #[test]
    fn quad_eval_endpoints_and_midpoint() {
        let seg = QuadSegment::new(
            Point::new(0.0, 0.0),
            Point::new(5.0, 10.0),
            Point::new(10.0, 0.0),
        );
        assert_eq!(seg.eval(0.0), Point::new(0.0, 0.0));
        assert_eq!(seg.eval(1.0), Point::new(10.0, 0.0));
        let mid = seg.eval(0.5);
        assert!((mid.x - 5.0).abs() < EPSILON);
        assert!((mid.y - 5.0).abs() < EPSILON);
    }

    #[test]
    fn quad_split_meets_at_curve_point() {
        let seg = QuadSegment::new(
            Point::new(0.0, 0.0),
            Point::new(5.0, 10.0),
            Point::new(10.0, 0.0),
        );
        let (left, right) = seg.split(0.5);
        let on_curve = seg.eval(0.5);
        assert!((left.p2 - on_curve).length() < EPSILON);
        assert!((right.p0 - on_curve).length() < EPSILON);
        assert_eq!(right.p2, seg.p2);
    }

    #[test]
    fn cubic_split_preserves_endpoints() {
        let seg = arch();
        let (left, right) = seg.split(0.5);
        assert_eq!(left.p0, seg.p0);
        assert_eq!(right.p3, seg.p3);
        assert!((left.p3 - right.p0).length() < EPSILON);
    }

    #[test]
    fn fixed_emits_exact_segment_count_and_end_point() {
        let mut out = Vec::new();
        FixedSegments::default().flatten_cubic(&arch(), &mut out);
        assert_eq!(out.len(), 4);
        assert_eq!(out.last().copied(), Some(Point::new(100.0, 0.0)));
        // Start point is excluded.
        assert_ne!(out[0], Point::new(0.0, 0.0));
    }

    #[test]
    fn fixed_matches_basis_formula() {
        let seg = QuadSegment::new(
            Point::new(0.0, 0.0),
            Point::new(4.0, 8.0),
            Point::new(8.0, 0.0),
        );
        let mut out = Vec::new();
        FixedSegments::new(2).flatten_quad(&seg, &mut out);
        // t = 0.5: 0.25*p0 + 0.5*p1 + 0.25*p2
        assert!((out[0].x - 4.0).abs() < EPSILON);
        assert!((out[0].y - 4.0).abs() < EPSILON);
        assert_eq!(out[1], Point::new(8.0, 0.0));
    }

    #[test]
    fn fixed_zero_segments_behaves_as_one() {
        let mut out = Vec::new();
        FixedSegments::new(0).flatten_cubic(&arch(), &mut out);
        assert_eq!(out, vec![Point::new(100.0, 0.0)]);
    }

    #[test]
    fn straight_cubic_stays_on_line_for_any_policy() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(31.0, 17.0);
        let seg = CubicSegment::new(a, a.lerp(b, 0.2), a.lerp(b, 0.9), b);
        let policies = [
            FlatteningPolicy::Fixed { segments: 1 },
            FlatteningPolicy::Fixed { segments: 7 },
            FlatteningPolicy::Fixed { segments: 64 },
            FlatteningPolicy::Adaptive {
                tolerance: 0.5,
                max_depth: 10,
            },
            FlatteningPolicy::Adaptive {
                tolerance: 0.0,
                max_depth: 4,
            },
        ];
        for policy in policies {
            let mut out = Vec::new();
            policy.flatten_cubic(&seg, &mut out);
            assert!(!out.is_empty());
            for p in &out {
                assert!(off_line(*p, a, b) < 1e-9, "{policy:?} produced {p:?}");
            }
        }
    }

    #[test]
    fn straight_quad_stays_on_line() {
        let a = Point::new(-3.0, 0.0);
        let b = Point::new(9.0, 6.0);
        let seg = QuadSegment::new(a, a.lerp(b, 0.5), b);
        for segments in [1, 3, 16] {
            let mut out = Vec::new();
            FixedSegments::new(segments).flatten_quad(&seg, &mut out);
            assert!(out.iter().all(|p| off_line(*p, a, b) < 1e-9));
        }
    }

    #[test]
    fn adaptive_collapses_flat_curve_to_chord() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        let mut out = Vec::new();
        AdaptiveFlattener::default().flatten_cubic(&CubicSegment::new(a, a, b, b), &mut out);
        assert_eq!(out, vec![b]);
    }

    #[test]
    fn adaptive_refines_within_tolerance() {
        let seg = arch();
        let flattener = AdaptiveFlattener::new(0.25, 12);
        let mut out = Vec::new();
        flattener.flatten_cubic(&seg, &mut out);
        assert!(out.len() > 4, "expected refinement, got {}", out.len());
        assert_eq!(out.last().copied(), Some(seg.p3));
        // Every emitted point lies on the curve's hull.
        assert!(out.iter().all(|p| p.y >= -EPSILON && p.y <= 100.0 + EPSILON));
    }

    #[test]
    fn adaptive_depth_cap_terminates() {
        let mut out = Vec::new();
        AdaptiveFlattener::new(0.0, 3).flatten_cubic(&arch(), &mut out);
        assert_eq!(out.len(), 8);
    }

    #[test]
    fn oversized_limits_are_clamped() {
        let mut out = Vec::new();
        FlatteningPolicy::Fixed { segments: 100_000 }.flatten_cubic(&arch(), &mut out);
        assert_eq!(out.len(), 1024);

        out.clear();
        FlatteningPolicy::Adaptive {
            tolerance: 0.0,
            max_depth: 40,
        }
        .flatten_quad(
            &QuadSegment::new(Point::ZERO, Point::new(5.0, 10.0), Point::new(10.0, 0.0)),
            &mut out,
        );
        assert_eq!(out.len(), 1 << 16);
    }

    #[test]
    fn adaptive_degenerate_chord_loop_is_subdivided() {
        let p = Point::new(0.0, 0.0);
        let seg = CubicSegment::new(p, Point::new(50.0, 50.0), Point::new(-50.0, 50.0), p);
        let mut out = Vec::new();
        AdaptiveFlattener::default().flatten_cubic(&seg, &mut out);
        assert!(out.len() > 1);
        assert_eq!(out.last().copied(), Some(p));
    }

    #[test]
    fn policy_defaults_to_four_fixed_segments() {
        assert_eq!(
            FlatteningPolicy::default(),
            FlatteningPolicy::Fixed { segments: 4 }
        );
    }
}
