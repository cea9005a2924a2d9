//! Glyph outline delivery.
//!
//! Consumers implement [`OutlineSink`]; `ttf-parser` never appears in
//! their signatures. [`SinkAdapter`] bridges the two and applies the pen
//! position and the size scale on the way through.

/// Receiver for glyph outline commands.
///
/// Coordinates are pre-scaled from font design units to the requested
/// font size. The coordinate system is Y-up (font convention), with the
/// baseline at `y = 0` and the first glyph's origin at `x = 0`.
pub trait OutlineSink {
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    /// Quadratic segment (TrueType outlines): control, end.
    fn quad_to(&mut self, x1: f64, y1: f64, x: f64, y: f64);
    /// Cubic segment (CFF outlines): two controls, end.
    fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64);
    fn close(&mut self);
}

/// Forwards one glyph's outline into a sink.
///
/// Points are shifted right by `pen_x` (design units) and then multiplied
/// by `scale`.
pub(crate) struct SinkAdapter<'a> {
    pub(crate) sink: &'a mut dyn OutlineSink,
    pub(crate) scale: f64,
    pub(crate) pen_x: f64,
}

impl SinkAdapter<'_> {
    fn map(&self, x: f32, y: f32) -> (f64, f64) {
        (
            (f64::from(x) + self.pen_x) * self.scale,
            f64::from(y) * self.scale,
        )
    }
}

impl ttf_parser::OutlineBuilder for SinkAdapter<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.sink.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.sink.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x, y) = self.map(x, y);
        self.sink.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x2, y2) = self.map(x2, y2);
        let (x, y) = self.map(x, y);
        self.sink.curve_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.sink.close();
    }
}

#[cfg(test)]
#[expect(
    clippy::float_cmp,
    reason = "exact float comparisons are intentional in tests"
)]
mod tests {
    use ttf_parser::OutlineBuilder;

    use super::*;

    #[derive(Default)]
    struct Points(Vec<(f64, f64)>, usize);

    impl OutlineSink for Points {
        fn move_to(&mut self, x: f64, y: f64) {
            self.0.push((x, y));
        }
        fn line_to(&mut self, x: f64, y: f64) {
            self.0.push((x, y));
        }
        fn quad_to(&mut self, x1: f64, y1: f64, x: f64, y: f64) {
            self.0.extend([(x1, y1), (x, y)]);
        }
        fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
            self.0.extend([(x1, y1), (x2, y2), (x, y)]);
        }
        fn close(&mut self) {
            self.1 += 1;
        }
    }

    #[test]
    fn adapter_offsets_then_scales() {
        let mut sink = Points::default();
        let mut adapter = SinkAdapter {
            sink: &mut sink,
            scale: 0.5,
            pen_x: 100.0,
        };
        adapter.move_to(0.0, 10.0);
        adapter.quad_to(20.0, 20.0, 40.0, -10.0);
        adapter.curve_to(0.0, 0.0, 2.0, 2.0, 4.0, 4.0);
        adapter.close();
        assert_eq!(sink.0, vec![
            (50.0, 5.0),
            (60.0, 10.0),
            (70.0, -5.0),
            (50.0, 0.0),
            (51.0, 1.0),
            (52.0, 2.0),
        ]);
        assert_eq!(sink.1, 1);
    }
}
