//! Boundaries with the external collaborators: glyph outlines and barcode
//! bitmaps.
//!
//! Both lookups are made once per item before any geometry work starts;
//! their results are plain owned data.

use log::debug;
use platedxf_fonts::{FontProvider, OutlineSink};
use platedxf_graphics::normalize::FontScale;
use platedxf_graphics::types::{DrawCommand, Point, Scalar};

use crate::barcode::Bitmap;
use crate::error::LabelError;

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Outline stream for one string set in one font.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphRun {
    /// Commands in font design units, Y pointing down.
    pub commands: Vec<DrawCommand>,
    pub scale: FontScale,
    /// Advance of the space glyph in design units, 0 if the font has none.
    pub space_advance: Scalar,
}

/// Supplies glyph outlines for a string.
pub trait OutlineSource {
    /// # Errors
    ///
    /// [`LabelError::OutlineUnavailable`] if the font is unknown or cannot
    /// outline `text`.
    fn outline(&self, text: &str, font: &str) -> Result<GlyphRun, LabelError>;
}

/// Supplies the barcode bitmap encoding a payload.
pub trait BitmapSource {
    /// # Errors
    ///
    /// [`LabelError::BitmapUnavailable`] if no bitmap can be produced; the
    /// label is then drawn without a barcode. Any other error fails it.
    fn bitmap(&self, payload: &str) -> Result<Bitmap, LabelError>;
}

impl<F> BitmapSource for F
where
    F: Fn(&str) -> Result<Bitmap, LabelError>,
{
    fn bitmap(&self, payload: &str) -> Result<Bitmap, LabelError> {
        self(payload)
    }
}

// ---------------------------------------------------------------------------
// Font-backed outline source
// ---------------------------------------------------------------------------

/// [`OutlineSource`] reading glyphs from a [`FontProvider`].
pub struct FontOutlineSource<'a, P: FontProvider + ?Sized> {
    provider: &'a P,
}

impl<'a, P: FontProvider + ?Sized> FontOutlineSource<'a, P> {
    #[must_use]
    pub const fn new(provider: &'a P) -> Self {
        Self { provider }
    }
}

impl<P: FontProvider + ?Sized> OutlineSource for FontOutlineSource<'_, P> {
    fn outline(&self, text: &str, font: &str) -> Result<GlyphRun, LabelError> {
        let unavailable = |reason: String| LabelError::OutlineUnavailable {
            text: text.to_owned(),
            font: font.to_owned(),
            reason,
        };
        let data = self
            .provider
            .font(font)
            .ok_or_else(|| unavailable("font not found".into()))?;

        let units_per_em = f64::from(data.units_per_em());
        let mut recorder = CommandRecorder::default();
        data.text_outline(text, units_per_em, &mut recorder)
            .map_err(|e| unavailable(e.to_string()))?;
        debug!(
            "outlined {text:?} in {font:?}: {} commands",
            recorder.commands.len()
        );

        Ok(GlyphRun {
            commands: recorder.commands,
            scale: FontScale::new(units_per_em, data.cap_height().map(f64::from)),
            space_advance: data.char_advance(' ').map_or(0.0, f64::from),
        })
    }
}

/// Collects sink calls as [`DrawCommand`]s, flipping Y from the font's
/// upward axis to the layout frame's downward one.
#[derive(Debug, Default)]
struct CommandRecorder {
    commands: Vec<DrawCommand>,
}

fn flip(x: f64, y: f64) -> Point {
    Point::new(x, -y)
}

impl OutlineSink for CommandRecorder {
    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::MoveTo(flip(x, y)));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::LineTo(flip(x, y)));
    }

    fn quad_to(&mut self, x1: f64, y1: f64, x: f64, y: f64) {
        self.commands
            .push(DrawCommand::QuadTo(flip(x1, y1), flip(x, y)));
    }

    fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x: f64, y: f64) {
        self.commands.push(DrawCommand::CubicTo(
            flip(x1, y1),
            flip(x2, y2),
            flip(x, y),
        ));
    }

    fn close(&mut self) {
        self.commands.push(DrawCommand::Close);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests may panic")]
#[expect(
    clippy::float_cmp,
    reason = "exact float comparisons are intentional in tests"
)]
mod tests {
    use platedxf_fonts::CompositeFontProvider;
    use platedxf_graphics::bezier::FlatteningPolicy;
    use platedxf_graphics::classify::{classify, group};
    use platedxf_graphics::contour::build_contours;

    use super::*;

    #[test]
    fn recorder_flips_y() {
        let mut rec = CommandRecorder::default();
        rec.move_to(1.0, 2.0);
        rec.line_to(3.0, -4.0);
        rec.close();
        assert_eq!(rec.commands, vec![
            DrawCommand::MoveTo(Point::new(1.0, -2.0)),
            DrawCommand::LineTo(Point::new(3.0, 4.0)),
            DrawCommand::Close,
        ]);
    }

    #[test]
    fn embedded_font_outlines_in_design_units() {
        let provider = CompositeFontProvider::new().expect("fonts");
        let source = FontOutlineSource::new(&provider);
        let run = source.outline("H", "sans").expect("outline");
        assert!(!run.commands.is_empty());
        assert_eq!(run.scale.units_per_em, 2048.0);
        assert!(run.space_advance > 0.0);
        // Glyphs sit above the baseline, so flipped Y is mostly negative.
        let min_y = run
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::MoveTo(p) | DrawCommand::LineTo(p) => Some(p.y),
                _ => None,
            })
            .fold(f64::INFINITY, f64::min);
        assert!(min_y < -1000.0);
    }

    #[test]
    fn flipped_letter_o_classifies_one_outer_one_hole() {
        let provider = CompositeFontProvider::new().expect("fonts");
        let run = FontOutlineSource::new(&provider)
            .outline("O", "sans")
            .expect("outline");
        let contours = build_contours(&run.commands, &FlatteningPolicy::default()).expect("build");
        let grouping = group(classify(contours));
        assert_eq!(grouping.groups.len(), 1);
        assert_eq!(grouping.groups[0].holes.len(), 1);
        assert!(grouping.orphans.is_empty());
    }

    #[test]
    fn unknown_font_is_unavailable() {
        let provider = CompositeFontProvider::new().expect("fonts");
        let err = FontOutlineSource::new(&provider)
            .outline("A", "no-such-font")
            .expect_err("missing font");
        assert!(matches!(err, LabelError::OutlineUnavailable { font, .. } if font == "no-such-font"));
    }

    #[test]
    fn unmapped_character_is_unavailable() {
        let provider = CompositeFontProvider::new().expect("fonts");
        let err = FontOutlineSource::new(&provider)
            .outline("A\u{10FFFD}", "sans")
            .expect_err("missing glyph");
        assert!(matches!(err, LabelError::OutlineUnavailable { .. }));
    }

    #[test]
    fn closures_are_bitmap_sources() {
        let source = |payload: &str| Bitmap::parse_text(if payload == "a" { "1" } else { "" });
        assert_eq!(source.bitmap("a").expect("bitmap").side(), 1);
        assert!(source.bitmap("b").is_err());
    }
}
