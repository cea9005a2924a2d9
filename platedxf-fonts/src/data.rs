//! Font data wrapper around `ttf-parser`.

use std::sync::Arc;

use log::debug;

use crate::error::FontError;
use crate::outline::{OutlineSink, SinkAdapter};

/// Parsed font data.
///
/// Stores owned font bytes and cached header metrics. Creates a
/// `ttf_parser::Face` on demand for individual queries; parsing is
/// sub-microsecond (no allocation, just header validation and offset
/// table construction).
#[derive(Clone)]
pub struct FontData {
    bytes: Arc<[u8]>,
    /// Font units per em (design coordinate space).
    units_per_em: u16,
    /// `OS/2` capital height in design units, if present.
    cap_height: Option<i16>,
}

impl FontData {
    /// Parse font data from an owned byte buffer.
    ///
    /// # Errors
    ///
    /// Returns [`FontError::ParseError`] if the data is not a valid
    /// OpenType/TrueType font.
    pub fn from_bytes(bytes: Arc<[u8]>) -> Result<Self, FontError> {
        let face =
            ttf_parser::Face::parse(&bytes, 0).map_err(|e| FontError::ParseError(e.to_string()))?;
        let cap_height = face.capital_height();
        debug!(
            "parsed font: {} units/em, cap height {cap_height:?}",
            face.units_per_em()
        );
        Ok(Self {
            units_per_em: face.units_per_em(),
            cap_height,
            bytes,
        })
    }

    /// Parse font data from a static byte slice (for embedded fonts).
    ///
    /// # Errors
    ///
    /// Returns [`FontError::ParseError`] if the data is not a valid
    /// OpenType/TrueType font.
    pub fn from_static(bytes: &'static [u8]) -> Result<Self, FontError> {
        Self::from_bytes(Arc::from(bytes))
    }

    /// Re-parse the validated bytes for a query.
    #[expect(clippy::expect_used, reason = "bytes were validated at construction")]
    fn face(&self) -> ttf_parser::Face<'_> {
        ttf_parser::Face::parse(&self.bytes, 0).expect("font bytes validated at construction")
    }

    /// Font units per em (design coordinate space).
    #[must_use]
    pub const fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// Capital letter height in design units, when the font reports one.
    #[must_use]
    pub const fn cap_height(&self) -> Option<i16> {
        self.cap_height
    }

    /// Scale factor from design units to the given font size.
    #[must_use]
    pub fn scale(&self, font_size: f64) -> f64 {
        font_size / f64::from(self.units_per_em)
    }

    /// Map a character to its glyph ID. Returns `None` if not in the cmap.
    #[must_use]
    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        self.face().glyph_index(ch).map(|g| g.0)
    }

    /// Horizontal advance width for a glyph, in design units.
    #[must_use]
    pub fn advance_width(&self, glyph_id: u16) -> Option<u16> {
        self.face().glyph_hor_advance(ttf_parser::GlyphId(glyph_id))
    }

    /// Horizontal advance width of a character, in design units.
    #[must_use]
    pub fn char_advance(&self, ch: char) -> Option<u16> {
        self.glyph_id(ch).and_then(|gid| self.advance_width(gid))
    }

    /// Kerning adjustment between two glyphs, in design units.
    /// Negative values mean tighter spacing.
    #[must_use]
    pub fn kern(&self, left: u16, right: u16) -> i16 {
        self.face()
            .tables()
            .kern
            .and_then(|kern| {
                kern.subtables.into_iter().find_map(|st| {
                    st.glyphs_kerning(ttf_parser::GlyphId(left), ttf_parser::GlyphId(right))
                })
            })
            .unwrap_or(0)
    }

    /// Extract the outlines of a whole string, glyphs placed along the
    /// baseline by advance width and kerning.
    ///
    /// Passing `f64::from(self.units_per_em())` as `font_size` yields raw
    /// design units.
    ///
    /// # Errors
    ///
    /// Returns [`FontError::MissingGlyphs`] if any character is not mapped
    /// by the font; nothing is sent to the sink in that case.
    pub fn text_outline(
        &self,
        text: &str,
        font_size: f64,
        sink: &mut dyn OutlineSink,
    ) -> Result<(), FontError> {
        let face = self.face();
        let missing: String = text
            .chars()
            .filter(|&ch| face.glyph_index(ch).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(FontError::MissingGlyphs(missing));
        }

        let scale = self.scale(font_size);
        let mut pen_x = 0.0;
        let mut prev_gid: Option<u16> = None;

        for gid in text.chars().filter_map(|ch| face.glyph_index(ch)) {
            if let Some(prev) = prev_gid {
                pen_x += f64::from(self.kern(prev, gid.0));
            }
            let mut adapter = SinkAdapter {
                sink: &mut *sink,
                scale,
                pen_x,
            };
            // Blank glyphs (space) have no outline; only the advance matters.
            let _ = face.outline_glyph(gid, &mut adapter);
            if let Some(adv) = face.glyph_hor_advance(gid) {
                pen_x += f64::from(adv);
            }
            prev_gid = Some(gid.0);
        }

        Ok(())
    }
}

impl std::fmt::Debug for FontData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontData")
            .field("units_per_em", &self.units_per_em)
            .field("cap_height", &self.cap_height)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests may panic")]
mod tests {
    use super::*;

    static SANS: &[u8] = include_bytes!("../fonts/DejaVuSans.ttf");

    /// Records outline calls as compact strings.
    #[derive(Default)]
    struct Recorder {
        ops: Vec<String>,
        min_x: f64,
        max_x: f64,
    }

    impl Recorder {
        fn see(&mut self, x: f64) {
            if self.ops.len() == 1 {
                self.min_x = x;
                self.max_x = x;
            }
            self.min_x = self.min_x.min(x);
            self.max_x = self.max_x.max(x);
        }
    }

    impl OutlineSink for Recorder {
        fn move_to(&mut self, x: f64, _y: f64) {
            self.ops.push("M".into());
            self.see(x);
        }
        fn line_to(&mut self, x: f64, _y: f64) {
            self.ops.push("L".into());
            self.see(x);
        }
        fn quad_to(&mut self, _x1: f64, _y1: f64, x: f64, _y: f64) {
            self.ops.push("Q".into());
            self.see(x);
        }
        fn curve_to(&mut self, _x1: f64, _y1: f64, _x2: f64, _y2: f64, x: f64, _y: f64) {
            self.ops.push("C".into());
            self.see(x);
        }
        fn close(&mut self) {
            self.ops.push("Z".into());
        }
    }

    fn sans() -> FontData {
        FontData::from_static(SANS).expect("parse DejaVu Sans")
    }

    #[test]
    fn rejects_garbage_bytes() {
        let err = FontData::from_static(b"not a font").expect_err("should fail");
        assert!(matches!(err, FontError::ParseError(_)));
    }

    #[test]
    fn reads_global_metrics() {
        let font = sans();
        assert_eq!(font.units_per_em(), 2048);
        if let Some(cap) = font.cap_height() {
            assert!(cap > 0 && cap < 2048);
        }
    }

    #[test]
    fn glyph_lookup() {
        let font = sans();
        assert!(font.glyph_id('A').is_some());
        assert!(font.char_advance(' ').is_some_and(|w| w > 0));
    }

    #[test]
    fn text_outline_closes_every_contour() {
        let font = sans();
        let mut rec = Recorder::default();
        font.text_outline("O", 80.0, &mut rec).expect("outline O");
        assert_eq!(rec.ops.first().map(String::as_str), Some("M"));
        // 'O' has an outer contour and a counter.
        assert_eq!(rec.ops.iter().filter(|op| *op == "Z").count(), 2);
    }

    #[test]
    fn blank_text_emits_nothing() {
        let font = sans();
        let mut rec = Recorder::default();
        font.text_outline("  ", 80.0, &mut rec).expect("spaces are mapped");
        assert!(rec.ops.is_empty());
    }

    #[test]
    fn text_outline_advances_glyphs() {
        let font = sans();
        let mut one = Recorder::default();
        font.text_outline("I", 1000.0, &mut one).expect("outline I");
        let mut two = Recorder::default();
        font.text_outline("II", 1000.0, &mut two).expect("outline II");
        // The second 'I' sits one advance to the right of the first.
        assert!(two.max_x > one.max_x + 100.0);
        assert_eq!(two.ops.len(), one.ops.len() * 2);
    }

    #[test]
    fn text_outline_reports_missing_glyphs() {
        let font = sans();
        let mut rec = Recorder::default();
        let err = font
            .text_outline("A\u{10FFFD}", 10.0, &mut rec)
            .expect_err("plane-16 private-use char has no glyph");
        assert_eq!(err, FontError::MissingGlyphs("\u{10FFFD}".into()));
        assert!(rec.ops.is_empty());
    }

    #[test]
    fn text_outline_scales_with_size() {
        let font = sans();
        let mut small = Recorder::default();
        font.text_outline("AB", 10.0, &mut small).expect("outline AB");
        let mut large = Recorder::default();
        font.text_outline("AB", 20.0, &mut large).expect("outline AB");
        let span = |rec: &Recorder| rec.max_x - rec.min_x;
        assert!((span(&large) - 2.0 * span(&small)).abs() < 1e-9);
    }
}
