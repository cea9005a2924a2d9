//! Rendering one label: text run plus barcode, to a DXF [`Document`].

use std::fmt;

use log::{debug, warn};
use platedxf_dxf::{Document, Entity, FILE_EXTENSION, RenderOptions};
use platedxf_graphics::classify::{classify, group};
use platedxf_graphics::contour::build_contours;
use platedxf_graphics::normalize::{NormalizedShape, normalize};
use platedxf_graphics::types::{Contour, PathGroup, Point, Scalar, Vec2};

use crate::barcode::{Bitmap, rasterize};
use crate::config::{LabelConfig, TextMode};
use crate::error::LabelError;
use crate::layout::{Container, RowItem, layout};
use crate::source::{BitmapSource, GlyphRun, OutlineSource};

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// One label: a prefix and a number, e.g. `ABC` and `71`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelItem {
    pub prefix: String,
    pub number: String,
}

impl LabelItem {
    #[must_use]
    pub fn new(prefix: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            number: number.into(),
        }
    }

    /// `"{prefix} - {number}"`: the barcode payload and the file stem.
    #[must_use]
    pub fn display(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LabelItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.prefix, self.number)
    }
}

/// One item per `i` in `start..=end`, numbered `number_prefix` followed by
/// `i`. An inverted range gives no items.
#[must_use]
pub fn generate_items(prefix: &str, number_prefix: &str, start: u32, end: u32) -> Vec<LabelItem> {
    (start..=end)
        .map(|i| LabelItem::new(prefix, format!("{number_prefix}{i}")))
        .collect()
}

// ---------------------------------------------------------------------------
// Rendered output
// ---------------------------------------------------------------------------

/// A rendered label and what went wrong along the way without failing it.
#[derive(Debug, Clone)]
pub struct RenderedLabel {
    pub item: LabelItem,
    pub document: Document,
    /// Human-readable notes on recovered problems.
    pub diagnostics: Vec<String>,
    /// The bitmap was unavailable and no barcode was drawn.
    pub barcode_omitted: bool,
    options: RenderOptions,
}

impl RenderedLabel {
    /// Serialize to DXF text.
    #[must_use]
    pub fn to_dxf(&self) -> String {
        platedxf_dxf::render_with_options(&self.document, &self.options)
    }

    /// `"{display}.dxf"`.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.{FILE_EXTENSION}", self.item.display())
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Prefix,
    Separator,
    Number,
}

/// Measured geometry of one text element, before placement.
enum TextGeometry {
    Shape(NormalizedShape),
    Literal { value: String, font: String },
}

struct TextElement {
    role: Role,
    geometry: TextGeometry,
    width: Scalar,
    height: Scalar,
}

/// Render `item` into a document.
///
/// Outlines are requested once per non-empty text element and the bitmap
/// once per item, before any layout happens.
///
/// # Errors
///
/// [`LabelError::OutlineUnavailable`] or [`LabelError::MalformedPath`] for
/// the text run. Bitmap errors are returned unless
/// [`LabelError::is_recoverable`] holds; a recoverable one renders the
/// label without its barcode and is noted in [`RenderedLabel::diagnostics`].
pub fn render_label(
    item: &LabelItem,
    config: &LabelConfig,
    outlines: &dyn OutlineSource,
    bitmaps: &dyn BitmapSource,
) -> Result<RenderedLabel, LabelError> {
    let mut diagnostics = Vec::new();
    let separator = config.separator.map(String::from);

    let mut parts = vec![(Role::Prefix, item.prefix.as_str(), config.prefix_font.as_str())];
    if let Some(sep) = &separator {
        parts.push((Role::Separator, sep.as_str(), config.number_font.as_str()));
    }
    parts.push((Role::Number, item.number.as_str(), config.number_font.as_str()));

    let (elements, derived_gap) = match config.text_mode {
        TextMode::Outlines => outline_elements(&parts, config, outlines, &mut diagnostics)?,
        TextMode::Literal => (
            literal_elements(&parts, config),
            LabelConfig::LITERAL_GAP * config.font_size,
        ),
    };
    let separator_gap = config.separator_gap.unwrap_or(derived_gap);

    let display = item.display();
    let bitmap = match bitmaps.bitmap(&display) {
        Ok(bitmap) => Some(bitmap),
        Err(err) if err.is_recoverable() => {
            warn!("{display}: {err}; rendering without barcode");
            diagnostics.push(err.to_string());
            None
        }
        Err(err) => return Err(err),
    };
    let barcode_side = bitmap.as_ref().map_or(0.0, |b| side_length(b, config.module_size));

    let mut row: Vec<RowItem> = elements
        .iter()
        .map(|e| {
            let gap = if e.role == Role::Prefix { 0.0 } else { separator_gap };
            RowItem::text(e.width, e.height, gap)
        })
        .collect();
    row.push(RowItem::barcode(barcode_side, config.barcode_gap));

    let placed = layout(&row, Container {
        width: config.container_width,
        height: config.container_height,
    });

    let mut document = Document::new();
    for (element, origin) in elements.iter().zip(&placed.origins) {
        emit_text(&mut document, element, *origin, config);
    }
    if let (Some(bitmap), Some(&origin)) = (&bitmap, placed.origins.last()) {
        emit_barcode(&mut document, bitmap, origin, config);
    }

    debug!(
        "{display}: {} entities, content width {:.3}",
        document.len(),
        placed.content_width
    );

    Ok(RenderedLabel {
        item: item.clone(),
        document,
        diagnostics,
        barcode_omitted: bitmap.is_none(),
        options: RenderOptions {
            polyline_style: config.polyline_style,
            ..RenderOptions::default()
        },
    })
}

#[expect(
    clippy::cast_precision_loss,
    reason = "bitmap sides are tiny compared to f64 mantissa"
)]
fn side_length(bitmap: &Bitmap, module_size: Scalar) -> Scalar {
    bitmap.side() as Scalar * module_size
}

/// Outline and normalize every element. Also returns the separator gap
/// derived from the number font's space advance.
fn outline_elements(
    parts: &[(Role, &str, &str)],
    config: &LabelConfig,
    outlines: &dyn OutlineSource,
    diagnostics: &mut Vec<String>,
) -> Result<(Vec<TextElement>, Scalar), LabelError> {
    let mut derived_gap = 0.0;
    let mut elements = Vec::with_capacity(parts.len());

    for &(role, text, font) in parts {
        let shape = if text.is_empty() {
            NormalizedShape::default()
        } else {
            let run = outlines.outline(text, font)?;
            if role != Role::Prefix {
                derived_gap = run.space_advance * run.scale.scale_for(config.font_size);
            }
            outline_shape(text, &run, config, diagnostics)?
        };
        elements.push(TextElement {
            role,
            width: shape.width,
            height: shape.height,
            geometry: TextGeometry::Shape(shape),
        });
    }

    Ok((elements, derived_gap))
}

fn outline_shape(
    text: &str,
    run: &GlyphRun,
    config: &LabelConfig,
    diagnostics: &mut Vec<String>,
) -> Result<NormalizedShape, LabelError> {
    let contours = build_contours(&run.commands, &config.flattening)?;
    let grouping = group(classify(contours));
    if !grouping.orphans.is_empty() {
        diagnostics.push(format!(
            "{text:?}: {} hole(s) outside every outer shape were dropped",
            grouping.orphans.len()
        ));
    }
    if grouping.ambiguous > 0 {
        let note = format!(
            "{text:?}: {} hole(s) matched several outer shapes; first match kept",
            grouping.ambiguous
        );
        warn!("{note}");
        diagnostics.push(note);
    }
    Ok(normalize(
        grouping.groups,
        run.scale.scale_for(config.font_size),
    ))
}

#[expect(
    clippy::cast_precision_loss,
    reason = "label strings are short"
)]
fn literal_elements(parts: &[(Role, &str, &str)], config: &LabelConfig) -> Vec<TextElement> {
    parts
        .iter()
        .map(|&(role, text, font)| {
            let chars = text.chars().count() as Scalar;
            let empty = text.is_empty();
            TextElement {
                role,
                width: chars * LabelConfig::LITERAL_CHAR_WIDTH * config.font_size,
                height: if empty { 0.0 } else { config.font_size },
                geometry: TextGeometry::Literal {
                    value: text.to_owned(),
                    font: font.to_owned(),
                },
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Entity emission
// ---------------------------------------------------------------------------

fn emit_text(doc: &mut Document, element: &TextElement, origin: Point, config: &LabelConfig) {
    match &element.geometry {
        TextGeometry::Shape(shape) => {
            let offset = origin.to_vec2();
            let double = config
                .double_line_offset
                .filter(|_| element.role == Role::Prefix)
                .map(|d| offset + Vec2::new(d, d));
            for contour in shape.groups.iter().flat_map(PathGroup::contours) {
                if contour.len() < 2 {
                    continue;
                }
                doc.push(polyline(&contour.translated(offset), &config.text_layer));
                if let Some(double) = double {
                    doc.push(polyline(&contour.translated(double), &config.text_layer));
                }
            }
        }
        TextGeometry::Literal { value, font } => {
            if value.is_empty() {
                return;
            }
            doc.push(Entity::Text {
                layer: config.text_layer.clone(),
                insert: Point::new(origin.x, origin.y + config.font_size),
                height: config.font_size,
                value: value.clone(),
                style: Some(font.clone()),
            });
        }
    }
}

fn polyline(contour: &Contour, layer: &str) -> Entity {
    Entity::Polyline {
        layer: layer.to_owned(),
        closed: contour.is_closed(),
        points: contour.points.clone(),
    }
}

fn emit_barcode(doc: &mut Document, bitmap: &Bitmap, origin: Point, config: &LabelConfig) {
    let primitives = rasterize(bitmap, origin, config.module_size, config.barcode_style);
    doc.extend(
        primitives
            .into_iter()
            .map(|p| p.into_entity(&config.barcode_layer)),
    );
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
    use platedxf_dxf::{PolylineStyle, validate};
    use platedxf_fonts::CompositeFontProvider;
    use platedxf_graphics::GraphicsError;
    use platedxf_graphics::normalize::FontScale;
    use platedxf_graphics::types::DrawCommand;

    use super::*;
    use crate::source::FontOutlineSource;

    /// Every character is a 100-unit square with a 200-unit advance.
    /// Cap height 100 in a 1000-unit em, so size 80 scales by 0.8.
    struct SquareGlyphs;

    impl OutlineSource for SquareGlyphs {
        fn outline(&self, text: &str, _font: &str) -> Result<GlyphRun, LabelError> {
            let mut commands = Vec::new();
            for (i, _) in text.chars().enumerate() {
                let x = f64::from(u32::try_from(i).expect("short")) * 200.0;
                commands.extend([
                    DrawCommand::MoveTo(Point::new(x, -100.0)),
                    DrawCommand::LineTo(Point::new(x + 100.0, -100.0)),
                    DrawCommand::LineTo(Point::new(x + 100.0, 0.0)),
                    DrawCommand::LineTo(Point::new(x, 0.0)),
                    DrawCommand::Close,
                ]);
            }
            Ok(GlyphRun {
                commands,
                scale: FontScale::new(1000.0, Some(100.0)),
                space_advance: 250.0,
            })
        }
    }

    struct Unavailable;

    impl OutlineSource for Unavailable {
        fn outline(&self, text: &str, font: &str) -> Result<GlyphRun, LabelError> {
            Err(LabelError::OutlineUnavailable {
                text: text.into(),
                font: font.into(),
                reason: "offline".into(),
            })
        }
    }

    struct Malformed;

    impl OutlineSource for Malformed {
        fn outline(&self, _text: &str, _font: &str) -> Result<GlyphRun, LabelError> {
            Ok(GlyphRun {
                commands: vec![DrawCommand::LineTo(Point::new(1.0, 1.0))],
                scale: FontScale::new(1000.0, None),
                space_advance: 0.0,
            })
        }
    }

    fn no_bitmap(payload: &str) -> Result<Bitmap, LabelError> {
        Err(LabelError::BitmapUnavailable {
            payload: payload.into(),
            reason: "encoder offline".into(),
        })
    }

    fn center_bitmap(_payload: &str) -> Result<Bitmap, LabelError> {
        Bitmap::parse_text("000\n010\n000")
    }

    fn bare_config() -> LabelConfig {
        LabelConfig {
            separator: None,
            ..LabelConfig::default()
        }
    }

    fn pairs(dxf: &str) -> Vec<(&str, &str)> {
        let lines: Vec<&str> = dxf.lines().collect();
        lines.chunks_exact(2).map(|c| (c[0], c[1])).collect()
    }

    fn count_entities(dxf: &str, kind: &str) -> usize {
        pairs(dxf).iter().filter(|&&p| p == ("0", kind)).count()
    }

    /// Value pairs following the `n`th entity of `kind`, up to the next
    /// entity.
    fn entity<'a>(dxf: &'a str, kind: &str, n: usize) -> Vec<(&'a str, &'a str)> {
        let all = pairs(dxf);
        let start = all
            .iter()
            .enumerate()
            .filter(|(_, p)| **p == ("0", kind))
            .nth(n)
            .map(|(i, _)| i + 1)
            .expect("entity present");
        all[start..]
            .iter()
            .take_while(|(code, _)| *code != "0")
            .copied()
            .collect()
    }

    #[test]
    fn display_and_file_name() {
        let item = LabelItem::new("ABC", "71");
        assert_eq!(item.display(), "ABC - 71");
        let rendered =
            render_label(&item, &bare_config(), &SquareGlyphs, &no_bitmap).expect("render");
        assert_eq!(rendered.file_name(), "ABC - 71.dxf");
    }

    #[test]
    fn generate_items_covers_inclusive_range() {
        let items = generate_items("ABC", "7", 1, 3);
        let numbers: Vec<&str> = items.iter().map(|i| i.number.as_str()).collect();
        assert_eq!(numbers, ["71", "72", "73"]);
        assert!(items.iter().all(|i| i.prefix == "ABC"));
        assert_eq!(generate_items("A", "", 5, 5).len(), 1);
        assert!(generate_items("A", "", 5, 4).is_empty());
    }

    #[test]
    fn two_glyphs_and_one_module() {
        let item = LabelItem::new("AB", "");
        let rendered =
            render_label(&item, &bare_config(), &SquareGlyphs, &center_bitmap).expect("render");
        assert!(!rendered.barcode_omitted);
        assert!(rendered.diagnostics.is_empty());

        let dxf = rendered.to_dxf();
        validate(&dxf).expect("valid dxf");
        assert_eq!(count_entities(&dxf, "LWPOLYLINE"), 2);
        assert_eq!(count_entities(&dxf, "CIRCLE"), 1);

        // Text 240 wide, gap 150, barcode 24: row starts at (500 - 414) / 2.
        let a = entity(&dxf, "LWPOLYLINE", 0);
        assert_eq!(&a[..5], &[
            ("8", "TEXT_LAYER"),
            ("62", "0"),
            ("90", "5"),
            ("70", "1"),
            ("10", "43.000"),
        ]);
        assert_eq!(a[5], ("20", "-24.000"));
        let b = entity(&dxf, "LWPOLYLINE", 1);
        assert_eq!(b[4], ("10", "203.000"));

        // Barcode at x = 43 + 240 + 150, y = (128 - 24) / 2; module (1, 1).
        assert_eq!(entity(&dxf, "CIRCLE", 0), vec![
            ("8", "QR_LAYER"),
            ("62", "0"),
            ("10", "445.000"),
            ("20", "-64.000"),
            ("30", "0.000"),
            ("40", "2.400"),
        ]);

        // Text geometry precedes barcode geometry.
        let kinds: Vec<&str> = pairs(&dxf)
            .into_iter()
            .filter(|(code, v)| *code == "0" && ["LWPOLYLINE", "CIRCLE"].contains(v))
            .map(|(_, v)| v)
            .collect();
        assert_eq!(kinds, ["LWPOLYLINE", "LWPOLYLINE", "CIRCLE"]);
    }

    #[test]
    fn literal_mode_single_text_entity() {
        let config = LabelConfig {
            text_mode: TextMode::Literal,
            ..bare_config()
        };
        let rendered = render_label(&LabelItem::new("X1", ""), &config, &Unavailable, &no_bitmap)
            .expect("literal mode never consults fonts");
        assert!(rendered.barcode_omitted);

        let dxf = rendered.to_dxf();
        validate(&dxf).expect("valid dxf");
        assert_eq!(count_entities(&dxf, "TEXT"), 1);
        // Two characters at 0.6 × 80 each, centered in 500.
        assert_eq!(entity(&dxf, "TEXT", 0), vec![
            ("8", "TEXT_LAYER"),
            ("10", "202.000"),
            ("20", "-104.000"),
            ("30", "0.000"),
            ("40", "80.000"),
            ("1", "X1"),
            ("7", "sans"),
        ]);
    }

    #[test]
    fn literal_mode_three_elements() {
        let config = LabelConfig {
            text_mode: TextMode::Literal,
            ..LabelConfig::default()
        };
        let rendered = render_label(&LabelItem::new("ABC", "71"), &config, &Unavailable, &no_bitmap)
            .expect("render");
        let dxf = rendered.to_dxf();
        assert_eq!(count_entities(&dxf, "TEXT"), 3);
        // Widths 144, 48, 96 with 24 gaps: 336 wide, starting at 82.
        assert_eq!(entity(&dxf, "TEXT", 0)[1], ("10", "82.000"));
        let sep = entity(&dxf, "TEXT", 1);
        assert_eq!(sep[1], ("10", "250.000"));
        assert_eq!(sep[5], ("1", "-"));
        assert_eq!(sep[6], ("7", "serif"));
        assert_eq!(entity(&dxf, "TEXT", 2)[1], ("10", "322.000"));
    }

    #[test]
    fn separator_gap_derives_from_space_advance() {
        let item = LabelItem::new("A", "1");
        let rendered = render_label(&item, &LabelConfig::default(), &SquareGlyphs, &no_bitmap)
            .expect("render");
        let dxf = rendered.to_dxf();
        assert_eq!(count_entities(&dxf, "LWPOLYLINE"), 3);
        // Three 80-wide squares with 200 gaps (250 × 0.8): wider than the
        // container, so the row starts left of zero.
        assert_eq!(entity(&dxf, "LWPOLYLINE", 0)[4], ("10", "-70.000"));
        assert_eq!(entity(&dxf, "LWPOLYLINE", 1)[4], ("10", "210.000"));
        assert_eq!(entity(&dxf, "LWPOLYLINE", 2)[4], ("10", "490.000"));
    }

    #[test]
    fn explicit_separator_gap_wins() {
        let config = LabelConfig {
            separator_gap: Some(10.0),
            ..LabelConfig::default()
        };
        let rendered =
            render_label(&LabelItem::new("A", "1"), &config, &SquareGlyphs, &no_bitmap)
                .expect("render");
        // 80 + 10 + 80 + 10 + 80 = 260.
        assert_eq!(entity(&rendered.to_dxf(), "LWPOLYLINE", 0)[4], ("10", "120.000"));
    }

    #[test]
    fn double_line_duplicates_prefix_only() {
        let config = LabelConfig {
            double_line_offset: Some(0.4),
            separator_gap: Some(10.0),
            ..LabelConfig::default()
        };
        let rendered =
            render_label(&LabelItem::new("A", "1"), &config, &SquareGlyphs, &no_bitmap)
                .expect("render");
        let dxf = rendered.to_dxf();
        assert_eq!(count_entities(&dxf, "LWPOLYLINE"), 4);
        let first = entity(&dxf, "LWPOLYLINE", 0);
        let copy = entity(&dxf, "LWPOLYLINE", 1);
        assert_eq!(&first[4..6], &[("10", "120.000"), ("20", "-24.000")]);
        assert_eq!(&copy[4..6], &[("10", "120.400"), ("20", "-24.400")]);
    }

    #[test]
    fn missing_bitmap_still_renders_text() {
        let rendered = render_label(
            &LabelItem::new("AB", ""),
            &bare_config(),
            &SquareGlyphs,
            &no_bitmap,
        )
        .expect("render");
        assert!(rendered.barcode_omitted);
        assert_eq!(rendered.diagnostics.len(), 1);
        assert!(rendered.diagnostics[0].contains("AB - "));
        let dxf = rendered.to_dxf();
        assert_eq!(count_entities(&dxf, "CIRCLE"), 0);
        // Without a barcode the text alone is centered.
        assert_eq!(entity(&dxf, "LWPOLYLINE", 0)[4], ("10", "130.000"));
    }

    #[test]
    fn fatal_bitmap_error_fails_the_item() {
        let malformed = |_: &str| Bitmap::parse_text("10\n1");
        let err = render_label(&LabelItem::new("AB", "1"), &bare_config(), &SquareGlyphs, &malformed)
            .expect_err("invalid bitmap is not recoverable");
        assert!(matches!(err, LabelError::InvalidBitmap(_)));

        let cancelled = |_: &str| -> Result<Bitmap, LabelError> { Err(LabelError::Cancelled) };
        let err = render_label(&LabelItem::new("AB", "1"), &bare_config(), &SquareGlyphs, &cancelled)
            .expect_err("cancellation is not recoverable");
        assert_eq!(err, LabelError::Cancelled);
    }

    #[test]
    fn all_false_bitmap_emits_no_barcode_entities() {
        let blank = |_: &str| Bitmap::parse_text("00\n00");
        let rendered = render_label(&LabelItem::new("", ""), &bare_config(), &SquareGlyphs, &blank)
            .expect("render");
        assert!(!rendered.barcode_omitted);
        assert!(rendered.document.is_empty());
        validate(&rendered.to_dxf()).expect("valid dxf");
    }

    #[test]
    fn solid_style_and_classic_polylines() {
        let config = LabelConfig {
            barcode_style: crate::barcode::BarcodeStyle::Solid,
            polyline_style: PolylineStyle::Classic,
            ..bare_config()
        };
        let rendered =
            render_label(&LabelItem::new("A", ""), &config, &SquareGlyphs, &center_bitmap)
                .expect("render");
        let dxf = rendered.to_dxf();
        validate(&dxf).expect("valid dxf");
        assert_eq!(count_entities(&dxf, "SOLID"), 1);
        assert_eq!(count_entities(&dxf, "POLYLINE"), 1);
        assert_eq!(count_entities(&dxf, "VERTEX"), 5);
        assert_eq!(count_entities(&dxf, "SEQEND"), 1);
    }

    #[test]
    fn outline_failure_fails_the_item() {
        let err = render_label(
            &LabelItem::new("A", "1"),
            &LabelConfig::default(),
            &Unavailable,
            &center_bitmap,
        )
        .expect_err("no outlines");
        assert!(matches!(err, LabelError::OutlineUnavailable { text, .. } if text == "A"));
    }

    #[test]
    fn malformed_path_fails_the_item() {
        let err = render_label(
            &LabelItem::new("A", ""),
            &bare_config(),
            &Malformed,
            &center_bitmap,
        )
        .expect_err("malformed");
        assert_eq!(
            err,
            LabelError::MalformedPath(GraphicsError::MalformedPath {
                command: "LineTo",
                index: 0,
            })
        );
    }

    #[test]
    fn embedded_fonts_end_to_end() {
        let provider = CompositeFontProvider::new().expect("fonts");
        let source = FontOutlineSource::new(&provider);
        let rendered = render_label(
            &LabelItem::new("ABC", "71"),
            &LabelConfig::default(),
            &source,
            &center_bitmap,
        )
        .expect("render");
        assert!(rendered.diagnostics.is_empty(), "{:?}", rendered.diagnostics);
        let dxf = rendered.to_dxf();
        validate(&dxf).expect("valid dxf");
        // A and B have counters; every letter and digit has an outer.
        assert!(count_entities(&dxf, "LWPOLYLINE") >= 9);
        assert_eq!(count_entities(&dxf, "CIRCLE"), 1);
    }
}
