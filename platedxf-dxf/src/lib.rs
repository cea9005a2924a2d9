//! DXF writer for `PlateDXF` layouts.
//!
//! Serializes a [`Document`] into AutoCAD R12 (`AC1009`) ASCII DXF: a flat
//! sequence of group-code / value line pairs.
//!
//! Key design points:
//! - Entities hold layout-frame coordinates, where Y points **down**. DXF
//!   has Y pointing up, so every Y coordinate is negated at write time.
//! - Real values are written with a fixed number of decimals (three by
//!   default); negative zero is normalized to `0.000`.
//! - Output is framed as `HEADER` section, `ENTITIES` section, `EOF`, each
//!   exactly once. [`validate`] checks that framing on arbitrary text.

mod error;

use std::fmt::Write;

use log::debug;
use platedxf_graphics::types::{Point, Scalar};
use serde::Deserialize;

pub use error::DxfError;

/// MIME type consumers should use for the serialized document.
pub const MIME_TYPE: &str = "application/dxf";

/// File extension for the serialized document.
pub const FILE_EXTENSION: &str = "dxf";

// ---------------------------------------------------------------------------
// Document model
// ---------------------------------------------------------------------------

/// One drawable DXF entity in layout coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    /// Literal text; `insert` is the baseline-left insertion point.
    Text {
        layer: String,
        insert: Point,
        height: Scalar,
        value: String,
        style: Option<String>,
    },
    /// Polygon through `points`, flagged closed or open.
    Polyline {
        layer: String,
        points: Vec<Point>,
        closed: bool,
    },
    /// Filled quadrilateral. Corners follow DXF order: the third and fourth
    /// corners are swapped relative to a ring, so a square is given as
    /// top-left, top-right, bottom-left, bottom-right.
    Solid { layer: String, corners: [Point; 4] },
    Circle {
        layer: String,
        center: Point,
        radius: Scalar,
    },
}

/// An append-only list of entities.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    entities: Vec<Entity>,
}

impl Document {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entities: Vec::new(),
        }
    }

    pub fn push(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Extend<Entity> for Document {
    fn extend<T: IntoIterator<Item = Entity>>(&mut self, iter: T) {
        self.entities.extend(iter);
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// How polygons are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolylineStyle {
    /// One `LWPOLYLINE` entity with inline vertices.
    #[default]
    Lightweight,
    /// `POLYLINE` header, one `VERTEX` per point, then `SEQEND`.
    Classic,
}

/// Options controlling DXF output.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Number of decimal places for real values. Default: 3.
    pub precision: usize,
    pub polyline_style: PolylineStyle,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            precision: 3,
            polyline_style: PolylineStyle::Lightweight,
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Render a [`Document`] to DXF text with default options.
#[must_use]
pub fn render(doc: &Document) -> String {
    render_with_options(doc, &RenderOptions::default())
}

/// Render a [`Document`] to DXF text with custom options.
#[must_use]
pub fn render_with_options(doc: &Document, opts: &RenderOptions) -> String {
    let mut w = GroupWriter::new(opts.precision, doc.len());
    write_header(&mut w);
    w.text(0, "SECTION");
    w.text(2, "ENTITIES");
    for entity in doc.entities() {
        write_entity(&mut w, entity, opts.polyline_style);
    }
    w.text(0, "ENDSEC");
    w.last(0, "EOF");
    debug!("rendered {} entities into {} bytes", doc.len(), w.out.len());
    w.out
}

// ---------------------------------------------------------------------------
// Group writer
// ---------------------------------------------------------------------------

/// Accumulates code/value line pairs.
struct GroupWriter {
    out: String,
    precision: usize,
}

impl GroupWriter {
    fn new(precision: usize, entity_hint: usize) -> Self {
        Self {
            out: String::with_capacity(256 + entity_hint * 96),
            precision,
        }
    }

    fn text(&mut self, code: i32, value: &str) {
        let _ = writeln!(self.out, "{code}\n{value}");
    }

    /// Final pair, without a trailing newline.
    fn last(&mut self, code: i32, value: &str) {
        let _ = write!(self.out, "{code}\n{value}");
    }

    fn int(&mut self, code: i32, value: i64) {
        let _ = writeln!(self.out, "{code}\n{value}");
    }

    /// Values that round to zero at the configured precision are written
    /// unsigned.
    fn real(&mut self, code: i32, value: Scalar) {
        let precision = self.precision;
        let factor = 10f64.powi(i32::try_from(precision).unwrap_or(i32::MAX));
        let value = if (value * factor).round() == 0.0 { 0.0 } else { value };
        let _ = writeln!(self.out, "{code}\n{value:.precision$}");
    }

    /// A point under codes `10 + k`, `20 + k`, with Y flipped.
    fn point(&mut self, k: i32, p: Point) {
        self.real(10 + k, p.x);
        self.real(20 + k, -p.y);
    }

    /// A point plus a zero elevation under `30 + k`.
    fn point3(&mut self, k: i32, p: Point) {
        self.point(k, p);
        self.real(30 + k, 0.0);
    }
}

fn write_header(w: &mut GroupWriter) {
    w.text(0, "SECTION");
    w.text(2, "HEADER");
    w.text(9, "$ACADVER");
    w.text(1, "AC1009");
    w.text(9, "$DWGCODEPAGE");
    w.text(3, "ANSI_1252");
    w.text(0, "ENDSEC");
}

// ---------------------------------------------------------------------------
// Individual entity writers
// ---------------------------------------------------------------------------

/// Color number 0 means "by block".
const COLOR_BYBLOCK: i64 = 0;

fn write_entity(w: &mut GroupWriter, entity: &Entity, style: PolylineStyle) {
    match entity {
        Entity::Text {
            layer,
            insert,
            height,
            value,
            style: text_style,
        } => {
            w.text(0, "TEXT");
            w.text(8, layer);
            w.point3(0, *insert);
            w.real(40, *height);
            w.text(1, value);
            if let Some(text_style) = text_style {
                w.text(7, text_style);
            }
        }
        Entity::Polyline {
            layer,
            points,
            closed,
        } => match style {
            PolylineStyle::Lightweight => write_lwpolyline(w, layer, points, *closed),
            PolylineStyle::Classic => write_classic_polyline(w, layer, points, *closed),
        },
        Entity::Solid { layer, corners } => {
            w.text(0, "SOLID");
            w.text(8, layer);
            w.int(62, COLOR_BYBLOCK);
            for (k, corner) in (0..).zip(corners) {
                w.point3(k, *corner);
            }
        }
        Entity::Circle {
            layer,
            center,
            radius,
        } => {
            w.text(0, "CIRCLE");
            w.text(8, layer);
            w.int(62, COLOR_BYBLOCK);
            w.point3(0, *center);
            w.real(40, *radius);
        }
    }
}

#[expect(
    clippy::cast_possible_wrap,
    reason = "vertex counts are far below i64::MAX"
)]
fn write_lwpolyline(w: &mut GroupWriter, layer: &str, points: &[Point], closed: bool) {
    w.text(0, "LWPOLYLINE");
    w.text(8, layer);
    w.int(62, COLOR_BYBLOCK);
    w.int(90, points.len() as i64);
    w.int(70, i64::from(closed));
    for p in points {
        w.point(0, *p);
    }
}

fn write_classic_polyline(w: &mut GroupWriter, layer: &str, points: &[Point], closed: bool) {
    w.text(0, "POLYLINE");
    w.text(8, layer);
    w.int(62, COLOR_BYBLOCK);
    w.int(66, 1);
    w.point3(0, Point::ZERO);
    w.int(70, i64::from(closed));
    for p in points {
        w.text(0, "VERTEX");
        w.text(8, layer);
        w.point3(0, *p);
    }
    w.text(0, "SEQEND");
    w.text(8, layer);
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check the structural rules of a DXF document.
///
/// The text must be whole code/value pairs with integer codes; it must
/// contain exactly one `HEADER` and one `ENTITIES` section, in that order,
/// every `SECTION` must be closed by `ENDSEC`, and a single `EOF` must end
/// the document.
///
/// # Errors
///
/// Returns the first [`DxfError`] encountered.
pub fn validate(text: &str) -> Result<(), DxfError> {
    let lines: Vec<&str> = text.lines().collect();
    if lines.len() % 2 != 0 {
        return Err(DxfError::OddLineCount(lines.len()));
    }

    let mut pairs = Vec::with_capacity(lines.len() / 2);
    for (i, chunk) in lines.chunks_exact(2).enumerate() {
        let code: i32 = chunk[0]
            .trim()
            .parse()
            .map_err(|_| DxfError::BadGroupCode {
                line: i * 2 + 1,
                text: chunk[0].to_owned(),
            })?;
        pairs.push((code, chunk[1].trim()));
    }

    let structure = |msg: &str| Err(DxfError::Structure(msg.to_owned()));
    let mut sections: Vec<&str> = Vec::new();
    let mut open: Option<&str> = None;
    let mut i = 0;

    while i < pairs.len() {
        match pairs[i] {
            (0, "SECTION") => {
                if open.is_some() {
                    return structure("SECTION opened inside another section");
                }
                let Some(&(2, name)) = pairs.get(i + 1) else {
                    return structure("SECTION without a name");
                };
                open = Some(name);
                i += 2;
                continue;
            }
            (0, "ENDSEC") => {
                let Some(name) = open.take() else {
                    return structure("ENDSEC without SECTION");
                };
                sections.push(name);
            }
            (0, "EOF") => {
                if open.is_some() {
                    return structure("EOF inside an open section");
                }
                if i + 1 != pairs.len() {
                    return structure("content after EOF");
                }
                return match sections.as_slice() {
                    ["HEADER", "ENTITIES"] => Ok(()),
                    other => Err(DxfError::Structure(format!(
                        "expected HEADER then ENTITIES, found {other:?}"
                    ))),
                };
            }
            _ if open.is_none() => return structure("group outside of any section"),
            _ => {}
        }
        i += 1;
    }

    structure("missing EOF")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
