//! Barcode bitmaps and their rasterization into layout primitives.
//!
//! The encoder that produces the bitmap lives outside this crate; here a
//! [`Bitmap`] is just a square grid of filled/empty modules, indexed
//! `[row][col]` from the top-left.

use log::debug;
use platedxf_dxf::Entity;
use platedxf_graphics::types::{Point, Scalar};
use serde::Deserialize;

use crate::error::LabelError;

// ---------------------------------------------------------------------------
// Bitmap
// ---------------------------------------------------------------------------

/// Square boolean module grid. `true` is a filled module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    side: usize,
    cells: Vec<bool>,
}

impl Bitmap {
    /// Build a bitmap from rows.
    ///
    /// # Errors
    ///
    /// [`LabelError::InvalidBitmap`] if there are no rows or any row's
    /// length differs from the number of rows.
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Self, LabelError> {
        let side = rows.len();
        if side == 0 {
            return Err(LabelError::InvalidBitmap("bitmap has no rows".into()));
        }
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != side) {
            return Err(LabelError::InvalidBitmap(format!(
                "row {i} has {} cells, expected {side}",
                row.len()
            )));
        }
        Ok(Self {
            side,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Parse a textual grid: one row per line, `1`, `#` or `X` for a
    /// filled module, `0`, `.` or space for an empty one. Blank lines are
    /// skipped; trailing whitespace is not trimmed, so a short row is an
    /// error rather than silently padded.
    ///
    /// # Errors
    ///
    /// [`LabelError::InvalidBitmap`] on an unknown character or a grid that
    /// [`Bitmap::from_rows`] rejects.
    pub fn parse_text(text: &str) -> Result<Self, LabelError> {
        let rows = text
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.trim().is_empty())
            .enumerate()
            .map(|(row, line)| {
                line.chars()
                    .map(|ch| match ch {
                        '1' | '#' | 'X' => Ok(true),
                        '0' | '.' | ' ' => Ok(false),
                        other => Err(LabelError::InvalidBitmap(format!(
                            "row {row}: unexpected character {other:?}"
                        ))),
                    })
                    .collect::<Result<Vec<bool>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rows(rows)
    }

    /// Number of modules per side.
    #[must_use]
    pub const fn side(&self) -> usize {
        self.side
    }

    /// `(row, col)` of every filled module, row-major.
    pub fn filled(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &on)| on)
            .map(|(i, _)| (i / self.side, i % self.side))
    }
}

// ---------------------------------------------------------------------------
// Rasterization
// ---------------------------------------------------------------------------

/// How a filled module is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum BarcodeStyle {
    /// A circle centered in the module, radius `radius_ratio × module`.
    Dots {
        #[serde(default = "default_radius_ratio")]
        radius_ratio: Scalar,
    },
    /// A filled square covering the whole module.
    Solid,
}

impl BarcodeStyle {
    pub const DEFAULT_RADIUS_RATIO: Scalar = 0.3;
}

const fn default_radius_ratio() -> Scalar {
    BarcodeStyle::DEFAULT_RADIUS_RATIO
}

impl Default for BarcodeStyle {
    fn default() -> Self {
        Self::Dots {
            radius_ratio: Self::DEFAULT_RADIUS_RATIO,
        }
    }
}

/// One drawn module, in layout coordinates (Y down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModulePrimitive {
    /// Square with top-left corner `origin` and side `size`.
    Quad { origin: Point, size: Scalar },
    Dot { center: Point, radius: Scalar },
}

impl ModulePrimitive {
    /// The DXF entity drawing this module on `layer`. Quads become
    /// `SOLID`s with corners top-left, top-right, bottom-left, bottom-right.
    #[must_use]
    pub fn into_entity(self, layer: &str) -> Entity {
        let layer = layer.to_owned();
        match self {
            Self::Quad { origin, size } => Entity::Solid {
                layer,
                corners: [
                    origin,
                    Point::new(origin.x + size, origin.y),
                    Point::new(origin.x, origin.y + size),
                    Point::new(origin.x + size, origin.y + size),
                ],
            },
            Self::Dot { center, radius } => Entity::Circle {
                layer,
                center,
                radius,
            },
        }
    }
}

/// Emit one primitive per filled module of `bitmap`, with the grid's
/// top-left corner at `origin`.
#[must_use]
#[expect(
    clippy::cast_precision_loss,
    reason = "module indices are tiny compared to f64 mantissa"
)]
pub fn rasterize(
    bitmap: &Bitmap,
    origin: Point,
    module_size: Scalar,
    style: BarcodeStyle,
) -> Vec<ModulePrimitive> {
    let primitives: Vec<ModulePrimitive> = bitmap
        .filled()
        .map(|(row, col)| {
            let corner = Point::new(
                origin.x + col as Scalar * module_size,
                origin.y + row as Scalar * module_size,
            );
            match style {
                BarcodeStyle::Solid => ModulePrimitive::Quad {
                    origin: corner,
                    size: module_size,
                },
                BarcodeStyle::Dots { radius_ratio } => ModulePrimitive::Dot {
                    center: Point::new(
                        corner.x + module_size / 2.0,
                        corner.y + module_size / 2.0,
                    ),
                    radius: module_size * radius_ratio,
                },
            }
        })
        .collect();
    debug!(
        "rasterized {}x{} bitmap into {} primitives",
        bitmap.side(),
        bitmap.side(),
        primitives.len()
    );
    primitives
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
    use super::*;

    fn single_center() -> Bitmap {
        Bitmap::from_rows(vec![
            vec![false, false, false],
            vec![false, true, false],
            vec![false, false, false],
        ])
        .expect("square")
    }

    #[test]
    fn from_rows_rejects_empty() {
        assert!(matches!(
            Bitmap::from_rows(Vec::new()),
            Err(LabelError::InvalidBitmap(_))
        ));
    }

    #[test]
    fn from_rows_rejects_non_square() {
        let err = Bitmap::from_rows(vec![vec![true, false], vec![true]]).expect_err("ragged");
        assert!(matches!(err, LabelError::InvalidBitmap(msg) if msg.contains("row 1")));
        assert!(Bitmap::from_rows(vec![vec![true, false, true]]).is_err());
    }

    #[test]
    fn parse_text_accepts_all_symbols() {
        let bmp = Bitmap::parse_text("1#X\n0. \n\n#..\n").expect("parse");
        assert_eq!(bmp.side(), 3);
        assert_eq!(
            bmp.filled().collect::<Vec<_>>(),
            vec![(0, 0), (0, 1), (0, 2), (2, 0)]
        );
    }

    #[test]
    fn parse_text_handles_crlf() {
        let bmp = Bitmap::parse_text("10\r\n01\r\n").expect("parse");
        assert_eq!(bmp.filled().collect::<Vec<_>>(), vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn parse_text_rejects_unknown_character() {
        let err = Bitmap::parse_text("10\n0z\n").expect_err("bad char");
        assert!(matches!(err, LabelError::InvalidBitmap(msg) if msg.contains("'z'")));
    }

    #[test]
    fn all_false_bitmap_yields_nothing() {
        let bmp = Bitmap::from_rows(vec![vec![false; 4]; 4]).expect("square");
        let prims = rasterize(&bmp, Point::ZERO, 8.0, BarcodeStyle::default());
        assert!(prims.is_empty());
    }

    #[test]
    fn dot_is_centered_in_module() {
        let prims = rasterize(
            &single_center(),
            Point::new(100.0, 20.0),
            8.0,
            BarcodeStyle::default(),
        );
        assert_eq!(prims, vec![ModulePrimitive::Dot {
            center: Point::new(112.0, 32.0),
            radius: 8.0 * 0.3,
        }]);
        assert!(matches!(prims[0].into_entity("QR"), Entity::Circle { .. }));
    }

    #[test]
    fn solid_covers_whole_module() {
        let prims = rasterize(&single_center(), Point::new(10.0, 0.0), 4.0, BarcodeStyle::Solid);
        assert_eq!(prims.len(), 1);
        let Entity::Solid { layer, corners } = prims[0].into_entity("QR") else {
            panic!("expected solid");
        };
        assert_eq!(layer, "QR");
        assert_eq!(corners, [
            Point::new(14.0, 4.0),
            Point::new(18.0, 4.0),
            Point::new(14.0, 8.0),
            Point::new(18.0, 8.0),
        ]);
    }

    #[test]
    fn row_maps_to_y_and_col_to_x() {
        let bmp = Bitmap::from_rows(vec![vec![false, true], vec![false, false]]).expect("square");
        let prims = rasterize(&bmp, Point::ZERO, 1.0, BarcodeStyle::Solid);
        let ModulePrimitive::Quad { origin, .. } = prims[0] else {
            panic!("expected quad");
        };
        assert_eq!(origin, Point::new(1.0, 0.0));
    }

    #[test]
    fn style_deserializes_with_defaults() {
        let style: BarcodeStyle = serde_json::from_str(r#"{"style":"dots"}"#).expect("json");
        assert_eq!(style, BarcodeStyle::default());
        let style: BarcodeStyle = serde_json::from_str(r#"{"style":"solid"}"#).expect("json");
        assert_eq!(style, BarcodeStyle::Solid);
    }
}
