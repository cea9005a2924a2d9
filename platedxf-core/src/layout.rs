//! Horizontal composition of text elements and the barcode block.
//!
//! Elements are placed left to right in a single row, each preceded by its
//! own gap, and the row is centered in a fixed-size container. Text
//! elements share one top edge so that the tallest is vertically centered;
//! the barcode is centered on its own height. Nothing is clipped: a row
//! wider than the container simply starts at a negative x.

use platedxf_graphics::types::{Point, Scalar};

/// What an element is, which decides its vertical placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Text,
    Barcode,
}

/// One element to be placed, with its measured size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowItem {
    pub kind: ElementKind,
    pub width: Scalar,
    pub height: Scalar,
    /// Space between the previous element and this one.
    pub gap_before: Scalar,
}

impl RowItem {
    #[must_use]
    pub const fn text(width: Scalar, height: Scalar, gap_before: Scalar) -> Self {
        Self {
            kind: ElementKind::Text,
            width,
            height,
            gap_before,
        }
    }

    #[must_use]
    pub const fn barcode(side: Scalar, gap_before: Scalar) -> Self {
        Self {
            kind: ElementKind::Barcode,
            width: side,
            height: side,
            gap_before,
        }
    }

    /// Zero-width elements take no room: their gap is dropped as well, so
    /// adding or removing one never moves the others.
    fn is_collapsed(&self) -> bool {
        self.width <= 0.0
    }
}

/// The fixed-size area content is centered in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Container {
    pub width: Scalar,
    pub height: Scalar,
}

/// Result of [`layout`]: one top-left origin per input item, same order.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub origins: Vec<Point>,
    /// Sum of widths and applied gaps.
    pub content_width: Scalar,
    /// Height of the tallest text element.
    pub text_height: Scalar,
}

/// Place `items` in one centered row inside `container`.
#[must_use]
pub fn layout(items: &[RowItem], container: Container) -> Layout {
    let content_width: Scalar = items
        .iter()
        .filter(|item| !item.is_collapsed())
        .map(|item| item.gap_before + item.width)
        .sum::<Scalar>()
        - leading_gap(items);

    let text_height = items
        .iter()
        .filter(|item| item.kind == ElementKind::Text)
        .map(|item| item.height)
        .fold(0.0, Scalar::max);
    let text_y = (container.height - text_height) / 2.0;

    let mut x = (container.width - content_width) / 2.0;
    let mut first = true;
    let origins = items
        .iter()
        .map(|item| {
            if !item.is_collapsed() {
                if !first {
                    x += item.gap_before;
                }
                first = false;
            }
            let y = match item.kind {
                ElementKind::Text => text_y,
                ElementKind::Barcode => (container.height - item.height) / 2.0,
            };
            let origin = Point::new(x, y);
            if !item.is_collapsed() {
                x += item.width;
            }
            origin
        })
        .collect();

    Layout {
        origins,
        content_width,
        text_height,
    }
}

/// The gap of the first visible element sits outside the row.
fn leading_gap(items: &[RowItem]) -> Scalar {
    items
        .iter()
        .find(|item| !item.is_collapsed())
        .map_or(0.0, |item| item.gap_before)
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

    const BOX: Container = Container {
        width: 500.0,
        height: 128.0,
    };

    #[test]
    fn single_element_is_centered() {
        let out = layout(&[RowItem::text(100.0, 80.0, 0.0)], BOX);
        assert_eq!(out.origins, vec![Point::new(200.0, 24.0)]);
        assert_eq!(out.content_width, 100.0);
        assert_eq!(out.text_height, 80.0);
    }

    #[test]
    fn gaps_are_applied_between_elements() {
        let items = [
            RowItem::text(100.0, 80.0, 0.0),
            RowItem::text(20.0, 10.0, 30.0),
            RowItem::barcode(50.0, 150.0),
        ];
        let out = layout(&items, BOX);
        assert_eq!(out.content_width, 350.0);
        assert_eq!(out.origins[0].x, 75.0);
        assert_eq!(out.origins[1].x, 205.0);
        assert_eq!(out.origins[2].x, 375.0);
    }

    #[test]
    fn text_shares_top_edge_and_barcode_centers_itself() {
        let items = [
            RowItem::text(10.0, 80.0, 0.0),
            RowItem::text(10.0, 20.0, 5.0),
            RowItem::barcode(40.0, 5.0),
        ];
        let out = layout(&items, BOX);
        assert_eq!(out.origins[0].y, 24.0);
        assert_eq!(out.origins[1].y, 24.0);
        assert_eq!(out.origins[2].y, 44.0);
    }

    #[test]
    fn first_gap_is_ignored() {
        let with = layout(&[RowItem::text(100.0, 10.0, 40.0)], BOX);
        let without = layout(&[RowItem::text(100.0, 10.0, 0.0)], BOX);
        assert_eq!(with, without);
    }

    #[test]
    fn zero_width_element_does_not_shift_others() {
        let base = [RowItem::text(100.0, 80.0, 0.0), RowItem::barcode(24.0, 150.0)];
        let with_empty = [
            RowItem::text(100.0, 80.0, 0.0),
            RowItem::text(0.0, 0.0, 30.0),
            RowItem::barcode(24.0, 150.0),
        ];
        let a = layout(&base, BOX);
        let b = layout(&with_empty, BOX);
        assert_eq!(a.content_width, b.content_width);
        assert_eq!(a.origins[0], b.origins[0]);
        assert_eq!(a.origins[1], b.origins[2]);
        // The empty element sits where the next one would start.
        assert_eq!(b.origins[1].x, 213.0);
    }

    #[test]
    fn leading_zero_width_element_does_not_shift_others() {
        let a = layout(&[RowItem::text(100.0, 80.0, 0.0)], BOX);
        let b = layout(
            &[RowItem::text(0.0, 0.0, 0.0), RowItem::text(100.0, 80.0, 25.0)],
            BOX,
        );
        assert_eq!(a.origins[0], b.origins[1]);
    }

    #[test]
    fn container_width_only_recenters() {
        let items = [RowItem::text(100.0, 80.0, 0.0), RowItem::barcode(24.0, 150.0)];
        let narrow = layout(&items, Container {
            width: 100.0,
            height: 128.0,
        });
        let wide = layout(&items, BOX);
        let shift = wide.origins[0].x - narrow.origins[0].x;
        assert_eq!(shift, 200.0);
        assert_eq!(wide.origins[1].x - narrow.origins[1].x, shift);
        assert!(narrow.origins[0].x < 0.0);
    }

    #[test]
    fn empty_row() {
        let out = layout(&[], BOX);
        assert!(out.origins.is_empty());
        assert_eq!(out.content_width, 0.0);
        assert_eq!(out.text_height, 0.0);
    }
}
