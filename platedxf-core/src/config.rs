//! Per-item rendering configuration.
//!
//! [`LabelConfig`] deserializes with `#[serde(default)]`, so a JSON file
//! naming a single field leaves every other field at its default.

use platedxf_dxf::PolylineStyle;
use platedxf_graphics::bezier::FlatteningPolicy;
use platedxf_graphics::types::Scalar;
use serde::Deserialize;

use crate::barcode::BarcodeStyle;

/// Where text geometry comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMode {
    /// Glyph outlines from the configured fonts, emitted as polygons.
    #[default]
    Outlines,
    /// One literal TEXT entity per element; no font is consulted.
    Literal,
}

/// Everything that shapes one label. Lengths are millimetres.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Capital letter height of the text.
    pub font_size: Scalar,
    pub container_width: Scalar,
    pub container_height: Scalar,
    /// Side of one barcode module.
    pub module_size: Scalar,
    /// Gap between the text run and the barcode.
    pub barcode_gap: Scalar,
    /// Character between prefix and number; `None` drops it.
    pub separator: Option<char>,
    /// Gap on each side of the separator. Derived from the number font's
    /// space advance when unset.
    pub separator_gap: Option<Scalar>,
    pub flattening: FlatteningPolicy,
    pub text_mode: TextMode,
    pub barcode_style: BarcodeStyle,
    pub polyline_style: PolylineStyle,
    pub prefix_font: String,
    /// Font for the separator and the number.
    pub number_font: String,
    /// When set, prefix contours are drawn a second time shifted by this
    /// amount along both axes.
    pub double_line_offset: Option<Scalar>,
    pub text_layer: String,
    pub barcode_layer: String,
}

impl LabelConfig {
    /// Width of one character in literal mode, as a fraction of the size.
    pub const LITERAL_CHAR_WIDTH: Scalar = 0.6;
    /// Separator gap in literal mode, as a fraction of the size.
    pub const LITERAL_GAP: Scalar = 0.3;
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            font_size: 80.0,
            container_width: 500.0,
            container_height: 128.0,
            module_size: 8.0,
            barcode_gap: 150.0,
            separator: Some('-'),
            separator_gap: None,
            flattening: FlatteningPolicy::default(),
            text_mode: TextMode::Outlines,
            barcode_style: BarcodeStyle::default(),
            polyline_style: PolylineStyle::Lightweight,
            prefix_font: "sans".into(),
            number_font: "serif".into(),
            double_line_offset: None,
            text_layer: "TEXT_LAYER".into(),
            barcode_layer: "QR_LAYER".into(),
        }
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
    use super::*;

    #[test]
    fn empty_json_is_default() {
        let cfg: LabelConfig = serde_json::from_str("{}").expect("json");
        assert_eq!(cfg, LabelConfig::default());
    }

    #[test]
    fn partial_json_overrides_named_fields_only() {
        let cfg: LabelConfig = serde_json::from_str(
            r#"{
                "font_size": 40,
                "separator": null,
                "text_mode": "literal",
                "flattening": { "policy": "adaptive", "tolerance": 0.1 },
                "barcode_style": { "style": "solid" },
                "polyline_style": "classic"
            }"#,
        )
        .expect("json");
        assert_eq!(cfg.font_size, 40.0);
        assert_eq!(cfg.separator, None);
        assert_eq!(cfg.text_mode, TextMode::Literal);
        assert_eq!(cfg.flattening, FlatteningPolicy::Adaptive {
            tolerance: 0.1,
            max_depth: 10,
        });
        assert_eq!(cfg.barcode_style, BarcodeStyle::Solid);
        assert_eq!(cfg.polyline_style, PolylineStyle::Classic);
        assert_eq!(cfg.container_width, 500.0);
        assert_eq!(cfg.text_layer, "TEXT_LAYER");
    }

    #[test]
    fn unknown_text_mode_is_rejected() {
        assert!(serde_json::from_str::<LabelConfig>(r#"{"text_mode":"bitmap"}"#).is_err());
    }
}
