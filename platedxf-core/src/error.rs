//! Error type for label rendering.

use std::fmt;

use platedxf_graphics::GraphicsError;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Why a label item could not be rendered (or was rendered degraded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelError {
    /// The outline source could not supply outlines for `text` in `font`.
    /// Fatal for the item.
    OutlineUnavailable {
        text: String,
        font: String,
        reason: String,
    },
    /// The bitmap source could not supply the barcode for `payload`.
    /// The item is still rendered, without its barcode.
    BitmapUnavailable { payload: String, reason: String },
    /// A glyph outline stream was malformed. Fatal for the item.
    MalformedPath(GraphicsError),
    /// Bitmap input that is empty, non-square, or unreadable.
    InvalidBitmap(String),
    /// The batch was cancelled before this item was attempted.
    Cancelled,
}

impl LabelError {
    /// Whether rendering may continue past this error for the same item.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::BitmapUnavailable { .. })
    }
}

impl fmt::Display for LabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutlineUnavailable { text, font, reason } => {
                write!(f, "outlines for {text:?} unavailable in font {font:?}: {reason}")
            }
            Self::BitmapUnavailable { payload, reason } => {
                write!(f, "barcode bitmap for {payload:?} unavailable: {reason}")
            }
            Self::MalformedPath(err) => write!(f, "{err}"),
            Self::InvalidBitmap(msg) => write!(f, "invalid bitmap: {msg}"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::error::Error for LabelError {}

impl From<GraphicsError> for LabelError {
    fn from(err: GraphicsError) -> Self {
        Self::MalformedPath(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_missing_bitmaps_are_recoverable() {
        let missing = LabelError::BitmapUnavailable {
            payload: "A - 1".into(),
            reason: "no file".into(),
        };
        assert!(missing.is_recoverable());
        assert!(!LabelError::InvalidBitmap("empty".into()).is_recoverable());
        assert!(!LabelError::Cancelled.is_recoverable());
        assert!(
            !LabelError::OutlineUnavailable {
                text: "A".into(),
                font: "sans".into(),
                reason: "font not found".into(),
            }
            .is_recoverable()
        );
    }
}
