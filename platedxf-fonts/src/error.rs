//! Font loading and query errors.

use std::fmt;

/// Errors that can occur when loading or querying fonts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontError {
    /// The font data could not be parsed.
    ParseError(String),
    /// The font has no glyph for these characters.
    MissingGlyphs(String),
}

impl fmt::Display for FontError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ParseError(msg) => write!(f, "font parse error: {msg}"),
            Self::MissingGlyphs(chars) => write!(f, "font has no glyph for {chars:?}"),
        }
    }
}

impl std::error::Error for FontError {}
