//! Bundled font data and name alias table.
//!
//! Embeds the DejaVu Sans and DejaVu Serif TrueType fonts via
//! `include_bytes!` so that labels can be outlined without any font files
//! on disk. `sans` plays the role of the display face for prefixes and
//! `serif` the plain face for numbers and the separator.

use crate::data::FontData;
use crate::error::FontError;

static DEJAVU_SANS: &[u8] = include_bytes!("../fonts/DejaVuSans.ttf");
static DEJAVU_SERIF: &[u8] = include_bytes!("../fonts/DejaVuSerif.ttf");

/// Each bundled face with the lowercase names it answers to.
static FACES: &[(&[u8], &[&str])] = &[
    (DEJAVU_SANS, &["sans", "dejavu-sans"]),
    (DEJAVU_SERIF, &["serif", "roman", "dejavu-serif"]),
];

/// Parse every bundled face once and pair it with each of its names.
///
/// # Errors
///
/// [`FontError::ParseError`] if a bundled file is corrupt.
pub fn load_embedded() -> Result<Vec<(String, FontData)>, FontError> {
    let mut fonts = Vec::new();
    for &(bytes, names) in FACES {
        let font = FontData::from_static(bytes)?;
        fonts.extend(names.iter().map(|&name| (name.to_owned(), font.clone())));
    }
    Ok(fonts)
}
