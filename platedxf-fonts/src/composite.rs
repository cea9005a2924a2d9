//! Composite font provider: embedded defaults + custom overrides.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::data::FontData;
use crate::error::FontError;
use crate::provider::FontProvider;

/// Font provider that checks custom fonts first, then falls back to embedded.
///
/// Font name lookup is case-insensitive: names are normalized to lowercase.
pub struct CompositeFontProvider {
    /// Embedded fonts (populated from the alias table at construction).
    embedded: HashMap<String, FontData>,
    /// User-provided fonts (loaded via [`Self::load_font`]).
    custom: HashMap<String, FontData>,
}

impl CompositeFontProvider {
    /// Create a provider with embedded defaults only.
    ///
    /// # Errors
    ///
    /// Returns [`FontError::ParseError`] if any embedded font fails to parse.
    pub fn new() -> Result<Self, FontError> {
        let embedded = crate::embedded::load_embedded()?.into_iter().collect();
        Ok(Self {
            embedded,
            custom: HashMap::new(),
        })
    }

    /// Load a custom font from bytes, registered under the given name.
    ///
    /// The name is normalized to lowercase for matching. If a font with
    /// the same name already exists in the custom set, it is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`FontError::ParseError`] if the bytes are not a valid font.
    pub fn load_font(&mut self, name: &str, bytes: Vec<u8>) -> Result<(), FontError> {
        let font = FontData::from_bytes(Arc::from(bytes.into_boxed_slice()))?;
        debug!("registered custom font {name:?}");
        self.custom.insert(name.to_lowercase(), font);
        Ok(())
    }

    /// Names of all available fonts, custom first, each list sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut custom: Vec<String> = self.custom.keys().cloned().collect();
        let mut embedded: Vec<String> = self
            .embedded
            .keys()
            .filter(|k| !self.custom.contains_key(*k))
            .cloned()
            .collect();
        custom.sort();
        embedded.sort();
        custom.extend(embedded);
        custom
    }
}

impl FontProvider for CompositeFontProvider {
    fn font(&self, name: &str) -> Option<&FontData> {
        let lower = name.to_lowercase();
        self.custom
            .get(&lower)
            .or_else(|| self.embedded.get(&lower))
    }
}

#[cfg(test)]
#[expect(clippy::expect_used, reason = "tests may panic")]
mod tests {
    use super::*;

    #[test]
    fn lookup_sans() {
        let provider = CompositeFontProvider::new().expect("init");
        assert!(provider.font("sans").is_some(), "sans should be found");
    }

    #[test]
    fn lookup_case_insensitive() {
        let provider = CompositeFontProvider::new().expect("init");
        assert!(provider.font("SERIF").is_some(), "SERIF should match serif");
        assert!(provider.font("Roman").is_some(), "Roman should match roman");
    }

    #[test]
    fn custom_overrides_embedded() {
        let mut provider = CompositeFontProvider::new().expect("init");

        let serif_bytes = include_bytes!("../fonts/DejaVuSerif.ttf").to_vec();
        provider.load_font("Sans", serif_bytes).expect("load");

        let after = provider.font("sans").expect("sans after override");
        let serif = provider.font("serif").expect("serif");
        assert_eq!(after.units_per_em(), serif.units_per_em());
        assert_eq!(after.cap_height(), serif.cap_height());
        assert_eq!(after.char_advance('A'), serif.char_advance('A'));
    }

    #[test]
    fn invalid_custom_font_is_rejected() {
        let mut provider = CompositeFontProvider::new().expect("init");
        let err = provider
            .load_font("broken", vec![0, 1, 2, 3])
            .expect_err("should fail");
        assert!(matches!(err, FontError::ParseError(_)));
        assert!(provider.font("broken").is_none());
    }

    #[test]
    fn names_lists_custom_first() {
        let mut provider = CompositeFontProvider::new().expect("init");
        provider
            .load_font("zz-custom", include_bytes!("../fonts/DejaVuSans.ttf").to_vec())
            .expect("load");
        let names = provider.names();
        assert_eq!(names.first().map(String::as_str), Some("zz-custom"));
        assert!(names.iter().any(|n| n == "serif"));
    }

    #[test]
    fn unknown_font_returns_none() {
        let provider = CompositeFontProvider::new().expect("init");
        assert!(
            provider.font("nonexistent-font").is_none(),
            "unknown font should return None"
        );
        assert!(!provider.contains("nonexistent-font"));
        assert!(provider.contains("Serif"));
    }
}
