//! Name-based font lookup.

use crate::data::FontData;

/// Resolves a font name to loaded font data.
///
/// Name matching rules (case, aliases) belong to the implementation.
pub trait FontProvider {
    fn font(&self, name: &str) -> Option<&FontData>;

    /// Whether `name` resolves to a font.
    fn contains(&self, name: &str) -> bool {
        self.font(name).is_some()
    }
}
