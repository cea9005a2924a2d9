//! Font loading, metrics, and glyph outline extraction for `PlateDXF`.
//!
//! This crate wraps `ttf-parser` to provide OpenType/TrueType font support.
//! It is intentionally independent of `platedxf-graphics`: all types are
//! plain `f64`/`u16`/`i16` values. Turning outlines into drawing commands
//! happens in `platedxf-core`.

pub mod composite;
pub mod data;
pub mod error;
pub mod outline;
pub mod provider;

mod embedded;

pub use composite::CompositeFontProvider;
pub use data::FontData;
pub use error::FontError;
pub use outline::OutlineSink;
pub use provider::FontProvider;
