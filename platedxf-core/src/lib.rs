//! Label pipeline for `PlateDXF`.
//!
//! Turns a [`LabelItem`] into a DXF document: the prefix, separator and
//! number are outlined (or set as literal text), normalized to the
//! configured size, laid out in one centered row next to the item's
//! barcode, and written as entities.
//!
//! Fonts and barcode bitmaps come from outside through [`OutlineSource`]
//! and [`BitmapSource`]; everything else is owned data passed by value.

pub mod barcode;
pub mod batch;
pub mod config;
pub mod error;
pub mod label;
pub mod layout;
pub mod source;

pub use barcode::{BarcodeStyle, Bitmap};
pub use batch::{BatchOutcome, render_batch};
pub use config::{LabelConfig, TextMode};
pub use error::LabelError;
pub use label::{LabelItem, RenderedLabel, generate_items, render_label};
pub use source::{BitmapSource, FontOutlineSource, GlyphRun, OutlineSource};
