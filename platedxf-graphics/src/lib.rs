//! Geometry for the `PlateDXF` pipeline.
//!
//! Everything in this crate is pure computation on owned data: curve
//! flattening, contour assembly from drawing commands, hole classification,
//! bounding boxes, and metric normalization. No I/O happens here.

pub mod types;

pub mod bbox;
pub mod bezier;
pub mod classify;
pub mod contour;
pub mod error;
pub mod normalize;

pub use error::GraphicsError;
