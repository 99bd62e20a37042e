//! Preset decoding and projection
//!
//! The core of the converter: decoding the preset XML into a parameter map,
//! decoding the nested brush-definition markup, extracting the embedded
//! pattern payload, and projecting everything into the condensed brush
//! output.

mod brush;
pub mod decoder;
mod error;
mod pattern;
mod projection;
mod types;

pub use brush::decode_brush_definition;
pub use decoder::decode_preset;
pub use error::PresetError;
pub use pattern::decode_pattern;
pub use projection::project;
pub use types::{BrushDescriptor, BrushFile, BrushSummary, MaskGenerator, Preset};
