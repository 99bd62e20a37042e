//! Decoded preset data types

use indexmap::IndexMap;
use serde::Serialize;

/// A decoded preset: identity plus the flattened parameter map.
///
/// Parameter values are kept as the raw strings found in the markup; the
/// `brush_definition` parameter holds a further markup document and the
/// `Texture/Pattern/Pattern` parameter holds a base64 raster payload.
#[derive(Debug, Clone, Serialize)]
pub struct Preset {
    pub name: String,
    pub paintopid: String,
    pub parameters: IndexMap<String, String>,
}

/// Brush tip shape parsed from the `brush_definition` parameter.
///
/// Every field is independently present-or-absent; absent never means zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrushDescriptor {
    pub brush_type: Option<String>,
    pub spacing: Option<f64>,
    pub angle: Option<f64>,
    pub scale: Option<f64>,
    pub randomness: Option<f64>,
    pub density: Option<f64>,
    pub filename: Option<String>,
    pub mask_generator: Option<MaskGenerator>,
}

/// Procedural tip generator nested inside a brush definition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaskGenerator {
    pub diameter: Option<f64>,
    pub ratio: Option<f64>,
    pub hfade: Option<f64>,
    pub vfade: Option<f64>,
    pub spikes: Option<f64>,
}

/// Condensed engine-relevant projection of a preset.
///
/// Only fields present in the source are serialized; a present-but-non-numeric
/// dynamic property comes through as NaN, which serializes as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrushSummary {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub brush_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub randomness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub density: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roundness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hfade: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vfade: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spikes: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scatter: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure_opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure_rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure_scatter: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure_flow: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_strength: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_file: Option<String>,
}

/// Shape of the `brushes/<base>_brush.json` artifact
#[derive(Debug, Clone, Serialize)]
pub struct BrushFile {
    pub name: String,
    pub paintopid: String,
    pub brush: BrushSummary,
}
