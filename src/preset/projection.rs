//! Parameter projection
//!
//! Flattens the parameter map plus the optional brush descriptor into the
//! condensed [`BrushSummary`]. Fields are only set when the source value is
//! present; descriptor-derived fields are applied first, dynamic properties
//! second (the key sets are disjoint).

use super::types::{BrushDescriptor, BrushSummary, Preset};
use crate::markup;

/// Build the condensed brush output for one preset.
///
/// `pattern_file` is left unset here; the batch driver fills it in after the
/// pattern payload has actually been decoded and written.
pub fn project(preset: &Preset, descriptor: Option<&BrushDescriptor>) -> BrushSummary {
    let mut out = BrushSummary::default();

    if let Some(d) = descriptor {
        out.brush_type = d.brush_type.clone();
        out.spacing = d.spacing;
        out.angle = d.angle;
        out.scale = d.scale;
        out.randomness = d.randomness;
        out.density = d.density;
        out.filename = d.filename.clone();

        if let Some(mask) = &d.mask_generator {
            out.size = mask.diameter;
            out.roundness = mask.ratio;
            out.hfade = mask.hfade;
            out.vfade = mask.vfade;
            out.spikes = mask.spikes;
        }
    }

    out.opacity = dynamic_property(preset, "OpacityValue");
    out.scatter = dynamic_property(preset, "ScatterValue");
    out.flow = dynamic_property(preset, "FlowValue");

    out.pressure_opacity = sensor_curve(preset, "OpacitySensor");
    out.pressure_size = sensor_curve(preset, "SizeSensor");
    out.pressure_rotation = sensor_curve(preset, "RotationSensor");
    out.pressure_scatter = sensor_curve(preset, "ScatterSensor");
    out.pressure_flow = sensor_curve(preset, "FlowSensor");

    out.pattern_scale = dynamic_property(preset, "Texture/Pattern/Scale");
    out.pattern_strength = dynamic_property(preset, "Texture/Pattern/Strength");

    out
}

/// Coerce a parameter to a number, keeping NaN for present-but-non-numeric
/// values so they surface as `null` instead of disappearing.
fn dynamic_property(preset: &Preset, name: &str) -> Option<f64> {
    preset
        .parameters
        .get(name)
        .map(|v| v.trim().parse().unwrap_or(f64::NAN))
}

/// Pull the scalar `curve` value out of a sensor parameter.
///
/// Sensor parameters hold their own markup document with a `<params>` root;
/// only the curve value is retained, the rest of the sensor config is
/// dropped.
fn sensor_curve(preset: &Preset, name: &str) -> Option<f64> {
    let xml = preset.parameters.get(name)?;
    let root = match markup::parse(xml.trim()) {
        Ok(root) => root,
        Err(e) => {
            tracing::debug!("unparsable {} config: {}", name, e);
            return None;
        }
    };
    if root.name() != "params" {
        return None;
    }
    root.field("curve")
        .map(|v| v.trim().parse().unwrap_or(f64::NAN))
}
