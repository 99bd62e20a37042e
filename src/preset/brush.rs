//! Brush definition decoding
//!
//! The `brush_definition` parameter of a preset holds a second, independent
//! markup document describing the brush tip shape. Many presets legitimately
//! omit it, and a handful in the wild carry unparsable fragments, so every
//! failure here degrades to "no shape data" instead of aborting the preset.

use super::types::{BrushDescriptor, MaskGenerator};
use crate::markup::{self, Node};

/// Decode the nested brush-definition markup.
///
/// Returns `None` when the payload is empty, has no `<Brush>` root, or does
/// not parse. A parse failure is logged and swallowed.
pub fn decode_brush_definition(xml: &str) -> Option<BrushDescriptor> {
    let xml = xml.trim();
    if xml.is_empty() {
        return None;
    }

    let root = match markup::parse(xml) {
        Ok(root) => root,
        Err(e) => {
            tracing::warn!("unparsable brush definition: {}", e);
            return None;
        }
    };
    if root.name() != "Brush" {
        tracing::debug!("brush definition root is <{}>, not <Brush>", root.name());
        return None;
    }

    Some(BrushDescriptor {
        brush_type: root.field("type").map(str::to_string),
        spacing: numeric_field(&root, "spacing"),
        angle: numeric_field(&root, "angle"),
        scale: numeric_field(&root, "scale"),
        randomness: numeric_field(&root, "randomness"),
        density: numeric_field(&root, "density"),
        filename: root.field("filename").map(str::to_string),
        mask_generator: root.child("MaskGenerator").map(decode_mask_generator),
    })
}

fn decode_mask_generator(node: &Node) -> MaskGenerator {
    MaskGenerator {
        diameter: numeric_field(node, "diameter"),
        ratio: numeric_field(node, "ratio"),
        hfade: numeric_field(node, "hfade"),
        vfade: numeric_field(node, "vfade"),
        spikes: numeric_field(node, "spikes"),
    }
}

/// A present-but-non-numeric attribute counts as absent
fn numeric_field(node: &Node, name: &str) -> Option<f64> {
    node.field(name).and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_descriptor() {
        let d = decode_brush_definition(
            r#"<Brush type="auto" spacing="0.1" angle="45" scale="2.0"
                      randomness="0.3" density="0.9" filename="tip.png">
                 <MaskGenerator diameter="50" ratio="1.0" hfade="0.5" vfade="0.5" spikes="2"/>
               </Brush>"#,
        )
        .unwrap();

        assert_eq!(d.brush_type.as_deref(), Some("auto"));
        assert_eq!(d.spacing, Some(0.1));
        assert_eq!(d.angle, Some(45.0));
        assert_eq!(d.scale, Some(2.0));
        assert_eq!(d.randomness, Some(0.3));
        assert_eq!(d.density, Some(0.9));
        assert_eq!(d.filename.as_deref(), Some("tip.png"));

        let mask = d.mask_generator.unwrap();
        assert_eq!(mask.diameter, Some(50.0));
        assert_eq!(mask.ratio, Some(1.0));
        assert_eq!(mask.hfade, Some(0.5));
        assert_eq!(mask.vfade, Some(0.5));
        assert_eq!(mask.spikes, Some(2.0));
    }

    #[test]
    fn absent_fields_stay_absent() {
        let d = decode_brush_definition(r#"<Brush type="auto"/>"#).unwrap();
        assert_eq!(d.brush_type.as_deref(), Some("auto"));
        assert_eq!(d.spacing, None);
        assert_eq!(d.angle, None);
        assert!(d.mask_generator.is_none());
    }

    #[test]
    fn mask_generator_presence_is_independent() {
        let d = decode_brush_definition(r#"<Brush><MaskGenerator diameter="12"/></Brush>"#)
            .unwrap();
        assert_eq!(d.brush_type, None);
        let mask = d.mask_generator.unwrap();
        assert_eq!(mask.diameter, Some(12.0));
        assert_eq!(mask.ratio, None);
    }

    #[test]
    fn empty_payload_is_absent() {
        assert!(decode_brush_definition("").is_none());
        assert!(decode_brush_definition("   \n ").is_none());
    }

    #[test]
    fn wrong_root_is_absent() {
        assert!(decode_brush_definition("<NotABrush spacing=\"0.1\"/>").is_none());
    }

    #[test]
    fn parse_failure_is_absent_not_fatal() {
        assert!(decode_brush_definition("<Brush><broken></Brush>").is_none());
    }

    #[test]
    fn non_numeric_shape_field_counts_as_absent() {
        let d = decode_brush_definition(r#"<Brush spacing="wide"/>"#).unwrap();
        assert_eq!(d.spacing, None);
    }
}
