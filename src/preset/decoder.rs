//! Preset metadata decoding
//!
//! Turns the raw preset XML extracted from the container into a [`Preset`]:
//! identity fields plus a flat parameter map.

use indexmap::IndexMap;

use super::error::PresetError;
use super::types::Preset;
use crate::markup;

/// Decode the preset XML into identity fields and a parameter map.
///
/// `name` and `paintopid` default to the empty string when absent. Each
/// `<param>` child with a `name` attribute contributes one entry; the value
/// is taken from the `value` attribute, then element text, then CDATA, then
/// the param's own child elements re-serialized to markup (Krita embeds the
/// brush definition and sensor configs both ways), then the empty string.
/// A repeated name keeps the last value seen.
pub fn decode_preset(xml: &str) -> Result<Preset, PresetError> {
    let root = markup::parse(xml)?;
    if root.name() != "Preset" {
        return Err(PresetError::UnexpectedRoot(root.name().to_string()));
    }

    let name = root.field("name").unwrap_or_default().to_string();
    let paintopid = root.field("paintopid").unwrap_or_default().to_string();

    let params = root.children("param");
    if params.is_empty() {
        return Err(PresetError::MissingParams);
    }

    let mut parameters = IndexMap::new();
    for param in params {
        let Some(param_name) = param.field("name") else {
            continue;
        };
        let value = param
            .field("value")
            .or_else(|| param.field("text"))
            .or_else(|| param.field("cdata"))
            .map(str::to_string)
            .or_else(|| param.nested_markup())
            .unwrap_or_default();
        parameters.insert(param_name.to_string(), value);
    }

    Ok(Preset {
        name,
        paintopid,
        parameters,
    })
}
