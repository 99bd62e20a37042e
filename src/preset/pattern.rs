//! Embedded pattern payload decoding
//!
//! The `Texture/Pattern/Pattern` parameter carries a base64-encoded raster,
//! optionally wrapped in a `data:image/...;base64,` URI and often broken
//! across lines.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

/// Decode a base64 pattern payload to raw image bytes.
pub fn decode_pattern(payload: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let payload = payload.trim();
    let encoded = if let Some(stripped) = payload.strip_prefix("data:image/png;base64,") {
        stripped
    } else if payload.starts_with("data:") {
        // Permissive on the media type token
        payload.split(',').nth(1).unwrap_or(payload)
    } else {
        payload
    };

    // Krita wraps base64 lines
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    BASE64.decode(compact.as_bytes())
}
