//! PNG textual chunk extraction
//!
//! Krita stores a preset's metadata as textual chunks inside the `.kpp`
//! container, which is an ordinary PNG image. This module walks the chunk
//! stream and collects every `tEXt`, `zTXt` and `iTXt` chunk into a
//! keyword -> text map. Pixel data is never decoded.

mod error;

pub use error::PngError;

use byteorder::{BigEndian, ReadBytesExt};
use flate2::read::ZlibDecoder;
use indexmap::IndexMap;
use std::io::{Cursor, Read, Seek, SeekFrom};

/// Eight-byte PNG file signature
const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// Extract all textual chunks from a PNG byte buffer.
///
/// Returns the chunks in stream order. Later chunks with a repeated keyword
/// overwrite earlier ones. Chunk CRCs are not validated.
pub fn text_chunks(data: &[u8]) -> Result<IndexMap<String, String>, PngError> {
    if data.len() < PNG_SIGNATURE.len() || data[..PNG_SIGNATURE.len()] != PNG_SIGNATURE {
        return Err(PngError::InvalidSignature);
    }

    let mut cursor = Cursor::new(data);
    cursor.seek(SeekFrom::Start(PNG_SIGNATURE.len() as u64))?;

    let mut tags = IndexMap::new();

    loop {
        let length = cursor
            .read_u32::<BigEndian>()
            .map_err(|_| PngError::UnexpectedEof)? as usize;

        let mut chunk_type = [0u8; 4];
        cursor
            .read_exact(&mut chunk_type)
            .map_err(|_| PngError::UnexpectedEof)?;

        let start = cursor.position() as usize;
        // Chunk payload plus the 4-byte CRC must fit in the buffer
        let end = start
            .checked_add(length)
            .filter(|&e| e + 4 <= data.len())
            .ok_or(PngError::UnexpectedEof)?;
        let chunk = &data[start..end];

        match &chunk_type {
            b"IEND" => break,
            b"tEXt" => {
                let (keyword, text) = decode_text(chunk)?;
                tags.insert(keyword, text);
            }
            b"zTXt" => {
                let (keyword, text) = decode_compressed_text(chunk)?;
                tags.insert(keyword, text);
            }
            b"iTXt" => {
                let (keyword, text) = decode_international_text(chunk)?;
                tags.insert(keyword, text);
            }
            _ => {}
        }

        cursor.seek(SeekFrom::Start((end + 4) as u64))?;
    }

    Ok(tags)
}

/// Split a chunk payload at the NUL keyword terminator
fn split_keyword(chunk: &[u8], kind: &'static str) -> Result<(String, usize), PngError> {
    let nul = chunk
        .iter()
        .position(|&b| b == 0)
        .ok_or(PngError::MalformedChunk(kind))?;
    Ok((latin1(&chunk[..nul]), nul + 1))
}

/// PNG keywords and `tEXt`/`zTXt` payloads are Latin-1
fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn inflate(data: &[u8]) -> Result<Vec<u8>, PngError> {
    let mut out = Vec::new();
    ZlibDecoder::new(data)
        .read_to_end(&mut out)
        .map_err(|e| PngError::Inflate(e.to_string()))?;
    Ok(out)
}

/// `tEXt`: keyword NUL text, both Latin-1
fn decode_text(chunk: &[u8]) -> Result<(String, String), PngError> {
    let (keyword, rest) = split_keyword(chunk, "tEXt")?;
    Ok((keyword, latin1(&chunk[rest..])))
}

/// `zTXt`: keyword NUL compression-method zlib-stream
fn decode_compressed_text(chunk: &[u8]) -> Result<(String, String), PngError> {
    let (keyword, rest) = split_keyword(chunk, "zTXt")?;
    match chunk.get(rest) {
        Some(0) => {}
        _ => return Err(PngError::MalformedChunk("zTXt")),
    }
    let text = inflate(&chunk[rest + 1..])?;
    Ok((keyword, latin1(&text)))
}

/// `iTXt`: keyword NUL comp-flag comp-method language NUL translated NUL utf8-text
fn decode_international_text(chunk: &[u8]) -> Result<(String, String), PngError> {
    let (keyword, rest) = split_keyword(chunk, "iTXt")?;
    let body = &chunk[rest..];
    if body.len() < 2 {
        return Err(PngError::MalformedChunk("iTXt"));
    }
    let compressed = match body[0] {
        0 => false,
        1 => true,
        _ => return Err(PngError::MalformedChunk("iTXt")),
    };

    // Skip the language tag and translated keyword
    let mut pos = 2;
    for _ in 0..2 {
        let nul = body[pos..]
            .iter()
            .position(|&b| b == 0)
            .ok_or(PngError::MalformedChunk("iTXt"))?;
        pos += nul + 1;
    }

    let text = if compressed {
        String::from_utf8_lossy(&inflate(&body[pos..])?).into_owned()
    } else {
        String::from_utf8_lossy(&body[pos..]).into_owned()
    };
    Ok((keyword, text))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    fn chunk(chunk_type: &[u8; 4], payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        out.extend_from_slice(chunk_type);
        out.extend_from_slice(payload);
        out.extend_from_slice(&[0, 0, 0, 0]); // CRC is not validated
        out
    }

    fn png_with(chunks: &[Vec<u8>]) -> Vec<u8> {
        let mut out = PNG_SIGNATURE.to_vec();
        out.extend_from_slice(&chunk(b"IHDR", &[0u8; 13]));
        for c in chunks {
            out.extend_from_slice(c);
        }
        out.extend_from_slice(&chunk(b"IEND", &[]));
        out
    }

    fn text_chunk(keyword: &str, text: &str) -> Vec<u8> {
        let mut payload = keyword.as_bytes().to_vec();
        payload.push(0);
        payload.extend_from_slice(text.as_bytes());
        chunk(b"tEXt", &payload)
    }

    #[test]
    fn extracts_text_chunk() {
        let data = png_with(&[text_chunk("preset", "<Preset name=\"a\"/>")]);
        let tags = text_chunks(&data).unwrap();
        assert_eq!(tags.get("preset").map(String::as_str), Some("<Preset name=\"a\"/>"));
    }

    #[test]
    fn extracts_compressed_chunk() {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"hello preset").unwrap();
        let compressed = encoder.finish().unwrap();

        let mut payload = b"preset".to_vec();
        payload.push(0); // keyword terminator
        payload.push(0); // compression method
        payload.extend_from_slice(&compressed);

        let data = png_with(&[chunk(b"zTXt", &payload)]);
        let tags = text_chunks(&data).unwrap();
        assert_eq!(tags.get("preset").map(String::as_str), Some("hello preset"));
    }

    #[test]
    fn extracts_international_chunk() {
        let mut payload = b"version".to_vec();
        payload.push(0); // keyword terminator
        payload.push(0); // not compressed
        payload.push(0); // compression method
        payload.push(0); // empty language tag
        payload.push(0); // empty translated keyword
        payload.extend_from_slice("5.0".as_bytes());

        let data = png_with(&[chunk(b"iTXt", &payload)]);
        let tags = text_chunks(&data).unwrap();
        assert_eq!(tags.get("version").map(String::as_str), Some("5.0"));
    }

    #[test]
    fn repeated_keyword_overwrites() {
        let data = png_with(&[text_chunk("preset", "one"), text_chunk("preset", "two")]);
        let tags = text_chunks(&data).unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags.get("preset").map(String::as_str), Some("two"));
    }

    #[test]
    fn ignores_unknown_chunks() {
        let data = png_with(&[chunk(b"pHYs", &[0u8; 9]), text_chunk("preset", "x")]);
        let tags = text_chunks(&data).unwrap();
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn rejects_non_png_buffer() {
        assert!(matches!(
            text_chunks(b"GIF89a definitely not a png"),
            Err(PngError::InvalidSignature)
        ));
    }

    #[test]
    fn rejects_truncated_stream() {
        let mut data = png_with(&[text_chunk("preset", "x")]);
        data.truncate(data.len() - 6); // cut into the IEND chunk
        assert!(matches!(text_chunks(&data), Err(PngError::UnexpectedEof)));
    }

    #[test]
    fn missing_preset_keyword_is_not_an_error() {
        let data = png_with(&[text_chunk("comment", "plain image")]);
        let tags = text_chunks(&data).unwrap();
        assert!(tags.get("preset").is_none());
    }
}
