//! Batch conversion driver
//!
//! Walks a directory of `.kpp` containers and writes the four artifact
//! families: raw XML, full parameter JSON, condensed brush JSON, and the
//! decoded pattern image. Strictly sequential; no error inside a single
//! file's pipeline stops the batch.

use serde::Serialize;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::png::{self, PngError};
use crate::preset::{
    decode_brush_definition, decode_pattern, decode_preset, project, BrushFile, PresetError,
};

/// Input file extension, matched case-insensitively
pub const PRESET_EXTENSION: &str = "kpp";

/// PNG text-chunk keyword holding the preset XML
const PRESET_TAG: &str = "preset";

/// Parameter holding the nested brush-definition markup
const BRUSH_DEFINITION_PARAM: &str = "brush_definition";

/// Parameter holding the base64 pattern payload
const PATTERN_PARAM: &str = "Texture/Pattern/Pattern";

/// Errors from the conversion pipeline.
///
/// Inside the batch loop these are caught at the per-file boundary and
/// logged; only a failure before the loop (listing the input directory,
/// creating the output directories) aborts the run.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("container error: {0}")]
    Png(#[from] PngError),

    #[error("preset decode error: {0}")]
    Preset(#[from] PresetError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Counts reported after a batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// The four artifact directories under the output root
struct OutputDirs {
    xml: PathBuf,
    json: PathBuf,
    brushes: PathBuf,
    patterns: PathBuf,
}

impl OutputDirs {
    fn create(root: &Path) -> std::io::Result<Self> {
        let dirs = Self {
            xml: root.join("xml"),
            json: root.join("json"),
            brushes: root.join("brushes"),
            patterns: root.join("patterns"),
        };
        for dir in [&dirs.xml, &dirs.json, &dirs.brushes, &dirs.patterns] {
            fs::create_dir_all(dir)?;
        }
        Ok(dirs)
    }
}

/// Convert every preset container in `input_dir`, writing artifacts under
/// `output_root`.
///
/// Output file names derive from input base names, so re-running over
/// unchanged inputs overwrites prior outputs byte-identically.
pub fn convert_directory(input_dir: &Path, output_root: &Path) -> Result<BatchSummary, ConvertError> {
    let mut files: Vec<PathBuf> = fs::read_dir(input_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(OsStr::to_str)
                .is_some_and(|ext| ext.eq_ignore_ascii_case(PRESET_EXTENSION))
        })
        .collect();
    files.sort();

    tracing::info!("Found {} preset files in {}", files.len(), input_dir.display());

    let dirs = OutputDirs::create(output_root)?;

    let mut summary = BatchSummary {
        total: files.len(),
        ..Default::default()
    };

    for path in &files {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        tracing::info!("Processing {}", file_name);

        match convert_file(path, &dirs) {
            Ok(true) => summary.converted += 1,
            Ok(false) => summary.skipped += 1,
            Err(e) => {
                summary.failed += 1;
                tracing::error!("{}: {}", file_name, e);
            }
        }
    }

    tracing::info!(
        "Done: {} converted, {} skipped, {} failed",
        summary.converted,
        summary.skipped,
        summary.failed
    );
    Ok(summary)
}

/// Run the full pipeline for one container.
///
/// Returns `Ok(false)` for the skip condition (no embedded preset tag);
/// errors bubble to the per-file boundary in [`convert_directory`].
fn convert_file(path: &Path, dirs: &OutputDirs) -> Result<bool, ConvertError> {
    let base = path
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or(PRESET_EXTENSION);

    let data = fs::read(path)?;
    let tags = png::text_chunks(&data)?;
    let Some(preset_xml) = tags.get(PRESET_TAG) else {
        tracing::warn!("{}: no embedded preset metadata, skipping", base);
        return Ok(false);
    };

    let xml_path = dirs.xml.join(format!("{}.xml", base));
    fs::write(&xml_path, preset_xml)?;
    tracing::info!("Wrote {}", xml_path.display());

    let preset = decode_preset(preset_xml)?;

    let json_path = dirs.json.join(format!("{}.json", base));
    fs::write(&json_path, pretty_json(&preset)?)?;
    tracing::info!("Wrote {}", json_path.display());

    let descriptor = preset
        .parameters
        .get(BRUSH_DEFINITION_PARAM)
        .and_then(|xml| decode_brush_definition(xml));
    let mut brush = project(&preset, descriptor.as_ref());

    if let Some(payload) = preset.parameters.get(PATTERN_PARAM) {
        match decode_pattern(payload) {
            Ok(bytes) => {
                let file_name = format!("{}_pattern.png", base);
                let pattern_path = dirs.patterns.join(&file_name);
                fs::write(&pattern_path, bytes)?;
                tracing::info!("Wrote {}", pattern_path.display());
                brush.pattern_file = Some(file_name);
            }
            Err(e) => tracing::warn!("{}: pattern decode failed: {}", base, e),
        }
    }

    let brush_file = BrushFile {
        name: preset.name.clone(),
        paintopid: preset.paintopid.clone(),
        brush,
    };
    let brush_path = dirs.brushes.join(format!("{}_brush.json", base));
    fs::write(&brush_path, pretty_json(&brush_file)?)?;
    tracing::info!("Wrote {}", brush_path.display());

    Ok(true)
}

fn pretty_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}
