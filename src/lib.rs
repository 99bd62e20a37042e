//! kpp2json - Convert Krita brush preset containers into JSON artifacts
//!
//! A `.kpp` file is a PNG image carrying the preset's XML metadata as a
//! textual chunk. This crate extracts that metadata, flattens it into a
//! parameter map, decodes the nested brush-definition markup, projects the
//! result into a condensed brush descriptor, and pulls any embedded pattern
//! raster out to a standalone image.

pub mod convert;
pub mod markup;
pub mod png;
pub mod preset;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Set up logging for the converter binary
pub fn init() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kpp2json=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
