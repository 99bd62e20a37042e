//! Preset decoding error types

use crate::markup::MarkupError;
use thiserror::Error;

/// Errors that abort the decoding of a single preset
#[derive(Error, Debug)]
pub enum PresetError {
    #[error("metadata markup error: {0}")]
    Markup(#[from] MarkupError),

    #[error("unexpected root element <{0}>")]
    UnexpectedRoot(String),

    #[error("preset has no param list")]
    MissingParams,
}

impl From<PresetError> for String {
    fn from(err: PresetError) -> Self {
        err.to_string()
    }
}
