//! PNG container error types

use std::io;
use thiserror::Error;

/// Errors that can occur while walking a PNG chunk stream
#[derive(Error, Debug)]
pub enum PngError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("not a PNG container")]
    InvalidSignature,

    #[error("unexpected end of chunk stream")]
    UnexpectedEof,

    #[error("malformed {0} chunk")]
    MalformedChunk(&'static str),

    #[error("inflate error: {0}")]
    Inflate(String),
}

impl From<PngError> for String {
    fn from(err: PngError) -> Self {
        err.to_string()
    }
}
