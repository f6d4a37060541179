use std::{io, string::FromUtf8Error};

use thiserror::Error;

/// Errors that can occur while saving or loading a dataset.
///
/// [`PersistError::Io`] covers failures of the underlying file.
/// Every other variant describes content that is malformed, truncated, or
/// cannot be represented in the file format.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("i/o failure: {0}")]
    Io(#[from] io::Error),

    /// The input ended before `field` could be read.
    #[error("unexpected end of input while reading {field}")]
    UnexpectedEof { field: &'static str },

    #[error("invalid number `{text}` for {field}")]
    InvalidNumber { field: &'static str, text: String },

    #[error("invalid timestamp `{text}`")]
    InvalidTimestamp {
        text: String,
        #[source]
        source: jiff::Error,
    },

    /// A binary timestamp does not map onto a representable datetime.
    #[error("timestamp of {micros} microseconds is out of range")]
    TimestampOutOfRange {
        micros: i64,
        #[source]
        source: jiff::Error,
    },

    /// A grid dimension is negative, or too large for the format.
    #[error("invalid {field}: {value}")]
    InvalidDimension { field: &'static str, value: i128 },

    #[error("grid of {nx} x {ny} cells exceeds the limit of {max}")]
    TooManyCells { nx: usize, ny: usize, max: usize },

    #[error("id is not valid UTF-8")]
    InvalidId(#[source] FromUtf8Error),

    /// The text format stores one value per line, so ids cannot span lines.
    #[error("id `{0}` contains a line break")]
    MultilineId(String),

    /// For the text codec, `len` counts only the bytes read before giving up.
    #[error("id length {len} exceeds the limit of {max} bytes")]
    IdTooLong { len: u64, max: usize },

    #[error("malformed id length prefix")]
    InvalidIdLength,

    /// The declared sample count is followed by more content.
    #[error("unexpected content after {count} samples")]
    TrailingData { count: usize },

    #[error("invalid config: {reason}")]
    InvalidConfig { reason: &'static str },
}

impl PersistError {
    /// Converts a read failure into [`PersistError::UnexpectedEof`] when the
    /// input ran out, keeping other I/O failures as they are.
    pub(crate) fn reading(field: &'static str) -> impl FnOnce(io::Error) -> Self {
        move |err| match err.kind() {
            io::ErrorKind::UnexpectedEof => Self::UnexpectedEof { field },
            _ => Self::Io(err),
        }
    }
}
