//! Error types for image I/O.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// I/O operation error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Input file does not exist.
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Unsupported format.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Decoding error.
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Encoding error.
    #[error("encode error: {0}")]
    EncodeError(String),

    /// Decoded pixels do not fit the reported size.
    #[error(transparent)]
    Core(#[from] fmask_core::Error),
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;
