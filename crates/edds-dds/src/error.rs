//! Error types for DDS decoding.

use thiserror::Error;

/// Errors that can occur when decoding or exporting a DDS texture.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Common library error.
    #[error("{0}")]
    Common(#[from] edds_common::Error),

    /// Invalid DDS magic.
    #[error("invalid DDS magic: expected 'DDS ', got {0:?}")]
    InvalidMagic([u8; 4]),

    /// Invalid DDS header.
    #[error("invalid DDS header: {0}")]
    InvalidHeader(String),

    /// Surface format outside the supported set.
    #[error("unsupported pixel format: {0}")]
    UnsupportedFormat(String),

    /// Fewer surface bytes than the header describes.
    #[error("truncated surface: expected {expected} bytes, got {actual}")]
    TruncatedSurface { expected: usize, actual: usize },

    /// Image encoding error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type for DDS operations.
pub type Result<T> = std::result::Result<T, Error>;
