//! Error types for EDDS container handling.

use thiserror::Error;

/// Errors that can occur when reading an EDDS container.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Truncated or invalid header or block-record framing.
    #[error("malformed container: {0}")]
    MalformedContainer(String),

    /// Corrupt or inconsistent LZ4 chunk stream.
    #[error("decompression error: {0}")]
    Decompression(String),

    /// Decompressed size did not match the size declared by the block.
    #[error("decompressed size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

impl Error {
    /// Whether this error describes broken container framing.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Error::MalformedContainer(_))
    }

    /// Whether this error came out of an LZ4 block.
    pub fn is_decompression(&self) -> bool {
        matches!(self, Error::Decompression(_) | Error::SizeMismatch { .. })
    }
}

/// Result type for container operations.
pub type Result<T> = std::result::Result<T, Error>;
