//! Error types for EDDS conversion.

use thiserror::Error;

/// Errors that can occur while converting an EDDS file.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Container decoding error.
    #[error("{0}")]
    Container(#[from] edds_container::Error),

    /// DDS decoding or image export error.
    #[error("{0}")]
    Dds(#[from] edds_dds::Error),

    /// Invalid search pattern.
    #[error("invalid search pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, Error>;
