//! Error types for DDS decoding.

use thiserror::Error;

/// Errors that can occur when decoding a DDS file.
#[derive(Debug, Error)]
pub enum Error {
    /// Buffer too small to hold the magic and the primary header.
    #[error("file too small for a DDS header: need {needed} bytes, got {actual}")]
    TooSmall { needed: usize, actual: usize },

    /// First four bytes are not the DDS magic.
    #[error("invalid DDS magic: expected 'DDS ', got {0:?}")]
    InvalidMagic([u8; 4]),

    /// DX10 marker present but the buffer cannot hold the extended header.
    #[error("file too small for a DX10 extended header: need {needed} bytes, got {actual}")]
    TooSmallForDxt10 { needed: usize, actual: usize },

    /// Common library error.
    #[error("{0}")]
    Common(#[from] veles_common::Error),
}

/// Result type for DDS operations.
pub type Result<T> = std::result::Result<T, Error>;
