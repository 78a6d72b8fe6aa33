//! Error types for I/O operations.
//!
//! Every provider fails with [`IoError::Extraction`] and every saver with
//! [`IoError::Saving`]; the remaining variants come from format dispatch and
//! from the layered model while a project is rebuilt.

use std::io;
use thiserror::Error;

/// I/O operation error.
#[derive(Debug, Error)]
pub enum IoError {
    /// Input could not be read or is malformed.
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// Output could not be written.
    #[error("saving failed: {0}")]
    Saving(String),

    /// Unsupported format.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The layered model rejected decoded content.
    #[error(transparent)]
    Core(#[from] strata_core::Error),
}

impl IoError {
    /// Creates an [`IoError::Extraction`] error.
    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction(msg.into())
    }

    /// Creates an [`IoError::Saving`] error.
    pub fn saving(msg: impl Into<String>) -> Self {
        Self::Saving(msg.into())
    }

    /// Returns `true` if reading failed.
    pub fn is_extraction(&self) -> bool {
        matches!(self, Self::Extraction(_))
    }

    /// Returns `true` if writing failed.
    pub fn is_saving(&self) -> bool {
        matches!(self, Self::Saving(_))
    }
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;
