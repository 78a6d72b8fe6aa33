//! Error types for content operations.

use thiserror::Error;

/// Error type for building content operations.
///
/// Running an operation never fails; only constructing one with bad
/// parameters does.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpsError {
    /// Kernel is not a square with an odd side length.
    #[error("invalid kernel: {0}")]
    InvalidKernel(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Filter keyword is not in the catalog.
    #[error("unknown filter: {0}")]
    UnknownFilter(String),
}

impl OpsError {
    /// Returns `true` for errors caused by a rejected argument.
    pub fn is_argument_error(&self) -> bool {
        matches!(self, Self::InvalidKernel(_) | Self::InvalidParameter(_))
    }
}

/// Result type for content operations.
pub type OpsResult<T> = Result<T, OpsError>;
