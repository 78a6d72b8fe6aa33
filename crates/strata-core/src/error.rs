//! Error types for strata-core operations.
//!
//! This module provides the error taxonomy shared by the image model and the
//! layered-image containers built on top of it.
//!
//! # Overview
//!
//! The [`Error`] enum covers every failure mode of the core:
//! - Image construction (invalid dimensions, malformed pixel buffers)
//! - Pixel access (coordinates outside an image)
//! - Structural layer edits (bad indices, unknown or duplicate names,
//!   content whose size does not match the shared layer size)
//! - Focus-targeted edits when no layer is in focus
//!
//! # Usage
//!
//! ```rust
//! use strata_core::{Error, Result};
//!
//! fn check_index(index: usize, len: usize) -> Result<()> {
//!     if index >= len {
//!         return Err(Error::index_out_of_bounds(index, len));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_index(3, 2).is_err());
//! ```
//!
//! # Dependencies
//!
//! - [`thiserror`] - For derive macro error implementation
//!
//! # Used By
//!
//! - [`crate::image::MutableImage`] - Pixel writes
//! - [`crate::layered::LayeredImage`] - Structural edits
//! - `strata-io` - wraps core errors raised while rebuilding projects

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the layered image model.
///
/// # Categories
///
/// - **Argument errors**: [`InvalidArgument`](Error::InvalidArgument),
///   [`InvalidDimensions`](Error::InvalidDimensions)
/// - **Bounds errors**: [`OutOfBounds`](Error::OutOfBounds),
///   [`IndexOutOfBounds`](Error::IndexOutOfBounds)
/// - **Naming errors**: [`NameNotFound`](Error::NameNotFound),
///   [`DuplicateName`](Error::DuplicateName)
/// - **Size errors**: [`DimensionMismatch`](Error::DimensionMismatch)
/// - **Focus errors**: [`NoFocus`](Error::NoFocus)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// An argument was rejected (empty name, malformed buffer, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Image dimensions are not usable.
    ///
    /// Returned when width or height is zero.
    #[error("invalid dimensions: {width}x{height} ({reason})")]
    InvalidDimensions {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Reason why dimensions are invalid
        reason: String,
    },

    /// Pixel coordinate lies outside the image.
    ///
    /// # Example
    ///
    /// ```rust
    /// use strata_core::Error;
    ///
    /// let err = Error::out_of_bounds(7, 2, 4, 4);
    /// assert!(err.to_string().contains("row 7"));
    /// ```
    #[error("pixel (row {row}, col {col}) out of bounds for image {width}x{height}")]
    OutOfBounds {
        /// Row that was accessed
        row: i32,
        /// Column that was accessed
        col: i32,
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },

    /// Layer index is outside the valid range.
    #[error("layer index {index} out of bounds for {len} layer(s)")]
    IndexOutOfBounds {
        /// Index that was requested
        index: usize,
        /// Number of layers at the time of the call
        len: usize,
    },

    /// No layer carries the requested name.
    #[error("no layer named '{0}'")]
    NameNotFound(String),

    /// A layer with this name already exists.
    #[error("a layer named '{0}' already exists")]
    DuplicateName(String),

    /// Content size is incompatible with the shared layer size.
    #[error(
        "dimension mismatch: layers are {}x{}, content is {}x{}",
        expected.0, expected.1, actual.0, actual.1
    )]
    DimensionMismatch {
        /// Shared (width, height) of the layered image
        expected: (u32, u32),
        /// (width, height) of the rejected content
        actual: (u32, u32),
    },

    /// A focus-targeted edit was requested while no layer is in focus.
    #[error("no layer is in focus")]
    NoFocus,
}

impl Error {
    /// Creates an [`Error::InvalidArgument`] error.
    #[inline]
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: u32, height: u32, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::OutOfBounds`] error.
    #[inline]
    pub fn out_of_bounds(row: i32, col: i32, width: u32, height: u32) -> Self {
        Self::OutOfBounds {
            row,
            col,
            width,
            height,
        }
    }

    /// Creates an [`Error::IndexOutOfBounds`] error.
    #[inline]
    pub fn index_out_of_bounds(index: usize, len: usize) -> Self {
        Self::IndexOutOfBounds { index, len }
    }

    /// Creates an [`Error::NameNotFound`] error.
    #[inline]
    pub fn name_not_found(name: impl Into<String>) -> Self {
        Self::NameNotFound(name.into())
    }

    /// Creates an [`Error::DuplicateName`] error.
    #[inline]
    pub fn duplicate_name(name: impl Into<String>) -> Self {
        Self::DuplicateName(name.into())
    }

    /// Creates an [`Error::DimensionMismatch`] error.
    #[inline]
    pub fn dimension_mismatch(expected: (u32, u32), actual: (u32, u32)) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Returns `true` if this is a bounds-related error.
    #[inline]
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. } | Self::IndexOutOfBounds { .. })
    }

    /// Returns `true` if this error is about layer naming.
    #[inline]
    pub fn is_naming_error(&self) -> bool {
        matches!(self, Self::NameNotFound(_) | Self::DuplicateName(_))
    }

    /// Returns `true` if this is an argument error.
    #[inline]
    pub fn is_argument_error(&self) -> bool {
        matches!(self, Self::InvalidArgument(_) | Self::InvalidDimensions { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds() {
        let err = Error::out_of_bounds(10, -1, 8, 6);
        let msg = err.to_string();
        assert!(msg.contains("row 10"));
        assert!(msg.contains("col -1"));
        assert!(msg.contains("8x6"));
        assert!(err.is_bounds_error());
    }

    #[test]
    fn test_index_out_of_bounds() {
        let err = Error::index_out_of_bounds(3, 2);
        assert!(err.to_string().contains("index 3"));
        assert!(err.is_bounds_error());
        assert!(!err.is_naming_error());
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = Error::dimension_mismatch((100, 100), (20, 30));
        let msg = err.to_string();
        assert!(msg.contains("100x100"));
        assert!(msg.contains("20x30"));
    }

    #[test]
    fn test_naming_errors() {
        assert!(Error::name_not_found("bg").is_naming_error());
        assert!(Error::duplicate_name("bg").is_naming_error());
        assert!(Error::duplicate_name("bg").to_string().contains("'bg'"));
    }
}
