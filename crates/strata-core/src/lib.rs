//! # strata-core
//!
//! Core types for layered raster editing.
//!
//! This crate provides the domain model every other strata crate builds on:
//!
//! - [`Pixel`], [`Channel`], [`PixelCoord`] - RGB values and grid positions
//! - [`Image`], [`MutableImage`] - immutable and writable pixel grids
//! - [`Layer`] - a named, visibility-flagged image
//! - [`LayeredImage`] - ordered layers sharing one size, with unique names
//! - [`FocusableLayeredImage`] - a layered image with a tracked focus layer
//! - [`ImageOperation`] - the `Image -> Image` capability operations implement
//!
//! ## Design Philosophy
//!
//! Image content is **immutable once published**. Operations read an
//! [`Image`], write into a private [`MutableImage`] and freeze the result, so a
//! layer's content can never change underneath another holder:
//!
//! ```rust
//! use strata_core::{Image, LayeredImage, Pixel};
//!
//! let base = Image::filled(2, 2, Pixel::gray(40))?;
//! let mut project = LayeredImage::new();
//! project.create_layer("base", 0, base.clone())?;
//! project.copy_layer("base", "copy", 1)?;
//!
//! assert_eq!(project.layer("copy")?.image(), &base);
//! # Ok::<(), strata_core::Error>(())
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//! strata-core (this crate)
//!    ^
//!    |
//!    +-- strata-ops (content operations)
//!    +-- strata-io (codecs, project directories)
//!    +-- strata-cli (script interpreter)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod focus;
pub mod image;
pub mod layer;
pub mod layered;
pub mod operation;
pub mod pixel;

// Re-exports for convenience
pub use error::*;
pub use focus::FocusableLayeredImage;
pub use image::*;
pub use layer::Layer;
pub use layered::{DEFAULT_IMAGE_NAME, LayerRef, LayeredImage};
pub use operation::ImageOperation;
pub use pixel::*;

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```
/// use strata_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::focus::FocusableLayeredImage;
    pub use crate::image::{Image, MutableImage, Raster};
    pub use crate::layer::Layer;
    pub use crate::layered::{LayerRef, LayeredImage};
    pub use crate::operation::ImageOperation;
    pub use crate::pixel::{Channel, Pixel, PixelCoord};
}
