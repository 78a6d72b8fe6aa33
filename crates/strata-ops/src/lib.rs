//! # strata-ops
//!
//! Content operations for layered raster images.
//!
//! Every operation is a pure `Image -> Image` transform: it reads its input,
//! writes into a private copy and returns the frozen result.
//!
//! # Modules
//!
//! - [`color_transform`] - per-pixel conversions with clamping
//! - [`kernel`] - single-channel convolution with edge policies
//! - [`composite`] - ordered pipelines of operations
//! - [`mosaic`] - seed-based cell partitioning
//! - [`filters`] - the keyword catalog (sepia, grayscale, blur, sharpen, mosaic)
//!
//! # Example
//!
//! ```rust
//! use strata_core::{Image, LayeredImage, Pixel};
//! use strata_ops::filters;
//!
//! let mut project = LayeredImage::new();
//! project.create_layer("photo", 0, Image::filled(8, 8, Pixel::new(200, 120, 40))?)?;
//! project.apply(&filters::sepia(), "photo")?;
//! project.apply(&filters::blur(), 0)?;
//! # Ok::<(), strata_core::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` - fill kernel and mosaic output rows on the rayon pool
//!   (enabled by default)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod parallel;
pub mod color_transform;
pub mod composite;
pub mod filters;
pub mod kernel;
pub mod mosaic;
pub mod rng;

pub use color_transform::{ColorTransform, Conversion};
pub use composite::Composite;
pub use error::{OpsError, OpsResult};
pub use filters::FilterKind;
pub use kernel::{EdgeMode, Kernel, KernelFilter};
pub use mosaic::MosaicFilter;

use strata_core::{Image, ImageOperation};

/// The closed family of content operations.
#[derive(Debug, Clone)]
pub enum ContentOperation {
    /// Per-pixel conversion.
    ColorTransform(ColorTransform),
    /// Single-channel convolution.
    Kernel(KernelFilter),
    /// Ordered pipeline.
    Composite(Composite),
    /// Seed-based cells.
    Mosaic(MosaicFilter),
}

impl ImageOperation for ContentOperation {
    fn operate_on(&self, image: &Image) -> Image {
        match self {
            ContentOperation::ColorTransform(op) => op.operate_on(image),
            ContentOperation::Kernel(op) => op.operate_on(image),
            ContentOperation::Composite(op) => op.operate_on(image),
            ContentOperation::Mosaic(op) => op.operate_on(image),
        }
    }
}

impl From<ColorTransform> for ContentOperation {
    fn from(op: ColorTransform) -> Self {
        ContentOperation::ColorTransform(op)
    }
}

impl From<KernelFilter> for ContentOperation {
    fn from(op: KernelFilter) -> Self {
        ContentOperation::Kernel(op)
    }
}

impl From<Composite> for ContentOperation {
    fn from(op: Composite) -> Self {
        ContentOperation::Composite(op)
    }
}

impl From<MosaicFilter> for ContentOperation {
    fn from(op: MosaicFilter) -> Self {
        ContentOperation::Mosaic(op)
    }
}
