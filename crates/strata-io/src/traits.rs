//! Provider and saver traits.
//!
//! Providers produce model values from some source; savers persist them.
//! Implementations are bound to their source or destination at
//! construction, so the calls themselves take no paths.

use crate::IoResult;
use strata_core::{Image, LayeredImage};

/// Source of a single image.
///
/// # Example
///
/// ```rust,ignore
/// use strata_io::{ImageFile, ImageProvider};
///
/// let image = ImageFile::new("photo.png")?.extract_image()?;
/// ```
pub trait ImageProvider {
    /// Reads the image.
    ///
    /// Fails with [`IoError::Extraction`](crate::IoError::Extraction) on
    /// unreadable or malformed input.
    fn extract_image(&self) -> IoResult<Image>;
}

/// Destination for a single image.
pub trait ImageSaver {
    /// Writes the image.
    ///
    /// Fails with [`IoError::Saving`](crate::IoError::Saving).
    fn save_image(&self, image: &Image) -> IoResult<()>;
}

/// Source of a layered image.
pub trait LayeredImageProvider {
    /// Reads the layered image.
    fn extract_layered(&self) -> IoResult<LayeredImage>;
}

/// Destination for a layered image.
pub trait LayeredImageSaver {
    /// Writes the layered image.
    fn save_layered(&self, image: &LayeredImage) -> IoResult<()>;
}
