//! The capability shared by every content operation.

use crate::Image;

/// Transforms an image into a new image.
///
/// Implementations must not depend on anything but the input: given the same
/// image, a deterministic operation returns the same result. The input is
/// borrowed immutably, so an operation cannot edit it.
///
/// The operation catalog lives in `strata-ops`; the core only needs this seam
/// so that [`crate::LayeredImage::apply`] can run any of them.
pub trait ImageOperation {
    /// Produces the transformed image.
    fn operate_on(&self, image: &Image) -> Image;
}

impl<T: ImageOperation + ?Sized> ImageOperation for &T {
    fn operate_on(&self, image: &Image) -> Image {
        (**self).operate_on(image)
    }
}

impl<T: ImageOperation + ?Sized> ImageOperation for Box<T> {
    fn operate_on(&self, image: &Image) -> Image {
        (**self).operate_on(image)
    }
}
