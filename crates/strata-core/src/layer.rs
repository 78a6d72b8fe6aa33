//! A named, visibility-flagged image.

use crate::{Error, Image, Pixel, PixelCoord, Raster, Result};

/// One layer of a [`crate::LayeredImage`].
///
/// A layer owns its content. `Clone` copies content, name and visibility
/// together; because [`Image`] is immutable, the clone can never observe
/// edits made to the original afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    name: String,
    visible: bool,
    image: Image,
}

/// Rejects names a layer may not carry.
pub(crate) fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid_argument("layer name must not be empty"));
    }
    Ok(())
}

impl Layer {
    /// Creates a visible layer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `name` is empty.
    pub fn new(name: impl Into<String>, image: Image) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        Ok(Self {
            name,
            visible: true,
            image,
        })
    }

    /// Layer name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the layer is shown.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Layer content.
    #[inline]
    pub fn image(&self) -> &Image {
        &self.image
    }

    /// Consumes the layer and returns its content.
    pub fn into_image(self) -> Image {
        self.image
    }

    pub(crate) fn set_name(&mut self, name: String) -> Result<()> {
        validate_name(&name)?;
        self.name = name;
        Ok(())
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub(crate) fn set_image(&mut self, image: Image) {
        self.image = image;
    }
}

impl Raster for Layer {
    #[inline]
    fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    fn height(&self) -> u32 {
        self.image.height()
    }

    #[inline]
    fn pixel_at(&self, coord: PixelCoord) -> Option<Pixel> {
        self.image.pixel_at(coord)
    }
}

impl AsRef<Image> for Layer {
    fn as_ref(&self) -> &Image {
        &self.image
    }
}
