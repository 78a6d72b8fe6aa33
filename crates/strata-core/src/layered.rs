//! Ordered collection of equally sized layers.
//!
//! A [`LayeredImage`] keeps its layers in stacking order (index 0 is the top)
//! and enforces two invariants on every edit:
//!
//! - all layers share one width/height; while the image is empty the shared
//!   size is unset and [`width`](LayeredImage::width) /
//!   [`height`](LayeredImage::height) report `-1`;
//! - layer names are unique.
//!
//! Every structural edit accepts either an index or a name through
//! [`LayerRef`]. Names are resolved to an index first, then the index path
//! runs, so both forms share the same validation.
//!
//! Edits are atomic: when a call returns an error the image is unchanged.
//!
//! # Example
//!
//! ```rust
//! use strata_core::{Image, LayeredImage};
//!
//! let mut project = LayeredImage::new();
//! project.create_layer("background", 0, Image::new(64, 48)?)?;
//! project.create_layer("sketch", 0, Image::new(64, 48)?)?;
//! assert_eq!(project.layer_names(), vec!["sketch", "background"]);
//!
//! project.set_visible(false, "sketch")?;
//! assert_eq!(project.top_visible_layer().map(|l| l.name()), Some("background"));
//!
//! project.remove_layer(0)?;
//! project.remove_layer("background")?;
//! assert_eq!((project.width(), project.height()), (-1, -1));
//! # Ok::<(), strata_core::Error>(())
//! ```

use crate::layer::validate_name;
use crate::{Error, Image, ImageOperation, Layer, Raster, Result};
use std::fmt;
use tracing::{debug, trace};

/// Name given to a layered image until one is set.
pub const DEFAULT_IMAGE_NAME: &str = "untitled";

/// Addresses a layer by position or by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerRef<'a> {
    /// Zero-based position in the stack.
    Index(usize),
    /// Unique layer name.
    Name(&'a str),
}

impl From<usize> for LayerRef<'_> {
    fn from(index: usize) -> Self {
        LayerRef::Index(index)
    }
}

impl<'a> From<&'a str> for LayerRef<'a> {
    fn from(name: &'a str) -> Self {
        LayerRef::Name(name)
    }
}

impl<'a> From<&'a String> for LayerRef<'a> {
    fn from(name: &'a String) -> Self {
        LayerRef::Name(name.as_str())
    }
}

impl fmt::Display for LayerRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerRef::Index(i) => write!(f, "#{i}"),
            LayerRef::Name(n) => write!(f, "'{n}'"),
        }
    }
}

/// Multi-layered image: an ordered stack of layers sharing one size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayeredImage {
    layers: Vec<Layer>,
    name: String,
    /// Shared (width, height); `None` iff there are no layers.
    dims: Option<(u32, u32)>,
}

impl Default for LayeredImage {
    fn default() -> Self {
        Self::new()
    }
}

impl LayeredImage {
    /// Creates an empty image named `"untitled"`.
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            name: DEFAULT_IMAGE_NAME.to_string(),
            dims: None,
        }
    }

    /// Creates an empty image with a display name.
    pub fn with_name(name: impl Into<String>) -> Result<Self> {
        let mut image = Self::new();
        image.set_name(name)?;
        Ok(image)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// Number of layers.
    #[inline]
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if there are no layers.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Shared width, or `-1` while empty.
    #[inline]
    pub fn width(&self) -> i64 {
        self.dims.map_or(-1, |(w, _)| i64::from(w))
    }

    /// Shared height, or `-1` while empty.
    #[inline]
    pub fn height(&self) -> i64 {
        self.dims.map_or(-1, |(_, h)| i64::from(h))
    }

    /// Shared `(width, height)`, or `None` while empty.
    #[inline]
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.dims
    }

    /// Display name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the display name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `name` is empty.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::invalid_argument("image name must not be empty"));
        }
        self.name = name;
        Ok(())
    }

    /// Position of the layer called `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.name() == name)
    }

    /// Returns `true` if a layer called `name` exists.
    #[inline]
    pub fn contains_name(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Resolves a layer reference to a valid index.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfBounds`] or [`Error::NameNotFound`].
    pub fn resolve<'a>(&self, layer: impl Into<LayerRef<'a>>) -> Result<usize> {
        match layer.into() {
            LayerRef::Index(index) if index < self.layers.len() => Ok(index),
            LayerRef::Index(index) => Err(Error::index_out_of_bounds(index, self.layers.len())),
            LayerRef::Name(name) => self.index_of(name).ok_or_else(|| Error::name_not_found(name)),
        }
    }

    /// Returns a layer.
    pub fn layer<'a>(&self, layer: impl Into<LayerRef<'a>>) -> Result<&Layer> {
        let index = self.resolve(layer)?;
        Ok(&self.layers[index])
    }

    /// Iterates layers from top (index 0) to bottom.
    pub fn layers(&self) -> impl ExactSizeIterator<Item = &Layer> {
        self.layers.iter()
    }

    /// Layer names in stack order.
    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.iter().map(Layer::name).collect()
    }

    /// Index of the first visible layer in stack order.
    pub fn top_visible_index(&self) -> Option<usize> {
        self.layers.iter().position(Layer::is_visible)
    }

    /// First visible layer in stack order: what a viewer shows.
    pub fn top_visible_layer(&self) -> Option<&Layer> {
        self.top_visible_index().map(|i| &self.layers[i])
    }

    // ------------------------------------------------------------------
    // Validation helpers
    // ------------------------------------------------------------------

    fn check_new_name(&self, name: &str) -> Result<()> {
        validate_name(name)?;
        if self.contains_name(name) {
            return Err(Error::duplicate_name(name));
        }
        Ok(())
    }

    fn check_insert_index(&self, index: usize) -> Result<()> {
        // Inserting at `len` appends.
        if index > self.layers.len() {
            return Err(Error::index_out_of_bounds(index, self.layers.len()));
        }
        Ok(())
    }

    fn check_shared_dims(&self, content: &Image) -> Result<()> {
        match self.dims {
            Some(expected) if expected != content.dimensions() => {
                Err(Error::dimension_mismatch(expected, content.dimensions()))
            }
            _ => Ok(()),
        }
    }

    // ------------------------------------------------------------------
    // Structural edits
    // ------------------------------------------------------------------

    /// Inserts a new visible layer at `index`.
    ///
    /// The first layer of an empty image establishes the shared size.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `name` is empty
    /// - [`Error::DuplicateName`] if `name` is taken
    /// - [`Error::IndexOutOfBounds`] unless `index <= num_layers()`
    /// - [`Error::DimensionMismatch`] if `content` does not match the shared size
    pub fn create_layer(
        &mut self,
        name: impl Into<String>,
        index: usize,
        content: Image,
    ) -> Result<()> {
        let name = name.into();
        self.check_new_name(&name)?;
        self.check_insert_index(index)?;
        self.check_shared_dims(&content)?;

        debug!(name = %name, index, width = content.width(), height = content.height(), "create layer");
        if self.layers.is_empty() {
            self.dims = Some(content.dimensions());
        }
        self.layers.insert(index, Layer::new(name, content)?);
        Ok(())
    }

    /// Replaces a layer's content, keeping its name and visibility.
    ///
    /// A sole layer may change size; the shared size follows it.
    pub fn replace<'a>(&mut self, layer: impl Into<LayerRef<'a>>, content: Image) -> Result<()> {
        let index = self.resolve(layer)?;
        self.replace_at(index, content)
    }

    fn replace_at(&mut self, index: usize, content: Image) -> Result<()> {
        if self.layers.len() == 1 {
            self.dims = Some(content.dimensions());
        } else {
            self.check_shared_dims(&content)?;
        }
        trace!(index, "replace layer content");
        self.layers[index].set_image(content);
        Ok(())
    }

    /// Deep-copies a layer under a new name and inserts it at `dest_index`.
    ///
    /// `dest_index` refers to the stack before insertion, so
    /// `num_layers()` appends.
    pub fn copy_layer<'a>(
        &mut self,
        source: impl Into<LayerRef<'a>>,
        dest_name: impl Into<String>,
        dest_index: usize,
    ) -> Result<()> {
        let source = self.resolve(source)?;
        let dest_name = dest_name.into();
        self.check_new_name(&dest_name)?;
        self.check_insert_index(dest_index)?;

        debug!(source, dest = %dest_name, dest_index, "copy layer");
        let mut copy = self.layers[source].clone();
        copy.set_name(dest_name)?;
        self.layers.insert(dest_index, copy);
        Ok(())
    }

    /// Removes a layer and returns it.
    ///
    /// Removing the last layer resets the shared size to unset.
    pub fn remove_layer<'a>(&mut self, layer: impl Into<LayerRef<'a>>) -> Result<Layer> {
        let index = self.resolve(layer)?;
        let removed = self.layers.remove(index);
        if self.layers.is_empty() {
            self.dims = None;
        }
        debug!(name = removed.name(), index, remaining = self.layers.len(), "remove layer");
        Ok(removed)
    }

    /// Shows or hides a layer.
    pub fn set_visible<'a>(&mut self, visible: bool, layer: impl Into<LayerRef<'a>>) -> Result<()> {
        let index = self.resolve(layer)?;
        self.layers[index].set_visible(visible);
        Ok(())
    }

    /// Renames a layer.
    pub fn rename<'a>(
        &mut self,
        new_name: impl Into<String>,
        layer: impl Into<LayerRef<'a>>,
    ) -> Result<()> {
        let index = self.resolve(layer)?;
        let new_name = new_name.into();
        self.check_new_name(&new_name)?;
        self.layers[index].set_name(new_name)
    }

    /// Runs `op` on a layer's content and stores the result in place.
    ///
    /// A sole layer adopts the result's size. Otherwise a result whose size
    /// differs from the shared size is rejected and the layer is untouched.
    pub fn apply<'a, O>(&mut self, op: &O, layer: impl Into<LayerRef<'a>>) -> Result<()>
    where
        O: ImageOperation + ?Sized,
    {
        let index = self.resolve(layer)?;
        let result = op.operate_on(self.layers[index].image());
        self.replace_at(index, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Pixel;

    fn white(w: u32, h: u32) -> Image {
        Image::new(w, h).unwrap()
    }

    /// Stand-in operation that returns an image of a fixed size.
    struct Resize(u32, u32);

    impl ImageOperation for Resize {
        fn operate_on(&self, _image: &Image) -> Image {
            Image::filled(self.0, self.1, Pixel::BLACK).unwrap()
        }
    }

    #[test]
    fn test_empty_defaults() {
        let img = LayeredImage::new();
        assert_eq!(img.name(), "untitled");
        assert_eq!(img.num_layers(), 0);
        assert_eq!((img.width(), img.height()), (-1, -1));
        assert!(img.top_visible_layer().is_none());
    }

    #[test]
    fn test_first_layer_sets_dims() {
        let mut img = LayeredImage::new();
        img.create_layer("a", 0, white(30, 20)).unwrap();
        assert_eq!(img.dimensions(), Some((30, 20)));
        assert_eq!((img.width(), img.height()), (30, 20));
    }

    #[test]
    fn test_create_on_empty_only_index_zero() {
        let mut img = LayeredImage::new();
        let err = img.create_layer("A", 1, white(4, 4)).unwrap_err();
        assert_eq!(err, Error::index_out_of_bounds(1, 0));
        assert!(img.is_empty());
        assert_eq!(img.width(), -1);
    }

    #[test]
    fn test_create_rejects_mismatch_and_duplicates() {
        let mut img = LayeredImage::new();
        img.create_layer("a", 0, white(4, 4)).unwrap();
        assert!(matches!(
            img.create_layer("b", 0, white(5, 4)),
            Err(Error::DimensionMismatch { expected: (4, 4), actual: (5, 4) })
        ));
        assert_eq!(
            img.create_layer("a", 0, white(4, 4)),
            Err(Error::duplicate_name("a"))
        );
        assert!(img.create_layer("", 0, white(4, 4)).unwrap_err().is_argument_error());
        assert_eq!(img.num_layers(), 1);
    }

    #[test]
    fn test_insert_order() {
        let mut img = LayeredImage::new();
        img.create_layer("a", 0, white(2, 2)).unwrap();
        img.create_layer("b", 0, white(2, 2)).unwrap();
        img.create_layer("c", 2, white(2, 2)).unwrap();
        img.create_layer("d", 1, white(2, 2)).unwrap();
        assert_eq!(img.layer_names(), vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_remove_by_name_scenario() {
        let mut img = LayeredImage::new();
        img.create_layer("A", 0, white(100, 100)).unwrap();
        img.create_layer("B", 0, white(100, 100)).unwrap();
        let removed = img.remove_layer("A").unwrap();
        assert_eq!(removed.name(), "A");
        assert_eq!(img.num_layers(), 1);
        assert_eq!(img.layer(0).unwrap().name(), "B");
    }

    #[test]
    fn test_remove_last_resets_dims() {
        let mut img = LayeredImage::new();
        img.create_layer("only", 0, white(3, 3)).unwrap();
        img.remove_layer(0).unwrap();
        assert_eq!(img.num_layers(), 0);
        assert_eq!((img.width(), img.height()), (-1, -1));
        // A new first layer may now have any size.
        img.create_layer("next", 0, white(9, 1)).unwrap();
        assert_eq!(img.dimensions(), Some((9, 1)));
    }

    #[test]
    fn test_remove_errors() {
        let mut img = LayeredImage::new();
        img.create_layer("a", 0, white(1, 1)).unwrap();
        assert_eq!(img.remove_layer(1).unwrap_err(), Error::index_out_of_bounds(1, 1));
        assert_eq!(img.remove_layer("zz").unwrap_err(), Error::name_not_found("zz"));
        assert_eq!(img.num_layers(), 1);
    }

    #[test]
    fn test_replace_sole_layer_adopts_size() {
        let mut img = LayeredImage::new();
        img.create_layer("a", 0, white(2, 2)).unwrap();
        img.set_visible(false, 0).unwrap();
        img.replace("a", white(7, 3)).unwrap();
        assert_eq!(img.dimensions(), Some((7, 3)));
        let layer = img.layer(0).unwrap();
        assert_eq!(layer.name(), "a");
        assert!(!layer.is_visible());
    }

    #[test]
    fn test_replace_rejects_mismatch_with_siblings() {
        let mut img = LayeredImage::new();
        img.create_layer("a", 0, white(2, 2)).unwrap();
        img.create_layer("b", 1, white(2, 2)).unwrap();
        let before = img.clone();
        assert!(img.replace(1, white(3, 2)).is_err());
        assert_eq!(img, before);
        img.replace(1, Image::filled(2, 2, Pixel::BLACK).unwrap()).unwrap();
        assert_eq!(img.layer("b").unwrap().image().pixels()[0], Pixel::BLACK);
    }

    #[test]
    fn test_copy_layer_deep_and_renamed() {
        let mut img = LayeredImage::new();
        img.create_layer("a", 0, white(2, 2)).unwrap();
        img.set_visible(false, "a").unwrap();
        img.copy_layer("a", "a2", 1).unwrap();
        assert_eq!(img.layer_names(), vec!["a", "a2"]);
        assert!(!img.layer("a2").unwrap().is_visible());

        img.replace("a", Image::filled(2, 2, Pixel::BLACK).unwrap()).unwrap();
        assert_eq!(img.layer("a2").unwrap().image().pixels()[0], Pixel::WHITE);
    }

    #[test]
    fn test_copy_layer_errors() {
        let mut img = LayeredImage::new();
        img.create_layer("a", 0, white(2, 2)).unwrap();
        assert_eq!(img.copy_layer("x", "b", 0), Err(Error::name_not_found("x")));
        assert_eq!(img.copy_layer(0, "a", 0), Err(Error::duplicate_name("a")));
        assert_eq!(img.copy_layer(0, "b", 2), Err(Error::index_out_of_bounds(2, 1)));
        assert_eq!(img.num_layers(), 1);
    }

    #[test]
    fn test_rename() {
        let mut img = LayeredImage::new();
        img.create_layer("a", 0, white(1, 1)).unwrap();
        img.create_layer("b", 1, white(1, 1)).unwrap();
        assert_eq!(img.rename("b", "a"), Err(Error::duplicate_name("b")));
        img.rename("c", "a").unwrap();
        assert_eq!(img.layer_names(), vec!["c", "b"]);
        assert_eq!(img.rename("d", 5), Err(Error::index_out_of_bounds(5, 2)));
    }

    #[test]
    fn test_apply_sole_layer_may_resize() {
        let mut img = LayeredImage::new();
        img.create_layer("a", 0, white(2, 2)).unwrap();
        img.apply(&Resize(5, 6), "a").unwrap();
        assert_eq!(img.dimensions(), Some((5, 6)));
        assert_eq!(img.layer(0).unwrap().image().pixels()[0], Pixel::BLACK);
    }

    #[test]
    fn test_apply_mismatch_leaves_state() {
        let mut img = LayeredImage::new();
        img.create_layer("a", 0, white(2, 2)).unwrap();
        img.create_layer("b", 0, white(2, 2)).unwrap();
        let before = img.clone();
        assert!(matches!(
            img.apply(&Resize(1, 1), 0),
            Err(Error::DimensionMismatch { .. })
        ));
        assert_eq!(img, before);
        img.apply(&Resize(2, 2), 1).unwrap();
        assert_eq!(img.layer("a").unwrap().image().pixels()[3], Pixel::BLACK);
    }

    #[test]
    fn test_top_visible() {
        let mut img = LayeredImage::new();
        img.create_layer("bottom", 0, white(1, 1)).unwrap();
        img.create_layer("top", 0, white(1, 1)).unwrap();
        assert_eq!(img.top_visible_index(), Some(0));
        img.set_visible(false, "top").unwrap();
        assert_eq!(img.top_visible_layer().unwrap().name(), "bottom");
        img.set_visible(false, "bottom").unwrap();
        assert_eq!(img.top_visible_index(), None);
    }

    #[test]
    fn test_set_name() {
        let mut img = LayeredImage::new();
        assert!(img.set_name("").is_err());
        img.set_name("poster").unwrap();
        assert_eq!(img.name(), "poster");
    }
}
