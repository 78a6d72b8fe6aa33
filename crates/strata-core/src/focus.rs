//! Focus tracking on top of [`LayeredImage`].
//!
//! [`FocusableLayeredImage`] owns a layered image and remembers which layer is
//! "in focus": the layer that front ends load into, filter and toggle.
//!
//! # Invariant
//!
//! The focus is absent (`focus_index() == -1`) exactly when there are no
//! layers; otherwise it is a valid index. Every structural edit shifts the
//! focus so that it keeps pointing at the same layer:
//!
//! | Edit | Focus update |
//! |------|--------------|
//! | create at `i` | `i <= f` → `f + 1`; first layer → `0` |
//! | copy to `i` | `i <= f` → `f + 1` |
//! | remove `i` | `i <= f` → `f - 1`, floored at `0` while layers remain |
//!
//! The new focus is computed up front and committed only after the wrapped
//! call succeeds, so a failed edit never moves it.
//!
//! Reads go through `Deref<Target = LayeredImage>`; there is no `DerefMut`,
//! so bookkeeping cannot be bypassed.

use crate::{Error, Image, ImageOperation, Layer, LayerRef, LayeredImage, Result};
use std::ops::Deref;
use tracing::{debug, trace};

/// A [`LayeredImage`] with a tracked focus layer.
///
/// # Example
///
/// ```rust
/// use strata_core::{FocusableLayeredImage, Image};
///
/// let mut img = FocusableLayeredImage::default();
/// assert_eq!(img.focus_index(), -1);
///
/// img.create_layer("A", 0, Image::new(10, 10)?)?;
/// img.create_layer("B", 0, Image::new(10, 10)?)?;
/// // "A" moved down to index 1 and focus followed it.
/// assert_eq!(img.focus_layer().map(|l| l.name()), Some("A"));
///
/// img.remove_layer("A")?;
/// assert_eq!(img.focus_layer().map(|l| l.name()), Some("B"));
/// # Ok::<(), strata_core::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FocusableLayeredImage {
    inner: LayeredImage,
    focus: Option<usize>,
}

impl From<LayeredImage> for FocusableLayeredImage {
    fn from(inner: LayeredImage) -> Self {
        Self::new(inner)
    }
}

impl Deref for FocusableLayeredImage {
    type Target = LayeredImage;

    fn deref(&self) -> &LayeredImage {
        &self.inner
    }
}

impl FocusableLayeredImage {
    /// Wraps a layered image; a non-empty image starts focused on layer 0.
    pub fn new(inner: LayeredImage) -> Self {
        let focus = (!inner.is_empty()).then_some(0);
        Self { inner, focus }
    }

    /// Returns the wrapped image.
    pub fn into_inner(self) -> LayeredImage {
        self.inner
    }

    /// Focus index, if any layer exists.
    #[inline]
    pub fn focus(&self) -> Option<usize> {
        self.focus
    }

    /// Focus index, or `-1` when there is no focus.
    #[inline]
    pub fn focus_index(&self) -> i64 {
        self.focus.map_or(-1, |f| f as i64)
    }

    /// The layer in focus.
    pub fn focus_layer(&self) -> Option<&Layer> {
        self.focus.and_then(|f| self.inner.layer(f).ok())
    }

    fn require_focus(&self) -> Result<usize> {
        self.focus.ok_or(Error::NoFocus)
    }

    /// Moves the focus to another layer.
    pub fn set_focus_layer<'a>(&mut self, layer: impl Into<LayerRef<'a>>) -> Result<()> {
        let index = self.inner.resolve(layer)?;
        trace!(index, "focus");
        self.focus = Some(index);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Edits that move layers
    // ------------------------------------------------------------------

    /// See [`LayeredImage::create_layer`].
    pub fn create_layer(
        &mut self,
        name: impl Into<String>,
        index: usize,
        content: Image,
    ) -> Result<()> {
        let focus = match self.focus {
            Some(f) if index <= f => Some(f + 1),
            None => Some(0),
            keep => keep,
        };
        self.inner.create_layer(name, index, content)?;
        self.focus = focus;
        Ok(())
    }

    /// See [`LayeredImage::copy_layer`].
    pub fn copy_layer<'a>(
        &mut self,
        source: impl Into<LayerRef<'a>>,
        dest_name: impl Into<String>,
        dest_index: usize,
    ) -> Result<()> {
        let focus = match self.focus {
            Some(f) if dest_index <= f => Some(f + 1),
            keep => keep,
        };
        self.inner.copy_layer(source, dest_name, dest_index)?;
        self.focus = focus;
        Ok(())
    }

    /// See [`LayeredImage::remove_layer`].
    pub fn remove_layer<'a>(&mut self, layer: impl Into<LayerRef<'a>>) -> Result<Layer> {
        let index = self.inner.resolve(layer)?;
        let removed = self.inner.remove_layer(index)?;
        self.focus = match self.focus {
            _ if self.inner.is_empty() => None,
            Some(f) if index <= f => Some(f.saturating_sub(1)),
            keep => keep,
        };
        debug!(focus = self.focus_index(), "focus after remove");
        Ok(removed)
    }

    // ------------------------------------------------------------------
    // Pass-through edits
    // ------------------------------------------------------------------

    /// See [`LayeredImage::replace`].
    pub fn replace<'a>(&mut self, layer: impl Into<LayerRef<'a>>, content: Image) -> Result<()> {
        self.inner.replace(layer, content)
    }

    /// See [`LayeredImage::set_visible`].
    pub fn set_visible<'a>(&mut self, visible: bool, layer: impl Into<LayerRef<'a>>) -> Result<()> {
        self.inner.set_visible(visible, layer)
    }

    /// See [`LayeredImage::rename`].
    pub fn rename<'a>(
        &mut self,
        new_name: impl Into<String>,
        layer: impl Into<LayerRef<'a>>,
    ) -> Result<()> {
        self.inner.rename(new_name, layer)
    }

    /// See [`LayeredImage::apply`].
    pub fn apply<'a, O>(&mut self, op: &O, layer: impl Into<LayerRef<'a>>) -> Result<()>
    where
        O: ImageOperation + ?Sized,
    {
        self.inner.apply(op, layer)
    }

    /// See [`LayeredImage::set_name`].
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.inner.set_name(name)
    }

    // ------------------------------------------------------------------
    // Focus-targeted edits
    // ------------------------------------------------------------------

    /// Applies `op` to the focus layer.
    pub fn apply_to_focus<O>(&mut self, op: &O) -> Result<()>
    where
        O: ImageOperation + ?Sized,
    {
        let f = self.require_focus()?;
        self.inner.apply(op, f)
    }

    /// Replaces the focus layer's content.
    pub fn replace_focus(&mut self, content: Image) -> Result<()> {
        let f = self.require_focus()?;
        self.inner.replace(f, content)
    }

    /// Shows or hides the focus layer.
    pub fn set_focus_visible(&mut self, visible: bool) -> Result<()> {
        let f = self.require_focus()?;
        self.inner.set_visible(visible, f)
    }
}
