//! Image buffer types.
//!
//! This module provides the two raster containers of the model:
//! - [`Image`] - immutable pixel grid, cheap to clone and safe to share
//! - [`MutableImage`] - exclusively owned grid supporting in-place writes
//!
//! Both implement the read-only [`Raster`] trait.
//!
//! # Memory Layout
//!
//! Pixels are stored in **row-major** order, top-to-bottom:
//!
//! ```text
//! [P(0,0) P(0,1) ... P(0,w-1)]  ← Row 0
//! [P(1,0) P(1,1) ... P(1,w-1)]  ← Row 1
//! ...
//! ```
//!
//! # Frozen Means Frozen
//!
//! An [`Image`] never exposes mutable access to its buffer. Going from one
//! container to the other always yields an independent buffer:
//!
//! ```rust
//! use strata_core::{Image, Pixel, PixelCoord, Raster};
//!
//! let original = Image::new(2, 2).unwrap();
//! let mut scratch = original.mutable_copy();
//! scratch.set_pixel(Pixel::BLACK, PixelCoord::new(0, 0)).unwrap();
//!
//! let snapshot = scratch.immutable_copy();
//! scratch.set_pixel(Pixel::gray(7), PixelCoord::new(0, 0)).unwrap();
//!
//! assert_eq!(original.pixel_at(PixelCoord::new(0, 0)), Some(Pixel::WHITE));
//! assert_eq!(snapshot.pixel_at(PixelCoord::new(0, 0)), Some(Pixel::BLACK));
//! ```
//!
//! # Used By
//!
//! - [`crate::layer::Layer`] - layer content
//! - `strata-ops` - every content operation reads an `Image` and writes a
//!   private `MutableImage`
//! - `strata-io` - codecs decode into and encode from `Image`

use crate::{Error, Pixel, PixelCoord, Result};
use std::fmt;
use std::sync::Arc;

/// Read-only access to a rectangular pixel grid.
///
/// Implemented by [`Image`], [`MutableImage`] and [`crate::Layer`], so
/// copy-construction and codecs can accept any of them.
pub trait Raster {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Pixel at `coord`, or `None` when the coordinate is outside the grid.
    fn pixel_at(&self, coord: PixelCoord) -> Option<Pixel>;

    /// `(width, height)`.
    #[inline]
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// Total number of pixels (`width * height`).
    #[inline]
    fn num_pixels(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Returns `true` if `0 <= row < height` and `0 <= col < width`.
    #[inline]
    fn contains(&self, coord: PixelCoord) -> bool {
        coord.row >= 0
            && coord.col >= 0
            && (coord.row as u32) < self.height()
            && (coord.col as u32) < self.width()
    }
}

/// Validates dimensions shared by both containers.
fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::invalid_dimensions(
            width,
            height,
            "width and height must be positive",
        ));
    }
    Ok(())
}

/// Buffer offset for a coordinate, if it lies inside the grid.
#[inline]
fn offset_of(width: u32, height: u32, coord: PixelCoord) -> Option<usize> {
    if coord.row < 0 || coord.col < 0 {
        return None;
    }
    let (row, col) = (coord.row as u32, coord.col as u32);
    if row >= height || col >= width {
        return None;
    }
    Some(row as usize * width as usize + col as usize)
}

/// Row-major generation shared by the `from_fn` constructors.
fn generate<F>(width: u32, height: u32, mut generator: F) -> Vec<Pixel>
where
    F: FnMut(PixelCoord) -> Pixel,
{
    let mut data = Vec::with_capacity(width as usize * height as usize);
    for row in 0..height as i32 {
        for col in 0..width as i32 {
            data.push(generator(PixelCoord::new(row, col)));
        }
    }
    data
}

/// Immutable `width x height` grid of [`Pixel`]s.
///
/// The buffer is held in an `Arc<[Pixel]>`, so cloning an `Image` is cheap
/// and clones may share storage. This is sound because no handle can ever
/// write to it; all edits go through [`Image::mutable_copy`].
///
/// # Example
///
/// ```rust
/// use strata_core::{Image, Pixel, PixelCoord, Raster};
///
/// let img = Image::from_fn(3, 2, |c| Pixel::gray(c.row * 10 + c.col)).unwrap();
/// assert_eq!(img.num_pixels(), 6);
/// assert_eq!(img.pixel_at(PixelCoord::new(1, 2)), Some(Pixel::gray(12)));
/// assert_eq!(img.pixel_at(PixelCoord::new(2, 0)), None);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    /// Pixel data, row-major
    data: Arc<[Pixel]>,
    /// Image width in pixels
    width: u32,
    /// Image height in pixels
    height: u32,
}

impl Image {
    /// Creates a white image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if either dimension is zero.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::filled(width, height, Pixel::WHITE)
    }

    /// Creates an image filled with a single pixel value.
    pub fn filled(width: u32, height: u32, pixel: Pixel) -> Result<Self> {
        check_dimensions(width, height)?;
        let data = vec![pixel; width as usize * height as usize];
        Ok(Self {
            data: data.into(),
            width,
            height,
        })
    }

    /// Creates an image by calling `generator` once per coordinate.
    ///
    /// Coordinates are visited row by row.
    pub fn from_fn<F>(width: u32, height: u32, generator: F) -> Result<Self>
    where
        F: FnMut(PixelCoord) -> Pixel,
    {
        check_dimensions(width, height)?;
        Ok(Self {
            data: generate(width, height, generator).into(),
            width,
            height,
        })
    }

    /// Creates an image from row-major pixel data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `data.len() != width * height`.
    pub fn from_pixels(width: u32, height: u32, data: Vec<Pixel>) -> Result<Self> {
        check_dimensions(width, height)?;
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(Error::invalid_argument(format!(
                "expected {} pixels for {}x{}, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }
        Ok(Self {
            data: data.into(),
            width,
            height,
        })
    }

    /// Copy-constructs an image from any raster, reading each valid
    /// coordinate once.
    pub fn from_raster<R: Raster + ?Sized>(source: &R) -> Result<Self> {
        let (width, height) = source.dimensions();
        check_dimensions(width, height)?;
        let mut data = Vec::with_capacity(source.num_pixels());
        for row in 0..height as i32 {
            for col in 0..width as i32 {
                let coord = PixelCoord::new(row, col);
                let pixel = source.pixel_at(coord).ok_or_else(|| {
                    Error::invalid_argument(format!("raster has no pixel at {coord}"))
                })?;
                data.push(pixel);
            }
        }
        Self::from_pixels(width, height, data)
    }

    /// Row-major view of the pixel data.
    #[inline]
    pub fn pixels(&self) -> &[Pixel] {
        &self.data
    }

    /// Iterates rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Pixel]> {
        self.data.chunks_exact(self.width as usize)
    }

    /// Iterates `(coordinate, pixel)` pairs in row-major order.
    pub fn enumerate(&self) -> impl Iterator<Item = (PixelCoord, Pixel)> + '_ {
        let width = self.width as usize;
        self.data.iter().enumerate().map(move |(i, px)| {
            (PixelCoord::new((i / width) as i32, (i % width) as i32), *px)
        })
    }

    /// Returns a deep, exclusively owned, writable copy.
    pub fn mutable_copy(&self) -> MutableImage {
        MutableImage {
            data: self.data.to_vec(),
            width: self.width,
            height: self.height,
        }
    }
}

impl Raster for Image {
    #[inline]
    fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn pixel_at(&self, coord: PixelCoord) -> Option<Pixel> {
        offset_of(self.width, self.height, coord).map(|i| self.data[i])
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Writable pixel grid with the same shape contract as [`Image`].
///
/// Produced by [`Image::mutable_copy`] or built directly by codecs.
/// [`immutable_copy`](Self::immutable_copy) snapshots without giving up the
/// buffer; [`into_image`](Self::into_image) freezes by move.
#[derive(Clone, PartialEq, Eq)]
pub struct MutableImage {
    data: Vec<Pixel>,
    width: u32,
    height: u32,
}

impl MutableImage {
    /// Creates a white mutable image.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::filled(width, height, Pixel::WHITE)
    }

    /// Creates a mutable image filled with a single pixel value.
    pub fn filled(width: u32, height: u32, pixel: Pixel) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            data: vec![pixel; width as usize * height as usize],
            width,
            height,
        })
    }

    /// Creates a mutable image by calling `generator` once per coordinate.
    pub fn from_fn<F>(width: u32, height: u32, generator: F) -> Result<Self>
    where
        F: FnMut(PixelCoord) -> Pixel,
    {
        check_dimensions(width, height)?;
        Ok(Self {
            data: generate(width, height, generator),
            width,
            height,
        })
    }

    /// Replaces the pixel at `coord` with a copy of `pixel`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if the coordinate is outside the grid.
    pub fn set_pixel(&mut self, pixel: Pixel, coord: PixelCoord) -> Result<()> {
        let index = offset_of(self.width, self.height, coord).ok_or_else(|| {
            Error::out_of_bounds(coord.row, coord.col, self.width, self.height)
        })?;
        self.data[index] = pixel;
        Ok(())
    }

    /// Row-major view of the pixel data.
    #[inline]
    pub fn pixels(&self) -> &[Pixel] {
        &self.data
    }

    /// Row-major mutable view of the pixel data.
    ///
    /// Rows are `width()` pixels long; operations split this slice into rows
    /// to fill them independently.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.data
    }

    /// Applies `f` to every pixel in place.
    pub fn map_in_place<F>(&mut self, mut f: F)
    where
        F: FnMut(Pixel) -> Pixel,
    {
        for px in &mut self.data {
            *px = f(*px);
        }
    }

    /// Returns a deep, independent immutable snapshot.
    ///
    /// Later writes to `self` never show through the snapshot.
    pub fn immutable_copy(&self) -> Image {
        Image {
            data: Arc::from(self.data.as_slice()),
            width: self.width,
            height: self.height,
        }
    }

    /// Freezes this buffer into an [`Image`].
    ///
    /// Consumes `self`, so the frozen pixels can no longer be reached
    /// through a mutable handle.
    pub fn into_image(self) -> Image {
        Image {
            data: self.data.into(),
            width: self.width,
            height: self.height,
        }
    }
}

impl Raster for MutableImage {
    #[inline]
    fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn pixel_at(&self, coord: PixelCoord) -> Option<Pixel> {
        offset_of(self.width, self.height, coord).map(|i| self.data[i])
    }
}

impl fmt::Debug for MutableImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutableImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl From<MutableImage> for Image {
    fn from(image: MutableImage) -> Self {
        image.into_image()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> Image {
        Image::from_fn(width, height, |c| Pixel::new(c.row, c.col, c.row + c.col)).unwrap()
    }

    #[test]
    fn test_new_is_white() {
        let img = Image::new(4, 3).unwrap();
        assert_eq!(img.dimensions(), (4, 3));
        assert_eq!(img.num_pixels(), 12);
        assert!(img.pixels().iter().all(|p| *p == Pixel::WHITE));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(matches!(
            Image::new(0, 5),
            Err(Error::InvalidDimensions { width: 0, height: 5, .. })
        ));
        assert!(MutableImage::new(5, 0).is_err());
    }

    #[test]
    fn test_contains() {
        let img = Image::new(3, 2).unwrap();
        assert!(img.contains(PixelCoord::new(0, 0)));
        assert!(img.contains(PixelCoord::new(1, 2)));
        assert!(!img.contains(PixelCoord::new(2, 0)));
        assert!(!img.contains(PixelCoord::new(0, 3)));
        assert!(!img.contains(PixelCoord::new(-1, 0)));
    }

    #[test]
    fn test_from_pixels_length_checked() {
        let err = Image::from_pixels(2, 2, vec![Pixel::BLACK; 3]).unwrap_err();
        assert!(err.is_argument_error());
    }

    #[test]
    fn test_generator_coordinates() {
        let img = gradient(3, 2);
        assert_eq!(img.pixel_at(PixelCoord::new(1, 2)), Some(Pixel::new(1, 2, 3)));
        let coords: Vec<_> = img.enumerate().map(|(c, _)| c).collect();
        assert_eq!(coords[4], PixelCoord::new(1, 1));
    }

    #[test]
    fn test_mutable_copy_is_deep() {
        let img = gradient(2, 2);
        let mut copy = img.mutable_copy();
        copy.set_pixel(Pixel::new(9, 9, 9), PixelCoord::new(0, 0)).unwrap();
        assert_eq!(img.pixel_at(PixelCoord::new(0, 0)), Some(Pixel::new(0, 0, 0)));
    }

    #[test]
    fn test_roundtrip_copies_equal() {
        let img = gradient(5, 4);
        assert_eq!(img.mutable_copy().immutable_copy(), img);
    }

    #[test]
    fn test_immutable_copy_is_frozen() {
        let mut scratch = MutableImage::new(2, 1).unwrap();
        let frozen = scratch.immutable_copy();
        scratch.set_pixel(Pixel::BLACK, PixelCoord::new(0, 1)).unwrap();
        assert_eq!(frozen.pixel_at(PixelCoord::new(0, 1)), Some(Pixel::WHITE));
    }

    #[test]
    fn test_set_pixel_out_of_bounds() {
        let mut scratch = MutableImage::new(2, 2).unwrap();
        let err = scratch.set_pixel(Pixel::BLACK, PixelCoord::new(2, 0)).unwrap_err();
        assert_eq!(err, Error::out_of_bounds(2, 0, 2, 2));
        assert!(scratch.pixels().iter().all(|p| *p == Pixel::WHITE));
    }

    #[test]
    fn test_from_raster() {
        let src = gradient(3, 3).mutable_copy();
        let copy = Image::from_raster(&src).unwrap();
        assert_eq!(copy.pixels(), src.pixels());
    }

    #[test]
    fn test_rows() {
        let img = gradient(4, 2);
        let rows: Vec<_> = img.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][3], Pixel::new(1, 3, 4));
    }
}
