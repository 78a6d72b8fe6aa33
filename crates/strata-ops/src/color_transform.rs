//! Per-pixel color transforms.
//!
//! A [`ColorTransform`] maps every pixel independently through a
//! [`Conversion`], then bounds every channel to `[0, 255]` in a separate
//! pass. Conversions therefore never need to clamp their own output.
//!
//! # Example
//!
//! ```rust
//! use strata_core::{Image, ImageOperation, Pixel};
//! use strata_ops::color_transform::ColorTransform;
//!
//! let invert = ColorTransform::from_fn(|p| Pixel::new(255 - p.r, 255 - p.g, 255 - p.b));
//! let out = invert.operate_on(&Image::filled(2, 2, Pixel::new(0, 10, 300)).unwrap());
//! // 255 - 300 = -45 is clamped to 0.
//! assert_eq!(out.pixels()[0], Pixel::new(255, 245, 0));
//! ```

use std::fmt;
use std::sync::Arc;
use strata_core::{Image, ImageOperation, Pixel, Raster};
use tracing::trace;

/// 3x3 channel mixing matrix; row `i` produces output channel `i` from
/// `[r, g, b]`.
pub type ColorMatrix = [[f64; 3]; 3];

/// Shared pixel mapping closure.
pub type PixelFn = Arc<dyn Fn(Pixel) -> Pixel + Send + Sync>;

/// How a [`ColorTransform`] maps one pixel.
#[derive(Clone)]
pub enum Conversion {
    /// Linear channel mix, truncated toward zero.
    Matrix(ColorMatrix),
    /// Arbitrary mapping.
    Custom(PixelFn),
}

impl Conversion {
    /// Maps a single pixel. The result may lie outside `[0, 255]`.
    pub fn convert(&self, px: Pixel) -> Pixel {
        match self {
            Conversion::Matrix(m) => {
                let (r, g, b) = (f64::from(px.r), f64::from(px.g), f64::from(px.b));
                let mix = |row: &[f64; 3]| (row[0] * r + row[1] * g + row[2] * b) as i32;
                Pixel::new(mix(&m[0]), mix(&m[1]), mix(&m[2]))
            }
            Conversion::Custom(f) => f(px),
        }
    }
}

impl fmt::Debug for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conversion::Matrix(m) => f.debug_tuple("Matrix").field(m).finish(),
            Conversion::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Applies a [`Conversion`] to every pixel, then clamps.
#[derive(Debug, Clone)]
pub struct ColorTransform {
    conversion: Conversion,
}

impl ColorTransform {
    /// Creates a transform from any conversion.
    pub fn new(conversion: Conversion) -> Self {
        Self { conversion }
    }

    /// Creates a channel-mixing transform.
    pub fn matrix(matrix: ColorMatrix) -> Self {
        Self::new(Conversion::Matrix(matrix))
    }

    /// Creates a transform from a closure.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(Pixel) -> Pixel + Send + Sync + 'static,
    {
        Self::new(Conversion::Custom(Arc::new(f)))
    }

    /// The conversion this transform applies.
    pub fn conversion(&self) -> &Conversion {
        &self.conversion
    }
}

impl ImageOperation for ColorTransform {
    fn operate_on(&self, image: &Image) -> Image {
        trace!(width = image.width(), height = image.height(), "color transform");
        let mut out = image.mutable_copy();
        // Every source pixel is read from the frozen input.
        for (dst, src) in out.pixels_mut().iter_mut().zip(image.pixels()) {
            *dst = self.conversion.convert(*src);
        }
        out.map_in_place(Pixel::clamped);
        out.into_image()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SWAP_RB: ColorMatrix = [[0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]];

    #[test]
    fn test_matrix_swaps_channels() {
        let img = Image::filled(3, 2, Pixel::new(10, 20, 30)).unwrap();
        let out = ColorTransform::matrix(SWAP_RB).operate_on(&img);
        assert!(out.pixels().iter().all(|p| *p == Pixel::new(30, 20, 10)));
        assert_eq!(out.dimensions(), (3, 2));
    }

    #[test]
    fn test_matrix_truncates_toward_zero() {
        let half = [[0.5, 0.0, 0.0], [0.0, 0.5, 0.0], [0.0, 0.0, -0.5]];
        let px = Conversion::Matrix(half).convert(Pixel::new(3, 5, 7));
        assert_eq!(px, Pixel::new(1, 2, -3));
    }

    #[test]
    fn test_result_is_clamped() {
        let boost = ColorTransform::from_fn(|p| Pixel::new(p.r * 4, -p.g, p.b));
        let out = boost.operate_on(&Image::filled(1, 1, Pixel::new(100, 50, 7)).unwrap());
        assert_eq!(out.pixels()[0], Pixel::new(255, 0, 7));
    }

    #[test]
    fn test_input_untouched() {
        let img = Image::filled(2, 2, Pixel::gray(9)).unwrap();
        let _ = ColorTransform::from_fn(|_| Pixel::BLACK).operate_on(&img);
        assert!(img.pixels().iter().all(|p| *p == Pixel::gray(9)));
    }

    #[test]
    fn test_debug_hides_closure() {
        let t = ColorTransform::from_fn(|p| p);
        assert!(format!("{t:?}").contains("Custom(..)"));
    }
}
