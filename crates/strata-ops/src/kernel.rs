//! Single-channel kernel convolution.
//!
//! A [`KernelFilter`] convolves one [`Channel`] of an image with a square,
//! odd-sized [`Kernel`]. The other two channels are carried over from the
//! source. How taps that fall outside the image are treated is chosen by an
//! [`EdgeMode`].
//!
//! # Rounding
//!
//! The weighted sum is rounded half-up (`floor(sum + 0.5)`), written to the
//! selected channel, and the whole result pixel is clamped to `[0, 255]`.
//!
//! # Example
//!
//! ```rust
//! use strata_core::{Channel, Image, ImageOperation, Pixel};
//! use strata_ops::kernel::{EdgeMode, Kernel, KernelFilter};
//!
//! let kernel = Kernel::new(vec![vec![0.0, 0.0, 0.0], vec![0.0, 0.5, 0.0], vec![0.0, 0.0, 0.0]])?;
//! let halve_red = KernelFilter::new(kernel, Channel::Red, EdgeMode::Exclude);
//! let out = halve_red.operate_on(&Image::filled(4, 4, Pixel::gray(100))?);
//! assert_eq!(out.pixels()[5], Pixel::new(50, 100, 100));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::parallel::fill_rows;
use crate::{OpsError, OpsResult};
use strata_core::{Channel, Image, ImageOperation, Pixel, PixelCoord, Raster};
use tracing::trace;

/// Square convolution kernel with an odd side length.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    /// Row-major weights, `size * size` long.
    data: Vec<f64>,
    size: usize,
}

impl Kernel {
    /// Creates a kernel from rows of weights.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::InvalidKernel`] if the rows are empty, not all of
    /// the same length as their count, or the side length is even.
    pub fn new(rows: Vec<Vec<f64>>) -> OpsResult<Self> {
        let size = rows.len();
        if size % 2 == 0 {
            return Err(OpsError::InvalidKernel(format!(
                "kernel must have an odd side length, got {size}"
            )));
        }
        if let Some(row) = rows.iter().find(|r| r.len() != size) {
            return Err(OpsError::InvalidKernel(format!(
                "kernel must be square: {size} rows but a row of {}",
                row.len()
            )));
        }
        Ok(Self {
            data: rows.into_iter().flatten().collect(),
            size,
        })
    }

    /// Builds a kernel from a fixed-size array known to have an odd side.
    pub(crate) fn from_array<const N: usize>(rows: [[f64; N]; N]) -> Self {
        debug_assert!(N % 2 == 1, "kernel side must be odd");
        Self {
            data: rows.iter().flatten().copied().collect(),
            size: N,
        }
    }

    /// The 1x1 identity kernel.
    pub fn identity() -> Self {
        Self {
            data: vec![1.0],
            size: 1,
        }
    }

    /// Side length.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Distance from the center to an edge.
    #[inline]
    pub fn radius(&self) -> usize {
        (self.size - 1) / 2
    }

    /// Weight at `(row, col)`.
    #[inline]
    pub fn weight(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.size + col]
    }

    /// Sum of all weights.
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }
}

/// Treatment of kernel taps outside the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeMode {
    /// Out-of-bounds taps contribute zero.
    #[default]
    Exclude,
    /// Out-of-bounds taps read the nearest edge pixel.
    Clamp,
}

impl EdgeMode {
    /// Channel value the tap at `coord` contributes.
    pub fn value_at(self, image: &Image, coord: PixelCoord, channel: Channel) -> i32 {
        match self {
            EdgeMode::Exclude => image.pixel_at(coord).map_or(0, |p| p.channel(channel)),
            EdgeMode::Clamp => {
                let row = coord.row.clamp(0, image.height() as i32 - 1);
                let col = coord.col.clamp(0, image.width() as i32 - 1);
                image
                    .pixel_at(PixelCoord::new(row, col))
                    .map_or(0, |p| p.channel(channel))
            }
        }
    }
}

/// Convolves one channel of an image with a kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelFilter {
    kernel: Kernel,
    channel: Channel,
    edge: EdgeMode,
}

impl KernelFilter {
    /// Creates a filter.
    pub fn new(kernel: Kernel, channel: Channel, edge: EdgeMode) -> Self {
        Self {
            kernel,
            channel,
            edge,
        }
    }

    /// The kernel.
    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// The channel written.
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// The edge policy.
    pub fn edge_mode(&self) -> EdgeMode {
        self.edge
    }

    fn filtered_pixel(&self, image: &Image, row: i32, col: i32) -> Pixel {
        let center = self.kernel.radius() as i32;
        let mut total = 0.0;
        for kr in 0..self.kernel.size() {
            for kc in 0..self.kernel.size() {
                let tap = PixelCoord::new(row + kr as i32 - center, col + kc as i32 - center);
                let value = self.edge.value_at(image, tap, self.channel);
                total += self.kernel.weight(kr, kc) * f64::from(value);
            }
        }
        let source = image
            .pixel_at(PixelCoord::new(row, col))
            .unwrap_or_default();
        let rounded = (total + 0.5).floor() as i32;
        source.with_channel(self.channel, rounded).clamped()
    }
}

impl ImageOperation for KernelFilter {
    fn operate_on(&self, image: &Image) -> Image {
        trace!(
            width = image.width(),
            height = image.height(),
            kernel = self.kernel.size(),
            channel = %self.channel,
            "kernel filter"
        );
        let mut out = image.mutable_copy();
        fill_rows(&mut out, |row, pixels| {
            for (col, px) in pixels.iter_mut().enumerate() {
                *px = self.filtered_pixel(image, row, col as i32);
            }
        });
        out.into_image()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn gradient() -> Image {
        Image::from_fn(5, 4, |c| Pixel::new(c.row * 40, c.col * 50, c.row + c.col)).unwrap()
    }

    fn box3() -> Kernel {
        Kernel::new(vec![vec![1.0 / 9.0; 3]; 3]).unwrap()
    }

    #[test]
    fn test_kernel_validation() {
        assert!(matches!(
            Kernel::new(vec![vec![1.0, 1.0], vec![1.0, 1.0]]),
            Err(OpsError::InvalidKernel(_))
        ));
        assert!(Kernel::new(vec![vec![1.0, 1.0, 1.0]]).is_err());
        assert!(Kernel::new(Vec::new()).is_err());
        let k = box3();
        assert_eq!(k.size(), 3);
        assert_eq!(k.radius(), 1);
        assert_relative_eq!(k.sum(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_identity_kernel_every_channel() {
        let img = gradient();
        for channel in Channel::ALL {
            for edge in [EdgeMode::Exclude, EdgeMode::Clamp] {
                let out = KernelFilter::new(Kernel::identity(), channel, edge).operate_on(&img);
                assert_eq!(out, img);
            }
        }
    }

    #[test]
    fn test_only_selected_channel_changes() {
        let img = Image::filled(3, 3, Pixel::new(90, 120, 150)).unwrap();
        let out = KernelFilter::new(box3(), Channel::Green, EdgeMode::Exclude).operate_on(&img);
        // Center sees all nine taps.
        assert_eq!(out.pixel_at(PixelCoord::new(1, 1)), Some(Pixel::new(90, 120, 150)));
        // Corner sees four taps: 4 * 120 / 9 = 53.33
        assert_eq!(out.pixel_at(PixelCoord::new(0, 0)), Some(Pixel::new(90, 53, 150)));
    }

    #[test]
    fn test_clamp_edges_keep_flat_image() {
        let img = Image::filled(4, 3, Pixel::gray(77)).unwrap();
        let out = KernelFilter::new(box3(), Channel::Red, EdgeMode::Clamp).operate_on(&img);
        assert_eq!(out, img);
    }

    #[test]
    fn test_rounds_half_up() {
        let half = Kernel::new(vec![vec![0.5]]).unwrap();
        let img = Image::from_pixels(3, 1, vec![Pixel::gray(1), Pixel::gray(3), Pixel::gray(4)])
            .unwrap();
        let out = KernelFilter::new(half, Channel::Blue, EdgeMode::Exclude).operate_on(&img);
        let blues: Vec<i32> = out.pixels().iter().map(|p| p.b).collect();
        assert_eq!(blues, vec![1, 2, 2]);
    }

    #[test]
    fn test_whole_pixel_clamped() {
        let img = Image::filled(1, 1, Pixel::new(300, -4, 10)).unwrap();
        let out = KernelFilter::new(Kernel::identity(), Channel::Blue, EdgeMode::Exclude)
            .operate_on(&img);
        assert_eq!(out.pixels()[0], Pixel::new(255, 0, 10));
    }

    #[test]
    fn test_negative_sum_clamps_to_zero() {
        let neg = Kernel::new(vec![vec![-2.0]]).unwrap();
        let img = Image::filled(2, 2, Pixel::gray(10)).unwrap();
        let out = KernelFilter::new(neg, Channel::Red, EdgeMode::Exclude).operate_on(&img);
        assert!(out.pixels().iter().all(|p| *p == Pixel::new(0, 10, 10)));
    }

    #[test]
    fn test_taps_read_source_only() {
        // Shift right: each pixel takes its left neighbour's red.
        let shift = Kernel::new(vec![
            vec![0.0, 0.0, 0.0],
            vec![1.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0],
        ])
        .unwrap();
        let img = Image::from_fn(4, 1, |c| Pixel::new(c.col * 10 + 10, 0, 0)).unwrap();
        let out = KernelFilter::new(shift, Channel::Red, EdgeMode::Exclude).operate_on(&img);
        let reds: Vec<i32> = out.pixels().iter().map(|p| p.r).collect();
        assert_eq!(reds, vec![0, 10, 20, 30]);
    }
}
