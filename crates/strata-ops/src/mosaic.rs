//! Seed-based mosaic partitioning.
//!
//! The mosaic filter picks `num_seeds` distinct pixel positions at random and
//! repaints every pixel with the color of its nearest seed (taxicab
//! distance), producing flat cells around each seed.
//!
//! # Seed Selection
//!
//! Candidates are listed column by column (outer loop over columns, inner
//! over rows). Each draw picks an index with [`Lcg48::next_int`] and removes
//! that candidate from the list, keeping the order of the rest. A given
//! `random_seed` therefore always selects the same positions.
//!
//! # Ties
//!
//! Among equidistant seeds the one with the lowest row, then the lowest
//! column, wins.

use crate::parallel::fill_rows;
use crate::rng::Lcg48;
use crate::{OpsError, OpsResult};
use strata_core::{Image, ImageOperation, PixelCoord, Raster};
use tracing::trace;

/// Repaints an image as cells around randomly chosen seed pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MosaicFilter {
    num_seeds: usize,
    random_seed: i64,
}

impl MosaicFilter {
    /// Creates a mosaic filter.
    ///
    /// More seeds than the image has pixels is allowed; every pixel then
    /// becomes a seed.
    ///
    /// # Errors
    ///
    /// Returns [`OpsError::InvalidParameter`] if `num_seeds` is negative.
    pub fn new(num_seeds: i64, random_seed: i64) -> OpsResult<Self> {
        let num_seeds = usize::try_from(num_seeds).map_err(|_| {
            OpsError::InvalidParameter(format!("seed count must not be negative, got {num_seeds}"))
        })?;
        Ok(Self {
            num_seeds,
            random_seed,
        })
    }

    /// Requested seed count.
    pub fn num_seeds(&self) -> usize {
        self.num_seeds
    }

    /// Seed of the random source.
    pub fn random_seed(&self) -> i64 {
        self.random_seed
    }

    /// Positions chosen as seeds for an image of the given size, in draw
    /// order.
    pub fn seed_points(&self, width: u32, height: u32) -> Vec<PixelCoord> {
        let mut pool: Vec<PixelCoord> = (0..width as i32)
            .flat_map(|col| (0..height as i32).map(move |row| PixelCoord::new(row, col)))
            .collect();
        let count = self.num_seeds.min(pool.len());
        let mut rng = Lcg48::new(self.random_seed);
        let mut seeds = Vec::with_capacity(count);
        for _ in 0..count {
            let bound = i32::try_from(pool.len()).unwrap_or(i32::MAX);
            let index = rng.next_int(bound) as usize;
            seeds.push(pool.remove(index));
        }
        seeds
    }
}

/// Closest seed to `here`; `here` itself when there are no seeds.
fn nearest_seed(seeds: &[PixelCoord], here: PixelCoord) -> PixelCoord {
    seeds
        .iter()
        .min_by_key(|s| (s.taxicab_distance(here), **s))
        .copied()
        .unwrap_or(here)
}

impl ImageOperation for MosaicFilter {
    fn operate_on(&self, image: &Image) -> Image {
        let seeds = self.seed_points(image.width(), image.height());
        trace!(
            width = image.width(),
            height = image.height(),
            seeds = seeds.len(),
            "mosaic"
        );
        if seeds.is_empty() {
            return image.clone();
        }

        let mut out = image.mutable_copy();
        fill_rows(&mut out, |row, pixels| {
            for (col, px) in pixels.iter_mut().enumerate() {
                let nearest = nearest_seed(&seeds, PixelCoord::new(row, col as i32));
                if let Some(color) = image.pixel_at(nearest) {
                    *px = color;
                }
            }
        });
        out.into_image()
    }
}
