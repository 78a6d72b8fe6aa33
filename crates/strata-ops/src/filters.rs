//! The standard filter catalog.
//!
//! | Keyword | Operation |
//! |---------|-----------|
//! | `sepia` | [`sepia`] color matrix |
//! | `grayscale` | [`grayscale`] color matrix |
//! | `blur` | [`blur`] 3x3 kernel on R, G and B |
//! | `sharpen` | [`sharpen`] 5x5 kernel on R, G and B |
//! | `mosaic` | [`mosaic`] with a seed count |
//!
//! Front ends look filters up by keyword through [`FilterKind`].
//!
//! # Example
//!
//! ```rust
//! use strata_core::{Image, ImageOperation};
//! use strata_ops::filters::FilterKind;
//!
//! let kind: FilterKind = "grayscale".parse()?;
//! let op = kind.build(None, strata_ops::filters::DEFAULT_MOSAIC_SEED)?;
//! let out = op.operate_on(&Image::new(2, 2)?);
//! assert_eq!(out, Image::new(2, 2)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::color_transform::{ColorMatrix, ColorTransform};
use crate::composite::Composite;
use crate::kernel::{EdgeMode, Kernel, KernelFilter};
use crate::mosaic::MosaicFilter;
use crate::{ContentOperation, OpsError, OpsResult};
use std::fmt;
use std::str::FromStr;
use strata_core::Channel;

/// Random seed front ends use for the mosaic filter.
pub const DEFAULT_MOSAIC_SEED: i64 = 3250;

/// Sepia tone channel mix.
pub const SEPIA_MATRIX: ColorMatrix = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Luma weights used for every output channel of [`grayscale`].
pub const GRAYSCALE_WEIGHTS: [f64; 3] = [0.216, 0.7152, 0.0722];

const BLUR_KERNEL: [[f64; 3]; 3] = [
    [1.0 / 16.0, 1.0 / 8.0, 1.0 / 16.0],
    [1.0 / 8.0, 1.0 / 4.0, 1.0 / 8.0],
    [1.0 / 16.0, 1.0 / 8.0, 1.0 / 16.0],
];

const OUTER: f64 = -1.0 / 8.0;
const INNER: f64 = 1.0 / 4.0;
const SHARPEN_KERNEL: [[f64; 5]; 5] = [
    [OUTER, OUTER, OUTER, OUTER, OUTER],
    [OUTER, INNER, INNER, INNER, OUTER],
    [OUTER, INNER, 1.0, INNER, OUTER],
    [OUTER, INNER, INNER, INNER, OUTER],
    [OUTER, OUTER, OUTER, OUTER, OUTER],
];

/// Sepia tone.
pub fn sepia() -> ContentOperation {
    ColorTransform::matrix(SEPIA_MATRIX).into()
}

/// Grayscale: every channel becomes the same weighted luma.
pub fn grayscale() -> ContentOperation {
    ColorTransform::matrix([GRAYSCALE_WEIGHTS; 3]).into()
}

/// Runs the same kernel over R, G and B in turn.
fn per_channel(kernel: Kernel) -> ContentOperation {
    Channel::ALL
        .into_iter()
        .map(|ch| KernelFilter::new(kernel.clone(), ch, EdgeMode::Exclude).into())
        .collect::<Composite>()
        .into()
}

/// Gaussian-like 3x3 blur.
pub fn blur() -> ContentOperation {
    per_channel(Kernel::from_array(BLUR_KERNEL))
}

/// 5x5 sharpen.
pub fn sharpen() -> ContentOperation {
    per_channel(Kernel::from_array(SHARPEN_KERNEL))
}

/// Mosaic with `num_seeds` cells.
pub fn mosaic(num_seeds: i64, random_seed: i64) -> OpsResult<ContentOperation> {
    Ok(MosaicFilter::new(num_seeds, random_seed)?.into())
}

/// Catalog keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// `sepia`
    Sepia,
    /// `grayscale`
    Grayscale,
    /// `blur`
    Blur,
    /// `sharpen`
    Sharpen,
    /// `mosaic`, takes a seed count
    Mosaic,
}

impl FilterKind {
    /// Every catalog entry.
    pub const ALL: [FilterKind; 5] = [
        FilterKind::Sepia,
        FilterKind::Grayscale,
        FilterKind::Blur,
        FilterKind::Sharpen,
        FilterKind::Mosaic,
    ];

    /// Keyword this filter is looked up by.
    pub fn keyword(self) -> &'static str {
        match self {
            FilterKind::Sepia => "sepia",
            FilterKind::Grayscale => "grayscale",
            FilterKind::Blur => "blur",
            FilterKind::Sharpen => "sharpen",
            FilterKind::Mosaic => "mosaic",
        }
    }

    /// Returns `true` if [`build`](Self::build) needs a seed count.
    pub fn needs_seed_count(self) -> bool {
        self == FilterKind::Mosaic
    }

    /// Builds the operation. `num_seeds` is required for
    /// [`Mosaic`](FilterKind::Mosaic) and ignored otherwise.
    pub fn build(self, num_seeds: Option<i64>, random_seed: i64) -> OpsResult<ContentOperation> {
        match self {
            FilterKind::Sepia => Ok(sepia()),
            FilterKind::Grayscale => Ok(grayscale()),
            FilterKind::Blur => Ok(blur()),
            FilterKind::Sharpen => Ok(sharpen()),
            FilterKind::Mosaic => {
                let n = num_seeds.ok_or_else(|| {
                    OpsError::InvalidParameter("mosaic needs a seed count".into())
                })?;
                mosaic(n, random_seed)
            }
        }
    }
}

impl FromStr for FilterKind {
    type Err = OpsError;

    fn from_str(s: &str) -> OpsResult<Self> {
        FilterKind::ALL
            .into_iter()
            .find(|k| k.keyword() == s)
            .ok_or_else(|| OpsError::UnknownFilter(s.to_string()))
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}
