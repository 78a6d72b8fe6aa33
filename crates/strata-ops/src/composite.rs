//! Sequential operation pipelines.

use crate::ContentOperation;
use strata_core::{Image, ImageOperation};
use tracing::trace;

/// Runs a list of operations in order, each on the previous one's output.
///
/// An empty composite returns its input unchanged.
///
/// # Example
///
/// ```rust
/// use strata_core::{Image, ImageOperation, Pixel};
/// use strata_ops::{color_transform::ColorTransform, composite::Composite};
///
/// let add_ten = ColorTransform::from_fn(|p| Pixel::new(p.r + 10, p.g, p.b));
/// let twice = Composite::new(vec![add_ten.clone().into(), add_ten.into()]);
/// let out = twice.operate_on(&Image::filled(1, 1, Pixel::BLACK).unwrap());
/// assert_eq!(out.pixels()[0], Pixel::new(20, 0, 0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Composite {
    ops: Vec<ContentOperation>,
}

impl Composite {
    /// Creates a pipeline.
    pub fn new(ops: Vec<ContentOperation>) -> Self {
        Self { ops }
    }

    /// Appends an operation.
    pub fn push(&mut self, op: impl Into<ContentOperation>) {
        self.ops.push(op.into());
    }

    /// The operations, in application order.
    pub fn operations(&self) -> &[ContentOperation] {
        &self.ops
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns `true` if the pipeline has no stages.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

impl FromIterator<ContentOperation> for Composite {
    fn from_iter<I: IntoIterator<Item = ContentOperation>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl ImageOperation for Composite {
    fn operate_on(&self, image: &Image) -> Image {
        trace!(stages = self.ops.len(), "composite");
        self.ops
            .iter()
            .fold(image.clone(), |acc, op| op.operate_on(&acc))
    }
}
