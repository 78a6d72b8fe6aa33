//! Row-parallel output filling.
//!
//! Operations that compute each output pixel from the frozen input only
//! (kernel filtering, mosaic) fill their result row by row. With the
//! `parallel` feature the rows are distributed over the rayon pool; without
//! it they are filled in order. Both paths write identical results.

use strata_core::{MutableImage, Pixel, Raster};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Calls `fill(row_index, row)` for every row of `out`.
pub(crate) fn fill_rows<F>(out: &mut MutableImage, fill: F)
where
    F: Fn(i32, &mut [Pixel]) + Send + Sync,
{
    let width = out.width() as usize;

    #[cfg(feature = "parallel")]
    out.pixels_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(row, pixels)| fill(row as i32, pixels));

    #[cfg(not(feature = "parallel"))]
    out.pixels_mut()
        .chunks_mut(width)
        .enumerate()
        .for_each(|(row, pixels)| fill(row as i32, pixels));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_visited_once() {
        let mut out = MutableImage::new(5, 7).unwrap();
        fill_rows(&mut out, |row, pixels| {
            for (col, px) in pixels.iter_mut().enumerate() {
                *px = Pixel::new(row, col as i32, 0);
            }
        });
        for (i, px) in out.pixels().iter().enumerate() {
            assert_eq!(*px, Pixel::new((i / 5) as i32, (i % 5) as i32, 0));
        }
    }
}
