//! Conversion between [`Image`] and packed 8-bit RGB buffers.

use crate::{IoError, IoResult};
use strata_core::{Image, Pixel, Raster};

/// Packs an image as `RGBRGB...`, failing on any channel outside `[0, 255]`.
pub(crate) fn pack(image: &Image) -> IoResult<Vec<u8>> {
    let mut out = Vec::with_capacity(image.num_pixels() * 3);
    for (coord, px) in image.enumerate() {
        let channels = px.to_array();
        for value in channels {
            let byte = u8::try_from(value).map_err(|_| {
                IoError::saving(format!("pixel {px} at {coord} does not fit 8 bits"))
            })?;
            out.push(byte);
        }
    }
    Ok(out)
}

/// Builds an image from `stride`-byte pixels, keeping the first three bytes.
///
/// `stride` 1 and 2 are gray and gray+alpha: the first byte fills R, G and B.
pub(crate) fn unpack(width: u32, height: u32, data: &[u8], stride: usize) -> IoResult<Image> {
    let count = width as usize * height as usize;
    if data.len() < count * stride {
        return Err(IoError::extraction(format!(
            "expected {} bytes for {width}x{height}, got {}",
            count * stride,
            data.len()
        )));
    }
    let pixels = data
        .chunks_exact(stride)
        .take(count)
        .map(|px| match stride {
            1 | 2 => Pixel::gray(i32::from(px[0])),
            _ => Pixel::new(i32::from(px[0]), i32::from(px[1]), i32::from(px[2])),
        })
        .collect();
    Ok(Image::from_pixels(width, height, pixels)?)
}
