//! PNG format support.
//!
//! Reading normalizes every PNG to 8-bit color first: palettes are expanded,
//! 16-bit samples are stripped to 8 bits and gray is replicated into R, G and
//! B. Alpha is dropped. Writing always produces 8-bit RGB.
//!
//! # Example
//!
//! ```rust,ignore
//! use strata_io::png;
//!
//! let image = png::read("input.png")?;
//! png::write("output.png", &image)?;
//! ```

use crate::{rgb8, IoError, IoResult};
use std::fs::File;
use std::io::{BufReader, BufRead, BufWriter, Cursor, Seek, Write};
use std::path::Path;
use strata_core::{Image, Raster};
use tracing::debug;

/// Reads a PNG file from the given path.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    let path = path.as_ref();
    debug!(path = %path.display(), "read PNG");
    let file = File::open(path)
        .map_err(|e| IoError::extraction(format!("cannot open {}: {e}", path.display())))?;
    decode_from(BufReader::new(file))
}

/// Decodes PNG bytes held in memory.
pub fn decode(bytes: &[u8]) -> IoResult<Image> {
    decode_from(Cursor::new(bytes))
}

fn decode_from<R: BufRead + Seek>(source: R) -> IoResult<Image> {
    let mut decoder = png::Decoder::new(source);
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| IoError::extraction(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::extraction("cannot determine output buffer size"))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| IoError::extraction(e.to_string()))?;

    if info.bit_depth != png::BitDepth::Eight {
        return Err(IoError::extraction(format!(
            "unsupported PNG bit depth {:?}",
            info.bit_depth
        )));
    }
    let stride = match info.color_type {
        png::ColorType::Grayscale => 1,
        png::ColorType::GrayscaleAlpha => 2,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        other => {
            return Err(IoError::extraction(format!("unsupported PNG color type {other:?}")));
        }
    };
    rgb8::unpack(info.width, info.height, &buf[..info.buffer_size()], stride)
}

/// Writes an image to a PNG file as 8-bit RGB.
///
/// Fails with [`IoError::Saving`] if a channel does not fit 8 bits.
pub fn write<P: AsRef<Path>>(path: P, image: &Image) -> IoResult<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), "write PNG");
    // Validate before touching the file system.
    let data = rgb8::pack(image)?;
    let file = File::create(path)
        .map_err(|e| IoError::saving(format!("cannot create {}: {e}", path.display())))?;
    encode_into(BufWriter::new(file), image, &data)
}

/// Encodes an image as PNG bytes.
pub fn encode(image: &Image) -> IoResult<Vec<u8>> {
    let data = rgb8::pack(image)?;
    let mut out = Vec::new();
    encode_into(&mut out, image, &data)?;
    Ok(out)
}

fn encode_into<W: Write>(sink: W, image: &Image, data: &[u8]) -> IoResult<()> {
    let mut encoder = png::Encoder::new(sink, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::default());

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::saving(e.to_string()))?;
    writer
        .write_image_data(data)
        .map_err(|e| IoError::saving(e.to_string()))?;
    writer.finish().map_err(|e| IoError::saving(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{Pixel, PixelCoord};

    fn gradient() -> Image {
        Image::from_fn(32, 16, |c| Pixel::new(c.col * 8, c.row * 16, 128)).unwrap()
    }

    #[test]
    fn test_roundtrip_rgb() {
        let image = gradient();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gradient.png");

        write(&path, &image).expect("Failed to write PNG");
        let loaded = read(&path).expect("Failed to read PNG");

        assert_eq!(loaded, image);
    }

    #[test]
    fn test_memory_roundtrip() {
        let image = gradient();
        let bytes = encode(&image).unwrap();
        assert_eq!(crate::Format::from_bytes(&bytes), crate::Format::Png);
        assert_eq!(decode(&bytes).unwrap(), image);
    }

    #[test]
    fn test_grayscale_alpha_input() {
        let mut bytes = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut bytes, 2, 1);
            encoder.set_color(png::ColorType::GrayscaleAlpha);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(&[40, 255, 200, 0]).unwrap();
            writer.finish().unwrap();
        }
        let image = decode(&bytes).unwrap();
        assert_eq!(image.pixel_at(PixelCoord::new(0, 0)), Some(Pixel::gray(40)));
        assert_eq!(image.pixel_at(PixelCoord::new(0, 1)), Some(Pixel::gray(200)));
    }

    #[test]
    fn test_out_of_range_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.png");
        let image = Image::filled(2, 2, Pixel::new(300, 0, 0)).unwrap();
        assert!(write(&path, &image).unwrap_err().is_saving());
        assert!(!path.exists());
    }

    #[test]
    fn test_garbage_is_extraction_error() {
        assert!(decode(b"not a png").unwrap_err().is_extraction());
        assert!(read("/definitely/missing.png").unwrap_err().is_extraction());
    }
}
