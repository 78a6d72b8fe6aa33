//! JPEG format support.
//!
//! Decoding accepts RGB, grayscale (8 and 16 bit) and CMYK input and converts
//! everything to RGB. Encoding writes baseline RGB at a configurable quality.
//!
//! JPEG is lossy: a written image does not read back pixel-identical.
//!
//! # Example
//!
//! ```rust,ignore
//! use strata_io::jpeg::{self, JpegWriterOptions};
//!
//! let image = jpeg::read("photo.jpg")?;
//! jpeg::write_with_options("small.jpg", &image, &JpegWriterOptions { quality: 60 })?;
//! ```

use crate::{rgb8, IoError, IoResult};
use std::fs;
use std::io::{BufReader, Read};
use std::path::Path;
use strata_core::{Image, Raster};
use tracing::debug;

/// Options for writing JPEG files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JpegWriterOptions {
    /// Quality level 1-100. Default: 90.
    pub quality: u8,
}

impl Default for JpegWriterOptions {
    fn default() -> Self {
        Self { quality: 90 }
    }
}

/// Reads a JPEG file.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    let path = path.as_ref();
    debug!(path = %path.display(), "read JPEG");
    let file = fs::File::open(path)
        .map_err(|e| IoError::extraction(format!("cannot open {}: {e}", path.display())))?;
    decode_from(BufReader::new(file))
}

/// Decodes JPEG bytes held in memory.
pub fn decode(bytes: &[u8]) -> IoResult<Image> {
    decode_from(bytes)
}

fn decode_from<R: Read>(reader: R) -> IoResult<Image> {
    let mut decoder = jpeg_decoder::Decoder::new(reader);
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::extraction(e.to_string()))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::extraction("missing JPEG info"))?;

    let width = u32::from(info.width);
    let height = u32::from(info.height);

    let rgb: Vec<u8> = match info.pixel_format {
        jpeg_decoder::PixelFormat::RGB24 => pixels,
        jpeg_decoder::PixelFormat::L8 => pixels.iter().flat_map(|&g| [g, g, g]).collect(),
        jpeg_decoder::PixelFormat::L16 => pixels
            .chunks(2)
            // High byte
            .flat_map(|l16| [l16[0], l16[0], l16[0]])
            .collect(),
        jpeg_decoder::PixelFormat::CMYK32 => pixels.chunks(4).flat_map(cmyk_to_rgb).collect(),
    };
    rgb8::unpack(width, height, &rgb, 3)
}

fn cmyk_to_rgb(cmyk: &[u8]) -> [u8; 3] {
    let k = 1.0 - f32::from(cmyk[3]) / 255.0;
    let channel = |v: u8| ((1.0 - f32::from(v) / 255.0) * k * 255.0) as u8;
    [channel(cmyk[0]), channel(cmyk[1]), channel(cmyk[2])]
}

/// Writes a JPEG file at the default quality.
pub fn write<P: AsRef<Path>>(path: P, image: &Image) -> IoResult<()> {
    write_with_options(path, image, &JpegWriterOptions::default())
}

/// Writes a JPEG file with explicit options.
pub fn write_with_options<P: AsRef<Path>>(
    path: P,
    image: &Image,
    options: &JpegWriterOptions,
) -> IoResult<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), quality = options.quality, "write JPEG");
    let bytes = encode(image, options)?;
    fs::write(path, bytes)
        .map_err(|e| IoError::saving(format!("cannot write {}: {e}", path.display())))
}

/// Encodes an image as JPEG bytes.
///
/// Fails with [`IoError::Saving`] if a channel does not fit 8 bits or a side
/// exceeds 65535 pixels.
pub fn encode(image: &Image, options: &JpegWriterOptions) -> IoResult<Vec<u8>> {
    use jpeg_encoder::{ColorType, Encoder};

    let (width, height) = match (u16::try_from(image.width()), u16::try_from(image.height())) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(IoError::saving(format!(
                "{}x{} exceeds the JPEG size limit",
                image.width(),
                image.height()
            )));
        }
    };
    let data = rgb8::pack(image)?;

    let mut buffer = Vec::new();
    let encoder = Encoder::new(&mut buffer, options.quality.clamp(1, 100));
    encoder
        .encode(&data, width, height, ColorType::Rgb)
        .map_err(|e: jpeg_encoder::EncodingError| IoError::saving(e.to_string()))?;
    Ok(buffer)
}
