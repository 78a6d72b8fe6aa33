//! Plain-text PPM (`P3`) support.
//!
//! # Layout
//!
//! ```text
//! P3
//! # comment lines start with '#'
//! <width> <height>
//! <maxval>
//! r g b r g b ...        (row-major, any whitespace between tokens)
//! ```
//!
//! The reader accepts any `maxval` and requires every channel to lie in
//! `[0, maxval]`; values are taken as-is, without rescaling. The writer always
//! emits `maxval` 255 and one channel value per line.
//!
//! # Example
//!
//! ```rust
//! use strata_core::{Image, Pixel};
//! use strata_io::ppm;
//!
//! let img = Image::filled(2, 1, Pixel::new(1, 2, 3)).unwrap();
//! let text = ppm::encode(&img).unwrap();
//! assert!(text.starts_with("P3\n2 1\n255\n1\n2\n3\n"));
//! assert_eq!(ppm::decode(&text).unwrap(), img);
//! ```

use crate::{IoError, IoResult};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use strata_core::{Image, Pixel, Raster, CHANNEL_MAX, CHANNEL_MIN};
use tracing::{debug, trace};

/// Magic token of the plain-text variant.
pub const MAGIC: &str = "P3";

/// `maxval` written by [`encode`].
pub const MAX_VALUE: i32 = 255;

/// Whitespace token stream over the non-comment lines of a PPM file.
struct Tokens<'a> {
    inner: Box<dyn Iterator<Item = &'a str> + 'a>,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        let inner = text
            .lines()
            .filter(|line| !line.starts_with('#'))
            .flat_map(str::split_whitespace);
        Self {
            inner: Box::new(inner),
        }
    }

    fn next_token(&mut self, what: &str) -> IoResult<&'a str> {
        self.inner
            .next()
            .ok_or_else(|| IoError::extraction(format!("unexpected end of data reading {what}")))
    }

    fn next_int(&mut self, what: &str) -> IoResult<i64> {
        let token = self.next_token(what)?;
        token
            .parse()
            .map_err(|_| IoError::extraction(format!("expected an integer for {what}, got '{token}'")))
    }
}

/// Parses PPM text into an image.
///
/// # Errors
///
/// [`IoError::Extraction`] if the magic token is not `P3`, the header is
/// incomplete or non-positive, data runs out, or a channel lies outside
/// `[0, maxval]`.
pub fn decode(text: &str) -> IoResult<Image> {
    let mut tokens = Tokens::new(text);
    let magic = tokens
        .inner
        .next()
        .ok_or_else(|| IoError::extraction("PPM data is empty"))?;
    if magic != MAGIC {
        return Err(IoError::extraction(format!(
            "expected PPM magic '{MAGIC}', found '{magic}'"
        )));
    }

    let width = tokens.next_int("width")?;
    let height = tokens.next_int("height")?;
    let max_value = tokens.next_int("maxval")?;
    let (width, height) = match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
        _ => {
            return Err(IoError::extraction(format!(
                "invalid PPM dimensions {width}x{height}"
            )));
        }
    };
    trace!(width, height, max_value, "decode PPM");

    let mut channel = |name: &str| -> IoResult<i32> {
        let value = tokens.next_int(name)?;
        if !(0..=max_value).contains(&value) {
            return Err(IoError::extraction(format!(
                "{name} channel {value} outside [0, {max_value}]"
            )));
        }
        // maxval itself may exceed i32
        i32::try_from(value)
            .map_err(|_| IoError::extraction(format!("{name} channel {value} too large")))
    };

    let count = width as usize * height as usize;
    let mut pixels = Vec::with_capacity(count);
    for _ in 0..count {
        let r = channel("red")?;
        let g = channel("green")?;
        let b = channel("blue")?;
        pixels.push(Pixel::new(r, g, b));
    }
    Ok(Image::from_pixels(width, height, pixels)?)
}

/// Serializes an image as PPM text.
///
/// # Errors
///
/// [`IoError::Saving`] if a channel lies outside `[0, 255]`.
pub fn encode(image: &Image) -> IoResult<String> {
    let mut out = String::with_capacity(16 + image.num_pixels() * 12);
    let _ = writeln!(out, "{MAGIC}");
    let _ = writeln!(out, "{} {}", image.width(), image.height());
    let _ = writeln!(out, "{MAX_VALUE}");
    for (coord, px) in image.enumerate() {
        if !px.is_displayable() {
            return Err(IoError::saving(format!(
                "pixel {px} at {coord} has a channel outside [{CHANNEL_MIN}, {CHANNEL_MAX}]"
            )));
        }
        let _ = writeln!(out, "{}\n{}\n{}", px.r, px.g, px.b);
    }
    Ok(out)
}

/// Reads a PPM file.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    let path = path.as_ref();
    debug!(path = %path.display(), "read PPM");
    let text = fs::read_to_string(path)
        .map_err(|e| IoError::extraction(format!("cannot read {}: {e}", path.display())))?;
    decode(&text)
}

/// Writes a PPM file.
pub fn write<P: AsRef<Path>>(path: P, image: &Image) -> IoResult<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), "write PPM");
    let text = encode(image)?;
    fs::write(path, text)
        .map_err(|e| IoError::saving(format!("cannot write {}: {e}", path.display())))
}
