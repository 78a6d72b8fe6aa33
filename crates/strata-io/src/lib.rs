//! # strata-io
//!
//! Reading and writing images and layered projects.
//!
//! - **PPM** - plain-text `P3`, always available
//! - **PNG** - lossless, 8-bit RGB output
//! - **JPEG** - lossy, quality setting
//! - **Projects** - a directory of per-layer images plus a `layers.txt` manifest
//!
//! # Architecture
//!
//! Sources and destinations are expressed as four small traits:
//!
//! - [`ImageProvider`] / [`ImageSaver`] - one image, implemented by [`ImageFile`]
//! - [`LayeredImageProvider`] / [`LayeredImageSaver`] - a whole stack,
//!   implemented by [`ProjectDirectory`]
//!
//! [`read`] and [`write`] pick the codec from the file extension.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use strata_io::{read, write};
//!
//! let image = read("input.ppm")?;
//! write("output.png", &image)?;
//! ```
//!
//! # Feature Flags
//!
//! - `png` - PNG support (default)
//! - `jpeg` - JPEG support (default)

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod detect;
mod error;
mod rgb8;
mod traits;
pub mod ppm;
pub mod project;

#[cfg(feature = "png")]
pub mod png;

#[cfg(feature = "jpeg")]
pub mod jpeg;

pub use detect::Format;
pub use error::{IoError, IoResult};
pub use project::{Manifest, ManifestEntry, ProjectDirectory};
pub use traits::{ImageProvider, ImageSaver, LayeredImageProvider, LayeredImageSaver};

use std::path::{Path, PathBuf};
use strata_core::Image;

/// Reads an image from a file, auto-detecting the format.
///
/// The extension decides; files without a known extension are sniffed by
/// their magic bytes.
///
/// # Errors
///
/// - [`IoError::Extraction`] if the file cannot be opened or is malformed
/// - [`IoError::UnsupportedFormat`] if the format is unknown or disabled
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Image> {
    let path = path.as_ref();
    let format = Format::detect(path)
        .map_err(|e| IoError::extraction(format!("cannot open {}: {e}", path.display())))?;
    read_as(format, path)
}

/// Reads an image in an explicit format.
pub fn read_as<P: AsRef<Path>>(format: Format, path: P) -> IoResult<Image> {
    let path = path.as_ref();
    match format {
        Format::Ppm => ppm::read(path),

        #[cfg(feature = "png")]
        Format::Png => png::read(path),

        #[cfg(feature = "jpeg")]
        Format::Jpeg => jpeg::read(path),

        #[allow(unreachable_patterns)]
        _ => Err(unsupported(format, path)),
    }
}

/// Writes an image to a file, choosing the format from its extension.
///
/// # Errors
///
/// - [`IoError::Saving`] if the file cannot be written or a channel does not
///   fit the format
/// - [`IoError::UnsupportedFormat`] if the extension is unknown or disabled
pub fn write<P: AsRef<Path>>(path: P, image: &Image) -> IoResult<()> {
    let path = path.as_ref();
    write_as(Format::from_extension(path), path, image)
}

/// Writes an image in an explicit format.
pub fn write_as<P: AsRef<Path>>(format: Format, path: P, image: &Image) -> IoResult<()> {
    let path = path.as_ref();
    match format {
        Format::Ppm => ppm::write(path, image),

        #[cfg(feature = "png")]
        Format::Png => png::write(path, image),

        #[cfg(feature = "jpeg")]
        Format::Jpeg => jpeg::write(path, image),

        #[allow(unreachable_patterns)]
        _ => Err(unsupported(format, path)),
    }
}

fn unsupported(format: Format, path: &Path) -> IoError {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("unknown");
    IoError::UnsupportedFormat(format!("{ext} ({format})"))
}

/// A single image file, usable as both provider and saver.
///
/// Provider failures are always [`IoError::Extraction`] and saver failures
/// always [`IoError::Saving`], whatever the underlying cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    path: PathBuf,
}

impl ImageFile {
    /// Binds to `path`.
    ///
    /// # Errors
    ///
    /// [`IoError::UnsupportedFormat`] if `path` is empty.
    pub fn new(path: impl Into<PathBuf>) -> IoResult<Self> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(IoError::UnsupportedFormat("empty path".into()));
        }
        Ok(Self { path })
    }

    /// The bound path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ImageProvider for ImageFile {
    fn extract_image(&self) -> IoResult<Image> {
        if self.path.is_dir() {
            return Err(IoError::extraction(format!(
                "{} is a directory",
                self.path.display()
            )));
        }
        read(&self.path).map_err(|e| match e {
            IoError::Extraction(_) => e,
            other => IoError::extraction(other.to_string()),
        })
    }
}

impl ImageSaver for ImageFile {
    fn save_image(&self, image: &Image) -> IoResult<()> {
        if self.path.is_dir() {
            return Err(IoError::saving(format!(
                "{} is a directory",
                self.path.display()
            )));
        }
        write(&self.path, image).map_err(|e| match e {
            IoError::Saving(_) => e,
            other => IoError::saving(other.to_string()),
        })
    }
}
