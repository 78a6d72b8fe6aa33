//! Format detection utilities.
//!
//! Formats are chosen by file extension; magic bytes are available for
//! sniffing files whose extension is missing or wrong.

use crate::IoResult;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Plain-text portable pixmap (`P3`).
    Ppm,
    /// PNG format.
    Png,
    /// JPEG format.
    Jpeg,
    /// Unknown/unsupported format.
    Unknown,
}

impl Format {
    /// Detects format from file path (extension, then magic bytes).
    pub fn detect<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let path = path.as_ref();
        match Self::from_extension(path) {
            Format::Unknown => Self::from_magic_bytes(path),
            known => Ok(known),
        }
    }

    /// Detects format from file extension only.
    pub fn from_extension<P: AsRef<Path>>(path: P) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        match ext.as_deref() {
            Some(ext) => Self::from_name(ext),
            None => Format::Unknown,
        }
    }

    /// Parses a bare extension such as `"png"` or `"JPG"`.
    pub fn from_name(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "ppm" => Format::Ppm,
            "png" => Format::Png,
            "jpg" | "jpeg" => Format::Jpeg,
            _ => Format::Unknown,
        }
    }

    /// Detects format from file magic bytes.
    pub fn from_magic_bytes<P: AsRef<Path>>(path: P) -> IoResult<Self> {
        let mut file = File::open(path)?;
        let mut header = [0u8; 8];
        let bytes_read = file.read(&mut header)?;
        Ok(Self::from_bytes(&header[..bytes_read]))
    }

    /// Detects format from raw bytes (magic number check).
    pub fn from_bytes(bytes: &[u8]) -> Self {
        // PNG: 0x89 'P' 'N' 'G' CR LF SUB LF
        if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Format::Png;
        }
        // JPEG: SOI followed by a marker
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Format::Jpeg;
        }
        // Plain PPM: "P3" then whitespace
        if bytes.len() >= 3 && bytes.starts_with(b"P3") && bytes[2].is_ascii_whitespace() {
            return Format::Ppm;
        }
        Format::Unknown
    }

    /// Canonical file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Ppm => "ppm",
            Format::Png => "png",
            Format::Jpeg => "jpg",
            Format::Unknown => "",
        }
    }

    /// Returns `true` if this build can read and write the format.
    pub fn is_supported(self) -> bool {
        match self {
            Format::Ppm => true,
            Format::Png => cfg!(feature = "png"),
            Format::Jpeg => cfg!(feature = "jpeg"),
            Format::Unknown => false,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Ppm => "PPM",
            Format::Png => "PNG",
            Format::Jpeg => "JPEG",
            Format::Unknown => "unknown",
        };
        f.write_str(name)
    }
}
