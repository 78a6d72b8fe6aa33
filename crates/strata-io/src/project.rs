//! Layered project directories.
//!
//! A project is a directory holding one encoded image per layer plus a
//! `layers.txt` manifest:
//!
//! ```text
//! 2                    layer count
//! 640 480              shared width and height
//! 0 background background.png
//! 1 sketch sketch.png
//! ```
//!
//! Each entry is `index name file`, in stack order. Relative file entries are
//! resolved against the project directory. The project's name is the
//! directory's file name. Visibility flags are not persisted; every layer
//! reloads visible.
//!
//! # Example
//!
//! ```rust,ignore
//! use strata_io::{LayeredImageProvider, LayeredImageSaver, ProjectDirectory};
//!
//! ProjectDirectory::new("out/poster").with_extension("png").save_layered(&image)?;
//! let reloaded = ProjectDirectory::new("out/poster").extract_layered()?;
//! ```

use crate::{Format, IoError, IoResult, LayeredImageProvider, LayeredImageSaver};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use strata_core::LayeredImage;
use tracing::{debug, trace};

/// File name of the manifest inside a project directory.
pub const MANIFEST: &str = "layers.txt";

/// Extension used when none is configured.
pub const DEFAULT_EXTENSION: &str = "ppm";

/// One manifest line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Stack position.
    pub index: usize,
    /// Layer name.
    pub name: String,
    /// Image file, relative to the project directory or absolute.
    pub file: String,
}

/// Parsed `layers.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Shared width.
    pub width: u32,
    /// Shared height.
    pub height: u32,
    /// Entries in the order they are listed.
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Parses manifest text.
    ///
    /// Tokens are whitespace separated; line breaks carry no meaning.
    ///
    /// # Errors
    ///
    /// [`IoError::Extraction`] on missing or non-integer header values,
    /// negative values, truncated entries, or tokens after the last entry.
    pub fn parse(text: &str) -> IoResult<Self> {
        let mut tokens = text.split_whitespace();
        let mut next = |what: &str| {
            tokens
                .next()
                .ok_or_else(|| IoError::extraction(format!("manifest ends before {what}")))
        };
        let int = |token: &str, what: &str| -> IoResult<i64> {
            token
                .parse::<i64>()
                .map_err(|_| IoError::extraction(format!("manifest {what} '{token}' is not an integer")))
        };
        let non_negative = |value: i64, what: &str| -> IoResult<u64> {
            u64::try_from(value)
                .map_err(|_| IoError::extraction(format!("manifest {what} {value} is negative")))
        };

        let count = non_negative(int(next("layer count")?, "layer count")?, "layer count")?;
        let width = non_negative(int(next("width")?, "width")?, "width")?;
        let height = non_negative(int(next("height")?, "height")?, "height")?;
        let (width, height) = match (u32::try_from(width), u32::try_from(height)) {
            (Ok(w), Ok(h)) => (w, h),
            _ => return Err(IoError::extraction(format!("manifest size {width}x{height} too large"))),
        };

        let mut entries = Vec::new();
        for _ in 0..count {
            let index = non_negative(int(next("layer index")?, "layer index")?, "layer index")?;
            let name = next("layer name")?.to_string();
            let file = next("layer file")?.to_string();
            entries.push(ManifestEntry {
                index: usize::try_from(index)
                    .map_err(|_| IoError::extraction(format!("layer index {index} too large")))?,
                name,
                file,
            });
        }

        if let Some(extra) = tokens.next() {
            return Err(IoError::extraction(format!(
                "unexpected token '{extra}' after {count} manifest entries"
            )));
        }
        Ok(Self {
            width,
            height,
            entries,
        })
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.entries.len())?;
        writeln!(f, "{} {}", self.width, self.height)?;
        for entry in &self.entries {
            writeln!(f, "{} {} {}", entry.index, entry.name, entry.file)?;
        }
        Ok(())
    }
}

/// A project directory, used both as a [`LayeredImageProvider`] and a
/// [`LayeredImageSaver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDirectory {
    dir: PathBuf,
    extension: String,
}

impl ProjectDirectory {
    /// Binds to `dir`. Layers are saved as [`DEFAULT_EXTENSION`] files.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    /// Sets the extension (and with it the format) layers are saved in.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// The project directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The extension layers are saved in.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// The project name: the directory's file name.
    pub fn project_name(&self) -> Option<&str> {
        self.dir.file_name().and_then(|n| n.to_str())
    }

    /// Reads and parses the manifest only.
    pub fn read_manifest(&self) -> IoResult<Manifest> {
        if !self.dir.is_dir() {
            return Err(IoError::extraction(format!(
                "{} is not a directory",
                self.dir.display()
            )));
        }
        let path = self.dir.join(MANIFEST);
        let text = fs::read_to_string(&path)
            .map_err(|e| IoError::extraction(format!("cannot read {}: {e}", path.display())))?;
        Manifest::parse(&text)
    }

    fn saving_format(&self) -> IoResult<Format> {
        if self.extension.is_empty() {
            return Err(IoError::saving("layer file extension must not be empty"));
        }
        let format = Format::from_name(&self.extension);
        if !format.is_supported() {
            return Err(IoError::saving(format!(
                "cannot save layers as '{}'",
                self.extension
            )));
        }
        Ok(format)
    }
}

fn check_layer_name(name: &str) -> IoResult<()> {
    if name.chars().any(|c| c.is_whitespace() || c == '/' || c == '\\') {
        return Err(IoError::saving(format!(
            "layer name '{name}' cannot be stored in a project"
        )));
    }
    Ok(())
}

impl LayeredImageSaver for ProjectDirectory {
    fn save_layered(&self, image: &LayeredImage) -> IoResult<()> {
        let (width, height) = image
            .dimensions()
            .ok_or_else(|| IoError::saving("cannot save an image with no layers"))?;
        let format = self.saving_format()?;
        for name in image.layer_names() {
            check_layer_name(name)?;
        }
        debug!(dir = %self.dir.display(), layers = image.num_layers(), %format, "save project");

        fs::create_dir_all(&self.dir).map_err(|e| {
            IoError::saving(format!("cannot create {}: {e}", self.dir.display()))
        })?;

        let mut entries = Vec::with_capacity(image.num_layers());
        for (index, layer) in image.layers().enumerate() {
            let file = format!("{}.{}", layer.name(), self.extension);
            trace!(index, file = %file, "save layer");
            crate::write_as(format, self.dir.join(&file), layer.image())?;
            entries.push(ManifestEntry {
                index,
                name: layer.name().to_string(),
                file,
            });
        }

        let manifest = Manifest {
            width,
            height,
            entries,
        };
        let path = self.dir.join(MANIFEST);
        fs::write(&path, manifest.to_string())
            .map_err(|e| IoError::saving(format!("cannot write {}: {e}", path.display())))
    }
}

impl LayeredImageProvider for ProjectDirectory {
    fn extract_layered(&self) -> IoResult<LayeredImage> {
        let manifest = self.read_manifest()?;
        debug!(dir = %self.dir.display(), layers = manifest.entries.len(), "load project");

        let mut image = LayeredImage::new();
        for entry in &manifest.entries {
            let path = self.dir.join(&entry.file);
            let content = crate::read(&path).map_err(|e| match e {
                IoError::Extraction(_) => e,
                other => IoError::extraction(format!("{}: {other}", path.display())),
            })?;
            image
                .create_layer(entry.name.as_str(), entry.index, content)
                .map_err(|e| IoError::extraction(format!("layer '{}': {e}", entry.name)))?;
        }

        if let Some(dims) = image.dimensions() {
            if dims != (manifest.width, manifest.height) {
                return Err(IoError::extraction(format!(
                    "layers are {}x{} but the manifest declares {}x{}",
                    dims.0, dims.1, manifest.width, manifest.height
                )));
            }
        }
        if let Some(name) = self.project_name() {
            image.set_name(name)?;
        }
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::{Image, Pixel};

    #[test]
    fn test_parse_manifest() {
        let m = Manifest::parse("2\n4 3\n0 top top.ppm\n1 base /abs/base.png\n").unwrap();
        assert_eq!((m.width, m.height), (4, 3));
        assert_eq!(m.entries.len(), 2);
        assert_eq!(m.entries[1].name, "base");
        assert_eq!(m.entries[1].file, "/abs/base.png");
    }

    #[test]
    fn test_manifest_text_layout() {
        let m = Manifest {
            width: 5,
            height: 6,
            entries: vec![ManifestEntry {
                index: 0,
                name: "only".into(),
                file: "only.ppm".into(),
            }],
        };
        assert_eq!(m.to_string(), "1\n5 6\n0 only only.ppm\n");
        assert_eq!(Manifest::parse(&m.to_string()).unwrap(), m);
    }

    #[test]
    fn test_manifest_rejections() {
        for text in [
            "",
            "-1\n2 2\n",
            "0\n-2 2\n",
            "1\n2 2\n0 a\n",
            "1\n2 2\n0 a a.ppm trailing\n",
            "x\n2 2\n",
            "1\n2 2\n-1 a a.ppm\n",
        ] {
            let err = Manifest::parse(text).unwrap_err();
            assert!(err.is_extraction(), "{text:?}: {err}");
        }
        assert!(Manifest::parse("0\n0 0\n").unwrap().entries.is_empty());
    }

    #[test]
    fn test_empty_image_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let target = ProjectDirectory::new(dir.path().join("p"));
        let err = target.save_layered(&LayeredImage::new()).unwrap_err();
        assert!(err.is_saving());
        assert!(!dir.path().join("p").exists());
    }

    #[test]
    fn test_bad_extension_or_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut image = LayeredImage::new();
        image
            .create_layer("a b", 0, Image::filled(2, 2, Pixel::BLACK).unwrap())
            .unwrap();

        let err = ProjectDirectory::new(dir.path()).save_layered(&image).unwrap_err();
        assert!(err.is_saving());

        image.rename("ab", 0).unwrap();
        for ext in ["", "gif"] {
            let err = ProjectDirectory::new(dir.path())
                .with_extension(ext)
                .save_layered(&image)
                .unwrap_err();
            assert!(err.is_saving(), "{ext:?}");
        }
    }

    #[test]
    fn test_missing_directory_or_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let missing = ProjectDirectory::new(dir.path().join("nope"));
        assert!(missing.extract_layered().unwrap_err().is_extraction());
        let no_manifest = ProjectDirectory::new(dir.path());
        assert!(no_manifest.extract_layered().unwrap_err().is_extraction());
    }

    #[test]
    fn test_header_dims_checked() {
        let dir = tempfile::tempdir().unwrap();
        let img = Image::filled(2, 2, Pixel::gray(9)).unwrap();
        crate::ppm::write(dir.path().join("a.ppm"), &img).unwrap();
        fs::write(dir.path().join(MANIFEST), "1\n3 3\n0 a a.ppm\n").unwrap();
        let err = ProjectDirectory::new(dir.path()).extract_layered().unwrap_err();
        assert!(err.is_extraction());
    }
}
