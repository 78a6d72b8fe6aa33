//! CLI command implementations

pub mod filter;
pub mod info;
pub mod script;

use anyhow::{Context, Result};
use std::path::Path;
use strata_core::Image;

/// Load image from path
pub fn load_image(path: &Path) -> Result<Image> {
    strata_io::read(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save image to path
pub fn save_image(path: &Path, image: &Image) -> Result<()> {
    strata_io::write(path, image).with_context(|| format!("Failed to save: {}", path.display()))
}
