//! Project info command.
//!
//! Shows a saved project's size and layer stack.

use crate::InfoArgs;
use anyhow::{Context, Result};
use strata_io::{LayeredImageProvider, ProjectDirectory};

/// Runs the info command.
///
/// The manifest is always listed; with `verbose` every layer image is also
/// decoded to confirm the project loads.
pub fn run(args: InfoArgs, verbose: bool) -> Result<()> {
    let project = ProjectDirectory::new(&args.input);
    let manifest = project
        .read_manifest()
        .with_context(|| format!("Failed to read project: {}", args.input.display()))?;

    println!("{}", project.project_name().unwrap_or("(unnamed)"));
    println!("  Resolution: {}x{}", manifest.width, manifest.height);
    println!("  Layers:     {}", manifest.entries.len());

    let name_width = manifest
        .entries
        .iter()
        .map(|e| e.name.len())
        .max()
        .unwrap_or(0);
    for entry in &manifest.entries {
        println!(
            "    {:>3}  {:<width$}  {}",
            entry.index,
            entry.name,
            entry.file,
            width = name_width
        );
    }

    if verbose {
        let image = project
            .extract_layered()
            .with_context(|| format!("Failed to load project: {}", args.input.display()))?;
        println!("  Loaded:     {} layers OK", image.num_layers());
    }
    Ok(())
}
