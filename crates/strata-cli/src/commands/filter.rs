//! One-shot filter command.

use crate::FilterArgs;
use anyhow::{Context, Result};
use std::time::Instant;
use strata_core::{ImageOperation, Raster};
use tracing::debug;

/// Loads `input`, applies the chosen catalog filter and writes `output`.
pub fn run(args: FilterArgs, verbose: bool) -> Result<()> {
    let image = super::load_image(&args.input)?;
    let op = args
        .kind
        .build(args.seeds, args.random_seed)
        .with_context(|| format!("Cannot build filter {}", args.kind))?;

    let start = Instant::now();
    let result = op.operate_on(&image);
    debug!(kind = %args.kind, elapsed = ?start.elapsed(), "filter applied");

    super::save_image(&args.output, &result)?;

    if verbose {
        println!(
            "{} -> {} ({}, {}x{}, {:.1?})",
            args.input.display(),
            args.output.display(),
            args.kind,
            result.width(),
            result.height(),
            start.elapsed()
        );
    }
    Ok(())
}
