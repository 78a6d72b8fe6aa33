//! strata - layered raster image editor
//!
//! Runs editing scripts, an interactive prompt, and one-shot filters.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use strata_ops::filters::{FilterKind, DEFAULT_MOSAIC_SEED};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod interpreter;

#[derive(Parser)]
#[command(name = "strata")]
#[command(author, version, about = "Layered raster image editor")]
#[command(long_about = "
Edits multi-layered images with a small command language.

Examples:
  strata script edit.txt                       # Run a script
  strata interactive                           # Type commands at a prompt
  strata filter in.ppm -o out.png --kind sepia
  strata filter in.png -o out.png --kind mosaic --seeds 500
  strata info poster/                          # Show a saved project
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a script file
    #[command(visible_alias = "s")]
    Script(ScriptArgs),

    /// Read commands from standard input
    #[command(visible_alias = "i")]
    Interactive(InteractiveArgs),

    /// Apply one catalog filter to an image file
    #[command(visible_alias = "f")]
    Filter(FilterArgs),

    /// Display a saved project
    Info(InfoArgs),
}

#[derive(Args)]
struct ScriptArgs {
    /// Script file
    input: PathBuf,

    /// Exit with an error if any command failed
    #[arg(long)]
    strict: bool,

    /// Random seed for `apply mosaic`
    #[arg(long, default_value_t = DEFAULT_MOSAIC_SEED)]
    random_seed: i64,
}

#[derive(Args)]
struct InteractiveArgs {
    /// Random seed for `apply mosaic`
    #[arg(long, default_value_t = DEFAULT_MOSAIC_SEED)]
    random_seed: i64,
}

#[derive(Args)]
struct FilterArgs {
    /// Input image
    input: PathBuf,

    /// Output image
    #[arg(short, long)]
    output: PathBuf,

    /// Filter: sepia, grayscale, blur, sharpen or mosaic
    #[arg(short, long)]
    kind: FilterKind,

    /// Number of mosaic cells
    #[arg(long)]
    seeds: Option<i64>,

    /// Random seed for mosaic cell placement
    #[arg(long, default_value_t = DEFAULT_MOSAIC_SEED)]
    random_seed: i64,
}

#[derive(Args)]
struct InfoArgs {
    /// Project directory
    input: PathBuf,
}

/// Installs the global subscriber. The returned guard flushes the log file
/// when dropped.
fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };
    let stderr = fmt::layer().with_writer(std::io::stderr).with_filter(filter());

    match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let name = path
                .file_name()
                .with_context(|| format!("Log file needs a file name: {}", path.display()))?;
            let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            tracing_subscriber::registry()
                .with(stderr)
                .with(fmt::layer().with_writer(writer).with_ansi(false).with_filter(filter()))
                .try_init()
                .context("Failed to initialize logging")?;
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(stderr)
                .try_init()
                .context("Failed to initialize logging")?;
            Ok(None)
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Script(args) => commands::script::run(args, cli.verbose),
        Commands::Interactive(args) => commands::script::run_interactive(args, cli.verbose),
        Commands::Filter(args) => commands::filter::run(args, cli.verbose),
        Commands::Info(args) => commands::info::run(args, cli.verbose),
    }
}
