//! Script and interactive commands.

use crate::interpreter::Session;
use crate::{InteractiveArgs, ScriptArgs};
use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use tracing::info;

/// Runs a script file against a fresh session.
pub fn run(args: ScriptArgs, verbose: bool) -> Result<()> {
    let file = File::open(&args.input)
        .with_context(|| format!("Failed to open script: {}", args.input.display()))?;
    let mut session = Session::new().with_mosaic_seed(args.random_seed);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let report = session
        .run_script(BufReader::new(file), &mut out)
        .context("Failed to run script")?;
    info!(executed = report.executed, failed = report.failed, "script finished");

    if verbose {
        println!(
            "{} commands, {} failed; {} layers",
            report.executed,
            report.failed,
            session.image().num_layers()
        );
    }
    if args.strict && report.failed > 0 {
        bail!("{} of {} commands failed", report.failed, report.executed);
    }
    Ok(())
}

/// Reads commands from stdin until end of input or `quit`.
pub fn run_interactive(args: InteractiveArgs, verbose: bool) -> Result<()> {
    let mut session = Session::new().with_mosaic_seed(args.random_seed);
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut line = String::new();
    loop {
        if verbose {
            write!(out, "[{} | focus {}] ", session.image().name(), session.image().focus_index())?;
        }
        write!(out, "> ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        if matches!(line.trim(), "quit" | "exit") {
            break;
        }
        session.run_line(&line, &mut out)?;
    }
    Ok(())
}
