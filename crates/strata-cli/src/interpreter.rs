//! Line-oriented script language over a focusable layered image.
//!
//! One command per line, tokens separated by whitespace. Blank lines and
//! lines starting with `#` are skipped.
//!
//! ```text
//! create base 0
//! load photo.ppm
//! apply sepia
//! copy base shadow 1
//! workon shadow
//! apply mosaic 200
//! visibility off
//! save out.png
//! saveall poster png
//! ```
//!
//! A failing command prints an error message and the script moves on.

use anyhow::{anyhow, bail, Context, Result};
use std::io::{self, BufRead, Write};
use strata_core::{FocusableLayeredImage, Image};
use strata_io::{
    ImageFile, ImageProvider, ImageSaver, LayeredImageProvider, LayeredImageSaver,
    ProjectDirectory,
};
use strata_ops::filters::{self, FilterKind};
use thiserror::Error;
use tracing::{debug, warn};

/// Size of the first layer created in an empty image.
pub const DEFAULT_LAYER_SIZE: (u32, u32) = (100, 100);

/// Words that cannot name a layer.
pub const KEYWORDS: [&str; 17] = [
    "load",
    "loadproj",
    "save",
    "saveall",
    "workon",
    "create",
    "remove",
    "apply",
    "grayscale",
    "sepia",
    "blur",
    "sharpen",
    "mosaic",
    "copy",
    "visibility",
    "on",
    "off",
];

/// Returns `true` if `word` is reserved by the script language.
pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// Why a line could not be turned into a [`Command`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// First token is not a command.
    #[error("Invalid command keyword")]
    UnknownKeyword(String),
    /// Wrong number or type of arguments.
    #[error("Invalid command format")]
    InvalidFormat,
    /// A layer name collides with [`KEYWORDS`].
    #[error("Cannot use a key word for a layer name.")]
    ReservedName(String),
}

/// One parsed script command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    /// `create <name> <index>`
    Create { name: &'a str, index: usize },
    /// `copy <source> <dest> <index>`
    Copy {
        source: &'a str,
        dest: &'a str,
        index: usize,
    },
    /// `remove <name>`
    Remove { name: &'a str },
    /// `load <file>`
    Load { file: &'a str },
    /// `loadproj <dir>`
    LoadProject { dir: &'a str },
    /// `save <file>`
    Save { file: &'a str },
    /// `saveall <dir> <ext>`
    SaveAll { dir: &'a str, extension: &'a str },
    /// `apply <filter> [seeds]`
    Apply {
        filter: FilterKind,
        seeds: Option<i64>,
    },
    /// `workon <name>`
    WorkOn { name: &'a str },
    /// `visibility <on|off>`
    Visibility(bool),
}

fn layer_name(token: &str) -> std::result::Result<&str, ParseError> {
    if is_keyword(token) {
        return Err(ParseError::ReservedName(token.to_string()));
    }
    Ok(token)
}

fn number<T: std::str::FromStr>(token: &str) -> std::result::Result<T, ParseError> {
    token.parse().map_err(|_| ParseError::InvalidFormat)
}

impl<'a> Command<'a> {
    /// Parses one line. Blank and comment lines give `Ok(None)`.
    pub fn parse(line: &'a str) -> std::result::Result<Option<Self>, ParseError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let tokens: Vec<&'a str> = line.split_whitespace().collect();

        let command = match (tokens[0], &tokens[1..]) {
            ("create", &[name, index]) => Command::Create {
                name: layer_name(name)?,
                index: number(index)?,
            },
            ("copy", &[source, dest, index]) => Command::Copy {
                source: layer_name(source)?,
                dest: layer_name(dest)?,
                index: number(index)?,
            },
            ("remove", &[name]) => Command::Remove {
                name: layer_name(name)?,
            },
            ("load", &[file]) => Command::Load { file },
            ("loadproj", &[dir]) => Command::LoadProject { dir },
            ("save", &[file]) => Command::Save { file },
            ("saveall", &[dir, extension]) => Command::SaveAll { dir, extension },
            ("apply", &[filter, ref rest @ ..]) => {
                let filter: FilterKind = filter.parse().map_err(|_| ParseError::InvalidFormat)?;
                let seeds = match (filter.needs_seed_count(), rest) {
                    (true, &[n]) => Some(number(n)?),
                    (false, &[]) => None,
                    _ => return Err(ParseError::InvalidFormat),
                };
                Command::Apply { filter, seeds }
            }
            ("workon", &[name]) => Command::WorkOn {
                name: layer_name(name)?,
            },
            ("visibility", &["on"]) => Command::Visibility(true),
            ("visibility", &["off"]) => Command::Visibility(false),
            (
                "create" | "copy" | "remove" | "load" | "loadproj" | "save" | "saveall" | "apply"
                | "workon" | "visibility",
                _,
            ) => return Err(ParseError::InvalidFormat),
            (other, _) => return Err(ParseError::UnknownKeyword(other.to_string())),
        };
        Ok(Some(command))
    }
}

/// Result of feeding one line to a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Blank or comment line.
    Skipped,
    /// Command ran.
    Done,
    /// Command was rejected or failed; a message was printed.
    Failed,
}

/// Counts from [`Session::run_script`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptReport {
    /// Commands that ran.
    pub executed: usize,
    /// Commands that failed.
    pub failed: usize,
}

/// Interpreter state: the working image and its focus.
#[derive(Debug)]
pub struct Session {
    image: FocusableLayeredImage,
    mosaic_seed: i64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Starts with an empty image.
    pub fn new() -> Self {
        Self::with_image(FocusableLayeredImage::default())
    }

    /// Starts from an existing image.
    pub fn with_image(image: FocusableLayeredImage) -> Self {
        Self {
            image,
            mosaic_seed: filters::DEFAULT_MOSAIC_SEED,
        }
    }

    /// Sets the random seed `apply mosaic` uses.
    pub fn with_mosaic_seed(mut self, seed: i64) -> Self {
        self.mosaic_seed = seed;
        self
    }

    /// The working image.
    pub fn image(&self) -> &FocusableLayeredImage {
        &self.image
    }

    /// Parses and runs one line, printing its message to `out`.
    pub fn run_line<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<Outcome> {
        let command = match Command::parse(line) {
            Ok(None) => return Ok(Outcome::Skipped),
            Ok(Some(command)) => command,
            Err(e) => {
                warn!(line = line.trim(), error = ?e, "rejected command");
                writeln!(out, "{e}")?;
                return Ok(Outcome::Failed);
            }
        };
        match self.execute(&command) {
            Ok(message) => {
                debug!(?command, "executed");
                writeln!(out, "{message}")?;
                Ok(Outcome::Done)
            }
            Err(e) => {
                warn!(?command, error = %format!("{e:#}"), "command failed");
                writeln!(out, "Error: {e:#}")?;
                Ok(Outcome::Failed)
            }
        }
    }

    /// Runs every line of `input`.
    pub fn run_script<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> io::Result<ScriptReport> {
        let mut report = ScriptReport::default();
        for line in input.lines() {
            match self.run_line(&line?, out)? {
                Outcome::Skipped => {}
                Outcome::Done => report.executed += 1,
                Outcome::Failed => {
                    report.executed += 1;
                    report.failed += 1;
                }
            }
        }
        Ok(report)
    }

    /// Runs a parsed command and returns its confirmation message.
    pub fn execute(&mut self, command: &Command<'_>) -> Result<String> {
        match *command {
            Command::Create { name, index } => {
                let (width, height) = self.image.dimensions().unwrap_or(DEFAULT_LAYER_SIZE);
                let content = Image::new(width, height)?;
                self.image
                    .create_layer(name, index, content)
                    .context("Invalid layer creation")?;
                Ok(format!("Created layer {name} at position {}", index + 1))
            }
            Command::Copy {
                source,
                dest,
                index,
            } => {
                self.image
                    .copy_layer(source, dest, index)
                    .context("Could not copy this layer")?;
                Ok(format!("Copied {source} to {dest} at {index}"))
            }
            Command::Remove { name } => {
                if self.image.is_empty() {
                    bail!("There are no layers to remove");
                }
                self.image
                    .remove_layer(name)
                    .context("Invalid layer removal")?;
                Ok(format!("Layer {name} removed."))
            }
            Command::Load { file } => {
                let loaded = ImageFile::new(file)?
                    .extract_image()
                    .with_context(|| format!("Failed to load image \"{file}\""))?;
                self.image.replace_focus(loaded)?;
                Ok(format!("Loading image \"{file}\""))
            }
            Command::LoadProject { dir } => self.load_project(dir),
            Command::Save { file } => {
                let layer = self
                    .image
                    .top_visible_layer()
                    .or_else(|| self.image.focus_layer())
                    .ok_or_else(|| anyhow!("No layer to save"))?;
                ImageFile::new(file)?
                    .save_image(layer.image())
                    .with_context(|| format!("Failed to save image with name {file}"))?;
                Ok(format!("Saving layer \"{}\"", layer.name()))
            }
            Command::SaveAll { dir, extension } => {
                let target = ProjectDirectory::new(dir).with_extension(extension);
                if let Some(name) = target.project_name() {
                    self.image.set_name(name)?;
                }
                target
                    .save_layered(&self.image)
                    .context("Failed to save multi-layered image")?;
                Ok(format!("Saving multi-layered image {dir}"))
            }
            Command::Apply { filter, seeds } => {
                let op = filter.build(seeds, self.mosaic_seed)?;
                self.image
                    .apply_to_focus(&op)
                    .context("Could not modify this layer")?;
                Ok(format!("Applied {filter}."))
            }
            Command::WorkOn { name } => {
                self.image
                    .set_focus_layer(name)
                    .with_context(|| format!("Invalid layer name {name}"))?;
                Ok(format!("Setting focus layer {name}"))
            }
            Command::Visibility(visible) => {
                self.image
                    .set_focus_visible(visible)
                    .context("Could not set visibility")?;
                Ok(format!("Set visibility to {}", if visible { "on" } else { "off" }))
            }
        }
    }

    /// Appends a saved project's layers in its stack order, then focuses the
    /// first layer and adopts the project's name. Nothing changes on failure.
    fn load_project(&mut self, dir: &str) -> Result<String> {
        let loaded = ProjectDirectory::new(dir)
            .extract_layered()
            .with_context(|| format!("Failed to extract image from {dir}"))?;

        let mut merged = self.image.clone();
        for (index, layer) in loaded.layers().enumerate() {
            merged
                .create_layer(layer.name(), index, layer.image().clone())
                .context("Failed to load multi-layered image into the current project")?;
        }
        merged.set_focus_layer(0)?;
        merged.set_name(loaded.name())?;
        self.image = merged;
        Ok(format!(
            "Loaded multi-layered image {} ({} layers, {}x{})",
            loaded.name(),
            loaded.num_layers(),
            loaded.width(),
            loaded.height()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::Pixel;

    fn run(session: &mut Session, script: &str) -> (ScriptReport, String) {
        let mut out = Vec::new();
        let report = session.run_script(script.as_bytes(), &mut out).unwrap();
        (report, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            Command::parse("create base 0"),
            Ok(Some(Command::Create { name: "base", index: 0 }))
        );
        assert_eq!(
            Command::parse("  apply mosaic 40  "),
            Ok(Some(Command::Apply {
                filter: FilterKind::Mosaic,
                seeds: Some(40)
            }))
        );
        assert_eq!(Command::parse("# note"), Ok(None));
        assert_eq!(Command::parse("   "), Ok(None));
        assert_eq!(Command::parse("visibility off"), Ok(Some(Command::Visibility(false))));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Command::parse("explode now"),
            Err(ParseError::UnknownKeyword("explode".into()))
        );
        for line in [
            "create base",
            "create base -1",
            "create base x",
            "apply mosaic",
            "apply blur 3",
            "apply emboss",
            "visibility maybe",
            "saveall dir",
            "copy a b",
        ] {
            assert_eq!(Command::parse(line), Err(ParseError::InvalidFormat), "{line}");
        }
        assert_eq!(
            Command::parse("create sepia 0"),
            Err(ParseError::ReservedName("sepia".into()))
        );
        assert!(matches!(
            Command::parse("workon mosaic"),
            Err(ParseError::ReservedName(_))
        ));
    }

    #[test]
    fn test_create_sizes() {
        let mut session = Session::new();
        let (report, out) = run(&mut session, "create a 0\ncreate b 1\n");
        assert_eq!(report, ScriptReport { executed: 2, failed: 0 });
        assert_eq!(out, "Created layer a at position 1\nCreated layer b at position 2\n");
        assert_eq!(session.image().dimensions(), Some(DEFAULT_LAYER_SIZE));
        assert_eq!(session.image().layer("b").unwrap().image().pixels()[0], Pixel::WHITE);
    }

    #[test]
    fn test_errors_do_not_stop_script() {
        let mut session = Session::new();
        let script = "remove ghost\ncreate a 0\ncreate a 0\nbogus\nworkon nobody\ncreate b 0\n";
        let (report, out) = run(&mut session, script);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(report.failed, 4);
        assert_eq!(report.executed, 6);
        assert!(lines[0].starts_with("Error: There are no layers"));
        assert!(lines[2].starts_with("Error: Invalid layer creation"));
        assert_eq!(lines[3], "Invalid command keyword");
        assert!(lines[4].starts_with("Error: Invalid layer name nobody"));
        assert_eq!(session.image().layer_names(), vec!["b", "a"]);
    }

    #[test]
    fn test_focus_commands() {
        let mut session = Session::new();
        let (report, out) = run(
            &mut session,
            "create top 0\ncreate bottom 1\nworkon bottom\napply grayscale\nvisibility off\n",
        );
        assert_eq!(report.failed, 0, "{out}");
        assert!(out.contains("Setting focus layer bottom"));
        assert!(out.contains("Applied grayscale."));
        assert!(out.ends_with("Set visibility to off\n"));
        assert!(!session.image().layer("bottom").unwrap().is_visible());
        assert!(session.image().layer("top").unwrap().is_visible());
    }

    #[test]
    fn test_focus_required() {
        let mut session = Session::new();
        let (report, out) = run(&mut session, "apply sepia\nvisibility on\nsave out.ppm\n");
        assert_eq!(report.failed, 3);
        assert!(out.lines().all(|l| l.starts_with("Error: ")), "{out}");
    }

    #[test]
    fn test_copy_and_remove_messages() {
        let mut session = Session::new();
        let (_, out) = run(&mut session, "create a 0\ncopy a b 1\nremove a\n");
        assert_eq!(
            out,
            "Created layer a at position 1\nCopied a to b at 1\nLayer a removed.\n"
        );
        assert_eq!(session.image().focus_index(), 0);
        assert_eq!(session.image().focus_layer().unwrap().name(), "b");
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("layer.ppm");
        let mut session = Session::new();
        let script = format!(
            "create a 0\napply mosaic 5\nsave {f}\ncreate b 1\nworkon b\nload {f}\n",
            f = file.display()
        );
        let (report, out) = run(&mut session, &script);
        assert_eq!(report.failed, 0, "{out}");
        let image = session.image();
        assert_eq!(image.layer("a").unwrap().image(), image.layer("b").unwrap().image());
    }

    #[test]
    fn test_save_prefers_top_visible() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("out.ppm");
        let mut session = Session::new();
        let script = format!(
            "create hidden 0\nvisibility off\ncreate shown 1\nworkon hidden\nsave {}\n",
            file.display()
        );
        let (_, out) = run(&mut session, &script);
        assert!(out.ends_with("Saving layer \"shown\"\n"), "{out}");
    }

    #[test]
    fn test_project_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("poster");
        let mut first = Session::new();
        let script = format!(
            "create a 0\ncreate b 0\nworkon b\napply sepia\nsaveall {} ppm\n",
            project.display()
        );
        let (report, out) = run(&mut first, &script);
        assert_eq!(report.failed, 0, "{out}");
        assert_eq!(first.image().name(), "poster");

        let mut second = Session::new();
        let (report, out) = run(&mut second, &format!("loadproj {}\n", project.display()));
        assert_eq!(report.failed, 0, "{out}");
        assert_eq!(second.image().name(), "poster");
        assert_eq!(second.image().layer_names(), vec!["b", "a"]);
        assert_eq!(second.image().focus_index(), 0);
        assert_eq!(
            second.image().layer("b").unwrap().image(),
            first.image().layer("b").unwrap().image()
        );
    }

    #[test]
    fn test_failed_loadproj_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let project = dir.path().join("p");
        let mut saver = Session::new();
        run(&mut saver, &format!("create a 0\nsaveall {} ppm\n", project.display()));

        let mut session = Session::new();
        let (report, _) = run(
            &mut session,
            &format!("create a 0\nloadproj {}\n", project.display()),
        );
        assert_eq!(report.failed, 1);
        assert_eq!(session.image().num_layers(), 1);
        assert_eq!(session.image().name(), strata_core::DEFAULT_IMAGE_NAME);
    }
}
