//! Apply command implementation.
//!
//! Decodes an image, scales it to the render limit, recolours it and
//! writes a PNG.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use log::debug;

use crate::config::Config;
use crate::error::{ChromaError, Result};
use crate::output::{dimensions, display_path, Printer};
use crate::render::{
    default_export_name, load_bitmap, resize_to_limit, write_png, Duotone, RenderKey, RenderSlot,
    Ticket,
};
use crate::types::{Colour, Intensity};

/// Recolour an image with a duotone gradient
#[derive(Args, Debug, Clone)]
pub struct ApplyArgs {
    /// Image to recolour
    #[arg(required = true)]
    pub input: PathBuf,

    #[command(flatten)]
    pub params: ParamArgs,
}

/// Duotone parameters shared by `apply` and `watch`.
#[derive(Args, Debug, Clone, Default)]
pub struct ParamArgs {
    /// Output PNG file or directory [default: timestamped name next to the input]
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Highlight colour: #RRGGBB, a CSS colour name, or r,g,b [default: #FF69B4]
    #[arg(long)]
    pub highlight: Option<Colour>,

    /// Shadow colour: #RRGGBB, a CSS colour name, or r,g,b [default: #016E3C]
    #[arg(long)]
    pub shadow: Option<Colour>,

    /// Blend intensity, 0-1 or a percentage such as 40% [default: 100%]
    #[arg(long, short)]
    pub intensity: Option<Intensity>,

    /// Maximum length of the longer side in pixels [default: 2000]
    #[arg(long)]
    pub limit: Option<u32>,

    /// Config file [default: chromavive.yaml next to the input]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Ignore chromavive.yaml
    #[arg(long, conflicts_with = "config")]
    pub no_config: bool,
}

impl ParamArgs {
    /// The config file that applies to `input`, if any.
    pub fn config_path(&self, input: &Path) -> Option<PathBuf> {
        if self.no_config {
            None
        } else {
            self.config.clone().or_else(|| Config::find_for(input))
        }
    }

    /// Settings from the config file with command-line flags layered on top.
    pub fn resolve(&self, input: &Path) -> Result<Config> {
        let file = match self.config_path(input) {
            Some(path) => Config::load(&path)?,
            None => Config::default(),
        };

        Ok(file.merge(Config {
            highlight: self.highlight,
            shadow: self.shadow,
            intensity: self.intensity,
            limit: self.limit,
            output: self.output.clone(),
        }))
    }
}

/// Result of executing a [`Job`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A new output file was written.
    Written,
    /// The live output already matches these parameters.
    Unchanged,
    /// A newer render started before this one finished.
    Superseded,
}

/// One render: where to read, where to write, and how to recolour.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
    pub duotone: Duotone,
    pub limit: u32,
}

impl Job {
    /// Build a job for `input` from resolved settings.
    pub fn from_config(input: &Path, config: &Config) -> Result<Self> {
        Ok(Self {
            input: input.to_path_buf(),
            output: output_path(input, config.output.as_deref()),
            duotone: config.duotone(),
            limit: config.effective_limit()?,
        })
    }

    /// Render the job and write it through `slot`.
    pub fn execute(&self, slot: &RenderSlot, ticket: Ticket, printer: &Printer) -> Result<Outcome> {
        let source = load_bitmap(&self.input)?;
        let (width, height) = source.dimensions();
        let key = RenderKey::new(&source, self.limit, &self.duotone);

        if slot.cached(&key).is_some() {
            debug!("parameters unchanged for {}", self.input.display());
            return Ok(Outcome::Unchanged);
        }

        let scaled = resize_to_limit(source, self.limit)?;
        if scaled.dimensions() != (width, height) {
            printer.info(
                "Scaling",
                &format!(
                    "{} -> {} (limit {})",
                    dimensions(width, height),
                    dimensions(scaled.width(), scaled.height()),
                    self.limit
                ),
            );
        }
        if !slot.is_current(ticket) {
            return Ok(Outcome::Superseded);
        }

        printer.status(
            "Rendering",
            &format!(
                "{} ({}) shadow {} highlight {} at {}",
                display_path(&self.input),
                dimensions(scaled.width(), scaled.height()),
                printer.swatch(self.duotone.shadow),
                printer.swatch(self.duotone.highlight),
                self.duotone.intensity
            ),
        );
        let rendered = self.duotone.apply(&scaled);

        let written = slot.publish_with(ticket, key, rendered, |bitmap| {
            ensure_parent(&self.output)?;
            write_png(bitmap, &self.output)
        })?;

        Ok(if written {
            Outcome::Written
        } else {
            Outcome::Superseded
        })
    }
}

/// Where the output PNG goes.
///
/// An explicit file path is used as-is. A directory (existing, or written
/// with a trailing separator) receives a timestamped export name, as does
/// the input's own directory when no output is given.
pub fn output_path(input: &Path, output: Option<&Path>) -> PathBuf {
    match output {
        Some(out) if out.is_dir() || ends_with_separator(out) => out.join(default_export_name()),
        Some(out) => out.to_path_buf(),
        None => input
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(default_export_name()),
    }
}

fn ends_with_separator(path: &Path) -> bool {
    path.as_os_str()
        .to_string_lossy()
        .ends_with(std::path::is_separator)
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
            fs::create_dir_all(dir).map_err(|e| ChromaError::Io {
                path: dir.to_path_buf(),
                message: format!("Failed to create output directory: {}", e),
            })
        }
        _ => Ok(()),
    }
}

pub fn run(args: ApplyArgs, printer: &Printer) -> Result<()> {
    if let Some(path) = args.params.config_path(&args.input) {
        printer.info("Config", &printer.dim(&display_path(&path)));
    }
    let config = args.params.resolve(&args.input)?;
    let job = Job::from_config(&args.input, &config)?;

    let slot = RenderSlot::new();
    job.execute(&slot, slot.begin(), printer)?;

    printer.status("Finished", &display_path(&job.output));
    println!("{}", job.output.display());

    Ok(())
}
