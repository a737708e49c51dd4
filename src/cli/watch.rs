//! Watch command implementation.
//!
//! Re-renders whenever the input image or its config file changes. Each
//! change starts a fresh render in the background; only the newest one is
//! allowed to write the output file.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use log::debug;
use notify::{Event, EventKind, RecursiveMode, Watcher};

use super::apply::{Job, Outcome, ParamArgs};
use crate::config::CONFIG_FILENAME;
use crate::error::{ChromaError, Result};
use crate::output::{display_path, Printer};
use crate::render::RenderSlot;

/// Quiet period used to coalesce bursts of filesystem events.
const DEBOUNCE: Duration = Duration::from_millis(150);

/// Re-render an image whenever it or its config changes
#[derive(Args, Debug, Clone)]
pub struct WatchArgs {
    /// Image to recolour
    #[arg(required = true)]
    pub input: PathBuf,

    #[command(flatten)]
    pub params: ParamArgs,
}

pub fn run(args: WatchArgs, printer: &Printer) -> Result<()> {
    let printer = *printer;
    let first = job_for(&args)?;
    let output = first.output.clone();

    if same_file(&args.input, &output) {
        return Err(ChromaError::Watch {
            message: format!("output {} would overwrite the watched input", output.display()),
        });
    }

    let slot = Arc::new(RenderSlot::new());
    spawn_render(first, &slot, printer);

    let (tx, rx) = mpsc::channel::<notify::Result<Event>>();
    let mut watcher = notify::recommended_watcher(tx).map_err(watch_error)?;

    let targets = watch_targets(&args.input, &args.params);
    for dir in watch_dirs(&targets) {
        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(watch_error)?;
    }
    let names = target_names(&targets);
    printer.info("Watching", &display_path(&args.input));

    while let Ok(event) = rx.recv() {
        let event = match event {
            Ok(event) => event,
            Err(e) => {
                printer.warning("Watch", &e.to_string());
                continue;
            }
        };
        if !is_relevant(&event, &names) {
            continue;
        }

        // Coalesce the rest of the burst into one render.
        while rx.recv_timeout(DEBOUNCE).is_ok() {}

        match job_for(&args) {
            Ok(job) => spawn_render(
                Job {
                    output: output.clone(),
                    ..job
                },
                &slot,
                printer,
            ),
            Err(e) => printer.error("error", &e.to_string()),
        }
    }

    Ok(())
}

fn job_for(args: &WatchArgs) -> Result<Job> {
    let config = args.params.resolve(&args.input)?;
    Job::from_config(&args.input, &config)
}

fn spawn_render(job: Job, slot: &Arc<RenderSlot>, printer: Printer) {
    let slot = Arc::clone(slot);
    let ticket = slot.begin();

    rayon::spawn(move || match job.execute(&slot, ticket, &printer) {
        Ok(Outcome::Written) => printer.status("Updated", &display_path(&job.output)),
        Ok(Outcome::Unchanged) => printer.info("Unchanged", &display_path(&job.output)),
        Ok(Outcome::Superseded) => debug!("render {:?} superseded", ticket),
        Err(e) => printer.error("error", &e.to_string()),
    });
}

/// Files whose changes trigger a re-render.
///
/// The default config is watched even before it exists, so creating it
/// takes effect. With `--no-config` only the input is watched.
fn watch_targets(input: &Path, params: &ParamArgs) -> Vec<PathBuf> {
    let mut targets = vec![input.to_path_buf()];
    if !params.no_config {
        let config = params
            .config
            .clone()
            .unwrap_or_else(|| parent_dir(input).join(CONFIG_FILENAME));
        targets.push(config);
    }
    targets
}

/// Directories to watch. Watching the directory rather than the file
/// survives editors that replace files by renaming.
fn watch_dirs(targets: &[PathBuf]) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = targets.iter().map(|t| parent_dir(t)).collect();
    dirs.sort();
    dirs.dedup();
    dirs
}

fn target_names(targets: &[PathBuf]) -> Vec<OsString> {
    targets
        .iter()
        .filter_map(|t| t.file_name().map(OsString::from))
        .collect()
}

fn is_relevant(event: &Event, names: &[OsString]) -> bool {
    if matches!(event.kind, EventKind::Access(_)) {
        return false;
    }
    event.paths.iter().any(|path| {
        path.file_name()
            .is_some_and(|name| names.iter().any(|n| n == name))
    })
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn watch_error(e: notify::Error) -> ChromaError {
    ChromaError::Watch {
        message: e.to_string(),
    }
}
