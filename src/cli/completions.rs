//! Completions command implementation.
//!
//! Prints a completion script for the chosen shell, or installs it into a
//! directory under the shell's conventional file name.

use std::io;
use std::path::{Path, PathBuf};

use clap::{Args, CommandFactory};
use clap_complete::Shell;

use super::Cli;
use crate::error::{ChromaError, Result};
use crate::output::{display_path, Printer};

/// Generate shell completions
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write the script into this directory instead of stdout
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,
}

pub fn run(args: CompletionsArgs, printer: &Printer) -> Result<()> {
    match args.dir {
        Some(dir) => {
            let path = write_completions(args.shell, &dir)?;
            printer.status("Wrote", &display_path(&path));
        }
        None => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            clap_complete::generate(args.shell, &mut cmd, bin_name, &mut io::stdout());
        }
    }
    Ok(())
}

/// Write the completion script for `shell` into `dir`, returning its path.
pub fn write_completions(shell: Shell, dir: &Path) -> Result<PathBuf> {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    clap_complete::generate_to(shell, &mut cmd, bin_name, dir).map_err(|e| ChromaError::Io {
        path: dir.to_path_buf(),
        message: format!("Failed to write completions: {}", e),
    })
}
