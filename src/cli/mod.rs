pub mod apply;
pub mod completions;
pub mod init;
pub mod watch;

use clap::{Parser, Subcommand};

/// chromavive - Duotone image recolouring
#[derive(Parser, Debug)]
#[command(name = "chromavive")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Recolour an image with a duotone gradient
    Apply(apply::ApplyArgs),

    /// Re-render an image whenever it or its config changes
    Watch(watch::WatchArgs),

    /// Create a chromavive.yaml with the default settings
    Init(init::InitArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}
