use chromavive::cli::{Cli, Commands};
use chromavive::output::Printer;
use clap::Parser;
use miette::Result;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let printer = Printer::new();

    match cli.command {
        Commands::Apply(args) => chromavive::cli::apply::run(args, &printer)?,
        Commands::Watch(args) => chromavive::cli::watch::run(args, &printer)?,
        Commands::Init(args) => chromavive::cli::init::run(args, &printer)?,
        Commands::Completions(args) => chromavive::cli::completions::run(args, &printer)?,
    }

    Ok(())
}
