//! Init command implementation.
//!
//! Writes a `chromavive.yaml` holding the default duotone settings.

use std::fs;
use std::path::PathBuf;

use clap::Args;

use crate::config::CONFIG_FILENAME;
use crate::error::{ChromaError, Result};
use crate::output::{display_path, Printer};
use crate::render::{Duotone, RENDER_LIMIT};

/// Create a chromavive.yaml with the default settings
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Directory to write the config into (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing chromavive.yaml
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs, printer: &Printer) -> Result<()> {
    let config_path = args.path.join(CONFIG_FILENAME);

    if config_path.exists() && !args.force {
        return Err(ChromaError::Parse {
            message: format!("{} already exists", CONFIG_FILENAME),
            help: Some("Use --force to overwrite".to_string()),
        });
    }

    fs::write(&config_path, default_config_yaml()).map_err(|e| ChromaError::Io {
        path: config_path.clone(),
        message: format!("Failed to write config: {}", e),
    })?;

    printer.status("Created", &display_path(&config_path));
    Ok(())
}

/// Default config contents. Built by hand for clean formatting.
pub fn default_config_yaml() -> String {
    let defaults = Duotone::default();

    let mut yaml = String::new();
    yaml.push_str("# chromavive settings; command-line flags take precedence.\n");
    yaml.push_str(&format!("highlight: \"{}\"\n", defaults.highlight));
    yaml.push_str(&format!("shadow: \"{}\"\n", defaults.shadow));
    yaml.push_str(&format!("intensity: {}\n", defaults.intensity));
    yaml.push_str(&format!("limit: {}\n", RENDER_LIMIT));
    yaml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_yaml() {
        insta::assert_snapshot!(default_config_yaml(), @r###"
        # chromavive settings; command-line flags take precedence.
        highlight: "#FF69B4"
        shadow: "#016E3C"
        intensity: 100%
        limit: 2000
        "###);
    }

    #[test]
    fn test_default_config_round_trips() {
        let config = Config::parse(&default_config_yaml()).unwrap();
        assert_eq!(config.duotone(), Duotone::default());
        assert_eq!(config.effective_limit().unwrap(), RENDER_LIMIT);
    }

    #[test]
    fn test_init_writes_config() {
        let dir = tempdir().unwrap();
        let args = InitArgs {
            path: dir.path().to_path_buf(),
            force: false,
        };

        run(args, &Printer::plain()).unwrap();

        let written = fs::read_to_string(dir.path().join(CONFIG_FILENAME)).unwrap();
        assert_eq!(written, default_config_yaml());
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "limit: 10\n").unwrap();

        let args = InitArgs {
            path: dir.path().to_path_buf(),
            force: false,
        };
        assert!(run(args, &Printer::plain()).is_err());

        let args = InitArgs {
            path: dir.path().to_path_buf(),
            force: true,
        };
        run(args, &Printer::plain()).unwrap();
        let written = fs::read_to_string(dir.path().join(CONFIG_FILENAME)).unwrap();
        assert_eq!(written, default_config_yaml());
    }
}
