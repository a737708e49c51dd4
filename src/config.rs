//! Project configuration (chromavive.yaml) parsing.
//!
//! The config file supplies default duotone parameters so they do not have
//! to be repeated on every invocation. Command-line flags take precedence
//! over the file, and the file over built-in defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ChromaError, Result};
use crate::render::{Duotone, RENDER_LIMIT};
use crate::types::{Colour, Intensity};

/// Name of the config file looked up next to the input image.
pub const CONFIG_FILENAME: &str = "chromavive.yaml";

/// Duotone settings loaded from chromavive.yaml or the command line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Colour bright pixels trend towards.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight: Option<Colour>,

    /// Colour dark pixels trend towards.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Colour>,

    /// Blend factor, `0.4` or `"40%"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intensity: Option<Intensity>,

    /// Maximum longer side in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// Output file or directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl Config {
    /// Load config from a chromavive.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ChromaError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse config from YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| ChromaError::Parse {
            message: format!("Invalid config: {}", e),
            help: Some(format!("Check {} syntax", CONFIG_FILENAME)),
        })
    }

    /// Find the config file that applies to `input`: the one in its
    /// directory, if any.
    pub fn find_for(input: &Path) -> Option<PathBuf> {
        let dir = match input.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let candidate = dir.join(CONFIG_FILENAME);
        candidate.is_file().then_some(candidate)
    }

    /// Layer `overrides` on top of `self`; set fields in `overrides` win.
    pub fn merge(self, overrides: Config) -> Config {
        Config {
            highlight: overrides.highlight.or(self.highlight),
            shadow: overrides.shadow.or(self.shadow),
            intensity: overrides.intensity.or(self.intensity),
            limit: overrides.limit.or(self.limit),
            output: overrides.output.or(self.output),
        }
    }

    /// The duotone described by this config, with defaults filled in.
    pub fn duotone(&self) -> Duotone {
        let defaults = Duotone::default();
        Duotone::new(
            self.highlight.unwrap_or(defaults.highlight),
            self.shadow.unwrap_or(defaults.shadow),
            self.intensity.unwrap_or(defaults.intensity),
        )
    }

    /// Get the effective render limit.
    pub fn effective_limit(&self) -> Result<u32> {
        match self.limit {
            Some(0) => Err(ChromaError::InvalidDimension {
                width: 0,
                height: 0,
            }),
            Some(limit) => Ok(limit),
            None => Ok(RENDER_LIMIT),
        }
    }
}
