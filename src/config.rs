//! Persisted defaults for the mtree CLI
//!
//! Stored in ~/.config/mtree/config.json. A missing file means defaults.

use crate::hasher::HashAlgorithm;
use crate::tree::{BuildStrategy, OrderingPolicy, TreeBuilder};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Output format for CLI results
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

/// Build and output defaults
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub hash: HashAlgorithm,
    pub order: OrderingPolicy,
    pub strategy: BuildStrategy,
    pub format: OutputFormat,
}

impl Config {
    /// Default location (~/.config/mtree/config.json)
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Could not find config directory".into()))?;
        Ok(config_dir.join("mtree").join("config.json"))
    }

    /// Load from `path`, falling back to defaults when it does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;

        serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Write to `path`, creating parent directories as needed
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Config(format!("Failed to create config dir: {}", e)))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write {}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Tree builder configured from these defaults
    pub fn builder(&self) -> TreeBuilder {
        TreeBuilder::new()
            .ordering(self.order)
            .strategy(self.strategy)
    }
}
