use std::{fs, path::{Path, PathBuf}};
use serde::{Serialize, Deserialize};
use anyhow::{self, Context};

use ledger_store::StoreOptions;

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub dir: PathBuf
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig { dir: PathBuf::from("ledger-data") }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub storage: StorageConfig,
    pub ledger: StoreOptions
}

impl CliConfig {
    /// Reads the config file, falling back to defaults when it does not exist.
    pub fn read(filepath: impl AsRef<Path>) -> anyhow::Result<Self> {
        let filepath = filepath.as_ref();
        if !filepath.exists() {
            return Ok(CliConfig::default());
        }
        let file_content = fs::read_to_string(filepath)
            .with_context(|| format!("failed to read config file {}", filepath.display()))?;
        let config = CliConfig::parse(&file_content)
            .with_context(|| format!("failed to parse config file {}", filepath.display()))?;
        return Ok(config);
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: CliConfig = toml::from_str(content)?;
        anyhow::ensure!(config.ledger.tolerance >= 0.0,
            "ledger.tolerance must not be negative, got {}", config.ledger.tolerance);
        return Ok(config);
    }
}
