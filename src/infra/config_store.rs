// ============================================================
// Infra — Config Store
// ============================================================
// Reads and writes SplitterConfig as JSON.
//
// Two uses:
//   1. `--config <file>` on the CLI loads a user-written config;
//      fields missing from the file fall back to defaults.
//   2. After a split, the effective config is saved beside the
//      train snapshot as split_config.json, so an `inspect` run
//      (or a person) can see how the splits were produced.

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::data::splitter::SplitterConfig;

pub const CONFIG_FILE_NAME: &str = "split_config.json";

pub struct ConfigStore;

impl ConfigStore {
    /// The split_config.json written next to `config.splits.train`.
    pub fn beside_splits(config: &SplitterConfig) -> PathBuf {
        config
            .splits
            .train
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(CONFIG_FILE_NAME)
    }

    pub fn load(path: &Path) -> Result<SplitterConfig> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Cannot read config from '{}'", path.display()))?;

        let config: SplitterConfig = serde_json::from_str(&json)
            .with_context(|| format!("Invalid config in '{}'", path.display()))?;

        tracing::debug!("Loaded config from '{}'", path.display());
        Ok(config)
    }

    pub fn save(config: &SplitterConfig, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create '{}'", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(config)?;
        fs::write(path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;

        tracing::debug!("Saved config to '{}'", path.display());
        Ok(())
    }
}
