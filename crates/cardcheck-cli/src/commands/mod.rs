//! Subcommand implementations.

pub mod config;
pub mod inspect;
pub mod scan;

use std::path::{Path, PathBuf};

use anyhow::Context;
use cardcheck_core::{CardcheckConfig, ManufacturerVocabulary};
use tracing::warn;

/// Location of the engine config when `--config` is not given.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("cardcheck")
        .join("config.json")
}

/// Load and validate the engine config.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<CardcheckConfig> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    CardcheckConfig::from_file(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

/// Load the manufacturer vocabulary.
pub fn load_vocabulary(path: &Path) -> anyhow::Result<ManufacturerVocabulary> {
    let vocabulary = ManufacturerVocabulary::from_path(path)?;
    if vocabulary.is_empty() {
        warn!("No manufacturer terms found in {}", path.display());
    }
    Ok(vocabulary)
}
