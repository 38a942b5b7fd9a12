//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use footprints_core::config::{CliConfigOverrides, LayeredConfig};
use footprints_core::models::StatsTable;
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "footprints.toml";

/// Resolve which config file to read, if any
pub fn config_file(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.is_file().then_some(default)
        }
    }
}

/// Load layered configuration: defaults, file, environment, then CLI overrides
pub fn load_config(explicit: Option<&Path>, overrides: CliConfigOverrides) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = config_file(explicit) {
        config = config
            .load_from_file(&path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?;
        tracing::debug!("Loaded configuration from {}", path.display());
    }

    let mut config = config.load_from_env();
    config.update_from_cli(overrides);
    Ok(config)
}

/// Statistics table named by the configuration, or the bundled one
pub fn load_stats(config: &LayeredConfig) -> Result<StatsTable> {
    match &config.stats_path.value {
        Some(path) => StatsTable::from_path(path)
            .with_context(|| format!("Failed to load region statistics from {}", path.display())),
        None => StatsTable::bundled().context("Bundled region statistics are unreadable"),
    }
}
