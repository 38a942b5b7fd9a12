//! Command implementations

mod add_geo_metadata;
mod config;
mod create_collection;
mod create_item;
mod parse_path;

use crate::cli::{Cli, Commands};
use crate::config_loader::load_config;
use crate::output::OutputWriter;
use anyhow::{Context, Result};
use footprints_core::config::CliConfigOverrides;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Execute a CLI command
pub fn execute(cli: Cli) -> Result<()> {
    let output = OutputWriter::new(cli.json);

    let mut overrides = CliConfigOverrides { dataset: cli.dataset, ..Default::default() };
    match &cli.command {
        Commands::CreateItem(args) => {
            overrides.stats_path = args.stats.clone();
            overrides.convex_hull = args.convex_hull_flag();
            overrides.storage_account = args.storage_account.clone();
        }
        Commands::AddGeoMetadata(args) => {
            overrides.geometry_column = args.geometry_column.clone();
            overrides.schema_url = args.schema_url.clone();
            if args.no_validate {
                overrides.validate_schema = Some(false);
            }
        }
        _ => {}
    }
    let config = load_config(cli.config.as_deref(), overrides)?;

    match cli.command {
        Commands::CreateCollection(args) => create_collection::execute(args, &config, &output),
        Commands::CreateItem(args) => create_item::execute(args, &config, &output),
        Commands::AddGeoMetadata(args) => add_geo_metadata::execute(args, &config, &output),
        Commands::ParsePath(args) => parse_path::execute(args, &config, &output),
        Commands::Config => config::execute(&config, &output),
    }
}

/// Write `value` as pretty JSON, creating parent directories as needed
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
