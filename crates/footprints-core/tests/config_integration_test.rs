//! Integration tests for layered configuration
//!
//! These tests verify that configuration loading follows the correct precedence:
//! CLI arguments > Environment variables > Config file > Defaults

use footprints_core::config::{CliConfigOverrides, ConfigSource, LayeredConfig};
use footprints_core::models::DatasetVariant;
use serial_test::serial;
use std::env;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn clear_env() {
    for key in [
        "FOOTPRINTS_DATASET",
        "FOOTPRINTS_STATS_PATH",
        "FOOTPRINTS_STORAGE_ACCOUNT",
        "FOOTPRINTS_CONVEX_HULL",
        "FOOTPRINTS_VALIDATE_SCHEMA",
    ] {
        env::remove_var(key);
    }
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    clear_env();
    env::set_var("FOOTPRINTS_DATASET", "bing-buildings");
    env::set_var("FOOTPRINTS_STORAGE_ACCOUNT", "envaccount");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
dataset = "ms-buildings"
storage_account = "fileaccount"
stats_path = "/data/stats.json"
"#
    )
    .unwrap();

    let config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    assert_eq!(config.dataset.value, DatasetVariant::BingBuildings);
    assert_eq!(config.dataset.source, ConfigSource::Environment);
    assert_eq!(config.storage_account.value, "envaccount");
    assert_eq!(config.storage_account.source, ConfigSource::Environment);
    // Not set in the environment, so the file value stands
    assert_eq!(config.stats_path.value, Some(PathBuf::from("/data/stats.json")));
    assert_eq!(config.stats_path.source, ConfigSource::File);

    clear_env();
}

#[test]
#[serial]
fn test_invalid_environment_values_are_ignored() {
    clear_env();
    env::set_var("FOOTPRINTS_DATASET", "osm-buildings");
    env::set_var("FOOTPRINTS_CONVEX_HULL", "sometimes");

    let config = LayeredConfig::with_defaults().load_from_env();

    assert_eq!(config.dataset.value, DatasetVariant::MsBuildingsDelta);
    assert_eq!(config.dataset.source, ConfigSource::Default);
    assert_eq!(config.convex_hull.value, None);

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides_all() {
    clear_env();
    env::set_var("FOOTPRINTS_VALIDATE_SCHEMA", "false");
    env::set_var("FOOTPRINTS_CONVEX_HULL", "true");

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "validate_schema = true").unwrap();

    let mut config = LayeredConfig::with_defaults()
        .load_from_file(file.path())
        .unwrap()
        .load_from_env();

    assert!(!config.validate_schema.value);
    assert_eq!(config.validate_schema.source, ConfigSource::Environment);

    config.update_from_cli(CliConfigOverrides {
        validate_schema: Some(true),
        convex_hull: Some(false),
        ..Default::default()
    });

    assert!(config.validate_schema.value);
    assert_eq!(config.validate_schema.source, ConfigSource::Cli);
    assert!(!config.effective_convex_hull());

    clear_env();
}

#[test]
fn test_missing_file_is_an_error() {
    let result = LayeredConfig::with_defaults().load_from_file("/nonexistent/footprints.toml");
    assert!(result.is_err());
}
