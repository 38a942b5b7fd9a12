use crate::error::{FootprintsError, Result};
use crate::models::DatasetVariant;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// GeoParquet metadata version written by the stamping utility
pub const DEFAULT_GEOPARQUET_VERSION: &str = "1.0.0-beta.1";

/// JSON Schema the `geo` metadata block is validated against
pub const DEFAULT_SCHEMA_URL: &str =
    "https://raw.githubusercontent.com/opengeospatial/geoparquet/v1.0.0-beta.1/format-specs/schema.json";

pub const DEFAULT_STORAGE_ACCOUNT: &str = "bingmlbuildings";

pub const DEFAULT_GEOMETRY_COLUMN: &str = "geometry";

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for footprints-stac
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub dataset: ConfigValue<DatasetVariant>,
    /// Statistics file; `None` selects the bundled table
    pub stats_path: ConfigValue<Option<PathBuf>>,
    pub storage_account: ConfigValue<String>,
    /// Convex-hull hook; `None` keeps the dataset's default
    pub convex_hull: ConfigValue<Option<bool>>,
    pub geometry_column: ConfigValue<String>,
    pub geoparquet_version: ConfigValue<String>,
    pub schema_url: ConfigValue<String>,
    pub validate_schema: ConfigValue<bool>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            dataset: ConfigValue::new(DatasetVariant::default(), ConfigSource::Default),
            stats_path: ConfigValue::new(None, ConfigSource::Default),
            storage_account: ConfigValue::new(
                DEFAULT_STORAGE_ACCOUNT.to_string(),
                ConfigSource::Default,
            ),
            convex_hull: ConfigValue::new(None, ConfigSource::Default),
            geometry_column: ConfigValue::new(
                DEFAULT_GEOMETRY_COLUMN.to_string(),
                ConfigSource::Default,
            ),
            geoparquet_version: ConfigValue::new(
                DEFAULT_GEOPARQUET_VERSION.to_string(),
                ConfigSource::Default,
            ),
            schema_url: ConfigValue::new(DEFAULT_SCHEMA_URL.to_string(), ConfigSource::Default),
            validate_schema: ConfigValue::new(true, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| FootprintsError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| FootprintsError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(dataset) = file_config.dataset {
            self.dataset.update(dataset, ConfigSource::File);
        }

        if let Some(stats_path) = file_config.stats_path {
            self.stats_path.update(Some(stats_path), ConfigSource::File);
        }

        if let Some(account) = file_config.storage_account {
            self.storage_account.update(account, ConfigSource::File);
        }

        if let Some(convex_hull) = file_config.convex_hull {
            self.convex_hull.update(Some(convex_hull), ConfigSource::File);
        }

        if let Some(column) = file_config.geometry_column {
            self.geometry_column.update(column, ConfigSource::File);
        }

        if let Some(version) = file_config.geoparquet_version {
            self.geoparquet_version.update(version, ConfigSource::File);
        }

        if let Some(url) = file_config.schema_url {
            self.schema_url.update(url, ConfigSource::File);
        }

        if let Some(validate) = file_config.validate_schema {
            self.validate_schema.update(validate, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // FOOTPRINTS_DATASET
        if let Ok(dataset_str) = env::var("FOOTPRINTS_DATASET") {
            match dataset_str.parse::<DatasetVariant>() {
                Ok(dataset) => self.dataset.update(dataset, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid FOOTPRINTS_DATASET value '{}': expected ms-buildings, ms-buildings-delta, or bing-buildings",
                    dataset_str
                ),
            }
        }

        // FOOTPRINTS_STATS_PATH
        if let Ok(path) = env::var("FOOTPRINTS_STATS_PATH") {
            self.stats_path.update(Some(PathBuf::from(path)), ConfigSource::Environment);
        }

        // FOOTPRINTS_STORAGE_ACCOUNT
        if let Ok(account) = env::var("FOOTPRINTS_STORAGE_ACCOUNT") {
            self.storage_account.update(account, ConfigSource::Environment);
        }

        // FOOTPRINTS_CONVEX_HULL
        if let Ok(hull_str) = env::var("FOOTPRINTS_CONVEX_HULL") {
            match parse_bool("convex_hull", &hull_str) {
                Ok(hull) => self.convex_hull.update(Some(hull), ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid FOOTPRINTS_CONVEX_HULL value '{}': expected true or false",
                    hull_str
                ),
            }
        }

        // FOOTPRINTS_GEOMETRY_COLUMN
        if let Ok(column) = env::var("FOOTPRINTS_GEOMETRY_COLUMN") {
            self.geometry_column.update(column, ConfigSource::Environment);
        }

        // FOOTPRINTS_GEOPARQUET_VERSION
        if let Ok(version) = env::var("FOOTPRINTS_GEOPARQUET_VERSION") {
            self.geoparquet_version.update(version, ConfigSource::Environment);
        }

        // FOOTPRINTS_SCHEMA_URL
        if let Ok(url) = env::var("FOOTPRINTS_SCHEMA_URL") {
            self.schema_url.update(url, ConfigSource::Environment);
        }

        // FOOTPRINTS_VALIDATE_SCHEMA
        if let Ok(validate_str) = env::var("FOOTPRINTS_VALIDATE_SCHEMA") {
            match parse_bool("validate_schema", &validate_str) {
                Ok(validate) => self.validate_schema.update(validate, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid FOOTPRINTS_VALIDATE_SCHEMA value '{}': expected true or false",
                    validate_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(dataset) = overrides.dataset {
            self.dataset.update(dataset, ConfigSource::Cli);
        }

        if let Some(stats_path) = overrides.stats_path {
            self.stats_path.update(Some(stats_path), ConfigSource::Cli);
        }

        if let Some(account) = overrides.storage_account {
            self.storage_account.update(account, ConfigSource::Cli);
        }

        if let Some(convex_hull) = overrides.convex_hull {
            self.convex_hull.update(Some(convex_hull), ConfigSource::Cli);
        }

        if let Some(column) = overrides.geometry_column {
            self.geometry_column.update(column, ConfigSource::Cli);
        }

        if let Some(url) = overrides.schema_url {
            self.schema_url.update(url, ConfigSource::Cli);
        }

        if let Some(validate) = overrides.validate_schema {
            self.validate_schema.update(validate, ConfigSource::Cli);
        }
    }

    /// Convex-hull setting after falling back to the dataset default
    pub fn effective_convex_hull(&self) -> bool {
        self.convex_hull.value.unwrap_or_else(|| self.dataset.value.schema().convex_hull)
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert("dataset".to_string(), (self.dataset.value.to_string(), self.dataset.source));

        map.insert(
            "stats_path".to_string(),
            (
                self.stats_path
                    .value
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(bundled)".to_string()),
                self.stats_path.source,
            ),
        );

        map.insert(
            "storage_account".to_string(),
            (self.storage_account.value.clone(), self.storage_account.source),
        );

        map.insert(
            "convex_hull".to_string(),
            (self.effective_convex_hull().to_string(), self.convex_hull.source),
        );

        map.insert(
            "geometry_column".to_string(),
            (self.geometry_column.value.clone(), self.geometry_column.source),
        );

        map.insert(
            "geoparquet_version".to_string(),
            (self.geoparquet_version.value.clone(), self.geoparquet_version.source),
        );

        map.insert("schema_url".to_string(), (self.schema_url.value.clone(), self.schema_url.source));

        map.insert(
            "validate_schema".to_string(),
            (self.validate_schema.value.to_string(), self.validate_schema.source),
        );

        map
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    dataset: Option<DatasetVariant>,
    stats_path: Option<PathBuf>,
    storage_account: Option<String>,
    convex_hull: Option<bool>,
    geometry_column: Option<String>,
    geoparquet_version: Option<String>,
    schema_url: Option<String>,
    validate_schema: Option<bool>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub dataset: Option<DatasetVariant>,
    pub stats_path: Option<PathBuf>,
    pub storage_account: Option<String>,
    pub convex_hull: Option<bool>,
    pub geometry_column: Option<String>,
    pub schema_url: Option<String>,
    pub validate_schema: Option<bool>,
}

/// Parse a boolean flag from string
pub fn parse_bool(key: &str, s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(FootprintsError::ConfigInvalid {
            key: key.to_string(),
            reason: format!("Invalid boolean: {}. Use true or false", s),
        }),
    }
}
