use console::style;
use footprints_core::FootprintsError;
use footprints_geoparquet::GeoParquetError;
use std::fmt;

/// Enhanced error type with suggestions
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Error for a partition path that does not match the dataset layout
pub fn malformed_path(detail: &str) -> CliError {
    CliError::new("Partition path does not match the dataset layout")
        .with_context(format!("Error: {}", detail))
        .with_suggestion("Check that --dataset matches the path layout")
        .with_suggestion("Region paths end in RegionName=<region>/, delta paths in RegionName=<region>/quadkey=<int>/")
        .with_help("Run: footprints-stac parse-path --help")
}

/// Error for a missing region statistics file
pub fn stats_not_found(detail: &str) -> CliError {
    CliError::new("Region statistics file not found")
        .with_context(format!("Error: {}", detail))
        .with_suggestion("Check the --stats path or FOOTPRINTS_STATS_PATH")
        .with_suggestion("Or omit it to use the bundled statistics")
        .with_help("Run: footprints-stac config")
}

/// Error for a failed JSON Schema download
pub fn schema_unavailable(detail: &str) -> CliError {
    CliError::new("GeoParquet JSON Schema could not be fetched")
        .with_context(format!("Error: {}", detail))
        .with_suggestion("Check network access to the schema URL")
        .with_suggestion("Or pass --schema-url with a reachable copy")
        .with_suggestion("Or skip validation with --no-validate")
        .with_help("Run: footprints-stac add-geo-metadata --help")
}

/// Error for invalid configuration
pub fn invalid_config(key: &str, reason: &str) -> CliError {
    CliError::new(format!("Invalid configuration: {}", key))
        .with_context(format!("Configuration value is invalid.\n\nReason: {}", reason))
        .with_suggestion("Check footprints.toml for syntax errors")
        .with_suggestion("Check FOOTPRINTS_* environment variables")
        .with_help("Run: footprints-stac config")
}

/// Convert anyhow::Error to CliError, using the typed cause when there is one
pub fn from_anyhow(error: anyhow::Error) -> CliError {
    let message = format!("{:#}", error);

    for cause in error.chain() {
        if let Some(core) = cause.downcast_ref::<FootprintsError>() {
            return match core {
                FootprintsError::PathTooShort { .. }
                | FootprintsError::PathSegment { .. }
                | FootprintsError::InvalidDate { .. }
                | FootprintsError::InvalidQuadkey { .. } => malformed_path(&message),
                FootprintsError::StatsNotFound { .. } => stats_not_found(&message),
                FootprintsError::ConfigInvalid { key, reason } => invalid_config(key, reason),
                _ => CliError::new(message),
            };
        }
        if let Some(GeoParquetError::SchemaFetch { .. }) = cause.downcast_ref::<GeoParquetError>() {
            return schema_unavailable(&message);
        }
    }

    if message.contains("No such file or directory") {
        CliError::new("File not found")
            .with_context(format!("Error: {}", message))
            .with_suggestion("Check the file path and try again")
    } else {
        CliError::new(message)
    }
}
