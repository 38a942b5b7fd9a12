//! Add-geo-metadata command implementation

use crate::cli::AddGeoMetadataArgs;
use crate::output::OutputWriter;
use crate::output_types::StampOutput;
use crate::progress::{create_spinner, finish};
use anyhow::{bail, Context, Result};
use footprints_core::config::LayeredConfig;
use footprints_geoparquet::{update_many, HttpSchemaSource, StampOptions};
use std::path::Path;

pub fn execute(args: AddGeoMetadataArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    if !args.prefix.exists() {
        bail!("Prefix not found: {}", args.prefix.display());
    }

    let options = StampOptions {
        geometry_column: config.geometry_column.value.clone(),
        geometry_types: args.geometry_types,
        version: config.geoparquet_version.value.clone(),
        schema_url: config.validate_schema.value.then(|| config.schema_url.value.clone()),
    };
    if options.schema_url.is_none() {
        output.warning("Schema validation disabled");
    }

    let spinner =
        create_spinner(&format!("Stamping Parquet files under {}", args.prefix.display()), output.is_json());
    let result = update_many(&args.prefix, &options, &HttpSchemaSource::new());
    finish(&spinner);
    let report = result
        .with_context(|| format!("Failed to add GeoParquet metadata under {}", args.prefix.display()))?;

    if output.is_json() {
        output.result(StampOutput {
            prefix: args.prefix.display().to_string(),
            stamped: display_all(&report.stamped),
            skipped: display_all(&report.skipped),
            validated: options.schema_url.is_some(),
        })?;
    } else if report.total() == 0 {
        output.warning(format!("No Parquet files found under {}", args.prefix.display()));
    } else {
        output.success(format!(
            "Stamped {} of {} Parquet files",
            report.stamped.len(),
            report.total()
        ));
        if !report.skipped.is_empty() {
            output.info(format!("{} already had GeoParquet metadata", report.skipped.len()));
        }
    }

    Ok(())
}

fn display_all<P: AsRef<Path>>(paths: &[P]) -> Vec<String> {
    paths.iter().map(|p| p.as_ref().display().to_string()).collect()
}
