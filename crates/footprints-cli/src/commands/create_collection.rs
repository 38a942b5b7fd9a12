//! Create-collection command implementation

use crate::cli::CreateCollectionArgs;
use crate::commands::write_json;
use crate::output::OutputWriter;
use crate::output_types::CollectionOutput;
use anyhow::{bail, Context, Result};
use footprints_core::config::LayeredConfig;
use footprints_core::models::Fields;
use footprints_stac::{create_collection, CollectionOptions};
use serde_json::Value;

pub fn execute(args: CreateCollectionArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let extra_fields = args.extra.as_deref().map(parse_extra).transpose()?;

    let schema = config.dataset.value.schema();
    let options = CollectionOptions {
        description: args.description,
        extra_fields,
        storage_account: config.storage_account.value.clone(),
    };
    let collection = create_collection(&schema, &options)?;
    write_json(&args.destination, &collection)?;

    if output.is_json() {
        output.result(CollectionOutput {
            id: collection.id,
            dataset: schema.variant.to_string(),
            destination: args.destination.display().to_string(),
        })?;
    } else {
        output.success(format!("Wrote collection '{}'", collection.id));
        output.kv("Dataset", schema.variant);
        output.kv("Destination", args.destination.display());
    }

    Ok(())
}

/// Parse the `--extra` argument, which must be a JSON object
fn parse_extra(raw: &str) -> Result<Fields> {
    let value: Value = serde_json::from_str(raw).context("--extra is not valid JSON")?;
    match value {
        Value::Object(map) => Ok(map.into_iter().collect()),
        other => bail!("--extra must be a JSON object, got {}", other),
    }
}
