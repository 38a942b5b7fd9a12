//! Create-item command implementation

use crate::cli::CreateItemArgs;
use crate::commands::write_json;
use crate::config_loader::load_stats;
use crate::output::OutputWriter;
use crate::output_types::ItemOutput;
use crate::progress::{create_spinner, finish};
use anyhow::{Context, Result};
use footprints_core::config::{ConfigSource, LayeredConfig};
use footprints_geoparquet::ParquetInspector;
use footprints_stac::ItemAssembler;

pub fn execute(args: CreateItemArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let stats = load_stats(config)?;
    let schema = config.dataset.value.schema();

    let mut assembler = ItemAssembler::new(schema, &stats, ParquetInspector::new())
        .with_convex_hull(config.effective_convex_hull())
        .with_storage_account(config.storage_account.value.clone());
    // The dataset names its own geometry column unless one was configured
    if config.geometry_column.source != ConfigSource::Default {
        assembler = assembler.with_geometry_column(config.geometry_column.value.clone());
    }

    let source = args.source.to_string_lossy().into_owned();
    let asset_href = args.asset_href.clone().unwrap_or_else(|| source.clone());

    let spinner = create_spinner(&format!("Inspecting {}", source), output.is_json());
    let result = assembler.create_item_from(&source, &asset_href);
    finish(&spinner);
    let item = result.with_context(|| format!("Failed to create item for {}", asset_href))?;

    write_json(&args.destination, &item)?;

    if output.is_json() {
        output.result(ItemOutput {
            id: item.id,
            dataset: assembler.schema().variant.to_string(),
            destination: args.destination.display().to_string(),
            asset_href,
            bbox: item.bbox,
            geometry_hook: assembler.hook_name().to_string(),
        })?;
    } else {
        output.success(format!("Wrote item '{}'", item.id));
        output.kv("Dataset", assembler.schema().variant);
        output.kv("Asset", &asset_href);
        match item.bbox {
            Some(bbox) => output.kv("Bbox", format!("{:?}", bbox.to_array())),
            None => output.warning("No geometry could be resolved; item has no bbox"),
        }
        output.kv("Geometry hook", assembler.hook_name());
        output.kv("Destination", args.destination.display());
    }

    Ok(())
}
