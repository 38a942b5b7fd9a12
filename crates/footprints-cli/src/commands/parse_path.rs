//! Parse-path command implementation

use crate::cli::ParsePathArgs;
use crate::output::OutputWriter;
use crate::output_types::ParsePathOutput;
use anyhow::Result;
use footprints_core::config::LayeredConfig;
use footprints_core::models::PartitionPath;
use footprints_geo::{quadkey_to_tile, tile_bounds};

pub fn execute(args: ParsePathArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let schema = config.dataset.value.schema();
    let parts = PartitionPath::parse(&args.path, &schema.layout)?;

    let tile = parts.quadkey.as_ref().map(quadkey_to_tile).transpose()?;
    let tile_bbox = tile.as_ref().map(tile_bounds);

    if output.is_json() {
        output.result(ParsePathOutput {
            dataset: schema.variant.to_string(),
            region: parts.region.clone(),
            processing_date: parts.processing_date.to_rfc3339(),
            quadkey: parts.quadkey.as_ref().map(|q| q.value()),
            tile_bbox,
        })?;
    } else {
        output.section(format!("Partition ({})", schema.variant));
        output.kv("Region", &parts.region);
        output.kv("Processing date", parts.date_string());
        if let (Some(quadkey), Some(tile)) = (&parts.quadkey, tile) {
            output.kv("Quadkey", quadkey);
            output.kv("Tile", format!("z{} x{} y{}", tile.z, tile.x, tile.y));
        }
        if let Some(bbox) = tile_bbox {
            output.kv("Tile bbox", format!("{:?}", bbox.to_array()));
        }
    }

    Ok(())
}
