use clap::{Args, Parser, Subcommand};
use footprints_core::models::{DatasetVariant, GeometryType};
use std::path::PathBuf;

/// footprints-stac - STAC metadata for building-footprint datasets
#[derive(Parser, Debug)]
#[command(name = "footprints-stac")]
#[command(about = "STAC metadata and GeoParquet stamping for building-footprint datasets", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (defaults to ./footprints.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Dataset variant (ms-buildings, ms-buildings-delta, bing-buildings)
    #[arg(long, global = true, value_name = "VARIANT")]
    pub dataset: Option<DatasetVariant>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the STAC Collection for the dataset
    CreateCollection(CreateCollectionArgs),

    /// Create a STAC Item for one dataset partition
    CreateItem(CreateItemArgs),

    /// Add GeoParquet metadata to every Parquet file under a directory
    AddGeoMetadata(AddGeoMetadataArgs),

    /// Show the fields parsed from a partition path
    ParsePath(ParsePathArgs),

    /// Show the effective configuration and where each value came from
    Config,
}

#[derive(Args, Debug)]
pub struct CreateCollectionArgs {
    /// Where to write the Collection JSON
    pub destination: PathBuf,

    /// Replace the default collection description
    #[arg(long)]
    pub description: Option<String>,

    /// JSON object of extra top-level fields, merged over the defaults
    #[arg(long, value_name = "JSON")]
    pub extra: Option<String>,
}

#[derive(Args, Debug)]
pub struct CreateItemArgs {
    /// Local Parquet file or partition directory to inspect
    pub source: PathBuf,

    /// Where to write the Item JSON
    pub destination: PathBuf,

    /// Storage path recorded in the data asset and parsed for partition
    /// fields (defaults to SOURCE)
    #[arg(long, value_name = "HREF")]
    pub asset_href: Option<String>,

    /// Region statistics JSON file (defaults to the bundled table)
    #[arg(long, value_name = "FILE")]
    pub stats: Option<PathBuf>,

    /// Simplify the item geometry to its convex hull
    #[arg(long, overrides_with = "no_convex_hull")]
    pub convex_hull: bool,

    /// Keep the item geometry as resolved
    #[arg(long)]
    pub no_convex_hull: bool,

    /// Storage account recorded in `table:storage_options`
    #[arg(long, value_name = "ACCOUNT")]
    pub storage_account: Option<String>,
}

impl CreateItemArgs {
    /// Convex-hull choice from the flags; `None` when neither was given
    pub fn convex_hull_flag(&self) -> Option<bool> {
        match (self.convex_hull, self.no_convex_hull) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Args, Debug)]
pub struct AddGeoMetadataArgs {
    /// Directory whose Parquet files are stamped in place
    pub prefix: PathBuf,

    /// Geometry type to declare (repeatable; none means any)
    #[arg(long = "geometry-type", value_name = "TYPE")]
    pub geometry_types: Vec<GeometryType>,

    /// Column holding WKB geometries
    #[arg(long, value_name = "COLUMN")]
    pub geometry_column: Option<String>,

    /// Skip JSON Schema validation of the metadata block
    #[arg(long)]
    pub no_validate: bool,

    /// JSON Schema to validate against
    #[arg(long, value_name = "URL")]
    pub schema_url: Option<String>,
}

#[derive(Args, Debug)]
pub struct ParsePathArgs {
    /// Partition path, e.g. footprints/delta/2023-04-25/ml-buildings.parquet/RegionName=Abyei/quadkey=122321003/
    pub path: String,
}
