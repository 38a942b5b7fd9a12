//! Item assembly.
//!
//! Partition fields, the region statistics entry and the inspected table
//! profile are merged into one [`Item`] in a single pass. Which source wins for
//! each field is decided by the dataset schema up front.

use footprints_core::config::DEFAULT_STORAGE_ACCOUNT;
use footprints_core::error::Result;
use footprints_core::models::dataset::PARQUET_MEDIA_TYPE;
use footprints_core::models::stac::{STAC_VERSION, TABLE_EXTENSION};
use footprints_core::models::{
    Asset, DatasetSchema, Fields, Geometry, Item, ItemIdStrategy, ItemProperties, PartitionPath,
    RegionStats, StatsTable, TableColumn, Temporal,
};
use footprints_core::ports::{InspectRequest, TableInspector};
use footprints_geo::{quadkey_to_tile, tile_bounds, ConvexHull, GeometryHook, Identity};
use serde_json::json;
use std::collections::BTreeMap;

/// Key of the single data asset on every item
pub const DATA_ASSET_KEY: &str = "data";

/// Where an item's geometry comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpatialSource {
    /// Box around the building centroids recorded in the statistics table
    CentroidBounds,
    /// Web Mercator tile addressed by the partition quadkey
    QuadkeyTile,
    /// Computed from the geometries stored in the table, falling back to the
    /// quadkey tile when the table has none
    Inferred,
}

/// Builds STAC Items for one dataset variant
pub struct ItemAssembler<'a, I>
where
    I: TableInspector,
{
    schema: DatasetSchema,
    stats: &'a StatsTable,
    inspector: I,
    hook: Box<dyn GeometryHook>,
    storage_account: String,
    geometry_column: String,
}

impl<'a, I> ItemAssembler<'a, I>
where
    I: TableInspector,
{
    /// Create an assembler with the schema's defaults
    pub fn new(schema: DatasetSchema, stats: &'a StatsTable, inspector: I) -> Self {
        let hook: Box<dyn GeometryHook> =
            if schema.convex_hull { Box::new(ConvexHull) } else { Box::new(Identity) };
        let geometry_column = schema.geometry_column.to_string();

        Self {
            schema,
            stats,
            inspector,
            hook,
            storage_account: DEFAULT_STORAGE_ACCOUNT.to_string(),
            geometry_column,
        }
    }

    /// Replace the geometry post-processing hook
    pub fn with_hook(mut self, hook: Box<dyn GeometryHook>) -> Self {
        self.hook = hook;
        self
    }

    /// Toggle the convex-hull hook
    pub fn with_convex_hull(self, enabled: bool) -> Self {
        if enabled {
            self.with_hook(Box::new(ConvexHull))
        } else {
            self.with_hook(Box::new(Identity))
        }
    }

    pub fn with_storage_account(mut self, account: impl Into<String>) -> Self {
        self.storage_account = account.into();
        self
    }

    pub fn with_geometry_column(mut self, column: impl Into<String>) -> Self {
        self.geometry_column = column.into();
        self
    }

    pub fn schema(&self) -> &DatasetSchema {
        &self.schema
    }

    pub fn hook_name(&self) -> &'static str {
        self.hook.name()
    }

    /// Create an item for a table read from the same location its asset points at
    pub fn create_item(&self, asset_href: &str) -> Result<Item> {
        self.create_item_from(asset_href, asset_href)
    }

    /// Create an item by inspecting `source` while recording `asset_href`.
    ///
    /// Partition fields are always parsed from `asset_href`. Inspection
    /// failures are returned as-is; no partial item is produced.
    pub fn create_item_from(&self, source: &str, asset_href: &str) -> Result<Item> {
        let parts = PartitionPath::parse(asset_href, &self.schema.layout)?;
        let stats = self.region_stats(&parts);
        let spatial = self.spatial_source(&parts, stats);

        tracing::debug!(
            "Assembling {} item for region {} (stats: {}, spatial: {:?})",
            self.schema.variant,
            parts.region,
            stats.is_some(),
            spatial
        );

        let request = InspectRequest::new(&self.geometry_column)
            .infer_geometry(spatial == SpatialSource::Inferred)
            .count_rows(stats.is_none());
        let profile = self.inspector.inspect(source, &request)?;

        let geometry = match spatial {
            SpatialSource::CentroidBounds => {
                stats.and_then(RegionStats::centroid_bounds).map(|b| b.to_polygon())
            }
            SpatialSource::QuadkeyTile => tile_geometry(&parts)?,
            SpatialSource::Inferred => match profile.geometry {
                Some(geometry) => Some(geometry),
                None => tile_geometry(&parts)?,
            },
        };
        let (geometry, bbox) = match geometry.map(|g| self.hook.apply(g)) {
            Some(g) => match g.bbox() {
                Some(bbox) => (Some(g), Some(bbox)),
                None => (None, None),
            },
            None => (None, None),
        };
        if geometry.is_none() {
            tracing::warn!("No geometry could be determined for {}", asset_href);
        }

        let columns: Vec<TableColumn> = profile
            .columns
            .into_iter()
            .map(|column| {
                if column.name == self.geometry_column {
                    column.with_description(self.schema.geometry_description)
                } else {
                    column
                }
            })
            .collect();
        let row_count = stats.map(|s| s.count).or(profile.row_count);

        let temporal = match stats {
            Some(s) => Temporal::Range {
                start: s.min_capture_date.clone(),
                end: s.max_capture_date.clone(),
            },
            None => Temporal::Instant(parts.processing_date),
        };

        let mut fields = Fields::new();
        fields.insert(self.schema.property("region"), json!(parts.region));
        if let Some(quadkey) = &parts.quadkey {
            fields.insert(self.schema.property("quadkey"), json!(quadkey.value()));
        }
        if self.schema.processing_date_property {
            fields.insert(self.schema.property("processing-date"), json!(parts.date_string()));
        }
        fields.insert("table:columns".to_string(), serde_json::to_value(&columns)?);
        fields.insert("table:primary_geometry".to_string(), json!(self.geometry_column));
        if let Some(count) = row_count {
            fields.insert("table:row_count".to_string(), json!(count));
        }

        let item = Item {
            object_type: "Feature",
            stac_version: STAC_VERSION,
            stac_extensions: vec![TABLE_EXTENSION.to_string()],
            id: self.item_id(&parts),
            geometry,
            bbox,
            properties: ItemProperties {
                temporal,
                title: self.schema.item_title.to_string(),
                description: self.schema.item_description.to_string(),
                fields,
            },
            links: Vec::new(),
            assets: BTreeMap::from([(DATA_ASSET_KEY.to_string(), self.data_asset(asset_href))]),
            collection: None,
        };

        tracing::info!("Created item {}", item.id);
        Ok(item)
    }

    /// Decide the geometry source for a parsed path.
    ///
    /// Without a statistics entry the table contents decide. With one, centroid
    /// bounds win when the variant uses them and the entry carries them, then
    /// the quadkey tile, then table inference.
    pub fn spatial_source(
        &self,
        parts: &PartitionPath,
        stats: Option<&RegionStats>,
    ) -> SpatialSource {
        match stats {
            None => SpatialSource::Inferred,
            Some(s) if self.schema.centroid_bounds && s.centroid_bounds().is_some() => {
                SpatialSource::CentroidBounds
            }
            Some(_) if parts.quadkey.is_some() => SpatialSource::QuadkeyTile,
            Some(_) => SpatialSource::Inferred,
        }
    }

    fn region_stats(&self, parts: &PartitionPath) -> Option<&'a RegionStats> {
        if !self.schema.use_stats {
            return None;
        }
        let stats = self.stats.get(&parts.region);
        if stats.is_none() {
            tracing::debug!("No statistics for region {}", parts.region);
        }
        stats
    }

    fn item_id(&self, parts: &PartitionPath) -> String {
        match (self.schema.id_strategy, &parts.quadkey) {
            (ItemIdStrategy::Region, _) => parts.region.clone(),
            (ItemIdStrategy::RegionQuadkeyDate, Some(quadkey)) => {
                format!("{}_{}_{}", parts.region, quadkey, parts.date_string())
            }
            (ItemIdStrategy::RegionDate, _) | (ItemIdStrategy::RegionQuadkeyDate, None) => {
                format!("{}_{}", parts.region, parts.date_string())
            }
        }
    }

    fn data_asset(&self, href: &str) -> Asset {
        let mut asset = Asset::new(href);
        asset.media_type = Some(PARQUET_MEDIA_TYPE.to_string());
        asset.title = Some(self.schema.asset_title.to_string());
        asset.description = Some(self.schema.asset_description.to_string());
        asset.roles = vec!["data".to_string()];
        asset.extra_fields.insert(
            "table:storage_options".to_string(),
            json!({ "account_name": self.storage_account }),
        );
        asset
    }
}

/// Box polygon of the partition's quadkey tile, if the path has a quadkey
fn tile_geometry(parts: &PartitionPath) -> Result<Option<Geometry>> {
    match &parts.quadkey {
        Some(quadkey) => Ok(Some(tile_bounds(&quadkey_to_tile(quadkey)?).to_polygon())),
        None => Ok(None),
    }
}
