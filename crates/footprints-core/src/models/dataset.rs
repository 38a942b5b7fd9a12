//! Dataset descriptors.
//!
//! Each footprint dataset family differs only in its partition layout, item id
//! convention, property namespace and a handful of display strings. A single
//! [`DatasetSchema`] value captures those differences so one item pipeline
//! serves every variant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FootprintsError;

/// Media type of the Parquet data assets
pub const PARQUET_MEDIA_TYPE: &str = "application/x-parquet";

/// License shared by every footprint dataset
pub const LICENSE: &str = "ODbL-1.0";

pub const LICENSE_URL: &str =
    "https://github.com/microsoft/GlobalMLBuildingFootprints/blob/main/LICENSE";

/// Known dataset families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DatasetVariant {
    /// Region-partitioned footprints with a statistics lookup
    MsBuildings,
    /// Region + quadkey partitioned delta footprints
    #[default]
    MsBuildingsDelta,
    /// Region-partitioned footprints without statistics
    BingBuildings,
}

impl DatasetVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetVariant::MsBuildings => "ms-buildings",
            DatasetVariant::MsBuildingsDelta => "ms-buildings-delta",
            DatasetVariant::BingBuildings => "bing-buildings",
        }
    }

    pub fn schema(&self) -> DatasetSchema {
        match self {
            DatasetVariant::MsBuildings => DatasetSchema::ms_buildings(),
            DatasetVariant::MsBuildingsDelta => DatasetSchema::ms_buildings_delta(),
            DatasetVariant::BingBuildings => DatasetSchema::bing_buildings(),
        }
    }
}

impl fmt::Display for DatasetVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetVariant {
    type Err = FootprintsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "ms-buildings" | "msbuildings" => Ok(DatasetVariant::MsBuildings),
            "ms-buildings-delta" | "delta" => Ok(DatasetVariant::MsBuildingsDelta),
            "bing-buildings" | "bingbuildings" => Ok(DatasetVariant::BingBuildings),
            _ => Err(FootprintsError::UnknownDataset { name: s.to_string() }),
        }
    }
}

/// Positions of the partition tokens, counted from the end of the path (1 = last segment)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathLayout {
    pub region_offset: usize,
    pub date_offset: usize,
    pub quadkey_offset: Option<usize>,
}

impl PathLayout {
    /// `.../<date>/<name>.parquet/RegionName=<region>/`
    pub const REGION: PathLayout =
        PathLayout { region_offset: 1, date_offset: 3, quadkey_offset: None };

    /// `.../<date>/<name>.parquet/RegionName=<region>/quadkey=<int>/`
    pub const REGION_QUADKEY: PathLayout =
        PathLayout { region_offset: 2, date_offset: 4, quadkey_offset: Some(1) };

    /// Number of segments a path needs for every token to exist
    pub fn min_segments(&self) -> usize {
        self.region_offset.max(self.date_offset).max(self.quadkey_offset.unwrap_or(0))
    }
}

/// How item ids are built from partition fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemIdStrategy {
    /// `<region>`
    Region,
    /// `<region>_<date>`
    RegionDate,
    /// `<region>_<quadkey>_<date>`
    RegionQuadkeyDate,
}

/// Everything that distinguishes one footprint dataset family from another
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSchema {
    pub variant: DatasetVariant,
    pub collection_id: &'static str,
    pub collection_title: &'static str,
    pub collection_description: &'static str,
    /// Prefix of the custom item properties, e.g. `msbuildings`
    pub namespace: &'static str,
    pub layout: PathLayout,
    pub id_strategy: ItemIdStrategy,
    /// Look regions up in the statistics table
    pub use_stats: bool,
    /// Derive geometry from centroid bounds when the statistics entry carries them
    pub centroid_bounds: bool,
    /// Default for the convex-hull post-processing hook
    pub convex_hull: bool,
    /// Emit `<namespace>:processing-date`
    pub processing_date_property: bool,
    pub item_title: &'static str,
    pub item_description: &'static str,
    pub asset_title: &'static str,
    pub asset_description: &'static str,
    pub geometry_column: &'static str,
    pub geometry_description: &'static str,
    pub provider_url: &'static str,
    pub keywords: &'static [&'static str],
    pub thumbnail: Option<&'static str>,
}

impl DatasetSchema {
    pub fn ms_buildings() -> Self {
        Self {
            variant: DatasetVariant::MsBuildings,
            collection_id: "ms-buildings",
            collection_title: "Microsoft Building Footprints",
            collection_description: "Machine-learning detected building footprints. The underlying \
                imagery is from Bing Maps and includes imagery from Maxar and Airbus.",
            namespace: "msbuildings",
            layout: PathLayout::REGION,
            id_strategy: ItemIdStrategy::RegionDate,
            use_stats: true,
            centroid_bounds: true,
            convex_hull: false,
            processing_date_property: true,
            item_title: "Building footprints",
            item_description: "Parquet dataset with the building footprints",
            asset_title: "Building Footprints",
            asset_description: "Parquet dataset with the building footprints for this region.",
            geometry_column: "geometry",
            geometry_description: "Building footprint polygons",
            provider_url: "https://planetarycomputer.microsoft.com",
            keywords: &["Bing Maps", "Buildings", "geoparquet", "Microsoft", "Footprint"],
            thumbnail: Some(
                "https://ai4edatasetspublicassets.blob.core.windows.net/assets/pc_thumbnails/msbuildings-thumbnail.png",
            ),
        }
    }

    pub fn ms_buildings_delta() -> Self {
        Self {
            variant: DatasetVariant::MsBuildingsDelta,
            layout: PathLayout::REGION_QUADKEY,
            id_strategy: ItemIdStrategy::RegionQuadkeyDate,
            centroid_bounds: false,
            ..Self::ms_buildings()
        }
    }

    pub fn bing_buildings() -> Self {
        Self {
            variant: DatasetVariant::BingBuildings,
            collection_id: "bing-buildings",
            collection_title: "Bing Building Footprints",
            collection_description: "Machine-learning detected building footprints. The underlying \
                imagery is from Bing Maps including Maxar and Airbus imagery.",
            namespace: "bingbuildings",
            layout: PathLayout::REGION,
            id_strategy: ItemIdStrategy::Region,
            use_stats: false,
            centroid_bounds: false,
            convex_hull: true,
            processing_date_property: false,
            item_title: "Building footprints",
            item_description: "Parquet dataset with the building footprints",
            asset_title: "Parquet dataset with the building footprints.",
            asset_description: "Parquet dataset with the building footprints for this region.",
            geometry_column: "geometry",
            geometry_description: "Building footprint polygons",
            provider_url: "https://github.com/stac-utils/stactools",
            keywords: &[],
            thumbnail: None,
        }
    }

    /// Namespaced property key, e.g. `msbuildings:region`
    pub fn property(&self, name: &str) -> String {
        format!("{}:{}", self.namespace, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_parse() {
        assert_eq!("ms-buildings".parse::<DatasetVariant>().unwrap(), DatasetVariant::MsBuildings);
        assert_eq!(
            "MS_BUILDINGS_DELTA".parse::<DatasetVariant>().unwrap(),
            DatasetVariant::MsBuildingsDelta
        );
        assert_eq!("bingbuildings".parse::<DatasetVariant>().unwrap(), DatasetVariant::BingBuildings);
        assert!("osm-buildings".parse::<DatasetVariant>().is_err());
    }

    #[test]
    fn test_variant_schema_roundtrip() {
        for variant in [
            DatasetVariant::MsBuildings,
            DatasetVariant::MsBuildingsDelta,
            DatasetVariant::BingBuildings,
        ] {
            assert_eq!(variant.schema().variant, variant);
            assert_eq!(variant.as_str().parse::<DatasetVariant>().unwrap(), variant);
        }
    }

    #[test]
    fn test_layout_min_segments() {
        assert_eq!(PathLayout::REGION.min_segments(), 3);
        assert_eq!(PathLayout::REGION_QUADKEY.min_segments(), 4);
    }

    #[test]
    fn test_delta_shares_display_strings() {
        let base = DatasetSchema::ms_buildings();
        let delta = DatasetSchema::ms_buildings_delta();
        assert_eq!(base.asset_title, delta.asset_title);
        assert_eq!(base.namespace, delta.namespace);
        assert_ne!(base.layout, delta.layout);
    }

    #[test]
    fn test_property_key() {
        assert_eq!(DatasetSchema::bing_buildings().property("region"), "bingbuildings:region");
    }
}
