//! GeoParquet `geo` metadata model.
//!
//! Only the fields this crate writes are modelled; `crs` is left out, which
//! readers take as OGC:CRS84.

use footprints_core::models::{Bbox, GeometryType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Schema-metadata key holding the GeoParquet block
pub const GEO_METADATA_KEY: &str = "geo";

/// The only geometry encoding in GeoParquet 1.0.0-beta.1
pub const ENCODING_WKB: &str = "WKB";

/// File-level GeoParquet metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoMetadata {
    pub version: String,
    pub primary_column: String,
    pub columns: BTreeMap<String, GeoColumn>,
}

/// Per-column GeoParquet metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoColumn {
    pub encoding: String,

    /// Empty means any geometry type may occur
    pub geometry_types: Vec<GeometryType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Bbox>,
}

impl GeoMetadata {
    /// Metadata for a table with a single WKB geometry column
    pub fn single_column(
        version: impl Into<String>,
        column: impl Into<String>,
        geometry_types: Vec<GeometryType>,
        bbox: Option<Bbox>,
    ) -> Self {
        let column = column.into();
        let entry = GeoColumn { encoding: ENCODING_WKB.to_string(), geometry_types, bbox };

        Self {
            version: version.into(),
            primary_column: column.clone(),
            columns: BTreeMap::from([(column, entry)]),
        }
    }

    pub fn primary(&self) -> Option<&GeoColumn> {
        self.columns.get(&self.primary_column)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(value: &str) -> serde_json::Result<Self> {
        serde_json::from_str(value)
    }
}
