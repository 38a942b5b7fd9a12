//! STAC record types.
//!
//! Only the parts of the STAC 1.0 object model the footprint records use are
//! modelled. Unknown or dataset-specific fields live in flattened maps.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

use super::geometry::{Bbox, Geometry};

pub const STAC_VERSION: &str = "1.0.0";
pub const TABLE_EXTENSION: &str = "https://stac-extensions.github.io/table/v1.2.0/schema.json";
pub const ITEM_ASSETS_EXTENSION: &str =
    "https://stac-extensions.github.io/item-assets/v1.0.0/schema.json";

/// Free-form JSON fields keyed by name
pub type Fields = BTreeMap<String, serde_json::Value>;

/// Temporal coverage of an item: a single instant or a start/end range, never both
#[derive(Debug, Clone, PartialEq)]
pub enum Temporal {
    Instant(DateTime<Utc>),
    Range { start: String, end: String },
}

impl Temporal {
    pub fn datetime(&self) -> Option<&DateTime<Utc>> {
        match self {
            Temporal::Instant(dt) => Some(dt),
            Temporal::Range { .. } => None,
        }
    }
}

impl Serialize for Temporal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Temporal::Instant(dt) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("datetime", &format_datetime(dt))?;
                map.end()
            }
            Temporal::Range { start, end } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("datetime", &None::<String>)?;
                map.serialize_entry("start_datetime", start)?;
                map.serialize_entry("end_datetime", end)?;
                map.end()
            }
        }
    }
}

/// RFC 3339 with a `Z` suffix, as STAC tooling writes it
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Column declared by the table extension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableColumn {
    pub name: String,

    #[serde(rename = "type")]
    pub column_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TableColumn {
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self { name: name.into(), column_type: column_type.into(), description: None }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub href: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,

    #[serde(flatten)]
    pub extra_fields: Fields,
}

impl Asset {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            media_type: None,
            title: None,
            description: None,
            roles: Vec::new(),
            extra_fields: Fields::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub rel: String,
    pub href: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub name: String,
    pub roles: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialExtent {
    pub bbox: Vec<Bbox>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalExtent {
    pub interval: Vec<[Option<String>; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub spatial: SpatialExtent,
    pub temporal: TemporalExtent,
}

/// Item properties; the temporal fields are flattened in from [`Temporal`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemProperties {
    #[serde(flatten)]
    pub temporal: Temporal,

    pub title: String,
    pub description: String,

    #[serde(flatten)]
    pub fields: Fields,
}

/// STAC Item (a GeoJSON Feature)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    #[serde(rename = "type")]
    pub object_type: &'static str,
    pub stac_version: &'static str,
    pub stac_extensions: Vec<String>,
    pub id: String,
    pub geometry: Option<Geometry>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Bbox>,

    pub properties: ItemProperties,
    pub links: Vec<Link>,
    pub assets: BTreeMap<String, Asset>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
}

/// STAC Collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    #[serde(rename = "type")]
    pub object_type: String,
    pub stac_version: String,

    #[serde(default)]
    pub stac_extensions: Vec<String>,

    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub description: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    pub license: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub providers: Vec<Provider>,

    pub extent: Extent,

    #[serde(default)]
    pub links: Vec<Link>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub assets: BTreeMap<String, Asset>,

    #[serde(flatten)]
    pub extra_fields: Fields,
}
