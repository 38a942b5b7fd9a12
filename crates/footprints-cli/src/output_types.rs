use footprints_core::models::Bbox;
use serde::Serialize;

/// Output for create-collection command
#[derive(Debug, Serialize)]
pub struct CollectionOutput {
    pub id: String,
    pub dataset: String,
    pub destination: String,
}

/// Output for create-item command
#[derive(Debug, Serialize)]
pub struct ItemOutput {
    pub id: String,
    pub dataset: String,
    pub destination: String,
    pub asset_href: String,
    pub bbox: Option<Bbox>,
    pub geometry_hook: String,
}

/// Output for add-geo-metadata command
#[derive(Debug, Serialize)]
pub struct StampOutput {
    pub prefix: String,
    pub stamped: Vec<String>,
    pub skipped: Vec<String>,
    pub validated: bool,
}

/// Output for parse-path command
#[derive(Debug, Serialize)]
pub struct ParsePathOutput {
    pub dataset: String,
    pub region: String,
    pub processing_date: String,
    pub quadkey: Option<u64>,
    pub tile_bbox: Option<Bbox>,
}

/// One configuration entry for the config command
#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub value: String,
    pub source: String,
}
