//! Per-region capture statistics.
//!
//! The table is produced offline from the footprints team's region summary and
//! shipped with the crate. It is loaded once, explicitly, and handed to the item
//! assembler; nothing here caches globally.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{FootprintsError, Result};
use crate::models::geometry::Bbox;

/// Statistics file bundled with the crate
const BUNDLED_STATS: &str = include_str!("../../data/region_stats.json");

/// Precomputed statistics for one region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionStats {
    #[serde(rename = "MinCaptureDate")]
    pub min_capture_date: String,

    #[serde(rename = "MaxCaptureDate")]
    pub max_capture_date: String,

    #[serde(rename = "Count")]
    pub count: u64,

    #[serde(rename = "MinCentroidLon", default, skip_serializing_if = "Option::is_none")]
    pub min_centroid_lon: Option<f64>,

    #[serde(rename = "MinCentroidLat", default, skip_serializing_if = "Option::is_none")]
    pub min_centroid_lat: Option<f64>,

    #[serde(rename = "MaxCentroidLon", default, skip_serializing_if = "Option::is_none")]
    pub max_centroid_lon: Option<f64>,

    #[serde(rename = "MaxCentroidLat", default, skip_serializing_if = "Option::is_none")]
    pub max_centroid_lat: Option<f64>,
}

impl RegionStats {
    /// Bounds of the building centroids, when all four values are present
    pub fn centroid_bounds(&self) -> Option<Bbox> {
        Some(Bbox::new(
            self.min_centroid_lon?,
            self.min_centroid_lat?,
            self.max_centroid_lon?,
            self.max_centroid_lat?,
        ))
    }
}

/// Read-only lookup from region name to [`RegionStats`]
#[derive(Debug, Clone, Default)]
pub struct StatsTable {
    regions: BTreeMap<String, RegionStats>,
}

impl StatsTable {
    /// Load the statistics bundled with the crate
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_STATS)
    }

    /// Load statistics from a JSON file on disk
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FootprintsError::StatsNotFound { path: path.to_path_buf() });
        }

        let content = fs::read_to_string(path)?;
        let table = Self::from_json(&content)?;
        tracing::debug!("Loaded {} region statistics from {}", table.len(), path.display());
        Ok(table)
    }

    /// Parse a JSON object keyed by region name
    pub fn from_json(content: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|e| FootprintsError::StatsMalformed {
                reason: format!("invalid JSON: {}", e),
            })?;

        if !value.is_object() {
            return Err(FootprintsError::StatsMalformed {
                reason: "expected a JSON object keyed by region name".to_string(),
            });
        }

        let regions: BTreeMap<String, RegionStats> =
            serde_json::from_value(value).map_err(|e| FootprintsError::StatsMalformed {
                reason: e.to_string(),
            })?;

        Ok(Self { regions })
    }

    /// An empty table; every lookup misses
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, region: &str) -> Option<&RegionStats> {
        self.regions.get(region)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }
}
