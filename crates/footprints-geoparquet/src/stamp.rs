//! Adding GeoParquet metadata to tables and to every file under a prefix.

use footprints_core::config::{DEFAULT_GEOMETRY_COLUMN, DEFAULT_GEOPARQUET_VERSION, DEFAULT_SCHEMA_URL};
use footprints_core::models::GeometryType;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::Result;
use crate::metadata::{GeoMetadata, GEO_METADATA_KEY};
use crate::schema::{validate, SchemaSource};
use crate::table::GeoTable;

/// Settings for building the `geo` block
#[derive(Debug, Clone, PartialEq)]
pub struct StampOptions {
    pub geometry_column: String,
    pub geometry_types: Vec<GeometryType>,
    pub version: String,
    /// Validate against the JSON Schema at this URL; `None` skips validation
    pub schema_url: Option<String>,
}

impl Default for StampOptions {
    fn default() -> Self {
        Self {
            geometry_column: DEFAULT_GEOMETRY_COLUMN.to_string(),
            geometry_types: Vec::new(),
            version: DEFAULT_GEOPARQUET_VERSION.to_string(),
            schema_url: Some(DEFAULT_SCHEMA_URL.to_string()),
        }
    }
}

/// Return a copy of `table` carrying a `geo` metadata entry.
///
/// A table that already has one is returned unchanged. Existing schema
/// metadata keys are kept.
pub fn add_geo_metadata<S: SchemaSource>(
    table: &GeoTable,
    options: &StampOptions,
    schemas: &S,
) -> Result<GeoTable> {
    if table.is_stamped() {
        tracing::debug!("Table already has '{}' metadata, leaving it unchanged", GEO_METADATA_KEY);
        return Ok(table.clone());
    }

    let bbox = table.total_bounds(&options.geometry_column)?;
    if bbox.is_none() {
        tracing::warn!("Column '{}' has no geometries; bbox omitted", options.geometry_column);
    }
    let geo = GeoMetadata::single_column(
        options.version.clone(),
        options.geometry_column.clone(),
        options.geometry_types.clone(),
        bbox,
    );

    if let Some(url) = &options.schema_url {
        let schema = schemas.fetch(url)?;
        validate(&schema, &serde_json::to_value(&geo)?)?;
    }

    let mut metadata = table.metadata().clone();
    metadata.insert(GEO_METADATA_KEY.to_string(), geo.to_json()?);
    table.with_schema_metadata(metadata)
}

/// Outcome of a batch run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    /// Files rewritten with new metadata
    pub stamped: Vec<PathBuf>,
    /// Files that already had metadata and were not rewritten
    pub skipped: Vec<PathBuf>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.stamped.len() + self.skipped.len()
    }
}

/// Every `.parquet` file under `prefix`, in file-name order.
///
/// Directories named `*.parquet` (hive-style datasets) are descended into,
/// not returned.
pub fn find_parquet_files<P: AsRef<Path>>(prefix: P) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(prefix.as_ref()).sort_by_file_name() {
        let entry = entry?;
        let is_parquet = entry.path().extension().is_some_and(|ext| ext == "parquet");
        if entry.file_type().is_file() && is_parquet {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Stamp every Parquet file under `prefix` in place, one at a time.
///
/// The first failure aborts the run; files already processed stay rewritten.
pub fn update_many<P, S>(prefix: P, options: &StampOptions, schemas: &S) -> Result<BatchReport>
where
    P: AsRef<Path>,
    S: SchemaSource,
{
    let prefix = prefix.as_ref();
    let files = find_parquet_files(prefix)?;
    tracing::info!("Found {} Parquet files under {}", files.len(), prefix.display());

    let mut report = BatchReport::default();
    for path in files {
        let table = GeoTable::read_parquet(&path)?;
        if table.is_stamped() {
            tracing::debug!("Skipping {}, already stamped", path.display());
            report.skipped.push(path);
            continue;
        }

        add_geo_metadata(&table, options, schemas)?.write_parquet(&path)?;
        tracing::info!("Stamped {}", path.display());
        report.stamped.push(path);
    }

    Ok(report)
}
