//! Error types for GeoParquet handling

use footprints_core::FootprintsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoParquetError {
    #[error(transparent)]
    Core(#[from] FootprintsError),

    // Storage errors
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot list {path}: {reason}")]
    Listing { path: PathBuf, reason: String },

    #[error("No Parquet files found under {path}")]
    NoParquetFiles { path: PathBuf },

    // Geometry column errors
    #[error("Geometry column '{column}' not found")]
    MissingColumn { column: String },

    #[error("Geometry column '{column}' has unsupported type {data_type}; expected WKB binary")]
    UnsupportedColumnType { column: String, data_type: String },

    #[error("Invalid WKB in column '{column}' at row {row}: {reason}")]
    InvalidWkb { column: String, row: usize, reason: String },

    // Metadata and schema errors
    #[error("Invalid geo metadata: {0}")]
    Metadata(String),

    #[error("Failed to fetch JSON Schema from {url}: {reason}")]
    SchemaFetch { url: String, reason: String },

    #[error("Invalid JSON Schema document: {0}")]
    InvalidSchema(String),

    #[error("GeoParquet metadata failed validation: {}", .errors.join("; "))]
    Validation { errors: Vec<String> },
}

impl From<serde_json::Error> for GeoParquetError {
    fn from(err: serde_json::Error) -> Self {
        GeoParquetError::Metadata(err.to_string())
    }
}

impl From<walkdir::Error> for GeoParquetError {
    fn from(err: walkdir::Error) -> Self {
        GeoParquetError::Listing {
            path: err.path().map(|p| p.to_path_buf()).unwrap_or_default(),
            reason: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, GeoParquetError>;
