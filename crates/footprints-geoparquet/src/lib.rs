//! Footprints GeoParquet - `geo` metadata stamping and Parquet inspection
//!
//! This crate reads Parquet tables into memory, computes the GeoParquet
//! metadata block for a WKB geometry column and writes it back, one file at a
//! time. It also provides the local Parquet adapter for the
//! [`TableInspector`](footprints_core::ports::TableInspector) port.

pub mod error;
pub mod inspector;
pub mod metadata;
pub mod schema;
pub mod stamp;
pub mod table;

#[cfg(test)]
pub(crate) mod test_util;

pub use error::{GeoParquetError, Result};
pub use inspector::ParquetInspector;
pub use metadata::{GeoColumn, GeoMetadata, GEO_METADATA_KEY};
pub use schema::{validate, HttpSchemaSource, SchemaSource, StaticSchemaSource};
pub use stamp::{add_geo_metadata, find_parquet_files, update_many, BatchReport, StampOptions};
pub use table::GeoTable;
