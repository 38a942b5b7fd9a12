//! In-memory Parquet tables.

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::SchemaRef;
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use footprints_core::models::Bbox;
use footprints_geo::total_bounds;
use geo::Geometry as GeoGeometry;
use geozero::wkb::Wkb;
use geozero::ToGeo;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::metadata::KeyValue;
use parquet::file::properties::WriterProperties;
use std::collections::HashMap;
use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;

use crate::error::{GeoParquetError, Result};
use crate::metadata::{GeoMetadata, GEO_METADATA_KEY};

/// A whole Parquet file held as Arrow record batches.
///
/// Values are immutable; metadata changes produce a new table.
#[derive(Debug, Clone)]
pub struct GeoTable {
    schema: SchemaRef,
    batches: Vec<RecordBatch>,
}

impl GeoTable {
    /// Build a table, re-homing every batch onto `schema`
    pub fn try_new(schema: SchemaRef, batches: Vec<RecordBatch>) -> Result<Self> {
        let batches = batches
            .iter()
            .map(|batch| RecordBatch::try_new(schema.clone(), batch.columns().to_vec()))
            .collect::<std::result::Result<Vec<_>, ArrowError>>()?;
        Ok(Self { schema, batches })
    }

    /// Read a Parquet file. File key-value metadata ends up in the schema metadata.
    pub fn read_parquet<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(path)?)?;
        let schema = builder.schema().clone();
        let batches = builder.build()?.collect::<std::result::Result<Vec<_>, ArrowError>>()?;

        tracing::debug!("Read {} batches from {}", batches.len(), path.display());
        Self::try_new(schema, batches)
    }

    /// Write the table, replacing any existing file at `path`.
    ///
    /// Output goes to a sibling temporary file first and is renamed over the
    /// target once closed.
    pub fn write_parquet<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut staging = path.as_os_str().to_owned();
        staging.push(".tmp");

        let mut entries: Vec<(&String, &String)> = self.metadata().iter().collect();
        entries.sort();
        let key_values =
            entries.into_iter().map(|(k, v)| KeyValue::new(k.clone(), v.clone())).collect();

        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .set_key_value_metadata(Some(key_values))
            .build();

        let mut writer = ArrowWriter::try_new(File::create(&staging)?, self.schema.clone(), Some(props))?;
        for batch in &self.batches {
            writer.write(batch)?;
        }
        writer.close()?;
        fs::rename(&staging, path)?;

        tracing::debug!("Wrote {} rows to {}", self.num_rows(), path.display());
        Ok(())
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }

    /// Schema-level key-value metadata
    pub fn metadata(&self) -> &HashMap<String, String> {
        self.schema.metadata()
    }

    /// Whether the table already carries a `geo` block
    pub fn is_stamped(&self) -> bool {
        self.metadata().contains_key(GEO_METADATA_KEY)
    }

    /// Parsed `geo` block, if present
    pub fn geo_metadata(&self) -> Result<Option<GeoMetadata>> {
        self.metadata()
            .get(GEO_METADATA_KEY)
            .map(|value| GeoMetadata::from_json(value).map_err(GeoParquetError::from))
            .transpose()
    }

    /// A copy of the table with its schema metadata replaced
    pub fn with_schema_metadata(&self, metadata: HashMap<String, String>) -> Result<Self> {
        let schema = Arc::new(self.schema.as_ref().clone().with_metadata(metadata));
        Self::try_new(schema, self.batches.clone())
    }

    /// Decode every non-null WKB value of `column`
    pub fn geometries(&self, column: &str) -> Result<Vec<GeoGeometry>> {
        self.schema
            .index_of(column)
            .map_err(|_| GeoParquetError::MissingColumn { column: column.to_string() })?;

        let mut geometries = Vec::with_capacity(self.num_rows());
        let mut offset = 0;
        for batch in &self.batches {
            if let Some(array) = batch.column_by_name(column) {
                decode_array(column, array, offset, &mut geometries)?;
            }
            offset += batch.num_rows();
        }
        Ok(geometries)
    }

    /// Union of the bounds of every geometry in `column`; `None` when it has none
    pub fn total_bounds(&self, column: &str) -> Result<Option<Bbox>> {
        Ok(total_bounds(&self.geometries(column)?))
    }
}

fn decode_array(
    column: &str,
    array: &ArrayRef,
    offset: usize,
    out: &mut Vec<GeoGeometry>,
) -> Result<()> {
    if let Some(values) = array.as_binary_opt::<i32>() {
        decode_values(column, values.iter(), offset, out)
    } else if let Some(values) = array.as_binary_opt::<i64>() {
        decode_values(column, values.iter(), offset, out)
    } else {
        Err(GeoParquetError::UnsupportedColumnType {
            column: column.to_string(),
            data_type: array.data_type().to_string(),
        })
    }
}

fn decode_values<'a>(
    column: &str,
    values: impl Iterator<Item = Option<&'a [u8]>>,
    offset: usize,
    out: &mut Vec<GeoGeometry>,
) -> Result<()> {
    for (row, value) in values.enumerate() {
        let Some(bytes) = value else {
            continue;
        };
        let geometry = Wkb(bytes.to_vec()).to_geo().map_err(|e| GeoParquetError::InvalidWkb {
            column: column.to_string(),
            row: offset + row,
            reason: e.to_string(),
        })?;
        out.push(geometry);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{footprints_table, wkb_point, wkb_polygon};
    use tempfile::TempDir;

    #[test]
    fn test_total_bounds_spans_batches() {
        let table = footprints_table(&[
            vec![Some(wkb_point(1.0, 2.0)), None],
            vec![Some(wkb_polygon(&[(-5.0, 0.0), (0.0, 0.0), (0.0, 7.0), (-5.0, 0.0)]))],
        ]);

        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.geometries("geometry").unwrap().len(), 2);
        assert_eq!(table.total_bounds("geometry").unwrap(), Some(Bbox::new(-5.0, 0.0, 1.0, 7.0)));
    }

    #[test]
    fn test_all_null_column_has_no_bounds() {
        let table = footprints_table(&[vec![None, None]]);
        assert_eq!(table.total_bounds("geometry").unwrap(), None);
    }

    #[test]
    fn test_missing_column() {
        let table = footprints_table(&[vec![Some(wkb_point(0.0, 0.0))]]);
        let err = table.total_bounds("geom").unwrap_err();
        assert!(matches!(err, GeoParquetError::MissingColumn { .. }));
    }

    #[test]
    fn test_non_binary_column() {
        let table = footprints_table(&[vec![Some(wkb_point(0.0, 0.0))]]);
        let err = table.total_bounds("height").unwrap_err();
        assert!(matches!(err, GeoParquetError::UnsupportedColumnType { .. }));
    }

    #[test]
    fn test_invalid_wkb_reports_row() {
        let table = footprints_table(&[
            vec![Some(wkb_point(0.0, 0.0))],
            vec![None, Some(vec![1, 2, 3])],
        ]);
        match table.total_bounds("geometry").unwrap_err() {
            GeoParquetError::InvalidWkb { row, .. } => assert_eq!(row, 2),
            other => panic!("Expected InvalidWkb, got {:?}", other),
        }
    }

    #[test]
    fn test_metadata_survives_write_and_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("part-0.parquet");

        let table = footprints_table(&[vec![Some(wkb_point(3.0, 4.0))]]);
        let metadata = HashMap::from([("owner".to_string(), "footprints".to_string())]);
        table.with_schema_metadata(metadata).unwrap().write_parquet(&path).unwrap();

        let read = GeoTable::read_parquet(&path).unwrap();
        assert_eq!(read.metadata().get("owner").map(String::as_str), Some("footprints"));
        assert_eq!(read.num_rows(), 1);
        assert!(!read.is_stamped());
        assert!(!path.with_extension("parquet.tmp").exists());
    }
}
