use arrow::array::{ArrayRef, BinaryArray, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use std::sync::Arc;

use crate::table::GeoTable;

/// Little-endian WKB for a 2D point
pub(crate) fn wkb_point(x: f64, y: f64) -> Vec<u8> {
    let mut out = vec![1u8];
    out.extend_from_slice(&1u32.to_le_bytes());
    out.extend_from_slice(&x.to_le_bytes());
    out.extend_from_slice(&y.to_le_bytes());
    out
}

/// Little-endian WKB for a single-ring 2D polygon
pub(crate) fn wkb_polygon(ring: &[(f64, f64)]) -> Vec<u8> {
    let mut out = vec![1u8];
    out.extend_from_slice(&3u32.to_le_bytes());
    out.extend_from_slice(&1u32.to_le_bytes());
    out.extend_from_slice(&(ring.len() as u32).to_le_bytes());
    for (x, y) in ring {
        out.extend_from_slice(&x.to_le_bytes());
        out.extend_from_slice(&y.to_le_bytes());
    }
    out
}

/// Table with a nullable `geometry` binary column and a `height` column,
/// one record batch per slice entry
pub(crate) fn footprints_table(batches: &[Vec<Option<Vec<u8>>>]) -> GeoTable {
    let schema = Arc::new(Schema::new(vec![
        Field::new("geometry", DataType::Binary, true),
        Field::new("height", DataType::Float64, false),
    ]));

    let batches = batches
        .iter()
        .map(|rows| {
            let geometry: BinaryArray = rows.iter().map(|r| r.as_deref()).collect();
            let height = Float64Array::from(vec![3.5; rows.len()]);
            RecordBatch::try_new(
                schema.clone(),
                vec![Arc::new(geometry) as ArrayRef, Arc::new(height) as ArrayRef],
            )
            .unwrap()
        })
        .collect();

    GeoTable::try_new(schema, batches).unwrap()
}
