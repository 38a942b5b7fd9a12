use arrow::array::{ArrayRef, BinaryArray, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use footprints_geoparquet::GeoTable;
use std::path::Path;
use std::sync::Arc;

pub fn wkb_point(x: f64, y: f64) -> Vec<u8> {
    let mut out = vec![1u8];
    out.extend_from_slice(&1u32.to_le_bytes());
    out.extend_from_slice(&x.to_le_bytes());
    out.extend_from_slice(&y.to_le_bytes());
    out
}

pub fn points_table(points: &[(f64, f64)]) -> GeoTable {
    let schema = Arc::new(Schema::new(vec![
        Field::new("geometry", DataType::Binary, true),
        Field::new("source", DataType::Utf8, false),
    ]));

    let wkb: Vec<Vec<u8>> = points.iter().map(|(x, y)| wkb_point(*x, *y)).collect();
    let geometry: BinaryArray = wkb.iter().map(|b| Some(b.as_slice())).collect();
    let source = StringArray::from(vec!["bing"; points.len()]);
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![Arc::new(geometry) as ArrayRef, Arc::new(source) as ArrayRef],
    )
    .unwrap();

    GeoTable::try_new(schema, vec![batch]).unwrap()
}

pub fn write_points(path: &Path, points: &[(f64, f64)]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    points_table(points).write_parquet(path).unwrap();
}
