mod common;

use common::{points_table, write_points};
use footprints_core::models::Bbox;
use footprints_geoparquet::{
    add_geo_metadata, find_parquet_files, update_many, GeoParquetError, GeoTable, StampOptions,
    StaticSchemaSource,
};
use proptest::prelude::*;
use serde_json::json;
use tempfile::TempDir;

const SCHEMA_URL: &str = "https://example.com/geoparquet/schema.json";

/// The parts of the GeoParquet 1.0.0-beta.1 schema the stamped block exercises
fn geoparquet_schema() -> serde_json::Value {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "required": ["version", "primary_column", "columns"],
        "properties": {
            "version": {"type": "string", "const": "1.0.0-beta.1"},
            "primary_column": {"type": "string", "minLength": 1},
            "columns": {
                "type": "object",
                "minProperties": 1,
                "patternProperties": {
                    ".+": {
                        "type": "object",
                        "required": ["encoding", "geometry_types"],
                        "properties": {
                            "encoding": {"type": "string", "const": "WKB"},
                            "geometry_types": {
                                "type": "array",
                                "uniqueItems": true,
                                "items": {
                                    "type": "string",
                                    "pattern": "^(GeometryCollection|(Multi)?(Point|LineString|Polygon))( Z)?$"
                                }
                            },
                            "bbox": {
                                "type": "array",
                                "items": {"type": "number"},
                                "oneOf": [
                                    {"minItems": 4, "maxItems": 4},
                                    {"minItems": 6, "maxItems": 6}
                                ]
                            }
                        }
                    }
                }
            }
        }
    })
}

// JSON float parsing may differ from the written value in the last place
fn assert_close(actual: Bbox, expected: Bbox) {
    for (a, e) in actual.to_array().iter().zip(expected.to_array().iter()) {
        assert!((a - e).abs() < 1e-9, "{:?} != {:?}", actual, expected);
    }
}

fn schemas() -> StaticSchemaSource {
    StaticSchemaSource::new().with_document(SCHEMA_URL, geoparquet_schema())
}

fn validated() -> StampOptions {
    StampOptions { schema_url: Some(SCHEMA_URL.to_string()), ..StampOptions::default() }
}

#[test]
fn test_update_many_stamps_partitioned_dataset() {
    let dir = TempDir::new().unwrap();
    let dataset = dir.path().join("2022-06-01").join("ml-buildings.parquet");
    write_points(&dataset.join("RegionName=Abyei").join("part-0.parquet"), &[(28.9, 9.8), (29.1, 10.2)]);
    write_points(&dataset.join("RegionName=Aruba").join("part-0.parquet"), &[(-70.0, 12.5)]);
    std::fs::write(dataset.join("_SUCCESS"), b"").unwrap();

    assert_eq!(find_parquet_files(dir.path()).unwrap().len(), 2);

    let report = update_many(dir.path(), &validated(), &schemas()).unwrap();
    assert_eq!(report.stamped.len(), 2);
    assert!(report.skipped.is_empty());

    let abyei = GeoTable::read_parquet(dataset.join("RegionName=Abyei").join("part-0.parquet")).unwrap();
    let geo = abyei.geo_metadata().unwrap().unwrap();
    assert_close(geo.primary().unwrap().bbox.unwrap(), Bbox::new(28.9, 9.8, 29.1, 10.2));
    assert_eq!(abyei.num_rows(), 2);

    // A second run finds everything stamped and rewrites nothing
    let again = update_many(dir.path(), &validated(), &schemas()).unwrap();
    assert!(again.stamped.is_empty());
    assert_eq!(again.total(), 2);
}

#[test]
fn test_update_many_aborts_on_first_failure() {
    let dir = TempDir::new().unwrap();
    write_points(&dir.path().join("a.parquet"), &[(1.0, 1.0)]);
    write_points(&dir.path().join("b.parquet"), &[(2.0, 2.0)]);

    let options = StampOptions { geometry_column: "geom".to_string(), ..validated() };
    let err = update_many(dir.path(), &options, &schemas()).unwrap_err();
    assert!(matches!(err, GeoParquetError::MissingColumn { .. }));

    let untouched = GeoTable::read_parquet(dir.path().join("b.parquet")).unwrap();
    assert!(!untouched.is_stamped());
}

#[test]
fn test_stamped_block_passes_validation() {
    let table = points_table(&[(0.0, 0.0), (1.0, 1.0)]);
    let stamped = add_geo_metadata(&table, &validated(), &schemas()).unwrap();
    assert!(stamped.is_stamped());
}

proptest! {
    #[test]
    fn bbox_is_union_of_geometry_bounds(
        points in prop::collection::vec((-180.0f64..180.0, -85.0f64..85.0), 1..40)
    ) {
        let table = points_table(&points);
        let options = StampOptions { schema_url: None, ..StampOptions::default() };
        let stamped = add_geo_metadata(&table, &options, &StaticSchemaSource::new()).unwrap();
        let bbox = stamped.geo_metadata().unwrap().unwrap().primary().unwrap().bbox.unwrap();

        let min_x = points.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
        let min_y = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let max_x = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
        let max_y = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        let expected = [min_x, min_y, max_x, max_y];
        for (got, want) in bbox.to_array().iter().zip(expected.iter()) {
            prop_assert!((got - want).abs() < 1e-9, "{} != {}", got, want);
        }
    }
}
