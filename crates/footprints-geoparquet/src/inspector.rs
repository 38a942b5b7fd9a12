//! Local Parquet adapter for the table inspection port.

use footprints_core::error::FootprintsError;
use footprints_core::models::TableColumn;
use footprints_core::ports::{InspectRequest, TableInspector, TableProfile};
use footprints_geo::{footprint_hull, from_geo_geometry};
use geo::{Geometry as GeoGeometry, MultiPolygon};
use parquet::file::reader::{FileReader, SerializedFileReader};
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::{GeoParquetError, Result};
use crate::stamp::find_parquet_files;
use crate::table::GeoTable;

/// Inspects a Parquet file, or a directory of Parquet part files, on local disk.
///
/// Columns come from the first file's schema, typed by their Parquet physical
/// type. The inferred geometry holds the convex hull of each file's footprints,
/// one polygon per file, so its bounds are the bounds of the data.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParquetInspector;

impl ParquetInspector {
    pub fn new() -> Self {
        Self
    }

    fn files(&self, path: &Path) -> Result<Vec<PathBuf>> {
        if !path.is_dir() {
            return Ok(vec![path.to_path_buf()]);
        }
        let files = find_parquet_files(path)?;
        if files.is_empty() {
            return Err(GeoParquetError::NoParquetFiles { path: path.to_path_buf() });
        }
        Ok(files)
    }

    fn profile(&self, path: &Path, request: &InspectRequest) -> Result<TableProfile> {
        let files = self.files(path)?;
        let mut profile = TableProfile::default();
        let mut row_count = 0u64;
        let mut hulls = Vec::new();

        for (index, file) in files.iter().enumerate() {
            let reader = SerializedFileReader::new(File::open(file)?)?;
            let metadata = reader.metadata().file_metadata();

            if index == 0 {
                profile.columns = metadata
                    .schema_descr()
                    .columns()
                    .iter()
                    .map(|c| {
                        TableColumn::new(c.path().string(), c.physical_type().to_string().to_lowercase())
                    })
                    .collect();
            }
            row_count += metadata.num_rows().max(0) as u64;

            if request.infer_geometry {
                let table = GeoTable::read_parquet(file)?;
                let footprints = table.geometries(&request.geometry_column)?;
                hulls.extend(footprint_hull(&footprints));
            }
        }

        if request.count_rows {
            profile.row_count = Some(row_count);
        }
        if !hulls.is_empty() {
            profile.geometry = from_geo_geometry(&GeoGeometry::MultiPolygon(MultiPolygon::new(hulls)));
        }

        tracing::debug!(
            "Inspected {} file(s) at {}: {} columns",
            files.len(),
            path.display(),
            profile.columns.len()
        );
        Ok(profile)
    }
}

impl TableInspector for ParquetInspector {
    fn inspect(
        &self,
        location: &str,
        request: &InspectRequest,
    ) -> footprints_core::Result<TableProfile> {
        self.profile(Path::new(location), request).map_err(|e| FootprintsError::Inspection {
            href: location.to_string(),
            reason: e.to_string(),
        })
    }
}
