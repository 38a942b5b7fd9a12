use crate::error::Result;
use crate::models::{Geometry, TableColumn};

/// What an inspection should compute beyond the column list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectRequest {
    /// Column holding WKB-encoded geometries
    pub geometry_column: String,

    /// Compute a footprint geometry from the table contents
    pub infer_geometry: bool,

    /// Count rows across every file of the table
    pub count_rows: bool,
}

impl InspectRequest {
    pub fn new(geometry_column: impl Into<String>) -> Self {
        Self { geometry_column: geometry_column.into(), infer_geometry: false, count_rows: false }
    }

    pub fn infer_geometry(mut self, infer: bool) -> Self {
        self.infer_geometry = infer;
        self
    }

    pub fn count_rows(mut self, count: bool) -> Self {
        self.count_rows = count;
        self
    }
}

/// Facts inferred from a table's schema and contents
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableProfile {
    pub columns: Vec<TableColumn>,

    /// Present when rows were counted
    pub row_count: Option<u64>,

    /// Present when geometry inference was requested and the table had geometries
    pub geometry: Option<Geometry>,
}

/// Port for reading schema, row counts and footprints out of a stored table
pub trait TableInspector {
    /// Inspect the table at `location`; failures to read it are returned as errors
    fn inspect(&self, location: &str, request: &InspectRequest) -> Result<TableProfile>;
}

impl<T: TableInspector + ?Sized> TableInspector for &T {
    fn inspect(&self, location: &str, request: &InspectRequest) -> Result<TableProfile> {
        (**self).inspect(location, request)
    }
}
