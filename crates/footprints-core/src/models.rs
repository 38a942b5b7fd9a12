pub mod dataset;
pub mod geometry;
pub mod partition;
pub mod stac;
pub mod stats;

pub use dataset::{DatasetSchema, DatasetVariant, ItemIdStrategy, PathLayout};
pub use geometry::{Bbox, Geometry, GeometryType};
pub use partition::{PartitionPath, Quadkey};
pub use stac::{
    Asset, Collection, Extent, Fields, Item, ItemProperties, Link, Provider, TableColumn, Temporal,
};
pub use stats::{RegionStats, StatsTable};
