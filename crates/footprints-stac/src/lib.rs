//! Footprints STAC - Item and Collection assembly
//!
//! One generic pipeline turns a dataset partition path into a STAC Item,
//! parameterised by the dataset's [`DatasetSchema`](footprints_core::models::DatasetSchema).
//! Table contents are read through the
//! [`TableInspector`](footprints_core::ports::TableInspector) port.

pub mod collection;
pub mod item;

pub use collection::{create_collection, CollectionOptions};
pub use item::{ItemAssembler, SpatialSource};
