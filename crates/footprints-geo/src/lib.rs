//! Footprints Geo - Geometry conversions, quadkey tiles, and footprint simplification
//!
//! This crate handles the geometric side of item assembly: converting between the
//! canonical GeoJSON-shaped geometry and `geo` types, turning quadkeys into tile
//! bounds, and the optional convex-hull post-processing hook.

pub mod bounds;
pub mod hull;
pub mod models;
pub mod quadkey;

pub use bounds::total_bounds;
pub use hull::{footprint_hull, ConvexHull, GeometryHook, Identity};
pub use models::{from_geo_geometry, to_geo_geometry};
pub use quadkey::{quadkey_to_tile, tile_bounds, Tile};
