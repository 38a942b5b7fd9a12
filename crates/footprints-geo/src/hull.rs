//! Post-processing hooks applied to an item's final geometry.

use footprints_core::models::Geometry;
use geo::algorithm::convex_hull::ConvexHull as HullAlgorithm;
use geo::{CoordsIter, Geometry as GeoGeometry, MultiPoint, Polygon};

use crate::models::{from_geo_geometry, to_geo_geometry};

/// Transformation applied to a geometry after it has been resolved
pub trait GeometryHook {
    fn name(&self) -> &'static str;

    fn apply(&self, geometry: Geometry) -> Geometry;
}

/// Leaves the geometry untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl GeometryHook for Identity {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn apply(&self, geometry: Geometry) -> Geometry {
        geometry
    }
}

/// Replaces the geometry with its convex hull.
///
/// Inferred footprint geometries can carry many thousands of vertices; the hull
/// keeps item documents small.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConvexHull;

impl GeometryHook for ConvexHull {
    fn name(&self) -> &'static str {
        "convex-hull"
    }

    fn apply(&self, geometry: Geometry) -> Geometry {
        let hull = to_geo_geometry(&geometry).convex_hull();
        from_geo_geometry(&geo::Geometry::Polygon(hull)).unwrap_or(geometry)
    }
}

/// Convex hull around every coordinate of `geometries`; `None` when there are none
pub fn footprint_hull<'a, I>(geometries: I) -> Option<Polygon>
where
    I: IntoIterator<Item = &'a GeoGeometry>,
{
    let points: MultiPoint = geometries.into_iter().flat_map(|g| g.coords_iter()).collect();
    if points.0.is_empty() {
        return None;
    }
    Some(points.convex_hull())
}
