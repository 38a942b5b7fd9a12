//! Bounding-box aggregation over many geometries.

use footprints_core::models::Bbox;
use geo::{BoundingRect, Geometry as GeoGeometry};

use crate::models::rect_to_bbox;

/// Union of the bounding boxes of every geometry; `None` when nothing has extent
pub fn total_bounds<'a, I>(geometries: I) -> Option<Bbox>
where
    I: IntoIterator<Item = &'a GeoGeometry>,
{
    geometries
        .into_iter()
        .filter_map(|g| g.bounding_rect())
        .map(|r| rect_to_bbox(&r))
        .reduce(|acc, b| acc.union(&b))
}
