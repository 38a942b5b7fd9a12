//! Conversions between the canonical [`Geometry`] and `geo` types.

use footprints_core::models::{Bbox, Geometry};
use geo::{Coord, Geometry as GeoGeometry, LineString, MultiPolygon, Polygon, Rect};

fn to_line(coords: &[[f64; 2]]) -> LineString {
    coords.iter().map(|c| Coord { x: c[0], y: c[1] }).collect()
}

fn to_polygon(rings: &[Vec<[f64; 2]>]) -> Polygon {
    match rings.split_first() {
        Some((exterior, interiors)) => {
            Polygon::new(to_line(exterior), interiors.iter().map(|r| to_line(r)).collect())
        }
        None => Polygon::new(LineString::new(vec![]), vec![]),
    }
}

fn from_line(line: &LineString) -> Vec<[f64; 2]> {
    line.coords().map(|c| [c.x, c.y]).collect()
}

fn from_polygon(polygon: &Polygon) -> Vec<Vec<[f64; 2]>> {
    std::iter::once(polygon.exterior()).chain(polygon.interiors()).map(from_line).collect()
}

/// Convert a canonical Geometry to a geo::Geometry
pub fn to_geo_geometry(geom: &Geometry) -> GeoGeometry {
    match geom {
        Geometry::Point { coordinates } => {
            GeoGeometry::Point(geo::Point::new(coordinates[0], coordinates[1]))
        }
        Geometry::LineString { coordinates } => GeoGeometry::LineString(to_line(coordinates)),
        Geometry::Polygon { coordinates } => GeoGeometry::Polygon(to_polygon(coordinates)),
        Geometry::MultiPoint { coordinates } => GeoGeometry::MultiPoint(
            coordinates.iter().map(|c| geo::Point::new(c[0], c[1])).collect(),
        ),
        Geometry::MultiLineString { coordinates } => GeoGeometry::MultiLineString(
            geo::MultiLineString::new(coordinates.iter().map(|l| to_line(l)).collect()),
        ),
        Geometry::MultiPolygon { coordinates } => GeoGeometry::MultiPolygon(MultiPolygon::new(
            coordinates.iter().map(|p| to_polygon(p)).collect(),
        )),
    }
}

/// Convert a geo::Geometry to a canonical Geometry.
///
/// Returns `None` for an empty geometry collection; a non-empty collection is
/// flattened into its first member.
pub fn from_geo_geometry(geom: &GeoGeometry) -> Option<Geometry> {
    let converted = match geom {
        GeoGeometry::Point(p) => Geometry::point(p.x(), p.y()),
        GeoGeometry::Line(l) => Geometry::LineString {
            coordinates: vec![[l.start.x, l.start.y], [l.end.x, l.end.y]],
        },
        GeoGeometry::LineString(ls) => Geometry::LineString { coordinates: from_line(ls) },
        GeoGeometry::Polygon(p) => Geometry::Polygon { coordinates: from_polygon(p) },
        GeoGeometry::MultiPoint(mp) => Geometry::MultiPoint {
            coordinates: mp.iter().map(|p| [p.x(), p.y()]).collect(),
        },
        GeoGeometry::MultiLineString(mls) => Geometry::MultiLineString {
            coordinates: mls.iter().map(from_line).collect(),
        },
        GeoGeometry::MultiPolygon(mp) => Geometry::MultiPolygon {
            coordinates: mp.iter().map(from_polygon).collect(),
        },
        GeoGeometry::GeometryCollection(gc) => return gc.iter().next().and_then(from_geo_geometry),
        GeoGeometry::Rect(r) => Geometry::Polygon { coordinates: from_polygon(&r.to_polygon()) },
        GeoGeometry::Triangle(t) => Geometry::Polygon { coordinates: from_polygon(&t.to_polygon()) },
    };
    Some(converted)
}

/// Convert a geo rectangle into a [`Bbox`]
pub fn rect_to_bbox(rect: &Rect) -> Bbox {
    Bbox::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_roundtrip() {
        let geom = Geometry::point(29.0, 9.5);
        let back = from_geo_geometry(&to_geo_geometry(&geom)).unwrap();
        assert_eq!(geom, back);
    }

    #[test]
    fn test_polygon_with_hole_roundtrip() {
        let geom = Geometry::polygon(vec![
            vec![[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0], [0.0, 0.0]],
            vec![[1.0, 1.0], [2.0, 1.0], [2.0, 2.0], [1.0, 1.0]],
        ]);
        let back = from_geo_geometry(&to_geo_geometry(&geom)).unwrap();
        assert_eq!(geom, back);
    }

    #[test]
    fn test_rect_becomes_polygon() {
        let rect = Rect::new(Coord { x: 0.0, y: 0.0 }, Coord { x: 1.0, y: 2.0 });
        let converted = from_geo_geometry(&GeoGeometry::Rect(rect)).unwrap();
        assert!(matches!(converted, Geometry::Polygon { .. }));
        assert_eq!(converted.bbox(), Some(Bbox::new(0.0, 0.0, 1.0, 2.0)));
    }

    #[test]
    fn test_empty_collection() {
        let empty = GeoGeometry::GeometryCollection(geo::GeometryCollection::default());
        assert!(from_geo_geometry(&empty).is_none());
    }
}
