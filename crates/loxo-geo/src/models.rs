//! Conversions between Loxo geometries and the `geo` crate.

use geo::Geometry as GeoGeometry;

pub use loxo_core::models::{Coordinate, Geometry, GeometryType};

fn to_geo_coords(coords: &[[f64; 2]]) -> Vec<geo::Coord> {
    coords.iter().map(|c| geo::Coord { x: c[0], y: c[1] }).collect()
}

fn to_geo_polygon(rings: &[Vec<[f64; 2]>]) -> geo::Polygon {
    let mut rings = rings.iter().map(|ring| geo::LineString::new(to_geo_coords(ring)));
    match rings.next() {
        Some(exterior) => geo::Polygon::new(exterior, rings.collect()),
        None => geo::Polygon::new(geo::LineString::new(vec![]), vec![]),
    }
}

/// Convert a canonical Geometry to a geo::Geometry
pub fn to_geo_geometry(geom: &Geometry) -> GeoGeometry {
    match geom {
        Geometry::Point { coordinates } => {
            GeoGeometry::Point(geo::Point::new(coordinates[0], coordinates[1]))
        }
        Geometry::LineString { coordinates } => {
            GeoGeometry::LineString(geo::LineString::new(to_geo_coords(coordinates)))
        }
        Geometry::Polygon { coordinates } => GeoGeometry::Polygon(to_geo_polygon(coordinates)),
        Geometry::MultiPoint { coordinates } => {
            let points: Vec<geo::Point> =
                coordinates.iter().map(|c| geo::Point::new(c[0], c[1])).collect();
            GeoGeometry::MultiPoint(geo::MultiPoint::new(points))
        }
        Geometry::MultiLineString { coordinates } => {
            let lines: Vec<geo::LineString> = coordinates
                .iter()
                .map(|line| geo::LineString::new(to_geo_coords(line)))
                .collect();
            GeoGeometry::MultiLineString(geo::MultiLineString::new(lines))
        }
        Geometry::MultiPolygon { coordinates } => {
            let polygons: Vec<geo::Polygon> =
                coordinates.iter().map(|poly| to_geo_polygon(poly)).collect();
            GeoGeometry::MultiPolygon(geo::MultiPolygon::new(polygons))
        }
    }
}

/// Build a planar polygon on the (lon, lat) plane from an open or closed ring
pub fn ring_to_polygon(ring: &[Coordinate]) -> geo::Polygon {
    let coords: Vec<geo::Coord> = ring.iter().map(|c| geo::Coord { x: c.lon, y: c.lat }).collect();
    // Polygon::new closes the exterior ring when needed
    geo::Polygon::new(geo::LineString::new(coords), vec![])
}

/// Extension trait for Geometry with geo-crate operations
pub trait GeometryExt {
    /// Convert to geo::Geometry
    fn to_geo(&self) -> GeoGeometry;

    /// Get the centroid as coordinates
    fn centroid_coords(&self) -> Option<[f64; 2]>;

    /// The single position proximity queries measure from: the point itself
    /// for Point geometries, the centroid otherwise
    fn representative_coordinate(&self) -> Option<Coordinate>;
}

impl GeometryExt for Geometry {
    fn to_geo(&self) -> GeoGeometry {
        to_geo_geometry(self)
    }

    fn centroid_coords(&self) -> Option<[f64; 2]> {
        use geo::algorithm::centroid::Centroid;
        let geo_geom = self.to_geo();
        geo_geom.centroid().map(|p| [p.x(), p.y()])
    }

    fn representative_coordinate(&self) -> Option<Coordinate> {
        self.as_point().or_else(|| self.centroid_coords().map(Coordinate::from))
    }
}
