//! Geodesic distance on the WGS84 ellipsoid.
//!
//! Distances use Karney's geodesic inverse (`geo::Geodesic`), which agrees
//! with GeographicLib to well beyond six significant figures.

use geo::{Distance, Geodesic, Point};
use loxo_core::models::Coordinate;

/// Geodesic distance in meters between two WGS84 coordinates.
///
/// Identical coordinates are exactly 0. Arguments are put in a canonical
/// order before solving, so `geodesic_distance(a, b)` and
/// `geodesic_distance(b, a)` are bitwise equal.
pub fn geodesic_distance(a: Coordinate, b: Coordinate) -> f64 {
    if a == b {
        return 0.0;
    }

    let (first, second) = if (a.lon, a.lat) <= (b.lon, b.lat) { (a, b) } else { (b, a) };

    Geodesic
        .distance(Point::new(first.lon, first.lat), Point::new(second.lon, second.lat))
        .abs()
}
