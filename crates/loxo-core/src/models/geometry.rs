//! Canonical geometry types used across all loxo crates.
//!
//! Coordinates are WGS84 (EPSG:4326) longitude/latitude pairs. The
//! [`Geometry`] enum maps directly onto GeoJSON geometry objects.

use serde::{Deserialize, Serialize};

use crate::error::{LoxoError, Result};

/// A WGS84 position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    /// Create a coordinate without range checks
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Create a coordinate, rejecting values outside the WGS84 ranges
    pub fn try_new(lon: f64, lat: f64) -> Result<Self> {
        let coord = Self::new(lon, lat);
        coord.validate()?;
        Ok(coord)
    }

    /// Check that longitude is in [-180, 180] and latitude in [-90, 90]
    pub fn validate(&self) -> Result<()> {
        if !self.lon.is_finite() || !(-180.0..=180.0).contains(&self.lon) {
            return Err(LoxoError::invalid_argument(
                "longitude",
                format!("{} is outside [-180, 180]", self.lon),
            ));
        }
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(LoxoError::invalid_argument(
                "latitude",
                format!("{} is outside [-90, 90]", self.lat),
            ));
        }
        Ok(())
    }

    pub fn to_array(self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from(value: [f64; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(value: Coordinate) -> Self {
        value.to_array()
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from(value: (f64, f64)) -> Self {
        Self::new(value.0, value.1)
    }
}

/// Distance units for request parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DistanceUnit {
    #[default]
    Meters,
    Kilometers,
    Miles,
    Feet,
}

impl DistanceUnit {
    /// Convert a distance value to meters
    pub fn to_meters(&self, value: f64) -> f64 {
        match self {
            DistanceUnit::Meters => value,
            DistanceUnit::Kilometers => value * 1000.0,
            DistanceUnit::Miles => value * 1609.34,
            DistanceUnit::Feet => value * 0.3048,
        }
    }
}

/// Geometry type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GeometryType {
    #[default]
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    Mixed,
}

/// GeoJSON-compatible geometry representation
///
/// This enum directly maps to GeoJSON geometry types with coordinate arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        #[serde(deserialize_with = "position::one")]
        coordinates: [f64; 2],
    },
    LineString {
        #[serde(deserialize_with = "position::many")]
        coordinates: Vec<[f64; 2]>,
    },
    Polygon {
        #[serde(deserialize_with = "position::rings")]
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPoint {
        #[serde(deserialize_with = "position::many")]
        coordinates: Vec<[f64; 2]>,
    },
    MultiLineString {
        #[serde(deserialize_with = "position::rings")]
        coordinates: Vec<Vec<[f64; 2]>>,
    },
    MultiPolygon {
        #[serde(deserialize_with = "position::polygons")]
        coordinates: Vec<Vec<Vec<[f64; 2]>>>,
    },
}

/// GeoJSON positions may carry altitude or further ordinates; only
/// longitude and latitude are kept.
mod position {
    use serde::de::{Deserializer, Error};
    use serde::Deserialize;

    struct Position([f64; 2]);

    impl<'de> Deserialize<'de> for Position {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let values = Vec::<f64>::deserialize(deserializer)?;
            if values.len() < 2 {
                return Err(D::Error::invalid_length(values.len(), &"at least 2 elements"));
            }
            Ok(Position([values[0], values[1]]))
        }
    }

    pub fn one<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[f64; 2], D::Error> {
        Position::deserialize(deserializer).map(|p| p.0)
    }

    pub fn many<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<[f64; 2]>, D::Error> {
        let positions = Vec::<Position>::deserialize(deserializer)?;
        Ok(positions.into_iter().map(|p| p.0).collect())
    }

    pub fn rings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Vec<[f64; 2]>>, D::Error> {
        let rings = Vec::<Vec<Position>>::deserialize(deserializer)?;
        Ok(rings
            .into_iter()
            .map(|ring| ring.into_iter().map(|p| p.0).collect())
            .collect())
    }

    pub fn polygons<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Vec<Vec<[f64; 2]>>>, D::Error> {
        let polygons = Vec::<Vec<Vec<Position>>>::deserialize(deserializer)?;
        Ok(polygons
            .into_iter()
            .map(|rings| {
                rings
                    .into_iter()
                    .map(|ring| ring.into_iter().map(|p| p.0).collect())
                    .collect()
            })
            .collect())
    }
}

impl Geometry {
    /// Create a Point geometry
    pub fn point(x: f64, y: f64) -> Self {
        Geometry::Point { coordinates: [x, y] }
    }

    /// Create a LineString geometry
    pub fn line_string(coords: Vec<[f64; 2]>) -> Self {
        Geometry::LineString { coordinates: coords }
    }

    /// Create a Polygon geometry
    pub fn polygon(rings: Vec<Vec<[f64; 2]>>) -> Self {
        Geometry::Polygon { coordinates: rings }
    }

    /// Get the geometry type
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point { .. } => GeometryType::Point,
            Geometry::LineString { .. } => GeometryType::LineString,
            Geometry::Polygon { .. } => GeometryType::Polygon,
            Geometry::MultiPoint { .. } => GeometryType::MultiPoint,
            Geometry::MultiLineString { .. } => GeometryType::MultiLineString,
            Geometry::MultiPolygon { .. } => GeometryType::MultiPolygon,
        }
    }

    /// The position of a Point geometry, `None` for every other type
    pub fn as_point(&self) -> Option<Coordinate> {
        match self {
            Geometry::Point { coordinates } => Some(Coordinate::from(*coordinates)),
            _ => None,
        }
    }

    /// Convert to serde_json::Value (GeoJSON)
    pub fn to_geojson(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
