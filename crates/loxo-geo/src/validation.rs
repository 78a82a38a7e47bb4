use loxo_core::error::{LoxoError, Result};
use loxo_core::models::{Coordinate, FeatureCollection, Geometry};
use serde_json::Value;

/// Geometry types accepted in feature collections
pub const VALID_GEOMETRY_TYPES: [&str; 6] =
    ["Point", "LineString", "Polygon", "MultiPoint", "MultiLineString", "MultiPolygon"];

/// Validation result with details
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

/// Validation error with location details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub location: String,
    pub reason: String,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        Self { is_valid: true, errors: Vec::new() }
    }

    /// Add an error to the result
    pub fn add_error(&mut self, location: String, reason: String) {
        self.is_valid = false;
        self.errors.push(ValidationError { location, reason });
    }

    /// Convert the first error into a [`LoxoError::InvalidGeoJson`]
    pub fn into_result(self) -> Result<()> {
        match self.errors.into_iter().next() {
            None => Ok(()),
            Some(error) => {
                Err(LoxoError::InvalidGeoJson { location: error.location, reason: error.reason })
            }
        }
    }
}

/// Structural validation of a GeoJSON FeatureCollection given as raw JSON
pub fn validate_feature_collection(data: &Value) -> ValidationResult {
    let mut result = ValidationResult::valid();

    let features = match data.get("features").and_then(Value::as_array) {
        Some(features) if !features.is_empty() => features,
        Some(_) => {
            result.add_error("features".to_string(), "FeatureCollection has no features".to_string());
            return result;
        }
        None => {
            result.add_error("features".to_string(), "Missing features array".to_string());
            return result;
        }
    };

    for (i, feature) in features.iter().enumerate() {
        validate_feature(feature, &format!("features[{}]", i), &mut result);
    }

    result
}

fn validate_feature(feature: &Value, location: &str, result: &mut ValidationResult) {
    match feature.get("type").and_then(Value::as_str) {
        Some("Feature") => {}
        Some(other) => result.add_error(
            location.to_string(),
            format!("Invalid feature type '{}', expected 'Feature'", other),
        ),
        None => result.add_error(location.to_string(), "Feature has no type field".to_string()),
    }

    match feature.get("properties") {
        Some(Value::Object(_)) | Some(Value::Null) => {}
        Some(_) => result.add_error(
            format!("{}.properties", location),
            "Properties must be an object".to_string(),
        ),
        None => {
            result.add_error(location.to_string(), "Feature has no properties field".to_string())
        }
    }

    let location = format!("{}.geometry", location);
    let Some(geometry) = feature.get("geometry").filter(|g| !g.is_null()) else {
        result.add_error(location, "Feature has no geometry".to_string());
        return;
    };

    let Some(geometry_type) = geometry.get("type").and_then(Value::as_str) else {
        result.add_error(location, "Geometry has no type".to_string());
        return;
    };

    if !VALID_GEOMETRY_TYPES.contains(&geometry_type) {
        result.add_error(
            location,
            format!(
                "Invalid geometry type '{}', must be one of {:?}",
                geometry_type, VALID_GEOMETRY_TYPES
            ),
        );
        return;
    }

    let coordinates = match geometry.get("coordinates").and_then(Value::as_array) {
        Some(c) if !c.is_empty() => c,
        _ => {
            result.add_error(location, "Geometry has no coordinates".to_string());
            return;
        }
    };

    let location = format!("{}.coordinates", location);
    match geometry_type {
        "Point" => validate_position(coordinates, &location, result),
        "LineString" | "MultiPoint" => validate_positions(coordinates, &location, result),
        "Polygon" | "MultiLineString" => {
            for (r, ring) in coordinates.iter().enumerate() {
                let ring_location = format!("{}[{}]", location, r);
                match ring.as_array() {
                    Some(ring) => validate_positions(ring, &ring_location, result),
                    None => result.add_error(ring_location, "Expected an array of positions".to_string()),
                }
            }
        }
        _ => {
            for (p, polygon) in coordinates.iter().enumerate() {
                for (r, ring) in polygon.as_array().into_iter().flatten().enumerate() {
                    let ring_location = format!("{}[{}][{}]", location, p, r);
                    match ring.as_array() {
                        Some(ring) => validate_positions(ring, &ring_location, result),
                        None => result
                            .add_error(ring_location, "Expected an array of positions".to_string()),
                    }
                }
            }
        }
    }
}

fn validate_positions(positions: &[Value], location: &str, result: &mut ValidationResult) {
    for (i, position) in positions.iter().enumerate() {
        let position_location = format!("{}[{}]", location, i);
        match position.as_array() {
            Some(position) => validate_position(position, &position_location, result),
            None => result.add_error(position_location, "Expected a coordinate pair".to_string()),
        }
    }
}

fn validate_position(position: &[Value], location: &str, result: &mut ValidationResult) {
    if position.len() < 2 {
        result.add_error(location.to_string(), "Position is missing x or y".to_string());
        return;
    }

    let (Some(lon), Some(lat)) = (position[0].as_f64(), position[1].as_f64()) else {
        result.add_error(location.to_string(), format!("{:?} contains a non-numeric value", position));
        return;
    };

    if let Err(e) = Coordinate::new(lon, lat).validate() {
        result.add_error(location.to_string(), e.to_string());
    }
}

/// Check coordinate ranges of an already deserialized collection
pub fn validate_collection(collection: &FeatureCollection) -> ValidationResult {
    let mut result = ValidationResult::valid();

    for (i, feature) in collection.iter().enumerate() {
        for position in positions(&feature.geometry) {
            if let Err(e) = Coordinate::from(position).validate() {
                result.add_error(format!("features[{}].geometry", i), e.to_string());
            }
        }
    }

    result
}

fn positions(geometry: &Geometry) -> Vec<[f64; 2]> {
    match geometry {
        Geometry::Point { coordinates } => vec![*coordinates],
        Geometry::LineString { coordinates } | Geometry::MultiPoint { coordinates } => {
            coordinates.clone()
        }
        Geometry::Polygon { coordinates } | Geometry::MultiLineString { coordinates } => {
            coordinates.iter().flatten().copied().collect()
        }
        Geometry::MultiPolygon { coordinates } => {
            coordinates.iter().flatten().flatten().copied().collect()
        }
    }
}

/// Validate raw GeoJSON and deserialize it into a [`FeatureCollection`]
pub fn parse_feature_collection(data: &Value) -> Result<FeatureCollection> {
    validate_feature_collection(data).into_result()?;

    let collection: FeatureCollection =
        serde_json::from_value(data.clone()).map_err(|e| LoxoError::InvalidGeoJson {
            location: "features".to_string(),
            reason: e.to_string(),
        })?;

    validate_collection(&collection).into_result()?;
    Ok(collection)
}
