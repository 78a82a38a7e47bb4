use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::geometry::{Coordinate, Geometry};
use crate::error::{LoxoError, Result};

/// Property name holding the sequential identifier assigned at ingestion
pub const LOXO_ID_PROPERTY: &str = "loxo_id";

/// Sequential identifier of a stored feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeatureId(pub u64);

/// A scalar feature attribute
///
/// Numeric coercion is explicit through [`AttributeValue::as_f64`]; nothing
/// converts implicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Integer(i64),
    Number(f64),
    String(String),
    /// Arrays and objects carried through from GeoJSON input untouched
    Structured(serde_json::Value),
}

impl AttributeValue {
    /// Attempt numeric coercion.
    ///
    /// Numbers pass through, strings are parsed after trimming, booleans map
    /// to 1 and 0. Null, structured values and unparsable strings yield `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Integer(i) => Some(*i as f64),
            AttributeValue::Number(n) => Some(*n).filter(|n| n.is_finite()),
            AttributeValue::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            AttributeValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            AttributeValue::Null | AttributeValue::Structured(_) => None,
        }
    }

    /// Convert to serde_json::Value
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => write!(f, "null"),
            AttributeValue::Bool(b) => write!(f, "{}", b),
            AttributeValue::Integer(i) => write!(f, "{}", i),
            AttributeValue::Number(n) => write!(f, "{}", n),
            AttributeValue::String(s) => write!(f, "{}", s),
            AttributeValue::Structured(v) => write!(f, "{}", v),
        }
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Number(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<u64> for AttributeValue {
    fn from(value: u64) -> Self {
        i64::try_from(value).map(AttributeValue::Integer).unwrap_or(AttributeValue::Number(value as f64))
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

/// A geometry plus its scalar attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub geometry: Geometry,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: BTreeMap<String, AttributeValue>,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, AttributeValue>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::deserialize(deserializer)?.unwrap_or_default())
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self { geometry, properties: BTreeMap::new() }
    }

    /// Create a Point feature
    pub fn point(lon: f64, lat: f64) -> Self {
        Self::new(Geometry::point(lon, lat))
    }

    /// Builder-style property setter
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn property(&self, name: &str) -> Option<&AttributeValue> {
        self.properties.get(name)
    }

    /// The sequential identifier assigned by the store, if any
    pub fn loxo_id(&self) -> Option<FeatureId> {
        match self.properties.get(LOXO_ID_PROPERTY)? {
            AttributeValue::Integer(i) => u64::try_from(*i).ok().map(FeatureId),
            _ => None,
        }
    }

    /// Position of a Point feature
    pub fn coordinate(&self) -> Option<Coordinate> {
        self.geometry.as_point()
    }
}

/// An ordered, materialized set of features
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    /// Point coordinates of every feature, in collection order.
    ///
    /// Fails on the first non-Point geometry or the first position outside
    /// the WGS84 ranges; statistics are only defined over valid points.
    pub fn point_coordinates(&self) -> Result<Vec<Coordinate>> {
        self.features
            .iter()
            .enumerate()
            .map(|(i, feature)| {
                let location = || format!("features[{}].geometry", i);
                let coord = feature.coordinate().ok_or_else(|| {
                    LoxoError::invalid_argument(
                        location(),
                        format!(
                            "statistics require Point geometries, found {:?}",
                            feature.geometry.geometry_type()
                        ),
                    )
                })?;
                if let Err(LoxoError::InvalidArgument { argument, reason }) = coord.validate() {
                    return Err(LoxoError::invalid_argument(location(), format!("{argument} {reason}")));
                }
                Ok(coord)
            })
            .collect()
    }

    /// Numeric values of `attribute` for every feature, in collection order.
    ///
    /// A missing attribute is reported the same way as a non-numeric one,
    /// with the value rendered as `null`.
    pub fn numeric_values(&self, attribute: &str) -> Result<Vec<f64>> {
        self.features
            .iter()
            .enumerate()
            .map(|(i, feature)| {
                let value = feature.property(attribute).unwrap_or(&AttributeValue::Null);
                value.as_f64().ok_or_else(|| LoxoError::NonNumericAttribute {
                    attribute: attribute.to_string(),
                    feature_index: i,
                    value: value.to_json().to_string(),
                })
            })
            .collect()
    }
}

impl From<Vec<Feature>> for FeatureCollection {
    fn from(features: Vec<Feature>) -> Self {
        Self::new(features)
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for FeatureCollection {
    type Item = Feature;
    type IntoIter = std::vec::IntoIter<Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.into_iter()
    }
}

impl<'a> IntoIterator for &'a FeatureCollection {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}
