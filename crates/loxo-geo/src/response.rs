//! Result assembly
//!
//! Feature results are published as GeoJSON FeatureCollections, statistics
//! as a single-entry JSON object keyed by the statistic's label.

use loxo_core::error::{LoxoError, Result};
use loxo_core::models::{Feature, FeatureCollection, StatisticValue};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// The JSON document returned to a caller
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseEnvelope {
    Features(geojson::FeatureCollection),
    Feature(geojson::Feature),
    Scalar(Map<String, Value>),
}

impl ResponseEnvelope {
    pub fn to_json(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Anything that can be published as a [`ResponseEnvelope`]
pub trait Assemble {
    fn assemble(&self) -> Result<ResponseEnvelope>;
}

impl Assemble for FeatureCollection {
    fn assemble(&self) -> Result<ResponseEnvelope> {
        let features = self.iter().map(to_geojson_feature).collect::<Result<Vec<_>>>()?;
        Ok(ResponseEnvelope::Features(geojson::FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }))
    }
}

impl Assemble for Feature {
    fn assemble(&self) -> Result<ResponseEnvelope> {
        to_geojson_feature(self).map(ResponseEnvelope::Feature)
    }
}

impl Assemble for StatisticValue {
    fn assemble(&self) -> Result<ResponseEnvelope> {
        let value = match self {
            StatisticValue::Count(n) => json!(n),
            StatisticValue::Centroid(c) => json!({ "x": c.lon, "y": c.lat }),
            StatisticValue::Distance { meters, .. } => json!(meters),
            StatisticValue::MoransI(v) | StatisticValue::GearysC(v) => json!(v),
            StatisticValue::Interpolated { point, value } => {
                let mut map = Map::new();
                map.insert("Point".to_string(), json!(point.to_array()));
                map.insert(self.label().to_string(), json!(value));
                return Ok(ResponseEnvelope::Scalar(map));
            }
        };

        let mut map = Map::new();
        map.insert(self.label().to_string(), value);
        Ok(ResponseEnvelope::Scalar(map))
    }
}

/// Assemble any result into its response envelope
pub fn assemble_response<T: Assemble + ?Sized>(result: &T) -> Result<ResponseEnvelope> {
    result.assemble()
}

fn to_geojson_feature(feature: &Feature) -> Result<geojson::Feature> {
    let geometry = geojson::Geometry::from_json_value(feature.geometry.to_geojson())
        .map_err(|e| LoxoError::Serialization(e.to_string()))?;

    let properties = feature
        .properties
        .iter()
        .map(|(name, value)| (name.clone(), value.to_json()))
        .collect::<Map<String, Value>>();

    Ok(geojson::Feature {
        bbox: None,
        geometry: Some(geometry),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    })
}
