//! Query-string parameters and their parsing into engine inputs.
//!
//! Coordinate lists arrive as comma-separated `lng,lat,...` strings. Radii
//! are read in the configured [`DistanceUnit`] and converted to meters here.

use loxo_core::error::{LoxoError, Result};
use loxo_core::models::{Coordinate, DistanceUnit, Query};
use serde::Deserialize;

/// Selectors accepted by `GET /loxo/{database}/collections/{dataset}`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionParams {
    pub property: Option<String>,
    pub value: Option<String>,
    pub within_proximity: Option<String>,
    pub within_donut: Option<String>,
    pub within_polygon: Option<String>,
    pub k_nearest: Option<String>,
}

/// What a collection read should return
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    All,
    Property { name: String, value: String },
    Spatial(Query),
}

impl CollectionParams {
    /// Resolve the parameters into a single selection
    pub fn selection(&self, unit: DistanceUnit) -> Result<Selection> {
        let spatial = [
            ("withinProximity", &self.within_proximity),
            ("withinDonut", &self.within_donut),
            ("withinPolygon", &self.within_polygon),
            ("kNearest", &self.k_nearest),
        ];
        let mut given = spatial.iter().filter_map(|(name, raw)| raw.as_deref().map(|raw| (*name, raw)));
        let first = given.next();

        if let Some((second, _)) = given.next() {
            return Err(LoxoError::invalid_argument(
                second,
                "only one spatial selector may be given per request",
            ));
        }

        match (&self.property, first) {
            (Some(_), Some((name, _))) => Err(LoxoError::invalid_argument(
                name,
                "property filters cannot be combined with spatial selectors",
            )),
            (Some(property), None) => {
                let value = self.value.clone().ok_or_else(|| {
                    LoxoError::invalid_argument("value", "required when filtering by property")
                })?;
                Ok(Selection::Property { name: property.clone(), value })
            }
            (None, None) => Ok(Selection::All),
            (None, Some((name, raw))) => {
                let query = match name {
                    "withinProximity" => parse_proximity(raw, unit)?,
                    "withinDonut" => parse_donut(raw, unit)?,
                    "withinPolygon" => parse_polygon(raw)?,
                    _ => parse_k_nearest(raw)?,
                };
                Ok(Selection::Spatial(query))
            }
        }
    }
}

/// Parameters of the `idw` statistic
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdwParams {
    pub interp_point: Option<String>,
    pub property: Option<String>,
}

impl IdwParams {
    pub fn point(&self) -> Result<Coordinate> {
        let raw = required("interpPoint", &self.interp_point)?;
        let values = parse_numbers("interpPoint", raw, 2)?;
        Coordinate::try_new(values[0], values[1])
    }

    pub fn attribute(&self) -> Result<String> {
        required("property", &self.property).map(str::to_string)
    }
}

/// Parameters of the autocorrelation statistics
#[derive(Debug, Default, Deserialize)]
pub struct AttributeParams {
    pub attribute: Option<String>,
}

impl AttributeParams {
    pub fn attribute(&self) -> Result<String> {
        required("attribute", &self.attribute).map(str::to_string)
    }
}

fn required<'a>(argument: &str, value: &'a Option<String>) -> Result<&'a str> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| LoxoError::invalid_argument(argument, "parameter is required"))
}

/// Parse exactly `expected` comma-separated numbers
pub fn parse_numbers(argument: &str, raw: &str, expected: usize) -> Result<Vec<f64>> {
    let values = raw
        .split(',')
        .map(|part| {
            part.trim().parse::<f64>().ok().filter(|v| v.is_finite()).ok_or_else(|| {
                LoxoError::invalid_argument(argument, format!("'{}' is not a number", part.trim()))
            })
        })
        .collect::<Result<Vec<f64>>>()?;

    if values.len() != expected {
        return Err(LoxoError::invalid_argument(
            argument,
            format!("expected {} comma-separated values, found {}", expected, values.len()),
        ));
    }
    Ok(values)
}

/// `lng,lat,radius`
pub fn parse_proximity(raw: &str, unit: DistanceUnit) -> Result<Query> {
    let v = parse_numbers("withinProximity", raw, 3)?;
    Ok(Query::radius(Coordinate::new(v[0], v[1]), unit.to_meters(v[2])))
}

/// `lng,lat,inner,outer`
pub fn parse_donut(raw: &str, unit: DistanceUnit) -> Result<Query> {
    let v = parse_numbers("withinDonut", raw, 4)?;
    Ok(Query::annulus(Coordinate::new(v[0], v[1]), unit.to_meters(v[2]), unit.to_meters(v[3])))
}

/// `[[lng,lat],[lng,lat],...]`
pub fn parse_polygon(raw: &str) -> Result<Query> {
    let ring: Vec<[f64; 2]> = serde_json::from_str(raw).map_err(|e| {
        LoxoError::invalid_argument("withinPolygon", format!("expected [[lng,lat],...]: {}", e))
    })?;
    Ok(Query::polygon(ring.into_iter().map(Coordinate::from).collect()))
}

/// `lng,lat,k`
pub fn parse_k_nearest(raw: &str) -> Result<Query> {
    let v = parse_numbers("kNearest", raw, 3)?;
    let k = v[2];
    if k < 0.0 || k.fract() != 0.0 {
        return Err(LoxoError::invalid_argument(
            "kNearest",
            format!("k must be a positive integer, found {}", k),
        ));
    }
    Ok(Query::k_nearest(Coordinate::new(v[0], v[1]), k as usize))
}
