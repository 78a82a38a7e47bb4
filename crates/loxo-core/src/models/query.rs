use serde::{Deserialize, Serialize};

use super::geometry::Coordinate;
use crate::error::{LoxoError, Result};

/// Proximity and containment queries over a feature collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Query {
    /// Features within `radius_m` meters of `center`
    Radius { center: Coordinate, radius_m: f64 },

    /// Features between `inner_m` and `outer_m` meters of `center`, inclusive
    Annulus {
        center: Coordinate,
        inner_m: f64,
        outer_m: f64,
    },

    /// Features inside or on the boundary of an implicitly closed ring
    Polygon { ring: Vec<Coordinate> },

    /// The `k` features closest to `center`
    KNearest { center: Coordinate, k: usize },
}

impl Query {
    pub fn radius(center: Coordinate, radius_m: f64) -> Self {
        Query::Radius { center, radius_m }
    }

    pub fn annulus(center: Coordinate, inner_m: f64, outer_m: f64) -> Self {
        Query::Annulus { center, inner_m, outer_m }
    }

    pub fn polygon(ring: Vec<Coordinate>) -> Self {
        Query::Polygon { ring }
    }

    pub fn k_nearest(center: Coordinate, k: usize) -> Self {
        Query::KNearest { center, k }
    }

    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Query::Radius { .. } => "radius",
            Query::Annulus { .. } => "annulus",
            Query::Polygon { .. } => "polygon",
            Query::KNearest { .. } => "k_nearest",
        }
    }

    /// Check the query parameters before evaluation
    pub fn validate(&self) -> Result<()> {
        match self {
            Query::Radius { center, radius_m } => {
                center.validate()?;
                non_negative("radius", *radius_m)
            }
            Query::Annulus { center, inner_m, outer_m } => {
                center.validate()?;
                non_negative("inner radius", *inner_m)?;
                non_negative("outer radius", *outer_m)?;
                if inner_m > outer_m {
                    return Err(LoxoError::invalid_argument(
                        "inner radius",
                        format!("inner radius {} exceeds outer radius {}", inner_m, outer_m),
                    ));
                }
                Ok(())
            }
            Query::Polygon { ring } => {
                if ring.len() < 3 {
                    return Err(LoxoError::invalid_argument(
                        "ring",
                        format!("polygon ring needs at least 3 coordinates, found {}", ring.len()),
                    ));
                }
                ring.iter().try_for_each(Coordinate::validate)
            }
            Query::KNearest { center, k } => {
                center.validate()?;
                if *k == 0 {
                    return Err(LoxoError::invalid_argument("k", "k must be greater than 0"));
                }
                Ok(())
            }
        }
    }
}

fn non_negative(argument: &str, value: f64) -> Result<()> {
    if value.is_nan() || value < 0.0 {
        return Err(LoxoError::invalid_argument(
            argument,
            format!("{} must be a non-negative number of meters, got {}", argument, value),
        ));
    }
    Ok(())
}
