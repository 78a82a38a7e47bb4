//! Global spatial statistics over Point feature collections.
//!
//! Every pairwise statistic materializes the coordinates once and walks the
//! upper triangle of the distance matrix, so each geodesic distance is solved
//! exactly once. Results match the naive double loop over all ordered pairs
//! to floating-point tolerance.

use loxo_core::error::{LoxoError, Result};
use loxo_core::models::{
    Coordinate, DistanceAggregate, FeatureCollection, SelfPairMode, StatisticKind,
    StatisticValue, StatsOptions,
};

use crate::distance::geodesic_distance;

/// Spatial weight between two features `d` meters apart
pub fn spatial_weight(d: f64) -> f64 {
    1.0 / (1.0 + d)
}

/// Compute any supported statistic over a collection
pub fn compute_statistic(
    collection: &FeatureCollection,
    kind: &StatisticKind,
    options: StatsOptions,
) -> Result<StatisticValue> {
    tracing::debug!(statistic = kind.name(), features = collection.len(), "Computing statistic");

    match kind {
        StatisticKind::Count => Ok(StatisticValue::Count(collection.len())),
        StatisticKind::Centroid => centroid(collection).map(StatisticValue::Centroid),
        StatisticKind::Distance(aggregate) => distance_aggregate(collection, *aggregate)
            .map(|meters| StatisticValue::Distance { aggregate: *aggregate, meters }),
        StatisticKind::MoransI { attribute } => {
            morans_i(collection, attribute, options.self_pairs).map(StatisticValue::MoransI)
        }
        StatisticKind::GearysC { attribute } => {
            gearys_c(collection, attribute, options.self_pairs).map(StatisticValue::GearysC)
        }
        StatisticKind::Idw { point, attribute } => idw(collection, *point, attribute)
            .map(|value| StatisticValue::Interpolated { point: *point, value }),
    }
}

/// Arithmetic mean of longitudes and latitudes, independently
pub fn centroid(collection: &FeatureCollection) -> Result<Coordinate> {
    let coords = collection.point_coordinates()?;
    if coords.is_empty() {
        return Err(LoxoError::insufficient_data("Centroid", 1, 0));
    }

    let n = coords.len() as f64;
    let (lon_sum, lat_sum) =
        coords.iter().fold((0.0, 0.0), |(lon, lat), c| (lon + c.lon, lat + c.lat));

    Ok(Coordinate::new(lon_sum / n, lat_sum / n))
}

/// Summary of every unordered pairwise distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairwiseDistances {
    pub features: usize,
    pub pairs: usize,
    pub total: f64,
    pub min: f64,
    pub max: f64,
}

impl PairwiseDistances {
    /// Sum of pairwise distances divided by the number of features, not by
    /// the number of pairs
    pub fn mean(&self) -> f64 {
        self.total / self.features as f64
    }

    pub fn get(&self, aggregate: DistanceAggregate) -> f64 {
        match aggregate {
            DistanceAggregate::Mean => self.mean(),
            DistanceAggregate::Min => self.min,
            DistanceAggregate::Max => self.max,
            DistanceAggregate::Total => self.total,
        }
    }
}

/// Visit every unordered pair `{i, j}, i < j` once with its distance
fn for_each_pair<F>(coords: &[Coordinate], mut visit: F)
where
    F: FnMut(usize, usize, f64),
{
    for (i, a) in coords.iter().enumerate() {
        for (j, b) in coords.iter().enumerate().skip(i + 1) {
            visit(i, j, geodesic_distance(*a, *b));
        }
    }
}

/// Distance statistics over all unordered pairs; needs at least two features
pub fn pairwise_distances(collection: &FeatureCollection) -> Result<PairwiseDistances> {
    let coords = collection.point_coordinates()?;
    if coords.len() < 2 {
        return Err(LoxoError::insufficient_data("Pairwise distance", 2, coords.len()));
    }

    let mut summary = PairwiseDistances {
        features: coords.len(),
        pairs: 0,
        total: 0.0,
        min: f64::INFINITY,
        max: 0.0,
    };

    for_each_pair(&coords, |_, _, d| {
        summary.pairs += 1;
        summary.total += d;
        summary.min = summary.min.min(d);
        summary.max = summary.max.max(d);
    });

    Ok(summary)
}

pub fn distance_aggregate(collection: &FeatureCollection, aggregate: DistanceAggregate) -> Result<f64> {
    pairwise_distances(collection).map(|summary| summary.get(aggregate))
}

/// Weighted sums shared by Moran's I and Geary's C
#[derive(Debug, Clone, Copy)]
struct AutocorrelationTerms {
    n: f64,
    /// S0, the sum of all weights
    weight_sum: f64,
    /// Σ w_ij (x_i - x̄)(x_j - x̄)
    cross_products: f64,
    /// Σ w_ij (x_i - x_j)²
    squared_differences: f64,
    /// Σ (x_i - x̄)²
    deviation_sum: f64,
}

fn autocorrelation_terms(
    collection: &FeatureCollection,
    attribute: &str,
    self_pairs: SelfPairMode,
    operation: &str,
) -> Result<AutocorrelationTerms> {
    let coords = collection.point_coordinates()?;
    let values = collection.numeric_values(attribute)?;
    if coords.len() < 2 {
        return Err(LoxoError::insufficient_data(operation, 2, coords.len()));
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let deviations: Vec<f64> = values.iter().map(|x| x - mean).collect();
    let deviation_sum: f64 = deviations.iter().map(|z| z * z).sum();

    if deviation_sum == 0.0 || values.iter().all(|x| *x == values[0]) {
        return Err(LoxoError::degenerate(
            operation,
            format!("attribute '{}' has zero variance", attribute),
        ));
    }

    let mut terms = AutocorrelationTerms {
        n,
        weight_sum: 0.0,
        cross_products: 0.0,
        squared_differences: 0.0,
        deviation_sum,
    };

    // Each unordered pair stands for both (i, j) and (j, i)
    for_each_pair(&coords, |i, j, d| {
        let w = spatial_weight(d);
        terms.weight_sum += 2.0 * w;
        terms.cross_products += 2.0 * w * deviations[i] * deviations[j];
        terms.squared_differences += 2.0 * w * (values[i] - values[j]).powi(2);
    });

    if self_pairs == SelfPairMode::Include {
        // w_ii = 1 / (1 + 0); (x_i - x_i)² contributes nothing
        terms.weight_sum += n;
        terms.cross_products += deviation_sum;
    }

    Ok(terms)
}

/// Global Moran's I for `attribute` with weights `1 / (1 + d)`
pub fn morans_i(collection: &FeatureCollection, attribute: &str, self_pairs: SelfPairMode) -> Result<f64> {
    let t = autocorrelation_terms(collection, attribute, self_pairs, "Moran's I")?;
    Ok((t.n / t.weight_sum) * (t.cross_products / t.deviation_sum))
}

/// Global Geary's C for `attribute` with weights `1 / (1 + d)`
pub fn gearys_c(collection: &FeatureCollection, attribute: &str, self_pairs: SelfPairMode) -> Result<f64> {
    let t = autocorrelation_terms(collection, attribute, self_pairs, "Geary's C")?;
    Ok(((t.n - 1.0) * t.squared_differences) / (2.0 * t.weight_sum * t.deviation_sum))
}

/// Inverse-distance-weighted estimate of `attribute` at `point`
pub fn idw(collection: &FeatureCollection, point: Coordinate, attribute: &str) -> Result<f64> {
    point.validate()?;
    let coords = collection.point_coordinates()?;
    let values = collection.numeric_values(attribute)?;
    if coords.is_empty() {
        return Err(LoxoError::insufficient_data("IDW interpolation", 1, 0));
    }

    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for (i, (coord, value)) in coords.iter().zip(&values).enumerate() {
        let d = geodesic_distance(point, *coord);
        if d == 0.0 {
            return Err(LoxoError::degenerate(
                "IDW interpolation",
                format!("query point coincides with feature {}", i),
            ));
        }
        numerator += value / d;
        denominator += 1.0 / d;
    }

    Ok(numerator / denominator)
}
