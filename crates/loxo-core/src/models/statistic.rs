use serde::{Deserialize, Serialize};

use super::geometry::Coordinate;

/// Whether autocorrelation sums include the `i == j` self-pairs.
///
/// `Include` reproduces the historical Loxo results, where every feature is
/// weighted against itself with `w_ii = 1`. `Exclude` follows the textbook
/// definitions of Moran's I and Geary's C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SelfPairMode {
    #[default]
    Include,
    Exclude,
}

/// Tuning passed to the statistics engine by its caller
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsOptions {
    pub self_pairs: SelfPairMode,
}

impl StatsOptions {
    pub fn with_self_pairs(self_pairs: SelfPairMode) -> Self {
        Self { self_pairs }
    }
}

/// Aggregate over all unordered pairwise distances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceAggregate {
    /// Sum of pairwise distances divided by the feature count
    Mean,
    Min,
    Max,
    Total,
}

impl DistanceAggregate {
    pub fn label(&self) -> &'static str {
        match self {
            DistanceAggregate::Mean => "Average Distance (meters)",
            DistanceAggregate::Min => "Minimum Distance (meters)",
            DistanceAggregate::Max => "Maximum Distance (meters)",
            DistanceAggregate::Total => "Total Distance (meters)",
        }
    }
}

/// A statistic to compute over a feature collection
#[derive(Debug, Clone, PartialEq)]
pub enum StatisticKind {
    Count,
    Centroid,
    Distance(DistanceAggregate),
    MoransI { attribute: String },
    GearysC { attribute: String },
    Idw { point: Coordinate, attribute: String },
}

impl StatisticKind {
    /// Whether the statistic needs a pass over every pair of features
    pub fn is_pairwise(&self) -> bool {
        matches!(
            self,
            StatisticKind::Distance(_) | StatisticKind::MoransI { .. } | StatisticKind::GearysC { .. }
        )
    }

    /// Short name used in logs and error messages
    pub fn name(&self) -> &'static str {
        match self {
            StatisticKind::Count => "count",
            StatisticKind::Centroid => "centroid",
            StatisticKind::Distance(DistanceAggregate::Mean) => "average distance",
            StatisticKind::Distance(DistanceAggregate::Min) => "minimum distance",
            StatisticKind::Distance(DistanceAggregate::Max) => "maximum distance",
            StatisticKind::Distance(DistanceAggregate::Total) => "total distance",
            StatisticKind::MoransI { .. } => "Moran's I",
            StatisticKind::GearysC { .. } => "Geary's C",
            StatisticKind::Idw { .. } => "IDW interpolation",
        }
    }
}

/// The outcome of a successful statistic computation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatisticValue {
    Count(usize),
    Centroid(Coordinate),
    Distance { aggregate: DistanceAggregate, meters: f64 },
    MoransI(f64),
    GearysC(f64),
    Interpolated { point: Coordinate, value: f64 },
}

impl StatisticValue {
    /// The response label this value is published under
    pub fn label(&self) -> &'static str {
        match self {
            StatisticValue::Count(_) => "count",
            StatisticValue::Centroid(_) => "Centroid",
            StatisticValue::Distance { aggregate, .. } => aggregate.label(),
            StatisticValue::MoransI(_) => "Moran's I",
            StatisticValue::GearysC(_) => "Geary's C",
            StatisticValue::Interpolated { .. } => "Interpolated Value",
        }
    }
}
