pub mod collection;
pub mod feature;
pub mod geometry;
pub mod query;
pub mod statistic;

pub use collection::CollectionMeta;
pub use feature::{AttributeValue, Feature, FeatureCollection, FeatureId, LOXO_ID_PROPERTY};
pub use geometry::{Coordinate, DistanceUnit, Geometry, GeometryType};
pub use query::Query;
pub use statistic::{DistanceAggregate, SelfPairMode, StatisticKind, StatisticValue, StatsOptions};
