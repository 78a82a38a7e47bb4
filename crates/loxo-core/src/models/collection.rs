use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::feature::FeatureCollection;
use super::geometry::GeometryType;

/// Metadata for a stored feature collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionMeta {
    /// Database the collection belongs to
    pub database: String,

    /// Dataset name, unique within its database
    pub dataset: String,

    /// Geometry type shared by all features, or `Mixed`
    pub geometry_type: GeometryType,

    /// Number of features
    pub feature_count: usize,

    /// When the collection was stored
    pub added_at: DateTime<Utc>,
}

impl CollectionMeta {
    /// Describe a collection as of now
    pub fn describe(
        database: impl Into<String>,
        dataset: impl Into<String>,
        collection: &FeatureCollection,
    ) -> Self {
        Self {
            database: database.into(),
            dataset: dataset.into(),
            geometry_type: dominant_geometry_type(collection),
            feature_count: collection.len(),
            added_at: Utc::now(),
        }
    }
}

/// The geometry type of every feature when they agree, `Mixed` otherwise.
/// An empty collection reports `Mixed`.
pub fn dominant_geometry_type(collection: &FeatureCollection) -> GeometryType {
    let mut types = collection.iter().map(|f| f.geometry.geometry_type());
    match types.next() {
        Some(first) if types.all(|t| t == first) => first,
        _ => GeometryType::Mixed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Feature, Geometry};

    #[test]
    fn test_dominant_geometry_type() {
        let points = FeatureCollection::new(vec![Feature::point(0.0, 0.0), Feature::point(1.0, 1.0)]);
        assert_eq!(dominant_geometry_type(&points), GeometryType::Point);

        let mixed = FeatureCollection::new(vec![
            Feature::point(0.0, 0.0),
            Feature::new(Geometry::line_string(vec![[0.0, 0.0], [1.0, 1.0]])),
        ]);
        assert_eq!(dominant_geometry_type(&mixed), GeometryType::Mixed);
        assert_eq!(dominant_geometry_type(&FeatureCollection::default()), GeometryType::Mixed);
    }

    #[test]
    fn test_describe() {
        let points = FeatureCollection::new(vec![Feature::point(0.0, 0.0)]);
        let meta = CollectionMeta::describe("geo", "sites", &points);
        assert_eq!(meta.database, "geo");
        assert_eq!(meta.dataset, "sites");
        assert_eq!(meta.feature_count, 1);
    }
}
