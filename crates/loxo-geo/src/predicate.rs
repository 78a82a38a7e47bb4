use geo::algorithm::intersects::Intersects;
use loxo_core::error::Result;
use loxo_core::models::{AttributeValue, Coordinate, Feature, FeatureCollection, Query};

use crate::distance::geodesic_distance;
use crate::models::{ring_to_polygon, GeometryExt};

/// Property attached to k-nearest results holding the distance to the query
/// center, in meters
pub const K_NEAREST_DISTANCE_PROPERTY: &str = "kNearestDistance";

/// Evaluate a proximity or containment query against a collection.
///
/// Radius, annulus and polygon results keep collection order. K-nearest
/// results are sorted ascending by distance with ties kept in collection
/// order, and each carries [`K_NEAREST_DISTANCE_PROPERTY`]. Features whose
/// geometry has no representative coordinate never match.
pub fn evaluate_predicate(collection: &FeatureCollection, query: &Query) -> Result<FeatureCollection> {
    query.validate()?;

    let result = match query {
        Query::Radius { center, radius_m } => {
            filter_by_distance(collection, *center, |d| d <= *radius_m)
        }
        Query::Annulus { center, inner_m, outer_m } => {
            filter_by_distance(collection, *center, |d| *inner_m <= d && d <= *outer_m)
        }
        Query::Polygon { ring } => filter_within_ring(collection, ring),
        Query::KNearest { center, k } => k_nearest(collection, *center, *k),
    };

    tracing::debug!(
        query = query.name(),
        features = collection.len(),
        matched = result.len(),
        "Evaluated spatial predicate"
    );

    Ok(result)
}

fn located<'a>(
    collection: &'a FeatureCollection,
) -> impl Iterator<Item = (&'a Feature, Coordinate)> + 'a {
    collection
        .iter()
        .filter_map(|feature| feature.geometry.representative_coordinate().map(|c| (feature, c)))
}

fn filter_by_distance<F>(collection: &FeatureCollection, center: Coordinate, keep: F) -> FeatureCollection
where
    F: Fn(f64) -> bool,
{
    located(collection)
        .filter(|(_, coord)| keep(geodesic_distance(center, *coord)))
        .map(|(feature, _)| feature.clone())
        .collect()
}

/// Planar point-in-polygon on the (lon, lat) plane; boundary points match
fn filter_within_ring(collection: &FeatureCollection, ring: &[Coordinate]) -> FeatureCollection {
    let polygon = ring_to_polygon(ring);

    located(collection)
        .filter(|(_, coord)| polygon.intersects(&geo::Point::new(coord.lon, coord.lat)))
        .map(|(feature, _)| feature.clone())
        .collect()
}

fn k_nearest(collection: &FeatureCollection, center: Coordinate, k: usize) -> FeatureCollection {
    let mut ranked: Vec<(&Feature, f64)> = located(collection)
        .map(|(feature, coord)| (feature, geodesic_distance(center, coord)))
        .collect();

    // sort_by is stable, so equal distances keep collection order
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

    ranked
        .into_iter()
        .take(k)
        .map(|(feature, distance)| {
            feature.clone().with_property(K_NEAREST_DISTANCE_PROPERTY, AttributeValue::Number(distance))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use loxo_core::error::ErrorKind;
    use loxo_core::models::Geometry;
    use proptest::prelude::*;

    fn named(lon: f64, lat: f64, name: &str) -> Feature {
        Feature::point(lon, lat).with_property("name", name)
    }

    fn names(collection: &FeatureCollection) -> Vec<String> {
        collection.iter().map(|f| f.property("name").map(|v| v.to_string()).unwrap_or_default()).collect()
    }

    fn bali() -> FeatureCollection {
        FeatureCollection::new(vec![
            named(115.2625, -8.5069, "ubud"),
            named(115.2725, -8.5069, "east"), // ~1.1km from ubud
            named(115.3625, -8.5069, "far"),  // ~11km from ubud
        ])
    }

    #[test]
    fn test_radius_keeps_collection_order() {
        let center = Coordinate::new(115.2625, -8.5069);
        let result = evaluate_predicate(&bali(), &Query::radius(center, 2000.0)).unwrap();
        assert_eq!(names(&result), vec!["ubud", "east"]);

        let result = evaluate_predicate(&bali(), &Query::radius(center, 500.0)).unwrap();
        assert_eq!(names(&result), vec!["ubud"]);
    }

    #[test]
    fn test_zero_radius_matches_exact_center_only() {
        let collection = FeatureCollection::new(vec![
            named(10.0, 10.0, "a"),
            named(10.0, 10.000001, "b"),
            named(10.0, 10.0, "c"),
        ]);
        let result =
            evaluate_predicate(&collection, &Query::radius(Coordinate::new(10.0, 10.0), 0.0)).unwrap();
        assert_eq!(names(&result), vec!["a", "c"]);
    }

    #[test]
    fn test_annulus_excludes_inner_disc() {
        let center = Coordinate::new(115.2625, -8.5069);
        let result = evaluate_predicate(&bali(), &Query::annulus(center, 500.0, 20_000.0)).unwrap();
        assert_eq!(names(&result), vec!["east", "far"]);
    }

    #[test]
    fn test_annulus_bounds_are_inclusive() {
        let center = Coordinate::new(0.0, 0.0);
        let edge = Coordinate::new(0.0, 1.0);
        let d = geodesic_distance(center, edge);
        let collection = FeatureCollection::new(vec![named(0.0, 1.0, "edge")]);

        let result = evaluate_predicate(&collection, &Query::annulus(center, d, d)).unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_polygon_includes_boundary() {
        let collection = FeatureCollection::new(vec![
            named(0.5, 0.5, "inside"),
            named(1.0, 0.5, "edge"),
            named(0.0, 0.0, "vertex"),
            named(1.5, 0.5, "outside"),
        ]);
        let ring = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(1.0, 0.0),
            Coordinate::new(1.0, 1.0),
            Coordinate::new(0.0, 1.0),
        ];
        let result = evaluate_predicate(&collection, &Query::polygon(ring)).unwrap();
        assert_eq!(names(&result), vec!["inside", "edge", "vertex"]);
    }

    #[test]
    fn test_self_intersecting_ring_does_not_panic() {
        let bowtie = vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(2.0, 2.0),
            Coordinate::new(2.0, 0.0),
            Coordinate::new(0.0, 2.0),
        ];
        let collection = FeatureCollection::new(vec![named(1.0, 0.5, "a"), named(5.0, 5.0, "b")]);
        let result = evaluate_predicate(&collection, &Query::polygon(bowtie)).unwrap();
        assert!(result.len() <= 2);
        assert!(!names(&result).contains(&"b".to_string()));
    }

    #[test]
    fn test_k_nearest_sorted_with_distance_attached() {
        let center = Coordinate::new(115.3625, -8.5069);
        let result = evaluate_predicate(&bali(), &Query::k_nearest(center, 2)).unwrap();
        assert_eq!(names(&result), vec!["far", "east"]);

        let distances: Vec<f64> = result
            .iter()
            .map(|f| f.property(K_NEAREST_DISTANCE_PROPERTY).and_then(|v| v.as_f64()).unwrap())
            .collect();
        assert_eq!(distances[0], 0.0);
        assert!(distances[1] > 9_000.0);
    }

    #[test]
    fn test_k_nearest_does_not_mutate_input() {
        let collection = bali();
        let before = collection.clone();
        let _ = evaluate_predicate(&collection, &Query::k_nearest(Coordinate::new(115.0, -8.0), 3)).unwrap();
        assert_eq!(collection, before);
    }

    #[test]
    fn test_k_nearest_ties_keep_collection_order() {
        let collection = FeatureCollection::new(vec![
            named(0.0, 1.0, "first"),
            named(0.0, 1.0, "second"),
            named(0.0, 0.5, "close"),
        ]);
        let result =
            evaluate_predicate(&collection, &Query::k_nearest(Coordinate::new(0.0, 0.0), 3)).unwrap();
        assert_eq!(names(&result), vec!["close", "first", "second"]);
    }

    #[test]
    fn test_non_point_geometries_use_centroid() {
        let parcel = Feature::new(Geometry::polygon(vec![vec![
            [115.26, -8.50],
            [115.27, -8.50],
            [115.27, -8.51],
            [115.26, -8.51],
            [115.26, -8.50],
        ]]))
        .with_property("name", "parcel");
        let collection = FeatureCollection::new(vec![parcel]);

        let near = Query::radius(Coordinate::new(115.265, -8.505), 100.0);
        assert_eq!(evaluate_predicate(&collection, &near).unwrap().len(), 1);

        let far = Query::radius(Coordinate::new(115.40, -8.50), 5000.0);
        assert!(evaluate_predicate(&collection, &far).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_queries_rejected() {
        let center = Coordinate::new(0.0, 0.0);
        for query in [
            Query::radius(center, -1.0),
            Query::annulus(center, 10.0, 5.0),
            Query::polygon(vec![center, center]),
            Query::k_nearest(center, 0),
        ] {
            let err = evaluate_predicate(&bali(), &query).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidArgument, "query {:?}", query);
        }
    }

    fn arb_collection() -> impl Strategy<Value = FeatureCollection> {
        prop::collection::vec((-10.0f64..10.0, -10.0f64..10.0), 0..25).prop_map(|points| {
            points
                .into_iter()
                .enumerate()
                .map(|(i, (lon, lat))| Feature::point(lon, lat).with_property("i", i as i64))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_radius_equals_annulus_from_zero(
            collection in arb_collection(),
            lon in -10.0f64..10.0, lat in -10.0f64..10.0,
            radius in 0.0f64..1_500_000.0,
        ) {
            let center = Coordinate::new(lon, lat);
            let by_radius = evaluate_predicate(&collection, &Query::radius(center, radius)).unwrap();
            let by_annulus = evaluate_predicate(&collection, &Query::annulus(center, 0.0, radius)).unwrap();
            prop_assert_eq!(by_radius, by_annulus);
        }

        #[test]
        fn prop_k_nearest_beyond_size_returns_everything_sorted(
            collection in arb_collection(),
            lon in -10.0f64..10.0, lat in -10.0f64..10.0,
        ) {
            let center = Coordinate::new(lon, lat);
            let k = collection.len() + 5;
            let result = evaluate_predicate(&collection, &Query::k_nearest(center, k)).unwrap();
            prop_assert_eq!(result.len(), collection.len());

            let distances: Vec<f64> = result
                .iter()
                .map(|f| f.property(K_NEAREST_DISTANCE_PROPERTY).and_then(|v| v.as_f64()).unwrap())
                .collect();
            prop_assert!(distances.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
