//! End-to-end analytics over a small raw GeoJSON collection
//!
//! Parses a FeatureCollection, runs every query shape and statistic over it
//! and checks the assembled response documents.

use loxo_core::models::{
    Coordinate, DistanceAggregate, Query, StatisticKind, StatisticValue, StatsOptions,
};
use loxo_core::{ErrorKind, LoxoError};
use loxo_geo::{
    assemble_response, compute_statistic, evaluate_predicate, geodesic_distance,
    parse_feature_collection, K_NEAREST_DISTANCE_PROPERTY,
};
use serde_json::json;

fn sample() -> loxo_core::models::FeatureCollection {
    let data = json!({
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "geometry": { "type": "Point", "coordinates": [0.0, 0.0] }, "properties": { "name": "origin", "v": 1 } },
            { "type": "Feature", "geometry": { "type": "Point", "coordinates": [0.0, 1.0] }, "properties": { "name": "north", "v": 3 } },
            { "type": "Feature", "geometry": { "type": "Point", "coordinates": [1.0, 0.0] }, "properties": { "name": "east", "v": "5" } }
        ]
    });
    parse_feature_collection(&data).unwrap()
}

#[test]
fn test_idw_between_observations() {
    let collection = sample();
    let kind = StatisticKind::Idw { point: Coordinate::new(0.5, 0.5), attribute: "v".to_string() };

    let value = compute_statistic(&collection, &kind, StatsOptions::default()).unwrap();
    let StatisticValue::Interpolated { value, .. } = value else {
        panic!("expected an interpolated value, got {:?}", value);
    };
    assert!(value > 1.0 && value < 5.0, "interpolated {}", value);
}

#[test]
fn test_polygon_covers_everything() {
    let collection = sample();
    let ring = vec![
        Coordinate::new(-1.0, -1.0),
        Coordinate::new(2.0, -1.0),
        Coordinate::new(2.0, 2.0),
        Coordinate::new(-1.0, 2.0),
    ];

    let result = evaluate_predicate(&collection, &Query::polygon(ring)).unwrap();
    assert_eq!(result, collection);
}

#[test]
fn test_nearest_and_radius() {
    let collection = sample();

    let nearest = evaluate_predicate(&collection, &Query::k_nearest(Coordinate::new(0.0, 0.0), 1)).unwrap();
    assert_eq!(nearest.len(), 1);
    assert_eq!(nearest.features[0].property("name").unwrap().to_string(), "origin");
    assert_eq!(nearest.features[0].property(K_NEAREST_DISTANCE_PROPERTY).unwrap().as_f64(), Some(0.0));

    // One degree of latitude is ~110.6 km, one degree of longitude at the equator ~111.3 km
    let within = evaluate_predicate(&collection, &Query::radius(Coordinate::new(0.0, 0.0), 111_000.0)).unwrap();
    let names: Vec<String> = within.iter().map(|f| f.property("name").unwrap().to_string()).collect();
    assert_eq!(names, vec!["origin", "north"]);

    let ring = evaluate_predicate(
        &collection,
        &Query::annulus(Coordinate::new(0.0, 0.0), 1.0, 200_000.0),
    )
    .unwrap();
    assert_eq!(ring.len(), 2);
}

#[test]
fn test_distance_aggregates_consistent() {
    let collection = sample();
    let options = StatsOptions::default();
    let get = |aggregate| match compute_statistic(&collection, &StatisticKind::Distance(aggregate), options).unwrap() {
        StatisticValue::Distance { meters, .. } => meters,
        other => panic!("unexpected {:?}", other),
    };

    let total = get(DistanceAggregate::Total);
    let a = Coordinate::new(0.0, 0.0);
    let b = Coordinate::new(0.0, 1.0);
    let c = Coordinate::new(1.0, 0.0);
    let expected = geodesic_distance(a, b) + geodesic_distance(a, c) + geodesic_distance(b, c);
    assert!((total - expected).abs() < 1e-6);
    assert!((get(DistanceAggregate::Mean) - total / 3.0).abs() < 1e-6);
    assert!(get(DistanceAggregate::Min) <= get(DistanceAggregate::Max));
    assert!((get(DistanceAggregate::Min) - geodesic_distance(a, b)).abs() < 1e-9);
}

#[test]
fn test_assembled_documents() {
    let collection = sample();

    let json = assemble_response(&collection).unwrap().to_json().unwrap();
    assert_eq!(json["type"], "FeatureCollection");
    assert_eq!(json["features"][2]["properties"]["v"], "5");

    let centroid = compute_statistic(&collection, &StatisticKind::Centroid, StatsOptions::default()).unwrap();
    let json = assemble_response(&centroid).unwrap().to_json().unwrap();
    assert!((json["Centroid"]["x"].as_f64().unwrap() - 1.0 / 3.0).abs() < 1e-12);
    assert!((json["Centroid"]["y"].as_f64().unwrap() - 1.0 / 3.0).abs() < 1e-12);
}

#[test]
fn test_errors_carry_kind() {
    let collection = sample();

    let err = compute_statistic(
        &collection,
        &StatisticKind::MoransI { attribute: "name".to_string() },
        StatsOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NonNumericAttribute);

    let err = evaluate_predicate(&collection, &Query::k_nearest(Coordinate::new(0.0, 0.0), 0)).unwrap_err();
    assert!(matches!(err, LoxoError::InvalidArgument { .. }));
}
