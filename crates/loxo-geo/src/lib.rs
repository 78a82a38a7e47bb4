//! Loxo Geo - Distance, spatial predicates, and spatial statistics
//!
//! This crate holds the analytics engine: geodesic distance, the predicate
//! evaluator (radius, annulus, polygon, k-nearest), the statistics engine
//! (centroid, pairwise distances, Moran's I, Geary's C, IDW), GeoJSON
//! structural validation, and the result assembler.

pub mod distance;
pub mod models;
pub mod predicate;
pub mod response;
pub mod stats;
pub mod validation;

pub use distance::geodesic_distance;
pub use predicate::{evaluate_predicate, K_NEAREST_DISTANCE_PROPERTY};
pub use response::{assemble_response, Assemble, ResponseEnvelope};
pub use stats::compute_statistic;
pub use validation::{parse_feature_collection, validate_feature_collection, ValidationResult};
