mod collections;
mod health;
mod stats;

pub use collections::{
    delete_collection, get_collection, get_feature, ingest_collection, list_collections,
};
pub use health::health_check;
pub use stats::{
    average_distance, centroid, count, gearys_c, idw, max_distance, min_distance, morans_i,
    total_distance,
};
