use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let stats = Router::new()
        .route("/count", get(handlers::count))
        .route("/centroid", get(handlers::centroid))
        .route("/averageDistance", get(handlers::average_distance))
        .route("/minDistance", get(handlers::min_distance))
        .route("/maxDistance", get(handlers::max_distance))
        .route("/totalDistance", get(handlers::total_distance))
        .route("/idw", get(handlers::idw))
        .route("/moransI", get(handlers::morans_i))
        .route("/gearysC", get(handlers::gearys_c));

    Router::new()
        // Health
        .route("/health", get(handlers::health_check))

        // Collections
        .route("/loxo/{database}/collections", get(handlers::list_collections))
        .route(
            "/loxo/{database}/collections/{dataset}",
            get(handlers::get_collection)
                .post(handlers::ingest_collection)
                .delete(handlers::delete_collection),
        )
        .route("/loxo/{database}/collections/{dataset}/{id}", get(handlers::get_feature))

        // Statistics
        .nest("/loxo/{database}/collections/{dataset}/stats", stats)

        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
