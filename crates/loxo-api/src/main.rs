use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use loxo_store::MemoryFeatureStore;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use loxo_api::config::ApiConfig;
use loxo_api::router::create_router;
use loxo_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "loxo_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api_config = ApiConfig::from_env();
    let config = api_config.load_layered().context("Failed to load configuration")?;

    tracing::info!(
        port = api_config.port,
        self_pairs = ?config.self_pairs.value,
        distance_unit = ?config.distance_unit.value,
        max_features = config.max_features.value,
        "Starting Loxo API server"
    );

    let state = Arc::new(AppState::new(Arc::new(MemoryFeatureStore::new()), config));

    let origin = api_config
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin '{}'", api_config.cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let app = create_router(state).layer(cors);

    let addr = api_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("CORS enabled for {}", api_config.cors_origin);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
