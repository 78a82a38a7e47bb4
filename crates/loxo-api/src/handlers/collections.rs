use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use loxo_core::models::FeatureId;
use loxo_geo::{assemble_response, evaluate_predicate, parse_feature_collection, ResponseEnvelope};
use serde_json::Value;

use crate::dto::{CollectionInfo, CollectionParams, IngestResponse, Selection};
use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_collections(
    State(state): State<Arc<AppState>>,
    Path(database): Path<String>,
) -> Result<Json<Vec<CollectionInfo>>, ApiError> {
    tracing::info!(database = %database, "Listing collections");

    let metas = state.store.list_collections(&database).await?;
    Ok(Json(metas.iter().map(CollectionInfo::from).collect()))
}

pub async fn ingest_collection(
    State(state): State<Arc<AppState>>,
    Path((database, dataset)): Path<(String, String)>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<IngestResponse>), ApiError> {
    tracing::info!(database = %database, dataset = %dataset, "Ingesting collection");

    let collection = parse_feature_collection(&body).map_err(|e| {
        tracing::warn!(error = %e, "Rejected GeoJSON upload");
        ApiError::from(e)
    })?;

    let meta = state.store.store_collection(&database, &dataset, collection).await?;

    tracing::info!(
        database = %database,
        dataset = %dataset,
        features = meta.feature_count,
        "Collection stored"
    );

    Ok((StatusCode::CREATED, Json(IngestResponse::success(&meta))))
}

pub async fn delete_collection(
    State(state): State<Arc<AppState>>,
    Path((database, dataset)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    tracing::info!(database = %database, dataset = %dataset, "Deleting collection");

    state.store.delete_collection(&database, &dataset).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_collection(
    State(state): State<Arc<AppState>>,
    Path((database, dataset)): Path<(String, String)>,
    Query(params): Query<CollectionParams>,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    let selection = params.selection(state.config.distance_unit.value)?;

    tracing::info!(database = %database, dataset = %dataset, selection = ?selection, "Reading collection");

    let collection = match selection {
        Selection::All => state.store.fetch_collection(&database, &dataset).await?,
        Selection::Property { name, value } => {
            state.store.find_by_property(&database, &dataset, &name, &value).await?
        }
        Selection::Spatial(query) => {
            let collection = state.store.fetch_collection(&database, &dataset).await?;
            evaluate_predicate(&collection, &query)?
        }
    };

    Ok(Json(assemble_response(&collection)?))
}

pub async fn get_feature(
    State(state): State<Arc<AppState>>,
    Path((database, dataset, id)): Path<(String, String, u64)>,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    tracing::info!(database = %database, dataset = %dataset, id, "Reading feature");

    let feature = state.store.get_feature(&database, &dataset, FeatureId(id)).await?;
    Ok(Json(assemble_response(&feature)?))
}
