use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use loxo_core::models::{DistanceAggregate, StatisticKind, StatisticValue};
use loxo_geo::{assemble_response, compute_statistic, ResponseEnvelope};

use crate::dto::{AttributeParams, IdwParams};
use crate::error::ApiError;
use crate::state::AppState;

type StatResult = Result<Json<ResponseEnvelope>, ApiError>;

/// Fetch a collection and run a statistic on the blocking pool
async fn run_statistic(state: &AppState, database: &str, dataset: &str, kind: StatisticKind) -> StatResult {
    let collection = state.store.fetch_collection(database, dataset).await?;

    let max_features = state.config.max_features.value;
    if kind.is_pairwise() && collection.len() > max_features {
        return Err(ApiError::unprocessable(format!(
            "{} over {} features exceeds the configured limit of {}",
            kind.name(),
            collection.len(),
            max_features
        )));
    }

    tracing::info!(
        database = %database,
        dataset = %dataset,
        statistic = kind.name(),
        features = collection.len(),
        "Computing statistic"
    );

    let options = state.config.stats_options();
    let value = tokio::task::spawn_blocking(move || compute_statistic(&collection, &kind, options))
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Statistic task failed");
            ApiError::internal("Statistic computation failed").with_details(e.to_string())
        })??;

    Ok(Json(assemble_response(&value)?))
}

pub async fn count(
    State(state): State<Arc<AppState>>,
    Path((database, dataset)): Path<(String, String)>,
) -> StatResult {
    let n = state.store.count(&database, &dataset).await?;
    Ok(Json(assemble_response(&StatisticValue::Count(n))?))
}

pub async fn centroid(
    State(state): State<Arc<AppState>>,
    Path((database, dataset)): Path<(String, String)>,
) -> StatResult {
    run_statistic(&state, &database, &dataset, StatisticKind::Centroid).await
}

pub async fn average_distance(
    State(state): State<Arc<AppState>>,
    Path((database, dataset)): Path<(String, String)>,
) -> StatResult {
    run_statistic(&state, &database, &dataset, StatisticKind::Distance(DistanceAggregate::Mean)).await
}

pub async fn min_distance(
    State(state): State<Arc<AppState>>,
    Path((database, dataset)): Path<(String, String)>,
) -> StatResult {
    run_statistic(&state, &database, &dataset, StatisticKind::Distance(DistanceAggregate::Min)).await
}

pub async fn max_distance(
    State(state): State<Arc<AppState>>,
    Path((database, dataset)): Path<(String, String)>,
) -> StatResult {
    run_statistic(&state, &database, &dataset, StatisticKind::Distance(DistanceAggregate::Max)).await
}

pub async fn total_distance(
    State(state): State<Arc<AppState>>,
    Path((database, dataset)): Path<(String, String)>,
) -> StatResult {
    run_statistic(&state, &database, &dataset, StatisticKind::Distance(DistanceAggregate::Total)).await
}

pub async fn idw(
    State(state): State<Arc<AppState>>,
    Path((database, dataset)): Path<(String, String)>,
    Query(params): Query<IdwParams>,
) -> StatResult {
    let kind = StatisticKind::Idw { point: params.point()?, attribute: params.attribute()? };
    run_statistic(&state, &database, &dataset, kind).await
}

pub async fn morans_i(
    State(state): State<Arc<AppState>>,
    Path((database, dataset)): Path<(String, String)>,
    Query(params): Query<AttributeParams>,
) -> StatResult {
    let kind = StatisticKind::MoransI { attribute: params.attribute()? };
    run_statistic(&state, &database, &dataset, kind).await
}

pub async fn gearys_c(
    State(state): State<Arc<AppState>>,
    Path((database, dataset)): Path<(String, String)>,
    Query(params): Query<AttributeParams>,
) -> StatResult {
    let kind = StatisticKind::GearysC { attribute: params.attribute()? };
    run_statistic(&state, &database, &dataset, kind).await
}
