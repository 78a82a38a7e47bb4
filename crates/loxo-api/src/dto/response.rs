use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use loxo_core::config::{ConfigSource, LayeredConfig};
use loxo_core::models::CollectionMeta;
use serde::Serialize;

/// Health check response, including the effective configuration
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub config: BTreeMap<String, ConfigEntry>,
}

/// A resolved configuration value and the layer it came from
#[derive(Debug, Serialize)]
pub struct ConfigEntry {
    pub value: String,
    pub source: ConfigSource,
}

impl HealthResponse {
    pub fn new(config: &LayeredConfig) -> Self {
        Self {
            status: "ok".to_string(),
            service: "loxo-api".to_string(),
            config: config
                .to_inspection_map()
                .into_iter()
                .map(|(key, (value, source))| (key, ConfigEntry { value, source }))
                .collect(),
        }
    }
}

/// Stored collection summary
#[derive(Debug, Serialize)]
pub struct CollectionInfo {
    pub dataset: String,
    #[serde(rename = "type")]
    pub geometry_type: String,
    pub count: usize,
    pub added_at: DateTime<Utc>,
}

impl From<&CollectionMeta> for CollectionInfo {
    fn from(meta: &CollectionMeta) -> Self {
        Self {
            dataset: meta.dataset.clone(),
            geometry_type: format!("{:?}", meta.geometry_type),
            count: meta.feature_count,
            added_at: meta.added_at,
        }
    }
}

/// Ingest operation response
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub success: bool,
    pub database: String,
    pub dataset: String,
    pub feature_count: usize,
    pub message: String,
}

impl IngestResponse {
    pub fn success(meta: &CollectionMeta) -> Self {
        Self {
            success: true,
            database: meta.database.clone(),
            dataset: meta.dataset.clone(),
            feature_count: meta.feature_count,
            message: format!(
                "Successfully ingested {} with {} features",
                meta.dataset, meta.feature_count
            ),
        }
    }
}
