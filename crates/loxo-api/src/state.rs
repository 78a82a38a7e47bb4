use loxo_core::config::LayeredConfig;
use loxo_store::FeatureStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FeatureStore>,
    pub config: LayeredConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn FeatureStore>, config: LayeredConfig) -> Self {
        Self { store, config }
    }
}
