use async_trait::async_trait;
use loxo_core::error::Result;
use loxo_core::models::{CollectionMeta, Feature, FeatureCollection, FeatureId};

/// Port for feature collection storage
///
/// Collections are addressed by `(database, dataset)`. Reads of a missing
/// collection fail with `CollectionNotFound`.
#[async_trait]
pub trait FeatureStore: Send + Sync {
    /// Store a collection, replacing any existing one under the same name.
    ///
    /// Each feature is assigned a sequential `loxo_id` property starting at 0.
    async fn store_collection(
        &self,
        database: &str,
        dataset: &str,
        collection: FeatureCollection,
    ) -> Result<CollectionMeta>;

    /// Retrieve a full collection in ingestion order
    async fn fetch_collection(&self, database: &str, dataset: &str) -> Result<FeatureCollection>;

    /// Features whose property `name` renders equal to `value`
    async fn find_by_property(
        &self,
        database: &str,
        dataset: &str,
        name: &str,
        value: &str,
    ) -> Result<FeatureCollection>;

    /// Get a specific feature by its `loxo_id`
    async fn get_feature(&self, database: &str, dataset: &str, id: FeatureId) -> Result<Feature>;

    /// Number of features in a collection
    async fn count(&self, database: &str, dataset: &str) -> Result<usize>;

    /// Metadata for every collection in a database, sorted by dataset name
    async fn list_collections(&self, database: &str) -> Result<Vec<CollectionMeta>>;

    /// Delete a collection
    async fn delete_collection(&self, database: &str, dataset: &str) -> Result<()>;
}
