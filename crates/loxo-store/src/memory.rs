//! In-memory feature store.
//!
//! Uses `RwLock::unwrap()` intentionally. Lock poisoning only occurs when
//! another thread panicked while holding the lock, which is an unrecoverable
//! state.

use async_trait::async_trait;
use loxo_core::error::{LoxoError, Result};
use loxo_core::models::{
    AttributeValue, CollectionMeta, Feature, FeatureCollection, FeatureId, LOXO_ID_PROPERTY,
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::ports::FeatureStore;

type CollectionKey = (String, String);

#[derive(Debug, Clone)]
struct StoredCollection {
    meta: CollectionMeta,
    collection: FeatureCollection,
}

/// In-memory implementation of FeatureStore
#[derive(Debug, Clone, Default)]
pub struct MemoryFeatureStore {
    collections: Arc<RwLock<HashMap<CollectionKey, StoredCollection>>>,
}

impl MemoryFeatureStore {
    /// Create a new in-memory feature store
    pub fn new() -> Self {
        Self::default()
    }

    fn key(database: &str, dataset: &str) -> CollectionKey {
        (database.to_string(), dataset.to_string())
    }

    fn not_found(database: &str, dataset: &str) -> LoxoError {
        LoxoError::CollectionNotFound {
            database: database.to_string(),
            dataset: dataset.to_string(),
        }
    }

    fn with_collection<T>(
        &self,
        database: &str,
        dataset: &str,
        f: impl FnOnce(&StoredCollection) -> T,
    ) -> Result<T> {
        let collections = self.collections.read().unwrap();
        collections
            .get(&Self::key(database, dataset))
            .map(f)
            .ok_or_else(|| Self::not_found(database, dataset))
    }
}

#[async_trait]
impl FeatureStore for MemoryFeatureStore {
    async fn store_collection(
        &self,
        database: &str,
        dataset: &str,
        collection: FeatureCollection,
    ) -> Result<CollectionMeta> {
        let collection: FeatureCollection = collection
            .into_iter()
            .enumerate()
            .map(|(i, feature)| feature.with_property(LOXO_ID_PROPERTY, AttributeValue::from(i as u64)))
            .collect();

        let meta = CollectionMeta::describe(database, dataset, &collection);
        let mut collections = self.collections.write().unwrap();
        let replaced = collections
            .insert(Self::key(database, dataset), StoredCollection { meta: meta.clone(), collection })
            .is_some();

        tracing::debug!(database, dataset, features = meta.feature_count, replaced, "Stored collection");
        Ok(meta)
    }

    async fn fetch_collection(&self, database: &str, dataset: &str) -> Result<FeatureCollection> {
        self.with_collection(database, dataset, |stored| stored.collection.clone())
    }

    async fn find_by_property(
        &self,
        database: &str,
        dataset: &str,
        name: &str,
        value: &str,
    ) -> Result<FeatureCollection> {
        self.with_collection(database, dataset, |stored| {
            stored
                .collection
                .iter()
                .filter(|f| f.property(name).is_some_and(|v| v.to_string() == value))
                .cloned()
                .collect()
        })
    }

    async fn get_feature(&self, database: &str, dataset: &str, id: FeatureId) -> Result<Feature> {
        self.with_collection(database, dataset, |stored| {
            stored.collection.iter().find(|f| f.loxo_id() == Some(id)).cloned()
        })?
        .ok_or(LoxoError::FeatureNotFound { id: id.0 })
    }

    async fn count(&self, database: &str, dataset: &str) -> Result<usize> {
        self.with_collection(database, dataset, |stored| stored.collection.len())
    }

    async fn list_collections(&self, database: &str) -> Result<Vec<CollectionMeta>> {
        let collections = self.collections.read().unwrap();
        let mut metas: Vec<CollectionMeta> = collections
            .iter()
            .filter(|((db, _), _)| db == database)
            .map(|(_, stored)| stored.meta.clone())
            .collect();
        metas.sort_by(|a, b| a.dataset.cmp(&b.dataset));
        Ok(metas)
    }

    async fn delete_collection(&self, database: &str, dataset: &str) -> Result<()> {
        let mut collections = self.collections.write().unwrap();
        collections
            .remove(&Self::key(database, dataset))
            .map(|_| ())
            .ok_or_else(|| Self::not_found(database, dataset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loxo_core::models::GeometryType;

    fn sample() -> FeatureCollection {
        FeatureCollection::new(vec![
            Feature::point(0.0, 0.0).with_property("name", "a").with_property("v", 1i64),
            Feature::point(1.0, 1.0).with_property("name", "b").with_property("v", 2i64),
            Feature::point(2.0, 2.0).with_property("name", "a").with_property("v", 3.5),
        ])
    }

    #[tokio::test]
    async fn test_store_assigns_sequential_ids() {
        let store = MemoryFeatureStore::new();
        let meta = store.store_collection("geo", "sites", sample()).await.unwrap();

        assert_eq!(meta.feature_count, 3);
        assert_eq!(meta.geometry_type, GeometryType::Point);

        let collection = store.fetch_collection("geo", "sites").await.unwrap();
        let ids: Vec<Option<FeatureId>> = collection.iter().map(|f| f.loxo_id()).collect();
        assert_eq!(ids, vec![Some(FeatureId(0)), Some(FeatureId(1)), Some(FeatureId(2))]);
    }

    #[tokio::test]
    async fn test_store_replaces_existing() {
        let store = MemoryFeatureStore::new();
        store.store_collection("geo", "sites", sample()).await.unwrap();
        store
            .store_collection("geo", "sites", FeatureCollection::new(vec![Feature::point(5.0, 5.0)]))
            .await
            .unwrap();

        assert_eq!(store.count("geo", "sites").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_by_property() {
        let store = MemoryFeatureStore::new();
        store.store_collection("geo", "sites", sample()).await.unwrap();

        let found = store.find_by_property("geo", "sites", "name", "a").await.unwrap();
        assert_eq!(found.len(), 2);

        let found = store.find_by_property("geo", "sites", "v", "2").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found.features[0].loxo_id(), Some(FeatureId(1)));

        let found = store.find_by_property("geo", "sites", "missing", "a").await.unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_get_feature() {
        let store = MemoryFeatureStore::new();
        store.store_collection("geo", "sites", sample()).await.unwrap();

        let feature = store.get_feature("geo", "sites", FeatureId(2)).await.unwrap();
        assert_eq!(feature.property("v").and_then(|v| v.as_f64()), Some(3.5));

        let err = store.get_feature("geo", "sites", FeatureId(9)).await.unwrap_err();
        assert!(matches!(err, LoxoError::FeatureNotFound { id: 9 }));
    }

    #[tokio::test]
    async fn test_missing_collection() {
        let store = MemoryFeatureStore::new();
        let err = store.fetch_collection("geo", "nothing").await.unwrap_err();
        assert!(matches!(err, LoxoError::CollectionNotFound { .. }));
        assert!(store.delete_collection("geo", "nothing").await.is_err());
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let store = MemoryFeatureStore::new();
        store.store_collection("geo", "zoo", sample()).await.unwrap();
        store.store_collection("geo", "airports", sample()).await.unwrap();
        store.store_collection("other", "sites", sample()).await.unwrap();

        let names: Vec<String> =
            store.list_collections("geo").await.unwrap().into_iter().map(|m| m.dataset).collect();
        assert_eq!(names, vec!["airports", "zoo"]);

        store.delete_collection("geo", "zoo").await.unwrap();
        assert_eq!(store.list_collections("geo").await.unwrap().len(), 1);
        assert!(store.list_collections("empty").await.unwrap().is_empty());
    }
}
