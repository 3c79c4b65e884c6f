// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Store-backed cache over an in-memory key-value store

use async_trait::async_trait;
use fabstir_embed_cache::cache::{
    build_cache_key, CacheBackend, CacheError, EmbeddingCache, KeyValueStore, StoreEmbeddingCache,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone, Default)]
struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    async fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().await.get(key).cloned()
    }

    async fn insert(&self, key: String, value: &str) {
        self.entries.lock().await.insert(key, value.to_string());
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.entries.lock().await.contains_key(key))
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
        self.entries.lock().await.insert(key.to_string(), value);
        Ok(())
    }
}

#[tokio::test]
async fn test_store_writes_json_under_derived_key() {
    let store = MemoryStore::default();
    let cache = StoreEmbeddingCache::new(store.clone());

    cache.store("Shimano Twin Power", "m", &[0.5, -1.0]).await.unwrap();

    let payload = store.raw(&build_cache_key("m", "Shimano Twin Power")).await.unwrap();
    assert_eq!(payload, "[0.5,-1.0]");
    assert_eq!(cache.backend(), CacheBackend::Redis);
}

#[tokio::test]
async fn test_normalized_variants_hit_the_same_entry() {
    let cache = StoreEmbeddingCache::new(MemoryStore::default());
    cache.store("Shimano Twin Power", "m", &[0.25]).await.unwrap();

    let hit = cache.lookup("  shimano   TWIN power", "m").await.unwrap();
    assert_eq!(hit, Some(vec![0.25]));

    assert!(cache.lookup("Shimano Twin Power", "other").await.unwrap().is_none());
}

#[tokio::test]
async fn test_reads_entries_written_by_other_clients() {
    let store = MemoryStore::default();
    store
        .insert(build_cache_key("m", "hello"), "[0.1, 0.2, 0.3]")
        .await;
    let cache = StoreEmbeddingCache::new(store);

    assert_eq!(cache.lookup("hello", "m").await.unwrap(), Some(vec![0.1, 0.2, 0.3]));
}

#[tokio::test]
async fn test_corrupt_payload_is_an_error() {
    let store = MemoryStore::default();
    store.insert(build_cache_key("m", "hello"), "not json").await;
    let cache = StoreEmbeddingCache::new(store);

    let err = cache.lookup("hello", "m").await.unwrap_err();
    assert!(matches!(err, CacheError::Serialization(_)));
}
