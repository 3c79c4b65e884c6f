// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Embedding cache over an external key-value store

use super::{build_cache_key, CacheBackend, CacheError, EmbeddingCache};
use async_trait::async_trait;
use tracing::{debug, warn};

/// Minimal key-value service used as the persistent cache tier
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn exists(&self, key: &str) -> Result<bool, CacheError>;

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: String) -> Result<(), CacheError>;
}

/// Embedding cache keyed by [`build_cache_key`], values stored as JSON arrays
///
/// Store failures are returned to the caller as-is. There is no retry and no
/// fallback to the in-process cache once this backend has been selected.
pub struct StoreEmbeddingCache<S> {
    store: S,
}

impl<S: KeyValueStore> StoreEmbeddingCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: KeyValueStore> EmbeddingCache for StoreEmbeddingCache<S> {
    async fn lookup(&self, text: &str, model: &str) -> Result<Option<Vec<f32>>, CacheError> {
        let key = build_cache_key(model, text);

        if !self.store.exists(&key).await? {
            debug!("Redis cache miss: {}", key);
            return Ok(None);
        }

        match self.store.get(&key).await? {
            Some(payload) => {
                debug!("Redis cache hit: {}", key);
                let embedding: Vec<f32> = serde_json::from_str(&payload)?;
                Ok(Some(embedding))
            }
            // Removed between EXISTS and GET
            None => Ok(None),
        }
    }

    async fn store(&self, text: &str, model: &str, embedding: &[f32]) -> Result<(), CacheError> {
        let key = build_cache_key(model, text);

        // serde_json writes NaN/inf as null, which no lookup can decode
        if embedding.iter().any(|value| !value.is_finite()) {
            warn!("Not caching non-finite embedding under {}", key);
            return Ok(());
        }

        let payload = serde_json::to_string(embedding)?;
        self.store.set(&key, payload).await
    }

    fn backend(&self) -> CacheBackend {
        CacheBackend::Redis
    }
}
