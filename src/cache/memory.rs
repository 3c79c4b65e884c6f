// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! In-process LRU embedding cache

use super::{CacheBackend, CacheError, EmbeddingCache};
use async_trait::async_trait;
use lru::LruCache;
use std::num::NonZeroUsize;
use tokio::sync::Mutex;
use tracing::debug;

/// Bounded LRU keyed by the raw `(text, model)` pair
///
/// Entries live until evicted or until the process exits. The lock is held
/// only for the lookup or insert, never while an embedding is computed.
pub struct LruEmbeddingCache {
    entries: Mutex<LruCache<(String, String), Vec<f32>>>,
    capacity: NonZeroUsize,
}

impl LruEmbeddingCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            capacity,
        }
    }

    /// Number of cached vectors
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }
}

#[async_trait]
impl EmbeddingCache for LruEmbeddingCache {
    async fn lookup(&self, text: &str, model: &str) -> Result<Option<Vec<f32>>, CacheError> {
        let mut entries = self.entries.lock().await;
        let hit = entries
            .get(&(text.to_string(), model.to_string()))
            .cloned();

        if hit.is_some() {
            debug!("LRU cache hit for model {}", model);
        } else {
            debug!("LRU cache miss for model {}", model);
        }

        Ok(hit)
    }

    async fn store(&self, text: &str, model: &str, embedding: &[f32]) -> Result<(), CacheError> {
        let mut entries = self.entries.lock().await;
        entries.put((text.to_string(), model.to_string()), embedding.to_vec());
        Ok(())
    }

    fn backend(&self) -> CacheBackend {
        CacheBackend::Lru
    }
}
