// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Embedding cache backends
//!
//! One `EmbeddingCache` interface with two implementations:
//! - [`StoreEmbeddingCache`]: external key-value store (Redis), keyed by
//!   [`build_cache_key`], persistent across restarts
//! - [`LruEmbeddingCache`]: bounded in-process LRU keyed by `(text, model)`
//!
//! The backend is chosen once by [`connect`] at startup and kept for the
//! lifetime of the process.

pub mod key;
pub mod memory;
pub mod redis_store;
pub mod store;

pub use key::{build_cache_key, normalize_text, CACHE_KEY_LEN, CACHE_KEY_PREFIX};
pub use memory::LruEmbeddingCache;
pub use redis_store::{RedisConfig, RedisStore};
pub use store::{KeyValueStore, StoreEmbeddingCache};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Errors raised by cache backends
#[derive(Debug, Error)]
pub enum CacheError {
    /// The external store rejected or failed a command
    #[error("cache backend error: {0}")]
    Backend(String),

    /// A stored payload could not be encoded or decoded
    #[error("cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Which backend serves this process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    Redis,
    Lru,
}

impl CacheBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheBackend::Redis => "redis",
            CacheBackend::Lru => "lru",
        }
    }
}

impl std::fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lookup/store interface shared by both backends
///
/// Implementations never compute embeddings themselves; the
/// [`EmbeddingService`](crate::service::EmbeddingService) runs the
/// get-or-compute sequence on top of this.
#[async_trait]
pub trait EmbeddingCache: Send + Sync {
    /// Returns the cached vector for `(text, model)`, if any
    async fn lookup(&self, text: &str, model: &str) -> Result<Option<Vec<f32>>, CacheError>;

    /// Stores a freshly computed vector for `(text, model)`
    async fn store(&self, text: &str, model: &str, embedding: &[f32]) -> Result<(), CacheError>;

    /// Backend identifier reported by the health endpoint
    fn backend(&self) -> CacheBackend;
}

/// Selects the cache backend for this process
///
/// Uses Redis when it is configured and answers `PING`; otherwise falls back
/// to the in-process LRU. The decision is never revisited.
pub async fn connect(redis: Option<&RedisConfig>, lru_capacity: NonZeroUsize) -> Arc<dyn EmbeddingCache> {
    if let Some(config) = redis {
        match RedisStore::connect(config).await {
            Ok(store) => {
                info!("✅ Connected to Redis at {}:{}", config.host, config.port);
                return Arc::new(StoreEmbeddingCache::new(store));
            }
            Err(e) => {
                warn!("⚠️ Redis unavailable: {}", e);
            }
        }
    }

    info!("Using in-process LRU embedding cache (capacity {})", lru_capacity);
    Arc::new(LruEmbeddingCache::new(lru_capacity))
}
