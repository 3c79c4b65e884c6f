// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! In-process LRU backend through the `EmbeddingCache` interface

use fabstir_embed_cache::cache::{CacheBackend, EmbeddingCache, LruEmbeddingCache};
use futures_util::future::join_all;
use std::num::NonZeroUsize;
use std::sync::Arc;

fn cache(capacity: usize) -> LruEmbeddingCache {
    LruEmbeddingCache::new(NonZeroUsize::new(capacity).unwrap())
}

#[tokio::test]
async fn test_round_trip() {
    let cache = cache(4);

    assert!(cache.lookup("hello", "m").await.unwrap().is_none());
    cache.store("hello", "m", &[0.1, 0.2, 0.3]).await.unwrap();

    assert_eq!(cache.lookup("hello", "m").await.unwrap(), Some(vec![0.1, 0.2, 0.3]));
    assert_eq!(cache.backend(), CacheBackend::Lru);
}

#[tokio::test]
async fn test_keyed_by_raw_text_and_model() {
    let cache = cache(4);
    cache.store("Hello", "m", &[1.0]).await.unwrap();

    assert!(cache.lookup("hello", "m").await.unwrap().is_none());
    assert!(cache.lookup("Hello", "other").await.unwrap().is_none());
}

#[tokio::test]
async fn test_least_recently_used_entry_is_evicted() {
    let cache = cache(2);
    cache.store("a", "m", &[1.0]).await.unwrap();
    cache.store("b", "m", &[2.0]).await.unwrap();

    // Touch "a" so "b" becomes the eviction candidate
    assert!(cache.lookup("a", "m").await.unwrap().is_some());
    cache.store("c", "m", &[3.0]).await.unwrap();

    assert!(cache.lookup("a", "m").await.unwrap().is_some());
    assert!(cache.lookup("b", "m").await.unwrap().is_none());
    assert!(cache.lookup("c", "m").await.unwrap().is_some());
    assert_eq!(cache.len().await, 2);
}

#[tokio::test]
async fn test_concurrent_access() {
    let cache = Arc::new(cache(64));

    let writers = (0..32).map(|i| {
        let cache = cache.clone();
        async move {
            let text = format!("text-{}", i);
            cache.store(&text, "m", &[i as f32]).await.unwrap();
        }
    });
    join_all(writers).await;

    let readers = (0..32).map(|i| {
        let cache = cache.clone();
        async move { cache.lookup(&format!("text-{}", i), "m").await.unwrap() }
    });
    let results = join_all(readers).await;

    for (i, result) in results.into_iter().enumerate() {
        assert_eq!(result, Some(vec![i as f32]));
    }
}
