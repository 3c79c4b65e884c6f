// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Startup backend selection

use fabstir_embed_cache::cache::{self, CacheBackend, RedisConfig};
use std::num::NonZeroUsize;
use std::time::Duration;

fn capacity() -> NonZeroUsize {
    NonZeroUsize::new(8).unwrap()
}

#[tokio::test]
async fn test_no_redis_host_selects_lru() {
    let cache = cache::connect(None, capacity()).await;
    assert_eq!(cache.backend(), CacheBackend::Lru);
}

#[tokio::test]
async fn test_unreachable_redis_falls_back_to_lru() {
    let config = RedisConfig {
        host: "127.0.0.1".to_string(),
        port: 1,
        db: 0,
        connect_timeout: Duration::from_millis(500),
    };

    let cache = cache::connect(Some(&config), capacity()).await;
    assert_eq!(cache.backend(), CacheBackend::Lru);

    // The fallback is fully functional
    cache.store("hello", "m", &[1.0]).await.unwrap();
    assert_eq!(cache.lookup("hello", "m").await.unwrap(), Some(vec![1.0]));
}

#[tokio::test]
#[ignore] // Requires a Redis server on localhost:6379
async fn test_reachable_redis_is_selected() {
    let config = RedisConfig {
        host: "127.0.0.1".to_string(),
        port: 6379,
        db: 15,
        connect_timeout: Duration::from_secs(2),
    };

    let cache = cache::connect(Some(&config), capacity()).await;
    assert_eq!(cache.backend(), CacheBackend::Redis);

    cache.store("integration", "m", &[0.5, 0.25]).await.unwrap();
    assert_eq!(cache.lookup("  INTEGRATION ", "m").await.unwrap(), Some(vec![0.5, 0.25]));
}
