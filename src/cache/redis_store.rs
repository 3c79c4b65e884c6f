// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Redis-backed key-value store

use super::{CacheError, KeyValueStore};
use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::time::Duration;

/// Connection settings for the external store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub db: i64,
    /// Upper bound for connect + PING at startup
    pub connect_timeout: Duration,
}

impl RedisConfig {
    pub fn url(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.db)
    }
}

impl From<redis::RedisError> for CacheError {
    fn from(e: redis::RedisError) -> Self {
        CacheError::Backend(e.to_string())
    }
}

/// Single multiplexed connection opened at startup
///
/// The connection is cloned per command. It is never re-established: once
/// the server goes away every command fails with [`CacheError::Backend`].
#[derive(Clone)]
pub struct RedisStore {
    connection: MultiplexedConnection,
}

impl RedisStore {
    /// Connects and verifies the server answers `PING`
    pub async fn connect(config: &RedisConfig) -> Result<Self, CacheError> {
        let client = redis::Client::open(config.url())?;

        let handshake = async {
            let mut connection = client.get_multiplexed_async_connection().await?;
            let _pong: String = redis::cmd("PING").query_async(&mut connection).await?;
            Ok::<_, CacheError>(connection)
        };

        let connection = tokio::time::timeout(config.connect_timeout, handshake)
            .await
            .map_err(|_| {
                CacheError::Backend(format!(
                    "timed out after {:?} connecting to {}:{}",
                    config.connect_timeout, config.host, config.port
                ))
            })??;

        Ok(Self { connection })
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        let mut connection = self.connection.clone();
        let found: bool = connection.exists(key).await?;
        Ok(found)
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut connection = self.connection.clone();
        let value: Option<String> = connection.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
        let mut connection = self.connection.clone();
        let _: () = connection.set(key, value).await?;
        Ok(())
    }
}
