// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Embedding service: cache lookup, compute on miss, store

use crate::cache::{CacheBackend, CacheError, EmbeddingCache};
use crate::embeddings::{EmbeddingError, ModelRegistry};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Text embedded during startup warm-up
const WARMUP_TEXT: &str = "warmup";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Result of a single-text embedding
#[derive(Debug, Clone, PartialEq)]
pub struct EmbedOutcome {
    pub embedding: Vec<f32>,
    /// Resolved model identifier
    pub model: String,
    /// True when served from the cache without running the model
    pub cached: bool,
}

/// Result of a batch embedding
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    pub embeddings: Vec<Vec<f32>>,
    pub model: String,
}

/// Shared state behind every HTTP handler
///
/// Built once at startup with the model registry and the cache backend
/// selected for this process.
pub struct EmbeddingService {
    registry: Arc<ModelRegistry>,
    cache: Arc<dyn EmbeddingCache>,
}

impl EmbeddingService {
    pub fn new(registry: Arc<ModelRegistry>, cache: Arc<dyn EmbeddingCache>) -> Self {
        Self { registry, cache }
    }

    /// Embeds one text, consulting the cache first
    ///
    /// On a hit the model is not loaded or run. On a miss the vector is
    /// computed and stored before it is returned. Concurrent misses for the
    /// same pair each compute independently.
    pub async fn embed(&self, text: &str, model: Option<&str>) -> Result<EmbedOutcome, ServiceError> {
        let model_name = self.registry.resolve_name(model).to_string();

        if let Some(embedding) = self.cache.lookup(text, &model_name).await? {
            return Ok(EmbedOutcome {
                embedding,
                model: model_name,
                cached: true,
            });
        }

        let embedding_model = self.registry.get_model(Some(&model_name)).await?;
        let embedding = embedding_model.embed(text).await?;
        self.cache.store(text, &model_name, &embedding).await?;

        Ok(EmbedOutcome {
            embedding,
            model: model_name,
            cached: false,
        })
    }

    /// Embeds many texts in one model call; never cached
    pub async fn embed_batch(&self, texts: &[String], model: Option<&str>) -> Result<BatchOutcome, ServiceError> {
        let model_name = self.registry.resolve_name(model).to_string();
        let embedding_model = self.registry.get_model(Some(&model_name)).await?;

        let embeddings = if texts.is_empty() {
            Vec::new()
        } else {
            embedding_model.embed_batch(texts).await?
        };

        Ok(BatchOutcome {
            embeddings,
            model: model_name,
        })
    }

    /// Loads the model if needed and returns its resolved identifier
    pub async fn check_model(&self, model: Option<&str>) -> Result<String, ServiceError> {
        let model_name = self.registry.resolve_name(model).to_string();
        self.registry.get_model(Some(&model_name)).await?;
        Ok(model_name)
    }

    /// Loads the default model and runs one embedding through it
    pub async fn warmup(&self) -> Result<(), ServiceError> {
        let model = self.registry.get_model(None).await?;
        model.embed(WARMUP_TEXT).await?;
        info!("✅ Warm-up complete ({})", model.model_name());
        Ok(())
    }

    pub fn cache_backend(&self) -> CacheBackend {
        self.cache.backend()
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }
}
