// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Call-counting model and loader for unit tests

use super::{EmbeddingError, EmbeddingModel, HashEmbeddingModel, ModelLoader};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Default)]
pub(crate) struct Counters {
    pub loads: AtomicUsize,
    pub embeds: AtomicUsize,
    pub batches: AtomicUsize,
}

impl Counters {
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn embeds(&self) -> usize {
        self.embeds.load(Ordering::SeqCst)
    }

    pub fn batches(&self) -> usize {
        self.batches.load(Ordering::SeqCst)
    }
}

struct CountingModel {
    inner: HashEmbeddingModel,
    counters: Arc<Counters>,
}

#[async_trait]
impl EmbeddingModel for CountingModel {
    fn model_name(&self) -> &str {
        self.inner.model_name()
    }

    fn dimension(&self) -> usize {
        self.inner.dimension()
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.counters.embeds.fetch_add(1, Ordering::SeqCst);
        self.inner.embed(text).await
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.counters.batches.fetch_add(1, Ordering::SeqCst);
        self.inner.embed_batch(texts).await
    }
}

/// Loads hash models, failing for identifiers listed in `broken`
pub(crate) struct CountingLoader {
    pub counters: Arc<Counters>,
    broken: Vec<String>,
}

impl CountingLoader {
    pub fn new() -> Self {
        Self {
            counters: Arc::new(Counters::default()),
            broken: Vec::new(),
        }
    }

    pub fn with_broken(mut self, model: &str) -> Self {
        self.broken.push(model.to_string());
        self
    }
}

#[async_trait]
impl ModelLoader for CountingLoader {
    async fn load(&self, model_name: &str) -> Result<Arc<dyn EmbeddingModel>, EmbeddingError> {
        self.counters.loads.fetch_add(1, Ordering::SeqCst);
        if self.broken.iter().any(|m| m == model_name) {
            return Err(EmbeddingError::model_load(model_name, "model files not found"));
        }

        Ok(Arc::new(CountingModel {
            inner: HashEmbeddingModel::new(model_name, 8)?,
            counters: self.counters.clone(),
        }))
    }
}
