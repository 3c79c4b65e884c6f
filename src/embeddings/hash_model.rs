// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Deterministic hash-seeded embeddings
//!
//! Produces stable pseudo-random unit vectors from a SHA-1 digest of the
//! input. Carries no semantic meaning; used with `MODEL_BACKEND=hash` to run
//! the service without model files.

use super::{EmbeddingError, EmbeddingModel, ModelLoader};
use async_trait::async_trait;
use sha1::{Digest, Sha1};
use std::sync::Arc;
use tracing::info;

/// Default output dimension, matching all-MiniLM-L6-v2
pub const DEFAULT_HASH_DIMENSION: usize = 384;

#[derive(Debug, Clone)]
pub struct HashEmbeddingModel {
    model_name: String,
    dimension: usize,
}

impl HashEmbeddingModel {
    pub fn new(model_name: impl Into<String>, dimension: usize) -> Result<Self, EmbeddingError> {
        let model_name = model_name.into();
        if dimension == 0 {
            return Err(EmbeddingError::model_load(
                model_name,
                "embedding dimension must be greater than 0",
            ));
        }

        Ok(Self {
            model_name,
            dimension,
        })
    }

    fn generate(&self, text: &str) -> Vec<f32> {
        let mut hasher = Sha1::new();
        hasher.update(self.model_name.as_bytes());
        hasher.update(b"::");
        hasher.update(text.as_bytes());
        let digest = hasher.finalize();

        let mut seed_bytes = [0u8; 8];
        seed_bytes.copy_from_slice(&digest[..8]);
        let mut current_seed = u64::from_le_bytes(seed_bytes);

        let mut embedding = Vec::with_capacity(self.dimension);
        for i in 0..self.dimension {
            // Linear congruential step, mixed with the position
            current_seed =
                (current_seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407))
                    ^ (i as u64);

            // Map to [-1, 1]
            let value = (current_seed as f64 / u64::MAX as f64) * 2.0 - 1.0;
            embedding.push(value as f32);
        }

        let norm = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut embedding {
                *value /= norm;
            }
        }

        embedding
    }
}

#[async_trait]
impl EmbeddingModel for HashEmbeddingModel {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        Ok(self.generate(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts.iter().map(|text| self.generate(text)).collect())
    }
}

/// Loader that accepts any identifier and returns a [`HashEmbeddingModel`]
#[derive(Debug, Clone)]
pub struct HashModelLoader {
    dimension: usize,
}

impl HashModelLoader {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Default for HashModelLoader {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_DIMENSION)
    }
}

#[async_trait]
impl ModelLoader for HashModelLoader {
    async fn load(&self, model_name: &str) -> Result<Arc<dyn EmbeddingModel>, EmbeddingError> {
        let model = HashEmbeddingModel::new(model_name, self.dimension)?;
        info!(
            "Loaded hash embedding model: {} ({} dimensions)",
            model_name, self.dimension
        );
        Ok(Arc::new(model))
    }
}
