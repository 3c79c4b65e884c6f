// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding models and the lazily populated model registry
//!
//! - [`EmbeddingModel`]: opaque `text -> Vec<f32>` function
//! - [`ModelLoader`]: turns a model identifier into a loaded model
//! - [`ModelRegistry`]: owns loaded models, never evicts
//!
//! Two model backends are provided: ONNX Runtime sentence transformers and a
//! deterministic hash model for running without model files.

pub mod error;
pub mod hash_model;
pub mod loader;
pub mod model_manager;
pub mod onnx_model;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::EmbeddingError;
pub use hash_model::{HashEmbeddingModel, HashModelLoader};
pub use loader::{ModelFiles, OnnxLoaderConfig, OnnxModelLoader};
pub use model_manager::ModelRegistry;
pub use onnx_model::OnnxEmbeddingModel;

use async_trait::async_trait;
use std::sync::Arc;

/// A loaded embedding model
#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    /// Identifier the model was loaded under
    fn model_name(&self) -> &str;

    /// Length of every vector this model produces
    fn dimension(&self) -> usize;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

/// Loads a model by identifier
#[async_trait]
pub trait ModelLoader: Send + Sync {
    async fn load(&self, model_name: &str) -> Result<Arc<dyn EmbeddingModel>, EmbeddingError>;
}
