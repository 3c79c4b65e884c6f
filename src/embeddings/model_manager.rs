// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding Model Registry
//!
//! Owns every model loaded by this process, keyed by identifier. Models are
//! loaded on first use through a [`ModelLoader`] and kept until shutdown.

use super::{EmbeddingError, EmbeddingModel, ModelLoader};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

/// Registry of lazily loaded embedding models
///
/// Provides:
/// - Default model resolution (`None` or empty name)
/// - Lazy loading on first request for an identifier
/// - Shared access to loaded instances via `Arc`
///
/// The registry lock is not held while a model loads, so two concurrent
/// first requests for the same identifier may both load it. The first
/// instance inserted is kept and returned to both callers.
///
/// # Example
/// ```ignore
/// let registry = ModelRegistry::new(Arc::new(loader), "sentence-transformers/all-MiniLM-L6-v2");
/// let model = registry.get_model(None).await?; // default model
/// let embedding = model.embed("Hello world").await?;
/// ```
pub struct ModelRegistry {
    loader: Arc<dyn ModelLoader>,

    /// Name used when a request does not specify a model
    default_model: String,

    /// Loaded models by name
    models: RwLock<HashMap<String, Arc<dyn EmbeddingModel>>>,
}

impl ModelRegistry {
    pub fn new(loader: Arc<dyn ModelLoader>, default_model: impl Into<String>) -> Self {
        Self {
            loader,
            default_model: default_model.into(),
            models: RwLock::new(HashMap::new()),
        }
    }

    /// Resolves an optional request model name to a concrete identifier
    pub fn resolve_name<'a>(&'a self, name: Option<&'a str>) -> &'a str {
        match name {
            Some(name) if !name.is_empty() => name,
            _ => &self.default_model,
        }
    }

    /// Gets a model by name, loading it on first use
    ///
    /// # Returns
    /// - The loaded model, shared with every other caller
    /// - [`EmbeddingError::ModelLoad`] if the loader fails; failures are not
    ///   remembered and the next request tries again
    pub async fn get_model(&self, name: Option<&str>) -> Result<Arc<dyn EmbeddingModel>, EmbeddingError> {
        let model_name = self.resolve_name(name);

        if let Some(model) = self.models.read().await.get(model_name) {
            return Ok(model.clone());
        }

        info!("Loading model: {}", model_name);
        let loaded = match self.loader.load(model_name).await {
            Ok(model) => model,
            Err(e) => {
                error!("✗ Failed to load model {}: {}", model_name, e);
                return Err(e);
            }
        };

        let mut models = self.models.write().await;
        let model = models
            .entry(model_name.to_string())
            .or_insert_with(|| {
                info!(
                    "✓ Successfully loaded model: {} ({} dimensions)",
                    model_name,
                    loaded.dimension()
                );
                loaded
            })
            .clone();

        Ok(model)
    }

    /// Returns the name of the default model
    pub fn default_model_name(&self) -> &str {
        &self.default_model
    }

    /// Names of every loaded model, sorted
    pub async fn loaded_models(&self) -> Vec<String> {
        let mut names: Vec<String> = self.models.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Returns the number of loaded models
    pub async fn model_count(&self) -> usize {
        self.models.read().await.len()
    }
}
