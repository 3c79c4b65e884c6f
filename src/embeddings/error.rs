// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use thiserror::Error;

/// Errors raised while loading or running an embedding model
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// Model files missing, download failed or the runtime rejected the model
    #[error("failed to load model '{model}': {reason}")]
    ModelLoad { model: String, reason: String },

    /// Tokenization or inference failed for a loaded model
    #[error("embedding inference failed: {0}")]
    Inference(String),
}

impl EmbeddingError {
    pub fn model_load(model: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        EmbeddingError::ModelLoad {
            model: model.into(),
            reason: reason.to_string(),
        }
    }
}
