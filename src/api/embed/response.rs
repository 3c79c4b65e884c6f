// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Response bodies for the embedding endpoints

use crate::service::{BatchOutcome, EmbedOutcome};
use serde::{Deserialize, Serialize};

/// Response body for `POST /embed`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmbedResponse {
    pub embedding: Vec<f32>,

    /// Resolved model identifier
    pub model: String,

    /// True when the vector came from the cache
    pub cached: bool,
}

/// Response body for `POST /embed-batch`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BatchEmbedResponse {
    pub embeddings: Vec<Vec<f32>>,
    pub model: String,
}

impl From<EmbedOutcome> for EmbedResponse {
    fn from(outcome: EmbedOutcome) -> Self {
        Self {
            embedding: outcome.embedding,
            model: outcome.model,
            cached: outcome.cached,
        }
    }
}

impl From<BatchOutcome> for BatchEmbedResponse {
    fn from(outcome: BatchOutcome) -> Self {
        Self {
            embeddings: outcome.embeddings,
            model: outcome.model,
        }
    }
}
