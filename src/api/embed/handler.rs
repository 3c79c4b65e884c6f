// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Handlers for `POST /embed` and `POST /embed-batch`
//!
//! Both run behind the API key middleware.

use crate::api::embed::{BatchEmbedRequest, BatchEmbedResponse, EmbedRequest, EmbedResponse};
use crate::api::http_server::AppState;
use crate::api::ApiError;
use axum::{extract::State, Json};
use tracing::{debug, error};

/// POST /embed handler
///
/// Returns the cached vector for `(text, model)` when present, otherwise
/// computes and caches it.
///
/// # Request Body
/// ```json
/// { "text": "Shimano Twin Power", "model": "sentence-transformers/all-MiniLM-L6-v2" }
/// ```
///
/// # Response Body
/// ```json
/// { "embedding": [0.1, 0.2, ...], "model": "sentence-transformers/all-MiniLM-L6-v2", "cached": false }
/// ```
pub async fn embed_handler(
    State(state): State<AppState>,
    Json(request): Json<EmbedRequest>,
) -> Result<Json<EmbedResponse>, ApiError> {
    let outcome = state
        .service
        .embed(&request.text, request.model.as_deref())
        .await
        .map_err(|e| {
            error!("Embedding request failed: {}", e);
            ApiError::from(e)
        })?;

    debug!(
        "Embedded {} chars with {} (cached: {})",
        request.text.len(),
        outcome.model,
        outcome.cached
    );

    Ok(Json(outcome.into()))
}

/// POST /embed-batch handler
///
/// Embeds every text in one model call. Results are never cached.
pub async fn embed_batch_handler(
    State(state): State<AppState>,
    Json(request): Json<BatchEmbedRequest>,
) -> Result<Json<BatchEmbedResponse>, ApiError> {
    let outcome = state
        .service
        .embed_batch(&request.texts, request.model.as_deref())
        .await
        .map_err(|e| {
            error!("Batch embedding request failed: {}", e);
            ApiError::from(e)
        })?;

    Ok(Json(outcome.into()))
}
