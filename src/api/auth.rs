// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Shared-secret authorization for the embedding endpoints
//!
//! Requests must carry a `Key` header equal to the configured secret. The
//! check runs as route middleware, so rejected requests never have their
//! body parsed.

use super::http_server::AppState;
use super::ApiError;
use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use tracing::warn;

/// Header carrying the API key (header names are case-insensitive)
pub const API_KEY_HEADER: &str = "key";

/// Compares a presented key with the configured one
///
/// An empty configured key matches nothing.
pub fn key_matches(configured: &str, presented: Option<&str>) -> bool {
    match presented {
        Some(presented) => !configured.is_empty() && presented == configured,
        None => false,
    }
}

fn presented_key(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
}

pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !key_matches(&state.api_key, presented_key(request.headers())) {
        warn!("Rejected {} {}: invalid API key", request.method(), request.uri().path());
        return Err(ApiError::Unauthorized("invalid API key".to_string()));
    }

    Ok(next.run(request).await)
}
