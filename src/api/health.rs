// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! `GET /healthz`: loads the requested (or default) model and reports the
//! active cache backend

use super::http_server::AppState;
use crate::version::VERSION_NUMBER;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthQuery {
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub cache: String,
    pub loaded_models: Vec<String>,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthErrorResponse {
    pub status: String,
    pub error: String,
}

pub async fn health_handler(
    State(state): State<AppState>,
    Query(query): Query<HealthQuery>,
) -> Response {
    match state.service.check_model(query.model.as_deref()).await {
        Ok(model) => {
            let response = HealthResponse {
                status: "ok".to_string(),
                model,
                cache: state.service.cache_backend().to_string(),
                loaded_models: state.service.registry().loaded_models().await,
                version: VERSION_NUMBER.to_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!("Health check failed: {}", e);
            let response = HealthErrorResponse {
                status: "error".to_string(),
                error: e.to_string(),
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response()
        }
    }
}
