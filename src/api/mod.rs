// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod auth;
pub mod embed;
pub mod errors;
pub mod health;
pub mod http_server;

pub use auth::{key_matches, require_api_key, API_KEY_HEADER};
pub use embed::{BatchEmbedRequest, BatchEmbedResponse, EmbedRequest, EmbedResponse};
pub use errors::{ApiError, ErrorResponse};
pub use health::{HealthErrorResponse, HealthQuery, HealthResponse};
pub use http_server::{create_app, start_server, AppState};
