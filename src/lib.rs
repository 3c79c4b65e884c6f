// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cache;
pub mod config;
pub mod embeddings;
pub mod service;
pub mod version;

pub use api::{create_app, AppState};
pub use cache::{build_cache_key, CacheBackend, EmbeddingCache};
pub use config::{ModelBackend, ServiceConfig};
pub use embeddings::{EmbeddingModel, ModelLoader, ModelRegistry};
pub use service::{EmbeddingService, ServiceError};
