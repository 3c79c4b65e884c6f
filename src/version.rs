// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the Fabstir embedding cache

/// Full version string with feature description
pub const VERSION: &str = "v1.0.0-embedding-cache-2025-11-03";

/// Semantic version number
pub const VERSION_NUMBER: &str = env!("CARGO_PKG_VERSION");

/// Build date
pub const BUILD_DATE: &str = "2025-11-03";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "api-key-auth",
    "redis-cache",
    "lru-fallback",
    "lazy-model-registry",
    "onnx-runtime",
    "batch-embeddings",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("Fabstir Embedding Cache {} ({})", VERSION_NUMBER, BUILD_DATE)
}
