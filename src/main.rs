// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{anyhow, Result};
use clap::Parser;
use fabstir_embed_cache::{
    api::{start_server, AppState},
    cache,
    config::{ModelBackend, ServiceConfig},
    embeddings::{HashModelLoader, ModelLoader, ModelRegistry, OnnxModelLoader},
    service::EmbeddingService,
    version,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServiceConfig::parse();
    config.validate().map_err(|e| anyhow!("Invalid configuration: {}", e))?;

    info!("🚀 Starting {}", version::get_version_string());
    info!("📦 Build: {}", version::VERSION);
    info!("🧩 Features: {}", version::FEATURES.join(", "));

    let loader: Arc<dyn ModelLoader> = match config.model_backend {
        ModelBackend::Onnx => {
            info!("🧠 Model backend: ONNX Runtime ({})", config.models_dir.display());
            Arc::new(OnnxModelLoader::new(config.onnx_loader_config()))
        }
        ModelBackend::Hash => {
            warn!(
                "🧠 Model backend: hash ({} dimensions); vectors carry no semantic meaning",
                config.hash_dimension
            );
            Arc::new(HashModelLoader::new(config.hash_dimension))
        }
    };

    let registry = Arc::new(ModelRegistry::new(loader, config.default_model.clone()));
    let embedding_cache = cache::connect(config.redis().as_ref(), config.lru_capacity).await;
    info!("💾 Cache backend: {}", embedding_cache.backend());

    let service = Arc::new(EmbeddingService::new(registry, embedding_cache));

    if config.warmup {
        if let Err(e) = service.warmup().await {
            error!("Warm-up failed, models will load on first request: {}", e);
        }
    }

    if config.api_key.is_empty() {
        warn!("⚠️ No API key configured (KEY); every /embed request will be rejected");
    }

    let state = AppState::new(service, &config.api_key);
    start_server(state, &config.listen_addr()).await
}
