// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service configuration
//!
//! Every option can be given as a flag or read from the environment (a
//! `.env` file is loaded by `main` before parsing).

use crate::cache::RedisConfig;
use crate::embeddings::hash_model::DEFAULT_HASH_DIMENSION;
use crate::embeddings::onnx_model::DEFAULT_MAX_SEQUENCE_LENGTH;
use crate::embeddings::OnnxLoaderConfig;
use clap::{ArgAction, Parser, ValueEnum};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_REDIS_PORT: u16 = 6379;
pub const DEFAULT_LRU_CAPACITY: usize = 10_000;

/// Which implementation turns model identifiers into models
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelBackend {
    /// ONNX Runtime sentence transformers
    Onnx,
    /// Deterministic hash vectors, no model files needed
    Hash,
}

/// Embedding cache service configuration
#[derive(Parser, Debug, Clone)]
#[command(name = "fabstir-embed-cache")]
#[command(version)]
#[command(about = "Authenticated text embedding API with Redis/LRU caching", long_about = None)]
pub struct ServiceConfig {
    /// Model used when a request does not name one
    #[arg(long, env = "EMBEDDING_MODEL", default_value = DEFAULT_MODEL)]
    pub default_model: String,

    /// Shared secret expected in the `Key` header; empty rejects everything
    #[arg(long, env = "KEY", default_value = "", hide_env_values = true)]
    pub api_key: String,

    /// Redis host; the in-process LRU cache is used when unset
    #[arg(long, env = "REDIS_HOST")]
    pub redis_host: Option<String>,

    #[arg(long, env = "REDIS_PORT", default_value_t = DEFAULT_REDIS_PORT)]
    pub redis_port: u16,

    #[arg(long, env = "REDIS_DB", default_value_t = 0)]
    pub redis_db: i64,

    /// Startup connect + PING timeout in seconds
    #[arg(long, env = "REDIS_CONNECT_TIMEOUT_SECS", default_value_t = 5)]
    pub redis_connect_timeout_secs: u64,

    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Entries kept by the in-process LRU cache
    #[arg(long, env = "LRU_CACHE_SIZE", default_value = "10000")]
    pub lru_capacity: NonZeroUsize,

    #[arg(long, env = "MODEL_BACKEND", value_enum, default_value = "onnx")]
    pub model_backend: ModelBackend,

    /// Directory searched for `<model>/model.onnx` and `tokenizer.json`
    #[arg(long, env = "MODELS_DIR", default_value = "./models")]
    pub models_dir: PathBuf,

    /// Hugging Face hub cache directory
    #[arg(long, env = "HF_HUB_CACHE")]
    pub hub_cache_dir: Option<PathBuf>,

    /// Download models missing from MODELS_DIR from the hub
    #[arg(long, env = "MODEL_DOWNLOADS", default_value_t = true, action = ArgAction::Set)]
    pub model_downloads: bool,

    #[arg(long, env = "MAX_SEQUENCE_LENGTH", default_value_t = DEFAULT_MAX_SEQUENCE_LENGTH)]
    pub max_sequence_length: usize,

    #[arg(long, env = "NORMALIZE_EMBEDDINGS", default_value_t = true, action = ArgAction::Set)]
    pub normalize_embeddings: bool,

    /// Output dimension of the hash model backend
    #[arg(long, env = "HASH_EMBEDDING_DIMENSION", default_value_t = DEFAULT_HASH_DIMENSION)]
    pub hash_dimension: usize,

    /// Load the default model and embed once before serving
    #[arg(long, env = "WARMUP", default_value_t = true, action = ArgAction::Set)]
    pub warmup: bool,
}

impl ServiceConfig {
    /// Redis settings, present only when a host is configured
    pub fn redis(&self) -> Option<RedisConfig> {
        let host = self.redis_host.as_deref().map(str::trim).filter(|h| !h.is_empty())?;

        Some(RedisConfig {
            host: host.to_string(),
            port: self.redis_port,
            db: self.redis_db,
            connect_timeout: Duration::from_secs(self.redis_connect_timeout_secs),
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn onnx_loader_config(&self) -> OnnxLoaderConfig {
        OnnxLoaderConfig {
            models_dir: self.models_dir.clone(),
            allow_downloads: self.model_downloads,
            hub_cache_dir: self.hub_cache_dir.clone(),
            max_sequence_length: self.max_sequence_length,
            normalize: self.normalize_embeddings,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.default_model.trim().is_empty() {
            return Err("Default model name cannot be empty".to_string());
        }
        if self.port == 0 {
            return Err("Port must be greater than 0".to_string());
        }
        if self.max_sequence_length == 0 {
            return Err("Max sequence length must be greater than 0".to_string());
        }
        if self.model_backend == ModelBackend::Hash && self.hash_dimension == 0 {
            return Err("Hash embedding dimension must be greater than 0".to_string());
        }
        if self.redis().is_some() && self.redis_connect_timeout_secs == 0 {
            return Err("Redis connect timeout must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
            redis_host: None,
            redis_port: DEFAULT_REDIS_PORT,
            redis_db: 0,
            redis_connect_timeout_secs: 5,
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            lru_capacity: NonZeroUsize::MIN.saturating_add(DEFAULT_LRU_CAPACITY - 1),
            model_backend: ModelBackend::Onnx,
            models_dir: PathBuf::from("./models"),
            hub_cache_dir: None,
            model_downloads: true,
            max_sequence_length: DEFAULT_MAX_SEQUENCE_LENGTH,
            normalize_embeddings: true,
            hash_dimension: DEFAULT_HASH_DIMENSION,
            warmup: true,
        }
    }
}
