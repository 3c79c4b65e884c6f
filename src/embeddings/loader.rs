// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Model identifier resolution for ONNX models
//!
//! An identifier such as `sentence-transformers/all-MiniLM-L6-v2` is looked
//! up in the local models directory first, then fetched from the Hugging Face
//! hub when downloads are enabled.

use super::onnx_model::DEFAULT_MAX_SEQUENCE_LENGTH;
use super::{EmbeddingError, EmbeddingModel, ModelLoader, OnnxEmbeddingModel};
use async_trait::async_trait;
use hf_hub::api::sync::ApiBuilder;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Hub organization used for bare model names (`all-MiniLM-L6-v2`)
pub const DEFAULT_HUB_ORGANIZATION: &str = "sentence-transformers";

/// Candidate ONNX file locations inside a model directory or hub repo
const MODEL_FILE_CANDIDATES: &[&str] = &["model.onnx", "onnx/model.onnx"];
const HUB_MODEL_FILE_CANDIDATES: &[&str] = &["onnx/model.onnx", "model.onnx"];
const TOKENIZER_FILE: &str = "tokenizer.json";

/// Configuration for [`OnnxModelLoader`]
#[derive(Debug, Clone)]
pub struct OnnxLoaderConfig {
    /// Directory holding `<identifier>/model.onnx` + `tokenizer.json`
    pub models_dir: PathBuf,
    /// Whether identifiers missing locally may be downloaded
    pub allow_downloads: bool,
    /// Hub cache directory (hub default when `None`)
    pub hub_cache_dir: Option<PathBuf>,
    pub max_sequence_length: usize,
    pub normalize: bool,
}

impl Default for OnnxLoaderConfig {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("./models"),
            allow_downloads: true,
            hub_cache_dir: None,
            max_sequence_length: DEFAULT_MAX_SEQUENCE_LENGTH,
            normalize: true,
        }
    }
}

/// Resolved on-disk files for one model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFiles {
    pub model_path: PathBuf,
    pub tokenizer_path: PathBuf,
}

/// Loads [`OnnxEmbeddingModel`]s by identifier
#[derive(Debug, Clone)]
pub struct OnnxModelLoader {
    config: OnnxLoaderConfig,
}

impl OnnxModelLoader {
    pub fn new(config: OnnxLoaderConfig) -> Self {
        Self { config }
    }

    /// True when the identifier is a relative path of plain segments
    /// (`org/name`), so it cannot leave `models_dir`
    pub fn is_valid_identifier(model_name: &str) -> bool {
        !model_name.is_empty()
            && Path::new(model_name)
                .components()
                .all(|component| matches!(component, Component::Normal(_)))
    }

    /// Finds model files under `models_dir/<identifier>/`
    pub fn resolve_local(&self, model_name: &str) -> Option<ModelFiles> {
        if !Self::is_valid_identifier(model_name) {
            return None;
        }

        let model_dir = self.config.models_dir.join(model_name);
        let tokenizer_path = model_dir.join(TOKENIZER_FILE);
        if !tokenizer_path.is_file() {
            return None;
        }

        MODEL_FILE_CANDIDATES
            .iter()
            .map(|candidate| model_dir.join(candidate))
            .find(|path| path.is_file())
            .map(|model_path| ModelFiles {
                model_path,
                tokenizer_path,
            })
    }

    /// Hub repository for an identifier
    pub fn hub_repo_id(model_name: &str) -> String {
        if model_name.contains('/') {
            model_name.to_string()
        } else {
            format!("{}/{}", DEFAULT_HUB_ORGANIZATION, model_name)
        }
    }

    /// Downloads (or reuses cached) model files from the hub. Blocking.
    fn download(&self, model_name: &str) -> Result<ModelFiles, EmbeddingError> {
        let repo_id = Self::hub_repo_id(model_name);
        info!("Fetching model {} from Hugging Face hub", repo_id);

        let mut builder = ApiBuilder::new().with_progress(false);
        if let Some(cache_dir) = &self.config.hub_cache_dir {
            builder = builder.with_cache_dir(cache_dir.clone());
        }
        let api = builder
            .build()
            .map_err(|e| EmbeddingError::model_load(model_name, e))?;
        let repo = api.model(repo_id.clone());

        let tokenizer_path = repo
            .get(TOKENIZER_FILE)
            .map_err(|e| EmbeddingError::model_load(model_name, format!("{}: {}", TOKENIZER_FILE, e)))?;

        let mut last_error = None;
        for candidate in HUB_MODEL_FILE_CANDIDATES {
            match repo.get(candidate) {
                Ok(model_path) => {
                    return Ok(ModelFiles {
                        model_path,
                        tokenizer_path,
                    })
                }
                Err(e) => last_error = Some(format!("{}: {}", candidate, e)),
            }
        }

        Err(EmbeddingError::model_load(
            model_name,
            format!(
                "no ONNX export found in {} ({})",
                repo_id,
                last_error.unwrap_or_default()
            ),
        ))
    }

    /// Resolves and loads a model on the calling thread
    pub fn load_blocking(&self, model_name: &str) -> Result<OnnxEmbeddingModel, EmbeddingError> {
        if !Self::is_valid_identifier(model_name) {
            return Err(EmbeddingError::model_load(
                model_name,
                "invalid model identifier (must be a relative name such as org/model)",
            ));
        }

        let files = match self.resolve_local(model_name) {
            Some(files) => files,
            None if self.config.allow_downloads => self.download(model_name)?,
            None => {
                return Err(EmbeddingError::model_load(
                    model_name,
                    format!(
                        "not found under {} and model downloads are disabled",
                        self.config.models_dir.display()
                    ),
                ))
            }
        };

        OnnxEmbeddingModel::load(
            model_name,
            &files.model_path,
            &files.tokenizer_path,
            self.config.max_sequence_length,
            self.config.normalize,
        )
        .map_err(|e| EmbeddingError::model_load(model_name, format!("{:#}", e)))
    }
}

#[async_trait]
impl ModelLoader for OnnxModelLoader {
    async fn load(&self, model_name: &str) -> Result<Arc<dyn EmbeddingModel>, EmbeddingError> {
        let loader = self.clone();
        let name = model_name.to_string();

        let model = tokio::task::spawn_blocking(move || loader.load_blocking(&name))
            .await
            .map_err(|e| EmbeddingError::model_load(model_name, format!("load task failed: {}", e)))??;

        Ok(Arc::new(model))
    }
}
