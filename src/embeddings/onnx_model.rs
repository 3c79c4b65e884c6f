// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! ONNX Embedding Model Wrapper
//!
//! This module provides a wrapper around ONNX Runtime for running
//! sentence transformer models exported to ONNX (all-MiniLM-L6-v2 by default).
//!
//! Features:
//! - ONNX model loading from disk
//! - GPU acceleration via CUDA (with automatic CPU fallback)
//! - BERT tokenization with truncation to the model's sequence length
//! - Single and batch embedding generation
//! - Mean pooling over token embeddings, optional L2 normalization
//! - Output dimension discovered from a validation inference

use super::{EmbeddingError, EmbeddingModel};
use anyhow::{Context, Result};
use async_trait::async_trait;
use ndarray::{Array2, ArrayView2, Axis};
use ort::execution_providers::{CPUExecutionProvider, CUDAExecutionProvider};
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{info, warn};

/// Sequence length used by all-MiniLM-L6-v2
pub const DEFAULT_MAX_SEQUENCE_LENGTH: usize = 256;

/// ONNX-based sentence embedding model
///
/// # Model Details
/// - Input: text strings, truncated to `max_length` tokens
/// - Output: `[batch, seq_len, hidden_dim]` token embeddings, mean pooled
///   with the attention mask into `hidden_dim` vectors
///
/// # Thread Safety
/// All fields are wrapped in Arc for cheap cloning. The session is guarded
/// by a mutex and only ever locked on the blocking thread pool.
#[derive(Clone)]
pub struct OnnxEmbeddingModel {
    /// ONNX Runtime session (wrapped in Arc<Mutex> for thread-safe shared access)
    session: Arc<Mutex<Session>>,

    /// BERT tokenizer
    tokenizer: Arc<Tokenizer>,

    /// Model identifier (e.g., "sentence-transformers/all-MiniLM-L6-v2")
    model_name: String,

    /// Output dimension (384 for all-MiniLM-L6-v2)
    dimension: usize,

    /// Maximum sequence length
    max_length: usize,

    /// Whether pooled vectors are scaled to unit length
    normalize: bool,
}

impl std::fmt::Debug for OnnxEmbeddingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEmbeddingModel")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .field("max_length", &self.max_length)
            .field("normalize", &self.normalize)
            .finish_non_exhaustive()
    }
}

impl OnnxEmbeddingModel {
    /// Loads an ONNX embedding model from disk paths
    ///
    /// Blocking: creates the runtime session and runs one validation
    /// inference. Call from `spawn_blocking` inside async code.
    ///
    /// # Errors
    /// Returns error if:
    /// - Model or tokenizer file not found or invalid
    /// - ONNX Runtime initialization fails
    /// - Model output is not `[batch, seq_len, hidden_dim]`
    ///
    /// # Example
    /// ```ignore
    /// let model = OnnxEmbeddingModel::load(
    ///     "all-MiniLM-L6-v2",
    ///     "./models/all-MiniLM-L6-v2/model.onnx",
    ///     "./models/all-MiniLM-L6-v2/tokenizer.json",
    ///     256,
    ///     true,
    /// )?;
    /// ```
    pub fn load<P: AsRef<Path>>(
        model_name: impl Into<String>,
        model_path: P,
        tokenizer_path: P,
        max_length: usize,
        normalize: bool,
    ) -> Result<Self> {
        let model_name = model_name.into();
        let model_path = model_path.as_ref();
        let tokenizer_path = tokenizer_path.as_ref();

        // Validate paths exist
        if !model_path.exists() {
            anyhow::bail!("ONNX model file not found: {}", model_path.display());
        }
        if !tokenizer_path.exists() {
            anyhow::bail!("Tokenizer file not found: {}", tokenizer_path.display());
        }

        // Try CUDA first, fall back to CPU if unavailable
        info!("   Attempting CUDA execution provider for {}...", model_name);
        let cuda_result = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CUDAExecutionProvider::default().build()])
            .context("Failed to set CUDA execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path);

        let mut session = match cuda_result {
            Ok(s) => {
                info!("✅ CUDA execution provider initialized successfully!");
                s
            }
            Err(e) => {
                warn!("⚠️  CUDA execution provider failed: {}", e);
                warn!("   Falling back to CPU execution provider");
                Session::builder()
                    .context("Failed to create session builder")?
                    .with_execution_providers([CPUExecutionProvider::default().build()])
                    .context("Failed to set CPU execution provider")?
                    .with_optimization_level(GraphOptimizationLevel::Level3)
                    .context("Failed to set optimization level")?
                    .with_intra_threads(4)
                    .context("Failed to set intra threads")?
                    .commit_from_file(model_path)
                    .context(format!(
                        "Failed to load ONNX model from {}",
                        model_path.display()
                    ))?
            }
        };

        // Load tokenizer; padding is applied manually per batch
        let mut tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;
        tokenizer.with_padding(None);
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Failed to configure truncation: {}", e))?;

        // Discover output dimension with a validation inference
        let dimension = {
            let (input_ids, attention_mask, token_type_ids, _) =
                encode_batch(&tokenizer, &["validation test".to_string()])?;

            let outputs = session.run(ort::inputs![
                "input_ids" => Value::from_array(input_ids)?,
                "attention_mask" => Value::from_array(attention_mask)?,
                "token_type_ids" => Value::from_array(token_type_ids)?
            ])?;

            // Use index [0] since different exports name the output differently
            let output_tensor = outputs[0]
                .try_extract_array::<f32>()
                .context("Failed to extract output tensor")?;
            let output_shape = output_tensor.shape();

            if output_shape.len() != 3 || output_shape[2] == 0 {
                anyhow::bail!(
                    "Model outputs unexpected dimensions: {:?} (expected [batch, seq_len, hidden_dim])",
                    output_shape
                );
            }
            output_shape[2]
        }; // outputs dropped here

        info!(
            "✅ ONNX embedding model loaded: {} ({} dimensions)",
            model_name, dimension
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            model_name,
            dimension,
            max_length,
            normalize,
        })
    }

    /// Embeds a batch on the calling thread
    ///
    /// # Implementation
    /// 1. Tokenize all texts, pad to the longest sequence
    /// 2. Run ONNX inference
    /// 3. Mean pool each item with its attention mask
    /// 4. L2 normalize if enabled
    pub fn embed_blocking(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let (input_ids, attention_mask, token_type_ids, mask_for_pooling) =
            encode_batch(&self.tokenizer, texts)?;

        let mut session_guard = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("ONNX session mutex poisoned"))?;
        let outputs = session_guard.run(ort::inputs![
            "input_ids" => Value::from_array(input_ids)?,
            "attention_mask" => Value::from_array(attention_mask)?,
            "token_type_ids" => Value::from_array(token_type_ids)?
        ])?;

        let output_array = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        let mut embeddings: Vec<Vec<f32>> = Vec::with_capacity(texts.len());
        for batch_idx in 0..texts.len() {
            let token_embeddings = output_array
                .index_axis(Axis(0), batch_idx)
                .into_dimensionality::<ndarray::Ix2>()
                .context("Unexpected token embedding shape")?;
            let item_mask = mask_for_pooling.row(batch_idx);

            let mut pooled = mean_pool(token_embeddings, item_mask.as_slice().unwrap_or(&[]));
            if self.normalize {
                l2_normalize(&mut pooled);
            }

            if pooled.len() != self.dimension {
                anyhow::bail!(
                    "Unexpected embedding dimension at index {}: {} (expected {})",
                    batch_idx,
                    pooled.len(),
                    self.dimension
                );
            }
            embeddings.push(pooled);
        }

        Ok(embeddings)
    }

    /// Returns the maximum sequence length in tokens
    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

#[async_trait]
impl EmbeddingModel for OnnxEmbeddingModel {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .pop()
            .ok_or_else(|| EmbeddingError::Inference("model returned no embedding".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let model = self.clone();
        let texts = texts.to_vec();

        tokio::task::spawn_blocking(move || model.embed_blocking(&texts))
            .await
            .map_err(|e| EmbeddingError::Inference(format!("inference task failed: {}", e)))?
            .map_err(|e| EmbeddingError::Inference(format!("{:#}", e)))
    }
}

type EncodedBatch = (Array2<i64>, Array2<i64>, Array2<i64>, Array2<i64>);

/// Tokenizes texts into padded `input_ids`, `attention_mask`,
/// `token_type_ids` tensors plus a copy of the mask for pooling
fn encode_batch(tokenizer: &Tokenizer, texts: &[String]) -> Result<EncodedBatch> {
    let encodings: Vec<_> = texts
        .iter()
        .map(|text| {
            tokenizer
                .encode(text.as_str(), true)
                .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))
        })
        .collect::<Result<Vec<_>>>()?;

    // Pad every sequence to the longest in the batch
    let max_len = encodings
        .iter()
        .map(|enc| enc.get_ids().len())
        .max()
        .unwrap_or(0)
        .max(1);

    let mut input_ids = Array2::<i64>::zeros((texts.len(), max_len));
    let mut attention_mask = Array2::<i64>::zeros((texts.len(), max_len));
    let token_type_ids = Array2::<i64>::zeros((texts.len(), max_len));

    for (row, encoding) in encodings.iter().enumerate() {
        for (col, (&id, &mask)) in encoding
            .get_ids()
            .iter()
            .zip(encoding.get_attention_mask())
            .enumerate()
        {
            input_ids[[row, col]] = id as i64;
            attention_mask[[row, col]] = mask as i64;
        }
    }

    let mask_for_pooling = attention_mask.clone();
    Ok((input_ids, attention_mask, token_type_ids, mask_for_pooling))
}

/// Averages token embeddings, weighted by the attention mask
fn mean_pool(token_embeddings: ArrayView2<'_, f32>, mask: &[i64]) -> Vec<f32> {
    let hidden_dim = token_embeddings.shape()[1];
    let mut pooled = vec![0.0f32; hidden_dim];
    let mut sum_mask = 0.0f32;

    for (i, row) in token_embeddings.outer_iter().enumerate() {
        let mask_value = mask.get(i).copied().unwrap_or(0) as f32;
        if mask_value == 0.0 {
            continue;
        }
        sum_mask += mask_value;
        for (acc, value) in pooled.iter_mut().zip(row.iter()) {
            *acc += value * mask_value;
        }
    }

    for val in &mut pooled {
        *val /= sum_mask.max(1e-9);
    }
    pooled
}

fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 1e-12 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}
