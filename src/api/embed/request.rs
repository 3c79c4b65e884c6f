// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Request bodies for the embedding endpoints

use serde::{Deserialize, Serialize};

/// Request body for `POST /embed`
///
/// # Example
/// ```json
/// {
///   "text": "Shimano Twin Power",
///   "model": "sentence-transformers/all-MiniLM-L6-v2"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbedRequest {
    pub text: String,

    /// Model identifier; the service default when absent or empty
    #[serde(default)]
    pub model: Option<String>,
}

/// Request body for `POST /embed-batch`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchEmbedRequest {
    pub texts: Vec<String>,

    #[serde(default)]
    pub model: Option<String>,
}
