// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Embedding API Module
//!
//! `POST /embed` (cached, single text) and `POST /embed-batch` (uncached,
//! many texts).

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{embed_batch_handler, embed_handler};
pub use request::{BatchEmbedRequest, EmbedRequest};
pub use response::{BatchEmbedResponse, EmbedResponse};
