// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! `POST /embed-batch`: one model call, no caching

use super::helpers::*;
use axum::http::StatusCode;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn test_batch_returns_one_vector_per_text() {
    let app = test_app();

    let (status, body) = send(
        &app.router,
        post_json(
            "/embed-batch",
            Some(TEST_KEY),
            json!({"texts": ["Shimano Twin Power", "Daiwa Certate", "Penn Slammer"]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model"], DEFAULT_MODEL);
    let embeddings = body["embeddings"].as_array().unwrap();
    assert_eq!(embeddings.len(), 3);
    for embedding in embeddings {
        assert_eq!(as_vector(embedding).len(), TEST_DIMENSION);
    }
    assert_eq!(app.counters.batches(), 1);
    assert!(body.get("cached").is_none());
}

#[tokio::test]
async fn test_batch_matches_single_embedding() {
    let app = test_app();

    let (_, batch) = send(
        &app.router,
        post_json("/embed-batch", Some(TEST_KEY), json!({"texts": ["hello"]})),
    )
    .await;
    let (_, single) = send(&app.router, post_json("/embed", Some(TEST_KEY), json!({"text": "hello"}))).await;

    assert_eq!(as_vector(&batch["embeddings"][0]), as_vector(&single["embedding"]));
    // The batch did not populate the cache
    assert_eq!(single["cached"], false);
}

#[tokio::test]
async fn test_batch_ignores_cache_backend() {
    let app = test_app_with(TEST_KEY, Arc::new(FailingCache));

    let (status, body) = send(
        &app.router,
        post_json("/embed-batch", Some(TEST_KEY), json!({"texts": ["a", "b"]})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["embeddings"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_empty_batch() {
    let app = test_app();

    let (status, body) = send(
        &app.router,
        post_json("/embed-batch", Some(TEST_KEY), json!({"texts": []})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["embeddings"].as_array().unwrap().is_empty());
    assert_eq!(app.counters.batches(), 0);
}

#[tokio::test]
async fn test_batch_model_load_failure() {
    let app = test_app();

    let (status, body) = send(
        &app.router,
        post_json(
            "/embed-batch",
            Some(TEST_KEY),
            json!({"texts": ["a"], "model": BROKEN_MODEL}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error_type"], "model_load_error");
}
