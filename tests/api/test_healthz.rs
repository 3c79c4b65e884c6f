// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! `GET /healthz`

use super::helpers::*;
use axum::http::StatusCode;
use fabstir_embed_cache::version::VERSION_NUMBER;
use std::sync::Arc;

#[tokio::test]
async fn test_healthz_reports_ok() {
    let app = test_app();

    let (status, body) = send(&app.router, get("/healthz")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model"], DEFAULT_MODEL);
    assert_eq!(body["cache"], "lru");
    assert_eq!(body["loadedModels"], serde_json::json!([DEFAULT_MODEL]));
    assert_eq!(body["version"], VERSION_NUMBER);
    assert_eq!(app.counters.loads(), 1);
}

#[tokio::test]
async fn test_healthz_loads_requested_model() {
    let app = test_app();

    let (status, body) = send(&app.router, get("/healthz?model=intfloat/e5-small-v2")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model"], "intfloat/e5-small-v2");
    assert_eq!(body["loadedModels"], serde_json::json!(["intfloat/e5-small-v2"]));
}

#[tokio::test]
async fn test_healthz_reports_store_backend() {
    let app = test_app_with(TEST_KEY, Arc::new(FailingCache));

    let (status, body) = send(&app.router, get("/healthz")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cache"], "redis");
}

#[tokio::test]
async fn test_healthz_model_failure_is_500() {
    let app = test_app();

    let (status, body) = send(&app.router, get("/healthz?model=broken/model")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "error");
    assert!(body["error"].as_str().unwrap().contains("broken/model"));
}
