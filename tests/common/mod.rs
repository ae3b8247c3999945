// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Request, Response};
use std::sync::Arc;
use workout_map_log::config::Config;
use workout_map_log::db::MemoryStore;
use workout_map_log::models::Coords;
use workout_map_log::routes::create_router;
use workout_map_log::AppState;

/// Create a test app backed by an in-memory store.
/// Returns the router, the shared state and the store.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, Arc<MemoryStore>) {
    create_test_app_with(Config::default(), Arc::new(MemoryStore::new()))
}

/// Create a test app whose configured home position gives a location fix.
#[allow(dead_code)]
pub fn create_located_test_app() -> (axum::Router, Arc<AppState>, Arc<MemoryStore>) {
    let config = Config {
        home_position: Some(Coords::new(37.4, -122.1)),
        ..Config::default()
    };
    create_test_app_with(config, Arc::new(MemoryStore::new()))
}

#[allow(dead_code)]
pub fn create_test_app_with(
    config: Config,
    store: Arc<MemoryStore>,
) -> (axum::Router, Arc<AppState>, Arc<MemoryStore>) {
    let state = Arc::new(AppState::new(config, store.clone()));
    (create_router(state.clone()), state, store)
}

/// Build a JSON request.
#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a request without a body.
#[allow(dead_code)]
pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
