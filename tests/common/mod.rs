//! Common test utilities for integration tests
//!
//! Shared fixtures for the HTTP backend and session tests.

#![allow(dead_code)]

use std::sync::Arc;

use mockito::{Mock, Server, ServerGuard};
use trinity::adapters::HttpAssuranceBackend;
use trinity::domain::models::BackendConfig;
use trinity::services::AssuranceSession;

pub const TOKEN: &str = "abc123";

/// Backend configuration pointing at `base_url` with short timeouts
pub fn config_for(base_url: &str) -> BackendConfig {
    BackendConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
        connect_timeout_secs: 2,
        ..BackendConfig::default()
    }
}

pub fn backend_for(server: &ServerGuard) -> HttpAssuranceBackend {
    HttpAssuranceBackend::new(&config_for(&server.url())).expect("backend")
}

pub fn session_for(server: &ServerGuard) -> AssuranceSession {
    AssuranceSession::new(Arc::new(backend_for(server)))
}

pub async fn server() -> ServerGuard {
    Server::new_async().await
}

/// Mock a JSON answer for `method path`
pub async fn mock_json(
    server: &mut ServerGuard,
    method: &str,
    path: &str,
    status: usize,
    body: serde_json::Value,
) -> Mock {
    server
        .mock(method, path)
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

/// Mock a backend that accepts the license
pub async fn mock_valid_license(server: &mut ServerGuard) -> Mock {
    mock_json(
        server,
        "POST",
        "/api/license/verify",
        200,
        serde_json::json!({"status": "✅ License valid"}),
    )
    .await
}
