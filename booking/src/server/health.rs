//! Health check endpoints for the booking system.
//!
//! Provides endpoints for monitoring service health and readiness.

use super::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
}

/// Health check endpoint.
///
/// Returns 200 OK if the service is running.
/// This is a simple liveness check - it doesn't verify dependencies.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/health
/// # {"status":"ok","version":"0.1.0"}
/// ```
pub async fn health_check() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// Readiness check response.
#[derive(Serialize)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,
    /// Backend reachability
    pub backend: bool,
}

/// Readiness check endpoint.
///
/// Returns 200 OK when the backend collaborator answers; 503
/// otherwise, so load balancers stop routing traffic here.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let backend_ok = state.backend.fetch_form_config().await.is_ok();
    let status = if backend_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(ReadinessResponse {
            ready: backend_ok,
            backend: backend_ok,
        }),
    )
}
