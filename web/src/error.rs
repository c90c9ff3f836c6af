//! Error types for web handlers.
//!
//! This module defines the error type that bridges between domain
//! errors and HTTP responses, implementing Axum's `IntoResponse` trait.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

/// Application error type for web handlers.
///
/// Carries an HTTP status and a stable machine-readable error code.
/// The code is the whole client contract: responses serialize as
/// `{"error": "<code>"}` (plus an optional `detail` string when one
/// was attached explicitly). Internal source errors are logged, never
/// exposed.
///
/// # Examples
///
/// ```ignore
/// async fn handler() -> Result<Json<Data>, ApiError> {
///     let pkg = find_package(&id).await
///         .ok_or_else(|| ApiError::bad_request("CM_INVALID_PACKAGE"))?;
///     Ok(Json(pkg))
/// }
/// ```
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status code
    status: StatusCode,
    /// Stable error code (the `error` field on the wire)
    code: String,
    /// Optional human-readable detail, included on the wire when set
    detail: Option<String>,
    /// Internal error (for logging, not exposed to client)
    source: Option<anyhow::Error>,
}

impl ApiError {
    /// Create a new application error.
    #[must_use]
    pub const fn new(status: StatusCode, code: String) -> Self {
        Self {
            status,
            code,
            detail: None,
            source: None,
        }
    }

    /// Attach a human-readable detail included in the response body.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Attach a source error kept for logging only.
    #[must_use]
    pub fn with_source(mut self, source: anyhow::Error) -> Self {
        self.source = Some(source);
        self
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(code: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code.into())
    }

    /// Create a 401 Unauthorized error.
    #[must_use]
    pub fn unauthorized(code: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, code.into())
    }

    /// Create a 404 Not Found error.
    #[must_use]
    pub fn not_found(code: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, code.into())
    }

    /// Create a 500 Internal Server Error.
    #[must_use]
    pub fn internal(code: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, code.into())
    }

    /// The stable error code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The HTTP status code.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status.as_u16(), self.code)
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Error response body (JSON).
#[derive(Debug, Serialize)]
struct ErrorResponse {
    /// Stable error code.
    error: String,
    /// Optional human-readable detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Log internal errors
        if self.status.is_server_error() {
            if let Some(source) = &self.source {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    error = %source,
                    "Internal server error"
                );
            } else {
                tracing::error!(
                    status = %self.status,
                    code = %self.code,
                    "Internal server error"
                );
            }
        }

        let body = ErrorResponse {
            error: self.code,
            detail: self.detail,
        };

        (self.status, Json(body)).into_response()
    }
}

/// Convert `anyhow::Error` to `ApiError`.
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal("unknown_error").with_source(err)
    }
}
