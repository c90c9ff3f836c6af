//! Axum web framework integration for Cabanamar.
//!
//! This crate bridges the functional core (reducers, pure domain
//! logic) and the imperative shell (HTTP, JSON) by providing the
//! error type every handler in the workspace returns.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         Imperative Shell (Axum)         │  ← HTTP, JSON, sessions
//! │  - Request parsing                      │
//! │  - Response serialization               │
//! ├─────────────────────────────────────────┤
//! │         Functional Core                 │
//! │  - Pure business logic (reducers)       │  ← Testable at memory speed
//! │  - State transformations                │  ← No I/O, no side effects
//! │  - Effect descriptions (values)         │  ← Composable, inspectable
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Wire contract
//!
//! Failed requests respond with a stable machine-readable code:
//!
//! ```json
//! { "error": "missing_fields" }
//! ```
//!
//! Handlers return `Result<Json<T>, ApiError>`; the error's status and
//! code drive the response, and any internal source error is logged
//! but never exposed to the client.

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;

// Re-export key types for convenience
pub use error::ApiError;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, ApiError>;
