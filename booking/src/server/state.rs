//! Application state for the booking HTTP server.

use crate::backend::BookingBackend;
use crate::session::SessionStore;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cloned (cheaply via Arc) for each request. The backend is the
/// injected collaborator behind both atomic procedures; the session
/// store resolves bearer tokens for authenticated endpoints.
#[derive(Clone)]
pub struct AppState {
    /// The booking backend collaborator
    pub backend: Arc<dyn BookingBackend>,

    /// Session token resolution
    pub sessions: Arc<dyn SessionStore>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(backend: Arc<dyn BookingBackend>, sessions: Arc<dyn SessionStore>) -> Self {
        Self { backend, sessions }
    }
}
