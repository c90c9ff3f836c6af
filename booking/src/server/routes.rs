//! Router configuration for the booking system.
//!
//! Builds the complete Axum router with all endpoints.

use super::health::{health_check, readiness_check};
use super::state::AppState;
use crate::api::{availability, profile, reservations};
use axum::{Router, routing::get, routing::post};

/// Build the complete Axum router.
///
/// Configures all routes:
/// - Health checks (no authentication)
/// - The availability probe (no authentication)
/// - Reservation creation and the phone update (session required)
///
/// # Arguments
///
/// - `state`: Application state to share with handlers
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/availability", post(availability::check_availability))
        .route("/reservations", post(reservations::create_reservation))
        .route("/profile/phone", post(profile::save_phone));

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .nest("/api", api_routes)
        .with_state(state)
}
