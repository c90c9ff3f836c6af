//! Availability probe endpoint.
//!
//! `POST /api/availability` resolves the requested window and asks the
//! backend's atomic assignment procedure for a free cabin. Shape
//! violations fail fast with HTTP 400; a domain-level "no" from the
//! backend is still HTTP 200 with `available: false` and a structured
//! code; only malformed input is an HTTP error.

use crate::server::state::AppState;
use crate::submission::ErrorCode;
use crate::timerange::{TimeRangeError, resolve_time_range};
use crate::types::{CabinId, PackageId};
use axum::{Json, extract::State, extract::rejection::JsonRejection};
use cabanamar_web::ApiError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Availability probe payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest {
    /// Package id
    #[serde(default)]
    pub package_id: Option<String>,
    /// Reservation date, `YYYY-MM-DD`
    #[serde(default)]
    pub date: Option<String>,
    /// Slot token (slot id or composed range)
    #[serde(default)]
    pub time_slot: Option<String>,
    /// Adults attending
    #[serde(default)]
    pub adults: Option<i64>,
    /// Kids attending
    #[serde(default)]
    pub kids: Option<i64>,
}

/// Availability probe result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    /// Whether a cabin is free for the window
    pub available: bool,
    /// The cabin the procedure would assign
    pub cabin_id: Option<CabinId>,
    /// Domain-level rejection code, when the backend said no
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn count(value: Option<i64>) -> i64 {
    value.unwrap_or(0).max(0)
}

// ============================================================================
// Handler
// ============================================================================

/// Probe cabin availability for a package, date, and slot.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/availability \
///   -H "Content-Type: application/json" \
///   -d '{"packageId":"4H","date":"2025-06-10","timeSlot":"08:00-12:00","adults":4,"kids":0}'
/// ```
///
/// Response:
/// ```json
/// { "available": true, "cabinId": "550e8400-e29b-41d4-a716-446655440000" }
/// ```
///
/// # Errors
///
/// HTTP 400 with a structured code for malformed input
/// (`invalid_payload`, `missing_fields`, `CM_INVALID_PEOPLE_COUNT`,
/// `CM_INVALID_PACKAGE`, `CM_INVALID_TIME_RANGE`). Domain-level
/// rejections respond HTTP 200 with `available: false`.
pub async fn check_availability(
    State(state): State<AppState>,
    payload: Result<Json<AvailabilityRequest>, JsonRejection>,
) -> Result<Json<AvailabilityResponse>, ApiError> {
    let Json(request) =
        payload.map_err(|_| ApiError::bad_request(ErrorCode::InvalidPayload.as_str()))?;

    let (Some(package_id), Some(date), Some(time_slot)) = (
        non_empty(request.package_id.as_ref()),
        non_empty(request.date.as_ref()),
        non_empty(request.time_slot.as_ref()),
    ) else {
        return Err(ApiError::bad_request(ErrorCode::MissingFields.as_str()));
    };

    let total_people = count(request.adults) + count(request.kids);
    if total_people <= 0 {
        return Err(ApiError::bad_request(ErrorCode::InvalidPeopleCount.as_str()));
    }
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    let total_people = total_people as u32;

    let package_id = PackageId::new(package_id);
    let package = state
        .backend
        .fetch_package(&package_id)
        .await
        .map_err(|e| {
            ApiError::internal(ErrorCode::UnknownError.as_str()).with_source(anyhow::anyhow!(e))
        })?
        .ok_or_else(|| ApiError::bad_request(ErrorCode::InvalidPackage.as_str()))?;

    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| ApiError::bad_request(ErrorCode::InvalidTimeRange.as_str()))?;

    let range =
        resolve_time_range(date, time_slot, package.duration_minutes).map_err(|err| match err {
            TimeRangeError::InvalidPackage => {
                ApiError::bad_request(ErrorCode::InvalidPackage.as_str())
            }
            TimeRangeError::InvalidTimeSlot(_) => {
                ApiError::bad_request(ErrorCode::InvalidTimeRange.as_str())
            }
        })?;

    match state.backend.assign_cabin(&range, total_people).await {
        Ok(cabin) => {
            tracing::debug!(
                package = %package_id,
                start = %range.start,
                end = %range.end,
                people = total_people,
                available = cabin.is_some(),
                "availability probe"
            );
            Ok(Json(AvailabilityResponse {
                available: cabin.is_some(),
                cabin_id: cabin,
                error: None,
            }))
        }
        Err(crate::backend::BackendError::Domain(message)) => {
            let code = ErrorCode::from_backend_message(&message);
            tracing::debug!(%code, "availability rejected by backend");
            Ok(Json(AvailabilityResponse {
                available: false,
                cabin_id: None,
                error: Some(code.as_str().to_string()),
            }))
        }
        Err(err @ crate::backend::BackendError::Transport(_)) => Err(ApiError::internal(
            ErrorCode::UnknownError.as_str(),
        )
        .with_source(anyhow::anyhow!(err))),
    }
}
