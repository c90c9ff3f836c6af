//! Reservation creation endpoint.
//!
//! `POST /api/reservations` requires an authenticated caller,
//! validates payload shape, resolves the booking window through the
//! same resolver the availability probe uses, and forwards everything
//! to the backend's atomic create-reservation procedure.

use crate::backend::{BackendError, ExtraSelection, NewReservation};
use crate::server::state::AppState;
use crate::session::SessionUser;
use crate::submission::ErrorCode;
use crate::timerange::{TimeRangeError, resolve_time_range};
use crate::types::{CabinId, ExtraId, PackageId, PaymentMethod, ReservationId};
use axum::{Json, extract::State, extract::rejection::JsonRejection};
use cabanamar_web::ApiError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Request/Response Types
// ============================================================================

/// One extra on the reservation payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtraSelectionWire {
    /// Extra id
    #[serde(default)]
    pub id: Option<String>,
    /// Quantity, defaulting to one
    #[serde(default)]
    pub quantity: Option<u32>,
}

/// Reservation creation payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationRequest {
    /// Package id
    #[serde(default)]
    pub package_id: Option<String>,
    /// Reservation date, `YYYY-MM-DD`
    #[serde(default)]
    pub date: Option<String>,
    /// Slot token
    #[serde(default)]
    pub time_slot: Option<String>,
    /// Adults attending
    #[serde(default)]
    pub adults: Option<i64>,
    /// Kids attending
    #[serde(default)]
    pub kids: Option<i64>,
    /// Selected extras
    #[serde(default)]
    pub extras: Vec<ExtraSelectionWire>,
    /// Payment method, defaulting to cash on arrival
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    /// Free-text request from the guest
    #[serde(default)]
    pub special_request: Option<String>,
}

/// Reservation creation result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReservationResponse {
    /// Created reservation id
    pub id: ReservationId,
    /// Cabin assigned to it
    pub cabin_id: CabinId,
    /// Total charged, fractional dollars
    pub total: f64,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn clamp_count(value: Option<i64>) -> u32 {
    u32::try_from(value.unwrap_or(0).max(0)).unwrap_or(u32::MAX)
}

// ============================================================================
// Handler
// ============================================================================

/// Create a reservation for the authenticated customer.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/api/reservations \
///   -H "Authorization: Bearer <session_token>" \
///   -H "Content-Type: application/json" \
///   -d '{
///     "packageId": "4H",
///     "date": "2025-06-10",
///     "timeSlot": "08:00-12:00",
///     "adults": 4,
///     "kids": 0,
///     "extras": [{"id": "paddleboard", "quantity": 1}],
///     "paymentMethod": "CASH"
///   }'
/// ```
///
/// Response:
/// ```json
/// { "id": "…", "cabinId": "…", "total": 58.0 }
/// ```
///
/// # Errors
///
/// HTTP 401 `not_authenticated` without a valid session; HTTP 400 for
/// shape violations (`invalid_payload`, `missing_fields`,
/// `invalid_package`, `CM_INVALID_TIME_RANGE`) and for domain
/// rejections, which carry the backend procedure's message as the
/// code.
pub async fn create_reservation(
    session: SessionUser,
    State(state): State<AppState>,
    payload: Result<Json<CreateReservationRequest>, JsonRejection>,
) -> Result<Json<CreateReservationResponse>, ApiError> {
    let Json(request) =
        payload.map_err(|_| ApiError::bad_request(ErrorCode::InvalidPayload.as_str()))?;

    let (Some(package_id), Some(date), Some(time_slot)) = (
        non_empty(request.package_id.as_ref()),
        non_empty(request.date.as_ref()),
        non_empty(request.time_slot.as_ref()),
    ) else {
        return Err(ApiError::bad_request(ErrorCode::MissingFields.as_str()));
    };

    let package_id = PackageId::new(package_id);
    let package = state
        .backend
        .fetch_package(&package_id)
        .await
        .map_err(|e| {
            ApiError::internal(ErrorCode::UnknownError.as_str()).with_source(anyhow::anyhow!(e))
        })?
        .ok_or_else(|| ApiError::bad_request("invalid_package"))?;

    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| ApiError::bad_request(ErrorCode::InvalidTimeRange.as_str()))?;

    let range =
        resolve_time_range(date, time_slot, package.duration_minutes).map_err(|err| match err {
            TimeRangeError::InvalidPackage => ApiError::bad_request("invalid_package"),
            TimeRangeError::InvalidTimeSlot(_) => {
                ApiError::bad_request(ErrorCode::InvalidTimeRange.as_str())
            }
        })?;

    let extras: Vec<ExtraSelection> = request
        .extras
        .iter()
        .filter_map(|extra| {
            let id = non_empty(extra.id.as_ref())?;
            Some(ExtraSelection {
                id: ExtraId::new(id),
                quantity: extra.quantity.unwrap_or(1),
            })
        })
        .collect();

    let reservation = NewReservation {
        package_id: package_id.clone(),
        date,
        range,
        adults: clamp_count(request.adults),
        kids: clamp_count(request.kids),
        payment_method: request.payment_method.unwrap_or(PaymentMethod::Cash),
        extras,
        special_request: request.special_request.clone(),
        customer_id: session.customer_id(),
    };

    match state.backend.create_reservation(&reservation).await {
        Ok(created) => {
            tracing::info!(
                reservation = %created.reservation_id,
                cabin = %created.cabin_id,
                customer = %reservation.customer_id,
                package = %package_id,
                "reservation created"
            );
            Ok(Json(CreateReservationResponse {
                id: created.reservation_id,
                cabin_id: created.cabin_id,
                total: created.total.as_wire_dollars(),
            }))
        }
        // The procedure's message is the error code; the submission
        // client maps it to a user-facing message.
        Err(BackendError::Domain(message)) => Err(ApiError::bad_request(message)),
        Err(err @ BackendError::Transport(_)) => Err(ApiError::internal(
            ErrorCode::UnknownError.as_str(),
        )
        .with_source(anyhow::anyhow!(err))),
    }
}
