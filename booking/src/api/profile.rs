//! Contact phone endpoint.
//!
//! `POST /api/profile/phone` stores the customer's phone so the
//! confirmation flow can skip the phone prompt on later bookings.

use crate::backend::BackendError;
use crate::server::state::AppState;
use crate::session::SessionUser;
use crate::submission::ErrorCode;
use axum::{Json, extract::State, extract::rejection::JsonRejection};
use cabanamar_web::ApiError;
use serde::{Deserialize, Serialize};

/// Phone update payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhoneRequest {
    /// The phone number
    #[serde(default)]
    pub phone: Option<String>,
}

/// Phone update result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhoneResponse {
    /// Always true on success
    pub ok: bool,
}

/// Store the authenticated customer's contact phone.
///
/// # Errors
///
/// HTTP 401 `not_authenticated` without a valid session; HTTP 400
/// `invalid_payload` for a malformed body or `missing_phone` for a
/// blank number.
pub async fn save_phone(
    session: SessionUser,
    State(state): State<AppState>,
    payload: Result<Json<PhoneRequest>, JsonRejection>,
) -> Result<Json<PhoneResponse>, ApiError> {
    let Json(request) =
        payload.map_err(|_| ApiError::bad_request(ErrorCode::InvalidPayload.as_str()))?;

    let phone = request
        .phone
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::bad_request("missing_phone"))?;

    match state.backend.save_phone(session.customer_id(), phone).await {
        Ok(()) => Ok(Json(PhoneResponse { ok: true })),
        Err(BackendError::Domain(message)) => Err(ApiError::bad_request(message)),
        Err(err @ BackendError::Transport(_)) => Err(ApiError::internal(
            ErrorCode::UnknownError.as_str(),
        )
        .with_source(anyhow::anyhow!(err))),
    }
}
