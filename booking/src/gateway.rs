//! Client-side gateway to the reservation endpoints.
//!
//! The submission flow talks to the two server boundary calls (the
//! availability probe and reservation creation) through this trait
//! rather than a concrete HTTP client, so the whole client state
//! machine is testable against a mock. [`HttpReservationGateway`] is
//! the production implementation; [`MockReservationGateway`] scripts
//! outcomes for tests.

use crate::api::availability::{AvailabilityRequest, AvailabilityResponse};
use crate::api::reservations::{CreateReservationRequest, CreateReservationResponse, ExtraSelectionWire};
use crate::backend::CreatedReservation;
use crate::submission::{AvailabilityProbe, ErrorCode, ReservationDraft};
use crate::types::{CabinId, Money, ReservationId};
use async_trait::async_trait;
use tokio::sync::Mutex;

/// Gateway call result; failures are already normalized into the
/// closed error taxonomy.
pub type GatewayResult<T> = Result<T, ErrorCode>;

/// Result of the availability probe, as the client sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AvailabilityOutcome {
    /// Whether a cabin is free
    pub available: bool,
    /// The cabin the backend would assign
    pub cabin_id: Option<CabinId>,
    /// Domain-level rejection accompanying a "no"
    pub error: Option<ErrorCode>,
}

/// The client's view of the reservation endpoints.
#[async_trait]
pub trait ReservationGateway: Send + Sync {
    /// Probes whether a cabin is free for the draft's window.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorCode`] for request-shape rejections or
    /// transport failures.
    async fn check_availability(
        &self,
        probe: &AvailabilityProbe,
    ) -> GatewayResult<AvailabilityOutcome>;

    /// Creates the reservation.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorCode`] normalized from the endpoint's error
    /// response.
    async fn create_reservation(
        &self,
        draft: &ReservationDraft,
    ) -> GatewayResult<CreatedReservation>;

    /// Stores the customer's contact phone.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorCode`] normalized from the endpoint's error
    /// response.
    async fn save_phone(&self, phone: &str) -> GatewayResult<()>;
}

// ============================================================================
// HTTP implementation
// ============================================================================

/// Gateway over HTTP against the booking API.
pub struct HttpReservationGateway {
    http: reqwest::Client,
    base_url: String,
    session_token: String,
}

impl HttpReservationGateway {
    /// Creates a gateway for the given API base URL and session token.
    #[must_use]
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        session_token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            session_token: session_token.into(),
        }
    }

    /// Normalizes a non-success response into an error code.
    async fn error_code(response: reqwest::Response) -> ErrorCode {
        let status = response.status();
        let body: serde_json::Value = response.json().await.unwrap_or_default();
        let from_body = body
            .get("error")
            .and_then(|v| v.as_str())
            .map(|text| {
                ErrorCode::from_wire(text).unwrap_or_else(|| ErrorCode::from_backend_message(text))
            });
        from_body.unwrap_or(if status == reqwest::StatusCode::UNAUTHORIZED {
            ErrorCode::NotAuthenticated
        } else {
            ErrorCode::UnknownError
        })
    }
}

#[async_trait]
impl ReservationGateway for HttpReservationGateway {
    async fn check_availability(
        &self,
        probe: &AvailabilityProbe,
    ) -> GatewayResult<AvailabilityOutcome> {
        let request = AvailabilityRequest {
            package_id: Some(probe.package_id.as_str().to_string()),
            date: Some(probe.date.format("%Y-%m-%d").to_string()),
            time_slot: Some(probe.time_slot.clone()),
            adults: Some(i64::from(probe.adults)),
            kids: Some(i64::from(probe.kids)),
        };
        let response = self
            .http
            .post(format!("{}/api/availability", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|_| ErrorCode::UnknownError)?;

        if !response.status().is_success() {
            return Err(Self::error_code(response).await);
        }
        let body: AvailabilityResponse =
            response.json().await.map_err(|_| ErrorCode::UnknownError)?;
        Ok(AvailabilityOutcome {
            available: body.available,
            cabin_id: body.cabin_id,
            error: body
                .error
                .as_deref()
                .map(|code| ErrorCode::from_wire(code).unwrap_or(ErrorCode::UnknownError)),
        })
    }

    async fn create_reservation(
        &self,
        draft: &ReservationDraft,
    ) -> GatewayResult<CreatedReservation> {
        let request = CreateReservationRequest {
            package_id: Some(draft.package_id.as_str().to_string()),
            date: Some(draft.date.format("%Y-%m-%d").to_string()),
            time_slot: Some(draft.time_slot.clone()),
            adults: Some(i64::from(draft.adults)),
            kids: Some(i64::from(draft.kids)),
            extras: draft
                .extras
                .iter()
                .map(|extra| ExtraSelectionWire {
                    id: Some(extra.id.as_str().to_string()),
                    quantity: Some(extra.quantity),
                })
                .collect(),
            payment_method: Some(draft.payment_method),
            special_request: draft.special_request.clone(),
        };
        let response = self
            .http
            .post(format!("{}/api/reservations", self.base_url))
            .bearer_auth(&self.session_token)
            .json(&request)
            .send()
            .await
            .map_err(|_| ErrorCode::UnknownError)?;

        if !response.status().is_success() {
            return Err(Self::error_code(response).await);
        }
        let body: CreateReservationResponse =
            response.json().await.map_err(|_| ErrorCode::UnknownError)?;
        Ok(CreatedReservation {
            reservation_id: body.id,
            cabin_id: body.cabin_id,
            total: Money::from_wire_dollars(body.total),
        })
    }

    async fn save_phone(&self, phone: &str) -> GatewayResult<()> {
        let response = self
            .http
            .post(format!("{}/api/profile/phone", self.base_url))
            .bearer_auth(&self.session_token)
            .json(&serde_json::json!({ "phone": phone }))
            .send()
            .await
            .map_err(|_| ErrorCode::UnknownError)?;

        if !response.status().is_success() {
            return Err(Self::error_code(response).await);
        }
        Ok(())
    }
}

// ============================================================================
// Mock implementation
// ============================================================================

/// Scriptable gateway for tests: every call records its input and
/// answers with a preconfigured outcome.
pub struct MockReservationGateway {
    availability: Mutex<GatewayResult<AvailabilityOutcome>>,
    create: Mutex<GatewayResult<CreatedReservation>>,
    probes: Mutex<Vec<AvailabilityProbe>>,
    drafts: Mutex<Vec<ReservationDraft>>,
    phones: Mutex<Vec<String>>,
}

impl MockReservationGateway {
    /// A gateway where both calls succeed.
    #[must_use]
    pub fn succeeding() -> Self {
        let cabin_id = CabinId::new();
        Self {
            availability: Mutex::new(Ok(AvailabilityOutcome {
                available: true,
                cabin_id: Some(cabin_id),
                error: None,
            })),
            create: Mutex::new(Ok(CreatedReservation {
                reservation_id: ReservationId::new(),
                cabin_id,
                total: Money::from_cents(4800),
            })),
            probes: Mutex::new(Vec::new()),
            drafts: Mutex::new(Vec::new()),
            phones: Mutex::new(Vec::new()),
        }
    }

    /// Scripts the availability probe to report no free cabin.
    #[must_use]
    pub fn unavailable(code: ErrorCode) -> Self {
        let gateway = Self::succeeding();
        if let Ok(mut outcome) = gateway.availability.try_lock() {
            *outcome = Ok(AvailabilityOutcome {
                available: false,
                cabin_id: None,
                error: Some(code),
            });
        }
        gateway
    }

    /// Scripts reservation creation to fail with the given code.
    #[must_use]
    pub fn failing_create(code: ErrorCode) -> Self {
        let gateway = Self::succeeding();
        if let Ok(mut create) = gateway.create.try_lock() {
            *create = Err(code);
        }
        gateway
    }

    /// Drafts passed to `create_reservation` so far.
    pub async fn recorded_drafts(&self) -> Vec<ReservationDraft> {
        self.drafts.lock().await.clone()
    }

    /// Phones passed to `save_phone` so far.
    pub async fn recorded_phones(&self) -> Vec<String> {
        self.phones.lock().await.clone()
    }

    /// Probes passed to `check_availability` so far.
    pub async fn recorded_probes(&self) -> Vec<AvailabilityProbe> {
        self.probes.lock().await.clone()
    }
}

#[async_trait]
impl ReservationGateway for MockReservationGateway {
    async fn check_availability(
        &self,
        probe: &AvailabilityProbe,
    ) -> GatewayResult<AvailabilityOutcome> {
        self.probes.lock().await.push(probe.clone());
        *self.availability.lock().await
    }

    async fn create_reservation(
        &self,
        draft: &ReservationDraft,
    ) -> GatewayResult<CreatedReservation> {
        self.drafts.lock().await.push(draft.clone());
        *self.create.lock().await
    }

    async fn save_phone(&self, phone: &str) -> GatewayResult<()> {
        self.phones.lock().await.push(phone.to_string());
        Ok(())
    }
}
