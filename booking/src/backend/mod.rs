//! The booking backend collaborator.
//!
//! The system's mutual-exclusion guarantee, that no two reservations
//! share a cabin in overlapping windows, lives behind this boundary,
//! inside the backend's atomic procedures. The application never talks
//! to a datastore directly: endpoints and the submission flow go
//! through [`BookingBackend`], production wires the PostgREST-backed
//! [`SupabaseBackend`], and tests race against the [`InMemoryBackend`]
//! fake, which honors the same atomicity contract under a mutex.

mod memory;
mod supabase;

pub use memory::{InMemoryBackend, demo_catalog};
pub use supabase::SupabaseBackend;

use crate::catalog::Catalog;
use crate::timerange::TimeRange;
use crate::types::{
    CabinId, CustomerId, ExtraId, Money, Package, PackageId, PaymentMethod, ReservationId,
};
use crate::wizard::FormConfig;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One selected extra on a reservation payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraSelection {
    /// Extra id
    pub id: ExtraId,
    /// Quantity, defaulting to one per reservation
    pub quantity: u32,
}

/// The full payload of the atomic create-reservation procedure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewReservation {
    /// Package booked
    pub package_id: PackageId,
    /// Reserved calendar date
    pub date: NaiveDate,
    /// Resolved absolute window
    pub range: TimeRange,
    /// Adults attending
    pub adults: u32,
    /// Kids attending
    pub kids: u32,
    /// Payment method
    pub payment_method: PaymentMethod,
    /// Selected extras
    pub extras: Vec<ExtraSelection>,
    /// Free-text request from the guest
    pub special_request: Option<String>,
    /// The authenticated caller
    pub customer_id: CustomerId,
}

/// Result of the atomic create-reservation procedure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedReservation {
    /// Created reservation id
    pub reservation_id: ReservationId,
    /// Cabin assigned to it
    pub cabin_id: CabinId,
    /// Total charged
    pub total: Money,
}

/// Failure of a backend call.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The procedure rejected the request for a domain reason. The
    /// message embeds a stable token (`CM_...`, `no_cabin_available`)
    /// that the error taxonomy extracts.
    #[error("{0}")]
    Domain(String),

    /// The backend could not be reached or answered malformed data.
    #[error("backend transport failure: {0}")]
    Transport(String),
}

impl BackendError {
    /// Domain rejection with the given procedure message.
    #[must_use]
    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain(message.into())
    }

    /// Transport-level failure.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }
}

/// The backend boundary: reference-data reads plus the two atomic
/// procedures the reservation flow depends on.
#[async_trait]
pub trait BookingBackend: Send + Sync {
    /// Loads the package/slot/extra catalog.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Transport`] when the catalog cannot be
    /// fetched.
    async fn fetch_catalog(&self) -> Result<Catalog, BackendError>;

    /// Loads the remote wizard form configuration, if one is active.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Transport`] on fetch failure; an absent
    /// config is `Ok(None)`.
    async fn fetch_form_config(&self) -> Result<Option<FormConfig>, BackendError>;

    /// Looks up a single package.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Transport`] on fetch failure; an
    /// unknown id is `Ok(None)`.
    async fn fetch_package(&self, id: &PackageId) -> Result<Option<Package>, BackendError>;

    /// Atomically finds a cabin free for the window and headcount.
    /// `Ok(None)` means no assignment without a domain-level error.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Domain`] for procedure rejections
    /// (`no_cabin_available`, `max_people_exceeded`) and
    /// [`BackendError::Transport`] for I/O failures.
    async fn assign_cabin(
        &self,
        range: &TimeRange,
        people: u32,
    ) -> Result<Option<CabinId>, BackendError>;

    /// Atomically assigns a cabin and creates the reservation.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Domain`] for procedure rejections and
    /// [`BackendError::Transport`] for I/O failures.
    async fn create_reservation(
        &self,
        reservation: &NewReservation,
    ) -> Result<CreatedReservation, BackendError>;

    /// Stores the customer's contact phone.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Transport`] when the write fails.
    async fn save_phone(&self, customer_id: CustomerId, phone: &str) -> Result<(), BackendError>;
}
