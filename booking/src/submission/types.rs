//! Core types for the submission flow.

use crate::backend::ExtraSelection;
use crate::catalog::Catalog;
use crate::submission::errors::ErrorCode;
use crate::types::{ConfirmationRecord, PackageId, PaymentMethod};
use crate::wizard::WizardState;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The serialized form of a completed wizard session: exactly what the
/// reservation endpoint needs, nothing else.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReservationDraft {
    /// Package booked
    pub package_id: PackageId,
    /// Reserved date
    pub date: NaiveDate,
    /// Slot token as selected
    pub time_slot: String,
    /// Adults attending
    pub adults: u32,
    /// Kids attending
    pub kids: u32,
    /// Selected extras, quantity one each
    pub extras: Vec<ExtraSelection>,
    /// Payment method
    pub payment_method: PaymentMethod,
    /// Free-text request from the guest
    pub special_request: Option<String>,
}

impl ReservationDraft {
    /// Serializes a wizard session into a draft. Returns `None` while
    /// the session is incomplete (no date, package, slot, or payment
    /// method). Submission is gated on stage completeness anyway, so
    /// an incomplete draft is a programming error upstream, not a user
    /// error.
    #[must_use]
    pub fn from_wizard(state: &WizardState, catalog: &Catalog) -> Option<Self> {
        let package_id = state.package_id.clone()?;
        let date = state.date?;
        let time_slot = state.time_slot.clone()?;
        let payment_method = state.payment_method?;

        // Selected extras in catalog order, one of each.
        let extras = catalog
            .extras
            .iter()
            .filter(|extra| state.extras.get(&extra.id).copied().unwrap_or(false))
            .map(|extra| ExtraSelection {
                id: extra.id.clone(),
                quantity: 1,
            })
            .collect();

        Some(Self {
            package_id,
            date,
            time_slot,
            adults: state.adults,
            kids: state.kids,
            extras,
            payment_method,
            special_request: None,
        })
    }

    /// Adds the guest's free-text request.
    #[must_use]
    pub fn with_special_request(mut self, request: impl Into<String>) -> Self {
        self.special_request = Some(request.into());
        self
    }

    /// The availability probe for this draft's window.
    #[must_use]
    pub fn probe(&self) -> AvailabilityProbe {
        AvailabilityProbe {
            package_id: self.package_id.clone(),
            date: self.date,
            time_slot: self.time_slot.clone(),
            adults: self.adults,
            kids: self.kids,
        }
    }
}

/// The availability probe payload, shaped from a draft.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityProbe {
    /// Package id
    pub package_id: PackageId,
    /// Reservation date
    pub date: NaiveDate,
    /// Slot token
    pub time_slot: String,
    /// Adults attending
    pub adults: u32,
    /// Kids attending
    pub kids: u32,
}

/// Lifecycle status of one submission attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionStatus {
    /// Nothing in flight
    Idle,
    /// Request sent, response pending; further submits are ignored
    Submitting,
    /// Reservation created, waiting on the phone prompt
    NeedsPhone,
    /// Reservation created and confirmed
    Succeeded,
    /// Submission rejected
    Failed(ErrorCode),
}

/// State owned by the submission reducer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmissionState {
    /// Current lifecycle status
    pub status: SubmissionStatus,
    /// The confirmation built on success
    pub confirmation: Option<ConfirmationRecord>,
}

impl SubmissionState {
    /// Fresh idle state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            status: SubmissionStatus::Idle,
            confirmation: None,
        }
    }

    /// Whether a request is in flight (the submit control disables on
    /// this).
    #[must_use]
    pub const fn in_flight(&self) -> bool {
        matches!(self.status, SubmissionStatus::Submitting)
    }

    /// The fixed user-facing message for a failed submission.
    #[must_use]
    pub const fn failure_message(&self) -> Option<&'static str> {
        match self.status {
            SubmissionStatus::Failed(code) => Some(code.user_message()),
            _ => None,
        }
    }
}

impl Default for SubmissionState {
    fn default() -> Self {
        Self::new()
    }
}
