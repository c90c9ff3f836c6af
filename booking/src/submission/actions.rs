//! Actions for the submission flow.

use crate::backend::CreatedReservation;
use crate::session::Profile;
use crate::submission::errors::ErrorCode;
use crate::submission::types::ReservationDraft;

/// Every input the submission reducer processes.
#[derive(Clone, Debug)]
pub enum SubmissionAction {
    /// Submit a completed draft. Ignored while a request is in flight.
    Submit {
        /// The serialized wizard session
        draft: ReservationDraft,
        /// The submitting customer's profile
        profile: Profile,
    },

    /// The backend accepted the reservation.
    SubmissionSucceeded {
        /// The created reservation
        created: CreatedReservation,
        /// The draft it was created from
        draft: ReservationDraft,
        /// The submitting customer
        profile: Profile,
    },

    /// The backend (or the transport) rejected the submission.
    SubmissionFailed {
        /// Normalized rejection code
        code: ErrorCode,
    },

    /// The customer entered a phone number at the prompt.
    ProvidePhone {
        /// The number to store
        phone: String,
    },

    /// The phone call finished (stored or not; the confirmation view
    /// follows either way).
    PhoneRecorded,

    /// The customer declined the phone prompt.
    DeclinePhone,

    /// Discard the attempt and return to idle.
    Reset,
}
