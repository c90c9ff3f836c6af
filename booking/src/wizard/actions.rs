//! Actions for the reservation wizard.

use crate::types::{ExtraId, PackageId, PaymentMethod};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Every input the wizard reducer processes. Each UI interaction maps
/// to exactly one action; there are no other ways to mutate the state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum WizardAction {
    /// Select or clear the reservation date. Clears the time slot:
    /// a slot is only valid for the date it was chosen under.
    SetDate {
        /// New date, or `None` to clear
        date: Option<NaiveDate>,
    },

    /// Select a package. Clears the time slot; when the package offers
    /// exactly one predefined slot, that slot is selected immediately.
    SetPackage {
        /// Catalog id of the package
        package_id: PackageId,
    },

    /// Select or clear the time slot. Same-day slots whose start has
    /// already passed are refused.
    SetTimeSlot {
        /// Slot token (slot id or composed range), or `None` to clear
        time_slot: Option<String>,
    },

    /// Set the adult count (clamped to the headcount cap; pinned to 2
    /// while the couple package is active).
    SetAdults {
        /// Requested count; negative values clamp to zero
        adults: i32,
    },

    /// Set the kid count (clamped to the headcount cap; at most 1
    /// while the couple package is active).
    SetKids {
        /// Requested count; negative values clamp to zero
        kids: i32,
    },

    /// Toggle one extra on or off. Ids not present in the catalog are
    /// ignored.
    SetExtra {
        /// Extra to toggle
        id: ExtraId,
        /// New selection state
        selected: bool,
    },

    /// Enable or disable the couple package. Enabling forces 2 adults
    /// and clamps kids to at most 1.
    SetCouplePackage {
        /// New flag value
        enabled: bool,
    },

    /// Choose or clear the payment method. Disabled methods are
    /// refused.
    SetPayment {
        /// Chosen method, or `None` to clear
        method: Option<PaymentMethod>,
    },

    /// Jump to a step, clamped to the active stage sequence.
    SetStep {
        /// Requested 1-based step
        step: i32,
    },

    /// Advance one step (clamped).
    NextStep,

    /// Go back one step (clamped).
    PrevStep,
}
