//! Reducer for the submission flow.

use crate::submission::actions::SubmissionAction;
use crate::submission::environment::SubmissionEnvironment;
use crate::submission::errors::ErrorCode;
use crate::submission::types::{ReservationDraft, SubmissionState, SubmissionStatus};
use crate::types::ConfirmationRecord;
use cabanamar_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

/// Reducer for the submission flow.
///
/// State transitions are synchronous; the network calls are returned
/// as [`Effect::Future`]s whose resulting actions feed back into this
/// reducer through the owning [`SubmissionStore`](super::SubmissionStore).
#[derive(Clone, Debug)]
pub struct SubmissionReducer;

impl SubmissionReducer {
    /// Creates a new `SubmissionReducer`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Builds the confirmation snapshot from the created reservation,
    /// resolving display labels from the catalog.
    fn build_confirmation(
        env: &SubmissionEnvironment,
        created: &crate::backend::CreatedReservation,
        draft: &ReservationDraft,
        profile: &crate::session::Profile,
    ) -> ConfirmationRecord {
        let package_label = env
            .catalog
            .package(&draft.package_id)
            .map_or_else(|| draft.package_id.to_string(), |pkg| pkg.label.clone());
        let extras = draft
            .extras
            .iter()
            .map(|extra| {
                env.catalog
                    .extra(&extra.id)
                    .map_or_else(|| extra.id.to_string(), |e| e.label.clone())
            })
            .collect();

        ConfirmationRecord {
            reservation_id: created.reservation_id,
            customer_id: profile.customer_id,
            display_name: profile.display_name.clone(),
            adults: draft.adults,
            kids: draft.kids,
            package_label,
            date: draft.date,
            time_slot: draft.time_slot.clone(),
            extras,
            cabin_id: created.cabin_id,
            total: created.total,
            created_at: env.clock.now(),
        }
    }
}

impl Default for SubmissionReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for SubmissionReducer {
    type State = SubmissionState;
    type Action = SubmissionAction;
    type Environment = SubmissionEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            SubmissionAction::Submit { draft, profile } => {
                // One request per session at a time.
                if state.in_flight() {
                    return smallvec![Effect::None];
                }
                state.status = SubmissionStatus::Submitting;

                let gateway = env.gateway.clone();
                smallvec![Effect::future(async move {
                    // Probe first; a definite "no" saves the create
                    // round-trip and carries a precise code.
                    match gateway.check_availability(&draft.probe()).await {
                        Ok(outcome) if !outcome.available => {
                            return Some(SubmissionAction::SubmissionFailed {
                                code: outcome.error.unwrap_or(ErrorCode::NoCabinAvailable),
                            });
                        }
                        Ok(_) => {}
                        Err(code) => {
                            return Some(SubmissionAction::SubmissionFailed { code });
                        }
                    }

                    match gateway.create_reservation(&draft).await {
                        Ok(created) => Some(SubmissionAction::SubmissionSucceeded {
                            created,
                            draft,
                            profile,
                        }),
                        Err(code) => Some(SubmissionAction::SubmissionFailed { code }),
                    }
                })]
            }

            SubmissionAction::SubmissionSucceeded {
                created,
                draft,
                profile,
            } => {
                if !state.in_flight() {
                    // Stale response after a reset; nothing to apply.
                    return smallvec![Effect::None];
                }
                let record = Self::build_confirmation(env, &created, &draft, &profile);
                state.confirmation = Some(record.clone());
                state.status = if profile.phone.is_none() {
                    SubmissionStatus::NeedsPhone
                } else {
                    SubmissionStatus::Succeeded
                };

                let confirmations = env.confirmations.clone();
                smallvec![Effect::future(async move {
                    if let Err(err) = confirmations.save(&record).await {
                        tracing::warn!(%err, "failed to persist confirmation record");
                    }
                    None
                })]
            }

            SubmissionAction::SubmissionFailed { code } => {
                if state.in_flight() {
                    state.status = SubmissionStatus::Failed(code);
                }
                smallvec![Effect::None]
            }

            SubmissionAction::ProvidePhone { phone } => {
                if state.status != SubmissionStatus::NeedsPhone {
                    return smallvec![Effect::None];
                }
                let gateway = env.gateway.clone();
                smallvec![Effect::future(async move {
                    if let Err(code) = gateway.save_phone(&phone).await {
                        // The confirmation view follows regardless;
                        // the number can be captured later.
                        tracing::warn!(%code, "failed to store contact phone");
                    }
                    Some(SubmissionAction::PhoneRecorded)
                })]
            }

            SubmissionAction::PhoneRecorded | SubmissionAction::DeclinePhone => {
                if state.status == SubmissionStatus::NeedsPhone {
                    state.status = SubmissionStatus::Succeeded;
                }
                smallvec![Effect::None]
            }

            SubmissionAction::Reset => {
                *state = SubmissionState::new();
                smallvec![Effect::None]
            }
        }
    }
}
