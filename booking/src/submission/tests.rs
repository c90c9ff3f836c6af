//! Unit tests for the submission flow.
//!
//! Exercises the full client lifecycle against the mock gateway:
//! success with and without a stored phone, the phone prompt paths,
//! failure code mapping, the in-flight guard, and draft serialization.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code

use super::*;
use crate::backend::{ExtraSelection, demo_catalog};
use crate::confirmation::{ConfirmationStore, MemoryConfirmationStore};
use crate::gateway::MockReservationGateway;
use crate::session::Profile;
use crate::types::{CustomerId, ExtraId, PackageId, PaymentMethod};
use crate::wizard::{WizardAction, WizardEnvironment, WizardReducer, StageSequence, WizardState};
use cabanamar_core::reducer::Reducer;
use cabanamar_testing::{ReducerTest, assertions, test_clock};
use chrono::NaiveDate;
use std::sync::Arc;

fn draft() -> ReservationDraft {
    ReservationDraft {
        package_id: PackageId::new("4H"),
        date: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
        time_slot: "08:00-12:00".to_string(),
        adults: 4,
        kids: 0,
        extras: vec![ExtraSelection {
            id: ExtraId::new("paddleboard"),
            quantity: 1,
        }],
        payment_method: PaymentMethod::Cash,
        special_request: None,
    }
}

fn profile(phone: Option<&str>) -> Profile {
    Profile {
        customer_id: CustomerId::new(),
        display_name: "Ana".to_string(),
        email: Some("ana@example.com".to_string()),
        phone: phone.map(ToString::to_string),
    }
}

struct Harness {
    store: SubmissionStore,
    gateway: Arc<MockReservationGateway>,
    confirmations: Arc<MemoryConfirmationStore>,
}

fn harness(gateway: MockReservationGateway) -> Harness {
    let gateway = Arc::new(gateway);
    let confirmations = Arc::new(MemoryConfirmationStore::new());
    let env = SubmissionEnvironment::new(
        gateway.clone(),
        confirmations.clone(),
        Arc::new(demo_catalog()),
        Arc::new(test_clock()),
    );
    Harness {
        store: SubmissionStore::new(env),
        gateway,
        confirmations,
    }
}

// ============================================================================
// Draft serialization
// ============================================================================

#[test]
fn incomplete_wizard_state_yields_no_draft() {
    let catalog = demo_catalog();
    let state = WizardState::new(&catalog);
    assert!(ReservationDraft::from_wizard(&state, &catalog).is_none());
}

#[test]
fn draft_serializes_the_wizard_selection() {
    let catalog = demo_catalog();
    let env = WizardEnvironment::new(
        Arc::new(catalog.clone()),
        StageSequence::default(),
        Arc::new(test_clock()),
    );
    let reducer = WizardReducer::new();
    let mut state = WizardState::new(&catalog);

    for action in [
        WizardAction::SetPackage {
            package_id: PackageId::new("4H"),
        },
        WizardAction::SetDate {
            date: Some(NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()),
        },
        WizardAction::SetTimeSlot {
            time_slot: Some("08:00".to_string()),
        },
        WizardAction::SetAdults { adults: 4 },
        WizardAction::SetExtra {
            id: ExtraId::new("kayak_doble"),
            selected: true,
        },
        WizardAction::SetPayment {
            method: Some(PaymentMethod::Cash),
        },
    ] {
        reducer.reduce(&mut state, action, &env);
    }

    let draft = ReservationDraft::from_wizard(&state, &catalog).expect("complete session");
    assert_eq!(draft.package_id, PackageId::new("4H"));
    assert_eq!(draft.time_slot, "08:00");
    assert_eq!(draft.adults, 4);
    assert_eq!(
        draft.extras,
        vec![ExtraSelection {
            id: ExtraId::new("kayak_doble"),
            quantity: 1
        }]
    );

    let probe = draft.probe();
    assert_eq!(probe.package_id, draft.package_id);
    assert_eq!(probe.time_slot, draft.time_slot);
}

// ============================================================================
// Success paths
// ============================================================================

#[tokio::test]
async fn successful_submission_confirms_and_persists() {
    let h = harness(MockReservationGateway::succeeding());
    let profile = profile(Some("+507 6000-0000"));
    let customer_id = profile.customer_id;

    h.store
        .dispatch(SubmissionAction::Submit {
            draft: draft(),
            profile,
        })
        .await;

    let state = h.store.state().await;
    assert_eq!(state.status, SubmissionStatus::Succeeded);

    let confirmation = state.confirmation.expect("confirmation built");
    assert_eq!(confirmation.package_label, "4 horas");
    assert_eq!(confirmation.extras, vec!["Paddleboard".to_string()]);
    assert_eq!(confirmation.display_name, "Ana");

    // Persisted keyed by the customer.
    let stored = h.confirmations.load(customer_id).await.unwrap();
    assert_eq!(stored, Some(confirmation));

    // Both boundary calls happened, in order.
    assert_eq!(h.gateway.recorded_probes().await.len(), 1);
    assert_eq!(h.gateway.recorded_drafts().await.len(), 1);
}

#[tokio::test]
async fn missing_phone_passes_through_the_prompt() {
    let h = harness(MockReservationGateway::succeeding());
    h.store
        .dispatch(SubmissionAction::Submit {
            draft: draft(),
            profile: profile(None),
        })
        .await;

    assert_eq!(h.store.state().await.status, SubmissionStatus::NeedsPhone);

    h.store
        .dispatch(SubmissionAction::ProvidePhone {
            phone: "+507 6000-0000".to_string(),
        })
        .await;

    let state = h.store.state().await;
    assert_eq!(state.status, SubmissionStatus::Succeeded);
    assert_eq!(
        h.gateway.recorded_phones().await,
        vec!["+507 6000-0000".to_string()]
    );
}

#[tokio::test]
async fn declining_the_phone_prompt_still_confirms() {
    let h = harness(MockReservationGateway::succeeding());
    h.store
        .dispatch(SubmissionAction::Submit {
            draft: draft(),
            profile: profile(None),
        })
        .await;
    h.store.dispatch(SubmissionAction::DeclinePhone).await;

    let state = h.store.state().await;
    assert_eq!(state.status, SubmissionStatus::Succeeded);
    assert!(state.confirmation.is_some());
    assert!(h.gateway.recorded_phones().await.is_empty());
}

// ============================================================================
// Failure paths
// ============================================================================

#[tokio::test]
async fn unavailable_probe_fails_without_creating() {
    let h = harness(MockReservationGateway::unavailable(
        ErrorCode::NoCabinAvailable,
    ));
    h.store
        .dispatch(SubmissionAction::Submit {
            draft: draft(),
            profile: profile(Some("x")),
        })
        .await;

    let state = h.store.state().await;
    assert_eq!(
        state.status,
        SubmissionStatus::Failed(ErrorCode::NoCabinAvailable)
    );
    assert_eq!(
        state.failure_message(),
        Some(ErrorCode::NoCabinAvailable.user_message())
    );
    assert!(state.confirmation.is_none());
    assert!(
        h.gateway.recorded_drafts().await.is_empty(),
        "an unavailable probe must not attempt creation"
    );
}

#[tokio::test]
async fn create_rejection_maps_to_its_code() {
    let h = harness(MockReservationGateway::failing_create(
        ErrorCode::MaxPeopleExceeded,
    ));
    h.store
        .dispatch(SubmissionAction::Submit {
            draft: draft().with_special_request("decoración de aniversario"),
            profile: profile(Some("x")),
        })
        .await;

    assert_eq!(
        h.store.state().await.status,
        SubmissionStatus::Failed(ErrorCode::MaxPeopleExceeded)
    );
}

#[tokio::test]
async fn reset_returns_to_idle() {
    let h = harness(MockReservationGateway::failing_create(
        ErrorCode::UnknownError,
    ));
    h.store
        .dispatch(SubmissionAction::Submit {
            draft: draft(),
            profile: profile(Some("x")),
        })
        .await;
    h.store.dispatch(SubmissionAction::Reset).await;

    let state = h.store.state().await;
    assert_eq!(state.status, SubmissionStatus::Idle);
    assert!(state.confirmation.is_none());
}

// ============================================================================
// Reducer-level guards
// ============================================================================

fn reducer_env() -> SubmissionEnvironment {
    SubmissionEnvironment::new(
        Arc::new(MockReservationGateway::succeeding()),
        Arc::new(MemoryConfirmationStore::new()),
        Arc::new(demo_catalog()),
        Arc::new(test_clock()),
    )
}

#[test]
fn submit_while_in_flight_is_ignored() {
    ReducerTest::new(SubmissionReducer::new())
        .with_env(reducer_env())
        .given_state(SubmissionState {
            status: SubmissionStatus::Submitting,
            confirmation: None,
        })
        .when_action(SubmissionAction::Submit {
            draft: draft(),
            profile: profile(None),
        })
        .then_state(|state| assert_eq!(state.status, SubmissionStatus::Submitting))
        .then_effects(|effects| assertions::assert_no_effects(effects))
        .run();
}

#[test]
fn submit_from_idle_produces_the_request_effect() {
    ReducerTest::new(SubmissionReducer::new())
        .with_env(reducer_env())
        .given_state(SubmissionState::new())
        .when_action(SubmissionAction::Submit {
            draft: draft(),
            profile: profile(None),
        })
        .then_state(|state| assert_eq!(state.status, SubmissionStatus::Submitting))
        .then_effects(|effects| assertions::assert_has_future_effect(effects))
        .run();
}

#[test]
fn stale_failure_after_reset_is_ignored() {
    ReducerTest::new(SubmissionReducer::new())
        .with_env(reducer_env())
        .given_state(SubmissionState::new())
        .when_action(SubmissionAction::SubmissionFailed {
            code: ErrorCode::UnknownError,
        })
        .then_state(|state| assert_eq!(state.status, SubmissionStatus::Idle))
        .run();
}

#[test]
fn phone_actions_outside_the_prompt_are_ignored() {
    ReducerTest::new(SubmissionReducer::new())
        .with_env(reducer_env())
        .given_state(SubmissionState::new())
        .when_action(SubmissionAction::ProvidePhone {
            phone: "123".to_string(),
        })
        .then_state(|state| assert_eq!(state.status, SubmissionStatus::Idle))
        .then_effects(|effects| assertions::assert_no_effects(effects))
        .run();
}
