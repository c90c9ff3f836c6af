//! Reducer for the reservation wizard.

use crate::catalog::Catalog;
use crate::wizard::actions::WizardAction;
use crate::wizard::types::{MAX_PEOPLE, StageSequence, WizardState, is_past_slot};
use cabanamar_core::environment::Clock;
use cabanamar_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
use std::sync::Arc;

/// Environment dependencies for the wizard reducer.
///
/// The catalog and stage sequence are resolved once at session start
/// and stay fixed for the session's lifetime; the clock exists so
/// past-slot refusal is testable with a fixed time.
#[derive(Clone)]
pub struct WizardEnvironment {
    /// Loaded reference data
    pub catalog: Arc<Catalog>,
    /// Active stage order
    pub stages: StageSequence,
    /// Clock for same-day slot filtering
    pub clock: Arc<dyn Clock>,
}

impl WizardEnvironment {
    /// Creates a new `WizardEnvironment`.
    #[must_use]
    pub const fn new(catalog: Arc<Catalog>, stages: StageSequence, clock: Arc<dyn Clock>) -> Self {
        Self {
            catalog,
            stages,
            clock,
        }
    }
}

/// Reducer for the reservation wizard.
///
/// All transitions are pure state updates; the wizard produces no
/// effects of its own (submission is a separate feature with its own
/// reducer).
#[derive(Clone, Debug)]
pub struct WizardReducer;

impl WizardReducer {
    /// Creates a new `WizardReducer`.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Clamp a requested count to `0..=cap`.
    fn clamp_count(requested: i32, cap: u32) -> u32 {
        #[allow(clippy::cast_sign_loss)]
        let non_negative = requested.max(0) as u32;
        non_negative.min(cap)
    }

    fn set_adults(state: &mut WizardState, requested: i32) {
        if state.couple_package {
            state.adults = 2;
            return;
        }
        state.adults = Self::clamp_count(requested, MAX_PEOPLE.saturating_sub(state.kids));
    }

    fn set_kids(state: &mut WizardState, requested: i32) {
        let cap = if state.couple_package {
            1
        } else {
            MAX_PEOPLE.saturating_sub(state.adults)
        };
        state.kids = Self::clamp_count(requested, cap);
    }

    fn set_package(state: &mut WizardState, catalog: &Catalog, package_id: crate::types::PackageId) {
        if catalog.package(&package_id).is_none() {
            return;
        }
        // A slot belongs to the package it was chosen under.
        state.time_slot = None;
        // Single-slot packages have nothing to choose; select it now.
        let slots = catalog.slots_for(&package_id);
        if let [only] = slots {
            state.time_slot = Some(only.id.clone());
        }
        state.package_id = Some(package_id);
    }
}

impl Default for WizardReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for WizardReducer {
    type State = WizardState;
    type Action = WizardAction;
    type Environment = WizardEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            WizardAction::SetDate { date } => {
                state.date = date;
                state.time_slot = None;
            }

            WizardAction::SetPackage { package_id } => {
                Self::set_package(state, &env.catalog, package_id);
            }

            WizardAction::SetTimeSlot { time_slot } => {
                let past = match (&time_slot, state.date) {
                    (Some(token), Some(date)) => {
                        is_past_slot(token, date, env.clock.now().naive_utc())
                    }
                    _ => false,
                };
                if !past {
                    state.time_slot = time_slot;
                }
            }

            WizardAction::SetAdults { adults } => Self::set_adults(state, adults),

            WizardAction::SetKids { kids } => Self::set_kids(state, kids),

            WizardAction::SetExtra { id, selected } => {
                if env.catalog.extra(&id).is_some() {
                    state.extras.insert(id, selected);
                }
            }

            WizardAction::SetCouplePackage { enabled } => {
                state.couple_package = enabled;
                if enabled {
                    state.adults = 2;
                    state.kids = state.kids.min(1);
                }
            }

            WizardAction::SetPayment { method } => match method {
                Some(m) if !m.is_enabled() => {}
                other => state.payment_method = other,
            },

            WizardAction::SetStep { step } => {
                let total = env.stages.len().max(1);
                #[allow(clippy::cast_sign_loss)]
                let step = step.max(1) as u32;
                state.step = step.min(total);
            }

            WizardAction::NextStep => {
                state.step = (state.step + 1).min(env.stages.len().max(1));
            }

            WizardAction::PrevStep => {
                state.step = state.step.saturating_sub(1).max(1);
            }
        }

        smallvec![Effect::None]
    }
}
