//! Core types for the reservation wizard.

use crate::catalog::Catalog;
use crate::pricing::calc_total;
use crate::timerange;
use crate::types::{ExtraId, PackageId, PaymentMethod, ReservationTotals};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Hard cap on total headcount for any reservation.
pub const MAX_PEOPLE: u32 = 16;

/// Minimum group size that completes the guests stage without the
/// couple package.
pub const MIN_GROUP_SIZE: u32 = 4;

/// Minimum group size for the special-event package.
pub const MIN_EVENT_GROUP_SIZE: u32 = 6;

/// Catalog id of the special-event package: larger minimum headcount
/// and free-form time ranges instead of predefined slots.
pub const SPECIAL_EVENT_PACKAGE: &str = "EVENTO";

// ============================================================================
// Stages
// ============================================================================

/// A wizard stage. The set is closed; the remote form config can
/// reorder, relabel, or disable stages but not invent new ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Guest counts and the couple package
    #[serde(rename = "guests")]
    Guests,
    /// Date, package, and time slot
    #[serde(rename = "date_package")]
    DatePackage,
    /// Optional extras
    #[serde(rename = "extras")]
    Extras,
    /// Payment method
    #[serde(rename = "payment")]
    Payment,
}

impl Stage {
    /// Wire id of the stage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Guests => "guests",
            Self::DatePackage => "date_package",
            Self::Extras => "extras",
            Self::Payment => "payment",
        }
    }

    /// Default display label.
    #[must_use]
    pub const fn default_label(self) -> &'static str {
        match self {
            Self::Guests => "Cuantas personas vienen",
            Self::DatePackage => "Fecha, paquete y horario",
            Self::Extras => "Extras",
            Self::Payment => "Metodo de pago",
        }
    }

    fn from_wire(id: &str) -> Option<Self> {
        match id {
            "guests" => Some(Self::Guests),
            "date_package" => Some(Self::DatePackage),
            "extras" => Some(Self::Extras),
            "payment" => Some(Self::Payment),
            _ => None,
        }
    }
}

/// One step entry of the remotely configured form schema.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FormStepRow {
    /// Stage id; unknown ids are ignored
    pub id: String,
    /// Label override
    #[serde(default)]
    pub label: Option<String>,
    /// Summary text override
    #[serde(default)]
    pub summary: Option<String>,
    /// Disabled steps are skipped entirely
    #[serde(default)]
    pub enabled: Option<bool>,
}

/// The remotely configured wizard schema.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FormConfig {
    /// Ordered step entries
    #[serde(default)]
    pub steps: Option<Vec<FormStepRow>>,
    /// Whether a summary view follows the last stage
    #[serde(default)]
    pub show_summary: Option<bool>,
}

/// A stage with its resolved display label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedStage {
    /// The stage
    pub stage: Stage,
    /// Display label
    pub label: String,
}

/// The active stage order for a session, resolved once at start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StageSequence {
    stages: Vec<ResolvedStage>,
}

/// Default stage order when no config is available.
const DEFAULT_STAGES: [Stage; 4] = [
    Stage::Guests,
    Stage::DatePackage,
    Stage::Extras,
    Stage::Payment,
];

impl StageSequence {
    /// Resolves the active stage sequence from an optional remote
    /// config, falling back to the default four-stage order when the
    /// config is missing, empty, or contains no usable entries.
    #[must_use]
    pub fn resolve(config: Option<&FormConfig>) -> Self {
        let configured: Vec<ResolvedStage> = config
            .and_then(|c| c.steps.as_ref())
            .map(|steps| {
                steps
                    .iter()
                    .filter(|row| row.enabled.unwrap_or(true))
                    .filter_map(|row| {
                        Stage::from_wire(&row.id).map(|stage| ResolvedStage {
                            stage,
                            label: row
                                .label
                                .clone()
                                .unwrap_or_else(|| stage.default_label().to_string()),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        if configured.is_empty() {
            return Self::default();
        }
        Self { stages: configured }
    }

    /// Number of stages.
    #[must_use]
    pub fn len(&self) -> u32 {
        #[allow(clippy::cast_possible_truncation)]
        let len = self.stages.len() as u32;
        len
    }

    /// Whether the sequence is empty (never true for a resolved one).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// The stage at a 1-based step index.
    #[must_use]
    pub fn stage_at(&self, step: u32) -> Option<Stage> {
        self.stages
            .get(step.checked_sub(1)? as usize)
            .map(|s| s.stage)
    }

    /// The resolved stages in order.
    #[must_use]
    pub fn stages(&self) -> &[ResolvedStage] {
        &self.stages
    }
}

impl Default for StageSequence {
    fn default() -> Self {
        Self {
            stages: DEFAULT_STAGES
                .iter()
                .map(|stage| ResolvedStage {
                    stage: *stage,
                    label: stage.default_label().to_string(),
                })
                .collect(),
        }
    }
}

// ============================================================================
// Wizard State
// ============================================================================

/// One booking attempt's worth of selections.
///
/// Owned exclusively by the wizard reducer for the lifetime of the
/// session; created with defaults at mount and discarded on unmount or
/// successful confirmation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WizardState {
    /// Current step, 1-based into the active stage sequence
    pub step: u32,
    /// Selected date
    pub date: Option<NaiveDate>,
    /// Selected package
    pub package_id: Option<PackageId>,
    /// Selected slot token (slot id or composed range)
    pub time_slot: Option<String>,
    /// Adults attending
    pub adults: u32,
    /// Kids attending
    pub kids: u32,
    /// Per-extra selection, keys synchronized to the loaded catalog
    pub extras: HashMap<ExtraId, bool>,
    /// Couple-package mode: forces 2 adults, at most 1 kid
    pub couple_package: bool,
    /// Chosen payment method
    pub payment_method: Option<PaymentMethod>,
}

impl WizardState {
    /// Fresh state with the default selections, extras keys seeded
    /// from the catalog (all unselected).
    #[must_use]
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            step: 1,
            date: None,
            package_id: None,
            time_slot: None,
            adults: 2,
            kids: 0,
            extras: catalog
                .extras
                .iter()
                .map(|extra| (extra.id.clone(), false))
                .collect(),
            couple_package: false,
            payment_method: None,
        }
    }

    /// Total headcount.
    #[must_use]
    pub const fn total_people(&self) -> u32 {
        self.adults + self.kids
    }

    /// Whether the selected date falls on a weekend.
    #[must_use]
    pub fn on_weekend(&self) -> bool {
        self.date.is_some_and(is_weekend)
    }

    /// The advisory minimum headcount for the current selection:
    /// `Some(min)` when a package and date are chosen, the package
    /// carries a minimum for that kind of day, and the group is below
    /// it. Purely informational; it never gates progress.
    #[must_use]
    pub fn min_people_warning(&self, catalog: &Catalog) -> Option<u32> {
        let pkg = self.package_id.as_ref().and_then(|id| catalog.package(id))?;
        let min = pkg.min_people_for(self.on_weekend());
        (min > 0 && self.total_people() < min).then_some(min)
    }

    /// Derived totals for the current selection.
    #[must_use]
    pub fn totals(&self, catalog: &Catalog) -> ReservationTotals {
        let min_for_date = self
            .date
            .and_then(|_| self.package_id.as_ref())
            .and_then(|id| catalog.package(id))
            .map(|pkg| pkg.min_people_for(self.on_weekend()));
        calc_total(
            self.package_id.as_ref(),
            self.adults,
            self.kids,
            &self.extras,
            catalog,
            min_for_date,
        )
    }

    /// Completeness predicate for one stage. Forward progress and the
    /// final submission are both gated on this.
    #[must_use]
    pub fn stage_complete(&self, stage: Stage, catalog: &Catalog) -> bool {
        match stage {
            Stage::Guests => self.group_size_ok(),
            Stage::DatePackage => {
                let selected = self.date.is_some()
                    && self
                        .package_id
                        .as_ref()
                        .is_some_and(|id| catalog.package(id).is_some())
                    && self.time_slot.is_some();
                if !selected {
                    return false;
                }
                if self.is_special_event() {
                    self.total_people() >= MIN_EVENT_GROUP_SIZE
                } else {
                    self.group_size_ok()
                }
            }
            Stage::Extras => true,
            Stage::Payment => self.payment_method.is_some_and(PaymentMethod::is_enabled),
        }
    }

    /// Completeness of the stage at the current step.
    #[must_use]
    pub fn current_stage_complete(&self, stages: &StageSequence, catalog: &Catalog) -> bool {
        stages
            .stage_at(self.step)
            .is_some_and(|stage| self.stage_complete(stage, catalog))
    }

    /// Whether every stage is complete, i.e. the session is ready to
    /// submit.
    #[must_use]
    pub fn ready_to_submit(&self, stages: &StageSequence, catalog: &Catalog) -> bool {
        stages
            .stages()
            .iter()
            .all(|s| self.stage_complete(s.stage, catalog))
    }

    /// Whether the selected package is the special-event package.
    #[must_use]
    pub fn is_special_event(&self) -> bool {
        self.package_id
            .as_ref()
            .is_some_and(|id| id.as_str() == SPECIAL_EVENT_PACKAGE)
    }

    const fn group_size_ok(&self) -> bool {
        self.total_people() >= MIN_GROUP_SIZE || self.couple_package
    }
}

// ============================================================================
// Date and slot helpers
// ============================================================================

/// Weekend classification on calendar components: Saturday or Sunday.
#[must_use]
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Whether a slot token's start has already passed: only same-day
/// selections can be in the past (earlier dates are filtered out
/// before slot selection).
#[must_use]
pub fn is_past_slot(token: &str, date: NaiveDate, now: NaiveDateTime) -> bool {
    if date != now.date() {
        return false;
    }
    let Some(start_minutes) = timerange::slot_start_minutes(token) else {
        return false;
    };
    start_minutes <= now.time().hour() * 60 + now.time().minute()
}
