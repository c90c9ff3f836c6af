//! Reference-data catalog: packages, time slots, and extras.
//!
//! The backend serves raw catalog rows (column-named, string periods,
//! fractional prices); [`build_catalog`] shapes them into the typed
//! [`Catalog`] the wizard works against: slots grouped per package
//! and ordered by start time, prices converted to cents, the kid
//! discount fraction converted to an integer percent.
//!
//! The catalog is read-only reference data, loaded once per wizard
//! session and never mutated by the client.

use crate::timerange;
use crate::types::{Extra, ExtraId, Money, Package, PackageId, Period, PricingUnit, TimeSlot};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Wire Rows
// ============================================================================

/// A `packages` row as served by the backend.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PackageRow {
    /// Catalog code
    pub id: String,
    /// Display label
    pub label: String,
    /// Marketing note
    #[serde(default)]
    pub note: Option<String>,
    /// Nominal duration in minutes
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    /// Price per adult in fractional dollars
    #[serde(default)]
    pub base_price_per_adult: f64,
    /// Kid price share as a fraction 0..1
    #[serde(default)]
    pub kid_discount: f64,
    /// Advisory weekday minimum
    #[serde(default)]
    pub min_people_weekday: u32,
    /// Advisory weekend minimum
    #[serde(default)]
    pub min_people_weekend: u32,
    /// Advisory holiday minimum
    #[serde(default)]
    pub min_people_holiday: u32,
}

/// A `package_time_slots` row as served by the backend.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TimeSlotRow {
    /// Package the slot belongs to
    pub package_id: String,
    /// Start time of day, possibly with a seconds suffix
    #[serde(default)]
    pub time_of_day: Option<String>,
    /// Display label
    pub label: String,
    /// Period band string
    #[serde(default)]
    pub period: Option<String>,
}

/// An `extras` row as served by the backend.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExtraRow {
    /// Catalog code
    pub id: String,
    /// Display label
    pub label: String,
    /// Longer description
    #[serde(default)]
    pub description: Option<String>,
    /// Listed price in fractional dollars
    #[serde(default)]
    pub price: f64,
    /// Pricing unit string
    #[serde(default)]
    pub pricing_unit: Option<String>,
}

// ============================================================================
// Catalog
// ============================================================================

/// The shaped reference data a wizard session works against.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Active packages, in catalog order
    pub packages: Vec<Package>,
    /// Predefined slots per package, ordered by start time. A package
    /// absent here supports free-form ranges instead.
    pub time_slots_by_package: HashMap<PackageId, Vec<TimeSlot>>,
    /// Active extras, in catalog order
    pub extras: Vec<Extra>,
}

impl Catalog {
    /// Looks up a package by id.
    #[must_use]
    pub fn package(&self, id: &PackageId) -> Option<&Package> {
        self.packages.iter().find(|p| &p.id == id)
    }

    /// Predefined slots for a package; empty when the package takes
    /// free-form ranges.
    #[must_use]
    pub fn slots_for(&self, id: &PackageId) -> &[TimeSlot] {
        self.time_slots_by_package
            .get(id)
            .map_or(&[], Vec::as_slice)
    }

    /// Looks up an extra by id.
    #[must_use]
    pub fn extra(&self, id: &ExtraId) -> Option<&Extra> {
        self.extras.iter().find(|e| &e.id == id)
    }
}

/// Normalizes a catalog time-of-day value to `"HH:MM"`.
fn normalize_time(value: Option<&str>) -> String {
    match value {
        Some(v) if v.len() >= 5 => v[..5].to_string(),
        Some(v) => v.to_string(),
        None => String::new(),
    }
}

/// Converts the catalog's 0..1 kid-discount fraction to a percent.
fn fraction_to_percent(fraction: f64) -> u32 {
    if !fraction.is_finite() || fraction <= 0.0 {
        return 0;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let percent = (fraction.min(1.0) * 100.0).round() as u32;
    percent
}

/// Parses a pricing unit string, defaulting to per-reservation.
fn parse_pricing_unit(value: Option<&str>) -> PricingUnit {
    match value {
        Some("PER_HOUR") => PricingUnit::PerHour,
        Some("PER_PERSON") => PricingUnit::PerPerson,
        _ => PricingUnit::PerReservation,
    }
}

/// Shapes raw backend rows into a [`Catalog`].
///
/// Slots with an empty or unparseable time of day are dropped; the
/// remaining slots are grouped per package and sorted ascending by
/// minutes since midnight.
#[must_use]
pub fn build_catalog(
    packages: Vec<PackageRow>,
    time_slots: Vec<TimeSlotRow>,
    extras: Vec<ExtraRow>,
) -> Catalog {
    let packages: Vec<Package> = packages
        .into_iter()
        .map(|row| Package {
            id: PackageId::new(row.id),
            label: row.label,
            note: row.note,
            duration_minutes: row.duration_minutes.unwrap_or(0),
            price_per_adult: Money::from_wire_dollars(row.base_price_per_adult),
            kid_discount_percent: fraction_to_percent(row.kid_discount),
            min_people_weekday: row.min_people_weekday,
            min_people_weekend: row.min_people_weekend,
            min_people_holiday: row.min_people_holiday,
        })
        .collect();

    let mut time_slots_by_package: HashMap<PackageId, Vec<TimeSlot>> = HashMap::new();
    for row in time_slots {
        let time_of_day = normalize_time(row.time_of_day.as_deref());
        if timerange::time_to_minutes(&time_of_day).is_none() {
            continue;
        }
        let slot = TimeSlot {
            id: time_of_day.clone(),
            label: row.label,
            period: Period::parse_lenient(row.period.as_deref()),
            time_of_day,
            package_id: PackageId::new(row.package_id),
        };
        time_slots_by_package
            .entry(slot.package_id.clone())
            .or_default()
            .push(slot);
    }
    for slots in time_slots_by_package.values_mut() {
        slots.sort_by_key(|slot| timerange::time_to_minutes(&slot.time_of_day).unwrap_or(0));
    }

    let extras: Vec<Extra> = extras
        .into_iter()
        .map(|row| Extra {
            id: ExtraId::new(row.id),
            label: row.label,
            description: row.description,
            price: Money::from_wire_dollars(row.price),
            pricing_unit: parse_pricing_unit(row.pricing_unit.as_deref()),
        })
        .collect();

    Catalog {
        packages,
        time_slots_by_package,
        extras,
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    fn slot_row(package_id: &str, time: &str, label: &str, period: &str) -> TimeSlotRow {
        TimeSlotRow {
            package_id: package_id.to_string(),
            time_of_day: Some(time.to_string()),
            label: label.to_string(),
            period: Some(period.to_string()),
        }
    }

    #[test]
    fn slots_are_grouped_and_sorted_by_start_time() {
        let catalog = build_catalog(
            vec![],
            vec![
                slot_row("4H", "17:00:00", "5:00 P.M.", "noche"),
                slot_row("4H", "08:00:00", "8:00 A.M.", "mañana"),
                slot_row("4H", "13:00:00", "1:00 P.M.", "tarde"),
                slot_row("8H", "12:00:00", "12:00 P.M.", "tarde"),
            ],
            vec![],
        );

        let four_hour = catalog.slots_for(&PackageId::new("4H"));
        let starts: Vec<&str> = four_hour.iter().map(|s| s.time_of_day.as_str()).collect();
        assert_eq!(starts, vec!["08:00", "13:00", "17:00"]);
        assert_eq!(catalog.slots_for(&PackageId::new("8H")).len(), 1);
        assert!(catalog.slots_for(&PackageId::new("AMANECER")).is_empty());
    }

    #[test]
    fn seconds_suffix_is_normalized_and_id_mirrors_time() {
        let catalog = build_catalog(
            vec![],
            vec![slot_row("4H", "08:00:00", "8:00 A.M.", "mañana")],
            vec![],
        );
        let slot = &catalog.slots_for(&PackageId::new("4H"))[0];
        assert_eq!(slot.id, "08:00");
        assert_eq!(slot.id, slot.time_of_day);
    }

    #[test]
    fn unparseable_slots_are_dropped() {
        let catalog = build_catalog(
            vec![],
            vec![TimeSlotRow {
                package_id: "4H".to_string(),
                time_of_day: None,
                label: "???".to_string(),
                period: None,
            }],
            vec![],
        );
        assert!(catalog.time_slots_by_package.is_empty());
    }

    #[test]
    fn package_prices_convert_to_cents_and_percent() {
        let catalog = build_catalog(
            vec![PackageRow {
                id: "4H".to_string(),
                label: "4 horas".to_string(),
                note: Some("Ideal para escapadas cortas.".to_string()),
                duration_minutes: Some(240),
                base_price_per_adult: 12.0,
                kid_discount: 0.5,
                min_people_weekday: 4,
                min_people_weekend: 6,
                min_people_holiday: 6,
            }],
            vec![],
            vec![],
        );
        let pkg = catalog.package(&PackageId::new("4H")).expect("package");
        assert_eq!(pkg.price_per_adult, Money::from_cents(1200));
        assert_eq!(pkg.kid_discount_percent, 50);
        assert_eq!(pkg.duration_minutes, 240);
    }

    #[test]
    fn extras_parse_units_leniently() {
        let catalog = build_catalog(
            vec![],
            vec![],
            vec![
                ExtraRow {
                    id: "paddleboard".to_string(),
                    label: "Paddleboard".to_string(),
                    description: None,
                    price: 10.0,
                    pricing_unit: Some("PER_HOUR".to_string()),
                },
                ExtraRow {
                    id: "sofa_marino".to_string(),
                    label: "Sofa marino".to_string(),
                    description: None,
                    price: 8.0,
                    pricing_unit: None,
                },
            ],
        );
        assert_eq!(catalog.extras[0].pricing_unit, PricingUnit::PerHour);
        assert_eq!(catalog.extras[1].pricing_unit, PricingUnit::PerReservation);
        assert_eq!(
            catalog.extra(&ExtraId::new("paddleboard")).map(|e| e.price),
            Some(Money::from_cents(1000))
        );
    }
}
