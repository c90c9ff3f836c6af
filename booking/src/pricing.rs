//! Reservation pricing.
//!
//! [`calc_total`] is the single pricing path: pure, deterministic, no
//! I/O. It recomputes on every wizard state change and again for the
//! summary view, so it must tolerate incomplete selections: an
//! unresolved package yields all-zero totals rather than an error.
//!
//! The base price is floored at the minimum-headcount equivalent: a
//! group below the minimum still books, it just pays as if the
//! minimum attended. The advisory warning the wizard shows for such
//! groups is a separate concern (see the wizard module).

use crate::catalog::Catalog;
use crate::types::{ExtraId, Money, PackageId, ReservationTotals};
use std::collections::HashMap;

/// Minimum headcount assumed for the price floor when the caller does
/// not supply a date-specific minimum.
pub const MIN_PEOPLE_FALLBACK: u32 = 4;

/// Computes the totals for a wizard selection.
///
/// - `base = max(adults·p + kids·p·kid%, m·p)` where `p` is the
///   package's price per adult and `m` is `min_people_for_date`
///   (falling back to [`MIN_PEOPLE_FALLBACK`]).
/// - `extras_total` sums the flat listed price of every selected
///   extra. The extra's pricing unit is display-only and deliberately
///   does not enter the calculation.
/// - An unknown or unset `package_id` produces [`ReservationTotals::ZERO`].
#[must_use]
pub fn calc_total(
    package_id: Option<&PackageId>,
    adults: u32,
    kids: u32,
    extras_selection: &HashMap<ExtraId, bool>,
    catalog: &Catalog,
    min_people_for_date: Option<u32>,
) -> ReservationTotals {
    let Some(pkg) = package_id.and_then(|id| catalog.package(id)) else {
        return ReservationTotals::ZERO;
    };

    let price = pkg.price_per_adult;
    let kid_price = price.percentage(pkg.kid_discount_percent);
    let base_raw = price
        .saturating_multiply(adults)
        .saturating_add(kid_price.saturating_multiply(kids));

    let min_people = min_people_for_date.unwrap_or(MIN_PEOPLE_FALLBACK);
    let base = base_raw.max(price.saturating_multiply(min_people));

    let extras_total = catalog
        .extras
        .iter()
        .filter(|extra| extras_selection.get(&extra.id).copied().unwrap_or(false))
        .fold(Money::ZERO, |sum, extra| sum.saturating_add(extra.price));

    ReservationTotals {
        base,
        extras_total,
        total: base.saturating_add(extras_total),
    }
}
