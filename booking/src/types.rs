//! Domain types for the Cabanamar reservation system.
//!
//! This module contains the value objects and entities shared across
//! the wizard, pricing, submission, and API layers: identifiers, the
//! cents-based [`Money`] value object, the reference-data catalog
//! types (packages, time slots, extras), payment methods, and the
//! confirmation record persisted after a successful booking.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a reservation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReservationId(Uuid);

impl ReservationId {
    /// Creates a new random `ReservationId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `ReservationId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ReservationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a physical cabin assigned by the backend
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CabinId(Uuid);

impl CabinId {
    /// Creates a new random `CabinId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `CabinId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CabinId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CabinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a customer (the authenticated user)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(Uuid);

impl CustomerId {
    /// Creates a new random `CustomerId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `CustomerId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CustomerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Catalog identifier of a bookable package (e.g. `"4H"`, `"EVENTO"`)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageId(String);

impl PackageId {
    /// Creates a `PackageId` from a catalog code
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The package code as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PackageId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Catalog identifier of an optional extra (e.g. `"kayak_doble"`)
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtraId(String);

impl ExtraId {
    /// Creates an `ExtraId` from a catalog code
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The extra code as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExtraId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ExtraId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// ============================================================================
// Money Value Object (cents-based to avoid floating point errors)
// ============================================================================

/// Represents money in cents to avoid floating-point arithmetic errors
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Money(u64);

impl Money {
    /// Zero amount
    pub const ZERO: Self = Self(0);

    /// Creates a `Money` value from cents
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Creates a `Money` value from whole dollars
    ///
    /// # Panics
    ///
    /// Panics if the conversion would overflow (dollars * 100 > `u64::MAX`).
    #[must_use]
    #[allow(clippy::panic)]
    pub const fn from_dollars(dollars: u64) -> Self {
        match dollars.checked_mul(100) {
            Some(cents) => Self(cents),
            None => panic!("Money::from_dollars overflow"),
        }
    }

    /// Creates a `Money` value from a fractional dollar amount as it
    /// appears on the catalog wire, rounding to the nearest cent.
    /// Negative or non-finite inputs are treated as zero.
    #[must_use]
    pub fn from_wire_dollars(dollars: f64) -> Self {
        if !dollars.is_finite() || dollars <= 0.0 {
            return Self::ZERO;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Self((dollars * 100.0).round() as u64)
    }

    /// Returns the amount in cents
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Returns the amount as fractional dollars for wire responses
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_wire_dollars(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Adds two money amounts with overflow checking
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }

    /// Adds two money amounts, saturating at the numeric bound
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Multiplies money by a quantity with overflow checking
    #[must_use]
    pub const fn checked_multiply(self, quantity: u32) -> Option<Self> {
        match self.0.checked_mul(quantity as u64) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }

    /// Multiplies money by a quantity, saturating at the numeric bound
    #[must_use]
    pub const fn saturating_multiply(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(quantity as u64))
    }

    /// Takes a percentage of the amount (e.g. the kid-discount share)
    ///
    /// `percent` is clamped to 0..=100.
    #[must_use]
    pub const fn percentage(self, percent: u32) -> Self {
        let percent = if percent > 100 { 100 } else { percent };
        Self(self.0.saturating_mul(percent as u64) / 100)
    }

    /// Returns the larger of two amounts
    #[must_use]
    pub const fn max(self, other: Self) -> Self {
        if self.0 >= other.0 { self } else { other }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

// ============================================================================
// Catalog Entities
// ============================================================================

/// Time-of-day band a slot belongs to, as labeled in the catalog
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    /// Morning slots
    #[serde(rename = "mañana")]
    Manana,
    /// Afternoon slots
    #[serde(rename = "tarde")]
    Tarde,
    /// Evening slots
    #[serde(rename = "noche")]
    Noche,
}

impl Period {
    /// Parses a catalog period string, defaulting to morning for
    /// unknown values (the catalog loader's lenient behavior).
    #[must_use]
    pub fn parse_lenient(value: Option<&str>) -> Self {
        match value {
            Some("tarde") => Self::Tarde,
            Some("noche") => Self::Noche,
            _ => Self::Manana,
        }
    }
}

/// A bookable product: a time-bounded cabin rental offering
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Catalog code
    pub id: PackageId,
    /// Display label (e.g. "4 horas")
    pub label: String,
    /// Marketing note shown on the package card
    pub note: Option<String>,
    /// Nominal duration, used when a time slot has no explicit end
    pub duration_minutes: u32,
    /// Price per adult
    pub price_per_adult: Money,
    /// Percentage of the adult price charged per kid (0..=100)
    pub kid_discount_percent: u32,
    /// Advisory minimum headcount on weekdays
    pub min_people_weekday: u32,
    /// Advisory minimum headcount on weekends
    pub min_people_weekend: u32,
    /// Advisory minimum headcount on holidays (carried but unused:
    /// no holiday calendar is wired)
    pub min_people_holiday: u32,
}

impl Package {
    /// The advisory minimum headcount for a date, selected by
    /// weekend/weekday classification.
    #[must_use]
    pub const fn min_people_for(&self, weekend: bool) -> u32 {
        if weekend {
            self.min_people_weekend
        } else {
            self.min_people_weekday
        }
    }
}

/// An offering of a package at a specific start time
///
/// The id doubles as the wire token: either a bare start time
/// (`"08:00"`) or a full range (`"08:00-12:00"`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Slot token, equal to its time of day
    pub id: String,
    /// Display label (e.g. "8:00 A.M. - 12:00 P.M.")
    pub label: String,
    /// Time-of-day band
    pub period: Period,
    /// Start time of day, "HH:MM"
    pub time_of_day: String,
    /// Package this slot belongs to
    pub package_id: PackageId,
}

/// Pricing unit of an extra, informational for display
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PricingUnit {
    /// Charged per hour (display only)
    #[serde(rename = "PER_HOUR")]
    PerHour,
    /// Charged per person (display only)
    #[serde(rename = "PER_PERSON")]
    PerPerson,
    /// Flat charge per reservation
    #[serde(rename = "PER_RESERVATION")]
    PerReservation,
}

/// An optional paid add-on to a reservation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extra {
    /// Catalog code
    pub id: ExtraId,
    /// Display label
    pub label: String,
    /// Longer description
    pub description: Option<String>,
    /// Listed price. Totals always charge this flat amount; the
    /// pricing unit does not enter the calculation.
    pub price: Money,
    /// Display pricing unit
    pub pricing_unit: PricingUnit,
}

// ============================================================================
// Payment Methods
// ============================================================================

/// Payment method chosen in the wizard's final stage
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Yappy mobile payment
    #[serde(rename = "YAPPY")]
    Yappy,
    /// `PayPal`
    #[serde(rename = "PAYPAL")]
    PayPal,
    /// Credit or debit card
    #[serde(rename = "CARD")]
    Card,
    /// Cash on arrival
    #[serde(rename = "CASH")]
    Cash,
}

impl PaymentMethod {
    /// Wire representation of the method
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yappy => "YAPPY",
            Self::PayPal => "PAYPAL",
            Self::Card => "CARD",
            Self::Cash => "CASH",
        }
    }

    /// Whether the method can currently be selected. Disabled methods
    /// are still listed so the UI can render them as "coming soon".
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Cash)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A payment method with its presentation metadata
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentMethodInfo {
    /// The method
    pub method: PaymentMethod,
    /// Display label
    pub label: &'static str,
    /// Short description
    pub description: &'static str,
}

/// The fixed payment method list, in display order.
pub const PAYMENT_METHODS: [PaymentMethodInfo; 4] = [
    PaymentMethodInfo {
        method: PaymentMethod::Yappy,
        label: "Yappy",
        description: "Pago rapido desde el celular.",
    },
    PaymentMethodInfo {
        method: PaymentMethod::PayPal,
        label: "PayPal",
        description: "Pago seguro en linea.",
    },
    PaymentMethodInfo {
        method: PaymentMethod::Card,
        label: "Tarjeta",
        description: "Credito o debito.",
    },
    PaymentMethodInfo {
        method: PaymentMethod::Cash,
        label: "Efectivo",
        description: "Paga al llegar.",
    },
];

// ============================================================================
// Derived Totals
// ============================================================================

/// Totals derived from the wizard state on every change, never stored
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReservationTotals {
    /// Package base price after the minimum-headcount floor
    pub base: Money,
    /// Sum of selected extras
    pub extras_total: Money,
    /// Grand total
    pub total: Money,
}

impl ReservationTotals {
    /// All-zero totals, the result of an incomplete selection
    pub const ZERO: Self = Self {
        base: Money::ZERO,
        extras_total: Money::ZERO,
        total: Money::ZERO,
    };
}

// ============================================================================
// Confirmation Record
// ============================================================================

/// Snapshot of a successful reservation, persisted per customer so a
/// reopened wizard shows the confirmation instead of a fresh form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfirmationRecord {
    /// Created reservation
    pub reservation_id: ReservationId,
    /// Customer the record belongs to
    pub customer_id: CustomerId,
    /// Display name shown on the confirmation view
    pub display_name: String,
    /// Adults booked
    pub adults: u32,
    /// Kids booked
    pub kids: u32,
    /// Package label at booking time
    pub package_label: String,
    /// Reserved date
    pub date: NaiveDate,
    /// Slot token as submitted
    pub time_slot: String,
    /// Labels of the selected extras
    pub extras: Vec<String>,
    /// Assigned cabin code
    pub cabin_id: CabinId,
    /// Total charged
    pub total: Money,
    /// When the reservation was confirmed
    pub created_at: DateTime<Utc>,
}
