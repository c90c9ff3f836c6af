//! In-memory booking backend for tests and demo mode.
//!
//! Stands in for the managed backend's atomic procedures. The
//! critical piece is the mutex across availability check and booking
//! insert in [`create_reservation`](InMemoryBackend::create_reservation):
//! two racing reservations for the last free cabin serialize on the
//! lock, so exactly one wins and the other gets the same
//! `no_cabin_available` rejection the real procedure raises.

use super::{BackendError, BookingBackend, CreatedReservation, NewReservation};
use crate::catalog::{Catalog, ExtraRow, PackageRow, TimeSlotRow, build_catalog};
use crate::pricing::calc_total;
use crate::timerange::TimeRange;
use crate::types::{CabinId, CustomerId, Package, PackageId, ReservationId};
use crate::wizard::{FormConfig, is_weekend};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// A committed booking occupying a cabin for a window.
#[derive(Clone, Debug)]
struct Booking {
    cabin_id: CabinId,
    range: TimeRange,
}

/// Mutable state behind the atomicity lock.
#[derive(Default)]
struct Ledger {
    bookings: Vec<Booking>,
    reservations: Vec<(ReservationId, CustomerId)>,
    phones: HashMap<CustomerId, String>,
}

/// In-memory fake of the booking backend.
pub struct InMemoryBackend {
    catalog: Catalog,
    form_config: Option<FormConfig>,
    cabins: Vec<CabinId>,
    max_people: u32,
    ledger: Mutex<Ledger>,
}

impl InMemoryBackend {
    /// Creates a backend over a catalog with the given cabin pool.
    #[must_use]
    pub fn new(catalog: Catalog, cabin_count: usize) -> Self {
        Self {
            catalog,
            form_config: None,
            cabins: (0..cabin_count).map(|_| CabinId::new()).collect(),
            max_people: 16,
            ledger: Mutex::new(Ledger::default()),
        }
    }

    /// Overrides the remote form configuration the backend serves.
    #[must_use]
    pub fn with_form_config(mut self, config: FormConfig) -> Self {
        self.form_config = Some(config);
        self
    }

    /// Overrides the per-cabin capacity cap.
    #[must_use]
    pub const fn with_max_people(mut self, max_people: u32) -> Self {
        self.max_people = max_people;
        self
    }

    /// A backend seeded with the demo catalog and three cabins.
    #[must_use]
    pub fn demo() -> Self {
        Self::new(demo_catalog(), 3)
    }

    /// Number of committed bookings (test observability).
    pub async fn booking_count(&self) -> usize {
        self.ledger.lock().await.bookings.len()
    }

    /// The stored phone for a customer (test observability).
    pub async fn phone_for(&self, customer_id: CustomerId) -> Option<String> {
        self.ledger.lock().await.phones.get(&customer_id).cloned()
    }

    /// Finds a cabin with no overlapping booking. Caller must hold the
    /// ledger lock for the result to stay valid.
    fn free_cabin(&self, ledger: &Ledger, range: &TimeRange) -> Option<CabinId> {
        self.cabins.iter().copied().find(|cabin| {
            !ledger
                .bookings
                .iter()
                .any(|b| b.cabin_id == *cabin && b.range.overlaps(range))
        })
    }

    fn check_people(&self, people: u32) -> Result<(), BackendError> {
        if people > self.max_people {
            return Err(BackendError::domain("max_people_exceeded"));
        }
        Ok(())
    }
}

#[async_trait]
impl BookingBackend for InMemoryBackend {
    async fn fetch_catalog(&self) -> Result<Catalog, BackendError> {
        Ok(self.catalog.clone())
    }

    async fn fetch_form_config(&self) -> Result<Option<FormConfig>, BackendError> {
        Ok(self.form_config.clone())
    }

    async fn fetch_package(&self, id: &PackageId) -> Result<Option<Package>, BackendError> {
        Ok(self.catalog.package(id).cloned())
    }

    async fn assign_cabin(
        &self,
        range: &TimeRange,
        people: u32,
    ) -> Result<Option<CabinId>, BackendError> {
        self.check_people(people)?;
        let ledger = self.ledger.lock().await;
        match self.free_cabin(&ledger, range) {
            Some(cabin) => Ok(Some(cabin)),
            None => Err(BackendError::domain("no_cabin_available")),
        }
    }

    async fn create_reservation(
        &self,
        reservation: &NewReservation,
    ) -> Result<CreatedReservation, BackendError> {
        self.check_people(reservation.adults + reservation.kids)?;
        let pkg = self
            .catalog
            .package(&reservation.package_id)
            .ok_or_else(|| BackendError::domain("CM_INVALID_PACKAGE"))?;

        // Check-and-insert under one lock: this is the stand-in for
        // the server-side transaction.
        let mut ledger = self.ledger.lock().await;
        let cabin_id = self
            .free_cabin(&ledger, &reservation.range)
            .ok_or_else(|| BackendError::domain("no_cabin_available"))?;
        ledger.bookings.push(Booking {
            cabin_id,
            range: reservation.range,
        });

        let reservation_id = ReservationId::new();
        ledger
            .reservations
            .push((reservation_id, reservation.customer_id));
        drop(ledger);

        let extras_selection = reservation
            .extras
            .iter()
            .map(|extra| (extra.id.clone(), extra.quantity > 0))
            .collect();
        let totals = calc_total(
            Some(&pkg.id),
            reservation.adults,
            reservation.kids,
            &extras_selection,
            &self.catalog,
            Some(pkg.min_people_for(is_weekend(reservation.date))),
        );

        Ok(CreatedReservation {
            reservation_id,
            cabin_id,
            total: totals.total,
        })
    }

    async fn save_phone(&self, customer_id: CustomerId, phone: &str) -> Result<(), BackendError> {
        self.ledger
            .lock()
            .await
            .phones
            .insert(customer_id, phone.to_string());
        Ok(())
    }
}

/// The demo catalog: the three slotted packages plus the special-event
/// package, and the standard extras.
#[must_use]
pub fn demo_catalog() -> Catalog {
    let package = |id: &str, label: &str, note: &str, duration: u32, price: f64, weekend: u32| {
        PackageRow {
            id: id.to_string(),
            label: label.to_string(),
            note: Some(note.to_string()),
            duration_minutes: Some(duration),
            base_price_per_adult: price,
            kid_discount: 0.5,
            min_people_weekday: 4,
            min_people_weekend: weekend,
            min_people_holiday: weekend,
        }
    };
    let slot = |package_id: &str, time: &str, label: &str, period: &str| TimeSlotRow {
        package_id: package_id.to_string(),
        time_of_day: Some(time.to_string()),
        label: label.to_string(),
        period: Some(period.to_string()),
    };
    let extra = |id: &str, label: &str, price: f64, unit: &str| ExtraRow {
        id: id.to_string(),
        label: label.to_string(),
        description: None,
        price,
        pricing_unit: Some(unit.to_string()),
    };

    build_catalog(
        vec![
            package("4H", "4 horas", "Ideal para escapadas cortas.", 240, 12.0, 6),
            package("8H", "8 horas", "Día completo frente al mar.", 480, 24.0, 6),
            package(
                "AMANECER",
                "Amanecer (6-9am)",
                "Luz dorada y mar en calma.",
                180,
                12.0,
                6,
            ),
            package("EVENTO", "Evento privado", "Celebraciones y grupos.", 600, 30.0, 8),
        ],
        vec![
            slot("4H", "08:00", "8:00 A.M. - 12:00 P.M.", "mañana"),
            slot("4H", "13:00", "1:00 P.M. - 4:00 P.M.", "tarde"),
            slot("4H", "17:00", "5:00 P.M. - 8:00 P.M.", "noche"),
            slot("8H", "08:00", "8:00 A.M. - 4:00 P.M.", "mañana"),
            slot("8H", "12:00", "12:00 P.M. - 8:00 P.M.", "tarde"),
            slot("8H", "14:00", "2:00 P.M. - 10:00 P.M.", "noche"),
            slot("AMANECER", "06:00", "6:00 A.M. - 9:00 A.M.", "mañana"),
        ],
        vec![
            extra("sofa_marino", "Sofa marino", 8.0, "PER_RESERVATION"),
            extra("paddleboard", "Paddleboard", 10.0, "PER_HOUR"),
            extra("kayak_doble", "Kayak doble", 15.0, "PER_HOUR"),
        ],
    )
}
