//! PostgREST-backed booking backend.
//!
//! Talks to the managed backend over its REST surface: table reads
//! for reference data and `rpc/` calls for the two atomic procedures.
//! Row-level security is the backend's concern; this client
//! authenticates with the service key and forwards the caller id
//! explicitly where a procedure needs it.

use super::{BackendError, BookingBackend, CreatedReservation, NewReservation};
use crate::catalog::{Catalog, ExtraRow, PackageRow, TimeSlotRow, build_catalog};
use crate::timerange::TimeRange;
use crate::types::{CabinId, CustomerId, Package, PackageId, ReservationId};
use crate::wizard::FormConfig;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use uuid::Uuid;

/// Booking backend over a PostgREST base URL.
pub struct SupabaseBackend {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl SupabaseBackend {
    /// Creates a backend client for the given project.
    #[must_use]
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        service_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            service_key: service_key.into(),
        }
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{path}", self.base_url)
    }

    async fn get_rows<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, BackendError> {
        let response = self
            .http
            .get(self.rest_url(path))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .send()
            .await
            .map_err(|e| BackendError::transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::transport(format!("{status}: {body}")));
        }
        response
            .json()
            .await
            .map_err(|e| BackendError::transport(e.to_string()))
    }

    /// Calls an RPC; a non-2xx response carries the procedure's error
    /// message, surfaced as a domain rejection.
    async fn call_rpc<T: DeserializeOwned>(
        &self,
        name: &str,
        payload: serde_json::Value,
    ) -> Result<T, BackendError> {
        let response = self
            .http
            .post(self.rest_url(&format!("rpc/{name}")))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| BackendError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<PostgrestError>(&body)
                .map_or(body, |err| err.message);
            tracing::warn!(rpc = name, %status, %message, "backend procedure rejected");
            return Err(BackendError::Domain(message));
        }
        response
            .json()
            .await
            .map_err(|e| BackendError::transport(e.to_string()))
    }
}

/// PostgREST error body.
#[derive(Debug, Deserialize)]
struct PostgrestError {
    #[serde(default)]
    message: String,
}

/// `create_reservation_public` result row.
#[derive(Debug, Deserialize)]
struct CreatedRow {
    reservation_id: Uuid,
    cabin_id: Uuid,
    #[serde(default)]
    total_amount: f64,
}

/// `form_config` result row.
#[derive(Debug, Deserialize)]
struct FormConfigRow {
    schema: Option<FormConfig>,
}

fn wire_timestamp(value: NaiveDateTime) -> String {
    value.format("%Y-%m-%dT%H:%M:%S").to_string()
}

const PACKAGE_COLUMNS: &str = "id,label,note,duration_minutes,base_price_per_adult,kid_discount,\
                               min_people_weekday,min_people_weekend,min_people_holiday";

#[async_trait]
impl BookingBackend for SupabaseBackend {
    async fn fetch_catalog(&self) -> Result<Catalog, BackendError> {
        let packages_query = format!(
            "packages?select={PACKAGE_COLUMNS}&is_active=eq.true&order=duration_minutes.asc"
        );
        let packages = self.get_rows::<PackageRow>(&packages_query);
        let slots = self.get_rows::<TimeSlotRow>(
            "package_time_slots?select=package_id,time_of_day,label,period&is_active=eq.true",
        );
        let extras = self.get_rows::<ExtraRow>(
            "extras?select=id,label,description,price,pricing_unit&is_active=eq.true&order=price.asc",
        );
        let (packages, slots, extras) = tokio::try_join!(packages, slots, extras)?;
        Ok(build_catalog(packages, slots, extras))
    }

    async fn fetch_form_config(&self) -> Result<Option<FormConfig>, BackendError> {
        let rows = self
            .get_rows::<FormConfigRow>(
                "form_config?select=schema&key=eq.public_wizard&is_active=eq.true\
                 &order=updated_at.desc&limit=1",
            )
            .await?;
        Ok(rows.into_iter().next().and_then(|row| row.schema))
    }

    async fn fetch_package(&self, id: &PackageId) -> Result<Option<Package>, BackendError> {
        let rows = self
            .get_rows::<PackageRow>(&format!(
                "packages?select={PACKAGE_COLUMNS}&id=eq.{}&limit=1",
                id.as_str()
            ))
            .await?;
        Ok(build_catalog(rows, vec![], vec![]).packages.into_iter().next())
    }

    async fn assign_cabin(
        &self,
        range: &TimeRange,
        people: u32,
    ) -> Result<Option<CabinId>, BackendError> {
        let assigned: Option<Uuid> = self
            .call_rpc(
                "assign_cabin",
                json!({
                    "p_start_at": wire_timestamp(range.start),
                    "p_end_at": wire_timestamp(range.end),
                    "p_people": people,
                }),
            )
            .await?;
        Ok(assigned.map(CabinId::from_uuid))
    }

    async fn create_reservation(
        &self,
        reservation: &NewReservation,
    ) -> Result<CreatedReservation, BackendError> {
        let extras: Vec<_> = reservation
            .extras
            .iter()
            .map(|extra| json!({ "id": extra.id, "quantity": extra.quantity }))
            .collect();

        // The procedure returns a single-row set.
        let rows: Vec<CreatedRow> = self
            .call_rpc(
                "create_reservation_public",
                json!({
                    "p_package_id": reservation.package_id,
                    "p_reserved_date": reservation.date,
                    "p_start_at": wire_timestamp(reservation.range.start),
                    "p_end_at": wire_timestamp(reservation.range.end),
                    "p_adults": reservation.adults,
                    "p_kids": reservation.kids,
                    "p_payment_method": reservation.payment_method,
                    "p_extras": extras,
                    "p_special_request": reservation.special_request,
                    "p_customer_id": reservation.customer_id,
                }),
            )
            .await?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::transport("create_reservation returned no row"))?;
        Ok(CreatedReservation {
            reservation_id: ReservationId::from_uuid(row.reservation_id),
            cabin_id: CabinId::from_uuid(row.cabin_id),
            total: crate::types::Money::from_wire_dollars(row.total_amount),
        })
    }

    async fn save_phone(&self, customer_id: CustomerId, phone: &str) -> Result<(), BackendError> {
        let response = self
            .http
            .post(self.rest_url("profiles?on_conflict=user_id"))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Prefer", "resolution=merge-duplicates")
            .json(&json!({ "user_id": customer_id, "phone": phone }))
            .send()
            .await
            .map_err(|e| BackendError::transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::transport(format!("{status}: {body}")));
        }
        Ok(())
    }
}
