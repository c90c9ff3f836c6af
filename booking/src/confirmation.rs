//! Local persistence of the "last reservation" confirmation record.
//!
//! After a successful submission the client keeps a per-customer
//! snapshot of the booking. A reopened wizard loads it at mount and
//! shows the confirmation view instead of a fresh form. The soft
//! "at most one active reservation per user" rule lives entirely
//! here, not on the server.

use crate::types::{ConfirmationRecord, CustomerId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;
use tokio::sync::RwLock;

/// Failure of the confirmation store.
#[derive(Debug, Error)]
pub enum ConfirmationStoreError {
    /// The record file could not be read or written
    #[error("confirmation storage I/O: {0}")]
    Io(#[from] std::io::Error),
    /// The stored data was not decodable
    #[error("confirmation storage corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Per-customer persistence of the last confirmed reservation.
#[async_trait]
pub trait ConfirmationStore: Send + Sync {
    /// Saves (replaces) the customer's record.
    ///
    /// # Errors
    ///
    /// Returns [`ConfirmationStoreError`] when the write fails.
    async fn save(&self, record: &ConfirmationRecord) -> Result<(), ConfirmationStoreError>;

    /// Loads the customer's record, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ConfirmationStoreError`] when the read fails.
    async fn load(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<ConfirmationRecord>, ConfirmationStoreError>;

    /// Removes the customer's record.
    ///
    /// # Errors
    ///
    /// Returns [`ConfirmationStoreError`] when the write fails.
    async fn clear(&self, customer_id: CustomerId) -> Result<(), ConfirmationStoreError>;
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MemoryConfirmationStore {
    records: RwLock<HashMap<CustomerId, ConfirmationRecord>>,
}

impl MemoryConfirmationStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConfirmationStore for MemoryConfirmationStore {
    async fn save(&self, record: &ConfirmationRecord) -> Result<(), ConfirmationStoreError> {
        self.records
            .write()
            .await
            .insert(record.customer_id, record.clone());
        Ok(())
    }

    async fn load(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<ConfirmationRecord>, ConfirmationStoreError> {
        Ok(self.records.read().await.get(&customer_id).cloned())
    }

    async fn clear(&self, customer_id: CustomerId) -> Result<(), ConfirmationStoreError> {
        self.records.write().await.remove(&customer_id);
        Ok(())
    }
}

/// JSON-file store: one file holding a map of customer id → record,
/// the native stand-in for browser-local storage.
pub struct JsonFileConfirmationStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl JsonFileConfirmationStore {
    /// Creates a store over the given file path. The file is created
    /// on first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    async fn read_all(
        &self,
    ) -> Result<HashMap<CustomerId, ConfirmationRecord>, ConfirmationStoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn write_all(
        &self,
        records: &HashMap<CustomerId, ConfirmationRecord>,
    ) -> Result<(), ConfirmationStoreError> {
        let bytes = serde_json::to_vec_pretty(records)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl ConfirmationStore for JsonFileConfirmationStore {
    async fn save(&self, record: &ConfirmationRecord) -> Result<(), ConfirmationStoreError> {
        let _guard = self.lock.write().await;
        let mut records = self.read_all().await?;
        records.insert(record.customer_id, record.clone());
        self.write_all(&records).await
    }

    async fn load(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<ConfirmationRecord>, ConfirmationStoreError> {
        let _guard = self.lock.read().await;
        Ok(self.read_all().await?.remove(&customer_id))
    }

    async fn clear(&self, customer_id: CustomerId) -> Result<(), ConfirmationStoreError> {
        let _guard = self.lock.write().await;
        let mut records = self.read_all().await?;
        if records.remove(&customer_id).is_some() {
            self.write_all(&records).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{CabinId, Money, ReservationId};
    use chrono::NaiveDate;

    fn record(customer_id: CustomerId) -> ConfirmationRecord {
        ConfirmationRecord {
            reservation_id: ReservationId::new(),
            customer_id,
            display_name: "Ana".to_string(),
            adults: 4,
            kids: 1,
            package_label: "4 horas".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
            time_slot: "08:00-12:00".to_string(),
            extras: vec!["Paddleboard".to_string()],
            cabin_id: CabinId::new(),
            total: Money::from_cents(5800),
            created_at: chrono::DateTime::parse_from_rfc3339("2025-06-01T10:00:00Z")
                .unwrap()
                .with_timezone(&chrono::Utc),
        }
    }

    #[tokio::test]
    async fn memory_store_round_trip() {
        let store = MemoryConfirmationStore::new();
        let customer = CustomerId::new();
        assert!(store.load(customer).await.unwrap().is_none());

        let record = record(customer);
        store.save(&record).await.unwrap();
        assert_eq!(store.load(customer).await.unwrap(), Some(record));

        store.clear(customer).await.unwrap();
        assert!(store.load(customer).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn file_store_round_trip_and_per_customer_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileConfirmationStore::new(dir.path().join("confirmations.json"));

        let first = CustomerId::new();
        let second = CustomerId::new();
        store.save(&record(first)).await.unwrap();
        store.save(&record(second)).await.unwrap();

        assert!(store.load(first).await.unwrap().is_some());
        store.clear(first).await.unwrap();
        assert!(store.load(first).await.unwrap().is_none());
        assert!(store.load(second).await.unwrap().is_some(), "keys are per customer");
    }
}
