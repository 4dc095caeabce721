//! Key-value storage for session records and the reservation draft
//!
//! Every slot holds one JSON document. The [`KeyValueStore`] trait is the
//! injected seam: [`MemoryStore`] backs tests and throwaway runs, while
//! [`SledStore`] persists to an embedded `sled` database on the device.
//!
//! [`JsonStore`] layers JSON encoding on top and is deliberately fail-soft on
//! reads: a slot whose contents do not parse as the requested type reads the
//! same as an empty slot.

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

pub mod memory;
pub mod sled_store;
pub mod types;

pub use memory::MemoryStore;
pub use sled_store::SledStore;
pub use types::StorageKey;

/// Synchronous string key-value store
///
/// Implementations use interior mutability; all methods take `&self`.
/// There is no atomicity across keys.
#[cfg_attr(test, mockall::automock)]
pub trait KeyValueStore {
    /// Read the raw value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// JSON encode/decode layer over a [`KeyValueStore`]
#[derive(Debug, Clone)]
pub struct JsonStore<S> {
    inner: S,
}

impl<S: KeyValueStore> JsonStore<S> {
    /// Wrap a raw store
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Borrow the underlying raw store
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Read and decode the document under `key`
    ///
    /// Returns `Ok(None)` when the slot is empty or its contents do not
    /// decode as `T`. Only backend failures are returned as errors.
    pub fn read<T: DeserializeOwned>(&self, key: StorageKey) -> Result<Option<T>> {
        let Some(raw) = self.inner.get(key.as_str())? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Ignoring malformed stored value");
                Ok(None)
            }
        }
    }

    /// Read a JSON array slot, treating empty or malformed contents as `[]`
    pub fn read_list<T: DeserializeOwned>(&self, key: StorageKey) -> Result<Vec<T>> {
        Ok(self.read::<Vec<T>>(key)?.unwrap_or_default())
    }

    /// Encode `value` and store it under `key`
    pub fn write<T: Serialize + ?Sized>(&self, key: StorageKey, value: &T) -> Result<()> {
        let encoded = serde_json::to_string(value)?;
        tracing::debug!(key = %key, bytes = encoded.len(), "Writing slot");
        self.inner.set(key.as_str(), &encoded)
    }

    /// Clear the slot under `key`
    pub fn remove(&self, key: StorageKey) -> Result<()> {
        tracing::debug!(key = %key, "Removing slot");
        self.inner.remove(key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RailtrailError;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Probe {
        name: String,
        count: u32,
    }

    #[test]
    fn test_read_missing_slot_returns_none() {
        let store = JsonStore::new(MemoryStore::new());
        let value: Option<Probe> = store.read(StorageKey::ReservationDraft).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_write_then_read_returns_value() {
        let store = JsonStore::new(MemoryStore::new());
        let probe = Probe {
            name: "서울".to_string(),
            count: 2,
        };
        store.write(StorageKey::ReservationDraft, &probe).unwrap();

        let loaded: Option<Probe> = store.read(StorageKey::ReservationDraft).unwrap();
        assert_eq!(loaded, Some(probe));
    }

    #[test]
    fn test_read_malformed_json_returns_none() {
        let raw = MemoryStore::new();
        raw.set(StorageKey::ReservationDraft.as_str(), "{not json")
            .unwrap();
        let store = JsonStore::new(raw);

        let value: Option<Probe> = store.read(StorageKey::ReservationDraft).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_read_wrong_shape_returns_none() {
        let raw = MemoryStore::new();
        raw.set(StorageKey::ReservationDraft.as_str(), r#"{"name": 5}"#)
            .unwrap();
        let store = JsonStore::new(raw);

        let value: Option<Probe> = store.read(StorageKey::ReservationDraft).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_read_list_malformed_is_empty() {
        let raw = MemoryStore::new();
        raw.set(StorageKey::HistoryList.as_str(), "oops").unwrap();
        let store = JsonStore::new(raw);

        let list: Vec<Probe> = store.read_list(StorageKey::HistoryList).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn test_remove_clears_slot() {
        let store = JsonStore::new(MemoryStore::new());
        store.write(StorageKey::ReservationDraft, &1u32).unwrap();
        store.remove(StorageKey::ReservationDraft).unwrap();

        assert!(store
            .read::<u32>(StorageKey::ReservationDraft)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_backend_failure_propagates() {
        let mut mock = MockKeyValueStore::new();
        mock.expect_get()
            .returning(|_| Err(RailtrailError::Storage("disk gone".to_string()).into()));
        let store = JsonStore::new(mock);

        let err = store
            .read::<Probe>(StorageKey::ReservationDraft)
            .unwrap_err();
        assert!(err.to_string().contains("disk gone"));
    }

    #[test]
    fn test_write_uses_slot_name() {
        let mut mock = MockKeyValueStore::new();
        mock.expect_set()
            .withf(|key, value| key == "reservationData" && value == "7")
            .times(1)
            .returning(|_, _| Ok(()));
        let store = JsonStore::new(mock);

        store.write(StorageKey::ReservationDraft, &7u32).unwrap();
    }
}
