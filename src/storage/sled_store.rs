//! Persistent key-value store backed by `sled`
//!
//! Plays the role of the browser's local storage: device-local, survives
//! restarts, and is shared by every process that opens the same directory
//! (with no coordination between them).

use super::KeyValueStore;
use crate::error::{RailtrailError, Result};
use std::path::{Path, PathBuf};

/// `sled`-backed [`KeyValueStore`]
pub struct SledStore {
    db: sled::Db,
    path: PathBuf,
}

impl SledStore {
    /// Open or create a store at `path`
    ///
    /// # Errors
    ///
    /// Returns `RailtrailError::Storage` if the database cannot be opened
    ///
    /// # Examples
    ///
    /// ```
    /// use railtrail::storage::{KeyValueStore, SledStore};
    ///
    /// # fn main() -> railtrail::error::Result<()> {
    /// let dir = tempfile::tempdir()?;
    /// let store = SledStore::open(dir.path().join("store"))?;
    /// store.set("reservationData", "{}")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                RailtrailError::Storage(format!("Failed to create store directory: {}", e))
            })?;
        }

        let db = sled::open(&path)
            .map_err(|e| RailtrailError::Storage(format!("Failed to open store: {}", e)))?;
        tracing::debug!(path = %path.display(), "Opened sled store");
        Ok(Self { db, path })
    }

    /// Location of the database directory
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for SledStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let Some(bytes) = self
            .db
            .get(key.as_bytes())
            .map_err(|e| RailtrailError::Storage(format!("Get failed: {}", e)))?
        else {
            return Ok(None);
        };

        // Non UTF-8 bytes are treated like any other unreadable value.
        match String::from_utf8(bytes.to_vec()) {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                tracing::warn!(key, "Stored value is not valid UTF-8");
                Ok(None)
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db
            .insert(key.as_bytes(), value.as_bytes())
            .map_err(|e| RailtrailError::Storage(format!("Insert failed: {}", e)))?;
        self.db
            .flush()
            .map_err(|e| RailtrailError::Storage(format!("Flush failed: {}", e)))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.db
            .remove(key.as_bytes())
            .map_err(|e| RailtrailError::Storage(format!("Remove failed: {}", e)))?;
        self.db
            .flush()
            .map_err(|e| RailtrailError::Storage(format!("Flush failed: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_store() -> (SledStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let store = SledStore::open(dir.path().join("store")).expect("failed to open store");
        (store, dir)
    }

    #[test]
    fn test_open_creates_nested_directory() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let path = dir.path().join("nested").join("store");
        let store = SledStore::open(&path).expect("open failed");
        assert_eq!(store.path(), path.as_path());
        assert!(path.parent().unwrap().exists());
    }

    #[test]
    fn test_set_and_get() {
        let (store, _dir) = create_test_store();
        store.set("historySessions", "[]").unwrap();
        assert_eq!(
            store.get("historySessions").unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn test_get_missing_returns_none() {
        let (store, _dir) = create_test_store();
        assert!(store.get("currentHistorySession").unwrap().is_none());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (store, _dir) = create_test_store();
        store.set("k", "v").unwrap();
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert!(store.get("k").unwrap().is_none());
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let path = dir.path().join("store");
        {
            let store = SledStore::open(&path).unwrap();
            store.set("reservationData", r#"{"adultCount":1}"#).unwrap();
        }
        let store = SledStore::open(&path).unwrap();
        assert_eq!(
            store.get("reservationData").unwrap().as_deref(),
            Some(r#"{"adultCount":1}"#)
        );
    }
}
