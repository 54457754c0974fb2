//! # In-Memory Storage
//!
//! A `localStorage` stand-in living in the process.
//!
//! Clones share the same records, so a clone handed to a second engine sees
//! what the first one wrote. That is how tests model a page reload.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{StoreError, StoreResult};
use crate::storage::Storage;

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<String, String>,
    /// Maximum total bytes of keys + values, if limited.
    quota: Option<usize>,
    disabled: bool,
}

impl Inner {
    fn used_bytes_without(&self, key: &str) -> usize {
        self.records
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

/// Shared in-process record store.
///
/// ## Usage
/// ```rust
/// use basket_store::{MemoryStorage, Storage};
///
/// let mut storage = MemoryStorage::with_quota(16);
/// assert!(storage.set_item("k", "short").is_ok());
/// assert!(storage.set_item("k", "this value is far too long").is_err());
/// assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("short"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStorage {
    /// Creates an empty, unlimited store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty store limited to `bytes` of keys + values.
    pub fn with_quota(bytes: usize) -> Self {
        let storage = Self::new();
        if let Ok(mut inner) = storage.inner.lock() {
            inner.quota = Some(bytes);
        }
        storage
    }

    /// Turns the store off or back on. While off, every call fails with
    /// [`StoreError::Unavailable`].
    pub fn set_disabled(&self, disabled: bool) -> StoreResult<()> {
        self.lock()?.disabled = disabled;
        Ok(())
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.inner.lock().map(|inner| inner.records.len()).unwrap_or(0)
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::unavailable("memory storage lock poisoned"))
    }

    fn lock_enabled(&self) -> StoreResult<MutexGuard<'_, Inner>> {
        let inner = self.lock()?;
        if inner.disabled {
            return Err(StoreError::unavailable("storage is disabled"));
        }
        Ok(inner)
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.lock_enabled()?.records.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let mut inner = self.lock_enabled()?;

        if let Some(quota) = inner.quota {
            let needed = inner.used_bytes_without(key) + key.len() + value.len();
            if needed > quota {
                return Err(StoreError::QuotaExceeded { needed, quota });
            }
        }

        inner.records.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> StoreResult<()> {
        self.lock_enabled()?.records.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get_item("cart").unwrap(), None);

        storage.set_item("cart", "[]").unwrap();
        assert_eq!(storage.get_item("cart").unwrap().as_deref(), Some("[]"));

        storage.remove_item("cart").unwrap();
        storage.remove_item("cart").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_clones_share_records() {
        let mut first = MemoryStorage::new();
        let second = first.clone();

        first.set_item("cart", "[1]").unwrap();
        assert_eq!(second.get_item("cart").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_quota_counts_replaced_value_once() {
        let mut storage = MemoryStorage::with_quota(10);
        storage.set_item("k", "123456789").unwrap(); // 1 + 9 bytes
        storage.set_item("k", "abcdefghi").unwrap(); // replaces, still 10

        let err = storage.set_item("k2", "x").unwrap_err();
        assert!(matches!(err, StoreError::QuotaExceeded { needed: 13, quota: 10 }));
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("abcdefghi"));
    }

    #[test]
    fn test_disabled_storage_fails_every_call() {
        let mut storage = MemoryStorage::new();
        storage.set_item("cart", "[]").unwrap();
        storage.set_disabled(true).unwrap();

        assert!(matches!(
            storage.get_item("cart"),
            Err(StoreError::Unavailable(_))
        ));
        assert!(storage.set_item("cart", "[]").is_err());

        storage.set_disabled(false).unwrap();
        assert_eq!(storage.get_item("cart").unwrap().as_deref(), Some("[]"));
    }
}
