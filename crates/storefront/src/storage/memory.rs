//! In-process key-value store.

use std::cell::RefCell;
use std::collections::BTreeMap;

use super::{KeyValueStore, StorageError};

/// A [`KeyValueStore`] held entirely in memory.
///
/// An optional quota caps the total size of keys plus values in bytes; a
/// write that would exceed it fails with [`StorageError::QuotaExceeded`] and
/// leaves the store unchanged, like a full browser local storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Create an empty, unbounded store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store limited to `quota` bytes.
    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: RefCell::default(),
            quota: Some(quota),
        }
    }

    /// Total bytes of keys and values currently held.
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        used_bytes(&self.entries.borrow())
    }

    /// Number of keys held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns true if no keys are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

/// Sum of key and value lengths.
pub(super) fn used_bytes(entries: &BTreeMap<String, String>) -> usize {
    entries.iter().map(|(k, v)| k.len() + v.len()).sum()
}

/// Bytes the map would hold after writing `key` = `value`.
pub(super) fn bytes_after_write(
    entries: &BTreeMap<String, String>,
    key: &str,
    value: &str,
) -> usize {
    let replaced = entries.get(key).map_or(0, |old| key.len() + old.len());
    used_bytes(entries) - replaced + key.len() + value.len()
}

/// Fail with [`StorageError::QuotaExceeded`] if the write does not fit.
pub(super) fn check_quota(
    entries: &BTreeMap<String, String>,
    quota: Option<usize>,
    key: &str,
    value: &str,
) -> Result<(), StorageError> {
    let Some(limit) = quota else {
        return Ok(());
    };

    let needed = bytes_after_write(entries, key, value);
    if needed > limit {
        return Err(StorageError::QuotaExceeded {
            key: key.to_owned(),
            needed,
            limit,
        });
    }
    Ok(())
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.borrow_mut();
        check_quota(&entries, self.quota, key, value)?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
