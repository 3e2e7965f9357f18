//! Persistent key-value storage.
//!
//! The storefront keeps all of its state in one flat string-to-string key
//! space, the same model as browser local storage. Three keys are used:
//!
//! - [`keys::CART`] - JSON array of cart line items
//! - [`keys::SUBSCRIBERS`] - JSON array of unique email strings
//! - [`keys::VISITED`] - presence flag, value `"true"` once set
//!
//! # Implementations
//!
//! - [`MemoryStore`] - In-process map with an optional byte quota
//! - [`FileStore`] - One JSON object file, rewritten on every write
//!
//! Stores take `&self` and use interior mutability so that the cart, the
//! subscriber list and the visit tracker can share one store through an
//! `Rc`.

mod file;
mod memory;

use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Fixed storage keys.
pub mod keys {
    /// Serialized cart line items.
    pub const CART: &str = "cart";
    /// Serialized discount-list email addresses.
    pub const SUBSCRIBERS: &str = "subscribers";
    /// First-visit flag.
    pub const VISITED: &str = "visited";
}

/// Errors raised by a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// Writing the value would exceed the store's capacity.
    #[error("storage quota exceeded writing {key} ({needed} bytes needed, limit {limit})")]
    QuotaExceeded {
        /// Key being written.
        key: String,
        /// Total bytes the store would hold after the write.
        needed: usize,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not a JSON object of strings.
    #[error("storage file is corrupt: {0}")]
    Corrupt(String),

    /// A value could not be encoded.
    #[error("failed to encode value: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A synchronous string key-value store.
///
/// Keys and values are plain strings; structured values are stored as JSON
/// text (see [`read_json`] and [`write_json`]).
pub trait KeyValueStore {
    /// Retrieve a value by key.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or overwrite a value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the write is refused or fails. A failed
    /// write leaves the previous value in place.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value.
    ///
    /// Returns `Ok(())` even if the key did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing storage cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Returns true if the key is present.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backing storage cannot be read.
    fn contains(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.get(key)?.is_some())
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Rc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Read and decode a JSON value, treating anything undecodable as absent.
///
/// Read failures and decode failures are logged at `warn` and yield `None`.
pub fn read_json<T: DeserializeOwned>(store: &impl KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read stored value");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, error = %e, "Ignoring malformed stored value");
            None
        }
    }
}

/// Encode a value as JSON and store it under `key`.
///
/// # Errors
///
/// Returns [`StorageError`] if encoding or the write fails.
pub fn write_json<T: Serialize + ?Sized>(
    store: &impl KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let encoded = serde_json::to_string(value)?;
    store.set(key, &encoded)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_read_json_absent() {
        let store = MemoryStore::new();
        let value: Option<Vec<String>> = read_json(&store, keys::SUBSCRIBERS);
        assert!(value.is_none());
    }

    #[test]
    fn test_read_json_malformed() {
        let store = MemoryStore::new();
        store.set(keys::SUBSCRIBERS, "{not json").unwrap();
        let value: Option<Vec<String>> = read_json(&store, keys::SUBSCRIBERS);
        assert!(value.is_none());
    }

    #[test]
    fn test_write_then_read_json() {
        let store = MemoryStore::new();
        let emails = vec!["a@b.co".to_string(), "c@d.co".to_string()];
        write_json(&store, keys::SUBSCRIBERS, &emails).unwrap();

        assert_eq!(
            store.get(keys::SUBSCRIBERS).unwrap().as_deref(),
            Some(r#"["a@b.co","c@d.co"]"#)
        );
        let read: Option<Vec<String>> = read_json(&store, keys::SUBSCRIBERS);
        assert_eq!(read, Some(emails));
    }

    #[test]
    fn test_shared_store_through_rc() {
        let store = Rc::new(MemoryStore::new());
        let other = Rc::clone(&store);

        store.set(keys::VISITED, "true").unwrap();
        assert!(other.contains(keys::VISITED).unwrap());
    }
}
