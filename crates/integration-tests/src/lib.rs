//! Integration tests for Shopfront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Cart state across sessions over a file store
//! - `cart_properties` - Property tests for cart operation sequences
//! - `session` - Discount list, first visit and checkout
//!
//! Every test gets its own [`TestContext`] with a fresh data file in a
//! temporary directory.

use std::path::PathBuf;
use std::rc::Rc;

use serde_json::Value;
use shopfront_storefront::storage::FileStore;
use shopfront_storefront::{NotificationLog, Storefront, StorefrontConfig};
use tempfile::TempDir;

/// A data file in a private temporary directory.
pub struct TestContext {
    dir: TempDir,
    pub config: StorefrontConfig,
}

impl TestContext {
    /// Create a context with default settings and no data file yet.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let config = StorefrontConfig {
            data_path: dir.path().join("shopfront-data.json"),
            ..StorefrontConfig::default()
        };
        Self { dir, config }
    }

    /// Path of the data file.
    #[must_use]
    pub fn data_path(&self) -> PathBuf {
        self.config.data_path.clone()
    }

    /// Start a session, as a page load would.
    ///
    /// # Panics
    ///
    /// Panics if the data file cannot be opened.
    #[must_use]
    pub fn open(&self) -> (Storefront<Rc<FileStore>>, Rc<NotificationLog>) {
        let log = Rc::new(NotificationLog::new());
        let storefront =
            Storefront::open_file(&self.config, log.clone()).expect("Failed to open storefront");
        (storefront, log)
    }

    /// Replace the data file with `entries`, a map of key to raw stored text.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write_raw(&self, entries: &[(&str, &str)]) {
        let object: serde_json::Map<String, Value> = entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), Value::String((*v).to_string())))
            .collect();
        std::fs::write(
            self.data_path(),
            serde_json::to_string(&object).expect("Failed to encode data file"),
        )
        .expect("Failed to write data file");
    }

    /// Decoded JSON stored under `key` in the data file, if any.
    ///
    /// # Panics
    ///
    /// Panics if the data file is unreadable or the stored text is not JSON.
    #[must_use]
    pub fn read_stored(&self, key: &str) -> Option<Value> {
        let contents = std::fs::read_to_string(self.data_path()).ok()?;
        let object: serde_json::Map<String, Value> =
            serde_json::from_str(&contents).expect("Data file is not a JSON object");
        let raw = object.get(key)?.as_str()?;
        Some(serde_json::from_str(raw).expect("Stored value is not JSON"))
    }

    /// Temporary directory holding the data file.
    #[must_use]
    pub fn dir(&self) -> &std::path::Path {
        self.dir.path()
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
