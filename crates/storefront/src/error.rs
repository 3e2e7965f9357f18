//! Unified error type for storefront setup.
//!
//! Cart and subscriber operations never return errors (they report through
//! notifications instead). `StorefrontError` covers the steps around them:
//! loading configuration, opening the store, and parsing user input before it
//! reaches the cart.

use shopfront_core::PriceError;
use thiserror::Error;

use crate::cart::TotalsOverflow;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The key-value store could not be opened or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A price supplied by the caller is not usable.
    #[error("Invalid price: {0}")]
    Price(#[from] PriceError),

    /// Cart totals could not be computed.
    #[error("Totals error: {0}")]
    Totals(#[from] TotalsOverflow),
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storefront_error_display() {
        let err = StorefrontError::from(PriceError::Empty);
        assert_eq!(err.to_string(), "Invalid price: price cannot be empty");
    }

    #[test]
    fn test_storage_error_converts() {
        let err: StorefrontError = StorageError::Corrupt("store.json".to_string()).into();
        assert!(matches!(err, StorefrontError::Storage(_)));
    }
}
