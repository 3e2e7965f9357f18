//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `SHOPFRONT_DATA_PATH` - Storage file (default: `shopfront-data.json`)
//! - `SHOPFRONT_DELIVERY_FEE` - Flat delivery charge (default: 50)
//! - `SHOPFRONT_CURRENCY` - ISO 4217 code used in displayed prices (default: ZMW)
//! - `SHOPFRONT_STORAGE_QUOTA_BYTES` - Cap on stored bytes (default: unlimited)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;

use rust_decimal::Decimal;
use shopfront_core::{CurrencyCode, parse_price};
use thiserror::Error;

use crate::cart::DEFAULT_DELIVERY_FEE;

const DEFAULT_DATA_PATH: &str = "shopfront-data.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// File backing the key-value store
    pub data_path: PathBuf,
    /// Flat delivery charge added to every order
    pub delivery_fee: Decimal,
    /// Currency used when formatting prices
    pub currency: CurrencyCode,
    /// Upper bound on stored bytes, like a browser storage quota
    pub storage_quota_bytes: Option<usize>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            delivery_fee: DEFAULT_DELIVERY_FEE,
            currency: CurrencyCode::default(),
            storage_quota_bytes: None,
            sentry_dsn: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let data_path = lookup("SHOPFRONT_DATA_PATH")
            .filter(|v| !v.trim().is_empty())
            .map_or(defaults.data_path, PathBuf::from);

        let delivery_fee = match lookup("SHOPFRONT_DELIVERY_FEE") {
            Some(raw) => parse_price(&raw).map_err(|e| {
                ConfigError::InvalidEnvVar("SHOPFRONT_DELIVERY_FEE".to_string(), e.to_string())
            })?,
            None => defaults.delivery_fee,
        };

        let currency = match lookup("SHOPFRONT_CURRENCY") {
            Some(raw) => raw
                .parse::<CurrencyCode>()
                .map_err(|e| ConfigError::InvalidEnvVar("SHOPFRONT_CURRENCY".to_string(), e))?,
            None => defaults.currency,
        };

        let storage_quota_bytes = lookup("SHOPFRONT_STORAGE_QUOTA_BYTES")
            .map(|raw| {
                raw.trim().parse::<usize>().map_err(|e| {
                    ConfigError::InvalidEnvVar(
                        "SHOPFRONT_STORAGE_QUOTA_BYTES".to_string(),
                        e.to_string(),
                    )
                })
            })
            .transpose()?;

        let sentry_dsn = lookup("SENTRY_DSN").filter(|v| !v.is_empty());

        Ok(Self {
            data_path,
            delivery_fee,
            currency,
            storage_quota_bytes,
            sentry_dsn,
        })
    }
}
