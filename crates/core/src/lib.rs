//! Shopfront Core - Shared cart types.
//!
//! This crate provides the types used across all Shopfront components:
//! - `storefront` - Cart store, subscriber list and key-value persistence
//! - `cli` - Command-line front end driving the storefront
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O and no storage
//! access. Persistence lives in the storefront crate.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, prices, emails and cart line items

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
