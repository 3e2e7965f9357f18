//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart_item;
pub mod email;
pub mod id;
pub mod price;

pub use cart_item::{CartItem, CartItemError, DEFAULT_PRODUCT_IMAGE};
pub use email::{Email, EmailError};
pub use id::ProductId;
pub use price::{
    CurrencyCode, MAX_PRICE, Money, PRICE_DECIMAL_PLACES, PriceError, check_price, parse_price,
};
