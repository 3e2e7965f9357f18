//! Type-safe price representation using decimal arithmetic.
//!
//! Product pages hand prices to the cart as text (the `data-price` attribute
//! of an add-to-cart button, or a CLI argument). [`parse_price`] is the single
//! entry point that turns that text into a [`Decimal`], so a non-numeric price
//! never reaches the cart.

use core::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Largest accepted unit price.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Most decimal places an accepted price may carry.
pub const PRICE_DECIMAL_PLACES: u32 = 2;

/// Errors that can occur when parsing a unit price.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input string is empty.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("price is not a number: {0}")]
    NotANumber(String),
    /// The input is below zero.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
    /// The input is above [`MAX_PRICE`].
    #[error("price is too large: {0}")]
    TooLarge(Decimal),
    /// The input has more than [`PRICE_DECIMAL_PLACES`] significant decimals.
    #[error("price has too many decimal places: {0}")]
    TooPrecise(Decimal),
}

/// Parse a unit price from text.
///
/// Surrounding whitespace is ignored. Plain and scientific notation are both
/// accepted (`"19.99"`, `"1e2"`).
///
/// # Errors
///
/// Returns [`PriceError`] if the input is empty or not numeric, or if the
/// number fails [`check_price`].
pub fn parse_price(input: &str) -> Result<Decimal, PriceError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(PriceError::Empty);
    }

    let amount = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| PriceError::NotANumber(trimmed.to_owned()))?;

    check_price(amount)
}

/// Check that `amount` is a usable unit price.
///
/// Accepted prices lie in `0..=MAX_PRICE` with at most two significant
/// decimal places, so every accepted value survives a trip through an `f64`
/// JSON number unchanged.
///
/// # Errors
///
/// Returns [`PriceError::Negative`], [`PriceError::TooLarge`] or
/// [`PriceError::TooPrecise`].
pub fn check_price(amount: Decimal) -> Result<Decimal, PriceError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(PriceError::Negative(amount));
    }
    if amount > MAX_PRICE {
        return Err(PriceError::TooLarge(amount));
    }
    if amount.normalize().scale() > PRICE_DECIMAL_PLACES {
        return Err(PriceError::TooPrecise(amount));
    }
    Ok(amount)
}

/// An amount with currency information, used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit (e.g. kwacha, not ngwee).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Format for display with two decimal places (e.g. `"ZMW 19.99"`).
    ///
    /// Halves round away from zero.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{} {rounded:.2}", self.currency_code.code())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    ZMW,
    USD,
    EUR,
    GBP,
    ZAR,
}

impl CurrencyCode {
    /// The three-letter code used as a display prefix.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ZMW => "ZMW",
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::ZAR => "ZAR",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for CurrencyCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ZMW" => Ok(Self::ZMW),
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "ZAR" => Ok(Self::ZAR),
            _ => Err(format!("unsupported currency code: {s}")),
        }
    }
}
