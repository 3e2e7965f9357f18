//! Derived cart totals.

use rust_decimal::Decimal;
use serde::Serialize;
use shopfront_core::CartItem;
use thiserror::Error;

/// Flat delivery fee charged on every order.
pub const DEFAULT_DELIVERY_FEE: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// A total did not fit in a [`Decimal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cart totals overflowed")]
pub struct TotalsOverflow;

/// Totals derived from the cart contents. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
    /// Sum of unit price times quantity over all lines.
    pub subtotal: Decimal,
    /// Discount fraction applied to the subtotal.
    pub discount: Decimal,
    /// Amount taken off the subtotal (`subtotal * discount`).
    pub discount_amount: Decimal,
    /// Flat delivery fee.
    pub delivery: Decimal,
    /// `subtotal * (1 - discount) + delivery`.
    pub total: Decimal,
}

impl Totals {
    /// Compute totals for `items`.
    ///
    /// `discount` is expected in `[0, 1)` but is not checked. The delivery fee
    /// is charged even when the cart is empty.
    ///
    /// # Errors
    ///
    /// Returns [`TotalsOverflow`] if any intermediate amount overflows.
    pub fn compute(
        items: &[CartItem],
        delivery: Decimal,
        discount: Decimal,
    ) -> Result<Self, TotalsOverflow> {
        let subtotal = items.iter().try_fold(Decimal::ZERO, |acc, item| {
            item.line_total().and_then(|line| acc.checked_add(line))
        });
        let subtotal = subtotal.ok_or(TotalsOverflow)?;
        let discount_amount = subtotal.checked_mul(discount).ok_or(TotalsOverflow)?;
        let total = subtotal
            .checked_sub(discount_amount)
            .and_then(|net| net.checked_add(delivery))
            .ok_or(TotalsOverflow)?;

        Ok(Self {
            subtotal,
            discount,
            discount_amount,
            delivery,
            total,
        })
    }
}
