//! Display model of the cart.
//!
//! Everything a front end needs to draw the cart page and the quantity
//! counter, with prices already formatted.

use serde::Serialize;
use shopfront_core::{CartItem, CurrencyCode, Money};

use super::totals::{Totals, TotalsOverflow};

/// One cart line prepared for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLineView {
    /// Position in the cart; the index the quantity and remove controls use.
    pub index: usize,
    pub id: String,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    /// Formatted unit price (e.g. `"ZMW 100.00"`).
    pub price: String,
    /// Formatted unit price times quantity.
    pub line_price: String,
    /// False at quantity 1, where the decrease control does nothing.
    pub can_decrease: bool,
}

/// Cart display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub subtotal: String,
    pub discount: String,
    pub delivery: String,
    pub total: String,
    /// Sum of quantities; the value shown in the cart counter.
    pub item_count: u64,
    /// Accessible label for the cart counter.
    pub counter_label: String,
}

impl CartView {
    /// Build the view for `items` with precomputed `totals`.
    ///
    /// # Errors
    ///
    /// Returns [`TotalsOverflow`] if a line total overflows.
    pub fn new(
        items: &[CartItem],
        totals: &Totals,
        currency: CurrencyCode,
    ) -> Result<Self, TotalsOverflow> {
        let format = |amount| Money::new(amount, currency).display();
        let item_count = item_count(items);

        let lines = items
            .iter()
            .enumerate()
            .map(|(index, item)| -> Result<CartLineView, TotalsOverflow> {
                let line_total = item.line_total().ok_or(TotalsOverflow)?;
                Ok(CartLineView {
                    index,
                    id: item.id().to_string(),
                    name: item.name().to_owned(),
                    image: item.image().to_owned(),
                    quantity: item.quantity(),
                    price: format(item.price()),
                    line_price: format(line_total),
                    can_decrease: item.quantity() > 1,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            items: lines,
            subtotal: format(totals.subtotal),
            discount: format(totals.discount_amount),
            delivery: format(totals.delivery),
            total: format(totals.total),
            item_count,
            counter_label: counter_label(item_count),
        })
    }

    /// Returns true if the cart has no lines; the empty-cart message is shown
    /// instead of the summary.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Sum of quantities over all lines.
#[must_use]
pub fn item_count(items: &[CartItem]) -> u64 {
    items.iter().map(|item| u64::from(item.quantity())).sum()
}

/// Accessible label for the cart counter (e.g. `"3 items in cart"`).
#[must_use]
pub fn counter_label(count: u64) -> String {
    format!("{count} items in cart")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::cart::totals::DEFAULT_DELIVERY_FEE;

    #[test]
    fn test_view_formats_prices() {
        let mut basket = CartItem::new("basket", "Basket", Decimal::from(100), None);
        basket.increment();
        let soap = CartItem::new("soap", "Soap", Decimal::new(4999, 2), Some("soap.jpg"));
        let items = vec![basket, soap];

        let totals = Totals::compute(&items, DEFAULT_DELIVERY_FEE, Decimal::ZERO).unwrap();
        let view = CartView::new(&items, &totals, CurrencyCode::ZMW).unwrap();

        assert_eq!(view.items.len(), 2);
        assert_eq!(view.items[0].price, "ZMW 100.00");
        assert_eq!(view.items[0].line_price, "ZMW 200.00");
        assert!(view.items[0].can_decrease);
        assert_eq!(view.items[1].index, 1);
        assert_eq!(view.items[1].image, "soap.jpg");
        assert!(!view.items[1].can_decrease);
        assert_eq!(view.subtotal, "ZMW 249.99");
        assert_eq!(view.total, "ZMW 299.99");
        assert_eq!(view.item_count, 3);
        assert_eq!(view.counter_label, "3 items in cart");
    }

    #[test]
    fn test_empty_view() {
        let totals = Totals::compute(&[], DEFAULT_DELIVERY_FEE, Decimal::ZERO).unwrap();
        let view = CartView::new(&[], &totals, CurrencyCode::ZMW).unwrap();

        assert!(view.is_empty());
        assert_eq!(view.item_count, 0);
        assert_eq!(view.counter_label, "0 items in cart");
        assert_eq!(view.total, "ZMW 50.00");
    }
}
