//! Cart line items.
//!
//! A [`CartItem`] is one product in the cart together with its accumulated
//! quantity. Name, price and image are captured when the product is first
//! added and never refreshed afterwards.
//!
//! The persisted shape is the flat object the storefront has always written:
//!
//! ```json
//! {"id": "p-1", "name": "Baobab Oil", "price": 100.0, "quantity": 2, "image": "images/baobab.jpg"}
//! ```
//!
//! Deserialization validates that shape instead of trusting it: a missing
//! field, a non-numeric or negative price, or a quantity below one is an
//! error. A missing `image` falls back to [`DEFAULT_PRODUCT_IMAGE`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// Image shown for products that were added without one.
pub const DEFAULT_PRODUCT_IMAGE: &str = "images/default-product.jpg";

/// Errors raised when a persisted cart entry fails validation.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartItemError {
    /// The product ID is empty.
    #[error("cart item id cannot be empty")]
    EmptyId,
    /// The quantity is zero.
    #[error("cart item quantity must be at least 1")]
    ZeroQuantity,
}

/// One line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCartItem")]
pub struct CartItem {
    id: ProductId,
    name: String,
    #[serde(with = "json_price")]
    price: Decimal,
    quantity: u32,
    image: String,
}

impl CartItem {
    /// Create a new line with quantity 1.
    ///
    /// `image` falls back to [`DEFAULT_PRODUCT_IMAGE`] when `None` or empty.
    #[must_use]
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Decimal,
        image: Option<&str>,
    ) -> Self {
        let image = image
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_PRODUCT_IMAGE)
            .to_owned();

        Self {
            id: id.into(),
            name: name.into(),
            price,
            quantity: 1,
            image,
        }
    }

    /// Product identifier.
    #[must_use]
    pub const fn id(&self) -> &ProductId {
        &self.id
    }

    /// Display name captured when the product was first added.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price captured when the product was first added.
    #[must_use]
    pub const fn price(&self) -> Decimal {
        self.price
    }

    /// Current quantity. Always at least 1.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Image URL.
    #[must_use]
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Unit price times quantity, or `None` on overflow.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }

    /// Add one to the quantity.
    pub const fn increment(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }

    /// Subtract one from the quantity unless it is already 1.
    ///
    /// Returns whether the quantity changed.
    pub const fn decrement(&mut self) -> bool {
        if self.quantity > 1 {
            self.quantity -= 1;
            true
        } else {
            false
        }
    }

    /// Fold the quantity of a duplicate line for the same product into this one.
    ///
    /// Metadata of `self` is kept.
    pub const fn absorb(&mut self, duplicate: &Self) {
        self.quantity = self.quantity.saturating_add(duplicate.quantity);
    }
}

/// Unvalidated persisted shape of a [`CartItem`].
#[derive(Deserialize)]
struct RawCartItem {
    id: String,
    name: String,
    #[serde(with = "json_price")]
    price: Decimal,
    quantity: u32,
    #[serde(default)]
    image: Option<String>,
}

impl TryFrom<RawCartItem> for CartItem {
    type Error = CartItemError;

    fn try_from(raw: RawCartItem) -> Result<Self, Self::Error> {
        if raw.id.is_empty() {
            return Err(CartItemError::EmptyId);
        }
        if raw.quantity == 0 {
            return Err(CartItemError::ZeroQuantity);
        }

        let mut item = Self::new(raw.id, raw.name, raw.price, raw.image.as_deref());
        item.quantity = raw.quantity;
        Ok(item)
    }
}

/// Prices are stored as JSON numbers; numeric strings are also accepted on read.
mod json_price {
    use rust_decimal::Decimal;
    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::types::price::parse_price;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PriceRepr {
        Number(f64),
        Text(String),
    }

    /// Writes the `f64` nearest to the decimal text. For prices accepted by
    /// `check_price` its shortest form is the same number again.
    pub fn serialize<S: Serializer>(price: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        let value: f64 = price
            .to_string()
            .parse()
            .map_err(|_| S::Error::custom(format!("price {price} is not representable")))?;
        serializer.serialize_f64(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        let text = match PriceRepr::deserialize(deserializer)? {
            PriceRepr::Number(value) => value.to_string(),
            PriceRepr::Text(text) => text,
        };
        parse_price(&text).map_err(D::Error::custom)
    }
}
