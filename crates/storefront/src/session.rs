//! Storefront session.
//!
//! [`Storefront`] is constructed once when a visitor session starts and owns
//! everything the front end talks to: the cart, the discount list and the
//! first-visit decision. All three share a single key-value store.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use rust_decimal::Decimal;
use shopfront_core::{CurrencyCode, ProductId, parse_price};

use crate::cart::{ADD_FAILED_MESSAGE, CartOutcome, CartStore, CartView};
use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::notify::{Notification, NotificationSink};
use crate::storage::{FileStore, KeyValueStore};
use crate::subscribers::{SubscribeOutcome, SubscriberList};
use crate::visits::{DISCOUNT_PROMPT_DELAY, VisitTracker};

/// Page the visitor is sent to when checking out.
pub const CHECKOUT_PATH: &str = "checkout.html";

/// Shown when checkout is attempted with nothing in the cart.
pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty. Add items before checkout.";

/// Result of a checkout attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// The cart is empty; the visitor stays on the cart page.
    EmptyCart,
    /// Navigate to the given page.
    Redirect(&'static str),
}

/// A visitor session over one key-value store.
pub struct Storefront<S> {
    cart: CartStore<S>,
    subscribers: SubscriberList<S>,
    first_visit: bool,
    currency: CurrencyCode,
    notifier: Rc<dyn NotificationSink>,
}

impl<S> fmt::Debug for Storefront<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storefront")
            .field("cart", &self.cart)
            .field("first_visit", &self.first_visit)
            .field("currency", &self.currency)
            .finish_non_exhaustive()
    }
}

impl Storefront<Rc<FileStore>> {
    /// Open a session over the file named by `config.data_path`.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Storage`] if the file exists but cannot be
    /// read or is corrupt.
    ///
    /// [`StorefrontError::Storage`]: crate::error::StorefrontError::Storage
    pub fn open_file(config: &StorefrontConfig, notifier: Rc<dyn NotificationSink>) -> Result<Self> {
        let store = FileStore::open(&config.data_path)?.with_quota(config.storage_quota_bytes);
        Ok(Self::open(Rc::new(store), config, notifier))
    }
}

impl<S: KeyValueStore + Clone> Storefront<S> {
    /// Start a session: check the first-visit flag and load the cart.
    pub fn open(store: S, config: &StorefrontConfig, notifier: Rc<dyn NotificationSink>) -> Self {
        let first_visit = VisitTracker::new(store.clone()).first_visit();
        let cart = CartStore::load(store.clone(), Rc::clone(&notifier))
            .with_delivery_fee(config.delivery_fee);
        let subscribers = SubscriberList::new(store, Rc::clone(&notifier));

        tracing::info!(first_visit, lines = cart.len(), "Storefront session opened");

        Self {
            cart,
            subscribers,
            first_visit,
            currency: config.currency,
            notifier,
        }
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore<S> {
        &self.cart
    }

    pub const fn cart_mut(&mut self) -> &mut CartStore<S> {
        &mut self.cart
    }

    /// Whether this session set the first-visit flag.
    #[must_use]
    pub const fn is_first_visit(&self) -> bool {
        self.first_visit
    }

    /// How long to wait before opening the discount prompt, if it should
    /// open at all this session.
    #[must_use]
    pub const fn discount_prompt_delay(&self) -> Option<Duration> {
        if self.first_visit {
            Some(DISCOUNT_PROMPT_DELAY)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Add a product whose price arrives as text, as on a product listing.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Price`] if the price is not a number up to
    /// [`MAX_PRICE`] with at most two decimal places. The visitor is notified
    /// and the cart is left untouched.
    ///
    /// [`StorefrontError::Price`]: crate::error::StorefrontError::Price
    /// [`MAX_PRICE`]: shopfront_core::MAX_PRICE
    pub fn add_from_listing(
        &mut self,
        id: impl Into<ProductId>,
        name: &str,
        price: &str,
        image: Option<&str>,
    ) -> Result<CartOutcome> {
        let price = parse_price(price).map_err(|e| {
            tracing::warn!(error = %e, "Rejected listing price");
            self.notifier.notify(Notification::error(ADD_FAILED_MESSAGE));
            e
        })?;
        Ok(self.cart.add_item(id, name, price, image))
    }

    /// Subscribe an address to the discount list.
    pub fn subscribe(&self, raw_email: &str) -> SubscribeOutcome {
        self.subscribers.subscribe(raw_email)
    }

    /// Addresses on the discount list, oldest first.
    #[must_use]
    pub fn subscribers(&self) -> Vec<String> {
        self.subscribers.subscribers()
    }

    /// Display model of the cart in the session currency.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Totals`] if an amount overflows.
    ///
    /// [`StorefrontError::Totals`]: crate::error::StorefrontError::Totals
    pub fn view(&self, discount: Decimal) -> Result<CartView> {
        self.cart.view(self.currency, discount).map_err(Into::into)
    }

    /// Proceed to checkout, refusing an empty cart.
    pub fn checkout(&self) -> CheckoutOutcome {
        if self.cart.is_empty() {
            self.notifier.notify(Notification::error(EMPTY_CART_MESSAGE));
            return CheckoutOutcome::EmptyCart;
        }
        tracing::info!(items = self.cart.item_count(), "Proceeding to checkout");
        CheckoutOutcome::Redirect(CHECKOUT_PATH)
    }
}
