//! Cart state.
//!
//! [`CartStore`] owns the authoritative in-memory list of cart lines and
//! mirrors it to the [`keys::CART`] entry of a [`KeyValueStore`] after every
//! mutation.
//!
//! # Failure handling
//!
//! Mutations never return errors. An out-of-range index is ignored silently.
//! A storage failure while persisting is logged, reported to the user through
//! the [`NotificationSink`], and returned as [`CartOutcome::Failed`]. The
//! in-memory cart keeps the change in that case, so it may run ahead of the
//! stored copy until the next successful write.

mod events;
mod totals;
mod view;

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use rust_decimal::Decimal;
use shopfront_core::{CartItem, CurrencyCode, ProductId, check_price};
use tracing::instrument;

use crate::notify::{Notification, NotificationSink};
use crate::storage::{KeyValueStore, StorageError, keys, read_json, write_json};

pub use events::{CartChange, ChangeListener};
pub use totals::{DEFAULT_DELIVERY_FEE, Totals, TotalsOverflow};
pub use view::{CartLineView, CartView, counter_label, item_count};

/// Shown when an add could not be saved.
pub const ADD_FAILED_MESSAGE: &str = "Could not add item to cart. Please try again.";

/// Shown when a remove or quantity change could not be saved.
pub const UPDATE_FAILED_MESSAGE: &str = "Could not update your cart. Please try again.";

/// Result of a cart mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOutcome {
    /// The change was applied and persisted.
    Applied,
    /// Nothing happened (index out of range).
    Ignored,
    /// The change was applied in memory but could not be persisted.
    Failed,
    /// The input was rejected and nothing changed (unusable price).
    Refused,
}

impl CartOutcome {
    #[must_use]
    pub const fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Quantity control on a cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityAction {
    /// Add one unit.
    Increase,
    /// Remove one unit, but never go below 1.
    Decrease,
}

impl fmt::Display for QuantityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Increase => write!(f, "increase"),
            Self::Decrease => write!(f, "decrease"),
        }
    }
}

impl FromStr for QuantityAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "increase" => Ok(Self::Increase),
            "decrease" => Ok(Self::Decrease),
            _ => Err(format!("invalid quantity action: {s}")),
        }
    }
}

/// The shopping cart and its persisted mirror.
pub struct CartStore<S> {
    store: S,
    items: Vec<CartItem>,
    delivery_fee: Decimal,
    notifier: Rc<dyn NotificationSink>,
    listeners: Vec<ChangeListener>,
}

impl<S> fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("items", &self.items)
            .field("delivery_fee", &self.delivery_fee)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl<S: KeyValueStore> CartStore<S> {
    /// Load the cart from `store`.
    ///
    /// An absent or undecodable cart starts empty. Individual entries that
    /// fail validation are dropped, and entries repeating an earlier product
    /// ID are merged into it by quantity. Never fails.
    pub fn load(store: S, notifier: Rc<dyn NotificationSink>) -> Self {
        let items = load_items(&store);
        tracing::debug!(lines = items.len(), "Cart loaded");

        Self {
            store,
            items,
            delivery_fee: DEFAULT_DELIVERY_FEE,
            notifier,
            listeners: Vec::new(),
        }
    }

    /// Use `fee` as the flat delivery charge instead of [`DEFAULT_DELIVERY_FEE`].
    #[must_use]
    pub fn with_delivery_fee(mut self, fee: Decimal) -> Self {
        self.delivery_fee = fee;
        self
    }

    /// Cart lines in display order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// The line at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CartItem> {
        self.items.get(index)
    }

    /// Number of lines (not units).
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of quantities; the cart counter value.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        item_count(&self.items)
    }

    /// The flat delivery charge.
    #[must_use]
    pub const fn delivery_fee(&self) -> Decimal {
        self.delivery_fee
    }

    /// Register a listener called after every applied change.
    pub fn on_change(&mut self, listener: impl FnMut(&CartChange) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Add one unit of a product.
    ///
    /// If the product is already in the cart its quantity goes up by one and
    /// its stored name, price and image are left as first added. Otherwise a
    /// new line with quantity 1 is appended; a missing image falls back to
    /// the default placeholder. A new line whose price fails [`check_price`]
    /// is refused with an error notification.
    #[instrument(skip(self, id))]
    pub fn add_item(
        &mut self,
        id: impl Into<ProductId>,
        name: &str,
        price: Decimal,
        image: Option<&str>,
    ) -> CartOutcome {
        let id = id.into();
        tracing::debug!(product_id = %id, "Adding item to cart");

        let change = match self.items.iter_mut().enumerate().find(|(_, item)| *item.id() == id) {
            Some((index, item)) => {
                item.increment();
                CartChange::Incremented {
                    index,
                    id,
                    quantity: item.quantity(),
                }
            }
            None => {
                if let Err(e) = check_price(price) {
                    tracing::warn!(product_id = %id, error = %e, "Refusing cart item price");
                    self.notifier.notify(Notification::error(ADD_FAILED_MESSAGE));
                    return CartOutcome::Refused;
                }
                self.items
                    .push(CartItem::new(id.clone(), name, price, image));
                CartChange::Added {
                    index: self.items.len() - 1,
                    id,
                }
            }
        };

        if let Err(e) = self.persist() {
            tracing::error!(error = %e, "Failed to save cart after adding item");
            self.notifier.notify(Notification::error(ADD_FAILED_MESSAGE));
            return CartOutcome::Failed;
        }

        self.notifier.notify(Notification::success(format!(
            "{name} has been added to your cart."
        )));
        self.emit(&change);
        CartOutcome::Applied
    }

    /// Remove the line at `index`. Out-of-range indexes are ignored.
    #[instrument(skip(self))]
    pub fn remove_item(&mut self, index: usize) -> CartOutcome {
        if index >= self.items.len() {
            return CartOutcome::Ignored;
        }

        let item = self.items.remove(index);

        if let Err(e) = self.persist() {
            tracing::error!(error = %e, product_id = %item.id(), "Failed to save cart after removing item");
            self.notifier.notify(Notification::error(UPDATE_FAILED_MESSAGE));
            return CartOutcome::Failed;
        }

        self.notifier
            .notify(Notification::success(format!("{} removed from cart", item.name())));
        self.emit(&CartChange::Removed { index, item });
        CartOutcome::Applied
    }

    /// Apply a quantity control to the line at `index`.
    ///
    /// `Increase` always adds one. `Decrease` subtracts one only while the
    /// quantity is above 1; removing a line takes [`CartStore::remove_item`].
    /// The cart is saved and a change event sent for any in-range index, even
    /// when a decrease was refused. Out-of-range indexes are ignored.
    #[instrument(skip(self))]
    pub fn update_quantity(&mut self, index: usize, action: QuantityAction) -> CartOutcome {
        let Some(item) = self.items.get_mut(index) else {
            return CartOutcome::Ignored;
        };

        match action {
            QuantityAction::Increase => item.increment(),
            QuantityAction::Decrease => {
                if !item.decrement() {
                    tracing::debug!("Quantity already at 1, decrease refused");
                }
            }
        }
        let quantity = item.quantity();

        if let Err(e) = self.persist() {
            tracing::error!(error = %e, "Failed to save cart after quantity change");
            self.notifier.notify(Notification::error(UPDATE_FAILED_MESSAGE));
            return CartOutcome::Failed;
        }

        self.emit(&CartChange::QuantityChanged { index, quantity });
        CartOutcome::Applied
    }

    /// Totals with a discount fraction applied to the subtotal.
    ///
    /// `discount` is not range-checked; callers pass a value in `[0, 1)`.
    ///
    /// # Errors
    ///
    /// Returns [`TotalsOverflow`] if an amount does not fit in a `Decimal`.
    pub fn compute_totals(&self, discount: Decimal) -> Result<Totals, TotalsOverflow> {
        Totals::compute(&self.items, self.delivery_fee, discount)
    }

    /// Totals without a discount.
    ///
    /// # Errors
    ///
    /// Returns [`TotalsOverflow`] if an amount does not fit in a `Decimal`.
    pub fn totals(&self) -> Result<Totals, TotalsOverflow> {
        self.compute_totals(Decimal::ZERO)
    }

    /// Display model with prices formatted in `currency`.
    ///
    /// # Errors
    ///
    /// Returns [`TotalsOverflow`] if an amount does not fit in a `Decimal`.
    pub fn view(&self, currency: CurrencyCode, discount: Decimal) -> Result<CartView, TotalsOverflow> {
        CartView::new(&self.items, &self.compute_totals(discount)?, currency)
    }

    /// Write the full cart to storage, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the write fails.
    pub fn persist(&self) -> Result<(), StorageError> {
        write_json(&self.store, keys::CART, &self.items)
    }

    fn emit(&mut self, change: &CartChange) {
        for listener in &mut self.listeners {
            listener(change);
        }
    }
}

/// Decode the stored cart, keeping every entry that validates.
fn load_items(store: &impl KeyValueStore) -> Vec<CartItem> {
    let Some(entries): Option<Vec<serde_json::Value>> = read_json(store, keys::CART) else {
        return Vec::new();
    };

    let mut items: Vec<CartItem> = Vec::with_capacity(entries.len());
    for (position, entry) in entries.into_iter().enumerate() {
        let item = match serde_json::from_value::<CartItem>(entry) {
            Ok(item) => item,
            Err(e) => {
                tracing::warn!(position, error = %e, "Dropping invalid stored cart entry");
                continue;
            }
        };

        match items.iter_mut().find(|existing| existing.id() == item.id()) {
            Some(existing) => {
                tracing::warn!(position, product_id = %item.id(), "Merging duplicate stored cart entry");
                existing.absorb(&item);
            }
            None => items.push(item),
        }
    }
    items
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::notify::{NotificationKind, NotificationLog};
    use crate::storage::MemoryStore;

    fn setup() -> (CartStore<Rc<MemoryStore>>, Rc<MemoryStore>, Rc<NotificationLog>) {
        let store = Rc::new(MemoryStore::new());
        let log = Rc::new(NotificationLog::new());
        let cart = CartStore::load(Rc::clone(&store), log.clone());
        (cart, store, log)
    }

    fn stored_cart(store: &MemoryStore) -> serde_json::Value {
        serde_json::from_str(&store.get(keys::CART).unwrap().unwrap()).unwrap()
    }

    #[test]
    fn test_add_new_item() {
        let (mut cart, store, log) = setup();

        let outcome = cart.add_item("oil", "Baobab Oil", Decimal::from(100), None);

        assert_eq!(outcome, CartOutcome::Applied);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity(), 1);
        assert_eq!(cart.items()[0].image(), shopfront_core::DEFAULT_PRODUCT_IMAGE);
        assert_eq!(
            stored_cart(&store),
            serde_json::json!([{
                "id": "oil",
                "name": "Baobab Oil",
                "price": 100.0,
                "quantity": 1,
                "image": "images/default-product.jpg"
            }])
        );

        let last = log.last().unwrap();
        assert_eq!(last.kind, NotificationKind::Success);
        assert_eq!(last.message, "Baobab Oil has been added to your cart.");
    }

    #[test]
    fn test_add_existing_item_increments_and_keeps_metadata() {
        let (mut cart, _store, _log) = setup();

        cart.add_item("oil", "Baobab Oil", Decimal::from(100), Some("oil.jpg"));
        cart.add_item("oil", "Renamed Oil", Decimal::from(999), Some("other.jpg"));

        assert_eq!(cart.len(), 1);
        let item = cart.get(0).unwrap();
        assert_eq!(item.quantity(), 2);
        assert_eq!(item.name(), "Baobab Oil");
        assert_eq!(item.price(), Decimal::from(100));
        assert_eq!(item.image(), "oil.jpg");
    }

    #[test]
    fn test_remove_item() {
        let (mut cart, store, log) = setup();
        cart.add_item("oil", "Baobab Oil", Decimal::from(100), None);
        cart.add_item("soap", "Soap", Decimal::from(50), None);

        assert_eq!(cart.remove_item(0), CartOutcome::Applied);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].id().as_str(), "soap");
        assert_eq!(stored_cart(&store).as_array().unwrap().len(), 1);
        assert_eq!(log.last().unwrap().message, "Baobab Oil removed from cart");
        assert_eq!(cart.totals().unwrap().subtotal, Decimal::from(50));
    }

    #[test]
    fn test_remove_out_of_range_is_silent() {
        let (mut cart, store, log) = setup();
        cart.add_item("oil", "Baobab Oil", Decimal::from(100), None);
        let before = log.len();

        assert_eq!(cart.remove_item(1), CartOutcome::Ignored);
        assert_eq!(cart.remove_item(usize::MAX), CartOutcome::Ignored);

        assert_eq!(cart.len(), 1);
        assert_eq!(log.len(), before);
        assert_eq!(stored_cart(&store).as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_update_quantity() {
        let (mut cart, store, _log) = setup();
        cart.add_item("oil", "Baobab Oil", Decimal::from(100), None);

        assert_eq!(
            cart.update_quantity(0, QuantityAction::Increase),
            CartOutcome::Applied
        );
        assert_eq!(cart.items()[0].quantity(), 2);
        assert_eq!(stored_cart(&store)[0]["quantity"], 2);

        cart.update_quantity(0, QuantityAction::Decrease);
        assert_eq!(cart.items()[0].quantity(), 1);
    }

    #[test]
    fn test_decrease_never_goes_below_one() {
        let (mut cart, _store, _log) = setup();
        cart.add_item("oil", "Baobab Oil", Decimal::from(100), None);

        let outcome = cart.update_quantity(0, QuantityAction::Decrease);

        assert_eq!(outcome, CartOutcome::Applied);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity(), 1);
    }

    #[test]
    fn test_update_quantity_out_of_range() {
        let (mut cart, _store, _log) = setup();
        assert_eq!(
            cart.update_quantity(0, QuantityAction::Increase),
            CartOutcome::Ignored
        );
    }

    #[test]
    fn test_change_events() {
        let (mut cart, _store, _log) = setup();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        cart.on_change(move |change| sink.borrow_mut().push(change.clone()));

        cart.add_item("oil", "Baobab Oil", Decimal::from(100), None);
        cart.add_item("oil", "Baobab Oil", Decimal::from(100), None);
        cart.update_quantity(0, QuantityAction::Decrease);
        cart.remove_item(3);
        cart.remove_item(0);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 4);
        assert_eq!(
            seen[0],
            CartChange::Added {
                index: 0,
                id: ProductId::new("oil")
            }
        );
        assert_eq!(
            seen[1],
            CartChange::Incremented {
                index: 0,
                id: ProductId::new("oil"),
                quantity: 2
            }
        );
        assert_eq!(
            seen[2],
            CartChange::QuantityChanged {
                index: 0,
                quantity: 1
            }
        );
        assert!(matches!(seen[3], CartChange::Removed { index: 0, .. }));
    }

    #[test]
    fn test_totals_example() {
        let (mut cart, _store, _log) = setup();
        cart.add_item("a", "A", Decimal::from(100), None);
        cart.add_item("a", "A", Decimal::from(100), None);
        cart.add_item("b", "B", Decimal::from(50), None);

        let totals = cart.compute_totals(Decimal::ZERO).unwrap();
        assert_eq!(totals.subtotal, Decimal::new(25_000, 2));
        assert_eq!(totals.total, Decimal::new(30_000, 2));

        let discounted = cart.compute_totals(Decimal::new(1, 1)).unwrap();
        assert_eq!(discounted.total, Decimal::new(27_500, 2));
    }

    #[test]
    fn test_custom_delivery_fee() {
        let (cart, _store, _log) = setup();
        let cart = cart.with_delivery_fee(Decimal::from(20));
        assert_eq!(cart.totals().unwrap().total, Decimal::from(20));
    }

    #[test]
    fn test_storage_failure_notifies_and_keeps_memory_change() {
        let store = Rc::new(MemoryStore::with_quota(5));
        let log = Rc::new(NotificationLog::new());
        let mut cart = CartStore::load(Rc::clone(&store), log.clone());
        let events = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&events);
        cart.on_change(move |_| *counter.borrow_mut() += 1);

        let outcome = cart.add_item("oil", "Baobab Oil", Decimal::from(100), None);

        assert_eq!(outcome, CartOutcome::Failed);
        assert_eq!(cart.len(), 1);
        assert!(store.get(keys::CART).unwrap().is_none());
        assert_eq!(*events.borrow(), 0);

        let last = log.last().unwrap();
        assert_eq!(last.kind, NotificationKind::Error);
        assert_eq!(last.message, ADD_FAILED_MESSAGE);

        assert_eq!(cart.remove_item(0), CartOutcome::Failed);
        assert_eq!(log.last().unwrap().message, UPDATE_FAILED_MESSAGE);
    }

    #[test]
    fn test_unusable_price_refused() {
        let (mut cart, store, log) = setup();
        let gold = Decimal::from_str("50000000000000000000000000000").unwrap();

        assert_eq!(cart.add_item("gold", "Gold", gold, None), CartOutcome::Refused);
        assert_eq!(cart.add_item("gold", "Gold", gold, None), CartOutcome::Refused);
        assert!(cart.is_empty());
        assert!(store.get(keys::CART).unwrap().is_none());
        assert_eq!(log.last().unwrap().message, ADD_FAILED_MESSAGE);
        assert_eq!(log.last().unwrap().kind, NotificationKind::Error);

        let precise = Decimal::from_str("19.999999999999999999").unwrap();
        assert_eq!(cart.add_item("oil", "Oil", precise, None), CartOutcome::Refused);
        assert!(cart.compute_totals(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_totals_overflow_is_an_error() {
        let (mut cart, _store, _log) = setup();
        cart.add_item("oil", "Baobab Oil", Decimal::from(100), None);

        assert_eq!(cart.compute_totals(Decimal::MAX), Err(TotalsOverflow));
        assert!(cart.view(CurrencyCode::ZMW, Decimal::MAX).is_err());

        let cart = cart.with_delivery_fee(Decimal::MAX);
        assert_eq!(cart.totals(), Err(TotalsOverflow));
    }

    #[test]
    fn test_reload_roundtrip() {
        let (mut cart, store, log) = setup();
        cart.add_item("oil", "Baobab Oil", Decimal::new(1999, 2), Some("oil.jpg"));
        cart.add_item("soap", "Soap", Decimal::from(50), None);
        cart.update_quantity(1, QuantityAction::Increase);

        let reloaded = CartStore::load(Rc::clone(&store), log);
        assert_eq!(reloaded.items(), cart.items());
    }

    #[test]
    fn test_load_absent_or_malformed_is_empty() {
        let log: Rc<dyn NotificationSink> = Rc::new(NotificationLog::new());

        let store = MemoryStore::new();
        assert!(CartStore::load(&store, Rc::clone(&log)).is_empty());

        for raw in ["not json", "null", "{}", "42", "[1,2,3]"] {
            store.set(keys::CART, raw).unwrap();
            assert!(CartStore::load(&store, Rc::clone(&log)).is_empty(), "{raw}");
        }
    }

    #[test]
    fn test_load_drops_invalid_entries_and_merges_duplicates() {
        let store = MemoryStore::new();
        store
            .set(
                keys::CART,
                r#"[
                    {"id":"oil","name":"Oil","price":100,"quantity":2,"image":"oil.jpg"},
                    {"id":"bad","name":"Bad","price":null,"quantity":1},
                    {"id":"soap","name":"Soap","price":"50","quantity":0},
                    {"id":"oil","name":"Oil again","price":1,"quantity":3}
                ]"#,
            )
            .unwrap();

        let cart = CartStore::load(&store, Rc::new(NotificationLog::new()));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity(), 5);
        assert_eq!(cart.items()[0].name(), "Oil");
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_quantity_action_from_str() {
        assert_eq!(
            "increase".parse::<QuantityAction>().unwrap(),
            QuantityAction::Increase
        );
        assert_eq!(
            "decrease".parse::<QuantityAction>().unwrap(),
            QuantityAction::Decrease
        );
        assert!("remove".parse::<QuantityAction>().is_err());
    }
}
