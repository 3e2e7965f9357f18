//! Shopfront storefront library.
//!
//! Client-side state for the storefront: the shopping cart, the discount
//! subscriber list and the first-visit flag, all kept in a key-value store
//! that survives between sessions. [`session::Storefront`] ties them together.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod error;
pub mod notify;
pub mod session;
pub mod storage;
pub mod subscribers;
pub mod visits;

pub use cart::{CartOutcome, CartStore, CartView, QuantityAction, Totals};
pub use config::StorefrontConfig;
pub use error::{Result, StorefrontError};
pub use notify::{Notification, NotificationKind, NotificationLog, NotificationSink};
pub use session::{CheckoutOutcome, Storefront};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use subscribers::{SubscribeOutcome, SubscriberList};
pub use visits::VisitTracker;
