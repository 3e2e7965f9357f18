//! Cart change events.
//!
//! Front ends register a listener with [`CartStore::on_change`] and redraw
//! the cart and its quantity counter when an event arrives.
//!
//! [`CartStore::on_change`]: super::CartStore::on_change

use shopfront_core::{CartItem, ProductId};

/// A change that was applied to the cart and persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartChange {
    /// A new line was appended at `index`.
    Added { index: usize, id: ProductId },
    /// An existing line for the same product gained one unit.
    Incremented {
        index: usize,
        id: ProductId,
        quantity: u32,
    },
    /// The line at `index` was removed.
    Removed { index: usize, item: CartItem },
    /// The quantity controls were used on the line at `index`.
    ///
    /// Also sent when a decrease was refused at quantity 1, since the cart is
    /// still re-saved and re-rendered in that case.
    QuantityChanged { index: usize, quantity: u32 },
}

/// Callback invoked after each applied change.
pub type ChangeListener = Box<dyn FnMut(&CartChange)>;
