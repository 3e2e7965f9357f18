//! First-visit tracking.
//!
//! The discount prompt is offered once per store: on the first visit the
//! [`keys::VISITED`] flag is set, and it is never cleared by the storefront.

use std::time::Duration;

use crate::storage::{KeyValueStore, keys};

/// Delay before the discount prompt opens on a first visit.
pub const DISCOUNT_PROMPT_DELAY: Duration = Duration::from_millis(2_000);

/// Reads and sets the first-visit flag.
#[derive(Debug)]
pub struct VisitTracker<S> {
    store: S,
}

impl<S: KeyValueStore> VisitTracker<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns true the first time it is called against a store, and false
    /// ever after.
    ///
    /// If the flag cannot be read the visitor is treated as returning. If it
    /// cannot be written the visit still counts as first; the prompt may then
    /// appear again next time.
    pub fn first_visit(&self) -> bool {
        match self.store.contains(keys::VISITED) {
            Ok(true) => false,
            Ok(false) => {
                if let Err(e) = self.store.set(keys::VISITED, "true") {
                    tracing::warn!(error = %e, "Failed to record first visit");
                }
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read first-visit flag");
                false
            }
        }
    }

    /// Returns true if the flag is set. Does not set it.
    #[must_use]
    pub fn has_visited(&self) -> bool {
        self.store.contains(keys::VISITED).unwrap_or(false)
    }
}
