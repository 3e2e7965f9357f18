//! Discount-list email subscriptions.
//!
//! Addresses are kept in the [`keys::SUBSCRIBERS`] entry as a JSON array, in
//! the order they first subscribed. Subscribing twice is harmless: the
//! address is stored once and the visitor still sees the thank-you message.

use std::rc::Rc;

use shopfront_core::{Email, EmailError};
use tracing::instrument;

use crate::notify::{Notification, NotificationSink};
use crate::storage::{KeyValueStore, keys, read_json, write_json};

/// Shown when the address fails validation.
pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address.";

/// Shown after a successful (or repeated) subscription.
pub const SUBSCRIBED_MESSAGE: &str = "Thank you! Check your email for a discount code.";

/// Shown when the list could not be saved.
pub const SUBSCRIBE_FAILED_MESSAGE: &str = "An error occurred. Please try again.";

/// Result of a subscription attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscribeOutcome {
    /// The address was appended to the list.
    Subscribed(Email),
    /// The address was already on the list; nothing was written.
    AlreadySubscribed(Email),
    /// The address failed validation; the form should keep focus.
    Invalid(EmailError),
    /// The list could not be saved.
    Failed,
}

impl SubscribeOutcome {
    /// Returns true if the visitor is on the list afterwards.
    #[must_use]
    pub const fn is_subscribed(&self) -> bool {
        matches!(self, Self::Subscribed(_) | Self::AlreadySubscribed(_))
    }
}

/// The discount-signup list.
pub struct SubscriberList<S> {
    store: S,
    notifier: Rc<dyn NotificationSink>,
}

impl<S: KeyValueStore> SubscriberList<S> {
    pub fn new(store: S, notifier: Rc<dyn NotificationSink>) -> Self {
        Self { store, notifier }
    }

    /// Stored addresses, oldest first.
    ///
    /// An absent or undecodable list reads as empty.
    #[must_use]
    pub fn subscribers(&self) -> Vec<String> {
        read_json(&self.store, keys::SUBSCRIBERS).unwrap_or_default()
    }

    /// Subscribe an address typed by the visitor.
    ///
    /// Surrounding whitespace, including a byte order mark, is trimmed
    /// before validation.
    #[instrument(skip(self, raw_email))]
    pub fn subscribe(&self, raw_email: &str) -> SubscribeOutcome {
        let email = match Email::parse(Email::trim_input(raw_email)) {
            Ok(email) => email,
            Err(e) => {
                tracing::debug!(error = %e, "Rejected subscription address");
                self.notifier.notify(Notification::error(INVALID_EMAIL_MESSAGE));
                return SubscribeOutcome::Invalid(e);
            }
        };

        let mut subscribers = self.subscribers();
        let outcome = if subscribers.iter().any(|s| s == email.as_str()) {
            SubscribeOutcome::AlreadySubscribed(email)
        } else {
            subscribers.push(email.as_str().to_owned());
            if let Err(e) = write_json(&self.store, keys::SUBSCRIBERS, &subscribers) {
                tracing::error!(error = %e, "Failed to save subscriber list");
                self.notifier
                    .notify(Notification::error(SUBSCRIBE_FAILED_MESSAGE));
                return SubscribeOutcome::Failed;
            }
            tracing::info!(count = subscribers.len(), "New discount subscriber");
            SubscribeOutcome::Subscribed(email)
        };

        self.notifier.notify(Notification::success(SUBSCRIBED_MESSAGE));
        outcome
    }
}
