//! Discount list commands.

use shopfront_storefront::{KeyValueStore, Storefront, SubscribeOutcome};

use super::{CommandError, CommandResult};
use crate::output;

/// Subscribe `email` to the discount list.
///
/// Subscribing an address that is already on the list succeeds.
///
/// # Errors
///
/// Returns an error if the address is invalid or the list could not be saved.
pub fn subscribe<S: KeyValueStore + Clone>(storefront: &Storefront<S>, email: &str) -> CommandResult {
    match storefront.subscribe(email) {
        SubscribeOutcome::Subscribed(email) => {
            tracing::info!(%email, "Subscribed");
            Ok(())
        }
        SubscribeOutcome::AlreadySubscribed(email) => {
            tracing::info!(%email, "Already subscribed");
            Ok(())
        }
        SubscribeOutcome::Invalid(e) => Err(CommandError::Subscribe(e.to_string())),
        SubscribeOutcome::Failed => Err(CommandError::NotSaved("subscriber list")),
    }
}

/// Print every subscribed address.
pub fn list<S: KeyValueStore + Clone>(storefront: &Storefront<S>) {
    output::print_subscribers(&storefront.subscribers());
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::rc::Rc;

    use shopfront_storefront::{MemoryStore, NotificationLog, StorefrontConfig};

    use super::*;

    #[test]
    fn test_subscribe() {
        let storefront = Storefront::open(
            Rc::new(MemoryStore::new()),
            &StorefrontConfig::default(),
            Rc::new(NotificationLog::new()),
        );

        subscribe(&storefront, "visitor@example.com").unwrap();
        subscribe(&storefront, " visitor@example.com ").unwrap();
        assert!(matches!(
            subscribe(&storefront, "visitor@example"),
            Err(CommandError::Subscribe(_))
        ));

        assert_eq!(storefront.subscribers(), vec!["visitor@example.com".to_string()]);
    }
}
