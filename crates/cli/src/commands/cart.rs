//! Cart commands.

use rust_decimal::Decimal;
use shopfront_storefront::cart::counter_label;
use shopfront_storefront::{CartOutcome, CheckoutOutcome, KeyValueStore, QuantityAction, Storefront};

use super::{CommandError, CommandResult};
use crate::output;

/// Parse a `--discount` fraction.
///
/// # Errors
///
/// Returns a message for clap if the value is not a number in `[0, 1)`.
pub fn parse_discount(raw: &str) -> Result<Decimal, String> {
    let discount: Decimal = raw
        .trim()
        .parse()
        .map_err(|_| format!("not a number: {raw}"))?;

    if discount.is_sign_negative() || discount >= Decimal::ONE {
        return Err(format!("discount must be at least 0 and below 1, got {discount}"));
    }
    Ok(discount)
}

/// Print the cart.
///
/// # Errors
///
/// Returns an error if the totals overflow or the view cannot be encoded.
pub fn show<S: KeyValueStore + Clone>(
    storefront: &Storefront<S>,
    discount: Decimal,
    json: bool,
) -> CommandResult {
    let view = storefront.view(discount)?;
    if json {
        output::print_json(&view)?;
    } else {
        output::print_cart(&view);
    }
    Ok(())
}

/// Add a product to the cart.
///
/// # Errors
///
/// Returns an error if the price is invalid or the cart could not be saved.
pub fn add<S: KeyValueStore + Clone>(
    storefront: &mut Storefront<S>,
    id: &str,
    name: &str,
    price: &str,
    image: Option<&str>,
) -> CommandResult {
    let outcome = storefront.add_from_listing(id, name, price, image)?;
    match outcome {
        CartOutcome::Failed => return Err(CommandError::NotSaved("cart")),
        CartOutcome::Refused => return Err(CommandError::Refused),
        CartOutcome::Applied | CartOutcome::Ignored => {}
    }
    print_counter(storefront);
    Ok(())
}

/// Remove the line at `index`.
///
/// # Errors
///
/// Returns an error if there is no such line or the cart could not be saved.
pub fn remove<S: KeyValueStore + Clone>(storefront: &mut Storefront<S>, index: usize) -> CommandResult {
    let outcome = storefront.cart_mut().remove_item(index);
    check(outcome, index)?;
    print_counter(storefront);
    Ok(())
}

/// Add one to the line at `index`.
///
/// # Errors
///
/// Returns an error if there is no such line or the cart could not be saved.
pub fn increase<S: KeyValueStore + Clone>(
    storefront: &mut Storefront<S>,
    index: usize,
) -> CommandResult {
    change_quantity(storefront, index, QuantityAction::Increase)
}

/// Subtract one from the line at `index`, stopping at 1.
///
/// # Errors
///
/// Returns an error if there is no such line or the cart could not be saved.
pub fn decrease<S: KeyValueStore + Clone>(
    storefront: &mut Storefront<S>,
    index: usize,
) -> CommandResult {
    change_quantity(storefront, index, QuantityAction::Decrease)
}

/// Proceed to checkout.
///
/// # Errors
///
/// Returns [`CommandError::EmptyCart`] if there is nothing to check out.
pub fn checkout<S: KeyValueStore + Clone>(storefront: &Storefront<S>) -> CommandResult {
    match storefront.checkout() {
        CheckoutOutcome::Redirect(path) => {
            output::print_redirect(path);
            Ok(())
        }
        CheckoutOutcome::EmptyCart => Err(CommandError::EmptyCart),
    }
}

fn change_quantity<S: KeyValueStore + Clone>(
    storefront: &mut Storefront<S>,
    index: usize,
    action: QuantityAction,
) -> CommandResult {
    let outcome = storefront.cart_mut().update_quantity(index, action);
    check(outcome, index)?;
    if let Some(item) = storefront.cart().get(index) {
        output::print_line_quantity(index, item.name(), item.quantity());
    }
    print_counter(storefront);
    Ok(())
}

const fn check(outcome: CartOutcome, index: usize) -> CommandResult {
    match outcome {
        CartOutcome::Applied => Ok(()),
        CartOutcome::Ignored => Err(CommandError::NoSuchLine(index)),
        CartOutcome::Failed => Err(CommandError::NotSaved("cart")),
        CartOutcome::Refused => Err(CommandError::Refused),
    }
}

fn print_counter<S: KeyValueStore + Clone>(storefront: &Storefront<S>) {
    output::print_counter(&counter_label(storefront.cart().item_count()));
}
