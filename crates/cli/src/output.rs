//! Terminal rendering. Everything the visitor reads goes to stdout.

#![allow(clippy::print_stdout)]

use serde::Serialize;
use shopfront_storefront::cart::CartView;
use shopfront_storefront::{Notification, NotificationKind};

pub fn print_notifications(notifications: &[Notification]) {
    for notification in notifications {
        let tag = match notification.kind {
            NotificationKind::Success => "ok",
            NotificationKind::Error => "error",
        };
        println!("[{tag}] {}", notification.message);
    }
}

pub fn print_discount_prompt() {
    println!("First visit? Run `shopfront subscribe EMAIL` for a discount code.");
}

pub fn print_cart(view: &CartView) {
    if view.is_empty() {
        println!("Your cart is empty.");
        return;
    }

    println!("Cart ({})", view.counter_label);
    for line in &view.items {
        println!(
            "  [{}] {} x{}  {} each  {}",
            line.index, line.name, line.quantity, line.price, line.line_price
        );
    }
    println!();
    println!("  Subtotal  {}", view.subtotal);
    println!("  Discount  -{}", view.discount);
    println!("  Delivery  {}", view.delivery);
    println!("  Total     {}", view.total);
}

/// # Errors
///
/// Returns an error if `value` cannot be encoded.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_line_quantity(index: usize, name: &str, quantity: u32) {
    println!("[{index}] {name} x{quantity}");
}

pub fn print_counter(label: &str) {
    println!("{label}");
}

pub fn print_redirect(path: &str) {
    println!("Proceeding to {path}");
}

pub fn print_subscribers(subscribers: &[String]) {
    if subscribers.is_empty() {
        println!("No subscribers yet.");
        return;
    }
    for email in subscribers {
        println!("{email}");
    }
}
