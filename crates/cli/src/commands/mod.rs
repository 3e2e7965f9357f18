//! CLI command implementations.

use thiserror::Error;

pub mod cart;
pub mod newsletter;

/// Why a command did not complete.
///
/// The visitor has already been told through a notification; these only
/// decide the exit status.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The storefront rejected the input.
    #[error(transparent)]
    Storefront(#[from] shopfront_storefront::StorefrontError),

    /// The change could not be saved.
    #[error("{0} could not be saved")]
    NotSaved(&'static str),

    /// The cart refused the input.
    #[error("the cart refused this item")]
    Refused,

    /// No cart line at the given index.
    #[error("no cart line at index {0}")]
    NoSuchLine(usize),

    #[error("checkout refused: cart is empty")]
    EmptyCart,

    #[error("subscription failed: {0}")]
    Subscribe(String),

    #[error("could not encode output: {0}")]
    Output(#[from] serde_json::Error),
}

pub type CommandResult = Result<(), CommandError>;
