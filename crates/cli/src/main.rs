//! Shopfront CLI - drive the storefront cart from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Add a product to the cart
//! shopfront cart add --id baobab-oil --name "Baobab Oil" --price 100 --image images/oil.jpg
//!
//! # Show the cart with a 10% discount applied
//! shopfront cart show --discount 0.1
//!
//! # Change quantities or remove a line (zero-based index)
//! shopfront cart increase 0
//! shopfront cart decrease 0
//! shopfront cart remove 0
//!
//! # Join the discount list
//! shopfront subscribe visitor@example.com
//!
//! # Proceed to checkout
//! shopfront checkout
//! ```
//!
//! # Commands
//!
//! - `cart` - Show and change the cart
//! - `subscribe` - Add an email to the discount list
//! - `subscribers` - List subscribed emails
//! - `checkout` - Proceed to checkout
//!
//! State is kept in the file named by `SHOPFRONT_DATA_PATH` or `--data`.
//! Delete that file to start over.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::rc::Rc;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use shopfront_storefront::{NotificationLog, Storefront, StorefrontConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

#[derive(Parser)]
#[command(name = "shopfront")]
#[command(author, version, about = "Shopfront storefront CLI")]
struct Cli {
    /// Storage file to use instead of `SHOPFRONT_DATA_PATH`
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Write logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Add an email to the discount list
    Subscribe {
        /// Email address
        email: String,
    },
    /// List subscribed emails
    Subscribers,
    /// Proceed to checkout
    Checkout,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines and totals
    Show {
        /// Discount fraction applied to the subtotal, in [0, 1)
        #[arg(long, default_value = "0", value_parser = commands::cart::parse_discount)]
        discount: Decimal,

        /// Print the cart as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a product, or one more of it if already in the cart
    Add {
        /// Product ID
        #[arg(long)]
        id: String,

        /// Product name
        #[arg(long)]
        name: String,

        /// Unit price
        #[arg(long)]
        price: String,

        /// Image URL
        #[arg(long)]
        image: Option<String>,
    },
    /// Remove the line at INDEX
    Remove { index: usize },
    /// Add one to the quantity of the line at INDEX
    Increase { index: usize },
    /// Subtract one from the quantity of the line at INDEX, stopping at 1
    Decrease { index: usize },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Map tracing levels to Sentry events and breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        tracing::Level::TRACE => sentry_tracing::EventFilter::Ignore,
    }
}

fn main() {
    let cli = Cli::parse();

    let config = StorefrontConfig::from_env();
    let sentry_guard = config.as_ref().ok().and_then(init_sentry);

    // Log to stderr; stdout carries command output
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfront_storefront=info,shopfront_cli=info".into());

    let json_layer = cli.log_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!cli.log_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result: Result<(), Box<dyn std::error::Error>> = match config {
        Ok(config) => run(cli, config),
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        drop(sentry_guard);
        std::process::exit(1);
    }
}

fn run(cli: Cli, mut config: StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = cli.data {
        config.data_path = path;
    }

    let notifications = Rc::new(NotificationLog::new());
    let mut storefront = Storefront::open_file(&config, notifications.clone())?;

    if storefront.is_first_visit() {
        output::print_discount_prompt();
    }

    let result = match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show { discount, json } => {
                commands::cart::show(&storefront, discount, json)
            }
            CartAction::Add {
                id,
                name,
                price,
                image,
            } => commands::cart::add(&mut storefront, &id, &name, &price, image.as_deref()),
            CartAction::Remove { index } => commands::cart::remove(&mut storefront, index),
            CartAction::Increase { index } => commands::cart::increase(&mut storefront, index),
            CartAction::Decrease { index } => commands::cart::decrease(&mut storefront, index),
        },
        Commands::Subscribe { email } => commands::newsletter::subscribe(&storefront, &email),
        Commands::Subscribers => {
            commands::newsletter::list(&storefront);
            Ok(())
        }
        Commands::Checkout => commands::cart::checkout(&storefront),
    };

    output::print_notifications(&notifications.drain());
    result.map_err(Into::into)
}
