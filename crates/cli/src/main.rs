//! Frappés Valentina terminal storefront.
//!
//! # Usage
//!
//! ```bash
//! # Browse the menu
//! valentina menu --category frappes
//!
//! # Fill the cart
//! valentina add 2
//! valentina set 2 3
//!
//! # Check out and save the receipt
//! valentina checkout --receipt pedido.html
//!
//! # Book a table
//! valentina reserve --name Ana --email ana@example.com \
//!     --date 2026-10-20 --time 18:30 --guests 4
//! ```
//!
//! The cart is kept in `$STOREFRONT_STATE_DIR/storage.json` between runs.
//! Without `STOREFRONT_DATABASE_URL` the catalog lives in memory and starts
//! from the bootstrap menu on every run.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod console;

#[derive(Parser)]
#[command(name = "valentina")]
#[command(author, version, about = "Frappés Valentina storefront")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the menu
    Menu {
        /// Case-insensitive name filter
        #[arg(short, long, default_value = "")]
        search: String,

        /// Category slug, or `all`
        #[arg(short, long, default_value = "all")]
        category: String,
    },
    /// Add one unit of a product to the cart
    Add {
        /// Product ID
        id: i32,
    },
    /// Set the quantity of a cart line (0 removes it)
    Set {
        /// Product ID
        id: i32,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        id: i32,
    },
    /// Show the cart
    Cart,
    /// Check out the cart
    Checkout {
        /// Write the order receipt to this file
        #[arg(short, long)]
        receipt: Option<PathBuf>,
    },
    /// Request a table reservation
    Reserve {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// Date, e.g. 2026-10-20
        #[arg(long)]
        date: String,

        /// Time, e.g. 18:30
        #[arg(long)]
        time: String,

        #[arg(long)]
        guests: u32,

        /// Write the reservation receipt to this file
        #[arg(short, long)]
        receipt: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    if let Err(e) = commands::run(cli.command).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so stdout only carries storefront output.
fn init_tracing(json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "valentina_storefront=info,valentina_cli=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
