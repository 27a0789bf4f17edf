//! Command execution.
//!
//! Every command builds a storefront over file-backed local storage, waits
//! for the first catalog snapshot, runs, and then waits for any background
//! stock reconciliation before exiting.

mod cart;
mod checkout;

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};
use valentina_storefront::config::{ConfigError, StorefrontConfig};
use valentina_storefront::receipt::HtmlReceiptBackend;
use valentina_storefront::remote::{MemoryStore, ProductStore, RestStore};
use valentina_storefront::storage::FileStorage;
use valentina_storefront::Storefront;

use crate::Commands;
use crate::console::ConsoleSurface;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Receipt file could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type App<S> = Storefront<S, FileStorage, ConsoleSurface>;

/// Run `command` against the configured product store.
///
/// # Errors
///
/// Returns `CliError` if configuration is invalid or a receipt file cannot
/// be written.
pub async fn run(command: Commands) -> Result<(), CliError> {
    let config = StorefrontConfig::from_env()?;

    if let Some(remote) = &config.remote {
        info!(url = %remote.url, "Using realtime database");
        execute(Arc::new(RestStore::new(remote)), &config, command).await
    } else {
        info!("STOREFRONT_DATABASE_URL not set, using in-memory catalog");
        execute(Arc::new(MemoryStore::new()), &config, command).await
    }
}

async fn execute<S: ProductStore>(
    store: Arc<S>,
    config: &StorefrontConfig,
    command: Commands,
) -> Result<(), CliError> {
    let storage = FileStorage::open(config.storage_path());
    let mut app = Storefront::new(store, storage, ConsoleSurface::new(), config)
        .with_receipt_backend(HtmlReceiptBackend::new());

    app.start();
    if !app.sync().await {
        warn!("Catalog subscription ended before the first snapshot");
    }

    let result = match command {
        Commands::Menu { search, category } => {
            cart::menu(&mut app, search, &category);
            Ok(())
        }
        Commands::Add { id } => {
            cart::add(&mut app, id);
            Ok(())
        }
        Commands::Set { id, quantity } => {
            cart::set(&mut app, id, quantity);
            Ok(())
        }
        Commands::Remove { id } => {
            cart::remove(&mut app, id);
            Ok(())
        }
        Commands::Cart => {
            app.surface().print_cart();
            Ok(())
        }
        Commands::Checkout { receipt } => checkout::checkout(&mut app, receipt.as_deref()).await,
        Commands::Reserve {
            name,
            email,
            date,
            time,
            guests,
            receipt,
        } => {
            let reservation = valentina_core::Reservation {
                name,
                email,
                date,
                time,
                guests,
            };
            checkout::reserve(&mut app, reservation, receipt.as_deref()).await
        }
    };

    app.settle().await;
    result
}
