//! Integration tests for the Frappés Valentina storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p valentina-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog_sync` - subscription, bootstrap seeding and outages
//! - `checkout_flow` - cart limits, checkout, reconciliation and receipts
//!
//! Every flow runs against the in-memory product store, in-memory local
//! storage and a recording surface, so no external service is needed.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use valentina_core::{Category, Price, Product, ProductId, Reservation};
use valentina_storefront::config::StorefrontConfig;
use valentina_storefront::receipt::HtmlReceiptBackend;
use valentina_storefront::remote::MemoryStore;
use valentina_storefront::storage::MemoryStorage;
use valentina_storefront::surface::RecordingSurface;
use valentina_storefront::Storefront;

/// Storefront wired to in-memory collaborators.
pub type TestStorefront = Storefront<MemoryStore, MemoryStorage, RecordingSurface>;

/// A frappé with the given stock.
#[must_use]
pub fn product(id: i32, name: &str, stock: u32) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        category: Category::new("frappes"),
        price: Price::from_cents(800),
        description: String::new(),
        image: String::new(),
        stock,
    }
}

/// A valid reservation.
#[must_use]
pub fn reservation(name: &str) -> Reservation {
    Reservation {
        name: name.to_string(),
        email: "ana@example.com".to_string(),
        date: "2026-10-20".to_string(),
        time: "18:30".to_string(),
        guests: 4,
    }
}

/// Start a storefront over `store` and `storage` and apply the first
/// catalog snapshot.
pub async fn start_with_storage(store: &Arc<MemoryStore>, storage: MemoryStorage) -> TestStorefront {
    let mut app = Storefront::new(
        Arc::clone(store),
        storage,
        RecordingSurface::new(),
        &StorefrontConfig::default(),
    )
    .with_receipt_backend(HtmlReceiptBackend::new());
    app.start();
    app.sync().await;
    app
}

/// Start a storefront over `store` with empty local storage.
pub async fn start(store: &Arc<MemoryStore>) -> TestStorefront {
    start_with_storage(store, MemoryStorage::new()).await
}
