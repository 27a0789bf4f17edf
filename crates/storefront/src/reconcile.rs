//! Stock reconciliation.
//!
//! After checkout the purchased quantities are subtracted from the stock the
//! catalog mirror last saw and written back as one batched update. The
//! write runs on a background task; its outcome comes back over a channel
//! tagged with the checkout it belongs to.
//!
//! Stock is addressed by storage index, which is `id - 1`. This only holds
//! while product IDs are dense and start at 1, as they do in the bootstrap
//! catalog.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info, instrument, warn};
use valentina_core::{CheckoutId, FinalizedCart, ProductId};

use crate::catalog::CatalogMirror;
use crate::remote::{ProductStore, StockUpdates, StoreError};

/// Completion report of a background reconciliation.
#[derive(Debug)]
pub struct ReconcileOutcome {
    pub checkout_id: CheckoutId,
    pub result: Result<(), StoreError>,
}

/// Storage index of a product, or `None` for IDs below 1.
#[must_use]
pub fn storage_index(id: ProductId) -> Option<u32> {
    u32::try_from(id.as_i32()).ok()?.checked_sub(1)
}

/// Compute the stock writes for a checkout.
///
/// Lines whose product is no longer in the catalog are skipped. Stock never
/// goes below zero.
#[must_use]
pub fn plan(catalog: &CatalogMirror, cart: &FinalizedCart) -> StockUpdates {
    let mut updates = StockUpdates::new();
    for line in cart.lines() {
        let Some(product) = catalog.find(line.id()) else {
            warn!(product_id = %line.id(), "Product left the catalog, skipping stock update");
            continue;
        };
        let Some(index) = storage_index(product.id) else {
            warn!(product_id = %product.id, "Product ID has no storage index, skipping stock update");
            continue;
        };
        updates.set(index, product.stock.saturating_sub(line.quantity));
    }
    updates
}

/// Send the stock writes as one batched update.
///
/// # Errors
///
/// Returns the store's error if the write is rejected or fails.
#[instrument(skip(store, updates), fields(updates = updates.len()))]
pub async fn submit<S: ProductStore>(store: &S, updates: &StockUpdates) -> Result<(), StoreError> {
    if updates.is_empty() {
        info!("No stock to update");
        return Ok(());
    }
    store.update_stock(updates).await
}

/// Run [`submit`] on a background task and report through `outcomes`.
pub fn spawn<S: ProductStore>(
    store: Arc<S>,
    checkout_id: CheckoutId,
    updates: StockUpdates,
    outcomes: mpsc::UnboundedSender<ReconcileOutcome>,
) {
    tokio::spawn(async move {
        let result = submit(store.as_ref(), &updates).await;
        match &result {
            Ok(()) => info!(%checkout_id, "Stock reconciled"),
            Err(e) => error!(%checkout_id, error = %e, "Stock reconciliation failed"),
        }
        if outcomes.send(ReconcileOutcome { checkout_id, result }).is_err() {
            warn!(%checkout_id, "Storefront gone before reconciliation finished");
        }
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use valentina_core::{CartLine, Category, Price, Product};

    use super::*;
    use crate::remote::MemoryStore;

    fn product(id: i32, stock: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Producto {id}"),
            category: Category::new("frappes"),
            price: Price::from_cents(800),
            description: String::new(),
            image: String::new(),
            stock,
        }
    }

    fn line(product: &Product, quantity: u32) -> CartLine {
        CartLine {
            product: product.clone(),
            quantity,
        }
    }

    fn catalog(products: Vec<Product>) -> CatalogMirror {
        let mut catalog = CatalogMirror::new();
        catalog.apply_snapshot(products);
        catalog
    }

    #[test]
    fn test_storage_index() {
        assert_eq!(storage_index(ProductId::new(1)), Some(0));
        assert_eq!(storage_index(ProductId::new(2)), Some(1));
        assert_eq!(storage_index(ProductId::new(0)), None);
        assert_eq!(storage_index(ProductId::new(-4)), None);
    }

    #[test]
    fn test_plan_decrements_stock() {
        let catalog = catalog(vec![product(1, 15), product(2, 5)]);
        let cart = FinalizedCart::new(vec![line(&product(2, 5), 2)]);

        let updates = plan(&catalog, &cart);
        let paths: Vec<(String, u32)> = updates.paths().collect();
        assert_eq!(paths, vec![("products/1/stock".to_string(), 3)]);
    }

    #[test]
    fn test_plan_uses_mirror_stock_and_floors_at_zero() {
        // Stock dropped to 1 after the line was added with a copy saying 5.
        let catalog = catalog(vec![product(1, 1)]);
        let cart = FinalizedCart::new(vec![line(&product(1, 5), 3)]);
        assert_eq!(plan(&catalog, &cart).get(0), Some(0));
    }

    #[test]
    fn test_plan_skips_missing_products() {
        let catalog = catalog(vec![product(1, 15)]);
        let cart = FinalizedCart::new(vec![line(&product(1, 15), 1), line(&product(9, 4), 1)]);

        let updates = plan(&catalog, &cart);
        assert_eq!(updates.len(), 1);
        assert_eq!(updates.get(0), Some(14));
    }

    #[tokio::test]
    async fn test_submit_empty_updates_skips_store() {
        let store = MemoryStore::with_products(vec![product(1, 5)]);
        submit(&store, &StockUpdates::new()).await.unwrap();
        assert!(store.stock_writes().is_empty());
    }

    #[tokio::test]
    async fn test_spawn_reports_outcome() {
        let store = Arc::new(MemoryStore::with_products(vec![product(1, 5), product(2, 5)]));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let checkout_id = CheckoutId::generate();

        let mut updates = StockUpdates::new();
        updates.set(1, 3);
        spawn(Arc::clone(&store), checkout_id, updates, tx);

        let outcome = rx.recv().await.unwrap();
        assert_eq!(outcome.checkout_id, checkout_id);
        assert!(outcome.result.is_ok());
        assert_eq!(store.products()[1].stock, 3);
    }
}
