//! Remote product store collaborators.
//!
//! # Architecture
//!
//! - The remote store is the source of truth for products and stock
//! - Clients observe it through a subscription that delivers the full
//!   product collection on every change, in order
//! - Writes are either a whole-collection replace (bootstrap seeding) or a
//!   batch of `products/<index>/stock` updates (checkout reconciliation)
//!
//! # Implementations
//!
//! - [`MemoryStore`] - in-process store used by tests and offline runs
//! - [`RestStore`] - realtime database REST API over `reqwest`

mod memory;
mod rest;

use std::collections::BTreeMap;
use std::future::Future;

use thiserror::Error;
use tokio::sync::mpsc;
use valentina_core::Product;

pub use memory::MemoryStore;
pub use rest::{RestStore, decode_snapshot};

/// Collection path of the product list.
pub const PRODUCTS_PATH: &str = "products";

/// Errors that can occur when talking to the remote store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Store answered with a non-success status.
    #[error("store returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Payload could not be decoded.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An update addressed a path the store does not hold.
    #[error("invalid update path: {0}")]
    InvalidPath(String),

    /// Store refused the write.
    #[error("write rejected: {0}")]
    Rejected(String),

    /// Store connection is gone.
    #[error("store connection closed")]
    Closed,
}

/// One delivery of the product subscription.
pub type Snapshot = Result<Vec<Product>, StoreError>;

/// Receiving end of the product subscription.
///
/// Lives for the whole session; dropping it ends the subscription.
pub type Subscription = mpsc::UnboundedReceiver<Snapshot>;

/// Path of the stock field of the product stored at `index`.
#[must_use]
pub fn stock_path(index: u32) -> String {
    format!("{PRODUCTS_PATH}/{index}/stock")
}

/// Batched stock writes keyed by storage index.
///
/// Submitted as one multi-path update so either every stock value of a
/// checkout lands or none does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockUpdates {
    entries: BTreeMap<u32, u32>,
}

impl StockUpdates {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the new stock for the product stored at `index`.
    pub fn set(&mut self, index: u32, stock: u32) {
        self.entries.insert(index, stock);
    }

    /// New stock for `index`, if part of this batch.
    #[must_use]
    pub fn get(&self, index: u32) -> Option<u32> {
        self.entries.get(&index).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `(index, stock)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.entries.iter().map(|(&index, &stock)| (index, stock))
    }

    /// `(path, stock)` pairs in index order, e.g. `("products/1/stock", 3)`.
    pub fn paths(&self) -> impl Iterator<Item = (String, u32)> + '_ {
        self.iter().map(|(index, stock)| (stock_path(index), stock))
    }

    /// Multi-path update body: `{"products/1/stock": 3, ...}`.
    #[must_use]
    pub fn to_patch_body(&self) -> serde_json::Map<String, serde_json::Value> {
        self.paths()
            .map(|(path, stock)| (path, serde_json::Value::from(stock)))
            .collect()
    }
}

/// Remote document store holding the product collection.
///
/// Methods return `Send` futures so writes can run on background tasks.
pub trait ProductStore: Send + Sync + 'static {
    /// Subscribe to the product collection.
    ///
    /// The receiver first gets the current collection, then every later
    /// change. An empty vector means the collection does not exist yet.
    fn subscribe(&self) -> Subscription;

    /// Replace the whole product collection.
    fn replace_products(
        &self,
        products: &[Product],
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Apply a batch of stock writes atomically.
    fn update_stock(
        &self,
        updates: &StockUpdates,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_path() {
        assert_eq!(stock_path(0), "products/0/stock");
        assert_eq!(stock_path(12), "products/12/stock");
    }

    #[test]
    fn test_patch_body() {
        let mut updates = StockUpdates::new();
        updates.set(1, 3);
        updates.set(0, 14);

        let body = updates.to_patch_body();
        assert_eq!(body.len(), 2);
        assert_eq!(body["products/1/stock"], 3);
        assert_eq!(body["products/0/stock"], 14);

        let paths: Vec<String> = updates.paths().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["products/0/stock", "products/1/stock"]);
    }

    #[test]
    fn test_later_set_overwrites() {
        let mut updates = StockUpdates::new();
        updates.set(4, 9);
        updates.set(4, 2);
        assert_eq!(updates.get(4), Some(2));
        assert_eq!(updates.len(), 1);
    }
}
