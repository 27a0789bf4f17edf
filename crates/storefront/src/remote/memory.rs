//! In-process product store.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tracing::debug;
use valentina_core::Product;

use super::{ProductStore, Snapshot, StockUpdates, StoreError, Subscription, stock_path};

/// Product store kept in memory.
///
/// Behaves like the realtime store as far as the storefront can tell: every
/// subscriber gets the current collection on subscribe and again after each
/// write. Failures can be queued to exercise error paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    products: Vec<Product>,
    subscribers: Vec<mpsc::UnboundedSender<Snapshot>>,
    queued_failures: VecDeque<String>,
    replacements: Vec<Vec<Product>>,
    stock_writes: Vec<StockUpdates>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `products`.
    #[must_use]
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            inner: Mutex::new(MemoryInner {
                products,
                ..MemoryInner::default()
            }),
        }
    }

    /// Current product collection.
    #[must_use]
    pub fn products(&self) -> Vec<Product> {
        self.lock().products.clone()
    }

    /// Every collection written through [`ProductStore::replace_products`].
    #[must_use]
    pub fn replacements(&self) -> Vec<Vec<Product>> {
        self.lock().replacements.clone()
    }

    /// Every batch accepted through [`ProductStore::update_stock`].
    #[must_use]
    pub fn stock_writes(&self) -> Vec<StockUpdates> {
        self.lock().stock_writes.clone()
    }

    /// Make the next stock update fail with `message`.
    pub fn fail_next_update(&self, message: impl Into<String>) {
        self.lock().queued_failures.push_back(message.into());
    }

    /// Deliver a subscription error to every subscriber.
    pub fn push_subscription_error(&self, error_factory: impl Fn() -> StoreError) {
        let mut inner = self.lock();
        inner
            .subscribers
            .retain(|tx| tx.send(Err(error_factory())).is_ok());
    }

    /// Overwrite the collection as another client would, notifying subscribers.
    pub fn set_remote_products(&self, products: Vec<Product>) {
        let mut inner = self.lock();
        inner.products = products;
        inner.broadcast();
    }

    fn lock(&self) -> MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MemoryInner {
    fn broadcast(&mut self) {
        let products = &self.products;
        self.subscribers
            .retain(|tx| tx.send(Ok(products.clone())).is_ok());
    }
}

impl ProductStore for MemoryStore {
    fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.lock();
        let _ = tx.send(Ok(inner.products.clone()));
        inner.subscribers.push(tx);
        rx
    }

    async fn replace_products(&self, products: &[Product]) -> Result<(), StoreError> {
        let mut inner = self.lock();
        inner.products = products.to_vec();
        inner.replacements.push(products.to_vec());
        debug!(count = products.len(), "memory store replaced products");
        inner.broadcast();
        Ok(())
    }

    async fn update_stock(&self, updates: &StockUpdates) -> Result<(), StoreError> {
        let mut inner = self.lock();

        if let Some(message) = inner.queued_failures.pop_front() {
            return Err(StoreError::Rejected(message));
        }

        let len = inner.products.len();
        if let Some((index, _)) = updates
            .iter()
            .find(|&(index, _)| usize::try_from(index).map_or(true, |i| i >= len))
        {
            return Err(StoreError::InvalidPath(stock_path(index)));
        }

        for (index, stock) in updates.iter() {
            if let Some(product) = usize::try_from(index)
                .ok()
                .and_then(|i| inner.products.get_mut(i))
            {
                product.stock = stock;
            }
        }
        inner.stock_writes.push(updates.clone());
        debug!(paths = updates.len(), "memory store applied stock updates");
        inner.broadcast();
        Ok(())
    }
}
