//! Catalog mirror.
//!
//! Local read cache of the remote product collection. Every snapshot the
//! subscription delivers replaces the whole collection; nothing is merged.
//! An empty snapshot means the remote store has never been seeded, in which
//! case the mirror adopts the bootstrap catalog and asks its caller to write
//! it back.

mod bootstrap;

use tracing::{debug, info};
use valentina_core::{Product, ProductId};

pub use bootstrap::{BOOTSTRAP_STOCK, bootstrap_catalog};

/// What applying a snapshot did to the mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotApplied {
    /// The snapshot was empty and the bootstrap catalog was adopted. The
    /// caller must write [`CatalogMirror::products`] back to the store.
    pub seeded: bool,
}

/// Most recently observed product collection.
#[derive(Debug, Clone, Default)]
pub struct CatalogMirror {
    products: Vec<Product>,
}

impl CatalogMirror {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the collection with a delivered snapshot.
    pub fn apply_snapshot(&mut self, products: Vec<Product>) -> SnapshotApplied {
        if products.is_empty() {
            info!("Remote catalog is empty, seeding bootstrap catalog");
            self.products = bootstrap_catalog();
            return SnapshotApplied { seeded: true };
        }

        debug!(count = products.len(), "Catalog snapshot applied");
        self.products = products;
        SnapshotApplied { seeded: false }
    }

    /// Products in remote order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
