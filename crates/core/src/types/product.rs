//! Product records as held by the remote store.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;
use super::stock::StockLevel;

/// Menu category (e.g. `frappes`, `combos`, `calientes`).
///
/// Kept as an open string because the remote store owns the category set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Create a category from its slug.
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// The category slug.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A product on the menu.
///
/// Field names match the remote document layout (`products/<index>/...`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Stable 1-based identifier.
    pub id: ProductId,
    pub name: String,
    pub category: Category,
    /// Unit price.
    pub price: Price,
    pub description: String,
    /// Image reference (relative path or URL).
    pub image: String,
    /// Units currently in stock.
    pub stock: u32,
}

impl Product {
    /// Stock label tier for this product's raw stock.
    #[must_use]
    pub const fn stock_level(&self) -> StockLevel {
        StockLevel::from_stock(self.stock)
    }

    /// Whether the product has any stock at all.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}
