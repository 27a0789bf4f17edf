//! Local cart store.
//!
//! Ordered cart lines kept in memory and mirrored to local storage after
//! every mutation. Stock limits are checked against the catalog mirror at
//! the moment of the mutation; later stock drops are only caught at
//! checkout.

use thiserror::Error;
use tracing::{debug, instrument, warn};
use valentina_core::{CartLine, FinalizedCart, Price, ProductId};

use crate::catalog::CatalogMirror;
use crate::storage::{LocalStorage, keys};

/// Reasons a cart mutation was refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CartError {
    /// Product is not in the catalog.
    #[error("product {0} not found")]
    UnknownProduct(ProductId),

    /// Product has no stock at all.
    #[error("{name} is sold out")]
    SoldOut { name: String },

    /// Cart already holds every unit in stock.
    #[error("no more stock of {name}")]
    NoMoreStock { name: String },
}

impl CartError {
    /// Message shown to the shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::UnknownProduct(_) => "Producto no encontrado.".to_string(),
            Self::SoldOut { name } => format!("Lo sentimos, {name} está agotado."),
            Self::NoMoreStock { name } => format!("No hay más stock de {name}"),
        }
    }
}

/// Result of a successful [`CartStore::add`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Added {
    pub name: String,
    /// Quantity of the line after the add.
    pub quantity: u32,
}

impl Added {
    #[must_use]
    pub fn message(&self) -> String {
        format!("{} añadido al carrito!", self.name)
    }
}

/// Result of [`CartStore::set_quantity`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantityChange {
    /// Product was not in the cart; nothing changed.
    NotInCart,
    /// Line was removed.
    Removed { clamped: Option<Clamp> },
    /// Line quantity was set.
    Set { quantity: u32, clamped: Option<Clamp> },
}

impl QuantityChange {
    /// Whether the cart was modified.
    #[must_use]
    pub const fn changed(&self) -> bool {
        !matches!(self, Self::NotInCart)
    }

    #[must_use]
    pub const fn clamp(&self) -> Option<&Clamp> {
        match self {
            Self::NotInCart => None,
            Self::Removed { clamped } | Self::Set { clamped, .. } => clamped.as_ref(),
        }
    }
}

/// The requested quantity exceeded stock and was lowered to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clamp {
    pub name: String,
    pub stock: u32,
}

impl Clamp {
    #[must_use]
    pub fn message(&self) -> String {
        format!("Solo quedan {} unidades de {}.", self.stock, self.name)
    }
}

/// The shopper's cart.
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    lines: Vec<CartLine>,
}

impl CartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the persisted cart. A missing or unparseable value yields an
    /// empty cart.
    #[must_use]
    pub fn load(storage: &impl LocalStorage) -> Self {
        let Some(raw) = storage.get_item(keys::SHOPPING_CART) else {
            debug!("No saved cart");
            return Self::new();
        };

        match serde_json::from_str::<Vec<CartLine>>(&raw) {
            Ok(lines) => {
                debug!(lines = lines.len(), "Loaded saved cart");
                Self { lines }
            }
            Err(e) => {
                warn!(error = %e, "Saved cart is unreadable, starting empty");
                Self::new()
            }
        }
    }

    /// Write the cart to local storage. Failures are logged.
    pub fn persist(&self, storage: &mut impl LocalStorage) {
        let raw = match serde_json::to_string(&self.lines) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Failed to encode cart");
                return;
            }
        };
        if let Err(e) = storage.set_item(keys::SHOPPING_CART, raw) {
            warn!(error = %e, "Failed to save cart");
        }
    }

    /// Add one unit of `id`.
    ///
    /// # Errors
    ///
    /// Returns `CartError` if the product is unknown, sold out, or the cart
    /// already holds all of its stock.
    #[instrument(skip(self, catalog), fields(product_id = %id))]
    pub fn add(&mut self, catalog: &CatalogMirror, id: ProductId) -> Result<Added, CartError> {
        let product = catalog.find(id).ok_or(CartError::UnknownProduct(id))?;
        if !product.in_stock() {
            return Err(CartError::SoldOut {
                name: product.name.clone(),
            });
        }
        if self.quantity_of(id) >= product.stock {
            return Err(CartError::NoMoreStock {
                name: product.name.clone(),
            });
        }

        let quantity = if let Some(line) = self.line_mut(id) {
            line.quantity += 1;
            line.product.stock = product.stock;
            line.quantity
        } else {
            self.lines.push(CartLine::first_unit(product));
            1
        };

        Ok(Added {
            name: product.name.clone(),
            quantity,
        })
    }

    /// Set the quantity of `id` to `desired`, clamped to current stock.
    ///
    /// A result of zero or less removes the line. When the product is not in
    /// the catalog the line's own copy of the stock is the limit.
    #[instrument(skip(self, catalog), fields(product_id = %id))]
    pub fn set_quantity(
        &mut self,
        catalog: &CatalogMirror,
        id: ProductId,
        desired: i64,
    ) -> QuantityChange {
        let Some(index) = self.lines.iter().position(|l| l.id() == id) else {
            return QuantityChange::NotInCart;
        };
        let Some(line) = self.lines.get_mut(index) else {
            return QuantityChange::NotInCart;
        };

        let (name, stock) = catalog.find(id).map_or_else(
            || (line.product.name.clone(), line.product.stock),
            |p| (p.name.clone(), p.stock),
        );
        line.product.stock = stock;

        let mut clamped = None;
        let mut quantity = desired;
        if quantity > i64::from(stock) {
            quantity = i64::from(stock);
            clamped = Some(Clamp { name, stock });
        }

        match u32::try_from(quantity) {
            Ok(quantity) if quantity > 0 => {
                line.quantity = quantity;
                QuantityChange::Set { quantity, clamped }
            }
            _ => {
                self.lines.remove(index);
                QuantityChange::Removed { clamped }
            }
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Units of `id` in the cart (0 when absent).
    #[must_use]
    pub fn quantity_of(&self, id: ProductId) -> u32 {
        self.lines
            .iter()
            .find(|l| l.id() == id)
            .map_or(0, |l| l.quantity)
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Immutable copy for checkout.
    #[must_use]
    pub fn snapshot(&self) -> FinalizedCart {
        FinalizedCart::new(self.lines.clone())
    }

    fn line_mut(&mut self, id: ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|l| l.id() == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use valentina_core::{Category, Product};

    use super::*;
    use crate::storage::MemoryStorage;

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

    fn catalog(products: Vec<Product>) -> CatalogMirror {
        let mut catalog = CatalogMirror::new();
        catalog.apply_snapshot(products);
        catalog
    }

    #[test]
    fn test_add_stops_at_stock() {
        let catalog = catalog(vec![product(1, 3)]);
        let mut cart = CartStore::new();
        let id = ProductId::new(1);

        for expected in 1..=3 {
            let added = cart.add(&catalog, id).unwrap();
            assert_eq!(added.quantity, expected);
        }
        let err = cart.add(&catalog, id).unwrap_err();
        assert_eq!(err.user_message(), "No hay más stock de Producto 1");
        assert_eq!(cart.quantity_of(id), 3);
    }

    #[test]
    fn test_add_sold_out_and_unknown() {
        let catalog = catalog(vec![product(1, 0)]);
        let mut cart = CartStore::new();

        let err = cart.add(&catalog, ProductId::new(1)).unwrap_err();
        assert_eq!(err.user_message(), "Lo sentimos, Producto 1 está agotado.");

        let err = cart.add(&catalog, ProductId::new(9)).unwrap_err();
        assert_eq!(err, CartError::UnknownProduct(ProductId::new(9)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_message() {
        let catalog = catalog(vec![product(2, 5)]);
        let mut cart = CartStore::new();
        let added = cart.add(&catalog, ProductId::new(2)).unwrap();
        assert_eq!(added.message(), "Producto 2 añadido al carrito!");
    }

    #[test]
    fn test_set_quantity_clamps_and_removes() {
        let catalog = catalog(vec![product(1, 4)]);
        let mut cart = CartStore::new();
        let id = ProductId::new(1);
        cart.add(&catalog, id).unwrap();

        let change = cart.set_quantity(&catalog, id, 9);
        assert_eq!(change.clamp().unwrap().message(), "Solo quedan 4 unidades de Producto 1.");
        assert!(matches!(change, QuantityChange::Set { quantity: 4, .. }));

        let change = cart.set_quantity(&catalog, id, 2);
        assert_eq!(change, QuantityChange::Set { quantity: 2, clamped: None });

        let change = cart.set_quantity(&catalog, id, 0);
        assert_eq!(change, QuantityChange::Removed { clamped: None });
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_negative_removes() {
        let catalog = catalog(vec![product(1, 4)]);
        let mut cart = CartStore::new();
        cart.add(&catalog, ProductId::new(1)).unwrap();

        let change = cart.set_quantity(&catalog, ProductId::new(1), -3);
        assert!(matches!(change, QuantityChange::Removed { .. }));
    }

    #[test]
    fn test_set_quantity_not_in_cart() {
        let catalog = catalog(vec![product(1, 4)]);
        let mut cart = CartStore::new();
        assert_eq!(
            cart.set_quantity(&catalog, ProductId::new(1), 2),
            QuantityChange::NotInCart
        );
        assert!(!QuantityChange::NotInCart.changed());
    }

    #[test]
    fn test_set_quantity_without_catalog_uses_line_stock() {
        let mut cart = CartStore::new();
        cart.add(&catalog(vec![product(1, 2)]), ProductId::new(1)).unwrap();

        let empty = CatalogMirror::new();
        let change = cart.set_quantity(&empty, ProductId::new(1), 5);
        assert!(matches!(change, QuantityChange::Set { quantity: 2, clamped: Some(_) }));
    }

    #[test]
    fn test_persist_reload_round_trip() {
        let catalog = catalog(vec![product(1, 5), product(2, 5)]);
        let mut cart = CartStore::new();
        cart.add(&catalog, ProductId::new(2)).unwrap();
        cart.add(&catalog, ProductId::new(1)).unwrap();
        cart.add(&catalog, ProductId::new(2)).unwrap();

        let mut storage = MemoryStorage::new();
        cart.persist(&mut storage);

        let reloaded = CartStore::load(&storage);
        assert_eq!(reloaded.lines(), cart.lines());
        assert_eq!(reloaded.item_count(), 3);
        assert_eq!(reloaded.total(), Price::from_cents(2400));
    }

    #[test]
    fn test_load_corrupt_is_empty() {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(keys::SHOPPING_CART, "[{\"id\":".to_string())
            .unwrap();
        assert!(CartStore::load(&storage).is_empty());
    }

    #[test]
    fn test_snapshot_is_independent() {
        let catalog = catalog(vec![product(1, 5)]);
        let mut cart = CartStore::new();
        cart.add(&catalog, ProductId::new(1)).unwrap();

        let snapshot = cart.snapshot();
        cart.clear();
        assert_eq!(snapshot.lines().len(), 1);
        assert_eq!(snapshot.item_count(), 1);
    }
}
