//! Client-side application state.
//!
//! The catalog mirror and the cart store are independent slices: neither
//! refers to the other, and consistency between them is re-established
//! every time a view is projected.

use std::time::Duration;

use crate::cart::CartStore;
use crate::catalog::CatalogMirror;
use crate::notify::{ConfirmModal, Notifier};
use crate::render::{CartView, MenuFilter, MenuView, render_cart, render_menu};

/// Everything the storefront remembers between events.
#[derive(Debug)]
pub struct AppState {
    pub catalog: CatalogMirror,
    pub cart: CartStore,
    pub filter: MenuFilter,
    pub notifier: Notifier,
    /// Open confirmation modal, holding its pending receipt.
    pub modal: Option<ConfirmModal>,
}

impl AppState {
    /// Fresh state with an empty catalog and cart.
    #[must_use]
    pub fn new(notification_ttl: Duration) -> Self {
        Self {
            catalog: CatalogMirror::new(),
            cart: CartStore::new(),
            filter: MenuFilter::default(),
            notifier: Notifier::new(notification_ttl),
            modal: None,
        }
    }

    #[must_use]
    pub fn menu_view(&self, currency: &str) -> MenuView {
        render_menu(&self.catalog, &self.cart, &self.filter, currency)
    }

    #[must_use]
    pub fn cart_view(&self, currency: &str) -> CartView {
        render_cart(&self.cart, currency)
    }
}
