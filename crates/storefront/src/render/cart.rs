//! Cart page projection.

use valentina_core::{CartLine, Price};

use crate::cart::CartStore;

/// Message shown for an empty cart.
pub const EMPTY_CART: &str = "Tu carrito está vacío.";

/// Cart line display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub price: String,
    pub quantity: u32,
    /// Upper bound of the quantity control.
    pub max: u32,
}

impl CartItemView {
    fn from_line(line: &CartLine, currency: &str) -> Self {
        Self {
            id: line.id().as_i32(),
            name: line.product.name.clone(),
            image: line.product.image.clone(),
            price: line.product.price.display(currency),
            quantity: line.quantity,
            max: line.product.stock,
        }
    }
}

/// Cart page display data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    /// Set when the cart is empty.
    pub empty_message: Option<&'static str>,
    pub total: String,
    pub item_count: u32,
    pub checkout_enabled: bool,
}

impl CartView {
    /// View of an empty cart.
    #[must_use]
    pub fn empty(currency: &str) -> Self {
        Self {
            items: Vec::new(),
            empty_message: Some(EMPTY_CART),
            total: Price::ZERO.display(currency),
            item_count: 0,
            checkout_enabled: false,
        }
    }
}

/// Project the cart page.
#[must_use]
pub fn render_cart(cart: &CartStore, currency: &str) -> CartView {
    if cart.is_empty() {
        return CartView::empty(currency);
    }

    CartView {
        items: cart
            .lines()
            .iter()
            .map(|line| CartItemView::from_line(line, currency))
            .collect(),
        empty_message: None,
        total: cart.total().display(currency),
        item_count: cart.item_count(),
        checkout_enabled: true,
    }
}
