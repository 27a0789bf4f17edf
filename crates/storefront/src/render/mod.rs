//! Render layer.
//!
//! Pure projections from the catalog mirror and the cart store into display
//! data. Surfaces draw these views; nothing here touches I/O.

mod cart;
mod menu;

pub use cart::{CartItemView, CartView, render_cart};
pub use menu::{CategoryFilter, MenuCard, MenuFilter, MenuView, render_menu};
