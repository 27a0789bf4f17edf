//! Cart lines and the checkout snapshot.

use serde::{Deserialize, Serialize};

use super::id::{CheckoutId, ProductId};
use super::price::Price;
use super::product::Product;

/// A product in the shopper's cart.
///
/// Serialized with the product fields flattened next to `quantity`, which is
/// the layout kept in local storage under `shoppingCart`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Copy of the product as it was when first added.
    #[serde(flatten)]
    pub product: Product,
    /// Units in the cart, always at least 1.
    pub quantity: u32,
}

impl CartLine {
    /// Start a line with a single unit of `product`.
    #[must_use]
    pub fn first_unit(product: &Product) -> Self {
        Self {
            product: product.clone(),
            quantity: 1,
        }
    }

    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// `price × quantity`.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.product.price.times(self.quantity)
    }
}

/// Immutable copy of the cart taken at checkout.
///
/// Reconciliation and receipt generation both read from this snapshot, so
/// clearing or editing the live cart afterwards cannot change what they see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizedCart {
    id: CheckoutId,
    lines: Vec<CartLine>,
}

impl FinalizedCart {
    /// Snapshot `lines` under a freshly generated checkout ID.
    #[must_use]
    pub fn new(lines: Vec<CartLine>) -> Self {
        Self {
            id: CheckoutId::generate(),
            lines,
        }
    }

    #[must_use]
    pub const fn id(&self) -> CheckoutId {
        self.id
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Grand total of all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Sum of quantities across lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }
}
