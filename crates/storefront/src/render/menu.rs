//! Menu projection.

use valentina_core::{Category, Product, StockLevel};

use crate::cart::CartStore;
use crate::catalog::CatalogMirror;

/// Placeholder shown when no product matches the filter.
pub const NO_RESULTS: &str = "No se encontraron productos.";

/// Category selection. `All` is the `all` sentinel of the filter buttons.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    /// Parse a filter button value; `"all"` selects every category.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value == "all" {
            Self::All
        } else {
            Self::Only(Category::new(value))
        }
    }

    fn matches(&self, category: &Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == category,
        }
    }
}

/// Current search text and category selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuFilter {
    pub search: String,
    pub category: CategoryFilter,
}

impl MenuFilter {
    fn matches(&self, product: &Product, needle: &str) -> bool {
        self.category.matches(&product.category)
            && (needle.is_empty() || product.name.to_lowercase().contains(needle))
    }
}

/// One product card of the menu grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuCard {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: String,
    /// Stock not yet claimed by the cart. Negative when stock dropped
    /// below the cart quantity.
    pub available: i64,
    pub add_enabled: bool,
    pub stock_class: &'static str,
    pub stock_label: String,
}

/// The menu grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuView {
    Cards(Vec<MenuCard>),
    /// Nothing matched; show the message instead of the grid.
    Empty(&'static str),
}

impl MenuView {
    #[must_use]
    pub fn cards(&self) -> &[MenuCard] {
        match self {
            Self::Cards(cards) => cards,
            Self::Empty(_) => &[],
        }
    }
}

/// Project the visible menu.
///
/// Source order is kept. The stock badge reflects raw stock while the add
/// action reflects stock minus what is already in the cart.
#[must_use]
pub fn render_menu(
    catalog: &CatalogMirror,
    cart: &CartStore,
    filter: &MenuFilter,
    currency: &str,
) -> MenuView {
    let needle = filter.search.to_lowercase();
    let cards: Vec<MenuCard> = catalog
        .products()
        .iter()
        .filter(|product| filter.matches(product, &needle))
        .map(|product| {
            let available = i64::from(product.stock) - i64::from(cart.quantity_of(product.id));
            let level = StockLevel::from_stock(product.stock);
            MenuCard {
                id: product.id.as_i32(),
                name: product.name.clone(),
                description: product.description.clone(),
                image: product.image.clone(),
                price: product.price.display(currency),
                available,
                add_enabled: available > 0,
                stock_class: level.css_class(),
                stock_label: level.label(),
            }
        })
        .collect();

    if cards.is_empty() {
        MenuView::Empty(NO_RESULTS)
    } else {
        MenuView::Cards(cards)
    }
}
