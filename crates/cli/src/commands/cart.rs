//! Menu and cart commands.

use valentina_core::ProductId;
use valentina_storefront::remote::ProductStore;
use valentina_storefront::render::CategoryFilter;

use super::App;

pub fn menu<S: ProductStore>(app: &mut App<S>, search: String, category: &str) {
    app.set_category(CategoryFilter::parse(category));
    app.set_search(search);
    app.surface().print_menu();
}

pub fn add<S: ProductStore>(app: &mut App<S>, id: i32) {
    app.add_to_cart(ProductId::new(id));
    app.surface().print_cart();
}

pub fn set<S: ProductStore>(app: &mut App<S>, id: i32, quantity: i64) {
    app.set_quantity(ProductId::new(id), quantity);
    app.surface().print_cart();
}

pub fn remove<S: ProductStore>(app: &mut App<S>, id: i32) {
    app.remove(ProductId::new(id));
    app.surface().print_cart();
}
