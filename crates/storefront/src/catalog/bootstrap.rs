//! Catalog used to seed an empty remote store.

use valentina_core::{Category, Price, Product, ProductId};

/// Stock every bootstrap product starts with.
pub const BOOTSTRAP_STOCK: u32 = 15;

/// The fixed seed catalog.
///
/// IDs are dense and 1-based so that the storage index of each product is
/// `id - 1`.
#[must_use]
pub fn bootstrap_catalog() -> Vec<Product> {
    [
        (1, "Frappé de Fresa", "frappes", 800, "Dulce y refrescante, hecho con fresas naturales.", "images/frappe_fresa.png"),
        (2, "Frappé de Naranja", "frappes", 800, "Un toque cítrico y helado para recargar energías.", "images/frappe_naranja.png"),
        (3, "Frappé de Chocolate", "frappes", 800, "Cremoso e intenso, para los amantes del chocolate.", "images/frappe_chocolate.png"),
        (4, "Frappé de Coco", "frappes", 800, "Sabor tropical que te transportará a la playa.", "images/frappe_coco.png"),
        (5, "Combo 2x1 Frappés", "combos", 1500, "¡Lleva dos frappés! Elige tus sabores favoritos.", "images/combo.png"),
        (6, "Café Caliente", "calientes", 500, "El clásico café de grano para empezar bien el día.", "images/cafe.png"),
        (7, "Té Caliente", "calientes", 300, "Una infusión caliente para relajarte.", "images/te.png"),
    ]
    .into_iter()
    .map(|(id, name, category, cents, description, image)| Product {
        id: ProductId::new(id),
        name: name.to_string(),
        category: Category::new(category),
        price: Price::from_cents(cents),
        description: description.to_string(),
        image: image.to_string(),
        stock: BOOTSTRAP_STOCK,
    })
    .collect()
}
