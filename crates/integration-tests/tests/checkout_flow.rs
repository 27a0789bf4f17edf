//! Cart, checkout and reconciliation flows.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tokio::time::Instant;
use valentina_core::ProductId;
use valentina_integration_tests::{product, reservation, start, start_with_storage};
use valentina_storefront::StorefrontEvent;
use valentina_storefront::cart::CartStore;
use valentina_storefront::remote::MemoryStore;

fn issued() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
}

#[tokio::test]
async fn test_add_stops_at_stock() {
    let store = Arc::new(MemoryStore::with_products(vec![product(1, "Té Caliente", 3)]));
    let mut app = start(&store).await;
    let id = ProductId::new(1);

    for _ in 0..3 {
        app.add_to_cart(id);
    }
    assert_eq!(app.state().cart.quantity_of(id), 3);

    app.add_to_cart(id);
    assert_eq!(app.state().cart.quantity_of(id), 3);
    assert_eq!(
        app.surface().banner().unwrap().message,
        "No hay más stock de Té Caliente"
    );
    assert!(!app.surface().last_menu().unwrap().cards()[0].add_enabled);
}

#[tokio::test]
async fn test_quantity_clamp_and_remove() {
    let store = Arc::new(MemoryStore::with_products(vec![product(1, "Frappé de Coco", 4)]));
    let mut app = start(&store).await;
    let id = ProductId::new(1);
    app.add_to_cart(id);

    app.set_quantity(id, 10);
    assert_eq!(app.state().cart.quantity_of(id), 4);
    assert_eq!(
        app.surface().banner().unwrap().message,
        "Solo quedan 4 unidades de Frappé de Coco."
    );

    app.decrease(id);
    assert_eq!(app.state().cart.quantity_of(id), 3);

    app.remove(id);
    assert!(app.state().cart.is_empty());
    assert_eq!(
        app.surface().last_cart().unwrap().empty_message,
        Some("Tu carrito está vacío.")
    );
    assert_eq!(app.surface().last_counter(), Some(0));
}

#[tokio::test]
async fn test_checkout_reconciles_stock() {
    let store = Arc::new(MemoryStore::with_products(vec![
        product(1, "Frappé de Fresa", 15),
        product(2, "Frappé de Naranja", 5),
    ]));
    let mut app = start(&store).await;
    app.add_to_cart(ProductId::new(2));
    app.add_to_cart(ProductId::new(2));

    app.checkout().unwrap();
    app.settle().await;

    let writes = store.stock_writes();
    assert_eq!(writes.len(), 1);
    let paths: Vec<(String, u32)> = writes[0].paths().collect();
    assert_eq!(paths, vec![("products/1/stock".to_string(), 3)]);

    // The mirror converges through the subscription.
    assert!(app.sync().await);
    assert_eq!(app.state().catalog.find(ProductId::new(2)).unwrap().stock, 3);
    assert_eq!(app.state().catalog.find(ProductId::new(1)).unwrap().stock, 15);
}

#[tokio::test]
async fn test_checkout_opens_order_message() {
    let store = Arc::new(MemoryStore::with_products(vec![product(1, "Frappé de Fresa", 15)]));
    let mut app = start(&store).await;
    app.add_to_cart(ProductId::new(1));
    app.checkout().unwrap();

    let link = app.surface().opened()[0];
    assert!(link.starts_with("https://wa.me/59174420831?text="));
    assert!(link.contains("%2A1x%2A%20-%20Frapp%C3%A9%20de%20Fresa"));
    assert!(link.contains("TOTAL%3A%20Bs%208.00"));
    app.settle().await;
}

#[tokio::test]
async fn test_receipt_reads_checkout_snapshot() {
    let store = Arc::new(MemoryStore::with_products(vec![
        product(1, "Frappé de Fresa", 15),
        product(2, "Frappé de Naranja", 15),
    ]));
    let mut app = start(&store).await;
    app.add_to_cart(ProductId::new(1));
    app.checkout().unwrap();
    app.settle().await;

    // Edits after checkout do not leak into the receipt.
    app.add_to_cart(ProductId::new(2));
    let document = app.generate_receipt(issued()).unwrap();
    let html = String::from_utf8(document.bytes).unwrap();

    assert!(html.contains("Frappé de Fresa"));
    assert!(!html.contains("Frappé de Naranja"));
    assert!(html.contains("Total a Pagar: Bs 8.00"));
    assert!(html.contains("Fecha: 14/10/2026"));
    assert_eq!(store.stock_writes()[0].len(), 1);
}

#[tokio::test]
async fn test_failed_reconciliation_leaves_cart_empty() {
    let store = Arc::new(MemoryStore::with_products(vec![product(1, "Frappé de Fresa", 15)]));
    store.fail_next_update("network down");
    let mut app = start(&store).await;
    app.add_to_cart(ProductId::new(1));

    let checkout_id = app.checkout().unwrap();
    let event = app.pump().await.unwrap();
    assert_eq!(
        event,
        StorefrontEvent::Reconciled {
            checkout_id,
            ok: false
        }
    );

    assert_eq!(
        app.surface().banner().unwrap().message,
        "Hubo un error al procesar tu pedido. Inténtalo de nuevo."
    );
    assert!(app.state().cart.is_empty());
    assert!(CartStore::load(app.storage()).is_empty());
    assert_eq!(store.products()[0].stock, 15);
}

#[tokio::test]
async fn test_successful_reconciliation_clears_later_additions() {
    let store = Arc::new(MemoryStore::with_products(vec![
        product(1, "Frappé de Fresa", 15),
        product(2, "Frappé de Naranja", 15),
    ]));
    let mut app = start(&store).await;
    app.add_to_cart(ProductId::new(1));
    app.checkout().unwrap();

    app.add_to_cart(ProductId::new(2));
    assert_eq!(app.state().cart.item_count(), 1);

    app.settle().await;
    assert!(app.state().cart.is_empty());

    let writes = store.stock_writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(
        writes[0].paths().collect::<Vec<_>>(),
        vec![("products/0/stock".to_string(), 14)]
    );
}

#[tokio::test]
async fn test_cart_survives_restart() {
    let store = Arc::new(MemoryStore::with_products(vec![
        product(1, "Frappé de Fresa", 15),
        product(2, "Frappé de Naranja", 15),
    ]));
    let mut first = start(&store).await;
    first.add_to_cart(ProductId::new(2));
    first.add_to_cart(ProductId::new(1));
    first.add_to_cart(ProductId::new(2));
    let saved = first.storage().clone();

    let second = start_with_storage(&store, saved).await;
    assert_eq!(second.state().cart.lines(), first.state().cart.lines());
    assert_eq!(second.surface().last_counter(), Some(3));
}

#[tokio::test]
async fn test_closing_modal_discards_receipt() {
    let store = Arc::new(MemoryStore::with_products(vec![product(1, "Frappé de Fresa", 15)]));
    let mut app = start(&store).await;
    app.add_to_cart(ProductId::new(1));
    app.checkout().unwrap();

    app.close_modal();
    assert!(app.surface().modal().is_none());
    assert!(app.generate_receipt(issued()).is_none());
    assert_eq!(app.surface().opened().len(), 1);
    app.settle().await;
}

#[tokio::test]
async fn test_reservation_flow() {
    let store = Arc::new(MemoryStore::with_products(vec![product(1, "Frappé de Fresa", 15)]));
    let mut app = start(&store).await;

    assert!(app.submit_reservation(reservation("Ana")));
    assert!(app.surface().opened()[0].contains("%2ANombre%3A%2A%20Ana"));
    assert_eq!(
        app.surface().modal().unwrap().title,
        "¡Reserva lista para enviar!"
    );

    let document = app.generate_receipt(issued()).unwrap();
    let html = String::from_utf8(document.bytes).unwrap();
    assert!(html.contains("Comprobante de Reserva - Frappés Valentina"));
    assert!(html.contains("Reservado por: Ana"));
    assert!(html.contains("Fecha de Emisión: 14/10/2026"));
    assert!(store.stock_writes().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_banner_expires_and_restarts() {
    let store = Arc::new(MemoryStore::with_products(vec![product(1, "Frappé de Fresa", 15)]));
    let mut app = start(&store).await;
    let started = Instant::now();

    app.add_to_cart(ProductId::new(1));
    tokio::time::advance(Duration::from_secs(2)).await;
    app.add_to_cart(ProductId::new(1));

    assert_eq!(app.pump().await, Some(StorefrontEvent::NotificationExpired));
    assert!(started.elapsed() >= Duration::from_secs(5));
    assert!(app.surface().banner().is_none());
}
