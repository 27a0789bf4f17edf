//! Terminal surface.

use valentina_storefront::notify::{ModalView, Notification, NotificationKind};
use valentina_storefront::render::{CartView, MenuView};
use valentina_storefront::surface::Surface;

/// Prints notifications, modals and links as they happen and remembers the
/// latest views for the command to print at the end.
#[derive(Debug, Default)]
pub struct ConsoleSurface {
    menu: Option<MenuView>,
    cart: Option<CartView>,
}

impl ConsoleSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(clippy::print_stdout)]
    pub fn print_menu(&self) {
        match &self.menu {
            Some(MenuView::Cards(cards)) => {
                for card in cards {
                    let action = if card.add_enabled { "" } else { " [sin stock]" };
                    println!(
                        "{:>3}  {:<24} {:>9}  {}{action}",
                        card.id, card.name, card.price, card.stock_label
                    );
                    if !card.description.is_empty() {
                        println!("     {}", card.description);
                    }
                }
            }
            Some(MenuView::Empty(message)) => println!("{message}"),
            None => println!("Menú no disponible."),
        }
    }

    #[allow(clippy::print_stdout)]
    pub fn print_cart(&self) {
        let Some(cart) = &self.cart else {
            return;
        };
        if let Some(message) = cart.empty_message {
            println!("{message}");
        }
        for item in &cart.items {
            println!(
                "{:>3}  {:<24} {:>3} x {:>9}  (máx. {})",
                item.id, item.name, item.quantity, item.price, item.max
            );
        }
        println!("Total: {}", cart.total);
    }
}

impl Surface for ConsoleSurface {
    fn render_menu(&mut self, view: &MenuView) {
        self.menu = Some(view.clone());
    }

    fn render_cart(&mut self, view: &CartView) {
        self.cart = Some(view.clone());
    }

    #[allow(clippy::print_stdout)]
    fn show_notification(&mut self, notification: &Notification) {
        let marker = match notification.kind {
            NotificationKind::Success => "✔",
            NotificationKind::Error => "✘",
        };
        println!("{marker} {}", notification.message);
    }

    #[allow(clippy::print_stdout)]
    fn show_modal(&mut self, modal: &ModalView) {
        println!("\n{}\n{}\n", modal.title, modal.message);
    }

    #[allow(clippy::print_stdout)]
    fn open(&mut self, url: &str) {
        if url.starts_with("data:") {
            println!("Comprobante generado ({} bytes)", url.len());
        } else {
            println!("Abrir: {url}");
        }
    }
}
