//! Outbound messaging links.
//!
//! Orders and reservations are sent to the shop as a pre-filled WhatsApp
//! chat. The storefront only builds the link; opening it is up to the
//! surface.

use std::fmt::Write as _;

use valentina_core::{FinalizedCart, Reservation};

use crate::config::ShopSettings;

/// Text of the order message.
#[must_use]
pub fn order_message(shop: &ShopSettings, cart: &FinalizedCart) -> String {
    let mut message = format!(
        "¡Hola {}! 👋 Quisiera hacer el siguiente pedido:\n\n",
        shop.name
    );
    for line in cart.lines() {
        let _ = writeln!(message, "*{}x* - {}", line.quantity, line.product.name);
    }
    let _ = write!(
        message,
        "\n*TOTAL: {}*",
        cart.total().display(&shop.currency)
    );
    message
}

/// Text of the reservation message.
#[must_use]
pub fn reservation_message(shop: &ShopSettings, reservation: &Reservation) -> String {
    format!(
        "¡Hola {}! 👋 Quisiera hacer una reserva:\n\n\
         *Nombre:* {}\n*Fecha:* {}\n*Hora:* {}\n*Personas:* {}\n\n\
         ¡Por favor confirmar!",
        shop.name, reservation.name, reservation.date, reservation.time, reservation.guests
    )
}

/// `https://wa.me/<number>?text=<encoded>` deep link.
#[must_use]
pub fn whatsapp_link(number: &str, text: &str) -> String {
    format!("https://wa.me/{number}?text={}", urlencoding::encode(text))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use valentina_core::{CartLine, Category, Price, Product, ProductId};

    use super::*;

    fn line(id: i32, name: &str, cents: i64, quantity: u32) -> CartLine {
        CartLine {
            product: Product {
                id: ProductId::new(id),
                name: name.to_string(),
                category: Category::new("frappes"),
                price: Price::from_cents(cents),
                description: String::new(),
                image: String::new(),
                stock: 15,
            },
            quantity,
        }
    }

    #[test]
    fn test_order_message() {
        let cart = FinalizedCart::new(vec![
            line(1, "Frappé de Fresa", 800, 2),
            line(6, "Café Caliente", 500, 1),
        ]);
        let message = order_message(&ShopSettings::default(), &cart);
        assert_eq!(
            message,
            "¡Hola Frappés Valentina! 👋 Quisiera hacer el siguiente pedido:\n\n\
             *2x* - Frappé de Fresa\n*1x* - Café Caliente\n\n*TOTAL: Bs 21.00*"
        );
    }

    #[test]
    fn test_reservation_message() {
        let reservation = Reservation {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            date: "2026-10-20".to_string(),
            time: "18:30".to_string(),
            guests: 4,
        };
        let message = reservation_message(&ShopSettings::default(), &reservation);
        assert!(message.starts_with("¡Hola Frappés Valentina! 👋 Quisiera hacer una reserva:\n\n"));
        assert!(message.contains("*Nombre:* Ana\n*Fecha:* 2026-10-20\n*Hora:* 18:30\n*Personas:* 4"));
        assert!(message.ends_with("\n\n¡Por favor confirmar!"));
        assert!(!message.contains("ana@example.com"));
    }

    #[test]
    fn test_whatsapp_link_encodes_text() {
        let link = whatsapp_link("59174420831", "*2x* - Té\n");
        assert_eq!(link, "https://wa.me/59174420831?text=%2A2x%2A%20-%20T%C3%A9%0A");
    }
}
