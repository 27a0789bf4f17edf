//! HTML receipt backend.

use askama::Template;
use tracing::debug;

use super::{ReceiptBackend, ReceiptDocument, ReceiptError, RenderedDocument};

/// Receipt page template.
#[derive(Template)]
#[template(path = "receipts/document.html")]
struct ReceiptTemplate<'a> {
    title: &'a str,
    title_size: u8,
    title_weight: &'static str,
    meta: &'a [String],
    heading: Option<&'a str>,
    head: &'a [String],
    rows: &'a [Vec<String>],
    theme: &'static str,
    summary: Option<&'a str>,
    footer: Option<&'a str>,
}

/// Renders receipts as standalone, printable HTML pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlReceiptBackend;

impl HtmlReceiptBackend {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ReceiptBackend for HtmlReceiptBackend {
    fn render(&self, document: &ReceiptDocument) -> Result<RenderedDocument, ReceiptError> {
        let template = ReceiptTemplate {
            title: &document.title,
            title_size: document.title_font.size,
            title_weight: if document.title_font.bold { "bold" } else { "normal" },
            meta: &document.meta,
            heading: document.heading.as_deref(),
            head: document.table.head.as_deref().unwrap_or_default(),
            rows: &document.table.rows,
            theme: document.table.theme.css_class(),
            summary: document.summary.as_deref(),
            footer: document.footer.as_deref(),
        };

        let html = template.render()?;
        debug!(title = %document.title, bytes = html.len(), "Rendered receipt");

        Ok(RenderedDocument {
            title: document.title.clone(),
            content_type: "text/html",
            bytes: html.into_bytes(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::NaiveDate;
    use valentina_core::{CartLine, Category, FinalizedCart, Price, Product, ProductId, Reservation};

    use super::*;
    use crate::config::ShopSettings;
    use crate::receipt::{order_receipt, reservation_receipt};

    fn issued() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    #[test]
    fn test_order_receipt_html() {
        let cart = FinalizedCart::new(vec![CartLine {
            product: Product {
                id: ProductId::new(3),
                name: "Frappé de Chocolate".to_string(),
                category: Category::new("frappes"),
                price: Price::from_cents(800),
                description: String::new(),
                image: String::new(),
                stock: 15,
            },
            quantity: 2,
        }]);
        let doc = order_receipt(&ShopSettings::default(), &cart, issued()).unwrap();
        let rendered = HtmlReceiptBackend::new().render(&doc).unwrap();
        let html = String::from_utf8(rendered.bytes).unwrap();

        assert_eq!(rendered.content_type, "text/html");
        assert!(html.contains("Comprobante de Pedido - Frappés Valentina"));
        assert!(html.contains("<th>Precio Unit.</th>"));
        assert!(html.contains("Frappé de Chocolate"));
        assert!(html.contains("Total a Pagar: Bs 16.00"));
        assert!(html.contains("font-size: 22px"));
    }

    #[test]
    fn test_reservation_receipt_html_escapes_input() {
        let reservation = Reservation {
            name: "<b>Ana</b>".to_string(),
            email: "ana@example.com".to_string(),
            date: "2026-10-20".to_string(),
            time: "18:30".to_string(),
            guests: 2,
        };
        let doc = reservation_receipt(&ShopSettings::default(), &reservation, issued());
        let html = String::from_utf8(HtmlReceiptBackend::new().render(&doc).unwrap().bytes).unwrap();

        assert!(!html.contains("<b>Ana</b>"));
        assert!(html.contains("&#60;b&#62;Ana") || html.contains("&lt;b&gt;Ana"));
        assert!(html.contains("Detalles de la Reserva"));
        assert!(html.contains("class=\"receipt-table plain\""));
        assert!(!html.contains("<thead>"));
    }
}
