//! Order and reservation receipts.
//!
//! Builders turn a checkout snapshot or a reservation into a
//! backend-neutral [`ReceiptDocument`]; a [`ReceiptBackend`] renders it.
//! Builders only read their arguments, including the issue date.

mod html;

use chrono::NaiveDate;
use thiserror::Error;
use valentina_core::{FinalizedCart, Reservation};

use crate::config::ShopSettings;
use crate::notify::PendingReceipt;

pub use html::HtmlReceiptBackend;

/// Date format printed on receipts.
pub const ISSUE_DATE_FORMAT: &str = "%d/%m/%Y";

/// Errors that can occur when producing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// No rendering backend is installed.
    #[error("receipt backend unavailable")]
    BackendUnavailable,

    /// The checkout snapshot has no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// Template rendering failed.
    #[error("render error: {0}")]
    Render(#[from] askama::Error),
}

impl ReceiptError {
    /// Message shown to the shopper.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::BackendUnavailable => "Error: Librería PDF no cargada.".to_string(),
            Self::EmptyCart => "El carrito está vacío.".to_string(),
            Self::Render(_) => "No se pudo generar el comprobante.".to_string(),
        }
    }
}

/// Font directive for the title line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TitleFont {
    pub size: u8,
    pub bold: bool,
}

/// Table styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableTheme {
    /// Header row and striped body.
    Striped,
    /// Unstyled key/value rows.
    Plain,
}

impl TableTheme {
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Striped => "striped",
            Self::Plain => "plain",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptTable {
    pub head: Option<Vec<String>>,
    pub rows: Vec<Vec<String>>,
    pub theme: TableTheme,
}

/// Backend-neutral receipt layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptDocument {
    pub title: String,
    pub title_font: TitleFont,
    /// Lines printed under the title.
    pub meta: Vec<String>,
    /// Heading above the table.
    pub heading: Option<String>,
    pub table: ReceiptTable,
    /// Bold line after the table, e.g. the grand total.
    pub summary: Option<String>,
    pub footer: Option<String>,
}

/// Output of a [`ReceiptBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub title: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl RenderedDocument {
    /// `data:` URI embedding the document, suitable for the opener.
    #[must_use]
    pub fn data_uri(&self) -> String {
        use base64::Engine as _;

        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{};base64,{encoded}", self.content_type)
    }
}

/// Document rendering library.
pub trait ReceiptBackend: Send + Sync {
    /// Render `document`.
    ///
    /// # Errors
    ///
    /// Returns `ReceiptError::Render` if the backend fails.
    fn render(&self, document: &ReceiptDocument) -> Result<RenderedDocument, ReceiptError>;
}

const TITLE_FONT: TitleFont = TitleFont {
    size: 22,
    bold: true,
};

/// Build the order receipt for a checkout snapshot.
///
/// # Errors
///
/// Returns `ReceiptError::EmptyCart` if the snapshot has no lines.
pub fn order_receipt(
    shop: &ShopSettings,
    cart: &FinalizedCart,
    issued: NaiveDate,
) -> Result<ReceiptDocument, ReceiptError> {
    if cart.is_empty() {
        return Err(ReceiptError::EmptyCart);
    }

    let currency = shop.currency.as_str();
    let rows = cart
        .lines()
        .iter()
        .map(|line| {
            vec![
                line.product.name.clone(),
                line.quantity.to_string(),
                line.product.price.display(currency),
                line.subtotal().display(currency),
            ]
        })
        .collect();

    Ok(ReceiptDocument {
        title: format!("Comprobante de Pedido - {}", shop.name),
        title_font: TITLE_FONT,
        meta: vec![
            format!("Fecha: {}", issued.format(ISSUE_DATE_FORMAT)),
            "Cliente: Invitado".to_string(),
        ],
        heading: None,
        table: ReceiptTable {
            head: Some(
                ["Producto", "Cantidad", "Precio Unit.", "Subtotal"]
                    .map(String::from)
                    .to_vec(),
            ),
            rows,
            theme: TableTheme::Striped,
        },
        summary: Some(format!("Total a Pagar: {}", cart.total().display(currency))),
        footer: None,
    })
}

/// Build the reservation receipt.
#[must_use]
pub fn reservation_receipt(
    shop: &ShopSettings,
    reservation: &Reservation,
    issued: NaiveDate,
) -> ReceiptDocument {
    let rows = [
        ("Nombre:", reservation.name.clone()),
        ("Email:", reservation.email.clone()),
        ("Fecha:", reservation.date.clone()),
        ("Hora:", reservation.time.clone()),
        ("Personas:", reservation.guests.to_string()),
    ]
    .into_iter()
    .map(|(key, value)| vec![key.to_string(), value])
    .collect();

    ReceiptDocument {
        title: format!("Comprobante de Reserva - {}", shop.name),
        title_font: TITLE_FONT,
        meta: vec![
            format!("Fecha de Emisión: {}", issued.format(ISSUE_DATE_FORMAT)),
            format!("Reservado por: {}", reservation.name),
        ],
        heading: Some("Detalles de la Reserva".to_string()),
        table: ReceiptTable {
            head: None,
            rows,
            theme: TableTheme::Plain,
        },
        summary: None,
        footer: Some("Por favor, presenta este comprobante al llegar a la tienda.".to_string()),
    }
}

/// Render the receipt a modal was holding.
///
/// The backend is checked before anything is built.
///
/// # Errors
///
/// Returns `ReceiptError` if no backend is installed, the order snapshot is
/// empty, or rendering fails.
pub fn generate(
    backend: Option<&dyn ReceiptBackend>,
    shop: &ShopSettings,
    pending: &PendingReceipt,
    issued: NaiveDate,
) -> Result<RenderedDocument, ReceiptError> {
    let backend = backend.ok_or(ReceiptError::BackendUnavailable)?;
    let document = match pending {
        PendingReceipt::Order(cart) => order_receipt(shop, cart, issued)?,
        PendingReceipt::Reservation(reservation) => {
            reservation_receipt(shop, reservation, issued)
        }
    };
    backend.render(&document)
}
