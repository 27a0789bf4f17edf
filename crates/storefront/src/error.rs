//! Unified error handling.
//!
//! Every failure in the storefront ends as a user-visible notification and a
//! safe no-op; none of them aborts the session. `StorefrontError` groups the
//! failures by where they come from and knows how to present itself.

use thiserror::Error;
use valentina_core::ReservationError;

use crate::cart::CartError;
use crate::notify::{Notification, NotificationKind};
use crate::receipt::ReceiptError;
use crate::remote::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// The product subscription failed; last known catalog is kept.
    #[error("Remote read failed: {0}")]
    RemoteRead(#[source] StoreError),

    /// A write to the remote store failed.
    #[error("Remote write failed: {0}")]
    RemoteWrite(#[source] StoreError),

    /// A cart operation was refused.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Reservation form data is incomplete.
    #[error("Reservation error: {0}")]
    Reservation(#[from] ReservationError),

    /// A receipt could not be produced.
    #[error("Receipt error: {0}")]
    Receipt(#[from] ReceiptError),
}

impl StorefrontError {
    /// Message shown to the shopper.
    ///
    /// Remote failures are reported generically; details only go to logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::RemoteRead(_) => "No se pudo conectar al servidor de inventario.".to_string(),
            Self::RemoteWrite(_) => {
                "Hubo un error al procesar tu pedido. Inténtalo de nuevo.".to_string()
            }
            Self::Cart(err) => err.user_message(),
            Self::Reservation(err) => format!("Revisa tu reserva: {err}."),
            Self::Receipt(err) => err.user_message(),
        }
    }

    /// Emit the error to the log at a level matching its origin.
    pub fn log(&self) {
        match self {
            Self::RemoteRead(_) | Self::RemoteWrite(_) => {
                tracing::error!(error = %self, "Storefront error");
            }
            Self::Receipt(ReceiptError::Render(_)) => {
                tracing::error!(error = %self, "Storefront error");
            }
            _ => tracing::debug!(error = %self, "Operation refused"),
        }
    }
}

impl From<&StorefrontError> for Notification {
    fn from(err: &StorefrontError) -> Self {
        Self::new(err.user_message(), NotificationKind::Error)
    }
}
