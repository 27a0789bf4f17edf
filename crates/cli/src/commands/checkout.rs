//! Checkout and reservation commands.

use std::path::Path;

use tracing::info;
use valentina_core::Reservation;
use valentina_storefront::remote::ProductStore;

use super::{App, CliError};

/// Check out the cart, optionally saving the order receipt.
pub async fn checkout<S: ProductStore>(
    app: &mut App<S>,
    receipt: Option<&Path>,
) -> Result<(), CliError> {
    if app.checkout().is_none() {
        app.surface().print_cart();
        return Ok(());
    }
    finish(app, receipt).await
}

/// Send a reservation request, optionally saving its receipt.
pub async fn reserve<S: ProductStore>(
    app: &mut App<S>,
    reservation: Reservation,
    receipt: Option<&Path>,
) -> Result<(), CliError> {
    if !app.submit_reservation(reservation) {
        return Ok(());
    }
    finish(app, receipt).await
}

/// Resolve the confirmation modal: generate the receipt when a path was
/// given, close the modal otherwise.
async fn finish<S: ProductStore>(app: &mut App<S>, receipt: Option<&Path>) -> Result<(), CliError> {
    let Some(path) = receipt else {
        app.close_modal();
        return Ok(());
    };

    let today = chrono::Local::now().date_naive();
    if let Some(document) = app.generate_receipt(today) {
        tokio::fs::write(path, &document.bytes).await?;
        info!(path = %path.display(), "Receipt saved");
    }
    Ok(())
}
