//! Storefront controller.
//!
//! # Architecture
//!
//! - One controller owns the [`AppState`] and its collaborators; every
//!   shopper action and every async event goes through it
//! - Async work is limited to the catalog subscription and per-checkout
//!   reconciliation writes; [`Storefront::pump`] waits for the next one and
//!   applies it
//! - Every failure ends as a notification; nothing aborts the session
//!
//! # Checkout races
//!
//! The cart is cleared as soon as checkout starts. A reconciliation failure
//! does not bring it back, and a reconciliation success clears whatever the
//! cart holds when it completes, including items added in the meantime.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};
use valentina_core::{CheckoutId, Product, ProductId, Reservation};

use crate::cart::CartStore;
use crate::config::{ShopSettings, StorefrontConfig};
use crate::error::StorefrontError;
use crate::messaging::{order_message, reservation_message, whatsapp_link};
use crate::notify::{ConfirmModal, Notification, PendingReceipt};
use crate::receipt::{self, ReceiptBackend, RenderedDocument};
use crate::reconcile::{self, ReconcileOutcome};
use crate::remote::{ProductStore, Snapshot, Subscription};
use crate::render::CategoryFilter;
use crate::state::AppState;
use crate::storage::LocalStorage;
use crate::surface::Surface;

const ORDER_MODAL_TITLE: &str = "¡Pedido listo para enviar!";
const ORDER_MODAL_MESSAGE: &str =
    "Se abrirá WhatsApp para que completes tu pedido. También puedes descargar tu comprobante.";
const RESERVATION_MODAL_TITLE: &str = "¡Reserva lista para enviar!";
const RESERVATION_MODAL_MESSAGE: &str = "Se abrirá WhatsApp para que nos envíes los detalles.";

/// Event applied by [`Storefront::pump`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorefrontEvent {
    /// A catalog snapshot replaced the mirror.
    CatalogUpdated { seeded: bool },
    /// The subscription reported an error; the mirror was kept.
    CatalogUnavailable,
    /// The subscription ended.
    SubscriptionClosed,
    /// A background reconciliation finished.
    Reconciled { checkout_id: CheckoutId, ok: bool },
    /// The notification banner timed out.
    NotificationExpired,
}

enum Wake {
    Snapshot(Option<Snapshot>),
    Outcome(Option<ReconcileOutcome>),
    BannerDue,
}

/// The storefront application.
pub struct Storefront<S: ProductStore, L: LocalStorage, U: Surface> {
    store: Arc<S>,
    storage: L,
    surface: U,
    receipts: Option<Box<dyn ReceiptBackend>>,
    shop: ShopSettings,
    state: AppState,
    subscription: Option<Subscription>,
    outcomes_tx: mpsc::UnboundedSender<ReconcileOutcome>,
    outcomes_rx: mpsc::UnboundedReceiver<ReconcileOutcome>,
    in_flight: usize,
}

impl<S: ProductStore, L: LocalStorage, U: Surface> Storefront<S, L, U> {
    /// Assemble a storefront. Call [`Self::start`] before using it.
    ///
    /// No receipt backend is installed; see [`Self::with_receipt_backend`].
    #[must_use]
    pub fn new(store: Arc<S>, storage: L, surface: U, config: &StorefrontConfig) -> Self {
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        Self {
            store,
            storage,
            surface,
            receipts: None,
            shop: config.shop.clone(),
            state: AppState::new(config.notification_ttl),
            subscription: None,
            outcomes_tx,
            outcomes_rx,
            in_flight: 0,
        }
    }

    /// Install the backend used to render receipts.
    #[must_use]
    pub fn with_receipt_backend(mut self, backend: impl ReceiptBackend + 'static) -> Self {
        self.receipts = Some(Box::new(backend));
        self
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub const fn surface(&self) -> &U {
        &self.surface
    }

    pub const fn surface_mut(&mut self) -> &mut U {
        &mut self.surface
    }

    #[must_use]
    pub const fn storage(&self) -> &L {
        &self.storage
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn shop(&self) -> &ShopSettings {
        &self.shop
    }

    /// Reconciliation writes that have not reported back yet.
    #[must_use]
    pub const fn pending_reconciliations(&self) -> usize {
        self.in_flight
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Load the saved cart, subscribe to the catalog and draw everything.
    #[instrument(skip(self))]
    pub fn start(&mut self) {
        self.state.cart = CartStore::load(&self.storage);
        self.subscription = Some(self.store.subscribe());
        info!(
            cart_lines = self.state.cart.lines().len(),
            "Storefront started"
        );
        self.render_all();
    }

    /// Wait for the next async event and apply it.
    ///
    /// Returns `None` once nothing else can happen: the subscription is
    /// closed, no reconciliation is pending and no banner is showing.
    pub async fn pump(&mut self) -> Option<StorefrontEvent> {
        let deadline = self.state.notifier.deadline();
        let in_flight = self.in_flight > 0;

        let wake = tokio::select! {
            snapshot = next_snapshot(&mut self.subscription), if self.subscription.is_some() => {
                Wake::Snapshot(snapshot)
            }
            outcome = self.outcomes_rx.recv(), if in_flight => Wake::Outcome(outcome),
            () = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                Wake::BannerDue
            }
            else => return None,
        };

        let event = match wake {
            Wake::Snapshot(Some(Ok(products))) => {
                let seeded = self.sync_catalog(products).await;
                StorefrontEvent::CatalogUpdated { seeded }
            }
            Wake::Snapshot(Some(Err(e))) => {
                self.fail(StorefrontError::RemoteRead(e));
                StorefrontEvent::CatalogUnavailable
            }
            Wake::Snapshot(None) => {
                warn!("Catalog subscription closed");
                self.subscription = None;
                StorefrontEvent::SubscriptionClosed
            }
            Wake::Outcome(Some(outcome)) => self.apply_outcome(outcome),
            Wake::Outcome(None) => {
                self.in_flight = 0;
                return None;
            }
            Wake::BannerDue => {
                if self.state.notifier.expire(Instant::now()) {
                    self.surface.hide_notification();
                }
                StorefrontEvent::NotificationExpired
            }
        };
        Some(event)
    }

    /// Apply the next catalog snapshot without waiting on anything else.
    ///
    /// Returns `false` if the subscription has ended.
    pub async fn sync(&mut self) -> bool {
        let Some(snapshot) = next_snapshot(&mut self.subscription).await else {
            self.subscription = None;
            return false;
        };
        match snapshot {
            Ok(products) => {
                self.sync_catalog(products).await;
            }
            Err(e) => self.fail(StorefrontError::RemoteRead(e)),
        }
        true
    }

    /// Replace the catalog mirror with `products`.
    ///
    /// An empty collection is seeded with the bootstrap catalog, which is
    /// then written back to the store. Returns whether seeding happened.
    #[instrument(skip(self, products), fields(count = products.len()))]
    pub async fn sync_catalog(&mut self, products: Vec<Product>) -> bool {
        let applied = self.state.catalog.apply_snapshot(products);
        if applied.seeded {
            match self
                .store
                .replace_products(self.state.catalog.products())
                .await
            {
                Ok(()) => info!("Bootstrap catalog written to store"),
                Err(e) => warn!(error = %e, "Failed to write bootstrap catalog, using it locally"),
            }
        }
        self.render_all();
        applied.seeded
    }

    /// Wait until every pending reconciliation has reported back.
    pub async fn settle(&mut self) {
        while self.in_flight > 0 {
            let Some(outcome) = self.outcomes_rx.recv().await else {
                self.in_flight = 0;
                break;
            };
            self.apply_outcome(outcome);
        }
    }

    // =========================================================================
    // Cart Actions
    // =========================================================================

    /// Add one unit of a product to the cart.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn add_to_cart(&mut self, id: ProductId) {
        match self.state.cart.add(&self.state.catalog, id) {
            Ok(added) => {
                self.notify(Notification::success(added.message()));
                self.after_cart_change();
            }
            Err(e) => self.fail(e.into()),
        }
    }

    /// Set a line's quantity; zero or less removes it.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn set_quantity(&mut self, id: ProductId, desired: i64) {
        let change = self.state.cart.set_quantity(&self.state.catalog, id, desired);
        if let Some(clamp) = change.clamp() {
            self.notify(Notification::error(clamp.message()));
        }
        if change.changed() {
            self.after_cart_change();
        }
    }

    pub fn increase(&mut self, id: ProductId) {
        let current = i64::from(self.state.cart.quantity_of(id));
        self.set_quantity(id, current + 1);
    }

    pub fn decrease(&mut self, id: ProductId) {
        let current = i64::from(self.state.cart.quantity_of(id));
        self.set_quantity(id, current - 1);
    }

    pub fn remove(&mut self, id: ProductId) {
        self.set_quantity(id, 0);
    }

    // =========================================================================
    // Menu Filters
    // =========================================================================

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.state.filter.search = text.into();
        self.render_menu();
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.state.filter.category = category;
        self.render_menu();
    }

    // =========================================================================
    // Checkout and Reservations
    // =========================================================================

    /// Check out the current cart.
    ///
    /// Does nothing for an empty cart. Otherwise the cart is snapshotted,
    /// reconciliation is started in the background, the cart is cleared,
    /// the order message is opened and the confirmation modal is shown.
    #[instrument(skip(self))]
    pub fn checkout(&mut self) -> Option<CheckoutId> {
        if self.state.cart.is_empty() {
            debug!("Checkout with empty cart ignored");
            return None;
        }

        let finalized = self.state.cart.snapshot();
        let checkout_id = finalized.id();
        let updates = reconcile::plan(&self.state.catalog, &finalized);
        info!(
            %checkout_id,
            lines = finalized.lines().len(),
            updates = updates.len(),
            "Checkout started"
        );
        reconcile::spawn(
            Arc::clone(&self.store),
            checkout_id,
            updates,
            self.outcomes_tx.clone(),
        );
        self.in_flight += 1;

        self.state.cart.clear();
        self.after_cart_change();

        let link = whatsapp_link(
            &self.shop.whatsapp_number,
            &order_message(&self.shop, &finalized),
        );
        self.surface.open(&link);

        self.show_modal(ConfirmModal {
            title: ORDER_MODAL_TITLE.to_string(),
            message: ORDER_MODAL_MESSAGE.to_string(),
            pending: PendingReceipt::Order(finalized),
        });
        Some(checkout_id)
    }

    /// Send a reservation request. Returns whether it was accepted.
    #[instrument(skip(self, reservation), fields(guests = reservation.guests))]
    pub fn submit_reservation(&mut self, reservation: Reservation) -> bool {
        if let Err(e) = reservation.validate() {
            self.fail(e.into());
            return false;
        }

        let link = whatsapp_link(
            &self.shop.whatsapp_number,
            &reservation_message(&self.shop, &reservation),
        );
        self.surface.open(&link);

        self.show_modal(ConfirmModal {
            title: RESERVATION_MODAL_TITLE.to_string(),
            message: RESERVATION_MODAL_MESSAGE.to_string(),
            pending: PendingReceipt::Reservation(reservation),
        });
        true
    }

    /// Render the receipt held by the open modal and close it.
    ///
    /// The rendered document is opened on the surface and returned.
    #[instrument(skip(self))]
    pub fn generate_receipt(&mut self, issued: NaiveDate) -> Option<RenderedDocument> {
        let modal = self.state.modal.take()?;
        self.surface.hide_modal();

        match receipt::generate(self.receipts.as_deref(), &self.shop, &modal.pending, issued) {
            Ok(document) => {
                info!(title = %document.title, "Receipt generated");
                self.surface.open(&document.data_uri());
                Some(document)
            }
            Err(e) => {
                self.fail(e.into());
                None
            }
        }
    }

    /// Close the modal, discarding its pending receipt.
    pub fn close_modal(&mut self) {
        if self.state.modal.take().is_some() {
            self.surface.hide_modal();
        }
    }

    // =========================================================================
    // Helper Functions
    // =========================================================================

    fn apply_outcome(&mut self, outcome: ReconcileOutcome) -> StorefrontEvent {
        self.in_flight = self.in_flight.saturating_sub(1);
        let ReconcileOutcome {
            checkout_id,
            result,
        } = outcome;

        match result {
            Ok(()) => {
                debug!(%checkout_id, "Clearing cart after reconciliation");
                self.state.cart.clear();
                self.after_cart_change();
                StorefrontEvent::Reconciled {
                    checkout_id,
                    ok: true,
                }
            }
            Err(e) => {
                self.fail(StorefrontError::RemoteWrite(e));
                StorefrontEvent::Reconciled {
                    checkout_id,
                    ok: false,
                }
            }
        }
    }

    fn after_cart_change(&mut self) {
        self.state.cart.persist(&mut self.storage);
        self.render_all();
    }

    fn show_modal(&mut self, modal: ConfirmModal) {
        self.surface.show_modal(&modal.view());
        self.state.modal = Some(modal);
    }

    fn notify(&mut self, notification: Notification) {
        self.surface.show_notification(&notification);
        self.state.notifier.show(notification);
    }

    fn fail(&mut self, err: StorefrontError) {
        err.log();
        self.notify(Notification::from(&err));
    }

    fn render_menu(&mut self) {
        let view = self.state.menu_view(&self.shop.currency);
        self.surface.render_menu(&view);
    }

    fn render_all(&mut self) {
        self.render_menu();
        let view = self.state.cart_view(&self.shop.currency);
        self.surface.render_cart(&view);
        self.surface.render_cart_counter(self.state.cart.item_count());
    }
}

async fn next_snapshot(subscription: &mut Option<Subscription>) -> Option<Snapshot> {
    match subscription {
        Some(rx) => rx.recv().await,
        None => None,
    }
}
