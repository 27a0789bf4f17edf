//! Transient banners and the confirmation modal.

use std::time::Duration;

use tokio::time::Instant;
use valentina_core::{FinalizedCart, Reservation};

/// Banner flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

impl NotificationKind {
    /// CSS-like class of the banner.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A message for the shopper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotificationKind,
}

impl Notification {
    #[must_use]
    pub fn new(message: impl Into<String>, kind: NotificationKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Success)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationKind::Error)
    }
}

/// Holds the visible banner and its dismissal deadline.
///
/// Only one banner is visible at a time. Showing a new one replaces the
/// current banner and restarts the timer.
#[derive(Debug)]
pub struct Notifier {
    ttl: Duration,
    current: Option<(Notification, Instant)>,
}

impl Notifier {
    #[must_use]
    pub const fn new(ttl: Duration) -> Self {
        Self { ttl, current: None }
    }

    /// Show `notification` until the TTL elapses.
    pub fn show(&mut self, notification: Notification) {
        let deadline = Instant::now() + self.ttl;
        self.current = Some((notification, deadline));
    }

    #[must_use]
    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref().map(|(n, _)| n)
    }

    /// When the visible banner must be hidden.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.current.as_ref().map(|&(_, deadline)| deadline)
    }

    /// Hide the banner if its deadline has passed. Returns `true` if it did.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.deadline() {
            Some(deadline) if deadline <= now => {
                self.current = None;
                true
            }
            _ => false,
        }
    }
}

/// Receipt the modal can generate on request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingReceipt {
    Order(FinalizedCart),
    Reservation(Reservation),
}

/// Confirmation modal with close and generate-receipt actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmModal {
    pub title: String,
    pub message: String,
    pub pending: PendingReceipt,
}

impl ConfirmModal {
    /// What the surface shows.
    #[must_use]
    pub fn view(&self) -> ModalView {
        ModalView {
            title: self.title.clone(),
            message: self.message.clone(),
        }
    }
}

/// Display data for the modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalView {
    pub title: String,
    pub message: String,
}
