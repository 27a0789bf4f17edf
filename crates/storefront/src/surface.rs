//! UI surface.
//!
//! Everything the storefront shows goes through a [`Surface`]. Every method
//! defaults to doing nothing, so a surface without, say, a cart counter just
//! leaves that method alone.

use crate::notify::{ModalView, Notification};
use crate::render::{CartView, MenuView};

/// Drawing and navigation primitives.
pub trait Surface {
    fn render_menu(&mut self, _view: &MenuView) {}

    fn render_cart(&mut self, _view: &CartView) {}

    fn render_cart_counter(&mut self, _count: u32) {}

    fn show_notification(&mut self, _notification: &Notification) {}

    fn hide_notification(&mut self) {}

    fn show_modal(&mut self, _modal: &ModalView) {}

    fn hide_modal(&mut self) {}

    /// Open a URL (messaging deep link or rendered document).
    fn open(&mut self, _url: &str) {}
}

/// Surface that draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessSurface;

impl Surface for HeadlessSurface {}

/// Surface call, as recorded by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Menu(MenuView),
    Cart(CartView),
    CartCounter(u32),
    Notification(Notification),
    HideNotification,
    Modal(ModalView),
    HideModal,
    Open(String),
}

/// Surface that records every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    events: Vec<SurfaceEvent>,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> &[SurfaceEvent] {
        &self.events
    }

    /// Most recently drawn menu.
    #[must_use]
    pub fn last_menu(&self) -> Option<&MenuView> {
        self.events.iter().rev().find_map(|e| match e {
            SurfaceEvent::Menu(view) => Some(view),
            _ => None,
        })
    }

    /// Most recently drawn cart page.
    #[must_use]
    pub fn last_cart(&self) -> Option<&CartView> {
        self.events.iter().rev().find_map(|e| match e {
            SurfaceEvent::Cart(view) => Some(view),
            _ => None,
        })
    }

    #[must_use]
    pub fn last_counter(&self) -> Option<u32> {
        self.events.iter().rev().find_map(|e| match e {
            SurfaceEvent::CartCounter(count) => Some(*count),
            _ => None,
        })
    }

    /// Every notification shown, oldest first.
    #[must_use]
    pub fn notifications(&self) -> Vec<&Notification> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Notification(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    /// Banner currently visible, if any.
    #[must_use]
    pub fn banner(&self) -> Option<&Notification> {
        self.events.iter().rev().find_map(|e| match e {
            SurfaceEvent::Notification(n) => Some(Some(n)),
            SurfaceEvent::HideNotification => Some(None),
            _ => None,
        })?
    }

    /// Modal currently visible, if any.
    #[must_use]
    pub fn modal(&self) -> Option<&ModalView> {
        self.events.iter().rev().find_map(|e| match e {
            SurfaceEvent::Modal(m) => Some(Some(m)),
            SurfaceEvent::HideModal => Some(None),
            _ => None,
        })?
    }

    /// Every URL opened, oldest first.
    #[must_use]
    pub fn opened(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Open(url) => Some(url.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Surface for RecordingSurface {
    fn render_menu(&mut self, view: &MenuView) {
        self.events.push(SurfaceEvent::Menu(view.clone()));
    }

    fn render_cart(&mut self, view: &CartView) {
        self.events.push(SurfaceEvent::Cart(view.clone()));
    }

    fn render_cart_counter(&mut self, count: u32) {
        self.events.push(SurfaceEvent::CartCounter(count));
    }

    fn show_notification(&mut self, notification: &Notification) {
        self.events
            .push(SurfaceEvent::Notification(notification.clone()));
    }

    fn hide_notification(&mut self) {
        self.events.push(SurfaceEvent::HideNotification);
    }

    fn show_modal(&mut self, modal: &ModalView) {
        self.events.push(SurfaceEvent::Modal(modal.clone()));
    }

    fn hide_modal(&mut self) {
        self.events.push(SurfaceEvent::HideModal);
    }

    fn open(&mut self, url: &str) {
        self.events.push(SurfaceEvent::Open(url.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_tracks_visible_state() {
        let mut surface = RecordingSurface::new();
        surface.show_notification(&Notification::success("hola"));
        assert_eq!(surface.banner().map(|n| n.message.as_str()), Some("hola"));

        surface.hide_notification();
        assert!(surface.banner().is_none());
        assert_eq!(surface.notifications().len(), 1);

        surface.show_modal(&ModalView {
            title: "t".to_string(),
            message: "m".to_string(),
        });
        assert!(surface.modal().is_some());
        surface.hide_modal();
        assert!(surface.modal().is_none());
    }

    #[test]
    fn test_headless_surface_ignores_everything() {
        let mut surface = HeadlessSurface;
        surface.render_cart_counter(3);
        surface.open("https://wa.me/1");
    }
}
