//! Frappés Valentina storefront library.
//!
//! # Architecture
//!
//! - [`catalog`] mirrors the remote product collection
//! - [`cart`] keeps the shopper's cart in local storage
//! - [`render`] projects both into menu and cart views
//! - [`reconcile`] writes stock decrements back after checkout
//! - [`notify`] and [`receipt`] handle banners, the confirmation modal and
//!   order/reservation receipts
//! - [`app`] ties them together behind [`Storefront`]
//!
//! External collaborators sit behind traits: [`remote::ProductStore`],
//! [`storage::LocalStorage`], [`receipt::ReceiptBackend`] and
//! [`surface::Surface`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod messaging;
pub mod notify;
pub mod receipt;
pub mod reconcile;
pub mod remote;
pub mod render;
pub mod state;
pub mod storage;
pub mod surface;

pub use app::{Storefront, StorefrontEvent};
pub use config::StorefrontConfig;
pub use error::StorefrontError;
