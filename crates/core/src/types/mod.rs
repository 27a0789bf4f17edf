//! Core types for the storefront.
//!
//! This module provides type-safe wrappers for the storefront's domain concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;
pub mod reservation;
pub mod stock;

pub use cart::{CartLine, FinalizedCart};
pub use id::*;
pub use price::Price;
pub use product::{Category, Product};
pub use reservation::{Reservation, ReservationError};
pub use stock::StockLevel;
