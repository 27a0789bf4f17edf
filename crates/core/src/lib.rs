//! Frappés Valentina Core - Shared domain types.
//!
//! This crate provides the types shared by the storefront library and the CLI:
//! - `storefront` - Catalog mirror, cart store, rendering and checkout flow
//! - `cli` - Terminal front end for the storefront
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no remote
//! store access, no rendering. This keeps it lightweight and easy to test.
//!
//! # Modules
//!
//! - [`types`] - Product records, cart lines, prices, stock levels and reservations

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
