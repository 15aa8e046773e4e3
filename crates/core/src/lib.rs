//! Duka Core - cart, order and price types.
//!
//! This crate provides the types shared by the Duka components:
//! - `storefront` - the storefront server rendering the cart widget and checkout
//! - `cli` - catalog and cart inspection tools
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no sessions,
//! no HTTP clients. Persistence and rendering are the storefront's concern, so
//! every cart rule here can be tested without a storage backend.
//!
//! # Modules
//!
//! - [`types`] - prices, cart entries, orders, widget commands, notifications

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
