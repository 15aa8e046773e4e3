//! Outbound services for the storefront.
//!
//! # Services
//!
//! - `order_client` - Submits checkout orders to the remote order endpoint

pub mod order_client;

pub use order_client::{OrderClient, OrderClientError, OrderSubmitter};
