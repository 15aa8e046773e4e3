//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::services::{OrderClient, OrderClientError};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; immutable after startup.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    orders: OrderClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the order client cannot be built from the
    /// endpoint configuration.
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Result<Self, OrderClientError> {
        let orders = OrderClient::new(&config.orders)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                orders,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the order endpoint client.
    #[must_use]
    pub fn orders(&self) -> &OrderClient {
        &self.inner.orders
    }
}
