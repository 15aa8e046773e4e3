//! Per-browser cart storage.
//!
//! The cart widget never touches sessions directly; it is handed a
//! [`CartStore`]. Production uses [`SessionCartStore`] (one tower-sessions
//! session per browser), tests use [`MemoryCartStore`].
//!
//! # Stored keys
//!
//! | key                 | value                              |
//! |---------------------|------------------------------------|
//! | `cart`              | JSON array of cart entries         |
//! | `cart_sidebar_open` | sidebar state (`"open"`/`"closed"`) |
//! | `notifications`     | queued toasts, drained when shown  |

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use duka_core::{Cart, Notification, SidebarState};
use thiserror::Error;
use tower_sessions::Session;

/// Session keys for cart widget state.
pub mod keys {
    /// The persisted cart list.
    pub const CART: &str = "cart";

    /// Whether the sidebar was left open.
    pub const SIDEBAR: &str = "cart_sidebar_open";

    /// Toasts waiting for the next full page render.
    pub const NOTIFICATIONS: &str = "notifications";
}

/// Errors from the underlying store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Session backend failed.
    #[error("session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

/// Storage for one browser's cart widget state.
pub trait CartStore: Send + Sync {
    /// Load the cart. Missing or undecodable data yields an empty cart.
    fn load(&self) -> impl Future<Output = Result<Cart, StorageError>> + Send;

    /// Replace the stored cart.
    fn save(&self, cart: &Cart) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Remove the stored cart entirely.
    fn clear(&self) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Load the sidebar state (closed if never set).
    fn sidebar(&self) -> impl Future<Output = Result<SidebarState, StorageError>> + Send;

    /// Store the sidebar state.
    fn set_sidebar(
        &self,
        state: SidebarState,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Queue a toast for the next page render.
    fn push_notification(
        &self,
        notification: Notification,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Drain queued toasts.
    fn take_notifications(
        &self,
    ) -> impl Future<Output = Result<Vec<Notification>, StorageError>> + Send;
}

// =============================================================================
// Session-backed store
// =============================================================================

/// [`CartStore`] backed by the request's tower-sessions [`Session`].
#[derive(Clone, Debug)]
pub struct SessionCartStore {
    session: Session,
}

impl SessionCartStore {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

impl CartStore for SessionCartStore {
    async fn load(&self) -> Result<Cart, StorageError> {
        let Some(value) = self.session.get_value(keys::CART).await? else {
            return Ok(Cart::new());
        };

        Ok(decode_cart(value))
    }

    async fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        self.session.insert(keys::CART, cart).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.session.remove_value(keys::CART).await?;
        Ok(())
    }

    async fn sidebar(&self) -> Result<SidebarState, StorageError> {
        Ok(self
            .session
            .get::<SidebarState>(keys::SIDEBAR)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Discarding unreadable sidebar state");
                None
            })
            .unwrap_or_default())
    }

    async fn set_sidebar(&self, state: SidebarState) -> Result<(), StorageError> {
        self.session.insert(keys::SIDEBAR, state).await?;
        Ok(())
    }

    async fn push_notification(&self, notification: Notification) -> Result<(), StorageError> {
        let mut queued: Vec<Notification> = self
            .session
            .get(keys::NOTIFICATIONS)
            .await
            .ok()
            .flatten()
            .unwrap_or_default();
        queued.push(notification);
        self.session.insert(keys::NOTIFICATIONS, queued).await?;
        Ok(())
    }

    async fn take_notifications(&self) -> Result<Vec<Notification>, StorageError> {
        let queued = self
            .session
            .remove::<Vec<Notification>>(keys::NOTIFICATIONS)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Discarding unreadable notification queue");
                None
            })
            .unwrap_or_default();
        Ok(queued)
    }
}

/// Decode a stored cart, falling back to empty on malformed data.
fn decode_cart(value: serde_json::Value) -> Cart {
    serde_json::from_value(value).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Stored cart is unreadable, starting empty");
        Cart::new()
    })
}

// =============================================================================
// In-memory store
// =============================================================================

#[derive(Debug, Default)]
struct MemoryState {
    cart: Option<serde_json::Value>,
    sidebar: SidebarState,
    notifications: Vec<Notification>,
    saves: usize,
}

/// [`CartStore`] held in memory.
///
/// The cart is kept JSON-encoded, like the session store, so decode rules
/// apply identically. Clones share state.
#[derive(Clone, Debug, Default)]
pub struct MemoryCartStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryCartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with a raw stored value.
    #[must_use]
    pub fn with_raw(value: serde_json::Value) -> Self {
        let store = Self::new();
        store.lock().cart = Some(value);
        store
    }

    /// The raw stored cart value, if any.
    #[must_use]
    pub fn raw(&self) -> Option<serde_json::Value> {
        self.lock().cart.clone()
    }

    /// Number of successful cart saves.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CartStore for MemoryCartStore {
    async fn load(&self) -> Result<Cart, StorageError> {
        Ok(self.raw().map(decode_cart).unwrap_or_default())
    }

    async fn save(&self, cart: &Cart) -> Result<(), StorageError> {
        let value = serde_json::to_value(cart).unwrap_or_default();
        let mut state = self.lock();
        state.cart = Some(value);
        state.saves += 1;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.lock().cart = None;
        Ok(())
    }

    async fn sidebar(&self) -> Result<SidebarState, StorageError> {
        Ok(self.lock().sidebar)
    }

    async fn set_sidebar(&self, state: SidebarState) -> Result<(), StorageError> {
        self.lock().sidebar = state;
        Ok(())
    }

    async fn push_notification(&self, notification: Notification) -> Result<(), StorageError> {
        self.lock().notifications.push(notification);
        Ok(())
    }

    async fn take_notifications(&self) -> Result<Vec<Notification>, StorageError> {
        Ok(std::mem::take(&mut self.lock().notifications))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use duka_core::Price;
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_empty_store_loads_empty_cart() {
        let store = MemoryCartStore::new();
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let store = MemoryCartStore::new();
        let mut cart = Cart::new();
        cart.add("Kanga", Price::parse_lenient("600"));
        store.save(&cart).await.unwrap();

        assert_eq!(store.load().await.unwrap(), cart);
        assert_eq!(
            store.raw().unwrap(),
            json!([{"name": "Kanga", "price": 600, "quantity": 1}])
        );
    }

    #[tokio::test]
    async fn test_malformed_stored_cart_is_empty() {
        let store = MemoryCartStore::with_raw(json!({"not": "a list"}));
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_removes_cart() {
        let store = MemoryCartStore::with_raw(json!([{"name": "A", "price": 1}]));
        store.clear().await.unwrap();
        assert!(store.raw().is_none());
    }

    #[tokio::test]
    async fn test_notifications_drain_once() {
        let store = MemoryCartStore::new();
        store
            .push_notification(Notification::new("one"))
            .await
            .unwrap();
        store
            .push_notification(Notification::new("two"))
            .await
            .unwrap();

        let drained = store.take_notifications().await.unwrap();
        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].message, "one");
        assert!(store.take_notifications().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_session_store_round_trip() {
        let session = Session::new(None, Arc::new(tower_sessions::MemoryStore::default()), None);
        let store = SessionCartStore::new(session);

        let mut cart = Cart::new();
        cart.add("Kikoi", Price::parse_lenient("1,200"));
        store.save(&cart).await.unwrap();
        assert_eq!(store.load().await.unwrap(), cart);

        store.set_sidebar(SidebarState::Open).await.unwrap();
        assert_eq!(store.sidebar().await.unwrap(), SidebarState::Open);

        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }
}
