//! The cart widget: cart state, sidebar state and the command dispatcher.
//!
//! A [`CartWidget`] is loaded from a [`CartStore`] at the start of a request,
//! handed one [`CartCommand`], and produces a [`WidgetUpdate`] describing
//! what the page should now show. Every cart mutation re-renders and persists.

use duka_core::{Cart, CartCommand, CartEntry, Notification, Price, SidebarState, SidebarTrigger};

use crate::store::{CartStore, StorageError};

/// One rendered cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartItemView {
    /// Position in the cart, posted back by the remove control.
    pub index: usize,
    pub name: String,
    pub quantity: u32,
    /// Unit price, display formatted.
    pub price: String,
    /// Price × quantity, display formatted.
    pub line_price: String,
}

/// Rendered cart contents for the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    /// Sum of quantities.
    pub item_count: u64,
    /// Grand total, display formatted.
    pub total: String,
    pub total_amount: Price,
}

impl CartView {
    /// Create an empty cart view.
    #[must_use]
    pub fn empty() -> Self {
        Self::from(&Cart::new())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        let total_amount = cart.total();
        Self {
            items: cart
                .entries()
                .iter()
                .enumerate()
                .map(|(index, entry)| CartItemView::new(index, entry))
                .collect(),
            item_count: cart.item_count(),
            total: total_amount.display(),
            total_amount,
        }
    }
}

impl CartItemView {
    fn new(index: usize, entry: &CartEntry) -> Self {
        Self {
            index,
            name: entry.name.clone(),
            quantity: entry.quantity,
            price: entry.price.display(),
            line_price: entry.subtotal().display(),
        }
    }
}

/// The result of dispatching one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetUpdate {
    /// The cart as it now renders.
    pub view: CartView,
    /// Sidebar visibility after the command.
    pub sidebar: SidebarState,
    /// Toast to show, if the command produced one.
    pub notification: Option<Notification>,
    /// Whether the cart contents changed (and were persisted).
    pub cart_changed: bool,
}

/// Cart widget state bound to a store.
#[derive(Debug)]
pub struct CartWidget<S> {
    store: S,
    cart: Cart,
    sidebar: SidebarState,
}

impl<S: CartStore> CartWidget<S> {
    /// Load cart and sidebar state from `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store backend fails.
    pub async fn load(store: S) -> Result<Self, StorageError> {
        let cart = store.load().await?;
        let sidebar = store.sidebar().await?;
        Ok(Self {
            store,
            cart,
            sidebar,
        })
    }

    /// Current in-memory cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Current sidebar state.
    #[must_use]
    pub const fn sidebar(&self) -> SidebarState {
        self.sidebar
    }

    /// Route a command to its handler.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the result fails.
    pub async fn dispatch(&mut self, command: CartCommand) -> Result<WidgetUpdate, StorageError> {
        match command {
            CartCommand::Add { name, price } => self.add(name, price).await,
            CartCommand::Remove { index } => self.remove(&index).await,
            CartCommand::Sidebar(trigger) => self.toggle_sidebar(trigger).await,
        }
    }

    /// Add one unit of `name`, then re-render and persist.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the cart fails.
    pub async fn add(&mut self, name: String, price: Price) -> Result<WidgetUpdate, StorageError> {
        let quantity = self.cart.add(name.as_str(), price).quantity;
        tracing::debug!(product = %name, quantity, "Added to cart");

        let view = self.render().await?;
        Ok(WidgetUpdate {
            view,
            sidebar: self.sidebar,
            notification: Some(Notification::added(&name)),
            cart_changed: true,
        })
    }

    /// Remove the line at a textual index.
    ///
    /// Invalid or out-of-range indexes are a silent no-op: nothing is
    /// persisted and no toast is produced.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the cart fails.
    pub async fn remove(&mut self, index: &str) -> Result<WidgetUpdate, StorageError> {
        let Some(removed) = self.cart.remove_at(index) else {
            tracing::debug!(index, "Ignoring remove for invalid index");
            return Ok(WidgetUpdate {
                view: CartView::from(&self.cart),
                sidebar: self.sidebar,
                notification: None,
                cart_changed: false,
            });
        };
        tracing::debug!(product = %removed.name, "Removed from cart");

        let view = self.render().await?;
        Ok(WidgetUpdate {
            view,
            sidebar: self.sidebar,
            notification: Some(Notification::removed()),
            cart_changed: true,
        })
    }

    /// Build the view from the in-memory cart, then persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the cart fails.
    pub async fn render(&self) -> Result<CartView, StorageError> {
        let view = CartView::from(&self.cart);
        self.store.save(&self.cart).await?;
        Ok(view)
    }

    async fn toggle_sidebar(
        &mut self,
        trigger: SidebarTrigger,
    ) -> Result<WidgetUpdate, StorageError> {
        self.sidebar = self.sidebar.apply(trigger);
        self.store.set_sidebar(self.sidebar).await?;
        tracing::debug!(?trigger, sidebar = ?self.sidebar, "Sidebar toggled");

        Ok(WidgetUpdate {
            view: CartView::from(&self.cart),
            sidebar: self.sidebar,
            notification: None,
            cart_changed: false,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use duka_core::ActionFields;
    use serde_json::json;

    use super::*;
    use crate::store::MemoryCartStore;

    async fn widget(store: &MemoryCartStore) -> CartWidget<MemoryCartStore> {
        CartWidget::load(store.clone()).await.unwrap()
    }

    fn add(name: &str, price: &str) -> CartCommand {
        CartCommand::from_action(
            "add",
            ActionFields {
                name: Some(name.to_string()),
                price: Some(price.to_string()),
                ..ActionFields::default()
            },
        )
        .unwrap()
    }

    fn remove(index: &str) -> CartCommand {
        CartCommand::Remove {
            index: index.to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_twice_one_entry_persisted() {
        let store = MemoryCartStore::new();
        let mut w = widget(&store).await;

        w.dispatch(add("Kikoi Towel", "Ksh 1,200")).await.unwrap();
        let update = w.dispatch(add("Kikoi Towel", "Ksh 1,200")).await.unwrap();

        assert_eq!(update.view.items.len(), 1);
        assert_eq!(update.view.items[0].quantity, 2);
        assert_eq!(update.view.item_count, 2);
        assert_eq!(update.view.total, "2,400");
        assert_eq!(
            update.notification,
            Some(Notification::new("Kikoi Towel added to cart"))
        );

        // A fresh widget sees what was persisted
        let reloaded = widget(&store).await;
        assert_eq!(reloaded.cart().entries()[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_remove_out_of_range_is_silent() {
        let store = MemoryCartStore::new();
        let mut w = widget(&store).await;
        w.dispatch(add("Leso", "450")).await.unwrap();
        let saves = store.save_count();

        let update = w.dispatch(remove("5")).await.unwrap();
        assert!(!update.cart_changed);
        assert!(update.notification.is_none());
        assert_eq!(update.view.items.len(), 1);
        assert_eq!(store.save_count(), saves);
    }

    #[tokio::test]
    async fn test_remove_valid_index() {
        let store = MemoryCartStore::new();
        let mut w = widget(&store).await;
        w.dispatch(add("A", "100")).await.unwrap();
        w.dispatch(add("B", "200")).await.unwrap();

        let update = w.dispatch(remove("0")).await.unwrap();
        assert!(update.cart_changed);
        assert_eq!(update.notification, Some(Notification::removed()));
        assert_eq!(update.view.items[0].name, "B");
        assert_eq!(update.view.items[0].index, 0);
        assert_eq!(store.raw().unwrap(), json!([{"name": "B", "price": 200, "quantity": 1}]));
    }

    #[tokio::test]
    async fn test_rendered_total_matches_entries() {
        let store = MemoryCartStore::new();
        let mut w = widget(&store).await;
        w.dispatch(add("A", "1,199.50")).await.unwrap();
        w.dispatch(add("A", "1,199.50")).await.unwrap();
        let update = w.dispatch(add("B", "Ksh 300")).await.unwrap();

        let expected: Price = w.cart().entries().iter().map(CartEntry::subtotal).sum();
        assert_eq!(update.view.total_amount, expected);
        assert_eq!(update.view.total, "2,699");
        assert_eq!(update.view.items[0].line_price, "2,399");
    }

    #[tokio::test]
    async fn test_huge_prices_saturate_and_stay_renderable() {
        let huge = "Ksh 50,000,000,000,000,000,000,000,000,000";
        let store = MemoryCartStore::new();
        let mut w = widget(&store).await;

        w.dispatch(add("A", huge)).await.unwrap();
        let update = w.dispatch(add("A", huge)).await.unwrap();
        assert_eq!(update.view.total_amount, Price::MAX);
        assert_eq!(update.view.items[0].quantity, 2);

        let update = w.dispatch(add("B", huge)).await.unwrap();
        assert_eq!(update.view.total_amount, Price::MAX);

        // The persisted cart still loads and renders
        let reloaded = widget(&store).await;
        let view = reloaded.render().await.unwrap();
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.total_amount, Price::MAX);
        assert_eq!(view.items[1].price, "50,000,000,000,000,000,000,000,000,000");
    }

    #[tokio::test]
    async fn test_unparseable_price_adds_at_zero() {
        let store = MemoryCartStore::new();
        let mut w = widget(&store).await;
        let update = w.dispatch(add("Mystery Box", "Call for price")).await.unwrap();

        assert_eq!(update.view.items[0].price, "0");
        assert_eq!(update.view.total_amount, Price::ZERO);
    }

    #[tokio::test]
    async fn test_sidebar_commands_persist_state() {
        let store = MemoryCartStore::new();
        let mut w = widget(&store).await;

        let opened = w
            .dispatch(CartCommand::Sidebar(SidebarTrigger::CartIcon))
            .await
            .unwrap();
        assert!(opened.sidebar.is_open());
        assert!(widget(&store).await.sidebar().is_open());

        let closed = w
            .dispatch(CartCommand::Sidebar(SidebarTrigger::Overlay))
            .await
            .unwrap();
        assert_eq!(closed.sidebar, SidebarState::Closed);
        assert!(!closed.cart_changed);
    }

    #[tokio::test]
    async fn test_render_persists_loaded_cart() {
        let store = MemoryCartStore::with_raw(json!([{"name": "A", "price": "Ksh 50"}]));
        let w = widget(&store).await;
        let view = w.render().await.unwrap();

        assert_eq!(view.items[0].price, "50");
        assert_eq!(
            store.raw().unwrap(),
            json!([{"name": "A", "price": 50, "quantity": 1}])
        );
    }
}
