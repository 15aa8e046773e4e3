//! Landing page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use duka_core::Notification;
use tower_sessions::Session;
use tracing::instrument;

use crate::catalog::ProductCard;
use crate::error::Result;
use crate::filters;
use crate::state::AppState;
use crate::store::{CartStore, SessionCartStore};
use crate::widget::{CartView, CartWidget};

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub store_name: String,
    pub products: Vec<ProductCard>,
    pub cart: CartView,
    pub sidebar_open: bool,
    /// Toasts queued by redirects, shown once.
    pub notifications: Vec<Notification>,
}

/// Display the landing page.
///
/// Renders (and persists) the stored cart, then drains queued toasts.
#[instrument(skip_all)]
pub async fn index(State(state): State<AppState>, session: Session) -> Result<HomeTemplate> {
    let store = SessionCartStore::new(session);
    let widget = CartWidget::load(store.clone()).await?;
    let cart = widget.render().await?;
    let notifications = store.take_notifications().await?;

    Ok(HomeTemplate {
        store_name: state.config().store_name.clone(),
        products: state.catalog().products().to_vec(),
        cart,
        sidebar_open: widget.sidebar().is_open(),
        notifications,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use duka_core::{Cart, Price};

    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn test_home_renders_dom_contract() {
        let mut cart = Cart::new();
        cart.add("Leso Wrap", Price::parse_lenient("450"));
        cart.add("Leso Wrap", Price::parse_lenient("450"));

        let html = HomeTemplate {
            store_name: "Duka".to_string(),
            products: Catalog::builtin().products().to_vec(),
            cart: CartView::from(&cart),
            sidebar_open: true,
            notifications: vec![Notification::new("Thanks for your order")],
        }
        .render()
        .unwrap();

        for id in [
            "cart-sidebar",
            "overlay",
            "close-cart",
            "cart-items",
            "cart-count",
            "cart-total",
            "toasts",
        ] {
            assert!(html.contains(&format!(r#"id="{id}""#)), "missing #{id}");
        }
        assert!(html.contains("product-card"));
        assert!(html.contains("Ksh 1,200"));
        assert!(html.contains("x2"));
        assert!(html.contains("Thanks for your order"));
        assert!(html.contains("cart-sidebar open"));
    }
}
