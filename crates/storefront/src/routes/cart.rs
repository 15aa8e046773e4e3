//! Cart route handlers.
//!
//! Every widget interaction posts to one endpoint with an `action` field.
//! htmx requests get the re-rendered widget back, with any toast attached as
//! an out-of-band swap. Plain form posts get a redirect to the landing page
//! and the toast is queued for it.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use duka_core::{ActionFields, CartCommand, Notification};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::{CART_UPDATED_EVENT, is_htmx};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::store::{CartStore, SessionCartStore};
use crate::widget::{CartView, CartWidget, WidgetUpdate};

/// Cart action form data.
#[derive(Debug, Deserialize)]
pub struct CartActionForm {
    #[serde(default)]
    pub action: String,
    pub name: Option<String>,
    pub price: Option<String>,
    pub index: Option<String>,
    pub via: Option<String>,
}

impl CartActionForm {
    fn into_command(self) -> std::result::Result<CartCommand, duka_core::CommandError> {
        CartCommand::from_action(
            &self.action,
            ActionFields {
                name: self.name,
                price: self.price,
                index: self.index,
                via: self.via,
            },
        )
    }
}

/// Widget swap plus out-of-band toasts (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_update.html")]
pub struct CartUpdateTemplate {
    pub cart: CartView,
    pub sidebar_open: bool,
    pub notifications: Vec<Notification>,
}

impl From<WidgetUpdate> for CartUpdateTemplate {
    fn from(update: WidgetUpdate) -> Self {
        Self {
            cart: update.view,
            sidebar_open: update.sidebar.is_open(),
            notifications: update.notification.into_iter().collect(),
        }
    }
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub cart: CartView,
}

/// Run one cart command.
///
/// Unknown actions are rejected with 400.
#[instrument(skip_all, fields(action = %form.action))]
pub async fn actions(
    session: Session,
    headers: HeaderMap,
    Form(form): Form<CartActionForm>,
) -> Result<Response> {
    let command = form.into_command()?;
    let store = SessionCartStore::new(session);
    let mut widget = CartWidget::load(store.clone()).await?;
    let update = widget.dispatch(command).await?;

    if let Some(notification) = &update.notification {
        add_breadcrumb("cart", &notification.message, None);
    }

    if is_htmx(&headers) {
        let cart_changed = update.cart_changed;
        let fragment = CartUpdateTemplate::from(update);
        if cart_changed {
            return Ok(
                (AppendHeaders([("HX-Trigger", CART_UPDATED_EVENT)]), fragment).into_response(),
            );
        }
        return Ok(fragment.into_response());
    }

    if let Some(notification) = update.notification {
        store.push_notification(notification).await?;
    }
    Ok(Redirect::to("/").into_response())
}

/// Get cart items list (HTMX).
#[instrument(skip_all)]
pub async fn items(session: Session) -> Result<CartItemsTemplate> {
    let cart = SessionCartStore::new(session).load().await?;
    Ok(CartItemsTemplate {
        cart: CartView::from(&cart),
    })
}

/// Get cart count badge (HTMX).
#[instrument(skip_all)]
pub async fn count(session: Session) -> Result<CartCountTemplate> {
    let cart = SessionCartStore::new(session).load().await?;
    Ok(CartCountTemplate {
        cart: CartView::from(&cart),
    })
}
