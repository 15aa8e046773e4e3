//! Checkout route handlers.
//!
//! Checkout is a plain form post. Success redirects to the landing page with
//! the endpoint's message queued as a toast. Failure re-renders the page with
//! the error and the cart untouched.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use duka_core::{BuyerDetails, Notification};
use tower_sessions::Session;
use tracing::instrument;

use crate::checkout::{self, CheckoutError, CheckoutSummary};
use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::state::AppState;
use crate::store::{CartStore, SessionCartStore};
use crate::widget::CartView;

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub store_name: String,
    pub summary: CheckoutSummary,
    /// Values to refill the form with after a failed attempt.
    pub buyer: BuyerDetails,
    pub error: Option<String>,
    pub cart: CartView,
    pub sidebar_open: bool,
    pub notifications: Vec<Notification>,
}

impl CheckoutTemplate {
    async fn load(
        state: &AppState,
        store: &SessionCartStore,
        buyer: BuyerDetails,
        error: Option<String>,
    ) -> Result<Self> {
        let cart = store.load().await?;

        Ok(Self {
            store_name: state.config().store_name.clone(),
            summary: CheckoutSummary::from(&cart),
            buyer,
            error,
            cart: CartView::from(&cart),
            sidebar_open: store.sidebar().await?.is_open(),
            notifications: store.take_notifications().await?,
        })
    }
}

/// Display the order summary and buyer form.
#[instrument(skip_all)]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<CheckoutTemplate> {
    let store = SessionCartStore::new(session);
    CheckoutTemplate::load(&state, &store, BuyerDetails::default(), None).await
}

/// Submit the order.
///
/// - Empty cart: 422, page re-rendered with "Your cart is empty!"
/// - Endpoint failure: 502, page re-rendered, cart kept
/// - Success: cart cleared, redirect to `/`
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(buyer): Form<BuyerDetails>,
) -> Result<Response> {
    let store = SessionCartStore::new(session);

    match checkout::submit(&store, state.orders(), buyer.clone(), Utc::now()).await {
        Ok(receipt) => {
            add_breadcrumb("checkout", "Order submitted", None);
            store
                .push_notification(Notification::new(receipt.message))
                .await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(CheckoutError::Storage(e)) => Err(e.into()),
        Err(err) => {
            let status = if err.is_empty_cart() {
                StatusCode::UNPROCESSABLE_ENTITY
            } else {
                StatusCode::BAD_GATEWAY
            };
            let page =
                CheckoutTemplate::load(&state, &store, buyer, Some(err.user_message())).await?;
            Ok((status, page).into_response())
        }
    }
}
