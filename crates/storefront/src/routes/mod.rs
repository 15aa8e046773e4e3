//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                 - Landing page: product cards and cart sidebar
//! GET  /health           - Health check (registered in `app`)
//!
//! # Cart (HTMX fragments, redirect without HTMX)
//! POST /cart/actions     - Delegated cart command (add/remove/open/close)
//! GET  /cart/items       - Cart items fragment
//! GET  /cart/count       - Cart count badge fragment
//!
//! # Checkout
//! GET  /checkout         - Order summary and buyer form
//! POST /checkout         - Submit order
//! ```

pub mod cart;
pub mod checkout;
pub mod home;

use axum::{
    Router,
    http::HeaderMap,
    routing::{get, post},
};

use crate::state::AppState;

/// Header htmx sets on every request it issues.
pub const HX_REQUEST: &str = "HX-Request";

/// Event name clients listen for to refresh cart-dependent fragments.
pub const CART_UPDATED_EVENT: &str = "cart-updated";

/// Whether a request was issued by htmx rather than a plain form post.
#[must_use]
pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get(HX_REQUEST)
        .is_some_and(|value| value.as_bytes() == b"true")
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/actions", post(cart::actions))
        .route("/items", get(cart::items))
        .route("/count", get(cart::count))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .nest("/cart", cart_routes())
        .route("/checkout", get(checkout::show).post(checkout::submit))
}
