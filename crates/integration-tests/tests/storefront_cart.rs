//! Cart widget over HTTP.
//!
//! Drives `/cart/actions` both the way htmx does (fragment responses) and as
//! plain form posts (redirect plus queued toast), checking that state sticks
//! to the browser session.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use duka_integration_tests::{FakeOrderEndpoint, TestApp};

async fn app() -> TestApp {
    TestApp::new(&FakeOrderEndpoint::unreachable().await)
}

// =============================================================================
// Pages
// =============================================================================

#[tokio::test]
async fn test_health() {
    let mut app = app().await;
    let response = app.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "ok");
    assert!(response.header("x-request-id").is_some());
}

#[tokio::test]
async fn test_huge_price_does_not_break_later_pages() {
    let huge = "Ksh 50,000,000,000,000,000,000,000,000,000";
    let mut app = app().await;

    for _ in 0..2 {
        let response = app.add_to_cart("Gold Kiondo", huge).await;
        assert_eq!(response.status, StatusCode::OK);
    }
    assert_eq!(app.add_to_cart("Silver Kiondo", huge).await.status, StatusCode::OK);

    for uri in ["/", "/cart/items", "/checkout"] {
        let response = app.get(uri).await;
        assert_eq!(response.status, StatusCode::OK, "{uri}");
    }
    assert!(app.get("/").await.body.contains("79,228,162,514,264,337,593,543,950,335"));
    assert_eq!(app.cart_count().await, 3);
}

#[tokio::test]
async fn test_home_lists_product_cards() {
    let mut app = app().await;
    let response = app.get("/").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("class=\"product-card\""));
    assert!(response.body.contains("Kikoi Beach Towel"));
    assert!(response.body.contains("Ksh 1,200"));
    assert!(response.body.contains("id=\"cart-sidebar\""));
    assert!(response.header("content-security-policy").is_some());
}

// =============================================================================
// HTMX interactions
// =============================================================================

#[tokio::test]
async fn test_add_same_product_twice_one_line() {
    let mut app = app().await;

    let first = app.add_to_cart("Leso Wrap", "Ksh 450").await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.header("hx-trigger"), Some("cart-updated"));
    assert!(first.body.contains("hx-swap-oob"));
    assert!(first.body.contains("Leso Wrap added to cart"));

    let second = app.add_to_cart("Leso Wrap", "Ksh 450").await;
    assert_eq!(second.body.matches("class=\"cart-item\"").count(), 1);
    assert!(second.body.contains("x2"));
    assert!(second.body.contains("Ksh 900"));

    assert_eq!(app.cart_count().await, 2);
}

#[tokio::test]
async fn test_remove_valid_index() {
    let mut app = app().await;
    app.add_to_cart("Leso Wrap", "Ksh 450").await;
    app.add_to_cart("Maasai Shuka", "Ksh 950").await;

    let response = app
        .htmx_post("/cart/actions", &[("action", "remove"), ("index", "0")])
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Item removed"));
    assert!(!response.body.contains("Leso Wrap"));
    assert_eq!(app.cart_count().await, 1);
}

#[tokio::test]
async fn test_remove_invalid_index_is_silent() {
    let mut app = app().await;
    app.add_to_cart("Leso Wrap", "Ksh 450").await;

    for index in ["7", "-1", "one", "0.5", ""] {
        let response = app
            .htmx_post("/cart/actions", &[("action", "remove"), ("index", index)])
            .await;

        assert_eq!(response.status, StatusCode::OK, "index {index:?}");
        assert!(response.header("hx-trigger").is_none(), "index {index:?}");
        assert!(!response.body.contains("hx-swap-oob"), "index {index:?}");
    }

    assert_eq!(app.cart_count().await, 1);
}

#[tokio::test]
async fn test_unparseable_price_added_at_zero() {
    let mut app = app().await;
    let response = app.add_to_cart("Mystery Box", "Call for price").await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Mystery Box"));
    assert!(response.body.contains("id=\"cart-total\">Ksh 0<"));
}

#[tokio::test]
async fn test_missing_name_defaults_to_product() {
    let mut app = app().await;
    let response = app
        .htmx_post("/cart/actions", &[("action", "add"), ("price", "100")])
        .await;

    assert!(response.body.contains("Product added to cart"));
}

#[tokio::test]
async fn test_product_text_is_escaped() {
    let mut app = app().await;
    let response = app.add_to_cart("<b>Bold</b>", "Ksh 10").await;

    assert!(!response.body.contains("<b>Bold</b>"));
    assert!(!app.get("/").await.body.contains("<b>Bold</b>"));
}

#[tokio::test]
async fn test_unknown_action_rejected() {
    let mut app = app().await;
    let response = app
        .htmx_post("/cart/actions", &[("action", "explode")])
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app.htmx_post("/cart/actions", &[]).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_items_fragment() {
    let mut app = app().await;
    assert!(app.get("/cart/items").await.body.contains("Your cart is empty."));

    app.add_to_cart("Soapstone Bowl", "Ksh 1,800").await;
    let body = app.get("/cart/items").await.body;
    assert!(body.contains("id=\"cart-items\""));
    assert!(body.contains("Soapstone Bowl"));
    assert!(body.contains("name=\"index\" value=\"0\""));
}

// =============================================================================
// Sidebar
// =============================================================================

#[tokio::test]
async fn test_sidebar_state_survives_page_loads() {
    let mut app = app().await;

    let opened = app
        .htmx_post("/cart/actions", &[("action", "open"), ("via", "cart_icon")])
        .await;
    assert!(opened.body.contains("cart-sidebar open"));
    assert!(app.get("/").await.body.contains("cart-sidebar open"));

    let closed = app
        .htmx_post("/cart/actions", &[("action", "close"), ("via", "overlay")])
        .await;
    assert!(!closed.body.contains("cart-sidebar open"));
    assert!(!app.get("/").await.body.contains("cart-sidebar open"));
}

// =============================================================================
// Plain form posts
// =============================================================================

#[tokio::test]
async fn test_form_post_redirects_and_flashes_toast() {
    let mut app = app().await;

    let response = app
        .post_form(
            "/cart/actions",
            &[("action", "add"), ("name", "Kiondo Basket"), ("price", "Ksh 2,450.50")],
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), Some("/"));

    let page = app.get("/").await.body;
    assert!(page.contains("Kiondo Basket added to cart"));
    assert!(page.contains("Ksh 2,450.5"));

    // Shown once
    assert!(!app.get("/").await.body.contains("added to cart"));
}

#[tokio::test]
async fn test_sessions_are_per_browser() {
    let endpoint = FakeOrderEndpoint::unreachable().await;
    let mut alice = TestApp::new(&endpoint);
    alice.add_to_cart("Leso Wrap", "Ksh 450").await;

    // Separate driver and session store: another browser
    let mut bob = TestApp::new(&endpoint);
    assert_eq!(bob.cart_count().await, 0);
    assert_eq!(alice.cart_count().await, 1);
}
