//! Integration test support for Duka.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p duka-integration-tests
//! ```
//!
//! No external services are needed. [`TestApp`] drives the real storefront
//! router in-process and carries the session cookie between requests like a
//! browser would. [`FakeOrderEndpoint`] stands in for the remote order API.
//!
//! # Test Categories
//!
//! - `storefront_cart` - Cart widget over HTTP (HTMX and plain form posts)
//! - `checkout_flow` - Order submission against the fake endpoint

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Method, Request, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use duka_storefront::catalog::Catalog;
use duka_storefront::config::{OrderEndpointConfig, StorefrontConfig};
use duka_storefront::middleware::SESSION_COOKIE_NAME;
use duka_storefront::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;
use url::Url;

/// Message the fake endpoint returns on success.
pub const ACCEPTED_MESSAGE: &str = "Order saved successfully!";

// =============================================================================
// Fake order endpoint
// =============================================================================

/// How the fake endpoint answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// 200 with `{"message": ACCEPTED_MESSAGE}`.
    Accept,
    /// The given status with a plain-text body.
    Status(u16),
    /// 200 with a body that isn't JSON.
    Garbage,
}

#[derive(Clone)]
struct EndpointState {
    reply: Reply,
    received: Arc<Mutex<Vec<Value>>>,
}

/// A local HTTP server that records every order POSTed to it.
pub struct FakeOrderEndpoint {
    url: Url,
    received: Arc<Mutex<Vec<Value>>>,
}

impl FakeOrderEndpoint {
    /// Start an endpoint on a random local port.
    pub async fn spawn(reply: Reply) -> Self {
        let received = Arc::new(Mutex::new(Vec::new()));
        let router = Router::new()
            .route("/api/order", post(receive_order))
            .with_state(EndpointState {
                reply,
                received: Arc::clone(&received),
            });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            url: order_url(addr),
            received,
        }
    }

    /// An address nothing is listening on.
    pub async fn unreachable() -> Url {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        order_url(addr)
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Every order body received so far.
    #[must_use]
    pub fn received(&self) -> Vec<Value> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

fn order_url(addr: SocketAddr) -> Url {
    Url::parse(&format!("http://{addr}/api/order")).unwrap()
}

async fn receive_order(State(state): State<EndpointState>, Json(order): Json<Value>) -> Response {
    state
        .received
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(order);

    match state.reply {
        Reply::Accept => Json(json!({ "message": ACCEPTED_MESSAGE })).into_response(),
        Reply::Status(code) => (
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            "order store unavailable",
        )
            .into_response(),
        Reply::Garbage => "<html>maintenance</html>".into_response(),
    }
}

// =============================================================================
// Storefront driver
// =============================================================================

/// A response with its body collected.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// A header value as text.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// The storefront router plus one browser's session cookie.
pub struct TestApp {
    router: Router,
    cookie: Option<String>,
}

impl TestApp {
    /// Storefront with the built-in catalog, submitting orders to `endpoint`.
    #[must_use]
    pub fn new(endpoint: &Url) -> Self {
        Self::with_catalog(endpoint, Catalog::builtin())
    }

    #[must_use]
    pub fn with_catalog(endpoint: &Url, catalog: Catalog) -> Self {
        let state = AppState::new(test_config(endpoint), catalog).unwrap();
        Self {
            router: duka_storefront::app(state),
            cookie: None,
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, false).await
    }

    /// Plain form post, as a browser without htmx would send it.
    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        self.send(Method::POST, uri, Some(encode(fields)), false).await
    }

    /// Form post issued by htmx.
    pub async fn htmx_post(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        self.send(Method::POST, uri, Some(encode(fields)), true).await
    }

    /// Add a product through the cart action endpoint.
    pub async fn add_to_cart(&mut self, name: &str, price_text: &str) -> TestResponse {
        self.htmx_post(
            "/cart/actions",
            &[("action", "add"), ("name", name), ("price", price_text)],
        )
        .await
    }

    /// Current cart count badge value.
    pub async fn cart_count(&mut self) -> u64 {
        let body = self.get("/cart/count").await.body;
        body.rsplit_once("\">")
            .and_then(|(_, rest)| rest.split_once('<'))
            .and_then(|(count, _)| count.trim().parse().ok())
            .unwrap()
    }

    async fn send(
        &mut self,
        method: Method,
        uri: &str,
        form: Option<String>,
        htmx: bool,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        if htmx {
            builder = builder.header("HX-Request", "true");
        }
        let body = match form {
            Some(form) => {
                builder = builder.header(
                    header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                );
                Body::from(form)
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        self.remember_cookie(response.headers());

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec()).unwrap(),
        }
    }

    fn remember_cookie(&mut self, headers: &HeaderMap) {
        let prefix = format!("{SESSION_COOKIE_NAME}=");
        if let Some(pair) = headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| v.split(';').next())
            .find(|pair| pair.starts_with(&prefix))
        {
            self.cookie = Some(pair.to_string());
        }
    }
}

fn test_config(endpoint: &Url) -> StorefrontConfig {
    StorefrontConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        store_name: "Duka".to_string(),
        catalog_path: None,
        orders: OrderEndpointConfig {
            url: endpoint.clone(),
            api_token: None,
            timeout: Duration::from_secs(5),
        },
        sentry_dsn: None,
    }
}

fn encode(fields: &[(&str, &str)]) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish()
}
