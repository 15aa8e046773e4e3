//! Order submission client.
//!
//! Sends one JSON POST per checkout to the configured order endpoint and
//! expects a JSON body with a human-readable `message`.

use std::future::Future;

use duka_core::{Order, OrderReceipt};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;
use url::Url;

use crate::config::OrderEndpointConfig;

/// Errors that can occur when submitting an order.
#[derive(Debug, Error)]
pub enum OrderClientError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body was not the expected JSON.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Client could not be configured.
    #[error("Client configuration error: {0}")]
    Config(String),
}

/// Anything that can deliver an order and return the endpoint's receipt.
pub trait OrderSubmitter: Send + Sync {
    /// Submit `order` exactly once.
    fn submit(
        &self,
        order: &Order,
    ) -> impl Future<Output = Result<OrderReceipt, OrderClientError>> + Send;
}

/// HTTP client for the remote order endpoint.
#[derive(Clone, Debug)]
pub struct OrderClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl OrderClient {
    /// Create a new order client.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &OrderEndpointConfig) -> Result<Self, OrderClientError> {
        let mut headers = HeaderMap::new();

        if let Some(token) = &config.api_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| OrderClientError::Config(format!("Invalid API token format: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.url.clone(),
        })
    }

    /// The URL orders are sent to.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl OrderSubmitter for OrderClient {
    #[tracing::instrument(skip_all, fields(endpoint = %self.endpoint, items = order.items.len()))]
    async fn submit(&self, order: &Order) -> Result<OrderReceipt, OrderClientError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(order)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OrderClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let receipt: OrderReceipt =
            serde_json::from_str(&body).map_err(|e| OrderClientError::Parse(e.to_string()))?;

        tracing::info!(status = status.as_u16(), "Order accepted");
        Ok(receipt)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use secrecy::SecretString;

    use super::*;

    fn config(token: Option<&str>) -> OrderEndpointConfig {
        OrderEndpointConfig {
            url: Url::parse("http://127.0.0.1:9/api/order").unwrap(),
            api_token: token.map(SecretString::from),
            timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn test_new_without_token() {
        let client = OrderClient::new(&config(None)).unwrap();
        assert_eq!(client.endpoint().path(), "/api/order");
    }

    #[test]
    fn test_new_rejects_unprintable_token() {
        let err = OrderClient::new(&config(Some("bad\ntoken"))).unwrap_err();
        assert!(matches!(err, OrderClientError::Config(_)));
    }

    #[test]
    fn test_error_display() {
        let err = OrderClientError::Api {
            status: 503,
            message: "down".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 503 - down");
    }
}
