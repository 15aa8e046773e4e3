//! Order snapshots submitted at checkout.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::cart::{Cart, CartEntry};
use super::price::Price;

/// Errors building an [`Order`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// There is nothing to order.
    #[error("Your cart is empty!")]
    EmptyCart,
}

/// Buyer-supplied details from the checkout form.
///
/// Stored exactly as typed; nothing here is validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyerDetails {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
}

/// A one-time snapshot of the cart plus buyer details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub name: String,
    pub email: String,
    pub address: String,
    pub items: Vec<CartEntry>,
    pub total: Price,
    #[serde(with = "iso_millis")]
    pub date: DateTime<Utc>,
}

impl Order {
    /// Snapshot `cart` for submission at `date`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::EmptyCart`] if the cart has no entries.
    pub fn snapshot(
        buyer: BuyerDetails,
        cart: &Cart,
        date: DateTime<Utc>,
    ) -> Result<Self, OrderError> {
        if cart.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        Ok(Self {
            name: buyer.name,
            email: buyer.email,
            address: buyer.address,
            items: cart.entries().to_vec(),
            total: cart.total(),
            date,
        })
    }

    /// The submission timestamp as sent on the wire.
    #[must_use]
    pub fn date_string(&self) -> String {
        self.date.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Response body from the order endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    /// Human-readable confirmation shown to the buyer.
    pub message: String,
}

/// RFC 3339 timestamps with millisecond precision and a `Z` suffix.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let text = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&text)
            .map(|d| d.with_timezone(&Utc))
            .map_err(D::Error::custom)
    }
}
