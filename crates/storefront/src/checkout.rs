//! Checkout flow: order summary and guarded submission.
//!
//! Submission is a straight line: load the cart, refuse if empty, snapshot
//! an [`Order`], send it once, clear the cart on success. A failure at any
//! step after the snapshot leaves the stored cart exactly as it was.

use chrono::{DateTime, Utc};
use duka_core::{BuyerDetails, Cart, Order, OrderError, OrderReceipt};
use thiserror::Error;

use crate::services::{OrderClientError, OrderSubmitter};
use crate::store::{CartStore, StorageError};

/// Shown when submission fails for any remote reason.
pub const SUBMISSION_FAILED_MESSAGE: &str = "Failed to save order. Please try again.";

/// Errors from [`submit`].
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to order; no request was made.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// The order endpoint could not be reached or answered badly.
    #[error("Order submission failed: {0}")]
    Submission(#[from] OrderClientError),

    /// The cart store failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl CheckoutError {
    /// Message suitable for showing to the buyer.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Order(err) => err.to_string(),
            Self::Submission(_) | Self::Storage(_) => SUBMISSION_FAILED_MESSAGE.to_string(),
        }
    }

    /// Returns `true` if the cart was empty.
    #[must_use]
    pub const fn is_empty_cart(&self) -> bool {
        matches!(self, Self::Order(OrderError::EmptyCart))
    }
}

/// One line of the order summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    pub name: String,
    /// Unit price as stored (`1199.5`, not `1,199.5`).
    pub price: String,
    pub quantity: u32,
    /// Price × quantity, two decimals.
    pub subtotal: String,
}

/// The order summary shown above the buyer form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSummary {
    pub lines: Vec<SummaryLine>,
    /// Grand total, two decimals.
    pub total: String,
}

impl CheckoutSummary {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<&Cart> for CheckoutSummary {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart
                .entries()
                .iter()
                .map(|entry| SummaryLine {
                    name: entry.name.clone(),
                    price: entry.price.to_string(),
                    quantity: entry.quantity,
                    subtotal: entry.subtotal().fixed(),
                })
                .collect(),
            total: cart.total().fixed(),
        }
    }
}

/// Read the stored cart and build its summary.
///
/// # Errors
///
/// Returns an error if the store fails.
pub async fn load_summary(store: &impl CartStore) -> Result<CheckoutSummary, StorageError> {
    let cart = store.load().await?;
    Ok(CheckoutSummary::from(&cart))
}

/// Submit the stored cart as an order.
///
/// # Errors
///
/// - [`CheckoutError::Order`] if the cart is empty. No request is made.
/// - [`CheckoutError::Submission`] if the endpoint fails. The cart is kept.
/// - [`CheckoutError::Storage`] if loading or clearing the cart fails.
#[tracing::instrument(skip_all)]
pub async fn submit<S, O>(
    store: &S,
    submitter: &O,
    buyer: BuyerDetails,
    now: DateTime<Utc>,
) -> Result<OrderReceipt, CheckoutError>
where
    S: CartStore,
    O: OrderSubmitter,
{
    let cart = store.load().await?;
    let order = Order::snapshot(buyer, &cart, now)?;

    let receipt = match submitter.submit(&order).await {
        Ok(receipt) => receipt,
        Err(e) => {
            tracing::error!(error = %e, "Error saving order");
            return Err(e.into());
        }
    };

    store.clear().await?;
    tracing::info!(total = %order.total, lines = order.items.len(), "Order submitted, cart cleared");
    Ok(receipt)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use chrono::TimeZone;
    use duka_core::Price;
    use serde_json::json;

    use super::*;
    use crate::store::MemoryCartStore;

    /// Records calls and answers with a fixed outcome.
    struct FakeSubmitter {
        calls: AtomicUsize,
        fail: bool,
    }

    impl FakeSubmitter {
        fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail: true,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl OrderSubmitter for FakeSubmitter {
        async fn submit(&self, order: &Order) -> Result<OrderReceipt, OrderClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(OrderClientError::Parse("unexpected end of input".to_string()));
            }
            Ok(OrderReceipt {
                message: format!("Order for {} saved", order.name),
            })
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap()
    }

    fn buyer() -> BuyerDetails {
        BuyerDetails {
            name: "Otieno".to_string(),
            email: "otieno@example.test".to_string(),
            address: "Kisumu".to_string(),
        }
    }

    fn stocked_store() -> MemoryCartStore {
        MemoryCartStore::with_raw(json!([
            {"name": "Kiondo", "price": 1500, "quantity": 2},
            {"name": "Leso", "price": 450}
        ]))
    }

    #[tokio::test]
    async fn test_empty_cart_never_submits() {
        let store = MemoryCartStore::new();
        let submitter = FakeSubmitter::ok();

        let err = submit(&store, &submitter, buyer(), now()).await.unwrap_err();
        assert!(err.is_empty_cart());
        assert_eq!(err.user_message(), "Your cart is empty!");
        assert_eq!(submitter.calls(), 0);
    }

    #[tokio::test]
    async fn test_success_clears_cart() {
        let store = stocked_store();
        let submitter = FakeSubmitter::ok();

        let receipt = submit(&store, &submitter, buyer(), now()).await.unwrap();
        assert_eq!(receipt.message, "Order for Otieno saved");
        assert_eq!(submitter.calls(), 1);
        assert!(store.raw().is_none());
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failure_keeps_cart() {
        let store = stocked_store();
        let before = store.raw();
        let submitter = FakeSubmitter::failing();

        let err = submit(&store, &submitter, buyer(), now()).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Submission(_)));
        assert_eq!(err.user_message(), SUBMISSION_FAILED_MESSAGE);
        assert_eq!(submitter.calls(), 1);
        assert_eq!(store.raw(), before);
    }

    #[tokio::test]
    async fn test_summary_lines_and_total() {
        let store = stocked_store();
        let summary = load_summary(&store).await.unwrap();

        assert_eq!(summary.lines.len(), 2);
        assert_eq!(summary.lines[0].price, "1500");
        assert_eq!(summary.lines[0].quantity, 2);
        assert_eq!(summary.lines[0].subtotal, "3000.00");
        assert_eq!(summary.total, "3450.00");
    }

    #[tokio::test]
    async fn test_summary_of_empty_cart() {
        let summary = load_summary(&MemoryCartStore::new()).await.unwrap();
        assert!(summary.is_empty());
        assert_eq!(summary.total, Price::ZERO.fixed());
    }
}
