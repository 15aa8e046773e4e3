//! Cart export summary.

use std::path::Path;

use duka_core::{Cart, Price};
use thiserror::Error;

/// Errors from `cart total`.
#[derive(Debug, Error)]
pub enum TotalError {
    #[error("Failed to read cart file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a cart export: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Item count and total of one cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartSummary {
    pub lines: usize,
    pub items: u64,
    pub total: Price,
}

/// Decode a cart export with the same rules the storefront uses.
///
/// # Errors
///
/// Returns an error if the text is not a JSON array of cart entries.
pub fn summarize(raw: &str) -> Result<CartSummary, serde_json::Error> {
    let cart: Cart = serde_json::from_str(raw)?;
    Ok(CartSummary {
        lines: cart.len(),
        items: cart.item_count(),
        total: cart.total(),
    })
}

/// Run `cart total`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded.
pub fn total(file: &Path) -> Result<(), TotalError> {
    let raw = std::fs::read_to_string(file)?;
    let summary = summarize(&raw)?;

    tracing::info!("Lines: {}", summary.lines);
    tracing::info!("Items: {}", summary.items);
    tracing::info!("Total: Ksh {}", summary.total.display());
    Ok(())
}
