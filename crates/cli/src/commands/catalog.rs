//! Catalog audit.
//!
//! Product cards carry display price text; the cart parses it leniently and
//! records anything unreadable as zero. This command surfaces those cards
//! before a shopper finds them.

use std::path::PathBuf;

use duka_storefront::catalog::{Catalog, CatalogError};
use thiserror::Error;

/// Errors from `catalog check`.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Failed to load catalog: {0}")]
    Load(#[from] CatalogError),

    #[error("{0} product card(s) have price text that reads as zero")]
    Unpriced(usize),
}

/// Load the catalog the storefront would use.
///
/// An explicit path wins, then `STOREFRONT_CATALOG_PATH`, then the built-in list.
fn resolve(path: Option<PathBuf>) -> Result<Catalog, CatalogError> {
    dotenvy::dotenv().ok();

    let path = path.or_else(|| {
        std::env::var("STOREFRONT_CATALOG_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
    });

    if path.is_none() {
        tracing::info!("No catalog path given, checking the built-in catalog");
    }
    Catalog::load_or_builtin(path.as_deref())
}

/// Audit a loaded catalog, logging every card.
///
/// # Errors
///
/// Returns [`CheckError::Unpriced`] if any card's price reads as zero.
pub fn audit(catalog: &Catalog) -> Result<(), CheckError> {
    for card in catalog.products() {
        tracing::info!("{:<32} {:>14} -> Ksh {}", card.name, card.price_text, card.price().display());
    }

    let unpriced: Vec<_> = catalog.unparseable().collect();
    for card in &unpriced {
        tracing::warn!(
            "Unreadable price on '{}': {:?} will be added to carts at 0",
            card.name,
            card.price_text
        );
    }

    if unpriced.is_empty() {
        tracing::info!("All {} product cards have readable prices", catalog.len());
        Ok(())
    } else {
        Err(CheckError::Unpriced(unpriced.len()))
    }
}

/// Run `catalog check`.
///
/// # Errors
///
/// Returns an error if the catalog fails to load or fails the audit.
pub fn check(path: Option<PathBuf>) -> Result<(), CheckError> {
    let catalog = resolve(path)?;
    audit(&catalog)
}
