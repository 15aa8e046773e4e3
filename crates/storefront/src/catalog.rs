//! Product catalog shown on the landing page.
//!
//! Product cards carry display price text (e.g. `Ksh 1,200`), not a number.
//! The add-to-cart form posts that text back and the cart parses it leniently,
//! so a card whose price text doesn't parse ends up in the cart at zero.
//! [`Catalog::unparseable`] lists those cards for auditing.

use std::path::Path;
use std::sync::Arc;

use duka_core::Price;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while loading a catalog file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog has no products")]
    Empty,
}

/// One product card.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductCard {
    pub name: String,
    /// Price exactly as displayed on the card.
    #[serde(rename = "price")]
    pub price_text: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Path under `/static`.
    #[serde(default)]
    pub image: Option<String>,
}

impl ProductCard {
    /// The price the cart will record when this card is added.
    #[must_use]
    pub fn price(&self) -> Price {
        Price::parse_lenient(&self.price_text)
    }
}

/// The full set of product cards, cheap to clone.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Arc<Vec<ProductCard>>,
}

impl Catalog {
    /// Load a catalog from a JSON array of product cards.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a JSON array of
    /// product cards, or is empty.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&raw)?;
        tracing::info!(path = %path.display(), products = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    /// Parse a catalog from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a non-empty JSON array of cards.
    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let products: Vec<ProductCard> = serde_json::from_str(raw)?;
        if products.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self::new(products))
    }

    /// Load from `path` if given, otherwise use the built-in catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is given and fails to load.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self, CatalogError> {
        path.map_or_else(|| Ok(Self::builtin()), Self::load)
    }

    #[must_use]
    pub fn new(products: Vec<ProductCard>) -> Self {
        Self {
            products: Arc::new(products),
        }
    }

    /// The default product list.
    #[must_use]
    pub fn builtin() -> Self {
        let card = |name: &str, price: &str, description: &str| ProductCard {
            name: name.to_string(),
            price_text: price.to_string(),
            description: Some(description.to_string()),
            image: None,
        };

        Self::new(vec![
            card("Kikoi Beach Towel", "Ksh 1,200", "Hand-woven cotton, striped."),
            card("Maasai Shuka", "Ksh 950", "Checked wool blanket."),
            card("Kiondo Basket", "Ksh 2,450.50", "Sisal and leather handles."),
            card("Leso Wrap", "Ksh 450", "Printed cotton with a proverb."),
            card("Soapstone Bowl", "Ksh 1,800", "Carved in Kisii."),
            card("Kenyan AA Coffee 500g", "Ksh 1,150", "Single origin, medium roast."),
        ])
    }

    #[must_use]
    pub fn products(&self) -> &[ProductCard] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Cards whose price text would be recorded as zero.
    pub fn unparseable(&self) -> impl Iterator<Item = &ProductCard> {
        self.products
            .iter()
            .filter(|card| !Price::is_parseable(&card.price_text))
    }
}
