//! Cart state: one entry per distinct product name.
//!
//! The cart is a plain value. Loading it from and saving it to per-browser
//! storage is the caller's job; everything here is pure so the mutation rules
//! can be exercised without a storage backend.

use serde::{Deserialize, Deserializer, Serialize};

use super::price::Price;

/// Label used when a product card carries no name.
pub const DEFAULT_PRODUCT_NAME: &str = "Product";

/// One product line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    /// Product label. Unique within a cart.
    pub name: String,
    /// Unit price.
    #[serde(default)]
    pub price: Price,
    /// Number of units. Never zero.
    #[serde(default = "default_quantity", deserialize_with = "lenient_quantity")]
    pub quantity: u32,
}

impl CartEntry {
    /// Create a single-unit entry.
    #[must_use]
    pub fn new(name: impl Into<String>, price: Price) -> Self {
        Self {
            name: name.into(),
            price,
            quantity: 1,
        }
    }

    /// Price multiplied by quantity.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price.times(self.quantity)
    }
}

const fn default_quantity() -> u32 {
    1
}

/// Missing, zero, negative or non-numeric quantities decode as 1.
fn lenient_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    let quantity = match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 1.0)
                    .map(|f| {
                        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                        let whole = f.trunc() as u64;
                        whole
                    })
            })
            .map_or(1, |q| u32::try_from(q).unwrap_or(u32::MAX)),
        _ => 1,
    };
    Ok(quantity.max(1))
}

/// The persisted list of cart entries.
///
/// Serializes as a bare JSON array of entries. Decoding merges entries that
/// share a name (first position wins, quantities add up), so a cart read
/// back from storage always upholds the one-entry-per-name rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    entries: Vec<CartEntry>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a cart from raw entries, merging duplicate names.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = CartEntry>) -> Self {
        let mut cart = Self::new();
        for entry in entries {
            match cart.position(&entry.name) {
                Some(idx) => {
                    if let Some(existing) = cart.entries.get_mut(idx) {
                        existing.quantity = existing.quantity.saturating_add(entry.quantity);
                    }
                }
                None => cart.entries.push(entry),
            }
        }
        cart
    }

    /// Add one unit of a product.
    ///
    /// An existing entry with the same name gets its quantity bumped; its
    /// stored price is kept. Otherwise a new single-unit entry is appended.
    /// Returns the entry as it stands after the add.
    #[allow(clippy::indexing_slicing)] // idx is a valid position in both arms
    pub fn add(&mut self, name: impl Into<String>, price: Price) -> &CartEntry {
        let name = name.into();
        let idx = match self.position(&name) {
            Some(idx) => {
                let existing = &mut self.entries[idx];
                existing.quantity = existing.quantity.saturating_add(1);
                idx
            }
            None => {
                self.entries.push(CartEntry::new(name, price));
                self.entries.len() - 1
            }
        };
        &self.entries[idx]
    }

    /// Remove the entry at `index`, if there is one.
    pub fn remove(&mut self, index: usize) -> Option<CartEntry> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    /// Remove by an index that arrived as text (a form field).
    ///
    /// Integral text within bounds removes that entry; anything else
    /// (empty, fractional, negative, out of range) leaves the cart untouched.
    pub fn remove_at(&mut self, index: &str) -> Option<CartEntry> {
        parse_index(index).and_then(|idx| self.remove(idx))
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    /// Consume the cart, returning its entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<CartEntry> {
        self.entries
    }

    /// Sum of price × quantity over all entries, saturating at
    /// [`Price::MAX`].
    #[must_use]
    pub fn total(&self) -> Price {
        self.entries.iter().map(CartEntry::subtotal).sum()
    }

    /// Sum of quantities.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.quantity)).sum()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the cart has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<CartEntry>::deserialize(deserializer)?;
        Ok(Self::from_entries(entries))
    }
}

/// Parse a list index from form text.
fn parse_index(text: &str) -> Option<usize> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(idx) = text.parse::<usize>() {
        return Some(idx);
    }
    // "2.0" is still the integer 2
    let float = text.parse::<f64>().ok()?;
    if float.is_finite() && float >= 0.0 && float.fract() == 0.0 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let idx = float as usize;
        Some(idx)
    } else {
        None
    }
}
