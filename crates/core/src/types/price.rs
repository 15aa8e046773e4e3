//! Shilling prices with lenient parsing and storefront formatting.
//!
//! Prices reach the cart from product-card display text such as `"Ksh 1,199"`.
//! Parsing never fails: anything that does not yield a number is treated as
//! zero. Prices are serialized as plain JSON numbers so stored carts and order
//! payloads stay readable by non-Rust consumers.

use core::fmt;
use core::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A unit price or total in Kenyan shillings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// The zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// The largest representable amount. Arithmetic saturates here.
    pub const MAX: Self = Self(Decimal::MAX);

    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Returns the underlying amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Parse display text leniently.
    ///
    /// Commas are dropped, then every character that is not an ASCII digit or
    /// a dot followed by a digit. The longest leading numeric run of what
    /// remains is parsed, so `"Ksh 1,199.50"` is `1199.50`, `"Ksh. 500"` is
    /// `500` and `"1.2.3"` is `1.2`. Text with no usable digits yields
    /// [`Price::ZERO`].
    ///
    /// ```
    /// use duka_core::Price;
    ///
    /// assert_eq!(Price::parse_lenient("Ksh 1,199").to_string(), "1199");
    /// assert_eq!(Price::parse_lenient("call us"), Price::ZERO);
    /// ```
    #[must_use]
    pub fn parse_lenient(text: &str) -> Self {
        let without_commas: Vec<char> = text.chars().filter(|c| *c != ',').collect();
        // A dot only counts as a decimal point when a digit follows it, so the
        // abbreviation dot in "Ksh. 500" is dropped with the letters.
        let cleaned: String = without_commas
            .iter()
            .enumerate()
            .filter(|&(i, c)| {
                c.is_ascii_digit()
                    || (*c == '.'
                        && without_commas
                            .get(i + 1)
                            .is_some_and(char::is_ascii_digit))
            })
            .map(|(_, c)| *c)
            .collect();

        let mut seen_dot = false;
        let numeric: String = cleaned
            .chars()
            .take_while(|c| {
                if *c == '.' {
                    if seen_dot {
                        return false;
                    }
                    seen_dot = true;
                }
                true
            })
            .collect();

        let numeric = numeric.trim_end_matches('.');
        if numeric.is_empty() {
            return Self::ZERO;
        }

        let candidate = if numeric.starts_with('.') {
            format!("0{numeric}")
        } else {
            numeric.to_owned()
        };

        Decimal::from_str(&candidate).map_or(Self::ZERO, Self)
    }

    /// Returns `true` if display text parses to a non-zero price.
    #[must_use]
    pub fn is_parseable(text: &str) -> bool {
        !Self::parse_lenient(text).0.is_zero()
    }

    /// Multiply by a line quantity, saturating at [`Price::MAX`].
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        self.0
            .checked_mul(Decimal::from(quantity))
            .map_or_else(|| self.saturated(), Self)
    }

    /// Add two amounts, saturating at [`Price::MAX`].
    #[must_use]
    pub fn saturating_add(self, other: Self) -> Self {
        self.0
            .checked_add(other.0)
            .map_or_else(|| self.saturated(), Self)
    }

    // Overflow keeps the sign of the operand that overflowed.
    const fn saturated(self) -> Self {
        if self.0.is_sign_negative() {
            Self(Decimal::MIN)
        } else {
            Self::MAX
        }
    }

    /// Format with thousands separators and at most two decimals.
    ///
    /// Trailing zeros are dropped: `1199` renders as `1,199` and `1199.5`
    /// as `1,199.5`.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .normalize();
        let text = rounded.abs().to_string();
        let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));

        let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (int_part.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        if frac_part.is_empty() {
            format!("{sign}{grouped}")
        } else {
            format!("{sign}{grouped}.{frac_part}")
        }
    }

    /// Format with exactly two decimals and no grouping (`1199.00`).
    #[must_use]
    pub fn fixed(&self) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{rounded:.2}")
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl core::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let normalized = self.0.normalize();
        if normalized.fract().is_zero()
            && let Some(whole) = normalized.to_i64()
        {
            return serializer.serialize_i64(whole);
        }
        serializer.serialize_f64(normalized.to_f64().unwrap_or_default())
    }
}

impl<'de> Deserialize<'de> for Price {
    /// Accepts a JSON number, or a string run through [`Price::parse_lenient`].
    /// Any other value decodes as zero.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(match value {
            serde_json::Value::Number(n) => {
                let text = n.to_string();
                Decimal::from_str(&text)
                    .or_else(|_| Decimal::from_scientific(&text))
                    .map_or_else(|_| out_of_range(&n), Self)
            }
            serde_json::Value::String(s) => Self::parse_lenient(&s),
            _ => Self::ZERO,
        })
    }
}

/// A number too large for `Decimal` (a saturated total written back as a
/// float) decodes as the matching bound rather than zero.
fn out_of_range(n: &serde_json::Number) -> Price {
    match n.as_f64() {
        Some(f) if f.is_finite() && f >= 1e28 => Price::MAX,
        Some(f) if f.is_finite() && f <= -1e28 => Price(Decimal::MIN),
        _ => Price::ZERO,
    }
}
