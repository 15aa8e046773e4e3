//! Transient toast notifications.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// A fire-and-forget message shown briefly, then faded out.
///
/// Several may be on screen at once; they stack in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
}

impl Notification {
    /// How long a toast stays fully visible.
    pub const VISIBLE_FOR: Duration = Duration::from_millis(1400);
    /// Length of the fade-out after [`Self::VISIBLE_FOR`].
    pub const FADE_FOR: Duration = Duration::from_millis(400);

    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// "`<name>` added to cart"
    #[must_use]
    pub fn added(name: &str) -> Self {
        Self::new(format!("{name} added to cart"))
    }

    /// "Item removed"
    #[must_use]
    pub fn removed() -> Self {
        Self::new("Item removed")
    }

    /// Total time on screen, fade included.
    #[must_use]
    pub const fn lifetime() -> Duration {
        Self::VISIBLE_FOR.saturating_add(Self::FADE_FOR)
    }
}
