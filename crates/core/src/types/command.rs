//! Cart widget commands and sidebar state.
//!
//! Every interaction with the widget arrives as an `action` key plus a few
//! optional form fields. [`CartCommand::from_action`] is the dispatch table
//! that turns that into a typed command.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::cart::DEFAULT_PRODUCT_NAME;
use super::price::Price;

/// Errors turning an action key into a command.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown cart action: {0}")]
    UnknownAction(String),
    #[error("unknown sidebar trigger: {0}")]
    UnknownTrigger(String),
}

/// Raw fields that may accompany an action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ActionFields {
    /// Product name (add).
    #[serde(default)]
    pub name: Option<String>,
    /// Product display price text (add).
    #[serde(default)]
    pub price: Option<String>,
    /// Line index as text (remove).
    #[serde(default)]
    pub index: Option<String>,
    /// Which element triggered a sidebar action.
    #[serde(default)]
    pub via: Option<String>,
}

/// A typed cart widget command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartCommand {
    /// Add one unit of a product.
    Add { name: String, price: Price },
    /// Remove the line at a textual index.
    Remove { index: String },
    /// Open or close the sidebar.
    Sidebar(SidebarTrigger),
}

impl CartCommand {
    /// Build a command from an action key and its fields.
    ///
    /// | action   | fields used       |
    /// |----------|-------------------|
    /// | `add`    | `name`, `price`   |
    /// | `remove` | `index`           |
    /// | `open`   | `via` (optional)  |
    /// | `close`  | `via` (optional)  |
    ///
    /// Missing fields are coerced rather than rejected: a blank name becomes
    /// `"Product"`, missing price text becomes zero, a missing index is an
    /// empty string (which removes nothing).
    ///
    /// # Errors
    ///
    /// Returns an error for an unrecognised action or trigger.
    pub fn from_action(action: &str, fields: ActionFields) -> Result<Self, CommandError> {
        match action.trim() {
            "add" => {
                let name = fields
                    .name
                    .map(|n| n.trim().to_owned())
                    .filter(|n| !n.is_empty())
                    .unwrap_or_else(|| DEFAULT_PRODUCT_NAME.to_owned());
                let price = Price::parse_lenient(fields.price.as_deref().unwrap_or("0").trim());
                Ok(Self::Add { name, price })
            }
            "remove" => Ok(Self::Remove {
                index: fields.index.unwrap_or_default(),
            }),
            "open" => {
                let trigger = SidebarTrigger::parse(fields.via.as_deref(), SidebarTrigger::CartIcon)?;
                Ok(Self::Sidebar(trigger))
            }
            "close" => {
                let trigger =
                    SidebarTrigger::parse(fields.via.as_deref(), SidebarTrigger::CloseButton)?;
                Ok(Self::Sidebar(trigger))
            }
            other => Err(CommandError::UnknownAction(other.to_owned())),
        }
    }
}

/// The elements that toggle the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SidebarTrigger {
    /// The cart icon in the header.
    CartIcon,
    /// The explicit close button inside the panel.
    CloseButton,
    /// The dimmed background behind the panel.
    Overlay,
}

impl SidebarTrigger {
    fn parse(via: Option<&str>, default: Self) -> Result<Self, CommandError> {
        match via.map(str::trim) {
            None | Some("") => Ok(default),
            Some("cart_icon" | "icon") => Ok(Self::CartIcon),
            Some("close_button" | "close") => Ok(Self::CloseButton),
            Some("overlay") => Ok(Self::Overlay),
            Some(other) => Err(CommandError::UnknownTrigger(other.to_owned())),
        }
    }

    /// The action this trigger performs.
    #[must_use]
    pub const fn action(self) -> SidebarAction {
        match self {
            Self::CartIcon => SidebarAction::Open,
            Self::CloseButton | Self::Overlay => SidebarAction::Close,
        }
    }
}

/// What a sidebar trigger does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarAction {
    Open,
    Close,
}

/// Visibility of the sidebar panel and its overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SidebarState {
    Open,
    #[default]
    Closed,
}

impl SidebarState {
    /// Apply a trigger. Close triggers all land on [`SidebarState::Closed`].
    #[must_use]
    pub const fn apply(self, trigger: SidebarTrigger) -> Self {
        match trigger.action() {
            SidebarAction::Open => Self::Open,
            SidebarAction::Close => Self::Closed,
        }
    }

    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}
