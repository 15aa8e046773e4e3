//! Domain types for the storefront cart.

pub mod cart;
pub mod command;
pub mod notification;
pub mod order;
pub mod price;

pub use cart::{Cart, CartEntry, DEFAULT_PRODUCT_NAME};
pub use command::{
    ActionFields, CartCommand, CommandError, SidebarAction, SidebarState, SidebarTrigger,
};
pub use notification::Notification;
pub use order::{BuyerDetails, Order, OrderError, OrderReceipt};
pub use price::Price;
