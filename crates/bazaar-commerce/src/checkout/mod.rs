//! Checkout: addresses, orders, and the placement transaction.

pub mod address;
pub mod order;
pub mod placement;

pub use address::Address;
pub use order::{Order, OrderItem, OrderStatus};
pub use placement::{CheckoutForm, CheckoutService};
