//! Cart aggregate: types and store-backed operations.

pub mod cart;
pub mod service;

pub use cart::{Cart, CartItem};
pub use service::{CartLine, CartService, CartView};
