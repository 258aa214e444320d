//! Order querying: filters, pagination, and the listing service.

pub mod filter;
pub mod listing;

pub use filter::{OrderQuery, OrderSort, Page, Pagination, TotalBucket};
pub use listing::{OrderService, OrderSummary};
