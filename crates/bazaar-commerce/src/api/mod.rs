//! The operation boundary: validated requests, uniform responses, and
//! the assembled storefront facade.

pub mod facade;
pub mod request;
pub mod response;

pub use facade::Commerce;
pub use request::{CommerceRequest, RuleSpec};
pub use response::ApiResponse;
