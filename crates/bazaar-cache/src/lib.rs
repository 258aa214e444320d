//! Query cache and revalidation signal for Bazaar.
//!
//! Every cacheable view in the system goes through this one module:
//! [`CacheKey`] enumerates the cache namespaces with their TTLs, and
//! [`Revalidator`] is the fire-and-forget path-based invalidation signal
//! sent after writes that change those views.

mod error;
mod key;
mod kv;
mod revalidate;

pub use error::CacheError;
pub use key::CacheKey;
pub use kv::QueryCache;
pub use revalidate::Revalidator;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{CacheError, CacheKey, QueryCache, Revalidator};
}
