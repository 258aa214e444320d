//! In-process transactional store for Bazaar.
//!
//! Provides a serializable-capable store over a cloneable database
//! snapshot type. Writers run one at a time against a working copy that
//! is swapped in only when the transaction closure succeeds, so a failed
//! transaction leaves no partial state behind.
//!
//! # Example
//!
//! ```rust,ignore
//! use bazaar_store::{Store, StoreConfig};
//!
//! let store = Store::new(Database::default(), StoreConfig::default());
//!
//! store.transaction(|db| {
//!     db.orders.insert(order.id.clone(), order);
//!     Ok::<_, StoreError>(())
//! })?;
//!
//! let count = store.read(|db| db.orders.len());
//! ```

mod error;
mod store;
mod table;

pub use error::StoreError;
pub use store::{Store, StoreConfig};
pub use table::Table;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Store, StoreConfig, StoreError, Table};
}
