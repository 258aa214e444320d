//! Image assets and the blob-storage seam.

use crate::error::CommerceError;
use crate::ids::MediaId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

/// A stored image asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAsset {
    /// Unique asset identifier.
    pub id: MediaId,
    /// Storage path the asset was uploaded under.
    pub path: String,
    /// Public URL returned by the blob store.
    pub url: String,
    /// Alt text.
    pub alt: Option<String>,
}

/// Blob/object storage collaborator.
///
/// The commerce core only ever uploads and deletes image assets through
/// this seam; the backing implementation is out of scope.
pub trait BlobStore: Send + Sync {
    /// Store bytes under a path, returning the public URL.
    fn put(&self, path: &str, bytes: &[u8]) -> Result<String, CommerceError>;
    /// Delete the blob at a path.
    fn delete(&self, path: &str) -> Result<(), CommerceError>;
}

/// In-memory blob store for tests and local development.
#[derive(Default)]
pub struct InMemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        match self.blobs.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl BlobStore for InMemoryBlobStore {
    fn put(&self, path: &str, bytes: &[u8]) -> Result<String, CommerceError> {
        self.lock().insert(path.to_string(), bytes.to_vec());
        Ok(format!("blob://{path}"))
    }

    fn delete(&self, path: &str) -> Result<(), CommerceError> {
        self.lock().remove(path);
        Ok(())
    }
}
