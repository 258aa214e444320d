//! In-memory query cache with per-entry TTL.

use crate::{CacheError, CacheKey};
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

struct Entry {
    json: String,
    expires_at: Instant,
}

/// Type-safe query cache.
///
/// Values are JSON-encoded so any `Serialize`/`DeserializeOwned` type
/// can be cached. Cheap to clone; clones share the same entries.
#[derive(Clone)]
pub struct QueryCache {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
}

impl QueryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Get a value stored under a declared key.
    ///
    /// Returns `None` on miss or expiry.
    pub fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Result<Option<T>, CacheError> {
        self.get_path(&key.path())
    }

    /// Store a value under a declared key with that key's default TTL.
    pub fn set<T: Serialize>(&self, key: &CacheKey, value: &T) -> Result<(), CacheError> {
        self.set_path(&key.path(), key.ttl(), value)
    }

    /// Get a value stored under an exact path.
    pub fn get_path<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, CacheError> {
        let mut entries = self.lock();
        match entries.get(path) {
            Some(entry) if entry.expires_at > Instant::now() => {
                let value: T = serde_json::from_str(&entry.json)?;
                Ok(Some(value))
            }
            Some(_) => {
                entries.remove(path);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Store a value under an exact path with an explicit TTL.
    pub fn set_path<T: Serialize>(
        &self,
        path: &str,
        ttl: Duration,
        value: &T,
    ) -> Result<(), CacheError> {
        let json = serde_json::to_string(value)?;
        self.lock().insert(
            path.to_string(),
            Entry {
                json,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    /// Drop every entry whose path starts with the given prefix.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate_prefix(&self, prefix: &str) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|path, _| !path.starts_with(prefix));
        before - entries.len()
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Entry>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let cache = QueryCache::new();
        let key = CacheKey::OrderList {
            user_id: "u1".into(),
        };
        cache.set(&key, &vec![1, 2, 3]).unwrap();
        let got: Option<Vec<i64>> = cache.get(&key).unwrap();
        assert_eq!(got, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_miss_returns_none() {
        let cache = QueryCache::new();
        let got: Option<String> = cache.get_path("orders/user/nobody").unwrap();
        assert!(got.is_none());
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let cache = QueryCache::new();
        cache
            .set_path("orders/user/u1", Duration::ZERO, &"stale")
            .unwrap();
        let got: Option<String> = cache.get_path("orders/user/u1").unwrap();
        assert!(got.is_none());
    }

    #[test]
    fn test_invalidate_prefix() {
        let cache = QueryCache::new();
        cache
            .set_path("orders/user/u1?page=1", Duration::from_secs(60), &"a")
            .unwrap();
        cache
            .set_path("orders/user/u1?page=2", Duration::from_secs(60), &"b")
            .unwrap();
        cache
            .set_path("products/shared", Duration::from_secs(60), &"c")
            .unwrap();

        assert_eq!(cache.invalidate_prefix("orders/user/u1"), 2);
        let kept: Option<String> = cache.get_path("products/shared").unwrap();
        assert_eq!(kept, Some("c".to_string()));
    }
}
