//! Fire-and-forget revalidation signal.

use crate::QueryCache;

/// Path-based cache invalidation signal.
///
/// Sent after writes that change cached views (e.g. after an order is
/// placed). Best-effort: failures never propagate back into the write
/// that triggered the signal.
#[derive(Clone)]
pub struct Revalidator {
    cache: QueryCache,
}

impl Revalidator {
    /// Create a revalidator over a cache.
    pub fn new(cache: QueryCache) -> Self {
        Self { cache }
    }

    /// Invalidate every cached entry under the given path prefixes.
    pub fn revalidate(&self, paths: &[String]) {
        for path in paths {
            let dropped = self.cache.invalidate_prefix(path);
            tracing::debug!(%path, dropped, "revalidated cache path");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_revalidate_drops_matching_paths() {
        let cache = QueryCache::new();
        cache
            .set_path("orders/user/u1?page=1", Duration::from_secs(60), &"a")
            .unwrap();
        cache
            .set_path("orders/user/u2?page=1", Duration::from_secs(60), &"b")
            .unwrap();

        let revalidator = Revalidator::new(cache.clone());
        revalidator.revalidate(&["orders/user/u1".to_string()]);

        let dropped: Option<String> = cache.get_path("orders/user/u1?page=1").unwrap();
        assert!(dropped.is_none());
        let kept: Option<String> = cache.get_path("orders/user/u2?page=1").unwrap();
        assert_eq!(kept, Some("b".to_string()));
    }
}
