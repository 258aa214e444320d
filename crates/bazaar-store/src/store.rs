//! Transactional store over a cloneable database snapshot.

use crate::StoreError;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock, TryLockError};
use std::time::{Duration, Instant};

/// Store tuning knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Maximum time to wait for the writer gate before giving up.
    pub max_wait_ms: u64,
    /// Poll interval while waiting for the writer gate.
    pub poll_interval_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_wait_ms: 10_000,
            poll_interval_ms: 5,
        }
    }
}

/// A transactional store holding a single database snapshot.
///
/// Reads run under a shared lock against the committed snapshot.
/// Transactions acquire the exclusive lock (with a bounded wait), mutate
/// a working copy, and swap it in only on success. Writers therefore
/// execute serially and a failed transaction commits nothing.
pub struct Store<D> {
    inner: Arc<Inner<D>>,
}

struct Inner<D> {
    db: RwLock<D>,
    config: StoreConfig,
}

impl<D> Clone for Store<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D: Clone> Store<D> {
    /// Create a store seeded with an initial snapshot.
    pub fn new(db: D, config: StoreConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                db: RwLock::new(db),
                config,
            }),
        }
    }

    /// Run a read-only closure against the committed snapshot.
    pub fn read<T>(&self, f: impl FnOnce(&D) -> T) -> T {
        // Mutations only ever touch a working copy, so the committed
        // snapshot stays consistent even if a writer thread panicked.
        let guard = match self.inner.db.read() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&guard)
    }

    /// Run a closure as an atomic, serializable transaction.
    ///
    /// The closure receives a working copy of the database. If it
    /// returns `Ok`, the copy replaces the committed snapshot; if it
    /// returns `Err`, the copy is discarded and nothing is persisted.
    ///
    /// Fails with `StoreError::Timeout` if the writer gate cannot be
    /// acquired within `max_wait_ms`.
    pub fn transaction<T, E>(&self, f: impl FnOnce(&mut D) -> Result<T, E>) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let mut guard = self.acquire_writer()?;
        let mut working = guard.clone();
        let value = f(&mut working)?;
        *guard = working;
        Ok(value)
    }

    fn acquire_writer(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, D>, StoreError> {
        let deadline = Instant::now() + Duration::from_millis(self.inner.config.max_wait_ms);
        loop {
            match self.inner.db.try_write() {
                Ok(guard) => return Ok(guard),
                Err(TryLockError::Poisoned(poisoned)) => return Ok(poisoned.into_inner()),
                Err(TryLockError::WouldBlock) => {
                    if Instant::now() >= deadline {
                        tracing::warn!(
                            max_wait_ms = self.inner.config.max_wait_ms,
                            "gave up waiting for write transaction slot"
                        );
                        return Err(StoreError::Timeout(self.inner.config.max_wait_ms));
                    }
                    std::thread::sleep(Duration::from_millis(
                        self.inner.config.poll_interval_ms,
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Counter {
        value: i64,
    }

    #[test]
    fn test_transaction_commits_on_ok() {
        let store = Store::new(Counter::default(), StoreConfig::default());
        store
            .transaction(|db| {
                db.value += 5;
                Ok::<_, StoreError>(())
            })
            .unwrap();
        assert_eq!(store.read(|db| db.value), 5);
    }

    #[test]
    fn test_transaction_rolls_back_on_err() {
        let store = Store::new(Counter { value: 1 }, StoreConfig::default());
        let result = store.transaction(|db| {
            db.value = 99;
            Err::<(), _>(StoreError::RowNotFound("missing".into()))
        });
        assert!(result.is_err());
        assert_eq!(store.read(|db| db.value), 1);
    }

    #[test]
    fn test_concurrent_transactions_serialize() {
        let store = Store::new(Counter::default(), StoreConfig::default());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            handles.push(std::thread::spawn(move || {
                store
                    .transaction(|db| {
                        db.value += 1;
                        Ok::<_, StoreError>(())
                    })
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.read(|db| db.value), 8);
    }

    #[test]
    fn test_writer_gate_timeout() {
        let store = Store::new(
            Counter::default(),
            StoreConfig {
                max_wait_ms: 20,
                poll_interval_ms: 1,
            },
        );
        // Hold the exclusive lock from another thread past the deadline.
        let blocker = store.clone();
        let handle = std::thread::spawn(move || {
            blocker
                .transaction(|_db| {
                    std::thread::sleep(Duration::from_millis(150));
                    Ok::<_, StoreError>(())
                })
                .unwrap();
        });
        std::thread::sleep(Duration::from_millis(30));
        let result = store.transaction(|db| {
            db.value += 1;
            Ok::<_, StoreError>(())
        });
        assert!(matches!(result, Err(StoreError::Timeout(_))));
        handle.join().unwrap();
    }
}
