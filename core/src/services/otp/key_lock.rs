//! Per-key async mutual exclusion

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// A set of async locks addressed by string key.
///
/// Entries exist only while some task holds or waits on them.
#[derive(Debug, Default)]
pub struct KeyedLock {
    entries: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

/// Holds the lock for one key until dropped
pub struct KeyedLockGuard {
    key: String,
    entries: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl KeyedLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `key`
    pub async fn acquire(&self, key: &str) -> KeyedLockGuard {
        let slot = {
            let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            entries
                .entry(key.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };

        let guard = slot.lock_owned().await;

        KeyedLockGuard {
            key: key.to_string(),
            entries: Arc::clone(&self.entries),
            guard: Some(guard),
        }
    }

    /// Number of keys currently held or awaited
    pub fn active_keys(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl Drop for KeyedLockGuard {
    fn drop(&mut self) {
        // Release first so the strong count below only sees the map and waiters
        self.guard.take();

        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(slot) = entries.get(&self.key) {
            if Arc::strong_count(slot) == 1 {
                entries.remove(&self.key);
            }
        }
    }
}
