use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockMap = HashMap<String, Arc<AsyncMutex<()>>>;

/// Per-stack exclusive locks; actions on the same stack queue behind each other
#[derive(Debug, Default)]
pub struct StackLocks {
    locks: Mutex<LockMap>,
}

/// Held for the duration of one stack action
pub struct StackGuard<'a> {
    guard: Option<OwnedMutexGuard<()>>,
    name: String,
    locks: &'a StackLocks,
}

impl StackLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other action holds `name`, then hold it until the guard drops
    pub async fn acquire(&self, name: &str) -> StackGuard<'_> {
        let lock = self.map().entry(name.to_string()).or_default().clone();
        let guard = lock.lock_owned().await;

        StackGuard {
            guard: Some(guard),
            name: name.to_string(),
            locks: self,
        }
    }

    fn map(&self) -> MutexGuard<'_, LockMap> {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    fn tracked(&self) -> usize {
        self.map().len()
    }
}

impl Drop for StackGuard<'_> {
    fn drop(&mut self) {
        drop(self.guard.take());

        // Waiters hold their own clone, so a count of one means nobody else wants it
        let mut map = self.locks.map();
        if map.get(&self.name).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            map.remove(&self.name);
        }
    }
}
