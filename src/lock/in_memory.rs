use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};

use super::{Lock, LockError, LockManager};

/// Process-local collection lock.
///
/// The holder is recorded in a flag rather than kept as a `MutexGuard`, so a
/// repository can take the lock at the start of a read-modify-write cycle and
/// release it after the final rename, through the [`Lock`] trait. Waiters
/// park on a `Condvar` until the flag clears.
pub struct InMemoryLock {
    held: Mutex<bool>,
    released: Condvar,
}

impl InMemoryLock {
    pub fn new() -> Self {
        InMemoryLock {
            held: Mutex::new(false),
            released: Condvar::new(),
        }
    }

    fn flag(&self) -> Result<MutexGuard<'_, bool>, LockError> {
        self.held.lock().map_err(|e| poisoned(&e))
    }

    #[cfg(test)]
    fn is_held(&self) -> Result<bool, LockError> {
        Ok(*self.flag()?)
    }
}

fn poisoned(err: &dyn std::fmt::Display) -> LockError {
    LockError::Poisoned(err.to_string())
}

impl Default for InMemoryLock {
    fn default() -> Self {
        Self::new()
    }
}

impl Lock for InMemoryLock {
    fn lock(&self) -> Result<(), LockError> {
        let flag = self.flag()?;
        let mut flag = self
            .released
            .wait_while(flag, |held| *held)
            .map_err(|e| poisoned(&e))?;
        *flag = true;
        Ok(())
    }

    fn try_lock(&self) -> Result<bool, LockError> {
        let mut flag = self.flag()?;
        let acquired = !*flag;
        *flag = true;
        Ok(acquired)
    }

    fn unlock(&self) -> Result<(), LockError> {
        let mut flag = self.flag()?;
        if std::mem::replace(&mut *flag, false) {
            self.released.notify_one();
        }
        Ok(())
    }
}

/// One [`InMemoryLock`] per collection name, created the first time the
/// collection is touched.
///
/// Entries are never evicted: a store sees `prefixes`, `suffixes` and one
/// collection per configured phase, so the map stays small.
#[derive(Default)]
pub struct InMemoryLockManager {
    collections: Mutex<HashMap<String, Arc<InMemoryLock>>>,
}

impl InMemoryLockManager {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn len(&self) -> Result<usize, LockError> {
        Ok(self.collections.lock().map_err(|e| poisoned(&e))?.len())
    }
}

impl LockManager for InMemoryLockManager {
    type Lock = InMemoryLock;

    fn get_lock(&self, collection: &str) -> Result<Arc<InMemoryLock>, LockError> {
        let mut collections = self.collections.lock().map_err(|e| poisoned(&e))?;
        if let Some(lock) = collections.get(collection) {
            return Ok(Arc::clone(lock));
        }
        tracing::debug!(collection, "created collection lock");
        let lock = Arc::new(InMemoryLock::new());
        collections.insert(collection.to_string(), Arc::clone(&lock));
        Ok(lock)
    }
}
