use super::Lock;

/// Releases a held [`Lock`] when dropped.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct LockGuard<'a, L: Lock> {
    lock: &'a L,
}

impl<'a, L: Lock> LockGuard<'a, L> {
    /// Wrap a lock that the caller has already acquired.
    pub(crate) fn new(lock: &'a L) -> Self {
        Self { lock }
    }
}

impl<L: Lock> Drop for LockGuard<'_, L> {
    fn drop(&mut self) {
        if let Err(err) = self.lock.unlock() {
            tracing::warn!(error = %err, "failed to release collection lock");
        }
    }
}
