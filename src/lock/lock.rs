use super::{LockError, LockGuard};

/// A single mutual-exclusion lock over one collection.
///
/// The in-memory implementation serializes threads of one process. An
/// implementation backed by advisory file locks would extend the same
/// guarantee across processes.
pub trait Lock: Send + Sync {
    /// Acquire the lock, blocking until the current holder releases it.
    fn lock(&self) -> Result<(), LockError>;

    /// Try to acquire the lock without blocking.
    /// Returns `Ok(true)` if acquired, `Ok(false)` if already held.
    fn try_lock(&self) -> Result<bool, LockError>;

    /// Release the lock.
    fn unlock(&self) -> Result<(), LockError>;

    /// Acquire the lock and release it when the returned guard drops.
    fn acquire(&self) -> Result<LockGuard<'_, Self>, LockError>
    where
        Self: Sized,
    {
        self.lock()?;
        Ok(LockGuard::new(self))
    }
}
