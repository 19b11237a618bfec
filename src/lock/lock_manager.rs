use std::sync::Arc;

use super::{Lock, LockError};

/// Hands out one lock per collection name.
///
/// The fragment store asks its manager for the lock of a collection at the
/// start of every operation. Repeated calls with the same key must return
/// the same logical lock, otherwise writers would not be serialized.
pub trait LockManager: Send + Sync {
    /// The concrete lock type returned by this manager.
    type Lock: Lock;

    /// Get (or lazily create) the lock for `collection`.
    fn get_lock(&self, collection: &str) -> Result<Arc<Self::Lock>, LockError>;
}
