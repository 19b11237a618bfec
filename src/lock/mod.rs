//! Per-collection serialization.
//!
//! Every collection document is guarded by one lock, keyed by the collection
//! name. A read-modify-write cycle holds the lock from the first read until
//! the final rename, so two writers on the same collection can never lose
//! each other's updates. Locks for different keys are independent.

mod error;
mod guard;
mod in_memory;
#[allow(clippy::module_inception)]
mod lock;
mod lock_manager;

pub use error::LockError;
pub use guard::LockGuard;
pub use in_memory::{InMemoryLock, InMemoryLockManager};
pub use lock::Lock;
pub use lock_manager::LockManager;
