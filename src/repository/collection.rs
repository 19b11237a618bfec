use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use super::DurableFile;
use crate::error::StoreError;
use crate::lock::{InMemoryLock, Lock};

/// Serialized access to one collection document holding a `Vec<T>`.
///
/// Every operation holds the collection lock for its whole duration:
/// `read` and `write` individually, and `modify` across the full
/// read-modify-write cycle. Two repositories constructed over the same lock
/// therefore never interleave, while repositories over different locks never
/// wait on each other.
pub struct CollectionRepository<T, L: Lock = InMemoryLock> {
    file: DurableFile,
    lock: Arc<L>,
    default: Vec<T>,
    _marker: PhantomData<fn() -> T>,
}

impl<T, L> CollectionRepository<T, L>
where
    T: Serialize + DeserializeOwned + Clone,
    L: Lock,
{
    /// Repository whose absent document reads as an empty collection.
    pub fn new(file: DurableFile, lock: Arc<L>) -> Self {
        Self {
            file,
            lock,
            default: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Replace the value an absent document is materialized with.
    pub fn with_default(mut self, default: Vec<T>) -> Self {
        self.default = default;
        self
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Current persisted records.
    ///
    /// An absent document is created holding the default value, which is
    /// then returned.
    pub fn read(&self) -> Result<Vec<T>, StoreError> {
        let _guard = self.lock.acquire()?;
        match self.file.load()? {
            Some(records) => Ok(records),
            None => {
                tracing::debug!(path = %self.path().display(), "materializing default document");
                self.file.store(&self.default)?;
                Ok(self.default.clone())
            }
        }
    }

    /// Current persisted records, or the default when the document is absent.
    /// Never writes.
    pub fn peek(&self) -> Result<Vec<T>, StoreError> {
        let _guard = self.lock.acquire()?;
        Ok(self.file.load()?.unwrap_or_else(|| self.default.clone()))
    }

    /// Replace the persisted records.
    pub fn write(&self, records: &[T]) -> Result<(), StoreError> {
        let _guard = self.lock.acquire()?;
        self.file.store(records)
    }

    /// Run one read-modify-write cycle under the collection lock.
    ///
    /// `change` sees the current records (the default when the document is
    /// absent). The records are persisted only if it returns `Ok`; on `Err`
    /// nothing is written, not even the default document.
    pub fn modify<R>(
        &self,
        change: impl FnOnce(&mut Vec<T>) -> Result<R, StoreError>,
    ) -> Result<R, StoreError> {
        let _guard = self.lock.acquire()?;
        let mut records = match self.file.load()? {
            Some(records) => records,
            None => self.default.clone(),
        };
        let outcome = change(&mut records)?;
        self.file.store(&records)?;
        Ok(outcome)
    }
}
