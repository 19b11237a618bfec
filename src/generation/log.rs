use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;

use super::{GenerationEvent, GenerationEventDraft};
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::id;
use crate::lock::{InMemoryLock, Lock};
use crate::repository::{CollectionRepository, DurableFile};

const MAX_ID_ATTEMPTS: usize = 16;

/// Append-only record of generated prompts, oldest first.
///
/// The log has a lock of its own, so appends never wait on fragment
/// collections and fragment updates never wait on the log.
pub struct GenerationLog<L: Lock = InMemoryLock> {
    repository: CollectionRepository<GenerationEvent, L>,
}

impl GenerationLog {
    /// Log stored at the configured history path.
    pub fn open(config: &StoreConfig) -> Self {
        Self::new(config.history_path())
    }

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_lock(path, Arc::new(InMemoryLock::new()))
    }
}

impl<L: Lock> GenerationLog<L> {
    pub fn with_lock(path: impl Into<PathBuf>, lock: Arc<L>) -> Self {
        Self {
            repository: CollectionRepository::new(DurableFile::new(path), lock),
        }
    }

    pub fn path(&self) -> &Path {
        self.repository.path()
    }

    /// Record `draft` with a fresh id and the current time.
    ///
    /// Earlier events are never touched. `user_text` is recorded as given,
    /// even when blank: a prompt built only from fragments is still audited.
    /// Callers recording a generation as a side effect should log a failure
    /// here rather than fail their request.
    pub fn append(&self, draft: GenerationEventDraft) -> Result<GenerationEvent, StoreError> {
        let path = self.path().to_path_buf();

        let event = self.repository.modify(|events| {
            let generate = || Ok::<_, StoreError>(id::generate_history_id());
            let event_id = id::draw_unused(MAX_ID_ATTEMPTS, generate, |candidate| {
                events.iter().any(|e| e.id == candidate)
            })?
            .ok_or_else(|| {
                StoreError::corrupt(
                    &path,
                    format!("no unused event id found after {MAX_ID_ATTEMPTS} attempts"),
                )
            })?;
            let event = GenerationEvent::from_draft(event_id, Utc::now(), draft);
            events.push(event.clone());
            Ok(event)
        })?;

        tracing::info!(id = %event.id, "recorded generation event");
        Ok(event)
    }

    /// The whole log, oldest first.
    pub fn list_all(&self) -> Result<Vec<GenerationEvent>, StoreError> {
        self.repository.read()
    }

    pub fn get(&self, id: &str) -> Result<Option<GenerationEvent>, StoreError> {
        Ok(self.list_all()?.into_iter().find(|e| e.id == id))
    }

    /// The newest `count` events, oldest first.
    pub fn recent(&self, count: usize) -> Result<Vec<GenerationEvent>, StoreError> {
        let mut events = self.list_all()?;
        let start = events.len().saturating_sub(count);
        Ok(events.split_off(start))
    }
}
