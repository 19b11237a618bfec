use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;

use super::{
    collect_tags, text_length, CollectionName, Fragment, FragmentDraft, FragmentFilter,
    FragmentPatch,
};
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::id;
use crate::lock::{InMemoryLockManager, LockManager};
use crate::repository::{CollectionRepository, DurableFile};

/// Attempts at drawing an id not yet present in the target collection.
const MAX_ID_ATTEMPTS: usize = 16;

/// Versioned fragments over any number of named collections.
///
/// Each collection is one document under the configured data directory and
/// one lock from the lock manager. Operations on one collection are
/// serialized for their whole read-modify-write cycle; operations on
/// different collections proceed independently.
///
/// Construct one store per data directory and share it (by reference or
/// `Arc`): the locks live in the store instance.
pub struct FragmentStore<M: LockManager = InMemoryLockManager> {
    config: StoreConfig,
    locks: M,
}

impl FragmentStore {
    /// Open a store with process-local collection locks.
    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        Self::with_lock_manager(config, InMemoryLockManager::new())
    }
}

impl<M: LockManager> FragmentStore<M> {
    pub fn with_lock_manager(config: StoreConfig, locks: M) -> Result<Self, StoreError> {
        fs::create_dir_all(&config.data_dir)
            .map_err(|e| StoreError::storage(&config.data_dir, e))?;
        tracing::debug!(data_dir = %config.data_dir.display(), "opened fragment store");
        Ok(Self { config, locks })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn lock_manager(&self) -> &M {
        &self.locks
    }

    /// Every fragment of `collection` in stored order, deprecated ones included.
    ///
    /// A collection that was never written is created empty.
    pub fn list(&self, collection: &str) -> Result<Vec<Fragment>, StoreError> {
        let (_, repository) = self.resolve(collection)?;
        repository.read()
    }

    pub fn get(&self, collection: &str, id: &str) -> Result<Fragment, StoreError> {
        self.list(collection)?
            .into_iter()
            .find(|f| f.id == id)
            .ok_or_else(|| StoreError::not_found(collection, id))
    }

    pub fn find(
        &self,
        collection: &str,
        filter: &FragmentFilter,
    ) -> Result<Vec<Fragment>, StoreError> {
        Ok(filter.apply(self.list(collection)?))
    }

    /// Distinct tags used in `collection`.
    pub fn tags(&self, collection: &str) -> Result<BTreeSet<String>, StoreError> {
        Ok(collect_tags(&self.list(collection)?))
    }

    /// Store a new fragment built from `draft` and return it.
    ///
    /// In a `phase/<n>` collection the id follows the phase scheme and
    /// `phase_id` is set to `n`; elsewhere the id is a UUID and `phase_id`
    /// is cleared.
    pub fn create(&self, collection: &str, draft: FragmentDraft) -> Result<Fragment, StoreError> {
        draft.validate()?;
        let (name, repository) = self.resolve(collection)?;
        let phase_id = name.phase_id().map(str::to_string);
        let phase_number = phase_id.as_deref().map(id::phase_number).transpose()?;
        let path = repository.path().to_path_buf();

        let fragment = repository.modify(|fragments| {
            let new_id = allocate_id(&path, fragments, || match phase_number {
                Some(n) => id::generate_phase_id(n),
                None => Ok(id::generate_fragment_id()),
            })?;
            let fragment = Fragment::from_draft(new_id, draft, phase_id);
            fragments.push(fragment.clone());
            check_lengths(&path, fragments)?;
            Ok(fragment)
        })?;

        tracing::info!(collection = %name, id = %fragment.id, "created fragment");
        Ok(fragment)
    }

    /// Apply `patch` to fragment `id` and return the updated fragment.
    ///
    /// A changed text appends the previous text to `history_log`; restoring
    /// an older version is an ordinary text change and is recorded the same
    /// way. An empty patch reads the fragment and writes nothing.
    pub fn update(
        &self,
        collection: &str,
        id: &str,
        patch: FragmentPatch,
    ) -> Result<Fragment, StoreError> {
        patch.validate()?;
        let (name, repository) = self.resolve(collection)?;
        if patch.is_empty() {
            return repository
                .peek()?
                .into_iter()
                .find(|f| f.id == id)
                .ok_or_else(|| StoreError::not_found(name.as_str(), id));
        }
        let path = repository.path().to_path_buf();

        let (fragment, text_changed) = repository.modify(|fragments| {
            let fragment = fragments
                .iter_mut()
                .find(|f| f.id == id)
                .ok_or_else(|| StoreError::not_found(name.as_str(), id))?;
            let text_changed = fragment.apply(patch, Utc::now())?;
            let updated = fragment.clone();
            check_lengths(&path, fragments)?;
            Ok((updated, text_changed))
        })?;

        tracing::info!(
            collection = %name,
            id,
            text_changed,
            versions = fragment.history_log.len(),
            "updated fragment"
        );
        Ok(fragment)
    }

    /// Soft-delete fragment `id`. The record and its history are kept and no
    /// history entry is added.
    pub fn deprecate(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.update(collection, id, FragmentPatch::new().deprecated(true))?;
        Ok(())
    }

    /// Collections present on disk, sorted by name.
    pub fn collections(&self) -> Result<Vec<CollectionName>, StoreError> {
        let data_dir = &self.config.data_dir;
        let mut names = Vec::new();

        for entry in read_dir(data_dir)? {
            if entry.is_dir() {
                let Some(group) = entry.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                for inner in read_dir(&entry)? {
                    if let Some(stem) = json_stem(&inner) {
                        names.extend(CollectionName::new(format!("{group}/{stem}")).ok());
                    }
                }
            } else if let Some(stem) = json_stem(&entry) {
                if !self.config.is_reserved(&entry) {
                    names.extend(CollectionName::new(stem).ok());
                }
            }
        }

        names.sort();
        names.dedup();
        Ok(names)
    }

    fn resolve(
        &self,
        collection: &str,
    ) -> Result<(CollectionName, CollectionRepository<Fragment, M::Lock>), StoreError> {
        let name = CollectionName::new(collection)?;
        let path = name.file_path(&self.config.data_dir);
        if self.config.is_reserved(&path) {
            return Err(StoreError::invalid(format!(
                "{name} is reserved and cannot hold fragments"
            )));
        }
        let lock = self.locks.get_lock(name.as_str())?;
        Ok((name, CollectionRepository::new(DurableFile::new(path), lock)))
    }
}

fn allocate_id(
    path: &Path,
    existing: &[Fragment],
    generate: impl FnMut() -> Result<String, StoreError>,
) -> Result<String, StoreError> {
    id::draw_unused(MAX_ID_ATTEMPTS, generate, |candidate| {
        existing.iter().any(|f| f.id == candidate)
    })?
    .ok_or_else(|| {
        StoreError::corrupt(
            path,
            format!("no unused fragment id found after {MAX_ID_ATTEMPTS} attempts"),
        )
    })
}

fn check_lengths(path: &Path, fragments: &[Fragment]) -> Result<(), StoreError> {
    match fragments.iter().find(|f| !f.length_matches()) {
        Some(f) => Err(StoreError::corrupt(
            path,
            format!(
                "fragment {} records length {} but its text has {} UTF-16 units",
                f.id,
                f.length,
                text_length(&f.text)
            ),
        )),
        None => Ok(()),
    }
}

fn read_dir(dir: &Path) -> Result<Vec<PathBuf>, StoreError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(StoreError::storage(dir, err)),
    };
    entries
        .map(|entry| entry.map(|e| e.path()).map_err(|e| StoreError::storage(dir, e)))
        .collect()
}

fn json_stem(path: &Path) -> Option<&str> {
    if !path.is_file() || path.extension()? != "json" {
        return None;
    }
    path.file_stem()?.to_str()
}
