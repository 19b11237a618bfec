use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tempfile::NamedTempFile;

use crate::error::StoreError;

/// One whole JSON document on disk.
///
/// Writes never touch the target in place: the new document goes to a
/// temporary sibling that is flushed, synced and renamed over the target, so
/// a reader sees either the previous document or the next one.
#[derive(Debug, Clone)]
pub struct DurableFile {
    path: PathBuf,
}

impl DurableFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and parse the document. `Ok(None)` means the file does not exist.
    pub fn load<T: DeserializeOwned>(&self) -> Result<Option<T>, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StoreError::storage(&self.path, err)),
        };

        let value = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::corrupt(&self.path, e.to_string()))?;
        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "loaded document");
        Ok(Some(value))
    }

    /// Atomically replace the document with `value`.
    pub fn store<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(value)
            .map_err(|e| StoreError::corrupt(&self.path, format!("serialize: {e}")))?;

        let dir = self.parent_dir();
        fs::create_dir_all(dir).map_err(|e| StoreError::storage(dir, e))?;

        let mut staged = tempfile::Builder::new()
            .prefix(".staged-")
            .suffix(".tmp")
            .tempfile_in(dir)
            .map_err(|e| StoreError::storage(dir, e))?;
        if let Err(err) = write_synced(&mut staged, &bytes) {
            return Err(StoreError::storage(staged.path(), err));
        }
        staged
            .persist(&self.path)
            .map_err(|e| StoreError::storage(&self.path, e.error))?;

        sync_dir(dir);
        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "stored document");
        Ok(())
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

fn write_synced(staged: &mut NamedTempFile, bytes: &[u8]) -> io::Result<()> {
    staged.write_all(bytes)?;
    staged.flush()?;
    staged.as_file().sync_all()
}

/// Make the rename itself durable. Failure here only weakens crash
/// durability of the rename; the document on disk is already complete.
#[cfg(unix)]
fn sync_dir(dir: &Path) {
    if let Err(err) = fs::File::open(dir).and_then(|d| d.sync_all()) {
        tracing::debug!(dir = %dir.display(), error = %err, "directory sync failed");
    }
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) {}
