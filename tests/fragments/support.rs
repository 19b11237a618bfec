//! Shared fixtures for the fragment store suite.

use fragment_store::{FragmentStore, StoreConfig};
use tempfile::TempDir;

/// A store over a fresh temporary data directory. Keep the `TempDir` alive
/// for as long as the store is used.
pub fn temp_store() -> (TempDir, FragmentStore) {
    let dir = TempDir::new().unwrap();
    let store = FragmentStore::open(StoreConfig::new(dir.path())).unwrap();
    (dir, store)
}

/// Parsed contents of a collection document, bypassing the store.
pub fn raw_document(dir: &TempDir, file: &str) -> serde_json::Value {
    let bytes = std::fs::read(dir.path().join(file)).unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
