use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::repository::DurableFile;

/// Environment variable overriding [`StoreConfig::data_dir`].
pub const DATA_DIR_ENV: &str = "FRAGMENT_STORE_DATA_DIR";

/// Where the store keeps its documents.
///
/// Fragment collections live under `data_dir` as `<name>.json`; the
/// generation log and the phase configuration are two further documents in
/// the same directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    /// File name of the generation log, relative to `data_dir`.
    pub history_file: String,
    /// File name of the phase configuration, relative to `data_dir`.
    pub phases_file: String,
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_history_file(mut self, name: impl Into<String>) -> Self {
        self.history_file = name.into();
        self
    }

    #[must_use]
    pub fn with_phases_file(mut self, name: impl Into<String>) -> Self {
        self.phases_file = name.into();
        self
    }

    /// Load a configuration document. Missing keys take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let file = DurableFile::new(path.as_ref());
        file.load()?.ok_or_else(|| {
            StoreError::storage(
                path.as_ref(),
                std::io::Error::new(std::io::ErrorKind::NotFound, "configuration file not found"),
            )
        })
    }

    /// Defaults, with the data directory taken from `FRAGMENT_STORE_DATA_DIR` when set.
    pub fn from_env() -> Self {
        match env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Self::new(dir),
            _ => Self::default(),
        }
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join(&self.history_file)
    }

    pub fn phases_path(&self) -> PathBuf {
        self.data_dir.join(&self.phases_file)
    }

    /// Whether `path` is one of the non-collection documents.
    pub(crate) fn is_reserved(&self, path: &Path) -> bool {
        path == self.history_path() || path == self.phases_path()
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            history_file: "prompt_history.json".to_string(),
            phases_file: "phases.json".to_string(),
        }
    }
}
