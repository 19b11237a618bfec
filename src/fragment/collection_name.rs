use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::StoreError;

const PREFIXES: &str = "prefixes";
const SUFFIXES: &str = "suffixes";
const PHASE: &str = "phase";
const MAX_SEGMENTS: usize = 2;

/// A validated collection key such as `prefixes` or `phase/3`.
///
/// Names are one or two `/`-separated segments of ASCII letters, digits,
/// `-` and `_`, so a name always maps to a file inside the data directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CollectionName(String);

impl CollectionName {
    pub fn new(name: impl Into<String>) -> Result<Self, StoreError> {
        let name = name.into();
        let segments: Vec<&str> = name.split('/').collect();
        if segments.len() > MAX_SEGMENTS {
            return Err(StoreError::invalid(format!(
                "collection name {name:?} has more than {MAX_SEGMENTS} segments"
            )));
        }
        for segment in &segments {
            if segment.is_empty() || !segment.chars().all(is_name_char) {
                return Err(StoreError::invalid(format!(
                    "collection name {name:?} must be made of letters, digits, '-' and '_'"
                )));
            }
        }
        Ok(Self(name))
    }

    pub fn prefixes() -> Self {
        Self(PREFIXES.to_string())
    }

    pub fn suffixes() -> Self {
        Self(SUFFIXES.to_string())
    }

    /// The collection holding the prompts of phase `phase_id`.
    pub fn phase(phase_id: &str) -> Result<Self, StoreError> {
        Self::new(format!("{PHASE}/{phase_id}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The phase this collection belongs to, for `phase/<id>` names.
    pub fn phase_id(&self) -> Option<&str> {
        match self.0.split_once('/') {
            Some((PHASE, id)) => Some(id),
            _ => None,
        }
    }

    /// Document location under `data_dir`: `<data_dir>/<name>.json`.
    pub fn file_path(&self, data_dir: &Path) -> PathBuf {
        let mut path = data_dir.to_path_buf();
        for segment in self.0.split('/') {
            path.push(segment);
        }
        path.set_extension("json");
        path
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CollectionName {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for CollectionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
