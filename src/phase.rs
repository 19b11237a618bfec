//! Static phase configuration.
//!
//! The fragment store accepts any `phase/<id>` collection; callers check a
//! requested phase against the catalog before touching its collection.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::repository::DurableFile;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Phase {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
        }
    }
}

/// The configured phases, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseCatalog {
    phases: Vec<Phase>,
}

impl PhaseCatalog {
    /// Read the phase document at `path`. An absent document is an empty
    /// catalog and is not created.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let file = DurableFile::new(path.as_ref());
        let phases = file.load::<Vec<Phase>>()?.unwrap_or_default();
        tracing::debug!(
            path = %file.path().display(),
            phases = phases.len(),
            "loaded phase catalog"
        );
        Ok(Self::from_phases(phases))
    }

    pub fn from_phases(phases: Vec<Phase>) -> Self {
        Self { phases }
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn get(&self, id: &str) -> Option<&Phase> {
        self.phases.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.phases.iter().map(|p| p.id.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// The phase `id`, or `InvalidArgument` listing the configured ids.
    pub fn require(&self, id: &str) -> Result<&Phase, StoreError> {
        self.get(id).ok_or_else(|| {
            let valid = self.ids().collect::<Vec<_>>().join(", ");
            StoreError::invalid(format!("phase {id} is not configured; valid phases: {valid}"))
        })
    }
}
