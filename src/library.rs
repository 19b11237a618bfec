use crate::compose::{compose, ComposedPrompt, PromptSelection};
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::fragment::FragmentStore;
use crate::generation::GenerationLog;
use crate::phase::PhaseCatalog;

/// Everything a front end needs, built once from one [`StoreConfig`] and
/// shared for the life of the process.
pub struct Library {
    fragments: FragmentStore,
    generations: GenerationLog,
    phases: PhaseCatalog,
}

impl Library {
    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        let phases = PhaseCatalog::load(config.phases_path())?;
        if phases.is_empty() {
            tracing::debug!(
                path = %config.phases_path().display(),
                "no phases configured; phase selections will be rejected"
            );
        }
        let generations = GenerationLog::open(&config);
        let fragments = FragmentStore::open(config)?;
        tracing::info!(
            data_dir = %fragments.config().data_dir.display(),
            phases = phases.phases().len(),
            "opened prompt library"
        );
        Ok(Self {
            fragments,
            generations,
            phases,
        })
    }

    pub fn fragments(&self) -> &FragmentStore {
        &self.fragments
    }

    pub fn generations(&self) -> &GenerationLog {
        &self.generations
    }

    pub fn phases(&self) -> &PhaseCatalog {
        &self.phases
    }

    /// Compose a prompt, checking a selected phase against the catalog first.
    pub fn compose(&self, selection: &PromptSelection) -> Result<ComposedPrompt, StoreError> {
        if let Some((phase_id, _)) = &selection.phase {
            self.phases.require(phase_id)?;
        }
        compose(&self.fragments, &self.generations, selection)
    }
}
