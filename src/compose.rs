//! One prompt-generation request: resolve the selected fragments, assemble
//! the text, record the event.

use serde::{Deserialize, Serialize};

use crate::assemble::assemble;
use crate::error::StoreError;
use crate::fragment::{CollectionName, FragmentStore};
use crate::generation::{GenerationEvent, GenerationEventDraft, GenerationLog};
use crate::lock::{Lock, LockManager};

/// The parts a caller picked for one prompt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptSelection {
    pub main_text: String,
    /// Replaces `main_text` in the assembled prompt when present.
    pub ai_refined_text: Option<String>,
    pub prefix_id: Option<String>,
    pub suffix_id: Option<String>,
    /// `(phase id, fragment id)` of the selected phase prompt.
    pub phase: Option<(String, String)>,
}

impl PromptSelection {
    pub fn new(main_text: impl Into<String>) -> Self {
        Self {
            main_text: main_text.into(),
            ..Self::default()
        }
    }

    pub fn refined(mut self, text: impl Into<String>) -> Self {
        self.ai_refined_text = Some(text.into());
        self
    }

    pub fn prefix(mut self, id: impl Into<String>) -> Self {
        self.prefix_id = Some(id.into());
        self
    }

    pub fn suffix(mut self, id: impl Into<String>) -> Self {
        self.suffix_id = Some(id.into());
        self
    }

    pub fn phase(mut self, phase_id: impl Into<String>, id: impl Into<String>) -> Self {
        self.phase = Some((phase_id.into(), id.into()));
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComposedPrompt {
    pub text: String,
    /// `None` when recording the event failed; the failure has been logged.
    pub event: Option<GenerationEvent>,
}

/// Build the prompt for `selection` and record it in `log`.
///
/// Fragment lookups are part of the request and their errors propagate.
/// Recording the event is not: a failed append is logged and reported as
/// `event: None`.
pub fn compose<M, L>(
    store: &FragmentStore<M>,
    log: &GenerationLog<L>,
    selection: &PromptSelection,
) -> Result<ComposedPrompt, StoreError>
where
    M: LockManager,
    L: Lock,
{
    let prefix = selected_text(store, CollectionName::prefixes(), selection.prefix_id.as_deref())?;
    let suffix = selected_text(store, CollectionName::suffixes(), selection.suffix_id.as_deref())?;
    let phase = match &selection.phase {
        Some((phase_id, id)) => selected_text(store, CollectionName::phase(phase_id)?, Some(id))?,
        None => String::new(),
    };
    let main = selection
        .ai_refined_text
        .as_deref()
        .unwrap_or(&selection.main_text);

    let text = assemble(&prefix, &phase, main, &suffix);

    let mut draft = GenerationEventDraft::new(selection.main_text.as_str());
    draft.ai_refined_text = selection.ai_refined_text.clone();
    draft.prefix_ids.extend(selection.prefix_id.iter().cloned());
    draft.suffix_ids.extend(selection.suffix_id.iter().cloned());
    if let Some((phase_id, id)) = &selection.phase {
        draft = draft.phase_prompt(phase_id.as_str(), id.as_str());
    }

    let event = match log.append(draft) {
        Ok(event) => Some(event),
        Err(err) => {
            tracing::warn!(error = %err, "failed to record generation event");
            None
        }
    };

    Ok(ComposedPrompt { text, event })
}

fn selected_text<M: LockManager>(
    store: &FragmentStore<M>,
    collection: CollectionName,
    id: Option<&str>,
) -> Result<String, StoreError> {
    match id {
        Some(id) => Ok(store.get(collection.as_str(), id)?.text),
        None => Ok(String::new()),
    }
}
