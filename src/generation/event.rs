use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Audit record of one assembled prompt. Never changed once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationEvent {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub user_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_refined_text: Option<String>,
    #[serde(default)]
    pub prefix_ids: Vec<String>,
    #[serde(default)]
    pub suffix_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_prompt_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_number: Option<String>,
}

impl GenerationEvent {
    pub(crate) fn from_draft(
        id: String,
        timestamp: DateTime<Utc>,
        draft: GenerationEventDraft,
    ) -> Self {
        GenerationEvent {
            id,
            timestamp,
            user_text: draft.user_text,
            ai_refined_text: draft.ai_refined_text,
            prefix_ids: draft.prefix_ids,
            suffix_ids: draft.suffix_ids,
            phase_prompt_id: draft.phase_prompt_id,
            phase_number: draft.phase_number,
        }
    }
}

/// What a caller records; the log assigns `id` and `timestamp`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationEventDraft {
    pub user_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_refined_text: Option<String>,
    pub prefix_ids: Vec<String>,
    pub suffix_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase_prompt_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase_number: Option<String>,
}

impl GenerationEventDraft {
    pub fn new(user_text: impl Into<String>) -> Self {
        Self {
            user_text: user_text.into(),
            ..Self::default()
        }
    }

    pub fn refined(mut self, text: impl Into<String>) -> Self {
        self.ai_refined_text = Some(text.into());
        self
    }

    pub fn prefix(mut self, id: impl Into<String>) -> Self {
        self.prefix_ids.push(id.into());
        self
    }

    pub fn suffix(mut self, id: impl Into<String>) -> Self {
        self.suffix_ids.push(id.into());
        self
    }

    pub fn phase_prompt(mut self, phase_number: impl Into<String>, id: impl Into<String>) -> Self {
        self.phase_number = Some(phase_number.into());
        self.phase_prompt_id = Some(id.into());
        self
    }
}
