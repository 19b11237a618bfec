use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// The text a fragment held before one of its edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// When the edit that overwrote `text` was committed.
    pub timestamp: DateTime<Utc>,
    pub text: String,
}

/// A stored, versioned piece of prompt text.
///
/// `length` always equals the character count of `text`, and `history_log`
/// only ever grows. The store maintains both; documents violating the length
/// invariant are refused on write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub associated_model_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default)]
    pub uses: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<String>,
    #[serde(default)]
    pub created_by: String,
    #[serde(default)]
    pub ai_version_compatibility: Vec<String>,
    pub length: usize,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub history_log: Vec<HistoryEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_id: Option<String>,
}

/// Length of fragment text as stored in [`Fragment::length`], in UTF-16
/// code units. Characters outside the Basic Multilingual Plane count twice,
/// matching documents written by existing JavaScript front ends.
pub fn text_length(text: &str) -> usize {
    text.encode_utf16().count()
}

impl Fragment {
    pub(crate) fn from_draft(id: String, draft: FragmentDraft, phase_id: Option<String>) -> Self {
        Fragment {
            id,
            length: text_length(&draft.text),
            text: draft.text,
            tags: draft.tags,
            associated_model_type: draft.associated_model_type,
            rating: draft.rating,
            uses: draft.uses,
            last_used: draft.last_used,
            created_by: draft.created_by,
            ai_version_compatibility: draft.ai_version_compatibility,
            deprecated: draft.deprecated,
            history_log: Vec::new(),
            phase_id,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.deprecated
    }

    pub fn length_matches(&self) -> bool {
        self.length == text_length(&self.text)
    }

    /// Apply `patch` in place. Returns whether the text changed.
    ///
    /// A text change first records the current text as a history entry
    /// stamped `now`, then replaces it and recomputes `length`. Every other
    /// field is overwritten as given, without history.
    pub(crate) fn apply(
        &mut self,
        patch: FragmentPatch,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        if self.deprecated && patch.deprecated == Some(false) {
            return Err(StoreError::invalid(format!(
                "fragment {} is deprecated and cannot be reactivated",
                self.id
            )));
        }

        let mut text_changed = false;
        if let Some(text) = patch.text {
            if text != self.text {
                let previous = std::mem::replace(&mut self.text, text);
                self.history_log.push(HistoryEntry {
                    timestamp: now,
                    text: previous,
                });
                self.length = text_length(&self.text);
                text_changed = true;
            }
        }

        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(model_type) = patch.associated_model_type {
            self.associated_model_type = Some(model_type);
        }
        if let Some(rating) = patch.rating {
            self.rating = Some(rating);
        }
        if let Some(uses) = patch.uses {
            self.uses = uses;
        }
        if let Some(last_used) = patch.last_used {
            self.last_used = Some(last_used);
        }
        if let Some(created_by) = patch.created_by {
            self.created_by = created_by;
        }
        if let Some(compatibility) = patch.ai_version_compatibility {
            self.ai_version_compatibility = compatibility;
        }
        if let Some(deprecated) = patch.deprecated {
            self.deprecated = deprecated;
        }

        Ok(text_changed)
    }
}

/// Everything a caller supplies to create a fragment.
///
/// `id`, `length` and `history_log` are assigned by the store. `phase_id` is
/// overwritten with the phase of the target collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FragmentDraft {
    pub text: String,
    pub tags: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub associated_model_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    pub uses: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used: Option<String>,
    pub created_by: String,
    pub ai_version_compatibility: Vec<String>,
    pub deprecated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase_id: Option<String>,
}

impl FragmentDraft {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn created_by(mut self, author: impl Into<String>) -> Self {
        self.created_by = author.into();
        self
    }

    pub fn compatible_with<I, S>(mut self, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ai_version_compatibility = versions.into_iter().map(Into::into).collect();
        self
    }

    pub fn model_type(mut self, model_type: impl Into<String>) -> Self {
        self.associated_model_type = Some(model_type.into());
        self
    }

    pub fn rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub(crate) fn validate(&self) -> Result<(), StoreError> {
        if self.text.trim().is_empty() {
            return Err(StoreError::invalid("fragment text must not be empty"));
        }
        Ok(())
    }
}

/// A partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FragmentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub associated_model_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uses: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_version_compatibility: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,
}

impl FragmentPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = Some(deprecated);
        self
    }

    pub fn uses(mut self, uses: u64) -> Self {
        self.uses = Some(uses);
        self
    }

    pub fn last_used(mut self, timestamp: impl Into<String>) -> Self {
        self.last_used = Some(timestamp.into());
        self
    }

    pub fn rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn created_by(mut self, author: impl Into<String>) -> Self {
        self.created_by = Some(author.into());
        self
    }

    pub fn model_type(mut self, model_type: impl Into<String>) -> Self {
        self.associated_model_type = Some(model_type.into());
        self
    }

    pub fn compatible_with<I, S>(mut self, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ai_version_compatibility = Some(versions.into_iter().map(Into::into).collect());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub(crate) fn validate(&self) -> Result<(), StoreError> {
        match &self.text {
            Some(text) if text.trim().is_empty() => {
                Err(StoreError::invalid("fragment text must not be empty"))
            }
            _ => Ok(()),
        }
    }
}
