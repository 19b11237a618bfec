use std::collections::BTreeSet;

use super::Fragment;

/// Linear filter over the fragments of one collection.
///
/// The default hides deprecated fragments and matches everything else.
#[derive(Debug, Clone, Default)]
pub struct FragmentFilter {
    include_deprecated: bool,
    search: Option<String>,
    any_tags: BTreeSet<String>,
}

impl FragmentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include_deprecated(mut self, include: bool) -> Self {
        self.include_deprecated = include;
        self
    }

    /// Case-insensitive substring match on the fragment text.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into().to_lowercase();
        self.search = (!term.is_empty()).then_some(term);
        self
    }

    /// Match fragments carrying at least one of `tags`.
    pub fn any_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.any_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn matches(&self, fragment: &Fragment) -> bool {
        if fragment.deprecated && !self.include_deprecated {
            return false;
        }
        if let Some(term) = &self.search {
            if !fragment.text.to_lowercase().contains(term.as_str()) {
                return false;
            }
        }
        self.any_tags.is_empty() || !self.any_tags.is_disjoint(&fragment.tags)
    }

    pub fn apply(&self, fragments: Vec<Fragment>) -> Vec<Fragment> {
        fragments.into_iter().filter(|f| self.matches(f)).collect()
    }
}

/// Every distinct tag used in `fragments`.
pub fn collect_tags<'a>(fragments: impl IntoIterator<Item = &'a Fragment>) -> BTreeSet<String> {
    fragments
        .into_iter()
        .flat_map(|f| f.tags.iter().cloned())
        .collect()
}
