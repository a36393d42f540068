//! Exclusion ("no-entry") list matching.
//!
//! Two independent scopes exist: a list attached to the event and a global
//! list. Both block equally; the event list is reported first so the user
//! sees the more specific reason.

use serde::{Deserialize, Serialize};

/// Which list produced the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExclusionScope {
    Event,
    Global,
}

impl ExclusionScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExclusionScope::Event => "event",
            ExclusionScope::Global => "global",
        }
    }
}

/// An ordered set of names, matched case-insensitively.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExclusionList {
    entries: Vec<String>,
}

impl ExclusionList {
    pub fn new(names: impl IntoIterator<Item = String>) -> Self {
        let mut list = Self::default();
        for name in names {
            list.add(&name);
        }
        list
    }

    /// Parse the newline-separated import format: each non-empty trimmed
    /// line is one name.
    pub fn from_text(text: &str) -> Self {
        Self::new(text.lines().map(str::to_string))
    }

    /// Insert a name, keeping insertion order and dropping case-insensitive
    /// duplicates.
    pub fn add(&mut self, name: &str) {
        let trimmed = name.trim();
        if trimmed.is_empty() || self.contains(trimmed) {
            return;
        }
        self.entries.push(trimmed.to_string());
    }

    /// Case-insensitive, whitespace-trimmed exact match. No substring or
    /// fuzzy matching.
    pub fn contains(&self, name: &str) -> bool {
        let needle = name.trim();
        self.entries
            .iter()
            .any(|entry| entry.eq_ignore_ascii_case(needle))
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Check a resolved name against both scopes. A `Some` result is a hard
/// stop: the caller must not record attendance and must surface the scope.
pub fn check_exclusion(
    name: &str,
    event_list: &ExclusionList,
    global_list: &ExclusionList,
) -> Option<ExclusionScope> {
    if event_list.contains(name) {
        Some(ExclusionScope::Event)
    } else if global_list.contains(name) {
        Some(ExclusionScope::Global)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_scope_matches_case_insensitively() {
        let event = ExclusionList::new(vec!["John Smith".to_string()]);
        let global = ExclusionList::default();
        assert_eq!(
            check_exclusion("john smith", &event, &global),
            Some(ExclusionScope::Event)
        );
    }

    #[test]
    fn near_miss_does_not_match() {
        let event = ExclusionList::new(vec!["John Smith".to_string()]);
        let global = ExclusionList::default();
        assert_eq!(check_exclusion("Jon Smith", &event, &global), None);
    }

    #[test]
    fn substring_does_not_match() {
        let event = ExclusionList::new(vec!["John Smith".to_string()]);
        let global = ExclusionList::default();
        assert_eq!(check_exclusion("John", &event, &global), None);
        assert_eq!(check_exclusion("John Smithers", &event, &global), None);
    }

    #[test]
    fn event_scope_wins_over_global() {
        let event = ExclusionList::new(vec!["Jane Doe".to_string()]);
        let global = ExclusionList::new(vec!["Jane Doe".to_string()]);
        assert_eq!(
            check_exclusion("Jane Doe", &event, &global),
            Some(ExclusionScope::Event)
        );
    }

    #[test]
    fn global_scope_blocks_when_event_misses() {
        let event = ExclusionList::default();
        let global = ExclusionList::new(vec!["Jane Doe".to_string()]);
        assert_eq!(
            check_exclusion("  jane doe ", &event, &global),
            Some(ExclusionScope::Global)
        );
    }

    #[test]
    fn import_format_is_one_name_per_line() {
        let list = ExclusionList::from_text("John Smith\n\n  Jane Doe  \njohn smith\n");
        assert_eq!(list.len(), 2);
        assert_eq!(list.entries(), ["John Smith", "Jane Doe"]);
    }
}
