//! Named-entity detector capability.
//!
//! The original system leaned on a lazily cached NER model behind static
//! methods; here the capability is an explicitly constructed trait object so
//! the extractor can be exercised with a mock and the model swapped without
//! a global singleton.

use std::sync::OnceLock;

use regex::Regex;

/// Classifies whether a text line contains a person's name.
pub trait NameEntityDetector: Send + Sync {
    fn contains_person_name(&self, line: &str) -> bool;
}

/// Shipped heuristic detector: two to four capitalized words, letters only
/// apart from connecting periods and hyphens. Deliberately conservative;
/// the shape/indicator heuristics in the extractor carry the rest.
#[derive(Debug, Default)]
pub struct CapitalizedWordsDetector;

fn person_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Z][A-Za-z'-]*[a-z](?:\s+[A-Z]\.?)?(?:\s+[A-Z][A-Za-z'-]*[a-z]){1,3}$")
            .unwrap()
    })
}

impl NameEntityDetector for CapitalizedWordsDetector {
    fn contains_person_name(&self, line: &str) -> bool {
        let stripped = strip_label(line);
        person_pattern().is_match(stripped)
    }
}

/// Drop a leading `Name:` / `Student:`-style label so labeled lines still
/// classify on the name part alone.
fn strip_label(line: &str) -> &str {
    match line.split_once(':') {
        Some((_, rest)) => rest.trim(),
        None => line,
    }
}
