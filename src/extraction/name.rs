//! Scores OCR lines as candidate person names.
//!
//! Every heuristic contributes independently and additively, so a line can
//! stack several weak signals into a strong score. The extractor never
//! decides on its own; it returns the full ranked list and callers take the
//! head, treating a 0-confidence head as "no usable name".

use std::sync::OnceLock;

use regex::Regex;

use crate::extraction::config::ExtractionConfig;
use crate::extraction::detector::NameEntityDetector;
use crate::extraction::normalize::TextLine;

/// Tokens that mark a line as card boilerplate rather than a name.
const TITLE_WORDS: [&str; 6] = ["student", "id", "card", "university", "college", "school"];

/// Literal substrings that label the line as carrying a name.
const NAME_INDICATORS: [&str; 3] = ["name:", "student:", "student name:"];

#[derive(Debug, Clone, PartialEq)]
pub struct NameCandidate {
    pub text: String,
    pub confidence: f64,
}

pub struct NameCandidateExtractor {
    detector: Box<dyn NameEntityDetector>,
    config: ExtractionConfig,
}

fn shape_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            // First Last
            r"^[A-Z][a-z]+ [A-Z][a-z]+$",
            // First M. Last
            r"^[A-Z][a-z]+ [A-Z]\. [A-Z][a-z]+$",
            // Name: First Last
            r"^Name: [A-Z][a-z]+ [A-Z][a-z]+$",
            // Student: First Last
            r"^Student: [A-Z][a-z]+ [A-Z][a-z]+$",
            // Last, First
            r"^[A-Z][a-z]+, [A-Z][a-z]+$",
        ]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
    })
}

fn two_token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z][a-z]+ [A-Z][a-z]+$").unwrap())
}

fn name_charset_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z\s.\-]+$").unwrap())
}

impl NameCandidateExtractor {
    pub fn new(detector: Box<dyn NameEntityDetector>, config: ExtractionConfig) -> Self {
        Self { detector, config }
    }

    /// Score every line and return candidates sorted by descending
    /// confidence. The sort is stable, so equal scores keep their original
    /// line order.
    pub fn extract(&self, lines: &[TextLine]) -> Vec<NameCandidate> {
        let mut candidates: Vec<NameCandidate> = Vec::new();

        for (pos, line) in lines.iter().enumerate() {
            let length = line.text.chars().count();
            if length < self.config.min_name_chars || length > self.config.max_name_chars {
                continue;
            }
            if contains_title_word(&line.text) {
                continue;
            }

            let previous = pos.checked_sub(1).map(|p| lines[p].text.as_str());
            let next = lines.get(pos + 1).map(|l| l.text.as_str());
            let confidence = self.score_line(&line.text, previous, next);

            candidates.push(NameCandidate {
                text: line.text.clone(),
                confidence,
            });
        }

        // Stable: ties keep original line order.
        candidates.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        candidates
    }

    fn score_line(&self, text: &str, previous: Option<&str>, next: Option<&str>) -> f64 {
        let mut confidence = 0.0;

        if self.detector.contains_person_name(text) {
            confidence += self.config.weight_entity;
            if two_token_pattern().is_match(text) {
                confidence += self.config.weight_entity_two_token;
            }
        }

        if shape_patterns().iter().any(|p| p.is_match(text)) {
            confidence += self.config.weight_shape;
        }

        let lowered = text.to_lowercase();
        if NAME_INDICATORS.iter().any(|ind| lowered.contains(ind)) {
            confidence += self.config.weight_indicator;
        }

        if all_tokens_proper_case(text) {
            confidence += self.config.weight_proper_case;
        }

        let token_count = text.split_whitespace().count();
        if token_count == 2 || token_count == 3 {
            confidence += self.config.weight_token_count;
        }

        if name_charset_pattern().is_match(text) {
            confidence += self.config.weight_charset;
        }

        if neighbour_suggests_name(previous, next) {
            confidence += self.config.weight_context;
        }

        confidence
    }
}

fn contains_title_word(text: &str) -> bool {
    text.split_whitespace()
        .any(|token| TITLE_WORDS.iter().any(|w| token.eq_ignore_ascii_case(w)))
}

fn all_tokens_proper_case(text: &str) -> bool {
    let mut tokens = text.split_whitespace().peekable();
    if tokens.peek().is_none() {
        return false;
    }
    tokens.all(|token| {
        let mut chars = token.chars();
        match chars.next() {
            Some(first) if first.is_uppercase() => chars.all(|c| c.is_lowercase()),
            _ => false,
        }
    })
}

/// The line before a name often labels it ("Name", "Student"); the line
/// after often carries the id number.
fn neighbour_suggests_name(previous: Option<&str>, next: Option<&str>) -> bool {
    if let Some(prev) = previous {
        let lowered = prev.to_lowercase();
        if lowered.contains("name") || lowered.contains("student") {
            return true;
        }
    }
    if let Some(next) = next {
        let lowered = next.to_lowercase();
        if lowered.contains("id") || lowered.contains("number") {
            return true;
        }
    }
    false
}
