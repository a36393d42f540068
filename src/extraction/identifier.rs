//! Scans full OCR text for numeric identifier patterns.
//!
//! Recognition runs as an ordered cascade: a combined labeled pattern first,
//! then five independent rules from most to least specific. Every match
//! contributes a digit-stripped candidate; the deduplicated list keeps
//! first-occurrence order and its head is the accepted identifier.

use std::sync::OnceLock;

use regex::Regex;

/// Identifiers shorter or longer than this are OCR noise, not card numbers.
const MIN_DIGITS: usize = 5;
const MAX_DIGITS: usize = 12;

/// How a rule anchors its digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// Digits follow an explicit id label on the card
    LabeledDigits,
    /// A run of digits with no label, length-bounded more tightly
    BareDigits,
}

struct IdentifierRule {
    name: &'static str,
    kind: RuleKind,
    pattern: Regex,
}

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap()
}

/// Combined indicator pattern tried before the cascade: an id phrase,
/// optionally a number marker, then the digits.
fn combined_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        regex(r"(?i)\b(?:student\s+id|identification|id)\s*(?:number|no\.?|#)?\s*[:.]?\s*(\d{5,12})\b")
    })
}

fn cascade() -> &'static [IdentifierRule] {
    static RULES: OnceLock<Vec<IdentifierRule>> = OnceLock::new();

    RULES.get_or_init(|| {
        vec![
            IdentifierRule {
                name: "id-hash",
                kind: RuleKind::LabeledDigits,
                pattern: regex(r"(?i)\bID\s*#\s*(\d[\d\s-]{3,14}\d)"),
            },
            IdentifierRule {
                name: "student-id",
                kind: RuleKind::LabeledDigits,
                pattern: regex(r"(?i)\bSTUDENT\s+ID\s*[:.]?\s*(\d[\d\s-]{3,14}\d)"),
            },
            IdentifierRule {
                name: "id-number",
                kind: RuleKind::LabeledDigits,
                pattern: regex(r"(?i)\bID\s+NUMBER\s*[:.]?\s*(\d[\d\s-]{3,14}\d)"),
            },
            IdentifierRule {
                name: "id-generic",
                kind: RuleKind::LabeledDigits,
                pattern: regex(r"(?i)\bID\s*[:.]?\s+(\d[\d\s-]{3,14}\d)"),
            },
            IdentifierRule {
                name: "bare-digits",
                kind: RuleKind::BareDigits,
                pattern: regex(r"\b(\d{7,10})\b"),
            },
        ]
    })
}

/// Extract every identifier candidate from the full OCR text, deduplicated
/// with first-occurrence order preserved. The head is the accepted
/// identifier.
pub fn extract_identifier_candidates(text: &str) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();

    if let Some(captures) = combined_pattern().captures(text) {
        push_candidate(&mut candidates, &captures[1]);
    }

    for rule in cascade() {
        for captures in rule.pattern.captures_iter(text) {
            log::debug!("identifier rule {} ({:?}) matched", rule.name, rule.kind);
            push_candidate(&mut candidates, &captures[1]);
        }
    }

    candidates
}

/// The accepted identifier, if any candidate exists.
pub fn accepted_identifier(text: &str) -> Option<String> {
    extract_identifier_candidates(text).into_iter().next()
}

/// Strip separators the pattern captured incidentally, enforce the digit
/// window, and dedupe.
fn push_candidate(candidates: &mut Vec<String>, raw: &str) {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < MIN_DIGITS || digits.len() > MAX_DIGITS {
        return;
    }
    if !candidates.contains(&digits) {
        candidates.push(digits);
    }
}
