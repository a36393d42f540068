//! Turns raw OCR output into trimmed, indexed text lines.

/// Lines longer than this are dropped outright; OCR occasionally glues a
/// whole card edge into one line and nothing downstream wants it.
const MAX_LINE_CHARS: usize = 120;

/// A trimmed OCR line with its position in the original output sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub index: usize,
    pub text: String,
}

/// Split raw OCR text on newlines, trim each line, and drop empty or
/// overlong lines. The index records the line's place in the original
/// sequence so neighbour-context scoring still works after filtering.
pub fn normalize_lines(raw: &str) -> Vec<TextLine> {
    raw.lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.chars().count() > MAX_LINE_CHARS {
                return None;
            }
            Some(TextLine {
                index,
                text: trimmed.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_drops_empty_lines() {
        let lines = normalize_lines("  Jane Smith  \n\n   \nID: 1234567\n");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "Jane Smith");
        assert_eq!(lines[0].index, 0);
        assert_eq!(lines[1].text, "ID: 1234567");
        assert_eq!(lines[1].index, 3);
    }

    #[test]
    fn drops_overlong_lines() {
        let long = "x".repeat(MAX_LINE_CHARS + 1);
        let raw = format!("{long}\nJane Smith");
        let lines = normalize_lines(&raw);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "Jane Smith");
        assert_eq!(lines[0].index, 1);
    }

    #[test]
    fn empty_input_yields_no_lines() {
        assert!(normalize_lines("").is_empty());
    }
}
