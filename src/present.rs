//! Right-to-left text presentation for terminals.
//!
//! Most terminals render characters in storage order, so logical-order
//! Hebrew shows up reversed. [`present`] converts text to visual order:
//! Arabic-script letters are first reshaped into their joined presentation
//! forms, then each line is reordered with the Unicode Bidirectional
//! Algorithm. Apply it exactly once, to logical-order text; the transform is
//! not idempotent.

use ar_reshaper::reshape_line;
use unicode_bidi::BidiInfo;

/// How text is prepared for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Presentation {
    /// Reshape and reorder into visual order.
    #[default]
    Visual,
    /// Leave text in logical order (the terminal implements bidi itself).
    Logical,
}

impl Presentation {
    /// Prepare `text` for display.
    #[must_use]
    pub fn apply(self, text: &str) -> String {
        match self {
            Self::Visual => present(text),
            Self::Logical => text.to_string(),
        }
    }
}

/// Convert logical-order text to visual order, line by line.
///
/// Paragraph direction is detected per line from its first strong character.
#[must_use]
pub fn present(text: &str) -> String {
    text.split('\n')
        .map(visual_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn visual_line(line: &str) -> String {
    if line.is_empty() {
        return String::new();
    }

    let reshaped = reshape_line(line);
    let bidi = BidiInfo::new(&reshaped, None);

    bidi.paragraphs
        .iter()
        .map(|para| bidi.reorder_line(para, para.range.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_string() {
        assert_eq!(present(""), "");
    }

    #[test]
    fn test_latin_unchanged() {
        assert_eq!(present("minimum wage 2024"), "minimum wage 2024");
    }

    #[test]
    fn test_hebrew_reversed_for_display() {
        assert_eq!(present("שלום"), "םולש");
    }

    #[test]
    fn test_embedded_latin_keeps_its_order() {
        assert_eq!(present("שלום world"), "world םולש");
    }

    #[test]
    fn test_lines_handled_independently() {
        assert_eq!(present("שלום\nabc\n\nעולם"), "םולש\nabc\n\nםלוע");
    }

    #[test]
    fn test_arabic_is_reshaped_to_presentation_forms() {
        let shown = present("سلام");
        assert!(!shown.is_empty());
        assert!(shown.chars().all(|c| ('\u{FB50}'..='\u{FEFF}').contains(&c)));
    }

    #[test]
    fn test_logical_presentation_is_passthrough() {
        assert_eq!(Presentation::Logical.apply("שלום"), "שלום");
        assert_eq!(Presentation::Visual.apply("שלום"), "םולש");
    }
}
