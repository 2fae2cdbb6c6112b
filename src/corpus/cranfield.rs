//! Parser for Cranfield-style documents.
//!
//! ```text
//! .T
//! Title of the document
//! .A
//! Author of the document
//! .B
//! Bibliography of the document
//! .W
//! Content of the document, on one or many lines
//! ```
//!
//! Each marker closes the section opened by the previous one: `.A` closes the
//! title, `.B` the author and `.W` the bibliography. Whatever follows `.W`
//! is the content. Blank lines are ignored.

use crate::corpus::CorpusDocument;

/// Parse one Cranfield document. Sections that end up empty are left unset.
pub fn parse_cranfield(text: &str, ordinal: usize) -> CorpusDocument {
    let mut doc = CorpusDocument::new(ordinal);
    let mut section = String::new();

    for line in text.lines().map(str::trim_end).filter(|line| !line.is_empty()) {
        match line {
            ".T" => {}
            ".A" => doc.title = take_section(&mut section),
            ".B" => doc.author = take_section(&mut section),
            ".W" => doc.bib = take_section(&mut section),
            _ => {
                section.push(' ');
                section.push_str(line);
            }
        }
    }
    doc.content = take_section(&mut section);

    doc
}

fn take_section(section: &mut String) -> Option<String> {
    let text = std::mem::take(section);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_document() {
        let text = ".T\nexperimental investigation\nof the aerodynamics\n.A\nbrenckman,m.\n.B\nj. ae. scs. 25, 1958, 324.\n.W\nexperimental investigation of the\n\naerodynamics of a wing\n";
        let doc = parse_cranfield(text, 7);

        assert_eq!(doc.ordinal, 7);
        assert_eq!(
            doc.title.as_deref(),
            Some("experimental investigation of the aerodynamics")
        );
        assert_eq!(doc.author.as_deref(), Some("brenckman,m."));
        assert_eq!(doc.bib.as_deref(), Some("j. ae. scs. 25, 1958, 324."));
        assert_eq!(
            doc.content.as_deref(),
            Some("experimental investigation of the aerodynamics of a wing")
        );
    }

    #[test]
    fn test_empty_sections_are_unset() {
        let doc = parse_cranfield(".T\nonly a title\n.A\n.B\n.W\n", 0);

        assert_eq!(doc.title.as_deref(), Some("only a title"));
        assert!(doc.author.is_none());
        assert!(doc.bib.is_none());
        assert!(doc.content.is_none());
    }

    #[test]
    fn test_plain_text_is_content() {
        let doc = parse_cranfield("no markers here\nat all", 1);

        assert!(doc.title.is_none());
        assert_eq!(doc.content.as_deref(), Some("no markers here at all"));
    }

    #[test]
    fn test_crlf_markers() {
        let doc = parse_cranfield(".T\r\nwing\r\n.A\r\nsmith\r\n.B\r\nref\r\n.W\r\nbody\r\n", 0);

        assert_eq!(doc.title.as_deref(), Some("wing"));
        assert_eq!(doc.author.as_deref(), Some("smith"));
        assert_eq!(doc.content.as_deref(), Some("body"));
    }

    #[test]
    fn test_crlf_lines_leave_no_carriage_returns() {
        let text = ".T\r\nwing\r\nflutter\r\n.A\r\nsmith\r\n.B\r\nref\r\n.W\r\nfirst line\r\n\r\nsecond line\r\n";
        let doc = parse_cranfield(text, 0);

        assert_eq!(doc.title.as_deref(), Some("wing flutter"));
        assert_eq!(doc.content.as_deref(), Some("first line second line"));
        for value in [&doc.title, &doc.author, &doc.bib, &doc.content].into_iter().flatten() {
            assert!(!value.contains('\r'));
        }
    }
}
