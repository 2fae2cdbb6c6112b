//! Corpus input: listing the corpus directory and parsing its documents.
//!
//! The corpus is a directory tree of Cranfield-style text files. Listing is
//! deterministic (sorted paths), and a document's position in the sorted
//! listing is its ordinal everywhere else in the crate.

pub mod cranfield;
pub mod listing;

use serde::{Deserialize, Serialize};

pub use cranfield::parse_cranfield;
pub use listing::list_corpus;

/// A parsed corpus document, ready to be handed to the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusDocument {
    /// Position in the sorted corpus listing (0-based).
    pub ordinal: usize,

    /// Title (`.T` section).
    pub title: Option<String>,

    /// Author (`.A` section).
    pub author: Option<String>,

    /// Bibliography (`.B` section).
    pub bib: Option<String>,

    /// Body text (`.W` section).
    pub content: Option<String>,
}

impl CorpusDocument {
    /// Create an empty document with the given ordinal.
    pub fn new(ordinal: usize) -> Self {
        CorpusDocument {
            ordinal,
            ..Default::default()
        }
    }

    /// Set the content field.
    pub fn with_content<S: Into<String>>(mut self, content: S) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the title field.
    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Text of the named field, if the document has it.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "title" => self.title.as_deref(),
            "author" => self.author.as_deref(),
            "bib" => self.bib.as_deref(),
            "content" => self.content.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_access() {
        let doc = CorpusDocument::new(3)
            .with_title("Flow past a cylinder")
            .with_content("experimental results");

        assert_eq!(doc.ordinal, 3);
        assert_eq!(doc.field("title"), Some("Flow past a cylinder"));
        assert_eq!(doc.field("content"), Some("experimental results"));
        assert_eq!(doc.field("author"), None);
        assert_eq!(doc.field("unknown"), None);
    }
}
