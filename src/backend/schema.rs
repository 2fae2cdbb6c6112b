//! Index schema for corpus documents.

use tantivy::schema::{
    FAST, Field, INDEXED, IndexRecordOption, STORED, STRING, Schema, TextFieldIndexing,
    TextOptions,
};

use crate::error::{Result, TermStatError};

/// The tantivy schema plus resolved field handles.
#[derive(Debug, Clone)]
pub struct CorpusSchema {
    schema: Schema,
    pub ordinal: Field,
    pub title: Field,
    pub author: Field,
    pub bib: Field,
    pub content: Field,
}

impl CorpusSchema {
    pub const ORDINAL: &'static str = "ordinal";
    pub const TITLE: &'static str = "title";
    pub const AUTHOR: &'static str = "author";
    pub const BIB: &'static str = "bib";
    pub const CONTENT: &'static str = "content";

    /// Fields that carry terms and can be used for statistics.
    pub const TEXT_FIELDS: [&'static str; 4] =
        [Self::TITLE, Self::AUTHOR, Self::BIB, Self::CONTENT];

    /// Name under which the text analyzer is registered.
    pub const ANALYZER: &'static str = "termstat";

    /// Build the schema.
    pub fn new() -> Self {
        let mut builder = Schema::builder();
        let ordinal = builder.add_u64_field(Self::ORDINAL, STORED | FAST | INDEXED);

        let text_indexing = TextFieldIndexing::default()
            .set_tokenizer(Self::ANALYZER)
            .set_index_option(IndexRecordOption::WithFreqsAndPositions);
        let text_options = TextOptions::default()
            .set_indexing_options(text_indexing)
            .set_stored();

        let title = builder.add_text_field(Self::TITLE, text_options.clone());
        let author = builder.add_text_field(Self::AUTHOR, text_options.clone());
        // Bibliographic references are kept whole, not tokenized.
        let bib = builder.add_text_field(Self::BIB, STRING | STORED);
        let content = builder.add_text_field(Self::CONTENT, text_options);

        CorpusSchema {
            schema: builder.build(),
            ordinal,
            title,
            author,
            bib,
            content,
        }
    }

    /// The underlying tantivy schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Resolve a text field by name.
    pub fn text_field(&self, name: &str) -> Result<Field> {
        match name {
            Self::TITLE => Ok(self.title),
            Self::AUTHOR => Ok(self.author),
            Self::BIB => Ok(self.bib),
            Self::CONTENT => Ok(self.content),
            _ => Err(TermStatError::backend(format!("unknown text field '{name}'"))),
        }
    }
}

impl Default for CorpusSchema {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_field_lookup() {
        let schema = CorpusSchema::new();

        assert_eq!(schema.text_field("content").unwrap(), schema.content);
        assert_eq!(schema.text_field("title").unwrap(), schema.title);
        assert!(schema.text_field("ordinal").is_err());
        assert!(schema.text_field("abstract").unwrap_err().is_backend());
    }

    #[test]
    fn test_schema_fields_exist() {
        let schema = CorpusSchema::new();
        for name in CorpusSchema::TEXT_FIELDS {
            assert!(schema.schema().get_field(name).is_ok());
        }
        assert!(schema.schema().get_field(CorpusSchema::ORDINAL).is_ok());
    }
}
