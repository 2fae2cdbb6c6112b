//! Interfaces to the full-text search backend.
//!
//! The statistics layers never look inside the index. They talk to it
//! through two traits:
//!
//! - [`DocumentSink`] - the write side used while processing the corpus
//!   (analysis, adding documents, committing).
//! - [`TermSource`] - the read side used to build term statistics
//!   (document count, document/collection frequency, per-document term
//!   vectors).
//!
//! [`tantivy_index::TantivyBackend`] implements both on top of tantivy.
//! [`fixture::StaticTermSource`] is a fixed-data [`TermSource`] for tests and
//! benchmarks.

pub mod fixture;
pub mod schema;
pub mod tantivy_index;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::corpus::CorpusDocument;
use crate::error::Result;

pub use fixture::StaticTermSource;
pub use schema::CorpusSchema;
pub use tantivy_index::{BackendOpen, SearchHit, TantivyBackend};

/// Position of a document in the sorted corpus listing.
pub type DocOrdinal = usize;

/// One entry of a document's term vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermFrequency {
    /// The analyzed term.
    pub term: String,

    /// Occurrences of the term in the document.
    pub frequency: u64,
}

impl TermFrequency {
    /// Create a new term vector entry.
    pub fn new<S: Into<String>>(term: S, frequency: u64) -> Self {
        TermFrequency {
            term: term.into(),
            frequency,
        }
    }
}

/// The terms of one document field with their in-document counts.
pub type TermVector = Vec<TermFrequency>;

/// Read side of the backend, as needed by the statistics table.
///
/// Corpus-wide numbers (`document_frequency`, `collection_frequency`) come
/// from the backend's own accounting; per-document counts come from
/// [`term_vector`](Self::term_vector).
pub trait TermSource: Send + Sync + fmt::Debug {
    /// Number of documents visible to the current reader.
    fn total_documents(&self) -> Result<usize>;

    /// Number of documents whose `field` contains `term`.
    fn document_frequency(&self, field: &str, term: &str) -> Result<u64>;

    /// Total occurrences of `term` in `field` across the collection.
    fn collection_frequency(&self, field: &str, term: &str) -> Result<u64>;

    /// Term vector of `field` for the document at `ordinal`.
    ///
    /// Returns `None` when the document has no terms in that field.
    fn term_vector(&self, ordinal: DocOrdinal, field: &str) -> Result<Option<TermVector>>;

    /// Identifier of the current reader session.
    ///
    /// Changes whenever newly committed data becomes visible, so cached
    /// statistics keyed by it can be detected as stale.
    fn generation(&self) -> u64;
}

/// Write side of the backend, as needed by the corpus-processing stage.
pub trait DocumentSink {
    /// Run the field's analyzer over `text` and return the terms in order.
    fn tokenize(&self, field: &str, text: &str) -> Result<Vec<String>>;

    /// Queue a document for indexing.
    fn add_document(&mut self, doc: &CorpusDocument) -> Result<()>;

    /// Make every queued document visible to readers.
    fn commit(&mut self) -> Result<()>;
}
