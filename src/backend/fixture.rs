//! A fixed, in-memory [`TermSource`].
//!
//! Useful for exercising the statistics layers without an index, and for
//! simulating backend failures.

use std::sync::atomic::{AtomicUsize, Ordering};

use ahash::AHashMap;

use crate::backend::{DocOrdinal, TermFrequency, TermSource, TermVector};
use crate::error::{Result, TermStatError};

/// Term source built from per-document token lists.
///
/// Every document contributes to a single field; lookups for any other
/// field behave as if the field were empty.
#[derive(Debug, Default)]
pub struct StaticTermSource {
    field: String,
    vectors: Vec<Option<TermVector>>,
    document_frequencies: AHashMap<String, u64>,
    collection_frequencies: AHashMap<String, u64>,
    failing_document: Option<DocOrdinal>,
    generation: u64,
    frequency_lookups: AtomicUsize,
}

impl StaticTermSource {
    /// Build a source whose `field` holds the given tokens, one list per
    /// document. An empty list means the document lacks the field.
    pub fn new<S: AsRef<str>>(field: &str, documents: &[Vec<S>]) -> Self {
        let mut source = StaticTermSource {
            field: field.to_string(),
            ..Default::default()
        };

        for tokens in documents {
            let mut counts: AHashMap<&str, u64> = AHashMap::new();
            for token in tokens {
                *counts.entry(token.as_ref()).or_insert(0) += 1;
            }

            if counts.is_empty() {
                source.vectors.push(None);
                continue;
            }

            let mut vector: TermVector = counts
                .into_iter()
                .map(|(term, frequency)| TermFrequency::new(term, frequency))
                .collect();
            vector.sort_by(|a, b| a.term.cmp(&b.term));

            for entry in &vector {
                *source
                    .document_frequencies
                    .entry(entry.term.clone())
                    .or_insert(0) += 1;
                *source
                    .collection_frequencies
                    .entry(entry.term.clone())
                    .or_insert(0) += entry.frequency;
            }
            source.vectors.push(Some(vector));
        }

        source
    }

    /// Build a source from explicit term vectors, keeping their order.
    ///
    /// Corpus-wide frequencies are derived from the vectors.
    pub fn from_vectors(field: &str, vectors: Vec<Option<TermVector>>) -> Self {
        let mut source = StaticTermSource {
            field: field.to_string(),
            ..Default::default()
        };
        for entry in vectors.iter().flatten().flatten() {
            *source
                .document_frequencies
                .entry(entry.term.clone())
                .or_insert(0) += 1;
            *source
                .collection_frequencies
                .entry(entry.term.clone())
                .or_insert(0) += entry.frequency;
        }
        source.vectors = vectors;
        source
    }

    /// Make term-vector retrieval fail for the given document.
    pub fn fail_on_document(mut self, ordinal: DocOrdinal) -> Self {
        self.failing_document = Some(ordinal);
        self
    }

    /// Override the corpus-wide document frequency reported for `term`.
    pub fn with_document_frequency(mut self, term: &str, frequency: u64) -> Self {
        self.document_frequencies.insert(term.to_string(), frequency);
        self
    }

    /// Simulate a reader reload.
    pub fn set_generation(&mut self, generation: u64) {
        self.generation = generation;
    }

    /// Number of document/collection frequency lookups served so far.
    pub fn frequency_lookups(&self) -> usize {
        self.frequency_lookups.load(Ordering::Relaxed)
    }

    fn frequency(&self, table: &AHashMap<String, u64>, field: &str, term: &str) -> u64 {
        self.frequency_lookups.fetch_add(1, Ordering::Relaxed);
        if field != self.field {
            return 0;
        }
        table.get(term).copied().unwrap_or(0)
    }
}

impl TermSource for StaticTermSource {
    fn total_documents(&self) -> Result<usize> {
        Ok(self.vectors.len())
    }

    fn document_frequency(&self, field: &str, term: &str) -> Result<u64> {
        Ok(self.frequency(&self.document_frequencies, field, term))
    }

    fn collection_frequency(&self, field: &str, term: &str) -> Result<u64> {
        Ok(self.frequency(&self.collection_frequencies, field, term))
    }

    fn term_vector(&self, ordinal: DocOrdinal, field: &str) -> Result<Option<TermVector>> {
        if self.failing_document == Some(ordinal) {
            return Err(TermStatError::backend(format!(
                "term vector for document {ordinal} is unreadable"
            )));
        }
        let vector = self
            .vectors
            .get(ordinal)
            .ok_or_else(|| TermStatError::backend(format!("no document with ordinal {ordinal}")))?;
        if field != self.field {
            return Ok(None);
        }
        Ok(vector.clone())
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vectors_are_sorted_and_counted() {
        let source = StaticTermSource::new("content", &[vec!["dog", "cat", "dog"], vec![]]);

        let vector = source.term_vector(0, "content").unwrap().unwrap();
        assert_eq!(
            vector,
            vec![TermFrequency::new("cat", 1), TermFrequency::new("dog", 2)]
        );
        assert!(source.term_vector(1, "content").unwrap().is_none());
        assert!(source.term_vector(0, "title").unwrap().is_none());
        assert_eq!(source.document_frequency("content", "dog").unwrap(), 1);
        assert_eq!(source.collection_frequency("content", "dog").unwrap(), 2);
        assert_eq!(source.frequency_lookups(), 2);
    }

    #[test]
    fn test_failure_injection() {
        let source = StaticTermSource::new("content", &[vec!["a"], vec!["b"]]).fail_on_document(1);

        assert!(source.term_vector(0, "content").is_ok());
        assert!(source.term_vector(1, "content").unwrap_err().is_backend());
    }
}
