//! Per-document vocabulary state.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TermStatError};

/// One Heaps' law data point.
///
/// Serialized with the column names of the growth files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthPoint {
    /// Tokens consumed so far in the document (1-based).
    #[serde(rename = "ttl")]
    pub tokens: u64,

    /// Distinct terms among those tokens.
    #[serde(rename = "unique")]
    pub vocabulary: u64,
}

#[derive(Debug, Default)]
struct DocumentGrowth {
    seen_terms: AHashSet<String>,
    points: Vec<GrowthPoint>,
}

/// Tracks vocabulary growth for every document of one processing run.
///
/// Documents are identified by the ordinal returned from
/// [`new_document`](Self::new_document). Each document's state is
/// independent of the others.
#[derive(Debug, Default)]
pub struct VocabularyTracker {
    documents: Vec<DocumentGrowth>,
}

impl VocabularyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a new document and return its ordinal.
    pub fn new_document(&mut self) -> usize {
        self.documents.push(DocumentGrowth::default());
        self.documents.len() - 1
    }

    /// Add `term` to the document's vocabulary.
    ///
    /// Returns `true` if the term was new to the document.
    pub fn record_term(&mut self, doc: usize, term: &str) -> Result<bool> {
        let growth = self.document_mut(doc)?;
        if growth.seen_terms.contains(term) {
            return Ok(false);
        }
        growth.seen_terms.insert(term.to_string());
        Ok(true)
    }

    /// Record the point for the token just consumed.
    ///
    /// Must be called once per token, after [`record_term`](Self::record_term)
    /// for that token.
    pub fn record_point(&mut self, doc: usize) -> Result<GrowthPoint> {
        let growth = self.document_mut(doc)?;
        let point = GrowthPoint {
            tokens: growth.points.len() as u64 + 1,
            vocabulary: growth.seen_terms.len() as u64,
        };
        growth.points.push(point);
        Ok(point)
    }

    /// Record one consumed token: its term, then its point.
    pub fn record_token(&mut self, doc: usize, term: &str) -> Result<GrowthPoint> {
        self.record_term(doc, term)?;
        self.record_point(doc)
    }

    /// Points recorded so far for a document.
    pub fn points(&self, doc: usize) -> Result<&[GrowthPoint]> {
        self.documents
            .get(doc)
            .map(|growth| growth.points.as_slice())
            .ok_or_else(|| TermStatError::invalid_document(doc, self.documents.len()))
    }

    /// Current vocabulary size of a document.
    pub fn vocabulary_size(&self, doc: usize) -> Result<usize> {
        self.documents
            .get(doc)
            .map(|growth| growth.seen_terms.len())
            .ok_or_else(|| TermStatError::invalid_document(doc, self.documents.len()))
    }

    /// Number of documents tracked.
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Points of every document, in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[GrowthPoint])> {
        self.documents
            .iter()
            .enumerate()
            .map(|(doc, growth)| (doc, growth.points.as_slice()))
    }

    fn document_mut(&mut self, doc: usize) -> Result<&mut DocumentGrowth> {
        let tracked = self.documents.len();
        self.documents
            .get_mut(doc)
            .ok_or_else(|| TermStatError::invalid_document(doc, tracked))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(tokens: u64, vocabulary: u64) -> GrowthPoint {
        GrowthPoint { tokens, vocabulary }
    }

    #[test]
    fn test_points_follow_tokens() {
        let mut tracker = VocabularyTracker::new();
        let first = tracker.new_document();
        let second = tracker.new_document();
        assert_eq!((first, second), (0, 1));

        for term in ["cat", "dog", "cat"] {
            tracker.record_token(first, term).unwrap();
        }
        for term in ["dog", "dog"] {
            tracker.record_token(second, term).unwrap();
        }

        assert_eq!(
            tracker.points(first).unwrap(),
            &[point(1, 1), point(2, 2), point(3, 2)]
        );
        assert_eq!(tracker.points(second).unwrap(), &[point(1, 1), point(2, 1)]);
    }

    #[test]
    fn test_record_term_is_idempotent() {
        let mut tracker = VocabularyTracker::new();
        let doc = tracker.new_document();

        assert!(tracker.record_term(doc, "wing").unwrap());
        assert!(!tracker.record_term(doc, "wing").unwrap());
        assert_eq!(tracker.vocabulary_size(doc).unwrap(), 1);
    }

    #[test]
    fn test_point_without_term() {
        let mut tracker = VocabularyTracker::new();
        let doc = tracker.new_document();

        assert_eq!(tracker.record_point(doc).unwrap(), point(1, 0));
    }

    #[test]
    fn test_unknown_document() {
        let mut tracker = VocabularyTracker::new();
        tracker.new_document();

        let err = tracker.record_term(3, "wing").unwrap_err();
        assert!(matches!(
            err,
            TermStatError::InvalidDocument {
                ordinal: 3,
                tracked: 1
            }
        ));
        assert!(tracker.record_point(1).is_err());
        assert!(tracker.points(1).is_err());
    }

    #[test]
    fn test_documents_are_isolated() {
        let mut tracker = VocabularyTracker::new();
        let a = tracker.new_document();
        let b = tracker.new_document();

        tracker.record_token(a, "flow").unwrap();
        let p = tracker.record_token(b, "flow").unwrap();

        assert_eq!(p, point(1, 1));
        assert_eq!(tracker.iter().count(), 2);
    }
}
