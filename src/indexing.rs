//! Corpus processing: analyze, track vocabulary growth, index, commit.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::backend::DocumentSink;
use crate::config::TermStatConfig;
use crate::corpus::{CorpusDocument, listing::load_corpus};
use crate::error::{Result, TermStatError};
use crate::vocabulary::VocabularyTracker;

/// Counts from one corpus-processing run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexingSummary {
    /// Documents added to the index.
    pub documents: usize,

    /// Tokens fed to the vocabulary tracker.
    pub tokens: u64,

    /// Growth files written, if tracking was enabled.
    pub growth_files: Vec<PathBuf>,
}

/// Add `documents` to `sink` in order and commit.
///
/// When a tracker is given, the analyzed tokens of `field` are fed to it
/// before each document is added. Documents without the field contribute
/// no tokens. Document ordinals must match their position in the slice.
pub fn index_documents<D>(
    sink: &mut D,
    documents: &[CorpusDocument],
    field: &str,
    mut tracker: Option<&mut VocabularyTracker>,
) -> Result<IndexingSummary>
where
    D: DocumentSink + ?Sized,
{
    let mut summary = IndexingSummary::default();

    for (position, doc) in documents.iter().enumerate() {
        if doc.ordinal != position {
            return Err(TermStatError::invalid_document(doc.ordinal, position));
        }

        if let Some(tracker) = tracker.as_deref_mut() {
            let ordinal = tracker.new_document();
            let tokens = match doc.field(field) {
                Some(text) => sink.tokenize(field, text)?,
                None => Vec::new(),
            };
            for token in &tokens {
                tracker.record_term(ordinal, token)?;
                tracker.record_point(ordinal)?;
            }
            summary.tokens += tokens.len() as u64;
        }

        sink.add_document(doc)?;
        summary.documents += 1;
        debug!(ordinal = doc.ordinal, "indexed document");
    }

    sink.commit()?;
    Ok(summary)
}

/// Load the corpus under `corpus_dir`, index it and persist growth data.
///
/// Growth tracking runs when `config.heap_dir` is set. A failure to write
/// the growth files is returned as a persistence error after the index has
/// been committed.
pub fn process_corpus<D>(
    sink: &mut D,
    corpus_dir: &Path,
    config: &TermStatConfig,
) -> Result<IndexingSummary>
where
    D: DocumentSink + ?Sized,
{
    let documents = load_corpus(corpus_dir)?;

    let mut tracker = config.tracks_growth().then(VocabularyTracker::new);
    let mut summary = index_documents(sink, &documents, &config.field, tracker.as_mut())?;

    if let (Some(tracker), Some(heap_dir)) = (tracker.as_ref(), config.heap_dir.as_deref()) {
        summary.growth_files = tracker.persist(heap_dir)?;
    }

    info!(
        documents = summary.documents,
        tokens = summary.tokens,
        growth_files = summary.growth_files.len(),
        "processed corpus"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocabulary::GrowthPoint;

    /// Sink that splits on whitespace and remembers what it was given.
    #[derive(Default)]
    struct RecordingSink {
        added: Vec<usize>,
        commits: usize,
    }

    impl DocumentSink for RecordingSink {
        fn tokenize(&self, _field: &str, text: &str) -> Result<Vec<String>> {
            Ok(text.split_whitespace().map(str::to_string).collect())
        }

        fn add_document(&mut self, doc: &CorpusDocument) -> Result<()> {
            self.added.push(doc.ordinal);
            Ok(())
        }

        fn commit(&mut self) -> Result<()> {
            self.commits += 1;
            Ok(())
        }
    }

    fn documents() -> Vec<CorpusDocument> {
        vec![
            CorpusDocument::new(0).with_content("cat dog cat"),
            CorpusDocument::new(1).with_title("no content"),
            CorpusDocument::new(2).with_content("dog dog"),
        ]
    }

    #[test]
    fn test_index_with_tracking() {
        let mut sink = RecordingSink::default();
        let mut tracker = VocabularyTracker::new();

        let summary =
            index_documents(&mut sink, &documents(), "content", Some(&mut tracker)).unwrap();

        assert_eq!(summary.documents, 3);
        assert_eq!(summary.tokens, 5);
        assert_eq!(sink.added, vec![0, 1, 2]);
        assert_eq!(sink.commits, 1);

        assert_eq!(tracker.document_count(), 3);
        assert!(tracker.points(1).unwrap().is_empty());
        assert_eq!(
            tracker.points(2).unwrap(),
            &[
                GrowthPoint {
                    tokens: 1,
                    vocabulary: 1
                },
                GrowthPoint {
                    tokens: 2,
                    vocabulary: 1
                },
            ]
        );
    }

    #[test]
    fn test_index_without_tracking() {
        let mut sink = RecordingSink::default();
        let summary = index_documents(&mut sink, &documents(), "content", None).unwrap();

        assert_eq!(summary.documents, 3);
        assert_eq!(summary.tokens, 0);
        assert_eq!(sink.commits, 1);
    }

    #[test]
    fn test_out_of_order_ordinal() {
        let mut sink = RecordingSink::default();
        let docs = vec![CorpusDocument::new(1).with_content("wing")];

        let err = index_documents(&mut sink, &docs, "content", None).unwrap_err();
        assert!(matches!(err, TermStatError::InvalidDocument { .. }));
        assert_eq!(sink.commits, 0);
    }
}
