//! The term statistics table.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::backend::TermSource;
use crate::error::{Result, TermStatError};

/// Statistics of one distinct term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermStatistics {
    pub term: String,

    /// Number of documents containing the term.
    pub document_frequency: u64,

    /// Occurrences of the term across the collection.
    pub collection_frequency: u64,

    /// `log10(total_documents / document_frequency)`.
    pub inverse_document_frequency: f64,

    /// Occurrences of the term per document, indexed by ordinal.
    pub term_frequencies: Vec<u64>,
}

/// All terms of one field, ordered by collection frequency, highest first.
///
/// Terms with equal collection frequency keep the order in which they were
/// first met while walking the documents in ordinal order.
#[derive(Debug, Clone, Default)]
pub struct TermStatisticsTable {
    field: String,
    total_documents: usize,
    entries: Vec<TermStatistics>,
    positions: AHashMap<String, usize>,
}

impl TermStatisticsTable {
    /// Build the table for `field` over documents `0..total_documents`.
    ///
    /// Per-document counts come from the term vectors; document and
    /// collection frequencies are asked from the source once per term.
    /// Documents without the field are skipped. Any source failure aborts
    /// the build.
    pub fn build<S>(source: &S, total_documents: usize, field: &str) -> Result<Self>
    where
        S: TermSource + ?Sized,
    {
        let mut entries: Vec<TermStatistics> = Vec::new();
        let mut positions: AHashMap<String, usize> = AHashMap::new();

        for doc in 0..total_documents {
            let Some(vector) = source.term_vector(doc, field)? else {
                debug!(doc, field, "document has no term vector");
                continue;
            };

            for entry in vector {
                let position = match positions.get(&entry.term).copied() {
                    Some(position) => position,
                    None => {
                        let stats = Self::new_entry(source, total_documents, field, &entry.term)?;
                        entries.push(stats);
                        positions.insert(entry.term, entries.len() - 1);
                        entries.len() - 1
                    }
                };
                entries[position].term_frequencies[doc] = entry.frequency;
            }
        }

        // Stable, so ties keep first-seen order.
        entries.sort_by(|a, b| b.collection_frequency.cmp(&a.collection_frequency));
        let positions = entries
            .iter()
            .enumerate()
            .map(|(position, entry)| (entry.term.clone(), position))
            .collect();

        info!(
            field,
            documents = total_documents,
            terms = entries.len(),
            "built term statistics"
        );

        Ok(TermStatisticsTable {
            field: field.to_string(),
            total_documents,
            entries,
            positions,
        })
    }

    fn new_entry<S>(
        source: &S,
        total_documents: usize,
        field: &str,
        term: &str,
    ) -> Result<TermStatistics>
    where
        S: TermSource + ?Sized,
    {
        let document_frequency = source.document_frequency(field, term)?;
        if document_frequency == 0 || document_frequency > total_documents as u64 {
            return Err(TermStatError::backend(format!(
                "document frequency {document_frequency} of '{term}' is inconsistent with \
                 {total_documents} documents"
            )));
        }
        let collection_frequency = source.collection_frequency(field, term)?;

        Ok(TermStatistics {
            term: term.to_string(),
            document_frequency,
            collection_frequency,
            inverse_document_frequency: (total_documents as f64 / document_frequency as f64)
                .log10(),
            term_frequencies: vec![0; total_documents],
        })
    }

    /// Find a term.
    pub fn lookup(&self, term: &str) -> Option<&TermStatistics> {
        self.positions.get(term).map(|&position| &self.entries[position])
    }

    /// The `n` most frequent terms, or all of them if there are fewer.
    pub fn top_n(&self, n: usize) -> &[TermStatistics] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Every term.
    pub fn all(&self) -> &[TermStatistics] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_documents(&self) -> usize {
        self.total_documents
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}
