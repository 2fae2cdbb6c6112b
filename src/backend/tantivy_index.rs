//! Tantivy-backed implementation of [`DocumentSink`] and [`TermSource`].
//!
//! Tantivy keeps no stored term vectors, so the first term-vector request
//! for a field walks that field's term dictionary and postings once and
//! materializes a forward view (document ordinal -> terms). The view is
//! dropped on every commit together with the rest of the reader session.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tantivy::collector::TopDocs;
use tantivy::directory::MmapDirectory;
use tantivy::postings::Postings;
use tantivy::query::{Query, QueryParser, TermQuery};
use tantivy::schema::{Field, IndexRecordOption, Value};
use tantivy::tokenizer::{
    LowerCaser, RemoveLongFilter, SimpleTokenizer, StopWordFilter, TextAnalyzer, TokenStream,
};
use tantivy::{
    DocAddress, DocSet, Index, IndexReader, IndexWriter, ReloadPolicy, Searcher,
    TERMINATED, TantivyDocument, Term,
};
use tracing::{debug, info, warn};

use crate::backend::schema::CorpusSchema;
use crate::backend::{DocOrdinal, DocumentSink, TermFrequency, TermSource, TermVector};
use crate::config::TermStatConfig;
use crate::corpus::CorpusDocument;
use crate::error::{Result, TermStatError};

/// File tantivy writes at the root of every index directory.
const META_FILE: &str = "meta.json";

/// Analyzer settings stored next to an on-disk index.
const ANALYZER_FILE: &str = "termstat-analyzer.json";

/// Analysis options an index was built with. Queries against the index must
/// be analyzed the same way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct AnalyzerSettings {
    stop_words: Vec<String>,
    max_token_length: usize,
}

impl AnalyzerSettings {
    fn from_config(config: &TermStatConfig) -> Self {
        AnalyzerSettings {
            stop_words: config.stop_words.iter().map(|w| w.to_lowercase()).collect(),
            max_token_length: config.max_token_length,
        }
    }
}

/// How [`TantivyBackend::open`] found the index directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendOpen {
    /// A new, empty index was created; the corpus must be processed.
    Created,
    /// A previously built index was opened as is.
    Existing,
}

/// A search hit resolved to corpus terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub ordinal: DocOrdinal,
    pub score: f32,
    pub title: Option<String>,
}

/// Forward view of one field for one reader session.
#[derive(Debug, Default)]
struct ForwardIndex {
    vectors: Vec<Option<TermVector>>,
    collection_frequencies: AHashMap<String, u64>,
}

/// Corpus index stored in tantivy.
pub struct TantivyBackend {
    index: Index,
    schema: CorpusSchema,
    reader: IndexReader,
    writer: Option<IndexWriter>,
    writer_memory_bytes: usize,
    generation: u64,
    forward: RwLock<AHashMap<String, Arc<ForwardIndex>>>,
}

impl TantivyBackend {
    /// Open the index in `config.index_dir`, creating it if necessary.
    ///
    /// With `config.regenerate` any existing index is deleted first. An
    /// index counts as existing only once a commit has produced segments, so
    /// a run that failed before committing is processed again. The analyzer
    /// settings of an existing index take precedence over `config`.
    pub fn open(config: &TermStatConfig) -> Result<(Self, BackendOpen)> {
        let path = config.index_dir.as_path();
        if config.regenerate && path.exists() {
            info!(index = %path.display(), "removing existing index");
            fs::remove_dir_all(path)?;
        }

        fs::create_dir_all(path)?;
        let schema = CorpusSchema::new();
        let directory = MmapDirectory::open(path)?;
        let index = Index::open_or_create(directory, schema.schema().clone())?;

        let state = if index.searchable_segment_ids()?.is_empty() {
            BackendOpen::Created
        } else {
            BackendOpen::Existing
        };
        info!(index = %path.display(), state = ?state, "opened index");

        let settings_path = path.join(ANALYZER_FILE);
        let settings = match state {
            BackendOpen::Existing if settings_path.is_file() => {
                let settings: AnalyzerSettings =
                    serde_json::from_str(&fs::read_to_string(&settings_path)?)?;
                if settings != AnalyzerSettings::from_config(config) {
                    warn!(
                        index = %path.display(),
                        "using the analyzer settings the index was built with"
                    );
                }
                settings
            }
            _ => {
                let settings = AnalyzerSettings::from_config(config);
                fs::write(&settings_path, serde_json::to_string_pretty(&settings)?)?;
                settings
            }
        };

        Ok((Self::from_index(index, schema, config, &settings)?, state))
    }

    /// Create an index held entirely in memory.
    pub fn in_memory(config: &TermStatConfig) -> Result<Self> {
        let schema = CorpusSchema::new();
        let index = Index::create_in_ram(schema.schema().clone());
        Self::from_index(index, schema, config, &AnalyzerSettings::from_config(config))
    }

    fn from_index(
        index: Index,
        schema: CorpusSchema,
        config: &TermStatConfig,
        settings: &AnalyzerSettings,
    ) -> Result<Self> {
        Self::register_analyzer(&index, settings);
        let reader: IndexReader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;

        Ok(TantivyBackend {
            index,
            schema,
            reader,
            writer: None,
            writer_memory_bytes: config.writer_memory_bytes,
            generation: 0,
            forward: RwLock::new(AHashMap::new()),
        })
    }

    /// Whether an index directory has been initialized at `path`.
    ///
    /// The index may still be empty; [`open`](Self::open) reports whether it
    /// holds committed documents.
    pub fn exists(path: &Path) -> bool {
        path.join(META_FILE).is_file()
    }

    /// Register the text analyzer: simple tokenizer, long-token removal,
    /// lowercasing and the configured stop words.
    fn register_analyzer(index: &Index, settings: &AnalyzerSettings) {
        let analyzer = TextAnalyzer::builder(SimpleTokenizer::default())
            .filter(RemoveLongFilter::limit(settings.max_token_length))
            .filter(LowerCaser)
            .filter(StopWordFilter::remove(settings.stop_words.clone()))
            .build();
        index.tokenizers().register(CorpusSchema::ANALYZER, analyzer);
    }

    /// The index schema.
    pub fn schema(&self) -> &CorpusSchema {
        &self.schema
    }

    /// A query parser over a single default field.
    pub fn query_parser(&self, field: &str) -> Result<QueryParser> {
        let field = self.schema.text_field(field)?;
        Ok(QueryParser::for_index(&self.index, vec![field]))
    }

    /// Run `query` and return at most `limit` hits, best first.
    pub fn search(&self, query: &dyn Query, limit: usize) -> Result<Vec<SearchHit>> {
        let searcher = self.reader.searcher();
        let top_docs = searcher.search(query, &TopDocs::with_limit(limit))?;

        top_docs
            .into_iter()
            .map(|(score, address)| -> Result<SearchHit> {
                let doc: TantivyDocument = searcher.doc(address)?;
                let ordinal = doc
                    .get_first(self.schema.ordinal)
                    .and_then(|v| v.as_u64())
                    .ok_or_else(|| TermStatError::backend("stored document has no ordinal"))?;
                let title = doc
                    .get_first(self.schema.title)
                    .and_then(|v| v.as_str())
                    .map(str::to_string);

                Ok(SearchHit {
                    ordinal: ordinal as DocOrdinal,
                    score,
                    title,
                })
            })
            .collect()
    }

    /// Explain how the document at `ordinal` scores against `query`.
    pub fn explain(&self, query: &dyn Query, ordinal: DocOrdinal) -> Result<String> {
        let searcher = self.reader.searcher();
        let address = self.doc_address(&searcher, ordinal)?;
        let explanation = query.explain(&searcher, address)?;
        Ok(explanation.to_pretty_json())
    }

    fn doc_address(&self, searcher: &Searcher, ordinal: DocOrdinal) -> Result<DocAddress> {
        let term = Term::from_field_u64(self.schema.ordinal, ordinal as u64);
        let query = TermQuery::new(term, IndexRecordOption::Basic);
        searcher
            .search(&query, &TopDocs::with_limit(1))?
            .into_iter()
            .next()
            .map(|(_, address)| address)
            .ok_or_else(|| TermStatError::backend(format!("no document with ordinal {ordinal}")))
    }

    fn writer(&mut self) -> Result<&mut IndexWriter> {
        if self.writer.is_none() {
            let writer: IndexWriter = self
                .index
                .writer_with_num_threads(1, self.writer_memory_bytes)?;
            self.writer = Some(writer);
        }
        self.writer
            .as_mut()
            .ok_or_else(|| TermStatError::internal("index writer unavailable"))
    }

    fn forward_index(&self, field_name: &str) -> Result<Arc<ForwardIndex>> {
        if let Some(forward) = self.forward.read().get(field_name) {
            return Ok(Arc::clone(forward));
        }

        let field = self.schema.text_field(field_name)?;
        let forward = Arc::new(self.build_forward_index(field)?);
        debug!(
            field = field_name,
            terms = forward.collection_frequencies.len(),
            "materialized term vectors"
        );
        self.forward
            .write()
            .insert(field_name.to_string(), Arc::clone(&forward));
        Ok(forward)
    }

    fn build_forward_index(&self, field: Field) -> Result<ForwardIndex> {
        let searcher = self.reader.searcher();
        let total = searcher.num_docs() as usize;
        let mut forward = ForwardIndex {
            vectors: vec![None; total],
            collection_frequencies: AHashMap::new(),
        };

        for segment_reader in searcher.segment_readers() {
            let ordinals = segment_reader.fast_fields().u64(CorpusSchema::ORDINAL)?;
            let inverted_index = segment_reader.inverted_index(field)?;
            let mut terms = inverted_index.terms().stream()?;

            while terms.advance() {
                let text = std::str::from_utf8(terms.key()).map_err(|e| {
                    TermStatError::backend(format!("term is not valid UTF-8: {e}"))
                })?;
                let mut postings = inverted_index
                    .read_postings_from_terminfo(terms.value(), IndexRecordOption::WithFreqs)?;

                let mut doc = postings.doc();
                while doc != TERMINATED {
                    if !segment_reader.is_deleted(doc) {
                        let ordinal = ordinals.first(doc).ok_or_else(|| {
                            TermStatError::backend("indexed document has no ordinal")
                        })? as usize;
                        let frequency = u64::from(postings.term_freq());

                        let slot = forward.vectors.get_mut(ordinal).ok_or_else(|| {
                            TermStatError::backend(format!(
                                "ordinal {ordinal} exceeds document count {total}"
                            ))
                        })?;
                        slot.get_or_insert_with(Vec::new)
                            .push(TermFrequency::new(text, frequency));
                        *forward
                            .collection_frequencies
                            .entry(text.to_string())
                            .or_insert(0) += frequency;
                    }
                    doc = postings.advance();
                }
            }
        }

        Ok(forward)
    }
}

impl std::fmt::Debug for TantivyBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TantivyBackend")
            .field("generation", &self.generation)
            .field("writer_open", &self.writer.is_some())
            .finish()
    }
}

impl DocumentSink for TantivyBackend {
    fn tokenize(&self, field: &str, text: &str) -> Result<Vec<String>> {
        let field = self.schema.text_field(field)?;
        let mut analyzer = self.index.tokenizer_for_field(field)?;
        let mut stream = analyzer.token_stream(text);

        let mut terms = Vec::new();
        while stream.advance() {
            terms.push(stream.token().text.clone());
        }
        Ok(terms)
    }

    fn add_document(&mut self, doc: &CorpusDocument) -> Result<()> {
        let fields = &self.schema;
        let mut document = TantivyDocument::default();
        document.add_u64(fields.ordinal, doc.ordinal as u64);
        for (field, value) in [
            (fields.title, &doc.title),
            (fields.author, &doc.author),
            (fields.bib, &doc.bib),
            (fields.content, &doc.content),
        ] {
            if let Some(text) = value {
                document.add_text(field, text);
            }
        }

        self.writer()?.add_document(document)?;
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.commit()?;
        }
        self.reader.reload()?;
        self.generation += 1;
        self.forward.write().clear();
        info!(
            documents = self.reader.searcher().num_docs(),
            generation = self.generation,
            "committed index"
        );
        Ok(())
    }
}

impl TermSource for TantivyBackend {
    fn total_documents(&self) -> Result<usize> {
        Ok(self.reader.searcher().num_docs() as usize)
    }

    fn document_frequency(&self, field: &str, term: &str) -> Result<u64> {
        let field = self.schema.text_field(field)?;
        let term = Term::from_field_text(field, term);
        Ok(self.reader.searcher().doc_freq(&term)?)
    }

    fn collection_frequency(&self, field: &str, term: &str) -> Result<u64> {
        let forward = self.forward_index(field)?;
        Ok(forward
            .collection_frequencies
            .get(term)
            .copied()
            .unwrap_or(0))
    }

    fn term_vector(&self, ordinal: DocOrdinal, field: &str) -> Result<Option<TermVector>> {
        let forward = self.forward_index(field)?;
        match forward.vectors.get(ordinal) {
            Some(vector) => Ok(vector.clone()),
            None => Err(TermStatError::backend(format!(
                "no document with ordinal {ordinal}"
            ))),
        }
    }

    fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend_with(contents: &[&str]) -> TantivyBackend {
        let mut backend = TantivyBackend::in_memory(&TermStatConfig::default()).unwrap();
        for (ordinal, content) in contents.iter().enumerate() {
            let doc = CorpusDocument::new(ordinal).with_content(*content);
            backend.add_document(&doc).unwrap();
        }
        backend.commit().unwrap();
        backend
    }

    #[test]
    fn test_tokenize_lowercases() {
        let backend = TantivyBackend::in_memory(&TermStatConfig::default()).unwrap();
        let terms = backend.tokenize("content", "The Cat, the DOG.").unwrap();
        assert_eq!(terms, vec!["the", "cat", "the", "dog"]);
    }

    #[test]
    fn test_stop_words_are_removed() {
        let config = TermStatConfig {
            stop_words: vec!["The".to_string()],
            ..Default::default()
        };
        let backend = TantivyBackend::in_memory(&config).unwrap();
        let terms = backend.tokenize("content", "The cat and the dog").unwrap();
        assert_eq!(terms, vec!["cat", "and", "dog"]);
    }

    #[test]
    fn test_frequencies_and_vectors() {
        let backend = backend_with(&["cat dog cat", "dog dog"]);

        assert_eq!(backend.total_documents().unwrap(), 2);
        assert_eq!(backend.document_frequency("content", "dog").unwrap(), 2);
        assert_eq!(backend.document_frequency("content", "cat").unwrap(), 1);
        assert_eq!(backend.collection_frequency("content", "dog").unwrap(), 3);
        assert_eq!(backend.collection_frequency("content", "bird").unwrap(), 0);

        let vector = backend.term_vector(0, "content").unwrap().unwrap();
        assert_eq!(
            vector,
            vec![TermFrequency::new("cat", 2), TermFrequency::new("dog", 1)]
        );
        assert!(backend.term_vector(0, "title").unwrap().is_none());
        assert!(backend.term_vector(5, "content").is_err());
    }

    #[test]
    fn test_commit_advances_generation() {
        let mut backend = backend_with(&["cat"]);
        let generation = backend.generation();

        backend
            .add_document(&CorpusDocument::new(1).with_content("dog"))
            .unwrap();
        backend.commit().unwrap();

        assert_eq!(backend.generation(), generation + 1);
        assert_eq!(backend.total_documents().unwrap(), 2);
        assert_eq!(backend.collection_frequency("content", "dog").unwrap(), 1);
    }

    #[test]
    fn test_search_and_explain() {
        let mut backend = TantivyBackend::in_memory(&TermStatConfig::default()).unwrap();
        backend
            .add_document(
                &CorpusDocument::new(0)
                    .with_title("Gliding flight")
                    .with_content("the glider wing"),
            )
            .unwrap();
        backend
            .add_document(
                &CorpusDocument::new(1)
                    .with_title("Boundary layers")
                    .with_content("boundary layer flow"),
            )
            .unwrap();
        backend.commit().unwrap();

        let parser = backend.query_parser("content").unwrap();
        let query = parser.parse_query("wing").unwrap();
        let hits = backend.search(query.as_ref(), 10).unwrap();

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].ordinal, 0);
        assert_eq!(hits[0].title.as_deref(), Some("Gliding flight"));

        let explanation = backend.explain(query.as_ref(), 0).unwrap();
        assert!(explanation.contains("value"));
        assert!(backend.explain(query.as_ref(), 9).is_err());
    }
}
